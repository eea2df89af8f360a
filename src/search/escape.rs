//! Reversible encoding of field names into keys which contain no `.` and do not
//! start with `_`.
//!
//! - `.` (not in first position) is written as `_0x2E_`
//! - `_` followed by the text `0x` is written as `_0x5F_`, so that literal
//!   escape sequences survive the round trip
//! - a leading `_`, `.`, or `x` followed by `0x` is written as `x0xHH_`
//!
//! e.g. `subject.code` is stored as `subject_0x2E_code`, and `_id` as `x0x5F_id`.

const BODY_PREFIX: &str = "_0x";
const LEAD_PREFIX: &str = "x0x";

/// Encode a field name.
pub fn escape(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut chars = field.char_indices();
    if let Some((_, first)) = chars.next() {
        let rest = &field[first.len_utf8()..];
        let lead_escape = first == '_'
            || first == '.'
            || (first == 'x' && rest.starts_with("0x"));
        if lead_escape {
            push_hex(&mut out, LEAD_PREFIX, first);
        } else {
            push_body_char(&mut out, first, rest);
        }
    }
    for (i, c) in chars {
        push_body_char(&mut out, c, &field[i + c.len_utf8()..]);
    }
    out
}

/// Decode a key produced by [escape].
///
/// Text which does not contain escape sequences is returned unchanged.
pub fn unescape(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let body = match decode_at(key, LEAD_PREFIX) {
        Some(c) => {
            out.push(c);
            &key[ESCAPE_LEN..]
        }
        None => key,
    };
    let mut i = 0;
    while i < body.len() {
        if let Some(c) = decode_at(&body[i..], BODY_PREFIX) {
            out.push(c);
            i += ESCAPE_LEN;
        } else {
            // i is always on a char boundary: escape sequences are ASCII
            let c = body[i..].chars().next().unwrap_or_default();
            out.push(c);
            i += c.len_utf8();
        }
    }
    out
}

/// Length of `_0xHH_` and `x0xHH_`.
const ESCAPE_LEN: usize = 6;

fn push_body_char(out: &mut String, c: char, rest: &str) {
    if c == '.' || (c == '_' && rest.starts_with("0x")) {
        push_hex(out, BODY_PREFIX, c);
    } else {
        out.push(c)
    }
}

fn push_hex(out: &mut String, prefix: &str, c: char) {
    out.push_str(&format!("{}{:02X}_", prefix, c as u32));
}

fn decode_at(s: &str, prefix: &str) -> Option<char> {
    let bytes = s.as_bytes();
    if bytes.len() < ESCAPE_LEN || !s.starts_with(prefix) || bytes[5] != b'_' {
        return None;
    }
    let hex = std::str::from_utf8(&bytes[3..5]).ok()?;
    let code = u8::from_str_radix(hex, 16).ok()?;
    match code {
        b'.' | b'_' | b'x' => Some(code as char),
        _ => None,
    }
}
