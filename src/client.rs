mod containers;
mod scitran;

pub use containers::ImportReport;
pub use scitran::{ClientBuilder, SciTranClient};

use crate::types::Token;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};

/// Default headers of every request, including the token if one is held.
pub(crate) fn default_headers(token: Option<&Token>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Some(value) = token.and_then(token2header) {
        headers.insert(AUTHORIZATION, value);
    }
    headers
}

/// Empty tokens, and tokens which are not valid header values, are not sent.
pub(crate) fn token2header(token: &Token) -> Option<HeaderValue> {
    if token.as_str().trim().is_empty() {
        return None;
    }
    let auth_data = format!("scitran-user {}", token);
    let mut value = HeaderValue::from_str(&auth_data).ok()?;
    value.set_sensitive(true);
    Some(value)
}
