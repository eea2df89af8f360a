//! NewType for the base URL of the scitran API.

use crate::errors::InvalidApiUrl;
use aliri_braid::braid;

/// An [ApiUrl] is the base URL for a scitran instance, e.g.
/// `https://flywheel.example.org/api/`
#[braid(validator, serde)]
pub struct ApiUrl(String);

impl aliri_braid::Validator for ApiUrl {
    type Error = InvalidApiUrl;

    fn validate(s: &str) -> Result<(), Self::Error> {
        if !(s.starts_with("http://") || s.starts_with("https://")) {
            Err(InvalidApiUrl::Protocol(s.to_string()))
        } else if !s.ends_with("/api/") {
            Err(InvalidApiUrl::Path(s.to_string()))
        } else {
            reqwest::Url::parse(s)
                .map(|_| ())
                .map_err(|e| InvalidApiUrl::Malformed(s.to_string(), e.to_string()))
        }
    }
}

impl ApiUrl {
    /// URL of an endpoint under this API, e.g. `search` or `groups/wandell`.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self, path)
    }

    /// URL of an endpoint under this API built from path segments. Each
    /// segment is percent-encoded, so it cannot escape into another path.
    pub(crate) fn endpoint_url(&self, segments: &[&str]) -> Result<reqwest::Url, InvalidApiUrl> {
        let malformed = |reason: String| InvalidApiUrl::Malformed(self.to_string(), reason);
        let mut url = reqwest::Url::parse(self.as_str()).map_err(|e| malformed(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| malformed("cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}
