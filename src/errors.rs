//! Errors for this crate.

use crate::types::{ClientId, ResultCode};
use reqwest::StatusCode;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum InvalidApiUrl {
    #[error("Given URL does not end with \"/api/\": {0}")]
    Path(String),

    #[error("Given URL does not start with \"http://\" or \"https://\": {0}")]
    Protocol(String),

    #[error("Given URL is malformed: {0} ({1})")]
    Malformed(String, String),
}

aliri_braid::from_infallible!(InvalidApiUrl);

/// Problems with a search query, detected before anything is sent.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SpecError {
    #[error("\"{0}\" is not a searchable kind, expected one of: projects, sessions, acquisitions, files, analyses, collections")]
    InvalidTarget(String),

    #[error("Invalid range for field \"{field}\": {reason}")]
    InvalidRange { field: String, reason: String },

    #[error("Search target was not set")]
    IncompleteSpecification,
}

/// Errors representing failed interactions with the scitran service.
#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    /// No token is held, or the service did not accept it.
    #[error("Authentication required: no valid token")]
    AuthRequired,

    /// The service could not be reached, or failed to handle the request.
    #[error("scitran service unavailable: {0}")]
    ServiceUnavailable(#[from] reqwest::Error),

    /// The service rejected the query.
    #[error("({status:?}): query was rejected: {text}")]
    MalformedSpecification { status: StatusCode, text: String },

    /// Error response with an explanation from the service.
    #[error("({status:?} {reason:?}): {text}")]
    Status {
        status: StatusCode,
        reason: &'static str,
        text: String,
        source: reqwest::Error,
    },

    /// The response body is not what was expected.
    #[error("Unexpected response from scitran: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error(transparent)]
    Url(#[from] InvalidApiUrl),
}

/// Errors from [crate::auth::AuthClient].
#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("No active session for client \"{0}\"")]
    NoActiveSession(ClientId),

    #[error("Session for client \"{0}\" was revoked")]
    SessionRevoked(ClientId),

    /// The auth endpoint answered with a non-zero result code.
    #[error("Auth request denied with code {code}: {}", .message.as_deref().unwrap_or("no reason given"))]
    Denied {
        code: ResultCode,
        message: Option<String>,
    },

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        AuthError::Service(e.into())
    }
}

/// Errors reading an NDAR dataset or importing it into scitran.
#[derive(thiserror::Error, Debug)]
pub enum ImportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not parse NDAR table: {0}")]
    Csv(#[from] csv::Error),

    #[error("NDAR table has no \"{0}\" column")]
    MissingColumn(&'static str),

    #[error("interview_age is not a whole number of months: \"{0}\"")]
    InvalidAge(String),

    #[error("Cannot name a project after folder {0:?}")]
    InvalidFolder(PathBuf),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Errors loading or using a [crate::config::Config].
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Could not read or write configuration file: {0}")]
    File(#[from] confy::ConfyError),

    #[error("scitran API URL is not configured")]
    MissingUrl,

    #[error(transparent)]
    Url(#[from] InvalidApiUrl),

    #[error(transparent)]
    Client(#[from] reqwest::Error),
}

/// Produce an error if the response status is not successful, classifying
/// it by status code.
pub(crate) fn check(
    res: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, ServiceError> {
    match res.error_for_status_ref() {
        Ok(_) => Ok(res),
        Err(source) => {
            let status = res.status();
            let reason = status.canonical_reason().unwrap_or("unknown reason");
            let text = res.text().map_err(ServiceError::ServiceUnavailable)?;
            log::debug!("{} {}: {}", status.as_u16(), reason, text);
            let error = match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ServiceError::AuthRequired,
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    ServiceError::MalformedSpecification { status, text }
                }
                s if s.is_server_error() => ServiceError::ServiceUnavailable(source),
                _ => ServiceError::Status {
                    status,
                    reason,
                    text,
                    source,
                },
            };
            Err(error)
        }
    }
}

/// Read a JSON response body. Decoding failures are [ServiceError::InvalidResponse].
pub(crate) fn json<T: serde::de::DeserializeOwned>(
    res: reqwest::blocking::Response,
) -> Result<T, ServiceError> {
    let body = check(res)?.bytes()?;
    Ok(serde_json::from_slice(&body)?)
}
