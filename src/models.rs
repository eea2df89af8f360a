//! Definitions of structs describing response data from the scitran API.

use crate::types::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An item found by a search.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ResultObject {
    #[serde(rename = "_id")]
    pub id: ResultId,
    #[serde(alias = "_source")]
    pub source: Map<String, Value>,
    pub permalink: Permalink,
}

impl ResultObject {
    /// Get a top-level field of `source`.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.source.get(field)
    }

    /// Get a nested field of `source` by dotted path, e.g. `subject.code`.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let first = self.source.get(parts.next()?)?;
        parts.try_fold(first, |value, part| value.as_object()?.get(part))
    }

    pub fn label(&self) -> Option<&str> {
        self.get("label").and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(Value::as_str)
    }
}

/// A token granted by the auth endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub token: Token,
    pub code: ResultCode,
}

/// Body of a request to the auth endpoint.
#[derive(Serialize)]
pub(crate) struct AuthRequest<'a> {
    pub action: AuthAction,
    pub client_id: &'a ClientId,
}

#[derive(Serialize, Debug, Copy, Clone, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum AuthAction {
    Create,
    Refresh,
    Revoke,
}

#[derive(Deserialize)]
pub(crate) struct AuthResponse {
    #[serde(default)]
    pub token: Option<Token>,
    pub code: ResultCode,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response from creating a container.
#[derive(Deserialize, Debug)]
pub(crate) struct CreatedResponse {
    #[serde(rename = "_id")]
    pub id: ResultId,
}
