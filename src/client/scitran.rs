use super::default_headers;
use crate::errors::{json, ServiceError};
use crate::models::ResultObject;
use crate::search::SearchSpecification;
use crate::types::{ApiUrl, Token};
use reqwest::header::AUTHORIZATION;
use std::time::Duration;

/// Query string of every request.
#[derive(serde::Serialize, Default, Debug, Clone)]
pub(crate) struct CommonQuery {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    root: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<String>,
}

#[derive(serde::Serialize)]
struct SearchQuery<'a> {
    #[serde(flatten)]
    common: &'a CommonQuery,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u32>,
}

/// scitran client which carries its credential.
#[derive(Debug, Clone)]
pub struct SciTranClient {
    pub(crate) client: reqwest::blocking::Client,
    pub(crate) url: ApiUrl,
    pub(crate) query: CommonQuery,
    size: Option<u32>,
    authorized: bool,
}

/// Builder for [SciTranClient].
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    url: ApiUrl,
    token: Option<Token>,
    timeout: Option<Duration>,
    size: Option<u32>,
    root: bool,
    user: Option<String>,
}

impl ClientBuilder {
    pub(crate) fn new(url: ApiUrl) -> Self {
        Self {
            url,
            token: None,
            timeout: None,
            size: None,
            root: false,
            user: None,
        }
    }

    /// Token to send with every request.
    pub fn token(self, token: Token) -> Self {
        Self {
            token: Some(token),
            ..self
        }
    }

    /// Timeout of each request.
    pub fn timeout(self, timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..self
        }
    }

    /// Ask the service for at most `size` search results.
    pub fn size(self, size: u32) -> Self {
        Self {
            size: Some(size),
            ..self
        }
    }

    /// Send requests with site-admin privileges (`?root=true`).
    pub fn root(self, root: bool) -> Self {
        Self { root, ..self }
    }

    /// Act on behalf of the given user (`?user=...`), used together with `root`.
    pub fn user(self, user: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            ..self
        }
    }

    pub fn build(self) -> Result<SciTranClient, reqwest::Error> {
        let headers = default_headers(self.token.as_ref());
        let authorized = headers.contains_key(AUTHORIZATION);
        let mut builder = reqwest::blocking::ClientBuilder::new().default_headers(headers);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(SciTranClient {
            client: builder.build()?,
            url: self.url,
            query: CommonQuery {
                root: self.root,
                user: self.user,
            },
            size: self.size,
            authorized,
        })
    }
}

impl SciTranClient {
    /// Create a client builder.
    pub fn builder(url: ApiUrl) -> ClientBuilder {
        ClientBuilder::new(url)
    }

    /// Get the API URL.
    pub fn url(&self) -> &ApiUrl {
        &self.url
    }

    /// Whether this client holds a token.
    pub fn is_authorized(&self) -> bool {
        self.authorized
    }

    /// Run a search. Results are in the order produced by the service.
    /// Finding nothing is not an error.
    pub fn search(&self, spec: &SearchSpecification) -> Result<Vec<ResultObject>, ServiceError> {
        self.require_token()?;
        let url = self.url.endpoint("search");
        log::debug!("POST {} path={}", url, spec.target());
        let query = SearchQuery {
            common: &self.query,
            size: self.size,
        };
        let res = self.client.post(url).query(&query).json(spec).send()?;
        let results: Vec<ResultObject> = json(res)?;
        log::debug!("search for {} found {} results", spec.target(), results.len());
        Ok(results)
    }

    /// Count the results of a search.
    pub fn count(&self, spec: &SearchSpecification) -> Result<usize, ServiceError> {
        self.search(spec).map(|results| results.len())
    }

    /// Get the first result of a search.
    pub fn first(&self, spec: &SearchSpecification) -> Result<Option<ResultObject>, ServiceError> {
        Ok(self.search(spec)?.into_iter().next())
    }

    pub(crate) fn require_token(&self) -> Result<(), ServiceError> {
        if self.authorized {
            Ok(())
        } else {
            Err(ServiceError::AuthRequired)
        }
    }
}
