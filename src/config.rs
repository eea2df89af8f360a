//! Settings for connecting to scitran.
//!
//! [Config] can be saved to and loaded from a file using [confy]. By default
//! the file is `~/.config/scitran/scitran.ron` (the location is decided by
//! the platform).

use crate::auth::AuthClient;
use crate::errors::ConfigError;
use crate::types::{ApiUrl, ClientId};
use crate::ClientBuilder;
use crate::SciTranClient;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const APP_NAME: &str = "scitran";
const DEFAULT_CLIENT_ID: &str = "scitran";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// scitran API URL, e.g. `https://scitran.example.org/api/`
    pub url: Option<String>,
    /// Identifier sent to the auth endpoint.
    pub client_id: ClientId,
    pub timeout_secs: u64,
    /// Maximum number of search results to ask for.
    pub size: Option<u32>,
    /// Use site-admin privileges.
    pub root: bool,
    /// User to act on behalf of, with `root`.
    pub user: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: None,
            client_id: ClientId::from_static(DEFAULT_CLIENT_ID),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            size: None,
            root: false,
            user: None,
        }
    }
}

impl Config {
    /// Load config from the per-user file.
    pub fn load() -> Result<Self, ConfigError> {
        Ok(confy::load(APP_NAME, None)?)
    }

    /// Load config from the given file. If it does not exist, it is created
    /// with default values.
    pub fn load_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(confy::load_path(path)?)
    }

    /// Write config to the per-user file.
    pub fn store(&self) -> Result<(), ConfigError> {
        Ok(confy::store(APP_NAME, None, self)?)
    }

    /// Write config to the given file.
    pub fn store_path(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        Ok(confy::store_path(path, self)?)
    }

    pub fn api_url(&self) -> Result<ApiUrl, ConfigError> {
        let url = self.url.as_deref().ok_or(ConfigError::MissingUrl)?;
        Ok(ApiUrl::try_from(url)?)
    }

    /// Create a [ClientBuilder] with these settings.
    pub fn client_builder(&self) -> Result<ClientBuilder, ConfigError> {
        let mut builder = SciTranClient::builder(self.api_url()?)
            .timeout(Duration::from_secs(self.timeout_secs))
            .root(self.root);
        if let Some(size) = self.size {
            builder = builder.size(size);
        }
        if let Some(user) = &self.user {
            builder = builder.user(user.as_str());
        }
        Ok(builder)
    }

    /// Create an [AuthClient] with these settings.
    pub fn auth_client(&self) -> Result<AuthClient, ConfigError> {
        Ok(AuthClient::from_builder(self.client_builder()?)?)
    }
}
