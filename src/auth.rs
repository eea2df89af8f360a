//! Obtaining, refreshing and revoking scitran tokens.
//!
//! An [AuthClient] holds at most one token. Its lifecycle is
//!
//! ```text
//! Unauthenticated --create--> Authenticated --refresh--> Refreshed --refresh--> ...
//!                                   \                        |
//!                                    +--------revoke-------> Revoked
//! ```

use crate::client::token2header;
use crate::errors::{json, AuthError, ServiceError};
use crate::models::{AuthAction, AuthRequest, AuthResponse, Grant};
use crate::types::{ApiUrl, ClientId, ResultCode, Token};
use crate::{ClientBuilder, SciTranClient};
use reqwest::header::AUTHORIZATION;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
    Refreshed,
    Revoked,
}

#[derive(Debug)]
struct Session {
    client_id: ClientId,
    token: Token,
}

/// Client of the auth endpoint, which keeps the current token.
///
/// [AuthClient::client] produces a [SciTranClient] which uses the token.
#[derive(Debug)]
pub struct AuthClient {
    base: SciTranClient,
    template: ClientBuilder,
    state: AuthState,
    session: Option<Session>,
}

impl AuthClient {
    pub fn new(url: ApiUrl) -> Result<Self, reqwest::Error> {
        Self::from_builder(SciTranClient::builder(url))
    }

    /// Create an [AuthClient] whose [SciTranClient]s are configured by `builder`.
    pub fn from_builder(builder: ClientBuilder) -> Result<Self, reqwest::Error> {
        Ok(Self {
            base: builder.clone().build()?,
            template: builder,
            state: AuthState::Unauthenticated,
            session: None,
        })
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    /// The currently held token.
    pub fn token(&self) -> Option<&Token> {
        self.session.as_ref().map(|s| &s.token)
    }

    /// Obtain a new token. Any token held previously is replaced.
    pub fn create(&mut self, client_id: &str) -> Result<Grant, AuthError> {
        let client_id = ClientId::new(client_id.to_string());
        if self.state == AuthState::Revoked {
            return Err(AuthError::SessionRevoked(client_id));
        }
        let grant = self.send(AuthAction::Create, &client_id, None)?;
        log::info!("created session for client {}", client_id);
        self.session = Some(Session {
            client_id,
            token: grant.token.clone(),
        });
        self.state = AuthState::Authenticated;
        Ok(grant)
    }

    /// Re-issue the token of the active session.
    pub fn refresh(&mut self, client_id: &str) -> Result<Grant, AuthError> {
        let session = match (&self.state, &self.session) {
            (AuthState::Authenticated | AuthState::Refreshed, Some(session))
                if session.client_id.as_str() == client_id =>
            {
                session
            }
            _ => return Err(AuthError::NoActiveSession(ClientId::new(client_id.to_string()))),
        };
        let grant = self.send(AuthAction::Refresh, &session.client_id, Some(&session.token))?;
        log::info!("refreshed session for client {}", client_id);
        if let Some(session) = self.session.as_mut() {
            session.token = grant.token.clone();
        }
        self.state = AuthState::Refreshed;
        Ok(grant)
    }

    /// Revoke the token and forget it. Revoking again does nothing.
    pub fn revoke(&mut self, client_id: &str) -> Result<ResultCode, AuthError> {
        if self.state == AuthState::Revoked {
            log::warn!("session for client {} was already revoked", client_id);
            return Ok(ResultCode::SUCCESS);
        }
        match &self.session {
            None => log::warn!("no token to revoke for client {}", client_id),
            Some(session) if session.client_id.as_str() == client_id => {
                let res = self.request(AuthAction::Revoke, &session.client_id, Some(&session.token))?;
                accepted(json(res)?)?;
                log::info!("revoked session for client {}", client_id);
            }
            Some(_) => {
                return Err(AuthError::NoActiveSession(ClientId::new(client_id.to_string())))
            }
        }
        self.session = None;
        self.state = AuthState::Revoked;
        Ok(ResultCode::SUCCESS)
    }

    /// Create a [SciTranClient] which uses the current token.
    pub fn client(&self) -> Result<SciTranClient, AuthError> {
        let token = self.token().ok_or(ServiceError::AuthRequired)?;
        Ok(self.template.clone().token(token.clone()).build()?)
    }

    fn send(
        &self,
        action: AuthAction,
        client_id: &ClientId,
        token: Option<&Token>,
    ) -> Result<Grant, AuthError> {
        let res = self.request(action, client_id, token)?;
        let body = accepted(json(res)?)?;
        match body.token {
            Some(token) if !token.as_str().is_empty() => Ok(Grant {
                token,
                code: body.code,
            }),
            _ => Err(AuthError::Denied {
                code: body.code,
                message: Some("no token was granted".to_string()),
            }),
        }
    }

    fn request(
        &self,
        action: AuthAction,
        client_id: &ClientId,
        token: Option<&Token>,
    ) -> Result<reqwest::blocking::Response, ServiceError> {
        let url = self.base.url.endpoint("auth");
        log::debug!("POST {} action={:?} client_id={}", url, action, client_id);
        let mut req = self
            .base
            .client
            .post(url)
            .query(&self.base.query)
            .json(&AuthRequest { action, client_id });
        if let Some(value) = token.and_then(token2header) {
            req = req.header(AUTHORIZATION, value);
        }
        Ok(req.send()?)
    }
}

/// A non-zero result code means the service refused the action.
fn accepted(body: AuthResponse) -> Result<AuthResponse, AuthError> {
    if body.code.is_success() {
        Ok(body)
    } else {
        Err(AuthError::Denied {
            code: body.code,
            message: body.message,
        })
    }
}
