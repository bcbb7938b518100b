//! Sign-in and registration.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientResult;
use crate::request::{ApiClient, HttpMethod};

/// Username/password pair used by both login and registration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Token issued by `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

/// Account operations.
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `POST /auth/login` (form-encoded). The issued token is written to the
    /// client's token store so subsequent calls are authorised.
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<AccessToken> {
        let mut req = self.client.request();
        req.with_method(HttpMethod::Post)
            .set_path("/auth/login")
            .set_form([
                ("username", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
            ]);

        let token: AccessToken = self.client.execute(&req).await?.json()?;
        self.client.tokens().store_token(&token.access_token)?;
        tracing::info!(username = %credentials.username, "signed in");
        Ok(token)
    }

    /// `POST /auth/register`
    pub async fn register(&self, credentials: &Credentials) -> ClientResult<Value> {
        let mut req = self.client.request();
        req.with_method(HttpMethod::Post)
            .set_path("/auth/register")
            .set_json(credentials)?;
        self.client.execute(&req).await?.json()
    }

    /// Forget the stored token.
    pub fn logout(&self) -> ClientResult<()> {
        self.client.tokens().clear_token()?;
        tracing::info!("signed out");
        Ok(())
    }
}
