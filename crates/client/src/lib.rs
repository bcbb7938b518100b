//! `stepwise-client`
//!
//! HTTP client for the training backend:
//! - [`ApiRequest`] / [`ApiClient`]: request descriptor and executor with
//!   bearer-token injection
//! - [`api`]: resource clients (meta data, trainings and steps, accounts)
//! - [`check_auth`]: non-failing "who am I" check
//! - [`token`]: persistent token storage
//!
//! The client is a **thin shell** around the REST API: no retries, no
//! timeouts, no caching.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod request;
pub mod token;

pub use api::{AccessToken, AuthApi, Credentials, MetaTrainingApi, TrainingApi};
pub use auth::{AuthOutcome, check_auth};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use request::{ApiClient, ApiRequest, ApiResponse, Attachment, HttpMethod, RequestBody};
pub use token::{FileTokenStore, MemoryTokenStore, TOKEN_KEY, TokenStore};
