//! Resource API clients.
//!
//! Each client borrows an [`ApiClient`](crate::ApiClient) and maps named
//! operations onto request descriptors. All operations propagate errors.

pub mod auth;
pub mod meta;
pub mod training;

pub use auth::{AccessToken, AuthApi, Credentials};
pub use meta::MetaTrainingApi;
pub use training::TrainingApi;

impl crate::ApiClient {
    pub fn meta(&self) -> MetaTrainingApi<'_> {
        MetaTrainingApi::new(self)
    }

    pub fn trainings(&self) -> TrainingApi<'_> {
        TrainingApi::new(self)
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }
}
