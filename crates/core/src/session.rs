//! In-memory profile of the signed-in user.

use serde::{Deserialize, Serialize};

/// Profile fields of the currently authenticated user.
///
/// Lives for the whole client session. It is never cleared implicitly; the
/// auth check hands back an updated copy instead of mutating shared state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub id: String,
    pub email: String,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Display name shown in the personal area header.
    pub fn name(&self) -> &str {
        &self.first_name
    }

    /// Copy of this state with `first_name` replaced.
    pub fn with_first_name(&self, first_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            ..self.clone()
        }
    }
}
