//! "Who am I" check used to decide whether the personal area is reachable.

use serde_json::Value;
use stepwise_core::SessionState;

use crate::request::{ApiClient, HttpMethod};

/// Result of [`check_auth`].
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    /// The token was accepted; `user` is the full `/auth/me` body.
    Authenticated { user: Value },
    Unauthenticated,
}

impl AuthOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthOutcome::Authenticated { .. })
    }

    pub fn user(&self) -> Option<&Value> {
        match self {
            AuthOutcome::Authenticated { user } => Some(user),
            AuthOutcome::Unauthenticated => None,
        }
    }
}

/// Ask `GET /auth/me` whether `token` is valid.
///
/// Never fails: transport errors and non-2xx statuses yield
/// [`AuthOutcome::Unauthenticated`] with `session` returned unchanged.
/// Any 2xx is a success; the returned session carries the body's
/// `first_name`, or an empty one when the body has none. A body that is not
/// JSON is reported as `null`.
pub async fn check_auth(
    client: &ApiClient,
    token: &str,
    session: &SessionState,
) -> (SessionState, AuthOutcome) {
    let mut req = client.request();
    req.with_method(HttpMethod::Get).set_path("/auth/me");

    match client.dispatch(&req, Some(token)).await {
        Ok(resp) => {
            // Any 2xx counts; a body that is not a JSON object simply has no name.
            let user = resp.json::<Value>().unwrap_or(Value::Null);
            let first_name = user
                .get("first_name")
                .and_then(Value::as_str)
                .unwrap_or_default();
            tracing::info!("auth check succeeded");
            (
                session.with_first_name(first_name),
                AuthOutcome::Authenticated { user },
            )
        }
        Err(e) => {
            tracing::info!(error = %e, "auth check rejected");
            (session.clone(), AuthOutcome::Unauthenticated)
        }
    }
}
