//! `stepwise` command-line entry point.
//!
//! Usage: `stepwise [PATH]` (default `/personal`). Resolves the path through
//! the route table, then, if a token is stored, checks it and lists the
//! user's trainings. For `/edit/{uuid}` the training is loaded into the
//! editor workflow.

use anyhow::Context;
use stepwise_app::{Page, Router};
use stepwise_client::{ApiClient, ClientConfig, check_auth};
use stepwise_core::{SessionState, TrainingId, WorkflowState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stepwise_observability::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "/personal".to_string());
    let matched = Router::default()
        .resolve(&path)
        .with_context(|| format!("failed to resolve {path:?}"))?;
    tracing::info!(path = %matched.path, pages = ?matched.pages, "route resolved");

    let config = ClientConfig::from_env().context("failed to load client configuration")?;
    let client = ApiClient::from_config(&config);
    tracing::info!(api_url = %config.api_url, "client configured");

    let Some(token) = client
        .tokens()
        .token()
        .context("failed to read stored token")?
    else {
        tracing::info!("no stored token; sign in first");
        return Ok(());
    };

    let (session, outcome) = check_auth(&client, &token, &SessionState::new()).await;
    if !outcome.is_authenticated() {
        tracing::warn!("stored token was rejected");
        return Ok(());
    }
    tracing::info!(name = session.name(), "signed in");

    let trainings = client
        .trainings()
        .my_trainings()
        .await
        .context("failed to list trainings")?;
    for training in &trainings {
        tracing::info!(training = %training.uuid, title = %training.title, "training");
    }

    if matched.page() == Some(Page::Edit) {
        let id: TrainingId = matched
            .params
            .get("uuid")
            .context("edit route without identifier")?
            .parse()?;
        let training = client
            .trainings()
            .training(&id)
            .await
            .with_context(|| format!("failed to load training {id}"))?;

        let mut workflow = WorkflowState::new();
        workflow.set_training_data(training);
        tracing::info!(
            training = %id,
            steps = workflow.steps().len(),
            selected = ?workflow.selected_step().map(|s| s.id),
            "editor loaded"
        );
    }

    Ok(())
}
