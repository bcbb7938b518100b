//! Trainings owned by the signed-in user and their steps.

use serde::Serialize;
use serde_json::Value;
use stepwise_core::{NewStep, Step, StepId, StepOrder, StepPatch, Training, TrainingId, TrainingSummary};

use crate::error::{ClientError, ClientResult};
use crate::request::{ApiClient, HttpMethod};

/// Training CRUD and step management.
#[derive(Debug, Clone, Copy)]
pub struct TrainingApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TrainingApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /training/my_trainings/`
    pub async fn my_trainings(&self) -> ClientResult<Vec<TrainingSummary>> {
        let mut req = self.client.request();
        req.with_method(HttpMethod::Get)
            .set_path("/training/my_trainings/");
        self.client.execute(&req).await?.json()
    }

    /// `POST /training/create_training`; the response body is returned as-is.
    pub async fn create_training<P>(&self, payload: &P) -> ClientResult<Value>
    where
        P: Serialize + ?Sized,
    {
        let mut req = self.client.request();
        req.with_method(HttpMethod::Post)
            .set_path("/training/create_training")
            .set_json(payload)?;
        self.client.execute(&req).await?.json()
    }

    /// `DELETE /training/{id}`
    pub async fn delete_training(&self, id: &TrainingId) -> ClientResult<Value> {
        let mut req = self.client.request();
        req.with_method(HttpMethod::Delete)
            .set_path(format!("/training/{id}"));
        self.client.execute(&req).await?.json()
    }

    /// `PATCH /training/{id}` with a partial update.
    pub async fn update_training<P>(&self, id: &TrainingId, patch: &P) -> ClientResult<Value>
    where
        P: Serialize + ?Sized,
    {
        let mut req = self.client.request();
        req.with_method(HttpMethod::Patch)
            .set_path(format!("/training/{id}"))
            .set_json(patch)?;
        self.client.execute(&req).await?.json()
    }

    /// `GET /training/{id}`
    ///
    /// The backend answers an unknown id with `200 {"detail": ...}`; that is
    /// reported as [`ClientError::NotFound`].
    pub async fn training(&self, id: &TrainingId) -> ClientResult<Training> {
        let mut req = self.client.request();
        req.with_method(HttpMethod::Get)
            .set_path(format!("/training/{id}"));
        let body: Value = self.client.execute(&req).await?.json()?;

        if body.get("uuid").is_none() && body.get("detail").is_some() {
            tracing::debug!(training = %id, "training not found");
            return Err(ClientError::NotFound);
        }
        serde_json::from_value(body).map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// `GET /training/{id}/steps`
    pub async fn steps(&self, id: &TrainingId) -> ClientResult<Vec<Step>> {
        let mut req = self.client.request();
        req.with_method(HttpMethod::Get)
            .set_path(format!("/training/{id}/steps"));
        self.client.execute(&req).await?.json()
    }

    /// `POST /training/{id}/steps`
    pub async fn add_step(&self, id: &TrainingId, step: &NewStep) -> ClientResult<Step> {
        let mut req = self.client.request();
        req.with_method(HttpMethod::Post)
            .set_path(format!("/training/{id}/steps"))
            .set_json(step)?;
        self.client.execute(&req).await?.json()
    }

    /// `POST /training/{id}/steps/bulk`
    pub async fn add_steps_bulk(&self, id: &TrainingId, steps: &[NewStep]) -> ClientResult<Vec<Step>> {
        let mut req = self.client.request();
        req.with_method(HttpMethod::Post)
            .set_path(format!("/training/{id}/steps/bulk"))
            .set_json(&serde_json::json!({ "steps": steps }))?;
        self.client.execute(&req).await?.json()
    }

    /// `PATCH /training/{id}/steps/{step_id}`
    pub async fn update_step(
        &self,
        id: &TrainingId,
        step_id: &StepId,
        patch: &StepPatch,
    ) -> ClientResult<Step> {
        let mut req = self.client.request();
        req.with_method(HttpMethod::Patch)
            .set_path(format!("/training/{id}/steps/{step_id}"))
            .set_json(patch)?;
        self.client.execute(&req).await?.json()
    }

    /// `DELETE /training/{id}/steps/{step_id}`
    pub async fn delete_step(&self, id: &TrainingId, step_id: &StepId) -> ClientResult<Value> {
        let mut req = self.client.request();
        req.with_method(HttpMethod::Delete)
            .set_path(format!("/training/{id}/steps/{step_id}"));
        self.client.execute(&req).await?.json()
    }

    /// `DELETE /training/{id}/steps` with the ids to remove as a JSON array.
    pub async fn delete_steps(&self, id: &TrainingId, step_ids: &[StepId]) -> ClientResult<Value> {
        if step_ids.is_empty() {
            return Err(ClientError::invalid_argument("no steps to delete"));
        }

        let mut req = self.client.request();
        req.with_method(HttpMethod::Delete)
            .set_path(format!("/training/{id}/steps"))
            .set_json(step_ids)?;
        self.client.execute(&req).await?.json()
    }

    /// `PATCH /training/{id}/steps/reorder`
    pub async fn reorder_steps(&self, id: &TrainingId, order: &[StepOrder]) -> ClientResult<Value> {
        let mut req = self.client.request();
        req.with_method(HttpMethod::Patch)
            .set_path(format!("/training/{id}/steps/reorder"))
            .set_json(&serde_json::json!({ "steps": order }))?;
        self.client.execute(&req).await?.json()
    }
}
