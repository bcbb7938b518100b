//! Reference data (tags, levels, actions) and photo upload.

use serde_json::Value;
use stepwise_core::{ActionType, Level, Tag, TrainingId};

use crate::error::{ClientError, ClientResult};
use crate::request::{ApiClient, Attachment, HttpMethod};

/// Multipart field the backend reads uploaded photos from.
const PHOTO_FIELD: &str = "files";

/// Operations on data shared by all trainings.
#[derive(Debug, Clone, Copy)]
pub struct MetaTrainingApi<'a> {
    client: &'a ApiClient,
}

impl<'a> MetaTrainingApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /tags/`
    pub async fn tags(&self) -> ClientResult<Vec<Tag>> {
        let mut req = self.client.request();
        req.with_method(HttpMethod::Get).set_path("/tags/");
        self.client.execute(&req).await?.json()
    }

    /// `GET /levels/`
    pub async fn levels(&self) -> ClientResult<Vec<Level>> {
        let mut req = self.client.request();
        req.with_method(HttpMethod::Get).set_path("/levels/");
        self.client.execute(&req).await?.json()
    }

    /// `GET /actions/`: interactions a step can ask for (click, text, ...).
    pub async fn actions(&self) -> ClientResult<Vec<ActionType>> {
        let mut req = self.client.request();
        req.with_method(HttpMethod::Get).set_path("/actions/");
        self.client.execute(&req).await?.json()
    }

    /// `POST /training/upload-photos/{id}`; the backend creates one step per
    /// photo and answers with the uploaded URLs and created steps.
    pub async fn upload_images(
        &self,
        training: &TrainingId,
        files: Vec<Attachment>,
    ) -> ClientResult<Value> {
        if files.is_empty() {
            return Err(ClientError::invalid_argument("no files to upload"));
        }

        tracing::info!(training = %training, count = files.len(), "uploading photos");

        let mut req = self.client.request();
        req.with_method(HttpMethod::Post)
            .set_path(format!("/training/upload-photos/{training}"))
            .set_files(PHOTO_FIELD, files);
        self.client.execute(&req).await?.json()
    }
}
