//! Training and step models as exchanged with the backend.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::id::{StepId, TrainingId};
use crate::meta::{ActionType, Level, Tag};

/// One step of a training: a screenshot plus the area and action the learner
/// must perform on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    pub step_number: i32,
    #[serde(default)]
    pub action_type_id: Option<i64>,
    #[serde(default)]
    pub training_uuid: Option<TrainingId>,
    #[serde(default)]
    pub parent_step_id: Option<StepId>,
    #[serde(default)]
    pub area: Option<BTreeMap<String, i64>>,
    #[serde(default)]
    pub meta: Option<Map<String, Value>>,
    #[serde(default)]
    pub annotation: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub action_type: Option<ActionType>,
}

impl Entity for Step {
    type Id = StepId;

    fn id(&self) -> &StepId {
        &self.id
    }
}

/// Training as listed by `GET /training/my_trainings/` (no steps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub uuid: TrainingId,
    pub title: String,
    pub description: String,
    pub creator_id: i64,
    #[serde(default)]
    pub level_id: Option<i64>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub publish: bool,
    #[serde(default)]
    pub skip_steps: Option<bool>,
    #[serde(default)]
    pub level: Option<Level>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Entity for TrainingSummary {
    type Id = TrainingId;

    fn id(&self) -> &TrainingId {
        &self.uuid
    }
}

/// Full training as returned by `GET /training/{uuid}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Training {
    pub uuid: TrainingId,
    pub title: String,
    pub description: String,
    pub creator_id: i64,
    #[serde(default)]
    pub level_id: Option<i64>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub publish: bool,
    #[serde(default)]
    pub skip_steps: Option<bool>,
    #[serde(default)]
    pub level: Option<Level>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Entity for Training {
    type Id = TrainingId;

    fn id(&self) -> &TrainingId {
        &self.uuid
    }
}

/// Payload for `POST /training/create_training`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTraining {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i32>,
    pub publish: bool,
    pub skip_steps: bool,
    pub steps: Vec<NewStep>,
    pub tag_ids: Vec<i64>,
}

impl NewTraining {
    /// Unpublished training with no steps or tags; steps may be skipped.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> DomainResult<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::validation("training title must not be empty"));
        }
        Ok(Self {
            title,
            description: description.into(),
            level_id: None,
            duration_minutes: None,
            publish: false,
            skip_steps: true,
            steps: Vec::new(),
            tag_ids: Vec::new(),
        })
    }

    pub fn with_level(mut self, level_id: i64) -> Self {
        self.level_id = Some(level_id);
        self
    }

    pub fn with_duration(mut self, minutes: i32) -> DomainResult<Self> {
        self.duration_minutes = Some(validate_duration(minutes)?);
        Ok(self)
    }

    pub fn with_tags(mut self, tag_ids: impl IntoIterator<Item = i64>) -> Self {
        self.tag_ids = tag_ids.into_iter().collect();
        self
    }

    pub fn with_steps(mut self, steps: Vec<NewStep>) -> Self {
        self.steps = steps;
        self
    }
}

/// Partial update for `PATCH /training/{uuid}`; absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<i64>>,
}

impl TrainingPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn publish(mut self, publish: bool) -> Self {
        self.publish = Some(publish);
        self
    }

    pub fn duration_minutes(mut self, minutes: i32) -> DomainResult<Self> {
        self.duration_minutes = Some(validate_duration(minutes)?);
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Payload for creating a step, optionally with nested sub-steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewStep {
    pub step_number: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_type_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_step_id: Option<StepId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<BTreeMap<String, i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<NewStep>,
}

/// Partial update for `PATCH /training/{uuid}/steps/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_type_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_step_id: Option<StepId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<BTreeMap<String, i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// New position of a step, used by `PATCH /training/{uuid}/steps/reorder`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOrder {
    pub id: StepId,
    pub step_number: i32,
}

impl StepOrder {
    /// Number the given steps 1..=n in the order provided.
    pub fn sequential<'a>(steps: impl IntoIterator<Item = &'a Step>) -> Vec<StepOrder> {
        steps
            .into_iter()
            .zip(1..)
            .map(|(step, step_number)| StepOrder {
                id: step.id,
                step_number,
            })
            .collect()
    }
}

/// Backend timestamps arrive either naive (`2025-03-01T10:15:00.123`) or with
/// an offset; offset forms are normalised to UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        if let Ok(with_offset) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(Some(with_offset.naive_utc()));
        }
        raw.parse::<NaiveDateTime>()
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

fn validate_duration(minutes: i32) -> DomainResult<i32> {
    if minutes < 0 {
        Err(DomainError::validation("duration_minutes must not be negative"))
    } else {
        Ok(minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn step(id: i64, step_number: i32) -> Step {
        Step {
            id: StepId::new(id),
            step_number,
            action_type_id: None,
            training_uuid: None,
            parent_step_id: None,
            area: None,
            meta: None,
            annotation: None,
            image_url: None,
            action_type: None,
        }
    }

    #[test]
    fn new_training_rejects_blank_title() {
        assert!(NewTraining::new("   ", "desc").is_err());
    }

    #[test]
    fn negative_duration_is_rejected() {
        let err = NewTraining::new("A", "").unwrap().with_duration(-1).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(TrainingPatch::default().duration_minutes(-5).is_err());
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = TrainingPatch::default().title("Renamed").publish(true);
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({ "title": "Renamed", "publish": true })
        );
        assert!(TrainingPatch::default().is_empty());
        assert!(!patch.is_empty());
    }

    #[test]
    fn training_decodes_backend_response() {
        let body = json!({
            "uuid": "0191b3c4-5d6e-7f80-9a1b-2c3d4e5f6071",
            "title": "Onboarding",
            "description": "First steps",
            "creator_id": 7,
            "created_at": "2025-03-01T10:15:00",
            "publish": false,
            "level": { "value": 1, "label": "Beginner" },
            "tags": [{ "value": 3, "label": "crm" }],
            "steps": [
                { "id": 11, "step_number": 1, "area": { "x": 10, "y": 20 }, "image_url": "s3://a.png" },
                { "id": 12, "step_number": 2, "action_type": { "id": 1, "type": "click" } }
            ]
        });

        let training: Training = serde_json::from_value(body).unwrap();
        assert_eq!(training.title, "Onboarding");
        assert_eq!(training.steps.len(), 2);
        assert_eq!(training.steps[0].area.as_ref().unwrap()["y"], 20);
        assert_eq!(
            training.steps[1].action_type.as_ref().unwrap().kind.as_deref(),
            Some("click")
        );
        assert_eq!(training.tags[0].label, "crm");
        assert_eq!(
            training.created_at.unwrap().to_string(),
            "2025-03-01 10:15:00"
        );
    }

    #[test]
    fn offset_timestamps_are_normalised_to_utc() {
        let body = json!({
            "uuid": "0191b3c4-5d6e-7f80-9a1b-2c3d4e5f6071",
            "title": "T",
            "description": "",
            "creator_id": 1,
            "created_at": "2025-03-01T12:15:00+02:00"
        });
        let summary: TrainingSummary = serde_json::from_value(body).unwrap();
        assert_eq!(summary.created_at.unwrap().to_string(), "2025-03-01 10:15:00");
        assert!(summary.tags.is_empty());
    }

    #[test]
    fn sequential_order_numbers_from_one() {
        let steps = vec![step(30, 3), step(10, 1), step(20, 2)];
        let order = StepOrder::sequential(&steps);
        assert_eq!(
            order,
            vec![
                StepOrder { id: StepId::new(30), step_number: 1 },
                StepOrder { id: StepId::new(10), step_number: 2 },
                StepOrder { id: StepId::new(20), step_number: 3 },
            ]
        );
    }
}
