//! Reference data attached to trainings: tags, difficulty levels and step actions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A tag as listed by `GET /tags/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub value: i64,
    pub label: String,
}

/// A difficulty level as listed by `GET /levels/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub value: i64,
    pub label: String,
}

/// The interaction a step asks for (click, text input, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionType {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub meta: Option<Map<String, Value>>,
}
