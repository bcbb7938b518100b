//! `stepwise-core` — client-side domain building blocks.
//!
//! Identifiers, the wire models exchanged with the training backend and the
//! two in-memory stores (session profile, editor workflow). No IO.

pub mod entity;
pub mod error;
pub mod id;
pub mod meta;
pub mod session;
pub mod training;
pub mod workflow;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{StepId, TrainingId};
pub use meta::{ActionType, Level, Tag};
pub use session::SessionState;
pub use training::{NewStep, NewTraining, Step, StepOrder, StepPatch, Training, TrainingPatch, TrainingSummary};
pub use workflow::WorkflowState;
