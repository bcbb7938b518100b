//! Identity of backend records (trainings, steps).

/// A record the backend identifies by a stable id, independent of its
/// other fields: two steps with the same id are the same step, even when
/// one copy carries stale annotations.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}
