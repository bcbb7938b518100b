//! State of the training editor: the training being edited, its ordered steps
//! and the step currently shown.

use crate::entity::Entity;
use crate::id::StepId;
use crate::training::{Step, Training};

/// Editing workflow state.
///
/// Step order is display and navigation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowState {
    training_data: Option<Training>,
    steps: Vec<Step>,
    selected_step: Option<Step>,
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn training_data(&self) -> Option<&Training> {
        self.training_data.as_ref()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn selected_step(&self) -> Option<&Step> {
        self.selected_step.as_ref()
    }

    /// Load a training into the editor; its steps replace the current list.
    pub fn set_training_data(&mut self, training: Training) {
        let steps = training.steps.clone();
        self.training_data = Some(training);
        self.set_steps(steps);
    }

    /// Replace the step list. A non-empty list selects its first step; an
    /// empty list keeps the previous selection.
    pub fn set_steps(&mut self, steps: Vec<Step>) {
        self.steps = steps;
        if let Some(first) = self.steps.first() {
            self.selected_step = Some(first.clone());
        }
    }

    pub fn add_step(&mut self, step: Step) {
        tracing::debug!(step_id = %step.id, "step appended to workflow");
        self.steps.push(step);
    }

    pub fn select_step(&mut self, step: Step) {
        self.selected_step = Some(step);
    }

    /// Select the step with the given id, if it is part of the list.
    pub fn select_step_by_id(&mut self, id: &StepId) -> bool {
        match self.steps.iter().find(|s| s.id() == id) {
            Some(step) => {
                self.selected_step = Some(step.clone());
                true
            }
            None => false,
        }
    }

    /// Position of the selected step within the list.
    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected_step.as_ref()?;
        self.steps.iter().position(|s| s.id() == selected.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::TrainingId;
    use proptest::prelude::*;

    fn step(id: i64) -> Step {
        Step {
            id: StepId::new(id),
            step_number: id as i32,
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

    fn training(steps: Vec<Step>) -> Training {
        Training {
            uuid: TrainingId::new(),
            title: "T".into(),
            description: String::new(),
            creator_id: 1,
            level_id: None,
            duration_minutes: None,
            created_at: None,
            publish: false,
            skip_steps: None,
            level: None,
            tags: Vec::new(),
            steps,
        }
    }

    #[test]
    fn set_training_data_selects_first_step() {
        let mut state = WorkflowState::new();
        state.set_training_data(training(vec![step(5), step(6)]));

        assert_eq!(state.steps().len(), 2);
        assert_eq!(state.selected_step().map(|s| s.id), Some(StepId::new(5)));
        assert_eq!(state.training_data().unwrap().title, "T");
    }

    #[test]
    fn empty_steps_keep_previous_selection() {
        let mut state = WorkflowState::new();
        state.set_steps(vec![step(1), step(2)]);
        state.select_step(step(2));

        state.set_steps(Vec::new());

        assert!(state.steps().is_empty());
        assert_eq!(state.selected_step().map(|s| s.id), Some(StepId::new(2)));
        assert_eq!(state.selected_index(), None);
    }

    #[test]
    fn add_step_appends_without_changing_selection() {
        let mut state = WorkflowState::new();
        state.set_steps(vec![step(1)]);
        state.add_step(step(2));

        let ids: Vec<_> = state.steps().iter().map(|s| s.id.get()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(state.selected_index(), Some(0));
    }

    #[test]
    fn select_step_by_id_only_accepts_known_steps() {
        let mut state = WorkflowState::new();
        state.set_steps(vec![step(1), step(2), step(3)]);

        assert!(state.select_step_by_id(&StepId::new(3)));
        assert_eq!(state.selected_index(), Some(2));
        assert!(!state.select_step_by_id(&StepId::new(99)));
        assert_eq!(state.selected_index(), Some(2));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: replacing the step list with a non-empty list always
        /// selects its first element, whatever was selected before.
        #[test]
        fn non_empty_steps_select_first(
            before in prop::collection::vec(0i64..1000, 0..5),
            after in prop::collection::vec(0i64..1000, 1..10),
        ) {
            let mut state = WorkflowState::new();
            state.set_steps(before.into_iter().map(step).collect());
            state.set_steps(after.iter().copied().map(step).collect());

            prop_assert_eq!(state.selected_step().map(|s| s.id.get()), Some(after[0]));
        }
    }
}
