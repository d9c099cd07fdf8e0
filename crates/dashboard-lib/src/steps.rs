//! Walkthrough step board
//!
//! Holds the six steps shown on the dashboard, their statuses, and the
//! "you are here" marker. The server is trusted for statuses but not for
//! consistency: updates are normalized so at most one step is `current`,
//! and the marker always sits on that step alone.

use crate::models::{Step, StepStatus};
use serde::Serialize;

/// Number of steps in the walkthrough
pub const LAST_STEP: u32 = 6;

/// Default step titles, replaced by server names when provided
pub const STEP_TITLES: [&str; LAST_STEP as usize] = [
    "Deploy ROKS Cluster",
    "Dashboard Overview",
    "Deploy Demo App",
    "Add Persistence",
    "Resource Limits & Scaling",
    "Health Probes",
];

/// One step element on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub id: u32,
    pub name: String,
    pub status: StepStatus,
    /// Whether the "you are here" indicator is attached
    pub marker: bool,
}

/// Arrow between two adjacent steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorState {
    Disabled,
    Active,
}

impl ConnectorState {
    pub fn glyph(&self) -> &'static str {
        match self {
            ConnectorState::Disabled => "⊘",
            ConnectorState::Active => "→",
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            ConnectorState::Disabled => "connector disabled",
            ConnectorState::Active => "connector",
        }
    }
}

/// Connectors gated by the local step-4 toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Connectors {
    pub four_to_five: ConnectorState,
    pub five_to_six: ConnectorState,
}

impl Default for Connectors {
    fn default() -> Self {
        Self::uniform(ConnectorState::Disabled)
    }
}

impl Connectors {
    pub fn uniform(state: ConnectorState) -> Self {
        Self {
            four_to_five: state,
            five_to_six: state,
        }
    }
}

/// The ordered set of step elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepBoard {
    steps: Vec<StepView>,
}

impl Default for StepBoard {
    fn default() -> Self {
        Self::new(1)
    }
}

impl StepBoard {
    /// Board with every step before `current` completed
    pub fn new(current: u32) -> Self {
        let steps = (1..=LAST_STEP)
            .map(|id| {
                let status = match id.cmp(&current) {
                    std::cmp::Ordering::Less => StepStatus::Completed,
                    std::cmp::Ordering::Equal => StepStatus::Current,
                    std::cmp::Ordering::Greater => StepStatus::Pending,
                };
                StepView {
                    id,
                    name: STEP_TITLES[(id - 1) as usize].to_string(),
                    status,
                    marker: status == StepStatus::Current,
                }
            })
            .collect();
        Self { steps }
    }

    pub fn steps(&self) -> &[StepView] {
        &self.steps
    }

    pub fn get(&self, id: u32) -> Option<&StepView> {
        self.steps.iter().find(|s| s.id == id)
    }

    pub fn status(&self, id: u32) -> Option<StepStatus> {
        self.get(id).map(|s| s.status)
    }

    pub fn completed_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.status == StepStatus::Completed)
            .count()
    }

    pub fn marker_count(&self) -> usize {
        self.steps.iter().filter(|s| s.marker).count()
    }

    /// Apply a server step list, then normalize and move the marker
    pub fn apply(&mut self, current_step: u32, update: &[Step]) {
        for step in normalize(current_step, update) {
            if let Some(view) = self.steps.iter_mut().find(|v| v.id == step.id) {
                view.status = step.status;
                if !step.name.is_empty() {
                    view.name = step.name;
                }
            }
        }
        self.demote_extra_current(current_step);
        self.relocate_marker();
    }

    /// Set one step's status without consulting the server
    pub fn set_status(&mut self, id: u32, status: StepStatus) {
        if let Some(view) = self.steps.iter_mut().find(|v| v.id == id) {
            view.status = status;
        }
        self.relocate_marker();
    }

    /// Keep `current_step` as the only `current` step after local edits
    pub fn settle_current(&mut self, current_step: u32) {
        self.demote_extra_current(current_step);
        self.relocate_marker();
    }

    /// Drop every stale marker, then attach one to the current step
    fn relocate_marker(&mut self) {
        for view in &mut self.steps {
            view.marker = false;
        }
        if let Some(view) = self
            .steps
            .iter_mut()
            .find(|v| v.status == StepStatus::Current)
        {
            view.marker = true;
        }
    }

    /// Steps the update did not mention may still claim `current`
    fn demote_extra_current(&mut self, current_step: u32) {
        let keep = self
            .steps
            .iter()
            .filter(|v| v.status == StepStatus::Current)
            .map(|v| v.id)
            .find(|id| *id == current_step)
            .or_else(|| {
                self.steps
                    .iter()
                    .find(|v| v.status == StepStatus::Current)
                    .map(|v| v.id)
            });

        for view in &mut self.steps {
            if view.status == StepStatus::Current && Some(view.id) != keep {
                view.status = StepStatus::Pending;
            }
        }
    }
}

/// Clean up a server step list
///
/// - ids outside `1..=LAST_STEP` are dropped
/// - when several steps are `current`, the one matching `current_step`
///   wins (else the lowest id) and the rest become `pending`
/// - when none is `current`, the step named by `current_step` is promoted
///   unless it is already completed
pub fn normalize(current_step: u32, steps: &[Step]) -> Vec<Step> {
    let mut steps: Vec<Step> = steps
        .iter()
        .filter(|s| (1..=LAST_STEP).contains(&s.id))
        .cloned()
        .collect();
    steps.sort_by_key(|s| s.id);
    steps.dedup_by_key(|s| s.id);

    let currents: Vec<u32> = steps
        .iter()
        .filter(|s| s.status == StepStatus::Current)
        .map(|s| s.id)
        .collect();

    match currents.as_slice() {
        [] => {
            if let Some(step) = steps
                .iter_mut()
                .find(|s| s.id == current_step && s.status != StepStatus::Completed)
            {
                step.status = StepStatus::Current;
            }
        }
        [_] => {}
        many => {
            let keep = if many.contains(&current_step) {
                current_step
            } else {
                many[0]
            };
            for step in steps.iter_mut() {
                if step.status == StepStatus::Current && step.id != keep {
                    step.status = StepStatus::Pending;
                }
            }
        }
    }

    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(id: u32, status: StepStatus) -> Step {
        Step {
            id,
            name: String::new(),
            status,
        }
    }

    #[test]
    fn test_new_board_marks_only_current() {
        let board = StepBoard::new(3);

        assert_eq!(board.completed_count(), 2);
        assert_eq!(board.status(3), Some(StepStatus::Current));
        assert_eq!(board.status(4), Some(StepStatus::Pending));
        assert_eq!(board.marker_count(), 1);
        assert!(board.get(3).unwrap().marker);
    }

    #[test]
    fn test_apply_moves_marker() {
        let mut board = StepBoard::new(3);
        board.apply(
            4,
            &[
                step(3, StepStatus::Completed),
                step(4, StepStatus::Current),
            ],
        );

        assert!(!board.get(3).unwrap().marker);
        assert!(board.get(4).unwrap().marker);
        assert_eq!(board.marker_count(), 1);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let update = vec![
            step(1, StepStatus::Completed),
            step(2, StepStatus::Current),
            step(3, StepStatus::Pending),
        ];
        let mut board = StepBoard::new(5);
        board.apply(2, &update);
        let once = board.clone();
        board.apply(2, &update);

        assert_eq!(board, once);
        assert_eq!(board.marker_count(), 1);
    }

    #[test]
    fn test_exactly_one_marker_for_any_update() {
        let payloads: Vec<(u32, Vec<Step>)> = vec![
            (2, vec![step(2, StepStatus::Current), step(5, StepStatus::Current)]),
            (5, vec![step(2, StepStatus::Current), step(5, StepStatus::Current)]),
            (3, vec![step(3, StepStatus::Pending)]),
            (6, (1..=6).map(|id| step(id, StepStatus::Current)).collect()),
            (4, vec![step(9, StepStatus::Current), step(4, StepStatus::Current)]),
        ];

        for (current, update) in payloads {
            let mut board = StepBoard::new(1);
            board.apply(current, &update);
            assert_eq!(board.marker_count(), 1, "payload for step {current}");
            let marked = board.steps().iter().find(|s| s.marker).unwrap();
            assert_eq!(marked.status, StepStatus::Current);
        }
    }

    #[test]
    fn test_untouched_current_step_is_demoted() {
        // Board thinks step 1 is current; server only reports step 4
        let mut board = StepBoard::new(1);
        board.apply(4, &[step(4, StepStatus::Current)]);

        assert_eq!(board.status(1), Some(StepStatus::Pending));
        assert_eq!(board.status(4), Some(StepStatus::Current));
        assert_eq!(board.marker_count(), 1);
    }

    #[test]
    fn test_normalize_prefers_reported_current_step() {
        let steps = normalize(
            5,
            &[step(2, StepStatus::Current), step(5, StepStatus::Current)],
        );

        assert_eq!(steps[0].status, StepStatus::Pending);
        assert_eq!(steps[1].status, StepStatus::Current);
    }

    #[test]
    fn test_normalize_promotes_missing_current() {
        let steps = normalize(
            3,
            &[step(2, StepStatus::Completed), step(3, StepStatus::Pending)],
        );
        assert_eq!(steps[1].status, StepStatus::Current);

        let finished = normalize(6, &[step(6, StepStatus::Completed)]);
        assert_eq!(finished[0].status, StepStatus::Completed);
    }

    #[test]
    fn test_normalize_drops_out_of_range_and_duplicates() {
        let steps = normalize(
            1,
            &[
                step(0, StepStatus::Completed),
                step(1, StepStatus::Current),
                step(1, StepStatus::Completed),
                step(7, StepStatus::Pending),
            ],
        );

        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].id, 1);
    }

    #[test]
    fn test_server_names_replace_defaults() {
        let mut board = StepBoard::new(1);
        board.apply(
            6,
            &[Step {
                id: 6,
                name: "Profit!".to_string(),
                status: StepStatus::Current,
            }],
        );

        assert_eq!(board.get(6).unwrap().name, "Profit!");
        assert_eq!(board.get(5).unwrap().name, "Resource Limits & Scaling");
    }

    #[test]
    fn test_connector_rendering_attributes() {
        assert_eq!(ConnectorState::Disabled.glyph(), "⊘");
        assert_eq!(ConnectorState::Disabled.class(), "connector disabled");
        assert_eq!(ConnectorState::Active.glyph(), "→");
        assert_eq!(Connectors::default(), Connectors::uniform(ConnectorState::Disabled));
    }
}
