//! Client-side application state
//!
//! Everything the page displays lives here: the current step, the step
//! board, the step-4 connectors, the celebration flag, and the markup
//! last painted into each panel. Renderers read it; the controller is the
//! only writer.

use crate::models::{StatusResponse, StepStatus};
use crate::steps::{ConnectorState, Connectors, StepBoard};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Step the walkthrough starts on before the first status poll
pub const INITIAL_STEP: u32 = 3;

/// Named display regions of the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Panel {
    AppStatus,
    PersistenceStatus,
    MetricsDisplay,
    LoadTestStatus,
    HealthStatus,
    ProbeConfigStatus,
}

impl Panel {
    pub const ALL: [Panel; 6] = [
        Panel::AppStatus,
        Panel::PersistenceStatus,
        Panel::MetricsDisplay,
        Panel::LoadTestStatus,
        Panel::HealthStatus,
        Panel::ProbeConfigStatus,
    ];

    /// Element id on the page
    pub fn id(&self) -> &'static str {
        match self {
            Panel::AppStatus => "app-status",
            Panel::PersistenceStatus => "persistence-status",
            Panel::MetricsDisplay => "metrics-display",
            Panel::LoadTestStatus => "load-test-status",
            Panel::HealthStatus => "health-status",
            Panel::ProbeConfigStatus => "probe-config-status",
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Panel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Panel::ALL
            .iter()
            .copied()
            .find(|p| p.id() == s)
            .ok_or_else(|| format!("unknown panel `{}`", s))
    }
}

/// Snapshot of everything on screen
#[derive(Debug, Clone, Serialize)]
pub struct AppState {
    pub current_step: u32,
    pub board: StepBoard,
    pub connectors: Connectors,
    /// Value of the "step 4 complete" checkbox
    pub step4_checked: bool,
    /// Whether the celebration animation class is applied
    pub celebrating: bool,
    panels: BTreeMap<Panel, String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            current_step: INITIAL_STEP,
            board: StepBoard::new(INITIAL_STEP),
            connectors: Connectors::default(),
            step4_checked: false,
            celebrating: false,
            panels: BTreeMap::new(),
        }
    }
}

impl AppState {
    /// Markup currently shown in a panel
    pub fn panel(&self, panel: Panel) -> &str {
        self.panels.get(&panel).map(String::as_str).unwrap_or("")
    }

    /// Replace a panel's markup
    pub fn set_panel(&mut self, panel: Panel, markup: impl Into<String>) {
        self.panels.insert(panel, markup.into());
    }

    /// Take a successful status poll into account
    pub fn apply_status(&mut self, status: &StatusResponse) {
        self.current_step = status.current_step;
        self.board.apply(status.current_step, &status.steps);
    }

    /// Local-only step 4 completion toggle; never confirmed with the server
    ///
    /// Checking only advances when step 4 is current. Unchecking always
    /// resets to step 4 current with both connectors disabled.
    pub fn toggle_step4(&mut self, checked: bool) {
        self.step4_checked = checked;

        if checked {
            if self.current_step == 4 {
                self.connectors = Connectors::uniform(ConnectorState::Active);
                self.current_step = 5;
                self.board.set_status(4, StepStatus::Completed);
                self.board.set_status(5, StepStatus::Current);
            }
        } else {
            self.connectors = Connectors::uniform(ConnectorState::Disabled);
            self.current_step = 4;
            self.board.set_status(4, StepStatus::Current);
            self.board.set_status(5, StepStatus::Pending);
        }
        self.board.settle_current(self.current_step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeploymentInfo, Step};

    fn at_step_four() -> AppState {
        let mut state = AppState::default();
        state.apply_status(&StatusResponse {
            current_step: 4,
            steps: vec![
                Step {
                    id: 3,
                    name: String::new(),
                    status: StepStatus::Completed,
                },
                Step {
                    id: 4,
                    name: String::new(),
                    status: StepStatus::Current,
                },
                Step {
                    id: 5,
                    name: String::new(),
                    status: StepStatus::Pending,
                },
            ],
            deployment_info: DeploymentInfo::default(),
        });
        state
    }

    #[test]
    fn test_default_state() {
        let state = AppState::default();
        assert_eq!(state.current_step, INITIAL_STEP);
        assert_eq!(state.panel(Panel::AppStatus), "");
        assert!(!state.celebrating);
    }

    #[test]
    fn test_panel_ids_round_trip() {
        for panel in Panel::ALL {
            assert_eq!(panel.id().parse::<Panel>().unwrap(), panel);
        }
        assert!("sidebar".parse::<Panel>().is_err());
    }

    #[test]
    fn test_toggle_step4_advances_locally() {
        let mut state = at_step_four();
        state.toggle_step4(true);

        assert_eq!(state.current_step, 5);
        assert_eq!(state.board.status(4), Some(StepStatus::Completed));
        assert_eq!(state.board.status(5), Some(StepStatus::Current));
        assert_eq!(state.connectors, Connectors::uniform(ConnectorState::Active));
        assert!(state.board.get(5).unwrap().marker);
    }

    #[test]
    fn test_toggle_step4_round_trip_restores_state() {
        let mut state = at_step_four();
        let before_board = state.board.clone();
        let before_connectors = state.connectors;

        state.toggle_step4(true);
        state.toggle_step4(false);

        assert_eq!(state.current_step, 4);
        assert_eq!(state.board.status(4), Some(StepStatus::Current));
        assert_eq!(state.board.status(5), Some(StepStatus::Pending));
        assert_eq!(state.connectors, before_connectors);
        assert_eq!(state.board, before_board);
    }

    #[test]
    fn test_unchecking_step4_past_it_leaves_one_current() {
        let mut state = AppState::default();
        state.apply_status(&StatusResponse {
            current_step: 6,
            steps: (1..=6)
                .map(|id| Step {
                    id,
                    name: String::new(),
                    status: if id < 6 {
                        StepStatus::Completed
                    } else {
                        StepStatus::Current
                    },
                })
                .collect(),
            deployment_info: DeploymentInfo::default(),
        });

        state.toggle_step4(true);
        state.toggle_step4(false);

        let currents: Vec<u32> = state
            .board
            .steps()
            .iter()
            .filter(|s| s.status == StepStatus::Current)
            .map(|s| s.id)
            .collect();
        let marked: Vec<u32> = state
            .board
            .steps()
            .iter()
            .filter(|s| s.marker)
            .map(|s| s.id)
            .collect();
        assert_eq!(state.current_step, 4);
        assert_eq!(currents, vec![4]);
        assert_eq!(marked, vec![4]);
    }

    #[test]
    fn test_toggle_step4_checked_elsewhere_does_nothing() {
        let mut state = AppState::default();
        let before = state.board.clone();

        state.toggle_step4(true);

        assert_eq!(state.current_step, INITIAL_STEP);
        assert_eq!(state.board, before);
        assert_eq!(state.connectors, Connectors::default());
        assert!(state.step4_checked);
    }
}
