//! Cart phase state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Phase of a shopping trip.
///
/// ```text
/// Planning ⇄ Shopping ⇄ Completed
/// ```
///
/// Completed carts can be reopened, so no phase is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
    #[default]
    Planning,
    Shopping,
    Completed,
}

impl CartStatus {
    pub fn is_planning(&self) -> bool {
        matches!(self, CartStatus::Planning)
    }

    pub fn is_shopping(&self) -> bool {
        matches!(self, CartStatus::Shopping)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, CartStatus::Completed)
    }

    /// True in phases where lines can be added or requantified.
    pub fn is_editable(&self) -> bool {
        !self.is_completed()
    }
}

impl StateMachine for CartStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use CartStatus::*;
        matches!(
            (self, target),
            (Planning, Shopping) | (Shopping, Planning) | (Shopping, Completed) | (Completed, Shopping)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use CartStatus::*;
        match self {
            Planning => vec![Shopping],
            Shopping => vec![Planning, Completed],
            Completed => vec![Shopping],
        }
    }
}

impl fmt::Display for CartStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CartStatus::Planning => "planning",
            CartStatus::Shopping => "shopping",
            CartStatus::Completed => "completed",
        };
        write!(f, "{}", s)
    }
}
