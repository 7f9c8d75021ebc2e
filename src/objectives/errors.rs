//! Error types surfaced while assigning objective targets.
use std::fmt;

use bevy::prelude::Entity;

/// Why an objective could not receive a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentError {
    /// The objective has no target slot (or no longer exists).
    InvalidObjective { objective: Entity },
    /// The owning entity carries no mind.
    MissingMind { mind: Entity },
    /// Every candidate is already claimed, or the owner is the only traitor.
    NoEligibleCandidate,
    /// The objective already holds a target; it is never overwritten.
    AlreadyAssigned { target: Entity },
    /// The objective was already cancelled; cancellation is terminal.
    AlreadyCancelled { objective: Entity },
}

impl AssignmentError {
    /// Whether the objective should be cancelled and discarded.
    pub fn cancels_objective(&self) -> bool {
        !matches!(
            self,
            Self::AlreadyAssigned { .. } | Self::AlreadyCancelled { .. }
        )
    }
}

impl fmt::Display for AssignmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidObjective { objective } => {
                write!(f, "Objective {} has no target slot", objective)
            }
            Self::MissingMind { mind } => write!(f, "Entity {} has no mind", mind),
            Self::NoEligibleCandidate => write!(f, "No eligible traitor left to protect"),
            Self::AlreadyAssigned { target } => {
                write!(f, "Objective already targets {}", target)
            }
            Self::AlreadyCancelled { objective } => {
                write!(f, "Objective {} was already cancelled", objective)
            }
        }
    }
}

impl std::error::Error for AssignmentError {}
