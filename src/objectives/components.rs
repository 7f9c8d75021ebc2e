//! Objective kind markers and the single-target storage slot.
use bevy::prelude::*;

use super::errors::AssignmentError;

/// Progress tracks whether the target is still alive.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct KeepAliveCondition;

/// Picks a random fellow traitor as the target when assigned.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct RandomTraitorAlive;

/// Sibling "help a fellow traitor" objective; its target counts as claimed too.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct RandomTraitorProgress;

/// Single target reference held by an objective.
#[derive(Component, Debug, Default, Clone)]
pub struct TargetObjective {
    target: Option<Entity>,
    /// Title template overriding the configured default. Supports `{target}` and `{job}`.
    pub title: Option<String>,
}

impl TargetObjective {
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            target: None,
            title: Some(title.into()),
        }
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    /// Stores `target`. The slot is write-once; an existing target is kept.
    pub fn set_target(&mut self, target: Entity) -> Result<(), AssignmentError> {
        if let Some(existing) = self.target {
            return Err(AssignmentError::AlreadyAssigned { target: existing });
        }
        self.target = Some(target);
        Ok(())
    }
}

/// Added to an objective whose assignment was refused; the host discards it.
#[derive(Component, Debug, Clone)]
pub struct ObjectiveCancelled {
    pub reason: AssignmentError,
}
