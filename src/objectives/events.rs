//! Messages exchanged with the host's objective pipeline.
use bevy::prelude::{Entity, Event, Message};

use super::errors::AssignmentError;

/// The host attached `objective` to `mind` and wants it resolved.
#[derive(Event, Message, Debug, Clone, Copy)]
pub struct ObjectiveAssignedEvent {
    pub mind: Entity,
    pub objective: Entity,
}

/// Result of resolving a random keep-alive objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOutcome {
    Assigned(Entity),
    Cancelled(AssignmentError),
}

#[derive(Event, Message, Debug, Clone, Copy)]
pub struct ObjectiveAssignmentResolvedEvent {
    pub mind: Entity,
    pub objective: Entity,
    pub outcome: AssignmentOutcome,
}

/// Asks for the current progress of `objective`.
#[derive(Event, Message, Debug, Clone, Copy)]
pub struct ObjectiveProgressRequestEvent {
    pub objective: Entity,
}

/// Progress in `0.0..=1.0`; only sent for objectives that have a target.
#[derive(Event, Message, Debug, Clone, Copy)]
pub struct ObjectiveProgressEvent {
    pub objective: Entity,
    pub progress: f32,
}
