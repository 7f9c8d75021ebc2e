//! Traitor objectives: keep-alive target assignment and progress.
pub mod components;
pub mod config;
pub mod errors;
pub mod events;
pub mod keep_alive;
pub mod plugin;
pub mod systems;
pub mod target;

pub use components::{
    KeepAliveCondition, ObjectiveCancelled, RandomTraitorAlive, RandomTraitorProgress,
    TargetObjective,
};
pub use config::ObjectivesConfig;
pub use errors::AssignmentError;
pub use events::{
    AssignmentOutcome, ObjectiveAssignedEvent, ObjectiveAssignmentResolvedEvent,
    ObjectiveProgressEvent, ObjectiveProgressRequestEvent,
};
pub use plugin::ObjectivesPlugin;
