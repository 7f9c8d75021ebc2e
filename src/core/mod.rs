//! Core wiring shared by every gameplay module.
pub mod plugin;

pub use plugin::{CorePlugin, ObjectiveRng};
