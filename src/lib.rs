//! Keep-alive traitor objectives as a Bevy plugin.
//!
//! Hosts spawn minds and objective entities, then drive the plugin with
//! [`objectives::ObjectiveAssignedEvent`] and
//! [`objectives::ObjectiveProgressRequestEvent`] messages.
pub mod core;
pub mod mind;
pub mod objectives;

pub use crate::{core::CorePlugin, objectives::ObjectivesPlugin};
