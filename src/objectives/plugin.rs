//! Objectives plugin wiring keep-alive messages and handlers.
use bevy::prelude::*;

use super::{
    config::ObjectivesConfig,
    events::{
        ObjectiveAssignedEvent, ObjectiveAssignmentResolvedEvent, ObjectiveProgressEvent,
        ObjectiveProgressRequestEvent,
    },
    systems::{assign_keep_alive_targets, report_keep_alive_progress},
};

pub struct ObjectivesPlugin {
    config: ObjectivesConfig,
}

impl ObjectivesPlugin {
    pub fn new(config: ObjectivesConfig) -> Self {
        Self { config }
    }
}

impl Default for ObjectivesPlugin {
    fn default() -> Self {
        Self::new(ObjectivesConfig::load_or_default())
    }
}

impl Plugin for ObjectivesPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .add_message::<ObjectiveAssignedEvent>()
            .add_message::<ObjectiveAssignmentResolvedEvent>()
            .add_message::<ObjectiveProgressRequestEvent>()
            .add_message::<ObjectiveProgressEvent>()
            .add_systems(Startup, log_objectives_config)
            .add_systems(
                Update,
                (assign_keep_alive_targets, report_keep_alive_progress).chain(),
            );
    }
}

fn log_objectives_config(config: Res<ObjectivesConfig>) {
    info!(
        "ObjectivesPlugin initialised with keep-alive title: \"{}\"",
        config.keep_alive.title
    );
}
