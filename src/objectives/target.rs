//! Shared target lookups used by both the resolver and the progress handler.
use std::collections::BTreeSet;

use bevy::prelude::*;

use super::components::TargetObjective;
use crate::mind::Mind;

/// Snapshot of an objective a mind already holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldObjective {
    /// Counts towards the one-protector-per-target rule.
    pub keep_alive_style: bool,
    pub target: Option<Entity>,
}

/// Target stored on an objective, if it has a slot and the slot is set.
pub fn target_of(slot: Option<&TargetObjective>) -> Option<Entity> {
    slot.and_then(TargetObjective::target)
}

/// Targets already protected by the given objectives.
pub fn claimed_targets(held: impl IntoIterator<Item = HeldObjective>) -> BTreeSet<Entity> {
    held.into_iter()
        .filter(|objective| objective.keep_alive_style)
        .filter_map(|objective| objective.target)
        .collect()
}

/// Renders an objective title naming the protected character.
pub fn render_title(template: &str, target: &Mind, unknown_job: &str) -> String {
    let job = target.job.as_deref().unwrap_or(unknown_job);
    template
        .replace("{target}", &target.character_name)
        .replace("{job}", job)
}
