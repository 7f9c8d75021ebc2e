//! Read-only access to minds: the traitor registry and the liveness oracle.
use bevy::{ecs::system::SystemParam, prelude::*};

use super::components::{DeadIcOverride, Mind, MobState, TraitorRole};

/// Resolves minds, their bodies and their in-character liveness.
#[derive(SystemParam)]
pub struct MindLookup<'w, 's> {
    minds: Query<'w, 's, (Entity, &'static Mind, Has<TraitorRole>)>,
    mobs: Query<'w, 's, &'static MobState>,
    overrides: Query<'w, 's, &'static DeadIcOverride>,
}

impl MindLookup<'_, '_> {
    pub fn mind(&self, entity: Entity) -> Option<&Mind> {
        self.minds.get(entity).ok().map(|(_, mind, _)| mind)
    }

    /// Whether the character behind `mind` is dead in character.
    ///
    /// A mind without a body counts as dead. An explicit override on the body
    /// wins over its mob state. A body without a mob state (a bare brain, a
    /// gibbed remnant) is physically dead.
    pub fn is_character_dead_ic(&self, mind: &Mind) -> bool {
        let Some(body) = mind.owned_entity else {
            return true;
        };

        if let Ok(DeadIcOverride(dead)) = self.overrides.get(body) {
            return *dead;
        }

        !matches!(self.mobs.get(body), Ok(state) if *state != MobState::Dead)
    }

    /// Traitor minds other than `owner` that are connected and alive, as `(mind, body)` pairs.
    pub fn other_alive_connected_traitors(&self, owner: Entity) -> Vec<(Entity, Entity)> {
        self.minds
            .iter()
            .filter(|(entity, _, is_traitor)| *is_traitor && *entity != owner)
            .filter(|(_, mind, _)| mind.is_connected())
            .filter(|(_, mind, _)| !self.is_character_dead_ic(mind))
            .filter_map(|(entity, mind, _)| mind.owned_entity.map(|body| (entity, body)))
            .collect()
    }
}
