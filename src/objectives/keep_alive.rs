//! Keep-alive rules: choosing which fellow traitor to protect and scoring the result.
use std::collections::BTreeSet;

use bevy::prelude::Entity;
use rand::{seq::SliceRandom, Rng};

use super::{components::TargetObjective, errors::AssignmentError, target::target_of};
use crate::mind::MindLookup;

/// Picks an unclaimed candidate and stores it in the objective's target slot.
///
/// `candidates` are the other alive, connected traitors; `claimed` are the
/// targets the owner already protects through other objectives. The slot is
/// checked before anything else: a missing slot is `InvalidObjective`, a
/// filled one is `AlreadyAssigned` and stays untouched.
pub fn resolve_keep_alive_target<R: Rng + ?Sized>(
    objective: Entity,
    slot: Option<&mut TargetObjective>,
    candidates: impl IntoIterator<Item = Entity>,
    claimed: &BTreeSet<Entity>,
    rng: &mut R,
) -> Result<Entity, AssignmentError> {
    let Some(slot) = slot else {
        return Err(AssignmentError::InvalidObjective { objective });
    };
    if let Some(target) = slot.target() {
        return Err(AssignmentError::AlreadyAssigned { target });
    }

    let target = pick_unclaimed(candidates, claimed, rng)?;
    slot.set_target(target)?;
    Ok(target)
}

/// Uniform pick over `candidates` minus `claimed`.
pub fn pick_unclaimed<R: Rng + ?Sized>(
    candidates: impl IntoIterator<Item = Entity>,
    claimed: &BTreeSet<Entity>,
    rng: &mut R,
) -> Result<Entity, AssignmentError> {
    // Ordered set so a seeded rng always sees the same sequence.
    let pool: BTreeSet<Entity> = candidates.into_iter().collect();
    let eligible: Vec<Entity> = pool.difference(claimed).copied().collect();

    eligible
        .choose(rng)
        .copied()
        .ok_or(AssignmentError::NoEligibleCandidate)
}

/// Liveness of a keep-alive target at query time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetLiveness {
    /// The target no longer has a mind.
    Unresolvable,
    Alive,
    DeadIc,
}

/// Progress reported for a target: 1.0 once the target is dead in character.
pub fn progress_for(liveness: TargetLiveness) -> f32 {
    match liveness {
        TargetLiveness::Unresolvable | TargetLiveness::Alive => 0.0,
        TargetLiveness::DeadIc => 1.0,
    }
}

pub fn target_liveness(lookup: &MindLookup, target: Entity) -> TargetLiveness {
    match lookup.mind(target) {
        None => TargetLiveness::Unresolvable,
        Some(mind) if lookup.is_character_dead_ic(mind) => TargetLiveness::DeadIc,
        Some(_) => TargetLiveness::Alive,
    }
}

/// Progress of a keep-alive objective, or `None` when it has no target yet.
pub fn keep_alive_progress(slot: Option<&TargetObjective>, lookup: &MindLookup) -> Option<f32> {
    let target = target_of(slot)?;
    Some(progress_for(target_liveness(lookup, target)))
}
