use std::collections::HashSet;

use bevy::{ecs::query::QueryData, prelude::*};

use crate::{core::ObjectiveRng, mind::MindLookup};

use super::{
    components::{
        KeepAliveCondition, ObjectiveCancelled, RandomTraitorAlive, RandomTraitorProgress,
        TargetObjective,
    },
    config::ObjectivesConfig,
    errors::AssignmentError,
    events::{
        AssignmentOutcome, ObjectiveAssignedEvent, ObjectiveAssignmentResolvedEvent,
        ObjectiveProgressEvent, ObjectiveProgressRequestEvent,
    },
    keep_alive::{keep_alive_progress, resolve_keep_alive_target},
    target::{claimed_targets, render_title, target_of, HeldObjective},
};

/// Target slot and kind markers of an objective.
#[derive(QueryData)]
#[query_data(mutable)]
pub struct ObjectiveSlot {
    slot: Option<&'static mut TargetObjective>,
    random_alive: Has<RandomTraitorAlive>,
    keep_alive: Has<KeepAliveCondition>,
    random_progress: Has<RandomTraitorProgress>,
    cancelled: Has<ObjectiveCancelled>,
}

/// Resolves a protection target for every newly assigned random keep-alive objective.
pub fn assign_keep_alive_targets(
    mut commands: Commands,
    mut assigned: MessageReader<ObjectiveAssignedEvent>,
    mut resolved: MessageWriter<ObjectiveAssignmentResolvedEvent>,
    mut objectives: Query<ObjectiveSlot>,
    minds: MindLookup,
    config: Res<ObjectivesConfig>,
    mut rng: ResMut<ObjectiveRng>,
) {
    // `ObjectiveCancelled` is inserted through commands, so cancellations from
    // this frame are not visible to the query yet.
    let mut cancelled_this_frame = HashSet::new();

    for event in assigned.read() {
        let Ok(objective) = objectives.get(event.objective) else {
            continue;
        };
        if !objective.random_alive {
            continue;
        }
        let already_cancelled =
            objective.cancelled || cancelled_this_frame.contains(&event.objective);

        let owner_label = minds
            .mind(event.mind)
            .map(|mind| format!("{} ({})", mind.character_name, mind.id))
            .unwrap_or_else(|| event.mind.to_string());

        let result = if already_cancelled {
            Err(AssignmentError::AlreadyCancelled {
                objective: event.objective,
            })
        } else {
            resolve_assignment(event, &mut objectives, &minds, rng.rng_mut())
        };

        match result {
            Ok(target) => {
                let Ok(objective) = objectives.get(event.objective) else {
                    continue;
                };
                let template = objective
                    .slot
                    .and_then(|slot| slot.title.as_deref())
                    .unwrap_or(config.keep_alive.title.as_str());

                if let Some(target_mind) = minds.mind(target) {
                    let title = render_title(template, target_mind, &config.keep_alive.unknown_job);
                    info!(
                        "{} must keep {} ({}) alive: {}",
                        owner_label, target_mind.character_name, target_mind.id, title
                    );
                    commands.entity(event.objective).insert(Name::new(title));
                }

                resolved.write(ObjectiveAssignmentResolvedEvent {
                    mind: event.mind,
                    objective: event.objective,
                    outcome: AssignmentOutcome::Assigned(target),
                });
            }
            Err(reason) if reason.cancels_objective() => {
                warn!(
                    "Cancelling keep-alive objective {} for {}: {}",
                    event.objective, owner_label, reason
                );
                cancelled_this_frame.insert(event.objective);
                commands
                    .entity(event.objective)
                    .insert(ObjectiveCancelled { reason });
                resolved.write(ObjectiveAssignmentResolvedEvent {
                    mind: event.mind,
                    objective: event.objective,
                    outcome: AssignmentOutcome::Cancelled(reason),
                });
            }
            Err(reason) => {
                error!(
                    "Rejected repeated assignment of keep-alive objective {} for {}: {}",
                    event.objective, owner_label, reason
                );
            }
        }
    }
}

fn resolve_assignment(
    event: &ObjectiveAssignedEvent,
    objectives: &mut Query<ObjectiveSlot>,
    minds: &MindLookup,
    rng: &mut impl rand::Rng,
) -> Result<Entity, AssignmentError> {
    let invalid = AssignmentError::InvalidObjective {
        objective: event.objective,
    };
    if !matches!(objectives.get(event.objective), Ok(objective) if objective.slot.is_some()) {
        return Err(invalid);
    }

    let owner = minds
        .mind(event.mind)
        .ok_or(AssignmentError::MissingMind { mind: event.mind })?;

    let claimed = claimed_targets(
        owner
            .objectives
            .iter()
            .filter_map(|objective| objectives.get(*objective).ok())
            .map(|held| HeldObjective {
                keep_alive_style: held.random_alive || held.keep_alive || held.random_progress,
                target: target_of(held.slot),
            }),
    );
    let candidates = minds
        .other_alive_connected_traitors(event.mind)
        .into_iter()
        .map(|(mind, _body)| mind);

    let mut objective = objectives.get_mut(event.objective).map_err(|_| invalid)?;
    resolve_keep_alive_target(
        event.objective,
        objective.slot.as_deref_mut(),
        candidates,
        &claimed,
        rng,
    )
}

/// Answers progress requests for keep-alive objectives that already have a target.
pub fn report_keep_alive_progress(
    mut requests: MessageReader<ObjectiveProgressRequestEvent>,
    objectives: Query<Option<&TargetObjective>, With<KeepAliveCondition>>,
    minds: MindLookup,
    mut reports: MessageWriter<ObjectiveProgressEvent>,
) {
    for request in requests.read() {
        let Ok(slot) = objectives.get(request.objective) else {
            continue;
        };

        match keep_alive_progress(slot, &minds) {
            Some(progress) => {
                debug!(
                    "Keep-alive objective {} progress {:.1}",
                    request.objective, progress
                );
                reports.write(ObjectiveProgressEvent {
                    objective: request.objective,
                    progress,
                });
            }
            None => debug!(
                "Keep-alive objective {} has no target yet; skipping progress",
                request.objective
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mind::{DeadIcOverride, Mind, MindId, MobState, TraitorRole};

    #[derive(Resource, Default)]
    struct Collected {
        resolved: Vec<ObjectiveAssignmentResolvedEvent>,
        progress: Vec<ObjectiveProgressEvent>,
    }

    fn collect(
        mut resolved: MessageReader<ObjectiveAssignmentResolvedEvent>,
        mut progress: MessageReader<ObjectiveProgressEvent>,
        mut collected: ResMut<Collected>,
    ) {
        collected.resolved.extend(resolved.read().copied());
        collected.progress.extend(progress.read().copied());
    }

    fn test_app(seed: u64) -> App {
        let mut app = App::new();
        app.add_message::<ObjectiveAssignedEvent>()
            .add_message::<ObjectiveAssignmentResolvedEvent>()
            .add_message::<ObjectiveProgressRequestEvent>()
            .add_message::<ObjectiveProgressEvent>()
            .insert_resource(ObjectivesConfig::default())
            .insert_resource(ObjectiveRng::from_seed(seed))
            .init_resource::<Collected>()
            .add_systems(
                Update,
                (
                    assign_keep_alive_targets,
                    report_keep_alive_progress,
                    collect,
                )
                    .chain(),
            );
        app
    }

    /// Spawns a connected traitor with a living body; returns `(mind, body)`.
    fn spawn_traitor(world: &mut World, id: u64, name: &str) -> (Entity, Entity) {
        let body = world.spawn(MobState::Alive).id();
        let mind = world
            .spawn((
                Mind::new(MindId::new(id), name)
                    .with_job("Cargo Technician")
                    .with_body(body)
                    .with_session(id),
                TraitorRole,
            ))
            .id();
        (mind, body)
    }

    fn spawn_random_objective(world: &mut World, owner: Entity) -> Entity {
        let objective = world
            .spawn((
                RandomTraitorAlive,
                KeepAliveCondition,
                TargetObjective::default(),
            ))
            .id();
        attach(world, owner, objective);
        objective
    }

    fn attach(world: &mut World, owner: Entity, objective: Entity) {
        world
            .get_mut::<Mind>(owner)
            .expect("owner has a mind")
            .add_objective(objective);
    }

    fn assign(app: &mut App, mind: Entity, objective: Entity) {
        app.world_mut()
            .write_message(ObjectiveAssignedEvent { mind, objective });
    }

    fn request_progress(app: &mut App, objective: Entity) {
        app.world_mut()
            .write_message(ObjectiveProgressRequestEvent { objective });
    }

    fn stored_target(app: &App, objective: Entity) -> Option<Entity> {
        app.world()
            .get::<TargetObjective>(objective)
            .and_then(TargetObjective::target)
    }

    #[test]
    fn skips_targets_already_protected() {
        let mut app = test_app(11);
        let world = app.world_mut();
        let (a, _) = spawn_traitor(world, 0, "Avery");
        let (b, _) = spawn_traitor(world, 1, "Blake");
        let (c, _) = spawn_traitor(world, 2, "Casey");
        let (d, _) = spawn_traitor(world, 3, "Drew");

        let mut existing = TargetObjective::default();
        existing.set_target(b).expect("empty slot");
        let protecting_b = world.spawn((KeepAliveCondition, existing)).id();
        attach(world, a, protecting_b);
        let objective = spawn_random_objective(world, a);

        assign(&mut app, a, objective);
        app.update();

        let target = stored_target(&app, objective).expect("target assigned");
        assert!(target == c || target == d);

        let collected = app.world().resource::<Collected>();
        assert_eq!(collected.resolved.len(), 1);
        assert_eq!(
            collected.resolved[0].outcome,
            AssignmentOutcome::Assigned(target)
        );

        let name = app
            .world()
            .get::<Name>(objective)
            .expect("objective renamed after target");
        assert!(name.as_str().contains("Cargo Technician"));
    }

    #[test]
    fn sole_traitor_cancels_objective() {
        let mut app = test_app(3);
        let world = app.world_mut();
        let (a, _) = spawn_traitor(world, 0, "Avery");
        let objective = spawn_random_objective(world, a);

        assign(&mut app, a, objective);
        app.update();

        let cancelled = app
            .world()
            .get::<ObjectiveCancelled>(objective)
            .expect("objective cancelled");
        assert_eq!(cancelled.reason, AssignmentError::NoEligibleCandidate);
        assert_eq!(stored_target(&app, objective), None);

        let collected = app.world().resource::<Collected>();
        assert_eq!(
            collected.resolved[0].outcome,
            AssignmentOutcome::Cancelled(AssignmentError::NoEligibleCandidate)
        );
    }

    #[test]
    fn objective_without_slot_is_invalid() {
        let mut app = test_app(3);
        let world = app.world_mut();
        let (a, _) = spawn_traitor(world, 0, "Avery");
        spawn_traitor(world, 1, "Blake");
        let objective = world.spawn(RandomTraitorAlive).id();
        attach(world, a, objective);

        assign(&mut app, a, objective);
        app.update();

        let cancelled = app
            .world()
            .get::<ObjectiveCancelled>(objective)
            .expect("objective cancelled");
        assert_eq!(
            cancelled.reason,
            AssignmentError::InvalidObjective { objective }
        );
    }

    #[test]
    fn owner_without_mind_is_cancelled() {
        let mut app = test_app(3);
        let world = app.world_mut();
        spawn_traitor(world, 1, "Blake");
        let stranger = world.spawn_empty().id();
        let objective = world
            .spawn((RandomTraitorAlive, TargetObjective::default()))
            .id();

        assign(&mut app, stranger, objective);
        app.update();

        let cancelled = app
            .world()
            .get::<ObjectiveCancelled>(objective)
            .expect("objective cancelled");
        assert_eq!(
            cancelled.reason,
            AssignmentError::MissingMind { mind: stranger }
        );
    }

    #[test]
    fn same_frame_assignments_pick_distinct_targets() {
        let mut app = test_app(21);
        let world = app.world_mut();
        let (a, _) = spawn_traitor(world, 0, "Avery");
        let (b, _) = spawn_traitor(world, 1, "Blake");
        let (c, _) = spawn_traitor(world, 2, "Casey");
        let first = spawn_random_objective(world, a);
        let second = spawn_random_objective(world, a);
        let third = spawn_random_objective(world, a);

        assign(&mut app, a, first);
        assign(&mut app, a, second);
        assign(&mut app, a, third);
        app.update();

        let first_target = stored_target(&app, first).expect("first assigned");
        let second_target = stored_target(&app, second).expect("second assigned");
        assert_ne!(first_target, second_target);
        assert!([b, c].contains(&first_target));
        assert!([b, c].contains(&second_target));

        assert!(app.world().get::<ObjectiveCancelled>(third).is_some());
    }

    #[test]
    fn non_random_objectives_are_ignored() {
        let mut app = test_app(3);
        let world = app.world_mut();
        let (a, _) = spawn_traitor(world, 0, "Avery");
        spawn_traitor(world, 1, "Blake");
        let objective = world
            .spawn((KeepAliveCondition, TargetObjective::default()))
            .id();

        assign(&mut app, a, objective);
        app.update();

        assert_eq!(stored_target(&app, objective), None);
        assert!(app.world().resource::<Collected>().resolved.is_empty());
    }

    #[test]
    fn second_assignment_keeps_existing_target() {
        let mut app = test_app(8);
        let world = app.world_mut();
        let (a, _) = spawn_traitor(world, 0, "Avery");
        spawn_traitor(world, 1, "Blake");
        spawn_traitor(world, 2, "Casey");
        let objective = spawn_random_objective(world, a);

        assign(&mut app, a, objective);
        app.update();
        let original = stored_target(&app, objective).expect("assigned");

        assign(&mut app, a, objective);
        app.update();

        assert_eq!(stored_target(&app, objective), Some(original));
        assert!(app.world().get::<ObjectiveCancelled>(objective).is_none());
        assert_eq!(app.world().resource::<Collected>().resolved.len(), 1);
    }

    #[test]
    fn cancelled_objective_stays_cancelled() {
        let mut app = test_app(4);
        let world = app.world_mut();
        let (a, _) = spawn_traitor(world, 0, "Avery");
        let objective = spawn_random_objective(world, a);

        assign(&mut app, a, objective);
        app.update();
        assert!(app.world().get::<ObjectiveCancelled>(objective).is_some());

        spawn_traitor(app.world_mut(), 1, "Blake");
        assign(&mut app, a, objective);
        app.update();

        assert_eq!(stored_target(&app, objective), None);
        let cancelled = app
            .world()
            .get::<ObjectiveCancelled>(objective)
            .expect("still cancelled");
        assert_eq!(cancelled.reason, AssignmentError::NoEligibleCandidate);
        let outcomes: Vec<AssignmentOutcome> = app
            .world()
            .resource::<Collected>()
            .resolved
            .iter()
            .map(|event| event.outcome)
            .collect();
        assert_eq!(
            outcomes,
            vec![AssignmentOutcome::Cancelled(
                AssignmentError::NoEligibleCandidate
            )]
        );
    }

    #[test]
    fn cancellation_in_same_frame_is_terminal() {
        let mut app = test_app(4);
        let world = app.world_mut();
        let (a, _) = spawn_traitor(world, 0, "Avery");
        let objective = spawn_random_objective(world, a);

        assign(&mut app, a, objective);
        assign(&mut app, a, objective);
        app.update();

        assert_eq!(app.world().resource::<Collected>().resolved.len(), 1);
        assert_eq!(stored_target(&app, objective), None);
    }

    #[test]
    fn help_objective_target_counts_as_claimed() {
        let mut app = test_app(13);
        let world = app.world_mut();
        let (a, _) = spawn_traitor(world, 0, "Avery");
        let (b, _) = spawn_traitor(world, 1, "Blake");
        let (c, _) = spawn_traitor(world, 2, "Casey");

        let mut helping = TargetObjective::default();
        helping.set_target(b).expect("empty slot");
        let helping_b = world.spawn((RandomTraitorProgress, helping)).id();
        attach(world, a, helping_b);
        let objective = spawn_random_objective(world, a);

        assign(&mut app, a, objective);
        app.update();

        assert_eq!(stored_target(&app, objective), Some(c));
    }

    #[test]
    fn override_keeps_dead_body_eligible_and_alive() {
        let mut app = test_app(6);
        let world = app.world_mut();
        let (a, _) = spawn_traitor(world, 0, "Avery");
        let (b, b_body) = spawn_traitor(world, 1, "Blake");
        world
            .entity_mut(b_body)
            .insert((MobState::Dead, DeadIcOverride(false)));
        let objective = spawn_random_objective(world, a);

        assign(&mut app, a, objective);
        app.update();
        assert_eq!(stored_target(&app, objective), Some(b));

        request_progress(&mut app, objective);
        app.update();

        app.world_mut()
            .entity_mut(b_body)
            .insert((MobState::Alive, DeadIcOverride(true)));
        request_progress(&mut app, objective);
        app.update();

        let progress: Vec<f32> = app
            .world()
            .resource::<Collected>()
            .progress
            .iter()
            .map(|report| report.progress)
            .collect();
        assert_eq!(progress, vec![0.0, 1.0]);
    }

    #[test]
    fn body_without_mob_state_counts_as_dead() {
        let mut app = test_app(1);
        let world = app.world_mut();
        let brain = world.spawn_empty().id();
        let target = world
            .spawn((
                Mind::new(MindId::new(9), "Brain")
                    .with_body(brain)
                    .with_session(9),
                TraitorRole,
            ))
            .id();
        let mut slot = TargetObjective::default();
        slot.set_target(target).expect("empty slot");
        let objective = world.spawn((KeepAliveCondition, slot)).id();

        request_progress(&mut app, objective);
        app.update();

        let collected = app.world().resource::<Collected>();
        assert_eq!(collected.progress.len(), 1);
        assert_eq!(collected.progress[0].progress, 1.0);
    }

    #[test]
    fn progress_tracks_target_death() {
        let mut app = test_app(1);
        let world = app.world_mut();
        let (c, c_body) = spawn_traitor(world, 2, "Casey");
        let mut slot = TargetObjective::default();
        slot.set_target(c).expect("empty slot");
        let objective = world.spawn((KeepAliveCondition, slot)).id();

        request_progress(&mut app, objective);
        app.update();

        request_progress(&mut app, objective);
        app.update();

        app.world_mut().entity_mut(c_body).insert(MobState::Dead);
        request_progress(&mut app, objective);
        app.update();

        let progress: Vec<f32> = app
            .world()
            .resource::<Collected>()
            .progress
            .iter()
            .map(|report| report.progress)
            .collect();
        assert_eq!(progress, vec![0.0, 0.0, 1.0]);
        assert_eq!(stored_target(&app, objective), Some(c));
    }

    #[test]
    fn progress_without_target_is_not_reported() {
        let mut app = test_app(1);
        let world = app.world_mut();
        let unset = world
            .spawn((KeepAliveCondition, TargetObjective::default()))
            .id();
        let slotless = world.spawn(KeepAliveCondition).id();

        request_progress(&mut app, unset);
        request_progress(&mut app, slotless);
        app.update();

        assert!(app.world().resource::<Collected>().progress.is_empty());
    }

    #[test]
    fn unresolvable_target_reports_zero() {
        let mut app = test_app(1);
        let world = app.world_mut();
        let removed = world.spawn_empty().id();
        let mut slot = TargetObjective::default();
        slot.set_target(removed).expect("empty slot");
        let objective = world.spawn((KeepAliveCondition, slot)).id();

        request_progress(&mut app, objective);
        app.update();

        let collected = app.world().resource::<Collected>();
        assert_eq!(collected.progress.len(), 1);
        assert_eq!(collected.progress[0].progress, 0.0);
    }
}
