use bevy::{log::LogPlugin, prelude::*};

use traitor_objectives::{
    mind::{Mind, MindIdGenerator, MobState, TraitorRole},
    objectives::{
        AssignmentOutcome, KeepAliveCondition, ObjectiveAssignedEvent,
        ObjectiveAssignmentResolvedEvent, ObjectiveProgressEvent, ObjectiveProgressRequestEvent,
        ObjectivesConfig, RandomTraitorAlive, TargetObjective,
    },
    CorePlugin, ObjectivesPlugin,
};

const OBJECTIVES_PER_TRAITOR: usize = 2;

const ROSTER: [(&str, &str, bool); 5] = [
    ("Avery Quill", "Quartermaster", true),
    ("Blake Ferro", "Chemist", true),
    ("Casey Wren", "Atmospheric Technician", true),
    ("Drew Halden", "Chaplain", false),
    ("Emery Vance", "Botanist", true),
];

/// Runs a headless round: assigns keep-alive objectives, kills one traitor and reports progress.
fn main() {
    let config = ObjectivesConfig::load_or_default();

    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        LogPlugin::default(),
        CorePlugin::with_seed(config.rng_seed),
        ObjectivesPlugin::new(config),
    ))
    .init_resource::<MindIdGenerator>()
    .add_systems(Update, log_round_reports);

    let traitors = spawn_roster(app.world_mut());
    for &mind in &traitors {
        for _ in 0..OBJECTIVES_PER_TRAITOR {
            let objective = spawn_keep_alive_objective(app.world_mut(), mind);
            app.world_mut()
                .write_message(ObjectiveAssignedEvent { mind, objective });
        }
    }
    app.update();

    if let Some(body) = traitors
        .first()
        .and_then(|mind| app.world().get::<Mind>(*mind))
        .and_then(|mind| mind.owned_entity)
    {
        app.world_mut().entity_mut(body).insert(MobState::Dead);
    }

    let objectives: Vec<Entity> = app
        .world_mut()
        .query_filtered::<Entity, With<KeepAliveCondition>>()
        .iter(app.world())
        .collect();
    for objective in objectives {
        app.world_mut()
            .write_message(ObjectiveProgressRequestEvent { objective });
    }
    app.update();
}

fn spawn_roster(world: &mut World) -> Vec<Entity> {
    let mut traitors = Vec::new();
    for (session, (name, job, traitor)) in ROSTER.iter().enumerate() {
        let id = world.resource_mut::<MindIdGenerator>().next_id();
        let body = world.spawn((MobState::Alive, Name::new(*name))).id();
        let mind = Mind::new(id, *name)
            .with_job(*job)
            .with_body(body)
            .with_session(session as u64);

        if *traitor {
            traitors.push(world.spawn((mind, TraitorRole)).id());
        } else {
            world.spawn(mind);
        }
    }
    traitors
}

fn spawn_keep_alive_objective(world: &mut World, owner: Entity) -> Entity {
    let objective = world
        .spawn((
            RandomTraitorAlive,
            KeepAliveCondition,
            TargetObjective::default(),
        ))
        .id();
    if let Some(mut mind) = world.get_mut::<Mind>(owner) {
        mind.add_objective(objective);
    }
    objective
}

fn log_round_reports(
    mut resolved: MessageReader<ObjectiveAssignmentResolvedEvent>,
    mut progress: MessageReader<ObjectiveProgressEvent>,
    minds: Query<&Mind>,
    names: Query<&Name>,
) {
    for event in resolved.read() {
        let owner = minds
            .get(event.mind)
            .map(|mind| mind.character_name.as_str())
            .unwrap_or("unknown");
        match event.outcome {
            AssignmentOutcome::Assigned(_) => {
                let title = names
                    .get(event.objective)
                    .map(|name| name.as_str())
                    .unwrap_or("untitled objective");
                info!("{}: {}", owner, title);
            }
            AssignmentOutcome::Cancelled(reason) => {
                info!("{}: objective {} dropped ({})", owner, event.objective, reason);
            }
        }
    }

    for report in progress.read() {
        let title = names
            .get(report.objective)
            .map(|name| name.as_str())
            .unwrap_or("untitled objective");
        info!("{} -> progress {:.1}", title, report.progress);
    }
}
