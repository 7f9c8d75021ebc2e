//! Mind components: the per-player record objectives hang off, plus body state.
use std::fmt;

use bevy::prelude::*;

/// Unique identifier for a mind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MindId(u64);

impl MindId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for MindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MIND-{:04}", self.0)
    }
}

/// A participant's persistent record, independent of whichever body it controls.
#[derive(Component, Debug, Clone)]
pub struct Mind {
    pub id: MindId,
    pub character_name: String,
    pub job: Option<String>,
    /// Body currently controlled, if any.
    pub owned_entity: Option<Entity>,
    /// Player session; `None` while disconnected.
    pub session: Option<u64>,
    pub objectives: Vec<Entity>,
}

impl Mind {
    pub fn new(id: MindId, character_name: impl Into<String>) -> Self {
        Self {
            id,
            character_name: character_name.into(),
            job: None,
            owned_entity: None,
            session: None,
            objectives: Vec::new(),
        }
    }

    pub fn with_job(mut self, job: impl Into<String>) -> Self {
        self.job = Some(job.into());
        self
    }

    pub fn with_body(mut self, body: Entity) -> Self {
        self.owned_entity = Some(body);
        self
    }

    pub fn with_session(mut self, session: u64) -> Self {
        self.session = Some(session);
        self
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    pub fn add_objective(&mut self, objective: Entity) {
        if !self.objectives.contains(&objective) {
            self.objectives.push(objective);
        }
    }
}

/// Marks a mind as holding the traitor role.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct TraitorRole;

/// Health state of a body.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MobState {
    #[default]
    Alive,
    Critical,
    Dead,
}

/// Overrides the in-character death verdict for a body.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadIcOverride(pub bool);

/// Issues monotonically increasing mind ids.
#[derive(Resource, Default)]
pub struct MindIdGenerator {
    next: u64,
}

impl MindIdGenerator {
    pub fn next_id(&mut self) -> MindId {
        let id = self.next;
        self.next += 1;
        MindId::new(id)
    }
}
