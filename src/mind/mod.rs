//! Minds: player records, traitor role, and body liveness.
pub mod components;
pub mod lookup;

pub use components::{DeadIcOverride, Mind, MindId, MindIdGenerator, MobState, TraitorRole};
pub use lookup::MindLookup;
