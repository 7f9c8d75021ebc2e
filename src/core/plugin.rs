//! CorePlugin wires the shared random source used by objective resolution.
use bevy::prelude::*;
use rand::{rngs::StdRng, RngCore, SeedableRng};

/// Random source handed to objective systems.
///
/// Kept as a resource instead of `thread_rng` so a seeded run picks the same
/// targets every time.
#[derive(Resource, Debug)]
pub struct ObjectiveRng {
    seed: u64,
    rng: StdRng,
}

impl ObjectiveRng {
    /// Creates a generator from a fixed seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a generator seeded from OS entropy; the drawn seed is kept for logging.
    pub fn from_entropy() -> Self {
        let seed = StdRng::from_entropy().next_u64();
        Self::from_seed(seed)
    }

    /// Seed this generator was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

impl Default for ObjectiveRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Registers the shared random source.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorePlugin {
    seed: Option<u64>,
}

impl CorePlugin {
    /// Creates a CorePlugin with an optional fixed seed (`None` draws one from entropy).
    pub const fn with_seed(seed: Option<u64>) -> Self {
        Self { seed }
    }
}

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        let rng = match self.seed {
            Some(seed) => ObjectiveRng::from_seed(seed),
            None => ObjectiveRng::from_entropy(),
        };

        app.insert_resource(rng)
            .add_systems(Startup, log_startup_seed);
    }
}

fn log_startup_seed(rng: Res<ObjectiveRng>) {
    info!("CorePlugin initialised with objective seed: {}", rng.seed());
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    #[test]
    fn seeded_rng_is_reproducible() {
        let mut first = ObjectiveRng::from_seed(42);
        let mut second = ObjectiveRng::from_seed(42);

        let a: Vec<u32> = (0..8).map(|_| first.rng_mut().gen_range(0..100)).collect();
        let b: Vec<u32> = (0..8).map(|_| second.rng_mut().gen_range(0..100)).collect();

        assert_eq!(a, b);
        assert_eq!(first.seed(), 42);
    }

    #[test]
    fn plugin_inserts_seeded_resource() {
        let mut app = App::new();
        app.add_plugins(CorePlugin::with_seed(Some(7)));

        let rng = app.world().resource::<ObjectiveRng>();
        assert_eq!(rng.seed(), 7);
    }
}
