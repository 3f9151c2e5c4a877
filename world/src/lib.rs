#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Meadow simulation.
//!
//! The world owns a population of animals scattered across a unit square.
//! Renderers never touch animals directly: they read positions through the
//! [`query`] module or the [`SnapshotSource`] implementation, both of which
//! hand out owned copies.

use std::f32::consts::TAU;

use meadow_core::{EngineUnavailable, SnapshotSource, WorldSnapshot};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

const WORLD_GENERATION_SEED: u64 = 0x5d1c_04a7_93be_6f21;

/// Number of animals placed into a freshly generated world.
pub const DEFAULT_POPULATION: usize = 40;

/// Distance an animal covers per simulation step, relative to the world extent.
pub const DEFAULT_SPEED: f32 = 0.002;

/// Single animal living in the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Animal {
    x: f32,
    y: f32,
    rotation: f32,
    speed: f32,
}

impl Animal {
    /// Creates an animal at the provided normalised position, facing along the x axis.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            rotation: 0.0,
            speed: DEFAULT_SPEED,
        }
    }

    /// Places an animal at a random position with a random heading.
    pub fn random(rng: &mut dyn RngCore) -> Self {
        Self {
            x: rng.gen(),
            y: rng.gen(),
            rotation: rng.gen_range(0.0..TAU),
            speed: DEFAULT_SPEED,
        }
    }

    /// Overrides the heading of the animal, in radians.
    #[must_use]
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Normalised horizontal position.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Normalised vertical position.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Heading in radians.
    #[must_use]
    pub const fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Distance covered per step.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }
}

/// Represents the authoritative Meadow world state.
#[derive(Clone, Debug, PartialEq)]
pub struct World {
    animals: Vec<Animal>,
}

impl World {
    /// Creates a world populated deterministically from the built-in seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(WORLD_GENERATION_SEED, DEFAULT_POPULATION)
    }

    /// Creates a world whose population is drawn from the provided seed.
    #[must_use]
    pub fn with_seed(seed: u64, population: usize) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::random(&mut rng, population)
    }

    /// Creates a world with `population` randomly placed animals.
    pub fn random(rng: &mut dyn RngCore, population: usize) -> Self {
        let animals: Vec<Animal> = (0..population)
            .map(|_| Animal::random(&mut *rng))
            .collect();
        tracing::debug!(population = animals.len(), "generated world population");
        Self { animals }
    }

    /// Creates a world holding exactly the provided animals, in order.
    #[must_use]
    pub fn from_animals(animals: Vec<Animal>) -> Self {
        Self { animals }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotSource for World {
    fn world_snapshot(&self) -> Result<WorldSnapshot, EngineUnavailable> {
        Ok(query::world_snapshot(self))
    }
}

/// Read-only queries over the world.
pub mod query {
    use meadow_core::{Agent, WorldSnapshot};

    use super::{Animal, World};

    /// Provides read-only access to the animals inhabiting the world.
    #[must_use]
    pub fn animals(world: &World) -> &[Animal] {
        &world.animals
    }

    /// Number of animals currently alive.
    #[must_use]
    pub fn population(world: &World) -> usize {
        world.animals.len()
    }

    /// Copies every animal position into a snapshot, preserving iteration order.
    #[must_use]
    pub fn world_snapshot(world: &World) -> WorldSnapshot {
        world
            .animals
            .iter()
            .map(|animal| Agent::new(animal.x, animal.y))
            .collect()
    }
}
