pub mod physics_world;

pub use physics_world::{
    PhysicsWorld, MAX_BODY_SIZE, MAX_DENSITY, MAX_ITERATIONS, MIN_BODY_SIZE, MIN_DENSITY,
    MIN_ITERATIONS,
};
