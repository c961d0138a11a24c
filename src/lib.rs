//! A 2D rigid-body physics engine: circles and convex polygons advanced
//! under gravity, with AABB broad-phase pruning, SAT narrow-phase detection,
//! contact-point generation, and a sequential-impulse solver with rotation
//! and Coulomb friction.

pub mod collision;
pub mod common;
pub mod math;
pub mod objects;
pub mod shapes;
pub mod world;

// Re-export key types for easier use
pub use collision::{Aabb, ContactManifold};
pub use common::Material;
pub use math::vec2::Vec2;
pub use objects::rigid_body::{BodyError, RigidBody};
pub use shapes::{Circle, Polygon, Shape};
pub use world::PhysicsWorld;
