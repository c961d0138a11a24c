use crate::math::vec2::Vec2;

/// Immutable snapshot of one collision, produced by the narrow phase and
/// consumed once by the solver within the same sub-step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactManifold {
    /// Index of the first body in the world's body list.
    pub body_a: usize,
    /// Index of the second body in the world's body list.
    pub body_b: usize,
    /// Collision normal, pointing from body A towards body B.
    pub normal: Vec2,
    /// Penetration depth along the normal.
    pub depth: f64,
    /// First contact point in world space.
    pub contact1: Vec2,
    /// Second contact point in world space; only meaningful when
    /// `contact_count` is 2.
    pub contact2: Vec2,
    /// Number of contact points: 1 or 2.
    pub contact_count: usize,
}

impl ContactManifold {
    pub fn new(
        body_a: usize,
        body_b: usize,
        normal: Vec2,
        depth: f64,
        contact1: Vec2,
        contact2: Vec2,
        contact_count: usize,
    ) -> Self {
        Self {
            body_a,
            body_b,
            normal,
            depth,
            contact1,
            contact2,
            contact_count,
        }
    }
}
