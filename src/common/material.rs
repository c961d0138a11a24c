//! Physical material properties of a rigid body.

/// Coefficient of static friction shared by every body.
pub const STATIC_FRICTION: f64 = 0.6;
/// Coefficient of dynamic (sliding) friction shared by every body.
pub const DYNAMIC_FRICTION: f64 = 0.4;

/// Material properties affecting collision response. Fixed at body
/// construction; the solver averages friction coefficients and takes the
/// minimum restitution of a colliding pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Coefficient of restitution (bounciness), clamped to [0, 1].
    /// 0 = perfectly inelastic, 1 = perfectly elastic.
    pub restitution: f64,
    pub static_friction: f64,
    pub dynamic_friction: f64,
}

impl Material {
    /// Creates a material with the given restitution (silently clamped to
    /// [0, 1]) and the engine-wide friction coefficients.
    pub fn new(restitution: f64) -> Self {
        Material {
            restitution: restitution.clamp(0.0, 1.0),
            static_friction: STATIC_FRICTION,
            dynamic_friction: DYNAMIC_FRICTION,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Material::new(0.5)
    }
}
