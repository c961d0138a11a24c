use thiserror::Error;

use crate::collision::aabb::Aabb;
use crate::common::Material;
use crate::math::transform::Transform;
use crate::math::vec2::Vec2;
use crate::shapes::{Circle, Polygon, Shape};
use crate::world::{MAX_BODY_SIZE, MAX_DENSITY, MIN_BODY_SIZE, MIN_DENSITY};

/// Why a body factory refused to construct a body. Recoverable: the caller
/// may retry with different parameters.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BodyError {
    #[error("body area {area} is below the minimum of {min}")]
    AreaTooSmall { area: f64, min: f64 },
    #[error("body area {area} exceeds the maximum of {max}")]
    AreaTooLarge { area: f64, max: f64 },
    #[error("density {density} is below the minimum of {min}")]
    DensityTooSmall { density: f64, min: f64 },
    #[error("density {density} exceeds the maximum of {max}")]
    DensityTooLarge { density: f64, max: f64 },
}

/// The mutable simulation unit: a circle or convex polygon with a pose,
/// velocities and mass properties.
///
/// Mass properties are computed once at construction and never change. A
/// static body has its inverse mass and inverse inertia forced to zero, which
/// is the only mechanism keeping it immovable under impulses and gravity.
///
/// The world-space vertex array and the AABB are caches guarded by dirty
/// flags: every pose mutation invalidates them and the next read recomputes.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    position: Vec2,
    /// Orientation in radians; accumulates without wrapping.
    angle: f64,
    pub linear_velocity: Vec2,
    pub angular_velocity: f64,

    shape: Shape,
    pub density: f64,
    pub area: f64,
    pub mass: f64,
    pub inv_mass: f64,
    pub inertia: f64,
    pub inv_inertia: f64,
    pub is_static: bool,
    pub material: Material,

    transformed_vertices: Vec<Vec2>,
    transform_dirty: bool,
    aabb: Aabb,
    aabb_dirty: bool,
}

fn validate(area: f64, density: f64) -> Result<(), BodyError> {
    if area < MIN_BODY_SIZE {
        return Err(BodyError::AreaTooSmall { area, min: MIN_BODY_SIZE });
    }
    if area > MAX_BODY_SIZE {
        return Err(BodyError::AreaTooLarge { area, max: MAX_BODY_SIZE });
    }
    if density < MIN_DENSITY {
        return Err(BodyError::DensityTooSmall { density, min: MIN_DENSITY });
    }
    if density > MAX_DENSITY {
        return Err(BodyError::DensityTooLarge { density, max: MAX_DENSITY });
    }
    Ok(())
}

impl RigidBody {
    fn new(
        shape: Shape,
        density: f64,
        area: f64,
        mass: f64,
        inertia: f64,
        is_static: bool,
        restitution: f64,
    ) -> Self {
        let (inv_mass, inv_inertia) = if is_static {
            (0.0, 0.0)
        } else {
            (1.0 / mass, 1.0 / inertia)
        };

        let vertex_count = match &shape {
            Shape::Circle(_) => 0,
            Shape::Polygon(polygon) => polygon.vertices.len(),
        };

        Self {
            position: Vec2::ZERO,
            angle: 0.0,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            shape,
            density,
            area,
            mass,
            inv_mass,
            inertia,
            inv_inertia,
            is_static,
            material: Material::new(restitution),
            transformed_vertices: vec![Vec2::ZERO; vertex_count],
            transform_dirty: true,
            aabb: Aabb::new(Vec2::ZERO, Vec2::ZERO),
            aabb_dirty: true,
        }
    }

    /// Creates a circle body at the origin. Fails when the circle's area or
    /// the density is outside the world's global bounds; restitution is
    /// silently clamped to [0, 1].
    pub fn new_circle(
        radius: f64,
        density: f64,
        is_static: bool,
        restitution: f64,
    ) -> Result<Self, BodyError> {
        let circle = Circle::new(radius);
        let area = circle.area();
        validate(area, density)?;

        let mass = area * density;
        let inertia = 0.5 * mass * radius * radius;
        Ok(Self::new(
            Shape::Circle(circle),
            density,
            area,
            mass,
            inertia,
            is_static,
            restitution,
        ))
    }

    /// Creates an axis-aligned box body at the origin. Same validation and
    /// clamping rules as [`RigidBody::new_circle`].
    pub fn new_box(
        width: f64,
        height: f64,
        density: f64,
        is_static: bool,
        restitution: f64,
    ) -> Result<Self, BodyError> {
        let area = width * height;
        validate(area, density)?;

        let mass = area * density;
        let inertia = (1.0 / 12.0) * mass * (width * width + height * height);
        Ok(Self::new(
            Shape::Polygon(Polygon::new_box(width, height)),
            density,
            area,
            mass,
            inertia,
            is_static,
            restitution,
        ))
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    fn mark_dirty(&mut self) {
        self.transform_dirty = true;
        self.aabb_dirty = true;
    }

    /// Integrates gravity into velocity and velocity into the pose over one
    /// sub-step (`dt / substeps`). No-op for static bodies.
    pub fn step(&mut self, dt: f64, gravity: Vec2, substeps: usize) {
        if self.is_static {
            return;
        }
        let dt = dt / substeps as f64;
        self.linear_velocity += gravity * dt;
        self.position += self.linear_velocity * dt;
        self.angle += self.angular_velocity * dt;
        self.mark_dirty();
    }

    /// Displaces the body by `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
        self.mark_dirty();
    }

    pub fn move_to(&mut self, position: Vec2) {
        self.position = position;
        self.mark_dirty();
    }

    /// Turns the body by `delta` radians.
    pub fn rotate(&mut self, delta: f64) {
        self.angle += delta;
        self.mark_dirty();
    }

    pub fn rotate_to(&mut self, angle: f64) {
        self.angle = angle;
        self.mark_dirty();
    }

    /// The body's world-space bounding box, recomputed lazily after a pose
    /// change.
    pub fn aabb(&mut self) -> Aabb {
        if self.aabb_dirty {
            self.aabb = self.compute_aabb();
            self.aabb_dirty = false;
        }
        self.aabb
    }

    fn compute_aabb(&mut self) -> Aabb {
        if let Shape::Circle(circle) = &self.shape {
            let extent = Vec2::new(circle.radius, circle.radius);
            return Aabb::new(self.position - extent, self.position + extent);
        }

        let mut min = Vec2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for v in self.transformed_vertices() {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
        }
        Aabb::new(min, max)
    }

    /// The polygon's vertices under the current pose, recomputed lazily
    /// after a pose change. Empty for circle bodies.
    pub fn transformed_vertices(&mut self) -> &[Vec2] {
        if self.transform_dirty {
            let transform = Transform::new(self.position, self.angle);
            if let Shape::Polygon(polygon) = &self.shape {
                for (world, local) in self
                    .transformed_vertices
                    .iter_mut()
                    .zip(polygon.vertices.iter())
                {
                    *world = transform.apply(*local);
                }
            }
            self.transform_dirty = false;
        }
        &self.transformed_vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_new_circle_mass_properties() {
        let radius = 2.0;
        let density = 1.0;
        let body = RigidBody::new_circle(radius, density, false, 0.5).unwrap();

        let expected_area = radius * radius * PI;
        let expected_mass = expected_area * density;
        let expected_inertia = 0.5 * expected_mass * radius * radius;

        assert!((body.area - expected_area).abs() < EPSILON);
        assert!((body.mass - expected_mass).abs() < EPSILON);
        assert!((body.inv_mass - 1.0 / expected_mass).abs() < EPSILON);
        assert!((body.inertia - expected_inertia).abs() < EPSILON);
        assert!((body.inv_inertia - 1.0 / expected_inertia).abs() < EPSILON);
        assert!(!body.is_static);
        assert_eq!(body.position(), Vec2::ZERO);
    }

    #[test]
    fn test_new_box_mass_properties() {
        let body = RigidBody::new_box(2.0, 4.0, 1.5, false, 0.0).unwrap();

        let expected_mass = 8.0 * 1.5;
        let expected_inertia = (1.0 / 12.0) * expected_mass * (4.0 + 16.0);
        assert!((body.mass - expected_mass).abs() < EPSILON);
        assert!((body.inertia - expected_inertia).abs() < EPSILON);
    }

    #[test]
    fn test_mass_inverse_invariants() {
        let body = RigidBody::new_box(1.0, 1.0, 2.0, false, 0.3).unwrap();
        assert!((body.mass * body.inv_mass - 1.0).abs() < EPSILON);
        assert!((body.inertia * body.inv_inertia - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_static_body_zero_inverses() {
        let body = RigidBody::new_circle(1.0, 1.0, true, 0.5).unwrap();
        assert_eq!(body.inv_mass, 0.0);
        assert_eq!(body.inv_inertia, 0.0);
        // Computed mass is retained even though the body never moves.
        assert!(body.mass > 0.0);
    }

    #[test]
    fn test_factory_rejects_out_of_bounds() {
        assert!(matches!(
            RigidBody::new_circle(0.001, 1.0, false, 0.5),
            Err(BodyError::AreaTooSmall { .. })
        ));
        assert!(matches!(
            RigidBody::new_box(100.0, 100.0, 1.0, false, 0.5),
            Err(BodyError::AreaTooLarge { .. })
        ));
        assert!(matches!(
            RigidBody::new_box(1.0, 1.0, 0.1, false, 0.5),
            Err(BodyError::DensityTooSmall { .. })
        ));
        assert!(matches!(
            RigidBody::new_box(1.0, 1.0, 30.0, false, 0.5),
            Err(BodyError::DensityTooLarge { .. })
        ));
    }

    #[test]
    fn test_factory_error_messages_are_descriptive() {
        let err = RigidBody::new_box(1.0, 1.0, 30.0, false, 0.5).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("30"));
        assert!(msg.contains("21.4"));
    }

    #[test]
    fn test_restitution_clamped_not_rejected() {
        let body = RigidBody::new_circle(1.0, 1.0, false, 7.0).unwrap();
        assert_eq!(body.material.restitution, 1.0);
    }

    #[test]
    fn test_static_body_ignores_step() {
        let mut body = RigidBody::new_box(2.0, 2.0, 1.0, true, 0.0).unwrap();
        body.move_to(Vec2::new(3.0, 4.0));
        for _ in 0..100 {
            body.step(1.0 / 60.0, Vec2::new(0.0, -9.81), 8);
        }
        assert_eq!(body.position(), Vec2::new(3.0, 4.0));
        assert_eq!(body.linear_velocity, Vec2::ZERO);
        assert_eq!(body.angular_velocity, 0.0);
    }

    #[test]
    fn test_step_integrates_sliced_time() {
        let mut body = RigidBody::new_circle(1.0, 1.0, false, 0.0).unwrap();
        let gravity = Vec2::new(0.0, -10.0);
        body.step(0.1, gravity, 10);

        // One sub-step of dt/substeps = 0.01.
        assert!((body.linear_velocity.y + 0.1).abs() < EPSILON);
        assert!((body.position().y + 0.001).abs() < EPSILON);
    }

    #[test]
    fn test_move_to_round_trip() {
        let mut body = RigidBody::new_circle(1.0, 1.0, false, 0.0).unwrap();
        let target = Vec2::new(12.5, -7.25);
        body.move_to(target);
        assert_eq!(body.position(), target);
    }

    #[test]
    fn test_aabb_unrotated_box() {
        let mut body = RigidBody::new_box(2.0, 4.0, 1.0, false, 0.0).unwrap();
        let aabb = body.aabb();
        assert!((aabb.min.x + 1.0).abs() < EPSILON);
        assert!((aabb.min.y + 2.0).abs() < EPSILON);
        assert!((aabb.max.x - 1.0).abs() < EPSILON);
        assert!((aabb.max.y - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_aabb_circle() {
        let mut body = RigidBody::new_circle(1.5, 1.0, false, 0.0).unwrap();
        body.move_to(Vec2::new(2.0, 3.0));
        let aabb = body.aabb();
        assert_eq!(aabb.min, Vec2::new(0.5, 1.5));
        assert_eq!(aabb.max, Vec2::new(3.5, 4.5));
    }

    #[test]
    fn test_aabb_rotated_box_grows() {
        let mut body = RigidBody::new_box(2.0, 2.0, 1.0, false, 0.0).unwrap();
        body.rotate_to(PI / 4.0);
        let aabb = body.aabb();
        let expected = 2.0f64.sqrt();
        assert!((aabb.max.x - expected).abs() < 1e-9);
        assert!((aabb.max.y - expected).abs() < 1e-9);
    }

    #[test]
    fn test_cache_idempotent_between_mutations() {
        let mut body = RigidBody::new_box(2.0, 2.0, 1.0, false, 0.0).unwrap();
        body.move_to(Vec2::new(1.0, 1.0));
        body.rotate(0.3);

        let first = body.aabb();
        let second = body.aabb();
        assert_eq!(first, second);

        let verts1 = body.transformed_vertices().to_vec();
        let verts2 = body.transformed_vertices().to_vec();
        assert_eq!(verts1, verts2);
    }

    #[test]
    fn test_cache_invalidated_by_mutation() {
        let mut body = RigidBody::new_box(2.0, 2.0, 1.0, false, 0.0).unwrap();
        let before = body.aabb();
        body.translate(Vec2::new(5.0, 0.0));
        let after = body.aabb();
        assert!((after.min.x - before.min.x - 5.0).abs() < EPSILON);

        body.rotate(PI / 4.0);
        let rotated = body.aabb();
        assert!(rotated.max.x > after.max.x);
    }

    #[test]
    fn test_transformed_vertices_follow_pose() {
        let mut body = RigidBody::new_box(2.0, 2.0, 1.0, false, 0.0).unwrap();
        body.move_to(Vec2::new(10.0, 0.0));
        let verts = body.transformed_vertices();
        assert_eq!(verts.len(), 4);
        assert!(verts[0].nearly_equal(Vec2::new(9.0, 1.0)));
        assert!(verts[2].nearly_equal(Vec2::new(11.0, -1.0)));
    }

    #[test]
    fn test_circle_has_no_transformed_vertices() {
        let mut body = RigidBody::new_circle(1.0, 1.0, false, 0.0).unwrap();
        assert!(body.transformed_vertices().is_empty());
    }
}
