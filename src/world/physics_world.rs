use tracing::{debug, trace};

use crate::collision::{self, ContactManifold};
use crate::math::vec2::Vec2;
use crate::objects::rigid_body::RigidBody;

/// Smallest allowed body area.
pub const MIN_BODY_SIZE: f64 = 1e-4;
/// Largest allowed body area.
pub const MAX_BODY_SIZE: f64 = 4096.0;
/// Smallest allowed body density.
pub const MIN_DENSITY: f64 = 0.5;
/// Largest allowed body density (roughly platinum).
pub const MAX_DENSITY: f64 = 21.4;
/// Lower bound on solver sub-iterations per step.
pub const MIN_ITERATIONS: usize = 5;
/// Upper bound on solver sub-iterations per step.
pub const MAX_ITERATIONS: usize = 128;

/// The simulation container: owns the body list and runs the per-step
/// pipeline (integrate, broad phase, narrow phase with impulse resolution).
///
/// Single-threaded by design; a `PhysicsWorld` must not be stepped or
/// structurally modified from multiple threads without external
/// synchronization.
pub struct PhysicsWorld {
    pub gravity: Vec2,
    bodies: Vec<RigidBody>,
    contact_pairs: Vec<(usize, usize)>,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.81),
            bodies: Vec::new(),
            contact_pairs: Vec::new(),
        }
    }

    /// Appends a body and returns its index. Indices are list positions and
    /// shift on removal.
    pub fn add_body(&mut self, body: RigidBody) -> usize {
        let index = self.bodies.len();
        debug!(index, is_static = body.is_static, "adding body");
        self.bodies.push(body);
        index
    }

    /// Removes the body at `index`, or returns `None` if out of range.
    /// Later bodies shift down by one.
    pub fn remove_body(&mut self, index: usize) -> Option<RigidBody> {
        if index >= self.bodies.len() {
            return None;
        }
        debug!(index, "removing body");
        Some(self.bodies.remove(index))
    }

    pub fn body(&self, index: usize) -> Option<&RigidBody> {
        self.bodies.get(index)
    }

    pub fn body_mut(&mut self, index: usize) -> Option<&mut RigidBody> {
        self.bodies.get_mut(index)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Read-only view of all bodies, in insertion order. Sufficient for
    /// rendering consumers.
    pub fn bodies(&self) -> impl Iterator<Item = &RigidBody> {
        self.bodies.iter()
    }

    /// Advances the simulation by `dt`, split into `iterations` sub-steps
    /// (clamped to [MIN_ITERATIONS, MAX_ITERATIONS]). Each sub-step
    /// integrates every body by `dt / iterations`, prunes candidate pairs by
    /// AABB overlap, and detects and resolves the surviving pairs.
    pub fn step(&mut self, dt: f64, iterations: usize) {
        let iterations = iterations.clamp(MIN_ITERATIONS, MAX_ITERATIONS);

        for _ in 0..iterations {
            self.contact_pairs.clear();
            self.step_bodies(dt, iterations);
            self.broad_phase();
            self.narrow_phase();
        }
    }

    fn step_bodies(&mut self, dt: f64, iterations: usize) {
        let gravity = self.gravity;
        for body in &mut self.bodies {
            body.step(dt, gravity, iterations);
        }
    }

    /// Records every pair of bodies whose AABBs overlap, skipping pairs of
    /// two static bodies.
    fn broad_phase(&mut self) {
        for i in 0..self.bodies.len() {
            let (head, tail) = self.bodies.split_at_mut(i + 1);
            let body_a = &mut head[i];
            let aabb_a = body_a.aabb();
            let a_static = body_a.is_static;

            for (offset, body_b) in tail.iter_mut().enumerate() {
                if a_static && body_b.is_static {
                    continue;
                }
                if !aabb_a.overlaps(&body_b.aabb()) {
                    continue;
                }
                self.contact_pairs.push((i, i + 1 + offset));
            }
        }
    }

    /// Runs the exact collision test on each candidate pair; on a hit,
    /// separates the bodies along the MTV, builds a contact manifold and
    /// resolves it. Each pair sees the velocities already updated by the
    /// pairs resolved before it in this sub-step.
    fn narrow_phase(&mut self) {
        for pair_index in 0..self.contact_pairs.len() {
            let (i, j) = self.contact_pairs[pair_index];
            let (head, tail) = self.bodies.split_at_mut(j);
            let body_a = &mut head[i];
            let body_b = &mut tail[0];

            if let Some((normal, depth)) = collision::collide(body_a, body_b) {
                Self::separate_bodies(body_a, body_b, normal * depth);

                let (contact1, contact2, contact_count) =
                    collision::find_contact_points(body_a, body_b);
                let manifold =
                    ContactManifold::new(i, j, normal, depth, contact1, contact2, contact_count);
                self.resolve_collision(&manifold);
            }
        }
    }

    /// Pushes two colliding bodies apart along the minimum translation
    /// vector. A static body absorbs none of the correction; two dynamic
    /// bodies split it evenly.
    fn separate_bodies(body_a: &mut RigidBody, body_b: &mut RigidBody, mtv: Vec2) {
        if body_a.is_static {
            body_b.translate(mtv);
        } else if body_b.is_static {
            body_a.translate(-mtv);
        } else {
            body_a.translate(-mtv * 0.5);
            body_b.translate(mtv * 0.5);
        }
    }

    /// Sequential-impulse response with rotation and Coulomb friction,
    /// applied once for this manifold against the bodies' current
    /// velocities.
    ///
    /// Two passes: all normal impulses are computed and applied first, then
    /// friction impulses are computed against the post-normal-impulse
    /// relative velocities and clamped by each contact's normal impulse
    /// magnitude.
    fn resolve_collision(&mut self, contact: &ContactManifold) {
        let (head, tail) = self.bodies.split_at_mut(contact.body_b);
        let body_a = &mut head[contact.body_a];
        let body_b = &mut tail[0];

        let normal = contact.normal;
        let contact_count = contact.contact_count;

        trace!(
            body_a = contact.body_a,
            body_b = contact.body_b,
            depth = contact.depth,
            contact_count,
            "resolving contact"
        );

        let e = body_a
            .material
            .restitution
            .min(body_b.material.restitution);
        let static_friction =
            (body_a.material.static_friction + body_b.material.static_friction) * 0.5;
        let dynamic_friction =
            (body_a.material.dynamic_friction + body_b.material.dynamic_friction) * 0.5;

        let contacts = [contact.contact1, contact.contact2];
        let mut ra_list = [Vec2::ZERO; 2];
        let mut rb_list = [Vec2::ZERO; 2];
        let mut impulses = [Vec2::ZERO; 2];
        let mut j_list = [0.0f64; 2];

        // Pass 1: normal impulses against the incoming velocities.
        for i in 0..contact_count {
            let ra = contacts[i] - body_a.position();
            let rb = contacts[i] - body_b.position();
            ra_list[i] = ra;
            rb_list[i] = rb;

            let ra_perp = ra.perpendicular();
            let rb_perp = rb.perpendicular();

            let relative_velocity = (body_b.linear_velocity
                + rb_perp * body_b.angular_velocity)
                - (body_a.linear_velocity + ra_perp * body_a.angular_velocity);
            let contact_velocity = relative_velocity.dot(normal);

            // Already separating at this point: no impulse.
            if contact_velocity > 0.0 {
                continue;
            }

            let ra_perp_dot_n = ra_perp.dot(normal);
            let rb_perp_dot_n = rb_perp.dot(normal);
            let denom = body_a.inv_mass
                + body_b.inv_mass
                + ra_perp_dot_n * ra_perp_dot_n * body_a.inv_inertia
                + rb_perp_dot_n * rb_perp_dot_n * body_b.inv_inertia;

            let mut j = -(1.0 + e) * contact_velocity / denom;
            j /= contact_count as f64;

            j_list[i] = j;
            impulses[i] = normal * j;
        }

        for i in 0..contact_count {
            let impulse = impulses[i];
            body_a.linear_velocity -= impulse * body_a.inv_mass;
            body_a.angular_velocity -= ra_list[i].cross(impulse) * body_a.inv_inertia;
            body_b.linear_velocity += impulse * body_b.inv_mass;
            body_b.angular_velocity += rb_list[i].cross(impulse) * body_b.inv_inertia;
        }

        // Pass 2: friction against the post-normal-impulse velocities.
        let mut friction_impulses = [Vec2::ZERO; 2];
        for i in 0..contact_count {
            let ra = ra_list[i];
            let rb = rb_list[i];
            let ra_perp = ra.perpendicular();
            let rb_perp = rb.perpendicular();

            let relative_velocity = (body_b.linear_velocity
                + rb_perp * body_b.angular_velocity)
                - (body_a.linear_velocity + ra_perp * body_a.angular_velocity);

            let tangent = relative_velocity - normal * relative_velocity.dot(normal);
            if tangent.nearly_equal(Vec2::ZERO) {
                continue;
            }
            let tangent = tangent.normalize();

            let ra_perp_dot_t = ra_perp.dot(tangent);
            let rb_perp_dot_t = rb_perp.dot(tangent);
            let denom = body_a.inv_mass
                + body_b.inv_mass
                + ra_perp_dot_t * ra_perp_dot_t * body_a.inv_inertia
                + rb_perp_dot_t * rb_perp_dot_t * body_b.inv_inertia;

            let mut jt = -relative_velocity.dot(tangent) / denom;
            jt /= contact_count as f64;

            // Coulomb's law: static friction holds up to j * sf, beyond
            // that the contact slides with dynamic friction.
            let j = j_list[i];
            friction_impulses[i] = if jt.abs() <= j * static_friction {
                tangent * jt
            } else {
                tangent * (-j * dynamic_friction)
            };
        }

        for i in 0..contact_count {
            let impulse = friction_impulses[i];
            body_a.linear_velocity -= impulse * body_a.inv_mass;
            body_a.angular_velocity -= ra_list[i].cross(impulse) * body_a.inv_inertia;
            body_b.linear_velocity += impulse * body_b.inv_mass;
            body_b.angular_velocity += rb_list[i].cross(impulse) * body_b.inv_inertia;
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
