//! Contact-point generation for already-colliding bodies.
//!
//! At most two world-space contact points are ever reported: one for any
//! pairing involving a circle or a vertex, two for the edge-edge case that
//! dominates resting box contacts.

use crate::math::{nearly_equal, vec2::Vec2};
use crate::objects::rigid_body::RigidBody;
use crate::shapes::Shape;

/// Finds the world-space contact points for a colliding pair. Returns
/// `(contact1, contact2, count)` with `count` in {1, 2}; `contact2` is only
/// meaningful when `count` is 2.
pub fn find_contact_points(
    body_a: &mut RigidBody,
    body_b: &mut RigidBody,
) -> (Vec2, Vec2, usize) {
    let center_a = body_a.position();
    let center_b = body_b.position();

    let radius_a = match body_a.shape() {
        Shape::Circle(c) => Some(c.radius),
        Shape::Polygon(_) => None,
    };
    let radius_b = match body_b.shape() {
        Shape::Circle(c) => Some(c.radius),
        Shape::Polygon(_) => None,
    };

    match (radius_a, radius_b) {
        (Some(ra), Some(_)) => {
            let contact = circles_contact_point(center_a, ra, center_b);
            (contact, Vec2::ZERO, 1)
        }
        (Some(_), None) => {
            let contact = circle_polygon_contact_point(center_a, body_b.transformed_vertices());
            (contact, Vec2::ZERO, 1)
        }
        (None, Some(_)) => {
            let contact = circle_polygon_contact_point(center_b, body_a.transformed_vertices());
            (contact, Vec2::ZERO, 1)
        }
        (None, None) => {
            let vertices_a = body_a.transformed_vertices();
            let vertices_b = body_b.transformed_vertices();
            polygons_contact_points(vertices_a, vertices_b)
        }
    }
}

/// Squared distance from `p` to the segment `ab`, plus the closest point on
/// the segment.
pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> (f64, Vec2) {
    let ab = b - a;
    let ap = p - a;

    let d = ap.dot(ab) / ab.length_squared();
    let contact = if d <= 0.0 {
        a
    } else if d >= 1.0 {
        b
    } else {
        a + ab * d
    };

    (contact.distance_squared(p), contact)
}

fn circles_contact_point(center_a: Vec2, radius_a: f64, center_b: Vec2) -> Vec2 {
    let direction = (center_b - center_a).normalize();
    center_a + direction * radius_a
}

fn circle_polygon_contact_point(circle_center: Vec2, vertices: &[Vec2]) -> Vec2 {
    let mut contact = Vec2::ZERO;
    let mut min_dist_sq = f64::MAX;

    for i in 0..vertices.len() {
        let va = vertices[i];
        let vb = vertices[(i + 1) % vertices.len()];

        let (dist_sq, cp) = point_segment_distance(circle_center, va, vb);
        if dist_sq < min_dist_sq {
            min_dist_sq = dist_sq;
            contact = cp;
        }
    }
    contact
}

fn polygons_contact_points(vertices_a: &[Vec2], vertices_b: &[Vec2]) -> (Vec2, Vec2, usize) {
    let mut contact1 = Vec2::ZERO;
    let mut contact2 = Vec2::ZERO;
    let mut count = 0;
    let mut min_dist_sq = f64::MAX;

    // Every vertex of each polygon against every edge of the other. A
    // nearly-equal distance from a spatially distinct point promotes the
    // result to two contacts; a strictly smaller distance resets to one.
    for (points, edges) in [(vertices_a, vertices_b), (vertices_b, vertices_a)] {
        for &p in points {
            for j in 0..edges.len() {
                let va = edges[j];
                let vb = edges[(j + 1) % edges.len()];

                let (dist_sq, cp) = point_segment_distance(p, va, vb);

                if nearly_equal(dist_sq, min_dist_sq) {
                    if !cp.nearly_equal(contact1) {
                        contact2 = cp;
                        count = 2;
                    }
                } else if dist_sq < min_dist_sq {
                    min_dist_sq = dist_sq;
                    count = 1;
                    contact1 = cp;
                }
            }
        }
    }

    (contact1, contact2, count)
}
