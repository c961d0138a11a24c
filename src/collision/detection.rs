//! Narrow-phase intersection tests.
//!
//! The `intersect_*` routines are pure geometry: given centers, radii and
//! world-space vertex lists they report the minimum-translation-vector as a
//! unit normal plus a penetration depth, or `None` when the shapes are
//! disjoint. [`collide`] dispatches over the shape kinds of two bodies.

use crate::math::vec2::Vec2;
use crate::objects::rigid_body::RigidBody;
use crate::shapes::Shape;

/// Circle-circle intersection. The normal points from A towards B.
///
/// Coincident centers are reported as a hit with the fixed normal (1, 0) and
/// depth equal to the radii sum, so the caller never sees NaN.
pub fn intersect_circles(
    center_a: Vec2,
    radius_a: f64,
    center_b: Vec2,
    radius_b: f64,
) -> Option<(Vec2, f64)> {
    let distance = center_a.distance(center_b);
    let radii = radius_a + radius_b;

    if distance >= radii {
        return None;
    }
    if distance == 0.0 {
        return Some((Vec2::new(1.0, 0.0), radii));
    }

    let normal = (center_b - center_a).normalize();
    Some((normal, radii - distance))
}

/// Polygon-polygon intersection via the separating axis theorem. The normal
/// points from A towards B.
///
/// Candidate axes (edge perpendiculars of both polygons) are left
/// unnormalized during the scan; raw overlaps are compared to pick the
/// winning axis and only that one is normalized, with the depth rescaled by
/// the axis length. The scan short-circuits on the first separating axis.
pub fn intersect_polygons(
    center_a: Vec2,
    vertices_a: &[Vec2],
    center_b: Vec2,
    vertices_b: &[Vec2],
) -> Option<(Vec2, f64)> {
    let mut normal = Vec2::ZERO;
    let mut depth = f64::MAX;

    for vertices in [vertices_a, vertices_b] {
        for i in 0..vertices.len() {
            let va = vertices[i];
            let vb = vertices[(i + 1) % vertices.len()];
            let axis = (vb - va).perpendicular();

            let (min_a, max_a) = project_vertices(vertices_a, axis);
            let (min_b, max_b) = project_vertices(vertices_b, axis);
            if min_a >= max_b || min_b >= max_a {
                return None;
            }

            let axis_depth = (max_b - min_a).min(max_a - min_b);
            if axis_depth < depth {
                depth = axis_depth;
                normal = axis;
            }
        }
    }

    depth /= normal.length();
    let mut normal = normal.normalize();

    if (center_b - center_a).dot(normal) < 0.0 {
        normal = -normal;
    }

    Some((normal, depth))
}

/// Circle-polygon intersection via SAT. The polygon is treated as shape A,
/// the circle as shape B: the returned normal points from the polygon
/// towards the circle.
///
/// Unlike [`intersect_polygons`], every candidate axis is normalized during
/// the scan; the extra circle axis (circle center towards the closest
/// polygon vertex) has no natural edge length to defer.
pub fn intersect_circle_polygon(
    polygon_center: Vec2,
    vertices: &[Vec2],
    circle_center: Vec2,
    radius: f64,
) -> Option<(Vec2, f64)> {
    let mut normal = Vec2::ZERO;
    let mut depth = f64::MAX;

    for i in 0..vertices.len() {
        let va = vertices[i];
        let vb = vertices[(i + 1) % vertices.len()];
        let axis = (vb - va).perpendicular().normalize();

        let (min_a, max_a) = project_vertices(vertices, axis);
        let (min_b, max_b) = project_circle(circle_center, radius, axis);
        if min_a >= max_b || min_b >= max_a {
            return None;
        }

        let axis_depth = (max_b - min_a).min(max_a - min_b);
        if axis_depth < depth {
            depth = axis_depth;
            normal = axis;
        }
    }

    let closest = closest_vertex_to(circle_center, vertices);
    let axis = (vertices[closest] - circle_center).normalize();

    let (min_a, max_a) = project_vertices(vertices, axis);
    let (min_b, max_b) = project_circle(circle_center, radius, axis);
    if min_a >= max_b || min_b >= max_a {
        return None;
    }

    let axis_depth = (max_b - min_a).min(max_a - min_b);
    if axis_depth < depth {
        depth = axis_depth;
        normal = axis;
    }

    if (circle_center - polygon_center).dot(normal) < 0.0 {
        normal = -normal;
    }

    Some((normal, depth))
}

/// Exact collision test for a candidate pair, dispatching on the ordered
/// shape kinds. The normal always points from `body_a` towards `body_b`;
/// the circle-vs-polygon case negates the generic routine's result to keep
/// that convention.
pub fn collide(body_a: &mut RigidBody, body_b: &mut RigidBody) -> Option<(Vec2, f64)> {
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
        (Some(ra), Some(rb)) => intersect_circles(center_a, ra, center_b, rb),
        (Some(ra), None) => {
            intersect_circle_polygon(center_b, body_b.transformed_vertices(), center_a, ra)
                .map(|(normal, depth)| (-normal, depth))
        }
        (None, Some(rb)) => {
            intersect_circle_polygon(center_a, body_a.transformed_vertices(), center_b, rb)
        }
        (None, None) => {
            let vertices_a = body_a.transformed_vertices();
            let vertices_b = body_b.transformed_vertices();
            intersect_polygons(center_a, vertices_a, center_b, vertices_b)
        }
    }
}

fn project_vertices(vertices: &[Vec2], axis: Vec2) -> (f64, f64) {
    let mut min = f64::MAX;
    let mut max = f64::MIN;
    for v in vertices {
        let projection = v.dot(axis);
        min = min.min(projection);
        max = max.max(projection);
    }
    (min, max)
}

fn project_circle(center: Vec2, radius: f64, axis: Vec2) -> (f64, f64) {
    let direction = axis.normalize();
    let extent = direction * radius;

    let mut min = (center + extent).dot(axis);
    let mut max = (center - extent).dot(axis);
    if min > max {
        std::mem::swap(&mut min, &mut max);
    }
    (min, max)
}

fn closest_vertex_to(point: Vec2, vertices: &[Vec2]) -> usize {
    let mut result = 0;
    let mut min_dist_sq = f64::MAX;
    for (i, v) in vertices.iter().enumerate() {
        let dist_sq = v.distance_squared(point);
        if dist_sq < min_dist_sq {
            min_dist_sq = dist_sq;
            result = i;
        }
    }
    result
}
