use crate::math::vec2::Vec2;

/// A convex polygon defined by its vertices in local space, ordered
/// consistently around the boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Vec2>,
}

impl Polygon {
    /// Creates a new polygon from a list of local-space vertices.
    ///
    /// Panics if fewer than 3 vertices are provided.
    pub fn new(vertices: Vec<Vec2>) -> Self {
        assert!(vertices.len() >= 3, "Polygon must have at least 3 vertices");
        Polygon { vertices }
    }

    /// An axis-aligned box of the given dimensions, centered on the local
    /// origin, vertices ordered clockwise starting at the top-left corner.
    pub fn new_box(width: f64, height: f64) -> Self {
        let left = -width / 2.0;
        let right = left + width;
        let bottom = -height / 2.0;
        let top = bottom + height;

        Polygon {
            vertices: vec![
                Vec2::new(left, top),
                Vec2::new(right, top),
                Vec2::new(right, bottom),
                Vec2::new(left, bottom),
            ],
        }
    }

    /// Area of the polygon via the shoelace formula. Winding-order
    /// independent (absolute value).
    pub fn area(&self) -> f64 {
        let n = self.vertices.len();
        let mut total = 0.0;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            total += a.cross(b);
        }
        (total / 2.0).abs()
    }
}
