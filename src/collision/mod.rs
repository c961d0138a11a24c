pub mod aabb;
pub mod contact;
pub mod detection;
pub mod manifold;

// Re-export key types and entry points
pub use aabb::Aabb;
pub use contact::{find_contact_points, point_segment_distance};
pub use detection::{collide, intersect_circle_polygon, intersect_circles, intersect_polygons};
pub use manifold::ContactManifold;
