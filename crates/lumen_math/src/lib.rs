// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod aabb;
mod camera;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use camera::{Camera, CameraBasis};
pub use ray::Ray;
pub use transform::Mat4Ext;

/// Reflect a vector about a normal: `v - 2(v·n)n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}
