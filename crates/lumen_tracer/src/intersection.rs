use crate::{Ray, Shape, Vec2, Vec3};

/// Result of intersecting a ray with a shape or a scene.
///
/// A miss is a first-class value ([`Intersection::none`]) with an infinite
/// `hit_distance` and no shape, so scene code can compare distances
/// without unwrapping.
#[derive(Debug, Clone, Copy)]
pub struct Intersection<'a> {
    /// World-space hit point
    pub position: Vec3,
    /// Unit world-space surface normal
    pub normal: Vec3,
    /// Mirror bounce leaving the hit point, one generation deeper
    pub reflected_ray: Ray,
    /// Signed distance from the ray origin along the ray
    pub hit_distance: f32,
    pub hit_shape: Option<&'a Shape>,
    pub uv: Vec2,
    /// Object-space texture coordinates (shape-specific)
    pub uvw: Vec3,
    /// Generation of the ray that produced this hit
    pub generation: u32,
}

impl<'a> Intersection<'a> {
    /// The "no hit" value.
    pub fn none() -> Self {
        Self {
            position: Vec3::ZERO,
            normal: Vec3::ZERO,
            reflected_ray: Ray::default(),
            hit_distance: f32::INFINITY,
            hit_shape: None,
            uv: Vec2::ZERO,
            uvw: Vec3::ZERO,
            generation: 0,
        }
    }

    pub fn is_hit(&self) -> bool {
        self.hit_shape.is_some()
    }
}

impl<'a> Default for Intersection<'a> {
    fn default() -> Self {
        Self::none()
    }
}
