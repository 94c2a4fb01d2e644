//! Transformable shapes and the object-space intersection seam.
//!
//! Every shape is a canonical primitive (unit sphere, [-1, 1] cube,
//! radius-1 height-2 cylinder, or a triangle) placed in the world by
//! `model = T * R * S`. Rays are carried into object space with the
//! inverse model matrix, intersected analytically there, and the hit is
//! lifted back out.

use lumen_math::{reflect, Mat4, Mat4Ext};

use crate::{
    Aabb, Cube, Cylinder, Intersection, Material, Ray, RenderResult, Sphere, Triangle, Vec3,
};

/// An object-space hit produced by a [`Primitive`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalHit {
    /// Parameter along the (normalized) object-space ray
    pub t: f32,
    pub point: Vec3,
    /// Outward object-space normal, not necessarily unit length
    pub normal: Vec3,
    pub uvw: Vec3,
}

/// Object-space intersection capability shared by all geometry.
pub trait Primitive {
    /// Intersect a ray whose direction is unit length. Returns the nearest
    /// hit in front of the origin, if any.
    fn intersect_local(&self, ray: &Ray) -> RenderResult<Option<LocalHit>>;

    /// Points whose transformed hull bounds the primitive.
    fn bound_points(&self) -> Vec<Vec3>;

    /// Extra margin added around the world bounding box.
    fn bounds_padding(&self) -> f32 {
        0.0
    }
}

/// The closed set of supported geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Sphere(Sphere),
    Cube(Cube),
    Cylinder(Cylinder),
    Triangle(Triangle),
}

impl Primitive for Geometry {
    fn intersect_local(&self, ray: &Ray) -> RenderResult<Option<LocalHit>> {
        match self {
            Geometry::Sphere(s) => s.intersect_local(ray),
            Geometry::Cube(c) => c.intersect_local(ray),
            Geometry::Cylinder(c) => c.intersect_local(ray),
            Geometry::Triangle(t) => t.intersect_local(ray),
        }
    }

    fn bound_points(&self) -> Vec<Vec3> {
        match self {
            Geometry::Sphere(s) => s.bound_points(),
            Geometry::Cube(c) => c.bound_points(),
            Geometry::Cylinder(c) => c.bound_points(),
            Geometry::Triangle(t) => t.bound_points(),
        }
    }

    fn bounds_padding(&self) -> f32 {
        match self {
            Geometry::Sphere(s) => s.bounds_padding(),
            Geometry::Cube(c) => c.bounds_padding(),
            Geometry::Cylinder(c) => c.bounds_padding(),
            Geometry::Triangle(t) => t.bounds_padding(),
        }
    }
}

/// A piece of geometry with material, optional procedural texture and
/// a transform.
///
/// The world bounding box is recomputed by every transform mutator.
#[derive(Debug, Clone)]
pub struct Shape {
    pub material: Material,
    /// Name of a procedural texture in the scene's texture registry
    pub texture: Option<String>,
    translation: Mat4,
    rotation: Mat4,
    scale: Mat4,
    bbox: Option<Aabb>,
    geometry: Geometry,
}

impl Shape {
    pub fn new(geometry: Geometry) -> Self {
        let mut shape = Self {
            material: Material::default(),
            texture: None,
            translation: Mat4::IDENTITY,
            rotation: Mat4::IDENTITY,
            scale: Mat4::IDENTITY,
            bbox: None,
            geometry,
        };
        shape.compute_bounding_box();
        shape
    }

    pub fn sphere() -> Self {
        Self::new(Geometry::Sphere(Sphere::default()))
    }

    pub fn cube() -> Self {
        Self::new(Geometry::Cube(Cube))
    }

    pub fn cylinder() -> Self {
        Self::new(Geometry::Cylinder(Cylinder::default()))
    }

    pub fn triangle(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self::new(Geometry::Triangle(Triangle::new(v0, v1, v2)))
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_texture(mut self, name: impl Into<String>) -> Self {
        self.texture = Some(name.into());
        self
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Append a translation.
    pub fn translate(&mut self, offset: Vec3) -> &mut Self {
        self.translation *= Mat4::from_translation(offset);
        self.compute_bounding_box();
        self
    }

    /// Append a rotation about the object x axis. Angle in degrees.
    pub fn rotate_x(&mut self, degrees: f32) -> &mut Self {
        self.rotation *= Mat4::from_rotation_x(degrees.to_radians());
        self.compute_bounding_box();
        self
    }

    pub fn rotate_y(&mut self, degrees: f32) -> &mut Self {
        self.rotation *= Mat4::from_rotation_y(degrees.to_radians());
        self.compute_bounding_box();
        self
    }

    pub fn rotate_z(&mut self, degrees: f32) -> &mut Self {
        self.rotation *= Mat4::from_rotation_z(degrees.to_radians());
        self.compute_bounding_box();
        self
    }

    /// Append a (possibly non-uniform) scale.
    pub fn scale(&mut self, factors: Vec3) -> &mut Self {
        self.scale *= Mat4::from_scale(factors);
        self.compute_bounding_box();
        self
    }

    /// `T * R * S`
    pub fn model_matrix(&self) -> Mat4 {
        self.translation * self.rotation * self.scale
    }

    /// Carry a world ray into object space. The direction is normalized;
    /// the generation is preserved.
    pub fn ray_in_object_space(&self, ray: &Ray) -> Ray {
        let inverse = self.model_matrix().inverse();
        Ray::with_generation(
            inverse.transform_point3(ray.origin),
            inverse.transform_vector3(ray.direction).normalize(),
            ray.generation,
        )
    }

    pub fn transform_point_to_world_space(&self, point: Vec3) -> Vec3 {
        self.model_matrix().transform_point3(point)
    }

    /// Inverse-transpose of the model's linear part, renormalized.
    pub fn transform_normal_to_world_space(&self, normal: Vec3) -> Vec3 {
        self.model_matrix().transform_normal3(normal)
    }

    pub fn bounding_box(&self) -> Option<Aabb> {
        self.bbox
    }

    /// Rebuild the world bounding box from the transformed bound points.
    pub fn compute_bounding_box(&mut self) {
        let model = self.model_matrix();
        let padding = self.geometry.bounds_padding();
        self.bbox = model
            .transform_bounds(&self.geometry.bound_points())
            .map(|b| b.pad(padding));
    }

    /// Slab test against the world bounding box; `true` when none exists.
    pub fn intersect_bounding_box(&self, ray: &Ray) -> bool {
        self.bbox.map_or(true, |b| b.hit(ray))
    }

    /// Intersect a world-space ray with this shape.
    pub fn intersect(&self, ray: &Ray, use_bounding_box: bool) -> RenderResult<Intersection<'_>> {
        if use_bounding_box && !self.intersect_bounding_box(ray) {
            return Ok(Intersection::none());
        }

        let local_ray = self.ray_in_object_space(ray);
        let Some(hit) = self.geometry.intersect_local(&local_ray)? else {
            return Ok(Intersection::none());
        };

        let position = self.transform_point_to_world_space(hit.point);
        let normal = self.transform_normal_to_world_space(hit.normal);
        let hit_distance = (position - ray.origin).dot(ray.direction.normalize());

        Ok(Intersection {
            position,
            normal,
            reflected_ray: Ray::with_generation(
                position,
                reflect(ray.direction, normal),
                ray.generation + 1,
            ),
            hit_distance,
            hit_shape: Some(self),
            uv: hit.uvw.truncate(),
            uvw: hit.uvw,
            generation: ray.generation,
        })
    }
}
