//! Surface description and the per-hit shading bundle.

use crate::{Intersection, Vec2, Vec3};

/// Phong-style surface coefficients.
///
/// `color` is linear RGB in [0, 1]. `refractivity` and
/// `refractive_index` are carried for scene descriptions but no
/// transmission is traced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Vec3,
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub shininess: f32,
    pub reflectivity: f32,
    pub refractivity: f32,
    pub refractive_index: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Vec3::ZERO,
            ambient: 0.0,
            diffuse: 0.0,
            specular: 0.0,
            shininess: 0.0,
            reflectivity: 0.0,
            refractivity: 0.0,
            refractive_index: 0.0,
        }
    }
}

impl Material {
    /// A matte surface: mostly diffuse with a little ambient.
    pub fn diffuse(color: Vec3) -> Self {
        Self {
            color,
            ambient: 0.1,
            diffuse: 0.9,
            ..Self::default()
        }
    }

    /// A shiny surface with a tight highlight.
    pub fn plastic(color: Vec3, shininess: f32) -> Self {
        Self {
            color,
            ambient: 0.1,
            diffuse: 0.7,
            specular: 0.5,
            shininess,
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    pub fn with_ambient(mut self, ambient: f32) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn with_diffuse(mut self, diffuse: f32) -> Self {
        self.diffuse = diffuse;
        self
    }

    pub fn with_specular(mut self, specular: f32, shininess: f32) -> Self {
        self.specular = specular;
        self.shininess = shininess;
        self
    }

    pub fn with_reflectivity(mut self, reflectivity: f32) -> Self {
        self.reflectivity = reflectivity;
        self
    }
}

/// Everything a procedural texture may read or override at a hit.
///
/// Built from the hit shape's material; `resulting_color` starts as the
/// material color and is what lighting uses as the surface color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadeParameters {
    pub resulting_color: Vec3,
    pub color: Vec3,
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub shininess: f32,
    pub reflectivity: f32,
    pub refractivity: f32,
    pub refractive_index: f32,
    /// World-space hit position
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
    pub uvw: Vec3,
}

impl ShadeParameters {
    pub fn new(material: &Material, hit: &Intersection) -> Self {
        Self {
            resulting_color: material.color,
            color: material.color,
            ambient: material.ambient,
            diffuse: material.diffuse,
            specular: material.specular,
            shininess: material.shininess,
            reflectivity: material.reflectivity,
            refractivity: material.refractivity,
            refractive_index: material.refractive_index,
            position: hit.position,
            normal: hit.normal,
            uv: hit.uv,
            uvw: hit.uvw,
        }
    }
}
