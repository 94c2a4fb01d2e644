//! Lumen Tracer - recursive ray tracing
//!
//! Analytic intersection against unit spheres, cubes, cylinders and
//! triangles placed by a translate/rotate/scale hierarchy, Phong-style
//! shading with shadows and mirror reflections, and procedural 3D
//! textures. Rendering is driven row by row through a [`RenderPass`] so
//! a host can interleave it with other work or cancel it.

mod cube;
mod cylinder;
mod error;
mod intersection;
mod light;
mod material;
mod procedural;
mod registry;
mod renderer;
mod scene;
mod shape;
mod sphere;
mod triangle;

pub use cube::Cube;
pub use cylinder::Cylinder;
pub use error::{RenderError, RenderResult};
pub use intersection::Intersection;
pub use light::{Light, LightKind};
pub use material::{Material, ShadeParameters};
pub use procedural::{Checkerboard, CheckerboardReflect, MyTexture, Perlin, ProceduralTexture, TextureRegistry};
pub use registry::SceneRegistry;
pub use renderer::{CancelHandle, PassStatus, RayTracer, RenderPass, RenderStats};
pub use scene::Scene;
pub use shape::{Geometry, LocalHit, Primitive, Shape};
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export common math types from lumen_math
pub use lumen_math::{Aabb, Camera, Ray, Vec2, Vec3};
