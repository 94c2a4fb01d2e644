//! Programmable stages.
//!
//! A vertex shader maps one [`VertexInput`] to a clip-space position; a
//! fragment shader maps one interpolated [`Fragment`] to a color. Both are
//! traits with blanket impls for plain closures, bundled into a
//! [`ShaderProgram`] that the draw calls borrow.

use glam::{Mat4, Vec2, Vec3, Vec4};
use lumen_core::{Color, Lerp, TextureSampler};
use lumen_math::Camera;

use crate::{GlError, GlResult};

/// One vertex as sliced out of the data buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexInput {
    /// Homogeneous position, padded with z = 0 and w = 1
    pub position: Vec4,
    /// Channels in 0..=255
    pub color: Color,
    pub normal: Vec3,
    pub uv: Vec2,
}

/// Transform bundle handed to every vertex shader invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrices {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    /// NDC → framebuffer pixels, set by `Gl::set_viewport`
    pub to_device: Mat4,
}

impl Default for Matrices {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            to_device: Mat4::IDENTITY,
        }
    }
}

impl Matrices {
    /// `projection * view * model`
    pub fn model_view_projection(&self) -> Mat4 {
        self.projection * self.view * self.model
    }

    /// Take view and projection from a camera.
    pub fn set_camera(&mut self, camera: &Camera) {
        self.view = camera.view_matrix();
        self.projection = camera.projection_matrix();
    }
}

/// Interpolated per-pixel inputs to the fragment stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub color: Color,
    pub uv: Vec2,
    pub normal: Vec3,
    /// NDC depth; smaller is closer
    pub depth: f32,
}

impl Lerp for Fragment {
    fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            color: Lerp::lerp(self.color, other.color, t),
            uv: Lerp::lerp(self.uv, other.uv, t),
            normal: Lerp::lerp(self.normal, other.normal, t),
            depth: Lerp::lerp(self.depth, other.depth, t),
        }
    }
}

pub trait VertexShader {
    /// Clip-space position of `input`.
    fn process(&self, input: &VertexInput, matrices: &Matrices) -> Vec4;
}

impl<F> VertexShader for F
where
    F: Fn(&VertexInput, &Matrices) -> Vec4,
{
    fn process(&self, input: &VertexInput, matrices: &Matrices) -> Vec4 {
        self(input, matrices)
    }
}

pub trait FragmentShader {
    /// Output color (channels in 0..=255). `texture` is the sampler bound
    /// on the pipeline, if any.
    fn shade(&self, fragment: &Fragment, texture: Option<&dyn TextureSampler>) -> Color;
}

impl<F> FragmentShader for F
where
    F: Fn(&Fragment, Option<&dyn TextureSampler>) -> Color,
{
    fn shade(&self, fragment: &Fragment, texture: Option<&dyn TextureSampler>) -> Color {
        self(fragment, texture)
    }
}

/// Returns the input position untouched; for data already in screen
/// or clip space.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThrough;

impl VertexShader for PassThrough {
    fn process(&self, input: &VertexInput, _matrices: &Matrices) -> Vec4 {
        input.position
    }
}

/// `projection * view * model * position`
#[derive(Debug, Default, Clone, Copy)]
pub struct ModelViewProjection;

impl VertexShader for ModelViewProjection {
    fn process(&self, input: &VertexInput, matrices: &Matrices) -> Vec4 {
        matrices.model_view_projection() * input.position
    }
}

/// Interpolated vertex color.
#[derive(Debug, Default, Clone, Copy)]
pub struct VertexColor;

impl FragmentShader for VertexColor {
    fn shade(&self, fragment: &Fragment, _texture: Option<&dyn TextureSampler>) -> Color {
        fragment.color
    }
}

/// Bound texture at the fragment uv, multiplied by the vertex color.
/// Falls back to the vertex color when no texture is bound.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextureModulate;

impl FragmentShader for TextureModulate {
    fn shade(&self, fragment: &Fragment, texture: Option<&dyn TextureSampler>) -> Color {
        let Some(texture) = texture else {
            return fragment.color;
        };
        let [r, g, b, a] = texture.sample_2d(fragment.uv.x, fragment.uv.y);
        let c = fragment.color;
        Color::with_alpha(c.r * r, c.g * g, c.b * b, c.a * a)
    }
}

/// A vertex and fragment shader pair. Draw calls refuse to run until
/// both stages are bound.
#[derive(Default)]
pub struct ShaderProgram {
    vertex: Option<Box<dyn VertexShader>>,
    fragment: Option<Box<dyn FragmentShader>>,
}

impl ShaderProgram {
    pub fn new() -> Self {
        Self::default()
    }

    /// [`ModelViewProjection`] with [`VertexColor`].
    pub fn flat_color() -> Self {
        Self::new()
            .with_vertex_shader(ModelViewProjection)
            .with_fragment_shader(VertexColor)
    }

    pub fn with_vertex_shader(mut self, shader: impl VertexShader + 'static) -> Self {
        self.set_vertex_shader(shader);
        self
    }

    pub fn with_fragment_shader(mut self, shader: impl FragmentShader + 'static) -> Self {
        self.set_fragment_shader(shader);
        self
    }

    pub fn set_vertex_shader(&mut self, shader: impl VertexShader + 'static) {
        self.vertex = Some(Box::new(shader));
    }

    pub fn set_fragment_shader(&mut self, shader: impl FragmentShader + 'static) {
        self.fragment = Some(Box::new(shader));
    }

    pub fn vertex_shader(&self) -> GlResult<&dyn VertexShader> {
        self.vertex.as_deref().ok_or(GlError::MissingVertexShader)
    }

    pub fn fragment_shader(&self) -> GlResult<&dyn FragmentShader> {
        self.fragment.as_deref().ok_or(GlError::MissingFragmentShader)
    }
}
