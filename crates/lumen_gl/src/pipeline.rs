//! Pipeline state and the draw calls.
//!
//! Per draw: fetch each vertex through the layout, run the vertex shader,
//! divide by w, map to pixels with the viewport matrix, assemble
//! triangles, then scan-convert each one with the fragment shader.

use bitflags::bitflags;
use glam::{Mat4, Vec3};
use lumen_core::primitives::fill_triangle_vertex_data;
use lumen_core::{Color, FrameBuffer, TextureSampler};

use crate::{
    Fragment, FragmentShader, GlError, GlResult, Matrices, Primitive, ShaderProgram, Vertex, VertexLayout,
    VertexShader,
};

bitflags! {
    /// Buffers affected by [`Gl::clear`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearMask: u32 {
        const COLOR = 0x0000_4000;
        const DEPTH = 0x0000_0100;
    }
}

/// Vertex colors substituted on back-facing triangles when the winding
/// debug palette is enabled.
pub const WINDING_PALETTE: [Color; 3] = [
    Color::new(255.0, 0.0, 255.0),
    Color::new(0.0, 255.0, 255.0),
    Color::new(255.0, 255.0, 0.0),
];

/// Counters from one draw call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub vertices: usize,
    pub triangles: usize,
    pub back_facing: usize,
    pub fragments: usize,
}

/// A vertex after the vertex stage, in framebuffer pixels.
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    /// x, y in pixels; z is NDC depth
    position: Vec3,
    fragment: Fragment,
}

/// Immediate-mode rasterizer state.
pub struct Gl {
    data: Vec<f32>,
    indices: Vec<u32>,
    layout: VertexLayout,
    pub matrices: Matrices,
    background: Color,
    clear_depth: f32,
    depth_test: bool,
    border: Option<Color>,
    winding_debug: bool,
    texture: Option<Box<dyn TextureSampler>>,
}

impl Default for Gl {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            indices: Vec::new(),
            layout: VertexLayout::default(),
            matrices: Matrices::default(),
            background: Color::BLACK,
            clear_depth: 1.0,
            depth_test: false,
            border: None,
            winding_debug: false,
            texture: None,
        }
    }
}

impl Gl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_data_buffer(&mut self, data: Vec<f32>) {
        self.data = data;
    }

    /// Raw native-endian `f32` bytes.
    pub fn set_data_bytes(&mut self, bytes: &[u8]) -> GlResult<()> {
        if bytes.len() % 4 != 0 {
            return Err(GlError::MisalignedBytes(bytes.len()));
        }
        self.data = bytes
            .chunks_exact(4)
            .map(bytemuck::pod_read_unaligned::<f32>)
            .collect();
        Ok(())
    }

    /// Upload [`Vertex`] records and switch to their layout.
    pub fn set_vertices(&mut self, vertices: &[Vertex]) {
        self.data = bytemuck::cast_slice::<Vertex, f32>(vertices).to_vec();
        self.layout = Vertex::layout();
    }

    pub fn set_index_buffer(&mut self, indices: Vec<u32>) {
        self.indices = indices;
    }

    pub fn set_layout(&mut self, layout: VertexLayout) {
        self.layout = layout;
    }

    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    /// Map NDC `[-1, 1]^2` onto the pixel rectangle at (`x`, `y`) with
    /// y pointing down.
    pub fn set_viewport(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.matrices.to_device = Mat4::from_translation(Vec3::new(x, y, 0.0))
            * Mat4::from_translation(Vec3::new(width / 2.0, height / 2.0, 0.0))
            * Mat4::from_scale(Vec3::new(width / 2.0, -height / 2.0, 1.0));
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.background = color;
    }

    pub fn set_clear_depth(&mut self, depth: f32) {
        self.clear_depth = depth;
    }

    pub fn enable_depth_test(&mut self, enabled: bool) {
        self.depth_test = enabled;
    }

    /// Outline every triangle in `color`, or stop outlining with `None`.
    pub fn set_border(&mut self, color: Option<Color>) {
        self.border = color;
    }

    pub fn enable_winding_debug(&mut self, enabled: bool) {
        self.winding_debug = enabled;
    }

    pub fn bind_texture(&mut self, texture: impl TextureSampler + 'static) {
        self.texture = Some(Box::new(texture));
    }

    pub fn unbind_texture(&mut self) {
        self.texture = None;
    }

    pub fn clear(&self, fb: &mut FrameBuffer, mask: ClearMask) {
        if mask.contains(ClearMask::COLOR) {
            fb.clear(self.background);
        }
        if mask.contains(ClearMask::DEPTH) {
            fb.clear_z_buffer(self.clear_depth);
        }
    }

    /// Draw the first `count` vertices of the data buffer.
    pub fn draw_arrays(
        &self,
        fb: &mut FrameBuffer,
        program: &ShaderProgram,
        primitive: Primitive,
        count: usize,
    ) -> GlResult<DrawStats> {
        let (vertex_shader, fragment_shader) = (program.vertex_shader()?, program.fragment_shader()?);
        self.layout.validate()?;

        let available = self.layout.vertex_count(self.data.len());
        if count > available {
            return Err(GlError::BufferOverrun {
                needed: count * self.layout.stride,
                available: self.data.len(),
            });
        }

        let screen = self.process_vertices(vertex_shader, count)?;
        let triangles = primitive
            .assemble(count)
            .into_iter()
            .map(|[a, b, c]| [screen[a], screen[b], screen[c]]);

        let mut stats = self.rasterize(fb, fragment_shader, triangles);
        stats.vertices = count;
        log::debug!("draw_arrays({primitive:?}, {count}): {stats:?}");
        Ok(stats)
    }

    /// Draw `count` entries of the index buffer.
    pub fn draw_elements(
        &self,
        fb: &mut FrameBuffer,
        program: &ShaderProgram,
        primitive: Primitive,
        count: usize,
    ) -> GlResult<DrawStats> {
        let (vertex_shader, fragment_shader) = (program.vertex_shader()?, program.fragment_shader()?);
        self.layout.validate()?;

        let indices = self.indices.get(..count).ok_or(GlError::IndexBufferTooShort {
            needed: count,
            available: self.indices.len(),
        })?;

        let available = self.layout.vertex_count(self.data.len());
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= available) {
            return Err(GlError::IndexOutOfRange {
                index,
                vertices: available,
            });
        }

        let screen = self.process_vertices(vertex_shader, available)?;
        let triangles = primitive.assemble(count).into_iter().map(|[a, b, c]| {
            [
                screen[indices[a] as usize],
                screen[indices[b] as usize],
                screen[indices[c] as usize],
            ]
        });

        let mut stats = self.rasterize(fb, fragment_shader, triangles);
        stats.vertices = count;
        log::debug!("draw_elements({primitive:?}, {count}): {stats:?}");
        Ok(stats)
    }

    /// Vertex stage for the first `count` vertices.
    ///
    /// A clip w of zero is not trapped; the resulting infinities flow
    /// through to the rasterizer.
    fn process_vertices(&self, shader: &dyn VertexShader, count: usize) -> GlResult<Vec<ScreenVertex>> {
        (0..count)
            .map(|i| {
                let input = self.layout.fetch(&self.data, i)?;
                let clip = shader.process(&input, &self.matrices);
                let ndc = clip.truncate() / clip.w;
                let device = self.matrices.to_device.transform_point3(ndc);

                Ok(ScreenVertex {
                    position: Vec3::new(device.x, device.y, ndc.z),
                    fragment: Fragment {
                        color: input.color,
                        uv: input.uv,
                        normal: input.normal,
                        depth: ndc.z,
                    },
                })
            })
            .collect()
    }

    fn rasterize(
        &self,
        fb: &mut FrameBuffer,
        shader: &dyn FragmentShader,
        triangles: impl Iterator<Item = [ScreenVertex; 3]>,
    ) -> DrawStats {
        let texture = self.texture.as_deref();
        let mut stats = DrawStats::default();

        for mut triangle in triangles {
            stats.triangles += 1;

            if is_back_facing(&triangle) {
                stats.back_facing += 1;
                if self.winding_debug {
                    for (vertex, color) in triangle.iter_mut().zip(WINDING_PALETTE) {
                        vertex.fragment.color = color;
                    }
                }
            }

            let vertices = triangle.map(|v| (v.position, v.fragment));
            stats.fragments += fill_triangle_vertex_data(fb, vertices, self.border, self.depth_test, |fragment| {
                shader.shade(fragment, texture)
            });
        }

        stats
    }
}

/// Screen-space winding test. With y pointing down, a positive cross
/// product is clockwise on screen.
fn is_back_facing(triangle: &[ScreenVertex; 3]) -> bool {
    let [a, b, c] = triangle.map(|v| v.position.truncate());
    let (e1, e2) = (b - a, c - a);
    e1.x * e2.y - e1.y * e2.x > 0.0
}
