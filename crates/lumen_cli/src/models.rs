//! Demo models for the rasterizer.
//!
//! The 2D models are laid out directly in framebuffer pixels and drawn
//! with [`PassThrough`]; the cube goes through the camera.

use anyhow::Context;
use glam::{Mat4, Vec3};
use lumen_core::{Color, FrameBuffer};
use lumen_gl::{
    DrawStats, Gl, Matrices, ModelViewProjection, PassThrough, Primitive, ShaderProgram, TextureModulate,
    Vertex, VertexColor, VertexInput, VertexLayout,
};
use lumen_math::Camera;

type DrawFn = fn(&mut Gl, &mut FrameBuffer) -> anyhow::Result<DrawStats>;

/// Name → draw function, in listing order.
static MODELS: [(&str, DrawFn); 4] = [
    ("mesh", draw_mesh),
    ("fan", draw_fan),
    ("strip", draw_strip),
    ("cube", draw_cube),
];

pub fn model_names() -> impl Iterator<Item = &'static str> {
    MODELS.iter().map(|(name, _)| *name)
}

/// Draw the named model into `fb` with the pipeline state in `gl`.
pub fn draw_model(name: &str, gl: &mut Gl, fb: &mut FrameBuffer) -> anyhow::Result<DrawStats> {
    let (_, draw) = MODELS
        .iter()
        .find(|(model, _)| *model == name)
        .with_context(|| format!("Unknown model {name:?}"))?;
    draw(gl, fb)
}

/// Interleaved `x y z r g b` data plus triangle indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub data: Vec<f32>,
    pub indices: Vec<u32>,
}

impl Mesh {
    fn push_vertex(&mut self, x: f32, y: f32, color: Color) {
        self.data
            .extend_from_slice(&[x, y, 0.0, color.r.floor(), color.g.floor(), color.b.floor()]);
    }

    pub fn vertex_count(&self) -> usize {
        VertexLayout::default().vertex_count(self.data.len())
    }
}

/// A grid with corner colors red, green, blue and yellow blended across it.
pub fn gradient_mesh() -> Mesh {
    let (x, y, w, h) = (10.0, 10.0, 180.0, 100.0);
    let (x_steps, y_steps) = (10u32, 5u32);
    let corners = [
        Color::new(255.0, 0.0, 0.0),
        Color::new(0.0, 255.0, 0.0),
        Color::new(0.0, 0.0, 255.0),
        Color::new(255.0, 255.0, 0.0),
    ];

    let mut mesh = Mesh::default();
    for i in 0..=x_steps {
        for j in 0..=y_steps {
            let s = i as f32 / x_steps as f32;
            let t = j as f32 / y_steps as f32;
            let color = Color::lerp_2d(corners[0], corners[1], corners[2], corners[3], s, t);
            mesh.push_vertex(x + s * w, y + t * h, color);
        }
    }

    let column = y_steps + 1;
    for i in 0..x_steps {
        for j in 0..y_steps {
            let (a, b) = (i * column + j, (i + 1) * column + j);
            mesh.indices.extend_from_slice(&[a, a + 1, b]);
            mesh.indices.extend_from_slice(&[a + 1, b + 1, b]);
        }
    }
    mesh
}

/// A quarter disc around the lower-left corner. Rim colors alternate
/// blue and green; the hub is red.
pub fn quarter_fan(height: u32) -> Mesh {
    let (cx, cy) = (10.0, height as f32 - 10.0);
    let radius = 150.0;
    let triangles = 5;

    let mut mesh = Mesh::default();
    mesh.push_vertex(cx, cy, Color::new(255.0, 0.0, 0.0));
    for i in 0..=triangles {
        let s = i as f32 / triangles as f32;
        let angle = -s * std::f32::consts::FRAC_PI_2;
        let color = if i % 2 == 0 {
            Color::new(0.0, 0.0, 255.0)
        } else {
            Color::new(0.0, 255.0, 0.0)
        };
        mesh.push_vertex(cx + radius * angle.cos(), cy + radius * angle.sin(), color);
    }
    mesh
}

/// A zigzag band across the framebuffer, fading from red to blue.
pub fn zigzag_strip(width: u32, height: u32) -> Mesh {
    let segments = 8;
    let (w, h) = (width as f32, height as f32);
    let (top, bottom) = (h * 0.25, h * 0.75);

    let mut mesh = Mesh::default();
    for i in 0..=segments {
        let s = i as f32 / segments as f32;
        let color = Color::lerp(Color::RED, Color::BLUE, s);
        mesh.push_vertex(s * (w - 1.0), if i % 2 == 0 { top } else { bottom }, color);
    }
    mesh
}

fn draw_mesh(gl: &mut Gl, fb: &mut FrameBuffer) -> anyhow::Result<DrawStats> {
    let mesh = gradient_mesh();
    let count = mesh.indices.len();
    use_screen_space(gl);
    gl.set_data_buffer(mesh.data);
    gl.set_index_buffer(mesh.indices);

    let program = screen_space_program();
    Ok(gl.draw_elements(fb, &program, Primitive::Triangles, count)?)
}

fn draw_fan(gl: &mut Gl, fb: &mut FrameBuffer) -> anyhow::Result<DrawStats> {
    let mesh = quarter_fan(fb.height);
    let count = mesh.vertex_count();
    use_screen_space(gl);
    gl.set_data_buffer(mesh.data);

    let program = screen_space_program();
    Ok(gl.draw_arrays(fb, &program, Primitive::TriangleFan, count)?)
}

/// The strip at full size, then again at half size on top.
fn draw_strip(gl: &mut Gl, fb: &mut FrameBuffer) -> anyhow::Result<DrawStats> {
    let mesh = zigzag_strip(fb.width, fb.height);
    let count = mesh.vertex_count();
    use_screen_space(gl);
    gl.set_data_buffer(mesh.data);

    let full = gl.draw_arrays(fb, &screen_space_program(), Primitive::TriangleStrip, count)?;

    let halved = ShaderProgram::new()
        .with_vertex_shader(|input: &VertexInput, _m: &Matrices| {
            (input.position.truncate() * 0.5).extend(input.position.w)
        })
        .with_fragment_shader(VertexColor);
    let half = gl.draw_arrays(fb, &halved, Primitive::TriangleStrip, count)?;

    Ok(DrawStats {
        vertices: full.vertices + half.vertices,
        triangles: full.triangles + half.triangles,
        back_facing: full.back_facing + half.back_facing,
        fragments: full.fragments + half.fragments,
    })
}

/// Unit cube with one color per face and uvs spanning each face.
pub fn cube_vertices() -> Vec<Vertex> {
    // (normal, tangent u, tangent v, color)
    let faces = [
        (Vec3::Z, Vec3::X, Vec3::Y, [255.0, 80.0, 80.0]),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y, [80.0, 255.0, 80.0]),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y, [80.0, 80.0, 255.0]),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y, [255.0, 255.0, 80.0]),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z, [80.0, 255.0, 255.0]),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z, [255.0, 80.0, 255.0]),
    ];

    let mut vertices = Vec::with_capacity(36);
    for (normal, u, v, color) in faces {
        let corner = |s: f32, t: f32| Vertex {
            position: (normal + u * (2.0 * s - 1.0) + v * (2.0 * t - 1.0)).to_array(),
            color,
            normal: normal.to_array(),
            uv: [s, t],
        };
        let quad = [corner(0.0, 0.0), corner(1.0, 0.0), corner(1.0, 1.0), corner(0.0, 1.0)];
        vertices.extend_from_slice(&[quad[0], quad[1], quad[2], quad[0], quad[2], quad[3]]);
    }
    vertices
}

fn draw_cube(gl: &mut Gl, fb: &mut FrameBuffer) -> anyhow::Result<DrawStats> {
    let vertices = cube_vertices();
    gl.set_vertices(&vertices);

    let mut camera = Camera::new(Vec3::new(2.5, 2.0, 4.0), Vec3::ZERO, Vec3::Y);
    camera.set_field_of_view(60.0);
    camera.set_view_port(fb.width as f32, fb.height as f32);

    gl.set_viewport(0.0, 0.0, fb.width as f32, fb.height as f32);
    gl.matrices.set_camera(&camera);
    gl.matrices.model = Mat4::from_rotation_y(0.4);
    gl.enable_depth_test(true);

    let program = ShaderProgram::new()
        .with_vertex_shader(ModelViewProjection)
        .with_fragment_shader(TextureModulate);
    Ok(gl.draw_arrays(fb, &program, Primitive::Triangles, vertices.len())?)
}

/// Positions are pixels: default layout and no transforms.
fn use_screen_space(gl: &mut Gl) {
    gl.set_layout(VertexLayout::default());
    gl.matrices = Matrices::default();
}

fn screen_space_program() -> ShaderProgram {
    ShaderProgram::new()
        .with_vertex_shader(PassThrough)
        .with_fragment_shader(VertexColor)
}
