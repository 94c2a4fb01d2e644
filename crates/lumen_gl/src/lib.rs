//! Lumen GL - immediate-mode software rasterizer
//!
//! A small OpenGL-shaped pipeline running on the CPU:
//! - Interleaved vertex buffers described by a [`VertexLayout`]
//! - Programmable vertex and fragment stages ([`ShaderProgram`])
//! - Perspective divide and viewport mapping
//! - Triangle list / strip / fan assembly, indexed or not
//! - Scanline fill with interpolated color, uv, normal and depth
//!
//! Everything is drawn into a [`lumen_core::FrameBuffer`].

pub mod assembly;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod shader;

pub use assembly::Primitive;
pub use error::{GlError, GlResult};
pub use layout::{AttributeSlot, Vertex, VertexLayout};
pub use pipeline::{ClearMask, DrawStats, Gl, WINDING_PALETTE};
pub use shader::{
    Fragment, FragmentShader, Matrices, ModelViewProjection, PassThrough, ShaderProgram, TextureModulate,
    VertexColor, VertexInput, VertexShader,
};
