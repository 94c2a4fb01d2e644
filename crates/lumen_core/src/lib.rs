//! Lumen Core - pixel sink and 2D primitives
//!
//! Everything both back ends write through: the [`Color`] value type, the
//! [`FrameBuffer`] with its depth grid, the line/rect/triangle scan
//! converters in [`primitives`], and image-backed textures.

pub mod color;
pub mod framebuffer;
pub mod primitives;
pub mod texture;

pub use color::{Color, ColorError};
pub use framebuffer::FrameBuffer;
pub use primitives::Lerp;
pub use texture::{Filter, ImageTexture, TextureError, TextureResult, TextureSampler};

// Re-export math types for convenience
pub use lumen_math::{Vec2, Vec3, Vec4};
