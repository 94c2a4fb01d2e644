use thiserror::Error;

/// Errors that abort a ray-traced render.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Procedural texture {0:?} is not registered")]
    MissingTexture(String),

    #[error("Cylinder hit at y = {y} lies outside the caps at +/-{half_height}")]
    CylinderInvariant { y: f32, half_height: f32 },

    #[error("A render pass is already in progress")]
    RenderInProgress,

    #[error("Framebuffer is {actual_width}x{actual_height} but the pass renders {width}x{height}")]
    FrameSizeMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },
}

pub type RenderResult<T> = Result<T, RenderError>;
