use thiserror::Error;

/// Errors raised by the rasterizer. All of them abort the draw call
/// before anything is written.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GlError {
    #[error("No vertex shader bound")]
    MissingVertexShader,

    #[error("No fragment shader bound")]
    MissingFragmentShader,

    #[error("Invalid vertex layout: {0}")]
    InvalidLayout(String),

    #[error("Vertex buffer holds {available} floats, draw needs {needed}")]
    BufferOverrun { needed: usize, available: usize },

    #[error("Index buffer holds {available} indices, draw needs {needed}")]
    IndexBufferTooShort { needed: usize, available: usize },

    #[error("Index {index} out of range for {vertices} vertices")]
    IndexOutOfRange { index: u32, vertices: usize },

    #[error("Byte buffer of {0} bytes is not a whole number of floats")]
    MisalignedBytes(usize),
}

pub type GlResult<T> = Result<T, GlError>;
