//! Image-backed textures for the rasterizer's fragment stage.
//!
//! Fragment shaders only see the [`TextureSampler`] trait, so any 2D
//! lookup can be bound to the pipeline. [`ImageTexture`] is the stock
//! implementation, loaded from disk through the `image` crate.

use std::path::Path;

use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture: {0}")]
    LoadError(String),

    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Pixel data has {actual} bytes, expected {expected} for {width}x{height} RGBA8")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// 2D texture lookup. Returns RGBA with channels in [0, 1].
pub trait TextureSampler {
    fn sample_2d(&self, u: f32, v: f32) -> [f32; 4];
}

/// Texel filtering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    Nearest,
    #[default]
    Bilinear,
}

/// A decoded RGBA image.
#[derive(Clone, Debug)]
pub struct ImageTexture {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA, channels in [0, 1], first row at the top of the image
    pub pixels: Vec<[f32; 4]>,
    pub filter: Filter,
}

impl ImageTexture {
    /// Build a texture from raw RGBA8 bytes.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> TextureResult<Self> {
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected || expected == 0 {
            return Err(TextureError::SizeMismatch {
                width,
                height,
                expected,
                actual: bytes.len(),
            });
        }

        let pixels = bytes
            .chunks_exact(4)
            .map(|p| {
                [
                    p[0] as f32 / 255.0,
                    p[1] as f32 / 255.0,
                    p[2] as f32 / 255.0,
                    p[3] as f32 / 255.0,
                ]
            })
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
            filter: Filter::default(),
        })
    }

    /// Load and decode an image file.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|e| {
            TextureError::LoadError(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let texture = Self::from_rgba8(width, height, rgba.as_raw())?;

        log::debug!("Loaded texture: {} ({}x{})", path.display(), width, height);

        Ok(texture)
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    fn texel(&self, x: u32, y: u32) -> [f32; 4] {
        let idx = (y.min(self.height - 1) * self.width + x.min(self.width - 1)) as usize;
        self.pixels.get(idx).copied().unwrap_or([0.0, 0.0, 0.0, 1.0])
    }
}

impl TextureSampler for ImageTexture {
    /// UVs wrap; (0, 0) is the bottom-left corner of the image.
    fn sample_2d(&self, u: f32, v: f32) -> [f32; 4] {
        let u = u.rem_euclid(1.0);
        let v = v.rem_euclid(1.0);

        let x = u * (self.width as f32 - 1.0);
        let y = (1.0 - v) * (self.height as f32 - 1.0);

        match self.filter {
            Filter::Nearest => self.texel(x.round() as u32, y.round() as u32),
            Filter::Bilinear => {
                let x0 = x.floor() as u32;
                let y0 = y.floor() as u32;
                let fx = x.fract();
                let fy = y.fract();

                let p00 = self.texel(x0, y0);
                let p10 = self.texel(x0 + 1, y0);
                let p01 = self.texel(x0, y0 + 1);
                let p11 = self.texel(x0 + 1, y0 + 1);

                let mut out = [0.0; 4];
                for c in 0..4 {
                    let top = p00[c] * (1.0 - fx) + p10[c] * fx;
                    let bottom = p01[c] * (1.0 - fx) + p11[c] * fx;
                    out[c] = top * (1.0 - fy) + bottom * fy;
                }
                out
            }
        }
    }
}
