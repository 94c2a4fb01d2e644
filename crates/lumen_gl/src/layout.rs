//! Interleaved vertex buffer layouts.
//!
//! A buffer is a flat run of `f32`s. Every vertex occupies `stride`
//! floats; each attribute is a `(size, offset)` slot inside that stride.
//! A slot with `size == 0` is absent.

use lumen_core::Color;

use crate::{GlError, GlResult, VertexInput};
use glam::{Vec2, Vec3, Vec4};

/// One attribute inside a vertex, measured in floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttributeSlot {
    pub size: usize,
    pub offset: usize,
}

impl AttributeSlot {
    pub const NONE: AttributeSlot = AttributeSlot { size: 0, offset: 0 };

    pub const fn new(size: usize, offset: usize) -> Self {
        Self { size, offset }
    }

    pub fn is_present(&self) -> bool {
        self.size > 0
    }

    fn end(&self) -> usize {
        self.offset + self.size
    }

    fn slice<'a>(&self, vertex: &'a [f32]) -> GlResult<&'a [f32]> {
        vertex
            .get(self.offset..self.end())
            .ok_or_else(|| GlError::InvalidLayout(format!("slot {self:?} outside vertex of {} floats", vertex.len())))
    }
}

/// Where position, color, normal and uv live inside one vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    /// Floats per vertex
    pub stride: usize,
    /// 2 to 4 floats; missing z is 0 and missing w is 1
    pub position: AttributeSlot,
    /// 3 or 4 floats in 0..=255; missing alpha is 255
    pub color: AttributeSlot,
    /// 0 or 3 floats
    pub normal: AttributeSlot,
    /// 0 or 2 floats
    pub uv: AttributeSlot,
}

impl Default for VertexLayout {
    /// `x y z r g b`
    fn default() -> Self {
        Self {
            stride: 6,
            position: AttributeSlot::new(3, 0),
            color: AttributeSlot::new(3, 3),
            normal: AttributeSlot::NONE,
            uv: AttributeSlot::NONE,
        }
    }
}

impl VertexLayout {
    /// A layout with only a position slot of `size` floats at offset 0.
    pub fn new(stride: usize, position_size: usize) -> Self {
        Self {
            stride,
            position: AttributeSlot::new(position_size, 0),
            color: AttributeSlot::NONE,
            normal: AttributeSlot::NONE,
            uv: AttributeSlot::NONE,
        }
    }

    pub fn with_color(mut self, size: usize, offset: usize) -> Self {
        self.color = AttributeSlot::new(size, offset);
        self
    }

    pub fn with_normal(mut self, size: usize, offset: usize) -> Self {
        self.normal = AttributeSlot::new(size, offset);
        self
    }

    pub fn with_uv(mut self, size: usize, offset: usize) -> Self {
        self.uv = AttributeSlot::new(size, offset);
        self
    }

    /// Check slot sizes and that every slot fits inside the stride.
    pub fn validate(&self) -> GlResult<()> {
        // (name, slot, allowed sizes, required)
        let checks = [
            ("position", self.position, 2..=4, true),
            ("color", self.color, 3..=4, false),
            ("normal", self.normal, 3..=3, false),
            ("uv", self.uv, 2..=2, false),
        ];

        for (name, slot, sizes, required) in checks {
            if required || slot.is_present() {
                if !sizes.contains(&slot.size) {
                    return Err(GlError::InvalidLayout(format!(
                        "{name} has {} floats, expected {}..={}",
                        slot.size,
                        sizes.start(),
                        sizes.end()
                    )));
                }
                if slot.end() > self.stride {
                    return Err(GlError::InvalidLayout(format!(
                        "{name} ends at float {} past stride {}",
                        slot.end(),
                        self.stride
                    )));
                }
            }
        }
        Ok(())
    }

    /// Whole vertices contained in a buffer of `len` floats.
    pub fn vertex_count(&self, len: usize) -> usize {
        if self.stride == 0 {
            0
        } else {
            len / self.stride
        }
    }

    /// Slice vertex `index` out of `data`.
    pub fn fetch(&self, data: &[f32], index: usize) -> GlResult<VertexInput> {
        let start = index * self.stride;
        let end = start + self.stride;
        let vertex = data.get(start..end).ok_or(GlError::BufferOverrun {
            needed: end,
            available: data.len(),
        })?;

        let p = self.position.slice(vertex)?;
        let position = Vec4::new(at(p, 0, 0.0), at(p, 1, 0.0), at(p, 2, 0.0), at(p, 3, 1.0));

        let color = if self.color.is_present() {
            let c = self.color.slice(vertex)?;
            Color::with_alpha(at(c, 0, 0.0), at(c, 1, 0.0), at(c, 2, 0.0), at(c, 3, 255.0))
        } else {
            Color::WHITE
        };

        let normal = if self.normal.is_present() {
            let n = self.normal.slice(vertex)?;
            Vec3::new(at(n, 0, 0.0), at(n, 1, 0.0), at(n, 2, 0.0))
        } else {
            Vec3::ZERO
        };

        let uv = if self.uv.is_present() {
            let t = self.uv.slice(vertex)?;
            Vec2::new(at(t, 0, 0.0), at(t, 1, 0.0))
        } else {
            Vec2::ZERO
        };

        Ok(VertexInput {
            position,
            color,
            normal,
            uv,
        })
    }
}

/// Component `i` of an attribute, or `fallback` when the slot is shorter.
fn at(slot: &[f32], i: usize, fallback: f32) -> f32 {
    slot.get(i).copied().unwrap_or(fallback)
}

/// A ready-made interleaved vertex: position, color, normal and uv.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self {
            position,
            color,
            ..Self::default()
        }
    }

    /// Layout matching the `#[repr(C)]` field order.
    pub fn layout() -> VertexLayout {
        VertexLayout::new(std::mem::size_of::<Vertex>() / std::mem::size_of::<f32>(), 3)
            .with_color(3, 3)
            .with_normal(3, 6)
            .with_uv(2, 9)
    }
}
