use crate::Color;

/// Row-major pixel grid with a parallel depth grid.
///
/// Pixel coordinates are signed so that primitives can hand over
/// unclipped positions; anything outside `[0, width) x [0, height)` is
/// silently dropped.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pub width: u32,
    pub height: u32,
    pixels: Vec<Color>,
    z_buffer: Vec<f32>,
}

impl FrameBuffer {
    /// Create a black framebuffer with the depth grid at 0.
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width * height) as usize;
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; len],
            z_buffer: vec![0.0; len],
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Width of the image produced by [`FrameBuffer::get_image_data`].
    pub fn real_width(&self, pixel_scale: u32) -> u32 {
        self.width * pixel_scale.max(1)
    }

    pub fn real_height(&self, pixel_scale: u32) -> u32 {
        self.height * pixel_scale.max(1)
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Depth-tested write. Smaller depth is closer; a write with a depth
    /// greater than the stored one is rejected, equal depth passes.
    pub fn set_pixel_with_depth(&mut self, x: i32, y: i32, color: Color, depth: f32) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        if depth > self.z_buffer[i] {
            return;
        }
        self.z_buffer[i] = depth;
        self.pixels[i] = color;
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn get_depth(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|i| self.z_buffer[i])
    }

    /// Fill every pixel with `color`. Depth is untouched.
    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    pub fn clear_z_buffer(&mut self, depth: f32) {
        self.z_buffer.fill(depth);
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// RGBA8 bytes with every logical pixel replicated into a
    /// `pixel_scale x pixel_scale` block. Alpha is always 255 and a scale
    /// below 1 is treated as 1.
    pub fn get_image_data(&self, pixel_scale: u32) -> Vec<u8> {
        let s = pixel_scale.max(1) as usize;
        let width = self.width as usize;
        let height = self.height as usize;
        let mut data = vec![0u8; width * height * 4 * s * s];

        for row in 0..height {
            for ky in 0..s {
                for col in 0..width {
                    let [r, g, b, _] = self.pixels[row * width + col].to_rgba8();
                    for kx in 0..s {
                        let base = ((row * s + ky) * width + col) * 4 * s + kx * 4;
                        data[base..base + 4].copy_from_slice(&[r, g, b, 255]);
                    }
                }
            }
        }

        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_framebuffer() {
        let fb = FrameBuffer::new(4, 3);
        assert_eq!(fb.pixels().len(), 12);
        assert_eq!(fb.get_pixel(3, 2), Some(Color::BLACK));
        assert_eq!(fb.get_depth(0, 0), Some(0.0));
    }

    #[test]
    fn test_out_of_range_writes_dropped() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.set_pixel(-1, 0, Color::RED);
        fb.set_pixel(2, 0, Color::RED);
        fb.set_pixel(0, 2, Color::RED);
        fb.set_pixel_with_depth(5, 5, Color::RED, -10.0);

        assert!(fb.pixels().iter().all(|&c| c == Color::BLACK));
        assert_eq!(fb.get_pixel(2, 0), None);
    }

    #[test]
    fn test_depth_test_both_branches() {
        let mut fb = FrameBuffer::new(1, 1);
        fb.clear_z_buffer(1.0);

        // Closer wins
        fb.set_pixel_with_depth(0, 0, Color::RED, 0.5);
        assert_eq!(fb.get_pixel(0, 0), Some(Color::RED));
        assert_eq!(fb.get_depth(0, 0), Some(0.5));

        // Farther is rejected
        fb.set_pixel_with_depth(0, 0, Color::GREEN, 0.75);
        assert_eq!(fb.get_pixel(0, 0), Some(Color::RED));
        assert_eq!(fb.get_depth(0, 0), Some(0.5));

        // Equal depth passes
        fb.set_pixel_with_depth(0, 0, Color::BLUE, 0.5);
        assert_eq!(fb.get_pixel(0, 0), Some(Color::BLUE));
    }

    #[test]
    fn test_zero_initialized_depth_rejects_positive() {
        let mut fb = FrameBuffer::new(1, 1);
        fb.set_pixel_with_depth(0, 0, Color::RED, 0.1);
        assert_eq!(fb.get_pixel(0, 0), Some(Color::BLACK));
        fb.set_pixel_with_depth(0, 0, Color::RED, -0.1);
        assert_eq!(fb.get_pixel(0, 0), Some(Color::RED));
    }

    #[test]
    fn test_clear() {
        let mut fb = FrameBuffer::new(3, 3);
        fb.clear(Color::BLUE);
        assert!(fb.pixels().iter().all(|&c| c == Color::BLUE));
    }

    #[test]
    fn test_image_data_scale_2() {
        let mut fb = FrameBuffer::new(1, 1);
        fb.set_pixel(0, 0, Color::new(10.0, 20.0, 30.0));

        let data = fb.get_image_data(2);
        assert_eq!(data.len(), 16);
        for block in data.chunks_exact(4) {
            assert_eq!(block, &[10, 20, 30, 255]);
        }
    }

    #[test]
    fn test_image_data_layout() {
        let mut fb = FrameBuffer::new(2, 1);
        fb.set_pixel(1, 0, Color::RED);

        let data = fb.get_image_data(2);
        assert_eq!(data.len(), 2 * 2 * 4 * 4);
        // Second logical pixel, second sub-row, second sub-column
        let base = ((0 * 2 + 1) * 2 + 1) * 4 * 2 + 4;
        assert_eq!(&data[base..base + 4], &[255, 0, 0, 255]);
        assert_eq!(&data[0..4], &[0, 0, 0, 255]);
    }

    #[test]
    fn test_image_data_scale_below_one() {
        let fb = FrameBuffer::new(2, 2);
        assert_eq!(fb.get_image_data(0).len(), 16);
        assert_eq!(fb.real_width(0), 2);
    }
}
