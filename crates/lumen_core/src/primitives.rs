//! Line, rectangle and triangle scan conversion onto a [`FrameBuffer`].
//!
//! Triangles use the classic sorted-scanline fill:
//!
//! ```text
//!        v0
//!        /\
//!       /  \        upper half: edges 0-1 and 0-2
//!      /----\ v1
//!     /    /        lower half: edges 1-2 and 0-2
//!    /   /
//!   /  /
//!  / /
//!  v2
//! ```
//!
//! Vertices are rounded to whole pixels and sorted by y. Each scanline
//! finds its two crossings on the bounding edges, interpolating per-vertex
//! data with the same edge parameter, then fills from `ceil(left)` to
//! `floor(right)` with a second interpolation across the span. Pixel
//! columns are clipped to the framebuffer width before anything is
//! written.

use glam::{Vec2, Vec3, Vec4};

use crate::{Color, FrameBuffer};

/// Values that can be linearly interpolated across a triangle.
pub trait Lerp: Copy {
    /// `self * (1 - t) + other * t`
    fn lerp(self, other: Self, t: f32) -> Self;
}

impl Lerp for () {
    fn lerp(self, _other: Self, _t: f32) -> Self {}
}

impl Lerp for f32 {
    fn lerp(self, other: Self, t: f32) -> Self {
        self * (1.0 - t) + other * t
    }
}

impl Lerp for Vec2 {
    fn lerp(self, other: Self, t: f32) -> Self {
        self * (1.0 - t) + other * t
    }
}

impl Lerp for Vec3 {
    fn lerp(self, other: Self, t: f32) -> Self {
        self * (1.0 - t) + other * t
    }
}

impl Lerp for Vec4 {
    fn lerp(self, other: Self, t: f32) -> Self {
        self * (1.0 - t) + other * t
    }
}

impl Lerp for Color {
    fn lerp(self, other: Self, t: f32) -> Self {
        Color::lerp(self, other, t)
    }
}

impl<A: Lerp, B: Lerp> Lerp for (A, B) {
    fn lerp(self, other: Self, t: f32) -> Self {
        (self.0.lerp(other.0, t), self.1.lerp(other.1, t))
    }
}

/// Draw a line with integer Bresenham. Endpoints are rounded to the
/// nearest pixel first; both endpoints are drawn.
///
/// The segment is first clipped to the framebuffer grown by one pixel on
/// each side, so far off-screen endpoints cost nothing. Segments with a
/// non-finite endpoint are skipped.
pub fn draw_line(fb: &mut FrameBuffer, x0: f32, y0: f32, x1: f32, y1: f32, color: Color) {
    let Some([x0, y0, x1, y1]) = clip_segment(fb, [x0 as f64, y0 as f64, x1 as f64, y1 as f64]) else {
        return;
    };
    let (mut x, mut y) = (x0.round() as i64, y0.round() as i64);
    let (x1, y1) = (x1.round() as i64, y1.round() as i64);

    let dx = (x1 - x).abs();
    let dy = (y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    loop {
        fb.set_pixel(x as i32, y as i32, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}

/// Liang-Barsky clip of `[x0, y0, x1, y1]` against `[-1, width] x [-1, height]`.
fn clip_segment(fb: &FrameBuffer, segment: [f64; 4]) -> Option<[f64; 4]> {
    if !segment.iter().all(|v| v.is_finite()) {
        return None;
    }
    let [x0, y0, x1, y1] = segment;
    let (dx, dy) = (x1 - x0, y1 - y0);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);

    // (p, q): the segment is inside the boundary where p * t <= q
    let bounds = [
        (-dx, x0 + 1.0),
        (dx, fb.width as f64 - x0),
        (-dy, y0 + 1.0),
        (dy, fb.height as f64 - y0),
    ];
    for (p, q) in bounds {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else if p < 0.0 {
            t0 = t0.max(q / p);
        } else {
            t1 = t1.min(q / p);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some([x0 + t0 * dx, y0 + t0 * dy, x0 + t1 * dx, y0 + t1 * dy])
}

/// Fill an axis-aligned rectangle with horizontal lines, one per row in
/// `y..y + height`. Each line spans `x..=x + width`.
pub fn fill_rect(fb: &mut FrameBuffer, x: f32, y: f32, width: f32, height: f32, color: Color) {
    let (y, height) = (y as f64, height as f64);
    // Rows above -1 or below the framebuffer would all be dropped
    let first = (-1.0 - y).ceil().max(0.0);
    let end = height.min(fb.height as f64 + 1.0 - y);
    let rows = (end - first).ceil().max(0.0) as u64;

    for k in 0..rows {
        let row = (y + first + k as f64) as f32;
        draw_line(fb, x, row, x + width, row, color);
    }
}

/// Flat-shaded triangle with an optional outline.
pub fn fill_triangle(
    fb: &mut FrameBuffer,
    vertices: [Vec2; 3],
    color: Color,
    border: Option<Color>,
) {
    let width = fb.width;
    let height = fb.height;
    scan_triangle(width, height, vertices.map(|v| (v, ())), |x, y, ()| {
        fb.set_pixel(x, y, color)
    });
    draw_border(fb, vertices, border);
}

/// Gouraud triangle: one color per vertex, blended across the surface.
pub fn fill_triangle_color(
    fb: &mut FrameBuffer,
    vertices: [Vec2; 3],
    colors: [Color; 3],
    border: Option<Color>,
) {
    let width = fb.width;
    let height = fb.height;
    let data = [
        (vertices[0], colors[0]),
        (vertices[1], colors[1]),
        (vertices[2], colors[2]),
    ];
    scan_triangle(width, height, data, |x, y, color| fb.set_pixel(x, y, color));
    draw_border(fb, vertices, border);
}

/// Triangle with arbitrary interpolated vertex data.
///
/// Each vertex is a screen position `(x, y, depth)` plus a payload. The
/// `fragment` closure turns the interpolated payload into a color. With
/// `depth_test` the write goes through
/// [`FrameBuffer::set_pixel_with_depth`] using the interpolated depth.
/// Returns the number of fragments generated.
pub fn fill_triangle_vertex_data<T, F>(
    fb: &mut FrameBuffer,
    vertices: [(Vec3, T); 3],
    border: Option<Color>,
    depth_test: bool,
    mut fragment: F,
) -> usize
where
    T: Lerp,
    F: FnMut(&T) -> Color,
{
    let width = fb.width;
    let height = fb.height;
    let screen = vertices.map(|(p, _)| p.truncate());
    let data = vertices.map(|(p, payload)| (p.truncate(), (p.z, payload)));

    let mut fragments = 0;
    scan_triangle(width, height, data, |x, y, (depth, payload)| {
        fragments += 1;
        let color = fragment(&payload);
        if depth_test {
            fb.set_pixel_with_depth(x, y, color, depth);
        } else {
            fb.set_pixel(x, y, color);
        }
    });
    draw_border(fb, screen, border);
    fragments
}

fn draw_border(fb: &mut FrameBuffer, v: [Vec2; 3], border: Option<Color>) {
    if let Some(color) = border {
        draw_line(fb, v[0].x, v[0].y, v[1].x, v[1].y, color);
        draw_line(fb, v[0].x, v[0].y, v[2].x, v[2].y, color);
        draw_line(fb, v[1].x, v[1].y, v[2].x, v[2].y, color);
    }
}

/// Core scanline walker shared by all triangle fills.
///
/// Calls `plot(x, y, data)` for every covered pixel inside the
/// framebuffer bounds.
fn scan_triangle<T, P>(width: u32, height: u32, vertices: [(Vec2, T); 3], mut plot: P)
where
    T: Lerp,
    P: FnMut(i32, i32, T),
{
    let mut v = vertices.map(|(p, d)| (p.round(), d));

    // Sort by y (v0.y <= v1.y <= v2.y)
    if v[0].0.y > v[1].0.y {
        v.swap(0, 1);
    }
    if v[1].0.y > v[2].0.y {
        v.swap(1, 2);
    }
    if v[0].0.y > v[1].0.y {
        v.swap(0, 1);
    }

    let [(p0, d0), (p1, d1), (p2, d2)] = v;
    let (y0, y1, y2) = (p0.y, p1.y, p2.y);
    if y0.is_nan() || y1.is_nan() || y2.is_nan() {
        return;
    }

    let mut span = |y: i32, mut a: (f32, T), mut b: (f32, T)| {
        if y < 0 || y as u32 >= height {
            return;
        }
        if a.0 > b.0 {
            std::mem::swap(&mut a, &mut b);
        }
        let first = (a.0.ceil() as i32).max(0);
        let last = (b.0.floor() as i32).min(width as i32 - 1);
        let run = b.0 - a.0;
        for x in first..=last {
            let s = if run == 0.0 { 0.0 } else { (x as f32 - a.0) / run };
            plot(x, y, a.1.lerp(b.1, s));
        }
    };

    // Visible rows; vertex rows stay in f32 so off-screen values never
    // reach an integer conversion
    let top = y0.max(0.0);
    let bottom = y2.min(height as f32 - 1.0);
    if top > bottom {
        return;
    }

    // All three vertices on one scanline: span the extreme x values
    if y0 == y2 {
        let mut sorted = [(p0.x, d0), (p1.x, d1), (p2.x, d2)];
        sorted.sort_by(|l, r| l.0.total_cmp(&r.0));
        span(y0 as i32, sorted[0], sorted[2]);
        return;
    }

    let edge = |pa: Vec2, da: T, pb: Vec2, db: T, y: i32| {
        let t = (y as f32 - pa.y) / (pb.y - pa.y);
        (pa.x + (pb.x - pa.x) * t, da.lerp(db, t))
    };

    // Flat bottom: include the y1 scanline in the upper half so the lower
    // loop (which would divide by y2 - y1) never runs
    let upper_last = if y1 == y2 { y1 } else { y1 - 1.0 };

    for y in top as i32..=upper_last.min(bottom) as i32 {
        span(y, edge(p0, d0, p1, d1, y), edge(p0, d0, p2, d2, y));
    }
    for y in (upper_last + 1.0).max(top) as i32..=bottom as i32 {
        span(y, edge(p1, d1, p2, d2, y), edge(p0, d0, p2, d2, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(fb: &FrameBuffer, color: Color) -> usize {
        fb.pixels().iter().filter(|&&c| c == color).count()
    }

    #[test]
    fn test_bresenham_diagonal() {
        let mut fb = FrameBuffer::new(6, 6);
        draw_line(&mut fb, 0.0, 0.0, 5.0, 5.0, Color::RED);

        for i in 0..6 {
            assert_eq!(fb.get_pixel(i, i), Some(Color::RED));
        }
        assert_eq!(count(&fb, Color::RED), 6);
    }

    #[test]
    fn test_line_rounds_endpoints() {
        let mut fb = FrameBuffer::new(5, 5);
        draw_line(&mut fb, 0.4, 1.6, 3.4, 1.6, Color::GREEN);
        for x in 0..=3 {
            assert_eq!(fb.get_pixel(x, 2), Some(Color::GREEN));
        }
        assert_eq!(count(&fb, Color::GREEN), 4);
    }

    #[test]
    fn test_line_clipped_silently() {
        let mut fb = FrameBuffer::new(3, 3);
        draw_line(&mut fb, -5.0, 1.0, 10.0, 1.0, Color::BLUE);
        assert_eq!(count(&fb, Color::BLUE), 3);
    }

    #[test]
    fn test_fill_rect() {
        let mut fb = FrameBuffer::new(10, 10);
        fill_rect(&mut fb, 2.0, 3.0, 3.0, 2.0, Color::WHITE);
        // Rows 3 and 4, columns 2..=5
        assert_eq!(count(&fb, Color::WHITE), 8);
        assert_eq!(fb.get_pixel(5, 4), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(2, 5), Some(Color::BLACK));
    }

    #[test]
    fn test_fill_triangle_covers_interior() {
        let mut fb = FrameBuffer::new(10, 10);
        let tri = [Vec2::new(0.0, 0.0), Vec2::new(8.0, 0.0), Vec2::new(0.0, 8.0)];
        fill_triangle(&mut fb, tri, Color::RED, None);

        assert_eq!(fb.get_pixel(1, 1), Some(Color::RED));
        assert_eq!(fb.get_pixel(0, 8), Some(Color::RED));
        assert_eq!(fb.get_pixel(8, 8), Some(Color::BLACK));
        // Right triangle with legs of 8: 9 + 8 + ... + 1 pixels
        assert_eq!(count(&fb, Color::RED), 45);
    }

    #[test]
    fn test_fill_triangle_single_scanline() {
        let mut fb = FrameBuffer::new(10, 3);
        let tri = [Vec2::new(5.0, 1.0), Vec2::new(1.0, 1.0), Vec2::new(7.0, 1.0)];
        fill_triangle(&mut fb, tri, Color::GREEN, None);
        assert_eq!(count(&fb, Color::GREEN), 7);
        assert_eq!(fb.get_pixel(1, 1), Some(Color::GREEN));
        assert_eq!(fb.get_pixel(7, 1), Some(Color::GREEN));
    }

    #[test]
    fn test_fill_triangle_border() {
        let mut fb = FrameBuffer::new(10, 10);
        let tri = [Vec2::new(0.0, 0.0), Vec2::new(8.0, 0.0), Vec2::new(0.0, 8.0)];
        fill_triangle(&mut fb, tri, Color::RED, Some(Color::WHITE));

        assert_eq!(fb.get_pixel(4, 0), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(0, 4), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(4, 4), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(1, 1), Some(Color::RED));
    }

    #[test]
    fn test_gradient_triangle_reproduces_vertex_colors() {
        let mut fb = FrameBuffer::new(20, 20);
        let tri = [Vec2::new(10.0, 1.0), Vec2::new(2.0, 15.0), Vec2::new(18.0, 10.0)];
        fill_triangle_color(&mut fb, tri, [Color::RED, Color::GREEN, Color::BLUE], None);

        let close = |a: Color, b: Color| {
            (a.r - b.r).abs() < 1e-3 && (a.g - b.g).abs() < 1e-3 && (a.b - b.b).abs() < 1e-3
        };
        assert!(close(fb.get_pixel(10, 1).unwrap(), Color::RED));
        assert!(close(fb.get_pixel(2, 15).unwrap(), Color::GREEN));
        assert!(close(fb.get_pixel(18, 10).unwrap(), Color::BLUE));
    }

    #[test]
    fn test_flat_top_and_flat_bottom() {
        let mut fb = FrameBuffer::new(10, 10);
        // Flat top
        fill_triangle(
            &mut fb,
            [Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), Vec2::new(0.0, 4.0)],
            Color::RED,
            None,
        );
        assert_eq!(count(&fb, Color::RED), 15);

        // Flat bottom
        let mut fb = FrameBuffer::new(10, 10);
        fill_triangle(
            &mut fb,
            [Vec2::new(0.0, 0.0), Vec2::new(0.0, 4.0), Vec2::new(4.0, 4.0)],
            Color::RED,
            None,
        );
        assert_eq!(count(&fb, Color::RED), 15);
    }

    #[test]
    fn test_vertex_data_depth_test() {
        let mut fb = FrameBuffer::new(8, 8);
        fb.clear_z_buffer(1.0);
        let tri = |z: f32, c: Color| {
            [
                (Vec3::new(0.0, 0.0, z), c),
                (Vec3::new(7.0, 0.0, z), c),
                (Vec3::new(0.0, 7.0, z), c),
            ]
        };

        let n = fill_triangle_vertex_data(&mut fb, tri(0.2, Color::RED), None, true, |c| *c);
        assert!(n > 0);
        // Farther triangle must not overwrite
        fill_triangle_vertex_data(&mut fb, tri(0.5, Color::BLUE), None, true, |c| *c);
        let red = fb.get_pixel(1, 1).unwrap();
        assert!(red.r > 254.9 && red.b < 1e-3);
        assert!((fb.get_depth(1, 1).unwrap() - 0.2).abs() < 1e-6);

        // Closer one wins
        fill_triangle_vertex_data(&mut fb, tri(-0.3, Color::GREEN), None, true, |c| *c);
        let green = fb.get_pixel(1, 1).unwrap();
        assert!(green.g > 254.9 && green.r < 1e-3);
    }

    #[test]
    fn test_vertex_data_interpolates_attributes() {
        let mut fb = FrameBuffer::new(11, 11);
        let verts = [
            (Vec3::new(0.0, 0.0, 0.0), Vec2::new(0.0, 0.0)),
            (Vec3::new(10.0, 0.0, 0.0), Vec2::new(1.0, 0.0)),
            (Vec3::new(0.0, 10.0, 0.0), Vec2::new(0.0, 1.0)),
        ];
        let mut seen = Vec::new();
        fill_triangle_vertex_data(&mut fb, verts, None, false, |uv| {
            seen.push(*uv);
            Color::WHITE
        });

        assert!(seen.iter().all(|uv| uv.x >= -1e-5 && uv.y >= -1e-5));
        assert!(seen.iter().all(|uv| uv.x + uv.y <= 1.0 + 1e-5));
        assert!(seen.iter().any(|uv| (uv.x - 1.0).abs() < 1e-5));
    }

    #[test]
    fn test_triangle_clipped_to_width() {
        let mut fb = FrameBuffer::new(4, 4);
        fill_triangle(
            &mut fb,
            [Vec2::new(-10.0, 0.0), Vec2::new(20.0, 0.0), Vec2::new(2.0, 3.0)],
            Color::RED,
            None,
        );
        assert_eq!(fb.get_pixel(0, 0), Some(Color::RED));
        assert_eq!(fb.get_pixel(3, 0), Some(Color::RED));
    }

    #[test]
    fn test_line_with_huge_endpoints() {
        let mut fb = FrameBuffer::new(4, 4);
        draw_line(&mut fb, -1e10, 1.0, 1e10, 1.0, Color::BLUE);
        assert_eq!(count(&fb, Color::BLUE), 4);

        // Endpoints that saturate i32 in opposite directions
        draw_line(&mut fb, -3e9, 2.0, 3e9, 2.0, Color::GREEN);
        assert_eq!(count(&fb, Color::GREEN), 4);

        draw_line(&mut fb, f32::NAN, 0.0, 3.0, 0.0, Color::RED);
        draw_line(&mut fb, 0.0, f32::NEG_INFINITY, 0.0, 3.0, Color::RED);
        assert_eq!(count(&fb, Color::RED), 0);
    }

    #[test]
    fn test_line_clip_keeps_steep_pixels() {
        let mut fb = FrameBuffer::new(4, 4);
        draw_line(&mut fb, 1.0, -1e9, 1.0, 1e9, Color::WHITE);
        for y in 0..4 {
            assert_eq!(fb.get_pixel(1, y), Some(Color::WHITE));
        }
        assert_eq!(count(&fb, Color::WHITE), 4);
    }

    #[test]
    fn test_fill_rect_far_off_screen() {
        let mut fb = FrameBuffer::new(4, 4);
        fill_rect(&mut fb, 0.0, -1e9, 3.0, 2e9, Color::WHITE);
        assert_eq!(count(&fb, Color::WHITE), 16);

        let mut fb = FrameBuffer::new(4, 4);
        fill_rect(&mut fb, 0.0, 1e9, 3.0, 5.0, Color::WHITE);
        assert_eq!(count(&fb, Color::WHITE), 0);
    }

    #[test]
    fn test_triangle_spanning_a_billion_rows() {
        let mut fb = FrameBuffer::new(4, 4);
        let tri = [Vec2::new(0.0, -1e9), Vec2::new(3.0, 0.0), Vec2::new(0.0, 1e9)];
        let start = std::time::Instant::now();
        fill_triangle(&mut fb, tri, Color::RED, Some(Color::WHITE));

        assert!(start.elapsed() < std::time::Duration::from_secs(1));
        assert_eq!(fb.get_pixel(0, 0), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(0, 3), Some(Color::WHITE));
    }

    #[test]
    fn test_triangle_beyond_i32_range() {
        let mut fb = FrameBuffer::new(4, 4);
        let tri = [Vec2::new(0.0, 2.1474e9), Vec2::new(3.0, 2.1474e9), Vec2::new(0.0, 3e9)];
        fill_triangle(&mut fb, tri, Color::RED, Some(Color::WHITE));
        assert_eq!(count(&fb, Color::BLACK), 16);

        // Reaches from above the framebuffer to past i32::MAX
        let tri = [Vec2::new(0.0, -5.0), Vec2::new(3.0, -5.0), Vec2::new(0.0, 3e9)];
        fill_triangle(&mut fb, tri, Color::RED, None);
        assert_eq!(fb.get_pixel(0, 3), Some(Color::RED));

        let tri = [Vec2::new(0.0, f32::NAN), Vec2::new(3.0, 0.0), Vec2::new(0.0, 3.0)];
        fill_triangle(&mut fb, tri, Color::BLUE, None);
        assert_eq!(count(&fb, Color::BLUE), 0);
    }
}
