//! Procedural 3D textures evaluated at world-space hit points.
//!
//! A texture receives the [`ShadeParameters`] built from the hit shape's
//! material and returns a modified copy; usually only
//! `resulting_color` changes. Textures are looked up by name in a
//! [`TextureRegistry`] owned by the caller.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{RenderError, RenderResult, ShadeParameters, Vec3};

/// Seed for the default Perlin lattice so renders are reproducible.
const DEFAULT_PERLIN_SEED: u64 = 0x5eed;

/// A named texture engine.
pub trait ProceduralTexture {
    fn name(&self) -> &str;

    fn evaluate(&self, params: ShadeParameters) -> ShadeParameters;
}

/// Whether the unit cell containing `p` is an "even" checker cell.
fn even_cell(p: Vec3) -> bool {
    let sum = p.x.round() as i64 + p.y.round() as i64 + p.z.round() as i64;
    sum.rem_euclid(2) == 0
}

/// Alternates the material color with white on unit cells.
#[derive(Debug, Default, Clone, Copy)]
pub struct Checkerboard;

impl ProceduralTexture for Checkerboard {
    fn name(&self) -> &str {
        "checkerboard"
    }

    fn evaluate(&self, mut params: ShadeParameters) -> ShadeParameters {
        params.resulting_color = if even_cell(params.position) {
            params.color
        } else {
            Vec3::ONE
        };
        params
    }
}

/// Checkerboard whose white cells are also mirrors.
#[derive(Debug, Clone, Copy)]
pub struct CheckerboardReflect {
    pub reflectivity: f32,
}

impl Default for CheckerboardReflect {
    fn default() -> Self {
        Self { reflectivity: 0.5 }
    }
}

impl ProceduralTexture for CheckerboardReflect {
    fn name(&self) -> &str {
        "checkerboardreflect"
    }

    fn evaluate(&self, mut params: ShadeParameters) -> ShadeParameters {
        if even_cell(params.position) {
            params.resulting_color = params.color;
        } else {
            params.resulting_color = Vec3::ONE;
            params.reflectivity = params.reflectivity.max(self.reflectivity);
        }
        params
    }
}

/// Gradient noise over a wrapping lattice of random vectors, summed over
/// several octaves.
#[derive(Debug, Clone)]
pub struct Perlin {
    grid: Vec<Vec3>,
}

impl Perlin {
    pub const GRID_SIZE: usize = 50;
    pub const OCTAVES: u32 = 5;
    /// Multiplier applied to the noise before it scales the color.
    pub const GAIN: f32 = 4.0;

    /// Build the lattice from a seeded generator.
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let n = Self::GRID_SIZE;
        let grid = (0..n * n * n)
            .map(|_| {
                Vec3::new(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                )
            })
            .collect();
        Self { grid }
    }

    fn gradient(&self, x: usize, y: usize, z: usize) -> Vec3 {
        let n = Self::GRID_SIZE;
        self.grid[(x * n + y) * n + z]
    }

    /// Cubic smoothstep blend from `a0` to `a1`.
    fn smooth_step(a0: f32, a1: f32, w: f32) -> f32 {
        (a1 - a0) * (3.0 - w * 2.0) * w * w + a0
    }

    /// Single-octave noise at `p`.
    pub fn noise(&self, p: Vec3) -> f32 {
        let n = Self::GRID_SIZE as i64;
        // Offset keeps negative coordinates on the same lattice
        let cell = |v: f32| ((v + 1000.0).floor() as i64).rem_euclid(n) as usize;
        let (x0, y0, z0) = (cell(p.x), cell(p.y), cell(p.z));
        let (x1, y1, z1) = (
            (x0 + 1) % Self::GRID_SIZE,
            (y0 + 1) % Self::GRID_SIZE,
            (z0 + 1) % Self::GRID_SIZE,
        );

        let d = p - p.floor();
        let corner = |gx, gy, gz, ox: f32, oy: f32, oz: f32| {
            self.gradient(gx, gy, gz).dot(d - Vec3::new(ox, oy, oz))
        };

        let wx0 = Self::smooth_step(corner(x0, y0, z0, 0.0, 0.0, 0.0), corner(x1, y0, z0, 1.0, 0.0, 0.0), d.x);
        let wx1 = Self::smooth_step(corner(x0, y1, z0, 0.0, 1.0, 0.0), corner(x1, y1, z0, 1.0, 1.0, 0.0), d.x);
        let wx2 = Self::smooth_step(corner(x0, y0, z1, 0.0, 0.0, 1.0), corner(x1, y0, z1, 1.0, 0.0, 1.0), d.x);
        let wx3 = Self::smooth_step(corner(x0, y1, z1, 0.0, 1.0, 1.0), corner(x1, y1, z1, 1.0, 1.0, 1.0), d.x);

        let wy0 = Self::smooth_step(wx0, wx1, d.y);
        let wy1 = Self::smooth_step(wx2, wx3, d.y);

        Self::smooth_step(wy0, wy1, d.z)
    }

    /// Fractal sum: each octave doubles frequency and halves amplitude,
    /// normalized by the total amplitude.
    pub fn turbulence(&self, p: Vec3, octaves: u32) -> f32 {
        let mut total = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;
        let mut max_value = 0.0;
        for _ in 0..octaves {
            total += self.noise(p * frequency) * amplitude;
            max_value += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }
        if max_value > 0.0 {
            total / max_value
        } else {
            0.0
        }
    }
}

impl Default for Perlin {
    fn default() -> Self {
        Self::new(DEFAULT_PERLIN_SEED)
    }
}

impl ProceduralTexture for Perlin {
    fn name(&self) -> &str {
        "perlin"
    }

    fn evaluate(&self, mut params: ShadeParameters) -> ShadeParameters {
        let n = self.turbulence(params.position, Self::OCTAVES) * Self::GAIN;
        params.resulting_color = params.color * n;
        params
    }
}

/// Gray bands from a product of sines along each axis.
#[derive(Debug, Default, Clone, Copy)]
pub struct MyTexture;

impl MyTexture {
    pub fn value(p: Vec3) -> f32 {
        (p.x.sin() / 2.0 + 0.5) * (p.y.sin() / 2.0 + 0.5) * (p.z.sin() / 2.0 + 0.5)
    }
}

impl ProceduralTexture for MyTexture {
    fn name(&self) -> &str {
        "mytexture"
    }

    fn evaluate(&self, mut params: ShadeParameters) -> ShadeParameters {
        params.resulting_color = Vec3::splat(Self::value(params.position));
        params
    }
}

/// Name → texture engine lookup.
pub struct TextureRegistry {
    engines: HashMap<String, Box<dyn ProceduralTexture>>,
}

impl TextureRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            engines: HashMap::new(),
        }
    }

    /// Registry with `checkerboard`, `checkerboardreflect`, `perlin` and
    /// `mytexture`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(Checkerboard));
        registry.register(Box::new(CheckerboardReflect::default()));
        registry.register(Box::new(Perlin::default()));
        registry.register(Box::new(MyTexture));
        registry
    }

    /// Add (or replace) an engine under its own name.
    pub fn register(&mut self, texture: Box<dyn ProceduralTexture>) {
        let name = texture.name().to_string();
        if self.engines.insert(name.clone(), texture).is_some() {
            log::debug!("Replaced procedural texture {name:?}");
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.engines.contains_key(name)
    }

    /// Sorted engine names.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.engines.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run the named engine. Unknown names are an error.
    pub fn evaluate(&self, name: &str, params: ShadeParameters) -> RenderResult<ShadeParameters> {
        let engine = self
            .engines
            .get(name)
            .ok_or_else(|| RenderError::MissingTexture(name.to_string()))?;
        Ok(engine.evaluate(params))
    }
}

impl Default for TextureRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Intersection, Material};

    fn params_at(position: Vec3, color: Vec3) -> ShadeParameters {
        let mut hit = Intersection::none();
        hit.position = position;
        ShadeParameters::new(&Material::diffuse(color), &hit)
    }

    #[test]
    fn test_checkerboard_alternates() {
        let red = Vec3::new(1.0, 0.0, 0.0);
        let even = Checkerboard.evaluate(params_at(Vec3::new(0.1, 0.2, 0.0), red));
        let odd = Checkerboard.evaluate(params_at(Vec3::new(1.1, 0.2, 0.0), red));
        let negative_odd = Checkerboard.evaluate(params_at(Vec3::new(-1.0, 0.0, 0.0), red));

        assert_eq!(even.resulting_color, red);
        assert_eq!(odd.resulting_color, Vec3::ONE);
        assert_eq!(negative_odd.resulting_color, Vec3::ONE);
    }

    #[test]
    fn test_checkerboard_reflect_sets_reflectivity_on_white() {
        let texture = CheckerboardReflect::default();
        let red = Vec3::new(1.0, 0.0, 0.0);
        let even = texture.evaluate(params_at(Vec3::ZERO, red));
        let odd = texture.evaluate(params_at(Vec3::X, red));

        assert_eq!(even.reflectivity, 0.0);
        assert_eq!(odd.reflectivity, 0.5);
        assert_eq!(odd.resulting_color, Vec3::ONE);
    }

    #[test]
    fn test_perlin_deterministic_for_seed() {
        let a = Perlin::new(7);
        let b = Perlin::new(7);
        let p = Vec3::new(1.3, -2.7, 0.45);
        assert_eq!(a.turbulence(p, 5), b.turbulence(p, 5));
    }

    #[test]
    fn test_perlin_zero_on_lattice_points() {
        let perlin = Perlin::default();
        // Noise vanishes at lattice points
        assert!(perlin.noise(Vec3::new(3.0, 4.0, 5.0)).abs() < 1e-6);
    }

    #[test]
    fn test_perlin_bounded() {
        let perlin = Perlin::default();
        for i in 0..200 {
            let p = Vec3::new(i as f32 * 0.173, i as f32 * -0.291, i as f32 * 0.057);
            let n = perlin.turbulence(p, Perlin::OCTAVES);
            assert!(n.is_finite());
            assert!(n.abs() < 3.0, "noise {n} at {p:?}");
        }
    }

    #[test]
    fn test_perlin_scales_material_color() {
        let perlin = Perlin::default();
        let color = Vec3::new(0.5, 0.25, 1.0);
        let out = perlin.evaluate(params_at(Vec3::new(0.3, 0.6, 0.9), color));
        let n = perlin.turbulence(Vec3::new(0.3, 0.6, 0.9), 5) * 4.0;
        assert!((out.resulting_color - color * n).length() < 1e-5);
    }

    #[test]
    fn test_mytexture_gray() {
        let out = MyTexture.evaluate(params_at(Vec3::ZERO, Vec3::X));
        assert!((out.resulting_color - Vec3::splat(0.125)).length() < 1e-6);
    }

    #[test]
    fn test_registry_defaults_and_missing() {
        let registry = TextureRegistry::with_defaults();
        assert_eq!(
            registry.names(),
            vec!["checkerboard", "checkerboardreflect", "mytexture", "perlin"]
        );

        let params = params_at(Vec3::ZERO, Vec3::ONE);
        let err = registry.evaluate("marble", params).unwrap_err();
        assert_eq!(err, RenderError::MissingTexture("marble".to_string()));
    }
}
