//! Scene container, closest-hit search and recursive shading.

use crate::{Camera, Intersection, Light, Ray, RenderResult, ShadeParameters, Shape, TextureRegistry, Vec3};

/// Shapes, lights and render switches for one ray-traced image.
#[derive(Debug, Clone)]
pub struct Scene {
    pub shapes: Vec<Shape>,
    pub lights: Vec<Light>,
    /// Linear RGB in [0, 1], returned for rays that hit nothing
    pub background_color: Vec3,
    pub camera: Camera,
    /// Maximum ray generation; 1 traces primary rays only
    pub ray_depth: u32,
    /// Clearance for shadow-ray blockers near either end of the segment
    pub epsilon: f32,
    pub use_bounding_box: bool,
    pub compute_shadows: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            shapes: Vec::new(),
            lights: Vec::new(),
            background_color: Vec3::ZERO,
            camera: Camera::default(),
            ray_depth: 1,
            epsilon: 1e-4,
            use_bounding_box: true,
            compute_shadows: true,
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_shape(&mut self, shape: Shape) -> &mut Self {
        self.shapes.push(shape);
        self
    }

    pub fn add_light(&mut self, light: Light) -> &mut Self {
        self.lights.push(light);
        self
    }

    /// Closest hit in front of the ray origin, skipping `origin_shape`
    /// (compared by identity).
    pub fn intersect(
        &self,
        ray: &Ray,
        origin_shape: Option<&Shape>,
        use_bounding_box: bool,
    ) -> RenderResult<Intersection<'_>> {
        let mut closest = Intersection::none();

        for shape in &self.shapes {
            if origin_shape.is_some_and(|origin| std::ptr::eq(origin, shape)) {
                continue;
            }
            let hit = shape.intersect(ray, use_bounding_box)?;
            if hit.is_hit() && hit.hit_distance > 0.0 && hit.hit_distance < closest.hit_distance {
                closest = hit;
            }
        }

        Ok(closest)
    }

    /// Intersect and shade a ray from outside any shape.
    pub fn trace(&self, ray: &Ray, textures: &TextureRegistry) -> RenderResult<Vec3> {
        let hit = self.intersect(ray, None, self.use_bounding_box)?;
        self.compute_shading(&hit, textures)
    }

    /// Color seen along the ray that produced `hit`.
    ///
    /// Per light: diffuse and specular terms plus the (shared) mirror
    /// reflection, skipped entirely when the light is shadowed. The sum is
    /// averaged over all lights and the ambient term is added once.
    pub fn compute_shading(&self, hit: &Intersection<'_>, textures: &TextureRegistry) -> RenderResult<Vec3> {
        let Some(shape) = hit.hit_shape else {
            return Ok(self.background_color);
        };

        let mut params = ShadeParameters::new(&shape.material, hit);
        if let Some(name) = &shape.texture {
            params = textures.evaluate(name, params)?;
        }

        let surface = params.resulting_color;
        let normal = hit.normal.normalize();
        let mirror = hit.reflected_ray.direction.normalize();
        let reflects = params.reflectivity > 0.0 && hit.reflected_ray.generation < self.ray_depth;
        let mut reflection: Option<Vec3> = None;

        let mut lit = Vec3::ZERO;
        for light in &self.lights {
            let to_light = light.position - hit.position;
            let distance = to_light.length();
            let l = to_light / distance;

            if self.compute_shadows && self.in_shadow(hit, shape, l, distance)? {
                continue;
            }

            let radiance = light.radiance();
            let diffuse = l.dot(normal).max(0.0) * surface * radiance * params.diffuse;
            let specular = mirror.dot(l).max(0.0).powf(params.shininess) * surface * radiance * params.specular;
            lit += diffuse + specular;

            if reflects {
                let color = match reflection {
                    Some(c) => c,
                    None => {
                        let c = self.reflect(hit, shape, textures)? * params.reflectivity;
                        reflection = Some(c);
                        c
                    }
                };
                lit += color;
            }
        }

        if !self.lights.is_empty() {
            lit /= self.lights.len() as f32;
        }

        Ok(lit + surface * params.ambient)
    }

    /// Whether something other than `shape` sits between the hit and the
    /// light, at least `epsilon` away from both ends.
    fn in_shadow(&self, hit: &Intersection<'_>, shape: &Shape, l: Vec3, distance: f32) -> RenderResult<bool> {
        let shadow_ray = Ray::with_generation(hit.position, l, hit.generation + 1);
        let blocker = self.intersect(&shadow_ray, Some(shape), self.use_bounding_box)?;
        Ok(blocker.hit_distance > self.epsilon && blocker.hit_distance < distance - self.epsilon)
    }

    fn reflect(&self, hit: &Intersection<'_>, shape: &Shape, textures: &TextureRegistry) -> RenderResult<Vec3> {
        let mut ray = hit.reflected_ray;
        ray.direction = ray.direction.normalize();
        let bounce = self.intersect(&ray, Some(shape), self.use_bounding_box)?;
        self.compute_shading(&bounce, textures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Material, RenderError};

    fn lit_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_shape(Shape::sphere().with_material(Material {
            color: Vec3::new(1.0, 0.0, 0.0),
            ambient: 0.1,
            diffuse: 0.9,
            ..Material::default()
        }));
        scene.add_light(Light::point(Vec3::new(0.0, 0.0, 10.0), Vec3::ONE, 1.0));
        scene
    }

    fn toward_origin() -> Ray {
        Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn test_intersect_keeps_closest() {
        let mut scene = Scene::new();
        let mut far = Shape::sphere();
        far.translate(Vec3::new(0.0, 0.0, -5.0));
        scene.add_shape(far);
        scene.add_shape(Shape::sphere());

        let hit = scene.intersect(&toward_origin(), None, true).unwrap();
        assert!((hit.hit_distance - 9.0).abs() < 1e-4);
        assert!(std::ptr::eq(hit.hit_shape.unwrap(), &scene.shapes[1]));
    }

    #[test]
    fn test_intersect_skips_origin_shape() {
        let mut scene = Scene::new();
        scene.add_shape(Shape::sphere());
        let mut behind = Shape::sphere();
        behind.translate(Vec3::new(0.0, 0.0, -5.0));
        scene.add_shape(behind);

        let hit = scene
            .intersect(&toward_origin(), Some(&scene.shapes[0]), true)
            .unwrap();
        assert!((hit.hit_distance - 14.0).abs() < 1e-4);
    }

    #[test]
    fn test_intersect_rejects_hits_behind_origin() {
        let mut scene = Scene::new();
        scene.add_shape(Shape::sphere());
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        let hit = scene.intersect(&ray, None, false).unwrap();
        assert!(!hit.is_hit());
    }

    #[test]
    fn test_miss_shades_background() {
        let mut scene = lit_scene();
        scene.background_color = Vec3::new(0.2, 0.3, 0.4);
        let ray = Ray::new(Vec3::new(0.0, 5.0, 10.0), Vec3::new(0.0, 0.0, -1.0));

        let color = scene.trace(&ray, &TextureRegistry::new()).unwrap();
        assert_eq!(color, Vec3::new(0.2, 0.3, 0.4));
    }

    #[test]
    fn test_head_on_diffuse() {
        let scene = lit_scene();
        let color = scene.trace(&toward_origin(), &TextureRegistry::new()).unwrap();
        // Full diffuse plus ambient on the red channel
        assert!((color - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_light_average_and_single_ambient() {
        let mut scene = lit_scene();
        // Second light behind the sphere contributes nothing but still counts
        scene.add_light(Light::point(Vec3::new(0.0, 0.0, -10.0), Vec3::ONE, 1.0));

        let color = scene.trace(&toward_origin(), &TextureRegistry::new()).unwrap();
        assert!((color.x - (0.9 / 2.0 + 0.1)).abs() < 1e-4);
    }

    #[test]
    fn test_no_lights_gives_ambient_only() {
        let mut scene = lit_scene();
        scene.lights.clear();
        let color = scene.trace(&toward_origin(), &TextureRegistry::new()).unwrap();
        assert!((color - Vec3::new(0.1, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_shadowed_light_skipped() {
        let mut scene = lit_scene();
        scene.lights[0].position = Vec3::new(0.0, 10.0, 10.0);
        // Halfway between the hit point (0, 0, 1) and the light
        let mut blocker = Shape::cube();
        blocker.translate(Vec3::new(0.0, 5.0, 5.5)).scale(Vec3::splat(0.5));
        scene.add_shape(blocker);

        let hit = scene.intersect(&toward_origin(), None, true).unwrap();
        assert!(std::ptr::eq(hit.hit_shape.unwrap(), &scene.shapes[0]));

        let textures = TextureRegistry::new();
        let shadowed = scene.compute_shading(&hit, &textures).unwrap();
        let mut open = scene.clone();
        open.compute_shadows = false;
        let unshadowed = open.trace(&toward_origin(), &textures).unwrap();

        assert!((shadowed.x - 0.1).abs() < 1e-4);
        let cos = 9.0 / 181.0_f32.sqrt();
        assert!((unshadowed.x - (0.9 * cos + 0.1)).abs() < 1e-4);
    }

    #[test]
    fn test_reflection_respects_ray_depth() {
        let mut scene = Scene::new();
        let mirror = Material {
            color: Vec3::ZERO,
            reflectivity: 1.0,
            ..Material::default()
        };
        scene.add_shape(Shape::sphere().with_material(mirror));
        scene.add_light(Light::point(Vec3::new(0.0, 0.0, 10.0), Vec3::ONE, 1.0));
        scene.background_color = Vec3::new(0.0, 0.5, 0.0);

        let textures = TextureRegistry::new();
        let primary = scene.trace(&toward_origin(), &textures).unwrap();
        assert_eq!(primary, Vec3::ZERO);

        // One bounce: the reflected ray escapes to the background
        scene.ray_depth = 2;
        let bounced = scene.trace(&toward_origin(), &textures).unwrap();
        assert!((bounced - Vec3::new(0.0, 0.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_missing_texture_is_error() {
        let mut scene = Scene::new();
        scene.add_shape(Shape::sphere().with_texture("marble"));

        let err = scene.trace(&toward_origin(), &TextureRegistry::with_defaults()).unwrap_err();
        assert_eq!(err, RenderError::MissingTexture("marble".into()));
    }

    #[test]
    fn test_texture_replaces_surface_color() {
        let mut scene = lit_scene();
        scene.shapes[0].texture = Some("mytexture".into());

        // Hit at (0, 0, 1): sin terms give 0.5 * 0.5 * (sin(1)/2 + 0.5)
        let expected = 0.25 * (1.0_f32.sin() / 2.0 + 0.5);
        let color = scene.trace(&toward_origin(), &TextureRegistry::with_defaults()).unwrap();
        assert!((color.x - expected).abs() < 1e-4);
        assert!((color.y - expected).abs() < 1e-4);
    }
}
