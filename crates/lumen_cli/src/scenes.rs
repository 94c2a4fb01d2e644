//! Built-in scenes for the ray tracer.

use lumen_math::{Camera, Vec3};
use lumen_tracer::{Light, Material, Scene, SceneRegistry, Shape};

/// Every demo scene, keyed by name.
pub fn demo_scenes() -> SceneRegistry {
    let mut registry = SceneRegistry::new();
    registry.add_scene("sphere", sphere());
    registry.add_scene("spheres", spheres());
    registry.add_scene("shapes", shapes());
    registry
}

/// One reflective white sphere under a red light on a gray background.
fn sphere() -> Scene {
    let mut scene = Scene::new();
    scene.background_color = Vec3::splat(0.5);
    scene.ray_depth = 2;

    let material = Material {
        color: Vec3::ONE,
        ambient: 0.1,
        diffuse: 0.7,
        specular: 0.2,
        shininess: 100.0,
        reflectivity: 0.5,
        ..Material::default()
    };
    scene.add_shape(Shape::sphere().with_material(material));
    scene.add_light(Light::point(Vec3::new(0.0, 10.0, 0.0), Vec3::new(1.0, 0.0, 0.0), 1.0));
    scene
}

/// Three spheres over a mirrored checkerboard floor.
fn spheres() -> Scene {
    let mut scene = Scene::new();
    scene.background_color = Vec3::new(0.1, 0.1, 0.2);
    scene.ray_depth = 3;
    scene.camera = Camera::new(Vec3::new(0.0, 1.5, 6.0), Vec3::new(0.0, -0.3, 0.0), Vec3::Y);

    let mut floor = Shape::cube()
        .with_material(Material::diffuse(Vec3::new(0.2, 0.2, 0.2)))
        .with_texture("checkerboardreflect");
    floor.translate(Vec3::new(0.0, -1.1, 0.0)).scale(Vec3::new(6.0, 0.1, 6.0));
    scene.add_shape(floor);

    let placements = [
        (Vec3::new(-2.2, 0.0, 0.0), Vec3::new(0.9, 0.2, 0.2), 0.0),
        (Vec3::new(0.0, 0.0, -0.5), Vec3::new(0.9, 0.9, 0.9), 0.6),
        (Vec3::new(2.2, 0.0, 0.0), Vec3::new(0.2, 0.3, 0.9), 0.2),
    ];
    for (position, color, reflectivity) in placements {
        let mut sphere = Shape::sphere()
            .with_material(Material::plastic(color, 50.0).with_reflectivity(reflectivity));
        sphere.translate(position);
        scene.add_shape(sphere);
    }

    scene
        .add_light(Light::point(Vec3::new(-4.0, 6.0, 4.0), Vec3::ONE, 1.0))
        .add_light(Light::point(Vec3::new(5.0, 3.0, 2.0), Vec3::new(1.0, 0.9, 0.7), 0.6));
    scene
}

/// One of each primitive, textured procedurally.
fn shapes() -> Scene {
    let mut scene = Scene::new();
    scene.background_color = Vec3::splat(0.05);
    scene.camera = Camera::new(Vec3::new(0.0, 2.0, 7.0), Vec3::ZERO, Vec3::Y);

    let mut cube = Shape::cube()
        .with_material(Material::plastic(Vec3::ONE, 20.0))
        .with_texture("mytexture");
    cube.translate(Vec3::new(-2.5, 0.0, 0.0))
        .rotate_y(30.0)
        .rotate_x(20.0)
        .scale(Vec3::splat(0.8));
    scene.add_shape(cube);

    let mut cylinder = Shape::cylinder()
        .with_material(Material::diffuse(Vec3::new(0.8, 0.7, 0.5)))
        .with_texture("perlin");
    cylinder.rotate_z(15.0).scale(Vec3::new(0.8, 1.0, 0.8));
    scene.add_shape(cylinder);

    let mut sphere = Shape::sphere()
        .with_material(Material::diffuse(Vec3::new(0.9, 0.1, 0.1)))
        .with_texture("checkerboard");
    sphere.translate(Vec3::new(2.5, 0.0, 0.0)).scale(Vec3::splat(0.9));
    scene.add_shape(sphere);

    scene.add_shape(
        Shape::triangle(
            Vec3::new(-4.0, -1.2, -2.0),
            Vec3::new(4.0, -1.2, -2.0),
            Vec3::new(0.0, 3.5, -3.0),
        )
        .with_material(Material::diffuse(Vec3::new(0.3, 0.6, 0.3))),
    );

    scene.add_light(Light::point(Vec3::new(0.0, 8.0, 6.0), Vec3::ONE, 1.0));
    scene
}
