//! Sphere grid example.
//!
//! Builds a few hundred spheres in code over a mirror floor, renders them
//! on all spare cores and saves `sphere_grid.png`.

use std::sync::Arc;

use lumen_core::{AmbientLight, DirectionalLight, PointLight};
use lumen_renderer::geometry::{Geometry, Plane, Sphere};
use lumen_renderer::{
    Camera, Color, Double3, ImageWriter, Material, Point, Scene, ThreadCount, Vector,
    WhittedTracer,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let start = std::time::Instant::now();
    let scene = Arc::new(build_scene()?);
    log::info!("Scene built in {:?}", start.elapsed());

    let mut camera = Camera::builder()
        .with_location(Point::new(0.0, 120.0, 600.0))
        .with_direction(Vector::new(0.0, -0.2, -1.0)?, Vector::new(0.0, 1.0, -0.2)?)
        .with_view_plane_size(320.0, 180.0)
        .with_view_plane_distance(400.0)
        .with_image_sink(ImageWriter::new("sphere_grid.png", 960, 540))
        .with_ray_tracer(WhittedTracer::new(scene))
        .with_antialiasing(2)
        .with_threads(ThreadCount::Auto)
        .with_print_interval(20.0)
        .build()?;

    camera.render_image();
    camera.write_to_image()?;
    Ok(())
}

fn build_scene() -> Result<Scene, Box<dyn std::error::Error>> {
    let floor = Geometry::new(Plane::new(Point::new(0.0, -10.0, 0.0), Vector::Y))
        .with_material(Material::new().with_kd(0.3).with_kr(0.4));

    let mut spheres = Vec::new();
    for a in -10..10 {
        for b in -10..10 {
            let center = Point::new(a as f64 * 25.0, 0.0, b as f64 * 25.0 - 100.0);
            let hue = Color::new(
                (a + 10) as f64 * 12.0,
                (b + 10) as f64 * 12.0,
                120.0,
            );
            let material = if (a + b) % 3 == 0 {
                Material::new().with_kd(0.2).with_ks(0.5).with_shininess(60).with_kt(0.5)
            } else {
                Material::new().with_kd(0.6).with_ks(0.3).with_shininess(30)
            };
            spheres.push(
                Geometry::new(Sphere::new(center, 10.0)?)
                    .with_material(material)
                    .with_emission(hue * 0.3),
            );
        }
    }

    Ok(Scene::builder("sphere grid")
        .with_background(Color::new(20.0, 30.0, 60.0))
        .with_ambient(AmbientLight::new(Color::splat(255.0), Double3::splat(0.05)))
        .with_geometry(floor)
        .with_geometries(spheres)
        .with_light(PointLight::new(Color::splat(800.0), Point::new(100.0, 300.0, 200.0)).with_kl(0.001))
        .with_light(DirectionalLight::new(Color::splat(100.0), Vector::new(1.0, -1.0, -1.0)?))
        .build())
}
