//! Pinhole camera with optional anti-aliasing and depth of field.
//!
//! The camera sits at `location`, looks along `to` with `up` pointing up,
//! and shoots rays through a view plane of `width × height` at `distance`.
//! Each pixel of the image sink is one cell of that plane.

use std::fmt;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::ThreadPool;

use crate::bucket::{generate_buckets, DEFAULT_BUCKET_SIZE};
use crate::output::ImageSink;
use crate::render::{render_buckets, Progress, ThreadCount};
use crate::tracer::RayTracer;
use crate::{CameraError, ImageError};
use lumen_core::{CameraDescription, Color};
use lumen_math::{align_zero, Point, Ray, Vector};

/// Sampling, scheduling and seeding options of a render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub threads: ThreadCount,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
    /// Progress log step in percent, `0` to disable
    pub print_interval: f64,
    pub seed: u64,
    /// Anti-aliasing grid size per axis, `1` for a single ray
    pub antialiasing: u32,
    /// Depth of field grid size per axis
    pub dof_grid: u32,
    /// Aperture radius, `0` for a pinhole
    pub aperture: f64,
    /// Distance to the plane in focus, the view plane distance when unset
    pub focal_distance: Option<f64>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            threads: ThreadCount::Single,
            bucket_size: DEFAULT_BUCKET_SIZE,
            print_interval: 0.0,
            seed: 0,
            antialiasing: 1,
            dof_grid: 1,
            aperture: 0.0,
            focal_distance: None,
        }
    }
}

/// A validated camera ready to render.
pub struct Camera {
    location: Point,
    to: Vector,
    up: Vector,
    right: Vector,
    width: f64,
    height: f64,
    distance: f64,
    focal_distance: f64,
    settings: RenderSettings,
    sink: Box<dyn ImageSink>,
    tracer: Box<dyn RayTracer>,
    pool: Option<ThreadPool>,
}

impl fmt::Debug for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Camera")
            .field("location", &self.location)
            .field("to", &self.to)
            .field("up", &self.up)
            .field("view_plane", &(self.width, self.height, self.distance))
            .field("resolution", &self.sink.resolution())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Camera {
    pub fn builder() -> CameraBuilder {
        CameraBuilder::default()
    }

    pub fn location(&self) -> Point {
        self.location
    }

    pub fn to(&self) -> Vector {
        self.to
    }

    pub fn up(&self) -> Vector {
        self.up
    }

    pub fn right(&self) -> Vector {
        self.right
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn image_sink(&self) -> &dyn ImageSink {
        self.sink.as_ref()
    }

    /// Ray from the camera through the center of pixel `(j, i)` of an
    /// `nx × ny` grid laid over the view plane.
    pub fn construct_ray(&self, nx: u32, ny: u32, j: u32, i: u32) -> Ray {
        self.ray_through(nx, ny, j as f64, i as f64)
    }

    /// Ray through a fractional pixel position; integer values hit pixel
    /// centers.
    fn ray_through(&self, nx: u32, ny: u32, x: f64, y: f64) -> Ray {
        let xj = (x - (nx as f64 - 1.0) / 2.0) * self.width / nx as f64;
        let yi = -(y - (ny as f64 - 1.0) / 2.0) * self.height / ny as f64;

        let mut direction = self.to.coords() * self.distance;
        if align_zero(xj) != 0.0 {
            direction += self.right.coords() * xj;
        }
        if align_zero(yi) != 0.0 {
            direction += self.up.coords() * yi;
        }
        Ray::new(self.location, Vector::try_from(direction).unwrap_or(self.to))
    }

    /// Color of one pixel, averaged over the anti-aliasing grid.
    fn cast_pixel(&self, nx: u32, ny: u32, j: u32, i: u32) -> Color {
        let n = self.settings.antialiasing;
        let pixel_index = i as u64 * nx as u64 + j as u64;
        let mut rng = StdRng::seed_from_u64(self.settings.seed ^ pixel_index);

        if n == 1 {
            let ray = self.construct_ray(nx, ny, j, i);
            return self.cast_through_lens(&ray, &mut rng);
        }

        let cell = 1.0 / n as f64;
        let mut color = Color::ZERO;
        for row in 0..n {
            for col in 0..n {
                let jx: f64 = rng.gen_range(-0.5..0.5);
                let jy: f64 = rng.gen_range(-0.5..0.5);
                let x = j as f64 - 0.5 + (col as f64 + 0.5 + jx) * cell;
                let y = i as f64 - 0.5 + (row as f64 + 0.5 + jy) * cell;
                let ray = self.ray_through(nx, ny, x, y);
                color += self.cast_through_lens(&ray, &mut rng);
            }
        }
        color / grid_samples(n)
    }

    /// Depth of field needs an open aperture and more than one lens sample
    /// per axis.
    fn depth_of_field(&self) -> bool {
        self.settings.aperture > 0.0 && self.settings.dof_grid > 1
    }

    /// Trace a primary ray, blurring it over the aperture when depth of
    /// field is on.
    fn cast_through_lens(&self, ray: &Ray, rng: &mut StdRng) -> Color {
        if !self.depth_of_field() {
            return self.tracer.trace_ray(ray);
        }
        let aperture = self.settings.aperture;

        let t = self.focal_distance / self.to.dot(ray.direction());
        let focus = ray.at(t);

        let n = self.settings.dof_grid;
        let cell = 2.0 * aperture / n as f64;
        let mut color = Color::ZERO;
        let mut kept = 0u32;
        for row in 0..n {
            for col in 0..n {
                let jx: f64 = rng.gen_range(-0.5..0.5);
                let jy: f64 = rng.gen_range(-0.5..0.5);
                let dx = -aperture + (col as f64 + 0.5 + jx) * cell;
                let dy = -aperture + (row as f64 + 0.5 + jy) * cell;
                if dx * dx + dy * dy > aperture * aperture {
                    continue;
                }

                let offset = self.right.coords() * dx + self.up.coords() * dy;
                let origin = Point::from(self.location.coords() + offset);
                let Ok(direction) = focus.subtract(origin) else {
                    continue;
                };
                color += self.tracer.trace_ray(&Ray::new(origin, direction));
                kept += 1;
            }
        }

        if kept == 0 {
            return self.tracer.trace_ray(ray);
        }
        color / kept as f64
    }

    /// Trace every pixel of the image sink.
    pub fn render_image(&self) -> &Self {
        let (nx, ny) = self.sink.resolution();
        let buckets = generate_buckets(nx, ny, self.settings.bucket_size);
        let progress = Progress::new(nx as usize * ny as usize, self.settings.print_interval);

        log::info!(
            "Rendering {}x{} in {} buckets on {} thread(s), {}x{} AA{}",
            nx,
            ny,
            buckets.len(),
            self.pool.as_ref().map_or(1, |p| p.current_num_threads()),
            self.settings.antialiasing,
            self.settings.antialiasing,
            if self.depth_of_field() { ", depth of field" } else { "" }
        );
        let start = Instant::now();

        render_buckets(&buckets, self.pool.as_ref(), &progress, |x, y| {
            let color = self.cast_pixel(nx, ny, x, y);
            self.sink.write_pixel(x, y, color);
        });

        log::info!("Render finished in {:.2?}", start.elapsed());
        self
    }

    /// Overwrite every pixel on a row or column divisible by `interval`.
    pub fn print_grid(&self, interval: u32, color: Color) -> &Self {
        if interval == 0 {
            log::warn!("Grid interval must be positive, skipping grid");
            return self;
        }
        let (nx, ny) = self.sink.resolution();
        for i in 0..ny {
            for j in 0..nx {
                if i % interval == 0 || j % interval == 0 {
                    self.sink.write_pixel(j, i, color);
                }
            }
        }
        self
    }

    /// Flush the image sink.
    pub fn write_to_image(&mut self) -> Result<(), ImageError> {
        self.sink.flush()
    }
}

/// Collects camera settings; validated once by [`CameraBuilder::build`].
#[derive(Default)]
pub struct CameraBuilder {
    location: Option<Point>,
    direction: Option<(Vector, Vector)>,
    view_plane_size: Option<(f64, f64)>,
    view_plane_distance: Option<f64>,
    sink: Option<Box<dyn ImageSink>>,
    tracer: Option<Box<dyn RayTracer>>,
    settings: RenderSettings,
}

impl CameraBuilder {
    pub fn with_location(mut self, location: Point) -> Self {
        self.location = Some(location);
        self
    }

    /// Forward and up directions; they must be orthogonal.
    pub fn with_direction(mut self, to: Vector, up: Vector) -> Self {
        self.direction = Some((to, up));
        self
    }

    pub fn with_view_plane_size(mut self, width: f64, height: f64) -> Self {
        self.view_plane_size = Some((width, height));
        self
    }

    pub fn with_view_plane_distance(mut self, distance: f64) -> Self {
        self.view_plane_distance = Some(distance);
        self
    }

    /// Placement and view plane from a scene file's camera block.
    pub fn with_description(self, description: &CameraDescription) -> Self {
        self.with_location(description.location)
            .with_direction(description.to, description.up)
            .with_view_plane_size(description.width, description.height)
            .with_view_plane_distance(description.distance)
    }

    pub fn with_image_sink(mut self, sink: impl ImageSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn with_ray_tracer(mut self, tracer: impl RayTracer + 'static) -> Self {
        self.tracer = Some(Box::new(tracer));
        self
    }

    pub fn with_settings(mut self, settings: RenderSettings) -> Self {
        self.settings = settings;
        self
    }

    /// `n × n` jittered rays per pixel.
    pub fn with_antialiasing(mut self, n: u32) -> Self {
        self.settings.antialiasing = n;
        self
    }

    /// `grid × grid` jittered lens samples inside an aperture of radius
    /// `aperture`, focused at `focal_distance` along the view direction.
    pub fn with_depth_of_field(mut self, grid: u32, aperture: f64, focal_distance: f64) -> Self {
        self.settings.dof_grid = grid;
        self.settings.aperture = aperture;
        self.settings.focal_distance = Some(focal_distance);
        self
    }

    pub fn with_threads(mut self, threads: ThreadCount) -> Self {
        self.settings.threads = threads;
        self
    }

    pub fn with_bucket_size(mut self, bucket_size: u32) -> Self {
        self.settings.bucket_size = bucket_size;
        self
    }

    pub fn with_print_interval(mut self, percent: f64) -> Self {
        self.settings.print_interval = percent;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.settings.seed = seed;
        self
    }

    /// Validate the settings and create the render pool.
    pub fn build(self) -> Result<Camera, CameraError> {
        let location = self.location.ok_or(CameraError::MissingField("location"))?;
        let (to, up) = self.direction.ok_or(CameraError::MissingField("direction"))?;
        let (to, up) = (to.normalize(), up.normalize());
        if align_zero(to.dot(up)) != 0.0 {
            return Err(CameraError::NotOrthogonal);
        }
        let right = to
            .cross(up)
            .map_err(|_| CameraError::NotOrthogonal)?
            .normalize();

        let (width, height) = self
            .view_plane_size
            .ok_or(CameraError::MissingField("view plane size"))?;
        let distance = self
            .view_plane_distance
            .ok_or(CameraError::MissingField("view plane distance"))?;
        positive(width, "view plane width")?;
        positive(height, "view plane height")?;
        positive(distance, "view plane distance")?;

        let sink = self.sink.ok_or(CameraError::MissingField("image sink"))?;
        let tracer = self.tracer.ok_or(CameraError::MissingField("ray tracer"))?;
        let (nx, ny) = sink.resolution();
        if nx == 0 || ny == 0 {
            return Err(CameraError::NonPositive("image resolution"));
        }

        let settings = self.settings;
        if settings.antialiasing == 0 {
            return Err(CameraError::InvalidSampling("anti-aliasing"));
        }
        if settings.dof_grid == 0 {
            return Err(CameraError::InvalidSampling("depth of field"));
        }
        if settings.aperture.is_nan() || settings.aperture < 0.0 {
            return Err(CameraError::NonPositive("aperture"));
        }
        let focal_distance = settings.focal_distance.unwrap_or(distance);
        positive(focal_distance, "focal distance")?;

        let pool = settings.threads.build_pool()?;

        Ok(Camera {
            location,
            to,
            up,
            right,
            width,
            height,
            distance,
            focal_distance,
            settings,
            sink,
            tracer,
            pool,
        })
    }
}

fn positive(value: f64, name: &'static str) -> Result<(), CameraError> {
    if value.is_nan() || value <= 0.0 {
        return Err(CameraError::NonPositive(name));
    }
    Ok(())
}

/// Number of samples in an `n` x `n` grid.
fn grid_samples(n: u32) -> f64 {
    (n as f64).powi(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Geometry, Sphere};
    use crate::output::PixelBuffer;
    use crate::{Scene, WhittedTracer};
    use lumen_core::{Material, PointLight};
    use glam::DVec3;
    use std::sync::Arc;

    /// Returns the ray direction unchanged as a color.
    struct DirectionTracer;

    impl RayTracer for DirectionTracer {
        fn trace_ray(&self, ray: &Ray) -> Color {
            ray.direction().coords()
        }
    }

    fn v(x: f64, y: f64, z: f64) -> Vector {
        Vector::new(x, y, z).unwrap()
    }

    fn reference_builder(nx: u32, ny: u32) -> CameraBuilder {
        Camera::builder()
            .with_location(Point::ZERO)
            .with_direction(v(0.0, 0.0, -1.0), v(0.0, -1.0, 0.0))
            .with_view_plane_size(nx as f64 * 2.0, ny as f64 * 2.0)
            .with_view_plane_distance(10.0)
            .with_image_sink(PixelBuffer::new(nx, ny))
            .with_ray_tracer(DirectionTracer)
    }

    fn assert_direction(ray: &Ray, expected: DVec3) {
        let expected = expected.normalize();
        assert!(
            (ray.direction().coords() - expected).length() < 1e-9,
            "{} != {expected}",
            ray.direction()
        );
    }

    #[test]
    fn test_construct_ray_4x4() {
        let camera = reference_builder(4, 4).build().unwrap();
        let cases = [
            ((0, 0), DVec3::new(3.0, -3.0, -10.0)),
            ((1, 0), DVec3::new(1.0, -3.0, -10.0)),
            ((1, 1), DVec3::new(1.0, -1.0, -10.0)),
            ((3, 3), DVec3::new(-3.0, 3.0, -10.0)),
        ];
        for ((j, i), expected) in cases {
            let ray = camera.construct_ray(4, 4, j, i);
            assert_eq!(ray.origin(), Point::ZERO);
            assert_direction(&ray, expected);
        }
    }

    #[test]
    fn test_construct_ray_3x3() {
        let camera = reference_builder(3, 3).build().unwrap();
        // Center pixel looks straight ahead
        assert_direction(&camera.construct_ray(3, 3, 1, 1), DVec3::new(0.0, 0.0, -10.0));
        assert_direction(&camera.construct_ray(3, 3, 0, 1), DVec3::new(2.0, 0.0, -10.0));
        assert_direction(&camera.construct_ray(3, 3, 2, 0), DVec3::new(-2.0, -2.0, -10.0));
    }

    #[test]
    fn test_right_vector() {
        let camera = reference_builder(2, 2).build().unwrap();
        assert_eq!(camera.right(), v(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_build_missing_fields() {
        let err = Camera::builder().build().unwrap_err();
        assert!(matches!(err, CameraError::MissingField("location")));

        let err = CameraBuilder {
            sink: None,
            ..reference_builder(2, 2)
        }
        .build()
        .unwrap_err();
        assert!(matches!(err, CameraError::MissingField("image sink")));

        let err = CameraBuilder {
            tracer: None,
            ..reference_builder(2, 2)
        }
        .build()
        .unwrap_err();
        assert!(matches!(err, CameraError::MissingField("ray tracer")));
    }

    #[test]
    fn test_build_rejects_bad_values() {
        let err = reference_builder(2, 2)
            .with_direction(Vector::Z, v(0.0, 1.0, 1.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, CameraError::NotOrthogonal));

        let err = reference_builder(2, 2)
            .with_view_plane_size(0.0, 1.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, CameraError::NonPositive("view plane width")));

        let err = reference_builder(2, 2)
            .with_view_plane_distance(-1.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, CameraError::NonPositive("view plane distance")));

        let err = reference_builder(2, 2).with_antialiasing(0).build().unwrap_err();
        assert!(matches!(err, CameraError::InvalidSampling(_)));

        let err = reference_builder(2, 2)
            .with_depth_of_field(0, 1.0, 10.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, CameraError::InvalidSampling(_)));

        let err = reference_builder(2, 2)
            .with_depth_of_field(3, -1.0, 10.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, CameraError::NonPositive("aperture")));

        let err = reference_builder(2, 2)
            .with_depth_of_field(3, 1.0, 0.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, CameraError::NonPositive("focal distance")));
    }

    #[test]
    fn test_with_description() {
        let description = CameraDescription {
            location: Point::new(0.0, 0.0, 100.0),
            ..CameraDescription::default()
        };
        let camera = Camera::builder()
            .with_description(&description)
            .with_image_sink(PixelBuffer::new(1, 1))
            .with_ray_tracer(DirectionTracer)
            .build()
            .unwrap();
        assert_eq!(camera.location(), Point::new(0.0, 0.0, 100.0));
        assert_direction(&camera.construct_ray(1, 1, 0, 0), DVec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_single_sample_matches_construct_ray() {
        let buffer = PixelBuffer::new(4, 4);
        let camera = reference_builder(4, 4)
            .with_image_sink(buffer.clone())
            .build()
            .unwrap();
        camera.render_image();

        let expected = camera.construct_ray(4, 4, 1, 2).direction().coords();
        assert_eq!(buffer.pixel(1, 2), Some(expected));
    }

    #[test]
    fn test_antialiasing_stays_inside_pixel() {
        // The averaged direction of a pixel stays close to its center ray
        let buffer = PixelBuffer::new(4, 4);
        let camera = reference_builder(4, 4)
            .with_image_sink(buffer.clone())
            .with_antialiasing(4)
            .build()
            .unwrap();
        camera.render_image();

        let center = camera.construct_ray(4, 4, 0, 0).direction().coords();
        let averaged = buffer.pixel(0, 0).unwrap();
        assert_ne!(averaged, center);
        assert!((averaged - center).length() < 0.1);
    }

    #[test]
    fn test_depth_of_field_keeps_focus() {
        // Every lens ray aims at the focus point, so a point on the focal
        // plane stays sharp: the averaged direction still points near it.
        let buffer = PixelBuffer::new(3, 3);
        let camera = reference_builder(3, 3)
            .with_image_sink(buffer.clone())
            .with_depth_of_field(5, 0.5, 10.0)
            .build()
            .unwrap();
        camera.render_image();

        let averaged = buffer.pixel(1, 1).unwrap();
        assert!((averaged - DVec3::new(0.0, 0.0, -1.0)).length() < 0.05);
    }

    #[test]
    fn test_single_lens_sample_is_sharp() {
        // A 1x1 lens grid leaves depth of field off: every seed gives the
        // primary ray
        for seed in 0..50 {
            let buffer = PixelBuffer::new(4, 4);
            let camera = reference_builder(4, 4)
                .with_image_sink(buffer.clone())
                .with_depth_of_field(1, 2.0, 10.0)
                .with_seed(seed)
                .build()
                .unwrap();
            camera.render_image();

            let primary = camera.construct_ray(4, 4, 1, 1).direction().coords();
            assert_eq!(buffer.pixel(1, 1), Some(primary), "seed {seed}");
        }
    }

    struct FlatTracer(Color);

    impl RayTracer for FlatTracer {
        fn trace_ray(&self, _ray: &Ray) -> Color {
            self.0
        }
    }

    #[test]
    fn test_antialiasing_averages_samples() {
        let buffer = PixelBuffer::new(2, 2);
        let camera = reference_builder(2, 2)
            .with_image_sink(buffer.clone())
            .with_ray_tracer(FlatTracer(Color::splat(7.0)))
            .with_antialiasing(3)
            .build()
            .unwrap();
        camera.render_image();
        assert_eq!(buffer.pixel(1, 0), Some(Color::splat(7.0)));

        // Grids wider than 65535 overflow n * n in u32
        assert_eq!(grid_samples(3), 9.0);
        assert_eq!(grid_samples(70_000), 4.9e9);
    }

    fn sphere_scene() -> Arc<Scene> {
        let sphere = Geometry::new(Sphere::new(Point::new(0.0, 0.0, -50.0), 20.0).unwrap())
            .with_material(Material::new().with_kd(0.5).with_ks(0.5).with_shininess(30))
            .with_emission(Color::new(20.0, 10.0, 0.0));
        Arc::new(
            Scene::builder("sphere")
                .with_background(Color::splat(5.0))
                .with_geometry(sphere)
                .with_light(PointLight::new(Color::splat(400.0), Point::new(30.0, 30.0, 0.0)))
                .build(),
        )
    }

    fn render_sphere(threads: ThreadCount) -> PixelBuffer {
        let buffer = PixelBuffer::new(24, 20);
        let camera = Camera::builder()
            .with_location(Point::ZERO)
            .with_direction(-Vector::Z, Vector::Y)
            .with_view_plane_size(60.0, 50.0)
            .with_view_plane_distance(50.0)
            .with_image_sink(buffer.clone())
            .with_ray_tracer(WhittedTracer::new(sphere_scene()))
            .with_antialiasing(2)
            .with_depth_of_field(2, 1.0, 30.0)
            .with_threads(threads)
            .with_bucket_size(5)
            .with_seed(7)
            .build()
            .unwrap();
        camera.render_image();
        buffer
    }

    #[test]
    fn test_render_is_deterministic_across_threads() {
        let single = render_sphere(ThreadCount::Single);
        let again = render_sphere(ThreadCount::Single);
        let threaded = render_sphere(ThreadCount::Fixed(3));
        for y in 0..20 {
            for x in 0..24 {
                assert_eq!(single.pixel(x, y), again.pixel(x, y));
                assert_eq!(single.pixel(x, y), threaded.pixel(x, y));
            }
        }
        // Background and sphere are both visible
        assert_eq!(single.pixel(0, 0), Some(Color::splat(5.0)));
        assert_ne!(single.pixel(12, 10), Some(Color::splat(5.0)));
    }

    #[test]
    fn test_print_grid() {
        let buffer = PixelBuffer::new(5, 5);
        let camera = reference_builder(5, 5)
            .with_image_sink(buffer.clone())
            .build()
            .unwrap();
        let white = Color::splat(255.0);
        camera.print_grid(2, white);

        assert_eq!(buffer.pixel(0, 3), Some(white));
        assert_eq!(buffer.pixel(3, 2), Some(white));
        assert_eq!(buffer.pixel(4, 4), Some(white));
        assert_eq!(buffer.pixel(1, 1), Some(Color::ZERO));
        assert_eq!(buffer.pixel(3, 3), Some(Color::ZERO));

        // Zero interval draws nothing
        let empty = PixelBuffer::new(2, 2);
        let camera = reference_builder(2, 2)
            .with_image_sink(empty.clone())
            .build()
            .unwrap();
        camera.print_grid(0, white);
        assert_eq!(empty.pixel(0, 0), Some(Color::ZERO));
    }

    #[test]
    fn test_write_to_image_flushes_sink() {
        let mut camera = reference_builder(2, 2).build().unwrap();
        camera.render_image();
        assert!(camera.write_to_image().is_ok());
        assert_eq!(camera.image_sink().resolution(), (2, 2));
    }
}
