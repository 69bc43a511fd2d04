//! Recursive Whitted-style shading.
//!
//! Local lighting (emission, ambient, diffuse, specular with shadows
//! attenuated by transparency) plus reflection and straight-through
//! refraction, recursing until the level budget runs out or the running
//! attenuation becomes negligible.

use std::sync::Arc;

use glam::DVec3;

use crate::{GeoPoint, Scene};
use lumen_core::{below, Color, Double3, Light, Material};
use lumen_math::{align_zero, Point, Ray, Vector};

/// Maximum recursion depth of reflection and refraction rays.
pub const MAX_CALC_COLOR_LEVEL: u32 = 10;

/// Contributions attenuated below this in every channel are skipped.
pub const MIN_CALC_COLOR_K: f64 = 0.001;

/// Attenuation of a primary ray.
pub const INITIAL_K: Double3 = Double3::ONE;

/// Computes the color seen along a ray.
pub trait RayTracer: Send + Sync {
    fn trace_ray(&self, ray: &Ray) -> Color;
}

/// Whitted-style ray tracer over a shared scene.
#[derive(Debug, Clone)]
pub struct WhittedTracer {
    scene: Arc<Scene>,
}

impl WhittedTracer {
    pub fn new(scene: Arc<Scene>) -> Self {
        Self { scene }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    fn calc_color(&self, gp: &GeoPoint<'_>, ray: &Ray, level: u32, k: Double3) -> Color {
        let local = self.calc_local_effects(gp, ray, k);
        if level <= 1 {
            return local;
        }
        local + self.calc_global_effects(gp, ray, level, k)
    }

    fn calc_local_effects(&self, gp: &GeoPoint<'_>, ray: &Ray, k: Double3) -> Color {
        let emission = gp.geometry.emission();
        let Ok(n) = gp.normal() else {
            return emission;
        };
        let v = ray.direction();
        let nv = align_zero(n.dot(v));
        if nv == 0.0 {
            return Color::ZERO;
        }

        let material = gp.geometry.material();
        let mut color = emission + self.scene.ambient.intensity();
        for light in &self.scene.lights {
            let Some(l) = light.direction_to(gp.point) else {
                continue;
            };
            let nl = align_zero(n.dot(l));
            if nl * nv <= 0.0 {
                continue;
            }

            let ktr = self.transparency(gp.point, light, l, n);
            if below(ktr * k, MIN_CALC_COLOR_K) {
                continue;
            }
            let intensity = light.intensity_at(gp.point) * ktr;
            color += intensity * (diffusive(material, nl) + specular(material, n, l, nl, v));
        }
        color
    }

    /// Product of `kt` over everything between `p` and the light.
    fn transparency(&self, p: Point, light: &Light, l: Vector, n: Vector) -> Double3 {
        let shadow_ray = Ray::with_offset(p, -l, n);
        let blockers = self
            .scene
            .geometries
            .find_intersections(&shadow_ray, light.distance_to(p));

        let mut ktr = Double3::ONE;
        for blocker in blockers {
            ktr *= blocker.geometry.material().kt;
            if below(ktr, MIN_CALC_COLOR_K) {
                return Double3::ZERO;
            }
        }
        ktr
    }

    fn calc_global_effects(&self, gp: &GeoPoint<'_>, ray: &Ray, level: u32, k: Double3) -> Color {
        let Ok(n) = gp.normal() else {
            return Color::ZERO;
        };
        let v = ray.direction();
        let material = gp.geometry.material();

        let mut color = Color::ZERO;
        if let Ok(r) = Vector::try_from(reflect(v, n)) {
            let reflected = Ray::with_offset(gp.point, r, n);
            color += self.calc_global_effect(&reflected, level, k, material.kr);
        }
        let refracted = Ray::with_offset(gp.point, v, n);
        color += self.calc_global_effect(&refracted, level, k, material.kt);
        color
    }

    fn calc_global_effect(&self, ray: &Ray, level: u32, k: Double3, kx: Double3) -> Color {
        let kkx = k * kx;
        if below(kkx, MIN_CALC_COLOR_K) {
            return Color::ZERO;
        }
        match self.scene.geometries.find_closest(ray) {
            Some(gp) => self.calc_color(&gp, ray, level - 1, kkx) * kx,
            None => self.scene.background * kx,
        }
    }
}

impl RayTracer for WhittedTracer {
    fn trace_ray(&self, ray: &Ray) -> Color {
        match self.scene.geometries.find_closest(ray) {
            Some(gp) => self.calc_color(&gp, ray, MAX_CALC_COLOR_LEVEL, INITIAL_K),
            None => self.scene.background,
        }
    }
}

/// Mirror `v` about the plane with normal `n`: `v - 2(v·n)n`.
fn reflect(v: Vector, n: Vector) -> DVec3 {
    v.coords() - n.coords() * (2.0 * v.dot(n))
}

fn diffusive(material: &Material, nl: f64) -> Double3 {
    material.kd * nl.abs()
}

fn specular(material: &Material, n: Vector, l: Vector, nl: f64, v: Vector) -> Double3 {
    let r = l.coords() - n.coords() * (2.0 * nl);
    let vr = align_zero(-v.coords().dot(r));
    if vr <= 0.0 {
        return Double3::ZERO;
    }
    material.ks * vr.powi(shininess_exponent(material.shininess))
}

/// Exponents beyond `i32::MAX` saturate.
fn shininess_exponent(shininess: u32) -> i32 {
    i32::try_from(shininess).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Geometry, Plane, Sphere};
    use lumen_core::{DirectionalLight, PointLight};

    const DELTA: f64 = 1e-9;

    fn approx(a: Color, b: Color) -> bool {
        (a - b).length() < DELTA
    }

    fn tracer(scene: Scene) -> WhittedTracer {
        WhittedTracer::new(Arc::new(scene))
    }

    fn facing_plane(material: Material) -> Geometry {
        Geometry::new(Plane::new(Point::new(0.0, 0.0, -10.0), Vector::Z)).with_material(material)
    }

    #[test]
    fn test_background_on_miss() {
        let t = tracer(Scene::builder("empty").with_background(Color::splat(42.0)).build());
        let ray = Ray::new(Point::ZERO, -Vector::Z);
        assert_eq!(t.trace_ray(&ray), Color::splat(42.0));
    }

    #[test]
    fn test_emission_and_ambient() {
        let geometry = facing_plane(Material::new()).with_emission(Color::new(10.0, 20.0, 30.0));
        let scene = Scene::builder("emission")
            .with_ambient(lumen_core::AmbientLight::new(Color::splat(100.0), Double3::splat(0.1)))
            .with_geometry(geometry)
            .build();

        let ray = Ray::new(Point::ZERO, -Vector::Z);
        assert!(approx(tracer(scene).trace_ray(&ray), Color::new(20.0, 30.0, 40.0)));
    }

    #[test]
    fn test_grazing_view_is_black() {
        let geometry = facing_plane(Material::new().with_kd(1.0)).with_emission(Color::splat(50.0));
        let scene = Scene::builder("grazing")
            .with_ambient(lumen_core::AmbientLight::new(Color::splat(100.0), Double3::ONE))
            .with_light(DirectionalLight::new(Color::splat(100.0), -Vector::Z))
            .build();
        let t = tracer(scene);

        // The view ray runs inside the plane: n·v is zero
        let gp = GeoPoint {
            geometry: &geometry,
            point: Point::new(0.0, 0.0, -10.0),
        };
        let ray = Ray::new(Point::new(-5.0, 0.0, -10.0), Vector::X);
        assert_eq!(t.calc_local_effects(&gp, &ray, INITIAL_K), Color::ZERO);
    }

    #[test]
    fn test_shininess_exponent_saturates() {
        assert_eq!(shininess_exponent(30), 30);
        assert_eq!(shininess_exponent(u32::MAX), i32::MAX);

        // A huge exponent on a perfect mirror direction still gives ks
        let material = Material::new().with_ks(0.5).with_shininess(u32::MAX);
        let n = Vector::Z;
        let l = -Vector::Z;
        let v = -Vector::Z;
        assert_eq!(specular(&material, n, l, n.dot(l), v), Double3::splat(0.5));

        // Off the mirror direction the highlight vanishes instead of wrapping
        let v = Vector::new(0.1, 0.0, -1.0).unwrap();
        assert_eq!(specular(&material, n, l, n.dot(l), v), Double3::ZERO);
    }

    #[test]
    fn test_diffuse_and_specular() {
        // Light straight behind the camera: nl = -1, vr = 1
        let material = Material::new().with_kd(0.5).with_ks(0.25).with_shininess(3);
        let scene = Scene::builder("lit")
            .with_geometry(facing_plane(material))
            .with_light(DirectionalLight::new(Color::splat(100.0), -Vector::Z))
            .build();

        let ray = Ray::new(Point::ZERO, -Vector::Z);
        assert!(approx(tracer(scene).trace_ray(&ray), Color::splat(75.0)));
    }

    #[test]
    fn test_light_behind_surface_is_ignored() {
        let material = Material::new().with_kd(1.0);
        let scene = Scene::builder("backlit")
            .with_geometry(facing_plane(material))
            .with_light(DirectionalLight::new(Color::splat(100.0), Vector::Z))
            .build();

        let ray = Ray::new(Point::ZERO, -Vector::Z);
        assert_eq!(tracer(scene).trace_ray(&ray), Color::ZERO);
    }

    #[test]
    fn test_shadow_and_transparent_blocker() {
        let light = PointLight::new(Color::splat(100.0), Point::new(0.0, 0.0, 10.0));
        let blocker = |kt: f64| {
            Geometry::new(Sphere::new(Point::new(0.0, 0.0, 0.0), 1.0).unwrap())
                .with_material(Material::new().with_kt(kt))
        };
        let ray = Ray::new(Point::new(0.0, 0.0, 5.0), -Vector::Z);
        let floor = Geometry::new(Plane::new(Point::new(0.0, 0.0, -10.0), Vector::Z))
            .with_material(Material::new().with_kd(1.0));

        // Opaque blocker: the floor point under it is dark
        let scene = Scene::builder("shadow")
            .with_geometry(floor.clone())
            .with_light(light)
            .build();
        let lit = tracer(scene).trace_ray(&ray);
        assert!(approx(lit, Color::splat(100.0)));

        // The sphere sits on the camera ray, so look past it from the side
        let side_ray = Ray::new(
            Point::new(5.0, 0.0, 5.0),
            Vector::new(-5.0, 0.0, -15.0).unwrap(),
        );
        let opaque = Scene::builder("opaque")
            .with_geometry(floor.clone())
            .with_geometry(blocker(0.0))
            .with_light(light)
            .build();
        let half = Scene::builder("half")
            .with_geometry(floor.clone())
            .with_geometry(blocker(0.5))
            .with_light(light)
            .build();
        let open = Scene::builder("open")
            .with_geometry(floor)
            .with_light(light)
            .build();

        let c_opaque = tracer(opaque).trace_ray(&side_ray);
        let c_half = tracer(half).trace_ray(&side_ray);
        let c_open = tracer(open).trace_ray(&side_ray);

        assert_eq!(c_opaque, Color::ZERO);
        // Two surfaces of the sphere: 0.5 * 0.5
        assert!(approx(c_half, c_open * 0.25));
    }

    #[test]
    fn test_reflection() {
        // Mirror facing the camera, emissive plane behind the camera
        let mirror = Geometry::new(Plane::new(Point::new(0.0, 0.0, -10.0), Vector::Z))
            .with_material(Material::new().with_kr(0.5));
        let wall = Geometry::new(Plane::new(Point::new(0.0, 0.0, 10.0), -Vector::Z))
            .with_emission(Color::splat(100.0));
        let scene = Scene::builder("mirror")
            .with_geometry(mirror)
            .with_geometry(wall)
            .build();

        let ray = Ray::new(Point::ZERO, -Vector::Z);
        let color = tracer(scene).trace_ray(&ray);
        assert!(approx(color, Color::splat(50.0)));
    }

    #[test]
    fn test_refraction_passes_straight_through() {
        let glass = Geometry::new(Plane::new(Point::new(0.0, 0.0, -5.0), Vector::Z))
            .with_material(Material::new().with_kt(0.5));
        let scene = Scene::builder("glass")
            .with_background(Color::splat(80.0))
            .with_geometry(glass)
            .build();

        let ray = Ray::new(Point::ZERO, -Vector::Z);
        assert!(approx(tracer(scene).trace_ray(&ray), Color::splat(40.0)));
    }

    #[test]
    fn test_mutual_mirrors_terminate() {
        let material = Material::new().with_kr(1.0);
        let front = Geometry::new(Plane::new(Point::new(0.0, 0.0, -10.0), Vector::Z))
            .with_material(material)
            .with_emission(Color::splat(1.0));
        let back = Geometry::new(Plane::new(Point::new(0.0, 0.0, 10.0), -Vector::Z))
            .with_material(material)
            .with_emission(Color::splat(1.0));
        let scene = Scene::builder("hall of mirrors")
            .with_geometry(front)
            .with_geometry(back)
            .build();

        let ray = Ray::new(Point::ZERO, -Vector::Z);
        let color = tracer(scene).trace_ray(&ray);
        // One emission per level
        assert!(approx(color, Color::splat(MAX_CALC_COLOR_LEVEL as f64)));
    }
}
