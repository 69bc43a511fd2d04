//! Light sources.

use crate::{Color, Double3};
use lumen_math::{Point, Vector};

/// Uniform light added to every visible surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    intensity: Color,
}

impl AmbientLight {
    /// No ambient light at all.
    pub const NONE: AmbientLight = AmbientLight {
        intensity: Color::ZERO,
    };

    /// Ambient light of `color` scaled by the attenuation factor `ka`.
    pub fn new(color: Color, ka: Double3) -> Self {
        Self {
            intensity: color * ka,
        }
    }

    pub fn intensity(&self) -> Color {
        self.intensity
    }
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self::NONE
    }
}

/// A light placed at a point, attenuated with distance by
/// `1 / (kc + kl*d + kq*d^2)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub color: Color,
    pub position: Point,
    pub kc: f64,
    pub kl: f64,
    pub kq: f64,
}

impl PointLight {
    pub fn new(color: Color, position: Point) -> Self {
        Self {
            color,
            position,
            kc: 1.0,
            kl: 0.0,
            kq: 0.0,
        }
    }

    pub fn with_kc(mut self, kc: f64) -> Self {
        self.kc = kc;
        self
    }

    pub fn with_kl(mut self, kl: f64) -> Self {
        self.kl = kl;
        self
    }

    pub fn with_kq(mut self, kq: f64) -> Self {
        self.kq = kq;
        self
    }

    fn intensity_at(&self, p: Point) -> Color {
        let d = self.position.distance(p);
        self.color / (self.kc + self.kl * d + self.kq * d * d)
    }

    fn direction_to(&self, p: Point) -> Option<Vector> {
        p.subtract(self.position).ok().map(|v| v.normalize())
    }
}

/// A point light that only shines along `direction`, with a falloff of
/// `max(0, direction·l)^narrow_beam`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotLight {
    pub light: PointLight,
    pub direction: Vector,
    pub narrow_beam: f64,
}

impl SpotLight {
    pub fn new(color: Color, position: Point, direction: Vector) -> Self {
        Self {
            light: PointLight::new(color, position),
            direction: direction.normalize(),
            narrow_beam: 1.0,
        }
    }

    pub fn with_kc(mut self, kc: f64) -> Self {
        self.light.kc = kc;
        self
    }

    pub fn with_kl(mut self, kl: f64) -> Self {
        self.light.kl = kl;
        self
    }

    pub fn with_kq(mut self, kq: f64) -> Self {
        self.light.kq = kq;
        self
    }

    pub fn with_narrow_beam(mut self, narrow_beam: f64) -> Self {
        self.narrow_beam = narrow_beam;
        self
    }

    fn intensity_at(&self, p: Point) -> Color {
        let Some(l) = self.light.direction_to(p) else {
            return Color::ZERO;
        };
        let falloff = self.direction.dot(l).max(0.0).powf(self.narrow_beam);
        self.light.intensity_at(p) * falloff
    }
}

/// A light infinitely far away: constant intensity from one direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    pub direction: Vector,
}

impl DirectionalLight {
    pub fn new(color: Color, direction: Vector) -> Self {
        Self {
            color,
            direction: direction.normalize(),
        }
    }
}

/// A light source that illuminates individual surface points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Light {
    Point(PointLight),
    Spot(SpotLight),
    Directional(DirectionalLight),
}

impl Light {
    /// Light intensity arriving at `p`.
    pub fn intensity_at(&self, p: Point) -> Color {
        match self {
            Light::Point(light) => light.intensity_at(p),
            Light::Spot(light) => light.intensity_at(p),
            Light::Directional(light) => light.color,
        }
    }

    /// Unit direction from the light towards `p`.
    ///
    /// `None` when `p` is exactly at the light's position.
    pub fn direction_to(&self, p: Point) -> Option<Vector> {
        match self {
            Light::Point(light) => light.direction_to(p),
            Light::Spot(spot) => spot.light.direction_to(p),
            Light::Directional(light) => Some(light.direction),
        }
    }

    /// Distance from the light to `p`; shadow rays stop there.
    pub fn distance_to(&self, p: Point) -> f64 {
        match self {
            Light::Point(light) => light.position.distance(p),
            Light::Spot(spot) => spot.light.position.distance(p),
            Light::Directional(_) => f64::INFINITY,
        }
    }
}

impl From<PointLight> for Light {
    fn from(light: PointLight) -> Self {
        Light::Point(light)
    }
}

impl From<SpotLight> for Light {
    fn from(light: SpotLight) -> Self {
        Light::Spot(light)
    }
}

impl From<DirectionalLight> for Light {
    fn from(light: DirectionalLight) -> Self {
        Light::Directional(light)
    }
}
