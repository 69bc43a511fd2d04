//! Phong material coefficients.

use crate::Double3;

/// Surface material for the Whitted shading model.
///
/// All coefficients are per channel and expected in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    /// Diffuse factor
    pub kd: Double3,
    /// Specular factor
    pub ks: Double3,
    /// Reflection factor
    pub kr: Double3,
    /// Transparency factor
    pub kt: Double3,
    /// Specular exponent
    pub shininess: u32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            kd: Double3::ZERO,
            ks: Double3::ZERO,
            kr: Double3::ZERO,
            kt: Double3::ZERO,
            shininess: 0,
        }
    }
}

impl Material {
    /// Create a black, fully absorbing material.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kd(mut self, kd: impl Into<Coefficient>) -> Self {
        self.kd = kd.into().0;
        self
    }

    pub fn with_ks(mut self, ks: impl Into<Coefficient>) -> Self {
        self.ks = ks.into().0;
        self
    }

    pub fn with_kr(mut self, kr: impl Into<Coefficient>) -> Self {
        self.kr = kr.into().0;
        self
    }

    pub fn with_kt(mut self, kt: impl Into<Coefficient>) -> Self {
        self.kt = kt.into().0;
        self
    }

    pub fn with_shininess(mut self, shininess: u32) -> Self {
        self.shininess = shininess;
        self
    }
}

/// A coefficient given either as one value for all channels or per channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coefficient(pub Double3);

impl From<f64> for Coefficient {
    fn from(k: f64) -> Self {
        Self(Double3::splat(k))
    }
}

impl From<Double3> for Coefficient {
    fn from(k: Double3) -> Self {
        Self(k)
    }
}
