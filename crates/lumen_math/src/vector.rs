use crate::util::is_zero;
use glam::DVec3;
use std::fmt;
use std::ops::Neg;
use thiserror::Error;

/// Returned when an operation would produce the zero vector.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("vector cannot be the zero vector")]
pub struct InvalidVector;

/// A non-zero direction or displacement in 3D space.
///
/// Every constructor and every operation that could produce `(0, 0, 0)`
/// returns `Result<Vector, InvalidVector>`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vector(DVec3);

impl Vector {
    pub const X: Vector = Vector(DVec3::X);
    pub const Y: Vector = Vector(DVec3::Y);
    pub const Z: Vector = Vector(DVec3::Z);

    /// Create a new vector.
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self, InvalidVector> {
        Self::try_from(DVec3::new(x, y, z))
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.0.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.0.y
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.0.z
    }

    /// Get a component by axis index (0=X, 1=Y, 2=Z).
    #[inline]
    pub fn axis(&self, n: usize) -> f64 {
        match n {
            0 => self.0.x,
            1 => self.0.y,
            _ => self.0.z,
        }
    }

    /// The raw components.
    #[inline]
    pub fn coords(&self) -> DVec3 {
        self.0
    }

    pub fn add(&self, other: Vector) -> Result<Vector, InvalidVector> {
        Self::try_from(self.0 + other.0)
    }

    pub fn subtract(&self, other: Vector) -> Result<Vector, InvalidVector> {
        Self::try_from(self.0 - other.0)
    }

    pub fn scale(&self, factor: f64) -> Result<Vector, InvalidVector> {
        Self::try_from(self.0 * factor)
    }

    #[inline]
    pub fn dot(&self, other: Vector) -> f64 {
        self.0.dot(other.0)
    }

    /// Cross product. Fails for parallel vectors.
    pub fn cross(&self, other: Vector) -> Result<Vector, InvalidVector> {
        Self::try_from(self.0.cross(other.0))
    }

    #[inline]
    pub fn length_squared(&self) -> f64 {
        self.0.length_squared()
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.0.length()
    }

    /// Unit vector with the same direction.
    #[inline]
    pub fn normalize(&self) -> Vector {
        Vector(self.0 / self.0.length())
    }
}

impl TryFrom<DVec3> for Vector {
    type Error = InvalidVector;

    fn try_from(v: DVec3) -> Result<Self, Self::Error> {
        if is_zero(v.x) && is_zero(v.y) && is_zero(v.z) {
            Err(InvalidVector)
        } else {
            Ok(Self(v))
        }
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector(-self.0)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}, {}>", self.0.x, self.0.y, self.0.z)
    }
}
