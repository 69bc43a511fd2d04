//! Raw serde types mirroring the JSON scene format.
//!
//! These map one-to-one onto the file layout; `loader` validates them and
//! converts them into a `SceneDescription`.

use serde::Deserialize;

/// Three numbers written as `"x y z"` or `[x, y, z]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "TripleRepr")]
pub struct Triple(pub [f64; 3]);

#[derive(Deserialize)]
#[serde(untagged)]
enum TripleRepr {
    Text(String),
    Array([f64; 3]),
}

impl TryFrom<TripleRepr> for Triple {
    type Error = String;

    fn try_from(repr: TripleRepr) -> Result<Self, Self::Error> {
        match repr {
            TripleRepr::Array(values) => Ok(Triple(values)),
            TripleRepr::Text(text) => {
                let values = text
                    .split_whitespace()
                    .map(|part| {
                        part.parse::<f64>()
                            .map_err(|e| format!("invalid number {part:?} in {text:?}: {e}"))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let values: [f64; 3] = values
                    .try_into()
                    .map_err(|v: Vec<f64>| format!("expected 3 numbers in {text:?}, found {}", v.len()))?;
                Ok(Triple(values))
            }
        }
    }
}

/// Material coefficient: one value for all channels, or one per channel.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawCoefficient {
    Scalar(f64),
    Triple(Triple),
}

#[derive(Debug, Deserialize)]
pub struct SceneFile {
    pub scene: RawScene,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawScene {
    pub name: Option<String>,
    pub background_color: Option<Triple>,
    pub ambient_light: Option<RawAmbientLight>,
    #[serde(default)]
    pub geometries: Vec<RawGeometry>,
    #[serde(default)]
    pub lights: Vec<RawLight>,
    pub camera: Option<RawCamera>,
}

#[derive(Debug, Deserialize)]
pub struct RawAmbientLight {
    pub color: Triple,
    pub ka: Option<RawCoefficient>,
}

#[derive(Debug, Deserialize)]
pub struct RawGeometry {
    #[serde(flatten)]
    pub shape: RawShape,
    pub material: Option<RawMaterial>,
    pub emission: Option<Triple>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawShape {
    Sphere(RawSphere),
    Plane(RawPlane),
    Triangle(Vec<Triple>),
    Polygon(Vec<Triple>),
    Tube(RawTube),
    Cylinder(RawCylinder),
}

#[derive(Debug, Deserialize)]
pub struct RawSphere {
    pub center: Triple,
    pub radius: f64,
}

#[derive(Debug, Deserialize)]
pub struct RawPlane {
    pub point: Triple,
    pub normal: Triple,
}

#[derive(Debug, Deserialize)]
pub struct RawAxis {
    pub origin: Triple,
    pub direction: Triple,
}

#[derive(Debug, Deserialize)]
pub struct RawTube {
    pub axis: RawAxis,
    pub radius: f64,
}

#[derive(Debug, Deserialize)]
pub struct RawCylinder {
    pub axis: RawAxis,
    pub radius: f64,
    pub height: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawMaterial {
    pub kd: Option<RawCoefficient>,
    pub ks: Option<RawCoefficient>,
    pub kr: Option<RawCoefficient>,
    pub kt: Option<RawCoefficient>,
    #[serde(alias = "shininess")]
    pub ns: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawLight {
    Point(RawPointLight),
    Spot(RawSpotLight),
    Directional(RawDirectionalLight),
}

#[derive(Debug, Deserialize)]
pub struct RawPointLight {
    pub color: Triple,
    pub position: Triple,
    pub kc: Option<f64>,
    pub kl: Option<f64>,
    pub kq: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawSpotLight {
    pub color: Triple,
    pub position: Triple,
    pub direction: Triple,
    pub kc: Option<f64>,
    pub kl: Option<f64>,
    pub kq: Option<f64>,
    pub narrow_beam: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct RawDirectionalLight {
    pub color: Triple,
    pub direction: Triple,
}

#[derive(Debug, Deserialize)]
pub struct RawCamera {
    pub location: Triple,
    pub to: Triple,
    pub up: Triple,
    pub width: f64,
    pub height: f64,
    pub distance: f64,
}
