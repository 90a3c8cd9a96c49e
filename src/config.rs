//! Scene description files.
//!
//! A scene is a JSON document:
//!
//! ```json
//! {
//!   "camera": { "position": [0.0, 0.0, -3.0], "focal_length": 1.0 },
//!   "light": { "initial": -1.0, "increment": 0.5 },
//!   "sky": [100, 149, 237],
//!   "objects": [
//!     { "shape": { "type": "plane", "normal": [0.0, 1.0, 0.0], "offset": 1.0 },
//!       "material": { "color": [0.6, 0.6, 0.6], "shadowed": true } },
//!     { "shape": { "type": "sphere", "center": [0.0, 0.0, 1.0], "radius": 0.5 },
//!       "material": { "color": [0.9, 0.2, 0.2] } }
//!   ]
//! }
//! ```
//!
//! Every top level key is optional; missing keys take the built-in scene's values.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use nalgebra::{point, vector, Point3, Vector3};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::camera::Camera;
use crate::light::LightState;
use crate::material::Material;
use crate::object::{Object, Scene, Shape};
use crate::picture::{Color, RGBA8};
use crate::render::{Renderer, SKY_COLOR};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read scene file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed scene file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("object {index}: {reason}")]
    Invalid { index: usize, reason: &'static str },
}

fn deserialize_color<'de, D>(de: D) -> Result<Color, D::Error>
where
    D: Deserializer<'de>,
{
    let (r, g, b) = Deserialize::deserialize(de)?;
    Ok(Color::rgb(r, g, b))
}

fn deserialize_rgb<'de, D>(de: D) -> Result<RGBA8, D::Error>
where
    D: Deserializer<'de>,
{
    let (r, g, b) = Deserialize::deserialize(de)?;
    Ok(RGBA8::new(r, g, b, 255))
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeConfig {
    Plane { normal: Vector3<f64>, offset: f64 },
    Sphere { center: Point3<f64>, radius: f64 },
    #[serde(alias = "box")]
    Cuboid { center: Point3<f64>, half_extents: Vector3<f64> },
    Capsule { a: Point3<f64>, b: Point3<f64>, radius: f64 },
    Blob { center: Point3<f64>, radius: f64 },
    Goursat { center: Point3<f64>, ka: f64, kb: f64 },
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MaterialConfig {
    #[serde(deserialize_with = "deserialize_color")]
    pub color: Color,
    #[serde(default)]
    pub shadowed: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ObjectConfig {
    pub shape: ShapeConfig,
    pub material: MaterialConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub camera: Camera,
    pub light: LightState,
    #[serde(deserialize_with = "deserialize_rgb")]
    pub sky: RGBA8,
    pub objects: Vec<ObjectConfig>,
}

impl Default for Config {
    fn default() -> Self {
        let object = |shape, color: [f32; 3], shadowed| ObjectConfig {
            shape,
            material: MaterialConfig { color: Color::rgb(color[0], color[1], color[2]), shadowed },
        };

        Config {
            camera: Camera::default(),
            light: LightState::default(),
            sky: SKY_COLOR,
            objects: vec![
                object(ShapeConfig::Plane { normal: vector![0.0, 1.0, 0.0], offset: 1.0 }, [0.6, 0.6, 0.6], true),
                object(ShapeConfig::Sphere { center: point![-1.6, -0.4, 1.0], radius: 0.6 }, [0.9, 0.2, 0.2], false),
                object(
                    ShapeConfig::Cuboid { center: point![1.6, -0.6, 1.2], half_extents: vector![0.4, 0.4, 0.4] },
                    [0.2, 0.7, 0.3],
                    false,
                ),
                object(
                    ShapeConfig::Capsule { a: point![-0.7, -0.75, 0.0], b: point![0.7, -0.45, 0.2], radius: 0.25 },
                    [0.9, 0.7, 0.2],
                    false,
                ),
                object(ShapeConfig::Blob { center: point![-0.6, 0.7, 2.2], radius: 0.45 }, [0.3, 0.4, 0.9], false),
                object(ShapeConfig::Goursat { center: point![0.9, 0.5, 2.6], ka: 0.2, kb: 1.0 }, [0.8, 0.3, 0.8], false),
            ],
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path)?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Config, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validates the objects and builds the scene, in file order.
    pub fn scene(&self) -> Result<Scene, ConfigError> {
        let objects = self.objects.iter()
            .enumerate()
            .map(|(index, object)| {
                let shape = object.shape.build().map_err(|reason| ConfigError::Invalid { index, reason })?;
                let material = Material {
                    color: object.material.color,
                    shadowed: object.material.shadowed,
                };
                Ok(Object::new(shape, material))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(Scene::new(objects))
    }

    pub fn renderer(&self) -> Result<Renderer, ConfigError> {
        Ok(Renderer::new(self.scene()?, self.camera.clone(), self.light, self.sky))
    }
}

fn finite(values: &[f64]) -> Result<(), &'static str> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err("non-finite parameter")
    }
}

fn positive(value: f64, reason: &'static str) -> Result<(), &'static str> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(reason)
    }
}

impl ShapeConfig {
    fn build(&self) -> Result<Shape, &'static str> {
        match self {
            ShapeConfig::Plane { normal, offset } => {
                finite(&[normal.x, normal.y, normal.z, *offset])?;
                let length = normal.norm();
                positive(length, "plane normal is zero")?;
                // dot(p, n) + offset = 0 keeps its meaning under rescaling
                Ok(Shape::Plane { normal: normal / length, offset: offset / length })
            }
            ShapeConfig::Sphere { center, radius } => {
                finite(&[center.x, center.y, center.z, *radius])?;
                positive(*radius, "radius must be positive")?;
                Ok(Shape::Sphere { center: *center, radius: *radius })
            }
            ShapeConfig::Cuboid { center, half_extents } => {
                finite(&[center.x, center.y, center.z, half_extents.x, half_extents.y, half_extents.z])?;
                positive(half_extents.min(), "half extents must be positive")?;
                Ok(Shape::Cuboid { center: *center, half_extents: *half_extents })
            }
            ShapeConfig::Capsule { a, b, radius } => {
                finite(&[a.x, a.y, a.z, b.x, b.y, b.z, *radius])?;
                positive(*radius, "radius must be positive")?;
                positive((b - a).norm(), "capsule end points coincide")?;
                Ok(Shape::Capsule { a: *a, b: *b, radius: *radius })
            }
            ShapeConfig::Blob { center, radius } => {
                finite(&[center.x, center.y, center.z, *radius])?;
                positive(*radius, "radius must be positive")?;
                Ok(Shape::Blob { center: *center, radius: *radius })
            }
            ShapeConfig::Goursat { center, ka, kb } => {
                finite(&[center.x, center.y, center.z, *ka, *kb])?;
                Ok(Shape::Goursat { center: *center, ka: *ka, kb: *kb })
            }
        }
    }
}
