//! Analytic ray caster for a small scene of implicit surfaces.
//!
//! Every pixel casts one camera ray, takes the nearest hit among planes, spheres,
//! boxes, capsules and two quartic surfaces, and shades it with diffuse and
//! specular lighting plus a single hard shadow ray. Frames are rendered into an
//! owned [`Picture`]; presenting them is left to the host.

pub mod camera;
pub mod config;
pub mod light;
pub mod material;
pub mod math;
pub mod object;
pub mod picture;
pub mod primitive;
pub mod quartic;
pub mod ray;
pub mod render;

pub use crate::camera::{Camera, Viewport};
pub use crate::config::{Config, ConfigError};
pub use crate::light::LightState;
pub use crate::material::Material;
pub use crate::object::{Object, Scene, Shape};
pub use crate::picture::{Color, Picture, RGBA8};
pub use crate::ray::{Hit, Ray};
pub use crate::render::{render_frame, Renderer};
