use nalgebra::{vector, Vector3};
use serde::Deserialize;

/// The animated light. Rotation is derived from a frame counter, so it never drifts.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LightState {
    /// Rotation in radians at frame zero.
    pub initial: f64,
    /// Radians added per rendered frame.
    pub increment: f64,
    #[serde(skip)]
    pub frame: u64,
}

impl Default for LightState {
    fn default() -> Self {
        LightState::new(-1.0, 0.5)
    }
}

impl LightState {
    pub fn new(initial: f64, increment: f64) -> Self {
        LightState { initial, increment, frame: 0 }
    }

    pub fn rotation(&self) -> f64 {
        self.initial + self.frame as f64 * self.increment
    }

    /// State for the next frame.
    pub fn advanced(self) -> Self {
        LightState { frame: self.frame + 1, ..self }
    }

    /// Unit vector pointing towards the light.
    pub fn direction(&self) -> Vector3<f64> {
        let rotation = self.rotation();
        // y is constant, so this is never the zero vector
        vector![rotation.cos(), 1.0, rotation.sin()].normalize()
    }
}
