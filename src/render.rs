use std::time::Instant;

use log::{debug, info, trace};
use rayon::prelude::*;

use crate::camera::{Camera, Viewport};
use crate::light::LightState;
use crate::material::shade;
use crate::object::Scene;
use crate::picture::{Picture, RGBA8};
use crate::ray::FORWARD;

/// Exponent of the display encoding applied to every shaded pixel.
pub const GAMMA: f32 = 0.45;

/// Cornflower blue.
pub const SKY_COLOR: RGBA8 = RGBA8::new(100, 149, 237, 255);

/// Produces the color of a single pixel. Misses show `sky` as is, without shading or gamma.
pub fn render_pixel(x: u32, y: u32, viewport: &Viewport, scene: &Scene, light: &LightState, sky: RGBA8) -> RGBA8 {
    let ray = viewport.emit_ray(x, y);
    let Some(hit) = scene.hit(&ray, FORWARD) else {
        return sky;
    };

    let light = light.direction();
    let in_shadow = hit.shadowed && scene.in_shadow(&hit, &ray.direction, &light);
    shade(&hit, &ray.direction, &light, in_shadow)
        .gamma(GAMMA)
        .into()
}

/// Renders one frame against a single light snapshot and returns the state for the next frame.
pub fn render_frame(
    scene: &Scene,
    camera: &Camera,
    light: LightState,
    sky: RGBA8,
    (width, height): (u32, u32),
) -> (Picture<RGBA8>, LightState) {
    let mut picture = Picture::new((width, height), sky);
    debug!(target: "app", "Allocating new frame. {}x{} ({})", width, height, width * height);
    if width == 0 || height == 0 {
        return (picture, light.advanced());
    }

    let viewport = camera.viewport(width, height);
    picture.buffer_mut()
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            trace!(target: "app", "Rendering row: {}", y);
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = render_pixel(x as u32, y as u32, &viewport, scene, &light, sky);
            }
        });

    // every pixel is done before the light moves
    (picture, light.advanced())
}

/// Frame driver for a host: owns the scene and the animation state between frames.
pub struct Renderer {
    scene: Scene,
    camera: Camera,
    light: LightState,
    sky: RGBA8,
}

impl Renderer {
    pub fn new(scene: Scene, camera: Camera, light: LightState, sky: RGBA8) -> Self {
        Renderer { scene, camera, light, sky }
    }

    pub fn light(&self) -> &LightState {
        &self.light
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn render_frame(&mut self, width: u32, height: u32) -> Picture<RGBA8> {
        info!(target: "app", "Starting frame {} render...", self.light.frame);
        let start = Instant::now();
        let (picture, light) = render_frame(&self.scene, &self.camera, self.light, self.sky, (width, height));
        self.light = light;
        info!(target: "app", "Finished rendering. Took {:?}", start.elapsed());
        picture
    }
}
