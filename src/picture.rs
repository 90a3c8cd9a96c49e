use std::ops::Mul;

use bytemuck_derive::{AnyBitPattern, NoUninit};

/// Linear RGB color, shading space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    fn map_channels<F: Fn(f32) -> f32>(self, f: F) -> Self {
        Color::new(f(self.r), f(self.g), f(self.b), self.a)
    }

    /// Power-law encoding of the color channels, alpha untouched.
    pub fn gamma(self, exponent: f32) -> Self {
        self.map_channels(|c| c.max(0.0).powf(exponent))
    }
}

impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, rhs: f32) -> Self::Output {
        self.map_channels(|c| c * rhs)
    }
}

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, AnyBitPattern, NoUninit)]
#[repr(C)]
pub struct RGBA8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl RGBA8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        RGBA8 { r, g, b, a }
    }
}

/// Quantizes to 8 bits per channel, clamping to `[0, 1]` first.
impl From<Color> for RGBA8 {
    fn from(color: Color) -> Self {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
        RGBA8::new(quantize(color.r), quantize(color.g), quantize(color.b), quantize(color.a))
    }
}

/// Owned pixel grid. Row `y = 0` is the bottom of the image.
#[derive(Clone, Debug)]
pub struct Picture<T> {
    pixels: Vec<T>,
    size: (u32, u32),
}

impl<T: Copy> Picture<T> {
    pub fn new(size: (u32, u32), fill: T) -> Self {
        let (width, height) = size;
        Picture {
            pixels: vec![fill; width as usize * height as usize],
            size,
        }
    }
}

impl<T> Picture<T> {
    pub fn width(&self) -> u32 {
        self.size.0
    }

    pub fn height(&self) -> u32 {
        self.size.1
    }

    fn to_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width() as usize + x as usize
    }

    pub fn pixel(&self, x: u32, y: u32) -> &T {
        &self.pixels[self.to_index(x, y)]
    }

    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut T {
        let index = self.to_index(x, y);
        &mut self.pixels[index]
    }

    pub fn buffer(&self) -> &[T] {
        &self.pixels
    }

    pub fn buffer_mut(&mut self) -> &mut [T] {
        &mut self.pixels
    }
}

impl Picture<RGBA8> {
    /// Raw RGBA bytes, row by row from the bottom.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.pixels.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantization_clamps() {
        let pixel: RGBA8 = Color::new(-0.5, 0.5, 2.0, 1.0).into();
        assert_eq!(pixel, RGBA8::new(0, 127, 255, 255));
    }

    #[test]
    fn scaling_keeps_alpha() {
        let scaled = Color::new(0.5, 0.25, 1.0, 0.75) * 2.0;
        assert_eq!(scaled, Color::new(1.0, 0.5, 2.0, 0.75));
    }

    #[test]
    fn gamma_encoding() {
        let encoded = Color::rgb(0.25, 1.0, 0.0).gamma(0.45);
        assert!((encoded.r - 0.25f32.powf(0.45)).abs() < 1e-6);
        assert_eq!(encoded.g, 1.0);
        assert_eq!(encoded.b, 0.0);
        assert_eq!(encoded.a, 1.0);
    }

    #[test]
    fn bytes_follow_pixels() {
        let mut picture = Picture::new((2, 2), RGBA8::default());
        *picture.pixel_mut(1, 0) = RGBA8::new(1, 2, 3, 4);
        *picture.pixel_mut(0, 1) = RGBA8::new(5, 6, 7, 8);
        assert_eq!(picture.as_bytes().len(), 16);
        assert_eq!(&picture.as_bytes()[4..8], &[1, 2, 3, 4]);
        assert_eq!(&picture.as_bytes()[8..12], &[5, 6, 7, 8]);
        assert_eq!(*picture.pixel(1, 0), RGBA8::new(1, 2, 3, 4));
    }
}
