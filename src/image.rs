// Copyright 2026 the raytracer authors under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! The output of a render: a flat, row-major RGBA8 buffer with no container format. A
//! caller that wants PNG/PPM/etc. wraps [`Image::as_raw_rgba8`] with whatever encoder it
//! likes; this crate doesn't pick one for them.

/// A quantized, gamma-corrected render. Alpha is always 255 — this crate has no notion
/// of a transparent background.
pub struct Image {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Image {
    /// Builds an image from already gamma-corrected, 8-bit-quantized pixel colors in
    /// row-major order. Panics if `colors.len() != width * height`.
    pub fn from_colors(width: u32, height: u32, colors: &[[u8; 3]]) -> Image {
        assert_eq!(colors.len(), width as usize * height as usize, "pixel count must match width * height");
        let mut data = Vec::with_capacity(colors.len() * 4);
        for &[r, g, b] in colors {
            data.extend_from_slice(&[r, g, b, 255]);
        }
        Image { width, height, data }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y * self.width + x) * 4) as usize
    }

    /// The raw row-major RGBA8 buffer: `width * height * 4` bytes, no header.
    pub fn as_raw_rgba8(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw_rgba8(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_is_row_major_with_fixed_alpha() {
        let colors = [[255, 0, 0], [0, 255, 0], [0, 0, 255], [10, 20, 30]];
        let image = Image::from_colors(2, 2, &colors);
        assert_eq!(image.pixel(0, 0), [255, 0, 0, 255]);
        assert_eq!(image.pixel(1, 0), [0, 255, 0, 255]);
        assert_eq!(image.pixel(0, 1), [0, 0, 255, 255]);
        assert_eq!(image.pixel(1, 1), [10, 20, 30, 255]);
    }

    #[test]
    fn raw_buffer_length_matches_dimensions() {
        let colors = vec![[0, 0, 0]; 6];
        let image = Image::from_colors(3, 2, &colors);
        assert_eq!(image.as_raw_rgba8().len(), 3 * 2 * 4);
    }

    #[test]
    #[should_panic]
    fn mismatched_pixel_count_panics() {
        Image::from_colors(2, 2, &[[0, 0, 0]]);
    }
}
