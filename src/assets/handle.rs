//! Shared, immutable image handle
//!
//! The simulation only needs an image's extent and its alpha channel (for
//! hit-testing). Pixel data is reference counted so a handle can be cloned
//! into every draw command without copying.

use std::fmt;
use std::sync::Arc;

use glam::IVec2;
use image::RgbaImage;

#[derive(Clone)]
pub struct Image {
    pixels: Arc<RgbaImage>,
}

impl Image {
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
        }
    }

    /// Fully opaque image of the given size (tests, placeholders)
    pub fn solid(width: u32, height: u32) -> Self {
        Self::from_rgba(RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([255, 255, 255, 255]),
        ))
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.pixels.width() as i32
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.pixels.height() as i32
    }

    /// Pixel extent as (width, height)
    #[inline]
    pub fn size(&self) -> IVec2 {
        IVec2::new(self.width(), self.height())
    }

    /// True if the pixel at image-relative `point` is not fully transparent.
    /// Points outside the image are never opaque.
    pub fn is_opaque_at(&self, point: IVec2) -> bool {
        if point.x < 0 || point.y < 0 || point.x >= self.width() || point.y >= self.height() {
            return false;
        }
        self.pixels.get_pixel(point.x as u32, point.y as u32).0[3] > 0
    }

    /// True if both handles share the same pixel buffer
    pub fn ptr_eq(&self, other: &Image) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_opacity_respects_alpha_channel() {
        let mut pixels = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]));
        pixels.put_pixel(1, 2, Rgba([10, 20, 30, 1]));
        let img = Image::from_rgba(pixels);

        assert!(img.is_opaque_at(IVec2::new(1, 2)));
        assert!(!img.is_opaque_at(IVec2::new(0, 0)));
    }

    #[test]
    fn test_opacity_outside_bounds() {
        let img = Image::solid(3, 3);
        assert!(img.is_opaque_at(IVec2::new(2, 2)));
        assert!(!img.is_opaque_at(IVec2::new(3, 0)));
        assert!(!img.is_opaque_at(IVec2::new(-1, 1)));
    }

    #[test]
    fn test_clones_share_pixels() {
        let a = Image::solid(2, 2);
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&Image::solid(2, 2)));
        assert_eq!(a.size(), IVec2::new(2, 2));
    }
}
