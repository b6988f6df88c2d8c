//! Intensity grid abstraction for region detection.
//!
//! A [`Frame`] is the single-channel view of one screenshot. It is built once
//! per overlay activation, analysed, and dropped.

use image::{imageops, GenericImageView, GrayImage, ImageBuffer, Luma, Rgba};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect as PixelRect;
use serde::{Deserialize, Serialize};

use crate::error::FrameError;

/// An axis-aligned rectangle in frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    #[must_use]
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Area in pixels, widened so large boxes never overflow.
    #[must_use]
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Square of side `2 * radius` centred on `(cx, cy)`, clipped to the frame.
    #[must_use]
    pub fn around(cx: u32, cy: u32, radius: u32, frame_width: u32, frame_height: u32) -> Self {
        let x0 = cx.saturating_sub(radius);
        let y0 = cy.saturating_sub(radius);
        let x1 = cx.saturating_add(radius).min(frame_width);
        let y1 = cy.saturating_add(radius).min(frame_height);
        Self::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }
}

/// Mean and population standard deviation of intensity over a region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityStats {
    pub mean: f64,
    pub std_dev: f64,
}

/// A single-channel 8-bit intensity image.
///
/// `origin` is the screen coordinate of pixel (0, 0). For a multi-monitor
/// desktop this is the top-left corner of the virtual screen, which can be
/// negative when a monitor sits left of or above the primary one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    image: GrayImage,
    origin: (i32, i32),
}

impl Frame {
    /// A frame with every pixel set to `value`.
    pub fn filled(width: u32, height: u32, value: u8) -> Result<Self, FrameError> {
        Self::from_luma(GrayImage::from_pixel(width, height, Luma([value])))
    }

    /// Wrap an already converted intensity image.
    pub fn from_luma(image: GrayImage) -> Result<Self, FrameError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(FrameError::EmptyDimensions { width, height });
        }
        Ok(Self {
            image,
            origin: (0, 0),
        })
    }

    /// Convert RGBA pixel data (as produced by most capture APIs) to intensity.
    pub fn from_rgba(width: u32, height: u32, bytes: &[u8]) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::EmptyDimensions { width, height });
        }
        let expected = width as usize * height as usize * 4;
        let size_error = FrameError::BufferSize {
            width,
            height,
            expected,
            actual: bytes.len(),
        };
        if bytes.len() != expected {
            return Err(size_error);
        }
        let rgba =
            ImageBuffer::<Rgba<u8>, &[u8]>::from_raw(width, height, bytes).ok_or(size_error)?;
        Self::from_luma(imageops::grayscale(&rgba))
    }

    /// Set the screen coordinate of pixel (0, 0).
    #[must_use]
    pub fn with_origin(mut self, x: i32, y: i32) -> Self {
        self.origin = (x, y);
        self
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn origin(&self) -> (i32, i32) {
        self.origin
    }

    /// The underlying intensity image, for the vision passes.
    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    /// Intensity at `(x, y)`, or `None` out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        self.image.get_pixel_checked(x, y).map(|p| p.0[0])
    }

    /// Fill a rectangle (clipped to the frame) with one value.
    pub fn fill_rect(&mut self, rect: Rect, value: u8) {
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        let area = PixelRect::at(rect.x as i32, rect.y as i32).of_size(rect.width, rect.height);
        draw_filled_rect_mut(&mut self.image, area, Luma([value]));
    }

    /// Copy `other` into this frame with its top-left at `(x, y)`, clipped.
    pub fn blit(&mut self, other: &Frame, x: u32, y: u32) {
        imageops::replace(&mut self.image, &other.image, i64::from(x), i64::from(y));
    }

    /// Intensity statistics over `rect` (clipped). `None` for an empty region.
    pub fn stats(&self, rect: Rect) -> Option<IntensityStats> {
        let x1 = rect.x.saturating_add(rect.width).min(self.width());
        let y1 = rect.y.saturating_add(rect.height).min(self.height());
        if rect.x >= x1 || rect.y >= y1 {
            return None;
        }

        let view = self.image.view(rect.x, rect.y, x1 - rect.x, y1 - rect.y);
        let (sum, sum_sq) = view.pixels().fold((0u64, 0u64), |(sum, sum_sq), (_, _, p)| {
            let v = u64::from(p.0[0]);
            (sum + v, sum_sq + v * v)
        });

        let n = u64::from(x1 - rect.x) * u64::from(y1 - rect.y);
        let mean = sum as f64 / n as f64;
        let variance = (sum_sq as f64 / n as f64 - mean * mean).max(0.0);
        Some(IntensityStats {
            mean,
            std_dev: variance.sqrt(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_conversion_orders_channels_by_luma() {
        let bytes = [
            255, 0, 0, 255, // red
            0, 255, 0, 255, // green
            0, 0, 255, 255, // blue
            255, 255, 255, 255, // white
        ];
        let frame = Frame::from_rgba(2, 2, &bytes).unwrap();
        let (red, green, blue) = (
            frame.get(0, 0).unwrap(),
            frame.get(1, 0).unwrap(),
            frame.get(0, 1).unwrap(),
        );
        assert!(green > red && red > blue, "{} {} {}", red, green, blue);
        assert_eq!(frame.get(1, 1), Some(255));
        assert_eq!(frame.get(2, 0), None);
    }

    #[test]
    fn rejects_bad_buffers() {
        assert!(matches!(
            Frame::from_rgba(0, 5, &[]),
            Err(FrameError::EmptyDimensions { .. })
        ));
        assert!(matches!(
            Frame::from_rgba(2, 2, &[0; 15]),
            Err(FrameError::BufferSize { expected: 16, .. })
        ));
        assert!(Frame::from_luma(GrayImage::new(0, 3)).is_err());
    }

    #[test]
    fn stats_of_uniform_region() {
        let frame = Frame::filled(10, 10, 100).unwrap();
        let stats = frame.stats(Rect::new(2, 2, 4, 4)).unwrap();
        assert_eq!(stats.mean, 100.0);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn stats_of_half_split_region() {
        let mut frame = Frame::filled(4, 2, 0).unwrap();
        frame.fill_rect(Rect::new(2, 0, 2, 2), 200);
        let stats = frame.stats(Rect::new(0, 0, 4, 2)).unwrap();
        assert_eq!(stats.mean, 100.0);
        assert!((stats.std_dev - 100.0).abs() < 1e-9);
    }

    #[test]
    fn stats_clip_and_empty() {
        let frame = Frame::filled(4, 4, 7).unwrap();
        assert!(frame.stats(Rect::new(10, 10, 3, 3)).is_none());
        let clipped = frame.stats(Rect::new(2, 2, 100, 100)).unwrap();
        assert_eq!(clipped.mean, 7.0);
    }

    #[test]
    fn blit_clips_to_destination() {
        let mut dst = Frame::filled(4, 4, 0).unwrap();
        let src = Frame::filled(3, 3, 9).unwrap();
        dst.blit(&src, 2, 2);
        assert_eq!(dst.get(2, 2), Some(9));
        assert_eq!(dst.get(3, 3), Some(9));
        assert_eq!(dst.get(1, 1), Some(0));
    }

    #[test]
    fn rect_around_clips_at_edges() {
        let rect = Rect::around(3, 3, 15, 100, 100);
        assert_eq!(rect, Rect::new(0, 0, 18, 18));
        let rect = Rect::around(95, 50, 15, 100, 100);
        assert_eq!(rect, Rect::new(80, 35, 20, 30));
    }
}
