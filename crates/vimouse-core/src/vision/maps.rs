//! Interest maps: the three independent foreground signals.
//!
//! Each map marks pixels that *might* belong to an interactive control:
//!
//! | Map | Signal | Catches |
//! |-----|--------|---------|
//! | Gradient | Sobel magnitude, min-max normalized | any intensity change |
//! | Adaptive | darker than the Gaussian local mean | text, icons, glyphs |
//! | Edges | Canny, hysteresis linked | outlines, borders |
//!
//! They are OR-combined by the pipeline; precision is recovered later by the
//! component filters.
//!
//! Masks are plain [`GrayImage`]s holding [`FOREGROUND`] or 0, which is what
//! the `imageproc` morphology and labelling passes expect.

use image::{GrayImage, Luma};
use imageproc::{edges, filter, gradients};

use crate::frame::{Frame, Rect};

/// Mask value for a foreground pixel.
pub const FOREGROUND: u8 = 255;

fn mask_value(set: bool) -> Luma<u8> {
    Luma([if set { FOREGROUND } else { 0 }])
}

/// Whether `(x, y)` is inside the mask and set.
pub fn is_set(mask: &GrayImage, x: u32, y: u32) -> bool {
    mask.get_pixel_checked(x, y).is_some_and(|p| p.0[0] != 0)
}

/// Pixel-wise OR of `other` into `mask`. Both must have the same shape.
pub fn union_into(mask: &mut GrayImage, other: &GrayImage) {
    debug_assert_eq!(mask.dimensions(), other.dimensions());
    for (a, b) in mask.pixels_mut().zip(other.pixels()) {
        a.0[0] = a.0[0].max(b.0[0]);
    }
}

/// Number of set pixels inside `rect` (clipped).
pub fn count_in(mask: &GrayImage, rect: Rect) -> u64 {
    let x1 = rect.x.saturating_add(rect.width).min(mask.width());
    let y1 = rect.y.saturating_add(rect.height).min(mask.height());
    let mut n = 0u64;
    for y in rect.y.min(y1)..y1 {
        for x in rect.x.min(x1)..x1 {
            if mask.get_pixel(x, y).0[0] != 0 {
                n += 1;
            }
        }
    }
    n
}

/// Gradient map: Euclidean Sobel magnitude scaled to `0..=255`, foreground
/// where the scaled value exceeds `floor`.
pub fn gradient_map(frame: &Frame, floor: u8) -> GrayImage {
    let magnitudes = gradients::sobel_gradients(frame.image());
    let (min, max) = magnitudes
        .pixels()
        .fold((u16::MAX, u16::MIN), |(lo, hi), p| (lo.min(p.0[0]), hi.max(p.0[0])));

    let (width, height) = magnitudes.dimensions();
    if max <= min {
        // Flat frame: everything normalizes to zero.
        return GrayImage::new(width, height);
    }

    let range = u32::from(max - min);
    GrayImage::from_fn(width, height, |x, y| {
        let m = u32::from(magnitudes.get_pixel(x, y).0[0] - min);
        mask_value(m * 255 / range > u32::from(floor))
    })
}

/// Gaussian sigma for an odd window, as the usual `getGaussianKernel` rule.
fn block_sigma(block: u32) -> f32 {
    0.3 * ((block as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Adaptive map: foreground where a pixel is at least `c` darker than the
/// Gaussian-weighted mean of its `block × block` neighborhood.
pub fn adaptive_map(frame: &Frame, block: u32, c: i32) -> GrayImage {
    let image = frame.image();
    let local_mean = filter::gaussian_blur_f32(image, block_sigma(block));
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let value = i32::from(image.get_pixel(x, y).0[0]);
        let mean = i32::from(local_mean.get_pixel(x, y).0[0]);
        mask_value(value - mean <= -c)
    })
}

/// Edge map: Canny with two-threshold hysteresis linking.
///
/// Pixels above `high` seed edges; pixels above `low` join an edge only when
/// connected to a seed.
pub fn edge_map(frame: &Frame, low: u32, high: u32) -> GrayImage {
    edges::canny(frame.image(), low as f32, high as f32)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Build a mask from rows of `#` (set) and `.` (clear).
    pub fn mask_from(rows: &[&str]) -> GrayImage {
        let mut mask = GrayImage::new(rows[0].len() as u32, rows.len() as u32);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                mask.put_pixel(x as u32, y as u32, mask_value(c == '#'));
            }
        }
        mask
    }

    pub fn count(mask: &GrayImage) -> u64 {
        count_in(mask, Rect::new(0, 0, mask.width(), mask.height()))
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{count, mask_from};
    use super::*;

    fn frame_with_dark_box(w: u32, h: u32, rect: Rect) -> Frame {
        let mut frame = Frame::filled(w, h, 200).unwrap();
        frame.fill_rect(rect, 50);
        frame
    }

    #[test]
    fn flat_frame_has_no_gradient_or_edges() {
        let frame = Frame::filled(20, 20, 128).unwrap();
        assert_eq!(count(&gradient_map(&frame, 0)), 0);
        assert_eq!(count(&edge_map(&frame, 15, 80)), 0);
        assert_eq!(count(&adaptive_map(&frame, 9, 3)), 0);
    }

    #[test]
    fn gradient_marks_both_sides_of_a_step() {
        let frame = frame_with_dark_box(30, 30, Rect::new(10, 10, 10, 10));
        let mask = gradient_map(&frame, 0);
        assert!(is_set(&mask, 9, 15), "pixel just outside the left edge");
        assert!(is_set(&mask, 10, 15), "pixel just inside the left edge");
        assert!(!is_set(&mask, 15, 15), "flat interior");
        assert!(!is_set(&mask, 2, 2), "flat background");
    }

    #[test]
    fn edges_hug_the_box_outline() {
        let frame = frame_with_dark_box(30, 30, Rect::new(10, 10, 10, 10));
        let edges = edge_map(&frame, 15, 80);

        let crossing: Vec<u32> = (0..30).filter(|&x| is_set(&edges, x, 15)).collect();
        assert!(
            (2..=4).contains(&crossing.len()),
            "one thin line per side: {:?}",
            crossing
        );
        assert!(crossing
            .iter()
            .all(|&x| (8..=11).contains(&x) || (18..=21).contains(&x)));
        assert!(!is_set(&edges, 15, 15));
        assert!(!is_set(&edges, 0, 0));
    }

    #[test]
    fn faint_step_needs_low_thresholds() {
        let mut frame = Frame::filled(20, 20, 100).unwrap();
        frame.fill_rect(Rect::new(10, 0, 10, 20), 104);
        assert_eq!(count(&edge_map(&frame, 15, 80)), 0);
        assert!(count(&edge_map(&frame, 2, 5)) > 0);
    }

    #[test]
    fn adaptive_marks_dark_rim_inside_box() {
        let frame = frame_with_dark_box(40, 40, Rect::new(10, 10, 20, 20));
        let mask = adaptive_map(&frame, 9, 3);
        assert!(is_set(&mask, 10, 20), "dark pixel next to bright surround");
        assert!(!is_set(&mask, 20, 20), "dark interior matches its own mean");
        assert!(!is_set(&mask, 5, 5), "bright background");
        assert!(!is_set(&mask, 9, 20), "bright pixel next to dark box");
    }

    #[test]
    fn union_and_count_in() {
        let mut a = mask_from(&["#...", "....", "....", "...."]);
        let b = mask_from(&["....", "....", "....", "...#"]);
        union_into(&mut a, &b);
        assert_eq!(count(&a), 2);
        assert_eq!(count_in(&a, Rect::new(0, 0, 2, 2)), 1);
        assert_eq!(count_in(&a, Rect::new(2, 2, 10, 10)), 1);
    }

    #[test]
    fn sigma_follows_block_size() {
        assert!((block_sigma(9) - 1.7).abs() < 1e-6);
        assert!(block_sigma(3) > 0.0);
    }
}
