//! Binary morphology with a 2×2 structuring element.
//!
//! Closing bridges one-pixel gaps between neighboring foreground pixels;
//! opening then removes specks and strokes thinner than two pixels.

use image::{GrayImage, Luma};
use imageproc::morphology::{grayscale_close, grayscale_open, Mask as Element};

use crate::vision::maps::FOREGROUND;

/// The 2×2 square, anchored at its bottom-right pixel.
fn element() -> Element {
    Element::from_image(&GrayImage::from_pixel(2, 2, Luma([FOREGROUND])), 1, 1)
}

/// Dilate then erode.
pub fn close(mask: &GrayImage) -> GrayImage {
    grayscale_close(mask, &element())
}

/// Erode then dilate.
pub fn open(mask: &GrayImage) -> GrayImage {
    grayscale_open(mask, &element())
}

/// The pipeline's cleanup step: one closing followed by one opening.
pub fn clean(mask: &GrayImage) -> GrayImage {
    let element = element();
    grayscale_open(&grayscale_close(mask, &element), &element)
}
