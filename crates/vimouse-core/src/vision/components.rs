//! Connected-component statistics over the combined foreground mask.
//!
//! Labelling is `imageproc`'s 8-connected pass; this module folds the label
//! image into per-blob bounding boxes, pixel counts and centroids, in label
//! order.

use image::{GrayImage, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};

use crate::frame::Rect;

/// One connected blob of foreground pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// Tight bounding box.
    pub bounds: Rect,
    /// Number of foreground pixels in the blob.
    pub pixel_count: u64,
    /// Mean pixel position.
    pub centroid: (f64, f64),
}

impl Component {
    /// Bounding-box width / height.
    pub fn aspect_ratio(&self) -> f64 {
        if self.bounds.height == 0 {
            0.0
        } else {
            f64::from(self.bounds.width) / f64::from(self.bounds.height)
        }
    }

    /// Centroid truncated to whole pixels.
    pub fn center(&self) -> (u32, u32) {
        (self.centroid.0 as u32, self.centroid.1 as u32)
    }
}

#[derive(Debug, Clone, Copy)]
struct Accumulator {
    min: (u32, u32),
    max: (u32, u32),
    sum: (u64, u64),
    count: u64,
}

impl Accumulator {
    fn start(x: u32, y: u32) -> Self {
        Self {
            min: (x, y),
            max: (x, y),
            sum: (0, 0),
            count: 0,
        }
    }

    fn add(&mut self, x: u32, y: u32) {
        self.min = (self.min.0.min(x), self.min.1.min(y));
        self.max = (self.max.0.max(x), self.max.1.max(y));
        self.sum.0 += u64::from(x);
        self.sum.1 += u64::from(y);
        self.count += 1;
    }

    fn finish(self) -> Component {
        let (min_x, min_y) = self.min;
        let (max_x, max_y) = self.max;
        Component {
            bounds: Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1),
            pixel_count: self.count,
            centroid: (
                self.sum.0 as f64 / self.count as f64,
                self.sum.1 as f64 / self.count as f64,
            ),
        }
    }
}

/// Label all 8-connected components of `mask`. Zero pixels are background.
pub fn find_components(mask: &GrayImage) -> Vec<Component> {
    let labels = connected_components(mask, Connectivity::Eight, Luma([0u8]));

    let mut blobs: Vec<Option<Accumulator>> = Vec::new();
    for (x, y, label) in labels.enumerate_pixels() {
        let Some(slot) = (label.0[0] as usize).checked_sub(1) else {
            continue;
        };
        if slot >= blobs.len() {
            blobs.resize(slot + 1, None);
        }
        blobs[slot]
            .get_or_insert_with(|| Accumulator::start(x, y))
            .add(x, y);
    }

    blobs.into_iter().flatten().map(Accumulator::finish).collect()
}
