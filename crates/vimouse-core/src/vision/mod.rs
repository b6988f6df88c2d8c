//! Region detection: screenshot in, candidate click points out.
//!
//! No accessibility information is used. Three cheap foreground signals are
//! OR-combined for recall, then geometric and statistical filters win back
//! precision.
//!
//! # Pipeline
//!
//! | Step | Module | Output |
//! |------|--------|--------|
//! | 1. Interest maps | [`maps`] | gradient, adaptive and edge masks (`imageproc`) |
//! | 2. Combine + clean | [`morph`] | OR of the three, closed then opened |
//! | 3. Blobs | [`components`] | 8-connected components with stats |
//! | 4. Filter | [`filter`] | components passing every rule |
//! | 5. Select | [`select`] | spaced, capped, topped up from the grid |
//!
//! # Failure Handling
//!
//! [`RegionDetector::detect`] never fails. A capture error or a frame the
//! pipeline cannot analyse yields the full fallback grid over the canonical
//! screen size from [`DetectorConfig`].

pub mod components;
pub mod filter;
pub mod maps;
pub mod morph;
pub mod select;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::capture::ScreenCapture;
use crate::config::DetectorConfig;
use crate::error::DetectError;
use crate::frame::Frame;
use select::Point;

/// Smallest frame the 3×3 kernels can run on.
const MIN_FRAME_SIDE: u32 = 3;

/// A candidate clickable point, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub x: i32,
    pub y: i32,
}

impl Region {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn from_frame_point(origin: (i32, i32), (x, y): Point) -> Self {
        Self {
            x: origin.0.saturating_add(x as i32),
            y: origin.1.saturating_add(y as i32),
        }
    }
}

/// Run the full pipeline on one frame.
///
/// Returns at most `max_regions` points, pairwise at least `min_distance`
/// apart. Fewer than `min_regions` is only possible when the grid for this
/// frame is exhausted.
pub fn detect_frame(frame: &Frame, config: &DetectorConfig) -> Result<Vec<Region>, DetectError> {
    let (width, height) = (frame.width(), frame.height());
    if width < MIN_FRAME_SIDE || height < MIN_FRAME_SIDE {
        return Err(DetectError::FrameTooSmall { width, height });
    }

    let edges = maps::edge_map(frame, config.canny_low, config.canny_high);
    let mut combined = maps::gradient_map(frame, config.gradient_floor);
    maps::union_into(
        &mut combined,
        &maps::adaptive_map(frame, config.adaptive_block, config.adaptive_c),
    );
    maps::union_into(&mut combined, &edges);
    let combined = morph::clean(&combined);

    let found = components::find_components(&combined);
    let accepted: Vec<Point> = found
        .iter()
        .filter_map(|c| match filter::check(c, frame, &edges, config) {
            Ok(()) => Some(c.center()),
            Err(reason) => {
                trace!(bounds = ?c.bounds, ?reason, "component rejected");
                None
            }
        })
        .collect();

    let mut points = select::dedup_by_distance(&accepted, config.min_distance);
    let spaced = points.len();

    if points.len() > config.max_regions {
        points = select::rank_by_contrast(
            &points,
            frame,
            config.contrast_radius,
            config.max_regions,
        );
    }

    if points.len() < config.min_regions {
        let grid = select::fallback_grid(width, height, config.grid_rows, config.grid_cols);
        select::top_up_with_grid(&mut points, &grid, config.min_regions, config.min_distance);
    }

    debug!(
        components = found.len(),
        accepted = accepted.len(),
        spaced,
        regions = points.len(),
        "detection pass complete"
    );

    let origin = frame.origin();
    Ok(points
        .into_iter()
        .map(|p| Region::from_frame_point(origin, p))
        .collect())
}

/// The full uniform grid over the canonical screen size.
pub fn fallback_regions(config: &DetectorConfig) -> Vec<Region> {
    select::fallback_grid(
        config.fallback_width,
        config.fallback_height,
        config.grid_rows,
        config.grid_cols,
    )
    .into_iter()
    .map(|p| Region::from_frame_point((0, 0), p))
    .collect()
}

/// Captures the desktop and runs the pipeline, one pass per activation.
#[derive(Debug)]
pub struct RegionDetector<C> {
    config: DetectorConfig,
    capture: C,
}

impl<C: ScreenCapture> RegionDetector<C> {
    pub fn new(config: DetectorConfig, capture: C) -> Self {
        Self { config, capture }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Capture and analyse the desktop. Never fails; see the module docs.
    pub fn detect(&mut self) -> Vec<Region> {
        let frame = match self.capture.capture_desktop() {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "screen capture failed, using fallback grid");
                return self.fallback();
            }
        };

        match detect_frame(&frame, &self.config) {
            Ok(regions) => regions,
            Err(e) => {
                warn!(error = %e, "region detection failed, using fallback grid");
                self.fallback()
            }
        }
    }

    pub fn fallback(&self) -> Vec<Region> {
        fallback_regions(&self.config)
    }
}
