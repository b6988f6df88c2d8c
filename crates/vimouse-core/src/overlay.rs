//! Overlay lifecycle.
//!
//! [`Overlay`] is the sequencer's view of the label overlay. Showing it runs
//! one detection pass, binds codes, and publishes the result to the render
//! surface as an immutable snapshot. The painter may hold a snapshot as long
//! as it likes; the next activation publishes a new one instead of mutating.

use std::sync::Arc;

use tracing::debug;

use crate::capture::ScreenCapture;
use crate::config::Config;
use crate::labels::{LabelAssigner, LabelMap};
use crate::vision::{Region, RegionDetector};

/// What the input sequencer needs from the overlay.
pub trait OverlayControl {
    fn is_visible(&self) -> bool;
    fn show(&mut self);
    fn hide(&mut self);
    /// Point bound to a two-letter code in the current activation.
    fn target(&self, code: &str) -> Option<Region>;
}

/// The render surface that paints labels.
pub trait Renderer {
    fn present(&mut self, activation: u64, labels: Arc<LabelMap>);
    fn clear(&mut self, activation: u64);
}

/// Detector, assigner and render surface wired together.
pub struct Overlay<C, R> {
    detector: RegionDetector<C>,
    assigner: LabelAssigner,
    renderer: R,
    visible: bool,
    labels: Arc<LabelMap>,
    activation: u64,
}

impl<C: ScreenCapture, R: Renderer> Overlay<C, R> {
    pub fn new(config: &Config, capture: C, renderer: R) -> Self {
        Self {
            detector: RegionDetector::new(config.detector.clone(), capture),
            assigner: LabelAssigner::new(&config.labels),
            renderer,
            visible: false,
            labels: Arc::new(LabelMap::new()),
            activation: 0,
        }
    }

    /// The published label snapshot. Empty while hidden.
    pub fn current_labels(&self) -> Arc<LabelMap> {
        Arc::clone(&self.labels)
    }

    /// Number of times the overlay has been shown.
    pub fn activation(&self) -> u64 {
        self.activation
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

impl<C: ScreenCapture, R: Renderer> OverlayControl for Overlay<C, R> {
    fn is_visible(&self) -> bool {
        self.visible
    }

    /// Detect, label and publish. Showing while visible refreshes the labels.
    fn show(&mut self) {
        self.activation += 1;
        let regions = self.detector.detect();
        self.labels = Arc::new(self.assigner.assign(&regions));
        self.visible = true;
        debug!(
            activation = self.activation,
            regions = regions.len(),
            labels = self.labels.len(),
            "overlay shown"
        );
        self.renderer
            .present(self.activation, Arc::clone(&self.labels));
    }

    fn hide(&mut self) {
        if !self.visible {
            return;
        }
        self.visible = false;
        self.labels = Arc::new(LabelMap::new());
        self.renderer.clear(self.activation);
        debug!(activation = self.activation, "overlay hidden");
    }

    fn target(&self, code: &str) -> Option<Region> {
        if !self.visible {
            return None;
        }
        self.labels.get(code)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;

    use super::*;

    /// Overlay with a fixed code table and call counters.
    #[derive(Debug, Default)]
    pub struct FakeOverlay {
        pub visible: bool,
        pub targets: HashMap<String, Region>,
        pub shows: usize,
        pub hides: usize,
    }

    impl FakeOverlay {
        pub fn with_target(code: &str, x: i32, y: i32) -> Self {
            let mut overlay = Self::default();
            overlay.targets.insert(code.to_string(), Region::new(x, y));
            overlay
        }
    }

    impl OverlayControl for FakeOverlay {
        fn is_visible(&self) -> bool {
            self.visible
        }

        fn show(&mut self) {
            self.shows += 1;
            self.visible = true;
        }

        fn hide(&mut self) {
            self.hides += 1;
            self.visible = false;
        }

        fn target(&self, code: &str) -> Option<Region> {
            self.targets.get(code).copied()
        }
    }

    /// Keeps every presented snapshot.
    #[derive(Debug, Default)]
    pub struct RecordingRenderer {
        pub presented: Vec<(u64, Arc<LabelMap>)>,
        pub cleared: Vec<u64>,
    }

    impl Renderer for RecordingRenderer {
        fn present(&mut self, activation: u64, labels: Arc<LabelMap>) {
            self.presented.push((activation, labels));
        }

        fn clear(&mut self, activation: u64) {
            self.cleared.push(activation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::RecordingRenderer;
    use super::*;
    use crate::capture::test_support::StaticCapture;

    fn overlay() -> Overlay<StaticCapture, RecordingRenderer> {
        Overlay::new(
            &Config::default(),
            StaticCapture::failing(),
            RecordingRenderer::default(),
        )
    }

    #[test]
    fn starts_hidden_and_empty() {
        let overlay = overlay();
        assert!(!overlay.is_visible());
        assert!(overlay.current_labels().is_empty());
        assert_eq!(overlay.target("qw"), None);
    }

    #[test]
    fn show_publishes_snapshot() {
        let mut overlay = overlay();
        overlay.show();
        assert!(overlay.is_visible());
        assert_eq!(overlay.activation(), 1);

        let labels = overlay.current_labels();
        assert_eq!(labels.len(), 60, "fallback grid, all labeled");
        assert_eq!(overlay.target("qw"), Some(Region::new(96, 90)));

        let (activation, presented) = &overlay.renderer().presented[0];
        assert_eq!(*activation, 1);
        assert!(Arc::ptr_eq(presented, &labels));
    }

    #[test]
    fn hide_publishes_empty_snapshot_and_keeps_old_one_intact() {
        let mut overlay = overlay();
        overlay.show();
        let held = overlay.current_labels();

        overlay.hide();
        assert!(!overlay.is_visible());
        assert!(overlay.current_labels().is_empty());
        assert_eq!(overlay.target("qw"), None);
        assert_eq!(held.len(), 60, "painter's snapshot is not mutated");
        assert_eq!(overlay.renderer().cleared, vec![1]);
    }

    #[test]
    fn hide_when_hidden_is_a_no_op() {
        let mut overlay = overlay();
        overlay.hide();
        assert!(overlay.renderer().cleared.is_empty());
    }

    #[test]
    fn each_show_is_a_new_activation() {
        let mut overlay = overlay();
        overlay.show();
        overlay.hide();
        overlay.show();
        assert_eq!(overlay.activation(), 2);
        let presented = &overlay.renderer().presented;
        assert_eq!(presented.len(), 2);
        assert!(!Arc::ptr_eq(&presented[0].1, &presented[1].1));
    }
}
