//! Component acceptance rules.
//!
//! A component survives only if every rule passes. All bounds are exclusive.

use image::GrayImage;

use crate::config::DetectorConfig;
use crate::frame::Frame;
use crate::vision::components::Component;
use crate::vision::maps;

/// Why a component was rejected. Only used for debug logging and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    Area(u64),
    AspectRatio(f64),
    Contrast(f64),
    Brightness(f64),
    EdgeDensity(f64),
}

/// Apply every filter to one component.
///
/// `edges` is the edge map the component was found alongside; density is
/// measured over the component's bounding box.
pub fn check(
    component: &Component,
    frame: &Frame,
    edges: &GrayImage,
    config: &DetectorConfig,
) -> Result<(), Rejection> {
    let bounds = component.bounds;
    let area = bounds.area();
    if area <= config.min_region_area || area >= config.max_region_area {
        return Err(Rejection::Area(area));
    }

    let aspect = component.aspect_ratio();
    if aspect <= config.min_aspect_ratio || aspect >= config.max_aspect_ratio {
        return Err(Rejection::AspectRatio(aspect));
    }

    let Some(stats) = frame.stats(bounds) else {
        return Err(Rejection::Area(0));
    };
    if stats.std_dev <= config.min_contrast {
        return Err(Rejection::Contrast(stats.std_dev));
    }
    if stats.mean <= config.min_brightness || stats.mean >= config.max_brightness {
        return Err(Rejection::Brightness(stats.mean));
    }

    let density = maps::count_in(edges, bounds) as f64 / area as f64;
    if density <= config.min_edge_density {
        return Err(Rejection::EdgeDensity(density));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use image::Luma;

    use super::*;
    use crate::frame::Rect;

    fn component(bounds: Rect) -> Component {
        Component {
            bounds,
            pixel_count: bounds.area(),
            centroid: (
                f64::from(bounds.x) + f64::from(bounds.width) / 2.0,
                f64::from(bounds.y) + f64::from(bounds.height) / 2.0,
            ),
        }
    }

    /// A 40x40 frame with a mid-grey button on a lighter panel, and an edge
    /// mask tracing the button outline.
    fn scene() -> (Frame, GrayImage) {
        let mut frame = Frame::filled(40, 40, 180).unwrap();
        frame.fill_rect(Rect::new(10, 10, 10, 10), 80);
        let mut edges = GrayImage::new(40, 40);
        let edge = Luma([maps::FOREGROUND]);
        for i in 10..20 {
            edges.put_pixel(i, 10, edge);
            edges.put_pixel(i, 19, edge);
            edges.put_pixel(10, i, edge);
            edges.put_pixel(19, i, edge);
        }
        (frame, edges)
    }

    #[test]
    fn accepts_contrasting_box() {
        let (frame, edges) = scene();
        let config = DetectorConfig::default();
        let c = component(Rect::new(8, 8, 14, 14));
        assert_eq!(check(&c, &frame, &edges, &config), Ok(()));
    }

    #[test]
    fn rejects_tiny_and_huge_areas() {
        let (frame, edges) = scene();
        let config = DetectorConfig::default();
        let tiny = component(Rect::new(10, 10, 4, 4));
        assert_eq!(
            check(&tiny, &frame, &edges, &config),
            Err(Rejection::Area(16)),
            "area bound is exclusive"
        );

        let mut config = config;
        config.max_region_area = 196;
        let c = component(Rect::new(8, 8, 14, 14));
        assert_eq!(check(&c, &frame, &edges, &config), Err(Rejection::Area(196)));
    }

    #[test]
    fn rejects_extreme_aspect_ratio() {
        let (frame, edges) = scene();
        let config = DetectorConfig::default();
        let sliver = component(Rect::new(0, 10, 30, 1));
        assert!(matches!(
            check(&sliver, &frame, &edges, &config),
            Err(Rejection::AspectRatio(_))
        ));
    }

    #[test]
    fn rejects_flat_region() {
        let (frame, edges) = scene();
        let config = DetectorConfig::default();
        let flat = component(Rect::new(25, 25, 10, 10));
        assert_eq!(
            check(&flat, &frame, &edges, &config),
            Err(Rejection::Contrast(0.0))
        );
    }

    #[test]
    fn rejects_saturated_region() {
        let mut frame = Frame::filled(40, 40, 0).unwrap();
        frame.fill_rect(Rect::new(0, 0, 40, 1), 255);
        let edges = GrayImage::new(40, 40);
        let config = DetectorConfig::default();
        let c = component(Rect::new(0, 0, 20, 20));
        assert!(matches!(
            check(&c, &frame, &edges, &config),
            Err(Rejection::Brightness(_))
        ));
    }

    #[test]
    fn rejects_box_without_edges() {
        let (frame, _) = scene();
        let config = DetectorConfig::default();
        let c = component(Rect::new(8, 8, 14, 14));
        assert_eq!(
            check(&c, &frame, &GrayImage::new(40, 40), &config),
            Err(Rejection::EdgeDensity(0.0))
        );
    }
}
