//! Post-filter selection: spacing, capping and the fallback grid.
//!
//! Points here are frame-relative pixel positions; the detector adds the
//! frame origin only once the final set is known.

use crate::frame::{Frame, Rect};

/// A frame-relative candidate point.
pub type Point = (u32, u32);

fn distance(a: Point, b: Point) -> f64 {
    let dx = f64::from(a.0) - f64::from(b.0);
    let dy = f64::from(a.1) - f64::from(b.1);
    dx.hypot(dy)
}

fn far_from_all(point: Point, kept: &[Point], min_distance: f64) -> bool {
    kept.iter().all(|k| distance(point, *k) >= min_distance)
}

/// Greedy first-seen-wins spacing: a point closer than `min_distance` to an
/// already kept point is dropped.
pub fn dedup_by_distance(points: &[Point], min_distance: f64) -> Vec<Point> {
    let mut kept: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if far_from_all(p, &kept, min_distance) {
            kept.push(p);
        }
    }
    kept
}

/// Keep the `max` points with the highest local contrast.
///
/// Contrast is the intensity standard deviation in a square window of side
/// `2 * radius` around each point. Ties keep detection order.
pub fn rank_by_contrast(points: &[Point], frame: &Frame, radius: u32, max: usize) -> Vec<Point> {
    let mut scored: Vec<(f64, Point)> = points
        .iter()
        .map(|&(x, y)| {
            let window = Rect::around(x, y, radius, frame.width(), frame.height());
            let contrast = frame.stats(window).map_or(0.0, |s| s.std_dev);
            (contrast, (x, y))
        })
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.truncate(max);
    scored.into_iter().map(|(_, p)| p).collect()
}

/// Centres of a `rows x cols` grid of equal cells over `width x height`,
/// row-major.
pub fn fallback_grid(width: u32, height: u32, rows: u32, cols: u32) -> Vec<Point> {
    if rows == 0 || cols == 0 {
        return Vec::new();
    }
    let cell_w = width / cols;
    let cell_h = height / rows;
    let mut grid = Vec::with_capacity(rows as usize * cols as usize);
    for row in 0..rows {
        for col in 0..cols {
            grid.push((col * cell_w + cell_w / 2, row * cell_h + cell_h / 2));
        }
    }
    grid
}

/// Append grid points until `min` is reached or the grid runs out.
///
/// Grid points closer than `min_distance` to a kept point are skipped so
/// the spacing guarantee still holds.
pub fn top_up_with_grid(points: &mut Vec<Point>, grid: &[Point], min: usize, min_distance: f64) {
    for &g in grid {
        if points.len() >= min {
            break;
        }
        if far_from_all(g, points, min_distance) {
            points.push(g);
        }
    }
}
