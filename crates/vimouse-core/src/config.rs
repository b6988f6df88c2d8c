//! Tunable parameters for detection, labelling and input handling.
//!
//! Every component receives its slice of [`Config`] at construction and never
//! reads global state. All sections deserialize with `#[serde(default)]`, so a
//! config file only needs to name the values it overrides:
//!
//! ```
//! use vimouse_core::config::Config;
//!
//! let config: Config = serde_json::from_str(r#"{"detector": {"min_distance": 24.0}}"#).unwrap();
//! assert_eq!(config.detector.min_distance, 24.0);
//! assert_eq!(config.detector.max_regions, 250);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::keys::{Hotkey, HotkeyAction};

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub detector: DetectorConfig,
    pub labels: LabelConfig,
    pub input: InputConfig,
}

impl Config {
    /// Check cross-field constraints. Run once at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.detector.validate()?;
        self.labels.validate()?;
        self.input.validate()?;
        Ok(())
    }
}

/// Region detector thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Below this many regions the fallback grid tops the result up.
    pub min_regions: usize,
    /// Above this many regions only the highest-contrast ones are kept.
    pub max_regions: usize,
    /// Bounding-box area bounds (exclusive), in pixels.
    pub min_region_area: u64,
    pub max_region_area: u64,
    /// Width / height bounds (exclusive).
    pub min_aspect_ratio: f64,
    pub max_aspect_ratio: f64,
    /// Intensity standard deviation inside the box must exceed this.
    pub min_contrast: f64,
    /// Mean intensity must lie strictly between these.
    pub min_brightness: f64,
    pub max_brightness: f64,
    /// Fraction of edge pixels inside the box must exceed this.
    pub min_edge_density: f64,
    /// Minimum Euclidean distance between two kept centroids.
    pub min_distance: f64,
    /// Half-size of the window used to rank regions by local contrast.
    pub contrast_radius: u32,
    /// Normalized gradient values above this count as foreground.
    pub gradient_floor: u8,
    /// Odd window size for adaptive binarization.
    pub adaptive_block: u32,
    /// How much darker than the local mean a pixel must be.
    pub adaptive_c: i32,
    /// Edge-linking thresholds.
    pub canny_low: u32,
    pub canny_high: u32,
    /// Fallback grid shape. `grid_rows * grid_cols` may not exceed
    /// `max_regions`.
    pub grid_rows: u32,
    pub grid_cols: u32,
    /// Canonical dimensions used when capture fails.
    pub fallback_width: u32,
    pub fallback_height: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_regions: 20,
            max_regions: 250,
            min_region_area: 16,
            max_region_area: 35_000,
            min_aspect_ratio: 0.04,
            max_aspect_ratio: 24.0,
            min_contrast: 10.0,
            min_brightness: 15.0,
            max_brightness: 245.0,
            min_edge_density: 0.02,
            min_distance: 18.0,
            contrast_radius: 15,
            gradient_floor: 0,
            adaptive_block: 9,
            adaptive_c: 3,
            canny_low: 15,
            canny_high: 80,
            grid_rows: 6,
            grid_cols: 10,
            fallback_width: 1920,
            fallback_height: 1080,
        }
    }
}

fn ordered(field: &'static str, min: f64, max: f64) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::InvertedBounds { field, min, max });
    }
    Ok(())
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ordered(
            "region count",
            self.min_regions as f64,
            self.max_regions as f64,
        )?;
        ordered(
            "region area",
            self.min_region_area as f64,
            self.max_region_area as f64,
        )?;
        ordered("aspect ratio", self.min_aspect_ratio, self.max_aspect_ratio)?;
        ordered("brightness", self.min_brightness, self.max_brightness)?;
        ordered(
            "canny thresholds",
            f64::from(self.canny_low),
            f64::from(self.canny_high),
        )?;
        if self.adaptive_block < 3 || self.adaptive_block % 2 == 0 {
            return Err(ConfigError::OutOfRange {
                field: "adaptive_block",
                requirement: "an odd number of at least 3",
            });
        }
        if self.grid_rows == 0 || self.grid_cols == 0 {
            return Err(ConfigError::OutOfRange {
                field: "grid_rows/grid_cols",
                requirement: "non-zero",
            });
        }
        let grid_cells = u64::from(self.grid_rows) * u64::from(self.grid_cols);
        if grid_cells > self.max_regions as u64 {
            return Err(ConfigError::OutOfRange {
                field: "grid_rows*grid_cols",
                requirement: "at most max_regions",
            });
        }
        if self.fallback_width == 0 || self.fallback_height == 0 {
            return Err(ConfigError::OutOfRange {
                field: "fallback_width/fallback_height",
                requirement: "non-zero",
            });
        }
        if self.min_distance.is_nan() || self.min_distance < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "min_distance",
                requirement: "a non-negative number",
            });
        }
        Ok(())
    }
}

/// Keyboard layout used to derive label adjacency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Top, home and bottom letter rows, left to right.
    pub rows: Vec<String>,
    /// Maximum column offset for neighbors in the row above or below.
    pub neighbor_radius: usize,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            rows: vec![
                "qwertyuiop".to_string(),
                "asdfghjkl".to_string(),
                "zxcvbnm".to_string(),
            ],
            neighbor_radius: 2,
        }
    }
}

impl LabelConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows.is_empty() {
            return Err(ConfigError::InvalidLayout("no rows".to_string()));
        }
        let mut seen = [false; 26];
        for row in &self.rows {
            for c in row.chars() {
                if !c.is_ascii_lowercase() {
                    return Err(ConfigError::InvalidLayout(format!(
                        "'{}' is not a lowercase letter",
                        c
                    )));
                }
                let slot = &mut seen[(c as u8 - b'a') as usize];
                if *slot {
                    return Err(ConfigError::InvalidLayout(format!(
                        "'{}' appears more than once",
                        c
                    )));
                }
                *slot = true;
            }
        }
        Ok(())
    }
}

/// Hotkeys and timing for the polling worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub toggle: String,
    pub scroll_up: String,
    pub scroll_down: String,
    pub quit: String,
    /// Time allowed between the first and second letter of a code.
    pub sequence_timeout_ms: u64,
    /// Key-state poll cadence.
    pub poll_interval_ms: u64,
    /// Wheel notches per scroll hotkey press.
    pub scroll_step: i32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            toggle: "Alt+\\".to_string(),
            scroll_up: "Alt+K".to_string(),
            scroll_down: "Alt+J".to_string(),
            quit: "Alt+Q".to_string(),
            sequence_timeout_ms: 1000,
            poll_interval_ms: 10,
            scroll_step: 3,
        }
    }
}

impl InputConfig {
    pub fn sequence_timeout(&self) -> Duration {
        Duration::from_millis(self.sequence_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Parse the four hotkey bindings, in a fixed action order.
    pub fn hotkeys(&self) -> Result<Vec<(HotkeyAction, Hotkey)>, ConfigError> {
        let bindings = [
            (HotkeyAction::ToggleOverlay, "toggle", &self.toggle),
            (HotkeyAction::ScrollUp, "scroll_up", &self.scroll_up),
            (HotkeyAction::ScrollDown, "scroll_down", &self.scroll_down),
            (HotkeyAction::Quit, "quit", &self.quit),
        ];

        let mut parsed: Vec<(HotkeyAction, Hotkey)> = Vec::with_capacity(bindings.len());
        for (action, name, binding) in bindings {
            let hotkey = Hotkey::parse(binding).ok_or_else(|| ConfigError::InvalidHotkey {
                action: name,
                binding: binding.clone(),
            })?;
            if parsed.iter().any(|(_, existing)| *existing == hotkey) {
                return Err(ConfigError::DuplicateHotkey {
                    binding: binding.clone(),
                });
            }
            parsed.push((action, hotkey));
        }
        Ok(parsed)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.hotkeys()?;
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::OutOfRange {
                field: "poll_interval_ms",
                requirement: "at least 1",
            });
        }
        if self.scroll_step <= 0 {
            return Err(ConfigError::OutOfRange {
                field: "scroll_step",
                requirement: "positive",
            });
        }
        Ok(())
    }
}
