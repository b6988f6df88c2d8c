//! Two-letter code generation and binding.
//!
//! Codes are built from physically adjacent keys so both letters sit under
//! the same hand position. Generation order is deterministic for a given
//! layout; which region gets which code is purely positional.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LabelConfig;
use crate::vision::Region;

/// Staggered letter rows and the adjacency derived from them.
#[derive(Debug, Clone)]
pub struct KeyboardLayout {
    /// Letters in row order, top row first.
    letters: Vec<char>,
    neighbors: HashMap<char, Vec<char>>,
}

impl KeyboardLayout {
    /// Build adjacency from rows. A letter's neighbors are, in order: its
    /// left and right keys in the same row, then every key in the row above
    /// and the row below whose column is within `radius`.
    pub fn new<S: AsRef<str>>(rows: &[S], radius: usize) -> Self {
        let rows: Vec<Vec<char>> = rows.iter().map(|r| r.as_ref().chars().collect()).collect();
        let mut letters = Vec::new();
        let mut neighbors = HashMap::new();

        for (r, row) in rows.iter().enumerate() {
            for (col, &c) in row.iter().enumerate() {
                let mut adjacent = Vec::new();
                if col > 0 {
                    adjacent.push(row[col - 1]);
                }
                if col + 1 < row.len() {
                    adjacent.push(row[col + 1]);
                }
                let vertical = [r.checked_sub(1), Some(r + 1)];
                for other in vertical.into_iter().flatten() {
                    if let Some(other_row) = rows.get(other) {
                        adjacent.extend(
                            other_row
                                .iter()
                                .enumerate()
                                .filter(|(i, _)| i.abs_diff(col) <= radius)
                                .map(|(_, &n)| n),
                        );
                    }
                }
                adjacent.retain(|&n| n != c);

                letters.push(c);
                neighbors.insert(c, adjacent);
            }
        }

        Self { letters, neighbors }
    }

    pub fn from_config(config: &LabelConfig) -> Self {
        Self::new(&config.rows, config.neighbor_radius)
    }

    /// Letters in row order.
    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    pub fn neighbors(&self, c: char) -> &[char] {
        self.neighbors.get(&c).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for KeyboardLayout {
    fn default() -> Self {
        Self::from_config(&LabelConfig::default())
    }
}

/// Ordered, duplicate-free code list under construction.
#[derive(Default)]
struct CodeList {
    codes: Vec<String>,
    seen: HashSet<(char, char)>,
}

impl CodeList {
    fn push(&mut self, a: char, b: char) {
        if a != b && self.seen.insert((a, b)) {
            self.codes.push([a, b].iter().collect());
        }
    }
}

/// Generate codes for at least `needed` regions where the layout allows.
///
/// The adjacency pass emits `c1c2` then `c2c1` for every letter and each of
/// its neighbors. Only when that falls short of `needed` are codes that
/// skip over one intermediate key appended. The list may be longer or
/// shorter than `needed`.
pub fn generate_labels(layout: &KeyboardLayout, needed: usize) -> Vec<String> {
    let mut list = CodeList::default();

    for &c1 in layout.letters() {
        for &c2 in layout.neighbors(c1) {
            list.push(c1, c2);
            list.push(c2, c1);
        }
    }

    if needed > list.codes.len() {
        for &c1 in layout.letters() {
            for &c2 in layout.neighbors(c1) {
                for &c3 in layout.neighbors(c2) {
                    list.push(c1, c3);
                }
            }
        }
    }

    list.codes
}

/// One bound code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub code: String,
    #[serde(flatten)]
    pub region: Region,
}

/// Code → point bindings for one overlay activation, in generation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelMap {
    labels: Vec<Label>,
}

impl LabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point bound to `code`. Lookup is case-insensitive.
    pub fn get(&self, code: &str) -> Option<Region> {
        self.labels
            .iter()
            .find(|l| l.code.eq_ignore_ascii_case(code))
            .map(|l| l.region)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.labels.iter()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(|l| l.code.as_str())
    }

    /// Labels whose code begins with `first`, for narrowing the painted set
    /// after the first keystroke.
    pub fn starting_with(&self, first: char) -> impl Iterator<Item = &Label> {
        let first = first.to_ascii_lowercase();
        self.labels
            .iter()
            .filter(move |l| l.code.starts_with(first))
    }
}

/// Binds detected regions to codes.
#[derive(Debug, Clone, Default)]
pub struct LabelAssigner {
    layout: KeyboardLayout,
}

impl LabelAssigner {
    pub fn new(config: &LabelConfig) -> Self {
        Self {
            layout: KeyboardLayout::from_config(config),
        }
    }

    pub fn layout(&self) -> &KeyboardLayout {
        &self.layout
    }

    /// Region `i` gets code `i`. Regions beyond the available codes stay
    /// unlabeled for this activation.
    pub fn assign(&self, regions: &[Region]) -> LabelMap {
        let codes = generate_labels(&self.layout, regions.len());
        let labels: Vec<Label> = codes
            .into_iter()
            .zip(regions)
            .map(|(code, &region)| Label { code, region })
            .collect();

        if labels.len() < regions.len() {
            debug!(
                labeled = labels.len(),
                unlabeled = regions.len() - labels.len(),
                "ran out of codes"
            );
        } else {
            debug!(labeled = labels.len(), "labels assigned");
        }

        LabelMap { labels }
    }
}
