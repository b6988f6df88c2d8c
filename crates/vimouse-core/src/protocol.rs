//! Overlay events for an external painter.
//!
//! The render surface runs out of process. It receives one JSON object per
//! line on the worker's stdout:
//!
//! ```text
//! {"event":"shown","activation":3,"labels":[{"code":"qw","x":412,"y":88}]}
//! {"event":"hidden","activation":3}
//! ```

use serde::{Deserialize, Serialize};

use crate::labels::{Label, LabelMap};

/// One overlay lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum OverlayEvent {
    /// Paint these labels.
    Shown { activation: u64, labels: Vec<Label> },
    /// Remove everything painted for `activation`.
    Hidden { activation: u64 },
}

impl OverlayEvent {
    pub fn shown(activation: u64, labels: &LabelMap) -> Self {
        Self::Shown {
            activation,
            labels: labels.iter().cloned().collect(),
        }
    }

    pub fn hidden(activation: u64) -> Self {
        Self::Hidden { activation }
    }

    /// Serialize as a single line (no trailing newline).
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::LabelAssigner;
    use crate::vision::Region;

    #[test]
    fn shown_event_format() {
        let map = LabelAssigner::default().assign(&[Region::new(412, 88)]);
        let line = OverlayEvent::shown(3, &map).to_line().unwrap();
        assert_eq!(
            line,
            r#"{"event":"shown","activation":3,"labels":[{"code":"qw","x":412,"y":88}]}"#
        );
    }

    #[test]
    fn hidden_event_format() {
        let line = OverlayEvent::hidden(3).to_line().unwrap();
        assert_eq!(line, r#"{"event":"hidden","activation":3}"#);
    }

    #[test]
    fn events_parse_back() {
        let event: OverlayEvent =
            serde_json::from_str(r#"{"event":"shown","activation":1,"labels":[]}"#).unwrap();
        assert_eq!(
            event,
            OverlayEvent::Shown {
                activation: 1,
                labels: vec![]
            }
        );
    }
}
