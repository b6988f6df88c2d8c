//! Cursor and wheel injection seam.

use serde::{Deserialize, Serialize};

use crate::error::PointerError;

/// Mouse button for a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Scroll direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Cursor-control service. Calls should return quickly; the polling worker
/// does not wait on them beyond the call itself. Errors are logged by the
/// caller and never stop the worker.
pub trait Pointer {
    /// Move the cursor to screen coordinates.
    fn move_to(&mut self, x: i32, y: i32) -> Result<(), PointerError>;
    fn click(&mut self, button: MouseButton) -> Result<(), PointerError>;
    /// Scroll by `amount` wheel notches.
    fn scroll(&mut self, direction: ScrollDirection, amount: i32) -> Result<(), PointerError>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_direction_serializes_to_snake_case() {
        assert_eq!(
            serde_json::to_string(&ScrollDirection::Down).unwrap(),
            "\"down\""
        );
        assert_eq!(
            serde_json::from_str::<MouseButton>("\"middle\"").unwrap(),
            MouseButton::Middle
        );
    }
}
