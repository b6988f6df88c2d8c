//! Screen capture seam.

use crate::error::CaptureError;
use crate::frame::Frame;

/// Source of full virtual-desktop screenshots.
///
/// Called once per overlay activation, on the polling worker. A failure is
/// never fatal: the detector substitutes its fallback grid.
pub trait ScreenCapture {
    fn capture_desktop(&mut self) -> Result<Frame, CaptureError>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Hands out clones of one frame, or fails every time when empty.
    #[derive(Debug, Default)]
    pub struct StaticCapture {
        pub frame: Option<Frame>,
        pub calls: usize,
    }

    impl StaticCapture {
        pub fn new(frame: Frame) -> Self {
            Self {
                frame: Some(frame),
                calls: 0,
            }
        }

        pub fn failing() -> Self {
            Self::default()
        }
    }

    impl ScreenCapture for StaticCapture {
        fn capture_desktop(&mut self) -> Result<Frame, CaptureError> {
            self.calls += 1;
            self.frame.clone().ok_or(CaptureError::NoScreen)
        }
    }
}
