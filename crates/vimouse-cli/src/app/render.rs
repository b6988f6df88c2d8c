//! JSON-lines render surface.
//!
//! The label painter is a separate process reading our stdout. Each overlay
//! transition becomes one [`OverlayEvent`] line.

use std::io::{self, Write};
use std::sync::Arc;

use tracing::{debug, warn};
use vimouse_core::labels::LabelMap;
use vimouse_core::overlay::Renderer;
use vimouse_core::protocol::OverlayEvent;

pub struct JsonLineRenderer<W> {
    out: W,
}

impl JsonLineRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonLineRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn emit(&mut self, event: &OverlayEvent) {
        let result = event
            .to_line()
            .map_err(io::Error::from)
            .and_then(|line| {
                writeln!(self.out, "{}", line)?;
                self.out.flush()
            });
        if let Err(e) = result {
            warn!(error = %e, "failed to write overlay event");
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonLineRenderer<W> {
    fn present(&mut self, activation: u64, labels: Arc<LabelMap>) {
        debug!(
            activation,
            codes = ?labels.codes().collect::<Vec<_>>(),
            "presenting labels"
        );
        self.emit(&OverlayEvent::shown(activation, &labels));
    }

    fn clear(&mut self, activation: u64) {
        self.emit(&OverlayEvent::hidden(activation));
    }
}
