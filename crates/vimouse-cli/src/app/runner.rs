//! The polling worker.
//!
//! One current-thread tokio runtime owns the [`InputSequencer`]; nothing
//! else touches its state. A fixed-interval timer drives `tick`, and Ctrl-C
//! or SIGTERM hides the overlay before the loop exits.

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::info;
use vimouse_core::keys::KeyStateSource;
use vimouse_core::overlay::OverlayControl;
use vimouse_core::pointer::Pointer;
use vimouse_core::sequencer::{InputSequencer, TickOutcome};

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    QuitHotkey,
    Interrupt,
    Terminate,
}

/// Tick the sequencer every `poll` until quit or a signal.
///
/// A tick that runs long (an overlay activation runs detection inline)
/// skips the missed ticks instead of bursting to catch up.
pub async fn poll_loop<K, P, O>(
    sequencer: &mut InputSequencer<K, P, O>,
    poll: Duration,
) -> StopReason
where
    K: KeyStateSource,
    P: Pointer,
    O: OverlayControl,
{
    let mut ticker = tokio::time::interval(poll);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let ctrl_c = tokio::signal::ctrl_c();
    let terminate = sigterm();
    tokio::pin!(ctrl_c, terminate);

    info!(poll_ms = poll.as_millis() as u64, "polling started");

    let reason = loop {
        tokio::select! {
            now = ticker.tick() => {
                if sequencer.tick(now.into_std()) == TickOutcome::Quit {
                    break StopReason::QuitHotkey;
                }
            }
            _ = &mut ctrl_c => {
                info!("Received SIGINT, shutting down");
                break StopReason::Interrupt;
            }
            _ = &mut terminate => {
                info!("Received SIGTERM, shutting down");
                break StopReason::Terminate;
            }
        }
    };

    sequencer.shutdown();
    reason
}

/// Wait for SIGTERM signal (Unix only).
///
/// If signal registration fails, logs a warning and waits indefinitely.
#[cfg(unix)]
async fn sigterm() {
    use tokio::signal::unix::{signal, SignalKind};
    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            tracing::warn!(
                "Failed to register SIGTERM handler: {}, only SIGINT will stop the worker",
                e
            );
            std::future::pending::<()>().await;
        }
    }
}

/// SIGTERM is not available on non-Unix platforms; use a never-completing future.
#[cfg(not(unix))]
async fn sigterm() {
    std::future::pending::<()>().await;
}
