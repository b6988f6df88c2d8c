//! Core types and logic for vimouse.
//!
//! This crate holds everything that decides *where* the cursor may go and
//! *when* a typed code is complete. It has no windowing, capture, or input
//! injection dependency; the host process plugs those in through the
//! collaborator traits ([`capture::ScreenCapture`], [`pointer::Pointer`],
//! [`keys::KeyStateSource`], [`overlay::Renderer`]).
//!
//! # Modules
//!
//! - [`frame`]: single-channel intensity grid built from a screenshot
//! - [`vision`]: region detection pipeline (gradient, adaptive threshold,
//!   edge linking, morphology, connected components, filtering)
//! - [`labels`]: keyboard-adjacency two-letter codes and the label map
//! - [`keys`]: key model, hotkey parsing, key-state source trait
//! - [`sequencer`]: polling state machine turning key states into commands
//! - [`overlay`]: overlay lifecycle and label-map publication
//! - [`protocol`]: JSON-line events for an external overlay painter
//! - [`config`]: tunable thresholds, hotkey bindings and timings
//!
//! # Data Flow
//!
//! | Step | Owner | Output |
//! |------|-------|--------|
//! | Hotkey edge | [`sequencer::InputSequencer`] | `show()` request |
//! | Capture + vision | [`vision::RegionDetector`] | `Vec<Region>` |
//! | Code binding | [`labels::LabelAssigner`] | [`labels::LabelMap`] |
//! | Two-key resolution | [`sequencer::InputSequencer`] | move + click |

pub mod capture;
pub mod config;
pub mod error;
pub mod frame;
pub mod keys;
pub mod labels;
pub mod overlay;
pub mod pointer;
pub mod protocol;
pub mod sequencer;
pub mod vision;
