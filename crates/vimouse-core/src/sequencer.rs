//! Two-key input state machine.
//!
//! [`InputSequencer`] is driven by a fixed-interval tick. Each tick it reads
//! live key state, fires edge-triggered hotkeys, and while the overlay is
//! visible turns letter presses into two-letter codes.
//!
//! # States
//!
//! | Phase | Meaning |
//! |-------|---------|
//! | `OverlayHidden` | only hotkeys are recognized |
//! | `NoPending` | overlay visible, waiting for a first letter |
//! | `Pending(c)` | first letter `c` typed, waiting for a different second |
//!
//! Orthogonal to the phase, a release-wait suppresses letter scanning until
//! the most recently registered letter key goes up. Polling sees one
//! physical keydown on many consecutive ticks; the release-wait makes it
//! count once.
//!
//! # Resets
//!
//! The pending letter and the release-wait are both cleared when the overlay
//! is shown or hidden (by hotkey, by a resolved code, or by shutdown) and
//! when the first letter has been pending longer than the sequence timeout.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::InputConfig;
use crate::error::{ConfigError, PointerError};
use crate::keys::{Hotkey, HotkeyAction, Key, KeyStateSource};
use crate::overlay::OverlayControl;
use crate::pointer::{MouseButton, Pointer, ScrollDirection};

/// Modifiers that mark a letter press as part of a chord, not a code. Every
/// hotkey names at least one of them, so a hotkey press never doubles as a
/// code letter.
const CHORD_MODIFIERS: [Key; 3] = [Key::Alt, Key::Control, Key::Meta];

/// Mutable sequence state, owned by the polling worker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceState {
    /// First letter of a code in progress.
    pub pending: Option<char>,
    /// When `pending` was registered.
    pub last_key_time: Option<Instant>,
    /// Most recently registered letter key.
    pub last_key: Option<Key>,
    /// Letter scanning is suspended until `last_key` goes up.
    pub awaiting_release: bool,
}

impl SequenceState {
    fn reset(&mut self) {
        self.pending = None;
        self.awaiting_release = false;
    }

    fn await_release_of(&mut self, key: Key) {
        self.last_key = Some(key);
        self.awaiting_release = true;
    }
}

/// Observable state, for tests and debug logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    OverlayHidden,
    NoPending,
    Pending(char),
}

/// Whether the worker should keep ticking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Quit,
}

struct HotkeyBinding {
    action: HotkeyAction,
    hotkey: Hotkey,
    was_down: bool,
}

/// The polling state machine.
pub struct InputSequencer<K, P, O> {
    keys: K,
    pointer: P,
    overlay: O,
    hotkeys: Vec<HotkeyBinding>,
    timeout: Duration,
    scroll_step: i32,
    state: SequenceState,
}

impl<K, P, O> InputSequencer<K, P, O>
where
    K: KeyStateSource,
    P: Pointer,
    O: OverlayControl,
{
    /// Fails only when a hotkey binding does not parse.
    pub fn new(config: &InputConfig, keys: K, pointer: P, overlay: O) -> Result<Self, ConfigError> {
        let hotkeys = config
            .hotkeys()?
            .into_iter()
            .map(|(action, hotkey)| HotkeyBinding {
                action,
                hotkey,
                was_down: false,
            })
            .collect();

        Ok(Self {
            keys,
            pointer,
            overlay,
            hotkeys,
            timeout: config.sequence_timeout(),
            scroll_step: config.scroll_step,
            state: SequenceState::default(),
        })
    }

    pub fn phase(&self) -> Phase {
        if !self.overlay.is_visible() {
            return Phase::OverlayHidden;
        }
        match self.state.pending {
            Some(c) => Phase::Pending(c),
            None => Phase::NoPending,
        }
    }

    /// The key whose release is being waited for, if any.
    pub fn awaiting_release(&self) -> Option<Key> {
        if self.state.awaiting_release {
            self.state.last_key
        } else {
            None
        }
    }

    pub fn state(&self) -> &SequenceState {
        &self.state
    }

    pub fn keys(&self) -> &K {
        &self.keys
    }

    pub fn pointer(&self) -> &P {
        &self.pointer
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    /// Best-effort overlay hide before the process exits.
    pub fn shutdown(&mut self) {
        self.hide_overlay();
    }

    /// Run one poll cycle.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        // Edge state is refreshed for every binding before any action runs,
        // so a held hotkey never fires twice.
        let mut fired = Vec::new();
        for binding in &mut self.hotkeys {
            let down = binding.hotkey.is_down(&self.keys);
            if down && !binding.was_down {
                fired.push(binding.action);
            }
            binding.was_down = down;
        }

        for action in fired {
            if self.run_hotkey(action) == TickOutcome::Quit {
                return TickOutcome::Quit;
            }
        }

        if self.overlay.is_visible() {
            self.scan_letters(now);
        }
        TickOutcome::Continue
    }

    fn run_hotkey(&mut self, action: HotkeyAction) -> TickOutcome {
        debug!(?action, "hotkey");
        match action {
            HotkeyAction::ToggleOverlay => {
                if self.overlay.is_visible() {
                    self.hide_overlay();
                } else {
                    self.show_overlay();
                }
            }
            HotkeyAction::ScrollUp => self.scroll(ScrollDirection::Up),
            HotkeyAction::ScrollDown => self.scroll(ScrollDirection::Down),
            HotkeyAction::Quit => {
                info!("quit hotkey pressed");
                self.hide_overlay();
                return TickOutcome::Quit;
            }
        }
        TickOutcome::Continue
    }

    fn show_overlay(&mut self) {
        self.overlay.show();
        self.state.reset();
    }

    fn hide_overlay(&mut self) {
        if self.overlay.is_visible() {
            self.overlay.hide();
        }
        self.state.reset();
    }

    fn scroll(&mut self, direction: ScrollDirection) {
        let result = self.pointer.scroll(direction, self.scroll_step);
        log_pointer_error("scroll", result);
    }

    fn scan_letters(&mut self, now: Instant) {
        if self.state.pending.is_some() {
            let expired = self
                .state
                .last_key_time
                .is_some_and(|t| now.saturating_duration_since(t) > self.timeout);
            if expired {
                debug!(pending = ?self.state.pending, "sequence timed out");
                self.state.reset();
            }
        }

        if self.state.awaiting_release {
            let held = self
                .state
                .last_key
                .is_some_and(|key| self.keys.is_key_down(key));
            if !held {
                self.state.awaiting_release = false;
                debug!(key = ?self.state.last_key, "key released");
            }
            return;
        }

        if CHORD_MODIFIERS.iter().any(|&m| self.keys.is_key_down(m)) {
            return;
        }

        for key in Key::letters() {
            if !self.keys.is_key_down(key) {
                continue;
            }
            let Some(letter) = key.as_letter() else {
                continue;
            };

            match self.state.pending {
                None => {
                    debug!(letter = %letter, "first letter");
                    self.state.pending = Some(letter);
                    self.state.last_key_time = Some(now);
                    self.state.await_release_of(key);
                }
                Some(first) if first != letter => {
                    self.resolve(first, letter);
                    self.state.await_release_of(key);
                    return;
                }
                Some(_) => {}
            }
        }
    }

    fn resolve(&mut self, first: char, second: char) {
        let code: String = [first, second].iter().collect();
        match self.overlay.target(&code) {
            Some(region) => {
                debug!(code = %code, x = region.x, y = region.y, "code resolved");
                let moved = self.pointer.move_to(region.x, region.y);
                log_pointer_error("move", moved);
                self.hide_overlay();
                let clicked = self.pointer.click(MouseButton::Left);
                log_pointer_error("click", clicked);
            }
            None => {
                debug!(code = %code, "no region for code");
                self.state.reset();
            }
        }
    }
}

fn log_pointer_error(action: &str, result: Result<(), PointerError>) {
    if let Err(e) = result {
        warn!(action, error = %e, "pointer request failed");
    }
}
