//! Real desktop collaborators: screen capture, cursor injection, key state.
//!
//! | Concern | Crate | Notes |
//! |---------|-------|-------|
//! | Capture | `xcap` | every monitor, composited into one frame |
//! | Cursor | `enigo` | absolute move, click, vertical wheel |
//! | Key state | `rdev` | listener thread keeps the set of held keys |
//!
//! On Linux `rdev` needs an X11 session; under Wayland the listener reports
//! no keys and the hotkeys never fire.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use anyhow::Context;
use enigo::{Enigo, MouseControllable};
use tracing::{debug, error};
use vimouse_core::capture::ScreenCapture;
use vimouse_core::error::{CaptureError, PointerError};
use vimouse_core::frame::Frame;
use vimouse_core::keys::{Key, KeyStateSource};
use vimouse_core::pointer::{MouseButton, Pointer, ScrollDirection};
use xcap::Monitor;

/// Captures the whole virtual desktop.
#[derive(Debug)]
pub struct DesktopCapture;

impl DesktopCapture {
    /// Fail at startup when there is no screen at all.
    pub fn probe() -> anyhow::Result<Self> {
        let monitors = Monitor::all().context("failed to enumerate monitors")?;
        if monitors.is_empty() {
            anyhow::bail!(CaptureError::NoScreen);
        }
        for m in &monitors {
            debug!(
                name = m.name(),
                x = m.x(),
                y = m.y(),
                width = m.width(),
                height = m.height(),
                "monitor"
            );
        }
        Ok(Self)
    }
}

impl ScreenCapture for DesktopCapture {
    fn capture_desktop(&mut self) -> Result<Frame, CaptureError> {
        let monitors = Monitor::all().map_err(|e| CaptureError::Resource(e.to_string()))?;

        let mut shots = Vec::with_capacity(monitors.len());
        for monitor in &monitors {
            let image = monitor
                .capture_image()
                .map_err(|e| CaptureError::Resource(e.to_string()))?;
            let frame = Frame::from_rgba(image.width(), image.height(), image.as_raw())?;
            shots.push((monitor.x(), monitor.y(), frame));
        }

        composite(shots)
    }
}

/// Place per-monitor frames on one canvas whose origin is the top-left of
/// the bounding box of all monitors. Gaps stay black.
fn composite(shots: Vec<(i32, i32, Frame)>) -> Result<Frame, CaptureError> {
    if shots.len() == 1 {
        if let Some((x, y, frame)) = shots.into_iter().next() {
            return Ok(frame.with_origin(x, y));
        }
        return Err(CaptureError::NoScreen);
    }

    let min_x = shots.iter().map(|(x, _, _)| *x).min().ok_or(CaptureError::NoScreen)?;
    let min_y = shots.iter().map(|(_, y, _)| *y).min().ok_or(CaptureError::NoScreen)?;
    let max_x = shots
        .iter()
        .map(|(x, _, f)| *x + f.width() as i32)
        .max()
        .ok_or(CaptureError::NoScreen)?;
    let max_y = shots
        .iter()
        .map(|(_, y, f)| *y + f.height() as i32)
        .max()
        .ok_or(CaptureError::NoScreen)?;

    let width = (max_x - min_x) as u32;
    let height = (max_y - min_y) as u32;
    let mut desktop = Frame::filled(width, height, 0)?.with_origin(min_x, min_y);
    for (x, y, frame) in &shots {
        desktop.blit(frame, (x - min_x) as u32, (y - min_y) as u32);
    }
    Ok(desktop)
}

/// Cursor control through `enigo`.
pub struct DesktopPointer {
    enigo: Enigo,
}

impl DesktopPointer {
    pub fn new() -> Self {
        Self {
            enigo: Enigo::new(),
        }
    }
}

impl Default for DesktopPointer {
    fn default() -> Self {
        Self::new()
    }
}

impl Pointer for DesktopPointer {
    fn move_to(&mut self, x: i32, y: i32) -> Result<(), PointerError> {
        self.enigo.mouse_move_to(x, y);
        Ok(())
    }

    fn click(&mut self, button: MouseButton) -> Result<(), PointerError> {
        let button = match button {
            MouseButton::Left => enigo::MouseButton::Left,
            MouseButton::Right => enigo::MouseButton::Right,
            MouseButton::Middle => enigo::MouseButton::Middle,
        };
        self.enigo.mouse_click(button);
        Ok(())
    }

    fn scroll(&mut self, direction: ScrollDirection, amount: i32) -> Result<(), PointerError> {
        // Positive is toward the user (content moves up).
        let notches = match direction {
            ScrollDirection::Up => -amount,
            ScrollDirection::Down => amount,
        };
        self.enigo.mouse_scroll_y(notches);
        Ok(())
    }
}

/// Which physical copy of a key (left or right modifier).
type Physical = (Key, u8);

/// Global key state fed by an `rdev` listener thread.
pub struct GlobalKeys {
    down: Arc<Mutex<HashSet<Physical>>>,
}

fn lock(set: &Mutex<HashSet<Physical>>) -> MutexGuard<'_, HashSet<Physical>> {
    set.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl GlobalKeys {
    /// Spawn the listener. It runs until the process exits.
    pub fn start() -> anyhow::Result<Self> {
        let down = Arc::new(Mutex::new(HashSet::new()));
        let shared = Arc::clone(&down);

        thread::Builder::new()
            .name("vimouse-keys".to_string())
            .spawn(move || {
                let result = rdev::listen(move |event| {
                    let (key, pressed) = match event.event_type {
                        rdev::EventType::KeyPress(k) => (k, true),
                        rdev::EventType::KeyRelease(k) => (k, false),
                        _ => return,
                    };
                    let Some(physical) = map_key(key) else {
                        return;
                    };
                    let mut held = lock(&shared);
                    if pressed {
                        held.insert(physical);
                    } else {
                        held.remove(&physical);
                    }
                });
                if let Err(e) = result {
                    error!(error = ?e, "global key listener stopped");
                }
            })
            .context("failed to spawn key listener thread")?;

        Ok(Self { down })
    }
}

impl KeyStateSource for GlobalKeys {
    fn is_key_down(&self, key: Key) -> bool {
        lock(&self.down).iter().any(|(k, _)| *k == key)
    }
}

fn map_key(key: rdev::Key) -> Option<Physical> {
    use rdev::Key as R;

    let left = |k: Key| Some((k, 0));
    let right = |k: Key| Some((k, 1));
    let ch = |c: char| Some((Key::Char(c), 0));

    match key {
        R::KeyA => ch('a'),
        R::KeyB => ch('b'),
        R::KeyC => ch('c'),
        R::KeyD => ch('d'),
        R::KeyE => ch('e'),
        R::KeyF => ch('f'),
        R::KeyG => ch('g'),
        R::KeyH => ch('h'),
        R::KeyI => ch('i'),
        R::KeyJ => ch('j'),
        R::KeyK => ch('k'),
        R::KeyL => ch('l'),
        R::KeyM => ch('m'),
        R::KeyN => ch('n'),
        R::KeyO => ch('o'),
        R::KeyP => ch('p'),
        R::KeyQ => ch('q'),
        R::KeyR => ch('r'),
        R::KeyS => ch('s'),
        R::KeyT => ch('t'),
        R::KeyU => ch('u'),
        R::KeyV => ch('v'),
        R::KeyW => ch('w'),
        R::KeyX => ch('x'),
        R::KeyY => ch('y'),
        R::KeyZ => ch('z'),
        R::Num0 => ch('0'),
        R::Num1 => ch('1'),
        R::Num2 => ch('2'),
        R::Num3 => ch('3'),
        R::Num4 => ch('4'),
        R::Num5 => ch('5'),
        R::Num6 => ch('6'),
        R::Num7 => ch('7'),
        R::Num8 => ch('8'),
        R::Num9 => ch('9'),
        R::BackSlash | R::IntlBackslash => ch('\\'),
        R::Slash => ch('/'),
        R::SemiColon => ch(';'),
        R::Comma => ch(','),
        R::Dot => ch('.'),
        R::Quote => ch('\''),
        R::LeftBracket => ch('['),
        R::RightBracket => ch(']'),
        R::Minus => ch('-'),
        R::Equal => ch('='),
        R::BackQuote => ch('`'),
        R::Space => left(Key::Space),
        R::Return => left(Key::Enter),
        R::Tab => left(Key::Tab),
        R::Escape => left(Key::Escape),
        R::Alt => left(Key::Alt),
        R::AltGr => right(Key::Alt),
        R::ControlLeft => left(Key::Control),
        R::ControlRight => right(Key::Control),
        R::ShiftLeft => left(Key::Shift),
        R::ShiftRight => right(Key::Shift),
        R::MetaLeft => left(Key::Meta),
        R::MetaRight => right(Key::Meta),
        _ => None,
    }
}
