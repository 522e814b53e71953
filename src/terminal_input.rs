//! Keyboard and mouse input from the terminal, translated into the
//! touch/tilt/gesture frames the game expects.
//!
//! Events are read on a dedicated thread and handed over through a channel so
//! the frame loop never blocks on I/O. Held keys are tracked the same way for
//! every terminal: a `key_frame` map records the frame each key was last seen
//! (press or repeat), and a key counts as held while that is recent.
//!
//! * **Keyboard-enhancement capable** terminals send `Release` events, which
//!   drop the key immediately.
//! * **Classic terminals** only repeat `Press`; keys expire after
//!   [`HOLD_WINDOW`] frames of silence, which is shorter than the OS repeat
//!   interval.

use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use log::debug;

use crate::display::CellMapping;
use crate::entities::Vec2;
use crate::platform::{Gesture, GestureKind, InputFrame, InputSource, Key, Touch, TouchPhase};

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. 4 frames at 30 FPS is about 133 ms.
pub const HOLD_WINDOW: u64 = 4;

/// Accelerometer reading reported while a tilt key is held.
pub const TILT_STRENGTH: f32 = 0.7;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

/// Start the reader thread. It exits when the receiver is dropped or the
/// terminal stops delivering events.
pub fn spawn_reader() -> mpsc::Receiver<Event> {
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });
    rx
}

pub struct TerminalInput {
    rx: mpsc::Receiver<Event>,
    mapping: CellMapping,
    // Maps each held key → the frame it was last seen (press or repeat).
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
    pointer: Option<Vec2>,
    focused: bool,
}

impl TerminalInput {
    pub fn new(rx: mpsc::Receiver<Event>, mapping: CellMapping) -> Self {
        Self {
            rx,
            mapping,
            key_frame: HashMap::new(),
            frame: 0,
            pointer: None,
            focused: true,
        }
    }

    pub fn has_focus(&self) -> bool {
        self.focused
    }

    pub fn mapping(&self) -> CellMapping {
        self.mapping
    }

    fn on_key(&mut self, key: KeyEvent, frame: &mut InputFrame) {
        let KeyEvent {
            code, kind, modifiers, ..
        } = key;
        match kind {
            KeyEventKind::Press => {
                self.key_frame.insert(code, self.frame);
                match code {
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        frame.pressed.push(Key::Quit);
                    }
                    KeyCode::Char('q') | KeyCode::Char('Q') => frame.pressed.push(Key::Quit),
                    KeyCode::Esc | KeyCode::Char('p') | KeyCode::Char('P') => frame.pressed.push(Key::Back),
                    KeyCode::Enter => frame.pressed.push(Key::Select),
                    KeyCode::Up => frame.pressed.push(Key::Up),
                    KeyCode::Down => frame.pressed.push(Key::Down),
                    KeyCode::Char(' ') | KeyCode::Char('b') | KeyCode::Char('B') => {
                        let position = self.pointer.unwrap_or_else(|| {
                            let viewport = self.mapping.viewport;
                            Vec2::new(viewport.width / 2.0, viewport.height / 2.0)
                        });
                        frame.gestures.push(Gesture {
                            kind: GestureKind::DoubleTap,
                            position,
                        });
                    }
                    _ => {}
                }
            }
            // Repeat: refresh timestamp so key stays "held"
            KeyEventKind::Repeat => {
                self.key_frame.insert(code, self.frame);
            }
            // Release: remove key immediately (keyboard-enhancement path)
            KeyEventKind::Release => {
                self.key_frame.remove(&code);
            }
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent, frame: &mut InputFrame) {
        let position = self.mapping.to_viewport(mouse.column, mouse.row);
        let phase = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                frame.gestures.push(Gesture {
                    kind: GestureKind::Tap,
                    position,
                });
                TouchPhase::Pressed
            }
            MouseEventKind::Drag(MouseButton::Left) => TouchPhase::Moved,
            MouseEventKind::Up(MouseButton::Left) => TouchPhase::Released,
            _ => return,
        };
        self.pointer = Some(position);
        frame.touches.push(Touch { position, phase });
    }

    /// Apply one terminal event to the frame being built.
    pub fn handle_event(&mut self, event: Event, frame: &mut InputFrame) {
        match event {
            Event::Key(key) => self.on_key(key, frame),
            Event::Mouse(mouse) => self.on_mouse(mouse, frame),
            Event::Resize(cols, rows) => {
                self.mapping = CellMapping::new(self.mapping.viewport, cols, rows);
                debug!("terminal resized to {cols}x{rows}");
            }
            Event::FocusGained => self.focused = true,
            Event::FocusLost => self.focused = false,
            Event::Paste(_) => {}
        }
    }
}

impl InputSource for TerminalInput {
    fn poll_once(&mut self) -> InputFrame {
        self.frame += 1;
        let mut frame = InputFrame::default();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(event) = self.rx.try_recv() {
            self.handle_event(event, &mut frame);
        }

        // ── Held arrows tilt the ship ─────────────────────────────────────────
        let left = is_held(&self.key_frame, &KeyCode::Left, self.frame);
        let right = is_held(&self.key_frame, &KeyCode::Right, self.frame);
        frame.accelerometer.x = match (left, right) {
            (true, false) => -TILT_STRENGTH,
            (false, true) => TILT_STRENGTH,
            _ => 0.0,
        };
        frame
    }
}
