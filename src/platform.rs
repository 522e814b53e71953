//! Collaborator interfaces the simulation talks to.
//!
//! The core never touches a window, a sound card or a sensor directly. It asks
//! an [`AssetStore`] for opaque handles, hands draw calls to a [`Renderer`], and
//! reads exactly one [`InputFrame`] per tick from an [`InputSource`]. The
//! terminal host in `main.rs` provides the concrete implementations.

use anyhow::Result;

use crate::entities::{Color, Rect, Vec2};

// ── Handles ───────────────────────────────────────────────────────────────────

/// Opaque texture handle. Carries the texture size because bounding boxes are
/// derived from it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextureHandle {
    pub id: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FontHandle(pub u32);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub u32);

/// Logical playfield size. Everything in the simulation is expressed in these
/// units; the renderer maps them onto whatever surface it owns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Portrait phone resolution the game was tuned for.
    pub const PORTRAIT: Viewport = Viewport {
        width: 480.0,
        height: 800.0,
    };

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::PORTRAIT
    }
}

// ── Asset store ───────────────────────────────────────────────────────────────

/// Resolves logical asset names to handles. Implementations cache, so loading
/// the same name twice returns the same handle. An unknown name is an error.
pub trait AssetStore {
    fn load_texture(&mut self, name: &str) -> Result<TextureHandle>;
    fn load_font(&mut self, name: &str) -> Result<FontHandle>;
    fn load_sound(&mut self, name: &str) -> Result<SoundHandle>;
}

// ── Renderer ──────────────────────────────────────────────────────────────────

/// One textured quad.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteDraw {
    pub texture: TextureHandle,
    /// Where `origin` lands on screen.
    pub position: Vec2,
    /// Region of the texture to sample (a single frame for strips).
    pub source: Rect,
    pub tint: Color,
    /// Radians.
    pub rotation: f32,
    pub origin: Vec2,
    pub scale: f32,
}

/// Frame bracketing (`begin_frame`/`end_frame`) belongs to the screen stack;
/// screens only issue draw calls.
pub trait Renderer {
    fn begin_frame(&mut self);
    /// Offset applied to every following draw call until changed again.
    fn set_translation(&mut self, offset: Vec2);
    fn draw_sprite(&mut self, draw: &SpriteDraw);
    fn draw_text(&mut self, font: FontHandle, text: &str, position: Vec2, color: Color, scale: f32);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn end_frame(&mut self) -> Result<()>;
}

// ── Input ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Select,
    Back,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    Pressed,
    Moved,
    Released,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Touch {
    pub position: Vec2,
    pub phase: TouchPhase,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureKind {
    Tap,
    DoubleTap,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gesture {
    pub kind: GestureKind,
    pub position: Vec2,
}

/// Everything the input devices reported for one tick. Immutable once polled.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputFrame {
    /// Keys that went down since the previous poll.
    pub pressed: Vec<Key>,
    pub touches: Vec<Touch>,
    pub gestures: Vec<Gesture>,
    /// Accelerometer reading in g (x: left/right tilt, y: forward/back).
    pub accelerometer: Vec2,
}

impl InputFrame {
    pub fn is_new_press(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn gestures_of(&self, kind: GestureKind) -> impl Iterator<Item = &Gesture> + '_ {
        self.gestures.iter().filter(move |g| g.kind == kind)
    }
}

/// Polled exactly once per simulation tick by the screen stack.
pub trait InputSource {
    fn poll_once(&mut self) -> InputFrame;
}
