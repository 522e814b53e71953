//! Entity primitives: vectors, rectangles, colours, sprites and frame-strip
//! animations. Mostly data; the only logic here is the geometry every entity
//! shares (bounding boxes, collision, frame stepping).

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::platform::{Renderer, SpriteDraw, TextureHandle};

// ── Vectors ───────────────────────────────────────────────────────────────────

/// Screen-space vector. `y` grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    /// Unit vector pointing up the screen.
    pub const UP: Vec2 = Vec2 { x: 0.0, y: -1.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Quarter turn: `(-y, x)`.
    pub fn perp(self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn round(self) -> Vec2 {
        Vec2::new(self.x.round(), self.y.round())
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

// ── Rectangles ────────────────────────────────────────────────────────────────

/// Integer rectangle, top-left anchored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Box of `size * scale` centred on `center`. Half extents use integer
    /// halving of the unscaled size, matching how sprites are drawn.
    pub fn centered(center: Vec2, width: u32, height: u32, scale: f32) -> Rect {
        Rect::new(
            (center.x - (width / 2) as f32 * scale) as i32,
            (center.y - (height / 2) as f32 * scale) as i32,
            (width as f32 * scale) as i32,
            (height as f32 * scale) as i32,
        )
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Strict overlap; touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        other.x < self.right()
            && self.x < other.right()
            && other.y < self.bottom()
            && self.y < other.bottom()
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let (px, py) = (point.x as i32, point.y as i32);
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}

// ── Colours ───────────────────────────────────────────────────────────────────

/// Premultiplied RGBA tint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    pub const RED: Color = Color::rgba(255, 0, 0, 255);
    pub const YELLOW_GREEN: Color = Color::rgba(154, 205, 50, 255);
    /// Translucent grey used by the HUD and floating combat text.
    pub const HUD: Color = Color::rgba(153, 153, 153, 153);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build from normalised channels, clamped to `[0, 1]`.
    pub fn from_f32(r: f32, g: f32, b: f32, a: f32) -> Self {
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgba(to_u8(r), to_u8(g), to_u8(b), to_u8(a))
    }

    /// Every channel multiplied by `factor` (fades premultiplied colours).
    pub fn scaled(self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        let mul = |v: u8| (v as f32 * f).round() as u8;
        Self::rgba(mul(self.r), mul(self.g), mul(self.b), mul(self.a))
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// Parabolic fade used for overlays and floating text: 0 at both ends, 1 at
/// the midpoint of `[0, 1]`.
pub fn fade_alpha(t: f32) -> f32 {
    4.0 * t * (1.0 - t)
}

// ── Sprites ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub texture: TextureHandle,
    /// Centre of the sprite.
    pub position: Vec2,
    pub velocity: Vec2,
    /// Degrees.
    pub rotation: f32,
    pub scale: f32,
    pub tint: Color,
}

impl Sprite {
    pub fn new(texture: TextureHandle) -> Self {
        Self {
            texture,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            scale: 1.0,
            tint: Color::WHITE,
        }
    }

    pub fn width(&self) -> u32 {
        self.texture.width
    }

    pub fn height(&self) -> u32 {
        self.texture.height
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new((self.width() / 2) as f32, (self.height() / 2) as f32)
    }

    /// Scaled half extents, the margin the sprite keeps from a boundary.
    pub fn half_extents(&self) -> Vec2 {
        self.origin() * self.scale
    }

    /// Always derived from the current position and scale.
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.position, self.width(), self.height(), self.scale)
    }

    pub fn collides(&self, other: &Sprite) -> bool {
        self.bounds().intersects(&other.bounds())
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        self.draw_at(renderer, self.position);
    }

    pub fn draw_at(&self, renderer: &mut dyn Renderer, position: Vec2) {
        renderer.draw_sprite(&SpriteDraw {
            texture: self.texture,
            position,
            source: Rect::new(0, 0, self.width() as i32, self.height() as i32),
            tint: self.tint,
            rotation: self.rotation.to_radians(),
            origin: self.origin(),
            scale: self.scale,
        });
    }
}

// ── Animations ────────────────────────────────────────────────────────────────

/// Layout and timing of a horizontal frame strip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StripSpec {
    pub frame_width: u32,
    pub frame_height: u32,
    pub frame_count: u32,
    pub frame_time_ms: u32,
    pub scale: f32,
    pub looping: bool,
}

/// A frame-strip animation. The default value is inactive and draws nothing.
///
/// Once a non-looping animation runs past its last frame it becomes inactive
/// and stays that way until restarted with [`Animation::start`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Animation {
    pub texture: TextureHandle,
    pub position: Vec2,
    pub tint: Color,
    pub active: bool,
    spec: Option<StripSpec>,
    elapsed_ms: u32,
    current_frame: u32,
}

impl Animation {
    pub fn start(texture: TextureHandle, position: Vec2, spec: StripSpec, tint: Color) -> Self {
        Self {
            texture,
            position,
            tint,
            active: true,
            spec: Some(spec),
            elapsed_ms: 0,
            current_frame: 0,
        }
    }

    pub fn spec(&self) -> Option<&StripSpec> {
        self.spec.as_ref()
    }

    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    pub fn frame_width(&self) -> u32 {
        self.spec.map_or(0, |s| s.frame_width)
    }

    pub fn frame_height(&self) -> u32 {
        self.spec.map_or(0, |s| s.frame_height)
    }

    pub fn scale(&self) -> f32 {
        self.spec.map_or(1.0, |s| s.scale)
    }

    pub fn update(&mut self, dt: f32) {
        let Some(spec) = self.spec else { return };
        if !self.active {
            return;
        }

        self.elapsed_ms += (dt * 1000.0) as u32;
        if self.elapsed_ms > spec.frame_time_ms {
            self.current_frame += 1;
            if self.current_frame >= spec.frame_count {
                self.current_frame = 0;
                if !spec.looping {
                    self.active = false;
                }
            }
            self.elapsed_ms = 0;
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.position, self.frame_width(), self.frame_height(), self.scale())
    }

    pub fn collides(&self, sprite: &Sprite) -> bool {
        self.bounds().intersects(&sprite.bounds())
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        let Some(spec) = self.spec else { return };
        if !self.active {
            return;
        }
        renderer.draw_sprite(&SpriteDraw {
            texture: self.texture,
            position: self.position,
            source: Rect::new(
                (self.current_frame * spec.frame_width) as i32,
                0,
                spec.frame_width as i32,
                spec.frame_height as i32,
            ),
            tint: self.tint,
            rotation: 0.0,
            origin: Vec2::new((spec.frame_width / 2) as f32, (spec.frame_height / 2) as f32),
            scale: spec.scale,
        });
    }
}

/// Step every animation and drop the ones that finished.
pub fn update_and_prune(animations: &mut Vec<Animation>, dt: f32) {
    for animation in animations.iter_mut() {
        animation.update(dt);
    }
    animations.retain(|a| a.active);
}
