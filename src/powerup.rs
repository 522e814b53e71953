//! Falling pickups: shield, extra life and bomb.
//!
//! The three kinds share one type. What differs is data (textures, effect
//! timing) plus how the gameplay session reacts to a collection, which it
//! decides from the count [`PowerUp::update`] returns.

use anyhow::Result;
use log::debug;
use rand::Rng;

use crate::entities::{fade_alpha, update_and_prune, Animation, Color, Sprite, StripSpec, Vec2};
use crate::platform::{AssetStore, Renderer, SoundHandle, TextureHandle, Viewport};

/// Units per tick.
pub const FALL_SPEED: f32 = 5.0;
/// Seconds of invulnerability a shield grants.
pub const SHIELD_DURATION: f32 = 5.0;
/// Spawn keeps this far from the side walls, on top of the frame width.
const EDGE_MARGIN: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    Shield,
    ExtraLife,
    Bomb,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Shield, PowerUpKind::ExtraLife, PowerUpKind::Bomb];

    fn asset_stem(self) -> &'static str {
        match self {
            PowerUpKind::Shield => "shield",
            PowerUpKind::ExtraLife => "life",
            PowerUpKind::Bomb => "bomb",
        }
    }

    pub fn pickup_spec(self) -> StripSpec {
        StripSpec {
            frame_width: 128,
            frame_height: 128,
            frame_count: 16,
            frame_time_ms: 32,
            scale: if self == PowerUpKind::ExtraLife { 0.7 } else { 1.0 },
            looping: true,
        }
    }

    /// A fresh spawn point just above the top edge.
    pub fn spawn_position<R: Rng + ?Sized>(self, viewport: Viewport, rng: &mut R) -> Vec2 {
        let spec = self.pickup_spec();
        let low = EDGE_MARGIN + spec.frame_width as f32;
        let high = viewport.width - (spec.frame_width as f32 + EDGE_MARGIN);
        let x = if high > low { rng.gen_range(low..high) } else { low };
        Vec2::new(x, -(spec.frame_height as f32))
    }

    /// Overlay played on the ship once collected.
    pub fn effect_spec(self) -> StripSpec {
        match self {
            PowerUpKind::Shield => StripSpec {
                frame_width: 128,
                frame_height: 128,
                frame_count: 16,
                frame_time_ms: 32,
                scale: 1.0,
                looping: true,
            },
            PowerUpKind::ExtraLife => StripSpec {
                frame_width: 128,
                frame_height: 128,
                frame_count: 16,
                frame_time_ms: 45,
                scale: 1.0,
                looping: false,
            },
            PowerUpKind::Bomb => StripSpec {
                frame_width: 128,
                frame_height: 128,
                frame_count: 16,
                frame_time_ms: 45,
                scale: 1.5,
                looping: false,
            },
        }
    }
}

#[derive(Clone, Debug)]
pub struct PowerUp {
    kind: PowerUpKind,
    pickup_texture: TextureHandle,
    effect_texture: TextureHandle,
    sound: SoundHandle,
    pickups: Vec<Animation>,
    effect: Animation,
    effect_elapsed: f32,
}

impl PowerUp {
    pub fn load(kind: PowerUpKind, assets: &mut dyn AssetStore) -> Result<Self> {
        let stem = kind.asset_stem();
        Ok(Self {
            kind,
            pickup_texture: assets.load_texture(&format!("animations/{stem}-powerup"))?,
            effect_texture: assets.load_texture(&format!("player/{stem}"))?,
            sound: assets.load_sound(&format!("sound/{stem}"))?,
            pickups: Vec::new(),
            effect: Animation::default(),
            effect_elapsed: 0.0,
        })
    }

    pub fn kind(&self) -> PowerUpKind {
        self.kind
    }

    pub fn sound(&self) -> SoundHandle {
        self.sound
    }

    pub fn pickups(&self) -> &[Animation] {
        &self.pickups
    }

    pub fn create_power(&mut self, position: Vec2) {
        debug!("{:?} pickup dropped at ({:.0}, {:.0})", self.kind, position.x, position.y);
        self.pickups.push(Animation::start(
            self.pickup_texture,
            position,
            self.kind.pickup_spec(),
            Color::WHITE,
        ));
    }

    /// Move pickups, collect the ones touching `player` and tick the effect.
    /// Returns how many were collected this tick.
    pub fn update(&mut self, dt: f32, player: &Sprite, viewport: Viewport) -> u32 {
        let mut collected = 0;
        for pickup in self.pickups.iter_mut() {
            pickup.position.y += FALL_SPEED;
            if pickup.position.y > viewport.height + pickup.frame_height() as f32 {
                pickup.active = false;
            }
            if pickup.active && pickup.collides(player) {
                pickup.active = false;
                collected += 1;
            }
        }

        if collected > 0 {
            debug!("collected {collected} {:?}", self.kind);
            self.effect = Animation::start(
                self.effect_texture,
                player.position,
                self.kind.effect_spec(),
                Color::WHITE,
            );
            self.effect_elapsed = 0.0;
        }

        if self.kind == PowerUpKind::Shield && self.effect.active {
            self.effect_elapsed += dt;
            if self.effect_elapsed > SHIELD_DURATION {
                self.effect.active = false;
                self.effect_elapsed = 0.0;
            }
        }
        self.effect.position = player.position;
        self.effect.update(dt);

        update_and_prune(&mut self.pickups, dt);
        collected
    }

    /// Only a shield has a lasting effect.
    pub fn effect_active(&self) -> bool {
        self.kind == PowerUpKind::Shield && self.effect.active
    }

    pub fn effect_remaining(&self) -> f32 {
        if self.effect_active() {
            (SHIELD_DURATION - self.effect_elapsed).max(0.0)
        } else {
            0.0
        }
    }

    pub fn clear(&mut self) {
        self.pickups.clear();
        self.effect = Animation::default();
        self.effect_elapsed = 0.0;
    }

    pub fn draw(&self, renderer: &mut dyn Renderer, player_alive: bool) {
        if self.kind == PowerUpKind::Shield {
            let mut overlay = self.effect.clone();
            overlay.tint = Color::WHITE.scaled(fade_alpha(self.effect_elapsed / SHIELD_DURATION));
            if player_alive {
                overlay.draw(renderer);
            }
        } else {
            self.effect.draw(renderer);
        }
        for pickup in &self.pickups {
            pickup.draw(renderer);
        }
    }
}
