//! Weapons and the projectiles they fire.
//!
//! Weapon variants are a closed set, so they are one enum dispatched with
//! `match`. A weapon never owns what it fires: [`Weapon::fire`] hands the new
//! projectiles back to the caller, and each projectile only remembers the
//! [`PlayerId`] of whoever fired it.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::entities::{Color, Sprite, Vec2};
use crate::platform::{AssetStore, Renderer, TextureHandle};

// ── Tuning ────────────────────────────────────────────────────────────────────

/// Units per tick.
pub const PROJECTILE_SPEED: f32 = 15.0;
pub const PROJECTILE_SCALE: f32 = 0.5;
pub const LASER_DAMAGE: f32 = 35.0;
pub const PLASMA_DAMAGE: f32 = 50.0;
/// Lateral distance between the two double-laser bolts and the ship centre.
pub const DOUBLE_LASER_OFFSET: f32 = 8.0;
pub const TRIPLE_LASER_SPREAD_DEG: f32 = 2.5;
pub const PLASMA_SPREAD_DEG: f32 = 3.5;
/// Impact animations spawned per hit.
pub const IMPACTS_PER_HIT: u32 = 2;

// ── Weapon kinds ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Laser,
    DoubleLaser,
    TripleLaser,
    Plasma,
}

impl WeaponKind {
    /// Seconds between shots.
    pub fn fire_delay(self) -> f32 {
        match self {
            WeaponKind::Laser | WeaponKind::DoubleLaser => 0.12,
            WeaponKind::TripleLaser => 0.17,
            WeaponKind::Plasma => 0.3,
        }
    }

    pub fn projectile_count(self) -> usize {
        match self {
            WeaponKind::Laser => 1,
            WeaponKind::DoubleLaser => 2,
            WeaponKind::TripleLaser | WeaponKind::Plasma => 3,
        }
    }

    /// The best weapon a score has earned. Used when a session is rebuilt
    /// from a snapshot, where the upgrade thresholds were crossed long ago.
    pub fn for_score(score: f32) -> WeaponKind {
        if score >= 25000.0 {
            WeaponKind::Plasma
        } else if score >= 12000.0 {
            WeaponKind::TripleLaser
        } else if score >= 4200.0 {
            WeaponKind::DoubleLaser
        } else {
            WeaponKind::Laser
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WeaponKind::Laser => "Laser",
            WeaponKind::DoubleLaser => "Double Laser",
            WeaponKind::TripleLaser => "Triple Laser",
            WeaponKind::Plasma => "Plasma",
        }
    }
}

// ── Projectile textures ───────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProjectileTextures {
    pub laser: TextureHandle,
    pub laser_green: TextureHandle,
    pub laser_red: TextureHandle,
    pub plasma: TextureHandle,
}

impl ProjectileTextures {
    pub fn load(assets: &mut dyn AssetStore) -> Result<Self> {
        Ok(Self {
            laser: assets.load_texture("player/laser")?,
            laser_green: assets.load_texture("player/laser-green")?,
            laser_red: assets.load_texture("player/laser-red")?,
            plasma: assets.load_texture("player/plasma")?,
        })
    }

    fn for_kind(&self, kind: WeaponKind) -> TextureHandle {
        match kind {
            WeaponKind::Laser => self.laser,
            WeaponKind::DoubleLaser => self.laser_green,
            WeaponKind::TripleLaser => self.laser_red,
            WeaponKind::Plasma => self.plasma,
        }
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// Identifies the player that fired a projectile. Not an owning reference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PlayerId(pub u32);

/// Request to play impact animations where a projectile struck.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Impact {
    pub position: Vec2,
    pub tint: Color,
    pub count: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub sprite: Sprite,
    pub owner: PlayerId,
    pub kind: WeaponKind,
    pub damage: f32,
    pub active: bool,
}

impl Projectile {
    /// `direction` is a unit vector; `velocity` stores it scaled by the speed
    /// and the position moves against it, so `(0, 1)` travels up the screen.
    pub fn new(
        kind: WeaponKind,
        owner: PlayerId,
        texture: TextureHandle,
        position: Vec2,
        direction: Vec2,
    ) -> Self {
        let mut sprite = Sprite::new(texture);
        sprite.scale = PROJECTILE_SCALE;
        sprite.position = position;
        sprite.velocity = direction * PROJECTILE_SPEED;
        let damage = match kind {
            WeaponKind::Plasma => PLASMA_DAMAGE,
            _ => LASER_DAMAGE,
        };
        Self {
            sprite,
            owner,
            kind,
            damage,
            active: true,
        }
    }

    pub fn impact_tint(&self) -> Color {
        match self.kind {
            WeaponKind::Laser => Color::from_f32(0.6, 1.0, 1.0, 0.5),
            WeaponKind::DoubleLaser => Color::from_f32(0.6, 1.0, 0.6, 0.5),
            WeaponKind::TripleLaser => Color::from_f32(1.0, 0.47, 0.41, 0.5),
            WeaponKind::Plasma => Color::rgba(255, 156, 255, 128),
        }
    }

    /// The off-screen check runs before the move, so a projectile spends one
    /// extra tick above the top edge before it goes inactive.
    pub fn update(&mut self, _dt: f32) {
        let margin = self.sprite.width() as f32 * self.sprite.scale;
        if self.sprite.position.y < -margin {
            self.active = false;
        }
        self.sprite.position -= self.sprite.velocity;
    }

    /// Describe the impact effect. Does not deactivate the projectile; the
    /// collision pass queues its removal.
    pub fn on_hit(&self) -> Impact {
        Impact {
            position: self.sprite.position,
            tint: self.impact_tint(),
            count: IMPACTS_PER_HIT,
        }
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        self.sprite.draw(renderer);
    }
}

// ── Weapon ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Weapon {
    kind: WeaponKind,
    fire_delay: f32,
    cooldown: f32,
}

impl Weapon {
    pub fn new(kind: WeaponKind) -> Self {
        Self {
            kind,
            fire_delay: kind.fire_delay(),
            cooldown: 0.0,
        }
    }

    pub fn kind(&self) -> WeaponKind {
        self.kind
    }

    pub fn fire_delay(&self) -> f32 {
        self.fire_delay
    }

    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown <= 0.0
    }

    pub fn update(&mut self, dt: f32) {
        if self.cooldown > 0.0 {
            self.cooldown = (self.cooldown - dt).max(0.0);
        }
    }

    /// Spawn this weapon's volley from `origin`. Returns nothing while cooling
    /// down; requests are dropped, not buffered.
    pub fn fire(
        &mut self,
        owner: PlayerId,
        origin: Vec2,
        direction: Vec2,
        textures: &ProjectileTextures,
    ) -> Vec<Projectile> {
        if !self.is_ready() {
            return Vec::new();
        }
        self.cooldown = self.fire_delay;

        let texture = textures.for_kind(self.kind);
        let shot = |position: Vec2, dir: Vec2| Projectile::new(self.kind, owner, texture, position, dir);

        match self.kind {
            WeaponKind::Laser => vec![shot(origin, direction)],
            WeaponKind::DoubleLaser => {
                let cross = direction.perp() * DOUBLE_LASER_OFFSET;
                vec![shot(origin + cross, direction), shot(origin - cross, direction)]
            }
            WeaponKind::TripleLaser | WeaponKind::Plasma => {
                let spread = if self.kind == WeaponKind::Plasma {
                    PLASMA_SPREAD_DEG
                } else {
                    TRIPLE_LASER_SPREAD_DEG
                };
                let [left, right] = spread_directions(direction, spread.to_radians());
                vec![shot(origin, direction), shot(origin, left), shot(origin, right)]
            }
        }
    }
}

/// Two directions fanned `spread` radians either side of `direction`.
///
/// The base angle is measured from screen-up, with its sign taken from which
/// side of up the direction lies on.
pub fn spread_directions(direction: Vec2, spread: f32) -> [Vec2; 2] {
    let mut rotation = Vec2::UP.dot(direction).clamp(-1.0, 1.0).acos();
    if Vec2::UP.dot(Vec2::new(direction.y, -direction.x)) <= 0.0 {
        rotation = -rotation;
    }
    let at = |angle: f32| Vec2::new(angle.sin(), -angle.cos());
    [at(rotation - spread), at(rotation + spread)]
}
