//! The player's ship: movement, weapon, projectiles and the
//! death / respawn cycle.

use anyhow::Result;
use log::{debug, info};

use crate::collection::RemovalList;
use crate::entities::{fade_alpha, Animation, Color, Sprite, StripSpec, Vec2};
use crate::platform::{AssetStore, InputFrame, Renderer, TextureHandle, TouchPhase, Viewport};
use crate::weapon::{PlayerId, Projectile, ProjectileTextures, Weapon, WeaponKind};

// ── Movement tuning ───────────────────────────────────────────────────────────

pub const PLAYER_SCALE: f32 = 0.7;
pub const ACCELERATION: f32 = 25000.0;
pub const MAX_SPEED: f32 = 1750.0;
/// Applied once per tick regardless of `dt`.
pub const DRAG: f32 = 0.48;
/// Tilt below this (in g) is ignored.
pub const TILT_DEAD_ZONE: f32 = 0.10;
pub const TILT_SCALE: f32 = 1.5;
/// Touches above this line belong to the HUD.
pub const TOUCH_MIN_Y: f32 = 80.0;
pub const TOP_MARGIN: f32 = 80.0;
pub const BOTTOM_MARGIN: f32 = 100.0;

// ── Life cycle tuning ─────────────────────────────────────────────────────────

pub const STARTING_LIVES: i32 = 3;
pub const DEAD_TIME: f32 = 1.5;
pub const GRACE_SHIELD_TIME: f32 = 1.5;

const GRACE_SHIELD_SPEC: StripSpec = StripSpec {
    frame_width: 128,
    frame_height: 128,
    frame_count: 16,
    frame_time_ms: 32,
    scale: 1.0,
    looping: true,
};

const BOOSTER_SPEC: StripSpec = StripSpec {
    frame_width: 128,
    frame_height: 128,
    frame_count: 16,
    frame_time_ms: 32,
    scale: 0.45,
    looping: true,
};

/// What the dead timer resolved to this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerEvent {
    Respawned,
    /// Reported once, after the final death.
    OutOfLives,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub sprite: Sprite,
    id: PlayerId,
    viewport: Viewport,
    lives: i32,
    alive: bool,
    weapon: Weapon,
    projectile_textures: ProjectileTextures,
    projectiles: RemovalList<Projectile>,
    movement: f32,
    dead_timer: f32,
    dead_text: &'static str,
    out_of_lives_reported: bool,
    shield_texture: TextureHandle,
    grace_shield: Animation,
    grace_timer: f32,
    booster: Animation,
}

impl Player {
    pub fn load(assets: &mut dyn AssetStore, viewport: Viewport) -> Result<Self> {
        let ship = assets.load_texture("player/ship")?;
        let shield_texture = assets.load_texture("player/shield")?;
        let booster_texture = assets.load_texture("animations/booster")?;
        let projectile_textures = ProjectileTextures::load(assets)?;

        let mut sprite = Sprite::new(ship);
        sprite.scale = PLAYER_SCALE;
        sprite.position = Vec2::new((viewport.width / 2.0).floor(), viewport.height - 120.0);

        let booster = Animation::start(
            booster_texture,
            booster_position(&sprite),
            BOOSTER_SPEC,
            Color::WHITE,
        );

        Ok(Self {
            sprite,
            id: PlayerId(1),
            viewport,
            lives: STARTING_LIVES,
            alive: true,
            weapon: Weapon::new(WeaponKind::Laser),
            projectile_textures,
            projectiles: RemovalList::new(),
            movement: 0.0,
            dead_timer: 0.0,
            dead_text: "You Died!",
            out_of_lives_reported: false,
            shield_texture,
            grace_shield: Animation::default(),
            grace_timer: 0.0,
            booster,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn position(&self) -> Vec2 {
        self.sprite.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.sprite.position = position;
    }

    pub fn lives(&self) -> i32 {
        self.lives
    }

    pub fn set_lives(&mut self, lives: i32) {
        self.lives = lives;
    }

    pub fn add_lives(&mut self, count: i32) {
        self.lives += count;
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn dead_text(&self) -> &'static str {
        self.dead_text
    }

    pub fn dead_timer(&self) -> f32 {
        self.dead_timer
    }

    pub fn grace_shield_active(&self) -> bool {
        self.grace_shield.active
    }

    pub fn weapon(&self) -> &Weapon {
        &self.weapon
    }

    /// Replaces the weapon outright. Projectiles already in flight stay.
    pub fn set_weapon(&mut self, kind: WeaponKind) {
        self.weapon = Weapon::new(kind);
    }

    pub fn projectiles(&self) -> &RemovalList<Projectile> {
        &self.projectiles
    }

    pub fn projectiles_mut(&mut self) -> &mut RemovalList<Projectile> {
        &mut self.projectiles
    }

    pub fn movement(&self) -> f32 {
        self.movement
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Tilt sets the movement intention; a touch below the HUD drags the ship
    /// straight to the finger.
    pub fn handle_input(&mut self, input: &InputFrame) {
        let tilt = input.accelerometer.x;
        if tilt.abs() > TILT_DEAD_ZONE {
            self.movement = (tilt * TILT_SCALE).clamp(-1.0, 1.0);
        }

        for touch in &input.touches {
            let dragging = matches!(touch.phase, TouchPhase::Pressed | TouchPhase::Moved);
            if dragging && touch.position.y > TOUCH_MIN_Y {
                self.sprite.position = touch.position;
            }
        }
    }

    // ── Update ────────────────────────────────────────────────────────────────

    pub fn update(&mut self, dt: f32) -> Option<PlayerEvent> {
        let mut velocity = self.sprite.velocity;
        velocity.x += self.movement * ACCELERATION * dt;
        velocity.x *= DRAG;
        velocity.x = velocity.x.clamp(-MAX_SPEED, MAX_SPEED);

        let mut position = (self.sprite.position + velocity * dt).round();
        let half = self.sprite.half_extents();
        position.x = position.x.max(half.x).min(self.viewport.width - half.x);
        position.y = position
            .y
            .max(TOP_MARGIN + half.y)
            .min(self.viewport.height - BOTTOM_MARGIN);

        self.sprite.velocity = velocity;
        self.sprite.position = position;

        self.booster.position = booster_position(&self.sprite);
        self.booster.update(dt);

        if self.alive {
            let volley = self.weapon.fire(
                self.id,
                self.sprite.position,
                Vec2::new(0.0, 1.0),
                &self.projectile_textures,
            );
            self.projectiles.extend(volley);
        }
        self.weapon.update(dt);

        // Projectiles of a dead ship are dropped rather than left hanging.
        for index in 0..self.projectiles.len() {
            let keep = self.alive && self.projectiles.get(index).map_or(false, |p| p.active);
            if keep {
                if let Some(projectile) = self.projectiles.get_mut(index) {
                    projectile.update(dt);
                }
            } else {
                self.projectiles.queue_removal(index);
            }
        }
        self.projectiles.apply_pending_removals();

        if self.grace_shield.active {
            self.grace_timer += dt;
            if self.grace_timer >= GRACE_SHIELD_TIME {
                self.grace_shield.active = false;
                self.grace_timer = 0.0;
            }
        }

        let event = if self.alive { None } else { self.tick_dead(dt) };

        self.grace_shield.position = self.sprite.position;
        self.grace_shield.update(dt);

        self.movement = 0.0;
        event
    }

    fn tick_dead(&mut self, dt: f32) -> Option<PlayerEvent> {
        if self.out_of_lives_reported {
            return None;
        }
        self.dead_timer += dt;
        if self.dead_timer < DEAD_TIME {
            return None;
        }
        self.dead_timer = 0.0;

        if self.lives < 0 {
            self.out_of_lives_reported = true;
            info!("out of lives");
            return Some(PlayerEvent::OutOfLives);
        }

        self.alive = true;
        self.grace_timer = 0.0;
        self.grace_shield = Animation::start(
            self.shield_texture,
            self.sprite.position,
            GRACE_SHIELD_SPEC,
            Color::WHITE,
        );
        debug!("respawned with {} lives left", self.lives);
        Some(PlayerEvent::Respawned)
    }

    /// Lethal hit. Lives bottom out at -1, which marks the final death.
    pub fn kill(&mut self) {
        if !self.alive {
            return;
        }
        if self.lives >= 0 {
            self.lives -= 1;
        }
        self.dead_text = match self.lives {
            0 => "Last Life!",
            l if l < 0 => "Game Over!",
            _ => "You Died!",
        };
        self.alive = false;
        self.dead_timer = 0.0;
        info!("player died: {} ({} lives)", self.dead_text, self.lives);
    }

    /// Nothing of the ship is drawn while it is dead.
    pub fn draw(&self, renderer: &mut dyn Renderer) {
        if !self.alive {
            return;
        }
        for projectile in &self.projectiles {
            projectile.draw(renderer);
        }

        let mut shield = self.grace_shield.clone();
        shield.tint = Color::WHITE.scaled(fade_alpha(self.grace_timer / GRACE_SHIELD_TIME));
        shield.draw(renderer);

        self.booster.draw(renderer);
        self.sprite.draw(renderer);
    }
}

fn booster_position(ship: &Sprite) -> Vec2 {
    Vec2::new(ship.position.x, ship.position.y + ship.height() as f32 - 60.0)
}
