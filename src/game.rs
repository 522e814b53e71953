//! The gameplay session: everything that lives while a game is in progress.
//!
//! [`GameSession::update`] runs one simulation tick. The order of the steps
//! matters (score first, removals last) and is spelled out inline.

use anyhow::Result;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::enemy::{Enemy, EnemySpawner, EnemyTable};
use crate::entities::{fade_alpha, update_and_prune, Animation, Color, Sprite, StripSpec, Vec2};
use crate::platform::{
    AssetStore, FontHandle, GestureKind, InputFrame, Key, Renderer, SoundHandle, TextureHandle, Viewport,
};
use crate::player::{Player, PlayerEvent};
use crate::powerup::{PowerUp, PowerUpKind};
use crate::weapon::{Impact, WeaponKind};

// ── Tuning ────────────────────────────────────────────────────────────────────

pub const SCORE_PER_TICK: f32 = 3.0;
pub const STARTING_BOMBS: i32 = 1;
pub const MAX_LIVES_OFFERED: i32 = 5;
pub const MAX_BOMBS_OFFERED: i32 = 2;
/// Seconds; a fresh power-up window length is drawn from this range.
pub const POWER_WINDOW: (f32, f32) = (10.0, 20.0);
pub const SHAKE_TIME: f32 = 1.5;
pub const LEVEL_UP_TIME: f32 = 1.5;
/// Seconds a floating combat text stays up.
pub const FLOATING_TEXT_LIFETIME: f32 = 1.0;
/// Units per tick a floating text drifts upward.
pub const FLOATING_TEXT_RISE: f32 = 1.0;
/// Width the HUD assumes per character when right-aligning text.
const HUD_CHAR_WIDTH: f32 = 12.0;

/// Score windows that grant a weapon. The bonus pushes the score past the
/// window, so each applies for a single tick at the normal scoring rate.
pub const UPGRADES: [(f32, f32, f32, WeaponKind); 3] = [
    (4200.0, 4500.0, 300.0, WeaponKind::DoubleLaser),
    (12000.0, 12600.0, 600.0, WeaponKind::TripleLaser),
    (25000.0, 25900.0, 900.0, WeaponKind::Plasma),
];

const EXPLOSION_SPEC: StripSpec = StripSpec {
    frame_width: 128,
    frame_height: 128,
    frame_count: 16,
    frame_time_ms: 32,
    scale: 1.0,
    looping: false,
};

const PLAYER_EXPLOSION_SPEC: StripSpec = StripSpec {
    frame_time_ms: 45,
    scale: 1.5,
    ..EXPLOSION_SPEC
};

const IMPACT_SPEC: StripSpec = StripSpec {
    frame_width: 64,
    frame_height: 64,
    frame_count: 16,
    frame_time_ms: 20,
    scale: 1.0,
    looping: false,
};

const BOMB_SPEC: StripSpec = StripSpec {
    frame_time_ms: 30,
    ..EXPLOSION_SPEC
};

// ── Events and cues ───────────────────────────────────────────────────────────

/// Something the screen hosting the session has to act on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    PauseRequested,
    /// The final death finished playing out; the session is now paused.
    OutOfLives,
}

/// Feedback for the host: sounds to play and vibration requests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cue {
    Sound(SoundHandle),
    Vibrate { seconds: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct FloatingText {
    pub position: Vec2,
    pub text: String,
    pub age: f32,
}

impl FloatingText {
    pub fn alpha(&self) -> f32 {
        fade_alpha(self.age / FLOATING_TEXT_LIFETIME)
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedEnemy {
    pub health: f32,
    pub texture: String,
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Everything needed to rebuild a session mid-game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub score: f32,
    pub lives: i32,
    pub bombs: i32,
    pub enemy_spawn_time: i32,
    pub enemy_speed: f32,
    pub player_position: Vec2,
    pub enemies: Vec<SavedEnemy>,
}

/// Which power-up a roll in `[1, 400)` offers. The life and bomb checks are
/// an if / else-if pair, so a roll never offers both.
pub fn power_roll_outcome(roll: u32, lives: i32, bombs: i32) -> Option<PowerUpKind> {
    if roll > 50 && roll < 130 {
        return Some(PowerUpKind::Shield);
    }
    if roll > 130 && roll < 180 && lives < MAX_LIVES_OFFERED {
        Some(PowerUpKind::ExtraLife)
    } else if roll > 200 && roll < 350 && bombs < MAX_BOMBS_OFFERED {
        Some(PowerUpKind::Bomb)
    } else {
        None
    }
}

/// The upgrade window `score` currently sits in, if any.
pub fn upgrade_for(score: f32) -> Option<(f32, WeaponKind)> {
    UPGRADES.iter().enumerate().find_map(|(i, &(low, high, bonus, kind))| {
        // The last window includes its upper edge.
        let inside = if i == UPGRADES.len() - 1 {
            score >= low && score <= high
        } else {
            score >= low && score < high
        };
        inside.then_some((bonus, kind))
    })
}

// ── Session ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct SessionAssets {
    explosions: [TextureHandle; 4],
    player_explosion: TextureHandle,
    impact: TextureHandle,
    bomb_activated: TextureHandle,
    heart: TextureHandle,
    nuke: TextureHandle,
    hud_font: FontHandle,
    player_death: SoundHandle,
    game_over: SoundHandle,
    back: SoundHandle,
    bomb_sound: SoundHandle,
}

impl SessionAssets {
    fn load(assets: &mut dyn AssetStore) -> Result<Self> {
        Ok(Self {
            explosions: [
                assets.load_texture("animations/explosion-1")?,
                assets.load_texture("animations/explosion-2")?,
                assets.load_texture("animations/explosion-3")?,
                assets.load_texture("animations/explosion-4")?,
            ],
            player_explosion: assets.load_texture("animations/player-explosion")?,
            impact: assets.load_texture("animations/impact")?,
            bomb_activated: assets.load_texture("player/bomb-activated")?,
            heart: assets.load_texture("player/heart")?,
            nuke: assets.load_texture("player/nuke")?,
            hud_font: assets.load_font("font/hud")?,
            player_death: assets.load_sound("sound/player-death")?,
            game_over: assets.load_sound("sound/game-over")?,
            back: assets.load_sound("sound/back")?,
            bomb_sound: assets.load_sound("sound/bomb-activated")?,
        })
    }
}

#[derive(Clone, Debug)]
pub struct GameSession {
    viewport: Viewport,
    rng: StdRng,
    assets: SessionAssets,
    player: Player,
    spawner: EnemySpawner,
    shield: PowerUp,
    life: PowerUp,
    bomb: PowerUp,
    score: f32,
    bomb_count: i32,
    paused: bool,
    shake: bool,
    shake_timer: f32,
    shake_offset: Vec2,
    level_up: Option<WeaponKind>,
    level_up_timer: f32,
    power_timer: f32,
    next_power_at: f32,
    explosions: Vec<Animation>,
    impacts: Vec<Animation>,
    bomb_visual: Animation,
    floating_texts: Vec<FloatingText>,
    cues: Vec<Cue>,
}

impl GameSession {
    pub fn new(
        assets: &mut dyn AssetStore,
        viewport: Viewport,
        table: EnemyTable,
        mut rng: StdRng,
    ) -> Result<Self> {
        let mut spawner = EnemySpawner::new(table);
        spawner.load_content(assets)?;
        let next_power_at = rng.gen_range(POWER_WINDOW.0..POWER_WINDOW.1);

        Ok(Self {
            viewport,
            assets: SessionAssets::load(assets)?,
            player: Player::load(assets, viewport)?,
            spawner,
            shield: PowerUp::load(PowerUpKind::Shield, assets)?,
            life: PowerUp::load(PowerUpKind::ExtraLife, assets)?,
            bomb: PowerUp::load(PowerUpKind::Bomb, assets)?,
            rng,
            score: 0.0,
            bomb_count: STARTING_BOMBS,
            paused: false,
            shake: false,
            shake_timer: 0.0,
            shake_offset: Vec2::ZERO,
            level_up: None,
            level_up_timer: 0.0,
            power_timer: 0.0,
            next_power_at,
            explosions: Vec::new(),
            impacts: Vec::new(),
            bomb_visual: Animation::default(),
            floating_texts: Vec::new(),
            cues: Vec::new(),
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn set_score(&mut self, score: f32) {
        self.score = score;
    }

    pub fn bomb_count(&self) -> i32 {
        self.bomb_count
    }

    pub fn set_bomb_count(&mut self, bombs: i32) {
        self.bomb_count = bombs;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        if paused != self.paused {
            debug!("session {}", if paused { "paused" } else { "resumed" });
        }
        self.paused = paused;
    }

    pub fn is_shaking(&self) -> bool {
        self.shake
    }

    pub fn level_up(&self) -> Option<WeaponKind> {
        self.level_up
    }

    pub fn shield_active(&self) -> bool {
        self.shield.effect_active()
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn spawner(&self) -> &EnemySpawner {
        &self.spawner
    }

    pub fn spawner_mut(&mut self) -> &mut EnemySpawner {
        &mut self.spawner
    }

    pub fn power_up(&self, kind: PowerUpKind) -> &PowerUp {
        match kind {
            PowerUpKind::Shield => &self.shield,
            PowerUpKind::ExtraLife => &self.life,
            PowerUpKind::Bomb => &self.bomb,
        }
    }

    pub fn power_up_mut(&mut self, kind: PowerUpKind) -> &mut PowerUp {
        match kind {
            PowerUpKind::Shield => &mut self.shield,
            PowerUpKind::ExtraLife => &mut self.life,
            PowerUpKind::Bomb => &mut self.bomb,
        }
    }

    pub fn explosions(&self) -> &[Animation] {
        &self.explosions
    }

    pub fn impacts(&self) -> &[Animation] {
        &self.impacts
    }

    pub fn floating_texts(&self) -> &[FloatingText] {
        &self.floating_texts
    }

    pub fn take_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    pub fn handle_input(&mut self, input: &InputFrame) -> Option<SessionEvent> {
        if self.paused {
            return None;
        }

        if input.is_new_press(Key::Back) {
            self.paused = true;
            self.cues.push(Cue::Sound(self.assets.back));
            info!("pause requested at score {}", self.score as u64);
            return Some(SessionEvent::PauseRequested);
        }

        let double_tapped = input.gestures_of(GestureKind::DoubleTap).next().is_some();
        if double_tapped && self.bomb_count > 0 && self.player.is_alive() {
            self.detonate_bomb();
        }

        self.player.handle_input(input);
        None
    }

    /// Spend a bomb charge: every enemy on screen dies and pays out.
    pub fn detonate_bomb(&mut self) {
        self.bomb_count -= 1;
        self.bomb_visual = Animation::start(
            self.assets.bomb_activated,
            self.player.position(),
            BOMB_SPEC,
            Color::WHITE,
        );
        self.start_shake();
        self.cues.push(Cue::Sound(self.assets.bomb_sound));

        let killed = self.spawner.queue_kill_all();
        info!("bomb detonated, {} enemies destroyed", killed.len());
        for index in killed {
            self.on_enemy_killed(index, true);
        }
    }

    // ── Tick ──────────────────────────────────────────────────────────────────

    pub fn update(&mut self, dt: f32) -> Option<SessionEvent> {
        if self.paused {
            return None;
        }

        // ── 1. Score ──────────────────────────────────────────────────────────
        self.score += SCORE_PER_TICK;

        // ── 2. Power-up roll ──────────────────────────────────────────────────
        self.power_timer += dt;
        if self.power_timer > self.next_power_at {
            let roll = self.rng.gen_range(1..400);
            if let Some(kind) = power_roll_outcome(roll, self.player.lives(), self.bomb_count) {
                let position = kind.spawn_position(self.viewport, &mut self.rng);
                self.power_up_mut(kind).create_power(position);
            }
            self.power_timer = 0.0;
            self.next_power_at = self.rng.gen_range(POWER_WINDOW.0..POWER_WINDOW.1);
        }

        // ── 3. Power-ups ──────────────────────────────────────────────────────
        self.update_power_ups(dt);

        // ── 4. Difficulty ramp ────────────────────────────────────────────────
        self.spawner.ramp_difficulty(dt, self.score);

        // ── 5. Weapon upgrades ────────────────────────────────────────────────
        if let Some((bonus, kind)) = upgrade_for(self.score) {
            self.score += bonus;
            self.player.set_weapon(kind);
            self.level_up = Some(kind);
            self.level_up_timer = 0.0;
            info!("weapon upgraded to {:?} (+{bonus} bonus)", kind);
        }
        if self.level_up.is_some() {
            self.level_up_timer += dt;
            if self.level_up_timer > LEVEL_UP_TIME {
                self.level_up = None;
                self.level_up_timer = 0.0;
            }
        }

        // ── 6. Entities and effects ───────────────────────────────────────────
        let player_event = self.player.update(dt);
        self.spawner.update(dt, self.viewport, &mut self.rng);
        update_and_prune(&mut self.explosions, dt);
        update_and_prune(&mut self.impacts, dt);
        self.bomb_visual.update(dt);
        self.update_floating_texts(dt);

        if self.shake {
            self.shake_timer += dt;
            if self.shake_timer > SHAKE_TIME {
                self.shake = false;
                self.shake_timer = 0.0;
            }
        }
        self.shake_offset = if self.shake {
            Vec2::new(self.rng.gen_range(-1.0..9.0), self.rng.gen_range(-1.0..9.0))
        } else {
            Vec2::ZERO
        };

        // ── 7. Player against enemies ─────────────────────────────────────────
        self.resolve_player_collisions();

        // ── 8. Projectiles against enemies ────────────────────────────────────
        self.resolve_projectile_hits();

        // ── 9. Removal barrier ────────────────────────────────────────────────
        self.apply_removals();

        match player_event {
            Some(PlayerEvent::OutOfLives) => {
                self.paused = true;
                self.cues.push(Cue::Sound(self.assets.game_over));
                info!("game over with score {}", self.score as u64);
                Some(SessionEvent::OutOfLives)
            }
            _ => None,
        }
    }

    fn update_power_ups(&mut self, dt: f32) {
        let ship = self.player.sprite.clone();

        if self.shield.update(dt, &ship, self.viewport) > 0 {
            self.cues.push(Cue::Sound(self.shield.sound()));
        }

        // Caps are only checked when a pickup is offered, so one already
        // falling can still push past them.
        let lives = self.life.update(dt, &ship, self.viewport);
        if lives > 0 {
            self.player.add_lives(lives as i32);
            self.cues.push(Cue::Sound(self.life.sound()));
        }

        let bombs = self.bomb.update(dt, &ship, self.viewport);
        if bombs > 0 {
            self.bomb_count += bombs as i32;
            self.cues.push(Cue::Sound(self.bomb.sound()));
        }
    }

    fn update_floating_texts(&mut self, dt: f32) {
        for text in self.floating_texts.iter_mut() {
            text.age += dt;
            text.position.y -= FLOATING_TEXT_RISE;
        }
        self.floating_texts.retain(|t| t.age <= FLOATING_TEXT_LIFETIME);
    }

    /// A shielded ship destroys what it touches; an unshielded one dies and
    /// takes every enemy with it.
    pub fn resolve_player_collisions(&mut self) {
        if !self.player.is_alive() {
            return;
        }
        let shielded = self.shield.effect_active() || self.player.grace_shield_active();

        for index in 0..self.spawner.enemies().len() {
            if self.spawner.enemies().is_pending(index) {
                continue;
            }
            let touching = self.spawner.enemies()[index].sprite.collides(&self.player.sprite);
            if !touching {
                continue;
            }
            if shielded {
                if self.spawner.queue_kill(index) {
                    self.on_enemy_killed(index, true);
                }
            } else {
                self.kill_player();
                break;
            }
        }
    }

    fn kill_player(&mut self) {
        self.player.kill();
        let position = self.player.position();
        self.explosions.push(Animation::start(
            self.assets.player_explosion,
            position,
            PLAYER_EXPLOSION_SPEC,
            Color::WHITE,
        ));
        self.bomb_count = 0;
        self.start_shake();
        self.cues.push(Cue::Sound(self.assets.player_death));

        // No experience for enemies cleared by a death.
        for index in self.spawner.queue_kill_all() {
            self.on_enemy_killed(index, false);
        }
    }

    /// Each projectile hits at most one enemy; an enemy stops taking hits the
    /// moment it dies.
    pub fn resolve_projectile_hits(&mut self) {
        for e in 0..self.spawner.enemies().len() {
            if self.spawner.enemies().is_pending(e) {
                continue;
            }
            for p in 0..self.player.projectiles().len() {
                if self.player.projectiles().is_pending(p) {
                    continue;
                }
                let projectile = &self.player.projectiles()[p];
                if !projectile.sprite.collides(&self.spawner.enemies()[e].sprite) {
                    continue;
                }
                let damage = projectile.damage;
                let impact = projectile.on_hit();
                self.player.projectiles_mut().queue_removal(p);
                self.add_impacts(impact);

                let dead = match self.spawner.enemies_mut().get_mut(e) {
                    Some(enemy) => {
                        enemy.health -= damage;
                        enemy.is_dead()
                    }
                    None => false,
                };
                if dead {
                    if self.spawner.queue_kill(e) {
                        self.on_enemy_killed(e, true);
                    }
                    break;
                }
            }
        }
    }

    pub fn apply_removals(&mut self) {
        self.spawner.apply_pending_removals();
        self.player.projectiles_mut().apply_pending_removals();
    }

    /// Explosion, and optionally score plus floating text, for an enemy that
    /// was just queued for removal.
    fn on_enemy_killed(&mut self, index: usize, award: bool) {
        let Some(enemy) = self.spawner.enemies().get(index) else { return };
        let position = enemy.sprite.position;
        let experience = enemy.experience;

        let texture = self.assets.explosions[self.rng.gen_range(0..self.assets.explosions.len())];
        self.explosions.push(Animation::start(texture, position, EXPLOSION_SPEC, Color::WHITE));

        if award {
            self.score += experience;
            self.floating_texts.push(FloatingText {
                position,
                text: format!("{experience}"),
                age: 0.0,
            });
        }
    }

    fn add_impacts(&mut self, impact: Impact) {
        for _ in 0..impact.count {
            self.impacts.push(Animation::start(
                self.assets.impact,
                impact.position,
                IMPACT_SPEC,
                impact.tint,
            ));
        }
    }

    fn start_shake(&mut self) {
        self.shake = true;
        self.shake_timer = 0.0;
        self.cues.push(Cue::Vibrate { seconds: 1.0 });
    }

    // ── Snapshot ──────────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            score: self.score,
            lives: self.player.lives(),
            bombs: self.bomb_count,
            enemy_spawn_time: self.spawner.spawn_time_ms,
            enemy_speed: self.spawner.enemy_speed,
            player_position: self.player.position(),
            enemies: self
                .spawner
                .enemies()
                .live()
                .map(|(_, e)| SavedEnemy {
                    health: e.health,
                    texture: e.texture.clone(),
                    position: e.sprite.position,
                    velocity: e.sprite.velocity,
                })
                .collect(),
        }
    }

    /// Rebuild mid-game state. The weapon follows from the score.
    pub fn apply_snapshot(&mut self, snapshot: &GameSnapshot) {
        self.score = snapshot.score;
        self.bomb_count = snapshot.bombs;
        self.player.set_lives(snapshot.lives);
        self.player.set_position(snapshot.player_position);
        self.player.set_weapon(WeaponKind::for_score(snapshot.score));
        self.spawner.spawn_time_ms = snapshot.enemy_spawn_time;
        self.spawner.enemy_speed = snapshot.enemy_speed;

        self.spawner.clear();
        for saved in &snapshot.enemies {
            let (Some(experience), Some(texture)) = (
                self.spawner.table().experience_for(&saved.texture),
                self.spawner.texture_for(&saved.texture),
            ) else {
                warn!("dropping saved enemy with unknown texture '{}'", saved.texture);
                continue;
            };
            let mut sprite = Sprite::new(texture);
            sprite.scale = crate::enemy::ENEMY_SCALE;
            sprite.position = saved.position;
            sprite.velocity = saved.velocity;
            self.spawner.insert(Enemy {
                sprite,
                health: saved.health,
                experience,
                texture: saved.texture.clone(),
            });
        }
        info!(
            "session restored: score {}, {} lives, {} enemies",
            snapshot.score as u64,
            snapshot.lives,
            self.spawner.enemies().len()
        );
    }

    // ── Draw ──────────────────────────────────────────────────────────────────

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        let offset = if self.shake && !self.paused {
            self.shake_offset
        } else {
            Vec2::ZERO
        };
        renderer.set_translation(offset);

        self.shield.draw(renderer, self.player.is_alive());
        self.life.draw(renderer, self.player.is_alive());
        self.bomb.draw(renderer, self.player.is_alive());
        self.bomb_visual.draw(renderer);

        self.player.draw(renderer);
        self.spawner.draw(renderer);

        self.draw_hud(renderer);

        for impact in &self.impacts {
            impact.draw(renderer);
        }
        for explosion in &self.explosions {
            explosion.draw(renderer);
        }
        for text in &self.floating_texts {
            let position = text.position - Vec2::new(15.0, 60.0);
            renderer.draw_text(
                self.assets.hud_font,
                &text.text,
                position,
                Color::HUD.scaled(text.alpha()),
                1.0,
            );
        }

        if let Some(kind) = self.level_up {
            let banner = format!("Weapon Upgrade: {}", kind.label());
            let x = self.viewport.width / 2.0 - banner.len() as f32 * HUD_CHAR_WIDTH / 2.0;
            let alpha = fade_alpha(self.level_up_timer / LEVEL_UP_TIME);
            renderer.draw_text(
                self.assets.hud_font,
                &banner,
                Vec2::new(x, self.viewport.height / 3.0),
                Color::YELLOW_GREEN.scaled(alpha),
                1.0,
            );
        }

        if !self.player.is_alive() {
            let text = self.player.dead_text();
            let x = self.viewport.width / 2.0 - text.len() as f32 * HUD_CHAR_WIDTH;
            renderer.draw_text(
                self.assets.hud_font,
                text,
                Vec2::new(x, self.viewport.height / 2.0),
                Color::RED,
                2.0,
            );
        }

        if self.paused {
            renderer.fill_rect(self.viewport.bounds(), Color::BLACK.scaled(0.65));
        }
        renderer.set_translation(Vec2::ZERO);
    }

    fn draw_hud(&self, renderer: &mut dyn Renderer) {
        let mut heart = Sprite::new(self.assets.heart);
        heart.tint = Color::HUD;
        let row_y = self.viewport.height - heart.height() as f32 / 2.0 - 5.0;
        for i in 0..self.player.lives().max(0) {
            let x = heart.width() as f32 * (i as f32 + 0.5);
            heart.draw_at(renderer, Vec2::new(x, row_y));
        }

        let mut nuke = Sprite::new(self.assets.nuke);
        nuke.tint = Color::HUD;
        let start = self.viewport.width / 2.0 - 35.0;
        for i in 0..self.bomb_count.max(0) {
            let x = start + nuke.width() as f32 * (i as f32 + 0.5);
            nuke.draw_at(renderer, Vec2::new(x, row_y));
        }

        let score = format!("{}", self.score as u64);
        let x = self.viewport.width - score.len() as f32 * HUD_CHAR_WIDTH - 10.0;
        renderer.draw_text(
            self.assets.hud_font,
            &score,
            Vec2::new(x, self.viewport.height - 30.0),
            Color::HUD,
            1.0,
        );
    }
}
