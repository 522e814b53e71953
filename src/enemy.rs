//! Enemies and the spawner that feeds them into the playfield.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::collection::RemovalList;
use crate::entities::{Sprite, Vec2};
use crate::platform::{AssetStore, Renderer, TextureHandle, Viewport};

// ── Tuning ────────────────────────────────────────────────────────────────────

pub const INITIAL_SPAWN_TIME_MS: i32 = 700;
pub const INITIAL_MAX_ACTIVE: usize = 8;
pub const INITIAL_ENEMY_SPEED: f32 = 6.0;
/// The ramp never pushes the spawn interval below this.
pub const SPAWN_TIME_FLOOR_MS: i32 = 100;
pub const ENEMY_SCALE: f32 = 0.9;
/// Horizontal speed of the enemies that weave.
pub const WEAVE_SPEED: f32 = 10.0;
/// Percent of spawns that weave.
pub const WEAVE_CHANCE: u32 = 20;
/// Top of the playfield, below the HUD strip.
pub const PLAYFIELD_TOP: f32 = 80.0;

/// Seconds between difficulty steps.
pub const RAMP_INTERVAL: f32 = 10.0;
/// Score at which the difficulty stops ramping.
pub const RAMP_SCORE_CAP: f32 = 30000.0;
pub const RAMP_SPEED_STEP: f32 = 0.1;
pub const RAMP_SPAWN_STEP_MS: i32 = 25;

const BUILTIN_TABLE: &str = include_str!("../assets/enemies.json");

// ── Enemy table ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyType {
    pub health: f32,
    #[serde(rename = "exp")]
    pub experience: f32,
    /// Suffix of the `enemy/<texture>` asset.
    pub texture: String,
}

/// Static list of enemy archetypes, loaded once.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyTable {
    types: Vec<EnemyType>,
}

impl EnemyTable {
    pub fn from_json(text: &str) -> Result<Self> {
        let types: Vec<EnemyType> = serde_json::from_str(text).context("malformed enemy table")?;
        if types.is_empty() {
            bail!("enemy table has no entries");
        }
        Ok(Self { types })
    }

    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_TABLE)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading enemy table {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("loading enemy table {}", path.display()))
    }

    pub fn types(&self) -> &[EnemyType] {
        &self.types
    }

    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &EnemyType {
        &self.types[rng.gen_range(0..self.types.len())]
    }

    pub fn experience_for(&self, texture: &str) -> Option<f32> {
        self.types.iter().find(|t| t.texture == texture).map(|t| t.experience)
    }
}

pub fn texture_asset(texture: &str) -> String {
    format!("enemy/{texture}")
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub sprite: Sprite,
    pub health: f32,
    pub experience: f32,
    pub texture: String,
}

impl Enemy {
    pub fn new(kind: &EnemyType, handle: TextureHandle) -> Self {
        let mut sprite = Sprite::new(handle);
        sprite.scale = ENEMY_SCALE;
        Self {
            sprite,
            health: kind.health,
            experience: kind.experience,
            texture: kind.texture.clone(),
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

// ── Spawner ───────────────────────────────────────────────────────────────────

/// Owns the live enemies, the spawn cadence and the difficulty ramp.
///
/// Removals are only queued here. The gameplay session applies them once per
/// tick after collisions, so `active_count` can run ahead of `enemies().len()`
/// inside a tick.
#[derive(Clone, Debug)]
pub struct EnemySpawner {
    pub spawn_time_ms: i32,
    pub max_active: usize,
    pub enemy_speed: f32,
    table: EnemyTable,
    textures: HashMap<String, TextureHandle>,
    enemies: RemovalList<Enemy>,
    active: usize,
    elapsed_ms: u32,
    ramp_elapsed: f32,
}

impl EnemySpawner {
    pub fn new(table: EnemyTable) -> Self {
        Self {
            spawn_time_ms: INITIAL_SPAWN_TIME_MS,
            max_active: INITIAL_MAX_ACTIVE,
            enemy_speed: INITIAL_ENEMY_SPEED,
            table,
            textures: HashMap::new(),
            enemies: RemovalList::new(),
            active: 0,
            elapsed_ms: 0,
            ramp_elapsed: 0.0,
        }
    }

    /// Resolve every enemy texture up front so spawning never loads.
    pub fn load_content(&mut self, assets: &mut dyn AssetStore) -> Result<()> {
        for kind in self.table.types() {
            let handle = assets.load_texture(&texture_asset(&kind.texture))?;
            self.textures.insert(kind.texture.clone(), handle);
        }
        self.enemies.clear();
        self.active = 0;
        Ok(())
    }

    pub fn table(&self) -> &EnemyTable {
        &self.table
    }

    pub fn enemies(&self) -> &RemovalList<Enemy> {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut RemovalList<Enemy> {
        &mut self.enemies
    }

    pub fn active_count(&self) -> usize {
        self.active
    }

    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    /// `None` for textures the table does not know, or before content is loaded.
    pub fn texture_for(&self, texture: &str) -> Option<TextureHandle> {
        self.textures.get(texture).copied()
    }

    /// Advance the spawn clock and move every enemy one step.
    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, viewport: Viewport, rng: &mut R) {
        self.elapsed_ms += (dt * 1000.0).round() as u32;
        if self.elapsed_ms as i64 >= self.spawn_time_ms as i64 {
            // The clock resets even when the cap blocks the batch.
            self.elapsed_ms = 0;
            if self.active < self.max_active {
                let batch = rng.gen_range(2..=3);
                for _ in 0..batch {
                    self.spawn_one(viewport, rng);
                }
                debug!("spawned {batch} enemies ({} active)", self.active);
            }
        }

        for index in 0..self.enemies.len() {
            let Some(enemy) = self.enemies.get_mut(index) else { continue };
            let sprite = &mut enemy.sprite;
            let margin = sprite.half_extents().x;
            if sprite.position.x < margin || sprite.position.x > viewport.width - margin {
                sprite.velocity.x = -sprite.velocity.x;
            }
            let off_bottom = sprite.position.y > viewport.height + sprite.height() as f32;

            sprite.position += sprite.velocity;

            if off_bottom {
                self.queue_kill(index);
            }
        }
    }

    fn spawn_one<R: Rng + ?Sized>(&mut self, viewport: Viewport, rng: &mut R) {
        let kind = self.table.choose(rng).clone();
        let mut enemy = Enemy::new(&kind, self.texture_for(&kind.texture).unwrap_or_default());
        let width = enemy.sprite.width() as f32;
        let height = enemy.sprite.height() as f32;

        let low = (enemy.sprite.width() / 2) as f32;
        let high = viewport.width - width;
        let x = if high > low { rng.gen_range(low..high) } else { low };
        enemy.sprite.position = Vec2::new(x, PLAYFIELD_TOP - height);

        let vx = if rng.gen_range(0..100) >= 100 - WEAVE_CHANCE {
            WEAVE_SPEED
        } else {
            0.0
        };
        enemy.sprite.velocity = Vec2::new(vx, self.enemy_speed);

        self.insert(enemy);
    }

    /// Add an enemy and count it as active.
    pub fn insert(&mut self, enemy: Enemy) {
        self.enemies.push(enemy);
        self.active += 1;
    }

    /// Queue `index` for removal. The active count only drops the first time.
    pub fn queue_kill(&mut self, index: usize) -> bool {
        let queued = self.enemies.queue_removal(index);
        if queued {
            self.active = self.active.saturating_sub(1);
        }
        queued
    }

    /// Queue every enemy not already queued; returns the newly queued indices.
    pub fn queue_kill_all(&mut self) -> Vec<usize> {
        (0..self.enemies.len()).filter(|&i| self.queue_kill(i)).collect()
    }

    pub fn apply_pending_removals(&mut self) -> usize {
        self.enemies.apply_pending_removals()
    }

    /// Every ten seconds below the score cap: faster enemies, shorter spawn
    /// interval. The clock keeps running past the cap without stepping.
    pub fn ramp_difficulty(&mut self, dt: f32, score: f32) {
        self.ramp_elapsed += dt;
        if self.ramp_elapsed > RAMP_INTERVAL && score < RAMP_SCORE_CAP {
            self.enemy_speed += RAMP_SPEED_STEP;
            self.spawn_time_ms = (self.spawn_time_ms - RAMP_SPAWN_STEP_MS).max(SPAWN_TIME_FLOOR_MS);
            self.ramp_elapsed = 0.0;
            debug!(
                "difficulty up: speed {:.1}, spawn every {} ms",
                self.enemy_speed, self.spawn_time_ms
            );
        }
    }

    pub fn clear(&mut self) {
        self.enemies.clear();
        self.active = 0;
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        for enemy in &self.enemies {
            enemy.sprite.draw(renderer);
        }
    }
}
