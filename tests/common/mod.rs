#![allow(dead_code)]

use std::collections::VecDeque;

use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use halcyon::assets::AssetCatalog;
use halcyon::enemy::{Enemy, EnemyTable, EnemyType};
use halcyon::entities::{Color, Rect, Vec2};
use halcyon::game::GameSession;
use halcyon::highscore::Highscores;
use halcyon::platform::{
    AssetStore, FontHandle, InputFrame, InputSource, Key, Renderer, SoundHandle, SpriteDraw, TextureHandle,
    Viewport,
};
use halcyon::screen::{ScreenStack, Services};
use halcyon::settings::Settings;

pub const DT: f32 = 1.0 / 30.0;

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

pub fn catalog() -> AssetCatalog {
    AssetCatalog::builtin().unwrap()
}

pub fn enemy_table() -> EnemyTable {
    EnemyTable::builtin().unwrap()
}

pub fn session() -> GameSession {
    let mut assets = catalog();
    GameSession::new(&mut assets, Viewport::PORTRAIT, enemy_table(), seeded_rng()).unwrap()
}

pub fn services_with(highscores: Highscores) -> Services {
    Services::new(
        Box::new(catalog()),
        Viewport::PORTRAIT,
        Settings::default(),
        highscores,
        enemy_table(),
        seeded_rng(),
    )
}

pub fn services() -> Services {
    services_with(Highscores::in_memory(None))
}

pub fn stack() -> ScreenStack {
    ScreenStack::new(services())
}

pub fn enemy_at(health: f32, experience: f32, position: Vec2) -> Enemy {
    let kind = EnemyType {
        health,
        experience,
        texture: "1".to_string(),
    };
    let mut enemy = Enemy::new(
        &kind,
        TextureHandle {
            id: 0,
            width: 80,
            height: 80,
        },
    );
    enemy.sprite.position = position;
    enemy
}

// ── Fakes ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Sprite(SpriteDraw),
    Text { text: String, position: Vec2, color: Color },
    Fill { rect: Rect, color: Color },
    Translation(Vec2),
}

#[derive(Default)]
pub struct RecordingRenderer {
    pub calls: Vec<DrawCall>,
    pub frames: usize,
}

impl RecordingRenderer {
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn sprite_count(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, DrawCall::Sprite(_))).count()
    }
}

impl Renderer for RecordingRenderer {
    fn begin_frame(&mut self) {
        self.calls.clear();
    }

    fn set_translation(&mut self, offset: Vec2) {
        self.calls.push(DrawCall::Translation(offset));
    }

    fn draw_sprite(&mut self, draw: &SpriteDraw) {
        self.calls.push(DrawCall::Sprite(*draw));
    }

    fn draw_text(&mut self, _font: FontHandle, text: &str, position: Vec2, color: Color, _scale: f32) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            position,
            color,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.calls.push(DrawCall::Fill { rect, color });
    }

    fn end_frame(&mut self) -> Result<()> {
        self.frames += 1;
        Ok(())
    }
}

/// Plays back queued frames, then empty ones.
#[derive(Default)]
pub struct ScriptedInput {
    frames: VecDeque<InputFrame>,
    pub polls: usize,
}

impl ScriptedInput {
    pub fn push(&mut self, frame: InputFrame) {
        self.frames.push_back(frame);
    }

    pub fn press(&mut self, key: Key) {
        self.push(InputFrame {
            pressed: vec![key],
            ..InputFrame::default()
        });
    }
}

impl InputSource for ScriptedInput {
    fn poll_once(&mut self) -> InputFrame {
        self.polls += 1;
        self.frames.pop_front().unwrap_or_default()
    }
}

/// Knows no assets at all.
pub struct EmptyAssets;

impl AssetStore for EmptyAssets {
    fn load_texture(&mut self, name: &str) -> Result<TextureHandle> {
        bail!("no texture {name}")
    }

    fn load_font(&mut self, name: &str) -> Result<FontHandle> {
        bail!("no font {name}")
    }

    fn load_sound(&mut self, name: &str) -> Result<SoundHandle> {
        bail!("no sound {name}")
    }
}

/// Run `ticks` stack updates with no input.
pub fn tick(stack: &mut ScreenStack, input: &mut ScriptedInput, ticks: usize) {
    for _ in 0..ticks {
        stack.update(DT, input).unwrap();
    }
}
