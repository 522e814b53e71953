//! The concrete screens: background starfield, menus, gameplay, popups and
//! the loading screen that swaps whole contexts.

use anyhow::Result;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::entities::{Color, Rect, Sprite, Vec2};
use crate::game::{Cue, GameSession, GameSnapshot, SessionEvent};
use crate::platform::{FontHandle, GestureKind, InputFrame, Key, Renderer, SoundHandle, Viewport};
use crate::screen::{Command, ScreenState, Services, StackView, Transition};
use crate::settings::{SettingValue, Settings};

/// Serializable name of a screen kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScreenTag {
    Background,
    MainMenu,
    Scores,
    Options,
    Game,
    Paused,
    GameOver,
    NewHighScore,
    Loading,
}

// ── Menus ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Play,
    Scores,
    Options,
    /// Flip or step the named setting, then write the settings file.
    ChangeSetting(&'static str),
    Back,
    Quit,
    Resume,
    Restart,
    MainMenu,
    PlayAgain,
    SaveScore,
    Skip,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MenuEntry {
    pub label: String,
    pub action: MenuAction,
}

impl MenuEntry {
    pub fn new(label: impl Into<String>, action: MenuAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

const ENTRY_SPACING: f32 = 70.0;
const MENU_CHAR_WIDTH: f32 = 16.0;

/// A vertical list of entries. Up/Down move the selection, Select or a tap
/// on an entry picks it, Back picks the cancel action if there is one.
#[derive(Clone, Debug)]
pub struct Menu {
    pub title: &'static str,
    pub lines: Vec<String>,
    pub entries: Vec<MenuEntry>,
    pub selected: usize,
    cancel: Option<MenuAction>,
    font: FontHandle,
    select_sound: SoundHandle,
    back_sound: SoundHandle,
}

impl Menu {
    pub fn new(title: &'static str, entries: &[(&'static str, MenuAction)], cancel: Option<MenuAction>) -> Self {
        Self {
            title,
            lines: Vec::new(),
            entries: entries
                .iter()
                .map(|&(label, action)| MenuEntry::new(label, action))
                .collect(),
            selected: 0,
            cancel,
            font: FontHandle::default(),
            select_sound: SoundHandle::default(),
            back_sound: SoundHandle::default(),
        }
    }

    fn load(&mut self, services: &mut Services) -> Result<()> {
        self.font = services.assets.load_font("font/menu")?;
        self.select_sound = services.assets.load_sound("sound/select")?;
        self.back_sound = services.assets.load_sound("sound/back")?;
        Ok(())
    }

    fn entries_top(&self, viewport: Viewport) -> f32 {
        viewport.height * 0.45 + self.lines.len() as f32 * 40.0
    }

    pub fn entry_bounds(&self, index: usize, viewport: Viewport) -> Rect {
        let y = self.entries_top(viewport) + index as f32 * ENTRY_SPACING;
        Rect::new(0, (y - ENTRY_SPACING / 2.0) as i32, viewport.width as i32, ENTRY_SPACING as i32)
    }

    pub fn handle_input(&mut self, input: &InputFrame, services: &mut Services) -> Option<MenuAction> {
        if self.entries.is_empty() {
            return None;
        }
        let count = self.entries.len();
        if input.is_new_press(Key::Up) {
            self.selected = (self.selected + count - 1) % count;
        }
        if input.is_new_press(Key::Down) {
            self.selected = (self.selected + 1) % count;
        }

        let tapped = input.gestures_of(GestureKind::Tap).find_map(|g| {
            (0..count).find(|&i| self.entry_bounds(i, services.viewport).contains(g.position))
        });
        if let Some(index) = tapped {
            self.selected = index;
        }

        if tapped.is_some() || input.is_new_press(Key::Select) {
            services.emit(Cue::Sound(self.select_sound));
            return Some(self.entries[self.selected].action);
        }
        if input.is_new_press(Key::Back) {
            if let Some(action) = self.cancel {
                services.emit(Cue::Sound(self.back_sound));
                return Some(action);
            }
        }
        None
    }

    fn draw(&self, transition: &Transition, renderer: &mut dyn Renderer, viewport: Viewport) {
        let alpha = transition.alpha();
        // Slide in from the left, out to the right.
        let offset = transition.position.powi(2)
            * if transition.state == ScreenState::TransitionOn { -256.0 } else { 512.0 };
        let centered = |text: &str, scale: f32| {
            viewport.width / 2.0 - text.chars().count() as f32 * MENU_CHAR_WIDTH * scale / 2.0 + offset
        };

        let title_y = viewport.height * 0.25;
        renderer.draw_text(
            self.font,
            self.title,
            Vec2::new(centered(self.title, 1.5), title_y),
            Color::WHITE.scaled(alpha),
            1.5,
        );
        for (i, line) in self.lines.iter().enumerate() {
            renderer.draw_text(
                self.font,
                line,
                Vec2::new(centered(line, 1.0), viewport.height * 0.35 + i as f32 * 40.0),
                Color::HUD.scaled(alpha),
                1.0,
            );
        }
        for (i, entry) in self.entries.iter().enumerate() {
            let color = if i == self.selected { Color::YELLOW_GREEN } else { Color::WHITE };
            let y = self.entries_top(viewport) + i as f32 * ENTRY_SPACING;
            renderer.draw_text(
                self.font,
                &entry.label,
                Vec2::new(centered(&entry.label, 1.0), y),
                color.scaled(alpha),
                1.0,
            );
        }
    }
}

// ── Options ───────────────────────────────────────────────────────────────────

/// Volume after one press: up a tenth, wrapping from full back to silent.
fn next_volume(volume: f32) -> f32 {
    let step = (volume * 10.0).round() as i32 + 1;
    if step > 10 {
        0.0
    } else {
        step as f32 / 10.0
    }
}

fn options_entries(settings: &Settings) -> Vec<MenuEntry> {
    let on_off = |on: bool| if on { "On" } else { "Off" };
    let percent = |volume: f32| (volume * 100.0).round() as u32;
    vec![
        MenuEntry::new(format!("Music: {}", on_off(settings.music)), MenuAction::ChangeSetting("Music")),
        MenuEntry::new(format!("Sound Fx: {}", on_off(settings.sound_fx)), MenuAction::ChangeSetting("SoundFX")),
        MenuEntry::new(format!("Vibrate: {}", on_off(settings.vibrate)), MenuAction::ChangeSetting("Vibrate")),
        MenuEntry::new(
            format!("Music Volume: {}%", percent(settings.music_volume)),
            MenuAction::ChangeSetting("MusicVolume"),
        ),
        MenuEntry::new(
            format!("Sound Fx Volume: {}%", percent(settings.sound_fx_volume)),
            MenuAction::ChangeSetting("SoundFXVolume"),
        ),
        MenuEntry::new("Back", MenuAction::Back),
    ]
}

/// A failed write keeps the new value for this run.
fn change_setting(settings: &mut Settings, name: &str) {
    let next = match settings.get(name) {
        Some(SettingValue::Bool(on)) => SettingValue::Bool(!on),
        Some(SettingValue::Float(volume)) => SettingValue::Float(next_volume(volume)),
        None => {
            warn!("no setting named {name}");
            return;
        }
    };
    if let Err(e) = settings.set(name, next) {
        warn!("could not change {name}: {e:#}");
        return;
    }
    if let Err(e) = settings.save() {
        warn!("could not save settings: {e:#}");
    }
}

// ── Background ────────────────────────────────────────────────────────────────

pub const STAR_COUNT: usize = 150;
pub const STAR_SPEED: f32 = 6.0;

#[derive(Clone, Debug, Default)]
pub struct BackgroundScreen {
    stars: Vec<Sprite>,
}

impl BackgroundScreen {
    fn load(&mut self, services: &mut Services) -> Result<()> {
        let texture = services.assets.load_texture("background/star")?;
        let viewport = services.viewport;
        self.stars = (0..STAR_COUNT)
            .map(|_| {
                let mut star = Sprite::new(texture);
                star.position = Vec2::new(
                    services.rng.gen_range(0.0..viewport.width),
                    services.rng.gen_range(0.0..viewport.height),
                );
                star.velocity = Vec2::new(0.0, STAR_SPEED);
                star
            })
            .collect();
        Ok(())
    }

    fn update(&mut self, services: &mut Services) {
        let viewport = services.viewport;
        for star in self.stars.iter_mut() {
            star.position.y += star.velocity.y;
            if star.position.y > viewport.height {
                star.position = Vec2::new(services.rng.gen_range(0.0..viewport.width), 0.0);
            }
        }
    }
}

// ── Gameplay ──────────────────────────────────────────────────────────────────

/// Hosts a [`GameSession`]. The session only exists while the screen's
/// content is loaded.
#[derive(Clone, Debug, Default)]
pub struct GameScreen {
    session: Option<GameSession>,
    restore: Option<GameSnapshot>,
    start_paused: bool,
}

impl GameScreen {
    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    fn load(&mut self, services: &mut Services) -> Result<()> {
        let rng = StdRng::seed_from_u64(services.rng.gen());
        let mut session = GameSession::new(
            services.assets.as_mut(),
            services.viewport,
            services.enemy_table.clone(),
            rng,
        )?;
        if let Some(snapshot) = self.restore.take() {
            session.apply_snapshot(&snapshot);
        }
        session.set_paused(self.start_paused);
        info!("game session started");
        self.session = Some(session);
        Ok(())
    }

    fn update(&mut self, dt: f32, transition: &Transition, services: &mut Services) -> Vec<Command> {
        let Some(session) = self.session.as_mut() else { return Vec::new() };
        let mut commands = Vec::new();

        if transition.is_active() {
            if let Some(SessionEvent::OutOfLives) = session.update(dt) {
                let score = session.score();
                if services.highscores.qualifies(score) {
                    commands.push(Command::Add(ScreenKind::new_high_score(score, services)));
                } else {
                    commands.push(Command::Add(ScreenKind::game_over(score, services)));
                }
            }
        }
        for cue in session.take_cues() {
            services.emit(cue);
        }
        commands
    }

    fn handle_input(&mut self, input: &InputFrame, services: &mut Services) -> Vec<Command> {
        let Some(session) = self.session.as_mut() else { return Vec::new() };
        let event = session.handle_input(input);
        for cue in session.take_cues() {
            services.emit(cue);
        }
        match event {
            Some(SessionEvent::PauseRequested) => vec![Command::Add(ScreenKind::paused())],
            _ => Vec::new(),
        }
    }
}

// ── Score popups ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct ScoreScreen {
    pub menu: Menu,
    pub score: f32,
}

fn best_line(services: &Services) -> String {
    if !services.highscores.is_reachable() {
        return "Best: --".to_string();
    }
    match services.highscores.best() {
        Some(best) => format!("Best: {best}"),
        None => "Best: none yet".to_string(),
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Waits until every other screen has gone, then swaps itself for the
/// screens it carries.
#[derive(Debug, Default)]
pub struct LoadingScreen {
    pending: Vec<ScreenKind>,
}

impl LoadingScreen {
    pub fn pending(&self) -> &[ScreenKind] {
        &self.pending
    }

    fn update(&mut self, transition: &Transition, view: &StackView) -> Vec<Command> {
        let alone = view.screen_count == 1;
        if transition.state != ScreenState::Active || !alone {
            return Vec::new();
        }
        let mut commands = vec![Command::Remove(view.id)];
        commands.extend(self.pending.drain(..).map(Command::Add));
        commands
    }
}

// ── Screen kinds ──────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ScreenKind {
    Background(BackgroundScreen),
    MainMenu(Menu),
    Scores(Menu),
    Options(Menu),
    Game(GameScreen),
    Paused(Menu),
    GameOver(ScoreScreen),
    NewHighScore(ScoreScreen),
    Loading(LoadingScreen),
}

impl ScreenKind {
    pub fn background() -> Self {
        ScreenKind::Background(BackgroundScreen::default())
    }

    pub fn main_menu() -> Self {
        ScreenKind::MainMenu(Menu::new(
            "HALCYON",
            &[
                ("Play", MenuAction::Play),
                ("Scores", MenuAction::Scores),
                ("Options", MenuAction::Options),
                ("Quit", MenuAction::Quit),
            ],
            Some(MenuAction::Quit),
        ))
    }

    /// The stored best score, or a placeholder when the store is out of reach.
    pub fn scores(services: &Services) -> Self {
        let mut menu = Menu::new("Scores", &[("Back", MenuAction::Back)], Some(MenuAction::Back));
        menu.lines = vec![best_line(services)];
        ScreenKind::Scores(menu)
    }

    pub fn options(settings: &Settings) -> Self {
        let mut menu = Menu::new("Options", &[], Some(MenuAction::Back));
        menu.entries = options_entries(settings);
        ScreenKind::Options(menu)
    }

    pub fn game() -> Self {
        ScreenKind::Game(GameScreen::default())
    }

    /// A game that rebuilds its session from `snapshot` once loaded.
    pub fn restored_game(snapshot: Option<GameSnapshot>, paused: bool) -> Self {
        ScreenKind::Game(GameScreen {
            session: None,
            restore: snapshot,
            start_paused: paused,
        })
    }

    pub fn paused() -> Self {
        ScreenKind::Paused(Menu::new(
            "Paused",
            &[
                ("Resume", MenuAction::Resume),
                ("Restart", MenuAction::Restart),
                ("Main Menu", MenuAction::MainMenu),
            ],
            Some(MenuAction::Resume),
        ))
    }

    pub fn game_over(score: f32, services: &Services) -> Self {
        let mut menu = Menu::new(
            "Game Over",
            &[("Play Again", MenuAction::PlayAgain), ("Main Menu", MenuAction::MainMenu)],
            Some(MenuAction::MainMenu),
        );
        menu.lines = vec![format!("Score: {}", score as u64), best_line(services)];
        ScreenKind::GameOver(ScoreScreen { menu, score })
    }

    pub fn new_high_score(score: f32, services: &Services) -> Self {
        let mut menu = Menu::new(
            "New High Score!",
            &[("Save Score", MenuAction::SaveScore), ("Skip", MenuAction::Skip)],
            Some(MenuAction::Skip),
        );
        menu.lines = vec![format!("Score: {}", score as u64), best_line(services)];
        ScreenKind::NewHighScore(ScoreScreen { menu, score })
    }

    pub fn loading(pending: Vec<ScreenKind>) -> Self {
        ScreenKind::Loading(LoadingScreen { pending })
    }

    pub fn tag(&self) -> ScreenTag {
        match self {
            ScreenKind::Background(_) => ScreenTag::Background,
            ScreenKind::MainMenu(_) => ScreenTag::MainMenu,
            ScreenKind::Scores(_) => ScreenTag::Scores,
            ScreenKind::Options(_) => ScreenTag::Options,
            ScreenKind::Game(_) => ScreenTag::Game,
            ScreenKind::Paused(_) => ScreenTag::Paused,
            ScreenKind::GameOver(_) => ScreenTag::GameOver,
            ScreenKind::NewHighScore(_) => ScreenTag::NewHighScore,
            ScreenKind::Loading(_) => ScreenTag::Loading,
        }
    }

    /// `(time_on, time_off, is_popup)`.
    pub fn transition_times(&self) -> (f32, f32, bool) {
        match self {
            ScreenKind::Game(_) => (1.5, 0.5, false),
            ScreenKind::Paused(_) | ScreenKind::GameOver(_) | ScreenKind::NewHighScore(_) => (0.5, 0.5, true),
            ScreenKind::Background(_)
            | ScreenKind::MainMenu(_)
            | ScreenKind::Scores(_)
            | ScreenKind::Options(_)
            | ScreenKind::Loading(_) => (0.5, 0.5, false),
        }
    }

    /// The starfield keeps running beneath whatever covers it.
    pub fn ignores_cover(&self) -> bool {
        matches!(self, ScreenKind::Background(_))
    }

    pub fn session(&self) -> Option<&GameSession> {
        match self {
            ScreenKind::Game(game) => game.session.as_ref(),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut GameSession> {
        match self {
            ScreenKind::Game(game) => game.session.as_mut(),
            _ => None,
        }
    }

    pub fn menu(&self) -> Option<&Menu> {
        match self {
            ScreenKind::MainMenu(menu)
            | ScreenKind::Scores(menu)
            | ScreenKind::Options(menu)
            | ScreenKind::Paused(menu) => Some(menu),
            ScreenKind::GameOver(s) | ScreenKind::NewHighScore(s) => Some(&s.menu),
            _ => None,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    pub fn load_content(&mut self, services: &mut Services) -> Result<()> {
        match self {
            ScreenKind::Background(bg) => bg.load(services),
            ScreenKind::Game(game) => game.load(services),
            ScreenKind::MainMenu(menu)
            | ScreenKind::Scores(menu)
            | ScreenKind::Options(menu)
            | ScreenKind::Paused(menu) => menu.load(services),
            ScreenKind::GameOver(s) | ScreenKind::NewHighScore(s) => s.menu.load(services),
            ScreenKind::Loading(_) => Ok(()),
        }
    }

    pub fn unload_content(&mut self) {
        match self {
            ScreenKind::Background(bg) => bg.stars.clear(),
            ScreenKind::Game(game) => {
                if game.session.take().is_some() {
                    info!("game session ended");
                }
            }
            _ => {}
        }
    }

    pub fn update(
        &mut self,
        dt: f32,
        transition: &Transition,
        services: &mut Services,
        view: &StackView,
    ) -> Vec<Command> {
        match self {
            ScreenKind::Background(bg) => {
                bg.update(services);
                Vec::new()
            }
            ScreenKind::Game(game) => game.update(dt, transition, services),
            ScreenKind::Loading(loading) => loading.update(transition, view),
            _ => Vec::new(),
        }
    }

    pub fn handle_input(
        &mut self,
        input: &InputFrame,
        _transition: &Transition,
        services: &mut Services,
        _view: &StackView,
    ) -> Vec<Command> {
        let action = match self {
            ScreenKind::Game(game) => return game.handle_input(input, services),
            ScreenKind::MainMenu(menu)
            | ScreenKind::Scores(menu)
            | ScreenKind::Options(menu)
            | ScreenKind::Paused(menu) => menu.handle_input(input, services),
            ScreenKind::GameOver(s) | ScreenKind::NewHighScore(s) => s.menu.handle_input(input, services),
            ScreenKind::Background(_) | ScreenKind::Loading(_) => None,
        };
        match action {
            Some(action) => self.on_menu_action(action, services),
            None => Vec::new(),
        }
    }

    fn on_menu_action(&mut self, action: MenuAction, services: &mut Services) -> Vec<Command> {
        let to_menu = || Command::LoadScreens(vec![ScreenKind::background(), ScreenKind::main_menu()]);
        let new_game = || Command::LoadScreens(vec![ScreenKind::background(), ScreenKind::game()]);

        match action {
            MenuAction::Play | MenuAction::Restart | MenuAction::PlayAgain => vec![new_game()],
            MenuAction::MainMenu => vec![to_menu()],
            MenuAction::Scores => vec![Command::Add(ScreenKind::scores(services))],
            MenuAction::Options => vec![Command::Add(ScreenKind::options(&services.settings))],
            MenuAction::ChangeSetting(name) => {
                change_setting(&mut services.settings, name);
                if let ScreenKind::Options(menu) = self {
                    menu.entries = options_entries(&services.settings);
                }
                Vec::new()
            }
            MenuAction::Back => vec![Command::ExitSelf],
            MenuAction::Quit => vec![Command::Quit],
            MenuAction::Resume => vec![Command::SetGamePaused(false), Command::ExitSelf],
            MenuAction::SaveScore | MenuAction::Skip => {
                let score = match self {
                    ScreenKind::NewHighScore(s) => s.score,
                    _ => 0.0,
                };
                if action == MenuAction::SaveScore {
                    if let Err(e) = services.highscores.submit(score) {
                        warn!("could not save high score: {e:#}");
                    }
                }
                vec![Command::ExitSelf, Command::Add(ScreenKind::game_over(score, services))]
            }
        }
    }

    pub fn draw(&self, transition: &Transition, renderer: &mut dyn Renderer, services: &Services) {
        let viewport = services.viewport;
        match self {
            ScreenKind::Background(bg) => {
                for star in &bg.stars {
                    star.draw(renderer);
                }
            }
            ScreenKind::Game(game) => {
                if let Some(session) = &game.session {
                    session.draw(renderer);
                }
                if transition.position > 0.0 {
                    renderer.fill_rect(viewport.bounds(), Color::BLACK.scaled(transition.position));
                }
            }
            ScreenKind::MainMenu(menu)
            | ScreenKind::Scores(menu)
            | ScreenKind::Options(menu)
            | ScreenKind::Paused(menu) => menu.draw(transition, renderer, viewport),
            ScreenKind::GameOver(s) | ScreenKind::NewHighScore(s) => s.menu.draw(transition, renderer, viewport),
            ScreenKind::Loading(_) => {
                renderer.fill_rect(viewport.bounds(), Color::BLACK.scaled(transition.alpha()));
            }
        }
    }
}
