//! Screen stack: which screens exist, which one has input focus, and how
//! each one transitions on and off.
//!
//! The stack is ordered bottom to top. Each tick it polls input once and
//! walks the screens from the top down; the first screen that is on its way
//! in (or fully in) gets the input, and a non-popup screen marks everything
//! beneath it as covered. Screens never touch the stack directly: they return
//! [`Command`]s which the stack applies right after the call that produced
//! them.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use rand::rngs::StdRng;

use crate::enemy::EnemyTable;
use crate::game::{Cue, GameSession};
use crate::highscore::Highscores;
use crate::platform::{AssetStore, InputSource, Key, Renderer, Viewport};
use crate::screens::ScreenKind;
use crate::settings::Settings;

// ── Transition ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenState {
    TransitionOn,
    Active,
    TransitionOff,
    Hidden,
}

/// Transition bookkeeping shared by every screen kind.
///
/// `position` is 1.0 when fully off and 0.0 when fully on.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub state: ScreenState,
    pub position: f32,
    /// Seconds.
    pub time_on: f32,
    pub time_off: f32,
    pub is_popup: bool,
    pub is_exiting: bool,
    pub other_screen_has_focus: bool,
    pub covered_by_other_screen: bool,
}

impl Transition {
    pub fn new(time_on: f32, time_off: f32, is_popup: bool) -> Self {
        Self {
            state: ScreenState::TransitionOn,
            position: 1.0,
            time_on,
            time_off,
            is_popup,
            is_exiting: false,
            other_screen_has_focus: false,
            covered_by_other_screen: false,
        }
    }

    /// Coming in or fully in, and nothing above holds the focus.
    pub fn is_active(&self) -> bool {
        !self.other_screen_has_focus
            && matches!(self.state, ScreenState::TransitionOn | ScreenState::Active)
    }

    /// 0 when fully off, 1 when fully on.
    pub fn alpha(&self) -> f32 {
        1.0 - self.position
    }

    /// Step the state machine. Returns `true` once an exiting screen has
    /// finished transitioning off and should be removed.
    pub fn update(&mut self, dt: f32, other_screen_has_focus: bool, covered: bool) -> bool {
        self.other_screen_has_focus = other_screen_has_focus;
        self.covered_by_other_screen = covered;

        if self.is_exiting {
            self.state = ScreenState::TransitionOff;
            return !self.step(dt, self.time_off, 1.0);
        }

        if covered {
            self.state = if self.step(dt, self.time_off, 1.0) {
                ScreenState::TransitionOff
            } else {
                ScreenState::Hidden
            };
        } else {
            self.state = if self.step(dt, self.time_on, -1.0) {
                ScreenState::TransitionOn
            } else {
                ScreenState::Active
            };
        }
        false
    }

    /// Move `position` toward the end given by `direction`. Returns `false`
    /// once the end is reached (position clamped there).
    fn step(&mut self, dt: f32, time: f32, direction: f32) -> bool {
        let delta = if time <= 0.0 { 1.0 } else { dt / time };
        self.position += delta * direction;

        let finished = (direction < 0.0 && self.position <= 0.0) || (direction > 0.0 && self.position >= 1.0);
        if finished {
            self.position = self.position.clamp(0.0, 1.0);
        }
        !finished
    }
}

// ── Screens and commands ──────────────────────────────────────────────────────

/// Stable identity of a screen for as long as it is on the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScreenId(pub u64);

#[derive(Debug)]
pub struct Screen {
    pub id: ScreenId,
    pub transition: Transition,
    pub kind: ScreenKind,
}

/// What a screen asks the stack to do.
#[derive(Debug)]
pub enum Command {
    Add(ScreenKind),
    Remove(ScreenId),
    /// Transition the issuing screen off.
    ExitSelf,
    Exit(ScreenId),
    /// Exit every screen, then bring these in once the stack is clear.
    LoadScreens(Vec<ScreenKind>),
    SetGamePaused(bool),
    Quit,
}

/// What a screen may know about the stack it sits in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackView {
    pub id: ScreenId,
    pub screen_count: usize,
}

/// Collaborators shared by every screen.
pub struct Services {
    pub assets: Box<dyn AssetStore>,
    pub viewport: Viewport,
    pub settings: Settings,
    pub highscores: Highscores,
    pub enemy_table: EnemyTable,
    pub rng: StdRng,
    cues: Vec<Cue>,
}

impl Services {
    pub fn new(
        assets: Box<dyn AssetStore>,
        viewport: Viewport,
        settings: Settings,
        highscores: Highscores,
        enemy_table: EnemyTable,
        rng: StdRng,
    ) -> Self {
        Self {
            assets,
            viewport,
            settings,
            highscores,
            enemy_table,
            rng,
            cues: Vec::new(),
        }
    }

    /// Queue feedback for the host, honouring the sound and vibrate settings.
    pub fn emit(&mut self, cue: Cue) {
        let enabled = match cue {
            Cue::Sound(_) => self.settings.sound_fx,
            Cue::Vibrate { .. } => self.settings.vibrate,
        };
        if enabled {
            self.cues.push(cue);
        }
    }

    pub fn take_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }
}

// ── Stack ─────────────────────────────────────────────────────────────────────

pub struct ScreenStack {
    screens: Vec<Screen>,
    /// Screens still to be visited this tick, top last.
    to_update: Vec<ScreenId>,
    services: Services,
    initialized: bool,
    host_focus: bool,
    quit_requested: bool,
    next_id: u64,
}

impl ScreenStack {
    pub fn new(services: Services) -> Self {
        Self {
            screens: Vec::new(),
            to_update: Vec::new(),
            services,
            initialized: false,
            host_focus: true,
            quit_requested: false,
            next_id: 1,
        }
    }

    /// Load content for every screen added so far. Later additions load as
    /// they are added.
    ///
    /// # Panics
    ///
    /// On a second call.
    pub fn initialize(&mut self) -> Result<()> {
        assert!(!self.initialized, "screen stack can only be initialized once");
        self.initialized = true;
        for screen in self.screens.iter_mut() {
            screen
                .kind
                .load_content(&mut self.services)
                .with_context(|| format!("loading {:?} screen", screen.kind.tag()))?;
        }
        info!("screen stack initialized with {} screens", self.screens.len());
        Ok(())
    }

    /// Push a new top screen. If its content fails to load nothing is pushed.
    pub fn add(&mut self, kind: ScreenKind) -> Result<ScreenId> {
        let (time_on, time_off, is_popup) = kind.transition_times();
        let mut screen = Screen {
            id: ScreenId(self.next_id),
            transition: Transition::new(time_on, time_off, is_popup),
            kind,
        };

        if self.initialized {
            screen
                .kind
                .load_content(&mut self.services)
                .with_context(|| format!("loading {:?} screen", screen.kind.tag()))?;
        }
        self.next_id += 1;
        debug!("add {:?} screen #{}", screen.kind.tag(), screen.id.0);
        let id = screen.id;
        self.screens.push(screen);
        Ok(id)
    }

    /// Drop a screen immediately, including from the current update pass.
    pub fn remove(&mut self, id: ScreenId) {
        let Some(index) = self.index_of(id) else { return };
        let mut screen = self.screens.remove(index);
        if self.initialized {
            screen.kind.unload_content();
        }
        self.to_update.retain(|&queued| queued != id);
        debug!("removed {:?} screen #{}", screen.kind.tag(), id.0);
    }

    /// Remove right away when there is no off transition, otherwise start it.
    pub fn exit(&mut self, id: ScreenId) {
        let Some(index) = self.index_of(id) else { return };
        if self.screens[index].transition.time_off <= 0.0 {
            self.remove(id);
        } else {
            self.screens[index].transition.is_exiting = true;
        }
    }

    /// One simulation tick.
    pub fn update(&mut self, dt: f32, input: &mut dyn InputSource) -> Result<()> {
        let frame = input.poll_once();
        if frame.is_new_press(Key::Quit) {
            info!("quit requested");
            self.quit_requested = true;
        }

        self.to_update = self.screens.iter().map(|s| s.id).collect();
        let mut other_screen_has_focus = !self.host_focus;
        let mut covered = false;

        while let Some(id) = self.to_update.pop() {
            let Some(index) = self.index_of(id) else { continue };
            let view = StackView {
                id,
                screen_count: self.screens.len(),
            };

            let screen = &mut self.screens[index];
            let covered_here = covered && !screen.kind.ignores_cover();
            if screen.transition.update(dt, other_screen_has_focus, covered_here) {
                self.remove(id);
                continue;
            }
            let mut commands = screen
                .kind
                .update(dt, &screen.transition, &mut self.services, &view);

            if matches!(screen.transition.state, ScreenState::TransitionOn | ScreenState::Active) {
                if !other_screen_has_focus {
                    commands.extend(screen.kind.handle_input(
                        &frame,
                        &screen.transition,
                        &mut self.services,
                        &view,
                    ));
                    other_screen_has_focus = true;
                }
                if !screen.transition.is_popup {
                    covered = true;
                }
            }

            self.apply(id, commands)?;
        }
        Ok(())
    }

    fn apply(&mut self, source: ScreenId, commands: Vec<Command>) -> Result<()> {
        for command in commands {
            match command {
                Command::Add(kind) => {
                    self.add(kind)?;
                }
                Command::Remove(id) => self.remove(id),
                Command::ExitSelf => self.exit(source),
                Command::Exit(id) => self.exit(id),
                Command::LoadScreens(kinds) => {
                    let ids: Vec<ScreenId> = self.screens.iter().map(|s| s.id).collect();
                    for id in ids {
                        self.exit(id);
                    }
                    self.add(ScreenKind::loading(kinds))?;
                }
                Command::SetGamePaused(paused) => match self.game_session_mut() {
                    Some(session) => session.set_paused(paused),
                    None => warn!("pause change with no game in progress"),
                },
                Command::Quit => {
                    info!("quit requested");
                    self.quit_requested = true;
                }
            }
        }
        Ok(())
    }

    /// Composite every screen that is not hidden, bottom first.
    pub fn draw(&self, renderer: &mut dyn Renderer) -> Result<()> {
        renderer.begin_frame();
        for screen in &self.screens {
            if screen.transition.state == ScreenState::Hidden {
                continue;
            }
            screen.kind.draw(&screen.transition, renderer, &self.services);
        }
        renderer.end_frame()
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    fn index_of(&self, id: ScreenId) -> Option<usize> {
        self.screens.iter().position(|s| s.id == id)
    }

    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }

    pub fn get(&self, id: ScreenId) -> Option<&Screen> {
        self.screens.iter().find(|s| s.id == id)
    }

    pub fn top(&self) -> Option<&Screen> {
        self.screens.last()
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    pub fn game_session(&self) -> Option<&GameSession> {
        self.screens.iter().rev().find_map(|s| s.kind.session())
    }

    pub fn game_session_mut(&mut self) -> Option<&mut GameSession> {
        self.screens.iter_mut().rev().find_map(|s| s.kind.session_mut())
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn take_cues(&mut self) -> Vec<Cue> {
        self.services.take_cues()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// When the host window loses focus no screen receives input.
    pub fn set_host_focus(&mut self, focused: bool) {
        self.host_focus = focused;
    }
}
