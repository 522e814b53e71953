//! Saving the screen stack across runs.
//!
//! Only the kinds of screen and the gameplay snapshot are kept; everything
//! else is rebuilt when the screens load their content again.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::game::GameSnapshot;
use crate::screen::{ScreenStack, Services};
use crate::screens::{ScreenKind, ScreenTag};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedSession {
    /// Bottom to top.
    pub screens: Vec<ScreenTag>,
    pub game: Option<GameSnapshot>,
}

impl SavedSession {
    pub fn has_game(&self) -> bool {
        self.game.is_some()
    }
}

/// Record what is on the stack. Loading screens are transient and skipped.
pub fn capture(stack: &ScreenStack) -> SavedSession {
    SavedSession {
        screens: stack
            .screens()
            .iter()
            .map(|s| s.kind.tag())
            .filter(|&tag| tag != ScreenTag::Loading)
            .collect(),
        game: stack.game_session().map(|session| session.snapshot()),
    }
}

/// Build a fresh screen for `tag`. The gameplay screen is rebuilt from the
/// snapshot, and starts paused when the pause popup sits on top of it.
///
/// Returns `None` for tags that cannot be recreated on their own.
pub fn create_screen(
    tag: ScreenTag,
    snapshot: Option<&GameSnapshot>,
    paused: bool,
    services: &Services,
) -> Option<ScreenKind> {
    let score = snapshot.map_or(0.0, |s| s.score);
    match tag {
        ScreenTag::Background => Some(ScreenKind::background()),
        ScreenTag::MainMenu => Some(ScreenKind::main_menu()),
        ScreenTag::Scores => Some(ScreenKind::scores(services)),
        ScreenTag::Options => Some(ScreenKind::options(&services.settings)),
        ScreenTag::Game => Some(ScreenKind::restored_game(snapshot.cloned(), paused)),
        ScreenTag::Paused => Some(ScreenKind::paused()),
        ScreenTag::GameOver => Some(ScreenKind::game_over(score, services)),
        ScreenTag::NewHighScore => Some(ScreenKind::new_high_score(score, services)),
        ScreenTag::Loading => None,
    }
}

/// Push the saved screens onto `stack`, bottom first.
pub fn restore(stack: &mut ScreenStack, saved: &SavedSession) -> Result<()> {
    let paused = saved
        .screens
        .iter()
        .any(|&t| matches!(t, ScreenTag::Paused | ScreenTag::GameOver | ScreenTag::NewHighScore));

    for &tag in &saved.screens {
        let Some(kind) = create_screen(tag, saved.game.as_ref(), paused, stack.services()) else {
            continue;
        };
        stack.add(kind)?;
    }
    info!("restored {} screens", stack.len());
    Ok(())
}

pub fn save_to_file(saved: &SavedSession, path: &Path) -> Result<()> {
    let text = serde_json::to_string_pretty(saved).context("serializing session")?;
    fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    info!("session saved to {}", path.display());
    Ok(())
}

pub fn load_from_file(path: &Path) -> Result<SavedSession> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}
