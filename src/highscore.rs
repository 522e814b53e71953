//! Local best-score store.
//!
//! Plays the part of the online leaderboard: reads never block and never
//! fail the game. A store whose file could not be read reports itself as not
//! reachable, and the screens show a placeholder instead of a score.

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{info, warn};

pub fn default_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".halcyon_score")
}

#[derive(Clone, Debug, PartialEq)]
pub struct Highscores {
    path: Option<PathBuf>,
    best: Option<u64>,
    reachable: bool,
}

impl Highscores {
    /// A missing file just means no record yet. Anything else unreadable
    /// leaves the store unreachable.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (best, reachable) = match std::fs::read_to_string(&path) {
            Ok(text) => match text.trim().parse::<u64>() {
                Ok(score) => (Some(score), true),
                Err(e) => {
                    warn!("ignoring corrupt high score file {}: {e}", path.display());
                    (None, true)
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => (None, true),
            Err(e) => {
                warn!("high score file {} unreadable: {e}", path.display());
                (None, false)
            }
        };
        Self {
            path: Some(path),
            best,
            reachable,
        }
    }

    /// Not backed by a file; used by tests and `--scores` less runs.
    pub fn in_memory(best: Option<u64>) -> Self {
        Self {
            path: None,
            best,
            reachable: true,
        }
    }

    pub fn offline() -> Self {
        Self {
            path: None,
            best: None,
            reachable: false,
        }
    }

    pub fn best(&self) -> Option<u64> {
        self.best
    }

    pub fn is_reachable(&self) -> bool {
        self.reachable
    }

    /// New records need the store: beating the best, or any score when no
    /// record exists yet.
    pub fn qualifies(&self, score: f32) -> bool {
        self.reachable && self.best.map_or(true, |best| score as u64 > best)
    }

    /// Record `score` if it beats the stored best. Returns whether it did.
    pub fn submit(&mut self, score: f32) -> Result<bool> {
        let score = score.max(0.0) as u64;
        if !self.reachable || self.best.map_or(false, |best| score <= best) {
            return Ok(false);
        }
        if let Some(path) = &self.path {
            std::fs::write(path, score.to_string())
                .with_context(|| format!("writing high score to {}", path.display()))?;
        }
        self.best = Some(score);
        info!("new high score {score}");
        Ok(true)
    }
}
