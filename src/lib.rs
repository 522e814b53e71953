//! Halcyon: a vertical arcade shooter.
//!
//! The library holds the whole simulation (entities, weapons, enemies,
//! power-ups, the gameplay session) and the screen stack that decides which
//! context is live. The `halcyon` binary hosts it in a terminal.

pub mod assets;
pub mod collection;
pub mod display;
pub mod enemy;
pub mod entities;
pub mod game;
pub mod highscore;
pub mod persistence;
pub mod platform;
pub mod player;
pub mod powerup;
pub mod screen;
pub mod screens;
pub mod settings;
pub mod terminal_input;
pub mod weapon;
