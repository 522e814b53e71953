//! Persistent player settings, stored as an INI file.
//!
//! ```ini
//! [audio]
//! music = true
//! sound_fx = true
//! music_volume = 1
//! sound_fx_volume = 0.65
//!
//! [device]
//! vibrate = true
//! ```

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Result};
use configparser::ini::Ini;
use log::{info, warn};

const DEFAULT_MUSIC: bool = true;
const DEFAULT_SOUND_FX: bool = true;
const DEFAULT_MUSIC_VOLUME: f32 = 1.0;
const DEFAULT_SOUND_FX_VOLUME: f32 = 0.65;
const DEFAULT_VIBRATE: bool = true;
pub const DEFAULT_SETTINGS_PATH: &str = "./halcyon.ini";

/// A single setting, addressed by the names the settings screen uses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SettingValue {
    Bool(bool),
    Float(f32),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub music: bool,
    pub sound_fx: bool,
    pub music_volume: f32,
    pub sound_fx_volume: f32,
    pub vibrate: bool,
    pub path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self::with_path(DEFAULT_SETTINGS_PATH)
    }
}

impl Settings {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            music: DEFAULT_MUSIC,
            sound_fx: DEFAULT_SOUND_FX,
            music_volume: DEFAULT_MUSIC_VOLUME,
            sound_fx_volume: DEFAULT_SOUND_FX_VOLUME,
            vibrate: DEFAULT_VIBRATE,
            path: path.into(),
        }
    }

    /// Read `path`, keeping defaults for anything missing. A missing file is
    /// seeded with the defaults; an unreadable one only logs a warning.
    pub fn load_or_default(path: &Path) -> Self {
        let mut settings = Self::with_path(path);
        if !path.exists() {
            if let Err(e) = settings.save() {
                warn!("could not seed settings file {}: {e:#}", path.display());
            }
            return settings;
        }
        if let Err(e) = settings.load_from_file() {
            warn!("using default settings: {e:#}");
        }
        settings
    }

    pub fn load_from_file(&mut self) -> Result<()> {
        let mut config = Ini::new();
        config
            .load(&self.path)
            .map_err(|e| anyhow!("failed to load settings {}: {e}", self.path.display()))?;

        if let Some(v) = config.getbool("audio", "music").ok().flatten() {
            self.music = v;
        }
        if let Some(v) = config.getbool("audio", "sound_fx").ok().flatten() {
            self.sound_fx = v;
        }
        if let Some(v) = config.getfloat("audio", "music_volume").ok().flatten() {
            self.music_volume = (v as f32).clamp(0.0, 1.0);
        }
        if let Some(v) = config.getfloat("audio", "sound_fx_volume").ok().flatten() {
            self.sound_fx_volume = (v as f32).clamp(0.0, 1.0);
        }
        if let Some(v) = config.getbool("device", "vibrate").ok().flatten() {
            self.vibrate = v;
        }

        info!(
            "loaded settings: music={} sound_fx={} volumes={:.2}/{:.2} vibrate={}",
            self.music, self.sound_fx, self.music_volume, self.sound_fx_volume, self.vibrate
        );
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        let mut config = Ini::new();
        config.set("audio", "music", Some(self.music.to_string()));
        config.set("audio", "sound_fx", Some(self.sound_fx.to_string()));
        config.set("audio", "music_volume", Some(self.music_volume.to_string()));
        config.set("audio", "sound_fx_volume", Some(self.sound_fx_volume.to_string()));
        config.set("device", "vibrate", Some(self.vibrate.to_string()));

        config
            .write(&self.path)
            .map_err(|e| anyhow!("failed to save settings {}: {e}", self.path.display()))?;
        info!("saved settings to {}", self.path.display());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<SettingValue> {
        match name {
            "Music" => Some(SettingValue::Bool(self.music)),
            "SoundFX" => Some(SettingValue::Bool(self.sound_fx)),
            "MusicVolume" => Some(SettingValue::Float(self.music_volume)),
            "SoundFXVolume" => Some(SettingValue::Float(self.sound_fx_volume)),
            "Vibrate" => Some(SettingValue::Bool(self.vibrate)),
            _ => None,
        }
    }

    pub fn set(&mut self, name: &str, value: SettingValue) -> Result<()> {
        match (name, value) {
            ("Music", SettingValue::Bool(v)) => self.music = v,
            ("SoundFX", SettingValue::Bool(v)) => self.sound_fx = v,
            ("MusicVolume", SettingValue::Float(v)) => self.music_volume = v.clamp(0.0, 1.0),
            ("SoundFXVolume", SettingValue::Float(v)) => self.sound_fx_volume = v.clamp(0.0, 1.0),
            ("Vibrate", SettingValue::Bool(v)) => self.vibrate = v,
            _ => bail!("no setting {name} of type {value:?}"),
        }
        Ok(())
    }
}
