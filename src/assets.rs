//! Manifest-backed asset store.
//!
//! There is no content pipeline: textures are known only by their logical
//! name, size and the glyph the terminal renderer draws for them. Handles
//! are indices into the manifest, so the same name always maps to the same
//! handle.

use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use log::debug;
use serde::Deserialize;

use crate::entities::Color;
use crate::platform::{AssetStore, FontHandle, SoundHandle, TextureHandle};

const BUILTIN_MANIFEST: &str = include_str!("../assets/manifest.json");

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TextureInfo {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub glyph: char,
    pub color: [u8; 3],
}

impl TextureInfo {
    pub fn tint(&self) -> Color {
        Color::rgba(self.color[0], self.color[1], self.color[2], 255)
    }
}

#[derive(Clone, Debug, Deserialize)]
struct Manifest {
    textures: Vec<TextureInfo>,
    fonts: Vec<String>,
    sounds: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct AssetCatalog {
    textures: Vec<TextureInfo>,
    fonts: Vec<String>,
    sounds: Vec<String>,
    texture_index: HashMap<String, usize>,
}

impl AssetCatalog {
    pub fn from_json(text: &str) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(text).context("malformed asset manifest")?;
        let texture_index = manifest
            .textures
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.clone(), i))
            .collect();
        Ok(Self {
            textures: manifest.textures,
            fonts: manifest.fonts,
            sounds: manifest.sounds,
            texture_index,
        })
    }

    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_MANIFEST)
    }

    pub fn sound_name(&self, sound: SoundHandle) -> Option<&str> {
        self.sounds.get(sound.0 as usize).map(String::as_str)
    }

    /// Glyph table for the terminal renderer, keyed by texture id.
    pub fn glyphs(&self) -> HashMap<u32, (char, Color)> {
        self.textures
            .iter()
            .enumerate()
            .map(|(i, t)| (i as u32 + 1, (t.glyph, t.tint())))
            .collect()
    }
}

impl AssetStore for AssetCatalog {
    fn load_texture(&mut self, name: &str) -> Result<TextureHandle> {
        let index = *self
            .texture_index
            .get(name)
            .ok_or_else(|| anyhow!("unknown texture '{name}'"))?;
        let info = &self.textures[index];
        debug!("texture {name} -> #{}", index + 1);
        Ok(TextureHandle {
            id: index as u32 + 1,
            width: info.width,
            height: info.height,
        })
    }

    fn load_font(&mut self, name: &str) -> Result<FontHandle> {
        let index = self
            .fonts
            .iter()
            .position(|f| f == name)
            .ok_or_else(|| anyhow!("unknown font '{name}'"))?;
        Ok(FontHandle(index as u32))
    }

    fn load_sound(&mut self, name: &str) -> Result<SoundHandle> {
        let index = self
            .sounds
            .iter()
            .position(|s| s == name)
            .ok_or_else(|| anyhow!("unknown sound '{name}'"))?;
        Ok(SoundHandle(index as u32))
    }
}
