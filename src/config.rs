//! Configuration for the explorer.

use std::error::Error;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_MAX_CACHED;
use crate::viewport::{Viewport, DEFAULT_VIEW_HEIGHT, DEFAULT_VIEW_WIDTH};

/// Explorer settings, loadable from a JSON file.
///
/// Missing fields fall back to their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Initial window origin x
    pub start_x: u32,

    /// Initial window origin y
    pub start_y: u32,

    /// Window width in tiles (default: 80).
    pub view_width: u32,

    /// Window height in tiles (default: 22).
    pub view_height: u32,

    /// World seed; 0 is the reference world.
    pub world_seed: u64,

    /// Generate frame rows on the rayon pool.
    pub parallel: bool,

    /// Chunks kept in the tile cache; 0 disables caching.
    pub cache_chunks: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            start_x: 0,
            start_y: 0,
            view_width: DEFAULT_VIEW_WIDTH,
            view_height: DEFAULT_VIEW_HEIGHT,
            world_seed: 0,
            parallel: true,
            cache_chunks: DEFAULT_MAX_CACHED,
        }
    }
}

impl ExplorerConfig {
    /// Read a config from a JSON file
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        Ok(config)
    }

    /// Write the config as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Initial viewport, with the origin clamped into range
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.start_x, self.start_y, self.view_width, self.view_height)
    }
}
