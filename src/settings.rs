//! Arena geometry and driver settings
//!
//! Stored as JSON next to the stage files. Missing fields take their defaults.

use std::fs;
use std::io;
use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::obstacle::Edge;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    /// Canvas width in pixels
    pub arena_width: f64,
    /// Canvas height in pixels
    pub arena_height: f64,
    pub grid_rows: usize,
    pub grid_cols: usize,
    /// Gap between a tile's border and the obstacle inside it
    pub block_margin: f64,

    // === Headless driver ===
    /// Seed for bot inputs
    pub seed: u64,
    /// Number of ticks to simulate
    pub ticks: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            grid_rows: GRID_ROWS,
            grid_cols: GRID_COLS,
            block_margin: BLOCK_MARGIN,
            seed: 0x7a4b_d0e1,
            ticks: 600,
        }
    }
}

impl Settings {
    pub fn tile_width(&self) -> f64 {
        self.arena_width / self.grid_cols as f64
    }

    pub fn tile_height(&self) -> f64 {
        self.arena_height / self.grid_rows as f64
    }

    /// Radius of the wall or hole placed inside a tile
    pub fn obstacle_radius(&self) -> f64 {
        self.tile_width().min(self.tile_height()) / 2.0 - self.block_margin
    }

    /// World-space center of the tile at row `i`, column `j`
    pub fn tile_center(&self, i: usize, j: usize) -> DVec2 {
        DVec2::new(
            (j as f64 + 0.5) * self.tile_width(),
            (i as f64 + 0.5) * self.tile_height(),
        )
    }

    /// Arena boundary
    pub fn edge(&self) -> Edge {
        Edge::new(0.0, 0.0, self.arena_width, self.arena_height)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("No settings at {} ({}), using defaults", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let s = Settings::default();
        assert!((s.tile_height() - 600.0 / 18.0).abs() < 1e-12);
        assert!((s.obstacle_radius() - (800.0 / 26.0 / 2.0 - 3.0)).abs() < 1e-12);
        let c = s.tile_center(0, 0);
        assert!((c.x - s.tile_width() / 2.0).abs() < 1e-12);
        assert!((c.y - s.tile_height() / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s: Settings = serde_json::from_str(r#"{"ticks": 10}"#).unwrap();
        assert_eq!(s.ticks, 10);
        assert_eq!(s.grid_cols, GRID_COLS);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let s = Settings::load(Path::new("/nonexistent/tank-duel-settings.json"));
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let name = format!("tank-duel-settings-{}.json", std::process::id());
        let path = std::env::temp_dir().join(name);
        let s = Settings {
            seed: 42,
            ..Default::default()
        };
        s.save(&path).unwrap();
        assert_eq!(Settings::load(&path), s);
        let _ = fs::remove_file(&path);
    }
}
