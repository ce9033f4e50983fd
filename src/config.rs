//! Runtime configuration.
//!
//! The config file is optional toml; everything has a workable default so the
//! manager can start bare. The config *script* (an external process whose
//! stdout is replayed as commands) is handled by
//! [`crate::utils::config_watcher`], not here.
use crate::errors::Result;
use crate::models::{Decoration, Rect, Rule};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MonitorConfig {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    /// Workspace indices assigned to this monitor; the first one starts visible.
    pub workspaces: Vec<usize>,
}

impl MonitorConfig {
    #[must_use]
    pub const fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            w: self.w,
            h: self.h,
        }
    }
}

/// A key grab mapped to a command line, e.g. keycode 36 + mod4 -> "spawn st".
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Keybind {
    pub modmask: u16,
    pub keycode: u16,
    pub command: String,
}

/// A named scratchpad. The window it spawns is recognized by class at
/// adoption time.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScratchPad {
    pub name: String,
    pub class: String,
    pub command: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub monitors: Vec<MonitorConfig>,
    pub rules: Vec<Rule>,
    pub keybinds: Vec<Keybind>,
    pub scratchpads: Vec<ScratchPad>,
    /// BSP master partition share, `0.1..=0.9`.
    pub split_ratio: f32,
    /// Outer margin in pixels applied around the tiling area.
    pub outer_margin: i32,
    pub bar_height: i32,
    pub bar_visible: bool,
    pub theme: Decoration,
    /// Shell script whose stdout lines are replayed as commands.
    pub config_script: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            monitors: vec![MonitorConfig {
                x: 0,
                y: 0,
                w: 1920,
                h: 1080,
                workspaces: (1..=9).collect(),
            }],
            rules: vec![],
            keybinds: vec![],
            scratchpads: vec![],
            split_ratio: 0.5,
            outer_margin: 0,
            bar_height: 24,
            bar_visible: true,
            theme: Decoration::default(),
            config_script: None,
        }
    }
}

impl Config {
    /// Load from a toml file, falling back to defaults when the file does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

/// Place a runtime file (socket) in the XDG runtime dir, falling back to a
/// per-user tmp dir when XDG is unavailable.
pub fn place_runtime_file<P: AsRef<Path>>(file: P) -> std::io::Result<PathBuf> {
    match xdg::BaseDirectories::with_prefix("hibridwm") {
        Ok(base) => base.place_runtime_file(file),
        Err(_) => {
            let user = std::env::var("USER").unwrap_or_else(|_| "nobody".to_string());
            let dir = std::env::temp_dir().join(format!("hibridwm-{user}"));
            std::fs::create_dir_all(&dir)?;
            Ok(dir.join(file))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.monitors.len(), 1);
        assert_eq!(config.monitors[0].workspaces.first(), Some(&1));
        assert!((0.1..=0.9).contains(&config.split_ratio));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load(Path::new("/nonexistent/hibridwm.toml")).expect("load");
        assert_eq!(config.bar_height, Config::default().bar_height);
    }

    #[test]
    fn parses_partial_toml() {
        let parsed: Config = toml::from_str(
            r##"
            split_ratio = 0.6
            bar_visible = false

            [[rules]]
            class = "Firefox"
            workspace = 3
            floating = true
            "##,
        )
        .expect("parse");
        assert!((parsed.split_ratio - 0.6).abs() < f32::EPSILON);
        assert!(!parsed.bar_visible);
        assert_eq!(parsed.rules[0].workspace, Some(3));
        assert_eq!(parsed.rules[0].floating, Some(true));
    }
}
