//! Window information.
#![allow(clippy::module_name_repetitions)]

use crate::models::Rect;
use serde::{Deserialize, Serialize};

/// A backend-agnostic handle used to identify a window. The value is opaque
/// to the core; the protocol session assigns it.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
pub struct WindowHandle(pub u32);

impl std::fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a managed window is being displayed.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Tiled,
    Floating,
    Fullscreen,
    /// Parked off every workspace, shown on demand by `scratch-toggle`.
    Scratch,
}

/// Which of the two frame borders a theme command addresses.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderKind {
    Inner,
    Outer,
}

/// Frame state owned 1:1 by its window. Created when the window is adopted
/// and torn down when it is removed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    pub inner_width: i32,
    pub outer_width: i32,
    pub inner_color: String,
    pub outer_color: String,
}

impl Default for Decoration {
    fn default() -> Self {
        Self {
            inner_width: 2,
            outer_width: 4,
            inner_color: "#222222".to_string(),
            outer_color: "#111111".to_string(),
        }
    }
}

impl Decoration {
    pub fn set_width(&mut self, kind: BorderKind, width: i32) {
        match kind {
            BorderKind::Inner => self.inner_width = width,
            BorderKind::Outer => self.outer_width = width,
        }
    }

    pub fn set_color(&mut self, kind: BorderKind, color: &str) {
        match kind {
            BorderKind::Inner => self.inner_color = color.to_string(),
            BorderKind::Outer => self.outer_color = color.to_string(),
        }
    }
}

/// A managed window. While managed it belongs to exactly one workspace.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Window {
    pub handle: WindowHandle,
    pub mode: DisplayMode,
    /// Mode to restore when leaving fullscreen or a scratch hide.
    pub restore_mode: DisplayMode,
    pub workspace: usize,
    pub tiled: Rect,
    pub floating: Rect,
    pub title: String,
    pub class: String,
    pub decoration: Decoration,
    /// Scratchpad this window was spawned for, if any.
    pub scratchpad: Option<String>,
}

impl Window {
    #[must_use]
    pub fn new(handle: WindowHandle, class: String, title: String) -> Self {
        Self {
            handle,
            mode: DisplayMode::Tiled,
            restore_mode: DisplayMode::Tiled,
            workspace: 0,
            tiled: Rect::default(),
            floating: Rect::default(),
            title,
            class,
            decoration: Decoration::default(),
            scratchpad: None,
        }
    }

    #[must_use]
    pub const fn is_tiled(&self) -> bool {
        matches!(self.mode, DisplayMode::Tiled)
    }

    #[must_use]
    pub const fn is_floating(&self) -> bool {
        matches!(self.mode, DisplayMode::Floating)
    }

    #[must_use]
    pub const fn is_fullscreen(&self) -> bool {
        matches!(self.mode, DisplayMode::Fullscreen)
    }

    /// The geometry the protocol session should currently apply.
    #[must_use]
    pub const fn effective_rect(&self, monitor_rect: Rect) -> Rect {
        match self.mode {
            DisplayMode::Tiled => self.tiled,
            DisplayMode::Floating | DisplayMode::Scratch => self.floating,
            DisplayMode::Fullscreen => monitor_rect,
        }
    }
}
