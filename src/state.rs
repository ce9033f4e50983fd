//! The shared state store: windows, workspaces and monitors.
//!
//! The three maps live behind one `RwLock` (see [`SharedState`]) so that any
//! operation touching more than one map is atomic to concurrent readers.
//! Writers are additionally serialized by the single consumer in
//! [`crate::event_loop`]; the lock's read side exists for the event publisher
//! and status queries.
use crate::config::{Config, ScratchPad};
use crate::display_action::DisplayAction;
use crate::layouts::{self, LayoutSettings};
use crate::models::{Decoration, Monitor, Rect, Rules, WindowHandle, WmEvent, Window, Workspace};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, RwLock};

pub type SharedState = Arc<RwLock<State>>;

#[derive(Serialize, Deserialize, Debug)]
pub struct State {
    pub windows: HashMap<WindowHandle, Window>,
    pub workspaces: BTreeMap<usize, Workspace>,
    pub monitors: BTreeMap<usize, Monitor>,
    pub focused: Option<WindowHandle>,
    /// Index of the workspace commands operate on by default.
    pub current_workspace: usize,
    pub bar_visible: bool,
    pub bar_height: i32,
    pub outer_margin: i32,
    pub theme: Decoration,
    pub rules: Rules,
    pub scratchpads: Vec<ScratchPad>,
    /// Scratchpad name -> the window currently realizing it.
    pub active_scratchpads: HashMap<String, WindowHandle>,
    /// Pending requests for the protocol session, drained by the event loop.
    #[serde(skip)]
    pub actions: VecDeque<DisplayAction>,
    /// Pending notifications for subscribers, drained by the event loop.
    #[serde(skip)]
    pub events: VecDeque<WmEvent>,
}

impl State {
    pub(crate) fn new(config: &Config) -> Self {
        let mut monitors = BTreeMap::new();
        let mut workspaces = BTreeMap::new();
        for (id, mc) in config.monitors.iter().enumerate() {
            monitors.insert(id, Monitor::new(id, mc.rect(), mc.workspaces.clone()));
            for (nth, &index) in mc.workspaces.iter().enumerate() {
                let mut ws = Workspace::new(index, id, config.split_ratio);
                ws.visible = nth == 0;
                workspaces.insert(index, ws);
            }
        }
        let current_workspace = monitors
            .values()
            .next()
            .and_then(|m| m.workspaces.first().copied())
            .unwrap_or(1);

        Self {
            windows: HashMap::new(),
            workspaces,
            monitors,
            focused: None,
            current_workspace,
            bar_visible: config.bar_visible,
            bar_height: config.bar_height,
            outer_margin: config.outer_margin,
            theme: config.theme.clone(),
            rules: Rules::new(config.rules.clone()),
            scratchpads: config.scratchpads.clone(),
            active_scratchpads: HashMap::new(),
            actions: VecDeque::new(),
            events: VecDeque::new(),
        }
    }

    /// The layout area for a workspace: its monitor's rect minus the bar strut.
    #[must_use]
    pub fn usable_rect_for(&self, workspace: usize) -> Option<Rect> {
        let ws = self.workspaces.get(&workspace)?;
        let monitor = self.monitors.get(&ws.monitor)?;
        Some(monitor.usable_rect(self.bar_visible, self.bar_height))
    }

    #[must_use]
    pub fn visible_workspace_on(&self, monitor: usize) -> Option<usize> {
        self.workspaces
            .values()
            .find(|ws| ws.monitor == monitor && ws.visible)
            .map(|ws| ws.index)
    }

    /// Sorted indices of workspaces holding at least one window.
    #[must_use]
    pub fn occupied_workspaces(&self) -> Vec<usize> {
        self.workspaces
            .values()
            .filter(|ws| !ws.is_empty())
            .map(|ws| ws.index)
            .collect()
    }

    /// Recompute tiled geometry for one workspace and queue the configure
    /// requests when it is visible.
    pub fn apply_layout(&mut self, workspace: usize) {
        let Some(rect) = self.usable_rect_for(workspace) else {
            return;
        };
        let Some(ws) = self.workspaces.get(&workspace) else {
            return;
        };
        let settings = LayoutSettings {
            split_ratio: ws.split_ratio,
            outer_margin: self.outer_margin,
        };
        let visible = ws.visible;
        let placements = layouts::apply(&ws.tiled, rect, &settings);
        let floating: Vec<WindowHandle> = ws.floating.clone();

        for (handle, rect) in placements {
            if let Some(window) = self.windows.get_mut(&handle) {
                window.tiled = rect;
                if visible {
                    let effective = window.effective_rect(rect);
                    self.actions
                        .push_back(DisplayAction::MoveResize(handle, effective));
                }
            }
        }
        if visible {
            for handle in floating {
                if let Some(window) = self.windows.get(&handle) {
                    self.actions
                        .push_back(DisplayAction::MoveResize(handle, window.floating));
                }
            }
        }
    }

    pub fn publish_workspace_event(&mut self) {
        let event = WmEvent::Workspace {
            index: self.current_workspace,
            occupied: self.occupied_workspaces(),
        };
        self.events.push_back(event);
    }

    /// Panics when a managed window is not in exactly one workspace list.
    /// Test support only.
    #[cfg(test)]
    pub fn check_membership_invariant(&self) {
        for (handle, window) in &self.windows {
            if window.mode == crate::models::DisplayMode::Scratch {
                // parked scratch windows are intentionally off-workspace
                let memberships = self
                    .workspaces
                    .values()
                    .filter(|ws| ws.contains(*handle))
                    .count();
                assert_eq!(memberships, 0, "scratch window {handle} still listed");
                continue;
            }
            let memberships: Vec<usize> = self
                .workspaces
                .values()
                .filter(|ws| ws.contains(*handle))
                .map(|ws| ws.index)
                .collect();
            assert_eq!(
                memberships.len(),
                1,
                "window {handle} in workspaces {memberships:?}"
            );
            let ws = &self.workspaces[&memberships[0]];
            let in_tiled = ws.tiled.contains(handle);
            let in_floating = ws.floating.contains(handle);
            assert!(
                in_tiled != in_floating,
                "window {handle} in both lists of workspace {}",
                ws.index
            );
        }
        for monitor in self.monitors.values() {
            let visible = monitor
                .workspaces
                .iter()
                .filter(|i| self.workspaces[i].visible)
                .count();
            assert_eq!(visible, 1, "monitor {} visible count", monitor.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_marks_one_workspace_visible_per_monitor() {
        let mut config = Config::default();
        config.monitors.push(crate::config::MonitorConfig {
            x: 1920,
            y: 0,
            w: 1280,
            h: 1024,
            workspaces: vec![10, 11],
        });
        let state = State::new(&config);
        state.check_membership_invariant();
        assert_eq!(state.visible_workspace_on(0), Some(1));
        assert_eq!(state.visible_workspace_on(1), Some(10));
        assert_eq!(state.current_workspace, 1);
    }

    #[test]
    fn bar_strut_shrinks_the_usable_rect() {
        let state = State::new(&Config::default());
        let rect = state.usable_rect_for(1).expect("rect");
        assert_eq!(rect.y, Config::default().bar_height);
        assert_eq!(rect.h, 1080 - Config::default().bar_height);
    }
}
