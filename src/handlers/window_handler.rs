//! Window lifecycle: adoption and removal.
use crate::display_action::DisplayAction;
use crate::errors::{Result, WmError};
use crate::models::{DisplayMode, Rect, RelativeArea, WindowHandle, Window};
use crate::state::State;

impl State {
    /// Adopt a window that asked to map.
    ///
    /// The rules engine runs exactly once, and its directive is applied
    /// before the window is inserted into any workspace list, so no partial
    /// or default placement is ever observable.
    ///
    /// # Errors
    ///
    /// `AlreadyManaged` when the id is already tracked.
    pub fn window_created_handler(
        &mut self,
        handle: WindowHandle,
        class: String,
        title: String,
    ) -> Result<bool> {
        if self.windows.contains_key(&handle) {
            return Err(WmError::AlreadyManaged(handle));
        }

        let mut window = Window::new(handle, class, title);
        window.decoration = self.theme.clone();

        let scratchpad = self
            .scratchpads
            .iter()
            .find(|s| s.class == window.class)
            .map(|s| s.name.clone());

        let rule = self.rules.matched(&window.class).cloned();
        let mut workspace = self.current_workspace;
        let mut floating = false;
        let mut area: Option<RelativeArea> = None;
        if let Some(rule) = &rule {
            if let Some(ws) = rule.workspace {
                workspace = ws;
            } else if let Some(monitor) = rule.monitor {
                if let Some(ws) = self.visible_workspace_on(monitor) {
                    workspace = ws;
                }
            }
            floating = rule.floating == Some(true);
            area = rule.area;
        }
        if scratchpad.is_some() {
            // scratchpads always appear floating on the visible workspace
            floating = true;
            workspace = self.current_workspace;
        }
        if !self.workspaces.contains_key(&workspace) {
            tracing::warn!("rule targets unknown workspace {workspace}, using current");
            workspace = self.current_workspace;
        }

        let monitor_rect = self
            .usable_rect_for(workspace)
            .unwrap_or(Rect::new(0, 0, 800, 600));
        window.workspace = workspace;
        window.mode = if floating {
            DisplayMode::Floating
        } else {
            DisplayMode::Tiled
        };
        window.restore_mode = window.mode;
        window.floating = match area {
            Some(area) => relative_rect(monitor_rect, area),
            None => centered_rect(monitor_rect),
        };
        if let Some(name) = &scratchpad {
            window.scratchpad = Some(name.clone());
            self.active_scratchpads.insert(name.clone(), handle);
        }

        let Some(ws) = self.workspaces.get_mut(&workspace) else {
            return Err(WmError::NotFound(handle));
        };
        if floating {
            ws.floating.push(handle);
        } else {
            ws.tiled.push(handle);
        }
        let visible = ws.visible;

        tracing::debug!(
            "adopted window {handle} class={} on workspace {workspace} floating={floating}",
            window.class
        );
        self.windows.insert(handle, window);
        self.actions.push_back(DisplayAction::CreateFrame(handle));
        self.apply_layout(workspace);
        if visible {
            self.actions.push_back(DisplayAction::Show(handle));
            self.focus_window(handle);
        } else {
            self.actions.push_back(DisplayAction::Hide(handle));
        }
        self.publish_workspace_event();
        Ok(true)
    }

    /// Remove a window that unmapped. The decoration is destroyed as part of
    /// this transition.
    ///
    /// # Errors
    ///
    /// `NotFound` when the id is not managed.
    pub fn window_destroyed_handler(&mut self, handle: WindowHandle) -> Result<bool> {
        let window = self
            .windows
            .remove(&handle)
            .ok_or(WmError::NotFound(handle))?;
        let workspace = window.workspace;
        if let Some(ws) = self.workspaces.get_mut(&workspace) {
            ws.remove_window(handle);
        }
        if let Some(name) = &window.scratchpad {
            self.active_scratchpads.remove(name);
        }
        self.actions.push_back(DisplayAction::DestroyFrame(handle));
        self.apply_layout(workspace);

        if self.focused == Some(handle) {
            self.focused = None;
            let next = self.workspaces.get(&workspace).and_then(|ws| {
                ws.tiled.last().copied().or_else(|| ws.floating.last().copied())
            });
            if let Some(next) = next {
                self.focus_window(next);
            }
        }
        self.publish_workspace_event();
        tracing::debug!("removed window {handle}");
        Ok(true)
    }

    /// Answer a configure request. Floating windows may move themselves;
    /// tiled windows are re-sent their authoritative tiled geometry.
    pub fn configure_request_handler(&mut self, handle: WindowHandle, rect: Rect) -> bool {
        match self.windows.get_mut(&handle) {
            Some(window) if window.is_floating() => {
                window.floating = rect;
                self.actions.push_back(DisplayAction::MoveResize(handle, rect));
                true
            }
            Some(window) => {
                let authoritative = window.tiled;
                self.actions
                    .push_back(DisplayAction::MoveResize(handle, authoritative));
                false
            }
            None => false,
        }
    }
}

fn relative_rect(monitor: Rect, area: RelativeArea) -> Rect {
    Rect {
        x: monitor.x + (monitor.w as f32 * area.x) as i32,
        y: monitor.y + (monitor.h as f32 * area.y) as i32,
        w: (monitor.w as f32 * area.w) as i32,
        h: (monitor.h as f32 * area.h) as i32,
    }
}

fn centered_rect(monitor: Rect) -> Rect {
    Rect {
        x: monitor.x + monitor.w / 4,
        y: monitor.y + monitor.h / 4,
        w: monitor.w / 2,
        h: monitor.h / 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ScratchPad};
    use crate::models::Rule;

    fn adopt(state: &mut State, id: u32, class: &str) {
        state
            .window_created_handler(WindowHandle(id), class.to_string(), format!("win{id}"))
            .expect("adopt");
    }

    #[test]
    fn adoption_appends_to_the_tiled_sequence_in_order() {
        let mut state = State::new(&Config::default());
        adopt(&mut state, 1, "a");
        adopt(&mut state, 2, "b");
        adopt(&mut state, 3, "c");
        let order: Vec<u32> = state.workspaces[&1].tiled.iter().map(|h| h.0).collect();
        assert_eq!(order, vec![1, 2, 3]);
        state.check_membership_invariant();
    }

    #[test]
    fn duplicate_adoption_is_rejected() {
        let mut state = State::new(&Config::default());
        adopt(&mut state, 1, "a");
        let err = state
            .window_created_handler(WindowHandle(1), "a".to_string(), "again".to_string())
            .expect_err("must reject");
        assert!(matches!(err, WmError::AlreadyManaged(WindowHandle(1))));
        state.check_membership_invariant();
    }

    #[test]
    fn rule_directs_into_floating_set_of_target_workspace() {
        // A class matching `floating=true, workspace=3` lands in workspace
        // 3's floating set and in no tiled sequence anywhere.
        let mut config = Config::default();
        config.rules.push(Rule {
            class: "Gimp".to_string(),
            workspace: Some(3),
            floating: Some(true),
            ..Rule::default()
        });
        let mut state = State::new(&config);
        adopt(&mut state, 7, "Gimp");
        assert!(state.workspaces[&3].floating.contains(&WindowHandle(7)));
        assert!(state
            .workspaces
            .values()
            .all(|ws| !ws.tiled.contains(&WindowHandle(7))));
        assert_eq!(state.windows[&WindowHandle(7)].workspace, 3);
        state.check_membership_invariant();
    }

    #[test]
    fn rule_monitor_directive_picks_its_visible_workspace() {
        let mut config = Config::default();
        config.monitors.push(crate::config::MonitorConfig {
            x: 1920,
            y: 0,
            w: 1280,
            h: 1024,
            workspaces: vec![10, 11],
        });
        config.rules.push(Rule {
            class: "mpv".to_string(),
            monitor: Some(1),
            ..Rule::default()
        });
        let mut state = State::new(&config);
        adopt(&mut state, 4, "mpv");
        assert_eq!(state.windows[&WindowHandle(4)].workspace, 10);
    }

    #[test]
    fn removal_frees_workspace_and_refocuses() {
        let mut state = State::new(&Config::default());
        adopt(&mut state, 1, "a");
        adopt(&mut state, 2, "b");
        assert_eq!(state.focused, Some(WindowHandle(2)));
        state
            .window_destroyed_handler(WindowHandle(2))
            .expect("remove");
        assert_eq!(state.focused, Some(WindowHandle(1)));
        assert!(!state.workspaces[&1].contains(WindowHandle(2)));
        // the frame dies with the window
        assert!(state
            .actions
            .iter()
            .any(|a| *a == crate::display_action::DisplayAction::DestroyFrame(WindowHandle(2))));
        state.check_membership_invariant();
    }

    #[test]
    fn removing_an_unmanaged_window_is_not_found() {
        let mut state = State::new(&Config::default());
        let err = state
            .window_destroyed_handler(WindowHandle(99))
            .expect_err("no-op");
        assert!(matches!(err, WmError::NotFound(WindowHandle(99))));
    }

    #[test]
    fn single_window_gets_the_full_usable_rect() {
        let mut config = Config::default();
        config.bar_visible = false;
        let mut state = State::new(&config);
        adopt(&mut state, 1, "a");
        assert_eq!(
            state.windows[&WindowHandle(1)].tiled,
            Rect::new(0, 0, 1920, 1080)
        );
    }

    #[test]
    fn scratchpad_class_is_adopted_floating_and_registered() {
        let mut config = Config::default();
        config.scratchpads.push(ScratchPad {
            name: "term".to_string(),
            class: "scratchterm".to_string(),
            command: "st -c scratchterm".to_string(),
        });
        let mut state = State::new(&config);
        adopt(&mut state, 9, "scratchterm");
        assert_eq!(
            state.active_scratchpads.get("term"),
            Some(&WindowHandle(9))
        );
        assert!(state.windows[&WindowHandle(9)].is_floating());
        state.check_membership_invariant();
    }

    #[test]
    fn tiled_configure_request_is_answered_with_authoritative_geometry() {
        let mut state = State::new(&Config::default());
        adopt(&mut state, 1, "a");
        let tiled = state.windows[&WindowHandle(1)].tiled;
        state.actions.clear();
        let changed = state.configure_request_handler(WindowHandle(1), Rect::new(5, 5, 10, 10));
        assert!(!changed);
        assert_eq!(
            state.actions.back(),
            Some(&crate::display_action::DisplayAction::MoveResize(
                WindowHandle(1),
                tiled
            ))
        );
    }
}
