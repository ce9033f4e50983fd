//! Managed-to-managed transitions driven by decoded commands.
//!
//! Everything here runs inside the single-writer serialization point; the
//! event loop is the only caller. Each function returns whether externally
//! visible state changed.
use crate::command::Command;
use crate::display_action::DisplayAction;
use crate::display_servers::ServerSession;
use crate::errors::{Result, WmError};
use crate::manager::Manager;
use crate::models::{BorderKind, DisplayMode, WindowHandle, WmEvent};
use crate::state::State;
use crate::utils::child_process::exec_shell;
use crate::utils::config_watcher::run_config_script;

/// What `scratch-toggle` decided; spawning happens outside the state lock.
#[derive(Debug, PartialEq, Eq)]
pub enum ScratchOutcome {
    Shown,
    Hidden,
    /// No live window for this scratchpad; run its command line.
    Spawn(String),
    UnknownName,
}

impl<S: ServerSession> Manager<S> {
    /// Process one decoded command. Commands that need process-level context
    /// (children, shutdown, the config script) are handled here; everything
    /// else is delegated to the state store under the write lock.
    pub fn command_handler(&mut self, command: &Command) -> bool {
        match command {
            Command::Spawn(line) => {
                exec_shell(line, &mut self.children);
                false
            }
            Command::Quit => {
                self.quit_requested = true;
                false
            }
            Command::ReloadConfig => {
                let script = self.config.config_script.clone();
                let tx = self.command_tx.clone();
                tokio::spawn(async move {
                    run_config_script(script.as_deref(), &tx).await;
                });
                false
            }
            Command::ScratchToggle(name) => {
                let outcome = self
                    .state
                    .write()
                    .expect("state lock poisoned")
                    .scratch_toggle(name);
                match outcome {
                    ScratchOutcome::Shown | ScratchOutcome::Hidden => true,
                    ScratchOutcome::Spawn(cmd) => {
                        exec_shell(&cmd, &mut self.children);
                        false
                    }
                    ScratchOutcome::UnknownName => false,
                }
            }
            other => {
                let result = self
                    .state
                    .write()
                    .expect("state lock poisoned")
                    .command_handler(other);
                match result {
                    Ok(changed) => changed,
                    Err(err) => {
                        tracing::debug!("command dropped: {err}");
                        false
                    }
                }
            }
        }
    }
}

impl State {
    /// Process one state-level command.
    ///
    /// # Errors
    ///
    /// `NotFound` when the command references an unmanaged window. The caller
    /// logs and drops the error; it never aborts the consumer.
    pub fn command_handler(&mut self, command: &Command) -> Result<bool> {
        match command {
            Command::View(workspace) => Ok(self.view(*workspace)),
            Command::ToggleBar => Ok(self.toggle_bar()),
            Command::SetBorder(kind, width) => Ok(self.set_border(*kind, *width)),
            Command::SetColor(kind, color) => Ok(self.set_color(*kind, color)),
            Command::Focus(direction) => Ok(self.focus_direction(*direction)),
            Command::Move(direction) => Ok(self.move_direction(*direction)),
            Command::Resize { dx, dy } => Ok(self.resize(*dx, *dy)),
            Command::ToggleFloat(handle) => self.toggle_float(*handle),
            Command::ToggleFullscreen(handle) => self.toggle_fullscreen(*handle),
            Command::Promote(handle) => self.promote(*handle),
            Command::Swap(a, b) => self.swap(*a, *b),
            Command::SendToWorkspace {
                window,
                workspace,
                follow,
            } => self.send_to_workspace(*window, *workspace, *follow),
            // owned by the manager: needs children / shutdown / the watcher
            Command::Spawn(_)
            | Command::Quit
            | Command::ReloadConfig
            | Command::ScratchToggle(_) => Ok(false),
        }
    }

    /// Switch the visible workspace on the target's monitor.
    pub fn view(&mut self, workspace: usize) -> bool {
        let Some(target) = self.workspaces.get(&workspace) else {
            tracing::warn!("view: unknown workspace {workspace}");
            return false;
        };
        let monitor = target.monitor;
        let previous = self.visible_workspace_on(monitor);
        if previous == Some(workspace) {
            if self.current_workspace != workspace {
                self.current_workspace = workspace;
                self.publish_workspace_event();
                return true;
            }
            return false;
        }

        if let Some(previous) = previous {
            let hidden: Vec<WindowHandle> = self
                .workspaces
                .get_mut(&previous)
                .map(|ws| {
                    ws.visible = false;
                    ws.tiled.iter().chain(ws.floating.iter()).copied().collect()
                })
                .unwrap_or_default();
            for handle in hidden {
                self.actions.push_back(DisplayAction::Hide(handle));
            }
        }

        let shown: Vec<WindowHandle> = self
            .workspaces
            .get_mut(&workspace)
            .map(|ws| {
                ws.visible = true;
                ws.tiled.iter().chain(ws.floating.iter()).copied().collect()
            })
            .unwrap_or_default();
        for handle in &shown {
            self.actions.push_back(DisplayAction::Show(*handle));
        }
        self.current_workspace = workspace;
        self.apply_layout(workspace);
        if let Some(top) = shown.first() {
            self.focus_window(*top);
        }
        self.publish_workspace_event();
        true
    }

    pub fn toggle_bar(&mut self) -> bool {
        self.bar_visible = !self.bar_visible;
        let visible: Vec<usize> = self
            .workspaces
            .values()
            .filter(|ws| ws.visible)
            .map(|ws| ws.index)
            .collect();
        for index in visible {
            self.apply_layout(index);
        }
        self.events.push_back(WmEvent::BarToggle {
            visible: self.bar_visible,
        });
        true
    }

    pub fn set_border(&mut self, kind: BorderKind, width: i32) -> bool {
        self.theme.set_width(kind, width);
        self.refresh_decorations();
        true
    }

    pub fn set_color(&mut self, kind: BorderKind, color: &str) -> bool {
        self.theme.set_color(kind, color);
        self.refresh_decorations();
        true
    }

    fn refresh_decorations(&mut self) {
        let theme = self.theme.clone();
        let handles: Vec<WindowHandle> = self.windows.keys().copied().collect();
        for handle in handles {
            if let Some(window) = self.windows.get_mut(&handle) {
                window.decoration = theme.clone();
                self.actions
                    .push_back(DisplayAction::RedrawFrame(handle, theme.clone()));
            }
        }
    }

    /// Resize the focused window. Floating windows grow by the deltas; for a
    /// tiled window `dx` nudges the workspace's split ratio and `dy` is
    /// ignored.
    pub fn resize(&mut self, dx: i32, dy: i32) -> bool {
        let Some(focused) = self.focused else {
            return false;
        };
        let Some(window) = self.windows.get_mut(&focused) else {
            return false;
        };
        if window.is_floating() {
            window.floating.w = (window.floating.w + dx).max(50);
            window.floating.h = (window.floating.h + dy).max(50);
            let rect = window.floating;
            self.actions.push_back(DisplayAction::MoveResize(focused, rect));
            return true;
        }
        let workspace = window.workspace;
        let Some(width) = self.usable_rect_for(workspace).map(|r| r.w) else {
            return false;
        };
        let Some(ws) = self.workspaces.get_mut(&workspace) else {
            return false;
        };
        ws.split_ratio = (ws.split_ratio + dx as f32 / width as f32).clamp(0.1, 0.9);
        self.apply_layout(workspace);
        true
    }

    /// Move a window between the tiled sequence and the floating set.
    ///
    /// # Errors
    ///
    /// `NotFound` for unmanaged ids.
    pub fn toggle_float(&mut self, handle: WindowHandle) -> Result<bool> {
        let mode = self
            .windows
            .get(&handle)
            .map(|w| w.mode)
            .ok_or(WmError::NotFound(handle))?;
        let target = match mode {
            DisplayMode::Tiled => DisplayMode::Floating,
            DisplayMode::Floating => DisplayMode::Tiled,
            // fullscreen and scratch windows keep their mode
            _ => return Ok(false),
        };
        self.set_floating(handle, target == DisplayMode::Floating)
    }

    /// # Errors
    ///
    /// `NotFound` for unmanaged ids.
    pub fn set_floating(&mut self, handle: WindowHandle, floating: bool) -> Result<bool> {
        let (workspace, mode) = self
            .windows
            .get(&handle)
            .map(|w| (w.workspace, w.mode))
            .ok_or(WmError::NotFound(handle))?;
        if floating == (mode == DisplayMode::Floating) {
            return Ok(false);
        }
        let Some(ws) = self.workspaces.get_mut(&workspace) else {
            return Ok(false);
        };
        ws.remove_window(handle);
        if floating {
            ws.floating.push(handle);
        } else {
            ws.tiled.push(handle);
        }
        if let Some(window) = self.windows.get_mut(&handle) {
            window.mode = if floating {
                DisplayMode::Floating
            } else {
                DisplayMode::Tiled
            };
            window.restore_mode = window.mode;
            if floating {
                let rect = window.floating;
                self.actions.push_back(DisplayAction::MoveResize(handle, rect));
            }
        }
        self.apply_layout(workspace);
        Ok(true)
    }

    /// # Errors
    ///
    /// `NotFound` for unmanaged ids.
    pub fn toggle_fullscreen(&mut self, handle: WindowHandle) -> Result<bool> {
        let (workspace, mode) = self
            .windows
            .get(&handle)
            .map(|w| (w.workspace, w.mode))
            .ok_or(WmError::NotFound(handle))?;
        let monitor_rect = self
            .workspaces
            .get(&workspace)
            .and_then(|ws| self.monitors.get(&ws.monitor))
            .map(|m| m.rect);
        let Some(window) = self.windows.get_mut(&handle) else {
            return Ok(false);
        };
        if mode == DisplayMode::Fullscreen {
            window.mode = window.restore_mode;
            self.apply_layout(workspace);
        } else if matches!(mode, DisplayMode::Tiled | DisplayMode::Floating) {
            window.restore_mode = mode;
            window.mode = DisplayMode::Fullscreen;
            // fullscreen covers the whole monitor, bar included
            if let Some(rect) = monitor_rect {
                self.actions.push_back(DisplayAction::MoveResize(handle, rect));
            }
        } else {
            return Ok(false);
        }
        Ok(true)
    }

    /// Move `handle` to the front of its workspace's tiled sequence. A
    /// window already at the front stays put.
    ///
    /// # Errors
    ///
    /// `NotFound` for unmanaged ids.
    pub fn promote(&mut self, handle: WindowHandle) -> Result<bool> {
        let workspace = self
            .windows
            .get(&handle)
            .map(|w| w.workspace)
            .ok_or(WmError::NotFound(handle))?;
        let changed = self
            .workspaces
            .get_mut(&workspace)
            .is_some_and(|ws| ws.promote(handle));
        if changed {
            self.apply_layout(workspace);
        }
        Ok(changed)
    }

    /// Exchange the list positions of two windows. Cross-workspace swaps
    /// exchange the windows' slots and owners.
    ///
    /// # Errors
    ///
    /// `NotFound` when either id is unmanaged.
    pub fn swap(&mut self, a: WindowHandle, b: WindowHandle) -> Result<bool> {
        let ws_a = self
            .windows
            .get(&a)
            .map(|w| w.workspace)
            .ok_or(WmError::NotFound(a))?;
        let ws_b = self
            .windows
            .get(&b)
            .map(|w| w.workspace)
            .ok_or(WmError::NotFound(b))?;
        if ws_a == ws_b {
            let swapped = self
                .workspaces
                .get_mut(&ws_a)
                .is_some_and(|ws| ws.swap(a, b));
            if swapped {
                self.apply_layout(ws_a);
            }
            return Ok(swapped);
        }

        let pos_a = self
            .workspaces
            .get(&ws_a)
            .and_then(|ws| ws.tiled.iter().position(|h| *h == a));
        let pos_b = self
            .workspaces
            .get(&ws_b)
            .and_then(|ws| ws.tiled.iter().position(|h| *h == b));
        let (Some(pos_a), Some(pos_b)) = (pos_a, pos_b) else {
            return Ok(false);
        };
        if let Some(ws) = self.workspaces.get_mut(&ws_a) {
            ws.tiled[pos_a] = b;
        }
        if let Some(ws) = self.workspaces.get_mut(&ws_b) {
            ws.tiled[pos_b] = a;
        }
        if let Some(window) = self.windows.get_mut(&a) {
            window.workspace = ws_b;
        }
        if let Some(window) = self.windows.get_mut(&b) {
            window.workspace = ws_a;
        }
        self.apply_layout(ws_a);
        self.apply_layout(ws_b);
        self.publish_workspace_event();
        Ok(true)
    }

    /// # Errors
    ///
    /// `NotFound` for unmanaged ids.
    pub fn send_to_workspace(
        &mut self,
        handle: WindowHandle,
        workspace: usize,
        follow: bool,
    ) -> Result<bool> {
        let (source, floating) = self
            .windows
            .get(&handle)
            .map(|w| (w.workspace, w.is_floating()))
            .ok_or(WmError::NotFound(handle))?;
        if !self.workspaces.contains_key(&workspace) {
            tracing::warn!("send-to-ws: unknown workspace {workspace}");
            return Ok(false);
        }
        if source == workspace {
            return Ok(false);
        }
        if let Some(ws) = self.workspaces.get_mut(&source) {
            ws.remove_window(handle);
        }
        let target_visible = {
            let ws = self.workspaces.get_mut(&workspace).expect("checked above");
            if floating {
                ws.floating.push(handle);
            } else {
                ws.tiled.push(handle);
            }
            ws.visible
        };
        if let Some(window) = self.windows.get_mut(&handle) {
            window.workspace = workspace;
        }
        if target_visible {
            self.actions.push_back(DisplayAction::Show(handle));
        } else {
            self.actions.push_back(DisplayAction::Hide(handle));
            if self.focused == Some(handle) && !follow {
                self.focused = None;
            }
        }
        self.apply_layout(source);
        self.apply_layout(workspace);
        self.publish_workspace_event();
        if follow {
            self.view(workspace);
            self.focus_window(handle);
        }
        Ok(true)
    }

    /// Hide or show the named scratchpad window. Pure state decision; the
    /// manager runs the spawn when asked to.
    pub fn scratch_toggle(&mut self, name: &str) -> ScratchOutcome {
        if let Some(handle) = self.active_scratchpads.get(name).copied() {
            if let Some(mode) = self.windows.get(&handle).map(|w| w.mode) {
                return if mode == DisplayMode::Scratch {
                    self.scratch_show(handle);
                    ScratchOutcome::Shown
                } else {
                    self.scratch_hide(handle);
                    ScratchOutcome::Hidden
                };
            }
            self.active_scratchpads.remove(name);
        }
        match self.scratchpads.iter().find(|s| s.name == name) {
            Some(pad) => ScratchOutcome::Spawn(pad.command.clone()),
            None => {
                tracing::warn!("scratch-toggle: unknown scratchpad '{name}'");
                ScratchOutcome::UnknownName
            }
        }
    }

    fn scratch_show(&mut self, handle: WindowHandle) {
        let workspace = self.current_workspace;
        if let Some(ws) = self.workspaces.get_mut(&workspace) {
            ws.floating.push(handle);
        }
        if let Some(window) = self.windows.get_mut(&handle) {
            window.mode = DisplayMode::Floating;
            window.workspace = workspace;
            let rect = window.floating;
            self.actions.push_back(DisplayAction::MoveResize(handle, rect));
        }
        self.actions.push_back(DisplayAction::Show(handle));
        self.focus_window(handle);
        self.publish_workspace_event();
    }

    fn scratch_hide(&mut self, handle: WindowHandle) {
        let workspace = self
            .windows
            .get(&handle)
            .map(|w| w.workspace)
            .unwrap_or(self.current_workspace);
        if let Some(ws) = self.workspaces.get_mut(&workspace) {
            ws.remove_window(handle);
        }
        if let Some(window) = self.windows.get_mut(&handle) {
            window.mode = DisplayMode::Scratch;
        }
        self.actions.push_back(DisplayAction::Hide(handle));
        if self.focused == Some(handle) {
            self.focused = None;
        }
        self.apply_layout(workspace);
        self.publish_workspace_event();
    }
}
