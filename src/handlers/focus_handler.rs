//! Focus bookkeeping and directional navigation.
use crate::command::Direction;
use crate::display_action::DisplayAction;
use crate::models::{WindowHandle, WmEvent};
use crate::state::State;

impl State {
    /// Focus a managed window, queueing the session action and the `focus`
    /// notification. Focusing the already focused window is a no-op.
    pub fn focus_window(&mut self, handle: WindowHandle) -> bool {
        if self.focused == Some(handle) {
            return false;
        }
        let Some(window) = self.windows.get(&handle) else {
            return false;
        };
        let title = window.title.clone();
        self.focused = Some(handle);
        self.actions.push_back(DisplayAction::Focus(handle));
        self.events.push_back(WmEvent::Focus {
            win: handle.0,
            title,
        });
        true
    }

    /// Focus the directional neighbor of the focused window on the visible
    /// workspace.
    pub fn focus_direction(&mut self, direction: Direction) -> bool {
        match self.directional_neighbor(direction) {
            Some(neighbor) => self.focus_window(neighbor),
            None => false,
        }
    }

    /// Exchange the focused window with its directional neighbor in the BSP
    /// insertion order, then relayout.
    pub fn move_direction(&mut self, direction: Direction) -> bool {
        let Some(focused) = self.focused else {
            return false;
        };
        let Some(neighbor) = self.directional_neighbor(direction) else {
            return false;
        };
        let workspace = self.current_workspace;
        let Some(ws) = self.workspaces.get_mut(&workspace) else {
            return false;
        };
        if !ws.swap(focused, neighbor) {
            return false;
        }
        self.apply_layout(workspace);
        true
    }

    /// Directional adjacency over the visible workspace's tiled windows.
    ///
    /// Resolved against the geometry the BSP produced, not raw list order:
    /// candidates are windows whose rect center lies strictly in the
    /// requested direction of the focused center; the winner has the
    /// smallest Manhattan center distance, ties broken toward the lowest id.
    #[must_use]
    pub fn directional_neighbor(&self, direction: Direction) -> Option<WindowHandle> {
        let focused = self.focused?;
        let from = self.windows.get(&focused)?.tiled.center();
        let ws = self.workspaces.get(&self.current_workspace)?;
        if !ws.tiled.contains(&focused) {
            return None;
        }
        ws.tiled
            .iter()
            .filter(|h| **h != focused)
            .filter_map(|h| {
                let center = self.windows.get(h)?.tiled.center();
                let toward = match direction {
                    Direction::Left => center.0 < from.0,
                    Direction::Right => center.0 > from.0,
                    Direction::Up => center.1 < from.1,
                    Direction::Down => center.1 > from.1,
                };
                if toward {
                    let distance =
                        (center.0 - from.0).abs() as i64 + (center.1 - from.1).abs() as i64;
                    Some((distance, *h))
                } else {
                    None
                }
            })
            .min()
            .map(|(_, h)| h)
    }
}
