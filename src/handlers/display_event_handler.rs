//! Translates protocol events into lifecycle transitions. Runs on the same
//! single consumer as socket commands, so the two producers never race on
//! the state store.
use crate::command;
use crate::display_event::ServerEvent;
use crate::display_servers::ServerSession;
use crate::errors::WmError;
use crate::manager::Manager;

impl<S: ServerSession> Manager<S> {
    /// Apply one protocol event. Returns true when displayed state changed.
    pub fn display_event_handler(&mut self, event: ServerEvent) -> bool {
        match event {
            ServerEvent::MapRequest {
                window,
                class,
                title,
            } => {
                let result = self
                    .state
                    .write()
                    .expect("state lock poisoned")
                    .window_created_handler(window, class, title);
                match result {
                    Ok(changed) => changed,
                    Err(err) => {
                        tracing::warn!("adoption rejected: {err}");
                        false
                    }
                }
            }
            ServerEvent::UnmapNotify(window) => {
                let result = self
                    .state
                    .write()
                    .expect("state lock poisoned")
                    .window_destroyed_handler(window);
                match result {
                    Ok(changed) => changed,
                    Err(WmError::NotFound(_)) => false,
                    Err(err) => {
                        tracing::warn!("removal failed: {err}");
                        false
                    }
                }
            }
            ServerEvent::ConfigureRequest { window, rect } => self
                .state
                .write()
                .expect("state lock poisoned")
                .configure_request_handler(window, rect),
            ServerEvent::KeyPress { keycode, modmask } => {
                match self.keybind_command(keycode, modmask) {
                    Some(command) => self.command_handler(&command),
                    None => false,
                }
            }
            ServerEvent::ButtonPress {
                window: Some(window),
                ..
            } => self
                .state
                .write()
                .expect("state lock poisoned")
                .focus_window(window),
            ServerEvent::ButtonPress { .. } => false,
        }
    }

    fn keybind_command(&self, keycode: u16, modmask: u16) -> Option<command::Command> {
        let bind = self
            .config
            .keybinds
            .iter()
            .find(|b| b.keycode == keycode && b.modmask == modmask)?;
        match command::parse_command(&bind.command) {
            Ok(command) => Some(command),
            Err(err) => {
                tracing::error!("keybind maps to a bad command '{}': {err}", bind.command);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Keybind};
    use crate::models::{Rect, WindowHandle};

    fn map_request(id: u32) -> ServerEvent {
        ServerEvent::MapRequest {
            window: WindowHandle(id),
            class: format!("class{id}"),
            title: format!("title{id}"),
        }
    }

    #[test]
    fn map_then_unmap_round_trip() {
        let (mut manager, _handle) = Manager::new_test(Config::default());
        assert!(manager.display_event_handler(map_request(1)));
        assert!(manager.display_event_handler(ServerEvent::UnmapNotify(WindowHandle(1))));
        let state = manager.state.read().expect("lock");
        assert!(state.windows.is_empty());
    }

    #[test]
    fn duplicate_map_request_is_dropped() {
        let (mut manager, _handle) = Manager::new_test(Config::default());
        assert!(manager.display_event_handler(map_request(1)));
        assert!(!manager.display_event_handler(map_request(1)));
        let state = manager.state.read().expect("lock");
        assert_eq!(state.windows.len(), 1);
        state.check_membership_invariant();
    }

    #[test]
    fn unmap_of_unknown_window_is_a_quiet_no_op() {
        let (mut manager, _handle) = Manager::new_test(Config::default());
        assert!(!manager.display_event_handler(ServerEvent::UnmapNotify(WindowHandle(42))));
    }

    #[test]
    fn keypress_resolves_through_the_keybind_map() {
        let mut config = Config::default();
        config.keybinds.push(Keybind {
            modmask: 64,
            keycode: 31,
            command: "view 3".to_string(),
        });
        let (mut manager, _handle) = Manager::new_test(config);
        assert!(manager.display_event_handler(ServerEvent::KeyPress {
            keycode: 31,
            modmask: 64,
        }));
        assert_eq!(
            manager.state.read().expect("lock").current_workspace,
            3
        );
    }

    #[test]
    fn unbound_keypress_does_nothing() {
        let (mut manager, _handle) = Manager::new_test(Config::default());
        assert!(!manager.display_event_handler(ServerEvent::KeyPress {
            keycode: 99,
            modmask: 0,
        }));
    }

    #[test]
    fn button_press_focuses_the_clicked_window() {
        let (mut manager, _handle) = Manager::new_test(Config::default());
        manager.display_event_handler(map_request(1));
        manager.display_event_handler(map_request(2));
        assert!(manager.display_event_handler(ServerEvent::ButtonPress {
            button: 1,
            modmask: 0,
            window: Some(WindowHandle(1)),
        }));
        assert_eq!(
            manager.state.read().expect("lock").focused,
            Some(WindowHandle(1))
        );
    }

    #[test]
    fn floating_configure_request_moves_the_window() {
        let (mut manager, _handle) = Manager::new_test(Config::default());
        manager.display_event_handler(map_request(1));
        manager
            .state
            .write()
            .expect("lock")
            .set_floating(WindowHandle(1), true)
            .expect("float");
        let rect = Rect::new(30, 40, 500, 400);
        assert!(manager.display_event_handler(ServerEvent::ConfigureRequest {
            window: WindowHandle(1),
            rect,
        }));
        assert_eq!(
            manager.state.read().expect("lock").windows[&WindowHandle(1)].floating,
            rect
        );
    }
}
