//! The top-level controller tying the state store to a protocol session.
use crate::command::Command;
use crate::config::Config;
use crate::display_servers::ServerSession;
use crate::state::{SharedState, State};
use crate::utils::child_process::Children;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

pub struct Manager<S> {
    pub state: SharedState,
    pub config: Config,
    pub session: S,
    pub(crate) children: Children,
    /// Commands we generate ourselves (config reload output) feed back into
    /// the same single-writer queue as socket clients.
    pub(crate) command_tx: mpsc::UnboundedSender<Command>,
    pub(crate) quit_requested: bool,
}

impl<S: ServerSession> Manager<S> {
    pub fn new(config: Config, session: S, command_tx: mpsc::UnboundedSender<Command>) -> Self {
        Self {
            state: Arc::new(RwLock::new(State::new(&config))),
            config,
            session,
            children: Children::default(),
            command_tx,
            quit_requested: false,
        }
    }

    /// Register every configured key grab with the session.
    pub fn register_bindings(&mut self) {
        for bind in &self.config.keybinds {
            self.session.grab_key(bind.keycode, bind.modmask);
        }
        // click-to-focus
        self.session.grab_button(1, 0);
    }
}

#[cfg(test)]
impl Manager<crate::display_servers::MockSession> {
    pub fn new_test(config: Config) -> (Self, crate::display_servers::MockSessionHandle) {
        let (session, handle) = crate::display_servers::MockSession::with_handle();
        let (tx, _rx) = mpsc::unbounded_channel();
        (Self::new(config, session, tx), handle)
    }
}
