//! A session with no display behind it. Never yields events; actions are
//! logged and dropped. Lets the manager run driven purely by the command
//! channel, which is also how the binary starts when no backend is wired in.
use super::ServerSession;
use crate::config::Config;
use crate::display_action::DisplayAction;
use crate::display_event::ServerEvent;
use crate::errors::Result;
use crate::models::WindowHandle;
use futures::prelude::*;
use std::pin::Pin;

#[derive(Debug, Default)]
pub struct HeadlessSession {
    root: WindowHandle,
}

impl ServerSession for HeadlessSession {
    fn connect(_config: &Config) -> Result<Self> {
        Ok(Self::default())
    }

    fn root(&self) -> WindowHandle {
        self.root
    }

    fn grab_key(&mut self, keycode: u16, modmask: u16) {
        tracing::trace!("grab key {keycode} mask {modmask}");
    }

    fn grab_button(&mut self, button: u8, modmask: u16) {
        tracing::trace!("grab button {button} mask {modmask}");
    }

    fn wait_readable(&self) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        Box::pin(future::pending())
    }

    fn next_events(&mut self) -> Vec<ServerEvent> {
        vec![]
    }

    fn execute_action(&mut self, action: DisplayAction) {
        tracing::trace!("headless action: {action:?}");
    }
}
