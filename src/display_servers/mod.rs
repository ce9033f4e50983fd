//! The boundary to the windowing protocol. The core only ever talks to a
//! [`ServerSession`]; the real transport lives outside this crate.
use crate::config::Config;
use crate::display_action::DisplayAction;
use crate::display_event::ServerEvent;
use crate::errors::Result;
use crate::models::WindowHandle;
use futures::prelude::*;
use std::pin::Pin;

mod headless_session;
#[cfg(test)]
mod mock_session;

pub use headless_session::HeadlessSession;
#[cfg(test)]
pub use mock_session::{MockSession, MockSessionHandle};

pub trait ServerSession {
    /// Establish the session.
    ///
    /// # Errors
    ///
    /// [`crate::errors::WmError::ProtocolConnect`]; fatal at startup.
    fn connect(config: &Config) -> Result<Self>
    where
        Self: Sized;

    fn root(&self) -> WindowHandle;

    fn grab_key(&mut self, keycode: u16, modmask: u16);

    fn grab_button(&mut self, button: u8, modmask: u16);

    /// Resolves when [`Self::next_events`] has something to yield. The
    /// returned future owns its state so the caller may keep mutating the
    /// session while polling.
    fn wait_readable(&self) -> Pin<Box<dyn Future<Output = ()> + Send>>;

    fn next_events(&mut self) -> Vec<ServerEvent>;

    fn execute_action(&mut self, action: DisplayAction);

    fn flush(&mut self) {}

    fn disconnect(&mut self) {}
}
