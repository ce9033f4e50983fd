//! Scriptable session for tests: events are injected through a
//! [`MockSessionHandle`], executed actions are recorded for assertions.
use super::ServerSession;
use crate::config::Config;
use crate::display_action::DisplayAction;
use crate::display_event::ServerEvent;
use crate::errors::Result;
use crate::models::WindowHandle;
use futures::prelude::*;
use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Clone, Default)]
pub struct MockSessionHandle {
    queue: Arc<Mutex<VecDeque<ServerEvent>>>,
    notify: Arc<Notify>,
    actions: Arc<Mutex<Vec<DisplayAction>>>,
}

impl MockSessionHandle {
    pub fn push_event(&self, event: ServerEvent) {
        self.queue.lock().expect("poisoned").push_back(event);
        self.notify.notify_one();
    }

    pub fn actions(&self) -> Vec<DisplayAction> {
        self.actions.lock().expect("poisoned").clone()
    }
}

pub struct MockSession {
    handle: MockSessionHandle,
}

impl MockSession {
    pub fn with_handle() -> (Self, MockSessionHandle) {
        let handle = MockSessionHandle::default();
        (
            Self {
                handle: handle.clone(),
            },
            handle,
        )
    }
}

impl ServerSession for MockSession {
    fn connect(_config: &Config) -> Result<Self> {
        Ok(Self::with_handle().0)
    }

    fn root(&self) -> WindowHandle {
        WindowHandle(0)
    }

    fn grab_key(&mut self, _keycode: u16, _modmask: u16) {}

    fn grab_button(&mut self, _button: u8, _modmask: u16) {}

    fn wait_readable(&self) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        let queue = self.handle.queue.clone();
        let notify = self.handle.notify.clone();
        Box::pin(async move {
            loop {
                if !queue.lock().expect("poisoned").is_empty() {
                    return;
                }
                notify.notified().await;
            }
        })
    }

    fn next_events(&mut self) -> Vec<ServerEvent> {
        self.handle.queue.lock().expect("poisoned").drain(..).collect()
    }

    fn execute_action(&mut self, action: DisplayAction) {
        self.handle.actions.lock().expect("poisoned").push(action);
    }
}
