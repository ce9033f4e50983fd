//! The single-writer consumer loop.
//!
//! Protocol events and socket commands are produced concurrently; both are
//! drained here, one at a time, so every transition runs to completion
//! before the next begins and the state store is never mutated from two
//! places at once.
use crate::command::Command;
use crate::display_servers::ServerSession;
use crate::manager::Manager;
use crate::utils::event_socket::EventSocket;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

impl<S: ServerSession> Manager<S> {
    /// Run until `quit` is received, the command queue closes, or `cancel`
    /// fires. Cancels the token on exit so sibling tasks shut down too.
    pub async fn event_loop(
        &mut self,
        mut command_rx: mpsc::UnboundedReceiver<Command>,
        publisher: Option<&EventSocket>,
        cancel: &CancellationToken,
    ) {
        loop {
            self.session.flush();
            // biased: pending protocol events always drain before the next
            // command is taken, as clients expect their commands to apply to
            // a state that has caught up with the server.
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = self.session.wait_readable() => {
                    for event in self.session.next_events() {
                        self.display_event_handler(event);
                    }
                }
                command = command_rx.recv() => match command {
                    Some(command) => {
                        self.command_handler(&command);
                    }
                    None => break,
                },
            }

            self.flush_pending(publisher);
            self.children.reap();

            if self.quit_requested {
                break;
            }
        }
        cancel.cancel();
        self.flush_pending(publisher);
        self.session.disconnect();
    }

    /// Hand queued display actions to the session and queued notifications
    /// to the publisher. Publishing happens outside the state lock.
    fn flush_pending(&mut self, publisher: Option<&EventSocket>) {
        let (actions, events) = {
            let mut state = self.state.write().expect("state lock poisoned");
            (
                state.actions.drain(..).collect::<Vec<_>>(),
                state.events.drain(..).collect::<Vec<_>>(),
            )
        };
        for action in actions {
            self.session.execute_action(action);
        }
        if let Some(publisher) = publisher {
            for event in events {
                publisher.publish(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::display_action::DisplayAction;
    use crate::display_event::ServerEvent;
    use crate::models::WindowHandle;
    use std::time::Duration;

    fn map_request(id: u32) -> ServerEvent {
        ServerEvent::MapRequest {
            window: WindowHandle(id),
            class: format!("class{id}"),
            title: String::new(),
        }
    }

    #[tokio::test]
    async fn processes_events_and_commands_until_quit() {
        let (session, handle) = crate::display_servers::MockSession::with_handle();
        let (tx, rx) = mpsc::unbounded_channel();
        let mut manager = Manager::new(Config::default(), session, tx.clone());
        let cancel = CancellationToken::new();

        handle.push_event(map_request(1));
        handle.push_event(map_request(2));
        tx.send(Command::View(2)).expect("send");
        tx.send(Command::Quit).expect("send");

        let loop_cancel = cancel.clone();
        tokio::time::timeout(Duration::from_secs(5), async {
            manager.event_loop(rx, None, &loop_cancel).await;
        })
        .await
        .expect("loop must exit on quit");

        assert!(cancel.is_cancelled());
        let state = manager.state.read().expect("lock");
        assert_eq!(state.windows.len(), 2);
        assert_eq!(state.current_workspace, 2);
        // adoption produced frames through the session
        assert!(handle
            .actions()
            .iter()
            .any(|a| *a == DisplayAction::CreateFrame(WindowHandle(1))));
    }

    #[tokio::test]
    async fn cancellation_stops_the_loop() {
        let (session, _handle) = crate::display_servers::MockSession::with_handle();
        let (tx, rx) = mpsc::unbounded_channel();
        let mut manager = Manager::new(Config::default(), session, tx);
        let cancel = CancellationToken::new();
        cancel.cancel();

        tokio::time::timeout(Duration::from_secs(5), async {
            manager.event_loop(rx, None, &cancel).await;
        })
        .await
        .expect("cancelled loop must exit");
    }

    #[tokio::test]
    async fn per_source_order_is_preserved() {
        let (session, _handle) = crate::display_servers::MockSession::with_handle();
        let (tx, rx) = mpsc::unbounded_channel();
        let mut manager = Manager::new(Config::default(), session, tx.clone());
        let cancel = CancellationToken::new();

        for ws in [2, 3, 4] {
            tx.send(Command::View(ws)).expect("send");
        }
        tx.send(Command::Quit).expect("send");
        manager.event_loop(rx, None, &cancel).await;

        // the last command wins: commands ran in order
        assert_eq!(manager.state.read().expect("lock").current_workspace, 4);
    }
}
