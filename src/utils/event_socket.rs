//! JSON event feed for bars and scripts.
//!
//! Every notification is one JSON object per line, fanned out to each
//! connected subscriber over a broadcast channel. A subscriber that stops
//! reading only loses its own oldest events; it never blocks the loop or
//! the other peers.
use crate::errors::Result;
use crate::models::WmEvent;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

/// Events a slow subscriber may buffer before the oldest are dropped.
const BACKLOG: usize = 64;

#[derive(Debug)]
pub struct EventSocket {
    events: broadcast::Sender<WmEvent>,
    listener: Option<tokio::task::JoinHandle<()>>,
    socket_file: PathBuf,
}

impl Drop for EventSocket {
    fn drop(&mut self) {
        assert!(
            std::thread::panicking() || self.listener.is_none(),
            "EventSocket has to be shutdown explicitly before drop"
        );
    }
}

impl EventSocket {
    /// Bind the socket and start accepting subscribers.
    ///
    /// # Errors
    ///
    /// Errors if the socket file cannot be bound.
    pub async fn listen(socket_file: PathBuf) -> Result<Self> {
        let listener = if let Ok(l) = UnixListener::bind(&socket_file) {
            l
        } else {
            fs::remove_file(&socket_file).await?;
            UnixListener::bind(&socket_file)?
        };
        let (events, _) = broadcast::channel(BACKLOG);

        let sender = events.clone();
        let accept = tokio::spawn(async move {
            let mut writers = JoinSet::new();
            loop {
                match listener.accept().await {
                    Ok((peer, _)) => {
                        // writer tasks are aborted with this task on shutdown
                        writers.spawn(write_events(peer, sender.subscribe()));
                    }
                    Err(e) => error!("Accept failed = {:?}", e),
                }
                while writers.try_join_next().is_some() {}
            }
        });

        Ok(Self {
            events,
            listener: Some(accept),
            socket_file,
        })
    }

    /// Fan an event out to every connected subscriber. With no subscribers
    /// this is a no-op.
    pub fn publish(&self, event: WmEvent) {
        let _ = self.events.send(event);
    }

    /// Explicitly shutdown to stop accepting, abort every subscriber writer
    /// and remove the socket file.
    pub async fn shutdown(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
            listener.await.ok();
            fs::remove_file(self.socket_file.as_path()).await.ok();
        }
    }
}

async fn write_events(peer: UnixStream, mut rx: broadcast::Receiver<WmEvent>) {
    let (_, mut write_half) = peer.into_split();
    loop {
        let event = match rx.recv().await {
            Ok(event) => event,
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                warn!("event subscriber lagging, dropped {missed} events");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };
        let mut json = match serde_json::to_string(&event) {
            Ok(json) => json,
            Err(err) => {
                error!("could not serialize event: {err}");
                continue;
            }
        };
        json.push('\n');
        if write_half.write_all(json.as_bytes()).await.is_err() {
            debug!("event subscriber disconnected");
            break;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tokio::net::UnixStream;

    fn temp_socket() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("events.sock");
        (dir, path)
    }

    #[tokio::test]
    async fn subscribers_see_json_lines() {
        let (_dir, socket_file) = temp_socket();
        let mut socket = EventSocket::listen(socket_file.clone()).await.unwrap();

        let mut sub = BufReader::new(UnixStream::connect(&socket_file).await.unwrap()).lines();
        // let the writer task pick up the subscription first
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        socket.publish(WmEvent::Workspace {
            index: 2,
            occupied: vec![1, 2],
        });
        socket.publish(WmEvent::BarToggle { visible: false });

        let line = sub.next_line().await.expect("read").expect("line");
        assert_eq!(
            line,
            r#"{"event":"workspace","payload":{"index":2,"occupied":[1,2]}}"#
        );
        let line = sub.next_line().await.expect("read").expect("line");
        assert_eq!(line, r#"{"event":"bar-toggle","payload":{"visible":false}}"#);

        socket.shutdown().await;
    }

    #[tokio::test]
    async fn each_subscriber_gets_every_event() {
        let (_dir, socket_file) = temp_socket();
        let mut socket = EventSocket::listen(socket_file.clone()).await.unwrap();

        let mut first = BufReader::new(UnixStream::connect(&socket_file).await.unwrap()).lines();
        let mut second = BufReader::new(UnixStream::connect(&socket_file).await.unwrap()).lines();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        socket.publish(WmEvent::Focus {
            win: 7,
            title: "editor".to_string(),
        });

        for sub in [&mut first, &mut second] {
            let line = sub.next_line().await.expect("read").expect("line");
            assert!(line.contains(r#""event":"focus""#), "got: {line}");
            assert!(line.contains(r#""win":7"#), "got: {line}");
        }

        socket.shutdown().await;
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_fine() {
        let (_dir, socket_file) = temp_socket();
        let mut socket = EventSocket::listen(socket_file).await.unwrap();
        socket.publish(WmEvent::BarToggle { visible: true });
        socket.shutdown().await;
    }

    #[tokio::test]
    async fn shutdown_closes_subscriber_connections() {
        let (_dir, socket_file) = temp_socket();
        let mut socket = EventSocket::listen(socket_file.clone()).await.unwrap();

        let mut sub = BufReader::new(UnixStream::connect(&socket_file).await.unwrap()).lines();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        socket.publish(WmEvent::BarToggle { visible: true });
        assert!(sub.next_line().await.expect("read").is_some());

        socket.shutdown().await;
        // the writer task is gone with the socket, so the stream ends
        let eof = tokio::time::timeout(std::time::Duration::from_secs(5), sub.next_line())
            .await
            .expect("stream must end after shutdown")
            .expect("read");
        assert_eq!(eof, None);
    }

    #[tokio::test]
    async fn socket_cleanup() {
        let (_dir, socket_file) = temp_socket();
        let mut socket = EventSocket::listen(socket_file.clone()).await.unwrap();
        socket.shutdown().await;
        assert!(!socket_file.exists());
    }
}
