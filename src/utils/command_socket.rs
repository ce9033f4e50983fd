//! Line-oriented command channel over a Unix socket.
//!
//! Any number of clients may connect; each line is parsed and, when it
//! decodes, enqueued for the single-writer loop before the ack goes out.
//! `OK` therefore means accepted, not yet applied. Lines that fail to
//! decode get `ERR <reason>` and the connection stays open.
use crate::command::{parse_command, Command};
use crate::errors::Result;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error};

#[derive(Debug, Default)]
pub struct CommandSocket {
    listener: Option<tokio::task::JoinHandle<()>>,
    socket_file: PathBuf,
}

impl Drop for CommandSocket {
    fn drop(&mut self) {
        assert!(
            std::thread::panicking() || self.listener.is_none(),
            "CommandSocket has to be shutdown explicitly before drop"
        );
    }
}

impl CommandSocket {
    /// Bind the socket and start accepting clients. A stale socket file
    /// from a previous run is removed first.
    ///
    /// # Errors
    ///
    /// Errors if the socket file cannot be bound, which is usually a
    /// permissions problem on the runtime directory.
    pub async fn listen(
        &mut self,
        socket_file: PathBuf,
        tx: mpsc::UnboundedSender<Command>,
    ) -> Result<()> {
        self.socket_file = socket_file;
        let listener = if let Ok(l) = UnixListener::bind(&self.socket_file) {
            l
        } else {
            fs::remove_file(&self.socket_file).await?;
            UnixListener::bind(&self.socket_file)?
        };

        self.listener = Some(tokio::spawn(async move {
            let mut connections = JoinSet::new();
            loop {
                match listener.accept().await {
                    Ok((peer, _)) => {
                        let tx = tx.clone();
                        connections.spawn(async move {
                            if let Err(err) = serve_client(peer, tx).await {
                                debug!("command client dropped: {err}");
                            }
                        });
                    }
                    Err(e) => error!("Accept failed = {:?}", e),
                }
                // open connections are aborted with this task on shutdown
                while connections.try_join_next().is_some() {}
            }
        }));
        Ok(())
    }

    /// Explicitly shutdown to stop the accept loop and remove the socket.
    pub async fn shutdown(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
            listener.await.ok();
            fs::remove_file(self.socket_file.as_path()).await.ok();
        }
    }
}

async fn serve_client(peer: UnixStream, tx: mpsc::UnboundedSender<Command>) -> Result<()> {
    let (read_half, mut write_half) = peer.into_split();
    let mut lines = BufReader::new(read_half).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let ack = match parse_command(&line) {
            Ok(command) => {
                debug!("received command: {command:?}");
                if tx.send(command).is_err() {
                    return Ok(());
                }
                "OK\n".to_string()
            }
            Err(err) => format!("ERR {}\n", err.ack_reason()),
        };
        write_half.write_all(ack.as_bytes()).await?;
    }
    Ok(())
}
