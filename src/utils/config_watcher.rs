//! Config reloads driven by a user script.
//!
//! The configured script is executed and every line it prints to stdout is
//! parsed as a command and fed into the single-writer queue, so a reload is
//! just another batch of commands. A filesystem watcher on the config file
//! triggers the same script automatically.
use crate::command::{parse_command, Command};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// How long to sit on a filesystem event before reloading, so editors that
/// write-then-rename produce one reload instead of several.
const DEBOUNCE: Duration = Duration::from_millis(200);

/// Run the config script (if any) and pipe its stdout into the command queue.
///
/// A missing script is a logged no-op. Lines that fail to parse are skipped
/// with a warning; the rest of the batch still applies.
pub async fn run_config_script(script: Option<&Path>, tx: &mpsc::UnboundedSender<Command>) {
    let Some(script) = script else {
        debug!("no config script set, reload is a no-op");
        return;
    };
    info!("running config script {}", script.display());
    let child = process::Command::new("sh")
        .arg(script.as_os_str())
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::null())
        .spawn();
    let mut child = match child {
        Ok(child) => child,
        Err(err) => {
            error!("could not run config script {}: {err}", script.display());
            return;
        }
    };
    let Some(stdout) = child.stdout.take() else {
        return;
    };
    let mut lines = BufReader::new(stdout).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_command(line) {
            Ok(command) => {
                if tx.send(command).is_err() {
                    return;
                }
            }
            Err(err) => warn!("config script line rejected: {err}"),
        }
    }
    if let Err(err) = child.wait().await {
        warn!("config script did not exit cleanly: {err}");
    }
}

/// Watches the config file and requests a reload when it changes.
pub struct ConfigWatcher {
    path: PathBuf,
}

impl ConfigWatcher {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Watch until cancelled. Change notifications within one debounce
    /// window coalesce into a single `reload-config`.
    pub async fn watch(self, tx: mpsc::UnboundedSender<Command>, cancel: CancellationToken) {
        let (notify_tx, mut notify_rx) = mpsc::unbounded_channel();
        let mut watcher: RecommendedWatcher =
            match notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
                match res {
                    Ok(event) if event.kind.is_create() || event.kind.is_modify() => {
                        let _ = notify_tx.send(());
                    }
                    Ok(_) => {}
                    Err(err) => error!("config watcher error: {err}"),
                }
            }) {
                Ok(watcher) => watcher,
                Err(err) => {
                    error!("could not create config watcher: {err}");
                    return;
                }
            };
        // Watch the parent directory: editors replace the file on save,
        // which would drop a watch on the file itself.
        let target = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        if let Err(err) = watcher.watch(target, RecursiveMode::NonRecursive) {
            error!("could not watch {}: {err}", target.display());
            return;
        }
        info!("watching {} for changes", self.path.display());

        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                changed = notify_rx.recv() => {
                    if changed.is_none() {
                        break;
                    }
                    // swallow the burst
                    tokio::time::sleep(DEBOUNCE).await;
                    while notify_rx.try_recv().is_ok() {}
                    debug!("config changed, requesting reload");
                    if tx.send(Command::ReloadConfig).is_err() {
                        break;
                    }
                }
            }
        }
    }
}
