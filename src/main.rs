use anyhow::{Context, Result};
use hibridwm::{
    place_runtime_file, CommandSocket, Config, ConfigWatcher, EventSocket, HeadlessSession,
    Manager, ServerSession,
};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    info!("hibridwm booting...");

    let config = Config::load(&config_file()?).context("could not load config")?;

    let command_file = place_runtime_file("command.sock").context("no runtime dir for sockets")?;
    let event_file = place_runtime_file("events.sock").context("no runtime dir for sockets")?;

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let mut command_socket = CommandSocket::default();
    command_socket
        .listen(command_file.clone(), command_tx.clone())
        .await
        .context("could not bind command socket")?;
    let mut event_socket = EventSocket::listen(event_file.clone())
        .await
        .context("could not bind event socket")?;
    info!(
        "listening on {} / {}",
        command_file.display(),
        event_file.display()
    );

    let session = HeadlessSession::connect(&config).context("could not start session")?;
    let mut manager = Manager::new(config, session, command_tx.clone());
    manager.register_bindings();

    let cancel = CancellationToken::new();
    let watcher_task = {
        let watcher = ConfigWatcher::new(config_file()?);
        let tx = command_tx.clone();
        let cancel = cancel.clone();
        tokio::spawn(watcher.watch(tx, cancel))
    };
    if let Some(script) = manager.config.config_script.clone() {
        hibridwm::run_config_script(Some(&script), &command_tx).await;
    }

    let signal_task = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received, shutting down");
                cancel.cancel();
            }
        })
    };

    manager.event_loop(command_rx, Some(&event_socket), &cancel).await;

    command_socket.shutdown().await;
    event_socket.shutdown().await;
    watcher_task.await.ok();
    signal_task.abort();
    signal_task.await.ok();
    info!("hibridwm stopped");
    Ok(())
}

fn config_file() -> Result<PathBuf> {
    let base = xdg::BaseDirectories::with_prefix("hibridwm")
        .context("could not resolve XDG base directories")?;
    base.place_config_file("config.toml")
        .context("could not create config directory")
}
