pub mod child_process;
pub mod command_socket;
pub mod config_watcher;
pub mod event_socket;
