//! Core of the hibridwm window manager.
// We deny clippy pedantic lints, primarily to keep code as correct as possible
// Remember, the goal of hibridwm is to do one thing and to do that one thing
// well: Be a window manager.
#![warn(clippy::pedantic)]
// Each of these lints are globally allowed because they otherwise make a lot
// of noise. However, work to ensure that each use of one of these is correct
// would be very much appreciated.
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::must_use_candidate,
    clippy::default_trait_access
)]
pub mod command;
pub mod config;
mod display_action;
mod display_event;
pub mod display_servers;
pub mod errors;
mod event_loop;
mod handlers;
pub mod layouts;
pub mod models;
pub mod state;
pub mod utils;

mod manager;

pub use command::{parse_command, Command, Direction};
pub use config::{place_runtime_file, Config};
pub use display_action::DisplayAction;
pub use display_event::ServerEvent;
pub use display_servers::{HeadlessSession, ServerSession};
pub use errors::WmError;
pub use handlers::ScratchOutcome;
pub use manager::Manager;
pub use models::{Window, WindowHandle, WmEvent, Workspace};
pub use state::{SharedState, State};
pub use utils::child_process;
pub use utils::command_socket::CommandSocket;
pub use utils::config_watcher::{run_config_script, ConfigWatcher};
pub use utils::event_socket::EventSocket;
