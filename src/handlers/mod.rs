pub mod command_handler;
pub mod display_event_handler;
mod focus_handler;
mod window_handler;

pub use command_handler::ScratchOutcome;
