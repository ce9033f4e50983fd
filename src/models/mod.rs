pub mod dto;
mod monitor;
mod rect;
mod rules;
mod window;
mod workspace;

pub use dto::WmEvent;
pub use monitor::Monitor;
pub use rect::Rect;
pub use rules::{RelativeArea, Rule, Rules};
pub use window::{BorderKind, Decoration, DisplayMode, Window, WindowHandle};
pub use workspace::Workspace;
