//! Abstract protocol events the core reacts to. The transport that produces
//! them is an external collaborator behind [`crate::ServerSession`].
use crate::models::{Rect, WindowHandle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// A client window wants to map; carries the metadata rules match on.
    MapRequest {
        window: WindowHandle,
        class: String,
        title: String,
    },
    UnmapNotify(WindowHandle),
    ConfigureRequest {
        window: WindowHandle,
        rect: Rect,
    },
    KeyPress {
        keycode: u16,
        modmask: u16,
    },
    ButtonPress {
        button: u8,
        modmask: u16,
        window: Option<WindowHandle>,
    },
}
