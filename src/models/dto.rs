//! Typed notifications broadcast to event-stream subscribers.
//!
//! Serialized as one JSON object per line with the shape
//! `{"event": <type>, "payload": <object>}`.
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum WmEvent {
    /// The visible workspace changed, or workspace occupancy changed.
    Workspace { index: usize, occupied: Vec<usize> },
    /// Focus moved to a window.
    Focus { win: u32, title: String },
    /// The bar strut was shown or hidden.
    BarToggle { visible: bool },
}
