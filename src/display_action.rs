//! Actions the core asks the protocol session to perform. The session owns
//! the actual configure/reparent/draw calls.
use crate::models::{Decoration, Rect, WindowHandle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayAction {
    /// Create the frame around a newly adopted client.
    CreateFrame(WindowHandle),
    /// Tear the frame down; issued exactly once, during removal.
    DestroyFrame(WindowHandle),
    MoveResize(WindowHandle, Rect),
    Show(WindowHandle),
    Hide(WindowHandle),
    Focus(WindowHandle),
    /// Redraw decoration after a border/color change.
    RedrawFrame(WindowHandle, Decoration),
}
