//! Monitor information.
use crate::models::Rect;
use serde::{Deserialize, Serialize};

/// A physical display region with its own coordinate rectangle and assigned
/// workspaces. Exactly one of its workspaces is visible at any time.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Monitor {
    pub id: usize,
    pub rect: Rect,
    pub workspaces: Vec<usize>,
}

impl Monitor {
    #[must_use]
    pub fn new(id: usize, rect: Rect, workspaces: Vec<usize>) -> Self {
        Self {
            id,
            rect,
            workspaces,
        }
    }

    /// The rect layouts may use, after reserving the bar strut.
    #[must_use]
    pub const fn usable_rect(&self, bar_visible: bool, bar_height: i32) -> Rect {
        if bar_visible {
            Rect {
                x: self.rect.x,
                y: self.rect.y + bar_height,
                w: self.rect.w,
                h: self.rect.h - bar_height,
            }
        } else {
            self.rect
        }
    }
}
