//! Integer geometry used for monitors, partitions and window placement.
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    #[must_use]
    pub const fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }

    /// Shrink the rect by `margin` on every side. Collapses to a zero-sized
    /// rect instead of going negative.
    #[must_use]
    pub fn shrink(&self, margin: i32) -> Self {
        let margin = margin.min(self.w / 2).min(self.h / 2);
        Self {
            x: self.x + margin,
            y: self.y + margin,
            w: self.w - 2 * margin,
            h: self.h - 2 * margin,
        }
    }

    /// Split along a vertical line. The left part gets `ratio` of the width,
    /// the right part the exact remainder so the two always cover `self`.
    #[must_use]
    pub fn split_vertical(&self, ratio: f32) -> (Self, Self) {
        let left_w = (self.w as f32 * ratio).floor() as i32;
        let left = Self::new(self.x, self.y, left_w, self.h);
        let right = Self::new(self.x + left_w, self.y, self.w - left_w, self.h);
        (left, right)
    }

    /// Split along a horizontal line, top part first.
    #[must_use]
    pub fn split_horizontal(&self, ratio: f32) -> (Self, Self) {
        let top_h = (self.h as f32 * ratio).floor() as i32;
        let top = Self::new(self.x, self.y, self.w, top_h);
        let bottom = Self::new(self.x, self.y + top_h, self.w, self.h - top_h);
        (top, bottom)
    }

    #[must_use]
    pub const fn area(&self) -> i64 {
        self.w as i64 * self.h as i64
    }

    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}
