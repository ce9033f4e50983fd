//! Binary-space-partition tiling.
//!
//! [`apply`] is a pure function from an ordered window list and a rectangle
//! to per-window geometries: identical inputs always produce identical
//! output, which is what makes the layout testable in isolation.
//!
//! The first window in the list occupies the master partition; the remainder
//! recursively partitions the rest in list order. The split line alternates
//! with depth: vertical at even depth (windows side by side), horizontal at
//! odd depth (stacked). The master share of each split is `split_ratio`
//! (default 0.5).
//!
//! ```text
//! +-----------+-----------+
//! |           |     2     |
//! |     1     +-----+-----+
//! |           |  3  |  4  |
//! +-----------+-----+-----+
//! ```
use crate::models::{Rect, WindowHandle};

#[derive(Debug, Clone, Copy)]
pub struct LayoutSettings {
    pub split_ratio: f32,
    pub outer_margin: i32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            split_ratio: 0.5,
            outer_margin: 0,
        }
    }
}

/// Compute the geometry for every window in `ordered`, in list order.
///
/// Zero windows yields an empty mapping; one window occupies the whole rect
/// minus the outer margin.
#[must_use]
pub fn apply(
    ordered: &[WindowHandle],
    rect: Rect,
    settings: &LayoutSettings,
) -> Vec<(WindowHandle, Rect)> {
    let mut out = Vec::with_capacity(ordered.len());
    if ordered.is_empty() {
        return out;
    }
    let ratio = settings.split_ratio.clamp(0.1, 0.9);
    bisect(ordered, rect.shrink(settings.outer_margin), 0, ratio, &mut out);
    out
}

fn bisect(
    ordered: &[WindowHandle],
    rect: Rect,
    depth: usize,
    ratio: f32,
    out: &mut Vec<(WindowHandle, Rect)>,
) {
    match ordered {
        [] => {}
        [only] => out.push((*only, rect)),
        [master, rest @ ..] => {
            let (master_rect, rest_rect) = if depth % 2 == 0 {
                rect.split_vertical(ratio)
            } else {
                rect.split_horizontal(ratio)
            };
            out.push((*master, master_rect));
            bisect(rest, rest_rect, depth + 1, ratio, out);
        }
    }
}
