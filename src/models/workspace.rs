//! Workspace information (one screenful of windows).
use crate::models::WindowHandle;
use serde::{Deserialize, Serialize};

/// A collection of windows shown together on one monitor at a time.
///
/// The order of `tiled` is semantically meaningful: it is the BSP insertion
/// order, and the first entry is the master partition.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Workspace {
    pub index: usize,
    pub tiled: Vec<WindowHandle>,
    pub floating: Vec<WindowHandle>,
    pub monitor: usize,
    pub visible: bool,
    /// Master partition share for this workspace's BSP tree.
    pub split_ratio: f32,
}

impl Workspace {
    #[must_use]
    pub fn new(index: usize, monitor: usize, split_ratio: f32) -> Self {
        Self {
            index,
            tiled: vec![],
            floating: vec![],
            monitor,
            visible: false,
            split_ratio,
        }
    }

    #[must_use]
    pub fn contains(&self, handle: WindowHandle) -> bool {
        self.tiled.contains(&handle) || self.floating.contains(&handle)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiled.is_empty() && self.floating.is_empty()
    }

    /// Remove the handle from whichever list holds it. Returns false if the
    /// workspace did not know the window.
    pub fn remove_window(&mut self, handle: WindowHandle) -> bool {
        let before = self.tiled.len() + self.floating.len();
        self.tiled.retain(|h| *h != handle);
        self.floating.retain(|h| *h != handle);
        before != self.tiled.len() + self.floating.len()
    }

    /// Move `handle` to the front of the tiled sequence, preserving the
    /// relative order of everything else. No-op when already first or absent.
    pub fn promote(&mut self, handle: WindowHandle) -> bool {
        match self.tiled.iter().position(|h| *h == handle) {
            Some(0) | None => false,
            Some(index) => {
                self.tiled.remove(index);
                self.tiled.insert(0, handle);
                true
            }
        }
    }

    /// Exchange the list positions of two tiled windows.
    pub fn swap(&mut self, a: WindowHandle, b: WindowHandle) -> bool {
        let pa = self.tiled.iter().position(|h| *h == a);
        let pb = self.tiled.iter().position(|h| *h == b);
        match (pa, pb) {
            (Some(pa), Some(pb)) => {
                self.tiled.swap(pa, pb);
                true
            }
            _ => false,
        }
    }
}
