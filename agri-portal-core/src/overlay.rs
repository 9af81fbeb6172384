//! Page scroll lock
//!
//! Page scrolling is suppressed while any modal-like overlay is open (the
//! mobile navigation menu or the embedded-service session) and restored only
//! once none are.

use std::collections::BTreeSet;

/// Modal-like overlays that hold the scroll lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Overlay {
    NavigationMenu,
    ServiceSession,
}

#[derive(Debug, Default, Clone)]
pub struct ScrollLock {
    open: BTreeSet<Overlay>,
}

impl ScrollLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an overlay as open or closed. Returns true if the lock state changed.
    pub fn set(&mut self, overlay: Overlay, open: bool) -> bool {
        let was_locked = self.is_locked();
        if open {
            self.open.insert(overlay);
        } else {
            self.open.remove(&overlay);
        }
        was_locked != self.is_locked()
    }

    pub fn is_open(&self, overlay: Overlay) -> bool {
        self.open.contains(&overlay)
    }

    pub fn is_locked(&self) -> bool {
        !self.open.is_empty()
    }
}
