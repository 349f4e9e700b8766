//! Item icon slots
//!
//! Icons load asynchronously and may never arrive; a missing icon only
//! means the backend paints the fallback circle instead.

use crate::sim::ItemKind;

/// Load state of one image
#[derive(Debug, Clone, Default)]
pub enum AssetSlot<T> {
    #[default]
    Loading,
    Ready(T),
    Failed,
}

impl<T> AssetSlot<T> {
    pub fn get(&self) -> Option<&T> {
        match self {
            AssetSlot::Ready(image) => Some(image),
            _ => None,
        }
    }
}

/// The two item icons, generic over the backend's image handle
#[derive(Debug, Clone)]
pub struct Assets<T> {
    pub collectible: AssetSlot<T>,
    pub hazard: AssetSlot<T>,
}

impl<T> Default for Assets<T> {
    fn default() -> Self {
        Self {
            collectible: AssetSlot::Loading,
            hazard: AssetSlot::Loading,
        }
    }
}

impl<T> Assets<T> {
    /// Icon for `kind`, if it loaded
    pub fn icon(&self, kind: ItemKind) -> Option<&T> {
        self.slot(kind).get()
    }

    pub fn slot(&self, kind: ItemKind) -> &AssetSlot<T> {
        match kind {
            ItemKind::Collectible => &self.collectible,
            ItemKind::Hazard => &self.hazard,
        }
    }

    pub fn set(&mut self, kind: ItemKind, slot: AssetSlot<T>) {
        match kind {
            ItemKind::Collectible => self.collectible = slot,
            ItemKind::Hazard => self.hazard = slot,
        }
    }

    /// Both icons available
    pub fn ready(&self) -> bool {
        self.collectible.get().is_some() && self.hazard.get().is_some()
    }

    /// Short label for the page header
    pub fn status_label(&self) -> &'static str {
        if self.ready() { "OK" } else { "loading..." }
    }
}

/// Image path for each item kind, relative to the page
pub fn icon_path(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Collectible => "/btc.png",
        ItemKind::Hazard => "/bomb.png",
    }
}
