//! Display state for one exploring session
//!
//! Holds what a map front end needs to render (viewport, pin, current
//! location) and applies query outcomes to it. Failures never blank a
//! successful state, except that a failed random query removes the pin so
//! no stale marker is left behind.

use crate::constants::region::{INITIAL_CENTER, INITIAL_ZOOM};
use crate::coord::validate::is_valid;
use crate::coord::Coordinates;
use crate::explorer::{QueryKind, ResolvedLocation};
use crate::history::{History, HistoryItem};
use serde::Serialize;

/// Zoom while a targeted query is in flight, and for restored entries
pub const HINT_ZOOM: u8 = 14;

/// Zoom on a freshly resolved location
pub const RESOLVED_ZOOM: u8 = 15;

/// Map center and zoom
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: Coordinates,
    pub zoom: u8,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: INITIAL_CENTER,
            zoom: INITIAL_ZOOM,
        }
    }
}

/// Render state for a front end
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    pub viewport: Viewport,
    pub pin: Option<Coordinates>,
    pub location: Option<ResolvedLocation>,
    /// Index of the displayed history entry, 0 being the newest
    pub history_index: usize,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// A query is starting
    ///
    /// Random queries hide the pin and leave the map where it is; targeted
    /// queries show the hint right away.
    pub fn begin(&mut self, kind: QueryKind, hint: Option<Coordinates>) {
        self.location = None;

        match (kind, hint) {
            (QueryKind::Targeted, Some(hint)) if is_valid(Some(&hint)) => {
                self.pin = Some(hint);
                self.viewport = Viewport {
                    center: hint,
                    zoom: HINT_ZOOM,
                };
            }
            (QueryKind::Targeted, _) => {}
            (QueryKind::Random, _) => self.pin = None,
        }
    }

    /// A query resolved
    pub fn apply_success(&mut self, location: ResolvedLocation) {
        let at = location.final_coordinate;
        self.pin = Some(at);
        self.viewport = Viewport {
            center: at,
            zoom: RESOLVED_ZOOM,
        };
        self.location = Some(location);
        self.history_index = 0;
    }

    /// A query failed
    pub fn apply_failure(&mut self, kind: QueryKind) {
        if kind == QueryKind::Random {
            self.pin = None;
        }
    }

    /// Show a history entry
    ///
    /// Entries with unusable coordinates are ignored. Returns whether the
    /// entry was shown.
    pub fn restore(&mut self, item: &HistoryItem) -> bool {
        if !is_valid(Some(&item.coords)) {
            return false;
        }

        self.pin = Some(item.coords);
        self.viewport = Viewport {
            center: item.coords,
            zoom: HINT_ZOOM,
        };
        self.location = Some(item.info.clone());
        true
    }

    /// Show a history entry and remember its position
    pub fn restore_from(&mut self, history: &History, id: &str) -> bool {
        let Some(index) = history.position(id) else {
            return false;
        };
        let restored = history.at(index).is_some_and(|item| self.restore(item));
        if restored {
            self.history_index = index;
        }
        restored
    }

    /// Whether an older entry exists
    pub fn can_go_back(&self, history: &History) -> bool {
        self.history_index + 1 < history.len()
    }

    /// Step to the next older history entry, if any
    pub fn back(&mut self, history: &History) -> bool {
        let next = self.history_index + 1;
        let Some(item) = history.at(next) else {
            return false;
        };

        // Skip the index even when the entry cannot be shown
        self.history_index = next;
        self.restore(item)
    }

    /// Forget everything, as after clearing history
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
