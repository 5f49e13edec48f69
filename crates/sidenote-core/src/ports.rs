//! Fire-and-forget collaborators the sidebar drives.

use std::sync::{Arc, Mutex};

use crate::models::Route;

/// Client-side router
pub trait Navigator {
    /// Request navigation to `route`
    fn push(&self, route: Route);
}

/// Global command palette
pub trait CommandPalette {
    /// Show the palette
    fn open(&self);
}

/// Navigator that remembers every pushed route
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    routes: Arc<Mutex<Vec<Route>>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes pushed so far, oldest first
    #[must_use]
    pub fn routes(&self) -> Vec<Route> {
        self.routes
            .lock()
            .map(|routes| routes.clone())
            .unwrap_or_default()
    }

    /// Most recently pushed route
    #[must_use]
    pub fn last(&self) -> Option<Route> {
        self.routes().pop()
    }
}

impl Navigator for RecordingNavigator {
    fn push(&self, route: Route) {
        tracing::debug!(%route, "Navigation requested");
        if let Ok(mut routes) = self.routes.lock() {
            routes.push(route);
        }
    }
}

/// Palette that counts how often it was opened
#[derive(Debug, Clone, Default)]
pub struct RecordingPalette {
    opened: Arc<Mutex<usize>>,
}

impl RecordingPalette {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn open_count(&self) -> usize {
        self.opened.lock().map(|opened| *opened).unwrap_or_default()
    }
}

impl CommandPalette for RecordingPalette {
    fn open(&self) {
        if let Ok(mut opened) = self.opened.lock() {
            *opened += 1;
        }
    }
}
