//! Theme selection with explicit, injected persistence
//!
//! Theme state is a value owned by whoever renders, not a process-wide
//! global. Persistence goes through a `ThemeStore` collaborator so the
//! embedded page (browser storage) and tests (memory) share the exact
//! same semantics.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Storage key the embedded page persists the choice under
pub const STORAGE_KEY: &str = "theme";

/// Selected appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light appearance
    Light,
    /// Dark appearance
    Dark,
    /// Follow the host's preference
    System,
}

impl Theme {
    /// Stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    /// Parse the stored string form
    pub fn from_name(name: &str) -> Option<Theme> {
        match name {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            "system" => Some(Theme::System),
            _ => None,
        }
    }
}

/// Persists the theme choice across sessions
pub trait ThemeStore: Send + Sync {
    /// Previously stored theme, if any
    fn load(&self) -> Option<Theme>;
    /// Persist the given theme
    fn save(&self, theme: Theme);
}

/// In-memory store, used by the terminal client and tests
#[derive(Debug, Default)]
pub struct MemoryThemeStore {
    stored: Mutex<Option<Theme>>,
}

impl MemoryThemeStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> Option<Theme> {
        *self.stored.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn save(&self, theme: Theme) {
        *self.stored.lock().unwrap_or_else(|e| e.into_inner()) = Some(theme);
    }
}

/// Holds the current theme and keeps the store in sync
pub struct ThemeManager {
    current: Theme,
    store: Arc<dyn ThemeStore>,
}

impl ThemeManager {
    /// Create a manager that starts from the stored theme, defaulting to
    /// `System` when nothing is stored
    pub fn new(store: Arc<dyn ThemeStore>) -> Self {
        Self::with_default(store, Theme::System)
    }

    /// Create a manager with an explicit fallback theme
    pub fn with_default(store: Arc<dyn ThemeStore>, default: Theme) -> Self {
        let current = store.load().unwrap_or(default);
        Self { current, store }
    }

    /// The selected theme
    pub fn current(&self) -> Theme {
        self.current
    }

    /// Select a theme and persist it
    pub fn set(&mut self, theme: Theme) {
        self.current = theme;
        self.store.save(theme);
    }

    /// Resolve `System` against the host's light/dark preference
    pub fn resolved(&self, system_pref: Theme) -> Theme {
        match self.current {
            Theme::System => system_pref,
            explicit => explicit,
        }
    }
}
