//! Persisted theme preference
//!
//! `ThemePreference` is the only writer of the stored theme value and of the
//! root-level `dark` marker. Storage failures never surface to the user: the
//! preference keeps working in memory and the failure is logged.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

/// The two supported themes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark(is_dark: bool) -> Self {
        if is_dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// Interpret a stored value; anything but `"dark"` means light
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    /// The literal written to storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ThemeError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

/// Durable key-value storage for the theme flag
pub trait ThemeStorage {
    fn load(&self, key: &str) -> Result<Option<String>, ThemeError>;
    fn store(&self, key: &str, value: &str) -> Result<(), ThemeError>;
}

/// The cascading root-level marker that re-themes every styled element
pub trait ThemeMarker {
    fn apply(&self, dark: bool);
    fn is_dark(&self) -> bool;
}

impl<T: ThemeStorage + ?Sized> ThemeStorage for Rc<T> {
    fn load(&self, key: &str) -> Result<Option<String>, ThemeError> {
        (**self).load(key)
    }

    fn store(&self, key: &str, value: &str) -> Result<(), ThemeError> {
        (**self).store(key, value)
    }
}

impl<T: ThemeMarker + ?Sized> ThemeMarker for Rc<T> {
    fn apply(&self, dark: bool) {
        (**self).apply(dark)
    }

    fn is_dark(&self) -> bool {
        (**self).is_dark()
    }
}

/// In-memory storage; the degraded fallback when durable storage is missing
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ThemeStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, ThemeError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn store(&self, key: &str, value: &str) -> Result<(), ThemeError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Marker that only remembers its state (used when there is no document root)
#[derive(Debug, Default)]
pub struct DetachedMarker {
    dark: std::cell::Cell<bool>,
}

impl ThemeMarker for DetachedMarker {
    fn apply(&self, dark: bool) {
        self.dark.set(dark);
    }

    fn is_dark(&self) -> bool {
        self.dark.get()
    }
}

/// Process-wide theme owner
pub struct ThemePreference {
    storage: Box<dyn ThemeStorage>,
    marker: Box<dyn ThemeMarker>,
    key: String,
    theme: Theme,
}

impl ThemePreference {
    /// Read the stored theme once and apply it to the marker
    pub fn init(
        storage: Box<dyn ThemeStorage>,
        marker: Box<dyn ThemeMarker>,
        key: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let theme = match storage.load(&key) {
            Ok(value) => Theme::from_stored(value.as_deref()),
            Err(e) => {
                log::warn!("Theme read failed, using light: {}", e);
                Theme::Light
            }
        };
        marker.apply(theme.is_dark());
        log::debug!("Theme initialised: {}", theme.as_str());

        Self {
            storage,
            marker,
            key,
            theme,
        }
    }

    pub fn read(&self) -> bool {
        self.theme.is_dark()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Persist and apply the theme; storage failure keeps the in-memory value
    pub fn set(&mut self, dark: bool) {
        let theme = Theme::from_dark(dark);
        self.theme = theme;
        self.marker.apply(dark);
        if let Err(e) = self.storage.store(&self.key, theme.as_str()) {
            log::warn!("Theme not persisted: {}", e);
        }
    }

    /// Flip the theme and return the new dark flag
    pub fn toggle(&mut self) -> bool {
        let dark = !self.read();
        self.set(dark);
        dark
    }
}
