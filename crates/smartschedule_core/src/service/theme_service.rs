//! Explicit light/dark theme choice.
//!
//! # Invariants
//! - Only `"dark"` and `"light"` are ever written.
//! - Without an explicit choice the system color-scheme signal wins.

use crate::storage::{KvStore, StorageResult};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeChoice {
    Dark,
    Light,
}

impl ThemeChoice {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Theme implied by the system preference signal.
    pub fn from_system(prefers_dark: bool) -> Self {
        if prefers_dark {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeError {
    Unknown(String),
}

impl Display for ThemeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown(value) => write!(f, "unknown theme `{value}`; expected dark|light"),
        }
    }
}

impl Error for ThemeError {}

impl FromStr for ThemeChoice {
    type Err = ThemeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(ThemeError::Unknown(other.to_string())),
        }
    }
}

/// Reads and writes the explicit theme choice through the shared store.
pub struct ThemeService<S: KvStore> {
    storage: S,
    key: String,
}

impl<S: KvStore> ThemeService<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Last explicit choice, if one is stored and readable.
    pub fn explicit_choice(&self) -> Option<ThemeChoice> {
        match self.storage.get(&self.key) {
            Ok(Some(raw)) => match raw.parse::<ThemeChoice>() {
                Ok(choice) => Some(choice),
                Err(err) => {
                    debug!("event=theme_load module=theme status=ignored error={err}");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!("event=theme_load module=theme status=error error={err}");
                None
            }
        }
    }

    pub fn set_choice(&self, choice: ThemeChoice) -> StorageResult<()> {
        self.storage.set(&self.key, choice.as_str())
    }

    /// Forgets the explicit choice so the system preference applies again.
    pub fn clear_choice(&self) -> StorageResult<()> {
        self.storage.remove(&self.key)
    }

    /// Effective theme: explicit choice first, then the system signal.
    pub fn resolve(&self, system_prefers_dark: bool) -> ThemeChoice {
        self.explicit_choice()
            .unwrap_or_else(|| ThemeChoice::from_system(system_prefers_dark))
    }

    /// Flips the effective theme and stores the result as the explicit choice.
    pub fn toggle(&self, system_prefers_dark: bool) -> StorageResult<ThemeChoice> {
        let next = self.resolve(system_prefers_dark).toggled();
        self.set_choice(next)?;
        Ok(next)
    }
}
