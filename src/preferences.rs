//! User preference flags kept in local storage.

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::storage::{LocalStorage, SOUND_KEY, THEME_KEY};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
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
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(format!("unknown theme: {}", other)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Preferences {
    pub theme: Theme,
    pub sound: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            sound: true,
        }
    }
}

impl Preferences {
    /// Read preferences, falling back to defaults for missing or unknown values.
    pub fn load(storage: &LocalStorage) -> Self {
        let defaults = Self::default();

        let theme = storage
            .get(THEME_KEY)
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.theme);

        let sound = match storage.get(SOUND_KEY).as_deref() {
            Some("true") => true,
            Some("false") => false,
            _ => defaults.sound,
        };

        Self { theme, sound }
    }

    /// Write both flags. Failures are logged; preferences are not critical.
    pub fn save(&self, storage: &LocalStorage) {
        let sound = if self.sound { "true" } else { "false" };

        for (key, value) in [(THEME_KEY, self.theme.as_str()), (SOUND_KEY, sound)] {
            if let Err(e) = storage.set(key, value) {
                warn!(key, error = %e, "Failed to save preference");
            }
        }
    }
}
