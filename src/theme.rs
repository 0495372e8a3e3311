use crate::error::Result;
use crate::storage::{Storage, THEME_KEY};
use serde::{Deserialize, Serialize};

/// Dashboard color scheme, persisted under its own storage key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Icon class shown on the theme toggle.
    pub fn icon(self) -> &'static str {
        match self {
            Theme::Light => "bi bi-sun-fill",
            Theme::Dark => "bi bi-moon-fill",
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Stored preference; anything but `"dark"` is light.
    pub fn load(storage: &dyn Storage) -> Result<Theme> {
        Ok(match storage.get(THEME_KEY)?.as_deref() {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        })
    }

    pub fn persist(self, storage: &mut dyn Storage) -> Result<()> {
        storage.set(THEME_KEY, self.as_str())
    }
}
