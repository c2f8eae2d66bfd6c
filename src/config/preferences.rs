//! Preferencia de tema
//!
//! Único estado local persistido por el dashboard: `{"theme": "light" | "dark"}`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::utils::errors::AppResult;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ThemePreference {
    pub theme: Theme,
}

impl ThemePreference {
    /// Carga la preferencia; si el fichero no existe se usa `light`
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            debug!("🎨 Sin preferencia de tema en {}, usando light", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        debug!("🎨 Tema {:?} guardado en {}", self.theme, path.display());
        Ok(())
    }
}
