//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del cliente del dashboard.
//! Todas las variables son opcionales y tienen un valor por defecto.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::utils::errors::{AppError, AppResult};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TOAST_DURATION_MS: u64 = 4000;
pub const DEFAULT_THEME_FILE: &str = "fleet-dashboard-theme.json";

/// Configuración del entorno
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub environment: String,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub toast_duration_ms: u64,
    pub theme_file: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            toast_duration_ms: DEFAULT_TOAST_DURATION_MS,
            theme_file: PathBuf::from(DEFAULT_THEME_FILE),
        }
    }
}

fn parse_var<T: FromStr>(name: &str, raw: Option<String>, default: T) -> AppResult<T> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a valid number, got '{}'", name, value))),
    }
}

impl DashboardConfig {
    /// Lee la configuración del entorno del proceso
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Construye la configuración a partir de una función de búsqueda de variables
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let api_base_url = lookup("FLEET_API_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.api_base_url);

        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "FLEET_API_BASE_URL must be an http(s) URL, got '{}'",
                api_base_url
            )));
        }

        Ok(Self {
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            api_base_url,
            request_timeout_secs: parse_var(
                "FLEET_API_TIMEOUT_SECS",
                lookup("FLEET_API_TIMEOUT_SECS"),
                defaults.request_timeout_secs,
            )?,
            toast_duration_ms: parse_var(
                "FLEET_TOAST_DURATION_MS",
                lookup("FLEET_TOAST_DURATION_MS"),
                defaults.toast_duration_ms,
            )?,
            theme_file: lookup("FLEET_THEME_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.theme_file),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}
