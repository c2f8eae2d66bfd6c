//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del cliente
//! y su conversión a mensajes legibles para el usuario.

use thiserror::Error;

use crate::services::form_validation::ValidationReport;
use crate::utils::locale::{t, MessageKey};

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(ValidationReport),

    #[error("Invalid field value: {0}")]
    InvalidField(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// Texto que se muestra en el toast
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(report) => report
                .errors
                .values()
                .next()
                .cloned()
                .unwrap_or_else(|| t(MessageKey::ErrorGeneric).to_string()),
            AppError::Network(e) => e.to_string(),
            AppError::NotFound(msg) | AppError::Gateway(msg) => msg.clone(),
            AppError::InvalidField(msg) | AppError::Config(msg) => msg.clone(),
            AppError::InvalidTransition(_)
            | AppError::Cancelled
            | AppError::Io(_)
            | AppError::Serialization(_) => t(MessageKey::ErrorGeneric).to_string(),
        }
    }

    /// Los errores de validación no generan toast: se muestran en línea
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de transición de vista
pub fn transition_error(action: &str, current: &str) -> AppError {
    AppError::InvalidTransition(format!("cannot {} while {}", action, current))
}
