//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación
//! de campos y los textos de la interfaz.

pub mod errors;
pub mod locale;
pub mod validation;

pub use errors::{AppError, AppResult};
