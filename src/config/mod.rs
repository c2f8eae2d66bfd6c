//! Configuración del proyecto
//!
//! Este módulo contiene las variables de entorno del cliente
//! y la preferencia de tema persistida.

pub mod environment;
pub mod preferences;

pub use environment::*;
pub use preferences::{Theme, ThemePreference};
