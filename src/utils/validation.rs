//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de campos
//! y conversión de fechas. Cada helper devuelve un `ValidationError`
//! con un código y parámetros; el motor de formularios los traduce a texto.

use chrono::{DateTime, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use validator::ValidationError;

lazy_static! {
    /// Caracteres aceptados en una matrícula
    pub static ref LICENSE_PLATE_CHARS: Regex = Regex::new(r"^[A-Za-z0-9 ]*$").unwrap();
    /// Caracteres aceptados en un color
    pub static ref COLOR_CHARS: Regex = Regex::new(r"^[A-Za-z ]*$").unwrap();
}

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar una fecha que puede venir como `YYYY-MM-DD` o RFC3339
pub fn validate_calendar_date(value: &str) -> Result<NaiveDate, ValidationError> {
    validate_date(value).or_else(|date_error| {
        DateTime::parse_from_rfc3339(value.trim())
            .map(|dt| dt.date_naive())
            .map_err(|_| date_error)
    })
}

/// Conversión tolerante usada por los modelos
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    validate_calendar_date(value).ok()
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar longitud exacta en caracteres
pub fn validate_exact_length(value: &str, expected: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len != expected {
        let mut error = ValidationError::new("length");
        error.add_param("expected".into(), &expected);
        error.add_param("actual".into(), &len);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor esté en un rango específico
pub fn validate_range<T: PartialOrd + std::fmt::Display + Serialize>(
    value: T,
    min: T,
    max: T,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        let mut error = ValidationError::new("range");
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea distinto de cero
pub fn validate_non_zero<T: PartialEq + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value.is_zero() {
        let mut error = ValidationError::new("non_zero");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor no supere un umbral de plausibilidad
pub fn validate_at_most<T: PartialOrd + std::fmt::Display + Serialize>(
    value: T,
    max: T,
) -> Result<(), ValidationError> {
    if value > max {
        let mut error = ValidationError::new("at_most");
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que una fecha no sea posterior a un límite
pub fn validate_not_after(date: NaiveDate, limit: NaiveDate) -> Result<(), ValidationError> {
    if date > limit {
        let mut error = ValidationError::new("not_after");
        error.add_param("value".into(), &date.to_string());
        error.add_param("limit".into(), &limit.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que una fecha sea estrictamente posterior a otra
pub fn validate_strictly_after(date: NaiveDate, bound: NaiveDate) -> Result<(), ValidationError> {
    if date <= bound {
        let mut error = ValidationError::new("strictly_after");
        error.add_param("value".into(), &date.to_string());
        error.add_param("bound".into(), &bound.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar un string contra un patrón de caracteres
pub fn validate_pattern(value: &str, pattern: &Regex) -> Result<(), ValidationError> {
    if !pattern.is_match(value) {
        let mut error = ValidationError::new("pattern");
        error.add_param("value".into(), &value.to_string());
        error.add_param("pattern".into(), &pattern.as_str().to_string());
        return Err(error);
    }
    Ok(())
}
