//! Textos de la interfaz (en-US)
//!
//! Tabla de mensajes que comparten la validación de formularios,
//! los toasts y el binario.

/// Claves de mensajes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    AppTitle,
    Loading,
    ErrorGeneric,
    NoData,
    VehicleNoneFound,
    VehicleSearchAdjust,
    VehicleNotFound,
    MaintenanceNone,
    FormRequired,
    FormDateInvalid,
    FormDateFuture,
    FormYearRange,
    FormVinLength,
    FormMileageNegative,
    FormMileageHigh,
    FormCostNegative,
    FormCostZero,
    FormCostHigh,
    FormDateNextAfter,
    FormDateNextFar,
    FormPlateCharacters,
    FormColorCharacters,
}

/// Devuelve el texto en inglés para una clave
pub fn t(key: MessageKey) -> &'static str {
    match key {
        MessageKey::AppTitle => "Fleet Management Dashboard",
        MessageKey::Loading => "Loading...",
        MessageKey::ErrorGeneric => "An error occurred. Please try again.",
        MessageKey::NoData => "No data available",
        MessageKey::VehicleNoneFound => "No Vehicle found",
        MessageKey::VehicleSearchAdjust => {
            "Try adjusting your search or filter to find what you're looking for."
        }
        MessageKey::VehicleNotFound => "Vehicle not found",
        MessageKey::MaintenanceNone => "No maintenance records available.",
        MessageKey::FormRequired => "{field} is required",
        MessageKey::FormDateInvalid => "{field} must be a valid date (YYYY-MM-DD)",
        MessageKey::FormDateFuture => "Date cannot be in the future",
        MessageKey::FormYearRange => "Year must be between {min} and {max}",
        MessageKey::FormVinLength => "VIN must be exactly 17 characters",
        MessageKey::FormMileageNegative => "Mileage cannot be negative",
        MessageKey::FormMileageHigh => "Mileage seems unusually high. Please verify.",
        MessageKey::FormCostNegative => "Cost cannot be negative",
        MessageKey::FormCostZero => "Are you sure the cost is zero?",
        MessageKey::FormCostHigh => "Cost seems unusually high. Please verify.",
        MessageKey::FormDateNextAfter => "Next due date must be after the maintenance date",
        MessageKey::FormDateNextFar => "Next due date is very far in the future. Please verify.",
        MessageKey::FormPlateCharacters => {
            "License plate should only contain letters, digits and spaces"
        }
        MessageKey::FormColorCharacters => "Color should only contain letters and spaces",
    }
}

/// Sustituye los marcadores `{nombre}` de un mensaje
pub fn t_with(key: MessageKey, params: &[(&str, &str)]) -> String {
    params
        .iter()
        .fold(t(key).to_string(), |text, (name, value)| {
            text.replace(&format!("{{{}}}", name), value)
        })
}

/// Mensaje de campo obligatorio
pub fn required(field_label: &str) -> String {
    t_with(MessageKey::FormRequired, &[("field", field_label)])
}
