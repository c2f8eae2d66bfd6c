use serde::{Deserialize, Serialize};

use crate::models::vehicle::{FuelType, VehicleStatus, VehicleType};
use crate::utils::errors::{AppError, AppResult};

// Borrador del formulario "Add Vehicle"; también es el body de POST /vehicles
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDraft {
    pub make: String,
    pub model: String,
    pub year: Option<i32>,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    pub status: VehicleStatus,
    pub fuel_type: FuelType,
    pub color: String,
    pub license_plate: String,
    pub vin: String,
    pub mileage: i64,
    pub purchase_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Conversión numérica del formulario, como `parseInt`: prefijo entero
/// con signo opcional; sin dígitos vale 0
pub(crate) fn coerce_integer(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let magnitude = digits
        .chars()
        .map_while(|c| c.to_digit(10))
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(i64::from(d)));
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

impl VehicleDraft {
    /// Actualiza un campo a partir del nombre del input y su valor en texto
    pub fn set_field(&mut self, name: &str, raw: &str) -> AppResult<()> {
        match name {
            "make" => self.make = raw.to_string(),
            "model" => self.model = raw.to_string(),
            "year" => self.year = Some(coerce_integer(raw).clamp(i32::MIN as i64, i32::MAX as i64) as i32),
            "type" => self.vehicle_type = raw.parse()?,
            "status" => self.status = raw.parse()?,
            "fuelType" => self.fuel_type = raw.parse()?,
            "color" => self.color = raw.to_string(),
            "licensePlate" => self.license_plate = raw.to_string(),
            "vin" => self.vin = raw.to_string(),
            "mileage" => self.mileage = coerce_integer(raw),
            "purchaseDate" => self.purchase_date = raw.to_string(),
            "location" => {
                self.location = Some(raw.trim().to_string()).filter(|value| !value.is_empty())
            }
            other => {
                return Err(AppError::InvalidField(format!(
                    "unknown vehicle field '{}'",
                    other
                )))
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_field_coerces_numbers() {
        let mut draft = VehicleDraft::default();
        draft.set_field("year", "2022").unwrap();
        draft.set_field("mileage", "abc").unwrap();
        assert_eq!(draft.year, Some(2022));
        assert_eq!(draft.mileage, 0);

        draft.set_field("mileage", "1500.9").unwrap();
        assert_eq!(draft.mileage, 1500);
    }

    #[test]
    fn test_coerce_integer_uses_leading_digits() {
        assert_eq!(coerce_integer("12abc"), 12);
        assert_eq!(coerce_integer("  42 "), 42);
        assert_eq!(coerce_integer("-5"), -5);
        assert_eq!(coerce_integer("+7"), 7);
        assert_eq!(coerce_integer("1e3"), 1);
        assert_eq!(coerce_integer("abc12"), 0);
        assert_eq!(coerce_integer(""), 0);
    }

    #[test]
    fn test_set_field_parses_categories() {
        let mut draft = VehicleDraft::default();
        draft.set_field("type", "Truck").unwrap();
        draft.set_field("fuelType", "Diesel").unwrap();
        assert_eq!(draft.vehicle_type, VehicleType::Truck);
        assert_eq!(draft.fuel_type, FuelType::Diesel);
        assert!(draft.set_field("status", "Parked").is_err());
        assert!(draft.set_field("wheels", "4").is_err());
    }

    #[test]
    fn test_serialize_body() {
        let draft = VehicleDraft {
            make: "Ford".to_string(),
            license_plate: "GHI789".to_string(),
            vehicle_type: VehicleType::Suv,
            ..Default::default()
        };
        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(body["type"], "SUV");
        assert_eq!(body["licensePlate"], "GHI789");
        assert!(body.get("location").is_none());
    }
}
