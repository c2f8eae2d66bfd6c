use serde::{Deserialize, Serialize};

use crate::dto::vehicle_dto::coerce_integer;
use crate::utils::errors::{AppError, AppResult};

// Borrador del formulario "Add Maintenance"; body de POST /maintenance/{vehicleId}
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceDraft {
    pub date: String,
    pub description: String,
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mileage: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_center: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_due_date: Option<String>,
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl MaintenanceDraft {
    /// Actualiza un campo a partir del nombre del input y su valor en texto
    pub fn set_field(&mut self, name: &str, raw: &str) -> AppResult<()> {
        match name {
            "date" => self.date = raw.to_string(),
            "description" => self.description = raw.to_string(),
            "cost" => {
                self.cost = non_empty(raw).map(|value| value.parse::<f64>().unwrap_or(0.0))
            }
            "mileage" => self.mileage = non_empty(raw).map(|value| coerce_integer(&value)),
            "serviceCenter" => self.service_center = non_empty(raw),
            "notes" => self.notes = non_empty(raw),
            "nextDueDate" => self.next_due_date = non_empty(raw),
            other => {
                return Err(AppError::InvalidField(format!(
                    "unknown maintenance field '{}'",
                    other
                )))
            }
        }
        Ok(())
    }
}
