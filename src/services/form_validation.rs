//! Validación de formularios
//!
//! Reglas de negocio de los borradores de vehículo y de mantenimiento.
//! Todas las reglas se evalúan; los mensajes se separan en errores
//! (bloquean el envío) y avisos (solo informativos).

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::dto::maintenance_dto::MaintenanceDraft;
use crate::dto::vehicle_dto::VehicleDraft;
use crate::utils::locale::{required, t, t_with, MessageKey};
use crate::utils::validation::{
    validate_at_most, validate_calendar_date, validate_exact_length, validate_non_negative,
    validate_non_zero, validate_not_after, validate_not_empty, validate_pattern, validate_range,
    validate_strictly_after, COLOR_CHARS, LICENSE_PLATE_CHARS,
};

pub const MIN_VEHICLE_YEAR: i32 = 2000;
pub const VIN_LENGTH: usize = 17;
pub const COST_ADVISORY_LIMIT: f64 = 10_000.0;
pub const MILEAGE_ADVISORY_LIMIT: i64 = 1_000_000;
pub const NEXT_DUE_ADVISORY_MONTHS: u32 = 24;

/// Resultado de validar un borrador, por nombre de campo
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub errors: BTreeMap<String, String>,
    pub warnings: BTreeMap<String, String>,
}

impl ValidationReport {
    pub fn error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.insert(field.to_string(), message.into());
    }

    pub fn warn(&mut self, field: &str, message: impl Into<String>) {
        self.warnings.insert(field.to_string(), message.into());
    }

    /// Enviable si y solo si no hay errores bloqueantes
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn warning_for(&self, field: &str) -> Option<&str> {
        self.warnings.get(field).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.errors.clear();
        self.warnings.clear();
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

fn invalid_date(label: &str) -> String {
    t_with(MessageKey::FormDateInvalid, &[("field", label)])
}

/// Valida el borrador del formulario "Add Vehicle"
pub fn validate_vehicle(draft: &VehicleDraft, today: NaiveDate) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (field, label, value) in [
        ("make", "Make", &draft.make),
        ("model", "Model", &draft.model),
        ("licensePlate", "License Plate", &draft.license_plate),
    ] {
        if validate_not_empty(value).is_err() {
            report.error(field, required(label));
        }
    }

    let max_year = today.year() + 1;
    match draft.year {
        None => report.error("year", required("Year")),
        Some(year) => {
            if validate_range(year, MIN_VEHICLE_YEAR, max_year).is_err() {
                let (min, max) = (MIN_VEHICLE_YEAR.to_string(), max_year.to_string());
                report.error(
                    "year",
                    t_with(
                        MessageKey::FormYearRange,
                        &[("min", min.as_str()), ("max", max.as_str())],
                    ),
                );
            }
        }
    }

    if validate_non_negative(draft.mileage).is_err() {
        report.error("mileage", t(MessageKey::FormMileageNegative));
    }

    if validate_not_empty(&draft.vin).is_err() {
        report.error("vin", required("VIN"));
    } else if validate_exact_length(&draft.vin, VIN_LENGTH).is_err() {
        report.error("vin", t(MessageKey::FormVinLength));
    }

    if validate_not_empty(&draft.purchase_date).is_err() {
        report.error("purchaseDate", required("Purchase Date"));
    } else if validate_calendar_date(&draft.purchase_date).is_err() {
        report.error("purchaseDate", invalid_date("Purchase Date"));
    }

    if !draft.license_plate.trim().is_empty()
        && validate_pattern(&draft.license_plate, &LICENSE_PLATE_CHARS).is_err()
    {
        report.warn("licensePlate", t(MessageKey::FormPlateCharacters));
    }
    if validate_pattern(&draft.color, &COLOR_CHARS).is_err() {
        report.warn("color", t(MessageKey::FormColorCharacters));
    }

    report
}

/// Valida el borrador del formulario "Add Maintenance"
///
/// `mileage` y `nextDueDate` son opcionales; solo se comprueban si vienen.
pub fn validate_maintenance(draft: &MaintenanceDraft, today: NaiveDate) -> ValidationReport {
    let mut report = ValidationReport::default();

    let mut performed_on = None;
    if validate_not_empty(&draft.date).is_err() {
        report.error("date", required("Date"));
    } else {
        match validate_calendar_date(&draft.date) {
            Err(_) => report.error("date", invalid_date("Date")),
            Ok(date) => {
                if validate_not_after(date, today).is_err() {
                    report.error("date", t(MessageKey::FormDateFuture));
                }
                performed_on = Some(date);
            }
        }
    }

    if validate_not_empty(&draft.description).is_err() {
        report.error("description", required("Description"));
    }

    match draft.cost {
        None => report.error("cost", required("Cost")),
        Some(cost) if !cost.is_finite() || validate_non_negative(cost).is_err() => {
            report.error("cost", t(MessageKey::FormCostNegative))
        }
        Some(cost) => {
            if validate_non_zero(cost).is_err() {
                report.warn("cost", t(MessageKey::FormCostZero));
            } else if validate_at_most(cost, COST_ADVISORY_LIMIT).is_err() {
                report.warn("cost", t(MessageKey::FormCostHigh));
            }
        }
    }

    if let Some(mileage) = draft.mileage {
        if validate_non_negative(mileage).is_err() {
            report.error("mileage", t(MessageKey::FormMileageNegative));
        } else if validate_at_most(mileage, MILEAGE_ADVISORY_LIMIT).is_err() {
            report.warn("mileage", t(MessageKey::FormMileageHigh));
        }
    }

    if let Some(next_due) = draft.next_due_date.as_deref().filter(|v| !v.trim().is_empty()) {
        match validate_calendar_date(next_due) {
            Err(_) => report.error("nextDueDate", invalid_date("Next Due Date")),
            Ok(next_due) => {
                let bound = performed_on.unwrap_or(today);
                if validate_strictly_after(next_due, bound).is_err() {
                    report.error("nextDueDate", t(MessageKey::FormDateNextAfter));
                } else {
                    let horizon = today
                        .checked_add_months(Months::new(NEXT_DUE_ADVISORY_MONTHS))
                        .unwrap_or(NaiveDate::MAX);
                    if validate_not_after(next_due, horizon).is_err() {
                        report.warn("nextDueDate", t(MessageKey::FormDateNextFar));
                    }
                }
            }
        }
    }

    report
}
