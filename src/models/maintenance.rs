//! Modelo de Maintenance
//!
//! Entradas del historial de mantenimiento de un vehículo.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::validation::parse_calendar_date;

/// Entrada de mantenimiento devuelta por el gateway
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Maintenance {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default, alias = "vehicle")]
    pub vehicle_id: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub mileage: Option<u64>,
    #[serde(default)]
    pub service_center: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub next_due_date: Option<String>,
}

impl Maintenance {
    pub fn performed_on(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.date)
    }

    pub fn next_due_on(&self) -> Option<NaiveDate> {
        self.next_due_date.as_deref().and_then(parse_calendar_date)
    }
}
