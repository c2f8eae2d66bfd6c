//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle tal como lo devuelve el backend
//! de flota (JSON camelCase) y sus enums categóricos.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::maintenance::Maintenance;
use crate::utils::errors::AppError;
use crate::utils::validation::parse_calendar_date;

/// Tipo de vehículo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum VehicleType {
    #[default]
    Sedan,
    #[serde(rename = "SUV")]
    Suv,
    Truck,
    Van,
    Electric,
}

/// Estado del vehículo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum VehicleStatus {
    #[default]
    Active,
    Maintenance,
    Inactive,
}

/// Tipo de combustible
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum FuelType {
    #[default]
    Gasoline,
    Diesel,
    Electric,
    Hybrid,
}

impl VehicleType {
    pub const ALL: [VehicleType; 5] = [
        VehicleType::Sedan,
        VehicleType::Suv,
        VehicleType::Truck,
        VehicleType::Van,
        VehicleType::Electric,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            VehicleType::Sedan => "Sedan",
            VehicleType::Suv => "SUV",
            VehicleType::Truck => "Truck",
            VehicleType::Van => "Van",
            VehicleType::Electric => "Electric",
        }
    }
}

impl VehicleStatus {
    pub const ALL: [VehicleStatus; 3] = [
        VehicleStatus::Active,
        VehicleStatus::Maintenance,
        VehicleStatus::Inactive,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            VehicleStatus::Active => "Active",
            VehicleStatus::Maintenance => "Maintenance",
            VehicleStatus::Inactive => "Inactive",
        }
    }
}

impl FuelType {
    pub const ALL: [FuelType; 4] = [
        FuelType::Gasoline,
        FuelType::Diesel,
        FuelType::Electric,
        FuelType::Hybrid,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FuelType::Gasoline => "Gasoline",
            FuelType::Diesel => "Diesel",
            FuelType::Electric => "Electric",
            FuelType::Hybrid => "Hybrid",
        }
    }
}

macro_rules! label_enum_impls {
    ($ty:ident, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.label().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| AppError::InvalidField(format!("unknown {} '{}'", $what, s)))
            }
        }
    };
}

label_enum_impls!(VehicleType, "vehicle type");
label_enum_impls!(VehicleStatus, "vehicle status");
label_enum_impls!(FuelType, "fuel type");

/// Vehicle tal como lo entrega el gateway
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub vin: Option<String>,
    #[serde(default)]
    pub license_plate: String,
    #[serde(default, rename = "type")]
    pub vehicle_type: Option<VehicleType>,
    #[serde(default)]
    pub status: Option<VehicleStatus>,
    #[serde(default)]
    pub fuel_type: Option<FuelType>,
    #[serde(default)]
    pub mileage: Option<u64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub purchase_date: Option<String>,
    #[serde(default)]
    pub last_service_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub maintenance_history: Vec<Maintenance>,
    /// Millas por día, empezando en domingo
    #[serde(default)]
    pub daily_usage: Vec<u32>,
    /// Millas por semana, las cuatro últimas
    #[serde(default)]
    pub weekly_usage: Vec<u32>,
}

/// Primer valor no vacío de una cadena de respaldo
fn first_present<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|value| !value.trim().is_empty())
}

impl Vehicle {
    /// Nombre corto para listados y logs
    pub fn display_name(&self) -> String {
        match self.year {
            Some(year) => format!("{} {} {}", year, self.make, self.model),
            None => format!("{} {}", self.make, self.model),
        }
    }

    /// Fecha de compra: `purchaseDate`, si no `createdAt`
    pub fn purchased_on(&self) -> Option<NaiveDate> {
        first_present(&[self.purchase_date.as_deref(), self.created_at.as_deref()])
            .and_then(parse_calendar_date)
    }

    /// Último servicio: `lastServiceDate`, luego `updatedAt`, luego el historial
    pub fn last_serviced_on(&self) -> Option<NaiveDate> {
        first_present(&[self.last_service_date.as_deref(), self.updated_at.as_deref()])
            .and_then(parse_calendar_date)
            .or_else(|| {
                self.maintenance_history
                    .iter()
                    .filter_map(|entry| entry.performed_on())
                    .max()
            })
    }

    /// Añade una entrada al historial respetando el orden de inserción
    pub fn record_maintenance(&mut self, entry: Maintenance) {
        self.maintenance_history.push(entry);
    }
}
