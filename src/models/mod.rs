//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que devuelve el backend de flota.

pub mod maintenance;
pub mod vehicle;

pub use maintenance::Maintenance;
pub use vehicle::{FuelType, Vehicle, VehicleStatus, VehicleType};
