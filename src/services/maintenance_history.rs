//! Historial de mantenimiento de un vehículo
//!
//! El historial llega en orden de inserción; aquí se ordena por fecha
//! para la pestaña de mantenimiento y se calculan sus agregados.

use chrono::NaiveDate;
use std::cmp::Ordering;

use crate::models::maintenance::Maintenance;
use crate::models::vehicle::Vehicle;

/// Historial del más reciente al más antiguo; fechas ilegibles al final
pub fn history_newest_first(vehicle: &Vehicle) -> Vec<&Maintenance> {
    let mut entries: Vec<&Maintenance> = vehicle.maintenance_history.iter().collect();
    entries.sort_by(|a, b| match (a.performed_on(), b.performed_on()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    entries
}

pub fn latest_entry(vehicle: &Vehicle) -> Option<&Maintenance> {
    history_newest_first(vehicle)
        .into_iter()
        .next()
        .filter(|entry| entry.performed_on().is_some())
}

pub fn total_cost(vehicle: &Vehicle) -> f64 {
    vehicle.maintenance_history.iter().map(|entry| entry.cost).sum()
}

/// Próximo vencimiento en o después de `today`
pub fn next_due(vehicle: &Vehicle, today: NaiveDate) -> Option<NaiveDate> {
    vehicle
        .maintenance_history
        .iter()
        .filter_map(Maintenance::next_due_on)
        .filter(|due| *due >= today)
        .min()
}
