//! Derivación del listado de vehículos
//!
//! Aplica búsqueda, filtros por categoría y ordenación a la colección
//! cruda que tiene el store, sin modificarla.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::models::vehicle::{Vehicle, VehicleStatus, VehicleType};
use crate::utils::errors::AppError;

/// Dirección de ordenación
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Campos ordenables del vehículo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    Make,
    Model,
    Year,
    #[serde(rename = "type")]
    VehicleType,
    Status,
    FuelType,
    Color,
    LicensePlate,
    Vin,
    Mileage,
    Location,
    PurchaseDate,
    LastServiceDate,
    CreatedAt,
    UpdatedAt,
}

/// Filtro por categoría: "all" o un valor concreto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> CategoryFilter<T> {
    pub fn matches(&self, value: Option<&T>) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(expected) => value == Some(expected),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, CategoryFilter::All)
    }
}

impl<T: FromStr<Err = AppError>> FromStr for CategoryFilter<T> {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}

impl<T: fmt::Display> fmt::Display for CategoryFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Only(value) => value.fmt(f),
        }
    }
}

/// Búsqueda, filtros y ordenación del listado
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterSortSpec {
    pub search_term: String,
    pub type_filter: CategoryFilter<VehicleType>,
    pub status_filter: CategoryFilter<VehicleStatus>,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl FilterSortSpec {
    /// Hay algún filtro activo (la vista muestra "Clear")
    pub fn is_filtered(&self) -> bool {
        !self.search_term.is_empty() || !self.type_filter.is_all() || !self.status_filter.is_all()
    }

    /// Limpia búsqueda y filtros; la ordenación se conserva
    pub fn clear_filters(&mut self) {
        self.search_term.clear();
        self.type_filter = CategoryFilter::All;
        self.status_filter = CategoryFilter::All;
    }

    /// Mismo campo invierte la dirección; campo nuevo vuelve a ascendente
    pub fn toggle_sort(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_direction = self.sort_direction.toggled();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Asc;
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum SortKey<'a> {
    Text(&'a str),
    Number(f64),
    Missing,
}

fn text_key(value: Option<&str>) -> SortKey<'_> {
    value.map(SortKey::Text).unwrap_or(SortKey::Missing)
}

fn sort_key(vehicle: &Vehicle, field: SortField) -> SortKey<'_> {
    match field {
        SortField::Make => SortKey::Text(&vehicle.make),
        SortField::Model => SortKey::Text(&vehicle.model),
        SortField::LicensePlate => SortKey::Text(&vehicle.license_plate),
        SortField::Year => vehicle
            .year
            .map(|year| SortKey::Number(f64::from(year)))
            .unwrap_or(SortKey::Missing),
        SortField::Mileage => vehicle
            .mileage
            .map(|miles| SortKey::Number(miles as f64))
            .unwrap_or(SortKey::Missing),
        SortField::VehicleType => text_key(vehicle.vehicle_type.as_ref().map(|t| t.label())),
        SortField::Status => text_key(vehicle.status.as_ref().map(|s| s.label())),
        SortField::FuelType => text_key(vehicle.fuel_type.as_ref().map(|f| f.label())),
        SortField::Color => text_key(vehicle.color.as_deref()),
        SortField::Vin => text_key(vehicle.vin.as_deref()),
        SortField::Location => text_key(vehicle.location.as_deref()),
        SortField::PurchaseDate => text_key(vehicle.purchase_date.as_deref()),
        SortField::LastServiceDate => text_key(vehicle.last_service_date.as_deref()),
        SortField::CreatedAt => text_key(vehicle.created_at.as_deref()),
        SortField::UpdatedAt => text_key(vehicle.updated_at.as_deref()),
    }
}

/// Orden nativo; un valor ausente no es menor ni mayor que nada
fn compare_keys(a: SortKey<'_>, b: SortKey<'_>) -> Ordering {
    match (a, b) {
        (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
        (SortKey::Number(a), SortKey::Number(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}

/// Comparador de dos vehículos según el campo y la dirección
pub fn compare_vehicles(a: &Vehicle, b: &Vehicle, field: SortField, direction: SortDirection) -> Ordering {
    let ordering = compare_keys(sort_key(a, field), sort_key(b, field));
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// El vehículo pasa la búsqueda y ambos filtros
pub fn matches_spec(vehicle: &Vehicle, spec: &FilterSortSpec) -> bool {
    let needle = spec.search_term.to_lowercase();
    let matches_search = needle.is_empty()
        || [&vehicle.make, &vehicle.model, &vehicle.license_plate]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));

    matches_search
        && spec.type_filter.matches(vehicle.vehicle_type.as_ref())
        && spec.status_filter.matches(vehicle.status.as_ref())
}

// El comparador no es un orden total cuando faltan valores y el sort de std
// puede entrar en pánico con eso; esta inserción es estable y nunca falla.
fn stable_insertion_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && compare(&items[j - 1], &items[j]) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Produce la vista filtrada y ordenada que muestra la tabla
pub fn derive(vehicles: &[Vehicle], spec: &FilterSortSpec) -> Vec<Vehicle> {
    let mut view: Vec<Vehicle> = vehicles
        .iter()
        .filter(|vehicle| matches_spec(vehicle, spec))
        .cloned()
        .collect();

    stable_insertion_sort_by(&mut view, |a, b| {
        compare_vehicles(a, b, spec.sort_field, spec.sort_direction)
    });
    view
}
