//! Services module
//!
//! Este módulo contiene la lógica de negocio del dashboard: derivación del
//! listado, validación de formularios y los cálculos de las pestañas de detalle.

pub mod form_validation;
pub mod list_derivation;
pub mod maintenance_history;
pub mod usage_analytics;

pub use form_validation::{validate_maintenance, validate_vehicle, ValidationReport};
pub use list_derivation::{derive, CategoryFilter, FilterSortSpec, SortDirection, SortField};
