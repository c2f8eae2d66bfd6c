//! Núcleo del dashboard de flota
//!
//! Cliente del backend REST, derivación del listado, validación de
//! formularios y el store de estado de la sesión.

pub mod client;
pub mod config;
pub mod dto;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

pub use client::{FleetApiClient, FleetGateway};
pub use state::{DashboardState, DashboardStore, DetailTab, ViewMode};
pub use utils::errors::{AppError, AppResult};
