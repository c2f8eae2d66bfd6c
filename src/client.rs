//! Cliente HTTP para el backend de flota
//!
//! Este módulo contiene el gateway remoto que usa el store: el trait
//! `FleetGateway` y su implementación sobre reqwest.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::environment::DashboardConfig;
use crate::dto::api_response::ApiResponse;
use crate::dto::maintenance_dto::MaintenanceDraft;
use crate::dto::vehicle_dto::VehicleDraft;
use crate::models::maintenance::Maintenance;
use crate::models::vehicle::Vehicle;
use crate::utils::errors::{AppError, AppResult};

/// Operaciones remotas que consume el store
#[async_trait]
pub trait FleetGateway: Send + Sync {
    async fn list_vehicles(&self) -> AppResult<Vec<Vehicle>>;

    async fn get_vehicle(&self, id: &str) -> AppResult<Vehicle>;

    async fn create_vehicle(&self, draft: &VehicleDraft) -> AppResult<Vehicle>;

    async fn create_maintenance(
        &self,
        vehicle_id: &str,
        draft: &MaintenanceDraft,
    ) -> AppResult<Maintenance>;
}

/// Cliente HTTP para la API REST de flota
pub struct FleetApiClient {
    pub client: Client,
    pub base_url: String,
}

impl FleetApiClient {
    /// Crear nuevo cliente HTTP con URL base configurable
    pub fn new(base_url: String, timeout: std::time::Duration) -> AppResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &DashboardConfig) -> AppResult<Self> {
        Self::new(config.api_base_url.clone(), config.request_timeout())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Envía la petición y desenvuelve `{ success, data, message }`
    async fn send_envelope<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: &str,
    ) -> AppResult<T> {
        let request_id = Uuid::new_v4().to_string();
        debug!("📡 {} (request_id: {})", operation, request_id);

        let response = request
            .header("Accept", "application/json")
            .header("X-Request-Id", &request_id)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.message)
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| format!("Error HTTP: {}", status));

            warn!("❌ {} falló con {}: {}", operation, status, message);
            if status == StatusCode::NOT_FOUND {
                return Err(AppError::NotFound(message));
            }
            return Err(AppError::Gateway(message));
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&body)?;
        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| format!("{} was not successful", operation));
            warn!("❌ {} rechazado por el backend: {}", operation, message);
            return Err(AppError::Gateway(message));
        }

        envelope
            .data
            .ok_or_else(|| AppError::Gateway(format!("{} returned no data", operation)))
    }
}

#[async_trait]
impl FleetGateway for FleetApiClient {
    async fn list_vehicles(&self) -> AppResult<Vec<Vehicle>> {
        let request = self.client.get(self.url("/vehicles"));
        let vehicles: Vec<Vehicle> = self.send_envelope(request, "GET /vehicles").await?;
        debug!("🚗 {} vehículos recibidos", vehicles.len());
        Ok(vehicles)
    }

    async fn get_vehicle(&self, id: &str) -> AppResult<Vehicle> {
        let path = format!("/vehicles/{}", urlencoding::encode(id));
        let request = self.client.get(self.url(&path));
        self.send_envelope(request, &format!("GET {}", path)).await
    }

    async fn create_vehicle(&self, draft: &VehicleDraft) -> AppResult<Vehicle> {
        let request = self.client.post(self.url("/vehicles")).json(draft);
        self.send_envelope(request, "POST /vehicles").await
    }

    async fn create_maintenance(
        &self,
        vehicle_id: &str,
        draft: &MaintenanceDraft,
    ) -> AppResult<Maintenance> {
        let path = format!("/maintenance/{}", urlencoding::encode(vehicle_id));
        let request = self.client.post(self.url(&path)).json(draft);
        self.send_envelope(request, &format!("POST {}", path)).await
    }
}
