use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{error, info};

use fleet_dashboard::client::FleetApiClient;
use fleet_dashboard::config::environment::DashboardConfig;
use fleet_dashboard::models::vehicle::Vehicle;
use fleet_dashboard::services::maintenance_history::{next_due, total_cost};
use fleet_dashboard::services::usage_analytics::summarize_usage;
use fleet_dashboard::state::{empty_listing_message, DashboardStore};
use fleet_dashboard::utils::locale::{t, MessageKey};

fn describe(vehicle: &Vehicle, today: chrono::NaiveDate) -> String {
    let status = vehicle.status.map(|s| s.label()).unwrap_or("-");
    let mileage = vehicle
        .mileage
        .map(|m| format!("{} mi", m))
        .unwrap_or_else(|| "-".to_string());
    let usage = summarize_usage(vehicle);
    let usage = if usage.daily_bars.is_empty() {
        t(MessageKey::NoData).to_string()
    } else {
        format!("{} mi/semana", usage.daily_total)
    };
    let maintenance = if vehicle.maintenance_history.is_empty() {
        t(MessageKey::MaintenanceNone).to_string()
    } else {
        let due = next_due(vehicle, today)
            .map(|date| date.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!("mantenimiento ${:.2} · próximo {}", total_cost(vehicle), due)
    };
    format!(
        "{} [{}] {} · {} · {} · {}",
        vehicle.display_name(),
        vehicle.license_plate,
        status,
        mileage,
        usage,
        maintenance
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚚 {}", t(MessageKey::AppTitle));
    info!("================================================");

    let config = DashboardConfig::from_env()?;
    info!("🌐 API: {} ({})", config.api_base_url, config.environment);

    let client = FleetApiClient::from_config(&config)?;
    let store = DashboardStore::new(Arc::new(client), &config);
    info!("🎨 Tema: {:?}", store.load_theme().await);

    info!("⏳ {}", t(MessageKey::Loading));
    if let Err(e) = store.fetch_vehicles().await {
        error!("❌ {}", e.user_message());
        return Err(anyhow::anyhow!("Error cargando la flota: {}", e));
    }

    let state = store.snapshot().await;
    if let Some(message) = empty_listing_message(&state) {
        info!("📭 {}", message);
        return Ok(());
    }

    let today = chrono::Local::now().date_naive();
    for vehicle in state.visible_vehicles() {
        info!("🚗 {}", describe(&vehicle, today));
    }

    Ok(())
}
