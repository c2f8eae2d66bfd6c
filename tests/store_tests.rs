use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

use fleet_dashboard::client::FleetGateway;
use fleet_dashboard::config::environment::DashboardConfig;
use fleet_dashboard::config::preferences::{Theme, ThemePreference};
use fleet_dashboard::dto::{MaintenanceDraft, VehicleDraft};
use fleet_dashboard::models::{Maintenance, Vehicle, VehicleStatus, VehicleType};
use fleet_dashboard::services::{CategoryFilter, SortDirection, SortField};
use fleet_dashboard::state::{DashboardStore, DetailTab, RequestKind, ViewMode};
use fleet_dashboard::utils::errors::{not_found_error, AppError, AppResult};

/// Backend en memoria; `gate` deja colgada la carga de detalle hasta que se notifica
#[derive(Default)]
struct FakeGateway {
    vehicles: Mutex<Vec<Vehicle>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    gate: Option<Arc<Notify>>,
    created: Mutex<Vec<VehicleDraft>>,
}

impl FakeGateway {
    fn with_fleet() -> Self {
        let fleet = vec![
            vehicle("v1", "Toyota", "Camry", VehicleType::Sedan, VehicleStatus::Active),
            vehicle("v2", "Ford", "Explorer", VehicleType::Suv, VehicleStatus::Maintenance),
            vehicle("v3", "Tesla", "Model 3", VehicleType::Electric, VehicleStatus::Active),
        ];
        Self {
            vehicles: Mutex::new(fleet),
            ..Default::default()
        }
    }
}

fn vehicle(id: &str, make: &str, model: &str, kind: VehicleType, status: VehicleStatus) -> Vehicle {
    Vehicle {
        id: id.to_string(),
        make: make.to_string(),
        model: model.to_string(),
        license_plate: format!("{} 001", id.to_uppercase()),
        vehicle_type: Some(kind),
        status: Some(status),
        ..Default::default()
    }
}

#[async_trait]
impl FleetGateway for FakeGateway {
    async fn list_vehicles(&self) -> AppResult<Vec<Vehicle>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Gateway("Fleet service unavailable".to_string()));
        }
        Ok(self.vehicles.lock().unwrap().clone())
    }

    async fn get_vehicle(&self, id: &str) -> AppResult<Vehicle> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.vehicles
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .ok_or_else(|| not_found_error("Vehicle", id))
    }

    async fn create_vehicle(&self, draft: &VehicleDraft) -> AppResult<Vehicle> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Gateway("License plate already registered".to_string()));
        }
        self.created.lock().unwrap().push(draft.clone());
        Ok(Vehicle {
            id: "new".to_string(),
            make: draft.make.clone(),
            model: draft.model.clone(),
            year: draft.year,
            license_plate: draft.license_plate.clone(),
            vehicle_type: Some(draft.vehicle_type),
            status: Some(draft.status),
            ..Default::default()
        })
    }

    async fn create_maintenance(&self, _vehicle_id: &str, draft: &MaintenanceDraft) -> AppResult<Maintenance> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Gateway("Maintenance service unavailable".to_string()));
        }
        Ok(Maintenance {
            id: "m-new".to_string(),
            date: draft.date.clone(),
            description: draft.description.clone(),
            cost: draft.cost.unwrap_or_default(),
            ..Default::default()
        })
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

async fn loaded_store(gateway: FakeGateway) -> (Arc<DashboardStore>, Arc<FakeGateway>) {
    let gateway = Arc::new(gateway);
    let store = DashboardStore::new(gateway.clone(), &DashboardConfig::default()).with_clock(today);
    store.fetch_vehicles().await.unwrap();
    (Arc::new(store), gateway)
}

async fn fill_valid_vehicle(store: &DashboardStore) {
    for (field, value) in [
        ("make", "Toyota"),
        ("model", "Corolla"),
        ("year", "2022"),
        ("color", "Blue"),
        ("licensePlate", "ABC 123"),
        ("vin", "1HGCM82633A004352"),
        ("mileage", "15000"),
        ("purchaseDate", "2022-01-15"),
    ] {
        store.update_vehicle_field(field, value).await.unwrap();
    }
}

#[tokio::test]
async fn test_fetch_populates_listing() {
    let (store, _) = loaded_store(FakeGateway::with_fleet()).await;
    let state = store.snapshot().await;

    assert_eq!(state.vehicles.len(), 3);
    assert!(!state.loading);
    assert_eq!(state.view, ViewMode::Listing);

    let names: Vec<String> = store.visible_vehicles().await.iter().map(|v| v.make.clone()).collect();
    assert_eq!(names, vec!["Ford", "Tesla", "Toyota"]);
}

#[tokio::test]
async fn test_select_and_back_preserve_filters() {
    let (store, _) = loaded_store(FakeGateway::with_fleet()).await;
    store.set_search_term("o").await;
    store.set_status_filter(CategoryFilter::Only(VehicleStatus::Active)).await;
    store.set_sort_field(SortField::Make).await;
    let before = store.filters().await;

    store.select("v1").await.unwrap();
    assert_eq!(
        store.view().await,
        ViewMode::Viewing { vehicle_id: "v1".to_string(), tab: DetailTab::Details }
    );
    assert_eq!(store.selected_vehicle().await.unwrap().model, "Camry");

    store.back().await.unwrap();
    assert_eq!(store.view().await, ViewMode::Listing);
    assert_eq!(store.filters().await, before);
    assert_eq!(before.sort_direction, SortDirection::Desc);
}

#[tokio::test]
async fn test_filters_and_clear() {
    let (store, _) = loaded_store(FakeGateway::with_fleet()).await;
    store.set_type_filter(CategoryFilter::Only(VehicleType::Suv)).await;
    let visible = store.visible_vehicles().await;
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, "v2");

    store.set_sort_field(SortField::Year).await;
    store.clear_filters().await;
    let filters = store.filters().await;
    assert!(!filters.is_filtered());
    assert_eq!(filters.sort_field, SortField::Year);
    assert_eq!(store.visible_vehicles().await.len(), 3);
}

#[tokio::test]
async fn test_invalid_transitions() {
    let (store, _) = loaded_store(FakeGateway::with_fleet()).await;

    assert!(matches!(store.back().await, Err(AppError::InvalidTransition(_))));
    assert!(matches!(store.change_tab(DetailTab::Analytics).await, Err(AppError::InvalidTransition(_))));
    assert!(matches!(store.submit_maintenance().await, Err(AppError::InvalidTransition(_))));

    store.toggle_add_form(true).await.unwrap();
    assert!(matches!(store.select("v1").await, Err(AppError::InvalidTransition(_))));

    store.toggle_add_form(false).await.unwrap();
    store.select("v1").await.unwrap();
    assert!(matches!(store.toggle_add_form(true).await, Err(AppError::InvalidTransition(_))));
    assert!(matches!(store.submit_vehicle().await, Err(AppError::InvalidTransition(_))));
}

#[tokio::test]
async fn test_change_tab_within_detail() {
    let (store, _) = loaded_store(FakeGateway::with_fleet()).await;
    store.select("v2").await.unwrap();
    store.change_tab(DetailTab::Maintenance).await.unwrap();
    store.open_maintenance_form().await.unwrap();
    store.update_maintenance_field("description", "Tires").await.unwrap();
    assert!(store.snapshot().await.show_maintenance_form);

    store.change_tab(DetailTab::Location).await.unwrap();
    let state = store.snapshot().await;
    assert_eq!(state.view, ViewMode::Viewing { vehicle_id: "v2".to_string(), tab: DetailTab::Location });
    assert!(!state.show_maintenance_form);
    assert_eq!(state.maintenance_form.draft, MaintenanceDraft::default());
}

#[tokio::test]
async fn test_submit_valid_vehicle_appends_and_returns_to_listing() {
    let (store, gateway) = loaded_store(FakeGateway::with_fleet()).await;
    store.toggle_add_form(true).await.unwrap();
    fill_valid_vehicle(&store).await;

    let created = store.submit_vehicle().await.unwrap();
    assert_eq!(created.id, "new");

    let state = store.snapshot().await;
    assert_eq!(state.view, ViewMode::Listing);
    assert_eq!(state.vehicles.len(), 4);
    assert_eq!(state.vehicles.last().unwrap().model, "Corolla");
    assert_eq!(state.vehicle_form.draft, VehicleDraft::default());
    assert_eq!(gateway.created.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_vehicle_stays_in_adding() {
    let (store, gateway) = loaded_store(FakeGateway::with_fleet()).await;
    store.toggle_add_form(true).await.unwrap();
    store.update_vehicle_field("year", "1995").await.unwrap();
    store.update_vehicle_field("vin", "123").await.unwrap();

    let err = store.submit_vehicle().await.unwrap_err();
    let report = match err {
        AppError::Validation(report) => report,
        other => panic!("expected validation error, got {:?}", other),
    };
    assert_eq!(report.error_for("year"), Some("Year must be between 2000 and 2027"));
    assert_eq!(report.error_for("vin"), Some("VIN must be exactly 17 characters"));
    assert_eq!(report.error_for("make"), Some("Make is required"));

    let state = store.snapshot().await;
    assert_eq!(state.view, ViewMode::Adding);
    assert_eq!(state.vehicle_form.report, report);
    assert!(gateway.created.lock().unwrap().is_empty());
    assert!(store.active_toast().await.is_none());
}

#[tokio::test]
async fn test_warnings_do_not_block_submit() {
    let (store, _) = loaded_store(FakeGateway::with_fleet()).await;
    store.toggle_add_form(true).await.unwrap();
    fill_valid_vehicle(&store).await;
    store.update_vehicle_field("color", "Blue #2").await.unwrap();

    store.touch_vehicle_field("color").await;
    let report = store.snapshot().await.vehicle_form.report;
    assert!(report.warning_for("color").is_some());
    assert!(report.is_valid());

    assert!(store.submit_vehicle().await.is_ok());
}

#[tokio::test]
async fn test_gateway_failure_keeps_draft_and_raises_toast() {
    let (store, gateway) = loaded_store(FakeGateway::with_fleet()).await;
    gateway.fail_writes.store(true, Ordering::SeqCst);
    store.toggle_add_form(true).await.unwrap();
    fill_valid_vehicle(&store).await;

    let err = store.submit_vehicle().await.unwrap_err();
    assert!(matches!(err, AppError::Gateway(_)));

    let state = store.snapshot().await;
    assert_eq!(state.view, ViewMode::Adding);
    assert_eq!(state.vehicles.len(), 3);
    assert_eq!(state.vehicle_form.draft.model, "Corolla");
    assert!(!state.vehicle_form.submitting);
    assert_eq!(store.active_toast().await.as_deref(), Some("License plate already registered"));

    store.dismiss_toast().await;
    assert!(store.active_toast().await.is_none());
}

#[tokio::test]
async fn test_toast_expires() {
    let gateway = Arc::new(FakeGateway::with_fleet());
    gateway.fail_writes.store(true, Ordering::SeqCst);
    let config = DashboardConfig {
        toast_duration_ms: 20,
        ..Default::default()
    };
    let store = DashboardStore::new(gateway, &config).with_clock(today);
    store.toggle_add_form(true).await.unwrap();
    fill_valid_vehicle(&store).await;
    let _ = store.submit_vehicle().await;

    assert!(store.active_toast().await.is_some());
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(store.active_toast().await.is_none());
}

#[tokio::test]
async fn test_maintenance_merges_into_history() {
    let (store, _) = loaded_store(FakeGateway::with_fleet()).await;
    store.select("v1").await.unwrap();
    store.change_tab(DetailTab::Maintenance).await.unwrap();
    store.open_maintenance_form().await.unwrap();
    for (field, value) in [("date", "2026-10-01"), ("description", "Oil change"), ("cost", "89.5")] {
        store.update_maintenance_field(field, value).await.unwrap();
    }

    let entry = store.submit_maintenance().await.unwrap();
    assert_eq!(entry.vehicle_id.as_deref(), Some("v1"));

    let selected = store.selected_vehicle().await.unwrap();
    assert_eq!(selected.maintenance_history.len(), 1);
    assert_eq!(selected.maintenance_history[0].description, "Oil change");

    let state = store.snapshot().await;
    assert!(!state.show_maintenance_form);
    assert_eq!(state.maintenance_form.draft, MaintenanceDraft::default());
}

#[tokio::test]
async fn test_future_maintenance_date_is_rejected() {
    let (store, _) = loaded_store(FakeGateway::with_fleet()).await;
    store.select("v1").await.unwrap();
    store.open_maintenance_form().await.unwrap();
    for (field, value) in [("date", "2026-10-20"), ("description", "Brakes"), ("cost", "0")] {
        store.update_maintenance_field(field, value).await.unwrap();
    }

    let err = store.submit_maintenance().await.unwrap_err();
    assert!(err.is_validation());
    let report = store.snapshot().await.maintenance_form.report;
    assert!(report.error_for("date").is_some());
    assert!(report.warning_for("cost").is_some());
    assert!(store.selected_vehicle().await.unwrap().maintenance_history.is_empty());
}

#[tokio::test]
async fn test_open_missing_vehicle_returns_to_listing() {
    let (store, _) = loaded_store(FakeGateway::with_fleet()).await;
    let err = store.open_vehicle("ghost").await.unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(store.view().await, ViewMode::Listing);
    assert_eq!(store.active_toast().await.as_deref(), Some("Vehicle not found"));
    assert!(!store.snapshot().await.loading_detail);
}

#[tokio::test]
async fn test_back_cancels_pending_detail_load() {
    let gate = Arc::new(Notify::new());
    let gateway = FakeGateway {
        gate: Some(gate.clone()),
        ..FakeGateway::with_fleet()
    };
    let (store, _) = loaded_store(gateway).await;
    let before = store.snapshot().await.vehicles;

    let pending = {
        let store = store.clone();
        tokio::spawn(async move { store.open_vehicle("v1").await })
    };
    while !store.is_in_flight(RequestKind::OpenVehicle).await {
        tokio::task::yield_now().await;
    }

    store.back().await.unwrap();
    let result = pending.await.unwrap();
    assert!(matches!(result, Err(AppError::Cancelled)));

    gate.notify_one();
    let state = store.snapshot().await;
    assert_eq!(state.view, ViewMode::Listing);
    assert_eq!(state.vehicles, before);
    assert!(!state.loading_detail);
    assert!(state.toast.is_none());
}

#[tokio::test]
async fn test_newer_detail_load_supersedes_older() {
    let gate = Arc::new(Notify::new());
    let gateway = FakeGateway {
        gate: Some(gate.clone()),
        ..FakeGateway::with_fleet()
    };
    let (store, _) = loaded_store(gateway).await;

    let first = {
        let store = store.clone();
        tokio::spawn(async move { store.open_vehicle("v1").await })
    };
    while !store.is_in_flight(RequestKind::OpenVehicle).await {
        tokio::task::yield_now().await;
    }

    let second = {
        let store = store.clone();
        tokio::spawn(async move { store.open_vehicle("v3").await })
    };
    assert!(matches!(first.await.unwrap(), Err(AppError::Cancelled)));

    gate.notify_one();
    let opened = second.await.unwrap().unwrap();
    assert_eq!(opened.id, "v3");
    assert_eq!(store.selected_vehicle().await.unwrap().make, "Tesla");
}

#[tokio::test]
async fn test_select_clears_pending_detail_load() {
    let gate = Arc::new(Notify::new());
    let gateway = FakeGateway {
        gate: Some(gate.clone()),
        ..FakeGateway::with_fleet()
    };
    let (store, _) = loaded_store(gateway).await;

    let pending = {
        let store = store.clone();
        tokio::spawn(async move { store.open_vehicle("v1").await })
    };
    while !store.is_in_flight(RequestKind::OpenVehicle).await {
        tokio::task::yield_now().await;
    }

    store.select("v2").await.unwrap();
    assert!(matches!(pending.await.unwrap(), Err(AppError::Cancelled)));

    let state = store.snapshot().await;
    assert_eq!(state.view, ViewMode::Viewing { vehicle_id: "v2".to_string(), tab: DetailTab::Details });
    assert!(!state.loading_detail);
    assert!(!store.is_in_flight(RequestKind::OpenVehicle).await);
}

#[tokio::test]
async fn test_fetch_failure_keeps_collection() {
    let (store, gateway) = loaded_store(FakeGateway::with_fleet()).await;
    let before = store.snapshot().await.vehicles;
    gateway.fail_reads.store(true, Ordering::SeqCst);

    let err = store.fetch_vehicles().await.unwrap_err();
    assert!(matches!(err, AppError::Gateway(_)));

    let state = store.snapshot().await;
    assert_eq!(state.vehicles, before);
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Fleet service unavailable"));
    assert_eq!(store.active_toast().await.as_deref(), Some("Fleet service unavailable"));

    gateway.fail_reads.store(false, Ordering::SeqCst);
    store.fetch_vehicles().await.unwrap();
    assert!(store.snapshot().await.error.is_none());
}

#[tokio::test]
async fn test_maintenance_failure_keeps_draft() {
    let (store, gateway) = loaded_store(FakeGateway::with_fleet()).await;
    gateway.fail_writes.store(true, Ordering::SeqCst);
    store.select("v1").await.unwrap();
    store.change_tab(DetailTab::Maintenance).await.unwrap();
    store.open_maintenance_form().await.unwrap();
    for (field, value) in [("date", "2026-10-01"), ("description", "Oil change"), ("cost", "89.5")] {
        store.update_maintenance_field(field, value).await.unwrap();
    }

    let err = store.submit_maintenance().await.unwrap_err();
    assert!(matches!(err, AppError::Gateway(_)));

    let state = store.snapshot().await;
    assert!(state.show_maintenance_form);
    assert!(!state.maintenance_form.submitting);
    assert_eq!(state.maintenance_form.draft.description, "Oil change");
    assert_eq!(state.maintenance_form.draft.cost, Some(89.5));
    assert!(store.selected_vehicle().await.unwrap().maintenance_history.is_empty());
    assert_eq!(store.active_toast().await.as_deref(), Some("Maintenance service unavailable"));
}

#[tokio::test]
async fn test_theme_toggle_persists() {
    let dir = tempfile::tempdir().unwrap();
    let config = DashboardConfig {
        theme_file: dir.path().join("theme.json"),
        ..Default::default()
    };
    let store = DashboardStore::new(Arc::new(FakeGateway::with_fleet()), &config);

    assert_eq!(store.load_theme().await, Theme::Light);
    assert_eq!(store.toggle_theme().await.unwrap(), Theme::Dark);
    assert_eq!(store.snapshot().await.theme, Theme::Dark);
    assert_eq!(ThemePreference::load(&config.theme_file).unwrap().theme, Theme::Dark);

    let reopened = DashboardStore::new(Arc::new(FakeGateway::default()), &config);
    assert_eq!(reopened.load_theme().await, Theme::Dark);
    assert_eq!(reopened.toggle_theme().await.unwrap(), Theme::Light);
}
