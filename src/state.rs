//! Estado del dashboard
//!
//! Este módulo define el store de la sesión de UI: selección, pestaña activa,
//! filtros, borradores de formulario y flags de carga. El store se construye
//! con un gateway inyectado y se comparte por referencia; no hay singletons.
//!
//! Cada llamada al gateway se hace fuera del lock y envuelta en `Abortable`.
//! Navegar fuera de una vista aborta las peticiones de esa vista, y una
//! respuesta que llega tarde nunca modifica el estado.

use chrono::{Local, NaiveDate};
use futures::future::{AbortHandle, AbortRegistration, Abortable};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::client::FleetGateway;
use crate::config::environment::DashboardConfig;
use crate::config::preferences::{Theme, ThemePreference};
use crate::dto::maintenance_dto::MaintenanceDraft;
use crate::dto::vehicle_dto::VehicleDraft;
use crate::models::maintenance::Maintenance;
use crate::models::vehicle::{Vehicle, VehicleStatus, VehicleType};
use crate::services::form_validation::{validate_maintenance, validate_vehicle, ValidationReport};
use crate::services::list_derivation::{derive, CategoryFilter, FilterSortSpec, SortField};
use crate::utils::errors::{transition_error, AppError, AppResult};
use crate::utils::locale::{t, MessageKey};

/// Pestañas del detalle de vehículo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum DetailTab {
    #[default]
    Details,
    Maintenance,
    Location,
    Analytics,
}

impl DetailTab {
    pub const ALL: [DetailTab; 4] = [
        DetailTab::Details,
        DetailTab::Maintenance,
        DetailTab::Location,
        DetailTab::Analytics,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            DetailTab::Details => "details",
            DetailTab::Maintenance => "maintenance",
            DetailTab::Location => "location",
            DetailTab::Analytics => "analytics",
        }
    }
}

impl fmt::Display for DetailTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DetailTab {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DetailTab::ALL
            .iter()
            .copied()
            .find(|tab| tab.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::InvalidField(format!("unknown tab '{}'", s)))
    }
}

/// Vista activa: Viewing y Adding son excluyentes por construcción
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Listing,
    Viewing { vehicle_id: String, tab: DetailTab },
    Adding,
}

impl ViewMode {
    pub fn name(&self) -> &'static str {
        match self {
            ViewMode::Listing => "listing",
            ViewMode::Viewing { .. } => "viewing",
            ViewMode::Adding => "adding",
        }
    }
}

/// Borrador de formulario con su resultado de validación
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftForm<T> {
    pub draft: T,
    pub report: ValidationReport,
    pub submitting: bool,
}

impl<T: Default> DraftForm<T> {
    pub fn reset(&mut self) {
        self.draft = T::default();
        self.report.clear();
        self.submitting = false;
    }
}

/// Mensaje transitorio de error
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub raised_at: Instant,
}

/// Estado de la sesión que lee la capa de presentación
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub vehicles: Vec<Vehicle>,
    pub view: ViewMode,
    pub filters: FilterSortSpec,
    pub vehicle_form: DraftForm<VehicleDraft>,
    pub maintenance_form: DraftForm<MaintenanceDraft>,
    pub show_maintenance_form: bool,
    pub loading: bool,
    pub loading_detail: bool,
    pub error: Option<String>,
    pub toast: Option<Toast>,
    pub theme: Theme,
}

impl DashboardState {
    pub fn selected_vehicle_id(&self) -> Option<&str> {
        match &self.view {
            ViewMode::Viewing { vehicle_id, .. } => Some(vehicle_id),
            _ => None,
        }
    }

    pub fn selected_vehicle(&self) -> Option<&Vehicle> {
        let id = self.selected_vehicle_id()?;
        self.vehicles.iter().find(|vehicle| vehicle.id == id)
    }

    pub fn visible_vehicles(&self) -> Vec<Vehicle> {
        derive(&self.vehicles, &self.filters)
    }

    /// Inserta o reemplaza por id, manteniendo la posición existente
    fn upsert_vehicle(&mut self, vehicle: Vehicle) {
        match self.vehicles.iter_mut().find(|existing| existing.id == vehicle.id) {
            Some(existing) => *existing = vehicle,
            None => self.vehicles.push(vehicle),
        }
    }
}

/// Tipos de petición en vuelo; como mucho una por tipo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    FetchList,
    OpenVehicle,
    CreateVehicle,
    CreateMaintenance,
}

struct InFlight {
    generation: u64,
    handle: AbortHandle,
}

#[derive(Default)]
struct StoreInner {
    state: DashboardState,
    inflight: HashMap<RequestKind, InFlight>,
    next_generation: u64,
}

impl StoreInner {
    /// Registra una petición nueva, abortando la anterior del mismo tipo
    fn register(&mut self, kind: RequestKind) -> (u64, AbortRegistration) {
        self.cancel(kind);
        let (handle, registration) = AbortHandle::new_pair();
        self.next_generation += 1;
        let generation = self.next_generation;
        self.inflight.insert(kind, InFlight { generation, handle });
        (generation, registration)
    }

    /// true si la petición sigue siendo la vigente de su tipo
    fn finish(&mut self, kind: RequestKind, generation: u64) -> bool {
        match self.inflight.get(&kind) {
            Some(current) if current.generation == generation => {
                self.inflight.remove(&kind);
                true
            }
            _ => false,
        }
    }

    fn cancel(&mut self, kind: RequestKind) {
        if let Some(previous) = self.inflight.remove(&kind) {
            previous.handle.abort();
            debug!("🛑 Petición {:?} abortada", kind);
        }
    }

    fn raise_toast(&mut self, message: String) {
        self.state.toast = Some(Toast {
            message,
            raised_at: Instant::now(),
        });
    }

    /// Error de red o del gateway: mensaje visible, estado previo intacto
    fn report_failure(&mut self, operation: &str, err: &AppError) {
        self.report_failure_with(operation, err, err.user_message());
    }

    fn report_failure_with(&mut self, operation: &str, err: &AppError, message: String) {
        error!("❌ {} falló: {}", operation, err);
        self.state.error = Some(message.clone());
        self.raise_toast(message);
    }
}

type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Store de la sesión del dashboard
pub struct DashboardStore {
    gateway: Arc<dyn FleetGateway>,
    inner: RwLock<StoreInner>,
    toast_duration: Duration,
    theme_file: PathBuf,
    clock: Clock,
}

impl DashboardStore {
    pub fn new(gateway: Arc<dyn FleetGateway>, config: &DashboardConfig) -> Self {
        Self {
            gateway,
            inner: RwLock::new(StoreInner::default()),
            toast_duration: config.toast_duration(),
            theme_file: config.theme_file.clone(),
            clock: Arc::new(|| Local::now().date_naive()),
        }
    }

    /// Sustituye la fecha de "hoy" usada por la validación
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> NaiveDate + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    // ---- lectura ----

    pub async fn snapshot(&self) -> DashboardState {
        self.inner.read().await.state.clone()
    }

    pub async fn view(&self) -> ViewMode {
        self.inner.read().await.state.view.clone()
    }

    pub async fn filters(&self) -> FilterSortSpec {
        self.inner.read().await.state.filters.clone()
    }

    pub async fn visible_vehicles(&self) -> Vec<Vehicle> {
        self.inner.read().await.state.visible_vehicles()
    }

    pub async fn selected_vehicle(&self) -> Option<Vehicle> {
        self.inner.read().await.state.selected_vehicle().cloned()
    }

    /// Toast vigente; caduca tras la duración configurada
    pub async fn active_toast(&self) -> Option<String> {
        let inner = self.inner.read().await;
        inner
            .state
            .toast
            .as_ref()
            .filter(|toast| toast.raised_at.elapsed() < self.toast_duration)
            .map(|toast| toast.message.clone())
    }

    pub async fn dismiss_toast(&self) {
        self.inner.write().await.state.toast = None;
    }

    pub async fn is_in_flight(&self, kind: RequestKind) -> bool {
        self.inner.read().await.inflight.contains_key(&kind)
    }

    // ---- tema ----

    /// Carga el tema persistido; un fichero ilegible se trata como `light`
    pub async fn load_theme(&self) -> Theme {
        let theme = match ThemePreference::load(&self.theme_file) {
            Ok(pref) => pref.theme,
            Err(e) => {
                warn!("⚠️ Preferencia de tema ilegible, usando light: {}", e);
                Theme::default()
            }
        };
        self.inner.write().await.state.theme = theme;
        theme
    }

    /// Alterna light/dark y guarda la preferencia
    pub async fn toggle_theme(&self) -> AppResult<Theme> {
        let mut inner = self.inner.write().await;
        let theme = inner.state.theme.toggled();
        ThemePreference { theme }.save(&self.theme_file)?;
        inner.state.theme = theme;
        info!("🎨 Tema cambiado a {:?}", theme);
        Ok(theme)
    }

    // ---- navegación ----

    /// Listing → Viewing con la pestaña "details"
    pub async fn select(&self, vehicle_id: &str) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if inner.state.view == ViewMode::Adding {
            return Err(transition_error("select a vehicle", inner.state.view.name()));
        }
        inner.cancel(RequestKind::OpenVehicle);
        inner.cancel(RequestKind::CreateMaintenance);
        inner.state.loading_detail = false;
        inner.state.maintenance_form.reset();
        inner.state.show_maintenance_form = false;
        inner.state.view = ViewMode::Viewing {
            vehicle_id: vehicle_id.to_string(),
            tab: DetailTab::Details,
        };
        info!("🚗 Vehículo {} seleccionado", vehicle_id);
        Ok(())
    }

    /// Viewing → Listing; filtros, búsqueda y orden no cambian
    pub async fn back(&self) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if !matches!(inner.state.view, ViewMode::Viewing { .. }) {
            return Err(transition_error("go back", inner.state.view.name()));
        }
        inner.cancel(RequestKind::OpenVehicle);
        inner.cancel(RequestKind::CreateMaintenance);
        inner.state.maintenance_form.reset();
        inner.state.show_maintenance_form = false;
        inner.state.loading_detail = false;
        inner.state.view = ViewMode::Listing;
        debug!("↩️ Vuelta al listado");
        Ok(())
    }

    /// Listing ⇄ Adding; cerrar el formulario descarta el borrador
    pub async fn toggle_add_form(&self, show: bool) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let current = inner.state.view.clone();
        match (show, &current) {
            (true, ViewMode::Listing) => {
                inner.state.vehicle_form.reset();
                inner.state.view = ViewMode::Adding;
                debug!("📝 Formulario de vehículo abierto");
                Ok(())
            }
            (false, ViewMode::Adding) => {
                inner.cancel(RequestKind::CreateVehicle);
                inner.state.vehicle_form.reset();
                inner.state.view = ViewMode::Listing;
                debug!("📝 Formulario de vehículo descartado");
                Ok(())
            }
            (true, ViewMode::Adding) | (false, ViewMode::Listing) => Ok(()),
            (_, view) => Err(transition_error("toggle the add form", view.name())),
        }
    }

    /// Cambio de pestaña dentro de Viewing
    pub async fn change_tab(&self, tab: DetailTab) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let leaving_maintenance = match &mut inner.state.view {
            ViewMode::Viewing { tab: current, .. } => {
                let leaving = *current == DetailTab::Maintenance && tab != DetailTab::Maintenance;
                *current = tab;
                leaving
            }
            view => return Err(transition_error("change tab", view.name())),
        };
        if leaving_maintenance {
            inner.cancel(RequestKind::CreateMaintenance);
            inner.state.maintenance_form.reset();
            inner.state.show_maintenance_form = false;
        }
        Ok(())
    }

    // ---- filtros y orden ----

    pub async fn set_search_term(&self, term: &str) {
        self.inner.write().await.state.filters.search_term = term.to_string();
    }

    pub async fn set_type_filter(&self, filter: CategoryFilter<VehicleType>) {
        self.inner.write().await.state.filters.type_filter = filter;
    }

    pub async fn set_status_filter(&self, filter: CategoryFilter<VehicleStatus>) {
        self.inner.write().await.state.filters.status_filter = filter;
    }

    pub async fn clear_filters(&self) {
        self.inner.write().await.state.filters.clear_filters();
    }

    /// Mismo campo invierte la dirección; campo nuevo ordena ascendente
    pub async fn set_sort_field(&self, field: SortField) {
        self.inner.write().await.state.filters.toggle_sort(field);
    }

    // ---- borradores ----

    pub async fn update_vehicle_field(&self, name: &str, value: &str) -> AppResult<()> {
        self.inner.write().await.state.vehicle_form.draft.set_field(name, value)
    }

    /// Validación al salir de un campo: solo se actualiza ese campo
    pub async fn touch_vehicle_field(&self, name: &str) {
        let today = self.today();
        let mut inner = self.inner.write().await;
        let form = &mut inner.state.vehicle_form;
        let full = validate_vehicle(&form.draft, today);
        merge_field(&mut form.report, &full, name);
    }

    pub async fn update_maintenance_field(&self, name: &str, value: &str) -> AppResult<()> {
        self.inner.write().await.state.maintenance_form.draft.set_field(name, value)
    }

    pub async fn touch_maintenance_field(&self, name: &str) {
        let today = self.today();
        let mut inner = self.inner.write().await;
        let form = &mut inner.state.maintenance_form;
        let full = validate_maintenance(&form.draft, today);
        merge_field(&mut form.report, &full, name);
    }

    pub async fn open_maintenance_form(&self) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if !matches!(inner.state.view, ViewMode::Viewing { .. }) {
            return Err(transition_error("add maintenance", inner.state.view.name()));
        }
        inner.state.show_maintenance_form = true;
        Ok(())
    }

    pub async fn cancel_maintenance_form(&self) {
        let mut inner = self.inner.write().await;
        inner.cancel(RequestKind::CreateMaintenance);
        inner.state.maintenance_form.reset();
        inner.state.show_maintenance_form = false;
    }

    // ---- operaciones remotas ----

    /// Recarga la colección completa
    pub async fn fetch_vehicles(&self) -> AppResult<usize> {
        let (generation, registration) = {
            let mut inner = self.inner.write().await;
            inner.state.loading = true;
            inner.state.error = None;
            inner.register(RequestKind::FetchList)
        };

        let result = Abortable::new(self.gateway.list_vehicles(), registration).await;

        let mut inner = self.inner.write().await;
        if !inner.finish(RequestKind::FetchList, generation) {
            return Err(AppError::Cancelled);
        }
        inner.state.loading = false;
        match result {
            Err(_aborted) => Err(AppError::Cancelled),
            Ok(Ok(vehicles)) => {
                info!("✅ {} vehículos cargados", vehicles.len());
                let count = vehicles.len();
                inner.state.vehicles = vehicles;
                Ok(count)
            }
            Ok(Err(err)) => {
                inner.report_failure("Carga de vehículos", &err);
                Err(err)
            }
        }
    }

    /// Abre el detalle cargando el vehículo; si no existe vuelve al listado
    pub async fn open_vehicle(&self, vehicle_id: &str) -> AppResult<Vehicle> {
        self.select(vehicle_id).await?;
        let (generation, registration) = {
            let mut inner = self.inner.write().await;
            inner.state.loading_detail = true;
            inner.register(RequestKind::OpenVehicle)
        };

        let result = Abortable::new(self.gateway.get_vehicle(vehicle_id), registration).await;

        let mut inner = self.inner.write().await;
        if !inner.finish(RequestKind::OpenVehicle, generation) {
            return Err(AppError::Cancelled);
        }
        inner.state.loading_detail = false;
        match result {
            Err(_aborted) => Err(AppError::Cancelled),
            Ok(Ok(vehicle)) => {
                debug!("🔍 Detalle de {} cargado", vehicle.display_name());
                inner.state.upsert_vehicle(vehicle.clone());
                Ok(vehicle)
            }
            Ok(Err(err)) => {
                if matches!(err, AppError::NotFound(_)) {
                    warn!("⚠️ Vehículo {} no encontrado, redirigiendo al listado", vehicle_id);
                    let message = t(MessageKey::VehicleNotFound).to_string();
                    inner.report_failure_with("Carga del detalle", &err, message);
                } else {
                    inner.report_failure("Carga del detalle", &err);
                }
                inner.state.maintenance_form.reset();
                inner.state.show_maintenance_form = false;
                inner.state.view = ViewMode::Listing;
                Err(err)
            }
        }
    }

    /// Valida y envía el borrador de vehículo
    pub async fn submit_vehicle(&self) -> AppResult<Vehicle> {
        let today = self.today();
        let (draft, generation, registration) = {
            let mut inner = self.inner.write().await;
            if inner.state.view != ViewMode::Adding {
                return Err(transition_error("submit a vehicle", inner.state.view.name()));
            }
            let report = validate_vehicle(&inner.state.vehicle_form.draft, today);
            inner.state.vehicle_form.report = report.clone();
            if !report.is_valid() {
                debug!("📝 Borrador de vehículo inválido: {}", report);
                return Err(AppError::Validation(report));
            }
            inner.state.vehicle_form.submitting = true;
            let draft = inner.state.vehicle_form.draft.clone();
            let (generation, registration) = inner.register(RequestKind::CreateVehicle);
            (draft, generation, registration)
        };

        let result = Abortable::new(self.gateway.create_vehicle(&draft), registration).await;

        let mut inner = self.inner.write().await;
        if !inner.finish(RequestKind::CreateVehicle, generation) {
            return Err(AppError::Cancelled);
        }
        inner.state.vehicle_form.submitting = false;
        match result {
            Err(_aborted) => Err(AppError::Cancelled),
            Ok(Ok(vehicle)) => {
                info!("✅ Vehículo {} creado ({})", vehicle.display_name(), vehicle.id);
                inner.state.vehicles.push(vehicle.clone());
                inner.state.vehicle_form.reset();
                inner.state.view = ViewMode::Listing;
                Ok(vehicle)
            }
            Ok(Err(err)) => {
                inner.report_failure("Alta de vehículo", &err);
                Err(err)
            }
        }
    }

    /// Valida y envía el borrador de mantenimiento del vehículo en detalle
    pub async fn submit_maintenance(&self) -> AppResult<Maintenance> {
        let today = self.today();
        let (vehicle_id, draft, generation, registration) = {
            let mut inner = self.inner.write().await;
            let vehicle_id = match inner.state.selected_vehicle_id() {
                Some(id) => id.to_string(),
                None => {
                    return Err(transition_error("submit maintenance", inner.state.view.name()))
                }
            };
            let report = validate_maintenance(&inner.state.maintenance_form.draft, today);
            inner.state.maintenance_form.report = report.clone();
            if !report.is_valid() {
                debug!("📝 Borrador de mantenimiento inválido: {}", report);
                return Err(AppError::Validation(report));
            }
            inner.state.maintenance_form.submitting = true;
            let draft = inner.state.maintenance_form.draft.clone();
            let (generation, registration) = inner.register(RequestKind::CreateMaintenance);
            (vehicle_id, draft, generation, registration)
        };

        let result = Abortable::new(
            self.gateway.create_maintenance(&vehicle_id, &draft),
            registration,
        )
        .await;

        let mut inner = self.inner.write().await;
        if !inner.finish(RequestKind::CreateMaintenance, generation) {
            return Err(AppError::Cancelled);
        }
        inner.state.maintenance_form.submitting = false;
        match result {
            Err(_aborted) => Err(AppError::Cancelled),
            Ok(Ok(mut entry)) => {
                if entry.vehicle_id.is_none() {
                    entry.vehicle_id = Some(vehicle_id.clone());
                }
                match inner.state.vehicles.iter_mut().find(|v| v.id == vehicle_id) {
                    Some(vehicle) => vehicle.record_maintenance(entry.clone()),
                    None => warn!("⚠️ Vehículo {} ya no está en la colección", vehicle_id),
                }
                info!("🔧 Mantenimiento registrado para {}", vehicle_id);
                inner.state.maintenance_form.reset();
                inner.state.show_maintenance_form = false;
                Ok(entry)
            }
            Ok(Err(err)) => {
                inner.report_failure("Alta de mantenimiento", &err);
                Err(err)
            }
        }
    }
}

/// Copia al informe visible solo los mensajes de un campo
fn merge_field(visible: &mut ValidationReport, full: &ValidationReport, field: &str) {
    match full.errors.get(field) {
        Some(message) => visible.error(field, message.clone()),
        None => {
            visible.errors.remove(field);
        }
    }
    match full.warnings.get(field) {
        Some(message) => visible.warn(field, message.clone()),
        None => {
            visible.warnings.remove(field);
        }
    }
}

/// Mensaje del estado vacío del listado
pub fn empty_listing_message(state: &DashboardState) -> Option<&'static str> {
    if !state.visible_vehicles().is_empty() {
        return None;
    }
    if state.filters.is_filtered() {
        Some(t(MessageKey::VehicleSearchAdjust))
    } else {
        Some(t(MessageKey::VehicleNoneFound))
    }
}
