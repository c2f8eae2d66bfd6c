//! Métricas de uso para la pestaña de analytics
//!
//! Totales, medias y alturas de barra de los gráficos de uso diario
//! y semanal de un vehículo.

use serde::Serialize;

use crate::models::vehicle::Vehicle;

/// Escala del gráfico diario (millas que ocupan el 100 %)
pub const DAILY_CHART_MAX_MILES: f64 = 150.0;
/// Escala del gráfico semanal
pub const WEEKLY_CHART_MAX_MILES: f64 = 800.0;

const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Barra de un gráfico de uso
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageBar {
    pub label: String,
    pub miles: u32,
    /// Altura relativa en porcentaje, máximo 100
    pub height_pct: f64,
}

/// Resumen de uso de un vehículo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageSummary {
    pub daily_total: u64,
    pub daily_average: f64,
    pub busiest_day: Option<String>,
    pub weekly_total: u64,
    pub weekly_average: f64,
    pub daily_bars: Vec<UsageBar>,
    pub weekly_bars: Vec<UsageBar>,
}

fn bar_height(miles: u32, scale: f64) -> f64 {
    (f64::from(miles) / scale * 100.0).min(100.0)
}

fn average(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| f64::from(*v)).sum::<f64>() / values.len() as f64
}

pub fn summarize_usage(vehicle: &Vehicle) -> UsageSummary {
    let daily = &vehicle.daily_usage;
    let weekly = &vehicle.weekly_usage;

    let daily_bars = daily
        .iter()
        .zip(WEEKDAY_LABELS.iter())
        .map(|(miles, label)| UsageBar {
            label: label.to_string(),
            miles: *miles,
            height_pct: bar_height(*miles, DAILY_CHART_MAX_MILES),
        })
        .collect();

    let weekly_bars = weekly
        .iter()
        .enumerate()
        .map(|(index, miles)| UsageBar {
            label: format!("Week {}", index + 1),
            miles: *miles,
            height_pct: bar_height(*miles, WEEKLY_CHART_MAX_MILES),
        })
        .collect();

    // Primer día con el máximo; sin uso no hay día destacado
    let busiest_day = daily
        .iter()
        .zip(WEEKDAY_LABELS.iter())
        .filter(|(miles, _)| **miles > 0)
        .fold(None::<(u32, &str)>, |best, (miles, label)| match best {
            Some((top, _)) if top >= *miles => best,
            _ => Some((*miles, *label)),
        })
        .map(|(_, label)| label.to_string());

    UsageSummary {
        daily_total: daily.iter().map(|v| u64::from(*v)).sum(),
        daily_average: average(daily),
        busiest_day,
        weekly_total: weekly.iter().map(|v| u64::from(*v)).sum(),
        weekly_average: average(weekly),
        daily_bars,
        weekly_bars,
    }
}
