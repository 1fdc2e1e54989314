//! Weather handlers
//!
//! Response bodies keep the key names the site and API consumers already
//! rely on (`rain`, `rain_minute`, `temp_ground`, `provider`).

use axum::{Json, extract::State};
use domain::Reading;
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, state::AppState};

/// One reading in API form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiReading {
    /// Observation time, ISO 8601 with offset
    pub date: String,
    pub temperature: f64,
    pub pressure: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub wind_direction: u16,
    /// mm per hour
    pub rain: f64,
    /// mm per minute
    pub rain_minute: f64,
    pub temp_ground: f64,
    pub provider: String,
}

impl From<&Reading> for ApiReading {
    fn from(reading: &Reading) -> Self {
        let m = &reading.measurements;
        Self {
            date: reading.observed_at.to_rfc3339(),
            temperature: m.temperature,
            pressure: m.pressure,
            humidity: m.humidity,
            wind_speed: m.wind_speed,
            wind_direction: m.wind_direction.degrees(),
            rain: m.rain_per_hour,
            rain_minute: m.rain_per_minute,
            temp_ground: m.ground_temperature,
            provider: reading.provider_name.clone(),
        }
    }
}

/// Daily report slot; `valid` is false for "no data" placeholders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    #[serde(flatten)]
    pub reading: ApiReading,
    pub valid: bool,
}

impl From<&Reading> for ReportEntry {
    fn from(reading: &Reading) -> Self {
        Self {
            reading: ApiReading::from(reading),
            valid: reading.is_valid(),
        }
    }
}

/// Site page data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResponse {
    pub weather: ApiReading,
    /// Eight slots, oldest first
    pub daily: Vec<ReportEntry>,
    /// Highest temperature since local midnight
    pub temp_max: Option<f64>,
    /// Lowest temperature since local midnight
    pub temp_min: Option<f64>,
}

/// `GET /api`
pub async fn api(State(state): State<AppState>) -> Result<Json<ApiReading>, ApiError> {
    let reading = state.service.current(state.freshness.api_max_age()).await?;
    Ok(Json(ApiReading::from(&reading)))
}

/// `GET /`
pub async fn index(State(state): State<AppState>) -> Result<Json<PageResponse>, ApiError> {
    // Current first so a fetched reading is visible to the report and extremes
    let weather = state.service.current(state.freshness.page_max_age()).await?;
    let (daily, extremes) = tokio::try_join!(
        state.service.daily_report(),
        state.service.extremes_today()
    )?;

    Ok(Json(PageResponse {
        weather: ApiReading::from(&weather),
        daily: daily.iter().map(ReportEntry::from).collect(),
        temp_max: extremes.max,
        temp_min: extremes.min,
    }))
}
