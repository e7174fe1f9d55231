use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::incidents::models::{IncidentStatus, IncidentType};

/// Per-type incident count over the trailing 30 days
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TypeCountDto {
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    pub count: i64,
}

/// Per-city incident count over the trailing 30 days
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CityCountDto {
    pub city: String,
    pub count: i64,
}

/// Per-status incident count (all time)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusCountDto {
    pub status: IncidentStatus,
    pub count: i64,
}

/// Daily incident count for the 7-day evolution chart
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DailyCountDto {
    pub date: NaiveDate,
    pub count: i64,
}

/// Most active non-anonymous reporter over the trailing 30 days
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TopReporterDto {
    /// "Prénom N."
    pub name: String,
    pub incidents_count: i64,
}

/// Aggregate statistics for the public dashboard
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatsDto {
    pub total_incidents: i64,
    pub resolved_incidents: i64,
    pub total_users: i64,
    pub incidents_today: i64,
    pub incidents_this_week: i64,
    pub incidents_by_type: Vec<TypeCountDto>,
    pub incidents_by_city: Vec<CityCountDto>,
    pub incidents_by_status: Vec<StatusCountDto>,
    pub weekly_evolution: Vec<DailyCountDto>,
    /// Average hours between creation and resolution over the last 30 days
    pub avg_resolution_hours: f64,
    pub top_reporters: Vec<TopReporterDto>,
}
