use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Incident category enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "incident_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IncidentType {
    Accident,
    TrafficJam,
    Obstacle,
    RoadClosed,
    Roadworks,
    Other,
}

impl IncidentType {
    /// Citizen-facing French label, used in notification texts
    pub fn label(&self) -> &'static str {
        match self {
            IncidentType::Accident => "Accident",
            IncidentType::TrafficJam => "Embouteillage",
            IncidentType::Obstacle => "Obstacle",
            IncidentType::RoadClosed => "Route fermée",
            IncidentType::Roadworks => "Travaux",
            IncidentType::Other => "Autre",
        }
    }
}

impl std::fmt::Display for IncidentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncidentType::Accident => write!(f, "accident"),
            IncidentType::TrafficJam => write!(f, "traffic_jam"),
            IncidentType::Obstacle => write!(f, "obstacle"),
            IncidentType::RoadClosed => write!(f, "road_closed"),
            IncidentType::Roadworks => write!(f, "roadworks"),
            IncidentType::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for IncidentType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accident" => Ok(IncidentType::Accident),
            "traffic_jam" => Ok(IncidentType::TrafficJam),
            "obstacle" => Ok(IncidentType::Obstacle),
            "road_closed" => Ok(IncidentType::RoadClosed),
            "roadworks" => Ok(IncidentType::Roadworks),
            "other" => Ok(IncidentType::Other),
            _ => Err(()),
        }
    }
}

/// Incident severity enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "incident_severity", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IncidentSeverity {
    Minor,
    Moderate,
    Severe,
}

impl Default for IncidentSeverity {
    fn default() -> Self {
        IncidentSeverity::Moderate
    }
}

impl std::fmt::Display for IncidentSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncidentSeverity::Minor => write!(f, "minor"),
            IncidentSeverity::Moderate => write!(f, "moderate"),
            IncidentSeverity::Severe => write!(f, "severe"),
        }
    }
}

impl std::str::FromStr for IncidentSeverity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minor" => Ok(IncidentSeverity::Minor),
            "moderate" => Ok(IncidentSeverity::Moderate),
            "severe" => Ok(IncidentSeverity::Severe),
            _ => Err(()),
        }
    }
}

/// Incident lifecycle status matching database enum.
/// Transitions only move forward: new -> in_progress -> resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "incident_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    New,
    InProgress,
    Resolved,
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncidentStatus::New => write!(f, "new"),
            IncidentStatus::InProgress => write!(f, "in_progress"),
            IncidentStatus::Resolved => write!(f, "resolved"),
        }
    }
}

/// Listing row: incident joined with its reporter's names
#[derive(Debug, Clone, FromRow)]
pub struct IncidentListRow {
    pub id: Uuid,
    pub incident_type: IncidentType,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub district: Option<String>,
    pub severity: IncidentSeverity,
    pub status: IncidentStatus,
    pub photo_key: Option<String>,
    pub anonymous: bool,
    pub extra_reports: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub reporter_first_name: Option<String>,
    pub reporter_last_name: Option<String>,
}

impl IncidentListRow {
    /// Display name shown on the map: "Prénom N." or "Anonyme"
    pub fn reporter_display_name(&self) -> String {
        if self.anonymous {
            return "Anonyme".to_string();
        }
        match (&self.reporter_first_name, &self.reporter_last_name) {
            (Some(first), Some(last)) => match last.chars().next() {
                Some(initial) => format!("{} {}.", first, initial),
                None => first.clone(),
            },
            _ => "Anonyme".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn incident_type_round_trips_through_strings() {
        for ty in [
            IncidentType::Accident,
            IncidentType::TrafficJam,
            IncidentType::Obstacle,
            IncidentType::RoadClosed,
            IncidentType::Roadworks,
            IncidentType::Other,
        ] {
            assert_eq!(IncidentType::from_str(&ty.to_string()), Ok(ty));
        }
        assert!(IncidentType::from_str("volcano").is_err());
    }

    #[test]
    fn severity_defaults_to_moderate() {
        assert_eq!(IncidentSeverity::default(), IncidentSeverity::Moderate);
    }

    fn row(anonymous: bool, first: Option<&str>, last: Option<&str>) -> IncidentListRow {
        IncidentListRow {
            id: Uuid::new_v4(),
            incident_type: IncidentType::Accident,
            description: "Collision entre deux taxis".to_string(),
            latitude: 4.05,
            longitude: 9.76,
            city: "Douala".to_string(),
            district: None,
            severity: IncidentSeverity::Moderate,
            status: IncidentStatus::New,
            photo_key: None,
            anonymous,
            extra_reports: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            reporter_first_name: first.map(String::from),
            reporter_last_name: last.map(String::from),
        }
    }

    #[test]
    fn reporter_name_is_abbreviated() {
        let row = row(false, Some("Paul"), Some("Biyick"));
        assert_eq!(row.reporter_display_name(), "Paul B.");
    }

    #[test]
    fn anonymous_reports_hide_the_reporter() {
        let row = row(true, Some("Paul"), Some("Biyick"));
        assert_eq!(row.reporter_display_name(), "Anonyme");

        let row = row(false, None, None);
        assert_eq!(row.reporter_display_name(), "Anonyme");
    }
}
