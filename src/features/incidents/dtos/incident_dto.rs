use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::incidents::models::{
    IncidentListRow, IncidentSeverity, IncidentStatus, IncidentType,
};
use crate::shared::constants::{
    CAMEROON_LAT_MAX, CAMEROON_LAT_MIN, CAMEROON_LON_MAX, CAMEROON_LON_MIN, DEFAULT_PAGE_SIZE,
    MAX_PAGE_SIZE,
};

/// Photo part of a multipart submission
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub data: Vec<u8>,
    pub content_type: String,
    pub file_name: String,
}

/// Raw multipart fields of an incident submission, before validation.
/// Everything arrives as text; `validate` parses and collects every
/// violation instead of stopping at the first.
#[derive(Debug, Default)]
pub struct SubmitIncidentForm {
    pub incident_type: Option<String>,
    pub description: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub severity: Option<String>,
    pub anonymous: bool,
    pub photo: Option<PhotoUpload>,
}

/// A fully validated submission ready for ingestion
#[derive(Debug)]
pub struct NewIncident {
    pub incident_type: IncidentType,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub district: Option<String>,
    pub severity: IncidentSeverity,
    pub anonymous: bool,
    pub photo: Option<PhotoUpload>,
}

impl SubmitIncidentForm {
    pub fn validate(self) -> Result<NewIncident, Vec<String>> {
        let mut errors = Vec::new();

        let incident_type = match self.incident_type.as_deref().map(str::trim) {
            None | Some("") => {
                errors.push("type: est requis".to_string());
                None
            }
            Some(raw) => match raw.parse::<IncidentType>() {
                Ok(ty) => Some(ty),
                Err(_) => {
                    errors.push(format!("type: valeur inconnue \"{}\"", raw));
                    None
                }
            },
        };

        let description = match self.description.map(|d| d.trim().to_string()) {
            None => {
                errors.push("description: est requise".to_string());
                None
            }
            Some(d) if d.is_empty() => {
                errors.push("description: est requise".to_string());
                None
            }
            Some(d) => {
                let len = d.chars().count();
                if !(10..=1000).contains(&len) {
                    errors.push(
                        "description: doit contenir entre 10 et 1000 caractères".to_string(),
                    );
                    None
                } else {
                    Some(d)
                }
            }
        };

        let city = match self.city.map(|c| c.trim().to_string()) {
            None => {
                errors.push("city: est requise".to_string());
                None
            }
            Some(c) if c.is_empty() => {
                errors.push("city: est requise".to_string());
                None
            }
            Some(c) => Some(c),
        };

        let latitude = parse_coordinate(self.latitude.as_deref(), "latitude", &mut errors);
        let longitude = parse_coordinate(self.longitude.as_deref(), "longitude", &mut errors);

        if let (Some(lat), Some(lon)) = (latitude, longitude) {
            let in_cameroon = (CAMEROON_LAT_MIN..=CAMEROON_LAT_MAX).contains(&lat)
                && (CAMEROON_LON_MIN..=CAMEROON_LON_MAX).contains(&lon);
            if !in_cameroon {
                errors.push(
                    "coordinates: Les coordonnées ne semblent pas être au Cameroun".to_string(),
                );
            }
        }

        let severity = match self.severity.as_deref().map(str::trim) {
            None | Some("") => Some(IncidentSeverity::default()),
            Some(raw) => match raw.parse::<IncidentSeverity>() {
                Ok(s) => Some(s),
                Err(_) => {
                    errors.push(format!("severity: valeur inconnue \"{}\"", raw));
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        // All fields verified present above
        match (incident_type, description, city, latitude, longitude, severity) {
            (Some(incident_type), Some(description), Some(city), Some(latitude), Some(longitude), Some(severity)) => {
                Ok(NewIncident {
                    incident_type,
                    description,
                    latitude,
                    longitude,
                    city,
                    district: self
                        .district
                        .map(|d| d.trim().to_string())
                        .filter(|d| !d.is_empty()),
                    severity,
                    anonymous: self.anonymous,
                    photo: self.photo,
                })
            }
            _ => Err(vec!["Données invalides".to_string()]),
        }
    }
}

fn parse_coordinate(raw: Option<&str>, field: &str, errors: &mut Vec<String>) -> Option<f64> {
    match raw.map(str::trim) {
        None | Some("") => {
            errors.push(format!("{}: est requise", field));
            None
        }
        Some(raw) => match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Some(value),
            _ => {
                errors.push(format!("{}: doit être un nombre", field));
                None
            }
        },
    }
}

/// Multipart form schema for incident submission (OpenAPI documentation;
/// the fields are collected by hand in the handler)
#[derive(Debug, Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct SubmitIncidentRequestDto {
    #[serde(rename = "type")]
    pub incident_type: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub district: Option<String>,
    pub severity: Option<String>,
    pub anonymous: Option<bool>,
    /// Photo file (JPEG/PNG, max 5 MB)
    #[schema(value_type = Option<String>, format = Binary)]
    pub photo: Option<String>,
}

/// Query parameters for the incident listing
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListIncidentsQuery {
    /// Filter by city (exact match)
    pub city: Option<String>,

    /// Filter by incident type
    #[serde(rename = "type")]
    pub incident_type: Option<IncidentType>,

    /// Filter by status
    pub status: Option<IncidentStatus>,

    /// Maximum number of items to return (default: 100, max: 500)
    #[serde(default = "default_limit")]
    #[param(minimum = 1, maximum = 500)]
    pub limit: i64,

    /// Number of items to skip (default: 0)
    #[serde(default)]
    #[param(minimum = 0)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl ListIncidentsQuery {
    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        self.offset.max(0)
    }
}

/// Response projection for a listed incident
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IncidentDto {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub district: Option<String>,
    pub severity: IncidentSeverity,
    pub status: IncidentStatus,
    /// Direct URL of the photo, if one was attached
    pub photo_url: Option<String>,
    /// Number of confirmations folded into this incident
    pub extra_reports: i32,
    /// "Prénom N." or "Anonyme"
    pub reporter_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Human-readable age, e.g. "5 minutes"
    pub time_ago: String,
}

impl IncidentDto {
    pub fn from_row(row: IncidentListRow, photo_url: Option<String>, now: DateTime<Utc>) -> Self {
        let reporter_name = row.reporter_display_name();
        let time_ago = relative_age(row.created_at, now);
        Self {
            id: row.id,
            incident_type: row.incident_type,
            description: row.description,
            latitude: row.latitude,
            longitude: row.longitude,
            city: row.city,
            district: row.district,
            severity: row.severity,
            status: row.status,
            photo_url,
            extra_reports: row.extra_reports,
            reporter_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
            time_ago,
        }
    }
}

/// Response DTO after a submission: either a fresh incident or the open one
/// the report was folded into
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitIncidentResponseDto {
    pub incident_id: Uuid,
    /// True when the report confirmed an existing incident
    pub duplicate: bool,
}

/// French relative-age string for listing rows
pub fn relative_age(from: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - from).num_seconds().max(0);

    if secs < 60 {
        "À l'instant".to_string()
    } else if secs < 3600 {
        let minutes = secs / 60;
        format!("{} minute{}", minutes, plural(minutes))
    } else if secs < 86_400 {
        let hours = secs / 3600;
        format!("{} heure{}", hours, plural(hours))
    } else if secs < 2_592_000 {
        let days = secs / 86_400;
        format!("{} jour{}", days, plural(days))
    } else {
        from.format("%d/%m/%Y").to_string()
    }
}

fn plural(n: i64) -> &'static str {
    if n > 1 {
        "s"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn base_form() -> SubmitIncidentForm {
        SubmitIncidentForm {
            incident_type: Some("accident".to_string()),
            description: Some("Collision entre deux taxis au rond-point Deido".to_string()),
            latitude: Some("4.0511".to_string()),
            longitude: Some("9.7679".to_string()),
            city: Some("Douala".to_string()),
            district: Some("Deido".to_string()),
            severity: None,
            anonymous: false,
            photo: None,
        }
    }

    #[test]
    fn valid_form_passes_with_default_severity() {
        let incident = base_form().validate().unwrap();
        assert_eq!(incident.incident_type, IncidentType::Accident);
        assert_eq!(incident.severity, IncidentSeverity::Moderate);
        assert_eq!(incident.district.as_deref(), Some("Deido"));
    }

    #[test]
    fn all_violations_are_reported_together() {
        let form = SubmitIncidentForm {
            incident_type: None,
            description: Some("trop court".to_string()),
            latitude: Some("abc".to_string()),
            longitude: None,
            city: None,
            ..Default::default()
        };

        let errors = form.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.starts_with("type:")));
        assert!(errors.iter().any(|e| e.starts_with("description:")));
        assert!(errors.iter().any(|e| e.starts_with("latitude:")));
        assert!(errors.iter().any(|e| e.starts_with("longitude:")));
        assert!(errors.iter().any(|e| e.starts_with("city:")));
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn coordinates_must_be_inside_cameroon() {
        // Paris
        let mut form = base_form();
        form.latitude = Some("48.8566".to_string());
        form.longitude = Some("2.3522".to_string());

        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors,
            vec!["coordinates: Les coordonnées ne semblent pas être au Cameroun".to_string()]
        );
    }

    #[test]
    fn bounding_box_edges_are_accepted() {
        for (lat, lon) in [(1.6, 8.3), (13.1, 16.2), (4.05, 9.77)] {
            let mut form = base_form();
            form.latitude = Some(lat.to_string());
            form.longitude = Some(lon.to_string());
            assert!(form.validate().is_ok(), "({}, {}) rejected", lat, lon);
        }
    }

    #[test]
    fn description_length_limits() {
        let mut form = base_form();
        form.description = Some("x".repeat(1000));
        assert!(form.validate().is_ok());

        let mut form = base_form();
        form.description = Some("x".repeat(1001));
        assert!(form.validate().is_err());

        let mut form = base_form();
        form.description = Some("x".repeat(9));
        assert!(form.validate().is_err());
    }

    #[test]
    fn unknown_severity_is_rejected() {
        let mut form = base_form();
        form.severity = Some("cataclysmique".to_string());
        let errors = form.validate().unwrap_err();
        assert!(errors[0].starts_with("severity:"));
    }

    #[test]
    fn relative_age_formats() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();

        assert_eq!(relative_age(now - Duration::seconds(30), now), "À l'instant");
        assert_eq!(relative_age(now - Duration::minutes(1), now), "1 minute");
        assert_eq!(relative_age(now - Duration::minutes(5), now), "5 minutes");
        assert_eq!(relative_age(now - Duration::hours(3), now), "3 heures");
        assert_eq!(relative_age(now - Duration::days(2), now), "2 jours");
        assert_eq!(relative_age(now - Duration::days(45), now), "01/05/2025");
    }

    #[test]
    fn future_timestamps_degrade_to_just_now() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        assert_eq!(relative_age(now + Duration::minutes(5), now), "À l'instant");
    }
}
