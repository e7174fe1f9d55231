pub mod dedup_service;
mod incident_service;

pub use dedup_service::great_circle_distance_km;
pub use incident_service::{IncidentService, SubmissionOutcome};
