mod incident;

pub use incident::{IncidentListRow, IncidentSeverity, IncidentStatus, IncidentType};
