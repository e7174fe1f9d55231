pub mod incident_handler;

pub use incident_handler::{list_incidents, submit_incident};
