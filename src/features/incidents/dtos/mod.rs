mod incident_dto;

pub use incident_dto::{
    IncidentDto, ListIncidentsQuery, NewIncident, PhotoUpload, SubmitIncidentForm,
    SubmitIncidentRequestDto, SubmitIncidentResponseDto,
};
