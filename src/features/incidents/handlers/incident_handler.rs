use std::sync::Arc;

use axum::{
    extract::{Multipart, Query, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::core::middleware::MaybeUser;
use crate::features::incidents::dtos::{
    IncidentDto, ListIncidentsQuery, PhotoUpload, SubmitIncidentForm, SubmitIncidentRequestDto,
    SubmitIncidentResponseDto,
};
use crate::features::incidents::services::{IncidentService, SubmissionOutcome};
use crate::shared::types::{ApiResponse, PaginationMeta, RequestMeta};

/// Submit an incident report
///
/// Accepts multipart/form-data with `type`, `description`, `latitude`,
/// `longitude`, `city` and optional `district`, `severity`, `anonymous`,
/// `photo` fields. A bearer token identifies the reporter; anonymous
/// submissions work without one.
#[utoipa::path(
    post,
    path = "/api/incidents",
    request_body(
        content = SubmitIncidentRequestDto,
        content_type = "multipart/form-data",
        description = "Incident submission form",
    ),
    responses(
        (status = 200, description = "Incident recorded (new or confirmation)", body = ApiResponse<SubmitIncidentResponseDto>),
        (status = 400, description = "Validation or upload error"),
        (status = 401, description = "Missing identity for a non-anonymous report")
    ),
    security((), ("bearer_auth" = [])),
    tag = "incidents"
)]
pub async fn submit_incident(
    MaybeUser(user): MaybeUser,
    State(service): State<Arc<IncidentService>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<ApiResponse<SubmitIncidentResponseDto>>> {
    let form = read_submission_form(multipart).await?;

    if !form.anonymous && user.is_none() {
        return Err(AppError::Auth(
            "Authentification requise pour les signalements non anonymes".to_string(),
        ));
    }

    let incident = form.validate().map_err(AppError::Validation)?;

    let meta = RequestMeta::from_headers(&headers);
    let outcome = service.submit(user.as_ref(), incident, &meta).await?;

    let (message, duplicate) = match outcome {
        SubmissionOutcome::Created(_) => ("Incident signalé avec succès", false),
        SubmissionOutcome::Confirmed(_) => (
            "Incident similaire déjà signalé. Votre signalement a été ajouté comme confirmation.",
            true,
        ),
    };

    Ok(Json(ApiResponse::success(
        Some(SubmitIncidentResponseDto {
            incident_id: outcome.incident_id(),
            duplicate,
        }),
        Some(message.to_string()),
        None,
    )))
}

/// List incidents with optional city/type/status filters
#[utoipa::path(
    get,
    path = "/api/incidents",
    params(ListIncidentsQuery),
    responses(
        (status = 200, description = "Incident list", body = ApiResponse<Vec<IncidentDto>>)
    ),
    tag = "incidents"
)]
pub async fn list_incidents(
    State(service): State<Arc<IncidentService>>,
    Query(query): Query<ListIncidentsQuery>,
) -> Result<Json<ApiResponse<Vec<IncidentDto>>>> {
    let (rows, total) = service.list(&query).await?;

    let now = Utc::now();
    let dtos: Vec<IncidentDto> = rows
        .into_iter()
        .map(|row| {
            let photo_url = row.photo_key.as_deref().map(|key| service.photo_url(key));
            IncidentDto::from_row(row, photo_url, now)
        })
        .collect();

    let meta = PaginationMeta::new(query.limit(), query.offset(), total);

    Ok(Json(ApiResponse::success(Some(dtos), None, Some(meta))))
}

/// Collect the multipart fields of a submission
async fn read_submission_form(mut multipart: Multipart) -> Result<SubmitIncidentForm> {
    let mut form = SubmitIncidentForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "photo" => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let file_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "photo".to_string());
                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read photo bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read photo data: {}", e))
                })?;

                // An empty file input arrives as a zero-length part
                if !data.is_empty() {
                    form.photo = Some(PhotoUpload {
                        data: data.to_vec(),
                        content_type,
                        file_name,
                    });
                }
            }
            "anonymous" => {
                let text = read_text_field(field).await?;
                form.anonymous = matches!(text.trim(), "1" | "true" | "on");
            }
            "type" => form.incident_type = Some(read_text_field(field).await?),
            "description" => form.description = Some(read_text_field(field).await?),
            "latitude" => form.latitude = Some(read_text_field(field).await?),
            "longitude" => form.longitude = Some(read_text_field(field).await?),
            "city" => form.city = Some(read_text_field(field).await?),
            "district" => form.district = Some(read_text_field(field).await?),
            "severity" => form.severity = Some(read_text_field(field).await?),
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    Ok(form)
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read form field: {}", e)))
}
