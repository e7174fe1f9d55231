use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::activity::ActivityLogService;
use crate::features::auth::models::AuthenticatedUser;
use crate::features::incidents::dtos::{ListIncidentsQuery, NewIncident, PhotoUpload};
use crate::features::incidents::models::IncidentListRow;
use crate::features::incidents::services::dedup_service::{self, DuplicateProbe};
use crate::features::notifications::NotificationService;
use crate::modules::storage::MinIOClient;
use crate::shared::constants::{ALLOWED_PHOTO_TYPES, MAX_PHOTO_BYTES};
use crate::shared::types::RequestMeta;

/// Result of a submission: a fresh incident or a confirmation folded into an
/// open one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Created(Uuid),
    Confirmed(Uuid),
}

impl SubmissionOutcome {
    pub fn incident_id(&self) -> Uuid {
        match self {
            SubmissionOutcome::Created(id) | SubmissionOutcome::Confirmed(id) => *id,
        }
    }
}

/// Service for incident ingestion and listing
pub struct IncidentService {
    pool: PgPool,
    storage: Arc<MinIOClient>,
    notifications: Arc<NotificationService>,
    activity: Arc<ActivityLogService>,
}

impl IncidentService {
    pub fn new(
        pool: PgPool,
        storage: Arc<MinIOClient>,
        notifications: Arc<NotificationService>,
        activity: Arc<ActivityLogService>,
    ) -> Self {
        Self {
            pool,
            storage,
            notifications,
            activity,
        }
    }

    /// Ingest a validated submission.
    ///
    /// The duplicate check and the insert run in one transaction under an
    /// advisory lock keyed on (type, city), so two simultaneous reports of
    /// the same event serialize: the second one lands as a confirmation
    /// instead of a second row. The photo is stored before the insert; an
    /// upload failure rolls everything back and leaves no incident row.
    pub async fn submit(
        &self,
        reporter: Option<&AuthenticatedUser>,
        incident: NewIncident,
        meta: &RequestMeta,
    ) -> Result<SubmissionOutcome> {
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        let lock_key = format!("{}:{}", incident.incident_type, incident.city);
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&lock_key)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to take submission lock: {:?}", e);
                AppError::Database(e)
            })?;

        let probe = DuplicateProbe {
            incident_type: incident.incident_type,
            city: incident.city.clone(),
            latitude: incident.latitude,
            longitude: incident.longitude,
        };

        if let Some(existing_id) = dedup_service::find_open_duplicate(&mut tx, &probe, now).await? {
            sqlx::query(
                "UPDATE incidents SET extra_reports = extra_reports + 1, updated_at = NOW() WHERE id = $1",
            )
            .bind(existing_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to increment extra reports: {:?}", e);
                AppError::Database(e)
            })?;

            tx.commit().await?;

            tracing::info!(
                "Folded duplicate report into incident {} ({} in {})",
                existing_id,
                incident.incident_type,
                incident.city
            );

            return Ok(SubmissionOutcome::Confirmed(existing_id));
        }

        let photo_key = match &incident.photo {
            Some(photo) => Some(self.store_photo(photo).await?),
            None => None,
        };

        let insert_result: std::result::Result<Uuid, sqlx::Error> = sqlx::query_scalar(
            r#"
            INSERT INTO incidents (
                reporter_id, incident_type, description, latitude, longitude,
                city, district, severity, photo_key, anonymous
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(reporter.map(|u| u.id))
        .bind(incident.incident_type)
        .bind(&incident.description)
        .bind(incident.latitude)
        .bind(incident.longitude)
        .bind(&incident.city)
        .bind(&incident.district)
        .bind(incident.severity)
        .bind(&photo_key)
        .bind(incident.anonymous)
        .fetch_one(&mut *tx)
        .await;

        let incident_id = match insert_result {
            Ok(id) => id,
            Err(e) => {
                tracing::error!("Failed to insert incident: {:?}", e);
                // The incident row is gone with the rollback; don't leave the
                // photo stranded in the bucket.
                if let Some(key) = &photo_key {
                    if let Err(cleanup) = self.storage.delete(key).await {
                        tracing::warn!("Failed to clean up photo '{}': {}", key, cleanup);
                    }
                }
                return Err(AppError::Database(e));
            }
        };

        tx.commit().await?;

        tracing::info!(
            "Created incident {} ({} in {})",
            incident_id,
            incident.incident_type,
            incident.city
        );

        // Fan-out and activity logging are best-effort: the incident is
        // committed, a failure here must not fail the submission.
        if !incident.anonymous {
            if let Err(e) = self
                .notifications
                .fan_out_new_incident(
                    incident_id,
                    incident.incident_type,
                    &incident.city,
                    reporter.map(|u| u.id),
                )
                .await
            {
                tracing::warn!(
                    "Notification fan-out failed for incident {}: {}",
                    incident_id,
                    e
                );
            }
        }

        if let Some(reporter) = reporter {
            if let Err(e) = self
                .activity
                .record(
                    reporter.id,
                    "incident_created",
                    Some(serde_json::json!({
                        "incident_id": incident_id,
                        "type": incident.incident_type,
                        "city": incident.city,
                    })),
                    meta.ip_address.as_deref(),
                    meta.user_agent.as_deref(),
                )
                .await
            {
                tracing::warn!("Failed to log submission for {}: {}", reporter.id, e);
            }
        }

        Ok(SubmissionOutcome::Created(incident_id))
    }

    /// Validate and store a photo, returning its object key.
    async fn store_photo(&self, photo: &PhotoUpload) -> Result<String> {
        if photo.data.len() > MAX_PHOTO_BYTES {
            return Err(AppError::Upload(
                "La photo est trop volumineuse (max 5 Mo)".to_string(),
            ));
        }

        if !ALLOWED_PHOTO_TYPES.contains(&photo.content_type.as_str()) {
            return Err(AppError::Upload(format!(
                "Type de fichier non autorisé: {}. Types acceptés: {}",
                photo.content_type,
                ALLOWED_PHOTO_TYPES.join(", ")
            )));
        }

        let extension = match photo.content_type.as_str() {
            "image/png" => "png",
            _ => "jpg",
        };
        let key = self
            .storage
            .photo_key(&format!("incidents/{}.{}", Uuid::new_v4(), extension));

        tracing::debug!(
            "Storing photo '{}' ({} bytes) as '{}'",
            photo.file_name,
            photo.data.len(),
            key
        );

        self.storage
            .upload(&key, photo.data.clone(), &photo.content_type)
            .await
            .map_err(|e| {
                tracing::error!("Photo upload failed: {}", e);
                AppError::Upload("Erreur lors de la sauvegarde de la photo".to_string())
            })?;

        Ok(key)
    }

    /// List incidents with optional filters, newest first.
    pub async fn list(&self, query: &ListIncidentsQuery) -> Result<(Vec<IncidentListRow>, i64)> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM incidents i
            WHERE ($1::text IS NULL OR i.city = $1)
              AND ($2::incident_type IS NULL OR i.incident_type = $2)
              AND ($3::incident_status IS NULL OR i.status = $3)
            "#,
        )
        .bind(&query.city)
        .bind(query.incident_type)
        .bind(query.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count incidents: {:?}", e);
            AppError::Database(e)
        })?;

        let rows = sqlx::query_as::<_, IncidentListRow>(
            r#"
            SELECT
                i.id, i.incident_type, i.description, i.latitude, i.longitude,
                i.city, i.district, i.severity, i.status, i.photo_key,
                i.anonymous, i.extra_reports, i.created_at, i.updated_at,
                u.first_name AS reporter_first_name,
                u.last_name AS reporter_last_name
            FROM incidents i
            LEFT JOIN users u ON u.id = i.reporter_id
            WHERE ($1::text IS NULL OR i.city = $1)
              AND ($2::incident_type IS NULL OR i.incident_type = $2)
              AND ($3::incident_status IS NULL OR i.status = $3)
            ORDER BY i.created_at DESC
            OFFSET $4 LIMIT $5
            "#,
        )
        .bind(&query.city)
        .bind(query.incident_type)
        .bind(query.status)
        .bind(query.offset())
        .bind(query.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list incidents: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((rows, total))
    }

    /// Direct URL for a stored photo key
    pub fn photo_url(&self, key: &str) -> String {
        self.storage.public_url(key)
    }
}
