use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};

use crate::core::error::{AppError, Result};
use crate::features::incidents::models::{IncidentStatus, IncidentType};
use crate::features::stats::dtos::{
    CityCountDto, DailyCountDto, StatsDto, StatusCountDto, TopReporterDto, TypeCountDto,
};

#[derive(FromRow)]
struct SummaryRow {
    total_incidents: i64,
    resolved_incidents: i64,
    incidents_today: i64,
    incidents_this_week: i64,
}

#[derive(FromRow)]
struct TypeCountRow {
    incident_type: IncidentType,
    count: i64,
}

#[derive(FromRow)]
struct CityCountRow {
    city: String,
    count: i64,
}

#[derive(FromRow)]
struct StatusCountRow {
    status: IncidentStatus,
    count: i64,
}

#[derive(FromRow)]
struct DailyCountRow {
    date: NaiveDate,
    count: i64,
}

#[derive(FromRow)]
struct TopReporterRow {
    first_name: String,
    last_name: String,
    incidents_count: i64,
}

/// Service for public aggregate statistics
pub struct StatsService {
    pool: PgPool,
}

impl StatsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_stats(&self) -> Result<StatsDto> {
        let summary = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT
                COUNT(*) AS total_incidents,
                COUNT(*) FILTER (WHERE status = 'resolved') AS resolved_incidents,
                COUNT(*) FILTER (WHERE created_at::date = CURRENT_DATE) AS incidents_today,
                COUNT(*) FILTER (WHERE created_at >= date_trunc('week', CURRENT_DATE)) AS incidents_this_week
            FROM incidents
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get summary counts: {:?}", e);
            AppError::Database(e)
        })?;

        let total_users: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_active = TRUE")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to count users: {:?}", e);
                    AppError::Database(e)
                })?;

        let by_type = sqlx::query_as::<_, TypeCountRow>(
            r#"
            SELECT incident_type, COUNT(*) AS count
            FROM incidents
            WHERE created_at >= NOW() - INTERVAL '30 days'
            GROUP BY incident_type
            ORDER BY count DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get per-type counts: {:?}", e);
            AppError::Database(e)
        })?;

        let by_city = sqlx::query_as::<_, CityCountRow>(
            r#"
            SELECT city, COUNT(*) AS count
            FROM incidents
            WHERE created_at >= NOW() - INTERVAL '30 days'
            GROUP BY city
            ORDER BY count DESC
            LIMIT 10
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get per-city counts: {:?}", e);
            AppError::Database(e)
        })?;

        let by_status = sqlx::query_as::<_, StatusCountRow>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM incidents
            GROUP BY status
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get per-status counts: {:?}", e);
            AppError::Database(e)
        })?;

        let weekly = sqlx::query_as::<_, DailyCountRow>(
            r#"
            SELECT created_at::date AS date, COUNT(*) AS count
            FROM incidents
            WHERE created_at >= NOW() - INTERVAL '7 days'
            GROUP BY created_at::date
            ORDER BY date
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get weekly evolution: {:?}", e);
            AppError::Database(e)
        })?;

        let avg_resolution_hours: Option<f64> = sqlx::query_scalar(
            r#"
            SELECT (AVG(EXTRACT(EPOCH FROM (resolved_at - created_at)) / 3600.0))::double precision
            FROM incidents
            WHERE status = 'resolved'
              AND resolved_at IS NOT NULL
              AND created_at >= NOW() - INTERVAL '30 days'
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get average resolution time: {:?}", e);
            AppError::Database(e)
        })?;

        let top_reporters = sqlx::query_as::<_, TopReporterRow>(
            r#"
            SELECT u.first_name, u.last_name, COUNT(i.id) AS incidents_count
            FROM users u
            JOIN incidents i ON i.reporter_id = u.id
            WHERE i.anonymous = FALSE
              AND i.created_at >= NOW() - INTERVAL '30 days'
            GROUP BY u.id, u.first_name, u.last_name
            ORDER BY incidents_count DESC
            LIMIT 5
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get top reporters: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(StatsDto {
            total_incidents: summary.total_incidents,
            resolved_incidents: summary.resolved_incidents,
            total_users,
            incidents_today: summary.incidents_today,
            incidents_this_week: summary.incidents_this_week,
            incidents_by_type: by_type
                .into_iter()
                .map(|r| TypeCountDto {
                    incident_type: r.incident_type,
                    count: r.count,
                })
                .collect(),
            incidents_by_city: by_city
                .into_iter()
                .map(|r| CityCountDto {
                    city: r.city,
                    count: r.count,
                })
                .collect(),
            incidents_by_status: by_status
                .into_iter()
                .map(|r| StatusCountDto {
                    status: r.status,
                    count: r.count,
                })
                .collect(),
            weekly_evolution: weekly
                .into_iter()
                .map(|r| DailyCountDto {
                    date: r.date,
                    count: r.count,
                })
                .collect(),
            avg_resolution_hours: round_to_tenth(avg_resolution_hours.unwrap_or(0.0)),
            top_reporters: top_reporters
                .into_iter()
                .map(|r| TopReporterDto {
                    name: abbreviate(&r.first_name, &r.last_name),
                    incidents_count: r.incidents_count,
                })
                .collect(),
        })
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn abbreviate(first_name: &str, last_name: &str) -> String {
    match last_name.chars().next() {
        Some(initial) => format!("{} {}.", first_name, initial),
        None => first_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_hours_are_rounded_to_one_decimal() {
        assert_eq!(round_to_tenth(3.14159), 3.1);
        assert_eq!(round_to_tenth(3.15), 3.2);
        assert_eq!(round_to_tenth(0.0), 0.0);
    }

    #[test]
    fn reporter_names_are_abbreviated() {
        assert_eq!(abbreviate("Paul", "Biyick"), "Paul B.");
        assert_eq!(abbreviate("Paul", ""), "Paul");
    }
}
