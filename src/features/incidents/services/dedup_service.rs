use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::incidents::models::IncidentType;
use crate::shared::constants::{DUPLICATE_RADIUS_KM, DUPLICATE_WINDOW_MINUTES, EARTH_RADIUS_KM};

/// Kilometers per degree of latitude, for the bounding-box prefilter
const KM_PER_LAT_DEGREE: f64 = 111.0;

/// Great-circle distance in kilometers (spherical law of cosines).
///
/// For identical points floating-point rounding can push the arccosine
/// argument fractionally above 1.0; the clamp keeps the result at 0 instead
/// of NaN.
pub fn great_circle_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let arg = (phi1.sin() * phi2.sin() + phi1.cos() * phi2.cos() * delta_lambda.cos())
        .clamp(-1.0, 1.0);

    EARTH_RADIUS_KM * arg.acos()
}

/// Candidate fields a submission is matched against
#[derive(Debug)]
pub struct DuplicateProbe {
    pub incident_type: IncidentType,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, FromRow)]
pub struct DuplicateCandidate {
    pub id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
}

/// Look for an open incident the submission duplicates: same type, same
/// city, status new/in_progress, created within the last hour and closer
/// than 100 m.
///
/// Runs on the ingestion transaction so the caller's advisory lock covers
/// the whole check-then-act sequence. A query failure propagates as an
/// error; it is never treated as "no duplicate found".
pub async fn find_open_duplicate(
    conn: &mut PgConnection,
    probe: &DuplicateProbe,
    now: DateTime<Utc>,
) -> Result<Option<Uuid>> {
    let window_start = now - Duration::minutes(DUPLICATE_WINDOW_MINUTES);

    // Bounding-box prefilter so the index can narrow candidates; the exact
    // great-circle filter runs below. Longitude degrees shrink with latitude.
    let lat_delta = (DUPLICATE_RADIUS_KM / KM_PER_LAT_DEGREE) * 2.0;
    let lon_delta = lat_delta / probe.latitude.to_radians().cos().abs().max(0.01);

    let candidates = sqlx::query_as::<_, DuplicateCandidate>(
        r#"
        SELECT id, latitude, longitude
        FROM incidents
        WHERE incident_type = $1
          AND city = $2
          AND status IN ('new', 'in_progress')
          AND created_at > $3
          AND latitude BETWEEN $4 AND $5
          AND longitude BETWEEN $6 AND $7
        ORDER BY created_at DESC, id ASC
        "#,
    )
    .bind(probe.incident_type)
    .bind(&probe.city)
    .bind(window_start)
    .bind(probe.latitude - lat_delta)
    .bind(probe.latitude + lat_delta)
    .bind(probe.longitude - lon_delta)
    .bind(probe.longitude + lon_delta)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| {
        tracing::error!("Duplicate check query failed: {:?}", e);
        AppError::Database(e)
    })?;

    Ok(select_duplicate(
        &candidates,
        probe.latitude,
        probe.longitude,
    ))
}

/// Pick the matching candidate. Candidates arrive ordered by most recent
/// creation then lowest id, which is the tie-break when several open
/// incidents fall inside the radius.
fn select_duplicate(candidates: &[DuplicateCandidate], lat: f64, lon: f64) -> Option<Uuid> {
    candidates
        .iter()
        .find(|c| great_circle_distance_km(lat, lon, c.latitude, c.longitude) < DUPLICATE_RADIUS_KM)
        .map(|c| c.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Rond-point Deido, Douala
    const DOUALA: (f64, f64) = (4.0511, 9.7679);
    // Poste centrale, Yaoundé
    const YAOUNDE: (f64, f64) = (3.8480, 11.5021);

    #[test]
    fn identical_points_are_zero_not_nan() {
        let d = great_circle_distance_km(DOUALA.0, DOUALA.1, DOUALA.0, DOUALA.1);
        assert!(!d.is_nan());
        assert!(d.abs() < 1e-6);
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = great_circle_distance_km(DOUALA.0, DOUALA.1, YAOUNDE.0, YAOUNDE.1);
        let ba = great_circle_distance_km(YAOUNDE.0, YAOUNDE.1, DOUALA.0, DOUALA.1);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn douala_yaounde_is_about_two_hundred_km() {
        let d = great_circle_distance_km(DOUALA.0, DOUALA.1, YAOUNDE.0, YAOUNDE.1);
        assert!(d > 180.0 && d < 220.0, "got {} km", d);
    }

    #[test]
    fn fifty_meter_offsets_stay_inside_the_radius() {
        // ~50 m north of the reference point
        let d = great_circle_distance_km(DOUALA.0, DOUALA.1, DOUALA.0 + 0.00045, DOUALA.1);
        assert!(d > 0.04 && d < 0.06, "got {} km", d);
        assert!(d < DUPLICATE_RADIUS_KM);
    }

    #[test]
    fn never_nan_across_the_bounding_box() {
        let mut lat = 1.6;
        while lat <= 13.1 {
            let mut lon = 8.3;
            while lon <= 16.2 {
                let d = great_circle_distance_km(lat, lon, lat, lon);
                assert!(!d.is_nan());
                lon += 0.9;
            }
            lat += 0.9;
        }
    }

    #[test]
    fn selects_nearby_candidate_and_skips_distant_ones() {
        let near = Uuid::new_v4();
        let far = Uuid::new_v4();
        let candidates = vec![
            DuplicateCandidate {
                id: far,
                latitude: DOUALA.0 + 0.0045, // ~500 m away
                longitude: DOUALA.1,
            },
            DuplicateCandidate {
                id: near,
                latitude: DOUALA.0 + 0.00045, // ~50 m away
                longitude: DOUALA.1,
            },
        ];

        assert_eq!(
            select_duplicate(&candidates, DOUALA.0, DOUALA.1),
            Some(near)
        );
    }

    #[test]
    fn no_candidate_inside_radius_means_no_duplicate() {
        let candidates = vec![DuplicateCandidate {
            id: Uuid::new_v4(),
            latitude: DOUALA.0 + 0.0045, // ~500 m away
            longitude: DOUALA.1,
        }];

        assert_eq!(select_duplicate(&candidates, DOUALA.0, DOUALA.1), None);
    }

    #[test]
    fn candidate_order_is_the_tie_break() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let candidates = vec![
            DuplicateCandidate {
                id: first,
                latitude: DOUALA.0,
                longitude: DOUALA.1,
            },
            DuplicateCandidate {
                id: second,
                latitude: DOUALA.0 + 0.0002,
                longitude: DOUALA.1,
            },
        ];

        // Both are inside the radius; the query's ordering decides.
        assert_eq!(
            select_duplicate(&candidates, DOUALA.0, DOUALA.1),
            Some(first)
        );
    }
}
