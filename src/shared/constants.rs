/// Default page size for incident listings
pub const DEFAULT_PAGE_SIZE: i64 = 100;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 500;

// =============================================================================
// GEOGRAPHY
// =============================================================================

/// Bounding box approximating Cameroon. Coordinates outside this box are
/// rejected at submission time.
pub const CAMEROON_LAT_MIN: f64 = 1.6;
pub const CAMEROON_LAT_MAX: f64 = 13.1;
pub const CAMEROON_LON_MIN: f64 = 8.3;
pub const CAMEROON_LON_MAX: f64 = 16.2;

/// Earth radius in kilometers for great-circle distance
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// =============================================================================
// DEDUPLICATION POLICY
// =============================================================================

/// Two open reports of the same type in the same city closer than this are
/// treated as the same real-world incident.
pub const DUPLICATE_RADIUS_KM: f64 = 0.1;

/// Only incidents created within this window are candidates for matching.
pub const DUPLICATE_WINDOW_MINUTES: i64 = 60;

// =============================================================================
// PHOTO UPLOADS
// =============================================================================

/// Maximum accepted photo size (5 MB)
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Accepted photo MIME types
pub const ALLOWED_PHOTO_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Citizen role - can report incidents and manage their favorites
#[allow(dead_code)]
pub const ROLE_CITIZEN: &str = "citizen";

/// Admin role - moderates incidents and accounts
#[allow(dead_code)]
pub const ROLE_ADMIN: &str = "admin";
