use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::activity::dtos as activity_dtos;
use crate::features::activity::handlers::activity_handler;
use crate::features::auth::dtos as auth_dtos;
use crate::features::auth::handlers::auth_handler;
use crate::features::auth::models::AuthenticatedUser;
use crate::features::favorites::dtos as favorites_dtos;
use crate::features::favorites::handlers::favorite_handler;
use crate::features::incidents::dtos as incidents_dtos;
use crate::features::incidents::handlers::incident_handler;
use crate::features::incidents::models as incidents_models;
use crate::features::notifications::dtos as notifications_dtos;
use crate::features::notifications::handlers::notification_handler;
use crate::features::stats::dtos as stats_dtos;
use crate::features::stats::handlers::stats_handler;
use crate::shared::types::{ApiResponse, PaginationMeta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handler::register,
        auth_handler::login,
        auth_handler::me,
        // Incidents
        incident_handler::submit_incident,
        incident_handler::list_incidents,
        // Stats
        stats_handler::get_stats,
        // Favorites
        favorite_handler::list_favorites,
        favorite_handler::add_favorite,
        favorite_handler::remove_favorite,
        favorite_handler::toggle_notifications,
        // Notifications
        notification_handler::list_notifications,
        notification_handler::mark_notification_read,
        // Activity
        activity_handler::list_activity,
    ),
    components(
        schemas(
            // Shared
            PaginationMeta,
            // Auth
            AuthenticatedUser,
            auth_dtos::RegisterRequestDto,
            auth_dtos::RegisterResponseDto,
            auth_dtos::LoginRequestDto,
            auth_dtos::LoginResponseDto,
            auth_dtos::AuthUserDto,
            ApiResponse<auth_dtos::RegisterResponseDto>,
            ApiResponse<auth_dtos::LoginResponseDto>,
            ApiResponse<AuthenticatedUser>,
            // Incidents
            incidents_models::IncidentType,
            incidents_models::IncidentSeverity,
            incidents_models::IncidentStatus,
            incidents_dtos::IncidentDto,
            incidents_dtos::SubmitIncidentRequestDto,
            incidents_dtos::SubmitIncidentResponseDto,
            ApiResponse<Vec<incidents_dtos::IncidentDto>>,
            ApiResponse<incidents_dtos::SubmitIncidentResponseDto>,
            // Stats
            stats_dtos::StatsDto,
            stats_dtos::TypeCountDto,
            stats_dtos::CityCountDto,
            stats_dtos::StatusCountDto,
            stats_dtos::DailyCountDto,
            stats_dtos::TopReporterDto,
            ApiResponse<stats_dtos::StatsDto>,
            // Favorites
            favorites_dtos::AddFavoriteCityDto,
            favorites_dtos::FavoriteCityDto,
            favorites_dtos::ToggleNotificationsResponseDto,
            ApiResponse<Vec<favorites_dtos::FavoriteCityDto>>,
            ApiResponse<favorites_dtos::FavoriteCityDto>,
            ApiResponse<favorites_dtos::ToggleNotificationsResponseDto>,
            // Notifications
            notifications_dtos::NotificationDto,
            notifications_dtos::NotificationListDto,
            ApiResponse<notifications_dtos::NotificationListDto>,
            // Activity
            activity_dtos::ActivityLogDto,
            ApiResponse<Vec<activity_dtos::ActivityLogDto>>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and token verification"),
        (name = "incidents", description = "Incident submission and listing"),
        (name = "stats", description = "Public aggregate statistics"),
        (name = "favorites", description = "Cities followed for notifications"),
        (name = "notifications", description = "In-app notifications"),
        (name = "activity", description = "Per-user activity log"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "RouteAlert API",
        version = "0.1.0",
        description = "API documentation for RouteAlert Cameroun",
    )
)]
pub struct ApiDoc;

/// Adds Bearer token security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
