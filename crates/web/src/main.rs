use anyhow::Context;
use axum::Router;
use chrono::Utc;
use storage::Database;
use storage::repository::user::UserRepository;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;

use config::Config;
use features::{attendance, prizes, registrations, reports};
use middleware::auth::ApiKeys;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::registrations::handlers::create_registration,
        features::registrations::handlers::list_my_registrations,
        features::registrations::handlers::get_registration,
        features::registrations::handlers::update_registration_status,
        features::registrations::handlers::count_event_registrations,
        features::attendance::handlers::mark_attendance,
        features::attendance::handlers::list_event_attendance,
        features::attendance::handlers::export_event_attendance,
        features::prizes::handlers::add_prize,
        features::prizes::handlers::list_event_prizes,
        features::prizes::handlers::update_prize,
        features::prizes::handlers::delete_prize,
        features::reports::handlers::detailed_registrations,
        features::reports::handlers::dashboard_stats,
    ),
    components(
        schemas(
            storage::dto::common::PageInfo,
            storage::dto::registration::CreateRegistrationRequest,
            storage::dto::registration::UpdateRegistrationStatusRequest,
            storage::dto::registration::TeamMemberPayload,
            storage::dto::registration::UploadRef,
            storage::dto::registration::RegistrationListResponse,
            storage::dto::registration::RegistrationCountResponse,
            storage::dto::attendance::MarkAttendanceRequest,
            storage::dto::attendance::AttendanceEntry,
            storage::dto::attendance::AttendanceListResponse,
            storage::dto::attendance::AttendanceStatistics,
            storage::dto::attendance::ParticipantInfo,
            storage::dto::attendance::RegistrationRef,
            storage::dto::prize::AddPrizeRequest,
            storage::dto::prize::UpdatePrizeRequest,
            storage::dto::prize::PrizeListResponse,
            storage::dto::prize::PrizeStatistics,
            storage::dto::prize::PrizePositionStat,
            storage::dto::report::DetailedRegistrationsResponse,
            storage::dto::report::DetailedRegistrationEntry,
            storage::dto::report::ParticipantProfile,
            storage::dto::report::AttendanceSummary,
            storage::dto::report::PrizeSummary,
            storage::dto::report::RegistrationStatistics,
            storage::dto::report::DashboardStats,
            storage::models::Registration,
            storage::models::RegistrationDetails,
            storage::models::RegistrationStatus,
            storage::models::RegistrationType,
            storage::models::PaymentInfo,
            storage::models::PaymentStatus,
            storage::models::TeamMember,
            storage::models::Attendance,
            storage::models::AttendanceStatus,
            storage::models::Prize,
            storage::models::PrizeWinner,
            storage::models::PrizePosition,
            storage::models::WinnerType,
            storage::models::Event,
            storage::models::User,
            storage::models::UserRole,
        )
    ),
    tags(
        (name = "registrations", description = "Participant registration endpoints"),
        (name = "attendance", description = "Admin attendance marking and export"),
        (name = "prizes", description = "Admin prize management"),
        (name = "reports", description = "Admin reporting and dashboards"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting event registration API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    // One-time bootstrap: seed an admin identity on a fresh install so
    // attendance marking and prize awards have a resolvable actor. Request
    // handling itself never provisions identities.
    if let Some(ref email) = config.bootstrap_admin_email {
        let name = config.bootstrap_admin_name.as_deref().unwrap_or("System Admin");
        let created = UserRepository::new(db.pool())
            .ensure_bootstrap_admin(name, email, Utc::now().naive_utc())
            .await
            .context("Failed to seed bootstrap admin")?;
        if created {
            tracing::info!(%email, "Seeded bootstrap admin identity");
        }
    }

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);

    let api = Router::new()
        .merge(registrations::routes::routes(api_keys.clone()))
        .merge(attendance::routes::routes(api_keys.clone()))
        .merge(prizes::routes::routes(api_keys.clone()))
        .merge(reports::routes::routes(api_keys));

    let app = Router::new()
        .nest("/api", api)
        .with_state(db)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive());

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
