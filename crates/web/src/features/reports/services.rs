use chrono::Utc;
use sqlx::PgPool;
use storage::dto::registration::RegistrationListQuery;
use storage::dto::report::{DashboardStats, DetailedRegistrationEntry, RegistrationStatistics};
use storage::repository::attendance::AttendanceRepository;
use storage::repository::event::EventRepository;
use storage::repository::registration::RegistrationRepository;
use storage::repository::report::ReportRepository;
use uuid::Uuid;

use crate::error::{WebResult, not_found_as};

/// The admin's detailed event view: one composite row per registration
/// (registration ⋈ participant ⋈ attendance, with prize records attached),
/// plus status and attendance breakdowns over the whole event.
pub async fn detailed_registrations(
    pool: &PgPool,
    event_id: Uuid,
    query: &RegistrationListQuery,
) -> WebResult<(Vec<DetailedRegistrationEntry>, RegistrationStatistics, i64)> {
    EventRepository::new(pool)
        .find_by_id(event_id)
        .await
        .map_err(not_found_as("Event not found"))?;

    let (entries, total) = ReportRepository::new(pool)
        .detailed_registrations(event_id, query)
        .await?;

    let status_counts = RegistrationRepository::new(pool)
        .status_counts(event_id)
        .await?;
    let attendance_counts = AttendanceRepository::new(pool)
        .status_counts(event_id)
        .await?;
    let statistics = RegistrationStatistics::from_counts(&status_counts, &attendance_counts);

    Ok((entries, statistics, total))
}

/// Global dashboard counters.
pub async fn dashboard_stats(pool: &PgPool) -> WebResult<DashboardStats> {
    let stats = ReportRepository::new(pool)
        .dashboard_stats(Utc::now().naive_utc())
        .await?;

    Ok(stats)
}
