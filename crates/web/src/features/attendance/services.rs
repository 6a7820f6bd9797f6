use chrono::Utc;
use sqlx::PgPool;
use storage::dto::attendance::{
    AttendanceEntry, AttendanceListQuery, AttendanceStatistics, MarkAttendanceRequest,
    render_attendance_csv,
};
use storage::models::{Attendance, AttendanceStatus};
use storage::repository::attendance::{AttendanceMark, AttendanceRepository};
use storage::repository::event::EventRepository;
use storage::repository::registration::RegistrationRepository;
use uuid::Uuid;

use crate::error::{WebError, WebResult, not_found_as};

/// Record one attendance outcome for a registration. Idempotent: the first
/// mark for an (event, participant) pair creates the row, later marks
/// overwrite status, notes and the marking admin in place. The check-in time
/// is stamped on the first `present` mark and kept afterwards.
///
/// `admin_id` is the already-resolved admin identity injected by the caller;
/// this service never provisions one.
pub async fn mark_attendance(
    pool: &PgPool,
    event_id: Uuid,
    registration_id: Uuid,
    request: &MarkAttendanceRequest,
    admin_id: Uuid,
) -> WebResult<Attendance> {
    EventRepository::new(pool)
        .find_by_id(event_id)
        .await
        .map_err(not_found_as("Event not found"))?;

    let registration = RegistrationRepository::new(pool)
        .find_by_id(registration_id)
        .await
        .map_err(not_found_as("Registration not found for this event"))?;
    if registration.event_id != event_id {
        return Err(WebError::NotFound(
            "Registration not found for this event".to_string(),
        ));
    }

    let now = Utc::now().naive_utc();
    let mark = AttendanceMark {
        event_id,
        registration_id,
        user_id: registration.user_id,
        status: request.attendance_status,
        check_in_candidate: (request.attendance_status == AttendanceStatus::Present)
            .then_some(now),
        notes: request.notes.clone(),
        marked_by: admin_id,
        marked_at: now,
    };

    let attendance = AttendanceRepository::new(pool).upsert(&mark).await?;

    Ok(attendance)
}

/// Attendance for an event, joined with participant and registration
/// metadata, plus the event-wide statistics block.
pub async fn list_event_attendance(
    pool: &PgPool,
    event_id: Uuid,
    query: &AttendanceListQuery,
) -> WebResult<(Vec<AttendanceEntry>, AttendanceStatistics, i64)> {
    EventRepository::new(pool)
        .find_by_id(event_id)
        .await
        .map_err(not_found_as("Event not found"))?;

    let (entries, total) = AttendanceRepository::new(pool)
        .list_by_event(event_id, query)
        .await?;
    let statistics = statistics(pool, event_id).await?;

    Ok((entries, statistics, total))
}

/// Counts per attendance status plus how many of the event's registrations
/// have been marked at all.
pub async fn statistics(pool: &PgPool, event_id: Uuid) -> WebResult<AttendanceStatistics> {
    let counts = AttendanceRepository::new(pool)
        .status_counts(event_id)
        .await?;
    let total_registrations = RegistrationRepository::new(pool)
        .count_by_event(event_id)
        .await?;

    Ok(AttendanceStatistics::from_counts(&counts, total_registrations))
}

/// CSV export: one header row plus one row per attendance record.
pub async fn export_event_attendance(pool: &PgPool, event_id: Uuid) -> WebResult<String> {
    EventRepository::new(pool)
        .find_by_id(event_id)
        .await
        .map_err(not_found_as("Event not found"))?;

    let rows = AttendanceRepository::new(pool).export_rows(event_id).await?;

    Ok(render_attendance_csv(&rows))
}
