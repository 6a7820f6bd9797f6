use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::registration::RegistrationListQuery;
use crate::dto::report::{
    AttendanceSummary, DashboardStats, DetailedRegistrationEntry, ParticipantProfile, PrizeSummary,
};
use crate::error::Result;
use crate::models::{
    AttendanceStatus, PaymentInfo, PaymentStatus, PrizePosition, Registration,
    RegistrationDetails, RegistrationStatus, RegistrationType, TeamMember, UserRole,
};
use crate::repository::push_search_filter;

#[derive(FromRow)]
struct DetailedRow {
    registration_id: Uuid,
    event_id: Uuid,
    user_id: Uuid,
    registration_type: RegistrationType,
    registration_number: String,
    status: RegistrationStatus,
    contact_email: String,
    contact_phone: String,
    college: Option<String>,
    department: Option<String>,
    year: Option<String>,
    city: Option<String>,
    team_name: Option<String>,
    team_members: Json<Vec<TeamMember>>,
    payment_amount: Decimal,
    payment_transaction_id: Option<String>,
    payment_screenshot_id: Option<String>,
    payment_screenshot_url: Option<String>,
    payment_status: PaymentStatus,
    special_requirements: Option<String>,
    submitted_at: chrono::NaiveDateTime,
    updated_at: chrono::NaiveDateTime,
    participant_name: String,
    participant_email: String,
    participant_phone: Option<String>,
    participant_college: Option<String>,
    participant_department: Option<String>,
    participant_year: Option<String>,
    participant_city: Option<String>,
    attendance_status: Option<AttendanceStatus>,
    check_in_time: Option<chrono::NaiveDateTime>,
    check_out_time: Option<chrono::NaiveDateTime>,
    attendance_notes: Option<String>,
    marked_at: Option<chrono::NaiveDateTime>,
}

impl DetailedRow {
    fn into_entry(self) -> DetailedRegistrationEntry {
        let details = match self.registration_type {
            RegistrationType::Individual => RegistrationDetails::Individual,
            RegistrationType::Team => RegistrationDetails::Team {
                team_name: self.team_name.unwrap_or_default(),
                team_members: self.team_members.0,
            },
        };

        let attendance = match (self.attendance_status, self.marked_at) {
            (Some(status), Some(marked_at)) => Some(AttendanceSummary {
                attendance_status: status,
                check_in_time: self.check_in_time,
                check_out_time: self.check_out_time,
                notes: self.attendance_notes,
                marked_at,
            }),
            _ => None,
        };

        DetailedRegistrationEntry {
            registration: Registration {
                registration_id: self.registration_id,
                event_id: self.event_id,
                user_id: self.user_id,
                registration_number: self.registration_number,
                status: self.status,
                details,
                contact_email: self.contact_email,
                contact_phone: self.contact_phone,
                college: self.college,
                department: self.department,
                year: self.year,
                city: self.city,
                payment: PaymentInfo {
                    amount: self.payment_amount,
                    transaction_id: self.payment_transaction_id,
                    screenshot_id: self.payment_screenshot_id,
                    screenshot_url: self.payment_screenshot_url,
                    status: self.payment_status,
                },
                special_requirements: self.special_requirements,
                submitted_at: self.submitted_at,
                updated_at: self.updated_at,
            },
            participant: ParticipantProfile {
                name: self.participant_name,
                email: self.participant_email,
                phone: self.participant_phone,
                college: self.participant_college,
                department: self.participant_department,
                year: self.participant_year,
                city: self.participant_city,
            },
            attendance,
            prizes: Vec::new(),
        }
    }
}

#[derive(FromRow)]
struct PrizeSummaryRow {
    registration_id: Option<Uuid>,
    prize_id: Uuid,
    prize_name: String,
    position: PrizePosition,
    certificate_issued: bool,
}

/// Read-only projections across registrations, users, attendance and prizes.
/// Reporting never mutates.
pub struct ReportRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReportRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// One composite row per registration of the event: registration joined
    /// with the participant profile (inner) and attendance (left), with the
    /// page's prize records attached afterwards by registration id.
    pub async fn detailed_registrations(
        &self,
        event_id: Uuid,
        query: &RegistrationListQuery,
    ) -> Result<(Vec<DetailedRegistrationEntry>, i64)> {
        let total = {
            let mut builder = QueryBuilder::new(
                r#"
                SELECT COUNT(*)
                FROM registrations r
                INNER JOIN users u ON r.user_id = u.user_id
                WHERE r.event_id =
                "#,
            );
            builder.push_bind(event_id);
            Self::push_filters(&mut builder, query);

            builder
                .build_query_scalar::<i64>()
                .fetch_one(self.pool)
                .await?
        };

        let mut builder = QueryBuilder::new(
            r#"
            SELECT r.registration_id, r.event_id, r.user_id, r.registration_type,
                   r.registration_number, r.status, r.contact_email, r.contact_phone,
                   r.college, r.department, r.year, r.city, r.team_name, r.team_members,
                   r.payment_amount, r.payment_transaction_id, r.payment_screenshot_id,
                   r.payment_screenshot_url, r.payment_status, r.special_requirements,
                   r.submitted_at, r.updated_at,
                   u.name AS participant_name,
                   u.email AS participant_email,
                   u.phone AS participant_phone,
                   u.college AS participant_college,
                   u.department AS participant_department,
                   u.year AS participant_year,
                   u.city AS participant_city,
                   a.attendance_status, a.check_in_time, a.check_out_time,
                   a.notes AS attendance_notes, a.marked_at
            FROM registrations r
            INNER JOIN users u ON r.user_id = u.user_id
            LEFT JOIN attendance a ON a.registration_id = r.registration_id
            WHERE r.event_id =
            "#,
        );
        builder.push_bind(event_id);
        Self::push_filters(&mut builder, query);
        builder.push(" ORDER BY r.submitted_at DESC OFFSET ");
        builder.push_bind(query.pagination.offset());
        builder.push(" LIMIT ");
        builder.push_bind(query.pagination.limit());

        let rows = builder
            .build_query_as::<DetailedRow>()
            .fetch_all(self.pool)
            .await?;

        let mut entries: Vec<DetailedRegistrationEntry> =
            rows.into_iter().map(DetailedRow::into_entry).collect();

        self.attach_prizes(&mut entries).await?;

        Ok((entries, total))
    }

    fn push_filters<'qb>(builder: &mut QueryBuilder<'qb, Postgres>, query: &RegistrationListQuery) {
        if let Some(status) = query.status {
            builder.push(" AND r.status = ");
            builder.push_bind(status);
        }
        if let Some(registration_type) = query.registration_type {
            builder.push(" AND r.registration_type = ");
            builder.push_bind(registration_type);
        }
        if let Some(ref search) = query.search {
            push_search_filter(
                builder,
                &["u.name", "u.email", "r.registration_number"],
                search,
            );
        }
    }

    async fn attach_prizes(&self, entries: &mut [DetailedRegistrationEntry]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let ids: Vec<Uuid> = entries
            .iter()
            .map(|e| e.registration.registration_id)
            .collect();

        let rows = sqlx::query_as::<_, PrizeSummaryRow>(
            r#"
            SELECT registration_id, prize_id, prize_name, position, certificate_issued
            FROM prizes
            WHERE registration_id = ANY($1)
            ORDER BY awarded_at
            "#,
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_registration: HashMap<Uuid, Vec<PrizeSummary>> = HashMap::new();
        for row in rows {
            if let Some(registration_id) = row.registration_id {
                by_registration
                    .entry(registration_id)
                    .or_default()
                    .push(PrizeSummary {
                        prize_id: row.prize_id,
                        prize_name: row.prize_name,
                        position: row.position,
                        certificate_issued: row.certificate_issued,
                    });
            }
        }

        for entry in entries.iter_mut() {
            if let Some(prizes) = by_registration.remove(&entry.registration.registration_id) {
                entry.prizes = prizes;
            }
        }

        Ok(())
    }

    /// Global dashboard counters: active participants, active events, all
    /// registrations, and active events that have not started yet.
    pub async fn dashboard_stats(&self, now: chrono::NaiveDateTime) -> Result<DashboardStats> {
        let total_users = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE role = $1 AND is_active",
        )
        .bind(UserRole::Participant)
        .fetch_one(self.pool)
        .await?;

        let total_events =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events WHERE is_active")
                .fetch_one(self.pool)
                .await?;

        let total_registrations =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM registrations")
                .fetch_one(self.pool)
                .await?;

        let active_events = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM events WHERE is_active AND start_date >= $1",
        )
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(DashboardStats {
            total_users,
            total_events,
            total_registrations,
            active_events,
        })
    }
}
