use sqlx::{FromRow, PgPool, QueryBuilder};
use uuid::Uuid;

use crate::dto::attendance::{
    AttendanceEntry, AttendanceExportRow, AttendanceListQuery, ParticipantInfo, RegistrationRef,
};
use crate::error::Result;
use crate::models::{Attendance, AttendanceStatus, RegistrationType};
use crate::repository::push_search_filter;

/// Fields written by a single mark operation.
pub struct AttendanceMark {
    pub event_id: Uuid,
    pub registration_id: Uuid,
    pub user_id: Uuid,
    pub status: AttendanceStatus,
    /// Check-in stamp for a `present` mark; `COALESCE` in the upsert keeps
    /// the stamp of the first present-mark once one exists.
    pub check_in_candidate: Option<chrono::NaiveDateTime>,
    pub notes: Option<String>,
    pub marked_by: Uuid,
    pub marked_at: chrono::NaiveDateTime,
}

#[derive(FromRow)]
struct AttendanceListRow {
    attendance_id: Uuid,
    event_id: Uuid,
    registration_id: Uuid,
    user_id: Uuid,
    attendance_status: AttendanceStatus,
    check_in_time: Option<chrono::NaiveDateTime>,
    check_out_time: Option<chrono::NaiveDateTime>,
    notes: Option<String>,
    marked_by: Uuid,
    marked_at: chrono::NaiveDateTime,
    participant_name: String,
    participant_email: String,
    participant_phone: Option<String>,
    registration_number: String,
    registration_type: RegistrationType,
    team_name: Option<String>,
    marked_by_name: Option<String>,
}

impl AttendanceListRow {
    fn into_entry(self) -> AttendanceEntry {
        AttendanceEntry {
            attendance: Attendance {
                attendance_id: self.attendance_id,
                event_id: self.event_id,
                registration_id: self.registration_id,
                user_id: self.user_id,
                attendance_status: self.attendance_status,
                check_in_time: self.check_in_time,
                check_out_time: self.check_out_time,
                notes: self.notes,
                marked_by: self.marked_by,
                marked_at: self.marked_at,
            },
            participant: ParticipantInfo {
                name: self.participant_name,
                email: self.participant_email,
                phone: self.participant_phone,
            },
            registration: RegistrationRef {
                registration_number: self.registration_number,
                registration_type: self.registration_type,
                team_name: self.team_name,
            },
            marked_by_name: self.marked_by_name,
        }
    }
}

pub struct AttendanceRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AttendanceRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Idempotent mark: the first call for an (event, participant) pair
    /// inserts, later calls overwrite status, notes, marked_by and marked_at
    /// in place. The unique index on (event_id, user_id) is the sole
    /// concurrency control; a concurrent second writer lands as an update on
    /// the first writer's row.
    pub async fn upsert(&self, mark: &AttendanceMark) -> Result<Attendance> {
        let attendance = sqlx::query_as::<_, Attendance>(
            r#"
            INSERT INTO attendance (
                attendance_id, event_id, registration_id, user_id,
                attendance_status, check_in_time, notes, marked_by, marked_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (event_id, user_id) DO UPDATE SET
                attendance_status = EXCLUDED.attendance_status,
                notes = EXCLUDED.notes,
                marked_by = EXCLUDED.marked_by,
                marked_at = EXCLUDED.marked_at,
                check_in_time = COALESCE(attendance.check_in_time, EXCLUDED.check_in_time)
            RETURNING attendance_id, event_id, registration_id, user_id,
                      attendance_status, check_in_time, check_out_time, notes,
                      marked_by, marked_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(mark.event_id)
        .bind(mark.registration_id)
        .bind(mark.user_id)
        .bind(mark.status)
        .bind(mark.check_in_candidate)
        .bind(&mark.notes)
        .bind(mark.marked_by)
        .bind(mark.marked_at)
        .fetch_one(self.pool)
        .await?;

        Ok(attendance)
    }

    /// Attendance for an event joined with participant and registration
    /// metadata; the search term matches participant name, email, phone or
    /// the registration number.
    pub async fn list_by_event(
        &self,
        event_id: Uuid,
        query: &AttendanceListQuery,
    ) -> Result<(Vec<AttendanceEntry>, i64)> {
        let total = {
            let mut builder = QueryBuilder::new(
                r#"
                SELECT COUNT(*)
                FROM attendance a
                INNER JOIN users u ON a.user_id = u.user_id
                INNER JOIN registrations r ON a.registration_id = r.registration_id
                WHERE a.event_id =
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
            SELECT a.attendance_id, a.event_id, a.registration_id, a.user_id,
                   a.attendance_status, a.check_in_time, a.check_out_time,
                   a.notes, a.marked_by, a.marked_at,
                   u.name AS participant_name,
                   u.email AS participant_email,
                   u.phone AS participant_phone,
                   r.registration_number, r.registration_type, r.team_name,
                   m.name AS marked_by_name
            FROM attendance a
            INNER JOIN users u ON a.user_id = u.user_id
            INNER JOIN registrations r ON a.registration_id = r.registration_id
            LEFT JOIN users m ON a.marked_by = m.user_id
            WHERE a.event_id =
            "#,
        );
        builder.push_bind(event_id);
        Self::push_filters(&mut builder, query);
        builder.push(" ORDER BY a.marked_at DESC OFFSET ");
        builder.push_bind(query.pagination.offset());
        builder.push(" LIMIT ");
        builder.push_bind(query.pagination.limit());

        let rows = builder
            .build_query_as::<AttendanceListRow>()
            .fetch_all(self.pool)
            .await?;

        Ok((
            rows.into_iter().map(AttendanceListRow::into_entry).collect(),
            total,
        ))
    }

    fn push_filters<'qb>(
        builder: &mut QueryBuilder<'qb, sqlx::Postgres>,
        query: &AttendanceListQuery,
    ) {
        if let Some(status) = query.status {
            builder.push(" AND a.attendance_status = ");
            builder.push_bind(status);
        }
        if let Some(ref search) = query.search {
            push_search_filter(
                builder,
                &["u.name", "u.email", "u.phone", "r.registration_number"],
                search,
            );
        }
    }

    pub async fn status_counts(&self, event_id: Uuid) -> Result<Vec<(AttendanceStatus, i64)>> {
        let counts = sqlx::query_as::<_, (AttendanceStatus, i64)>(
            r#"
            SELECT attendance_status, COUNT(*)
            FROM attendance
            WHERE event_id = $1
            GROUP BY attendance_status
            "#,
        )
        .bind(event_id)
        .fetch_all(self.pool)
        .await?;

        Ok(counts)
    }

    /// Export rows in the stable column order of the CSV, one per
    /// attendance record.
    pub async fn export_rows(&self, event_id: Uuid) -> Result<Vec<AttendanceExportRow>> {
        let rows = sqlx::query_as::<_, AttendanceExportRow>(
            r#"
            SELECT u.name AS participant_name,
                   u.email,
                   u.phone,
                   r.registration_number,
                   a.attendance_status,
                   a.check_in_time,
                   a.notes
            FROM attendance a
            INNER JOIN users u ON a.user_id = u.user_id
            INNER JOIN registrations r ON a.registration_id = r.registration_id
            WHERE a.event_id = $1
            ORDER BY u.name, r.registration_number
            "#,
        )
        .bind(event_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
