use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::registration::RegistrationListQuery;
use crate::error::{Result, StorageError};
use crate::models::{
    PaymentInfo, PaymentStatus, Registration, RegistrationDetails, RegistrationStatus,
    RegistrationType, TeamMember,
};
use crate::repository::push_search_filter;

const REGISTRATION_COLUMNS: &str = r#"
    r.registration_id, r.event_id, r.user_id, r.registration_type,
    r.registration_number, r.status, r.contact_email, r.contact_phone,
    r.college, r.department, r.year, r.city, r.team_name, r.team_members,
    r.payment_amount, r.payment_transaction_id, r.payment_screenshot_id,
    r.payment_screenshot_url, r.payment_status, r.special_requirements,
    r.submitted_at, r.updated_at
"#;

#[derive(FromRow)]
struct RegistrationRow {
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
}

impl RegistrationRow {
    fn into_registration(self) -> Registration {
        // The team-shape CHECK constraint guarantees team rows carry a name
        let details = match self.registration_type {
            RegistrationType::Individual => RegistrationDetails::Individual,
            RegistrationType::Team => RegistrationDetails::Team {
                team_name: self.team_name.unwrap_or_default(),
                team_members: self.team_members.0,
            },
        };

        Registration {
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
        }
    }
}

pub struct RegistrationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RegistrationRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a fully built registration. The `(event, user)` unique index
    /// turns a duplicate into a constraint violation for the second writer;
    /// a registration-number collision is left as a raw unique violation so
    /// the caller can regenerate and retry.
    pub async fn create(&self, reg: &Registration) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO registrations (
                registration_id, event_id, user_id, registration_type,
                registration_number, status, contact_email, contact_phone,
                college, department, year, city, team_name, team_members,
                payment_amount, payment_transaction_id, payment_screenshot_id,
                payment_screenshot_url, payment_status, special_requirements,
                submitted_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18, $19, $20, $21, $22)
            "#,
        )
        .bind(reg.registration_id)
        .bind(reg.event_id)
        .bind(reg.user_id)
        .bind(reg.details.registration_type())
        .bind(&reg.registration_number)
        .bind(reg.status)
        .bind(&reg.contact_email)
        .bind(&reg.contact_phone)
        .bind(&reg.college)
        .bind(&reg.department)
        .bind(&reg.year)
        .bind(&reg.city)
        .bind(reg.details.team_name())
        .bind(Json(reg.details.team_members().to_vec()))
        .bind(reg.payment.amount)
        .bind(&reg.payment.transaction_id)
        .bind(&reg.payment.screenshot_id)
        .bind(&reg.payment.screenshot_url)
        .bind(reg.payment.status)
        .bind(&reg.special_requirements)
        .bind(reg.submitted_at)
        .bind(reg.updated_at)
        .execute(self.pool)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if err.violated_constraint() == Some("registrations_event_id_user_id_key") {
                return StorageError::ConstraintViolation(
                    "You have already registered for this event".to_string(),
                );
            }
            err
        })?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Registration> {
        let row = sqlx::query_as::<_, RegistrationRow>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations r WHERE r.registration_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(row.into_registration())
    }

    /// A participant's own registrations, filtered and paginated. The search
    /// term matches the registration number or the event name.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        query: &RegistrationListQuery,
    ) -> Result<(Vec<Registration>, i64)> {
        let total = {
            let mut builder = QueryBuilder::new(
                r#"
                SELECT COUNT(*)
                FROM registrations r
                INNER JOIN events e ON r.event_id = e.event_id
                WHERE r.user_id =
                "#,
            );
            builder.push_bind(user_id);
            Self::push_filters(&mut builder, query);

            builder
                .build_query_scalar::<i64>()
                .fetch_one(self.pool)
                .await?
        };

        let mut builder = QueryBuilder::new(format!(
            r#"
            SELECT {REGISTRATION_COLUMNS}
            FROM registrations r
            INNER JOIN events e ON r.event_id = e.event_id
            WHERE r.user_id =
            "#
        ));
        builder.push_bind(user_id);
        Self::push_filters(&mut builder, query);
        builder.push(" ORDER BY r.submitted_at DESC OFFSET ");
        builder.push_bind(query.pagination.offset());
        builder.push(" LIMIT ");
        builder.push_bind(query.pagination.limit());

        let rows = builder
            .build_query_as::<RegistrationRow>()
            .fetch_all(self.pool)
            .await?;

        let registrations = rows
            .into_iter()
            .map(RegistrationRow::into_registration)
            .collect();

        Ok((registrations, total))
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
            push_search_filter(builder, &["r.registration_number", "e.name"], search);
        }
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: RegistrationStatus,
        now: chrono::NaiveDateTime,
    ) -> Result<Registration> {
        let row = sqlx::query_as::<_, RegistrationRow>(&format!(
            r#"
            UPDATE registrations r
            SET status = $2, updated_at = $3
            WHERE registration_id = $1
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .bind(now)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(row.into_registration())
    }

    /// Registration count for an event. The event catalog calls this before
    /// deleting an event; a non-zero count forbids the delete.
    pub async fn count_by_event(&self, event_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM registrations WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    pub async fn status_counts(&self, event_id: Uuid) -> Result<Vec<(RegistrationStatus, i64)>> {
        let counts = sqlx::query_as::<_, (RegistrationStatus, i64)>(
            r#"
            SELECT status, COUNT(*)
            FROM registrations
            WHERE event_id = $1
            GROUP BY status
            "#,
        )
        .bind(event_id)
        .fetch_all(self.pool)
        .await?;

        Ok(counts)
    }
}
