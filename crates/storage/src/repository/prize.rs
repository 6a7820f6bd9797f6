use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::prize::{PrizeListQuery, PrizePositionStat, UpdatePrizeRequest};
use crate::error::{Result, StorageError};
use crate::models::{Prize, PrizePosition, PrizeWinner, TeamMember, WinnerType};

const PRIZE_COLUMNS: &str = r#"
    p.prize_id, p.event_id, p.prize_name, p.description, p.position,
    p.prize_value, p.currency, p.winner_type, p.winner_user_id,
    p.winner_team_name, p.winner_team_members, p.registration_id,
    p.image_id, p.image_url, p.certificate_issued, p.certificate_number,
    p.awarded_by, p.awarded_at, p.notes
"#;

#[derive(FromRow)]
struct PrizeRow {
    prize_id: Uuid,
    event_id: Uuid,
    prize_name: String,
    description: Option<String>,
    position: PrizePosition,
    prize_value: Option<Decimal>,
    currency: String,
    winner_type: WinnerType,
    winner_user_id: Option<Uuid>,
    winner_team_name: Option<String>,
    winner_team_members: Json<Vec<TeamMember>>,
    registration_id: Option<Uuid>,
    image_id: Option<String>,
    image_url: Option<String>,
    certificate_issued: bool,
    certificate_number: Option<String>,
    awarded_by: Uuid,
    awarded_at: chrono::NaiveDateTime,
    notes: Option<String>,
}

impl PrizeRow {
    fn into_prize(self) -> Result<Prize> {
        // The winner-shape CHECK constraint makes this conversion total
        let winner = PrizeWinner::from_parts(
            self.winner_type,
            self.winner_user_id,
            self.winner_team_name,
            self.winner_team_members.0,
        )
        .map_err(|e| StorageError::ConstraintViolation(e.to_string()))?;

        Ok(Prize {
            prize_id: self.prize_id,
            event_id: self.event_id,
            prize_name: self.prize_name,
            description: self.description,
            position: self.position,
            prize_value: self.prize_value,
            currency: self.currency,
            winner,
            registration_id: self.registration_id,
            image_id: self.image_id,
            image_url: self.image_url,
            certificate_issued: self.certificate_issued,
            certificate_number: self.certificate_number,
            awarded_by: self.awarded_by,
            awarded_at: self.awarded_at,
            notes: self.notes,
        })
    }
}

fn push_assignment<'qb, T>(
    builder: &mut QueryBuilder<'qb, Postgres>,
    any: &mut bool,
    column: &str,
    value: T,
) where
    T: 'qb + sqlx::Encode<'qb, Postgres> + sqlx::Type<Postgres> + Send,
{
    if *any {
        builder.push(", ");
    } else {
        *any = true;
    }
    builder.push(column);
    builder.push(" = ");
    builder.push_bind(value);
}

pub struct PrizeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PrizeRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, prize: &Prize) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO prizes (
                prize_id, event_id, prize_name, description, position,
                prize_value, currency, winner_type, winner_user_id,
                winner_team_name, winner_team_members, registration_id,
                image_id, image_url, certificate_issued, certificate_number,
                awarded_by, awarded_at, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18, $19)
            "#,
        )
        .bind(prize.prize_id)
        .bind(prize.event_id)
        .bind(&prize.prize_name)
        .bind(&prize.description)
        .bind(prize.position)
        .bind(prize.prize_value)
        .bind(&prize.currency)
        .bind(prize.winner.winner_type())
        .bind(prize.winner.user_id())
        .bind(prize.winner.team_name())
        .bind(Json(prize.winner.team_members().to_vec()))
        .bind(prize.registration_id)
        .bind(&prize.image_id)
        .bind(&prize.image_url)
        .bind(prize.certificate_issued)
        .bind(&prize.certificate_number)
        .bind(prize.awarded_by)
        .bind(prize.awarded_at)
        .bind(&prize.notes)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Prize> {
        let row = sqlx::query_as::<_, PrizeRow>(&format!(
            "SELECT {PRIZE_COLUMNS} FROM prizes p WHERE p.prize_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        row.into_prize()
    }

    /// Partial update: only the provided fields are written. An empty patch
    /// degenerates to a plain read.
    pub async fn update(&self, id: Uuid, patch: &UpdatePrizeRequest) -> Result<Prize> {
        let mut builder = QueryBuilder::new("UPDATE prizes p SET ");
        let mut any = false;

        if let Some(ref name) = patch.prize_name {
            push_assignment(&mut builder, &mut any, "prize_name", name.clone());
        }
        if let Some(ref description) = patch.description {
            push_assignment(&mut builder, &mut any, "description", description.clone());
        }
        if let Some(position) = patch.position {
            push_assignment(&mut builder, &mut any, "position", position);
        }
        if let Some(value) = patch.prize_value {
            push_assignment(&mut builder, &mut any, "prize_value", value);
        }
        if let Some(ref currency) = patch.currency {
            push_assignment(&mut builder, &mut any, "currency", currency.clone());
        }
        if let Some(issued) = patch.certificate_issued {
            push_assignment(&mut builder, &mut any, "certificate_issued", issued);
        }
        if let Some(ref number) = patch.certificate_number {
            push_assignment(&mut builder, &mut any, "certificate_number", number.clone());
        }
        if let Some(ref image) = patch.image {
            push_assignment(&mut builder, &mut any, "image_id", image.id.clone());
            push_assignment(&mut builder, &mut any, "image_url", image.url.clone());
        }
        if let Some(ref notes) = patch.notes {
            push_assignment(&mut builder, &mut any, "notes", notes.clone());
        }

        if !any {
            return self.find_by_id(id).await;
        }

        builder.push(" WHERE p.prize_id = ");
        builder.push_bind(id);
        builder.push(format!(" RETURNING {PRIZE_COLUMNS}"));

        let row = builder
            .build_query_as::<PrizeRow>()
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        row.into_prize()
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM prizes WHERE prize_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    pub async fn list_by_event(
        &self,
        event_id: Uuid,
        query: &PrizeListQuery,
    ) -> Result<(Vec<Prize>, i64)> {
        let total = {
            let mut builder =
                QueryBuilder::new("SELECT COUNT(*) FROM prizes p WHERE p.event_id = ");
            builder.push_bind(event_id);
            if let Some(position) = query.position {
                builder.push(" AND p.position = ");
                builder.push_bind(position);
            }

            builder
                .build_query_scalar::<i64>()
                .fetch_one(self.pool)
                .await?
        };

        let mut builder = QueryBuilder::new(format!(
            "SELECT {PRIZE_COLUMNS} FROM prizes p WHERE p.event_id = "
        ));
        builder.push_bind(event_id);
        if let Some(position) = query.position {
            builder.push(" AND p.position = ");
            builder.push_bind(position);
        }
        builder.push(" ORDER BY p.awarded_at DESC OFFSET ");
        builder.push_bind(query.pagination.offset());
        builder.push(" LIMIT ");
        builder.push_bind(query.pagination.limit());

        let rows = builder
            .build_query_as::<PrizeRow>()
            .fetch_all(self.pool)
            .await?;

        let prizes = rows
            .into_iter()
            .map(PrizeRow::into_prize)
            .collect::<Result<Vec<_>>>()?;

        Ok((prizes, total))
    }

    /// Per-position aggregates over all of an event's prizes (not just the
    /// current page).
    pub async fn position_stats(&self, event_id: Uuid) -> Result<Vec<PrizePositionStat>> {
        let stats = sqlx::query_as::<_, PrizePositionStat>(
            r#"
            SELECT position,
                   COUNT(*) AS count,
                   COALESCE(SUM(prize_value), 0) AS total_value
            FROM prizes
            WHERE event_id = $1
            GROUP BY position
            ORDER BY position
            "#,
        )
        .bind(event_id)
        .fetch_all(self.pool)
        .await?;

        Ok(stats)
    }
}
