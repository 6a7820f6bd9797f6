use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use storage::dto::prize::{AddPrizeRequest, PrizeListQuery, PrizeStatistics, UpdatePrizeRequest};
use storage::models::{Prize, PrizeWinner, RegistrationDetails};
use storage::repository::event::EventRepository;
use storage::repository::prize::PrizeRepository;
use storage::repository::registration::RegistrationRepository;
use uuid::Uuid;

use crate::error::{WebError, WebResult, not_found_as};

const DEFAULT_CURRENCY: &str = "INR";

/// Record a prize for an event. When the payload references a registration,
/// the winner block is derived from that registration so the stored winner
/// can never drift from the registration it rewards; the loose winner
/// fields are only used for manually entered winners.
///
/// `admin_id` is the already-resolved admin identity injected by the caller.
pub async fn add_prize(
    pool: &PgPool,
    event_id: Uuid,
    request: &AddPrizeRequest,
    admin_id: Uuid,
) -> WebResult<Prize> {
    EventRepository::new(pool)
        .find_by_id(event_id)
        .await
        .map_err(not_found_as("Event not found"))?;

    if let Some(value) = request.prize_value
        && value < Decimal::ZERO
    {
        return Err(WebError::BadRequest(
            "Prize value cannot be negative".to_string(),
        ));
    }

    let winner = match request.registration_id {
        Some(registration_id) => {
            let registration = RegistrationRepository::new(pool)
                .find_by_id(registration_id)
                .await
                .map_err(not_found_as("Winning registration not found"))?;
            if registration.event_id != event_id {
                return Err(WebError::Conflict(
                    "Winning registration belongs to a different event".to_string(),
                ));
            }

            match registration.details {
                RegistrationDetails::Individual => PrizeWinner::Individual {
                    user_id: registration.user_id,
                },
                RegistrationDetails::Team {
                    team_name,
                    team_members,
                } => PrizeWinner::Team {
                    team_name,
                    team_members,
                },
            }
        }
        None => request
            .manual_winner()
            .map_err(|msg| WebError::BadRequest(msg.to_string()))?,
    };

    let (image_id, image_url) = match &request.image {
        Some(upload) => (Some(upload.id.clone()), Some(upload.url.clone())),
        None => (None, None),
    };

    let prize = Prize {
        prize_id: Uuid::new_v4(),
        event_id,
        prize_name: request.prize_name.clone(),
        description: request.description.clone(),
        position: request.position,
        prize_value: request.prize_value,
        currency: request
            .currency
            .clone()
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        winner,
        registration_id: request.registration_id,
        image_id,
        image_url,
        certificate_issued: false,
        certificate_number: None,
        awarded_by: admin_id,
        awarded_at: Utc::now().naive_utc(),
        notes: request.notes.clone(),
    };

    let repo = PrizeRepository::new(pool);
    repo.create(&prize).await.map_err(|e| {
        if e.is_foreign_key_violation() {
            WebError::NotFound("Winner participant not found".to_string())
        } else {
            e.into()
        }
    })?;

    Ok(prize)
}

/// Partial update of a prize record (name, value, certificate issuance,
/// image, notes). No cascading effects.
pub async fn update_prize(
    pool: &PgPool,
    prize_id: Uuid,
    patch: &UpdatePrizeRequest,
) -> WebResult<Prize> {
    patch
        .validate_values()
        .map_err(|msg| WebError::BadRequest(msg.to_string()))?;

    PrizeRepository::new(pool)
        .update(prize_id, patch)
        .await
        .map_err(not_found_as("Prize not found"))
}

pub async fn delete_prize(pool: &PgPool, prize_id: Uuid) -> WebResult<()> {
    PrizeRepository::new(pool)
        .delete(prize_id)
        .await
        .map_err(not_found_as("Prize not found"))
}

/// Prizes for an event with per-position aggregates (count and total value
/// across the whole event, not just the returned page).
pub async fn list_event_prizes(
    pool: &PgPool,
    event_id: Uuid,
    query: &PrizeListQuery,
) -> WebResult<(Vec<Prize>, PrizeStatistics, i64)> {
    EventRepository::new(pool)
        .find_by_id(event_id)
        .await
        .map_err(not_found_as("Event not found"))?;

    let repo = PrizeRepository::new(pool);
    let (prizes, total) = repo.list_by_event(event_id, query).await?;
    let positions = repo.position_stats(event_id).await?;
    let total_prizes = positions.iter().map(|s| s.count).sum();

    Ok((
        prizes,
        PrizeStatistics {
            positions,
            total_prizes,
        },
        total,
    ))
}
