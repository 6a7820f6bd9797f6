use chrono::Utc;
use sqlx::PgPool;
use storage::dto::registration::{CreateRegistrationRequest, RegistrationListQuery};
use storage::models::{
    PaymentInfo, PaymentStatus, Registration, RegistrationStatus, generate_registration_number,
};
use storage::repository::event::EventRepository;
use storage::repository::registration::RegistrationRepository;
use uuid::Uuid;

use crate::error::{WebError, WebResult, not_found_as};
use crate::middleware::auth::Actor;

/// Collisions on the generated registration number are regenerated this many
/// times before surfacing an internal error.
const MAX_NUMBER_ATTEMPTS: u32 = 3;

/// Create a registration for the acting participant against an event.
/// Enforces the payment-proof rule, the registration window and the
/// capacity limit; the `(event, user)` unique index turns duplicate
/// submissions into a conflict.
pub async fn create_registration(
    pool: &PgPool,
    event_id: Uuid,
    actor: Actor,
    request: &CreateRegistrationRequest,
) -> WebResult<Registration> {
    let details = request
        .validate_shape()
        .map_err(|msg| WebError::BadRequest(msg.to_string()))?;

    let event = EventRepository::new(pool)
        .find_by_id(event_id)
        .await
        .map_err(not_found_as("Event not found"))?;

    let now = Utc::now().naive_utc();

    if !event.is_active {
        return Err(WebError::Conflict(
            "Event is not accepting registrations".to_string(),
        ));
    }
    if event.registration_closed(now) {
        return Err(WebError::Conflict(
            "Registration deadline has passed".to_string(),
        ));
    }

    if event.registration_fee > rust_decimal::Decimal::ZERO
        && request.payment_screenshot.is_none()
    {
        return Err(WebError::BadRequest(
            "Payment screenshot is required for paid events".to_string(),
        ));
    }

    let repo = RegistrationRepository::new(pool);

    if let Some(capacity) = event.max_participants {
        let registered = repo.count_by_event(event_id).await?;
        if registered >= capacity as i64 {
            return Err(WebError::Conflict(
                "Event has reached its maximum number of participants".to_string(),
            ));
        }
    }

    let (screenshot_id, screenshot_url) = match &request.payment_screenshot {
        Some(upload) => (Some(upload.id.clone()), Some(upload.url.clone())),
        None => (None, None),
    };

    let mut registration = Registration {
        registration_id: Uuid::new_v4(),
        event_id,
        user_id: actor.id,
        registration_number: generate_registration_number(),
        status: RegistrationStatus::Submitted,
        details,
        contact_email: request.contact_email.clone(),
        contact_phone: request.contact_phone.clone(),
        college: request.college.clone(),
        department: request.department.clone(),
        year: request.year.clone(),
        city: request.city.clone(),
        payment: PaymentInfo {
            amount: request.payment_amount.unwrap_or(event.registration_fee),
            transaction_id: request.payment_transaction_id.clone(),
            screenshot_id,
            screenshot_url,
            status: PaymentStatus::Pending,
        },
        special_requirements: request.special_requirements.clone(),
        submitted_at: now,
        updated_at: now,
    };

    let mut attempts = 0;
    loop {
        match repo.create(&registration).await {
            Ok(()) => return Ok(registration),
            // The duplicate-(event, user) case was already converted to a
            // ConstraintViolation by the repository, so a remaining unique
            // violation can only be the registration number.
            Err(e) if e.is_unique_violation() => {
                attempts += 1;
                if attempts >= MAX_NUMBER_ATTEMPTS {
                    return Err(WebError::Internal(
                        "Could not allocate a unique registration number".to_string(),
                    ));
                }
                tracing::warn!(
                    registration_number = %registration.registration_number,
                    "Registration number collision, regenerating"
                );
                registration.registration_number = generate_registration_number();
            }
            Err(e) if e.is_foreign_key_violation() => {
                return Err(WebError::NotFound("Participant not found".to_string()));
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Apply a status transition. Approve/reject require an admin actor;
/// cancellation is reserved for the owning participant and only before the
/// event's registration deadline.
pub async fn update_status(
    pool: &PgPool,
    registration_id: Uuid,
    new_status: RegistrationStatus,
    actor: Actor,
) -> WebResult<Registration> {
    let repo = RegistrationRepository::new(pool);
    let registration = repo
        .find_by_id(registration_id)
        .await
        .map_err(not_found_as("Registration not found"))?;

    match new_status {
        RegistrationStatus::Approved | RegistrationStatus::Rejected => {
            actor.require_admin()?;
        }
        RegistrationStatus::Cancelled => {
            if actor.id != registration.user_id {
                return Err(WebError::Forbidden(
                    "Only the registering participant can cancel a registration".to_string(),
                ));
            }

            let event = EventRepository::new(pool)
                .find_by_id(registration.event_id)
                .await
                .map_err(not_found_as("Event not found"))?;
            if event.registration_closed(Utc::now().naive_utc()) {
                return Err(WebError::Conflict(
                    "Registrations can no longer be cancelled for this event".to_string(),
                ));
            }
        }
        RegistrationStatus::Submitted => {
            return Err(WebError::Conflict(format!(
                "Invalid status transition: {} -> {}",
                registration.status.as_str(),
                new_status.as_str()
            )));
        }
    }

    if !registration.status.can_transition_to(new_status) {
        return Err(WebError::Conflict(format!(
            "Invalid status transition: {} -> {}",
            registration.status.as_str(),
            new_status.as_str()
        )));
    }

    let updated = repo
        .update_status(registration_id, new_status, Utc::now().naive_utc())
        .await?;

    Ok(updated)
}

/// The acting participant's own registrations.
pub async fn list_my_registrations(
    pool: &PgPool,
    actor: Actor,
    query: &RegistrationListQuery,
) -> WebResult<(Vec<Registration>, i64)> {
    let repo = RegistrationRepository::new(pool);
    Ok(repo.list_for_user(actor.id, query).await?)
}

/// Fetch one registration; visible to its owner and to admins.
pub async fn get_registration(
    pool: &PgPool,
    registration_id: Uuid,
    actor: Actor,
) -> WebResult<Registration> {
    let repo = RegistrationRepository::new(pool);
    let registration = repo
        .find_by_id(registration_id)
        .await
        .map_err(not_found_as("Registration not found"))?;

    if registration.user_id != actor.id && !actor.is_admin() {
        return Err(WebError::Forbidden(
            "You can only view your own registrations".to_string(),
        ));
    }

    Ok(registration)
}

/// Registration count for an event, used by the event catalog's delete
/// guard (an event with registrations must not be deleted).
pub async fn count_by_event(pool: &PgPool, event_id: Uuid) -> WebResult<i64> {
    EventRepository::new(pool)
        .find_by_id(event_id)
        .await
        .map_err(not_found_as("Event not found"))?;

    Ok(RegistrationRepository::new(pool)
        .count_by_event(event_id)
        .await?)
}
