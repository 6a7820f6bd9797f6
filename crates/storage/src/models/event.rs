use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Event metadata owned by the external event catalog. The core reads
/// identity, fee, capacity and the registration deadline; it never writes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub event_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub start_date: chrono::NaiveDateTime,
    pub end_date: chrono::NaiveDateTime,
    pub registration_deadline: Option<chrono::NaiveDateTime>,
    pub registration_fee: Decimal,
    pub max_participants: Option<i32>,
    pub is_active: bool,
    pub created_at: chrono::NaiveDateTime,
}

impl Event {
    pub fn registration_closed(&self, now: chrono::NaiveDateTime) -> bool {
        self.registration_deadline
            .is_some_and(|deadline| now > deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn event_with_deadline(deadline: Option<chrono::NaiveDateTime>) -> Event {
        let day = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        Event {
            event_id: Uuid::new_v4(),
            name: "Tech Symposium".into(),
            description: None,
            venue: None,
            start_date: day,
            end_date: day,
            registration_deadline: deadline,
            registration_fee: Decimal::ZERO,
            max_participants: None,
            is_active: true,
            created_at: day,
        }
    }

    #[test]
    fn no_deadline_never_closes() {
        let event = event_with_deadline(None);
        let now = NaiveDate::from_ymd_opt(2030, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert!(!event.registration_closed(now));
    }

    #[test]
    fn deadline_closes_after_passing() {
        let deadline = NaiveDate::from_ymd_opt(2025, 2, 1)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        let event = event_with_deadline(Some(deadline));

        assert!(!event.registration_closed(deadline));
        assert!(event.registration_closed(deadline + chrono::Duration::seconds(1)));
    }
}
