use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::common::{PageInfo, PaginationParams};
use super::registration::{TeamMemberPayload, UploadRef};
use crate::models::{Prize, PrizePosition, PrizeWinner, WinnerType};

/// Request payload for recording a prize. When `registration_id` is set the
/// winner block is derived from that registration; the loose winner fields
/// are only consulted for manually entered winners.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddPrizeRequest {
    #[validate(length(min = 1, max = 100, message = "Prize name is required"))]
    pub prize_name: String,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    pub position: PrizePosition,

    pub prize_value: Option<Decimal>,

    #[validate(length(min = 1, max = 10))]
    pub currency: Option<String>,

    pub winner_type: WinnerType,

    pub winner_user_id: Option<Uuid>,

    #[validate(length(min = 1, max = 100))]
    pub winner_team_name: Option<String>,

    #[validate(nested)]
    #[serde(default)]
    pub winner_team_members: Vec<TeamMemberPayload>,

    pub registration_id: Option<Uuid>,

    #[validate(nested)]
    pub image: Option<UploadRef>,

    #[validate(length(max = 300))]
    pub notes: Option<String>,
}

impl AddPrizeRequest {
    /// Winner block for a manually entered winner (no registration
    /// reference). The populated fields must match the winner type.
    pub fn manual_winner(&self) -> Result<PrizeWinner, &'static str> {
        if let Some(value) = self.prize_value
            && value < Decimal::ZERO
        {
            return Err("Prize value cannot be negative");
        }

        PrizeWinner::from_parts(
            self.winner_type,
            self.winner_user_id,
            self.winner_team_name.clone(),
            self.winner_team_members
                .iter()
                .cloned()
                .map(Into::into)
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePrizeRequest {
    #[validate(length(min = 1, max = 100))]
    pub prize_name: Option<String>,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    pub position: Option<PrizePosition>,

    pub prize_value: Option<Decimal>,

    #[validate(length(min = 1, max = 10))]
    pub currency: Option<String>,

    pub certificate_issued: Option<bool>,

    #[validate(length(max = 50))]
    pub certificate_number: Option<String>,

    #[validate(nested)]
    pub image: Option<UploadRef>,

    #[validate(length(max = 300))]
    pub notes: Option<String>,
}

impl UpdatePrizeRequest {
    pub fn validate_values(&self) -> Result<(), &'static str> {
        if let Some(value) = self.prize_value
            && value < Decimal::ZERO
        {
            return Err("Prize value cannot be negative");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PrizeListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub position: Option<PrizePosition>,
}

impl PrizeListQuery {
    pub fn validate(&self) -> Result<(), String> {
        self.pagination.validate()
    }
}

/// Per-position aggregate over an event's prizes
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrizePositionStat {
    pub position: PrizePosition,
    pub count: i64,
    pub total_value: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrizeStatistics {
    pub positions: Vec<PrizePositionStat>,
    pub total_prizes: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PrizeListResponse {
    pub items: Vec<Prize>,
    pub statistics: PrizeStatistics,
    pub pagination: PageInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> AddPrizeRequest {
        AddPrizeRequest {
            prize_name: "Best Project".into(),
            description: None,
            position: PrizePosition::First,
            prize_value: Some(Decimal::from(5000)),
            currency: None,
            winner_type: WinnerType::Individual,
            winner_user_id: Some(Uuid::new_v4()),
            winner_team_name: None,
            winner_team_members: vec![],
            registration_id: None,
            image: None,
            notes: None,
        }
    }

    #[test]
    fn manual_individual_winner_builds() {
        let winner = base_request().manual_winner().unwrap();
        assert_eq!(winner.winner_type(), WinnerType::Individual);
    }

    #[test]
    fn manual_winner_with_mismatched_fields_fails() {
        let mut req = base_request();
        req.winner_team_name = Some("Robo Rangers".into());
        assert!(req.manual_winner().is_err());

        let mut req = base_request();
        req.winner_type = WinnerType::Team;
        req.winner_team_name = None;
        assert!(req.manual_winner().is_err());
    }

    #[test]
    fn negative_value_is_rejected() {
        let mut req = base_request();
        req.prize_value = Some(Decimal::from(-100));
        assert!(req.manual_winner().is_err());
    }
}
