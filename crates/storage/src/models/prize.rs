use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::registration::TeamMember;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "prize_position")]
pub enum PrizePosition {
    #[serde(rename = "1st")]
    #[sqlx(rename = "1st")]
    First,
    #[serde(rename = "2nd")]
    #[sqlx(rename = "2nd")]
    Second,
    #[serde(rename = "3rd")]
    #[sqlx(rename = "3rd")]
    Third,
    #[serde(rename = "participation")]
    #[sqlx(rename = "participation")]
    Participation,
    #[serde(rename = "special")]
    #[sqlx(rename = "special")]
    Special,
    #[serde(rename = "consolation")]
    #[sqlx(rename = "consolation")]
    Consolation,
}

impl PrizePosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::First => "1st",
            Self::Second => "2nd",
            Self::Third => "3rd",
            Self::Participation => "participation",
            Self::Special => "special",
            Self::Consolation => "consolation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "winner_type", rename_all = "lowercase")]
pub enum WinnerType {
    Individual,
    Team,
}

/// Winner block as a tagged union so the populated fields always match the
/// winner type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PrizeWinner {
    #[serde(rename_all = "camelCase")]
    Individual { user_id: Uuid },
    #[serde(rename_all = "camelCase")]
    Team {
        team_name: String,
        #[serde(default)]
        team_members: Vec<TeamMember>,
    },
}

impl PrizeWinner {
    pub fn from_parts(
        winner_type: WinnerType,
        user_id: Option<Uuid>,
        team_name: Option<String>,
        team_members: Vec<TeamMember>,
    ) -> Result<Self, &'static str> {
        match winner_type {
            WinnerType::Individual => {
                let user_id =
                    user_id.ok_or("An individual winner requires a participant reference")?;
                if team_name.is_some() || !team_members.is_empty() {
                    return Err("Team fields are not allowed on an individual winner");
                }
                Ok(Self::Individual { user_id })
            }
            WinnerType::Team => {
                let team_name = team_name.ok_or("A team winner requires a team name")?;
                if user_id.is_some() {
                    return Err("A participant reference is not allowed on a team winner");
                }
                Ok(Self::Team {
                    team_name,
                    team_members,
                })
            }
        }
    }

    pub fn winner_type(&self) -> WinnerType {
        match self {
            Self::Individual { .. } => WinnerType::Individual,
            Self::Team { .. } => WinnerType::Team,
        }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Self::Individual { user_id } => Some(*user_id),
            Self::Team { .. } => None,
        }
    }

    pub fn team_name(&self) -> Option<&str> {
        match self {
            Self::Individual { .. } => None,
            Self::Team { team_name, .. } => Some(team_name),
        }
    }

    pub fn team_members(&self) -> &[TeamMember] {
        match self {
            Self::Individual { .. } => &[],
            Self::Team { team_members, .. } => team_members,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Prize {
    pub prize_id: Uuid,
    pub event_id: Uuid,
    pub prize_name: String,
    pub description: Option<String>,
    pub position: PrizePosition,
    pub prize_value: Option<Decimal>,
    pub currency: String,
    pub winner: PrizeWinner,
    /// Registration the prize rewards; optional so manually entered winners
    /// can be recorded.
    pub registration_id: Option<Uuid>,
    pub image_id: Option<String>,
    pub image_url: Option<String>,
    pub certificate_issued: bool,
    pub certificate_number: Option<String>,
    pub awarded_by: Uuid,
    pub awarded_at: chrono::NaiveDateTime,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn individual_winner_requires_user() {
        assert!(PrizeWinner::from_parts(WinnerType::Individual, None, None, vec![]).is_err());

        let winner =
            PrizeWinner::from_parts(WinnerType::Individual, Some(Uuid::new_v4()), None, vec![])
                .unwrap();
        assert_eq!(winner.winner_type(), WinnerType::Individual);
        assert!(winner.user_id().is_some());
        assert!(winner.team_name().is_none());
    }

    #[test]
    fn individual_winner_rejects_team_fields() {
        let err = PrizeWinner::from_parts(
            WinnerType::Individual,
            Some(Uuid::new_v4()),
            Some("Robo Rangers".into()),
            vec![],
        );
        assert!(err.is_err());
    }

    #[test]
    fn team_winner_requires_team_name() {
        assert!(PrizeWinner::from_parts(WinnerType::Team, None, None, vec![]).is_err());

        let winner =
            PrizeWinner::from_parts(WinnerType::Team, None, Some("Robo Rangers".into()), vec![])
                .unwrap();
        assert_eq!(winner.team_name(), Some("Robo Rangers"));
        assert!(winner.user_id().is_none());
    }

    #[test]
    fn team_winner_rejects_user_reference() {
        let err = PrizeWinner::from_parts(
            WinnerType::Team,
            Some(Uuid::new_v4()),
            Some("Robo Rangers".into()),
            vec![],
        );
        assert!(err.is_err());
    }

    #[test]
    fn position_serializes_to_wire_names() {
        assert_eq!(
            serde_json::to_string(&PrizePosition::First).unwrap(),
            "\"1st\""
        );
        assert_eq!(
            serde_json::to_string(&PrizePosition::Consolation).unwrap(),
            "\"consolation\""
        );
        let parsed: PrizePosition = serde_json::from_str("\"2nd\"").unwrap();
        assert_eq!(parsed, PrizePosition::Second);
    }
}
