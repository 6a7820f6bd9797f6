use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "registration_type", rename_all = "lowercase")]
pub enum RegistrationType {
    Individual,
    Team,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "registration_status", rename_all = "lowercase")]
pub enum RegistrationStatus {
    // "pending" is a legacy synonym still seen in older client payloads
    #[serde(alias = "pending")]
    Submitted,
    Approved,
    Rejected,
    Cancelled,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    /// Legal transitions: submitted may be approved or rejected by an admin,
    /// and submitted or approved registrations may be cancelled by their
    /// owner. Rejected and cancelled are terminal.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Submitted, Self::Approved)
                | (Self::Submitted, Self::Rejected)
                | (Self::Submitted, Self::Cancelled)
                | (Self::Approved, Self::Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Verified,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub roll_number: Option<String>,
    pub department: Option<String>,
}

/// Individual/team split as a tagged union: a team name or member list cannot
/// exist on an individual registration, and a team registration always
/// carries both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "registrationType", rename_all = "lowercase")]
pub enum RegistrationDetails {
    Individual,
    #[serde(rename_all = "camelCase")]
    Team {
        team_name: String,
        team_members: Vec<TeamMember>,
    },
}

impl RegistrationDetails {
    /// Build the union from the loose payload fields, rejecting shapes that
    /// mix the two variants.
    pub fn from_parts(
        registration_type: RegistrationType,
        team_name: Option<String>,
        team_members: Vec<TeamMember>,
    ) -> Result<Self, &'static str> {
        match registration_type {
            RegistrationType::Individual => {
                if team_name.is_some() || !team_members.is_empty() {
                    return Err("Team fields are not allowed on an individual registration");
                }
                Ok(Self::Individual)
            }
            RegistrationType::Team => {
                let team_name = team_name.ok_or("Team name is required for team registration")?;
                if team_name.trim().is_empty() {
                    return Err("Team name is required for team registration");
                }
                if team_members.is_empty() {
                    return Err("At least one team member is required for team registration");
                }
                Ok(Self::Team {
                    team_name,
                    team_members,
                })
            }
        }
    }

    pub fn registration_type(&self) -> RegistrationType {
        match self {
            Self::Individual => RegistrationType::Individual,
            Self::Team { .. } => RegistrationType::Team,
        }
    }

    pub fn team_name(&self) -> Option<&str> {
        match self {
            Self::Individual => None,
            Self::Team { team_name, .. } => Some(team_name),
        }
    }

    pub fn team_members(&self) -> &[TeamMember] {
        match self {
            Self::Individual => &[],
            Self::Team { team_members, .. } => team_members,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    pub amount: Decimal,
    pub transaction_id: Option<String>,
    pub screenshot_id: Option<String>,
    pub screenshot_url: Option<String>,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub registration_id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub registration_number: String,
    pub status: RegistrationStatus,
    #[serde(flatten)]
    pub details: RegistrationDetails,
    pub contact_email: String,
    pub contact_phone: String,
    pub college: Option<String>,
    pub department: Option<String>,
    pub year: Option<String>,
    pub city: Option<String>,
    pub payment: PaymentInfo,
    pub special_requirements: Option<String>,
    pub submitted_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

const NUMBER_PREFIX: &str = "REG-";
const NUMBER_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const NUMBER_SUFFIX_LEN: usize = 8;

/// Human-facing registration number, e.g. `REG-7K2QX9AD`. Uniqueness is
/// enforced by the database; callers regenerate on collision.
pub fn generate_registration_number() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..NUMBER_SUFFIX_LEN)
        .map(|_| NUMBER_ALPHABET[rng.gen_range(0..NUMBER_ALPHABET.len())] as char)
        .collect();

    format!("{NUMBER_PREFIX}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submitted_can_be_approved_or_rejected_or_cancelled() {
        let s = RegistrationStatus::Submitted;
        assert!(s.can_transition_to(RegistrationStatus::Approved));
        assert!(s.can_transition_to(RegistrationStatus::Rejected));
        assert!(s.can_transition_to(RegistrationStatus::Cancelled));
    }

    #[test]
    fn approved_can_only_be_cancelled() {
        let s = RegistrationStatus::Approved;
        assert!(s.can_transition_to(RegistrationStatus::Cancelled));
        assert!(!s.can_transition_to(RegistrationStatus::Submitted));
        assert!(!s.can_transition_to(RegistrationStatus::Rejected));
        assert!(!s.can_transition_to(RegistrationStatus::Approved));
    }

    #[test]
    fn terminal_states_allow_no_transitions() {
        for terminal in [RegistrationStatus::Rejected, RegistrationStatus::Cancelled] {
            assert!(terminal.is_terminal());
            for next in [
                RegistrationStatus::Submitted,
                RegistrationStatus::Approved,
                RegistrationStatus::Rejected,
                RegistrationStatus::Cancelled,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn approving_twice_is_illegal() {
        let approved = RegistrationStatus::Approved;
        assert!(!approved.can_transition_to(RegistrationStatus::Submitted));
    }

    #[test]
    fn pending_deserializes_as_submitted() {
        let status: RegistrationStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(status, RegistrationStatus::Submitted);
    }

    #[test]
    fn individual_details_reject_team_fields() {
        let err = RegistrationDetails::from_parts(
            RegistrationType::Individual,
            Some("Code Warriors".into()),
            vec![],
        );
        assert!(err.is_err());
    }

    #[test]
    fn team_details_require_name_and_members() {
        assert!(
            RegistrationDetails::from_parts(RegistrationType::Team, None, vec![]).is_err()
        );
        assert!(
            RegistrationDetails::from_parts(
                RegistrationType::Team,
                Some("Code Warriors".into()),
                vec![]
            )
            .is_err()
        );

        let member = TeamMember {
            name: "Priya".into(),
            email: None,
            phone: None,
            roll_number: None,
            department: None,
        };
        let details = RegistrationDetails::from_parts(
            RegistrationType::Team,
            Some("Code Warriors".into()),
            vec![member],
        )
        .unwrap();
        assert_eq!(details.registration_type(), RegistrationType::Team);
        assert_eq!(details.team_name(), Some("Code Warriors"));
        assert_eq!(details.team_members().len(), 1);
    }

    #[test]
    fn registration_numbers_have_stable_shape() {
        for _ in 0..50 {
            let number = generate_registration_number();
            assert!(number.starts_with("REG-"));
            assert_eq!(number.len(), 12);
            assert!(
                number[4..]
                    .bytes()
                    .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
            );
        }
    }
}
