use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::common::{PageInfo, PaginationParams};
use crate::models::{
    Registration, RegistrationDetails, RegistrationStatus, RegistrationType, TeamMember,
};

/// Opaque reference to a stored object (payment screenshot, prize image).
/// The storage collaborator owns the bytes; the core never inspects them.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UploadRef {
    #[validate(length(min = 1, max = 255))]
    pub id: String,
    #[validate(length(min = 1))]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberPayload {
    #[validate(length(min = 1, max = 100, message = "Member name is required"))]
    pub name: String,
    #[validate(email(message = "Member email must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 7, max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 30))]
    pub roll_number: Option<String>,
    #[validate(length(max = 100))]
    pub department: Option<String>,
}

impl From<TeamMemberPayload> for TeamMember {
    fn from(payload: TeamMemberPayload) -> Self {
        Self {
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            roll_number: payload.roll_number,
            department: payload.department,
        }
    }
}

/// Request payload for creating a registration against an event
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegistrationRequest {
    pub registration_type: RegistrationType,

    #[validate(email(message = "Contact email must be a valid email address"))]
    pub contact_email: String,

    #[validate(length(min = 7, max = 20, message = "Contact phone must be 7-20 characters"))]
    pub contact_phone: String,

    #[validate(length(max = 100))]
    pub college: Option<String>,

    #[validate(length(max = 100))]
    pub department: Option<String>,

    #[validate(length(max = 20))]
    pub year: Option<String>,

    #[validate(length(max = 100))]
    pub city: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub team_name: Option<String>,

    #[validate(nested)]
    #[serde(default)]
    pub team_members: Vec<TeamMemberPayload>,

    pub payment_amount: Option<Decimal>,

    #[validate(length(max = 100))]
    pub payment_transaction_id: Option<String>,

    #[validate(nested)]
    pub payment_screenshot: Option<UploadRef>,

    #[validate(length(max = 500))]
    pub special_requirements: Option<String>,
}

impl CreateRegistrationRequest {
    /// Cross-field validation that the derive cannot express: the
    /// individual/team shape rules and the payment amount sign.
    pub fn validate_shape(&self) -> Result<RegistrationDetails, &'static str> {
        if let Some(amount) = self.payment_amount
            && amount < Decimal::ZERO
        {
            return Err("Payment amount cannot be negative");
        }

        RegistrationDetails::from_parts(
            self.registration_type,
            self.team_name.clone(),
            self.team_members.iter().cloned().map(Into::into).collect(),
        )
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateRegistrationStatusRequest {
    pub status: RegistrationStatus,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub status: Option<RegistrationStatus>,
    // Older clients send ?type=, the admin views send ?registrationType=
    #[serde(alias = "type")]
    pub registration_type: Option<RegistrationType>,
    pub search: Option<String>,
}

impl RegistrationListQuery {
    pub fn validate(&self) -> Result<(), String> {
        self.pagination.validate()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegistrationListResponse {
    pub items: Vec<Registration>,
    pub pagination: PageInfo,
}

/// Registration count for one event, consumed by the event catalog's
/// delete guard.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegistrationCountResponse {
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> CreateRegistrationRequest {
        CreateRegistrationRequest {
            registration_type: RegistrationType::Individual,
            contact_email: "priya@example.edu".into(),
            contact_phone: "9876543210".into(),
            college: Some("KEC".into()),
            department: Some("CSE".into()),
            year: Some("3".into()),
            city: Some("Erode".into()),
            team_name: None,
            team_members: vec![],
            payment_amount: None,
            payment_transaction_id: None,
            payment_screenshot: None,
            special_requirements: None,
        }
    }

    #[test]
    fn individual_shape_passes() {
        let details = base_request().validate_shape().unwrap();
        assert_eq!(details, RegistrationDetails::Individual);
    }

    #[test]
    fn individual_with_team_name_fails() {
        let mut req = base_request();
        req.team_name = Some("Lone Wolves".into());
        assert!(req.validate_shape().is_err());
    }

    #[test]
    fn team_without_members_fails() {
        let mut req = base_request();
        req.registration_type = RegistrationType::Team;
        req.team_name = Some("Code Warriors".into());
        assert!(req.validate_shape().is_err());
    }

    #[test]
    fn negative_amount_fails() {
        let mut req = base_request();
        req.payment_amount = Some(Decimal::from(-1));
        assert!(req.validate_shape().is_err());
    }

    #[test]
    fn derive_validation_catches_bad_email() {
        let mut req = base_request();
        req.contact_email = "not-an-email".into();
        assert!(req.validate().is_err());
    }
}
