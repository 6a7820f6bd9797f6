use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "attendance_status", rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::Late => "late",
        }
    }
}

/// One attendance outcome per (event, participant). Repeated marks update
/// this row in place; it is never duplicated or deleted through normal flow.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub attendance_id: Uuid,
    pub event_id: Uuid,
    pub registration_id: Uuid,
    pub user_id: Uuid,
    pub attendance_status: AttendanceStatus,
    pub check_in_time: Option<chrono::NaiveDateTime>,
    pub check_out_time: Option<chrono::NaiveDateTime>,
    pub notes: Option<String>,
    pub marked_by: Uuid,
    pub marked_at: chrono::NaiveDateTime,
}
