use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::common::PageInfo;
use crate::models::{AttendanceStatus, PrizePosition, Registration, RegistrationStatus};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantProfile {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub college: Option<String>,
    pub department: Option<String>,
    pub year: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub attendance_status: AttendanceStatus,
    pub check_in_time: Option<chrono::NaiveDateTime>,
    pub check_out_time: Option<chrono::NaiveDateTime>,
    pub notes: Option<String>,
    pub marked_at: chrono::NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrizeSummary {
    pub prize_id: Uuid,
    pub prize_name: String,
    pub position: PrizePosition,
    pub certificate_issued: bool,
}

/// One composite row of the admin's detailed event view: the registration,
/// its participant profile, and any attendance and prize records attached to
/// it.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetailedRegistrationEntry {
    #[serde(flatten)]
    pub registration: Registration,
    pub participant: ParticipantProfile,
    pub attendance: Option<AttendanceSummary>,
    pub prizes: Vec<PrizeSummary>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationStatistics {
    pub total_registrations: i64,
    pub submitted: i64,
    pub approved: i64,
    pub rejected: i64,
    pub cancelled: i64,
    pub present: i64,
    pub absent: i64,
    pub late: i64,
}

impl RegistrationStatistics {
    pub fn from_counts(
        status_counts: &[(RegistrationStatus, i64)],
        attendance_counts: &[(AttendanceStatus, i64)],
    ) -> Self {
        let mut stats = Self {
            total_registrations: 0,
            submitted: 0,
            approved: 0,
            rejected: 0,
            cancelled: 0,
            present: 0,
            absent: 0,
            late: 0,
        };

        for (status, count) in status_counts {
            stats.total_registrations += count;
            match status {
                RegistrationStatus::Submitted => stats.submitted = *count,
                RegistrationStatus::Approved => stats.approved = *count,
                RegistrationStatus::Rejected => stats.rejected = *count,
                RegistrationStatus::Cancelled => stats.cancelled = *count,
            }
        }

        for (status, count) in attendance_counts {
            match status {
                AttendanceStatus::Present => stats.present = *count,
                AttendanceStatus::Absent => stats.absent = *count,
                AttendanceStatus::Late => stats.late = *count,
            }
        }

        stats
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DetailedRegistrationsResponse {
    pub items: Vec<DetailedRegistrationEntry>,
    pub statistics: RegistrationStatistics,
    pub pagination: PageInfo,
}

/// Global dashboard counters
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_events: i64,
    pub total_registrations: i64,
    pub active_events: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_counts_fold_into_breakdown() {
        let stats = RegistrationStatistics::from_counts(
            &[
                (RegistrationStatus::Submitted, 5),
                (RegistrationStatus::Approved, 10),
                (RegistrationStatus::Cancelled, 2),
            ],
            &[(AttendanceStatus::Present, 8), (AttendanceStatus::Late, 1)],
        );

        assert_eq!(stats.total_registrations, 17);
        assert_eq!(stats.submitted, 5);
        assert_eq!(stats.approved, 10);
        assert_eq!(stats.rejected, 0);
        assert_eq!(stats.cancelled, 2);
        assert_eq!(stats.present, 8);
        assert_eq!(stats.absent, 0);
        assert_eq!(stats.late, 1);
    }

    #[test]
    fn empty_counts_produce_zeroed_statistics() {
        let stats = RegistrationStatistics::from_counts(&[], &[]);
        assert_eq!(stats.total_registrations, 0);
        assert_eq!(stats.present, 0);
    }
}
