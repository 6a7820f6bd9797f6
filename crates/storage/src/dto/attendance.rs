use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::common::{PageInfo, PaginationParams};
use crate::models::{Attendance, AttendanceStatus, RegistrationType};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceRequest {
    pub attendance_status: AttendanceStatus,
    #[validate(length(max = 200, message = "Notes cannot exceed 200 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AttendanceListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub status: Option<AttendanceStatus>,
    pub search: Option<String>,
}

impl AttendanceListQuery {
    pub fn validate(&self) -> Result<(), String> {
        self.pagination.validate()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantInfo {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRef {
    pub registration_number: String,
    pub registration_type: RegistrationType,
    pub team_name: Option<String>,
}

/// Attendance record joined with participant and registration metadata for
/// the admin list view.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    #[serde(flatten)]
    pub attendance: Attendance,
    pub participant: ParticipantInfo,
    pub registration: RegistrationRef,
    pub marked_by_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStatistics {
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    pub total_registrations: i64,
    pub attendance_marked: i64,
    pub attendance_not_marked: i64,
}

impl AttendanceStatistics {
    pub fn from_counts(counts: &[(AttendanceStatus, i64)], total_registrations: i64) -> Self {
        let mut present = 0;
        let mut absent = 0;
        let mut late = 0;
        for (status, count) in counts {
            match status {
                AttendanceStatus::Present => present = *count,
                AttendanceStatus::Absent => absent = *count,
                AttendanceStatus::Late => late = *count,
            }
        }

        let attendance_marked = present + absent + late;
        // A stale registration count must never push this below zero
        let attendance_not_marked = (total_registrations - attendance_marked).max(0);

        Self {
            present,
            absent,
            late,
            total_registrations,
            attendance_marked,
            attendance_not_marked,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceListResponse {
    pub items: Vec<AttendanceEntry>,
    pub statistics: AttendanceStatistics,
    pub pagination: PageInfo,
}

/// One CSV line of the attendance export, already joined with participant
/// and registration data.
#[derive(Debug, Clone, FromRow)]
pub struct AttendanceExportRow {
    pub participant_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub registration_number: String,
    pub attendance_status: AttendanceStatus,
    pub check_in_time: Option<chrono::NaiveDateTime>,
    pub notes: Option<String>,
}

const EXPORT_HEADER: &str =
    "Participant Name,Email,Phone,Registration Number,Status,Check-in Time,Notes";

/// Render the export as CSV: one header row, then one row per attendance
/// record, in the stable column order of the header.
pub fn render_attendance_csv(rows: &[AttendanceExportRow]) -> String {
    let mut out = String::from(EXPORT_HEADER);
    out.push('\n');

    for row in rows {
        let check_in = row
            .check_in_time
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();

        let fields = [
            row.participant_name.as_str(),
            row.email.as_str(),
            row.phone.as_deref().unwrap_or(""),
            row.registration_number.as_str(),
            row.attendance_status.as_str(),
            check_in.as_str(),
            row.notes.as_deref().unwrap_or(""),
        ];

        let line: Vec<String> = fields.iter().map(|f| csv_escape(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }

    out
}

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn export_row(name: &str, notes: Option<&str>) -> AttendanceExportRow {
        AttendanceExportRow {
            participant_name: name.to_string(),
            email: "priya@example.edu".into(),
            phone: Some("9876543210".into()),
            registration_number: "REG-7K2QX9AD".into(),
            attendance_status: AttendanceStatus::Present,
            check_in_time: NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(9, 15, 0),
            notes: notes.map(String::from),
        }
    }

    #[test]
    fn csv_has_one_header_and_one_row_per_record() {
        let rows = vec![export_row("Priya", None), export_row("Arun", None)];
        let csv = render_attendance_csv(&rows);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Participant Name,Email,Phone,Registration Number,Status,Check-in Time,Notes"
        );
        assert!(lines[1].starts_with("Priya,"));
        assert!(lines[1].contains("REG-7K2QX9AD"));
        assert!(lines[1].contains("present"));
        assert!(lines[1].contains("2025-03-01 09:15:00"));
    }

    #[test]
    fn empty_export_is_header_only() {
        let csv = render_attendance_csv(&[]);
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn fields_with_commas_and_quotes_are_escaped() {
        let rows = vec![export_row("Priya, S", Some("said \"late bus\""))];
        let csv = render_attendance_csv(&rows);
        let line = csv.lines().nth(1).unwrap();

        assert!(line.starts_with("\"Priya, S\","));
        assert!(line.ends_with("\"said \"\"late bus\"\"\""));
    }

    #[test]
    fn statistics_fold_counts_by_status() {
        let counts = [
            (AttendanceStatus::Present, 12),
            (AttendanceStatus::Late, 3),
        ];
        let stats = AttendanceStatistics::from_counts(&counts, 20);

        assert_eq!(stats.present, 12);
        assert_eq!(stats.absent, 0);
        assert_eq!(stats.late, 3);
        assert_eq!(stats.attendance_marked, 15);
        assert_eq!(stats.attendance_not_marked, 5);
        assert_eq!(
            stats.attendance_marked + stats.attendance_not_marked,
            stats.total_registrations
        );
    }

    #[test]
    fn statistics_never_go_negative_on_stale_totals() {
        let counts = [(AttendanceStatus::Present, 10)];
        let stats = AttendanceStatistics::from_counts(&counts, 7);
        assert_eq!(stats.attendance_not_marked, 0);
    }
}
