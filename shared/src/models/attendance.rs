//! Attendance Model
//!
//! Timestamps are Unix millis. `attendance_id` is
//! `{employee_code}-{YYYY-MM-DD}` in the server's business time zone.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::response::PageQuery;

/// Direction of a history event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceType {
    In,
    Out,
}

impl AttendanceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "in" => Some(Self::In),
            "out" => Some(Self::Out),
            _ => None,
        }
    }
}

/// Derived punctuality label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Punctuality {
    #[serde(rename = "On Time")]
    OnTime,
    #[serde(rename = "Late")]
    Late,
    #[serde(rename = "Early Leave")]
    EarlyLeave,
    #[serde(rename = "N/A")]
    NotApplicable,
}

/// Today's state of the per-day state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    #[serde(rename = "Not Clocked")]
    NotClocked,
    #[serde(rename = "Clocked In")]
    ClockedIn,
    #[serde(rename = "Clocked Out")]
    ClockedOut,
}

/// Daily attendance record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceResponse {
    pub id: Uuid,
    pub employee_code: String,
    pub attendance_id: String,
    pub clock_in: Option<i64>,
    pub clock_out: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// `GET /attendance/logs` filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceLogQuery {
    /// YYYY-MM-DD (business time zone)
    pub date: Option<String>,
    pub department_id: Option<Uuid>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl AttendanceLogQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// One row of the attendance log with derived punctuality
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceLogResponse {
    pub attendance_id: String,
    pub employee_code: String,
    pub full_name: String,
    pub department_name: String,
    pub clock_in: Option<i64>,
    pub clock_out: Option<i64>,
    pub in_punctuality: Punctuality,
    pub out_punctuality: Punctuality,
}

/// `GET /attendance/history` query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub user_id: Uuid,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl HistoryQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// Append-only history event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceHistoryResponse {
    pub id: Uuid,
    pub employee_code: String,
    pub attendance_id: String,
    pub date_attendance: i64,
    pub attendance_type: AttendanceType,
    pub description: String,
}

/// `GET /attendance/status` query; defaults to the caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusQuery {
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentStatusResponse {
    pub user_id: Uuid,
    pub employee_code: String,
    pub full_name: String,
    pub department: Option<String>,
    pub status: AttendanceStatus,
    pub clock_in: Option<i64>,
    pub clock_out: Option<i64>,
    pub updated_at: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_serialize_with_spaces() {
        assert_eq!(
            serde_json::to_string(&Punctuality::OnTime).unwrap(),
            "\"On Time\""
        );
        assert_eq!(
            serde_json::to_string(&Punctuality::EarlyLeave).unwrap(),
            "\"Early Leave\""
        );
        assert_eq!(
            serde_json::to_string(&Punctuality::NotApplicable).unwrap(),
            "\"N/A\""
        );
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::NotClocked).unwrap(),
            "\"Not Clocked\""
        );
    }

    #[test]
    fn test_attendance_type_from_db() {
        assert_eq!(AttendanceType::from_db("in"), Some(AttendanceType::In));
        assert_eq!(AttendanceType::from_db("out"), Some(AttendanceType::Out));
        assert_eq!(AttendanceType::from_db("break"), None);
    }
}
