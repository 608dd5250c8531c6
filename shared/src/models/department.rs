//! Department Model

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Department with its working-hour thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentResponse {
    pub id: Uuid,
    pub name: String,
    /// Latest on-time clock-in (HH:MM:SS)
    pub max_clock_in_time: Option<NaiveTime>,
    /// Earliest on-time clock-out (HH:MM:SS)
    pub max_clock_out_time: Option<NaiveTime>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create department payload. Times are `HH:MM:SS`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDepartmentRequest {
    #[validate(length(min = 3, max = 255, message = "Name must be 3-255 characters"))]
    pub name: String,
    pub max_clock_in_time: String,
    pub max_clock_out_time: String,
}

impl CreateDepartmentRequest {
    /// Trim every field so the length rules see the stored value
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            max_clock_in_time: self.max_clock_in_time.trim().to_string(),
            max_clock_out_time: self.max_clock_out_time.trim().to_string(),
        }
    }
}

/// Partial update; absent or empty fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateDepartmentRequest {
    #[validate(length(min = 3, max = 255, message = "Name must be 3-255 characters"))]
    pub name: Option<String>,
    pub max_clock_in_time: Option<String>,
    pub max_clock_out_time: Option<String>,
}

impl UpdateDepartmentRequest {
    pub fn normalized(self) -> Self {
        fn keep(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }
        Self {
            name: keep(self.name),
            max_clock_in_time: keep(self.max_clock_in_time),
            max_clock_out_time: keep(self.max_clock_out_time),
        }
    }
}

/// Place a user into a department
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignDepartmentRequest {
    pub user_id: Uuid,
    pub department_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_serializes_as_hms() {
        let dept = DepartmentResponse {
            id: Uuid::nil(),
            name: "Engineering".into(),
            max_clock_in_time: NaiveTime::from_hms_opt(9, 0, 0),
            max_clock_out_time: NaiveTime::from_hms_opt(17, 0, 0),
            created_at: 0,
            updated_at: 0,
        };
        let json = serde_json::to_value(&dept).unwrap();
        assert_eq!(json["max_clock_in_time"], "09:00:00");
        assert_eq!(json["max_clock_out_time"], "17:00:00");
    }

    #[test]
    fn test_update_normalized() {
        let req = UpdateDepartmentRequest {
            name: Some(String::new()),
            max_clock_in_time: Some("08:30:00".into()),
            max_clock_out_time: None,
        }
        .normalized();
        assert!(req.name.is_none());
        assert!(req.validate().is_ok());
        assert_eq!(req.max_clock_in_time.as_deref(), Some("08:30:00"));
    }

    #[test]
    fn test_padded_name_fails_after_normalizing() {
        let create = CreateDepartmentRequest {
            name: " ab  ".into(),
            max_clock_in_time: " 09:00:00".into(),
            max_clock_out_time: "17:00:00 ".into(),
        };
        assert!(create.validate().is_ok());
        let create = create.normalized();
        assert_eq!(create.name, "ab");
        assert_eq!(create.max_clock_in_time, "09:00:00");
        assert!(create.validate().unwrap_err().field_errors().contains_key("name"));

        let update = UpdateDepartmentRequest {
            name: Some(" ab  ".into()),
            ..Default::default()
        }
        .normalized();
        assert_eq!(update.name.as_deref(), Some("ab"));
        assert!(update.validate().is_err());
    }
}
