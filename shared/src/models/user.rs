//! User & Profile Models

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::department::DepartmentResponse;
use super::role::Role;

/// `+` optional, then 8 to 15 digits
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{8,15}$").expect("phone regex is valid"));

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if is_valid_phone(phone) {
        Ok(())
    } else {
        Err(ValidationError::new("phone"))
    }
}

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    pub fn from_db(value: &str) -> Self {
        match value {
            "active" => Self::Active,
            _ => Self::Inactive,
        }
    }
}

/// Profile patch. Empty strings are treated as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 255, message = "Full name must be 2-255 characters"))]
    pub full_name: Option<String>,
    #[validate(custom(
        function = "validate_phone",
        message = "Phone number must be 8-15 digits (optionally with +)"
    ))]
    pub phone: Option<String>,
    #[validate(url(message = "Invalid URL format"))]
    pub avatar_url: Option<String>,
    #[validate(length(max = 500, message = "Address must be at most 500 characters"))]
    pub address: Option<String>,
}

impl UpdateProfileRequest {
    /// Trim every field and drop the ones left empty, so padding neither
    /// validates nor overwrites
    pub fn normalized(self) -> Self {
        fn keep(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }
        Self {
            full_name: keep(self.full_name),
            phone: keep(self.phone),
            avatar_url: keep(self.avatar_url),
            address: keep(self.address),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.phone.is_none()
            && self.avatar_url.is_none()
            && self.address.is_none()
    }
}

/// `GET /users` filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserListQuery {
    /// Case-insensitive substring match
    pub email: Option<String>,
    pub status: Option<UserStatus>,
    pub department_id: Option<Uuid>,
    /// YYYY-MM-DD, inclusive
    pub created_at_start: Option<String>,
    /// YYYY-MM-DD, inclusive
    pub created_at_end: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl UserListQuery {
    pub fn page_query(&self) -> crate::response::PageQuery {
        crate::response::PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// User view returned by signin, profile and listing endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// Profile id
    pub id: Uuid,
    pub source_user_id: Uuid,
    pub employee_code: String,
    pub email: String,
    pub status: UserStatus,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<DepartmentResponse>,
    pub full_name: String,
    pub phone: String,
    pub avatar_url: String,
    pub address: String,
    pub created_at: i64,
    pub updated_at: i64,
}
