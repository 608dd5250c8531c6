//! Authentication payloads

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::user::UserResponse;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 255, message = "Full name is required"))]
    pub full_name: String,
}

impl SignupRequest {
    /// Trim email and name; the password is kept verbatim
    pub fn normalized(self) -> Self {
        Self {
            email: self.email.trim().to_string(),
            password: self.password,
            full_name: self.full_name.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SigninRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Optional body for signout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignoutRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Old password is required"))]
    pub old_password: String,
    #[validate(length(min = 8, message = "New password must be at least 8 characters"))]
    pub new_password: String,
}

/// Signup result (no tokens; the client signs in afterwards)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupResponse {
    pub id: uuid::Uuid,
    pub email: String,
    pub employee_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigninResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_validation() {
        let ok = SignupRequest {
            email: "a@x.io".into(),
            password: "Passw0rd!".into(),
            full_name: "Alice".into(),
        };
        assert!(ok.validate().is_ok());

        let bad = SignupRequest {
            email: "a-at-x.io".into(),
            password: "short".into(),
            full_name: String::new(),
        };
        assert_eq!(bad.validate().unwrap_err().field_errors().len(), 3);
    }

    #[test]
    fn test_signup_blank_name_rejected_after_normalizing() {
        let req = SignupRequest {
            email: "  a@x.io ".into(),
            password: " Passw0rd! ".into(),
            full_name: "   ".into(),
        }
        .normalized();
        assert_eq!(req.email, "a@x.io");
        assert_eq!(req.password, " Passw0rd! ");
        let errs = req.validate().unwrap_err();
        let fields = errs.field_errors();
        assert_eq!(fields.len(), 1);
        assert!(fields.contains_key("full_name"));
    }

    #[test]
    fn test_change_password_requires_length() {
        let req = ChangePasswordRequest {
            old_password: "whatever".into(),
            new_password: "1234567".into(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_signout_body_is_optional() {
        let req: SignoutRequest = serde_json::from_str("{}").unwrap();
        assert!(req.refresh_token.is_none());
    }
}
