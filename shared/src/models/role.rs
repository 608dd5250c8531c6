//! Role Model

use serde::{Deserialize, Serialize};

/// Application role. A user holds exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Employee,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Admin => "admin",
        }
    }

    /// Parse a stored role name. Unknown values (including the legacy
    /// `"user"`) are treated as `Employee`.
    pub fn from_db(value: &str) -> Self {
        match value {
            "admin" => Self::Admin,
            _ => Self::Employee,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Change role payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_db_defaults_to_employee() {
        assert_eq!(Role::from_db("admin"), Role::Admin);
        assert_eq!(Role::from_db("employee"), Role::Employee);
        assert_eq!(Role::from_db("user"), Role::Employee);
        assert_eq!(Role::from_db(""), Role::Employee);
    }

    #[test]
    fn test_serde() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let req: ChangeRoleRequest = serde_json::from_str(r#"{"role":"employee"}"#).unwrap();
        assert_eq!(req.role, Role::Employee);
        assert!(serde_json::from_str::<ChangeRoleRequest>(r#"{"role":"owner"}"#).is_err());
    }
}
