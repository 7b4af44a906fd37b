use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed role set governing authorization decisions. The wire form is the
/// uppercase name (`"AUTHOR"`, `"REVIEWER"`, ...); anything else is rejected
/// at the serde boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Author,
    Reviewer,
    Editor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Author => "AUTHOR",
            Role::Reviewer => "REVIEWER",
            Role::Editor => "EDITOR",
            Role::Admin => "ADMIN",
        }
    }

    /// Parse the uppercase wire form. Used where a role arrives as a plain
    /// string field so that a bad value can be reported alongside other
    /// field errors instead of failing the whole deserialization.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "AUTHOR" => Some(Role::Author),
            "REVIEWER" => Some(Role::Reviewer),
            "EDITOR" => Some(Role::Editor),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public user shape. The password hash lives only in the store layer and
/// never appears here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub institution: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_wire_form_is_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Author).unwrap(), "\"AUTHOR\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"REVIEWER\"").unwrap(),
            Role::Reviewer
        );
        assert!(serde_json::from_str::<Role>("\"author\"").is_err());
    }

    #[test]
    fn role_parse_matches_closed_set() {
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("EDITOR"), Some(Role::Editor));
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn user_serializes_created_at_as_camel_case() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ann Lee".into(),
            email: "ann@uni.edu".into(),
            role: Role::Author,
            institution: "MIT".into(),
            department: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("department").is_none());
        assert!(json.get("password").is_none());
    }
}
