//! Registration input validation. Every violated rule is reported, not
//! just the first, so the client can surface all field errors at once.

use std::sync::LazyLock;

use regex::Regex;

use scholar_types::api::{FieldError, RegisterRequest};
use scholar_types::models::Role;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

/// A registration request that passed every rule. `role` is typed from
/// here on; the raw string form stops at this boundary.
#[derive(Debug)]
pub struct ValidRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub institution: String,
    pub department: Option<String>,
}

/// Roles a self-registration may claim. Admin accounts are seeded, never
/// self-registered.
fn registrable_role(s: &str) -> Option<Role> {
    match Role::parse(s) {
        Some(Role::Author) => Some(Role::Author),
        Some(Role::Reviewer) => Some(Role::Reviewer),
        Some(Role::Editor) => Some(Role::Editor),
        Some(Role::Admin) | None => None,
    }
}

pub fn validate_registration(req: &RegisterRequest) -> Result<ValidRegistration, Vec<FieldError>> {
    let mut errors = Vec::new();

    if req.name.chars().count() < 2 {
        errors.push(FieldError::new("name", "Name must be at least 2 characters"));
    }

    if !EMAIL_RE.is_match(&req.email) {
        errors.push(FieldError::new("email", "Invalid email address"));
    }

    if req.password.chars().count() < 8 {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 8 characters",
        ));
    }

    let role = registrable_role(&req.role);
    if role.is_none() {
        errors.push(FieldError::new(
            "role",
            "Role must be one of AUTHOR, REVIEWER, EDITOR",
        ));
    }

    if req.institution.chars().count() < 2 {
        errors.push(FieldError::new("institution", "Institution is required"));
    }

    match role {
        Some(role) if errors.is_empty() => Ok(ValidRegistration {
            name: req.name.clone(),
            email: req.email.clone(),
            password: req.password.clone(),
            role,
            institution: req.institution.clone(),
            department: req.department.clone(),
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RegisterRequest {
        RegisterRequest {
            name: "Ann Lee".into(),
            email: "ann@uni.edu".into(),
            password: "longenough1".into(),
            role: "AUTHOR".into(),
            institution: "MIT".into(),
            department: None,
        }
    }

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn valid_input_passes() {
        let valid = validate_registration(&request()).unwrap();
        assert_eq!(valid.role, Role::Author);
        assert_eq!(valid.email, "ann@uni.edu");
    }

    #[test]
    fn short_name_is_rejected() {
        let mut req = request();
        req.name = "A".into();
        assert_eq!(fields(&validate_registration(&req).unwrap_err()), ["name"]);
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for email in ["", "ann", "ann@", "@uni.edu", "ann@uni", "ann @uni.edu"] {
            let mut req = request();
            req.email = email.into();
            assert_eq!(
                fields(&validate_registration(&req).unwrap_err()),
                ["email"],
                "expected rejection for {email:?}"
            );
        }
    }

    #[test]
    fn short_password_is_rejected() {
        let mut req = request();
        req.password = "seven77".into();
        assert_eq!(fields(&validate_registration(&req).unwrap_err()), ["password"]);
    }

    #[test]
    fn password_of_exactly_eight_passes() {
        let mut req = request();
        req.password = "eight888".into();
        assert!(validate_registration(&req).is_ok());
    }

    #[test]
    fn admin_and_unknown_roles_are_rejected() {
        for role in ["ADMIN", "author", "CHAIR", ""] {
            let mut req = request();
            req.role = role.into();
            assert_eq!(
                fields(&validate_registration(&req).unwrap_err()),
                ["role"],
                "expected rejection for {role:?}"
            );
        }
    }

    #[test]
    fn reviewer_and_editor_are_registrable() {
        for (role, expected) in [("REVIEWER", Role::Reviewer), ("EDITOR", Role::Editor)] {
            let mut req = request();
            req.role = role.into();
            assert_eq!(validate_registration(&req).unwrap().role, expected);
        }
    }

    #[test]
    fn short_institution_is_rejected() {
        let mut req = request();
        req.institution = "X".into();
        assert_eq!(fields(&validate_registration(&req).unwrap_err()), ["institution"]);
    }

    #[test]
    fn department_is_optional() {
        let mut req = request();
        req.department = Some("EECS".into());
        assert_eq!(
            validate_registration(&req).unwrap().department.as_deref(),
            Some("EECS")
        );
    }

    #[test]
    fn every_violation_is_enumerated() {
        let req = RegisterRequest {
            name: "A".into(),
            email: "not-an-email".into(),
            password: "short".into(),
            role: "WIZARD".into(),
            institution: "".into(),
            department: None,
        };
        let errors = validate_registration(&req).unwrap_err();
        assert_eq!(
            fields(&errors),
            ["name", "email", "password", "role", "institution"]
        );
    }
}
