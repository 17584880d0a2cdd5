//! Field validation for incoming records.
//!
//! Every rule is checked and all failures are reported together.

use chrono::NaiveDate;

use crate::error::{PlanningError, Result};
use crate::types::{ProjectInput, SignupRequest, TeamInput};

/// Longest accepted name.
pub const NAME_MAX: usize = 200;
/// Longest accepted description.
pub const DESCRIPTION_MAX: usize = 1000;
/// Longest accepted email.
pub const EMAIL_MAX: usize = 1000;
/// Shortest accepted password, in characters.
pub const PASSWORD_MIN: usize = 8;
/// Longest accepted password, in bytes. Bcrypt ignores anything past this.
pub const PASSWORD_MAX_BYTES: usize = 72;

#[derive(Default)]
struct Violations(Vec<String>);

impl Violations {
    fn length(&mut self, field: &str, value: &str, min: usize, max: usize) {
        let len = value.chars().count();
        if len < min || len > max {
            self.0
                .push(format!("{field} must be between {min} and {max} characters"));
        }
    }

    fn max_length(&mut self, field: &str, value: Option<&str>, max: usize) {
        if value.is_some_and(|v| v.chars().count() > max) {
            self.0.push(format!("{field} must be at most {max} characters"));
        }
    }

    fn password(&mut self, value: &str) {
        if value.chars().count() < PASSWORD_MIN {
            self.0
                .push(format!("password must be at least {PASSWORD_MIN} characters"));
        }
        if value.len() > PASSWORD_MAX_BYTES {
            self.0
                .push(format!("password must be at most {PASSWORD_MAX_BYTES} bytes"));
        }
    }

    fn dates(&mut self, start: NaiveDate, end: Option<NaiveDate>) {
        if end.is_some_and(|end| end < start) {
            self.0.push("endDate must not be before startDate".to_string());
        }
    }

    fn finish(self) -> Result<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(PlanningError::EntityValidation(self.0.join("; ")))
        }
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Validate a signup request.
///
/// # Errors
///
/// Returns `PlanningError::EntityValidation` listing every violated rule.
pub fn validate_signup(request: &SignupRequest) -> Result<()> {
    let mut v = Violations::default();
    v.length("name", request.name.trim(), 1, NAME_MAX);
    v.length("email", &request.email, 1, EMAIL_MAX);
    if !request.email.is_empty() && !looks_like_email(&request.email) {
        v.0.push("email must be a well-formed email address".to_string());
    }
    v.password(&request.password);
    v.finish()
}

/// Validate team fields.
///
/// # Errors
///
/// Returns `PlanningError::EntityValidation` listing every violated rule.
pub fn validate_team(input: &TeamInput) -> Result<()> {
    let mut v = Violations::default();
    v.length("name", input.name.trim(), 1, NAME_MAX);
    v.max_length("description", input.description.as_deref(), DESCRIPTION_MAX);
    v.dates(input.start_date, input.end_date);
    v.finish()
}

/// Validate project fields.
///
/// # Errors
///
/// Returns `PlanningError::EntityValidation` listing every violated rule.
pub fn validate_project(input: &ProjectInput) -> Result<()> {
    let mut v = Violations::default();
    v.length("name", input.name.trim(), 1, NAME_MAX);
    v.max_length("description", input.description.as_deref(), DESCRIPTION_MAX);
    v.dates(input.start_date, input.end_date);
    v.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(name: &str, email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn team(name: &str) -> TeamInput {
        TeamInput {
            uuid: None,
            name: name.to_string(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end_date: None,
        }
    }

    #[test]
    fn valid_signup_passes() {
        assert!(validate_signup(&signup("Ada", "ada@example.com", "password1")).is_ok());
    }

    #[test]
    fn signup_reports_every_violation() {
        let err = validate_signup(&signup("", "not-an-email", "short")).unwrap_err();
        let PlanningError::EntityValidation(message) = err else {
            panic!("expected entity validation error");
        };
        assert!(message.contains("name must be between 1 and 200 characters"));
        assert!(message.contains("email must be a well-formed email address"));
        assert!(message.contains("password must be at least 8 characters"));
    }

    #[test]
    fn password_is_capped_in_bytes() {
        assert!(validate_signup(&signup("Ada", "ada@example.com", &"p".repeat(72))).is_ok());

        let err = validate_signup(&signup("Ada", "ada@example.com", &"p".repeat(73))).unwrap_err();
        assert!(err.to_string().contains("password must be at most 72 bytes"));

        // 25 three-byte characters: short in chars, long in bytes
        let err = validate_signup(&signup("Ada", "ada@example.com", &"€".repeat(25))).unwrap_err();
        assert!(err.to_string().contains("password must be at most 72 bytes"));
    }

    #[test]
    fn email_shapes() {
        assert!(looks_like_email("a@b"));
        assert!(looks_like_email("a.b@c.d"));
        assert!(!looks_like_email("@b.com"));
        assert!(!looks_like_email("a@"));
        assert!(!looks_like_email("a@b@c"));
        assert!(!looks_like_email("a b@c.d"));
    }

    #[test]
    fn team_name_bounds() {
        assert!(validate_team(&team("Core")).is_ok());
        assert!(validate_team(&team("   ")).is_err());
        assert!(validate_team(&team(&"x".repeat(200))).is_ok());
        assert!(validate_team(&team(&"x".repeat(201))).is_err());
    }

    #[test]
    fn team_description_and_dates() {
        let mut input = team("Core");
        input.description = Some("d".repeat(1001));
        input.end_date = NaiveDate::from_ymd_opt(2024, 2, 1);

        let err = validate_team(&input).unwrap_err().to_string();
        assert!(err.contains("description must be at most 1000 characters"));
        assert!(err.contains("endDate must not be before startDate"));
    }

    #[test]
    fn project_same_day_end_is_fine() {
        let input = ProjectInput {
            uuid: None,
            name: "Launch".to_string(),
            description: Some("ship it".to_string()),
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            active: None,
        };
        assert!(validate_project(&input).is_ok());
    }
}
