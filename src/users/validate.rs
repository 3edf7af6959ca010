use lazy_static::lazy_static;
use regex::Regex;
use sqlx::PgPool;

use super::dto::RegisterRequest;
use super::repo::User;

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}

/// Registration ruleset, collect-all: every failing rule contributes its
/// message, fields in declaration order, rules within a field in
/// declaration order. Absent values run the remaining rules against the
/// empty string.
pub(crate) fn registration_errors(
    req: &RegisterRequest,
    existing_emails: &[String],
) -> Vec<String> {
    let mut errors = Vec::new();

    if is_blank(req.first_name.as_deref()) {
        errors.push(r#"Please provide a value for "first name""#.to_string());
    }
    if is_blank(req.last_name.as_deref()) {
        errors.push(r#"Please provide a value for "last name""#.to_string());
    }

    let email = req.email_address.as_deref().unwrap_or_default();
    if is_blank(req.email_address.as_deref()) {
        errors.push(r#"Please provide a value for "Email""#.to_string());
    }
    if !is_valid_email(email) {
        errors.push(r#"Please provide a valid email address for "Email""#.to_string());
    }
    if existing_emails.iter().any(|existing| existing == email) {
        errors.push(
            "The email you entered is already in use. Please use a different email".to_string(),
        );
    }

    let password = req.password.as_deref().unwrap_or_default();
    if is_blank(req.password.as_deref()) {
        errors.push(r#"Please provide a value for "Password""#.to_string());
    }
    if !(8..=20).contains(&password.chars().count()) {
        errors.push("Please provide password with 8 to 20 characters".to_string());
    }

    errors
}

/// Runs the ruleset against a payload, loading every existing user for
/// the email uniqueness check (exact case-sensitive match over a full
/// scan).
pub(crate) async fn validate_registration(
    db: &PgPool,
    req: &RegisterRequest,
) -> Result<Vec<String>, sqlx::Error> {
    let emails: Vec<String> = User::find_all(db)
        .await?
        .into_iter()
        .map(|u| u.email_address)
        .collect();
    Ok(registration_errors(req, &emails))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(
        first_name: Option<&str>,
        last_name: Option<&str>,
        email_address: Option<&str>,
        password: Option<&str>,
    ) -> RegisterRequest {
        RegisterRequest {
            first_name: first_name.map(Into::into),
            last_name: last_name.map(Into::into),
            email_address: email_address.map(Into::into),
            password: password.map(Into::into),
        }
    }

    #[test]
    fn valid_payload_passes() {
        let req = payload(Some("Jo"), Some("Lee"), Some("jo@example.com"), Some("password1"));
        assert!(registration_errors(&req, &[]).is_empty());
    }

    #[test]
    fn empty_payload_collects_every_message_in_field_order() {
        let req = payload(None, None, None, None);
        let errors = registration_errors(&req, &[]);
        assert_eq!(
            errors,
            vec![
                r#"Please provide a value for "first name""#,
                r#"Please provide a value for "last name""#,
                r#"Please provide a value for "Email""#,
                r#"Please provide a valid email address for "Email""#,
                r#"Please provide a value for "Password""#,
                "Please provide password with 8 to 20 characters",
            ]
        );
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        let req = payload(Some("   "), Some("Lee"), Some("jo@example.com"), Some("password1"));
        let errors = registration_errors(&req, &[]);
        assert_eq!(errors, vec![r#"Please provide a value for "first name""#]);
    }

    #[test]
    fn malformed_email_is_rejected() {
        for bad in ["not-an-email", "a@b", "two@at@signs.com", "spaces in@example.com"] {
            let req = payload(Some("Jo"), Some("Lee"), Some(bad), Some("password1"));
            let errors = registration_errors(&req, &[]);
            assert_eq!(
                errors,
                vec![r#"Please provide a valid email address for "Email""#],
                "expected {bad} to be rejected"
            );
        }
    }

    // The scan checked here races against a concurrent insert of the same
    // address: check-then-create is not atomic, so two simultaneous
    // registrations can both pass this rule.
    #[test]
    fn duplicate_email_is_reported() {
        let existing = vec!["jo@example.com".to_string()];
        let req = payload(Some("Jo"), Some("Lee"), Some("jo@example.com"), Some("password1"));
        let errors = registration_errors(&req, &existing);
        assert_eq!(
            errors,
            vec!["The email you entered is already in use. Please use a different email"]
        );
    }

    #[test]
    fn duplicate_check_is_case_sensitive() {
        let existing = vec!["jo@example.com".to_string()];
        let req = payload(Some("Jo"), Some("Lee"), Some("JO@example.com"), Some("password1"));
        assert!(registration_errors(&req, &existing).is_empty());
    }

    #[test]
    fn password_length_bounds() {
        for (password, ok) in [
            ("seven77", false),
            ("eight888", true),
            ("exactly-twenty-chars", true),
            ("twenty-one-characters", false),
        ] {
            let req = payload(Some("Jo"), Some("Lee"), Some("jo@example.com"), Some(password));
            let errors = registration_errors(&req, &[]);
            assert_eq!(
                errors.is_empty(),
                ok,
                "password {password:?} ({} chars)",
                password.len()
            );
            if !ok {
                assert_eq!(errors, vec!["Please provide password with 8 to 20 characters"]);
            }
        }
    }

    #[test]
    fn missing_password_reports_required_and_length() {
        let req = payload(Some("Jo"), Some("Lee"), Some("jo@example.com"), None);
        let errors = registration_errors(&req, &[]);
        assert_eq!(
            errors,
            vec![
                r#"Please provide a value for "Password""#,
                "Please provide password with 8 to 20 characters",
            ]
        );
    }
}
