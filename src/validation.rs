//! Form validation.
//!
//! Validation failures are user-facing and surfaced verbatim; the login
//! handler redirects with the first failure, the registration handler
//! collects all of them and joins them into one message.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("username regex"));

/// Trimmed, length-checked login credentials.
#[derive(Debug, Clone)]
pub struct LoginInput {
    // ---
    pub username: String,
    pub password: String,
}

/// Validates the login form.
///
/// Returns the trimmed credentials or a single user-facing message.
pub fn validate_login(username: &str, password: &str) -> Result<LoginInput, String> {
    // ---
    let username = username.trim();
    let password = password.trim();

    if username.is_empty() || password.is_empty() {
        return Err("Please fill in all fields".into());
    }
    if username.len() < 3 {
        return Err("Username must be at least 3 characters".into());
    }
    if password.len() < 6 {
        return Err("Password must be at least 6 characters".into());
    }

    Ok(LoginInput {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Raw registration form fields as submitted.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    // ---
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    /// Checkbox; browsers send "on" when ticked and omit it otherwise.
    #[serde(default)]
    pub agree_terms: String,
}

/// Normalized registration input, ready for duplicate checks and hashing.
#[derive(Debug, Clone)]
pub struct RegistrationInput {
    // ---
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Validates a registration submission.
///
/// Collects every violation rather than stopping at the first, so the
/// user sees the full list in one round trip. Email and username are
/// lowercased; names are trimmed.
pub fn validate_registration(form: &RegistrationForm) -> Result<RegistrationInput, Vec<String>> {
    // ---
    let mut errors = Vec::new();

    let first_name = form.first_name.trim();
    if first_name.is_empty() {
        errors.push("First name is required".to_string());
    } else if first_name.len() > 255 {
        errors.push("First name must be less than 255 characters".to_string());
    }

    let last_name = form.last_name.trim();
    if last_name.is_empty() {
        errors.push("Last name is required".to_string());
    } else if last_name.len() > 255 {
        errors.push("Last name must be less than 255 characters".to_string());
    }

    let email = form.email.trim().to_lowercase();
    if email.is_empty() {
        errors.push("Email is required".to_string());
    } else if !EMAIL_RE.is_match(&email) {
        errors.push("Please enter a valid email address".to_string());
    } else if email.len() > 255 {
        errors.push("Email must be less than 255 characters".to_string());
    }

    let username = form.username.trim().to_lowercase();
    if username.is_empty() {
        errors.push("Username is required".to_string());
    } else if username.len() < 3 {
        errors.push("Username must be at least 3 characters long".to_string());
    } else if username.len() > 255 {
        errors.push("Username must be less than 255 characters".to_string());
    } else if !USERNAME_RE.is_match(&username) {
        errors.push(
            "Username can only contain letters, numbers, dots, hyphens, and underscores"
                .to_string(),
        );
    }

    let password = form.password.as_str();
    if password.is_empty() {
        errors.push("Password is required".to_string());
    } else {
        if password.len() < 8 {
            errors.push("Password must be at least 8 characters long".to_string());
        }
        if password.len() > 255 {
            errors.push("Password must be less than 255 characters".to_string());
        }
        let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        if !(has_letter && has_digit) {
            errors.push("Password must contain at least one letter and one number".to_string());
        }
    }

    if form.confirm_password.is_empty() {
        errors.push("Password confirmation is required".to_string());
    } else if form.password != form.confirm_password {
        errors.push("Passwords do not match".to_string());
    }

    if form.agree_terms != "on" {
        errors.push("You must agree to the terms and conditions".to_string());
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(RegistrationInput {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email,
        username,
        password: form.password.clone(),
    })
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn good_form() -> RegistrationForm {
        // ---
        RegistrationForm {
            first_name: "Meriadoc".into(),
            last_name: "Brandybuck".into(),
            email: "Merry@Shire.Example".into(),
            username: "Merry".into(),
            password: "abc123ab".into(),
            confirm_password: "abc123ab".into(),
            agree_terms: "on".into(),
        }
    }

    #[test]
    fn login_requires_both_fields() {
        // ---
        assert_eq!(
            validate_login("", "secret1").unwrap_err(),
            "Please fill in all fields"
        );
        assert_eq!(
            validate_login("merry", "  ").unwrap_err(),
            "Please fill in all fields"
        );
    }

    #[test]
    fn login_enforces_minimum_lengths() {
        // ---
        assert!(validate_login("ab", "secret1").is_err());
        assert!(validate_login("merry", "12345").is_err());

        let ok = validate_login("  merry  ", " secret1 ").unwrap();
        assert_eq!(ok.username, "merry");
        assert_eq!(ok.password, "secret1");
    }

    #[test]
    fn valid_registration_is_normalized() {
        // ---
        let input = validate_registration(&good_form()).unwrap();
        assert_eq!(input.email, "merry@shire.example");
        assert_eq!(input.username, "merry");
        assert_eq!(input.first_name, "Meriadoc");
    }

    #[test]
    fn registration_collects_all_errors() {
        // ---
        let form = RegistrationForm::default();
        let errors = validate_registration(&form).unwrap_err();

        assert!(errors.contains(&"First name is required".to_string()));
        assert!(errors.contains(&"Email is required".to_string()));
        assert!(errors.contains(&"Password is required".to_string()));
        assert!(errors.contains(&"You must agree to the terms and conditions".to_string()));
    }

    #[test]
    fn bad_email_is_rejected() {
        // ---
        let mut form = good_form();
        form.email = "not-an-email".into();
        let errors = validate_registration(&form).unwrap_err();
        assert_eq!(errors, vec!["Please enter a valid email address".to_string()]);
    }

    #[test]
    fn username_charset_is_enforced() {
        // ---
        let mut form = good_form();
        form.username = "merry brandybuck".into();
        let errors = validate_registration(&form).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Username can only contain letters, numbers, dots, hyphens, and underscores"
                    .to_string()
            ]
        );
    }

    #[test]
    fn password_needs_letter_and_digit() {
        // ---
        let mut form = good_form();
        form.password = "abcdefgh".into();
        form.confirm_password = "abcdefgh".into();
        let errors = validate_registration(&form).unwrap_err();
        assert_eq!(
            errors,
            vec!["Password must contain at least one letter and one number".to_string()]
        );
    }

    #[test]
    fn mismatched_confirmation_is_rejected() {
        // ---
        let mut form = good_form();
        form.confirm_password = "abc123ac".into();
        let errors = validate_registration(&form).unwrap_err();
        assert_eq!(errors, vec!["Passwords do not match".to_string()]);
    }
}
