use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access role attached to an authenticated user.
///
/// Every account defaults to `User`; elevation to `Admin` happens out of
/// band (directly in the store), there is no in-app promotion flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    // ---
    pub fn as_str(&self) -> &'static str {
        // ---
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = ();

    /// Unknown role strings fall back to the least-privileged role.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // ---
        match s {
            "admin" => Ok(Role::Admin),
            _ => Ok(Role::User),
        }
    }
}

/// Credential row joined with its owning profile, as fetched for login.
///
/// `password_hash` is the bcrypt digest; plaintext never reaches this type.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    // ---
    pub user_id: i64,
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Normalized view of a successfully authenticated user.
///
/// This is the snapshot written into the session record on login; it never
/// carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    // ---
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub role: Role,
    pub login_time: DateTime<Utc>,
}

impl AuthenticatedUser {
    /// Builds the session snapshot from a credential record.
    ///
    /// Display name prefers "first last" and falls back to the username
    /// when the profile carries no usable name.
    pub fn from_record(record: &CredentialRecord) -> Self {
        // ---
        let full = format!("{} {}", record.first_name, record.last_name);
        let display_name = if full.trim().is_empty() {
            record.username.clone()
        } else {
            full.trim().to_string()
        };

        Self {
            id: record.user_id,
            username: record.username.clone(),
            display_name,
            role: record.role,
            login_time: Utc::now(),
        }
    }
}

/// Validated registration payload handed to the repository.
///
/// The password field already holds the bcrypt digest; hashing happens in
/// `domain::auth` before this struct is constructed.
#[derive(Debug, Clone)]
pub struct NewUser {
    // ---
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn record(first: &str, last: &str) -> CredentialRecord {
        // ---
        CredentialRecord {
            user_id: 7,
            username: "bilbo".into(),
            password_hash: "$2b$12$irrelevant".into(),
            first_name: first.into(),
            last_name: last.into(),
            email: "bilbo@shire.example".into(),
            role: Role::User,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn display_name_prefers_full_name() {
        // ---
        let user = AuthenticatedUser::from_record(&record("Bilbo", "Baggins"));
        assert_eq!(user.display_name, "Bilbo Baggins");
        assert_eq!(user.id, 7);
    }

    #[test]
    fn display_name_falls_back_to_username() {
        // ---
        let user = AuthenticatedUser::from_record(&record("", ""));
        assert_eq!(user.display_name, "bilbo");
    }

    #[test]
    fn unknown_role_parses_as_user() {
        // ---
        assert_eq!("editor".parse::<Role>(), Ok(Role::User));
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
    }
}
