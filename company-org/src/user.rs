//! Host users
//!
//! Authentication belongs to the host application; this crate only needs to
//! know who is calling, whether they are platform staff, and their email for
//! matching invitations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CompanyError, CompanyResult};

/// A user of the host application.
///
/// # Examples
///
/// ```
/// use company_org::User;
///
/// let user = User::new("alice").with_email("Alice@Example.com").staff();
/// assert_eq!(user.email.as_deref(), Some("alice@example.com"));
/// assert!(user.is_staff);
/// assert!(user.is_active);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID
    pub id: Uuid,

    /// Unique login name
    pub username: String,

    /// Email address, stored lowercase
    pub email: Option<String>,

    /// Platform staff (moderators)
    pub is_staff: bool,

    /// Inactive users are denied everything
    pub is_active: bool,

    /// When the user was registered
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new active, non-staff user without an email.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            username: username.into(),
            email: None,
            is_staff: false,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    /// Set the email address.
    pub fn with_email(mut self, email: impl AsRef<str>) -> Self {
        self.email = Some(normalize_email(email.as_ref()));
        self
    }

    /// Mark the user as platform staff.
    pub fn staff(mut self) -> Self {
        self.is_staff = true;
        self
    }

    /// Check whether this user has the given email (case-insensitive).
    pub fn has_email(&self, email: &str) -> bool {
        self.email
            .as_deref()
            .is_some_and(|own| own == normalize_email(email))
    }

    /// Lightweight representation for embedding in other responses.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// Summary of a user for member listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// User ID
    pub id: Uuid,

    /// Username
    pub username: String,

    /// Email
    pub email: Option<String>,
}

/// Lowercase and trim an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate and normalize an email address supplied as input `field`.
pub fn validate_email(field: &str, email: &str) -> CompanyResult<String> {
    let email = normalize_email(email);
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(email)
    } else {
        Err(CompanyError::validation(field, "Enter a valid email address"))
    }
}

/// Validate a username supplied as input `field`.
pub fn validate_username(field: &str, username: &str) -> CompanyResult<String> {
    let username = username.trim();
    if username.is_empty() {
        return Err(CompanyError::validation(field, "This field may not be blank"));
    }
    if username.chars().count() > 150 {
        return Err(CompanyError::validation(
            field,
            "Ensure this field has no more than 150 characters",
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
    {
        return Err(CompanyError::validation(
            field,
            "Username may contain only letters, digits and @/./+/-/_",
        ));
    }
    Ok(username.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("bob");
        assert_eq!(user.username, "bob");
        assert!(user.email.is_none());
        assert!(!user.is_staff);
        assert!(user.is_active);
    }

    #[test]
    fn test_has_email_is_case_insensitive() {
        let user = User::new("bob").with_email("Bob@Example.com");
        assert!(user.has_email("bob@example.com"));
        assert!(user.has_email(" BOB@EXAMPLE.COM "));
        assert!(!user.has_email("other@example.com"));
        assert!(!User::new("nomail").has_email("bob@example.com"));
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(
            validate_email("email", " New_User@Example.com ").unwrap(),
            "new_user@example.com"
        );
        assert!(validate_email("email", "not-an-email").is_err());
        assert!(validate_email("email", "a@b").is_err());
        assert!(validate_email("email", "@example.com").is_err());
        assert!(validate_email("email", "a@@example.com").is_err());
    }

    #[test]
    fn test_validate_username() {
        assert_eq!(validate_username("username", " new_user ").unwrap(), "new_user");
        assert!(validate_username("username", "").is_err());
        assert!(validate_username("username", "has space").is_err());
        assert!(validate_username("username", &"x".repeat(151)).is_err());
    }
}
