//! Settings for company management
//!
//! Settings control invitation policy, confirmation links and what happens to
//! an owner who hands the company over. They are loaded from environment
//! variables with defaults suitable for local development.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use company_rbac::RoleType;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Role given to the previous owner when they stay in the company after an
/// ownership transfer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DepartingOwnerRole {
    /// Demote to the company admin role
    Admin,
    /// Demote to the employee role
    #[default]
    Employee,
}

impl DepartingOwnerRole {
    /// Role type the previous owner ends up with.
    pub fn role_type(&self) -> RoleType {
        match self {
            DepartingOwnerRole::Admin => RoleType::Admin,
            DepartingOwnerRole::Employee => RoleType::Employee,
        }
    }

    /// Parse from string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "employee" => Some(Self::Employee),
            _ => None,
        }
    }
}

/// Company management settings.
///
/// # Examples
///
/// ```
/// use company_org::settings::{CompanySettings, DepartingOwnerRole};
///
/// let settings = CompanySettings::default();
/// assert!(!settings.invite_not_users);
/// assert_eq!(settings.departing_owner_role, DepartingOwnerRole::Employee);
/// assert_eq!(
///     settings.invite_confirmation_link("abc"),
///     "http://localhost:8000/invite/abc"
/// );
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanySettings {
    /// Allow inviting email addresses that have no registered user
    #[serde(default)]
    pub invite_not_users: bool,

    /// Public site URL used in invitation confirmation links
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// Role of an owner who stays in the company after transferring it
    #[serde(default)]
    pub departing_owner_role: DepartingOwnerRole,

    /// Capacity of event bus channels created by hosts from these settings
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

fn default_site_url() -> String {
    "http://localhost:8000/".to_string()
}

fn default_event_channel_capacity() -> usize {
    1024
}

impl Default for CompanySettings {
    fn default() -> Self {
        Self {
            invite_not_users: false,
            site_url: default_site_url(),
            departing_owner_role: DepartingOwnerRole::default(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

impl CompanySettings {
    /// Load settings from environment variables.
    ///
    /// Environment variables:
    /// - `COMPANY_INVITE_NOT_USERS`: Invite unregistered emails (default: false)
    /// - `COMPANY_SITE_URL`: Site URL for confirmation links (default: http://localhost:8000/)
    /// - `COMPANY_DEPARTING_OWNER_ROLE`: `admin` or `employee` (default: employee)
    /// - `COMPANY_EVENT_CHANNEL_CAPACITY`: Event channel capacity (default: 1024)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        let invite_not_users = match lookup("COMPANY_INVITE_NOT_USERS") {
            Some(value) => parse_bool("COMPANY_INVITE_NOT_USERS", &value)?,
            None => default.invite_not_users,
        };

        let site_url = match lookup("COMPANY_SITE_URL") {
            Some(value) if value.trim().is_empty() => {
                return Err(ConfigError::InvalidValue {
                    key: "COMPANY_SITE_URL".to_string(),
                    message: "must not be empty".to_string(),
                })
            }
            Some(value) => normalize_site_url(value.trim()),
            None => default.site_url,
        };

        let departing_owner_role = match lookup("COMPANY_DEPARTING_OWNER_ROLE") {
            Some(value) => {
                DepartingOwnerRole::parse(&value).ok_or_else(|| ConfigError::InvalidValue {
                    key: "COMPANY_DEPARTING_OWNER_ROLE".to_string(),
                    message: format!("expected `admin` or `employee`, got `{}`", value),
                })?
            }
            None => default.departing_owner_role,
        };

        let event_channel_capacity = match lookup("COMPANY_EVENT_CHANNEL_CAPACITY") {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(capacity) if capacity > 0 => capacity,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "COMPANY_EVENT_CHANNEL_CAPACITY".to_string(),
                        message: format!("expected a positive integer, got `{}`", value),
                    })
                }
            },
            None => default.event_channel_capacity,
        };

        Ok(Self {
            invite_not_users,
            site_url,
            departing_owner_role,
            event_channel_capacity,
        })
    }

    /// Build the confirmation link for an invitation token.
    pub fn invite_confirmation_link(&self, token: &str) -> String {
        format!("{}invite/{}", normalize_site_url(&self.site_url), token)
    }
}

fn normalize_site_url(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got `{}`", value),
        }),
    }
}
