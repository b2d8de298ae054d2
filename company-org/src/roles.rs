//! Company roles
//!
//! Roles are shared across companies. Each role carries a [`RoleType`]; the
//! `Owner` and `Admin` types are singletons, so at most one role of each
//! exists in a store.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use company_rbac::RoleType;

use crate::error::{CompanyError, CompanyResult};

/// A named role that memberships and invitations reference.
///
/// # Examples
///
/// ```
/// use company_org::{Role, RoleType};
///
/// let role = Role::new("Manager", RoleType::Employee);
/// assert!(!role.is_owner());
/// assert!(!role.role_type.is_singleton());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Unique role ID
    pub id: Uuid,

    /// Display title
    pub title: String,

    /// Type that determines permissions
    pub role_type: RoleType,
}

impl Role {
    /// Creates a role with a fresh ID.
    pub fn new(title: impl Into<String>, role_type: RoleType) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: title.into(),
            role_type,
        }
    }

    /// Canonical role of a type, as created on demand by get-or-create.
    pub fn canonical(role_type: RoleType) -> Self {
        Self::new(role_type.display_name(), role_type)
    }

    /// Check if this is the owner role.
    pub fn is_owner(&self) -> bool {
        self.role_type == RoleType::Owner
    }
}

/// Input for creating a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRole {
    /// Display title
    pub title: String,

    /// Role type
    #[serde(default)]
    pub role_type: RoleType,
}

impl NewRole {
    /// Creates role input.
    pub fn new(title: impl Into<String>, role_type: RoleType) -> Self {
        Self {
            title: title.into(),
            role_type,
        }
    }

    /// Validate and build the role.
    pub fn into_role(self) -> CompanyResult<Role> {
        let title = validate_role_title(&self.title)?;
        Ok(Role::new(title, self.role_type))
    }
}

/// Partial update of a role.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleUpdate {
    /// New title
    #[serde(default)]
    pub title: Option<String>,

    /// New type
    #[serde(default)]
    pub role_type: Option<RoleType>,
}

impl RoleUpdate {
    /// Validate and apply to a role.
    pub fn apply(self, role: &mut Role) -> CompanyResult<()> {
        if let Some(title) = self.title {
            role.title = validate_role_title(&title)?;
        }
        if let Some(role_type) = self.role_type {
            role.role_type = role_type;
        }
        Ok(())
    }
}

/// Conflict raised when a second role of a singleton type would exist.
pub(crate) fn singleton_conflict(role_type: RoleType) -> CompanyError {
    CompanyError::Conflict(format!(
        "Only one role of type {} may exist",
        role_type.display_name()
    ))
}

fn validate_role_title(title: &str) -> CompanyResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CompanyError::validation("title", "This field may not be blank"));
    }
    if title.chars().count() > 100 {
        return Err(CompanyError::validation(
            "title",
            "Ensure this field has no more than 100 characters",
        ));
    }
    Ok(title.to_string())
}
