//! # Permissions
//!
//! Core permission types and sets for the RBAC system.
//! A permission combines a resource type with an action.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::actions::Action;
use crate::resources::ResourceType;

/// A permission is a combination of resource type and action.
///
/// # Example
///
/// ```
/// use company_rbac::permissions::Permission;
/// use company_rbac::resources::ResourceType;
/// use company_rbac::actions::Action;
///
/// let perm = Permission::new(ResourceType::Member, Action::Block);
/// assert_eq!(perm.to_string(), "member:block");
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Permission {
    /// The resource type this permission applies to.
    pub resource: ResourceType,
    /// The action allowed on the resource.
    pub action: Action,
}

impl Permission {
    /// Create a new permission.
    pub const fn new(resource: ResourceType, action: Action) -> Self {
        Self { resource, action }
    }

    /// Parse from string (e.g., "company:update").
    ///
    /// # Returns
    ///
    /// `Some(Permission)` if valid, `None` otherwise
    ///
    /// # Example
    ///
    /// ```
    /// use company_rbac::permissions::Permission;
    /// use company_rbac::resources::ResourceType;
    /// use company_rbac::actions::Action;
    ///
    /// let perm = Permission::parse("invite:create").unwrap();
    /// assert_eq!(perm.resource, ResourceType::Invite);
    /// assert_eq!(perm.action, Action::Create);
    /// assert!(Permission::parse("invite").is_none());
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let (resource, action) = s.split_once(':')?;
        Some(Self {
            resource: ResourceType::parse(resource)?,
            action: Action::parse(action)?,
        })
    }

    /// Check if this permission grants another (considering implied actions).
    ///
    /// # Example
    ///
    /// ```
    /// use company_rbac::permissions::Permission;
    /// use company_rbac::resources::ResourceType;
    /// use company_rbac::actions::Action;
    ///
    /// let manage = Permission::new(ResourceType::Role, Action::Manage);
    /// assert!(manage.grants(&Permission::new(ResourceType::Role, Action::Create)));
    /// ```
    pub fn grants(&self, other: &Permission) -> bool {
        self.resource == other.resource
            && (self.action == other.action || self.action.implies(other.action))
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource.as_str(), self.action.as_str())
    }
}

/// A set of permissions that can be assigned to roles or users.
///
/// # Example
///
/// ```
/// use company_rbac::permissions::{Permission, PermissionSet};
/// use company_rbac::resources::ResourceType;
/// use company_rbac::actions::Action;
///
/// let mut set = PermissionSet::new();
/// set.add(Permission::new(ResourceType::Company, Action::Read));
/// set.add(Permission::new(ResourceType::Member, Action::List));
///
/// assert!(set.has(&Permission::new(ResourceType::Company, Action::Read)));
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    permissions: HashSet<Permission>,
}

impl PermissionSet {
    /// Create a new empty permission set.
    pub fn new() -> Self {
        Self {
            permissions: HashSet::new(),
        }
    }

    /// Add a permission to the set.
    pub fn add(&mut self, permission: Permission) {
        self.permissions.insert(permission);
    }

    /// Add multiple permissions to the set.
    pub fn add_all<I>(&mut self, permissions: I)
    where
        I: IntoIterator<Item = Permission>,
    {
        self.permissions.extend(permissions);
    }

    /// Check if the set grants a permission.
    ///
    /// This checks for an exact match first, then for a permission on the
    /// same resource whose action implies the requested one.
    pub fn has(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
            || self.permissions.iter().any(|p| p.grants(permission))
    }

    /// Get all permissions in the set, sorted by their string form.
    pub fn all(&self) -> Vec<Permission> {
        let mut all: Vec<Permission> = self.permissions.iter().copied().collect();
        all.sort_by_key(|p| p.to_string());
        all
    }

    /// Merge another permission set into this one.
    pub fn merge(&mut self, other: &PermissionSet) {
        self.permissions.extend(other.permissions.iter().copied());
    }

    /// Create from a list of permission strings, skipping invalid entries.
    ///
    /// # Example
    ///
    /// ```
    /// use company_rbac::permissions::PermissionSet;
    ///
    /// let set = PermissionSet::from_strings(&["company:read", "member:list", "bogus"]);
    /// assert_eq!(set.len(), 2);
    /// ```
    pub fn from_strings(perms: &[&str]) -> Self {
        perms.iter().filter_map(|p| Permission::parse(p)).collect()
    }

    /// Get the count of permissions.
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        Self {
            permissions: iter.into_iter().collect(),
        }
    }
}
