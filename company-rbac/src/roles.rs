//! Company role types and their permission sets
//!
//! Every company role definition carries one of three type tags. The tag,
//! not the role's title, decides what a member may do.

use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::permissions::{Permission, PermissionSet};
use crate::resources::ResourceType;

/// Classification of a company role.
///
/// Role types are hierarchical: Employee < Admin < Owner. Owner and Admin
/// are singleton types: at most one role definition of each may exist.
///
/// # Permission Model
///
/// - **Employee**: View the company and its members
/// - **Admin**: Manage members and invitations, edit company details
/// - **Owner**: Everything an admin can do, plus deletion and ownership transfer
///
/// # Examples
///
/// ```
/// use company_rbac::RoleType;
///
/// assert!(RoleType::Admin.can_manage_members());
/// assert!(!RoleType::Admin.can_transfer_ownership());
/// assert!(RoleType::Owner.is_singleton());
/// assert!(!RoleType::Employee.is_singleton());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RoleType {
    /// Regular company member
    Employee = 1,

    /// Company administrator
    Admin = 2,

    /// Company owner (exactly one membership per company)
    Owner = 3,
}

impl RoleType {
    /// Check if at most one role definition of this type may exist.
    pub fn is_singleton(&self) -> bool {
        matches!(self, RoleType::Owner | RoleType::Admin)
    }

    /// Check if this role type can manage members and invitations.
    ///
    /// # Returns
    ///
    /// `true` for Admin and Owner
    pub fn can_manage_members(&self) -> bool {
        *self >= RoleType::Admin
    }

    /// Check if this role type can delete the company or transfer ownership.
    ///
    /// # Returns
    ///
    /// `true` only for Owner
    pub fn can_transfer_ownership(&self) -> bool {
        *self >= RoleType::Owner
    }

    /// Parse role type from string representation.
    ///
    /// # Examples
    ///
    /// ```
    /// use company_rbac::RoleType;
    ///
    /// assert_eq!(RoleType::parse("owner"), Some(RoleType::Owner));
    /// assert_eq!(RoleType::parse("ADMIN"), Some(RoleType::Admin));
    /// assert_eq!(RoleType::parse("guest"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "employee" => Some(Self::Employee),
            "admin" => Some(Self::Admin),
            "owner" => Some(Self::Owner),
            _ => None,
        }
    }

    /// Get string representation of the role type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }

    /// Get a human-readable display name for the role type.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Employee => "Employee",
            Self::Admin => "Admin",
            Self::Owner => "Owner",
        }
    }

    /// Default permission set for members holding a role of this type.
    ///
    /// Higher role types include every permission of the lower ones.
    pub fn permissions(&self) -> PermissionSet {
        let mut set: PermissionSet = [
            Permission::new(ResourceType::Company, Action::Read),
            Permission::new(ResourceType::Member, Action::List),
            Permission::new(ResourceType::Member, Action::Read),
        ]
        .into_iter()
        .collect();

        if *self >= RoleType::Admin {
            set.add_all([
                Permission::new(ResourceType::Company, Action::Update),
                Permission::new(ResourceType::Invite, Action::Create),
                Permission::new(ResourceType::Invite, Action::List),
                Permission::new(ResourceType::Member, Action::Block),
                Permission::new(ResourceType::Member, Action::Unblock),
                Permission::new(ResourceType::Member, Action::ChangeRole),
                Permission::new(ResourceType::Member, Action::Delete),
            ]);
        }

        if *self >= RoleType::Owner {
            set.add_all([
                Permission::new(ResourceType::Company, Action::Delete),
                Permission::new(ResourceType::Company, Action::ChangeOwner),
            ]);
        }

        set
    }
}

impl Default for RoleType {
    fn default() -> Self {
        Self::Employee
    }
}

/// Permissions granted to every active user, member or not.
pub fn user_permissions() -> PermissionSet {
    [Permission::new(ResourceType::Company, Action::Create)]
        .into_iter()
        .collect()
}

/// Permissions granted to platform staff in every company.
///
/// Staff can browse and moderate companies but do not gain member-management
/// rights inside them.
pub fn staff_permissions() -> PermissionSet {
    [
        Permission::new(ResourceType::Company, Action::List),
        Permission::new(ResourceType::Company, Action::Read),
        Permission::new(ResourceType::Company, Action::Ban),
        Permission::new(ResourceType::Company, Action::Activate),
        Permission::new(ResourceType::Company, Action::Purge),
        Permission::new(ResourceType::Member, Action::List),
        Permission::new(ResourceType::Member, Action::Read),
        Permission::new(ResourceType::Role, Action::Manage),
    ]
    .into_iter()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_type_hierarchy() {
        assert!(RoleType::Owner > RoleType::Admin);
        assert!(RoleType::Admin > RoleType::Employee);
        assert!(RoleType::Owner.can_manage_members());
        assert!(!RoleType::Employee.can_manage_members());
        assert!(RoleType::Owner.can_transfer_ownership());
        assert!(!RoleType::Admin.can_transfer_ownership());
    }

    #[test]
    fn test_role_type_parse() {
        assert_eq!(RoleType::parse("employee"), Some(RoleType::Employee));
        assert_eq!(RoleType::parse("Owner"), Some(RoleType::Owner));
        assert_eq!(RoleType::parse(""), None);
    }

    #[test]
    fn test_singleton_types() {
        assert!(RoleType::Owner.is_singleton());
        assert!(RoleType::Admin.is_singleton());
        assert!(!RoleType::Employee.is_singleton());
    }

    #[test]
    fn test_employee_permissions() {
        let perms = RoleType::Employee.permissions();
        assert!(perms.has(&Permission::new(ResourceType::Company, Action::Read)));
        assert!(perms.has(&Permission::new(ResourceType::Member, Action::List)));
        assert!(!perms.has(&Permission::new(ResourceType::Company, Action::Update)));
        assert!(!perms.has(&Permission::new(ResourceType::Invite, Action::Create)));
        assert!(!perms.has(&Permission::new(ResourceType::Member, Action::Block)));
    }

    #[test]
    fn test_admin_permissions() {
        let perms = RoleType::Admin.permissions();
        for perm in RoleType::Employee.permissions().all() {
            assert!(perms.has(&perm));
        }
        assert!(perms.has(&Permission::new(ResourceType::Invite, Action::Create)));
        assert!(perms.has(&Permission::new(ResourceType::Member, Action::ChangeRole)));
        assert!(!perms.has(&Permission::new(ResourceType::Company, Action::Delete)));
        assert!(!perms.has(&Permission::new(ResourceType::Company, Action::ChangeOwner)));
    }

    #[test]
    fn test_owner_permissions() {
        let perms = RoleType::Owner.permissions();
        for perm in RoleType::Admin.permissions().all() {
            assert!(perms.has(&perm));
        }
        assert!(perms.has(&Permission::new(ResourceType::Company, Action::Delete)));
        assert!(perms.has(&Permission::new(ResourceType::Company, Action::ChangeOwner)));
        assert!(!perms.has(&Permission::new(ResourceType::Company, Action::Purge)));
    }

    #[test]
    fn test_staff_permissions() {
        let perms = staff_permissions();
        assert!(perms.has(&Permission::new(ResourceType::Company, Action::List)));
        assert!(perms.has(&Permission::new(ResourceType::Role, Action::Create)));
        assert!(!perms.has(&Permission::new(ResourceType::Member, Action::Block)));
        assert!(!perms.has(&Permission::new(ResourceType::Company, Action::Update)));
    }

    #[test]
    fn test_user_permissions() {
        let perms = user_permissions();
        assert_eq!(perms.len(), 1);
        assert!(perms.has(&Permission::new(ResourceType::Company, Action::Create)));
    }
}
