//! Caller access resolution
//!
//! [`Access`] combines a user's platform-level permissions with those of
//! their role in one company and answers permission checks for services.

use company_rbac::{
    staff_permissions, user_permissions, Action, Permission, PermissionSet, ResourceType, RoleType,
};
use uuid::Uuid;

use crate::error::{CompanyError, CompanyResult};
use crate::membership::Membership;
use crate::roles::Role;
use crate::user::User;

/// Effective permissions of one caller within one company.
///
/// # Examples
///
/// ```
/// use company_org::{Access, User};
/// use company_rbac::{Action, Permission, ResourceType};
///
/// let staff = User::new("moderator").staff();
/// let access = Access::resolve(&staff, None);
/// assert!(access.can(&Permission::new(ResourceType::Company, Action::Ban)));
/// assert!(!access.can(&Permission::new(ResourceType::Company, Action::Update)));
/// ```
#[derive(Debug, Clone)]
pub struct Access {
    user_id: Uuid,
    membership: Option<Membership>,
    role_type: Option<RoleType>,
    permissions: PermissionSet,
}

impl Access {
    /// Resolve the effective permission set.
    ///
    /// Inactive users get nothing. Blocked memberships contribute nothing
    /// but are still reported by [`Access::membership`].
    pub fn resolve(user: &User, membership: Option<(Membership, Role)>) -> Self {
        let mut permissions = PermissionSet::new();
        let (membership, role_type) = match membership {
            Some((membership, role)) => (Some(membership), Some(role.role_type)),
            None => (None, None),
        };

        if user.is_active {
            permissions.merge(&user_permissions());
            if user.is_staff {
                permissions.merge(&staff_permissions());
            }
            if let (Some(m), Some(role_type)) = (&membership, role_type) {
                if !m.is_blocked {
                    permissions.merge(&role_type.permissions());
                }
            }
        }

        Self {
            user_id: user.id,
            membership,
            role_type,
            permissions,
        }
    }

    /// Caller's user ID.
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Caller's membership in the company, blocked or not.
    pub fn membership(&self) -> Option<&Membership> {
        self.membership.as_ref()
    }

    /// Caller's role type, if they hold an unblocked membership.
    pub fn role_type(&self) -> Option<RoleType> {
        match &self.membership {
            Some(m) if !m.is_blocked => self.role_type,
            _ => None,
        }
    }

    /// Check whether the caller is the company owner.
    pub fn is_owner(&self) -> bool {
        self.role_type() == Some(RoleType::Owner)
    }

    /// Effective permissions.
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// Check a permission.
    pub fn can(&self, permission: &Permission) -> bool {
        self.permissions.has(permission)
    }

    /// Fail with permission denial unless the caller holds `resource:action`.
    pub fn require(&self, resource: ResourceType, action: Action) -> CompanyResult<()> {
        let permission = Permission::new(resource, action);
        if self.can(&permission) {
            Ok(())
        } else {
            tracing::debug!(
                user_id = %self.user_id,
                permission = %permission,
                "Permission denied"
            );
            Err(CompanyError::PermissionDenied(
                "You do not have permission to perform this action".to_string(),
            ))
        }
    }
}
