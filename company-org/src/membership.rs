//! Membership domain models
//!
//! A membership links a user to a company with a role. Each (user, company)
//! pair has at most one membership, and at most one membership per company
//! holds the owner role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::roles::Role;
use crate::user::UserSummary;

/// Company membership linking a user to a company.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use company_org::Membership;
///
/// let company_id = Uuid::now_v7();
/// let user_id = Uuid::now_v7();
/// let role_id = Uuid::now_v7();
/// let membership = Membership::new(company_id, user_id, role_id);
/// assert!(!membership.is_blocked);
/// assert!(membership.invited_by.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    /// Unique membership ID
    pub id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Company ID
    pub company_id: Uuid,

    /// Role within the company
    pub role_id: Uuid,

    /// Blocked members keep their row but lose all company permissions
    pub is_blocked: bool,

    /// When the user joined
    pub joined_at: DateTime<Utc>,

    /// Who invited this user (if applicable)
    pub invited_by: Option<Uuid>,
}

impl Membership {
    /// Creates an unblocked membership.
    pub fn new(company_id: Uuid, user_id: Uuid, role_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            company_id,
            role_id,
            is_blocked: false,
            joined_at: Utc::now(),
            invited_by: None,
        }
    }

    /// Record who invited the member.
    pub fn with_inviter(mut self, inviter_id: Option<Uuid>) -> Self {
        self.invited_by = inviter_id;
        self
    }

    /// Block the member.
    pub fn block(&mut self) {
        self.is_blocked = true;
    }

    /// Unblock the member.
    pub fn unblock(&mut self) {
        self.is_blocked = false;
    }
}

/// What happens to the previous owner's membership during a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Departure {
    /// Stay in the company with the given role
    Stay {
        /// Role the previous owner receives
        role_id: Uuid,
    },
    /// Leave the company
    Leave,
}

/// Membership with its user and role resolved, for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDetails {
    /// Membership ID
    pub id: Uuid,

    /// The member
    pub user: UserSummary,

    /// Their role
    pub role: Role,

    /// Whether the membership is blocked
    pub is_blocked: bool,

    /// When the user joined
    pub joined_at: DateTime<Utc>,
}

/// Outcome of a state-changing membership action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStatus {
    /// Always `"success"` when returned
    pub status: String,

    /// Optional human-readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionStatus {
    /// Plain success.
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
            message: None,
        }
    }

    /// Success with a message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_unblock() {
        let mut membership = Membership::new(Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7());
        membership.block();
        assert!(membership.is_blocked);
        membership.unblock();
        assert!(!membership.is_blocked);
    }

    #[test]
    fn test_with_inviter() {
        let inviter = Uuid::now_v7();
        let membership = Membership::new(Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7())
            .with_inviter(Some(inviter));
        assert_eq!(membership.invited_by, Some(inviter));
    }

    #[test]
    fn test_action_status_serialization() {
        let body = serde_json::to_value(ActionStatus::success()).unwrap();
        assert_eq!(body, serde_json::json!({ "status": "success" }));

        let status = ActionStatus::with_message("Owner changed successfully");
        let body = serde_json::to_value(status).unwrap();
        assert_eq!(body["message"], "Owner changed successfully");
    }
}
