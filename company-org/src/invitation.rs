//! Invitations
//!
//! An invitation asks a user (or an email address) to join a company with a
//! role. It starts as `Created` and is resolved exactly once, to `Accepted`
//! or `Declined`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{CompanyError, CompanyResult};
use crate::user::{normalize_email, User};

/// Invitation status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    /// Pending a response
    #[default]
    Created,
    /// Accepted by the receiver
    Accepted,
    /// Declined by the receiver
    Declined,
}

impl InvitationStatus {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Created => "created",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Declined => "declined",
        }
    }

    /// Parse from string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "created" => Some(Self::Created),
            "accepted" => Some(Self::Accepted),
            "declined" => Some(Self::Declined),
            _ => None,
        }
    }

    /// Check whether the status is final.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, InvitationStatus::Created)
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An invitation to join a company.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use company_org::{Invitation, InvitationStatus, User};
///
/// let receiver = User::new("invited").with_email("invited@example.com");
/// let company_id = Uuid::now_v7();
/// let invitation = Invitation::new(company_id, "Invited@Example.com", Uuid::now_v7(), "digest");
///
/// assert_eq!(invitation.status, InvitationStatus::Created);
/// assert!(invitation.is_actionable());
/// assert!(invitation.is_addressed_to(&receiver));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    /// Unique invitation ID
    pub id: Uuid,

    /// Company the receiver is invited to
    pub company_id: Uuid,

    /// Receiver email, stored lowercase
    pub email: String,

    /// Receiver user, once known
    pub user_id: Option<Uuid>,

    /// Role granted on acceptance
    pub role_id: Uuid,

    /// Current status
    pub status: InvitationStatus,

    /// Digest of the confirmation token
    #[serde(skip_serializing, default)]
    pub token_hash: String,

    /// User who sent the invitation
    pub invited_by: Option<Uuid>,

    /// When the invitation was created
    pub created_at: DateTime<Utc>,

    /// When the invitation was last updated
    pub updated_at: DateTime<Utc>,
}

impl Invitation {
    /// Creates a pending invitation for an email address.
    pub fn new(
        company_id: Uuid,
        email: impl AsRef<str>,
        role_id: Uuid,
        token_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            company_id,
            email: normalize_email(email.as_ref()),
            user_id: None,
            role_id,
            status: InvitationStatus::Created,
            token_hash: token_hash.into(),
            invited_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Link the invitation to a registered user.
    pub fn for_user(mut self, user_id: Option<Uuid>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Record the sender.
    pub fn sent_by(mut self, inviter_id: Uuid) -> Self {
        self.invited_by = Some(inviter_id);
        self
    }

    /// Pending invitations can be accepted or declined.
    pub fn is_actionable(&self) -> bool {
        self.status == InvitationStatus::Created
    }

    /// The receiver is the linked user, or any user with the invited email.
    pub fn is_addressed_to(&self, user: &User) -> bool {
        match self.user_id {
            Some(user_id) if user_id == user.id => true,
            _ => user.has_email(&self.email),
        }
    }

    /// Resolve the invitation.
    pub fn resolve(&mut self, status: InvitationStatus, user_id: Uuid) -> CompanyResult<()> {
        if !self.is_actionable() || !status.is_terminal() {
            return Err(CompanyError::InvalidTransition {
                from: self.status.to_string(),
                to: status.to_string(),
            });
        }
        self.status = status;
        self.user_id = Some(user_id);
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Request to invite a user or an email to a company.
///
/// At least one of `user` and `email` must be set; `user` wins when both are.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InviteRequest {
    /// Registered user to invite
    #[serde(default)]
    pub user: Option<Uuid>,

    /// Email to invite
    #[serde(default)]
    pub email: Option<String>,

    /// Role to grant
    pub role: Uuid,
}

impl InviteRequest {
    /// Invite a registered user.
    pub fn user(user_id: Uuid, role_id: Uuid) -> Self {
        Self {
            user: Some(user_id),
            email: None,
            role: role_id,
        }
    }

    /// Invite by email.
    pub fn email(email: impl Into<String>, role_id: Uuid) -> Self {
        Self {
            user: None,
            email: Some(email.into()),
            role: role_id,
        }
    }
}

/// Request to register a new user and invite them in one step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAndInviteRequest {
    /// Email of the new user
    pub email: String,

    /// Username of the new user
    pub username: String,

    /// Role to grant
    pub role: Uuid,
}

/// Filters for listing a company's invitations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvitationQuery {
    /// Status name; an unknown name matches nothing
    #[serde(default)]
    pub status: Option<String>,

    /// Role ID; must exist
    #[serde(default)]
    pub role: Option<Uuid>,
}

/// A newly created invitation together with its confirmation link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedInvitation {
    /// The stored invitation
    pub invitation: Invitation,

    /// Link containing the raw token
    pub confirmation_link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invitation() -> Invitation {
        Invitation::new(Uuid::now_v7(), "invited@example.com", Uuid::now_v7(), "h")
    }

    #[test]
    fn test_addressed_by_email_or_user() {
        let receiver = User::new("invited").with_email("INVITED@example.com");
        let other = User::new("other").with_email("other@example.com");

        let by_email = invitation();
        assert!(by_email.is_addressed_to(&receiver));
        assert!(!by_email.is_addressed_to(&other));

        let by_user = invitation().for_user(Some(other.id));
        assert!(by_user.is_addressed_to(&other));
        assert!(by_user.is_addressed_to(&receiver));
    }

    #[test]
    fn test_resolve_once() {
        let mut inv = invitation();
        let user_id = Uuid::now_v7();

        inv.resolve(InvitationStatus::Accepted, user_id).unwrap();
        assert_eq!(inv.status, InvitationStatus::Accepted);
        assert_eq!(inv.user_id, Some(user_id));

        assert!(inv.resolve(InvitationStatus::Declined, user_id).is_err());
        assert_eq!(inv.status, InvitationStatus::Accepted);
    }

    #[test]
    fn test_cannot_resolve_back_to_created() {
        let mut inv = invitation();
        assert!(inv.resolve(InvitationStatus::Created, Uuid::now_v7()).is_err());
        assert!(inv.is_actionable());
    }

    #[test]
    fn test_token_hash_is_not_serialized() {
        let body = serde_json::to_value(invitation()).unwrap();
        assert!(body.get("token_hash").is_none());
        assert_eq!(body["status"], "created");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(InvitationStatus::parse("ACCEPTED"), Some(InvitationStatus::Accepted));
        assert_eq!(InvitationStatus::parse("expired"), None);
    }
}
