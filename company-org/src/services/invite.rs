//! Invitation issuing and resolution

use uuid::Uuid;

use company_events::InvitationEvent;
use company_rbac::{Action, ResourceType};

use super::ServiceContext;
use crate::error::{CompanyError, CompanyResult};
use crate::invitation::{
    CreateAndInviteRequest, Invitation, InvitationQuery, InvitationStatus, InviteRequest,
    IssuedInvitation,
};
use crate::roles::Role;
use crate::store::{CompanyStore, UserStore};
use crate::token::{hash_token, InvitationToken};
use crate::user::{validate_email, validate_username, User};

/// Invitation operations.
#[derive(Debug, Clone)]
pub struct InviteService {
    ctx: ServiceContext,
}

impl InviteService {
    /// Creates the service.
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Invite a registered user, or an email address, to a company. Owner or admin.
    pub async fn invite(
        &self,
        actor: &User,
        company_id: Uuid,
        request: InviteRequest,
    ) -> CompanyResult<IssuedInvitation> {
        self.authorize_invite(actor, company_id).await?;
        let role = self.invitable_role(request.role).await?;

        let (email, receiver) = match (request.user, request.email) {
            (Some(user_id), _) => {
                let user = self
                    .ctx
                    .store
                    .get_user(user_id)
                    .await?
                    .ok_or_else(|| CompanyError::validation("user", "User does not exist"))?;
                let email = user
                    .email
                    .clone()
                    .ok_or_else(|| CompanyError::validation("user", "User has no email address"))?;
                (email, Some(user))
            }
            (None, Some(email)) => {
                let email = validate_email("email", &email)?;
                let user = self.ctx.store.find_user_by_email(&email).await?;
                if user.is_none() && !self.ctx.settings.invite_not_users {
                    return Err(CompanyError::validation(
                        "email",
                        "User with this email is not registered",
                    ));
                }
                (email, user)
            }
            (None, None) => {
                return Err(CompanyError::validation(
                    "email",
                    "Either a user or an email is required",
                ))
            }
        };

        self.issue(actor, company_id, &role, email, receiver.as_ref())
            .await
    }

    /// Register a new user and invite them. Owner or admin.
    pub async fn create_and_invite(
        &self,
        actor: &User,
        company_id: Uuid,
        request: CreateAndInviteRequest,
    ) -> CompanyResult<IssuedInvitation> {
        self.authorize_invite(actor, company_id).await?;
        let role = self.invitable_role(request.role).await?;

        let email = validate_email("email", &request.email)?;
        let username = validate_username("username", &request.username)?;
        let user = User::new(username).with_email(&email);
        let (invitation, token) = draft(actor, company_id, &role, &email, Some(user.id));

        let (user, invitation) = self.ctx.store.register_and_invite(user, invitation).await?;
        tracing::info!(
            user_id = %user.id,
            company_id = %company_id,
            "Registered user for invitation"
        );

        Ok(self.announce(actor, invitation, &token).await)
    }

    /// List a company's invitations. Owner or admin.
    ///
    /// An unknown status name yields an empty list; an unknown role is a
    /// validation error.
    pub async fn list_invites(
        &self,
        actor: &User,
        company_id: Uuid,
        query: InvitationQuery,
    ) -> CompanyResult<Vec<Invitation>> {
        self.ctx.live_company(company_id).await?;
        self.ctx
            .access(actor, company_id)
            .await?
            .require(ResourceType::Invite, Action::List)?;

        if let Some(role_id) = query.role {
            if self.ctx.store.get_role(role_id).await?.is_none() {
                return Err(CompanyError::validation("role", "Role does not exist"));
            }
        }
        let status = match query.status.as_deref() {
            Some(name) => match InvitationStatus::parse(name) {
                Some(status) => Some(status),
                None => return Ok(Vec::new()),
            },
            None => None,
        };

        let invitations = self.ctx.store.list_invitations(company_id).await?;
        Ok(invitations
            .into_iter()
            .filter(|inv| status.map_or(true, |s| inv.status == s))
            .filter(|inv| query.role.map_or(true, |r| inv.role_id == r))
            .collect())
    }

    /// Retrieve an invitation. Receiver only.
    pub async fn retrieve(&self, actor: &User, invitation_id: Uuid) -> CompanyResult<Invitation> {
        let invitation = self.load(invitation_id).await?;
        ensure_receiver(actor, &invitation)?;
        Ok(invitation)
    }

    /// Resolve a confirmation-link token to its invitation. Receiver only.
    pub async fn find_by_token(&self, actor: &User, token: &str) -> CompanyResult<Invitation> {
        let invitation = self
            .ctx
            .store
            .find_invitation_by_token(&hash_token(token))
            .await?
            .ok_or_else(|| CompanyError::NotFound("Invitation not found".to_string()))?;
        ensure_receiver(actor, &invitation)?;
        Ok(invitation)
    }

    /// Pending invitations addressed to the caller.
    pub async fn list_for_user(&self, actor: &User) -> CompanyResult<Vec<Invitation>> {
        if !actor.is_active {
            return Ok(Vec::new());
        }
        self.ctx.store.list_invitations_for_user(actor).await
    }

    /// Accept an invitation and join the company. Receiver only.
    pub async fn accept(&self, actor: &User, invitation_id: Uuid) -> CompanyResult<Invitation> {
        let invitation = self.load_actionable(invitation_id).await?;
        ensure_receiver(actor, &invitation)?;

        let resolution = self
            .ctx
            .store
            .resolve_invitation(invitation_id, InvitationStatus::Accepted, actor.id)
            .await?;
        let invitation = resolution.invitation;

        let membership_id = match resolution.membership {
            Some(membership) => {
                tracing::info!(
                    company_id = %invitation.company_id,
                    membership_id = %membership.id,
                    user_id = %actor.id,
                    "Member joined via invitation"
                );
                membership.id
            }
            None => self
                .ctx
                .store
                .find_membership(invitation.company_id, actor.id)
                .await?
                .map(|m| m.id)
                .ok_or_else(|| {
                    CompanyError::Storage("Accepted invitation left no membership".to_string())
                })?,
        };

        tracing::info!(invitation_id = %invitation.id, user_id = %actor.id, "Invitation accepted");
        self.ctx
            .publish(
                InvitationEvent::Accepted {
                    invitation_id: invitation.id,
                    user_id: actor.id,
                    membership_id,
                }
                .to_event(invitation.company_id)
                .with_actor(actor.id),
            )
            .await;

        Ok(invitation)
    }

    /// Decline an invitation. Receiver only.
    pub async fn decline(&self, actor: &User, invitation_id: Uuid) -> CompanyResult<Invitation> {
        let invitation = self.load_actionable(invitation_id).await?;
        ensure_receiver(actor, &invitation)?;

        let invitation = self
            .ctx
            .store
            .resolve_invitation(invitation_id, InvitationStatus::Declined, actor.id)
            .await?
            .invitation;

        tracing::info!(invitation_id = %invitation.id, user_id = %actor.id, "Invitation declined");
        self.ctx
            .publish(
                InvitationEvent::Declined {
                    invitation_id: invitation.id,
                    email: invitation.email.clone(),
                }
                .to_event(invitation.company_id)
                .with_actor(actor.id),
            )
            .await;

        Ok(invitation)
    }

    async fn authorize_invite(&self, actor: &User, company_id: Uuid) -> CompanyResult<()> {
        let company = self.ctx.live_company(company_id).await?;
        self.ctx
            .access(actor, company_id)
            .await?
            .require(ResourceType::Invite, Action::Create)?;
        company.ensure_writable()
    }

    async fn invitable_role(&self, role_id: Uuid) -> CompanyResult<Role> {
        let role = self
            .ctx
            .store
            .get_role(role_id)
            .await?
            .ok_or_else(|| CompanyError::validation("role", "Role does not exist"))?;
        if role.is_owner() {
            return Err(CompanyError::validation(
                "role",
                "Cannot invite with the owner role",
            ));
        }
        Ok(role)
    }

    async fn issue(
        &self,
        actor: &User,
        company_id: Uuid,
        role: &Role,
        email: String,
        receiver: Option<&User>,
    ) -> CompanyResult<IssuedInvitation> {
        if let Some(user) = receiver {
            if self
                .ctx
                .store
                .find_membership(company_id, user.id)
                .await?
                .is_some()
            {
                return Err(CompanyError::Conflict(
                    "User is already a member of this company".to_string(),
                ));
            }
        }

        let (invitation, token) = draft(actor, company_id, role, &email, receiver.map(|u| u.id));
        let invitation = self.ctx.store.insert_invitation(invitation).await?;
        Ok(self.announce(actor, invitation, &token).await)
    }

    async fn announce(
        &self,
        actor: &User,
        invitation: Invitation,
        token: &str,
    ) -> IssuedInvitation {
        let confirmation_link = self.ctx.settings.invite_confirmation_link(token);

        tracing::info!(
            company_id = %invitation.company_id,
            invitation_id = %invitation.id,
            role_id = %invitation.role_id,
            "Invitation created"
        );
        self.ctx
            .publish(
                InvitationEvent::Created {
                    invitation_id: invitation.id,
                    email: invitation.email.clone(),
                    user_id: invitation.user_id,
                    role_id: invitation.role_id,
                    confirmation_link: confirmation_link.clone(),
                }
                .to_event(invitation.company_id)
                .with_actor(actor.id),
            )
            .await;

        IssuedInvitation {
            invitation,
            confirmation_link,
        }
    }

    async fn load(&self, invitation_id: Uuid) -> CompanyResult<Invitation> {
        self.ctx
            .store
            .get_invitation(invitation_id)
            .await?
            .ok_or_else(|| CompanyError::NotFound("Invitation not found".to_string()))
    }

    async fn load_actionable(&self, invitation_id: Uuid) -> CompanyResult<Invitation> {
        let invitation = self.load(invitation_id).await?;
        if !invitation.is_actionable() {
            return Err(CompanyError::NotFound("Invitation not found".to_string()));
        }
        match self.ctx.live_company(invitation.company_id).await {
            Ok(_) => Ok(invitation),
            Err(CompanyError::NotFound(_)) => {
                Err(CompanyError::NotFound("Invitation not found".to_string()))
            }
            Err(e) => Err(e),
        }
    }
}

/// A pending invitation and the raw token for its confirmation link.
fn draft(
    actor: &User,
    company_id: Uuid,
    role: &Role,
    email: &str,
    receiver: Option<Uuid>,
) -> (Invitation, String) {
    let InvitationToken { token, hash } = InvitationToken::generate();
    let invitation = Invitation::new(company_id, email, role.id, hash)
        .for_user(receiver)
        .sent_by(actor.id);
    (invitation, token)
}

fn ensure_receiver(actor: &User, invitation: &Invitation) -> CompanyResult<()> {
    if actor.is_active && invitation.is_addressed_to(actor) {
        Ok(())
    } else {
        Err(CompanyError::PermissionDenied(
            "This invitation is addressed to another user".to_string(),
        ))
    }
}
