//! Member listing and management

use uuid::Uuid;

use company_events::MembershipEvent;
use company_rbac::{Action, ResourceType};

use super::ServiceContext;
use crate::access::Access;
use crate::error::{CompanyError, CompanyResult};
use crate::membership::{ActionStatus, MemberDetails, Membership};
use crate::roles::Role;
use crate::store::{CompanyStore, UserStore};
use crate::user::User;

/// Membership operations, all scoped to one company.
#[derive(Debug, Clone)]
pub struct MembershipService {
    ctx: ServiceContext,
}

impl MembershipService {
    /// Creates the service.
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// List a company's members. Unblocked members and staff.
    pub async fn list_members(
        &self,
        actor: &User,
        company_id: Uuid,
    ) -> CompanyResult<Vec<MemberDetails>> {
        self.ctx.live_company(company_id).await?;
        self.ctx
            .access(actor, company_id)
            .await?
            .require(ResourceType::Member, Action::List)?;

        let memberships = self.ctx.store.list_memberships(company_id).await?;
        let mut members = Vec::with_capacity(memberships.len());
        for membership in memberships {
            members.push(self.describe(membership).await?);
        }
        Ok(members)
    }

    /// Retrieve one member. Unblocked members and staff.
    pub async fn retrieve_member(
        &self,
        actor: &User,
        company_id: Uuid,
        membership_id: Uuid,
    ) -> CompanyResult<MemberDetails> {
        self.ctx.live_company(company_id).await?;
        self.ctx
            .access(actor, company_id)
            .await?
            .require(ResourceType::Member, Action::Read)?;

        let (membership, role) = self.load_target(company_id, membership_id).await?;
        self.details(membership, role).await
    }

    /// Block a member. Owner or admin; never the owner.
    pub async fn block(
        &self,
        actor: &User,
        company_id: Uuid,
        membership_id: Uuid,
    ) -> CompanyResult<ActionStatus> {
        let (access, mut membership, role) = self
            .authorize(actor, company_id, membership_id, Action::Block)
            .await?;
        if role.is_owner() {
            return Err(CompanyError::Conflict(
                "Cannot block the company owner".to_string(),
            ));
        }
        ensure_manages(&access, &role)?;

        membership.block();
        let membership = self.ctx.store.update_membership(membership).await?;

        tracing::info!(company_id = %company_id, membership_id = %membership.id, "Member blocked");
        self.publish(
            actor,
            company_id,
            MembershipEvent::Blocked {
                membership_id: membership.id,
                user_id: membership.user_id,
            },
        )
        .await;
        Ok(ActionStatus::success())
    }

    /// Unblock a member. Owner or admin.
    pub async fn unblock(
        &self,
        actor: &User,
        company_id: Uuid,
        membership_id: Uuid,
    ) -> CompanyResult<ActionStatus> {
        let (access, mut membership, role) = self
            .authorize(actor, company_id, membership_id, Action::Unblock)
            .await?;
        ensure_manages(&access, &role)?;

        membership.unblock();
        let membership = self.ctx.store.update_membership(membership).await?;

        tracing::info!(
            company_id = %company_id,
            membership_id = %membership.id,
            "Member unblocked"
        );
        self.publish(
            actor,
            company_id,
            MembershipEvent::Unblocked {
                membership_id: membership.id,
                user_id: membership.user_id,
            },
        )
        .await;
        Ok(ActionStatus::success())
    }

    /// Give a member another role. Owner or admin.
    ///
    /// The owner role is never assigned here; ownership moves only through
    /// a transfer.
    pub async fn change_role(
        &self,
        actor: &User,
        company_id: Uuid,
        membership_id: Uuid,
        role_id: Uuid,
    ) -> CompanyResult<ActionStatus> {
        let (access, mut membership, current_role) = self
            .authorize(actor, company_id, membership_id, Action::ChangeRole)
            .await?;

        let new_role = self
            .ctx
            .store
            .get_role(role_id)
            .await?
            .ok_or_else(|| CompanyError::validation("role", "Role does not exist"))?;
        if new_role.is_owner() {
            return Err(CompanyError::Conflict(
                "Cannot assign the owner role; transfer ownership instead".to_string(),
            ));
        }
        if current_role.is_owner() {
            return Err(CompanyError::Conflict(
                "Cannot change the role of the company owner".to_string(),
            ));
        }
        ensure_manages(&access, &current_role)?;

        let old_role_id = membership.role_id;
        membership.role_id = new_role.id;
        let membership = self.ctx.store.update_membership(membership).await?;

        tracing::info!(
            company_id = %company_id,
            membership_id = %membership.id,
            role_id = %new_role.id,
            "Member role changed"
        );
        self.publish(
            actor,
            company_id,
            MembershipEvent::RoleChanged {
                membership_id: membership.id,
                user_id: membership.user_id,
                old_role_id,
                new_role_id: new_role.id,
            },
        )
        .await;
        Ok(ActionStatus::success())
    }

    /// Remove a member from the company. Owner or admin; never the owner.
    pub async fn remove_member(
        &self,
        actor: &User,
        company_id: Uuid,
        membership_id: Uuid,
    ) -> CompanyResult<ActionStatus> {
        let (access, membership, role) = self
            .authorize(actor, company_id, membership_id, Action::Delete)
            .await?;
        if role.is_owner() {
            return Err(CompanyError::Conflict(
                "Cannot remove the company owner".to_string(),
            ));
        }
        ensure_manages(&access, &role)?;

        if !self.ctx.store.delete_membership(membership.id).await? {
            return Err(CompanyError::NotFound("Membership not found".to_string()));
        }

        tracing::info!(company_id = %company_id, membership_id = %membership.id, "Member removed");
        self.publish(
            actor,
            company_id,
            MembershipEvent::Removed {
                membership_id: membership.id,
                user_id: membership.user_id,
            },
        )
        .await;
        Ok(ActionStatus::success())
    }

    /// Common checks for mutating operations: company is live and writable,
    /// the caller holds `member:{action}`, the membership belongs to the company.
    async fn authorize(
        &self,
        actor: &User,
        company_id: Uuid,
        membership_id: Uuid,
        action: Action,
    ) -> CompanyResult<(Access, Membership, Role)> {
        let company = self.ctx.live_company(company_id).await?;
        let access = self.ctx.access(actor, company_id).await?;
        access.require(ResourceType::Member, action)?;
        company.ensure_writable()?;

        let (membership, role) = self.load_target(company_id, membership_id).await?;
        Ok((access, membership, role))
    }

    async fn load_target(
        &self,
        company_id: Uuid,
        membership_id: Uuid,
    ) -> CompanyResult<(Membership, Role)> {
        let membership = self
            .ctx
            .store
            .get_membership(membership_id)
            .await?
            .filter(|m| m.company_id == company_id)
            .ok_or_else(|| CompanyError::NotFound("Membership not found".to_string()))?;
        let role = self.role_of(&membership).await?;
        Ok((membership, role))
    }

    async fn role_of(&self, membership: &Membership) -> CompanyResult<Role> {
        self.ctx
            .store
            .get_role(membership.role_id)
            .await?
            .ok_or_else(|| {
                CompanyError::Storage(format!(
                    "Membership {} references a missing role",
                    membership.id
                ))
            })
    }

    /// Member details with the role looked up.
    pub(super) async fn describe(&self, membership: Membership) -> CompanyResult<MemberDetails> {
        let role = self.role_of(&membership).await?;
        self.details(membership, role).await
    }

    async fn details(&self, membership: Membership, role: Role) -> CompanyResult<MemberDetails> {
        let user = self
            .ctx
            .store
            .get_user(membership.user_id)
            .await?
            .ok_or_else(|| {
                CompanyError::Storage(format!(
                    "Membership {} references a missing user",
                    membership.id
                ))
            })?;
        Ok(MemberDetails {
            id: membership.id,
            user: user.summary(),
            role,
            is_blocked: membership.is_blocked,
            joined_at: membership.joined_at,
        })
    }

    async fn publish(&self, actor: &User, company_id: Uuid, event: MembershipEvent) {
        self.ctx
            .publish(event.to_event(company_id).with_actor(actor.id))
            .await;
    }
}

/// Memberships whose role manages members are managed only by the owner.
fn ensure_manages(access: &Access, target_role: &Role) -> CompanyResult<()> {
    let outranked = target_role.role_type.can_manage_members()
        && !access
            .role_type()
            .is_some_and(|role_type| role_type.can_transfer_ownership());
    if outranked {
        return Err(CompanyError::PermissionDenied(
            "Only the company owner can manage admins".to_string(),
        ));
    }
    Ok(())
}
