//! Company lifecycle and ownership transfer

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use company_events::CompanyEvent;
use company_rbac::{Action, ResourceType, RoleType};

use super::ServiceContext;
use crate::access::Access;
use crate::company::{Company, CompanyStatus, CompanySummary, CompanyUpdate, NewCompany};
use crate::error::{CompanyError, CompanyResult};
use crate::membership::{ActionStatus, Departure, MemberDetails, Membership};
use crate::store::{CompanyScope, CompanyStore};
use crate::user::User;

/// Request to hand a company over to another member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeOwnerRequest {
    /// User ID of the member who becomes owner
    pub new_owner: Uuid,

    /// Keep the previous owner as a member with the departing-owner role
    #[serde(default)]
    pub stay_in_company: bool,
}

/// Company operations.
#[derive(Debug, Clone)]
pub struct CompanyService {
    ctx: ServiceContext,
}

impl CompanyService {
    /// Creates the service.
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a company; the caller becomes its owner.
    pub async fn create_company(&self, actor: &User, input: NewCompany) -> CompanyResult<Company> {
        Access::resolve(actor, None).require(ResourceType::Company, Action::Create)?;

        let company = input.into_company()?;
        let owner_role = self.ctx.store.get_or_create_role(RoleType::Owner).await?;
        let owner = Membership::new(company.id, actor.id, owner_role.id);
        let company = self.ctx.store.insert_company(company, owner).await?;

        tracing::info!(company_id = %company.id, owner_id = %actor.id, "Company created");
        self.ctx
            .publish(
                CompanyEvent::Created {
                    company_id: company.id,
                    title: company.title.clone(),
                    owner_id: actor.id,
                }
                .to_event()
                .with_actor(actor.id),
            )
            .await;

        Ok(company)
    }

    /// List the active collection. Staff only.
    pub async fn list_companies(&self, actor: &User) -> CompanyResult<Vec<Company>> {
        Access::resolve(actor, None).require(ResourceType::Company, Action::List)?;
        self.ctx.store.list_companies(CompanyScope::Active).await
    }

    /// List the full collection, including banned and soft-deleted companies. Staff only.
    pub async fn list_all_companies(&self, actor: &User) -> CompanyResult<Vec<Company>> {
        Access::resolve(actor, None).require(ResourceType::Company, Action::List)?;
        self.ctx.store.list_companies(CompanyScope::All).await
    }

    /// Companies the caller belongs to, with their role in each.
    pub async fn companies_for_user(&self, actor: &User) -> CompanyResult<Vec<CompanySummary>> {
        if !actor.is_active {
            return Err(CompanyError::PermissionDenied(
                "User account is inactive".to_string(),
            ));
        }

        let mut summaries = Vec::new();
        for membership in self.ctx.store.list_user_memberships(actor.id).await? {
            let company = match self.ctx.live_company(membership.company_id).await {
                Ok(company) => company,
                Err(CompanyError::NotFound(_)) => continue,
                Err(e) => return Err(e),
            };
            let Some(role) = self.ctx.store.get_role(membership.role_id).await? else {
                continue;
            };
            summaries.push(CompanySummary {
                id: company.id,
                title: company.title,
                status: company.status,
                user_role: role.role_type,
                is_blocked: membership.is_blocked,
                member_count: self.ctx.store.count_members(company.id).await?,
            });
        }
        Ok(summaries)
    }

    /// Retrieve a company. Members and staff.
    pub async fn retrieve_company(&self, actor: &User, company_id: Uuid) -> CompanyResult<Company> {
        let company = self.ctx.live_company(company_id).await?;
        self.ctx
            .access(actor, company_id)
            .await?
            .require(ResourceType::Company, Action::Read)?;
        tracing::debug!(company_id = %company_id, user_id = %actor.id, "Company retrieved");
        Ok(company)
    }

    /// Partially update a company. Owner or admin.
    pub async fn update_company(
        &self,
        actor: &User,
        company_id: Uuid,
        update: CompanyUpdate,
    ) -> CompanyResult<Company> {
        self.ctx.live_company(company_id).await?;
        self.ctx
            .access(actor, company_id)
            .await?
            .require(ResourceType::Company, Action::Update)?;

        let (company, changes) = self.ctx.store.update_company(company_id, update).await?;
        if changes.is_empty() {
            return Ok(company);
        }

        tracing::info!(company_id = %company_id, changes = ?changes, "Company updated");
        self.ctx
            .publish(
                CompanyEvent::Updated {
                    company_id,
                    changes,
                }
                .to_event()
                .with_actor(actor.id),
            )
            .await;

        Ok(company)
    }

    /// Soft-delete a company. Owner only.
    pub async fn delete_company(&self, actor: &User, company_id: Uuid) -> CompanyResult<()> {
        self.ctx.live_company(company_id).await?;
        self.ctx
            .access(actor, company_id)
            .await?
            .require(ResourceType::Company, Action::Delete)?;

        self.change_status(actor, company_id, CompanyStatus::Deleted).await?;
        Ok(())
    }

    /// Ban a company. Staff only.
    pub async fn ban_company(&self, actor: &User, company_id: Uuid) -> CompanyResult<Company> {
        self.ctx.live_company(company_id).await?;
        self.ctx
            .access(actor, company_id)
            .await?
            .require(ResourceType::Company, Action::Ban)?;

        self.change_status(actor, company_id, CompanyStatus::Banned).await
    }

    /// Lift a ban. Staff only.
    pub async fn activate_company(&self, actor: &User, company_id: Uuid) -> CompanyResult<Company> {
        self.ctx.live_company(company_id).await?;
        self.ctx
            .access(actor, company_id)
            .await?
            .require(ResourceType::Company, Action::Activate)?;

        self.change_status(actor, company_id, CompanyStatus::Active).await
    }

    /// Permanently remove a company, whatever its status. Staff only.
    pub async fn purge_company(&self, actor: &User, company_id: Uuid) -> CompanyResult<()> {
        Access::resolve(actor, None).require(ResourceType::Company, Action::Purge)?;

        if !self.ctx.store.purge_company(company_id).await? {
            return Err(CompanyError::NotFound("Company not found".to_string()));
        }

        tracing::info!(company_id = %company_id, user_id = %actor.id, "Company purged");
        self.ctx
            .publish(
                CompanyEvent::Purged { company_id }
                    .to_event()
                    .with_actor(actor.id),
            )
            .await;
        Ok(())
    }

    /// The company's owner. Members and staff.
    pub async fn owner(&self, actor: &User, company_id: Uuid) -> CompanyResult<MemberDetails> {
        self.ctx.live_company(company_id).await?;
        self.ctx
            .access(actor, company_id)
            .await?
            .require(ResourceType::Company, Action::Read)?;

        let owner = self.ctx.store.owner_of(company_id).await?.ok_or_else(|| {
            CompanyError::Storage(format!("Company {} has no owner", company_id))
        })?;
        self.ctx.members().describe(owner).await
    }

    /// Transfer ownership to another member. Owner only.
    pub async fn change_owner(
        &self,
        actor: &User,
        company_id: Uuid,
        request: ChangeOwnerRequest,
    ) -> CompanyResult<ActionStatus> {
        let company = self.ctx.live_company(company_id).await?;
        let access = self.ctx.access(actor, company_id).await?;
        access.require(ResourceType::Company, Action::ChangeOwner)?;
        company.ensure_writable()?;

        let previous = access.membership().cloned().ok_or_else(|| {
            CompanyError::PermissionDenied("Only the company owner can do this".to_string())
        })?;

        let target = self
            .ctx
            .store
            .find_membership(company_id, request.new_owner)
            .await?
            .ok_or_else(|| {
                CompanyError::Conflict("User is not a member of this company".to_string())
            })?;
        if target.id == previous.id {
            return Err(CompanyError::Conflict(
                "User is already the company owner".to_string(),
            ));
        }
        if target.is_blocked {
            return Err(CompanyError::Conflict(
                "Cannot transfer ownership to a blocked member".to_string(),
            ));
        }

        let departure = if request.stay_in_company {
            let role_type = self.ctx.settings.departing_owner_role.role_type();
            let role = self.ctx.store.get_or_create_role(role_type).await?;
            Departure::Stay { role_id: role.id }
        } else {
            Departure::Leave
        };

        self.ctx
            .store
            .transfer_ownership(company_id, previous.id, target.id, departure)
            .await?;

        tracing::info!(
            company_id = %company_id,
            previous_owner_id = %previous.user_id,
            new_owner_id = %target.user_id,
            stayed = request.stay_in_company,
            "Company owner changed"
        );
        self.ctx
            .publish(
                CompanyEvent::OwnerChanged {
                    company_id,
                    previous_owner_id: previous.user_id,
                    new_owner_id: target.user_id,
                    previous_owner_stayed: request.stay_in_company,
                }
                .to_event()
                .with_actor(actor.id),
            )
            .await;

        Ok(ActionStatus::with_message("Owner changed successfully"))
    }

    async fn change_status(
        &self,
        actor: &User,
        company_id: Uuid,
        to: CompanyStatus,
    ) -> CompanyResult<Company> {
        let change = self.ctx.store.transition_company(company_id, to).await?;
        let (from, company) = (change.from, change.company);

        tracing::info!(
            company_id = %company.id,
            from = %from,
            to = %company.status,
            user_id = %actor.id,
            "Company status changed"
        );
        self.ctx
            .publish(
                CompanyEvent::StatusChanged {
                    company_id: company.id,
                    from: from.to_string(),
                    to: company.status.to_string(),
                }
                .to_event()
                .with_actor(actor.id),
            )
            .await;

        Ok(company)
    }
}
