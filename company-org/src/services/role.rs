//! Role administration

use uuid::Uuid;

use company_rbac::{Action, ResourceType, RoleType};

use super::ServiceContext;
use crate::access::Access;
use crate::error::{CompanyError, CompanyResult};
use crate::roles::{NewRole, Role, RoleUpdate};
use crate::store::CompanyStore;
use crate::user::User;

/// Role operations.
#[derive(Debug, Clone)]
pub struct RoleService {
    ctx: ServiceContext,
}

impl RoleService {
    /// Creates the service.
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a role. Staff only.
    pub async fn create_role(&self, actor: &User, input: NewRole) -> CompanyResult<Role> {
        Access::resolve(actor, None).require(ResourceType::Role, Action::Create)?;

        let role = self.ctx.store.insert_role(input.into_role()?).await?;
        tracing::info!(role_id = %role.id, role_type = role.role_type.as_str(), "Role created");
        Ok(role)
    }

    /// Update a role. Staff only.
    pub async fn update_role(
        &self,
        actor: &User,
        role_id: Uuid,
        update: RoleUpdate,
    ) -> CompanyResult<Role> {
        Access::resolve(actor, None).require(ResourceType::Role, Action::Update)?;

        let mut role = self
            .ctx
            .store
            .get_role(role_id)
            .await?
            .ok_or_else(|| CompanyError::NotFound("Role not found".to_string()))?;
        update.apply(&mut role)?;

        let role = self.ctx.store.update_role(role).await?;
        tracing::info!(role_id = %role.id, role_type = role.role_type.as_str(), "Role updated");
        Ok(role)
    }

    /// List all roles.
    pub async fn list_roles(&self) -> CompanyResult<Vec<Role>> {
        self.ctx.store.list_roles().await
    }

    /// The owner role, created on first use.
    pub async fn owner_role(&self) -> CompanyResult<Role> {
        self.ctx.store.get_or_create_role(RoleType::Owner).await
    }

    /// The admin role, created on first use.
    pub async fn admin_role(&self) -> CompanyResult<Role> {
        self.ctx.store.get_or_create_role(RoleType::Admin).await
    }

    /// The default employee role, created on first use.
    pub async fn employee_role(&self) -> CompanyResult<Role> {
        self.ctx.store.get_or_create_role(RoleType::Employee).await
    }
}
