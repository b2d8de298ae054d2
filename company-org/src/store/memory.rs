//! In-memory store
//!
//! All tables live behind a single `RwLock`, so every trait method runs in one
//! critical section and multi-row writes are atomic.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use company_rbac::RoleType;

use super::{CompanyScope, CompanyStore, Resolution, StatusChange, UserStore};
use crate::company::{Company, CompanyStatus, CompanyUpdate};
use crate::error::{CompanyError, CompanyResult};
use crate::invitation::{Invitation, InvitationStatus};
use crate::membership::{Departure, Membership};
use crate::roles::{singleton_conflict, Role};
use crate::user::{normalize_email, User};

#[derive(Debug, Default)]
struct StoreState {
    users: HashMap<Uuid, User>,
    roles: HashMap<Uuid, Role>,
    companies: HashMap<Uuid, Company>,
    memberships: HashMap<Uuid, Membership>,
    invitations: HashMap<Uuid, Invitation>,
}

impl StoreState {
    fn role_type(&self, role_id: Uuid) -> Option<RoleType> {
        self.roles.get(&role_id).map(|role| role.role_type)
    }

    fn check_singleton(&self, role: &Role) -> CompanyResult<()> {
        let taken = role.role_type.is_singleton()
            && self
                .roles
                .values()
                .any(|other| other.id != role.id && other.role_type == role.role_type);
        if taken {
            return Err(singleton_conflict(role.role_type));
        }
        Ok(())
    }

    fn owner_membership(&self, company_id: Uuid) -> Option<&Membership> {
        self.memberships.values().find(|m| {
            m.company_id == company_id && self.role_type(m.role_id) == Some(RoleType::Owner)
        })
    }

    fn live_company(&self, company_id: Uuid) -> CompanyResult<&Company> {
        self.companies
            .get(&company_id)
            .filter(|company| company.status != CompanyStatus::Deleted)
            .ok_or_else(|| CompanyError::NotFound("Company not found".to_string()))
    }

    fn writable_company(&self, company_id: Uuid) -> CompanyResult<&Company> {
        let company = self.live_company(company_id)?;
        company.ensure_writable()?;
        Ok(company)
    }

    fn check_user(&self, user: &User) -> CompanyResult<()> {
        if self.users.values().any(|u| u.username == user.username) {
            return Err(CompanyError::validation(
                "username",
                "A user with that username already exists",
            ));
        }
        if let Some(email) = &user.email {
            if self.users.values().any(|u| u.has_email(email)) {
                return Err(CompanyError::validation(
                    "email",
                    "A user with that email already exists",
                ));
            }
        }
        Ok(())
    }

    fn check_invitation(&self, invitation: &Invitation) -> CompanyResult<()> {
        self.writable_company(invitation.company_id)?;
        if self.role_type(invitation.role_id).is_none() {
            return Err(CompanyError::validation("role", "Role does not exist"));
        }

        let pending = self.invitations.values().any(|inv| {
            inv.company_id == invitation.company_id
                && inv.is_actionable()
                && inv.email == invitation.email
        });
        if pending {
            return Err(CompanyError::Conflict(
                "An invitation for this email is already pending".to_string(),
            ));
        }
        Ok(())
    }

    /// Checks shared by membership inserts and updates.
    fn check_membership(&self, membership: &Membership) -> CompanyResult<()> {
        if !self.companies.contains_key(&membership.company_id) {
            return Err(CompanyError::NotFound("Company not found".to_string()));
        }
        let role_type = self
            .role_type(membership.role_id)
            .ok_or_else(|| CompanyError::validation("role", "Role does not exist"))?;

        let duplicate = self.memberships.values().any(|m| {
            m.id != membership.id
                && m.company_id == membership.company_id
                && m.user_id == membership.user_id
        });
        if duplicate {
            return Err(CompanyError::Conflict(
                "User is already a member of this company".to_string(),
            ));
        }

        if role_type == RoleType::Owner {
            if let Some(owner) = self.owner_membership(membership.company_id) {
                if owner.id != membership.id {
                    return Err(CompanyError::Conflict(
                        "Company already has an owner".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// In-memory [`CompanyStore`] for tests and single-process hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryCompanyStore {
    state: Arc<RwLock<StoreState>>,
}

impl MemoryCompanyStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryCompanyStore {
    async fn insert_user(&self, user: User) -> CompanyResult<User> {
        let mut state = self.state.write().await;
        state.check_user(&user)?;
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> CompanyResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> CompanyResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.has_email(email)).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> CompanyResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl CompanyStore for MemoryCompanyStore {
    async fn insert_role(&self, role: Role) -> CompanyResult<Role> {
        let mut state = self.state.write().await;
        state.check_singleton(&role)?;
        state.roles.insert(role.id, role.clone());
        Ok(role)
    }

    async fn update_role(&self, role: Role) -> CompanyResult<Role> {
        let mut state = self.state.write().await;
        let current = state
            .roles
            .get(&role.id)
            .ok_or_else(|| CompanyError::NotFound("Role not found".to_string()))?;

        // Changing the owner role's type would leave its holders ownerless.
        if current.role_type == RoleType::Owner
            && role.role_type != RoleType::Owner
            && state.memberships.values().any(|m| m.role_id == role.id)
        {
            return Err(CompanyError::Conflict(
                "Cannot change the type of a role held by company owners".to_string(),
            ));
        }
        if role.role_type == RoleType::Owner && current.role_type != RoleType::Owner {
            let mut companies = HashMap::new();
            for m in state.memberships.values() {
                let is_owner = state.role_type(m.role_id) == Some(RoleType::Owner);
                if m.role_id == role.id || is_owner {
                    *companies.entry(m.company_id).or_insert(0u32) += 1;
                }
            }
            if companies.values().any(|count| *count > 1) {
                return Err(CompanyError::Conflict(
                    "Company already has an owner".to_string(),
                ));
            }
        }
        state.check_singleton(&role)?;

        state.roles.insert(role.id, role.clone());
        Ok(role)
    }

    async fn get_or_create_role(&self, role_type: RoleType) -> CompanyResult<Role> {
        let mut state = self.state.write().await;
        let existing = state
            .roles
            .values()
            .filter(|role| role.role_type == role_type)
            .min_by_key(|role| role.id)
            .cloned();

        match existing {
            Some(role) => Ok(role),
            None => {
                let role = Role::canonical(role_type);
                state.roles.insert(role.id, role.clone());
                tracing::info!(
                    role_id = %role.id,
                    role_type = role_type.as_str(),
                    "Created canonical role"
                );
                Ok(role)
            }
        }
    }

    async fn get_role(&self, id: Uuid) -> CompanyResult<Option<Role>> {
        Ok(self.state.read().await.roles.get(&id).cloned())
    }

    async fn list_roles(&self) -> CompanyResult<Vec<Role>> {
        let state = self.state.read().await;
        let mut roles: Vec<Role> = state.roles.values().cloned().collect();
        roles.sort_by(|a, b| b.role_type.cmp(&a.role_type).then_with(|| a.title.cmp(&b.title)));
        Ok(roles)
    }

    async fn insert_company(&self, company: Company, owner: Membership) -> CompanyResult<Company> {
        let mut state = self.state.write().await;

        if state.companies.contains_key(&company.id) {
            return Err(CompanyError::Conflict("Company already exists".to_string()));
        }
        if owner.company_id != company.id {
            return Err(CompanyError::Storage(
                "Owner membership belongs to another company".to_string(),
            ));
        }
        if state.role_type(owner.role_id) != Some(RoleType::Owner) {
            return Err(CompanyError::Storage(
                "Owner membership must reference the owner role".to_string(),
            ));
        }

        state.companies.insert(company.id, company.clone());
        state.memberships.insert(owner.id, owner);
        Ok(company)
    }

    async fn get_company(&self, id: Uuid) -> CompanyResult<Option<Company>> {
        Ok(self.state.read().await.companies.get(&id).cloned())
    }

    async fn list_companies(&self, scope: CompanyScope) -> CompanyResult<Vec<Company>> {
        let state = self.state.read().await;
        let mut companies: Vec<Company> = state
            .companies
            .values()
            .filter(|company| match scope {
                CompanyScope::Active => company.is_active(),
                CompanyScope::All => true,
            })
            .cloned()
            .collect();
        companies.sort_by_key(|company| (company.created_at, company.id));
        Ok(companies)
    }

    async fn update_company(
        &self,
        id: Uuid,
        update: CompanyUpdate,
    ) -> CompanyResult<(Company, Vec<String>)> {
        let mut state = self.state.write().await;
        let mut company = state.writable_company(id)?.clone();

        let changes = update.apply(&mut company)?;
        if !changes.is_empty() {
            state.companies.insert(company.id, company.clone());
        }
        Ok((company, changes))
    }

    async fn transition_company(&self, id: Uuid, to: CompanyStatus) -> CompanyResult<StatusChange> {
        let mut state = self.state.write().await;
        let mut company = state.live_company(id)?.clone();

        let from = company.status;
        company.transition_to(to)?;
        state.companies.insert(company.id, company.clone());
        Ok(StatusChange { from, company })
    }

    async fn purge_company(&self, id: Uuid) -> CompanyResult<bool> {
        let mut state = self.state.write().await;
        if state.companies.remove(&id).is_none() {
            return Ok(false);
        }
        state.memberships.retain(|_, m| m.company_id != id);
        state.invitations.retain(|_, inv| inv.company_id != id);
        Ok(true)
    }

    async fn insert_membership(&self, membership: Membership) -> CompanyResult<Membership> {
        let mut state = self.state.write().await;
        state.check_membership(&membership)?;
        state.memberships.insert(membership.id, membership.clone());
        Ok(membership)
    }

    async fn get_membership(&self, id: Uuid) -> CompanyResult<Option<Membership>> {
        Ok(self.state.read().await.memberships.get(&id).cloned())
    }

    async fn find_membership(
        &self,
        company_id: Uuid,
        user_id: Uuid,
    ) -> CompanyResult<Option<Membership>> {
        let state = self.state.read().await;
        Ok(state
            .memberships
            .values()
            .find(|m| m.company_id == company_id && m.user_id == user_id)
            .cloned())
    }

    async fn list_memberships(&self, company_id: Uuid) -> CompanyResult<Vec<Membership>> {
        let state = self.state.read().await;
        let mut memberships: Vec<Membership> = state
            .memberships
            .values()
            .filter(|m| m.company_id == company_id)
            .cloned()
            .collect();
        memberships.sort_by_key(|m| (m.joined_at, m.id));
        Ok(memberships)
    }

    async fn list_user_memberships(&self, user_id: Uuid) -> CompanyResult<Vec<Membership>> {
        let state = self.state.read().await;
        let mut memberships: Vec<Membership> = state
            .memberships
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        memberships.sort_by_key(|m| (m.joined_at, m.id));
        Ok(memberships)
    }

    async fn update_membership(&self, membership: Membership) -> CompanyResult<Membership> {
        let mut state = self.state.write().await;
        let current = state
            .memberships
            .get(&membership.id)
            .ok_or_else(|| CompanyError::NotFound("Membership not found".to_string()))?;

        if current.company_id != membership.company_id || current.user_id != membership.user_id {
            return Err(CompanyError::Storage(
                "Membership user and company are immutable".to_string(),
            ));
        }
        state.writable_company(membership.company_id)?;
        state.check_membership(&membership)?;

        state.memberships.insert(membership.id, membership.clone());
        Ok(membership)
    }

    async fn delete_membership(&self, id: Uuid) -> CompanyResult<bool> {
        let mut state = self.state.write().await;
        let Some(company_id) = state.memberships.get(&id).map(|m| m.company_id) else {
            return Ok(false);
        };
        state.writable_company(company_id)?;
        Ok(state.memberships.remove(&id).is_some())
    }

    async fn count_members(&self, company_id: Uuid) -> CompanyResult<u32> {
        let state = self.state.read().await;
        let count = state
            .memberships
            .values()
            .filter(|m| m.company_id == company_id)
            .count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn owner_of(&self, company_id: Uuid) -> CompanyResult<Option<Membership>> {
        let state = self.state.read().await;
        Ok(state.owner_membership(company_id).cloned())
    }

    async fn transfer_ownership(
        &self,
        company_id: Uuid,
        from: Uuid,
        to: Uuid,
        departure: Departure,
    ) -> CompanyResult<Membership> {
        let mut state = self.state.write().await;
        state.writable_company(company_id)?;

        let previous = state
            .memberships
            .get(&from)
            .filter(|m| m.company_id == company_id)
            .filter(|m| state.role_type(m.role_id) == Some(RoleType::Owner))
            .cloned()
            .ok_or_else(|| {
                CompanyError::PermissionDenied("Only the company owner can do this".to_string())
            })?;

        let mut next = state
            .memberships
            .get(&to)
            .filter(|m| m.company_id == company_id)
            .cloned()
            .ok_or_else(|| {
                CompanyError::Conflict("User is not a member of this company".to_string())
            })?;
        if next.id == previous.id || state.role_type(next.role_id) == Some(RoleType::Owner) {
            return Err(CompanyError::Conflict(
                "User is already the company owner".to_string(),
            ));
        }
        if next.is_blocked {
            return Err(CompanyError::Conflict(
                "Cannot transfer ownership to a blocked member".to_string(),
            ));
        }
        if let Departure::Stay { role_id } = departure {
            match state.role_type(role_id) {
                Some(RoleType::Owner) | None => {
                    return Err(CompanyError::validation(
                        "role",
                        "Invalid role for the previous owner",
                    ))
                }
                Some(_) => {}
            }
        }

        // All checks passed; apply both rows.
        next.role_id = previous.role_id;
        state.memberships.insert(next.id, next.clone());
        match departure {
            Departure::Stay { role_id } => {
                let mut demoted = previous;
                demoted.role_id = role_id;
                state.memberships.insert(demoted.id, demoted);
            }
            Departure::Leave => {
                state.memberships.remove(&previous.id);
            }
        }

        Ok(next)
    }

    async fn insert_invitation(&self, invitation: Invitation) -> CompanyResult<Invitation> {
        let mut state = self.state.write().await;
        state.check_invitation(&invitation)?;
        state.invitations.insert(invitation.id, invitation.clone());
        Ok(invitation)
    }

    async fn register_and_invite(
        &self,
        user: User,
        invitation: Invitation,
    ) -> CompanyResult<(User, Invitation)> {
        let mut state = self.state.write().await;
        state.check_user(&user)?;
        state.check_invitation(&invitation)?;

        state.users.insert(user.id, user.clone());
        state.invitations.insert(invitation.id, invitation.clone());
        Ok((user, invitation))
    }

    async fn get_invitation(&self, id: Uuid) -> CompanyResult<Option<Invitation>> {
        Ok(self.state.read().await.invitations.get(&id).cloned())
    }

    async fn find_invitation_by_token(
        &self,
        token_hash: &str,
    ) -> CompanyResult<Option<Invitation>> {
        let state = self.state.read().await;
        Ok(state
            .invitations
            .values()
            .find(|inv| inv.token_hash == token_hash)
            .cloned())
    }

    async fn list_invitations(&self, company_id: Uuid) -> CompanyResult<Vec<Invitation>> {
        let state = self.state.read().await;
        let mut invitations: Vec<Invitation> = state
            .invitations
            .values()
            .filter(|inv| inv.company_id == company_id)
            .cloned()
            .collect();
        invitations.sort_by_key(|inv| std::cmp::Reverse((inv.created_at, inv.id)));
        Ok(invitations)
    }

    async fn list_invitations_for_user(&self, user: &User) -> CompanyResult<Vec<Invitation>> {
        let state = self.state.read().await;
        let mut invitations: Vec<Invitation> = state
            .invitations
            .values()
            .filter(|inv| inv.is_actionable() && inv.is_addressed_to(user))
            .filter(|inv| state.live_company(inv.company_id).is_ok())
            .cloned()
            .collect();
        invitations.sort_by_key(|inv| std::cmp::Reverse((inv.created_at, inv.id)));
        Ok(invitations)
    }

    async fn resolve_invitation(
        &self,
        id: Uuid,
        status: InvitationStatus,
        user_id: Uuid,
    ) -> CompanyResult<Resolution> {
        let mut state = self.state.write().await;
        let not_found = || CompanyError::NotFound("Invitation not found".to_string());

        let mut invitation = state
            .invitations
            .get(&id)
            .filter(|inv| inv.is_actionable())
            .cloned()
            .ok_or_else(not_found)?;
        let company = state.live_company(invitation.company_id).map_err(|_| not_found())?;
        if status == InvitationStatus::Accepted {
            company.ensure_writable()?;
        }

        invitation.resolve(status, user_id)?;

        let mut membership = None;
        if status == InvitationStatus::Accepted {
            let already_member = state
                .memberships
                .values()
                .any(|m| m.company_id == invitation.company_id && m.user_id == user_id);
            if !already_member {
                let joined = Membership::new(invitation.company_id, user_id, invitation.role_id)
                    .with_inviter(invitation.invited_by);
                state.check_membership(&joined)?;
                state.memberships.insert(joined.id, joined.clone());
                membership = Some(joined);
            }
        }

        state.invitations.insert(invitation.id, invitation.clone());
        Ok(Resolution {
            invitation,
            membership,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Seed {
        store: MemoryCompanyStore,
        company: Company,
        owner: Membership,
        employee: Membership,
        employee_role: Role,
    }

    async fn seed() -> Seed {
        let store = MemoryCompanyStore::new();
        let owner_role = store.get_or_create_role(RoleType::Owner).await.unwrap();
        let employee_role = store.get_or_create_role(RoleType::Employee).await.unwrap();

        let company = Company::new("Company 1", "Full Company 1");
        let owner_user = store.insert_user(User::new("owner")).await.unwrap();
        let owner = Membership::new(company.id, owner_user.id, owner_role.id);
        store
            .insert_company(company.clone(), owner.clone())
            .await
            .unwrap();

        let employee_user = store.insert_user(User::new("employee")).await.unwrap();
        let employee = store
            .insert_membership(Membership::new(company.id, employee_user.id, employee_role.id))
            .await
            .unwrap();

        Seed {
            store,
            company,
            owner,
            employee,
            employee_role,
        }
    }

    #[tokio::test]
    async fn test_singleton_roles_under_contention() {
        let store = MemoryCompanyStore::new();
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .insert_role(Role::new(format!("Owner {}", i), RoleType::Owner))
                    .await
            }));
        }

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);

        let owners = store
            .list_roles()
            .await
            .unwrap()
            .into_iter()
            .filter(|r| r.is_owner())
            .count();
        assert_eq!(owners, 1);
    }

    #[tokio::test]
    async fn test_get_or_create_role_is_idempotent() {
        let store = MemoryCompanyStore::new();
        let a = store.get_or_create_role(RoleType::Admin).await.unwrap();
        let b = store.get_or_create_role(RoleType::Admin).await.unwrap();
        assert_eq!(a.id, b.id);

        let err = store
            .insert_role(Role::new("Second admin", RoleType::Admin))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Only one role of type Admin may exist");
    }

    #[tokio::test]
    async fn test_unique_users() {
        let store = MemoryCompanyStore::new();
        store
            .insert_user(User::new("alice").with_email("alice@example.com"))
            .await
            .unwrap();

        let err = store.insert_user(User::new("alice")).await.unwrap_err();
        assert!(matches!(err, CompanyError::Validation { ref field, .. } if field == "username"));

        let err = store
            .insert_user(User::new("alice2").with_email("ALICE@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, CompanyError::Validation { ref field, .. } if field == "email"));
    }

    #[tokio::test]
    async fn test_second_owner_membership_is_rejected() {
        let s = seed().await;
        let owner_role = s.store.get_or_create_role(RoleType::Owner).await.unwrap();

        let mut promoted = s.employee.clone();
        promoted.role_id = owner_role.id;
        let err = s.store.update_membership(promoted).await.unwrap_err();
        assert!(matches!(err, CompanyError::Conflict(_)));

        let stranger = s.store.insert_user(User::new("stranger")).await.unwrap();
        let err = s
            .store
            .insert_membership(Membership::new(s.company.id, stranger.id, owner_role.id))
            .await
            .unwrap_err();
        assert!(matches!(err, CompanyError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_duplicate_membership_is_rejected() {
        let s = seed().await;
        let err = s
            .store
            .insert_membership(Membership::new(
                s.company.id,
                s.employee.user_id,
                s.employee_role.id,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, CompanyError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_transfer_ownership_stay() {
        let s = seed().await;
        let new_owner = s
            .store
            .transfer_ownership(
                s.company.id,
                s.owner.id,
                s.employee.id,
                Departure::Stay {
                    role_id: s.employee_role.id,
                },
            )
            .await
            .unwrap();

        assert_eq!(new_owner.role_id, s.owner.role_id);
        let previous = s.store.get_membership(s.owner.id).await.unwrap().unwrap();
        assert_eq!(previous.role_id, s.employee_role.id);
    }

    #[tokio::test]
    async fn test_transfer_ownership_leave() {
        let s = seed().await;
        s.store
            .transfer_ownership(s.company.id, s.owner.id, s.employee.id, Departure::Leave)
            .await
            .unwrap();

        assert!(s.store.get_membership(s.owner.id).await.unwrap().is_none());
        assert_eq!(s.store.count_members(s.company.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_failed_transfer_changes_nothing() {
        let s = seed().await;

        let mut blocked = s.employee.clone();
        blocked.block();
        s.store.update_membership(blocked).await.unwrap();

        let err = s
            .store
            .transfer_ownership(s.company.id, s.owner.id, s.employee.id, Departure::Leave)
            .await
            .unwrap_err();
        assert!(matches!(err, CompanyError::Conflict(_)));

        let err = s
            .store
            .transfer_ownership(s.company.id, s.owner.id, s.owner.id, Departure::Leave)
            .await
            .unwrap_err();
        assert!(matches!(err, CompanyError::Conflict(_)));

        let owner = s.store.get_membership(s.owner.id).await.unwrap().unwrap();
        assert_eq!(owner.role_id, s.owner.role_id);
        let employee = s.store.get_membership(s.employee.id).await.unwrap().unwrap();
        assert_eq!(employee.role_id, s.employee_role.id);
    }

    #[tokio::test]
    async fn test_invitation_resolves_once() {
        let s = seed().await;
        let invited = s
            .store
            .insert_user(User::new("invited").with_email("invited@example.com"))
            .await
            .unwrap();
        let invitation = s
            .store
            .insert_invitation(Invitation::new(
                s.company.id,
                "invited@example.com",
                s.employee_role.id,
                "digest",
            ))
            .await
            .unwrap();

        let resolution = s
            .store
            .resolve_invitation(invitation.id, InvitationStatus::Accepted, invited.id)
            .await
            .unwrap();
        assert_eq!(resolution.invitation.status, InvitationStatus::Accepted);
        assert!(resolution.membership.is_some());

        let err = s
            .store
            .resolve_invitation(invitation.id, InvitationStatus::Declined, invited.id)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_duplicate_pending_invitation() {
        let s = seed().await;
        let first = Invitation::new(s.company.id, "new@example.com", s.employee_role.id, "a");
        s.store.insert_invitation(first).await.unwrap();

        let second = Invitation::new(s.company.id, "NEW@example.com", s.employee_role.id, "b");
        let err = s.store.insert_invitation(second).await.unwrap_err();
        assert!(matches!(err, CompanyError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_purge_cascades() {
        let s = seed().await;
        s.store
            .insert_invitation(Invitation::new(
                s.company.id,
                "new@example.com",
                s.employee_role.id,
                "a",
            ))
            .await
            .unwrap();

        assert!(s.store.purge_company(s.company.id).await.unwrap());
        assert!(s.store.get_company(s.company.id).await.unwrap().is_none());
        assert!(s.store.list_memberships(s.company.id).await.unwrap().is_empty());
        assert!(s.store.list_invitations(s.company.id).await.unwrap().is_empty());
        assert!(!s.store.purge_company(s.company.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_company_scopes() {
        let s = seed().await;
        s.store
            .transition_company(s.company.id, CompanyStatus::Deleted)
            .await
            .unwrap();

        assert!(s
            .store
            .list_companies(CompanyScope::Active)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            s.store.list_companies(CompanyScope::All).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_find_user_by_email_ignores_case() {
        let store = MemoryCompanyStore::new();
        let user = store
            .insert_user(User::new("bob").with_email("bob@example.com"))
            .await
            .unwrap();
        let found = store
            .find_user_by_email(&normalize_email(" BOB@example.com"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn test_deleted_company_stays_deleted() {
        let s = seed().await;
        let change = s
            .store
            .transition_company(s.company.id, CompanyStatus::Deleted)
            .await
            .unwrap();
        assert_eq!(change.from, CompanyStatus::Active);

        // Writers that read the company before the delete landed
        let err = s
            .store
            .update_company(s.company.id, CompanyUpdate::title("Renamed"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
        let err = s
            .store
            .transition_company(s.company.id, CompanyStatus::Banned)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);

        let stored = s.store.get_company(s.company.id).await.unwrap().unwrap();
        assert_eq!(stored.status, CompanyStatus::Deleted);
        assert_eq!(stored.title, "Company 1");
    }

    #[tokio::test]
    async fn test_transition_checks_current_status() {
        let s = seed().await;
        s.store
            .transition_company(s.company.id, CompanyStatus::Banned)
            .await
            .unwrap();
        let err = s
            .store
            .transition_company(s.company.id, CompanyStatus::Banned)
            .await
            .unwrap_err();
        assert!(matches!(err, CompanyError::InvalidTransition { .. }));

        let err = s
            .store
            .update_company(s.company.id, CompanyUpdate::title("Renamed"))
            .await
            .unwrap_err();
        assert!(matches!(err, CompanyError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_company_reports_changes() {
        let s = seed().await;
        let (company, changes) = s
            .store
            .update_company(s.company.id, CompanyUpdate::title("Renamed"))
            .await
            .unwrap();
        assert_eq!(company.title, "Renamed");
        assert_eq!(changes, vec!["title".to_string()]);

        let (_, changes) = s
            .store
            .update_company(s.company.id, CompanyUpdate::title("Renamed"))
            .await
            .unwrap();
        assert!(changes.is_empty());
    }

    #[tokio::test]
    async fn test_register_and_invite_is_all_or_nothing() {
        let s = seed().await;
        s.store
            .insert_invitation(Invitation::new(
                s.company.id,
                "late@example.com",
                s.employee_role.id,
                "a",
            ))
            .await
            .unwrap();

        let user = User::new("late").with_email("late@example.com");
        let invitation = Invitation::new(s.company.id, "late@example.com", s.employee_role.id, "b")
            .for_user(Some(user.id));
        let err = s
            .store
            .register_and_invite(user, invitation)
            .await
            .unwrap_err();
        assert!(matches!(err, CompanyError::Conflict(_)));
        assert!(s.store.find_user_by_username("late").await.unwrap().is_none());

        let user = User::new("fresh").with_email("fresh@example.com");
        let invitation = Invitation::new(s.company.id, "fresh@example.com", s.employee_role.id, "c")
            .for_user(Some(user.id));
        let (user, invitation) = s.store.register_and_invite(user, invitation).await.unwrap();
        assert_eq!(invitation.user_id, Some(user.id));
        assert!(s.store.get_user(user.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_banned_company_rejects_membership_writes() {
        let s = seed().await;
        let invited = s
            .store
            .insert_user(User::new("invited").with_email("invited@example.com"))
            .await
            .unwrap();
        let invitation = s
            .store
            .insert_invitation(Invitation::new(
                s.company.id,
                "invited@example.com",
                s.employee_role.id,
                "a",
            ))
            .await
            .unwrap();
        s.store
            .transition_company(s.company.id, CompanyStatus::Banned)
            .await
            .unwrap();

        let err = s
            .store
            .resolve_invitation(invitation.id, InvitationStatus::Accepted, invited.id)
            .await
            .unwrap_err();
        assert!(matches!(err, CompanyError::Conflict(_)));
        assert!(s
            .store
            .find_membership(s.company.id, invited.id)
            .await
            .unwrap()
            .is_none());

        let err = s
            .store
            .transfer_ownership(s.company.id, s.owner.id, s.employee.id, Departure::Leave)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Company is banned");

        let mut blocked = s.employee.clone();
        blocked.block();
        assert!(s.store.update_membership(blocked).await.is_err());
        assert!(s.store.delete_membership(s.employee.id).await.is_err());

        let another = Invitation::new(s.company.id, "new@example.com", s.employee_role.id, "b");
        assert!(s.store.insert_invitation(another).await.is_err());

        // Declining creates nothing, so it stays possible.
        let declined = s
            .store
            .resolve_invitation(invitation.id, InvitationStatus::Declined, invited.id)
            .await
            .unwrap();
        assert_eq!(declined.invitation.status, InvitationStatus::Declined);
    }

    #[tokio::test]
    async fn test_owner_of_follows_transfer() {
        let s = seed().await;
        let owner = s.store.owner_of(s.company.id).await.unwrap().unwrap();
        assert_eq!(owner.id, s.owner.id);

        s.store
            .transfer_ownership(s.company.id, s.owner.id, s.employee.id, Departure::Leave)
            .await
            .unwrap();
        let owner = s.store.owner_of(s.company.id).await.unwrap().unwrap();
        assert_eq!(owner.id, s.employee.id);
        assert!(s.store.owner_of(Uuid::now_v7()).await.unwrap().is_none());
    }
}
