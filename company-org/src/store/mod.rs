//! Storage interface
//!
//! Services only talk to a [`CompanyStore`]. Implementations must perform
//! each method atomically: multi-row operations such as
//! [`CompanyStore::transfer_ownership`] either apply completely or not at all,
//! and the invariant checks they document run in the same critical section
//! as the write.

mod memory;

pub use memory::MemoryCompanyStore;

use async_trait::async_trait;
use uuid::Uuid;

use company_rbac::RoleType;

use crate::company::{Company, CompanyStatus, CompanyUpdate};
use crate::error::CompanyResult;
use crate::invitation::{Invitation, InvitationStatus};
use crate::membership::{Departure, Membership};
use crate::roles::Role;
use crate::user::User;

/// Which companies a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyScope {
    /// Only companies with status ACTIVE
    Active,
    /// Every stored company regardless of status
    All,
}

/// Outcome of resolving an invitation.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The invitation after the update
    pub invitation: Invitation,

    /// Membership created by an acceptance, if the user was not yet a member
    pub membership: Option<Membership>,
}

/// Outcome of a company status transition.
#[derive(Debug, Clone)]
pub struct StatusChange {
    /// Status before the transition
    pub from: CompanyStatus,

    /// The company after the transition
    pub company: Company,
}

/// Host user storage
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. Username and email must be unique.
    async fn insert_user(&self, user: User) -> CompanyResult<User>;

    /// Get user by ID
    async fn get_user(&self, id: Uuid) -> CompanyResult<Option<User>>;

    /// Find user by email (case-insensitive)
    async fn find_user_by_email(&self, email: &str) -> CompanyResult<Option<User>>;

    /// Find user by username
    async fn find_user_by_username(&self, username: &str) -> CompanyResult<Option<User>>;
}

/// Company, role, membership and invitation storage
#[async_trait]
pub trait CompanyStore: UserStore {
    // Roles

    /// Insert a role, rejecting a second role of a singleton type.
    async fn insert_role(&self, role: Role) -> CompanyResult<Role>;

    /// Replace a role, rejecting a second role of a singleton type.
    async fn update_role(&self, role: Role) -> CompanyResult<Role>;

    /// Get the first role of a type, creating the canonical one if none exists.
    async fn get_or_create_role(&self, role_type: RoleType) -> CompanyResult<Role>;

    /// Get role by ID
    async fn get_role(&self, id: Uuid) -> CompanyResult<Option<Role>>;

    /// List all roles
    async fn list_roles(&self) -> CompanyResult<Vec<Role>>;

    // Companies

    /// Insert a company together with its owner's membership.
    async fn insert_company(&self, company: Company, owner: Membership) -> CompanyResult<Company>;

    /// Get company by ID, whatever its status
    async fn get_company(&self, id: Uuid) -> CompanyResult<Option<Company>>;

    /// List companies in a scope, oldest first
    async fn list_companies(&self, scope: CompanyScope) -> CompanyResult<Vec<Company>>;

    /// Apply a partial update to a live, unbanned company.
    ///
    /// Returns the company and the names of the fields that changed.
    async fn update_company(
        &self,
        id: Uuid,
        update: CompanyUpdate,
    ) -> CompanyResult<(Company, Vec<String>)>;

    /// Move a live company to another status, checked against the status it
    /// has at write time. Deleted companies are not found.
    async fn transition_company(&self, id: Uuid, to: CompanyStatus) -> CompanyResult<StatusChange>;

    /// Remove a company with its memberships and invitations.
    ///
    /// Returns `false` if the company did not exist.
    async fn purge_company(&self, id: Uuid) -> CompanyResult<bool>;

    // Memberships

    /// Insert a membership. One per (user, company); one owner per company.
    async fn insert_membership(&self, membership: Membership) -> CompanyResult<Membership>;

    /// Get membership by ID
    async fn get_membership(&self, id: Uuid) -> CompanyResult<Option<Membership>>;

    /// Find a user's membership in a company
    async fn find_membership(
        &self,
        company_id: Uuid,
        user_id: Uuid,
    ) -> CompanyResult<Option<Membership>>;

    /// List a company's memberships, oldest first
    async fn list_memberships(&self, company_id: Uuid) -> CompanyResult<Vec<Membership>>;

    /// List a user's memberships across companies
    async fn list_user_memberships(&self, user_id: Uuid) -> CompanyResult<Vec<Membership>>;

    /// Replace a membership. Rejects a second owner in the company and
    /// writes to a banned company.
    async fn update_membership(&self, membership: Membership) -> CompanyResult<Membership>;

    /// Delete a membership. Returns `false` if it did not exist; fails if
    /// its company is banned.
    async fn delete_membership(&self, id: Uuid) -> CompanyResult<bool>;

    /// Count a company's memberships
    async fn count_members(&self, company_id: Uuid) -> CompanyResult<u32>;

    /// The membership holding the company's owner role
    async fn owner_of(&self, company_id: Uuid) -> CompanyResult<Option<Membership>>;

    /// Move the owner role from one membership to another.
    ///
    /// The company must be live and not banned. `from` must hold its owner
    /// role; `to` must be an unblocked, non-owner membership of the same
    /// company. The previous
    /// owner either gets a new role or leaves, according to `departure`.
    ///
    /// Returns the new owner's membership.
    async fn transfer_ownership(
        &self,
        company_id: Uuid,
        from: Uuid,
        to: Uuid,
        departure: Departure,
    ) -> CompanyResult<Membership>;

    // Invitations

    /// Insert an invitation. Rejects a second pending invitation of the same
    /// email to the same company, and invitations to banned companies.
    async fn insert_invitation(&self, invitation: Invitation) -> CompanyResult<Invitation>;

    /// Insert a new user and an invitation addressed to them, or neither.
    async fn register_and_invite(
        &self,
        user: User,
        invitation: Invitation,
    ) -> CompanyResult<(User, Invitation)>;

    /// Get invitation by ID
    async fn get_invitation(&self, id: Uuid) -> CompanyResult<Option<Invitation>>;

    /// Find invitation by token digest
    async fn find_invitation_by_token(&self, token_hash: &str)
        -> CompanyResult<Option<Invitation>>;

    /// List a company's invitations, newest first
    async fn list_invitations(&self, company_id: Uuid) -> CompanyResult<Vec<Invitation>>;

    /// List pending invitations addressed to a user, newest first
    async fn list_invitations_for_user(&self, user: &User) -> CompanyResult<Vec<Invitation>>;

    /// Resolve a pending invitation on behalf of `user_id`.
    ///
    /// Fails with not found unless the invitation is pending and its company
    /// is not deleted. Accepting creates a membership with the invited role
    /// when the user has none in the company, and fails while the company
    /// is banned.
    async fn resolve_invitation(
        &self,
        id: Uuid,
        status: InvitationStatus,
        user_id: Uuid,
    ) -> CompanyResult<Resolution>;
}
