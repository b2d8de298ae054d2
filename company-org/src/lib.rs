//! # Company Management
//!
//! This crate provides company (organization) management for host
//! applications: companies with a moderated lifecycle, memberships with
//! roles, invitations and ownership transfer.
//!
//! ## Overview
//!
//! The company-org crate handles:
//! - **Companies**: Tenant entities with an ACTIVE/BANNED/DELETED lifecycle
//! - **Memberships**: User-company links with a role and a blocked flag
//! - **Roles**: Owner, Admin and Employee role types; Owner and Admin are singletons
//! - **Invitations**: Token-confirmed invitations resolved exactly once
//! - **Ownership transfer**: Atomic hand-over of the owner role
//!
//! ## Architecture
//!
//! ```text
//! User
//!   └─ Membership ─→ Company (status)
//!        └─ Role (role_type)
//!   Invitation ─→ Company, Role
//!
//! Services ─→ CompanyStore (atomic writes)
//!          └→ EventBus (domain events)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use company_org::{CompanySettings, NewCompany, ServiceContext, User, UserStore};
//!
//! # async fn example() -> company_org::CompanyResult<()> {
//! let ctx = ServiceContext::in_memory(CompanySettings::default());
//! let owner = User::new("owner").with_email("owner@example.com");
//! ctx.store.insert_user(owner.clone()).await?;
//!
//! let company = ctx
//!     .companies()
//!     .create_company(&owner, NewCompany::new("Acme", "Acme Incorporated"))
//!     .await?;
//! let members = ctx.members().list_members(&owner, company.id).await?;
//! assert_eq!(members.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Cross-Crate Integration
//!
//! - `company-rbac`: Role types and per-action permissions
//! - `company-events`: Domain events published by the services

pub mod access;
pub mod company;
pub mod error;
pub mod invitation;
pub mod membership;
pub mod roles;
pub mod services;
pub mod settings;
pub mod store;
pub mod token;
pub mod user;

// Re-export main types for convenience
pub use access::Access;
pub use company::{Company, CompanyStatus, CompanySummary, CompanyUpdate, LegalDetails, NewCompany};
pub use error::{CompanyError, CompanyResult, NON_FIELD_ERRORS};
pub use invitation::{
    CreateAndInviteRequest, Invitation, InvitationQuery, InvitationStatus, InviteRequest,
    IssuedInvitation,
};
pub use membership::{ActionStatus, Departure, MemberDetails, Membership};
pub use roles::{NewRole, Role, RoleType, RoleUpdate};
pub use services::{
    ChangeOwnerRequest, CompanyService, InviteService, MembershipService, RoleService,
    ServiceContext,
};
pub use settings::{CompanySettings, ConfigError, DepartingOwnerRole};
pub use store::{
    CompanyScope, CompanyStore, MemoryCompanyStore, Resolution, StatusChange, UserStore,
};
pub use token::{hash_token, InvitationToken};
pub use user::{User, UserSummary};
