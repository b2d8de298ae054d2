//! # Company RBAC (Role-Based Access Control)
//!
//! This crate provides the access-control vocabulary for company management:
//! which operations exist, which company role types exist, and which
//! permissions each role type (and platform staff) is granted.
//!
//! ## Overview
//!
//! The company-rbac crate handles:
//! - **Resources**: Company, Member, Invite, Role
//! - **Actions**: Operations that can be performed on resources
//! - **Permissions**: Resource + Action combinations
//! - **Role types**: Owner, Admin, Employee and their default permission sets
//!
//! ## Architecture
//!
//! ```text
//! Permission = Resource + Action
//!
//! Examples:
//!   "company:update"        - Edit company details
//!   "company:change_owner"  - Transfer ownership
//!   "member:block"          - Block a company member
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use company_rbac::{Action, Permission, PermissionSet, ResourceType, RoleType};
//!
//! let perms = RoleType::Admin.permissions();
//! assert!(perms.has(&Permission::new(ResourceType::Invite, Action::Create)));
//! assert!(!perms.has(&Permission::new(ResourceType::Company, Action::ChangeOwner)));
//!
//! let mut set = PermissionSet::new();
//! set.merge(&perms);
//! set.add(Permission::new(ResourceType::Company, Action::Create));
//! assert!(set.has(&Permission::new(ResourceType::Company, Action::Create)));
//! ```
//!
//! ## Action Implications
//!
//! - `Manage` implies all actions
//! - `Update` and `Delete` imply `Read`

pub mod actions;
pub mod permissions;
pub mod resources;
pub mod roles;

// Re-export main types for convenience
pub use actions::Action;
pub use permissions::{Permission, PermissionSet};
pub use resources::ResourceType;
pub use roles::{staff_permissions, user_permissions, RoleType};
