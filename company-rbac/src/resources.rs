//! # Resource Types
//!
//! Resources that company permissions are expressed over.

use serde::{Deserialize, Serialize};

/// Resource types that can have permissions assigned.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// The company itself (details, lifecycle, ownership).
    Company,
    /// Memberships of a company.
    Member,
    /// Invitations to a company.
    Invite,
    /// Company role definitions.
    Role,
}

impl ResourceType {
    /// Get the string representation of the resource type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Company => "company",
            ResourceType::Member => "member",
            ResourceType::Invite => "invite",
            ResourceType::Role => "role",
        }
    }

    /// Parse resource type from string representation.
    ///
    /// Accepts singular and plural forms as well as the names used by
    /// company API routes.
    ///
    /// # Example
    ///
    /// ```
    /// use company_rbac::resources::ResourceType;
    ///
    /// assert_eq!(ResourceType::parse("company"), Some(ResourceType::Company));
    /// assert_eq!(ResourceType::parse("company_user"), Some(ResourceType::Member));
    /// assert_eq!(ResourceType::parse("invites"), Some(ResourceType::Invite));
    /// assert_eq!(ResourceType::parse("unknown"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "company" | "companies" => Some(ResourceType::Company),
            "member" | "members" | "membership" | "company_user" => Some(ResourceType::Member),
            "invite" | "invites" | "invitation" | "company_invite" => Some(ResourceType::Invite),
            "role" | "roles" => Some(ResourceType::Role),
            _ => None,
        }
    }

    /// Get all resource types.
    pub fn all() -> Vec<Self> {
        vec![
            ResourceType::Company,
            ResourceType::Member,
            ResourceType::Invite,
            ResourceType::Role,
        ]
    }
}
