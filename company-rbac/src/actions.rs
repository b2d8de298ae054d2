//! # Actions
//!
//! Defines the operations that can be performed on company resources.

use serde::{Deserialize, Serialize};

/// Actions that can be performed on resources.
///
/// Besides the usual CRUD verbs, company management has a few
/// domain-specific operations:
/// - **ChangeOwner**: Transfer company ownership to another member
/// - **Ban** / **Activate**: Move a company between the active and banned states
/// - **Purge**: Permanently remove a company, bypassing soft delete
/// - **Block** / **Unblock**: Suspend or restore a membership
/// - **ChangeRole**: Assign a different role to a membership
/// - **Manage**: Full administrative access to the resource
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Read/view a single resource.
    Read,

    /// List/query resources.
    List,

    /// Create new resource.
    Create,

    /// Update existing resource.
    Update,

    /// Delete resource (soft delete for companies).
    Delete,

    /// Transfer ownership.
    ChangeOwner,

    /// Ban a resource.
    Ban,

    /// Lift a ban.
    Activate,

    /// Permanently remove a resource.
    Purge,

    /// Block a membership.
    Block,

    /// Unblock a membership.
    Unblock,

    /// Change the role of a membership.
    ChangeRole,

    /// Administer the resource.
    ///
    /// Implies every other action.
    Manage,
}

impl Action {
    /// Get the string representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::List => "list",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::ChangeOwner => "change_owner",
            Action::Ban => "ban",
            Action::Activate => "activate",
            Action::Purge => "purge",
            Action::Block => "block",
            Action::Unblock => "unblock",
            Action::ChangeRole => "change_role",
            Action::Manage => "manage",
        }
    }

    /// Parse action from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive, supports aliases)
    ///
    /// # Returns
    ///
    /// `Some(Action)` if valid, `None` otherwise
    ///
    /// # Example
    ///
    /// ```
    /// use company_rbac::actions::Action;
    ///
    /// assert_eq!(Action::parse("read"), Some(Action::Read));
    /// assert_eq!(Action::parse("retrieve"), Some(Action::Read));
    /// assert_eq!(Action::parse("partial_update"), Some(Action::Update));
    /// assert_eq!(Action::parse("change-owner"), Some(Action::ChangeOwner));
    /// assert_eq!(Action::parse("invalid"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "read" | "retrieve" | "view" | "get" => Some(Action::Read),
            "list" | "query" | "browse" => Some(Action::List),
            "create" | "add" => Some(Action::Create),
            "update" | "partial_update" | "edit" | "patch" => Some(Action::Update),
            "delete" | "destroy" | "remove" => Some(Action::Delete),
            "change_owner" | "transfer" => Some(Action::ChangeOwner),
            "ban" => Some(Action::Ban),
            "activate" | "unban" => Some(Action::Activate),
            "purge" | "hard_delete" => Some(Action::Purge),
            "block" => Some(Action::Block),
            "unblock" => Some(Action::Unblock),
            "change_role" => Some(Action::ChangeRole),
            "manage" | "admin" => Some(Action::Manage),
            _ => None,
        }
    }

    /// Get all actions.
    pub fn all() -> Vec<Self> {
        vec![
            Action::Read,
            Action::List,
            Action::Create,
            Action::Update,
            Action::Delete,
            Action::ChangeOwner,
            Action::Ban,
            Action::Activate,
            Action::Purge,
            Action::Block,
            Action::Unblock,
            Action::ChangeRole,
            Action::Manage,
        ]
    }

    /// Check if this action implies another action.
    ///
    /// - `Manage` implies all other actions
    /// - `Update` implies `Read`
    /// - `Delete` implies `Read`
    ///
    /// # Example
    ///
    /// ```
    /// use company_rbac::actions::Action;
    ///
    /// assert!(Action::Manage.implies(Action::Purge));
    /// assert!(Action::Update.implies(Action::Read));
    /// assert!(!Action::Read.implies(Action::Update));
    /// ```
    pub fn implies(&self, other: Action) -> bool {
        match self {
            Action::Manage => true,
            Action::Update | Action::Delete => other == Action::Read,
            _ => false,
        }
    }
}
