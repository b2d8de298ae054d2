//! Event types for company management
//!
//! This module defines all event types that services publish and hosts
//! subscribe to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Topic prefix shared by all company events.
pub const TOPIC_PREFIX: &str = "company";

/// Event envelope.
///
/// All events are wrapped in this envelope which provides metadata
/// for routing, tracing, and processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique event ID
    pub id: Uuid,

    /// Event type (e.g., "company.created", "invitation.accepted")
    pub event_type: String,

    /// Company the event belongs to
    pub company_id: Uuid,

    /// User who triggered the event
    pub actor_id: Option<Uuid>,

    /// Timestamp when event was created
    pub timestamp: DateTime<Utc>,

    /// Correlation ID for tracing
    pub correlation_id: Option<String>,

    /// Event version for schema evolution
    pub version: u32,

    /// Event payload
    pub payload: serde_json::Value,

    /// Additional metadata
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Event {
    /// Create a new event.
    ///
    /// # Arguments
    ///
    /// * `event_type` - The event type string
    /// * `company_id` - The company the event belongs to
    /// * `payload` - The event payload
    pub fn new(
        event_type: impl Into<String>,
        company_id: Uuid,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            event_type: event_type.into(),
            company_id,
            actor_id: None,
            timestamp: Utc::now(),
            correlation_id: None,
            version: 1,
            payload,
            metadata: HashMap::new(),
        }
    }

    /// Set the acting user.
    pub fn with_actor(mut self, actor_id: Uuid) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    /// Set correlation ID.
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Add metadata.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Get the topic for this event.
    ///
    /// Topics are structured as: `company.{event_type}`
    pub fn topic(&self) -> String {
        format!("{}.{}", TOPIC_PREFIX, self.event_type)
    }

    /// Get the category of this event.
    pub fn category(&self) -> Option<EventCategory> {
        EventCategory::from_event_type(&self.event_type)
    }

    /// Parse the payload into a specific type.
    pub fn parse_payload<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}

/// Event categories for filtering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    /// Company lifecycle and ownership events
    Company,
    /// Membership events
    Membership,
    /// Invitation events
    Invitation,
}

impl EventCategory {
    /// Parse from event type string.
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        match event_type.split('.').next()? {
            "company" => Some(EventCategory::Company),
            "membership" => Some(EventCategory::Membership),
            "invitation" => Some(EventCategory::Invitation),
            _ => None,
        }
    }
}

// ============================================================================
// Company Events
// ============================================================================

/// Company lifecycle events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CompanyEvent {
    /// Company was created
    Created {
        company_id: Uuid,
        title: String,
        owner_id: Uuid,
    },
    /// Company details were updated
    Updated {
        company_id: Uuid,
        changes: Vec<String>,
    },
    /// Company status changed (ban, activation, soft delete)
    StatusChanged {
        company_id: Uuid,
        from: String,
        to: String,
    },
    /// Company was permanently removed
    Purged { company_id: Uuid },
    /// Ownership moved to another member
    OwnerChanged {
        company_id: Uuid,
        previous_owner_id: Uuid,
        new_owner_id: Uuid,
        previous_owner_stayed: bool,
    },
}

impl CompanyEvent {
    /// Get the company this event belongs to.
    pub fn company_id(&self) -> Uuid {
        match self {
            CompanyEvent::Created { company_id, .. }
            | CompanyEvent::Updated { company_id, .. }
            | CompanyEvent::StatusChanged { company_id, .. }
            | CompanyEvent::Purged { company_id }
            | CompanyEvent::OwnerChanged { company_id, .. } => *company_id,
        }
    }

    /// Convert to generic event.
    pub fn to_event(&self) -> Event {
        let event_type = match self {
            CompanyEvent::Created { .. } => "company.created",
            CompanyEvent::Updated { .. } => "company.updated",
            CompanyEvent::StatusChanged { .. } => "company.status_changed",
            CompanyEvent::Purged { .. } => "company.purged",
            CompanyEvent::OwnerChanged { .. } => "company.owner_changed",
        };
        Event::new(
            event_type,
            self.company_id(),
            serde_json::to_value(self).unwrap_or_default(),
        )
    }
}

// ============================================================================
// Membership Events
// ============================================================================

/// Membership events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MembershipEvent {
    /// User joined the company
    Joined {
        membership_id: Uuid,
        user_id: Uuid,
        role_id: Uuid,
    },
    /// Membership was blocked
    Blocked { membership_id: Uuid, user_id: Uuid },
    /// Membership was unblocked
    Unblocked { membership_id: Uuid, user_id: Uuid },
    /// Membership role changed
    RoleChanged {
        membership_id: Uuid,
        user_id: Uuid,
        old_role_id: Uuid,
        new_role_id: Uuid,
    },
    /// User was removed from the company
    Removed { membership_id: Uuid, user_id: Uuid },
}

impl MembershipEvent {
    /// Convert to generic event.
    ///
    /// Membership events carry no company id of their own, so the caller
    /// supplies it.
    pub fn to_event(&self, company_id: Uuid) -> Event {
        let event_type = match self {
            MembershipEvent::Joined { .. } => "membership.joined",
            MembershipEvent::Blocked { .. } => "membership.blocked",
            MembershipEvent::Unblocked { .. } => "membership.unblocked",
            MembershipEvent::RoleChanged { .. } => "membership.role_changed",
            MembershipEvent::Removed { .. } => "membership.removed",
        };
        Event::new(
            event_type,
            company_id,
            serde_json::to_value(self).unwrap_or_default(),
        )
    }
}

// ============================================================================
// Invitation Events
// ============================================================================

/// Invitation events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InvitationEvent {
    /// Invitation was issued; hosts deliver the confirmation link
    Created {
        invitation_id: Uuid,
        email: String,
        user_id: Option<Uuid>,
        role_id: Uuid,
        confirmation_link: String,
    },
    /// Invitation was accepted
    Accepted {
        invitation_id: Uuid,
        user_id: Uuid,
        membership_id: Uuid,
    },
    /// Invitation was declined
    Declined { invitation_id: Uuid, email: String },
}

impl InvitationEvent {
    /// Convert to generic event.
    pub fn to_event(&self, company_id: Uuid) -> Event {
        let event_type = match self {
            InvitationEvent::Created { .. } => "invitation.created",
            InvitationEvent::Accepted { .. } => "invitation.accepted",
            InvitationEvent::Declined { .. } => "invitation.declined",
        };
        Event::new(
            event_type,
            company_id,
            serde_json::to_value(self).unwrap_or_default(),
        )
    }
}
