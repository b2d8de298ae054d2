//! # Company Events
//!
//! This crate provides the domain event bus for company management. Services
//! publish an event after every successful state change so that hosts can
//! send invitation emails, invalidate caches or write audit logs without the
//! service layer knowing about them.
//!
//! ## Overview
//!
//! The company-events crate handles:
//! - **Event Types**: Strongly-typed company, membership and invitation events
//! - **Event Bus**: Publish/subscribe messaging
//! - **Event Handlers**: Async event processing
//!
//! ## Event Types
//!
//! - `CompanyEvent`: Company lifecycle and ownership
//! - `MembershipEvent`: Joining, blocking, role changes, removal
//! - `InvitationEvent`: Invitation creation and resolution
//!
//! ## Usage
//!
//! ```rust,no_run
//! use company_events::{EventBus, InvitationEvent, MemoryEventBus};
//! use uuid::Uuid;
//!
//! async fn example() {
//!     let bus = MemoryEventBus::new();
//!
//!     // Subscribe to all invitation events
//!     let mut sub = bus.subscribe("company.invitation.*").await.unwrap();
//!
//!     let event = InvitationEvent::Declined {
//!         invitation_id: Uuid::now_v7(),
//!         email: "someone@example.com".to_string(),
//!     };
//!     bus.publish(event.to_event(Uuid::now_v7())).await.unwrap();
//!
//!     while let Ok(event) = sub.recv().await {
//!         println!("Received: {}", event.event_type);
//!     }
//! }
//! ```
//!
//! ## Topic Patterns
//!
//! Topics are structured as `company.{event_type}`:
//! - `company.invitation.created` - Specific event
//! - `company.membership.*` - All membership events
//! - `#` - All events
//!
//! Wildcards:
//! - `*` matches exactly one segment
//! - `#` matches zero or more segments

pub mod bus;
pub mod types;

// Re-export main types
pub use bus::{
    EventBus, EventBusError, EventBusResult, EventBusStats, EventHandler, MemoryEventBus,
    Subscription,
};
pub use types::{CompanyEvent, Event, EventCategory, InvitationEvent, MembershipEvent};
