//! Service layer
//!
//! Services take an authenticated [`User`], check permissions, call the
//! store and publish domain events. They hold no state of their own beyond
//! the shared [`ServiceContext`].

mod company;
mod invite;
mod membership;
mod role;

pub use company::{ChangeOwnerRequest, CompanyService};
pub use invite::InviteService;
pub use membership::MembershipService;
pub use role::RoleService;

use std::sync::Arc;
use uuid::Uuid;

use company_events::{Event, EventBus, MemoryEventBus};

use crate::access::Access;
use crate::company::{Company, CompanyStatus};
use crate::error::{CompanyError, CompanyResult};
use crate::settings::CompanySettings;
use crate::store::{CompanyStore, MemoryCompanyStore};
use crate::user::User;

/// Shared handles every service works with.
#[derive(Clone)]
pub struct ServiceContext {
    /// Persistence
    pub store: Arc<dyn CompanyStore>,

    /// Domain event sink
    pub events: Arc<dyn EventBus>,

    /// Settings
    pub settings: CompanySettings,
}

impl ServiceContext {
    /// Creates a context from explicit handles.
    pub fn new(
        store: Arc<dyn CompanyStore>,
        events: Arc<dyn EventBus>,
        settings: CompanySettings,
    ) -> Self {
        Self {
            store,
            events,
            settings,
        }
    }

    /// Context backed by the in-memory store and event bus.
    pub fn in_memory(settings: CompanySettings) -> Self {
        let events = MemoryEventBus::with_capacity(settings.event_channel_capacity);
        Self::new(
            Arc::new(MemoryCompanyStore::new()),
            Arc::new(events),
            settings,
        )
    }

    /// Company service over this context.
    pub fn companies(&self) -> CompanyService {
        CompanyService::new(self.clone())
    }

    /// Invitation service over this context.
    pub fn invites(&self) -> InviteService {
        InviteService::new(self.clone())
    }

    /// Membership service over this context.
    pub fn members(&self) -> MembershipService {
        MembershipService::new(self.clone())
    }

    /// Role service over this context.
    pub fn roles(&self) -> RoleService {
        RoleService::new(self.clone())
    }

    /// Publish an event. Delivery failures are logged, never returned.
    pub(crate) async fn publish(&self, event: Event) {
        let event_type = event.event_type.clone();
        if let Err(e) = self.events.publish(event).await {
            tracing::warn!(event_type = %event_type, error = %e, "Failed to publish event");
        }
    }

    /// Load a company that has not been soft-deleted.
    pub(crate) async fn live_company(&self, company_id: Uuid) -> CompanyResult<Company> {
        self.store
            .get_company(company_id)
            .await?
            .filter(|company| company.status != CompanyStatus::Deleted)
            .ok_or_else(|| CompanyError::NotFound("Company not found".to_string()))
    }

    /// Resolve the caller's access within a company.
    pub(crate) async fn access(&self, user: &User, company_id: Uuid) -> CompanyResult<Access> {
        let membership = match self.store.find_membership(company_id, user.id).await? {
            Some(membership) => {
                let role = self.store.get_role(membership.role_id).await?.ok_or_else(|| {
                    CompanyError::Storage(format!(
                        "Membership {} references a missing role",
                        membership.id
                    ))
                })?;
                Some((membership, role))
            }
            None => None,
        };
        Ok(Access::resolve(user, membership))
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
