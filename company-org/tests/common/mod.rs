//! Shared fixture for the integration suites.
//!
//! One company ("Company 1") owned by `owner`, with `admin` and `employee`
//! members. `regular`, `invited` and `other` are registered but belong to no
//! company; `staff` is a platform moderator.

#![allow(dead_code)]

use company_org::{
    Company, CompanySettings, CompanyStore, Membership, NewCompany, Role, RoleType,
    ServiceContext, User, UserStore,
};

/// Test fixture with roles, users and one company.
pub struct TestFixture {
    /// Services and store
    pub ctx: ServiceContext,
    /// The owner role
    pub owner_role: Role,
    /// The admin role
    pub admin_role: Role,
    /// The employee role
    pub employee_role: Role,
    /// Platform moderator
    pub staff: User,
    /// Owner of Company 1
    pub owner: User,
    /// Admin of Company 1
    pub admin: User,
    /// Employee of Company 1
    pub employee: User,
    /// Registered, no memberships
    pub regular: User,
    /// Registered, receiver of invitations
    pub invited: User,
    /// Registered, unrelated to any invitation
    pub other: User,
    /// Company 1
    pub company: Company,
}

impl TestFixture {
    /// Fixture with default settings.
    pub async fn new() -> Self {
        Self::with_settings(CompanySettings::default()).await
    }

    /// Fixture with custom settings.
    pub async fn with_settings(settings: CompanySettings) -> Self {
        let ctx = ServiceContext::in_memory(settings);
        let roles = ctx.roles();
        let owner_role = roles.owner_role().await.unwrap();
        let admin_role = roles.admin_role().await.unwrap();
        let employee_role = roles.employee_role().await.unwrap();

        let staff = register(&ctx, person("moderator").staff()).await;
        let owner = register(&ctx, person("owner")).await;
        let admin = register(&ctx, person("admin")).await;
        let employee = register(&ctx, person("employee")).await;
        let regular = register(&ctx, person("regular")).await;
        let invited = register(&ctx, person("invited")).await;
        let other = register(&ctx, person("other")).await;

        let company = ctx
            .companies()
            .create_company(&owner, NewCompany::new("Company 1", "Full Company 1"))
            .await
            .unwrap();
        ctx.store
            .insert_membership(Membership::new(company.id, admin.id, admin_role.id))
            .await
            .unwrap();
        ctx.store
            .insert_membership(Membership::new(company.id, employee.id, employee_role.id))
            .await
            .unwrap();

        Self {
            ctx,
            owner_role,
            admin_role,
            employee_role,
            staff,
            owner,
            admin,
            employee,
            regular,
            invited,
            other,
            company,
        }
    }

    /// Membership of a user in Company 1.
    pub async fn membership_of(&self, user: &User) -> Membership {
        self.ctx
            .store
            .find_membership(self.company.id, user.id)
            .await
            .unwrap()
            .unwrap_or_else(|| panic!("{} is not a member", user.username))
    }

    /// Add a member to Company 1 with the given role.
    pub async fn add_member(&self, user: &User, role: &Role) -> Membership {
        self.ctx
            .store
            .insert_membership(Membership::new(self.company.id, user.id, role.id))
            .await
            .unwrap()
    }

    /// Block a member directly in the store.
    pub async fn block(&self, user: &User) {
        let mut membership = self.membership_of(user).await;
        membership.is_blocked = true;
        self.ctx.store.update_membership(membership).await.unwrap();
    }

    /// Number of owner memberships in Company 1.
    pub async fn owner_count(&self) -> usize {
        let mut count = 0;
        for membership in self
            .ctx
            .store
            .list_memberships(self.company.id)
            .await
            .unwrap()
        {
            let role = self
                .ctx
                .store
                .get_role(membership.role_id)
                .await
                .unwrap()
                .unwrap();
            if role.role_type == RoleType::Owner {
                count += 1;
            }
        }
        count
    }

    /// Register one more user.
    pub async fn register(&self, username: &str) -> User {
        register(&self.ctx, person(username)).await
    }
}

/// A user named `username` with an `@example.com` address.
fn person(username: &str) -> User {
    User::new(username).with_email(format!("{}@example.com", username))
}

async fn register(ctx: &ServiceContext, user: User) -> User {
    ctx.store.insert_user(user).await.unwrap()
}
