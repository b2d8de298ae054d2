//! Member listing and management tests.

mod common;

use common::TestFixture;
use company_org::{ActionStatus, CompanyError, NewCompany};
use uuid::Uuid;

#[tokio::test]
async fn test_list_users_as_staff() {
    let f = TestFixture::new().await;
    let members = f.ctx.members();

    let listed = members.list_members(&f.admin, f.company.id).await.unwrap();
    assert_eq!(listed.len(), 3);

    assert!(members.list_members(&f.employee, f.company.id).await.is_ok());
    assert!(members.list_members(&f.staff, f.company.id).await.is_ok());

    let err = members
        .list_members(&f.regular, f.company.id)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);
}

#[tokio::test]
async fn test_retrieve_user_as_admin() {
    let f = TestFixture::new().await;
    let membership = f.membership_of(&f.employee).await;
    let details = f
        .ctx
        .members()
        .retrieve_member(&f.admin, f.company.id, membership.id)
        .await
        .unwrap();
    assert_eq!(details.user.id, f.employee.id);
    assert_eq!(details.role.id, f.employee_role.id);
}

#[tokio::test]
async fn test_membership_of_other_company_is_not_found() {
    let f = TestFixture::new().await;
    let second = f
        .ctx
        .companies()
        .create_company(&f.regular, NewCompany::new("Company 2", "Full Company 2"))
        .await
        .unwrap();
    let foreign = f
        .ctx
        .members()
        .list_members(&f.regular, second.id)
        .await
        .unwrap()
        .remove(0);

    let err = f
        .ctx
        .members()
        .retrieve_member(&f.admin, f.company.id, foreign.id)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);

    let err = f
        .ctx
        .members()
        .block(&f.admin, f.company.id, Uuid::now_v7())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_block_user_as_admin() {
    let f = TestFixture::new().await;
    let membership = f.membership_of(&f.employee).await;
    let status = f
        .ctx
        .members()
        .block(&f.admin, f.company.id, membership.id)
        .await
        .unwrap();
    assert_eq!(status, ActionStatus::success());
    assert!(f.membership_of(&f.employee).await.is_blocked);
}

#[tokio::test]
async fn test_block_owner() {
    let f = TestFixture::new().await;
    let membership = f.membership_of(&f.owner).await;
    let err = f
        .ctx
        .members()
        .block(&f.admin, f.company.id, membership.id)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert_eq!(
        err.to_body()["non_field_error"][0],
        "Cannot block the company owner"
    );
    assert!(!f.membership_of(&f.owner).await.is_blocked);
}

#[tokio::test]
async fn test_unblock_user_as_admin() {
    let f = TestFixture::new().await;
    f.block(&f.employee).await;
    let membership = f.membership_of(&f.employee).await;

    let status = f
        .ctx
        .members()
        .unblock(&f.admin, f.company.id, membership.id)
        .await
        .unwrap();
    assert_eq!(status.status, "success");
    assert!(!f.membership_of(&f.employee).await.is_blocked);
}

#[tokio::test]
async fn test_employee_cannot_block() {
    let f = TestFixture::new().await;
    let membership = f.membership_of(&f.admin).await;
    let err = f
        .ctx
        .members()
        .block(&f.employee, f.company.id, membership.id)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);
}

#[tokio::test]
async fn test_only_owner_manages_admins() {
    let f = TestFixture::new().await;
    let second_admin = f.register("second_admin").await;
    let membership = f.add_member(&second_admin, &f.admin_role).await;

    let err = f
        .ctx
        .members()
        .block(&f.admin, f.company.id, membership.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CompanyError::PermissionDenied(_)));

    f.ctx
        .members()
        .block(&f.owner, f.company.id, membership.id)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_change_role_as_admin() {
    let f = TestFixture::new().await;
    let membership = f.membership_of(&f.employee).await;
    let status = f
        .ctx
        .members()
        .change_role(&f.admin, f.company.id, membership.id, f.admin_role.id)
        .await
        .unwrap();
    assert_eq!(status, ActionStatus::success());
    assert_eq!(f.membership_of(&f.employee).await.role_id, f.admin_role.id);
}

#[tokio::test]
async fn test_change_role_to_owner() {
    let f = TestFixture::new().await;
    let membership = f.membership_of(&f.employee).await;
    let err = f
        .ctx
        .members()
        .change_role(&f.admin, f.company.id, membership.id, f.owner_role.id)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert!(err.to_body().get("non_field_error").is_some());
    assert_eq!(f.owner_count().await, 1);
}

#[tokio::test]
async fn test_change_role_of_owner() {
    let f = TestFixture::new().await;
    let membership = f.membership_of(&f.owner).await;
    let err = f
        .ctx
        .members()
        .change_role(&f.owner, f.company.id, membership.id, f.employee_role.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CompanyError::Conflict(_)));
    assert_eq!(f.owner_count().await, 1);
}

#[tokio::test]
async fn test_change_role_unknown_role() {
    let f = TestFixture::new().await;
    let membership = f.membership_of(&f.employee).await;
    let err = f
        .ctx
        .members()
        .change_role(&f.admin, f.company.id, membership.id, Uuid::now_v7())
        .await
        .unwrap_err();
    assert!(err.to_body().get("role").is_some());
}

#[tokio::test]
async fn test_delete_user_as_admin() {
    let f = TestFixture::new().await;
    let membership = f.membership_of(&f.employee).await;
    f.ctx
        .members()
        .remove_member(&f.admin, f.company.id, membership.id)
        .await
        .unwrap();

    let listed = f
        .ctx
        .members()
        .list_members(&f.owner, f.company.id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|m| m.id != membership.id));
}

#[tokio::test]
async fn test_delete_owner() {
    let f = TestFixture::new().await;
    let membership = f.membership_of(&f.owner).await;
    let err = f
        .ctx
        .members()
        .remove_member(&f.admin, f.company.id, membership.id)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert_eq!(
        err.to_body()["non_field_error"][0],
        "Cannot remove the company owner"
    );
    assert_eq!(f.owner_count().await, 1);
}

#[tokio::test]
async fn test_banned_company_rejects_member_changes() {
    let f = TestFixture::new().await;
    f.ctx
        .companies()
        .ban_company(&f.staff, f.company.id)
        .await
        .unwrap();
    let membership = f.membership_of(&f.employee).await;
    let err = f
        .ctx
        .members()
        .block(&f.owner, f.company.id, membership.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CompanyError::Conflict(_)));
}
