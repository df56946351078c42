//! Integration tests for project CRUD, the ownership guard, and cascade
//! deletion.

use sqlx::PgPool;

use scopematter_core::error::CoreError;
use scopematter_core::status::ProjectStatus;
use scopematter_core::types::DbId;
use scopematter_db::models::client::{CreateClient, UpdateClient};
use scopematter_db::models::project::{CreateProject, UpdateProject};
use scopematter_db::models::request::CreateRequest;
use scopematter_db::models::scope_item::CreateScopeItem;
use scopematter_db::models::share_link::CreateShareLink;
use scopematter_db::models::user::UpsertUser;
use scopematter_db::repositories::{
    ProjectRepo, RequestRepo, ScopeItemRepo, ShareLinkRepo, UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, external_id: &str) -> DbId {
    UserRepo::upsert(
        pool,
        &UpsertUser {
            external_id: external_id.to_string(),
            email: None,
            username: None,
            first_name: None,
            last_name: None,
            image_url: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn new_project(name: &str, client_name: &str) -> CreateProject {
    CreateProject {
        name: name.to_string(),
        description: Some("A test project".to_string()),
        client: CreateClient {
            name: client_name.to_string(),
            email: Some("client@example.com".to_string()),
            company: None,
        },
    }
}

// ---------------------------------------------------------------------------
// Test: Creation and the ownership guard
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_create_project_with_client(pool: PgPool) {
    let user = seed_user(&pool, "user_a").await;

    let project = ProjectRepo::create(&pool, user, &new_project("Website", "Acme"))
        .await
        .unwrap();

    assert_eq!(project.user_id, user);
    assert_eq!(project.status_id, ProjectStatus::Pending.id());

    let detail = ProjectRepo::detail(&pool, project.id, user).await.unwrap();
    assert_eq!(detail.client.name, "Acme");
    assert_eq!(detail.client.email.as_deref(), Some("client@example.com"));
}

#[sqlx::test]
async fn test_find_owned_hides_foreign_projects(pool: PgPool) {
    let owner = seed_user(&pool, "user_a").await;
    let intruder = seed_user(&pool, "user_b").await;
    let project = ProjectRepo::create(&pool, owner, &new_project("Website", "Acme"))
        .await
        .unwrap();

    // Owned: found.
    assert!(ProjectRepo::find_owned(&pool, project.id, owner)
        .await
        .unwrap()
        .is_some());

    // Foreign and missing are indistinguishable.
    assert!(ProjectRepo::find_owned(&pool, project.id, intruder)
        .await
        .unwrap()
        .is_none());
    assert!(ProjectRepo::find_owned(&pool, 999_999, owner)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test]
async fn test_detail_for_foreign_project_reports_not_found(pool: PgPool) {
    let owner = seed_user(&pool, "user_a").await;
    let intruder = seed_user(&pool, "user_b").await;
    let project = ProjectRepo::create(&pool, owner, &new_project("Website", "Acme"))
        .await
        .unwrap();

    let result = ProjectRepo::detail(&pool, project.id, intruder).await;
    assert_eq!(
        result.unwrap_err().as_domain(),
        Some(CoreError::ProjectNotFound)
    );
}

#[sqlx::test]
async fn test_list_is_scoped_per_user(pool: PgPool) {
    let user_a = seed_user(&pool, "user_a").await;
    let user_b = seed_user(&pool, "user_b").await;
    ProjectRepo::create(&pool, user_a, &new_project("A1", "Acme"))
        .await
        .unwrap();
    ProjectRepo::create(&pool, user_a, &new_project("A2", "Acme"))
        .await
        .unwrap();
    ProjectRepo::create(&pool, user_b, &new_project("B1", "Beta"))
        .await
        .unwrap();

    assert_eq!(
        ProjectRepo::list_for_user(&pool, user_a).await.unwrap().len(),
        2
    );
    assert_eq!(
        ProjectRepo::list_for_user(&pool, user_b).await.unwrap().len(),
        1
    );
}

// ---------------------------------------------------------------------------
// Test: Updates
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_update_project_and_nested_client(pool: PgPool) {
    let user = seed_user(&pool, "user_a").await;
    let project = ProjectRepo::create(&pool, user, &new_project("Website", "Acme"))
        .await
        .unwrap();

    let updated = ProjectRepo::update(
        &pool,
        project.id,
        user,
        &UpdateProject {
            name: Some("Website v2".to_string()),
            description: None,
            status_id: Some(ProjectStatus::InProgress.id()),
            client: Some(UpdateClient {
                name: None,
                email: None,
                company: Some("Acme Corp".to_string()),
            }),
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.name, "Website v2");
    // Untouched fields keep their prior values.
    assert_eq!(updated.description.as_deref(), Some("A test project"));
    assert_eq!(updated.status_id, ProjectStatus::InProgress.id());

    let detail = ProjectRepo::detail(&pool, project.id, user).await.unwrap();
    assert_eq!(detail.client.name, "Acme");
    assert_eq!(detail.client.company.as_deref(), Some("Acme Corp"));
}

// ---------------------------------------------------------------------------
// Test: Cascade deletion
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_delete_cascades_to_children(pool: PgPool) {
    let user = seed_user(&pool, "user_a").await;
    let project = ProjectRepo::create(&pool, user, &new_project("Website", "Acme"))
        .await
        .unwrap();
    ScopeItemRepo::create(
        &pool,
        project.id,
        user,
        &CreateScopeItem {
            name: "Landing page".to_string(),
            description: "Five sections".to_string(),
        },
    )
    .await
    .unwrap();
    RequestRepo::create(
        &pool,
        project.id,
        user,
        &CreateRequest {
            description: "Add CSV export".to_string(),
        },
    )
    .await
    .unwrap();
    let (link, _token) = ShareLinkRepo::create(
        &pool,
        project.id,
        user,
        &CreateShareLink {
            expires_at: None,
            show_scope_items: None,
            show_requests: None,
            show_change_orders: None,
        },
    )
    .await
    .unwrap();

    ProjectRepo::delete(&pool, project.id, user).await.unwrap();

    assert!(ProjectRepo::find_owned(&pool, project.id, user)
        .await
        .unwrap()
        .is_none());
    assert!(ScopeItemRepo::list_for_project(&pool, project.id)
        .await
        .unwrap()
        .is_empty());
    assert!(RequestRepo::list_for_project(&pool, project.id)
        .await
        .unwrap()
        .is_empty());
    assert!(ShareLinkRepo::find_by_token_hash(&pool, &link.token_hash)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test]
async fn test_delete_foreign_project_reports_not_found(pool: PgPool) {
    let owner = seed_user(&pool, "user_a").await;
    let intruder = seed_user(&pool, "user_b").await;
    let project = ProjectRepo::create(&pool, owner, &new_project("Website", "Acme"))
        .await
        .unwrap();

    let result = ProjectRepo::delete(&pool, project.id, intruder).await;
    assert_eq!(
        result.unwrap_err().as_domain(),
        Some(CoreError::ProjectNotFound)
    );

    // Still there for the owner.
    assert!(ProjectRepo::find_owned(&pool, project.id, owner)
        .await
        .unwrap()
        .is_some());
}

// ---------------------------------------------------------------------------
// Test: Scope items
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_scope_item_scoped_write_reports_not_found(pool: PgPool) {
    let user = seed_user(&pool, "user_a").await;
    let project_a = ProjectRepo::create(&pool, user, &new_project("A", "Acme"))
        .await
        .unwrap();
    let project_b = ProjectRepo::create(&pool, user, &new_project("B", "Beta"))
        .await
        .unwrap();
    let item = ScopeItemRepo::create(
        &pool,
        project_a.id,
        user,
        &CreateScopeItem {
            name: "Landing page".to_string(),
            description: "Five sections".to_string(),
        },
    )
    .await
    .unwrap();

    // The item exists, but not under project B; the scoped delete touches
    // zero rows.
    let result = ScopeItemRepo::delete(&pool, item.id, project_b.id, user).await;
    assert_eq!(
        result.unwrap_err().as_domain(),
        Some(CoreError::ScopeItemNotFound)
    );
}
