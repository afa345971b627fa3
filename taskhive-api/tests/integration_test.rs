/// Integration tests for the Taskhive API
///
/// These tests drive the real router end-to-end against a test database:
/// - Redirect-to-login for unauthenticated requests
/// - Task CRUD with redirect targets, search, and deadline validation
/// - Idempotent mark-done
/// - Team delete semantics (nullify, not cascade)
/// - Self profile update with membership replace
/// - Registration and login flows
///
/// Requires a running PostgreSQL database reachable via DATABASE_URL.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::TestContext;
use serde_json::json;
use taskhive_shared::models::task::Task;
use taskhive_shared::models::team::{CreateTeam, Team};
use taskhive_shared::models::worker::Worker;
use tower::Service as _;
use uuid::Uuid;

/// Unauthenticated requests to protected paths redirect to the login path
#[tokio::test]
async fn test_unauthenticated_request_redirects_to_login() {
    let ctx = TestContext::new().await.unwrap();

    for uri in ["/", "/list/", "/teams/", "/workers/"] {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = ctx.app.clone().call(request).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::SEE_OTHER,
            "{} should redirect",
            uri
        );
        assert_eq!(response.headers().get("location").unwrap(), "/login/");
    }

    ctx.cleanup().await.unwrap();
}

/// A garbage session cookie is rejected the same way
#[tokio::test]
async fn test_invalid_session_cookie_redirects_to_login() {
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/list/")
        .header("cookie", "taskhive_session=not-a-real-token")
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/login/");

    ctx.cleanup().await.unwrap();
}

/// Dashboard returns the five entity counts
#[tokio::test]
async fn test_dashboard_counts() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.app.clone().call(common::get_request(&ctx, "/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert!(body["num_workers"].as_i64().unwrap() >= 1);
    assert!(body["num_positions"].as_i64().unwrap() >= 1);
    assert!(body["num_tasks"].is_i64());
    assert!(body["num_completed_tasks"].is_i64());
    assert!(body["num_task_types"].is_i64());

    ctx.cleanup().await.unwrap();
}

/// Creating a task redirects to its detail path, which then serves it
#[tokio::test]
async fn test_create_task_redirects_to_detail() {
    let ctx = TestContext::new().await.unwrap();
    let task_type = common::create_test_task_type(&ctx).await.unwrap();
    let name = format!("Create {}", Uuid::new_v4());

    let request = common::post_json(
        &ctx,
        "/task_create/create/",
        json!({
            "name": name,
            "description": "integration test task",
            "deadline": "2030-01-01T00:00:00Z",
            "priority": "urgent",
            "task_type_id": task_type.id,
            "team_id": null
        }),
    );

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let location = response
        .headers()
        .get("location")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(location.starts_with("/task_detail/"));

    let response = ctx.app.clone().call(common::get_request(&ctx, &location)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["name"], json!(name));
    assert_eq!(body["priority"], "urgent");
    assert_eq!(body["priority_badge_class"], "priority-urgent");
    assert_eq!(body["task_type"]["id"], json!(task_type.id));

    taskhive_shared::models::task_type::TaskType::delete(&ctx.db, task_type.id)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

/// A past deadline is rejected with a field-level message and no row
#[tokio::test]
async fn test_create_task_with_past_deadline_rejected() {
    let ctx = TestContext::new().await.unwrap();
    let task_type = common::create_test_task_type(&ctx).await.unwrap();
    let name = format!("Past {}", Uuid::new_v4());

    let request = common::post_json(
        &ctx,
        "/task_create/create/",
        json!({
            "name": name,
            "deadline": "2020-01-01T00:00:00Z",
            "task_type_id": task_type.id,
            "team_id": null
        }),
    );

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "deadline");
    assert_eq!(body["details"][0]["message"], "Deadline cannot be in the past!");

    // No task row was created
    let count = Task::count_filtered(&ctx.db, Some(name.as_str())).await.unwrap();
    assert_eq!(count, 0);

    taskhive_shared::models::task_type::TaskType::delete(&ctx.db, task_type.id)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

/// Search filters the task list by substring
#[tokio::test]
async fn test_task_list_search() {
    let ctx = TestContext::new().await.unwrap();
    let task_type = common::create_test_task_type(&ctx).await.unwrap();
    let marker = Uuid::new_v4().to_string();

    common::create_test_task(&ctx, &format!("{} Task 1", marker), task_type.id, None)
        .await
        .unwrap();
    common::create_test_task(&ctx, &format!("{} Other", marker), task_type.id, None)
        .await
        .unwrap();

    let uri = format!("/list/?search={}%20Task", marker);
    let response = ctx.app.clone().call(common::get_request(&ctx, &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["tasks"].as_array().unwrap().len(), 1);
    assert!(body["tasks"][0]["name"].as_str().unwrap().ends_with("Task 1"));
    assert_eq!(body["page_size"], 8);

    let uri = format!("/list/?search={}%20Nope", marker);
    let response = ctx.app.clone().call(common::get_request(&ctx, &uri)).await.unwrap();
    let body = common::body_json(response).await;
    assert!(body["tasks"].as_array().unwrap().is_empty());
    assert_eq!(body["total"], 0);

    taskhive_shared::models::task_type::TaskType::delete(&ctx.db, task_type.id)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

/// Marking a task done is idempotent and always redirects to detail
#[tokio::test]
async fn test_mark_done_idempotent() {
    let ctx = TestContext::new().await.unwrap();
    let task_type = common::create_test_task_type(&ctx).await.unwrap();
    let task = common::create_test_task(&ctx, &format!("Done {}", Uuid::new_v4()), task_type.id, None)
        .await
        .unwrap();

    let uri = format!("/task/{}/done/", task.id);

    for _ in 0..2 {
        let response = ctx.app.clone().call(common::get_request(&ctx, &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap().to_str().unwrap(),
            format!("/task_detail/{}/", task.id)
        );
    }

    let found = Task::find_by_id(&ctx.db, task.id).await.unwrap().unwrap();
    assert!(found.is_complete);

    taskhive_shared::models::task_type::TaskType::delete(&ctx.db, task_type.id)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

/// Deleting a task redirects to the list and removes the row
#[tokio::test]
async fn test_delete_task() {
    let ctx = TestContext::new().await.unwrap();
    let task_type = common::create_test_task_type(&ctx).await.unwrap();
    let task = common::create_test_task(&ctx, &format!("Del {}", Uuid::new_v4()), task_type.id, None)
        .await
        .unwrap();

    let request = common::post_json(&ctx, &format!("/task_delete/{}/delete/", task.id), json!({}));
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/list/");

    assert!(Task::find_by_id(&ctx.db, task.id).await.unwrap().is_none());

    taskhive_shared::models::task_type::TaskType::delete(&ctx.db, task_type.id)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

/// Deleting a team via the API nullifies task references and keeps workers
#[tokio::test]
async fn test_delete_team_nullifies_tasks() {
    let ctx = TestContext::new().await.unwrap();
    let task_type = common::create_test_task_type(&ctx).await.unwrap();

    let team = Team::create(
        &ctx.db,
        CreateTeam {
            name: format!("Team {}", Uuid::new_v4()),
            description: String::new(),
            worker_ids: vec![ctx.worker.id],
        },
    )
    .await
    .unwrap();

    let task = common::create_test_task(
        &ctx,
        &format!("Teamed {}", Uuid::new_v4()),
        task_type.id,
        Some(team.id),
    )
    .await
    .unwrap();

    let request = common::post_json(&ctx, &format!("/teams/{}/delete/", team.id), json!({}));
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/teams/");

    let found = Task::find_by_id(&ctx.db, task.id).await.unwrap().unwrap();
    assert!(found.team_id.is_none());
    assert!(Worker::find_by_id(&ctx.db, ctx.worker.id).await.unwrap().is_some());

    taskhive_shared::models::task_type::TaskType::delete(&ctx.db, task_type.id)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

/// Profile update always targets the session's worker and replaces teams
#[tokio::test]
async fn test_profile_update_replaces_teams() {
    let ctx = TestContext::new().await.unwrap();

    let team_a = Team::create(
        &ctx.db,
        CreateTeam {
            name: format!("Team A {}", Uuid::new_v4()),
            description: String::new(),
            worker_ids: vec![ctx.worker.id],
        },
    )
    .await
    .unwrap();

    let team_b = Team::create(
        &ctx.db,
        CreateTeam {
            name: format!("Team B {}", Uuid::new_v4()),
            description: String::new(),
            worker_ids: vec![],
        },
    )
    .await
    .unwrap();

    let request = common::post_json(
        &ctx,
        "/workers/update/",
        json!({
            "username": ctx.worker.username,
            "email": ctx.worker.email,
            "first_name": "Updated",
            "last_name": ctx.worker.last_name,
            "position_id": ctx.position.id,
            "team_ids": [team_b.id]
        }),
    );

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/workers/");

    let team_ids = Worker::team_ids(&ctx.db, ctx.worker.id).await.unwrap();
    assert_eq!(team_ids, vec![team_b.id]);

    let worker = Worker::find_by_id(&ctx.db, ctx.worker.id).await.unwrap().unwrap();
    assert_eq!(worker.first_name, "Updated");

    Team::delete(&ctx.db, team_a.id).await.unwrap();
    Team::delete(&ctx.db, team_b.id).await.unwrap();
    ctx.cleanup().await.unwrap();
}

/// Worker list is paginated at 10
#[tokio::test]
async fn test_worker_list_page_size() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.app.clone().call(common::get_request(&ctx, "/workers/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["page_size"], 10);
    assert!(body["workers"].as_array().unwrap().len() <= 10);

    ctx.cleanup().await.unwrap();
}

/// Registration with mismatched passwords fails and creates no worker
#[tokio::test]
async fn test_register_mismatched_passwords_rejected() {
    let ctx = TestContext::new().await.unwrap();
    let username = format!("reg-{}", Uuid::new_v4());

    let request = common::post_json_anonymous(
        "/register/",
        json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "first_name": "Reg",
            "last_name": "Istrant",
            "position_id": ctx.position.id,
            "password": "Sup3rSecret",
            "password_confirm": "D1fferentSecret"
        }),
    );

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = common::body_json(response).await;
    assert_eq!(body["details"][0]["field"], "password_confirm");

    assert!(Worker::find_by_username(&ctx.db, &username).await.unwrap().is_none());

    ctx.cleanup().await.unwrap();
}

/// Registration with a weak password fails and creates no worker
#[tokio::test]
async fn test_register_weak_password_rejected() {
    let ctx = TestContext::new().await.unwrap();
    let username = format!("reg-{}", Uuid::new_v4());

    let request = common::post_json_anonymous(
        "/register/",
        json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "first_name": "Reg",
            "last_name": "Istrant",
            "position_id": ctx.position.id,
            "password": "alllowercase",
            "password_confirm": "alllowercase"
        }),
    );

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = common::body_json(response).await;
    assert_eq!(body["details"][0]["field"], "password");

    assert!(Worker::find_by_username(&ctx.db, &username).await.unwrap().is_none());

    ctx.cleanup().await.unwrap();
}

/// Registration creates the worker, sets the session cookie, and the
/// session then authenticates requests
#[tokio::test]
async fn test_register_establishes_session() {
    let ctx = TestContext::new().await.unwrap();
    let username = format!("reg-{}", Uuid::new_v4());

    let request = common::post_json_anonymous(
        "/register/",
        json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "first_name": "Reg",
            "last_name": "Istrant",
            "position_id": ctx.position.id,
            "password": "Sup3rSecret",
            "password_confirm": "Sup3rSecret"
        }),
    );

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/");

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .expect("Registration should set the session cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("taskhive_session="));

    // The minted session authenticates a protected request
    let cookie = set_cookie.split(';').next().unwrap().to_string();
    let request = Request::builder()
        .method("GET")
        .uri("/")
        .header("cookie", cookie)
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let worker = Worker::find_by_username(&ctx.db, &username).await.unwrap();
    assert!(worker.is_some());

    Worker::delete(&ctx.db, worker.unwrap().id).await.unwrap();
    ctx.cleanup().await.unwrap();
}

/// Duplicate username at registration surfaces as a conflict
#[tokio::test]
async fn test_register_duplicate_username_conflict() {
    let ctx = TestContext::new().await.unwrap();

    let request = common::post_json_anonymous(
        "/register/",
        json!({
            "username": ctx.worker.username,
            "email": format!("unused-{}@example.com", Uuid::new_v4()),
            "first_name": "Dup",
            "last_name": "Licate",
            "position_id": ctx.position.id,
            "password": "Sup3rSecret",
            "password_confirm": "Sup3rSecret"
        }),
    );

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = common::body_json(response).await;
    assert_eq!(body["message"], "Username already exists");

    ctx.cleanup().await.unwrap();
}

/// Login verifies credentials and mints a working session
#[tokio::test]
async fn test_login_flow() {
    let ctx = TestContext::new().await.unwrap();

    // Wrong password
    let request = common::post_json_anonymous(
        "/login/",
        json!({
            "username": ctx.worker.username,
            "password": "WrongPassword1"
        }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Correct password
    let request = common::post_json_anonymous(
        "/login/",
        json!({
            "username": ctx.worker.username,
            "password": common::TEST_PASSWORD
        }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/");
    assert!(response.headers().contains_key("set-cookie"));

    // last_login_at is stamped
    let worker = Worker::find_by_id(&ctx.db, ctx.worker.id).await.unwrap().unwrap();
    assert!(worker.last_login_at.is_some());

    ctx.cleanup().await.unwrap();
}

/// Logout clears the cookie and redirects to login
#[tokio::test]
async fn test_logout_clears_session() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.app.clone().call(common::get_request(&ctx, "/logout/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/login/");

    let set_cookie = response.headers().get("set-cookie").unwrap().to_str().unwrap();
    assert!(set_cookie.contains("Max-Age=0"));

    ctx.cleanup().await.unwrap();
}

/// Health check is public
#[tokio::test]
async fn test_health_check_public() {
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");

    ctx.cleanup().await.unwrap();
}

/// Unknown ids yield 404
#[tokio::test]
async fn test_missing_task_is_not_found() {
    let ctx = TestContext::new().await.unwrap();

    let uri = format!("/task_detail/{}/", Uuid::new_v4());
    let response = ctx.app.clone().call(common::get_request(&ctx, &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}
