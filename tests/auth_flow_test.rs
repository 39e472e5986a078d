use actix_web::{test, web, App};
use serde_json::{json, Value};

use fittrack_backend::app_config;

mod common;

#[actix_web::test]
async fn register_creates_user_and_default_settings() {
    common::init_env();
    let pool = common::setup_pool().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .configure(app_config),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/v1/register")
        .set_json(json!({
            "username": "bob",
            "password": "secret",
            "age": 28,
            "gender": "男",
            "fitness_goal": "增肌",
            "preferred_exercises": ["力量训练", "跑步"]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "bob");
    assert_eq!(body["password"], "secret");
    assert_eq!(body["landing_tab"], "login");

    let (users,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(users, 1);

    let (daily, weekly, reminder): (i64, i64, String) = sqlx::query_as(
        "SELECT daily_exercise_goal, weekly_exercise_goal, reminder_time FROM user_settings",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!((daily, weekly, reminder.as_str()), (30, 3, "08:00"));
}

#[actix_web::test]
async fn duplicate_registration_is_rejected() {
    common::init_env();
    let pool = common::setup_pool().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .configure(app_config),
    )
    .await;

    let payload = json!({
        "username": "carol",
        "password": "pw",
        "age": 30,
        "gender": "女",
        "fitness_goal": "减重",
        "preferred_exercises": ["瑜伽"]
    });

    let resp = test::call_service(
        &app,
        test::TestRequest::post().uri("/v1/register").set_json(&payload).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);

    let resp = test::call_service(
        &app,
        test::TestRequest::post().uri("/v1/register").set_json(&payload).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 409);

    let (users,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(users, 1);
}

#[actix_web::test]
async fn empty_credentials_are_rejected() {
    common::init_env();
    let pool = common::setup_pool().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .configure(app_config),
    )
    .await;

    for payload in [
        json!({"username": "", "password": "pw", "age": 30, "gender": "男", "fitness_goal": "减重"}),
        json!({"username": "dora", "password": "", "age": 30, "gender": "男", "fitness_goal": "减重"}),
    ] {
        let resp = test::call_service(
            &app,
            test::TestRequest::post().uri("/v1/register").set_json(&payload).to_request(),
        )
        .await;
        assert_eq!(resp.status(), 400);
    }

    let (users,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(users, 0);
}

#[actix_web::test]
async fn login_succeeds_with_registered_credentials_and_rejects_bad_ones() {
    common::init_env();
    let pool = common::setup_pool().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .configure(app_config),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/v1/register")
            .set_json(json!({
                "username": "alice",
                "password": "pw1",
                "age": 30,
                "gender": "女",
                "fitness_goal": "减重",
                "preferred_exercises": ["跑步"]
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/v1/login")
            .set_json(json!({"username": "alice", "password": "pw1"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "alice");
    assert_eq!(body["landing_page"], "recommendations");
    assert!(!body["token"].as_str().unwrap().is_empty());

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/v1/login")
            .set_json(json!({"username": "alice", "password": "wrong"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 401);

    // The failed attempt changed nothing; the good password still works.
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/v1/login")
            .set_json(json!({"username": "alice", "password": "pw1"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    let token = body["token"].as_str().unwrap();

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/v1/logout")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let resp = test::call_service(
        &app,
        test::TestRequest::post().uri("/v1/logout").to_request(),
    )
    .await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn admin_login_uses_the_static_credential_pair() {
    common::init_env();
    let pool = common::setup_pool().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .configure(app_config),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/v1/admin/login")
            .set_json(json!({"username": "admin", "password": "admin888"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["landing_page"], "user_management");
    assert!(!body["token"].as_str().unwrap().is_empty());

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/v1/admin/login")
            .set_json(json!({"username": "admin", "password": "nope"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 401);
}
