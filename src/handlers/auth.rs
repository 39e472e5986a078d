use actix_web::{web, HttpRequest, HttpResponse};
use lazy_static::lazy_static;
use moka::sync::Cache;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

use crate::config;
use crate::db;
use crate::errors::AppError;
use crate::models::user::NewUser;
use crate::utils::jwt;
use crate::utils::validation::{validate_gender, validate_fitness_goal, validate_payload, validate_preferred_exercises};

lazy_static! {
    static ref USERNAME_CACHE: Cache<String, bool> = Cache::new(10_000);
}

/// Drops all process-local lookup caches. Wired to the admin cache-clear
/// maintenance action.
pub fn clear_caches() {
    USERNAME_CACHE.invalidate_all();
}

#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Username cannot be empty"))]
    username: String,

    #[validate(length(min = 1, message = "Password cannot be empty"))]
    password: String,

    #[validate(range(min = 1, max = 120, message = "Age must be between 1 and 120"))]
    age: i64,

    gender: String,
    fitness_goal: String,

    #[serde(default)]
    preferred_exercises: Vec<String>,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    username: String,
    password: String,
    landing_tab: String,
}

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username cannot be empty"))]
    username: String,

    #[validate(length(min = 1, message = "Password cannot be empty"))]
    password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    user_id: String,
    username: String,
    token: String,
    landing_page: String,
}

#[derive(Serialize)]
pub struct AdminLoginResponse {
    username: String,
    token: String,
    landing_page: String,
}

// POST /v1/register
pub async fn register(
    req: web::Json<RegisterRequest>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*req)?;
    validate_gender(&req.gender)?;
    validate_fitness_goal(&req.fitness_goal)?;
    validate_preferred_exercises(&req.preferred_exercises)?;

    if USERNAME_CACHE.get(&req.username).is_some() {
        return Err(AppError::Conflict("Username already exists".to_string()));
    }

    let existing = db::find_user_by_name(&pool, &req.username).await?;
    if existing.is_some() {
        USERNAME_CACHE.insert(req.username.clone(), true);
        return Err(AppError::Conflict("Username already exists".to_string()));
    }

    // Passwords are stored verbatim to stay compatible with the system
    // this replaces. Do not reuse real credentials against this service.
    let user = NewUser {
        user_id: Uuid::new_v4().to_string(),
        username: req.username.clone(),
        password: req.password.clone(),
        age: req.age,
        gender: req.gender.clone(),
        fitness_goal: req.fitness_goal.clone(),
        preferred_exercise: req.preferred_exercises.join(","),
    };

    // A UNIQUE violation from a concurrent registration converts to the
    // same duplicate-name conflict the cache check produces.
    db::create_user(&pool, &user).await?;

    USERNAME_CACHE.insert(req.username.clone(), true);

    // The client pre-fills the login form with the fresh credentials and
    // switches to the login tab.
    Ok(HttpResponse::Created().json(RegisterResponse {
        username: req.username.clone(),
        password: req.password.clone(),
        landing_tab: "login".to_string(),
    }))
}

// POST /v1/login
pub async fn login(
    req: web::Json<LoginRequest>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*req)?;

    let user = db::find_user_by_name(&pool, &req.username).await?;

    // Plaintext comparison, same message for unknown user and bad password.
    let user = match user {
        Some(user) if user.password == req.password => user,
        _ => return Err(AppError::Unauthorized("Invalid username or password".to_string())),
    };

    let token = jwt::generate_token(&user.user_id, &user.username, false, config::USER_LANDING_PAGE)
        .map_err(|_| AppError::Internal("Token generation failed".to_string()))?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        user_id: user.user_id,
        username: user.username,
        token,
        landing_page: config::USER_LANDING_PAGE.to_string(),
    }))
}

// POST /v1/admin/login
pub async fn admin_login(req: web::Json<LoginRequest>) -> Result<HttpResponse, AppError> {
    validate_payload(&*req)?;

    if req.username != config::admin_username() || req.password != config::admin_password() {
        return Err(AppError::Unauthorized("Invalid admin credentials".to_string()));
    }

    let token = jwt::generate_token("admin", &req.username, true, config::ADMIN_LANDING_PAGE)
        .map_err(|_| AppError::Internal("Token generation failed".to_string()))?;

    Ok(HttpResponse::Ok().json(AdminLoginResponse {
        username: req.username.clone(),
        token,
        landing_page: config::ADMIN_LANDING_PAGE.to_string(),
    }))
}

// POST /v1/logout
pub async fn logout(req: HttpRequest) -> Result<HttpResponse, AppError> {
    let claims = jwt::claims_from_request(&req)?;
    // Session tokens are stateless; logging out is the client discarding
    // the token. The endpoint exists so the UI has a definite transition.
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("{} logged out", claims.username)
    })))
}
