use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use validator::Validate;

use crate::db;
use crate::errors::AppError;
use crate::models::user::User;
use crate::utils::jwt;
use crate::utils::validation::{validate_gender, validate_fitness_goal, validate_payload, validate_preferred_exercises};

#[derive(Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(range(min = 1, max = 120, message = "Age must be between 1 and 120"))]
    age: i64,

    gender: String,
    fitness_goal: String,

    #[serde(default)]
    preferred_exercises: Vec<String>,
}

#[derive(Serialize)]
struct ProfileResponse {
    user_id: String,
    username: String,
    age: i64,
    gender: String,
    fitness_goal: String,
    preferred_exercises: Vec<String>,
    created_at: String,
}

impl ProfileResponse {
    fn from_user(user: &User) -> Self {
        ProfileResponse {
            user_id: user.user_id.clone(),
            username: user.username.clone(),
            age: user.age,
            gender: user.gender.clone(),
            fitness_goal: user.fitness_goal.clone(),
            preferred_exercises: user.preferred_exercises(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

// GET /v1/profile
pub async fn get_profile(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let claims = jwt::claims_from_request(&req)?;

    let user = db::find_user_by_id(&pool, &claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ProfileResponse::from_user(&user)))
}

// PATCH /v1/profile
pub async fn update_profile(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
    updates: web::Json<ProfileUpdate>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*updates)?;
    validate_gender(&updates.gender)?;
    validate_fitness_goal(&updates.fitness_goal)?;
    validate_preferred_exercises(&updates.preferred_exercises)?;

    let claims = jwt::claims_from_request(&req)?;

    // Username is immutable; only the demographic fields are editable.
    sqlx::query(
        r"
        UPDATE users
        SET age = $1, gender = $2, fitness_goal = $3, preferred_exercise = $4
        WHERE user_id = $5
        ",
    )
    .bind(updates.age)
    .bind(&updates.gender)
    .bind(&updates.fitness_goal)
    .bind(updates.preferred_exercises.join(","))
    .bind(&claims.sub)
    .execute(pool.get_ref())
    .await?;

    let user = db::find_user_by_id(&pool, &claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ProfileResponse::from_user(&user)))
}
