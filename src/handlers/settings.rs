use actix_web::{web, HttpRequest, HttpResponse};
use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::models::user::UserSettings;
use crate::utils::jwt;

// GET /v1/settings
pub async fn get_settings(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let claims = jwt::claims_from_request(&req)?;

    let settings = sqlx::query_as::<_, UserSettings>(
        "SELECT * FROM user_settings WHERE user_id = $1",
    )
    .bind(&claims.sub)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| AppError::NotFound("Settings not found".to_string()))?;

    Ok(HttpResponse::Ok().json(settings))
}
