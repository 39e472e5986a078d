use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use validator::Validate;

use crate::errors::AppError;
use crate::handlers::auth;
use crate::ml::{self, TrainError, TrainingRow};
use crate::models::user::User;
use crate::utils::jwt::{self, Claims};
use crate::utils::validation::validate_payload;

fn require_admin(claims: &Claims) -> Result<(), AppError> {
    if !claims.is_admin {
        return Err(AppError::Forbidden("Administrator access required".to_string()));
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RosterEntry {
    user_id: String,
    username: String,
    age: i64,
    gender: String,
    fitness_goal: String,
    preferred_exercises: Vec<String>,
    created_at: String,
    record_count: i64,
    total_duration: i64,
    last_exercise_date: Option<NaiveDate>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyticsResponse {
    has_data: bool,
    daily: Vec<DailyTypeCount>,
    top_users: Vec<UserScore>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DailyTypeCount {
    date: NaiveDate,
    exercise_type: String,
    count: i64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserScore {
    username: String,
    score: f64,
    total_duration: i64,
    total_calories: f64,
}

/// Weighted ranking over per-user (duration, calories) totals:
/// 0.5·duration/max_duration + 0.5·calories/max_calories, top 3, ties
/// broken by username ascending. A zero maximum contributes nothing
/// rather than dividing by zero.
pub(crate) fn rank_users(totals: &[(String, i64, f64)]) -> Vec<UserScore> {
    let max_duration = totals.iter().map(|(_, d, _)| *d).max().unwrap_or(0);
    let max_calories = totals.iter().map(|(_, _, c)| *c).fold(0.0_f64, f64::max);

    let mut scored: Vec<UserScore> = totals
        .iter()
        .map(|(username, duration, calories)| {
            let duration_part = if max_duration > 0 {
                *duration as f64 / max_duration as f64
            } else {
                0.0
            };
            let calorie_part = if max_calories > 0.0 {
                calories / max_calories
            } else {
                0.0
            };
            UserScore {
                username: username.clone(),
                score: 0.5 * duration_part + 0.5 * calorie_part,
                total_duration: *duration,
                total_calories: *calories,
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.username.cmp(&b.username))
    });
    scored.truncate(3);
    scored
}

// GET /v1/admin/users
pub async fn get_users(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let claims = jwt::claims_from_request(&req)?;
    require_admin(&claims)?;

    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at")
        .fetch_all(pool.get_ref())
        .await?;

    // One aggregate query per roster row.
    let mut roster = Vec::with_capacity(users.len());
    for user in users {
        let (record_count, total_duration, last_exercise_date) =
            sqlx::query_as::<_, (i64, i64, Option<NaiveDate>)>(
                r"
                SELECT COUNT(*), COALESCE(SUM(duration), 0), MAX(date)
                FROM exercise_records
                WHERE user_id = $1
                ",
            )
            .bind(&user.user_id)
            .fetch_one(pool.get_ref())
            .await?;

        roster.push(RosterEntry {
            preferred_exercises: user.preferred_exercises(),
            user_id: user.user_id,
            username: user.username,
            age: user.age,
            gender: user.gender,
            fitness_goal: user.fitness_goal,
            created_at: user.created_at.to_rfc3339(),
            record_count,
            total_duration,
            last_exercise_date,
        });
    }

    Ok(HttpResponse::Ok().json(roster))
}

// GET /v1/admin/analytics
pub async fn get_analytics(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let claims = jwt::claims_from_request(&req)?;
    require_admin(&claims)?;

    let window_start = (Utc::now() - Duration::days(10)).date_naive();

    let daily = sqlx::query_as::<_, (NaiveDate, String, i64)>(
        r"
        SELECT er.date, er.exercise_type, COUNT(*)
        FROM exercise_records er
        JOIN users u ON er.user_id = u.user_id
        WHERE er.date >= $1
        GROUP BY er.date, er.exercise_type
        ORDER BY er.date
        ",
    )
    .bind(window_start)
    .fetch_all(pool.get_ref())
    .await?;

    let totals = sqlx::query_as::<_, (String, i64, f64)>(
        r"
        SELECT u.username, SUM(er.duration), SUM(er.calories_burned)
        FROM exercise_records er
        JOIN users u ON er.user_id = u.user_id
        WHERE er.date >= $1
        GROUP BY u.username
        ",
    )
    .bind(window_start)
    .fetch_all(pool.get_ref())
    .await?;

    let has_data = !daily.is_empty();
    Ok(HttpResponse::Ok().json(AnalyticsResponse {
        has_data,
        daily: daily
            .into_iter()
            .map(|(date, exercise_type, count)| DailyTypeCount { date, exercise_type, count })
            .collect(),
        top_users: rank_users(&totals),
    }))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RetrainRequest {
    #[validate(range(min = 10, max = 200, message = "Tree count must be between 10 and 200"))]
    n_estimators: i64,

    #[validate(range(min = 3, max = 20, message = "Max depth must be between 3 and 20"))]
    max_depth: i64,

    #[validate(range(min = 2, max = 10, message = "Min samples split must be between 2 and 10"))]
    min_samples_split: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RetrainResponse {
    message: String,
    rows_used: usize,
    mean_squared_error: f64,
    n_estimators: i64,
    max_depth: i64,
    min_samples_split: i64,
}

// POST /v1/admin/model/retrain
pub async fn retrain_model(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
    payload: web::Json<RetrainRequest>,
) -> Result<HttpResponse, AppError> {
    let claims = jwt::claims_from_request(&req)?;
    require_admin(&claims)?;
    validate_payload(&*payload)?;

    let rows = sqlx::query_as::<_, (i64, String, i64, String, f64)>(
        r"
        SELECT u.age, u.gender, er.duration, er.intensity, er.calories_burned
        FROM exercise_records er
        JOIN users u ON er.user_id = u.user_id
        ",
    )
    .fetch_all(pool.get_ref())
    .await?;

    let training: Vec<TrainingRow> = rows
        .into_iter()
        .map(|(age, gender, duration, intensity, calories_burned)| TrainingRow {
            age,
            gender,
            duration,
            intensity,
            calories_burned,
        })
        .collect();

    // No fit and no audit row unless training succeeds.
    let report = ml::fit_calorie_model(&training).map_err(|e| match e {
        TrainError::InsufficientData { .. } => AppError::BadRequest(e.to_string()),
        TrainError::Fit(_) => AppError::Internal(e.to_string()),
    })?;

    sqlx::query(
        r"
        INSERT INTO model_params (n_estimators, max_depth, min_samples_split, updated_at)
        VALUES ($1, $2, $3, $4)
        ",
    )
    .bind(payload.n_estimators)
    .bind(payload.max_depth)
    .bind(payload.min_samples_split)
    .bind(Utc::now())
    .execute(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(RetrainResponse {
        message: "Model trained successfully".to_string(),
        rows_used: report.rows_used,
        mean_squared_error: report.mean_squared_error,
        n_estimators: payload.n_estimators,
        max_depth: payload.max_depth,
        min_samples_split: payload.min_samples_split,
    }))
}

// POST /v1/admin/maintenance/backup
pub async fn backup_database(req: HttpRequest) -> Result<HttpResponse, AppError> {
    let claims = jwt::claims_from_request(&req)?;
    require_admin(&claims)?;

    // The system this replaces acknowledged without copying anything; the
    // action stays a stub until a real backup target exists.
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Database backup completed"
    })))
}

// POST /v1/admin/maintenance/cache-clear
pub async fn clear_cache(req: HttpRequest) -> Result<HttpResponse, AppError> {
    let claims = jwt::claims_from_request(&req)?;
    require_admin(&claims)?;

    auth::clear_caches();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Cache cleared"
    })))
}

#[derive(Deserialize)]
pub struct ShutdownRequest {
    #[serde(default)]
    reason: String,
}

// POST /v1/admin/maintenance/shutdown
pub async fn shutdown_system(
    req: HttpRequest,
    payload: web::Json<ShutdownRequest>,
) -> Result<HttpResponse, AppError> {
    let claims = jwt::claims_from_request(&req)?;
    require_admin(&claims)?;

    if payload.reason.trim().is_empty() {
        return Err(AppError::BadRequest("A shutdown reason is required".to_string()));
    }

    // Deliberate no-op: the action only records intent in the response.
    log::warn!("Shutdown requested by {}: {}", claims.username, payload.reason);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "System shutdown acknowledged",
        "reason": payload.reason
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(rows: &[(&str, i64, f64)]) -> Vec<(String, i64, f64)> {
        rows.iter()
            .map(|(name, d, c)| (name.to_string(), *d, *c))
            .collect()
    }

    #[test]
    fn ranking_returns_at_most_three_entries() {
        let rows = totals(&[
            ("a", 100, 500.0),
            ("b", 80, 400.0),
            ("c", 60, 300.0),
            ("d", 40, 200.0),
        ]);
        let top = rank_users(&rows);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].username, "a");
        assert_eq!(top[1].username, "b");
        assert_eq!(top[2].username, "c");
        assert!((top[0].score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn no_excluded_user_outscores_an_included_one() {
        // max duration 100, max calories 500
        // a: 0.05 + 0.50 = 0.55, b: 0.50 + 0.05 = 0.55,
        // c: 0.25 + 0.25 = 0.50, d: 0.45 + 0.45 = 0.90
        let rows = totals(&[
            ("a", 10, 500.0),
            ("b", 100, 50.0),
            ("c", 50, 250.0),
            ("d", 90, 450.0),
        ]);
        let top = rank_users(&rows);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].username, "d");
        assert_eq!(top[1].username, "a");
        assert_eq!(top[2].username, "b");
        let cutoff = top.last().unwrap().score;
        assert!(0.50 <= cutoff);
    }

    #[test]
    fn ties_break_by_username_ascending() {
        let rows = totals(&[
            ("zoe", 100, 500.0),
            ("amy", 100, 500.0),
            ("max", 100, 500.0),
            ("bob", 100, 500.0),
        ]);
        let top = rank_users(&rows);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].username, "amy");
        assert_eq!(top[1].username, "bob");
        assert_eq!(top[2].username, "max");
    }

    #[test]
    fn zero_maxima_do_not_divide_by_zero() {
        let rows = totals(&[("a", 0, 0.0), ("b", 0, 0.0)]);
        let top = rank_users(&rows);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].score, 0.0);
    }

    #[test]
    fn fewer_than_three_users_rank_without_padding() {
        let rows = totals(&[("solo", 60, 300.0)]);
        let top = rank_users(&rows);
        assert_eq!(top.len(), 1);
        assert!((top[0].score - 1.0).abs() < 1e-9);
    }
}
