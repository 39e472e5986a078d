use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{Duration, NaiveDate, Utc};
use rand::Rng;
use serde::Deserialize;
use sqlx::SqlitePool;
use validator::Validate;

use crate::config;
use crate::errors::AppError;
use crate::models::record::ExerciseRecord;
use crate::utils::jwt;
use crate::utils::validation::{validate_exercise_type, validate_intensity, validate_payload};

const GENERATED_NOTE: &str = "自动生成的记录";

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordRequest {
    exercise_type: String,

    #[validate(range(min = 1, message = "Duration must be at least 1 minute"))]
    duration: i64,

    intensity: String,

    #[validate(range(min = 0.0, message = "Calories cannot be negative"))]
    calories_burned: f64,

    #[serde(default)]
    notes: String,

    date: NaiveDate,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetRecordsQuery {
    limit: Option<i64>,
    offset: Option<i64>,
    exercise_type: Option<String>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
}

async fn insert_record(
    pool: &SqlitePool,
    user_id: &str,
    exercise_type: &str,
    duration: i64,
    intensity: &str,
    calories_burned: f64,
    notes: &str,
    date: NaiveDate,
) -> Result<ExerciseRecord, AppError> {
    let result = sqlx::query(
        r"
        INSERT INTO exercise_records
            (user_id, exercise_type, duration, intensity, calories_burned, notes, date)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ",
    )
    .bind(user_id)
    .bind(exercise_type)
    .bind(duration)
    .bind(intensity)
    .bind(calories_burned)
    .bind(notes)
    .bind(date)
    .execute(pool)
    .await?;

    Ok(ExerciseRecord {
        record_id: result.last_insert_rowid(),
        user_id: user_id.to_string(),
        exercise_type: exercise_type.to_string(),
        duration,
        intensity: intensity.to_string(),
        calories_burned,
        notes: notes.to_string(),
        date,
    })
}

// POST /v1/records
pub async fn create_record(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
    payload: web::Json<RecordRequest>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*payload)?;
    validate_exercise_type(&payload.exercise_type)?;
    validate_intensity(&payload.intensity)?;

    let claims = jwt::claims_from_request(&req)?;

    let record = insert_record(
        &pool,
        &claims.sub,
        &payload.exercise_type,
        payload.duration,
        &payload.intensity,
        payload.calories_burned,
        &payload.notes,
        payload.date,
    )
    .await?;

    Ok(HttpResponse::Created().json(record))
}

// POST /v1/records/random
pub async fn create_random_record(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let claims = jwt::claims_from_request(&req)?;

    let (exercise_type, duration, intensity, calories, days_ago) = {
        let mut rng = rand::thread_rng();
        (
            config::EXERCISE_TYPES[rng.gen_range(0..config::EXERCISE_TYPES.len())],
            rng.gen_range(15..=120),
            config::INTENSITY_LEVELS[rng.gen_range(0..config::INTENSITY_LEVELS.len())],
            rng.gen_range(50..=500) as f64,
            rng.gen_range(0..=30),
        )
    };
    let date = (Utc::now() - Duration::days(days_ago)).date_naive();

    let record = insert_record(
        &pool,
        &claims.sub,
        exercise_type,
        duration,
        intensity,
        calories,
        GENERATED_NOTE,
        date,
    )
    .await?;

    Ok(HttpResponse::Created().json(record))
}

// GET /v1/records
pub async fn get_records(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
    query: web::Query<GetRecordsQuery>,
) -> Result<HttpResponse, AppError> {
    let claims = jwt::claims_from_request(&req)?;

    let limit = query.limit.unwrap_or(20);
    let offset = query.offset.unwrap_or(0);

    let records = sqlx::query_as::<_, ExerciseRecord>(
        r"
        SELECT * FROM exercise_records
        WHERE user_id = $1
          AND ($2 IS NULL OR exercise_type = $2)
          AND ($3 IS NULL OR date >= $3)
          AND ($4 IS NULL OR date <= $4)
        ORDER BY date DESC, record_id DESC
        LIMIT $5 OFFSET $6
        ",
    )
    .bind(&claims.sub)
    .bind(&query.exercise_type)
    .bind(query.date_from)
    .bind(query.date_to)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(records))
}
