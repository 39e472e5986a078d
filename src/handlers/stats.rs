use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::BTreeMap;

use crate::errors::AppError;
use crate::models::record::ExerciseRecord;
use crate::utils::jwt;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProgressResponse {
    has_data: bool,
    recent: Vec<ExerciseRecord>,
    duration_trend: Vec<TrendPoint>,
    type_distribution: Vec<TypeCount>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TrendPoint {
    date: NaiveDate,
    duration: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TypeCount {
    exercise_type: String,
    count: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    has_data: bool,
    total_workouts: i64,
    total_duration: i64,
    total_calories: f64,
    average_duration: f64,
    weekly: Vec<WeeklyStat>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WeeklyStat {
    week: String,
    duration: i64,
    calories: f64,
}

// GET /v1/stats/progress
pub async fn get_progress(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let claims = jwt::claims_from_request(&req)?;

    let records = sqlx::query_as::<_, ExerciseRecord>(
        r"
        SELECT * FROM exercise_records
        WHERE user_id = $1
        ORDER BY date DESC, record_id DESC
        ",
    )
    .bind(&claims.sub)
    .fetch_all(pool.get_ref())
    .await?;

    if records.is_empty() {
        return Ok(HttpResponse::Ok().json(ProgressResponse {
            has_data: false,
            recent: vec![],
            duration_trend: vec![],
            type_distribution: vec![],
        }));
    }

    // Trend points oldest first, the order a chart plots them.
    let mut duration_trend: Vec<TrendPoint> = records
        .iter()
        .map(|r| TrendPoint { date: r.date, duration: r.duration })
        .collect();
    duration_trend.reverse();

    let type_distribution = sqlx::query_as::<_, (String, i64)>(
        r"
        SELECT exercise_type, COUNT(*) FROM exercise_records
        WHERE user_id = $1
        GROUP BY exercise_type
        ORDER BY COUNT(*) DESC
        ",
    )
    .bind(&claims.sub)
    .fetch_all(pool.get_ref())
    .await?
    .into_iter()
    .map(|(exercise_type, count)| TypeCount { exercise_type, count })
    .collect();

    let recent = records.into_iter().take(5).collect();

    Ok(HttpResponse::Ok().json(ProgressResponse {
        has_data: true,
        recent,
        duration_trend,
        type_distribution,
    }))
}

// GET /v1/stats/summary
pub async fn get_summary(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let claims = jwt::claims_from_request(&req)?;

    let (total_workouts, total_duration, total_calories, average_duration) =
        sqlx::query_as::<_, (i64, i64, f64, f64)>(
            r"
            SELECT COUNT(*),
                   COALESCE(SUM(duration), 0),
                   COALESCE(SUM(calories_burned), 0.0),
                   COALESCE(AVG(duration), 0.0)
            FROM exercise_records
            WHERE user_id = $1
            ",
        )
        .bind(&claims.sub)
        .fetch_one(pool.get_ref())
        .await?;

    if total_workouts == 0 {
        return Ok(HttpResponse::Ok().json(SummaryResponse {
            has_data: false,
            total_workouts: 0,
            total_duration: 0,
            total_calories: 0.0,
            average_duration: 0.0,
            weekly: vec![],
        }));
    }

    let rows = sqlx::query_as::<_, (NaiveDate, i64, f64)>(
        r"
        SELECT date, duration, calories_burned FROM exercise_records
        WHERE user_id = $1
        ",
    )
    .bind(&claims.sub)
    .fetch_all(pool.get_ref())
    .await?;

    let weekly = rollup_by_iso_week(&rows);

    Ok(HttpResponse::Ok().json(SummaryResponse {
        has_data: true,
        total_workouts,
        total_duration,
        total_calories,
        average_duration,
        weekly,
    }))
}

fn rollup_by_iso_week(rows: &[(NaiveDate, i64, f64)]) -> Vec<WeeklyStat> {
    let mut weeks: BTreeMap<(i32, u32), (i64, f64)> = BTreeMap::new();
    for (date, duration, calories) in rows {
        let iso = date.iso_week();
        let entry = weeks.entry((iso.year(), iso.week())).or_insert((0, 0.0));
        entry.0 += duration;
        entry.1 += calories;
    }
    weeks
        .into_iter()
        .map(|((year, week), (duration, calories))| WeeklyStat {
            week: format!("{}-W{:02}", year, week),
            duration,
            calories,
        })
        .collect()
}
