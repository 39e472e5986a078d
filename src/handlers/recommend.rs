use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{Duration, Local, Timelike, Utc};
use rand::seq::SliceRandom;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::config;
use crate::db;
use crate::errors::AppError;
use crate::models::record::ExerciseRecord;
use crate::utils::jwt;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    average_daily_score: f64,
    exercise: String,
    intensity: String,
    duration_minutes: String,
    meal: MealRecommendation,
    nutrition_tip: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealRecommendation {
    slot: String,
    food: String,
}

/// Sums the static per-intensity weight over the window and averages it
/// over the full 7 days, so sparse weeks score low.
pub(crate) fn average_daily_score(records: &[ExerciseRecord]) -> f64 {
    let total: f64 = records
        .iter()
        .map(|r| config::intensity_calories(&r.intensity))
        .sum();
    total / 7.0
}

/// Maps the score to (suggested intensity band, suggested duration band).
pub(crate) fn plan_for_score(score: f64) -> (&'static str, &'static str) {
    if score < config::SCORE_MEDIUM_MAX {
        ("中", "30-45")
    } else if score < config::SCORE_HIGH_MAX {
        ("中到高", "45-60")
    } else {
        ("低到中", "30")
    }
}

pub(crate) fn meal_slot(hour: u32) -> &'static str {
    if (5..10).contains(&hour) {
        config::MEAL_BREAKFAST
    } else if (10..15).contains(&hour) {
        config::MEAL_LUNCH
    } else {
        config::MEAL_DINNER
    }
}

pub(crate) fn nutrition_tip(goal: &str) -> &'static str {
    match goal {
        "增肌" => "注意补充优质蛋白，每天蛋白质摄入建议达到体重(kg)×2克",
        "减重" => "控制碳水化合物摄入，增加蔬菜摄入，保证适量蛋白质",
        _ => "均衡饮食，适量多样，注意营养搭配",
    }
}

// GET /v1/recommendations
pub async fn get_recommendations(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let claims = jwt::claims_from_request(&req)?;

    let user = db::find_user_by_id(&pool, &claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let seven_days_ago = (Utc::now() - Duration::days(7)).date_naive();
    let records = sqlx::query_as::<_, ExerciseRecord>(
        r"
        SELECT * FROM exercise_records
        WHERE user_id = $1 AND date >= $2
        ORDER BY date DESC
        ",
    )
    .bind(&claims.sub)
    .bind(seven_days_ago)
    .fetch_all(pool.get_ref())
    .await?;

    let score = average_daily_score(&records);
    let (intensity, duration_minutes) = plan_for_score(score);

    let slot = meal_slot(Local::now().hour());

    let (exercise, food) = {
        let mut rng = rand::thread_rng();
        let preferred = user.preferred_exercises();
        // Users who registered without picking preferences draw from the
        // full exercise list.
        let exercise = preferred
            .choose(&mut rng)
            .cloned()
            .unwrap_or_else(|| {
                config::EXERCISE_TYPES
                    .choose(&mut rng)
                    .map(|s| s.to_string())
                    .unwrap_or_default()
            });
        // meal_foods falls back to the 保持健康 bucket for unkeyed goals.
        let food = config::meal_foods(&user.fitness_goal, slot)
            .choose(&mut rng)
            .map(|s| s.to_string())
            .unwrap_or_default();
        (exercise, food)
    };

    Ok(HttpResponse::Ok().json(Recommendation {
        average_daily_score: score,
        exercise,
        intensity: intensity.to_string(),
        duration_minutes: duration_minutes.to_string(),
        meal: MealRecommendation {
            slot: slot.to_string(),
            food,
        },
        nutrition_tip: nutrition_tip(&user.fitness_goal).to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(intensity: &str) -> ExerciseRecord {
        ExerciseRecord {
            record_id: 1,
            user_id: "u1".to_string(),
            exercise_type: "跑步".to_string(),
            duration: 30,
            intensity: intensity.to_string(),
            calories_burned: 200.0,
            notes: String::new(),
            date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
        }
    }

    #[test]
    fn no_records_scores_zero_and_maps_to_the_lowest_band() {
        let score = average_daily_score(&[]);
        assert_eq!(score, 0.0);
        assert_eq!(plan_for_score(score), ("中", "30-45"));
    }

    #[test]
    fn score_is_the_weighted_sum_over_seven_days() {
        let records = vec![record("高"), record("高")];
        let score = average_daily_score(&records);
        assert!((score - 900.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn band_thresholds_are_inclusive_on_the_upper_side() {
        assert_eq!(plan_for_score(299.9), ("中", "30-45"));
        assert_eq!(plan_for_score(300.0), ("中到高", "45-60"));
        assert_eq!(plan_for_score(499.9), ("中到高", "45-60"));
        assert_eq!(plan_for_score(500.0), ("低到中", "30"));
    }

    #[test]
    fn meal_slot_follows_the_hour_ranges() {
        assert_eq!(meal_slot(5), config::MEAL_BREAKFAST);
        assert_eq!(meal_slot(9), config::MEAL_BREAKFAST);
        assert_eq!(meal_slot(10), config::MEAL_LUNCH);
        assert_eq!(meal_slot(14), config::MEAL_LUNCH);
        assert_eq!(meal_slot(15), config::MEAL_DINNER);
        assert_eq!(meal_slot(22), config::MEAL_DINNER);
        assert_eq!(meal_slot(3), config::MEAL_DINNER);
    }

    #[test]
    fn tips_are_keyed_by_goal_with_a_default() {
        assert_ne!(nutrition_tip("增肌"), nutrition_tip("减重"));
        assert_eq!(nutrition_tip("提高耐力"), nutrition_tip("保持健康"));
    }
}
