use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRecord {
    pub record_id: i64,
    pub user_id: String,
    pub exercise_type: String,
    pub duration: i64,
    pub intensity: String,
    pub calories_burned: f64,
    pub notes: String,
    pub date: NaiveDate,
}
