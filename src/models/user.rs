use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug)]
pub struct User {
    pub user_id: String,
    pub username: String,
    pub password: String,
    pub age: i64,
    pub gender: String,
    pub fitness_goal: String,
    pub preferred_exercise: String,
    pub created_at: chrono::DateTime<Utc>,
}

impl User {
    /// The multi-valued preference column is stored comma-joined.
    pub fn preferred_exercises(&self) -> Vec<String> {
        self.preferred_exercise
            .split(',')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug)]
pub struct NewUser {
    pub user_id: String,
    pub username: String,
    pub password: String,
    pub age: i64,
    pub gender: String,
    pub fitness_goal: String,
    pub preferred_exercise: String,
}

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug)]
pub struct UserSettings {
    pub user_id: String,
    pub daily_exercise_goal: i64,
    pub weekly_exercise_goal: i64,
    pub reminder_time: String,
}
