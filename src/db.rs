use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::config;
use crate::models::user::{NewUser, User};

/// Opens the SQLite pool, creating the database file on first start.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    SqlitePoolOptions::new().connect_with(options).await
}

/// Creates all tables if absent. Idempotent, called on every start.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS users (
            user_id TEXT PRIMARY KEY,
            username TEXT UNIQUE NOT NULL,
            password TEXT NOT NULL,
            age INTEGER NOT NULL,
            gender TEXT NOT NULL,
            fitness_goal TEXT NOT NULL,
            preferred_exercise TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS exercise_records (
            record_id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            exercise_type TEXT NOT NULL,
            duration INTEGER NOT NULL,
            intensity TEXT NOT NULL,
            calories_burned REAL NOT NULL,
            notes TEXT NOT NULL DEFAULT '',
            date TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users (user_id)
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS user_settings (
            user_id TEXT PRIMARY KEY,
            daily_exercise_goal INTEGER NOT NULL,
            weekly_exercise_goal INTEGER NOT NULL,
            reminder_time TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users (user_id)
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS model_params (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            n_estimators INTEGER NOT NULL,
            max_depth INTEGER NOT NULL,
            min_samples_split INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        )
        ",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Inserts the user row and its default settings row in one transaction.
/// On any failure neither row is committed.
pub async fn create_user(pool: &SqlitePool, user: &NewUser) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r"
        INSERT INTO users (
            user_id, username, password, age,
            gender, fitness_goal, preferred_exercise, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ",
    )
    .bind(&user.user_id)
    .bind(&user.username)
    .bind(&user.password)
    .bind(user.age)
    .bind(&user.gender)
    .bind(&user.fitness_goal)
    .bind(&user.preferred_exercise)
    .bind(chrono::Utc::now())
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
        INSERT INTO user_settings (
            user_id, daily_exercise_goal,
            weekly_exercise_goal, reminder_time
        )
        VALUES ($1, $2, $3, $4)
        ",
    )
    .bind(&user.user_id)
    .bind(config::DEFAULT_DAILY_GOAL)
    .bind(config::DEFAULT_WEEKLY_GOAL)
    .bind(config::DEFAULT_REMINDER_TIME)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

pub async fn find_user_by_name(pool: &SqlitePool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn find_user_by_id(pool: &SqlitePool, user_id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}
