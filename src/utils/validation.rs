use validator::Validate;

use crate::config;
use crate::errors::AppError;

pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate()
        .map_err(|err| AppError::BadRequest(err.to_string()))
}

pub fn validate_gender(gender: &str) -> Result<(), AppError> {
    if !config::GENDERS.contains(&gender) {
        return Err(AppError::BadRequest("Gender must be one of 男 or 女".to_string()));
    }
    Ok(())
}

pub fn validate_fitness_goal(goal: &str) -> Result<(), AppError> {
    if !config::FITNESS_GOALS.contains(&goal) {
        return Err(AppError::BadRequest("Unknown fitness goal".to_string()));
    }
    Ok(())
}

pub fn validate_exercise_type(exercise_type: &str) -> Result<(), AppError> {
    if !config::EXERCISE_TYPES.contains(&exercise_type) {
        return Err(AppError::BadRequest("Unknown exercise type".to_string()));
    }
    Ok(())
}

pub fn validate_intensity(intensity: &str) -> Result<(), AppError> {
    if !config::INTENSITY_LEVELS.contains(&intensity) {
        return Err(AppError::BadRequest("Intensity must be one of 低, 中 or 高".to_string()));
    }
    Ok(())
}

pub fn validate_preferred_exercises(exercises: &[String]) -> Result<(), AppError> {
    for exercise in exercises {
        validate_exercise_type(exercise)?;
    }
    Ok(())
}
