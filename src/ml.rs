use linfa::prelude::*;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2};
use std::fmt;

/// Minimum joined rows required before a retrain is attempted.
pub const MIN_TRAINING_ROWS: usize = 10;

/// One joined (record × user demographics) training example.
#[derive(Debug, Clone)]
pub struct TrainingRow {
    pub age: i64,
    pub gender: String,
    pub duration: i64,
    pub intensity: String,
    pub calories_burned: f64,
}

#[derive(Debug)]
pub enum TrainError {
    InsufficientData { available: usize },
    Fit(String),
}

impl fmt::Display for TrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainError::InsufficientData { available } => write!(
                f,
                "Not enough data to train the model: {} rows available, {} required",
                available, MIN_TRAINING_ROWS
            ),
            TrainError::Fit(msg) => write!(f, "Model training failed: {}", msg),
        }
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitReport {
    pub rows_used: usize,
    pub mean_squared_error: f64,
}

pub fn encode_gender(gender: &str) -> Option<f64> {
    match gender {
        "男" => Some(0.0),
        "女" => Some(1.0),
        _ => None,
    }
}

pub fn encode_intensity(intensity: &str) -> Option<f64> {
    match intensity {
        "低" => Some(0.0),
        "中" => Some(1.0),
        "高" => Some(2.0),
        _ => None,
    }
}

/// Fits calories burned from (age, gender, duration, intensity). Rows with
/// values outside the fixed encodings are skipped. The fitted model is
/// reported and discarded; only the hyperparameter audit row persists,
/// which the caller writes after a successful fit.
pub fn fit_calorie_model(rows: &[TrainingRow]) -> Result<FitReport, TrainError> {
    let mut flat = Vec::with_capacity(rows.len() * 4);
    let mut calories = Vec::with_capacity(rows.len());

    for row in rows {
        let (Some(gender), Some(intensity)) = (encode_gender(&row.gender), encode_intensity(&row.intensity)) else {
            continue;
        };
        flat.extend_from_slice(&[row.age as f64, gender, row.duration as f64, intensity]);
        calories.push(row.calories_burned);
    }

    let n = calories.len();
    if n < MIN_TRAINING_ROWS {
        return Err(TrainError::InsufficientData { available: n });
    }

    let features = Array2::from_shape_vec((n, 4), flat)
        .map_err(|e| TrainError::Fit(e.to_string()))?;
    let targets = Array1::from_vec(calories);

    let dataset = Dataset::new(features.clone(), targets.clone());
    let model = LinearRegression::new()
        .fit(&dataset)
        .map_err(|e| TrainError::Fit(e.to_string()))?;

    let predictions = model.predict(&features);
    let mean_squared_error = predictions
        .iter()
        .zip(targets.iter())
        .map(|(pred, actual)| (pred - actual).powi(2))
        .sum::<f64>()
        / n as f64;

    Ok(FitReport {
        rows_used: n,
        mean_squared_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(age: i64, gender: &str, duration: i64, intensity: &str, calories: f64) -> TrainingRow {
        TrainingRow {
            age,
            gender: gender.to_string(),
            duration,
            intensity: intensity.to_string(),
            calories_burned: calories,
        }
    }

    #[test]
    fn encodings_match_the_fixed_maps() {
        assert_eq!(encode_gender("男"), Some(0.0));
        assert_eq!(encode_gender("女"), Some(1.0));
        assert_eq!(encode_gender("?"), None);
        assert_eq!(encode_intensity("低"), Some(0.0));
        assert_eq!(encode_intensity("中"), Some(1.0));
        assert_eq!(encode_intensity("高"), Some(2.0));
        assert_eq!(encode_intensity("?"), None);
    }

    #[test]
    fn too_few_rows_is_rejected_without_fitting() {
        let rows: Vec<TrainingRow> = (0..5)
            .map(|i| row(20 + i, "男", 30, "中", 200.0))
            .collect();
        match fit_calorie_model(&rows) {
            Err(TrainError::InsufficientData { available }) => assert_eq!(available, 5),
            other => panic!("expected InsufficientData, got {:?}", other),
        }
    }

    #[test]
    fn unmappable_rows_do_not_count_toward_the_minimum() {
        let mut rows: Vec<TrainingRow> = (0..9)
            .map(|i| row(20 + i, "男", 30, "中", 200.0))
            .collect();
        rows.push(row(40, "未知", 30, "中", 200.0));
        assert!(matches!(
            fit_calorie_model(&rows),
            Err(TrainError::InsufficientData { available: 9 })
        ));
    }

    #[test]
    fn fits_a_linear_relationship() {
        // calories = 5 * duration, varied over the other features
        let durations = [30, 45, 25, 60, 40, 55, 35, 70, 50, 65, 45, 80];
        let rows: Vec<TrainingRow> = durations
            .iter()
            .enumerate()
            .map(|(i, &duration)| {
                row(
                    18 + i as i64,
                    if i % 2 == 0 { "男" } else { "女" },
                    duration,
                    ["低", "中", "高"][i % 3],
                    (duration * 5) as f64,
                )
            })
            .collect();

        let report = fit_calorie_model(&rows).unwrap();
        assert_eq!(report.rows_used, 12);
        assert!(report.mean_squared_error < 1.0);
    }
}
