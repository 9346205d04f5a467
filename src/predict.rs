use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::artifact::Artifact;
use crate::error::PredictError;

pub const TASTE_OPTIONS: [&str; 2] = ["Bad (0)", "Good (1)"];
pub const ODOR_OPTIONS: [&str; 2] = ["Bad (0)", "Good (1)"];
pub const FAT_OPTIONS: [&str; 2] = ["Low (0)", "Optimal (1)"];
pub const TURBIDITY_OPTIONS: [&str; 2] = ["Low (0)", "High (1)"];

/// Fallback colour for grades outside high/medium/low.
pub const NEUTRAL_COLOR: &str = "#333333";

/// Raw values of the dashboard controls. The binary controls carry the
/// label of the selected option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilkInput {
    pub ph: f64,
    pub temperature: f64,
    pub taste: String,
    pub odor: String,
    pub fat: String,
    pub turbidity: String,
    pub colour: f64,
}

impl Default for MilkInput {
    fn default() -> Self {
        MilkInput {
            ph: 6.6,
            temperature: 40.0,
            taste: TASTE_OPTIONS[0].to_string(),
            odor: ODOR_OPTIONS[0].to_string(),
            fat: FAT_OPTIONS[0].to_string(),
            turbidity: TURBIDITY_OPTIONS[0].to_string(),
            colour: 254.0,
        }
    }
}

fn flag(label: &str, positive: &str) -> f64 {
    if label.contains(positive) { 1.0 } else { 0.0 }
}

impl MilkInput {
    /// Value of the named feature, with the binary controls mapped to 0/1.
    pub fn feature(&self, name: &str) -> Option<f64> {
        let value = match name {
            "pH" => self.ph,
            "temperature" => self.temperature,
            "taste" => flag(&self.taste, "Good"),
            "odor" => flag(&self.odor, "Good"),
            "fat" => flag(&self.fat, "Optimal"),
            "turbidity" => flag(&self.turbidity, "High"),
            "colour" => self.colour,
            _ => return None,
        };
        Some(value)
    }
}

/// Assembles one model row in the order given by `features`.
pub fn feature_row(input: &MilkInput, features: &[String]) -> Result<Vec<f64>, PredictError> {
    features
        .iter()
        .map(|name| {
            input
                .feature(name)
                .ok_or_else(|| PredictError::UnknownFeature(name.clone()))
        })
        .collect()
}

/// Colour used to display a decoded grade.
pub fn grade_color(grade: &str) -> &'static str {
    match grade {
        "HIGH" => "#d4af37",
        "MEDIUM" => "#f9d71c",
        "LOW" => "#ff4b4b",
        _ => NEUTRAL_COLOR,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Decoded grade, uppercased.
    pub grade: String,
    /// The exact row handed to the model.
    pub row: Vec<f64>,
}

impl Prediction {
    pub fn color(&self) -> &'static str {
        grade_color(&self.grade)
    }
}

/// Runs single-row inference against a loaded artifact.
#[derive(Debug, Clone)]
pub struct Predictor {
    artifact: Arc<Artifact>,
}

impl Predictor {
    pub fn new(artifact: Arc<Artifact>) -> Self {
        Predictor { artifact }
    }

    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    pub fn predict(&self, input: &MilkInput) -> Result<Prediction, PredictError> {
        let row = feature_row(input, &self.artifact.features)?;
        let index = self.artifact.model.predict_row(&row)?;
        let grade = self.artifact.encoder.inverse_transform(index)?.to_uppercase();
        Ok(Prediction { grade, row })
    }
}
