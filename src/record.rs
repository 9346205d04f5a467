use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::TrainError;

/// Feature columns in the order the model is trained on.
pub const FEATURE_NAMES: [&str; 7] = [
    "pH",
    "temperature",
    "taste",
    "odor",
    "fat",
    "turbidity",
    "colour",
];

/// One measured milk sample and its quality grade.
///
/// Accepts both the normalized lowercase headers and the spellings used by
/// the public milk-quality dataset (`Temprature`, `Fat `, `Grade`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilkSample {
    #[serde(rename = "pH", alias = "ph", alias = "PH")]
    pub ph: f64,
    #[serde(alias = "Temperature", alias = "Temprature")]
    pub temperature: f64,
    #[serde(alias = "Taste")]
    pub taste: f64,
    #[serde(alias = "Odor")]
    pub odor: f64,
    #[serde(alias = "Fat")]
    pub fat: f64,
    #[serde(alias = "Turbidity")]
    pub turbidity: f64,
    #[serde(alias = "Colour", alias = "color", alias = "Color")]
    pub colour: f64,
    #[serde(alias = "Grade")]
    pub grade: String,
}

impl MilkSample {
    /// Feature values in [`FEATURE_NAMES`] order.
    pub fn features(&self) -> [f64; 7] {
        [
            self.ph,
            self.temperature,
            self.taste,
            self.odor,
            self.fat,
            self.turbidity,
            self.colour,
        ]
    }
}

/// Reads every sample from a CSV file. Headers and fields are trimmed.
pub fn load_samples(path: &Path) -> Result<Vec<MilkSample>, TrainError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| TrainError::OpenDataset {
            path: path.to_path_buf(),
            source,
        })?;

    let mut samples = Vec::new();
    for (i, result) in rdr.deserialize().enumerate() {
        let sample: MilkSample = result.map_err(|source| TrainError::InvalidRow {
            path: path.to_path_buf(),
            row: i + 1,
            source,
        })?;
        samples.push(sample);
    }

    if samples.is_empty() {
        return Err(TrainError::NoRows(path.to_path_buf()));
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_normalized_headers() {
        let file = write_csv(
            "pH,temperature,taste,odor,fat,turbidity,colour,grade\n\
             6.6,35,1,0,1,0,254,high\n\
             8.5,70,1,1,1,1,246,low\n",
        );
        let samples = load_samples(file.path()).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].features(), [6.6, 35.0, 1.0, 0.0, 1.0, 0.0, 254.0]);
        assert_eq!(samples[1].grade, "low");
    }

    #[test]
    fn reads_dataset_header_spellings() {
        let file = write_csv(
            "pH,Temprature,Taste,Odor,Fat ,Turbidity,Colour,Grade\n\
             6.8,45,0,1,1,1,255,medium\n",
        );
        let samples = load_samples(file.path()).unwrap();
        assert_eq!(samples[0].temperature, 45.0);
        assert_eq!(samples[0].fat, 1.0);
        assert_eq!(samples[0].grade, "medium");
    }

    #[test]
    fn malformed_row_names_the_row() {
        let file = write_csv(
            "pH,temperature,taste,odor,fat,turbidity,colour,grade\n\
             6.6,35,1,0,1,0,254,high\n\
             sour,35,1,0,1,0,254,high\n",
        );
        let err = load_samples(file.path()).unwrap_err();
        assert!(matches!(err, TrainError::InvalidRow { row: 2, .. }));
    }

    #[test]
    fn missing_and_empty_files_fail() {
        let err = load_samples(Path::new("/nonexistent/milk.csv")).unwrap_err();
        assert!(matches!(err, TrainError::OpenDataset { .. }));

        let file = write_csv("pH,temperature,taste,odor,fat,turbidity,colour,grade\n");
        let err = load_samples(file.path()).unwrap_err();
        assert!(matches!(err, TrainError::NoRows(_)));
    }
}
