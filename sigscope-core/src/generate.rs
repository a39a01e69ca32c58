//! Synthetic dataset generation form (`POST /generate`).

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementMethod {
    #[default]
    EquallySpaced,
    Random,
}

impl PlacementMethod {
    pub const ALL: [PlacementMethod; 2] = [PlacementMethod::EquallySpaced, PlacementMethod::Random];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementMethod::EquallySpaced => "equally_spaced",
            PlacementMethod::Random => "random",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlacementMethod::EquallySpaced => "Equally Spaced",
            PlacementMethod::Random => "Random",
        }
    }
}

impl std::str::FromStr for PlacementMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equally_spaced" | "equally-spaced" => Ok(PlacementMethod::EquallySpaced),
            "random" => Ok(PlacementMethod::Random),
            other => Err(format!("unknown placement method '{other}'")),
        }
    }
}

pub const MATRIX_FILENAME: &str = "output_matrix.csv";
pub const TRANSMITTERS_FILENAME: &str = "output_transmitters.csv";

/// Body of `POST /generate`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateParams {
    pub rows: u32,
    pub cols: u32,
    pub num_transmitters: u32,
    pub transmitter_mean: f64,
    pub transmitter_sd: f64,
    pub noise_mean: f64,
    pub noise_sd: f64,
    pub bandwidth: f64,
    pub active_time: f64,
    pub matrix_filename: String,
    pub transmitters_filename: String,
    pub placement_method: PlacementMethod,
}

impl GenerateParams {
    /// File name offered for the returned CSV.
    pub fn csv_download_name(&self, timestamp_ms: u64) -> String {
        format!(
            "{}_transmitters_{}_{}.csv",
            self.placement_method.as_str(),
            self.num_transmitters,
            timestamp_ms
        )
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{0} must be a number")]
    NotANumber(&'static str),
    #[error("{0} must be a non-negative whole number")]
    NotACount(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GenerateField {
    Rows,
    Cols,
    NumTransmitters,
    TransmitterMean,
    TransmitterSd,
    NoiseMean,
    NoiseSd,
    Bandwidth,
    ActiveTime,
}

impl GenerateField {
    /// Form order; validation reports the first problem in this order.
    pub const ALL: [GenerateField; 9] = [
        GenerateField::Rows,
        GenerateField::Cols,
        GenerateField::NumTransmitters,
        GenerateField::TransmitterMean,
        GenerateField::TransmitterSd,
        GenerateField::NoiseMean,
        GenerateField::NoiseSd,
        GenerateField::Bandwidth,
        GenerateField::ActiveTime,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            GenerateField::Rows => "Rows",
            GenerateField::Cols => "Columns",
            GenerateField::NumTransmitters => "Number of Transmitters",
            GenerateField::TransmitterMean => "Transmitter Mean",
            GenerateField::TransmitterSd => "Transmitter Standard Deviation",
            GenerateField::NoiseMean => "Noise Mean",
            GenerateField::NoiseSd => "Noise Standard Deviation",
            GenerateField::Bandwidth => "Bandwidth",
            GenerateField::ActiveTime => "Active Time",
        }
    }

    fn is_count(&self) -> bool {
        matches!(self, GenerateField::Rows | GenerateField::Cols | GenerateField::NumTransmitters)
    }
}

/// Editable form state; a cleared input is `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerateForm {
    values: [Option<f64>; 9],
    // Fields whose last text input did not parse.
    unparsed: [bool; 9],
    pub placement: PlacementMethod,
}

impl Default for GenerateForm {
    fn default() -> Self {
        Self {
            values: [
                Some(1000.0),
                Some(1024.0),
                Some(5.0),
                Some(-75.0),
                Some(2.0),
                Some(-109.0),
                Some(10.0),
                Some(200.0),
                Some(10.0),
            ],
            unparsed: [false; 9],
            placement: PlacementMethod::EquallySpaced,
        }
    }
}

impl GenerateForm {
    pub fn get(&self, field: GenerateField) -> Option<f64> {
        self.values[field as usize]
    }

    pub fn set(&mut self, field: GenerateField, value: Option<f64>) {
        self.values[field as usize] = value.filter(|v| v.is_finite());
        self.unparsed[field as usize] = false;
    }

    /// Parse raw `<input type="number">` text; empty clears the field.
    pub fn set_text(&mut self, field: GenerateField, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            self.set(field, None);
            return;
        }
        match text.parse::<f64>() {
            Ok(v) if v.is_finite() => self.set(field, Some(v)),
            _ => {
                self.values[field as usize] = None;
                self.unparsed[field as usize] = true;
            }
        }
    }

    pub fn validate(&self) -> Result<GenerateParams, GenerateError> {
        let mut v = [0.0; 9];
        for field in GenerateField::ALL {
            if self.unparsed[field as usize] {
                return Err(GenerateError::NotANumber(field.label()));
            }
            let value = self.get(field).ok_or(GenerateError::Missing(field.label()))?;
            if field.is_count() && (value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64) {
                return Err(GenerateError::NotACount(field.label()));
            }
            v[field as usize] = value;
        }
        Ok(GenerateParams {
            rows: v[0] as u32,
            cols: v[1] as u32,
            num_transmitters: v[2] as u32,
            transmitter_mean: v[3],
            transmitter_sd: v[4],
            noise_mean: v[5],
            noise_sd: v[6],
            bandwidth: v[7],
            active_time: v[8],
            matrix_filename: MATRIX_FILENAME.to_string(),
            transmitters_filename: TRANSMITTERS_FILENAME.to_string(),
            placement_method: self.placement,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let p = GenerateForm::default().validate().unwrap();
        assert_eq!((p.rows, p.cols, p.num_transmitters), (1000, 1024, 5));
        assert_eq!(p.noise_mean, -109.0);
        assert_eq!(p.matrix_filename, "output_matrix.csv");
    }

    #[test]
    fn test_first_missing_field_reported() {
        let mut form = GenerateForm::default();
        form.set_text(GenerateField::NoiseSd, "");
        form.set_text(GenerateField::Cols, " ");
        assert_eq!(form.validate(), Err(GenerateError::Missing("Columns")));
        assert_eq!(form.validate().unwrap_err().to_string(), "Columns is required");
    }

    #[test]
    fn test_fractional_count_rejected() {
        let mut form = GenerateForm::default();
        form.set_text(GenerateField::NumTransmitters, "2.5");
        assert_eq!(form.validate(), Err(GenerateError::NotACount("Number of Transmitters")));
        form.set_text(GenerateField::NumTransmitters, "3");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_unparsable_text_reported_as_not_a_number() {
        let mut form = GenerateForm::default();
        form.set_text(GenerateField::NoiseMean, "abc");
        assert_eq!(form.get(GenerateField::NoiseMean), None);
        assert_eq!(form.validate(), Err(GenerateError::NotANumber("Noise Mean")));
        assert_eq!(form.validate().unwrap_err().to_string(), "Noise Mean must be a number");

        form.set_text(GenerateField::NoiseMean, "inf");
        assert_eq!(form.validate(), Err(GenerateError::NotANumber("Noise Mean")));
        form.set_text(GenerateField::NoiseMean, "");
        assert_eq!(form.validate(), Err(GenerateError::Missing("Noise Mean")));
        form.set(GenerateField::NoiseMean, Some(-100.0));
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_wire_names() {
        let mut form = GenerateForm::default();
        form.placement = PlacementMethod::Random;
        let v = serde_json::to_value(form.validate().unwrap()).unwrap();
        assert_eq!(v["numTransmitters"], 5);
        assert_eq!(v["transmittersFilename"], "output_transmitters.csv");
        assert_eq!(v["placementMethod"], "random");
        assert_eq!(v["activeTime"], 10.0);
    }

    #[test]
    fn test_csv_name() {
        let p = GenerateForm::default().validate().unwrap();
        assert_eq!(p.csv_download_name(1700000000000), "equally_spaced_transmitters_5_1700000000000.csv");
    }
}
