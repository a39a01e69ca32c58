//! Request and response bodies exchanged with the processing backend.
//!
//! Every reply may carry an `error` string alongside a successful HTTP
//! status; [`BackendReply`] exposes it uniformly.

use serde::{Deserialize, Serialize};

use crate::annotation::Annotation;
use crate::coords::{BoundsError, DomainBounds};
use crate::library::SavedFile;
use crate::metadata::SigmfMetadata;

/// Logical error reported inside an otherwise successful response.
pub trait BackendReply {
    fn backend_error(&self) -> Option<&str>;
}

macro_rules! backend_reply {
    ($($ty:ty),* $(,)?) => {
        $(impl BackendReply for $ty {
            fn backend_error(&self) -> Option<&str> {
                self.error.as_deref().filter(|e| !e.is_empty())
            }
        })*
    };
}

backend_reply!(
    UploadResponse,
    PlotResponse,
    FileDataResponse,
    AnnotationsResponse,
    MessageResponse,
    FilesResponse,
    GenerateResponse,
    SigmfMetadata,
);

impl BackendReply for serde_json::Value {
    fn backend_error(&self) -> Option<&str> {
        self.get("error").and_then(|e| e.as_str()).filter(|e| !e.is_empty())
    }
}

/// Optional analysis switches and overrides sent along with an upload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadOptions {
    /// Run AirVIEW signal detection and return its annotations.
    pub airview: bool,
    /// Compute summary statistics for the capture.
    pub statistics: bool,
    pub fft_size: Option<u32>,
    pub airview_beta: Option<f64>,
    pub airview_scale: Option<f64>,
}

impl UploadOptions {
    /// Multipart text fields, in the order they are appended to the form.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("airview", self.airview.to_string()),
            ("statistics", self.statistics.to_string()),
        ];
        if let Some(n) = self.fft_size {
            fields.push(("fft_size", n.to_string()));
        }
        if let Some(beta) = self.airview_beta {
            fields.push(("beta", beta.to_string()));
        }
        if let Some(scale) = self.airview_scale {
            fields.push(("scale", scale.to_string()));
        }
        fields
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UploadResponse {
    pub file_id: Option<String>,
    pub message: Option<String>,
    /// Base64 PNG.
    pub spectrogram: Option<String>,
    pub max_time: Option<f64>,
    pub min_freq: Option<f64>,
    pub max_freq: Option<f64>,
    pub annotations: Option<Vec<Annotation>>,
    pub error: Option<String>,
}

impl UploadResponse {
    pub fn bounds(&self) -> Result<DomainBounds, BoundsError> {
        DomainBounds::from_parts(self.max_time, self.min_freq, self.max_freq)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PlotResponse {
    /// Base64 PNG.
    pub image: Option<String>,
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FileDataResponse {
    pub max_time: Option<f64>,
    pub min_freq: Option<f64>,
    pub max_freq: Option<f64>,
    pub annotations: Option<Vec<Annotation>>,
    pub error: Option<String>,
}

impl FileDataResponse {
    pub fn bounds(&self) -> Result<DomainBounds, BoundsError> {
        DomainBounds::from_parts(self.max_time, self.min_freq, self.max_freq)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AnnotationsResponse {
    pub annotations: Option<Vec<Annotation>>,
    pub error: Option<String>,
}

/// Full replacement of a file's annotation list.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SaveFileRequest {
    pub file_id: String,
    pub annotations: Vec<Annotation>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MessageResponse {
    pub message: Option<String>,
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FilesResponse {
    pub files: Option<Vec<SavedFile>>,
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenameRequest {
    pub filename: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GenerateResponse {
    /// Base64 PNG.
    pub plot: Option<String>,
    pub csv: Option<String>,
    pub error: Option<String>,
}
