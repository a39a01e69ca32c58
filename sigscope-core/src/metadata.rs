//! SigMF recording metadata as returned by `GET /metadata/{id}`.

use serde::Deserialize;

use crate::format::group_thousands;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SigmfMetadata {
    pub sample_rate: Option<f64>,
    pub center_frequency: Option<f64>,
    pub datatype: Option<String>,
    pub sample_start: Option<u64>,
    pub offset: Option<u64>,
    pub author: Option<String>,
    pub hardware: Option<String>,
    pub recorder: Option<String>,
    pub datetime: Option<String>,
    pub error: Option<String>,
}

pub struct MetadataSection {
    pub title: &'static str,
    pub items: Vec<(&'static str, String)>,
}

fn text(v: &Option<String>) -> String {
    match v.as_deref() {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => "N/A".into(),
    }
}

fn hz(v: Option<f64>) -> String {
    v.map(|f| format!("{} Hz", group_thousands(f))).unwrap_or_else(|| "N/A".into())
}

fn count(v: Option<u64>) -> String {
    v.map(|n| n.to_string()).unwrap_or_else(|| "N/A".into())
}

impl SigmfMetadata {
    /// "General Information" and "Statistics" panels, in display order.
    pub fn sections(&self) -> [MetadataSection; 2] {
        [
            MetadataSection {
                title: "General Information",
                items: vec![
                    ("Author", text(&self.author)),
                    ("Hardware", text(&self.hardware)),
                    ("Recorder", text(&self.recorder)),
                    ("Date/Time", text(&self.datetime)),
                ],
            },
            MetadataSection {
                title: "Statistics",
                items: vec![
                    ("Sample Rate", hz(self.sample_rate)),
                    ("Center Frequency", hz(self.center_frequency)),
                    ("Data Type", text(&self.datatype)),
                    ("Sample Start", count(self.sample_start)),
                    ("Offset", count(self.offset)),
                ],
            },
        ]
    }
}
