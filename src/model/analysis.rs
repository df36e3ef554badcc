use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Severity tier of a region finding. Unknown tiers are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
    Unrecognized(String),
}

impl From<String> for Severity {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "mild" => Severity::Mild,
            "moderate" => Severity::Moderate,
            "severe" => Severity::Severe,
            _ => Severity::Unrecognized(value),
        }
    }
}

impl From<Severity> for String {
    fn from(value: Severity) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Mild => f.write_str("mild"),
            Severity::Moderate => f.write_str("moderate"),
            Severity::Severe => f.write_str("severe"),
            Severity::Unrecognized(other) => f.write_str(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub status: String,
    pub severity: Severity,
    #[serde(default)]
    pub description: String,
}

/// Output of one inference call. Replaced wholesale by the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub prediction: String,
    pub probability: f32,
    pub heatmap_ref: String,
    #[serde(default)]
    pub findings: BTreeMap<String, Finding>,
    /// Per-class probabilities for staged classifiers, in display order.
    #[serde(default)]
    pub class_probabilities: Vec<(String, f32)>,
    #[serde(default)]
    pub overall_severity: Option<Severity>,
}

impl AnalysisResult {
    pub fn new(prediction: impl Into<String>, probability: f32) -> Self {
        Self {
            prediction: prediction.into(),
            probability: probability.clamp(0.0, 1.0),
            heatmap_ref: String::new(),
            findings: BTreeMap::new(),
            class_probabilities: Vec::new(),
            overall_severity: None,
        }
    }

    pub fn with_heatmap(mut self, heatmap_ref: impl Into<String>) -> Self {
        self.heatmap_ref = heatmap_ref.into();
        self
    }

    pub fn with_finding(
        mut self,
        region: impl Into<String>,
        status: impl Into<String>,
        severity: Severity,
        description: impl Into<String>,
    ) -> Self {
        self.findings.insert(
            region.into(),
            Finding {
                status: status.into(),
                severity,
                description: description.into(),
            },
        );
        self
    }

    pub fn with_class_probability(mut self, class: impl Into<String>, probability: f32) -> Self {
        self.class_probabilities
            .push((class.into(), probability.clamp(0.0, 1.0)));
        self
    }

    pub fn with_overall_severity(mut self, severity: Severity) -> Self {
        self.overall_severity = Some(severity);
        self
    }

    /// Width of the probability bar, in percent.
    pub fn bar_percent(&self) -> f32 {
        (self.probability * 100.0).clamp(0.0, 100.0)
    }
}
