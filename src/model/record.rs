//! Health-record forms for the tabular tools: field tables, validation and
//! the assessment result shape.

use std::fmt;

use super::patient::Patient;
use super::tool::TabularTool;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Free numeric entry, optionally bounded (inclusive).
    Number { range: Option<(f64, f64)> },
    /// One of a fixed set of options. The first option is the default.
    Choice(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub sample: &'static str,
}

impl FieldSpec {
    fn default_value(&self) -> &'static str {
        match self.kind {
            FieldKind::Number { .. } => "",
            FieldKind::Choice(options) => options.first().copied().unwrap_or(""),
        }
    }
}

const NO_YES: &[&str] = &["No", "Yes"];

const fn number(key: &'static str, label: &'static str, sample: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind: FieldKind::Number { range: None },
        sample,
    }
}

const fn bounded(
    key: &'static str,
    label: &'static str,
    min: f64,
    max: f64,
    sample: &'static str,
) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind: FieldKind::Number {
            range: Some((min, max)),
        },
        sample,
    }
}

const fn choice(
    key: &'static str,
    label: &'static str,
    options: &'static [&'static str],
    sample: &'static str,
) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind: FieldKind::Choice(options),
        sample,
    }
}

const DIABETES_FIELDS: [FieldSpec; 8] = [
    choice("gender", "Gender", &["Male", "Female", "Other"], "Female"),
    bounded("age", "Age", 0.0, 120.0, "54"),
    choice("hypertension", "Hypertension", NO_YES, "No"),
    choice("heart_disease", "Heart disease", NO_YES, "No"),
    choice(
        "smoking_history",
        "Smoking history",
        &["never", "former", "current", "not current", "ever", "unknown"],
        "former",
    ),
    bounded("bmi", "BMI", 10.0, 60.0, "27.32"),
    bounded("HbA1c_level", "HbA1c level", 3.0, 15.0, "6.6"),
    bounded("blood_glucose_level", "Blood glucose level", 50.0, 400.0, "140"),
];

const BREAST_CANCER_FIELDS: [FieldSpec; 10] = [
    number("radius_mean", "Radius", "17.99"),
    number("texture_mean", "Texture", "10.38"),
    number("perimeter_mean", "Perimeter", "122.8"),
    number("area_mean", "Area", "1001"),
    number("smoothness_mean", "Smoothness", "0.1184"),
    number("compactness_mean", "Compactness", "0.2776"),
    number("concavity_mean", "Concavity", "0.3001"),
    number("concave_points_mean", "Concave Points", "0.1471"),
    number("symmetry_mean", "Symmetry", "0.2419"),
    number("fractal_dimension_mean", "Fractal Dimension", "0.07871"),
];

pub fn fields(tool: TabularTool) -> &'static [FieldSpec] {
    match tool {
        TabularTool::Diabetes => &DIABETES_FIELDS,
        TabularTool::BreastCancer => &BREAST_CANCER_FIELDS,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    Required,
    NotANumber,
    OutOfRange { min: f64, max: f64 },
    UnknownOption,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Required => f.write_str("Required"),
            FieldError::NotANumber => f.write_str("Must be a number"),
            FieldError::OutOfRange { min, max } => {
                write!(f, "Must be a number between {min} and {max}")
            }
            FieldError::UnknownOption => f.write_str("Choose one of the listed options"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Choice(&'static str),
}

pub fn validate_field(spec: &FieldSpec, raw: &str) -> Result<FieldValue, FieldError> {
    match spec.kind {
        FieldKind::Number { range } => {
            let raw = raw.trim();
            if raw.is_empty() {
                return Err(FieldError::Required);
            }
            let value: f64 = raw.parse().map_err(|_| FieldError::NotANumber)?;
            if !value.is_finite() {
                return Err(FieldError::NotANumber);
            }
            match range {
                Some((min, max)) if value < min || value > max => {
                    Err(FieldError::OutOfRange { min, max })
                }
                _ => Ok(FieldValue::Number(value)),
            }
        }
        FieldKind::Choice(options) => options
            .iter()
            .find(|option| **option == raw)
            .map(|option| FieldValue::Choice(*option))
            .ok_or(FieldError::UnknownOption),
    }
}

/// Validated values, in field order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordInput {
    pub values: Vec<(&'static str, FieldValue)>,
}

impl RecordInput {
    pub fn get(&self, key: &str) -> Option<FieldValue> {
        self.values
            .iter()
            .find(|(field, _)| *field == key)
            .map(|(_, value)| *value)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        match self.get(key) {
            Some(FieldValue::Number(value)) => Some(value),
            _ => None,
        }
    }

    pub fn choice(&self, key: &str) -> Option<&'static str> {
        match self.get(key) {
            Some(FieldValue::Choice(option)) => Some(option),
            _ => None,
        }
    }
}

/// Raw entries and per-field errors for one tool's form.
#[derive(Debug, Clone)]
pub struct RecordForm {
    tool: TabularTool,
    values: Vec<String>,
    errors: Vec<Option<FieldError>>,
}

impl RecordForm {
    pub fn new(tool: TabularTool) -> Self {
        let specs = fields(tool);
        Self {
            tool,
            values: specs.iter().map(|spec| spec.default_value().to_string()).collect(),
            errors: vec![None; specs.len()],
        }
    }

    pub fn tool(&self) -> TabularTool {
        self.tool
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        fields(self.tool)
    }

    fn index(&self, key: &str) -> Option<usize> {
        self.fields().iter().position(|spec| spec.key == key)
    }

    pub fn value(&self, key: &str) -> &str {
        self.index(key)
            .map(|index| self.values[index].as_str())
            .unwrap_or("")
    }

    pub fn error(&self, key: &str) -> Option<&FieldError> {
        self.index(key).and_then(|index| self.errors[index].as_ref())
    }

    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(Option::is_some)
    }

    /// Stores a raw entry and clears that field's error. Unknown keys are
    /// rejected.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        let Some(index) = self.index(key) else {
            log::debug!("{}: no field named {key}", self.tool);
            return false;
        };
        self.values[index] = value.into();
        self.errors[index] = None;
        true
    }

    /// Copies demographics the record already holds.
    pub fn prefill(&mut self, patient: &Patient) {
        if self.tool != TabularTool::Diabetes {
            return;
        }
        self.set("gender", patient.gender.label());
        if let Some(age) = patient.age {
            self.set("age", age.to_string());
        }
    }

    pub fn load_sample(&mut self) {
        self.values = self
            .fields()
            .iter()
            .map(|spec| spec.sample.to_string())
            .collect();
        self.errors.iter_mut().for_each(|error| *error = None);
    }

    /// Validates every field, recording the errors. `None` when any failed.
    pub fn validate(&mut self) -> Option<RecordInput> {
        let specs = self.fields();
        let mut values = Vec::with_capacity(specs.len());

        for (index, spec) in specs.iter().enumerate() {
            match validate_field(spec, &self.values[index]) {
                Ok(value) => {
                    self.errors[index] = None;
                    values.push((spec.key, value));
                }
                Err(error) => self.errors[index] = Some(error),
            }
        }

        if self.has_errors() {
            None
        } else {
            Some(RecordInput { values })
        }
    }
}

/// One tabular assessment handed to the record engine.
#[derive(Debug, Clone)]
pub struct RecordRequest {
    pub tool: TabularTool,
    pub patient_id: String,
    pub input: RecordInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Medium,
    High,
}

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskFactor {
    pub factor: String,
    pub value: String,
    pub level: RiskLevel,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordResult {
    pub prediction: String,
    /// Probability of the positive class, clamped to `[0, 1]`.
    pub probability: f32,
    pub positive: bool,
    pub risk_factors: Vec<RiskFactor>,
    /// `(field key, weight)` in descending weight order.
    pub feature_importance: Vec<(String, f32)>,
}

impl RecordResult {
    pub fn new(prediction: impl Into<String>, probability: f32, positive: bool) -> Self {
        Self {
            prediction: prediction.into(),
            probability: probability.clamp(0.0, 1.0),
            positive,
            risk_factors: Vec::new(),
            feature_importance: Vec::new(),
        }
    }

    pub fn with_risk_factor(
        mut self,
        factor: impl Into<String>,
        value: impl Into<String>,
        level: RiskLevel,
        description: impl Into<String>,
    ) -> Self {
        self.risk_factors.push(RiskFactor {
            factor: factor.into(),
            value: value.into(),
            level,
            description: description.into(),
        });
        self
    }

    pub fn with_feature_importance(mut self, feature: impl Into<String>, weight: f32) -> Self {
        self.feature_importance.push((feature.into(), weight));
        self
    }

    /// Certainty of the reported class.
    pub fn confidence(&self) -> f32 {
        self.probability.max(1.0 - self.probability)
    }
}
