//! Record assessment: the engine contract for the tabular tools and the
//! simulated engine's answers.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use super::inference::{guarded, SimulatedInference};
use crate::error::{Error, Result};
use crate::model::{
    AssessmentOutcome, Outcome, RecordInput, RecordRequest, RecordResult, RiskLevel, TabularTool,
};

#[async_trait]
pub trait RecordEngine: Send + Sync {
    async fn assess(&self, request: RecordRequest) -> Result<RecordResult>;
}

#[async_trait]
impl RecordEngine for SimulatedInference {
    async fn assess(&self, request: RecordRequest) -> Result<RecordResult> {
        log::debug!(
            "Simulating {} for patient {}",
            request.tool,
            request.patient_id
        );
        tokio::time::sleep(self.delay()).await;
        simulated_record_result(request.tool, &request.input)
    }
}

const BREAST_CANCER_IMPORTANCE: [(&str, f32); 10] = [
    ("concave_points_mean", 0.28),
    ("radius_mean", 0.21),
    ("perimeter_mean", 0.18),
    ("area_mean", 0.15),
    ("concavity_mean", 0.08),
    ("texture_mean", 0.05),
    ("compactness_mean", 0.03),
    ("symmetry_mean", 0.01),
    ("smoothness_mean", 0.01),
    ("fractal_dimension_mean", 0.0),
];

pub fn simulated_record_result(tool: TabularTool, input: &RecordInput) -> Result<RecordResult> {
    match tool {
        TabularTool::BreastCancer => Ok(BREAST_CANCER_IMPORTANCE.iter().fold(
            RecordResult::new("malignant", 0.87, true),
            |result, (feature, weight)| result.with_feature_importance(*feature, *weight),
        )),
        TabularTool::Diabetes => diabetes_result(input),
    }
}

fn required(input: &RecordInput, key: &str) -> Result<f64> {
    input
        .number(key)
        .ok_or_else(|| Error::inference(format!("missing value for {key}")))
}

/// Scores the record from the clinical thresholds for each risk factor.
fn diabetes_result(input: &RecordInput) -> Result<RecordResult> {
    let age = required(input, "age")?;
    let bmi = required(input, "bmi")?;
    let glucose = required(input, "blood_glucose_level")?;
    let hba1c = required(input, "HbA1c_level")?;

    let mut factors: Vec<(&str, String, RiskLevel, &str)> = Vec::new();

    if age > 45.0 {
        let level = if age > 65.0 { RiskLevel::High } else { RiskLevel::Medium };
        factors.push(("Age", format!("{age}"), level, "Age above 45 increases diabetes risk"));
    }
    if bmi >= 25.0 {
        let level = if bmi >= 30.0 { RiskLevel::High } else { RiskLevel::Medium };
        let description = if bmi >= 30.0 {
            "BMI in the obese range"
        } else {
            "BMI in the overweight range"
        };
        factors.push(("BMI", format!("{bmi}"), level, description));
    }
    if glucose >= 140.0 {
        let level = if glucose >= 200.0 { RiskLevel::High } else { RiskLevel::Medium };
        factors.push((
            "Blood glucose",
            format!("{glucose} mg/dL"),
            level,
            "Elevated blood glucose level",
        ));
    }
    if hba1c >= 5.7 {
        let level = if hba1c >= 6.5 { RiskLevel::High } else { RiskLevel::Medium };
        let description = if hba1c >= 6.5 {
            "HbA1c in the diabetic range"
        } else {
            "HbA1c in the prediabetic range"
        };
        factors.push(("HbA1c", format!("{hba1c}%"), level, description));
    }
    if input.choice("hypertension") == Some("Yes") {
        factors.push((
            "Hypertension",
            "Yes".to_string(),
            RiskLevel::Medium,
            "Hypertension is associated with diabetes",
        ));
    }
    if input.choice("heart_disease") == Some("Yes") {
        factors.push((
            "Heart disease",
            "Yes".to_string(),
            RiskLevel::Medium,
            "Heart disease is associated with diabetes",
        ));
    }
    if let Some(smoking @ ("current" | "ever")) = input.choice("smoking_history") {
        factors.push((
            "Smoking",
            smoking.to_string(),
            RiskLevel::Medium,
            "Smoking increases diabetes risk",
        ));
    }

    let score: f32 = factors
        .iter()
        .map(|(_, _, level, _)| match level {
            RiskLevel::High => 0.2,
            RiskLevel::Medium => 0.1,
        })
        .sum();
    let probability = (0.08 + score).min(0.97);
    let positive = probability >= 0.5;
    let prediction = if positive { "diabetic" } else { "non-diabetic" };

    Ok(factors.into_iter().fold(
        RecordResult::new(prediction, probability, positive),
        |result, (factor, value, level, description)| {
            result.with_risk_factor(factor, value, level, description)
        },
    ))
}

/// Runs one assessment under the same timeout and cancellation rules as
/// image inference.
pub async fn run_assessment(
    engine: Arc<dyn RecordEngine>,
    request: RecordRequest,
    timeout: Duration,
    cancel: watch::Receiver<bool>,
) -> AssessmentOutcome {
    let tool = request.tool;
    let outcome = guarded(engine.assess(request), timeout, cancel).await;
    if matches!(outcome, Outcome::Cancelled) {
        log::debug!("{tool}: assessment abandoned");
    }
    outcome
}
