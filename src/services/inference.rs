//! Diagnostic inference: the engine contract, a simulated engine with canned
//! per-tool results, and the timeout/cancellation wrapper used by the shell.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::error::{Error, Result};
use crate::model::{AnalysisResult, ImageTool, InferenceOutcome, Outcome, Severity, StagedFile};

#[derive(Debug, Clone)]
pub struct InferenceRequest {
    pub tool: ImageTool,
    pub file: StagedFile,
    pub patient_id: Option<String>,
}

#[async_trait]
pub trait InferenceEngine: Send + Sync {
    async fn analyze(&self, request: InferenceRequest) -> Result<AnalysisResult>;
}

/// Sleeps for a fixed delay, then answers with a canned result for the tool.
#[derive(Debug, Clone)]
pub struct SimulatedInference {
    delay: Duration,
}

impl SimulatedInference {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl InferenceEngine for SimulatedInference {
    async fn analyze(&self, request: InferenceRequest) -> Result<AnalysisResult> {
        log::debug!(
            "Simulating {} on {} (patient {:?})",
            request.tool,
            request.file.name,
            request.patient_id
        );
        tokio::time::sleep(self.delay).await;

        if request.file.size_bytes == 0 {
            return Err(Error::inference(format!("{} is empty", request.file.name)));
        }
        Ok(canned_result(request.tool))
    }
}

pub fn canned_result(tool: ImageTool) -> AnalysisResult {
    match tool {
        ImageTool::BrainTumor => AnalysisResult::new("tumor", 0.93)
            .with_heatmap("heatmaps/brain-tumor.png")
            .with_finding(
                "tumor region",
                "detected",
                Severity::Severe,
                "60 x 50 px at (220, 180), confidence 0.93",
            ),
        ImageTool::Alzheimer => AnalysisResult::new("mild", 0.72)
            .with_heatmap("heatmaps/alzheimer.png")
            .with_class_probability("normal", 0.15)
            .with_class_probability("mild", 0.72)
            .with_class_probability("moderate", 0.10)
            .with_class_probability("severe", 0.03)
            .with_finding("hippocampus", "affected", Severity::Moderate, "")
            .with_finding("cerebral cortex", "affected", Severity::Mild, ""),
        ImageTool::Covid => AnalysisResult::new("covid", 0.91)
            .with_heatmap("heatmaps/covid.png")
            .with_finding(
                "lungs",
                "affected",
                Severity::Moderate,
                "Ground-glass opacities in lower lobes",
            )
            .with_finding(
                "pleura",
                "affected",
                Severity::Mild,
                "Mild pleural thickening",
            )
            .with_overall_severity(Severity::Moderate),
        ImageTool::Pneumonia => AnalysisResult::new("pneumonia", 0.88)
            .with_heatmap("heatmaps/pneumonia.png")
            .with_finding(
                "leftLung",
                "affected",
                Severity::Moderate,
                "Opacity in lower left lobe",
            )
            .with_finding(
                "rightLung",
                "affected",
                Severity::Mild,
                "Mild infiltrates in right mid zone",
            ),
    }
}

/// Runs one analysis bounded by `timeout` and abandoned once `cancel` fires
/// or its sender is dropped.
pub async fn run_inference(
    engine: Arc<dyn InferenceEngine>,
    request: InferenceRequest,
    timeout: Duration,
    cancel: watch::Receiver<bool>,
) -> InferenceOutcome {
    let tool = request.tool;
    let outcome = guarded(engine.analyze(request), timeout, cancel).await;
    if matches!(outcome, Outcome::Cancelled) {
        log::debug!("{tool}: inference abandoned");
    }
    outcome
}

/// Races `work` against `timeout` and the cancellation token.
pub async fn guarded<T, F>(
    work: F,
    timeout: Duration,
    mut cancel: watch::Receiver<bool>,
) -> Outcome<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        outcome = tokio::time::timeout(timeout, work) => match outcome {
            Ok(Ok(value)) => Outcome::Completed(value),
            Ok(Err(err)) => Outcome::Failed(err.to_string()),
            Err(_) => Outcome::TimedOut(timeout),
        },
        _ = cancelled(&mut cancel) => Outcome::Cancelled,
    }
}

async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    loop {
        if *cancel.borrow_and_update() {
            return;
        }
        if cancel.changed().await.is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FileKind;
    use std::path::PathBuf;

    fn request(tool: ImageTool, size_bytes: u64) -> InferenceRequest {
        InferenceRequest {
            tool,
            file: StagedFile {
                path: PathBuf::from("scan.png"),
                name: "scan.png".to_string(),
                size_bytes,
                kind: FileKind::Raster,
            },
            patient_id: None,
        }
    }

    fn fast_engine() -> Arc<dyn InferenceEngine> {
        Arc::new(SimulatedInference::new(Duration::from_millis(1)))
    }

    #[test]
    fn test_canned_results_match_tool_framing() {
        for tool in ImageTool::ALL {
            let result = canned_result(tool);
            let profile = tool.profile();
            assert!(profile.framing.is_positive(&result.prediction), "{tool}");
            assert!((0.0..=1.0).contains(&result.probability));
            assert!(!result.findings.is_empty());
        }
    }

    #[test]
    fn test_alzheimer_class_probabilities() {
        let result = canned_result(ImageTool::Alzheimer);
        let classes: Vec<&str> = result
            .class_probabilities
            .iter()
            .map(|(class, _)| class.as_str())
            .collect();
        assert_eq!(classes, vec!["normal", "mild", "moderate", "severe"]);
        assert_eq!(
            result.findings["hippocampus"].severity,
            Severity::Moderate
        );
    }

    #[test]
    fn test_covid_overall_severity() {
        let result = canned_result(ImageTool::Covid);
        assert_eq!(result.overall_severity, Some(Severity::Moderate));
        assert_eq!(result.findings.len(), 2);
    }

    #[tokio::test]
    async fn test_run_inference_completes() {
        let (_tx, rx) = watch::channel(false);
        let outcome = run_inference(
            fast_engine(),
            request(ImageTool::Pneumonia, 10),
            Duration::from_secs(5),
            rx,
        )
        .await;

        match outcome {
            InferenceOutcome::Completed(result) => assert_eq!(result.prediction, "pneumonia"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_run_inference_reports_engine_failure() {
        let (_tx, rx) = watch::channel(false);
        let outcome = run_inference(
            fast_engine(),
            request(ImageTool::Covid, 0),
            Duration::from_secs(5),
            rx,
        )
        .await;

        match outcome {
            InferenceOutcome::Failed(reason) => assert!(reason.contains("scan.png is empty")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_run_inference_times_out() {
        let (_tx, rx) = watch::channel(false);
        let slow = Arc::new(SimulatedInference::new(Duration::from_secs(10)));
        let outcome = run_inference(
            slow,
            request(ImageTool::BrainTumor, 10),
            Duration::from_millis(20),
            rx,
        )
        .await;

        assert!(matches!(
            outcome,
            InferenceOutcome::TimedOut(after) if after == Duration::from_millis(20)
        ));
    }

    #[tokio::test]
    async fn test_run_inference_cancelled_by_signal() {
        let (tx, rx) = watch::channel(false);
        let slow = Arc::new(SimulatedInference::new(Duration::from_secs(10)));
        let task = tokio::spawn(run_inference(
            slow,
            request(ImageTool::Alzheimer, 10),
            Duration::from_secs(30),
            rx,
        ));

        tx.send(true).unwrap();
        let outcome = task.await.unwrap();
        assert!(matches!(outcome, InferenceOutcome::Cancelled));
    }

    #[tokio::test]
    async fn test_run_inference_cancelled_when_sender_dropped() {
        let (tx, rx) = watch::channel(false);
        drop(tx);
        let slow = Arc::new(SimulatedInference::new(Duration::from_secs(10)));
        let outcome = run_inference(
            slow,
            request(ImageTool::Covid, 10),
            Duration::from_secs(30),
            rx,
        )
        .await;

        assert!(matches!(outcome, InferenceOutcome::Cancelled));
    }
}
