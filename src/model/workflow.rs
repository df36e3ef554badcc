//! Upload → analyze → result lifecycle shared by every image-based tool.
//!
//! Asynchronous work is not run here. Transitions hand back a
//! [`WorkflowAction`] that the shell turns into a task, and completions come
//! back tagged with the [`Ticket`] they were issued under. A completion whose
//! ticket no longer matches the current state is dropped.

use iced::widget::image::Handle;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;

use super::analysis::AnalysisResult;
use super::tool::ImageTool;

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// Process-unique id for one piece of asynchronous work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn next() -> Self {
        Ticket(NEXT_TICKET.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Raster,
    Dicom,
}

/// A picked input file that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub path: PathBuf,
    pub name: String,
    pub size_bytes: u64,
    pub kind: FileKind,
}

#[derive(Debug, Clone)]
pub enum PreviewState {
    Loading,
    Ready(Handle),
    Unavailable(String),
}

/// How one piece of guarded asynchronous work ended.
#[derive(Debug, Clone)]
pub enum Outcome<T> {
    Completed(T),
    Failed(String),
    TimedOut(Duration),
    Cancelled,
}

pub type InferenceOutcome = Outcome<AnalysisResult>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Staged,
    Analyzing,
    Result,
    Failed,
}

#[derive(Debug, Clone)]
struct Staged {
    file: StagedFile,
    preview: PreviewState,
    preview_ticket: Ticket,
}

#[derive(Debug, Clone)]
enum State {
    Idle,
    Staged(Staged),
    Analyzing { staged: Staged, ticket: Ticket },
    Result { staged: Staged, result: AnalysisResult },
    Failed { staged: Staged, reason: String },
}

/// Work the shell must start on behalf of the workflow.
#[derive(Debug)]
pub enum WorkflowAction {
    LoadPreview {
        ticket: Ticket,
        file: StagedFile,
    },
    RunInference {
        ticket: Ticket,
        file: StagedFile,
        cancel: watch::Receiver<bool>,
    },
}

#[derive(Debug)]
pub struct AnalysisWorkflow {
    tool: ImageTool,
    state: State,
    cancel: Option<watch::Sender<bool>>,
}

impl AnalysisWorkflow {
    pub fn new(tool: ImageTool) -> Self {
        Self {
            tool,
            state: State::Idle,
            cancel: None,
        }
    }

    pub fn tool(&self) -> ImageTool {
        self.tool
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            State::Idle => Phase::Idle,
            State::Staged(_) => Phase::Staged,
            State::Analyzing { .. } => Phase::Analyzing,
            State::Result { .. } => Phase::Result,
            State::Failed { .. } => Phase::Failed,
        }
    }

    pub fn staged_file(&self) -> Option<&StagedFile> {
        self.staged().map(|staged| &staged.file)
    }

    pub fn preview(&self) -> Option<&PreviewState> {
        self.staged().map(|staged| &staged.preview)
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.state {
            State::Result { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match &self.state {
            State::Failed { reason, .. } => Some(reason),
            _ => None,
        }
    }

    fn staged(&self) -> Option<&Staged> {
        match &self.state {
            State::Idle => None,
            State::Staged(staged)
            | State::Analyzing { staged, .. }
            | State::Result { staged, .. }
            | State::Failed { staged, .. } => Some(staged),
        }
    }

    fn staged_mut(&mut self) -> Option<&mut Staged> {
        match &mut self.state {
            State::Idle => None,
            State::Staged(staged)
            | State::Analyzing { staged, .. }
            | State::Result { staged, .. }
            | State::Failed { staged, .. } => Some(staged),
        }
    }

    /// Idle → Staged. An absent file, or any other phase, is a no-op.
    pub fn select_file(&mut self, file: Option<StagedFile>) -> Option<WorkflowAction> {
        let file = file?;
        if !matches!(self.state, State::Idle) {
            log::debug!("{}: ignoring file selection while {:?}", self.tool, self.phase());
            return None;
        }

        let ticket = Ticket::next();
        log::info!("{}: staged {}", self.tool, file.path.display());
        self.state = State::Staged(Staged {
            file: file.clone(),
            preview: PreviewState::Loading,
            preview_ticket: ticket,
        });
        Some(WorkflowAction::LoadPreview { ticket, file })
    }

    /// Applies a finished preview read. Returns false when it was stale.
    pub fn preview_loaded(&mut self, ticket: Ticket, preview: Result<Handle, String>) -> bool {
        let tool = self.tool;
        match self.staged_mut() {
            Some(staged) if staged.preview_ticket == ticket => {
                staged.preview = match preview {
                    Ok(handle) => PreviewState::Ready(handle),
                    Err(reason) => {
                        log::warn!("{tool}: preview unavailable: {reason}");
                        PreviewState::Unavailable(reason)
                    }
                };
                true
            }
            _ => {
                log::debug!("{tool}: dropping stale preview");
                false
            }
        }
    }

    /// Staged (or Failed, as a retry) → Analyzing.
    pub fn submit(&mut self) -> Option<WorkflowAction> {
        let staged = match std::mem::replace(&mut self.state, State::Idle) {
            State::Staged(staged) | State::Failed { staged, .. } => staged,
            other => {
                self.state = other;
                return None;
            }
        };

        let ticket = Ticket::next();
        let (cancel_tx, cancel_rx) = watch::channel(false);
        self.cancel = Some(cancel_tx);

        let file = staged.file.clone();
        log::info!("{}: submitting {} for analysis", self.tool, file.name);
        self.state = State::Analyzing { staged, ticket };
        Some(WorkflowAction::RunInference {
            ticket,
            file,
            cancel: cancel_rx,
        })
    }

    /// Applies an inference outcome. Returns false when it was stale.
    pub fn inference_completed(&mut self, ticket: Ticket, outcome: InferenceOutcome) -> bool {
        let staged = match std::mem::replace(&mut self.state, State::Idle) {
            State::Analyzing {
                staged,
                ticket: current,
            } if current == ticket => staged,
            other => {
                self.state = other;
                log::debug!("{}: dropping stale inference outcome", self.tool);
                return false;
            }
        };
        self.cancel = None;

        self.state = match outcome {
            InferenceOutcome::Completed(result) => {
                log::info!(
                    "{}: prediction {} ({:.2})",
                    self.tool,
                    result.prediction,
                    result.probability
                );
                State::Result { staged, result }
            }
            InferenceOutcome::Failed(reason) => {
                log::warn!("{}: analysis failed: {reason}", self.tool);
                State::Failed { staged, reason }
            }
            InferenceOutcome::TimedOut(after) => {
                log::warn!("{}: analysis timed out after {after:?}", self.tool);
                State::Failed {
                    staged,
                    reason: format!("Analysis timed out after {} seconds", after.as_secs()),
                }
            }
            // The token fired while still analyzing: keep the file staged.
            InferenceOutcome::Cancelled => State::Staged(staged),
        };
        true
    }

    /// Staged or Analyzing → Idle.
    pub fn cancel(&mut self) -> bool {
        match self.state {
            State::Staged(_) | State::Analyzing { .. } => {
                self.clear();
                true
            }
            _ => false,
        }
    }

    /// Any phase → Idle.
    pub fn reset(&mut self) {
        self.clear();
    }

    fn clear(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(true);
        }
        if !matches!(self.state, State::Idle) {
            log::debug!("{}: back to idle from {:?}", self.tool, self.phase());
        }
        self.state = State::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str) -> StagedFile {
        StagedFile {
            path: PathBuf::from(format!("/scans/{name}")),
            name: name.to_string(),
            size_bytes: 1024,
            kind: FileKind::Raster,
        }
    }

    fn handle() -> Handle {
        Handle::from_bytes(vec![0u8; 4])
    }

    fn staged(workflow: &mut AnalysisWorkflow, name: &str) -> Ticket {
        match workflow.select_file(Some(image(name))) {
            Some(WorkflowAction::LoadPreview { ticket, .. }) => ticket,
            other => panic!("expected LoadPreview, got {other:?}"),
        }
    }

    fn submitted(workflow: &mut AnalysisWorkflow) -> (Ticket, watch::Receiver<bool>) {
        match workflow.submit() {
            Some(WorkflowAction::RunInference { ticket, cancel, .. }) => (ticket, cancel),
            other => panic!("expected RunInference, got {other:?}"),
        }
    }

    fn assert_idle(workflow: &AnalysisWorkflow) {
        assert_eq!(workflow.phase(), Phase::Idle);
        assert!(workflow.staged_file().is_none());
        assert!(workflow.preview().is_none());
        assert!(workflow.result().is_none());
        assert!(workflow.failure().is_none());
    }

    #[test]
    fn test_starts_idle() {
        let workflow = AnalysisWorkflow::new(ImageTool::BrainTumor);
        assert_idle(&workflow);
        assert_eq!(workflow.tool(), ImageTool::BrainTumor);
    }

    #[test]
    fn test_select_without_file_is_noop() {
        let mut workflow = AnalysisWorkflow::new(ImageTool::Covid);
        assert!(workflow.select_file(None).is_none());
        assert_idle(&workflow);
    }

    #[test]
    fn test_end_to_end_brain_tumor() {
        let mut workflow = AnalysisWorkflow::new(ImageTool::BrainTumor);

        let preview_ticket = staged(&mut workflow, "imageA.png");
        assert_eq!(workflow.phase(), Phase::Staged);
        assert_eq!(workflow.staged_file(), Some(&image("imageA.png")));
        assert!(matches!(workflow.preview(), Some(PreviewState::Loading)));
        assert!(workflow.result().is_none());

        assert!(workflow.preview_loaded(preview_ticket, Ok(handle())));
        assert!(matches!(workflow.preview(), Some(PreviewState::Ready(_))));

        let (ticket, _cancel) = submitted(&mut workflow);
        assert_eq!(workflow.phase(), Phase::Analyzing);
        assert!(workflow.result().is_none());

        let expected = AnalysisResult::new("tumor", 0.93);
        assert!(workflow.inference_completed(ticket, InferenceOutcome::Completed(expected.clone())));
        assert_eq!(workflow.phase(), Phase::Result);
        assert_eq!(workflow.result(), Some(&expected));
        assert!(workflow.staged_file().is_some());

        workflow.reset();
        assert_idle(&workflow);
    }

    #[test]
    fn test_select_ignored_outside_idle() {
        let mut workflow = AnalysisWorkflow::new(ImageTool::Pneumonia);
        staged(&mut workflow, "first.png");
        assert!(workflow.select_file(Some(image("second.png"))).is_none());
        assert_eq!(workflow.staged_file().map(|f| f.name.as_str()), Some("first.png"));
    }

    #[test]
    fn test_submit_requires_staged_file() {
        let mut workflow = AnalysisWorkflow::new(ImageTool::Pneumonia);
        assert!(workflow.submit().is_none());
        assert_idle(&workflow);

        staged(&mut workflow, "scan.png");
        submitted(&mut workflow);
        assert!(workflow.submit().is_none(), "no double submit while analyzing");
        assert_eq!(workflow.phase(), Phase::Analyzing);
    }

    #[test]
    fn test_cancel_from_staged_drops_preview() {
        let mut workflow = AnalysisWorkflow::new(ImageTool::Alzheimer);
        let ticket = staged(&mut workflow, "scan.png");

        assert!(workflow.cancel());
        assert_idle(&workflow);

        assert!(!workflow.preview_loaded(ticket, Ok(handle())));
        assert_idle(&workflow);
    }

    #[test]
    fn test_stale_preview_from_previous_file_is_ignored() {
        let mut workflow = AnalysisWorkflow::new(ImageTool::Alzheimer);
        let old = staged(&mut workflow, "old.png");
        workflow.cancel();
        let current = staged(&mut workflow, "new.png");

        assert!(!workflow.preview_loaded(old, Ok(handle())));
        assert!(matches!(workflow.preview(), Some(PreviewState::Loading)));
        assert!(workflow.preview_loaded(current, Err("corrupt".into())));
        assert!(matches!(workflow.preview(), Some(PreviewState::Unavailable(_))));
    }

    #[test]
    fn test_stale_inference_after_reset_is_ignored() {
        let mut workflow = AnalysisWorkflow::new(ImageTool::Covid);
        staged(&mut workflow, "xray.png");
        let (ticket, _cancel) = submitted(&mut workflow);

        workflow.reset();
        let applied = workflow.inference_completed(
            ticket,
            InferenceOutcome::Completed(AnalysisResult::new("covid", 0.91)),
        );
        assert!(!applied);
        assert_idle(&workflow);
    }

    #[test]
    fn test_stale_inference_after_cancel_and_restage_is_ignored() {
        let mut workflow = AnalysisWorkflow::new(ImageTool::Covid);
        staged(&mut workflow, "xray.png");
        let (old_ticket, _cancel) = submitted(&mut workflow);
        assert!(workflow.cancel());

        staged(&mut workflow, "other.png");
        let applied = workflow.inference_completed(
            old_ticket,
            InferenceOutcome::Completed(AnalysisResult::new("covid", 0.91)),
        );
        assert!(!applied);
        assert_eq!(workflow.phase(), Phase::Staged);
        assert!(workflow.result().is_none());
    }

    #[test]
    fn test_cancel_signals_token() {
        let mut workflow = AnalysisWorkflow::new(ImageTool::Covid);
        staged(&mut workflow, "xray.png");
        let (_ticket, cancel) = submitted(&mut workflow);
        assert!(!*cancel.borrow());

        assert!(workflow.cancel());
        assert!(*cancel.borrow());
        assert_idle(&workflow);
    }

    #[test]
    fn test_dropping_workflow_closes_token() {
        let mut workflow = AnalysisWorkflow::new(ImageTool::Covid);
        staged(&mut workflow, "xray.png");
        let (_ticket, cancel) = submitted(&mut workflow);

        drop(workflow);
        assert!(cancel.has_changed().is_err());
    }

    #[test]
    fn test_failure_path_and_retry() {
        let mut workflow = AnalysisWorkflow::new(ImageTool::Pneumonia);
        staged(&mut workflow, "xray.png");
        let (ticket, _cancel) = submitted(&mut workflow);

        assert!(workflow.inference_completed(
            ticket,
            InferenceOutcome::TimedOut(Duration::from_secs(30))
        ));
        assert_eq!(workflow.phase(), Phase::Failed);
        assert_eq!(workflow.failure(), Some("Analysis timed out after 30 seconds"));
        assert!(workflow.result().is_none());
        assert!(workflow.staged_file().is_some());

        let (retry, _cancel) = submitted(&mut workflow);
        assert_ne!(retry, ticket);
        assert!(workflow.inference_completed(
            retry,
            InferenceOutcome::Failed("model offline".into())
        ));
        assert_eq!(workflow.failure(), Some("model offline"));

        workflow.reset();
        assert_idle(&workflow);
    }

    #[test]
    fn test_new_analysis_replaces_previous_result() {
        let mut workflow = AnalysisWorkflow::new(ImageTool::BrainTumor);
        staged(&mut workflow, "a.png");
        let (ticket, _cancel) = submitted(&mut workflow);
        workflow.inference_completed(
            ticket,
            InferenceOutcome::Completed(AnalysisResult::new("tumor", 0.93)),
        );

        assert!(workflow.select_file(Some(image("b.png"))).is_none());
        workflow.reset();
        staged(&mut workflow, "b.png");
        assert!(workflow.result().is_none());

        let (ticket, _cancel) = submitted(&mut workflow);
        let second = AnalysisResult::new("no_tumor", 0.12);
        workflow.inference_completed(ticket, InferenceOutcome::Completed(second.clone()));
        assert_eq!(workflow.result(), Some(&second));
    }

    #[test]
    fn test_reset_from_every_phase() {
        let mut workflow = AnalysisWorkflow::new(ImageTool::BrainTumor);
        workflow.reset();
        assert_idle(&workflow);

        staged(&mut workflow, "a.png");
        workflow.reset();
        assert_idle(&workflow);

        staged(&mut workflow, "a.png");
        submitted(&mut workflow);
        workflow.reset();
        assert_idle(&workflow);
    }

    #[test]
    fn test_cancel_not_available_from_result() {
        let mut workflow = AnalysisWorkflow::new(ImageTool::BrainTumor);
        staged(&mut workflow, "a.png");
        let (ticket, _cancel) = submitted(&mut workflow);
        workflow.inference_completed(
            ticket,
            InferenceOutcome::Completed(AnalysisResult::new("tumor", 0.93)),
        );
        assert!(!workflow.cancel());
        assert_eq!(workflow.phase(), Phase::Result);
    }

    #[test]
    fn test_tickets_are_unique_across_instances() {
        let mut first = AnalysisWorkflow::new(ImageTool::Covid);
        let mut second = AnalysisWorkflow::new(ImageTool::Covid);
        let a = staged(&mut first, "a.png");
        let b = staged(&mut second, "b.png");
        assert_ne!(a, b);
        assert!(!second.preview_loaded(a, Ok(handle())));
    }
}
