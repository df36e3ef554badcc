pub mod analysis;
pub mod assessment;
pub mod layout;
pub mod lookup;
pub mod patient;
pub mod record;
pub mod session;
pub mod tool;
pub mod view;
pub mod workflow;

pub use analysis::{AnalysisResult, Finding, Severity};
pub use assessment::{AssessAction, AssessmentOutcome, RecordStep, RecordWorkflow};
pub use layout::{LayoutController, LayoutEvent};
pub use lookup::{FetchState, PatientLookup};
pub use patient::{Patient, PatientPage, PatientQuery};
pub use record::{RecordForm, RecordInput, RecordRequest, RecordResult, RiskLevel};
pub use session::{Identity, User};
pub use tool::{ImageTool, TabularTool};
pub use view::{ContentVariant, ViewRouter, ViewSelector};
pub use workflow::{
    AnalysisWorkflow, FileKind, InferenceOutcome, Outcome, Phase, PreviewState, StagedFile,
    Ticket, WorkflowAction,
};
