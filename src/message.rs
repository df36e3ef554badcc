use iced::widget::image::Handle;
use std::path::PathBuf;

use crate::model::{
    AssessmentOutcome, InferenceOutcome, LayoutEvent, PatientPage, Ticket, ViewSelector,
};

#[derive(Debug, Clone)]
pub enum Message {
    Navigate(ViewSelector),
    ToggleSidebar,
    Layout(LayoutEvent),
    PatientsLoaded {
        mount: Ticket,
        result: Result<PatientPage, String>,
    },
    RefreshPatients,
    PatientSearch(String),
    PatientSelected(String),
    PickFile,
    FilePicked {
        mount: Ticket,
        path: Option<PathBuf>,
    },
    PreviewLoaded {
        ticket: Ticket,
        result: Result<Handle, String>,
    },
    Submit,
    Cancel,
    Reset,
    InferenceFinished {
        ticket: Ticket,
        outcome: InferenceOutcome,
    },
    RecordFieldChanged {
        key: &'static str,
        value: String,
    },
    LoadSampleRecord,
    BackToPatients,
    BackToEntry,
    AssessmentFinished {
        ticket: Ticket,
        outcome: AssessmentOutcome,
    },
}
