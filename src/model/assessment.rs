//! Select patient → enter data → analyze → result lifecycle for the tabular
//! tools.
//!
//! Same contract as the image workflow: `submit` hands back an
//! [`AssessAction`] for the shell to run, and the outcome only lands while
//! its [`Ticket`] is still the one being analyzed.

use tokio::sync::watch;

use super::patient::Patient;
use super::record::{RecordForm, RecordRequest, RecordResult};
use super::tool::TabularTool;
use super::workflow::{Outcome, Ticket};

pub type AssessmentOutcome = Outcome<RecordResult>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStep {
    SelectPatient,
    EnterData,
    Analyzing,
    Result,
    Failed,
}

/// The patient an assessment is recorded against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessedPatient {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone)]
enum State {
    SelectPatient,
    EnterData(AssessedPatient),
    Analyzing {
        patient: AssessedPatient,
        ticket: Ticket,
    },
    Result {
        patient: AssessedPatient,
        result: RecordResult,
    },
    Failed {
        patient: AssessedPatient,
        reason: String,
    },
}

#[derive(Debug)]
pub struct AssessAction {
    pub ticket: Ticket,
    pub request: RecordRequest,
    pub cancel: watch::Receiver<bool>,
}

#[derive(Debug)]
pub struct RecordWorkflow {
    form: RecordForm,
    state: State,
    cancel: Option<watch::Sender<bool>>,
}

impl RecordWorkflow {
    pub fn new(tool: TabularTool) -> Self {
        Self {
            form: RecordForm::new(tool),
            state: State::SelectPatient,
            cancel: None,
        }
    }

    pub fn tool(&self) -> TabularTool {
        self.form.tool()
    }

    pub fn step(&self) -> RecordStep {
        match self.state {
            State::SelectPatient => RecordStep::SelectPatient,
            State::EnterData(_) => RecordStep::EnterData,
            State::Analyzing { .. } => RecordStep::Analyzing,
            State::Result { .. } => RecordStep::Result,
            State::Failed { .. } => RecordStep::Failed,
        }
    }

    pub fn form(&self) -> &RecordForm {
        &self.form
    }

    pub fn patient(&self) -> Option<&AssessedPatient> {
        match &self.state {
            State::SelectPatient => None,
            State::EnterData(patient)
            | State::Analyzing { patient, .. }
            | State::Result { patient, .. }
            | State::Failed { patient, .. } => Some(patient),
        }
    }

    pub fn result(&self) -> Option<&RecordResult> {
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

    fn editable(&self) -> bool {
        matches!(self.state, State::EnterData(_) | State::Failed { .. })
    }

    /// SelectPatient → EnterData, prefilling what the record already holds.
    pub fn select_patient(&mut self, patient: &Patient) -> bool {
        if !matches!(self.state, State::SelectPatient) {
            log::debug!("{}: ignoring patient selection while {:?}", self.tool(), self.step());
            return false;
        }

        self.form.prefill(patient);
        log::info!("{}: assessing patient {}", self.tool(), patient.id);
        self.state = State::EnterData(AssessedPatient {
            id: patient.id.clone(),
            name: patient.display_name(),
        });
        true
    }

    /// EnterData → SelectPatient. Entered values are kept.
    pub fn back_to_patients(&mut self) -> bool {
        if !matches!(self.state, State::EnterData(_)) {
            return false;
        }
        self.state = State::SelectPatient;
        true
    }

    pub fn set_field(&mut self, key: &str, value: impl Into<String>) -> bool {
        self.editable() && self.form.set(key, value)
    }

    pub fn load_sample(&mut self) -> bool {
        if !self.editable() {
            return false;
        }
        self.form.load_sample();
        true
    }

    /// EnterData (or Failed, as a retry) → Analyzing once the form validates.
    pub fn submit(&mut self) -> Option<AssessAction> {
        if !self.editable() {
            return None;
        }
        let Some(input) = self.form.validate() else {
            log::debug!("{}: form has validation errors", self.tool());
            return None;
        };

        let patient = match std::mem::replace(&mut self.state, State::SelectPatient) {
            State::EnterData(patient) | State::Failed { patient, .. } => patient,
            other => {
                self.state = other;
                return None;
            }
        };

        let ticket = Ticket::next();
        let (cancel_tx, cancel_rx) = watch::channel(false);
        self.cancel = Some(cancel_tx);

        let request = RecordRequest {
            tool: self.tool(),
            patient_id: patient.id.clone(),
            input,
        };
        log::info!("{}: submitting record for {}", self.tool(), patient.id);
        self.state = State::Analyzing { patient, ticket };
        Some(AssessAction {
            ticket,
            request,
            cancel: cancel_rx,
        })
    }

    /// Applies an assessment outcome. Returns false when it was stale.
    pub fn assessment_completed(&mut self, ticket: Ticket, outcome: AssessmentOutcome) -> bool {
        let patient = match std::mem::replace(&mut self.state, State::SelectPatient) {
            State::Analyzing {
                patient,
                ticket: current,
            } if current == ticket => patient,
            other => {
                self.state = other;
                log::debug!("{}: dropping stale assessment outcome", self.tool());
                return false;
            }
        };
        self.cancel = None;

        self.state = match outcome {
            Outcome::Completed(result) => {
                log::info!(
                    "{}: prediction {} ({:.2})",
                    self.tool(),
                    result.prediction,
                    result.probability
                );
                State::Result { patient, result }
            }
            Outcome::Failed(reason) => {
                log::warn!("{}: assessment failed: {reason}", self.tool());
                State::Failed { patient, reason }
            }
            Outcome::TimedOut(after) => {
                log::warn!("{}: assessment timed out after {after:?}", self.tool());
                State::Failed {
                    patient,
                    reason: format!("Assessment timed out after {} seconds", after.as_secs()),
                }
            }
            Outcome::Cancelled => State::EnterData(patient),
        };
        true
    }

    /// Analyzing → EnterData.
    pub fn cancel(&mut self) -> bool {
        let patient = match std::mem::replace(&mut self.state, State::SelectPatient) {
            State::Analyzing { patient, .. } => patient,
            other => {
                self.state = other;
                return false;
            }
        };
        self.signal_cancel();
        self.state = State::EnterData(patient);
        true
    }

    /// Result or Failed → EnterData with the same values.
    pub fn back_to_entry(&mut self) -> bool {
        let patient = match std::mem::replace(&mut self.state, State::SelectPatient) {
            State::Result { patient, .. } | State::Failed { patient, .. } => patient,
            other => {
                self.state = other;
                return false;
            }
        };
        self.state = State::EnterData(patient);
        true
    }

    /// Any step → SelectPatient with an empty form.
    pub fn reset(&mut self) {
        self.signal_cancel();
        if !matches!(self.state, State::SelectPatient) {
            log::debug!("{}: reset from {:?}", self.tool(), self.step());
        }
        self.form = RecordForm::new(self.tool());
        self.state = State::SelectPatient;
    }

    fn signal_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(true);
        }
    }
}
