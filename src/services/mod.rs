pub mod assessment;
pub mod inference;
pub mod patients;
pub mod session;

pub use assessment::{run_assessment, RecordEngine};
pub use inference::{run_inference, InferenceEngine, InferenceRequest, SimulatedInference};
pub use patients::{JsonPatientStore, PatientCache, PatientService};
pub use session::{FileSession, SessionSource};
