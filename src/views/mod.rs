pub mod diagnostic;
pub mod header;
pub mod image_viewer;
pub mod overview;
pub mod patient_lookup;
pub mod patients;
pub mod sidebar;
pub mod tabular;

pub use diagnostic::diagnostic;
pub use header::header;
pub use overview::overview;
pub use patients::patients;
pub use sidebar::{backdrop, sidebar};
pub use tabular::tabular;
