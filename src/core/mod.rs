mod cve;
mod finding;
mod severity;
mod update;

pub use cve::{CveRecord, CvssRecord};
pub use finding::Finding;
pub use severity::Severity;
pub use update::{FieldValue, Update};
