use serde::{Deserialize, Serialize};

use crate::core::finding::null_as_default;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CveRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub cve_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

impl CveRecord {
    pub fn new(cve_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            cve_id: cve_id.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CvssRecord {
    #[serde(default)]
    pub score: Option<f64>,
}
