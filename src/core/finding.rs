use crate::core::{CveRecord, CvssRecord};
use serde::{Deserialize, Deserializer, Serialize};

/// A vulnerability finding as handed over by the pipeline runner.
///
/// `title`, `description` and `prefetched_cve` decode absent and `null`
/// values as empty, so the transforms never see a missing attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prefetched_cve: Vec<CveRecord>,
    #[serde(default)]
    pub cvss: Option<CvssRecord>,
}

impl Finding {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_cve(mut self, cve: CveRecord) -> Self {
        self.prefetched_cve.push(cve);
        self
    }

    pub fn with_cvss_score(mut self, score: Option<f64>) -> Self {
        self.cvss = Some(CvssRecord { score });
        self
    }
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
