use std::fmt;
use std::str::FromStr;

use crate::core::{Finding, Update};

mod cve_description;
mod cvss_severity;

pub use cve_description::{
    DESCRIPTION_FIELD, LEGACY_DESCRIPTION_FIELD, TITLE_FIELD, add_cve_to_description,
    add_cve_to_description_with,
};
pub use cvss_severity::{
    SEVERITY_FIELD, severity_for_cvss, update_severity_by_cvss, update_severity_by_cvss_with,
};

/// Switches for the two compatibility behaviours of the transforms.
/// The defaults reproduce the behaviour existing consumers rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformOptions {
    /// Emit the description under the misspelled `desription` key.
    pub legacy_description_key: bool,
    /// Map a CVSS score of exactly 0 to Info instead of producing no update.
    pub zero_score_is_info: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            legacy_description_key: true,
            zero_score_is_info: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    AddCveToDescription,
    UpdateSeverityByCvss,
}

impl Transform {
    pub const ALL: [Transform; 2] = [
        Transform::AddCveToDescription,
        Transform::UpdateSeverityByCvss,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Transform::AddCveToDescription => "add-cve-to-description",
            Transform::UpdateSeverityByCvss => "update-severity-by-cvss",
        }
    }

    pub const fn summary(self) -> &'static str {
        match self {
            Transform::AddCveToDescription => {
                "prefix the title with the first prefetched CVE id and copy its description"
            }
            Transform::UpdateSeverityByCvss => "map the CVSS score to a severity tier (1..=5)",
        }
    }

    pub fn apply(self, finding: &Finding, opts: &TransformOptions) -> Update {
        match self {
            Transform::AddCveToDescription => add_cve_to_description_with(finding, opts),
            Transform::UpdateSeverityByCvss => update_severity_by_cvss_with(finding, opts),
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Transform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase().replace('_', "-");
        Transform::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Transform::ALL.iter().map(|t| t.name()).collect();
                format!("unknown transform: {s} (expected {})", names.join("|"))
            })
    }
}
