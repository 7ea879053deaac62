use crate::core::{Finding, Severity, Update};
use crate::transforms::TransformOptions;

pub const SEVERITY_FIELD: &str = "severity";

/// Severity tier for a finding's CVSS score, or `None` when there is no
/// usable score. A score of exactly 0 counts as missing unless
/// `zero_score_is_info` is set.
pub fn severity_for_cvss(finding: &Finding, opts: &TransformOptions) -> Option<Severity> {
    let score = finding.cvss.as_ref()?.score?;
    if score == 0.0 && !opts.zero_score_is_info {
        return None;
    }
    Some(Severity::from_cvss_score(score))
}

/// `{severity: 1..=5}` for a usable CVSS score, otherwise an empty update.
pub fn update_severity_by_cvss(finding: &Finding) -> Update {
    update_severity_by_cvss_with(finding, &TransformOptions::default())
}

pub fn update_severity_by_cvss_with(finding: &Finding, opts: &TransformOptions) -> Update {
    match severity_for_cvss(finding, opts) {
        Some(sev) => Update::new().with(SEVERITY_FIELD, sev.level()),
        None => Update::new(),
    }
}
