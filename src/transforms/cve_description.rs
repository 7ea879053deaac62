use crate::core::{Finding, Update};
use crate::transforms::TransformOptions;

pub const TITLE_FIELD: &str = "title";
pub const DESCRIPTION_FIELD: &str = "description";
/// Key existing consumers read the description from.
pub const LEGACY_DESCRIPTION_FIELD: &str = "desription";

/// Prefixes the title with the first prefetched CVE id and replaces the
/// description with that CVE's description. Without prefetched CVEs the
/// original title and description are echoed back.
///
/// Always returns both keys. Not idempotent: feeding an already prefixed
/// title back in with the same CVE prefixes it again.
pub fn add_cve_to_description(finding: &Finding) -> Update {
    add_cve_to_description_with(finding, &TransformOptions::default())
}

pub fn add_cve_to_description_with(finding: &Finding, opts: &TransformOptions) -> Update {
    let (title, description) = match finding.prefetched_cve.first() {
        Some(cve) => (
            format!("{} - {}", cve.cve_id, finding.title),
            cve.description.clone(),
        ),
        None => (finding.title.clone(), finding.description.clone()),
    };

    let description_field = if opts.legacy_description_key {
        LEGACY_DESCRIPTION_FIELD
    } else {
        DESCRIPTION_FIELD
    };

    Update::new()
        .with(TITLE_FIELD, title)
        .with(description_field, description)
}
