use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::core::Update;
use crate::transforms::Transform;

#[derive(Debug, Serialize)]
struct ApplyLog {
    schema_version: &'static str,
    tool_version: String,
    command: &'static str,
    transform: String,
    started_at: String,
    finished_at: String,
    input: String,
    findings: usize,
    updated: usize,
    empty: usize,
}

/// Where the input findings came from, as recorded in the run log.
#[derive(Debug, Clone)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

pub fn logs_dir(home_dir: &Path) -> PathBuf {
    home_dir.join(".config/vulnenrich/logs")
}

pub fn write_apply_log(
    home_dir: &Path,
    started_at: OffsetDateTime,
    finished_at: OffsetDateTime,
    transform: Transform,
    input: &InputSource,
    updates: &[Update],
) -> Result<PathBuf> {
    let dir = logs_dir(home_dir);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory: {}", dir.display()))?;

    let pid = std::process::id();
    let ts = finished_at.unix_timestamp_nanos();
    let path = dir.join(format!("apply-{pid}-{ts}.json"));

    let updated = updates.iter().filter(|u| !u.is_empty()).count();

    let log = ApplyLog {
        schema_version: "1.0",
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        command: "apply",
        transform: transform.to_string(),
        started_at: format_ts(started_at),
        finished_at: format_ts(finished_at),
        input: match input {
            InputSource::Stdin => "-".to_string(),
            InputSource::File(p) => mask_home(p, home_dir),
        },
        findings: updates.len(),
        updated,
        empty: updates.len() - updated,
    };

    let buf = serde_json::to_vec_pretty(&log).context("failed to serialize log (JSON)")?;
    std::fs::write(&path, buf)
        .with_context(|| format!("failed to write log: {}", path.display()))?;
    Ok(path)
}

fn format_ts(ts: OffsetDateTime) -> String {
    ts.format(&Rfc3339).unwrap_or_else(|_| "unknown".to_string())
}

fn mask_home(path: &Path, home_dir: &Path) -> String {
    let Ok(stripped) = path.strip_prefix(home_dir) else {
        return path.display().to_string();
    };
    let stripped = stripped.display().to_string();
    if stripped.is_empty() {
        "~".to_string()
    } else {
        format!("~/{stripped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn make_temp_home() -> PathBuf {
        static HOME_SEQ: AtomicU64 = AtomicU64::new(0);
        let seq = HOME_SEQ.fetch_add(1, Ordering::Relaxed);
        let home = std::env::temp_dir().join(format!(
            "vulnenrich-log-test-{}-{seq}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&home);
        std::fs::create_dir_all(&home).expect("create home");
        home
    }

    #[test]
    fn write_apply_log_counts_updates_and_masks_input() {
        let home = make_temp_home();
        let updates = vec![
            Update::new().with("severity", 5u8),
            Update::new(),
            Update::new().with("severity", 2u8),
        ];

        let started_at = OffsetDateTime::now_utc();
        let log_path = write_apply_log(
            &home,
            started_at,
            started_at,
            Transform::UpdateSeverityByCvss,
            &InputSource::File(home.join("findings/batch.json")),
            &updates,
        )
        .expect("write log");

        assert!(log_path.starts_with(logs_dir(&home)));
        let bytes = std::fs::read(&log_path).expect("read log");
        let v: serde_json::Value = serde_json::from_slice(&bytes).expect("parse json");
        assert_eq!(v.get("command").and_then(|s| s.as_str()), Some("apply"));
        assert_eq!(
            v.get("transform").and_then(|s| s.as_str()),
            Some("update-severity-by-cvss")
        );
        assert_eq!(
            v.get("input").and_then(|s| s.as_str()),
            Some("~/findings/batch.json")
        );
        assert_eq!(v.get("findings").and_then(|n| n.as_u64()), Some(3));
        assert_eq!(v.get("updated").and_then(|n| n.as_u64()), Some(2));
        assert_eq!(v.get("empty").and_then(|n| n.as_u64()), Some(1));

        let _ = std::fs::remove_dir_all(&home);
    }

    #[test]
    fn mask_home_leaves_foreign_paths_alone() {
        let home = Path::new("/home/someone");
        assert_eq!(mask_home(Path::new("/tmp/x.json"), home), "/tmp/x.json");
        assert_eq!(mask_home(home, home), "~");
    }
}
