use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::transforms::TransformOptions;

#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    pub output: OutputConfig,
    pub cve: CveConfig,
    pub severity: SeverityConfig,
    pub log: LogConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputConfig {
    pub pretty: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CveConfig {
    pub legacy_description_key: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeverityConfig {
    pub zero_score_is_info: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogConfig {
    pub enabled: bool,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        let transform = TransformOptions::default();
        Self {
            output: OutputConfig { pretty: true },
            cve: CveConfig {
                legacy_description_key: transform.legacy_description_key,
            },
            severity: SeverityConfig {
                zero_score_is_info: transform.zero_score_is_info,
            },
            log: LogConfig { enabled: false },
            config_path: None,
        }
    }
}

impl EffectiveConfig {
    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            legacy_description_key: self.cve.legacy_description_key,
            zero_score_is_info: self.severity.zero_score_is_info,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    output: Option<RawOutputConfig>,
    cve: Option<RawCveConfig>,
    severity: Option<RawSeverityConfig>,
    log: Option<RawLogConfig>,
}

#[derive(Debug, Deserialize)]
struct RawOutputConfig {
    pretty: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawCveConfig {
    legacy_description_key: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawSeverityConfig {
    zero_score_is_info: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawLogConfig {
    enabled: Option<bool>,
}

pub fn default_config_path(home_dir: &Path) -> PathBuf {
    home_dir.join(".config/vulnenrich/config.toml")
}

pub fn load(config_path: Option<&Path>, home_dir: &Path) -> Result<EffectiveConfig> {
    let mut cfg = EffectiveConfig::default();

    let path = config_path
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| default_config_path(home_dir));

    if path.exists() {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let raw: RawConfig = toml::from_str(&s).context("failed to parse config file (TOML)")?;
        apply_raw_config(&mut cfg, raw);
        cfg.config_path = Some(path.display().to_string());
    }

    apply_env_overrides(&mut cfg)?;

    Ok(cfg)
}

fn apply_raw_config(cfg: &mut EffectiveConfig, raw: RawConfig) {
    if let Some(pretty) = raw.output.and_then(|o| o.pretty) {
        cfg.output.pretty = pretty;
    }
    if let Some(legacy) = raw.cve.and_then(|c| c.legacy_description_key) {
        cfg.cve.legacy_description_key = legacy;
    }
    if let Some(zero) = raw.severity.and_then(|s| s.zero_score_is_info) {
        cfg.severity.zero_score_is_info = zero;
    }
    if let Some(enabled) = raw.log.and_then(|l| l.enabled) {
        cfg.log.enabled = enabled;
    }
}

fn apply_env_overrides(cfg: &mut EffectiveConfig) -> Result<()> {
    if let Ok(v) = std::env::var("VULNENRICH_OUTPUT_PRETTY") {
        cfg.output.pretty = parse_bool(&v).context("VULNENRICH_OUTPUT_PRETTY")?;
    }
    if let Ok(v) = std::env::var("VULNENRICH_CVE_LEGACY_DESCRIPTION_KEY") {
        cfg.cve.legacy_description_key =
            parse_bool(&v).context("VULNENRICH_CVE_LEGACY_DESCRIPTION_KEY")?;
    }
    if let Ok(v) = std::env::var("VULNENRICH_SEVERITY_ZERO_SCORE_IS_INFO") {
        cfg.severity.zero_score_is_info =
            parse_bool(&v).context("VULNENRICH_SEVERITY_ZERO_SCORE_IS_INFO")?;
    }
    if let Ok(v) = std::env::var("VULNENRICH_LOG_ENABLED") {
        cfg.log.enabled = parse_bool(&v).context("VULNENRICH_LOG_ENABLED")?;
    }

    Ok(())
}

fn parse_bool(s: &str) -> Result<bool> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow::anyhow!(
            "invalid boolean: {s} (expected true|false|1|0|yes|no|on|off)"
        )),
    }
}
