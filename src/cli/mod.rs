use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use serde::Serialize;
use time::OffsetDateTime;

use crate::core::{Finding, Update};
use crate::input::FindingsDoc;
use crate::logs::InputSource;
use crate::transforms::{Transform, TransformOptions, severity_for_cvss};
use crate::ui::UiConfig;

#[derive(Debug, Parser)]
#[command(
    name = "vulnenrich",
    version,
    about = "Derive partial updates for vulnerability findings (CVE title prefix, CVSS severity tier)"
)]
pub struct Cli {
    #[arg(long, global = true)]
    pub json: bool,
    #[arg(long, global = true)]
    pub verbose: bool,
    #[arg(long, global = true)]
    pub quiet: bool,
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Write a JSON run log for `apply` regardless of `log.enabled`.
    #[arg(long, global = true)]
    pub log: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Apply(ApplyArgs),
    List,
    Severity(SeverityArgs),
    Completion(CompletionArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct ApplyArgs {
    pub transform: String,
    /// Finding JSON (object or array); `-` or omitted reads stdin.
    #[arg(long)]
    pub input: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SeverityArgs {
    #[arg(allow_negative_numbers = true)]
    pub score: f64,
}

#[derive(Debug, Args)]
pub struct CompletionArgs {
    pub shell: String,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[arg(long)]
    pub show: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let home_dir = crate::platform::effective_home_dir()?;

    let env_config_path = std::env::var_os("VULNENRICH_CONFIG").map(PathBuf::from);
    let cfg = crate::config::load(
        cli.config.as_deref().or(env_config_path.as_deref()),
        &home_dir,
    )
    .map_err(crate::exit::invalid_args_err)?;

    let ui_cfg = UiConfig {
        quiet: cli.quiet,
        verbose: cli.verbose,
    };
    if let Some(path) = &cfg.config_path {
        crate::ui::note(&ui_cfg, format!("config: {path}"));
    }

    let opts = cfg.transform_options();

    match cli.command {
        Commands::Apply(args) => {
            let transform = args
                .transform
                .parse::<Transform>()
                .map_err(crate::exit::invalid_args)?;
            let source = match args.input {
                Some(path) if path.as_os_str() != "-" => InputSource::File(path),
                _ => InputSource::Stdin,
            };

            let started_at = OffsetDateTime::now_utc();
            let doc = crate::input::read(&source).map_err(crate::exit::input_failed_err)?;
            crate::ui::note(
                &ui_cfg,
                format!("transform: {transform}, findings: {}", doc.len()),
            );

            let updates = apply_doc(transform, &doc, &opts);
            match &updates {
                AppliedDoc::One(update) => write_json(update, cfg.output.pretty)?,
                AppliedDoc::Many(updates) => write_json(updates, cfg.output.pretty)?,
            }

            if cli.log || cfg.log.enabled {
                let finished_at = OffsetDateTime::now_utc();
                let path = crate::logs::write_apply_log(
                    &home_dir,
                    started_at,
                    finished_at,
                    transform,
                    &source,
                    updates.as_slice(),
                )?;
                crate::ui::note(&ui_cfg, format!("log: {}", path.display()));
            }
        }
        Commands::List => {
            if cli.json {
                write_json(&transform_list(), cfg.output.pretty)?;
            } else {
                crate::ui::print_transforms(&ui_cfg);
            }
        }
        Commands::Severity(args) => {
            let finding = Finding::default().with_cvss_score(Some(args.score));
            let severity = severity_for_cvss(&finding, &opts);
            if cli.json {
                let out = SeverityOut {
                    severity: severity.map(|s| s.level()),
                    label: severity.map(|s| s.as_str()),
                };
                write_json(&out, cfg.output.pretty)?;
            } else {
                crate::ui::print_severity(severity, &ui_cfg);
            }
        }
        Commands::Completion(args) => {
            let shell = parse_shell(&args.shell)?;
            let mut cmd = Cli::command();
            let mut out = std::io::stdout().lock();
            clap_complete::generate(shell, &mut cmd, "vulnenrich", &mut out);
        }
        Commands::Config(args) => {
            if args.show {
                if cli.json {
                    write_json(&cfg, cfg.output.pretty)?;
                } else {
                    println!("{}", toml::to_string_pretty(&cfg)?);
                }
            } else if !ui_cfg.quiet {
                eprintln!("config: use `vulnenrich config --show`");
            }
        }
    }

    Ok(())
}

enum AppliedDoc {
    One(Update),
    Many(Vec<Update>),
}

impl AppliedDoc {
    fn as_slice(&self) -> &[Update] {
        match self {
            AppliedDoc::One(update) => std::slice::from_ref(update),
            AppliedDoc::Many(updates) => updates,
        }
    }
}

fn apply_doc(transform: Transform, doc: &FindingsDoc, opts: &TransformOptions) -> AppliedDoc {
    match doc {
        FindingsDoc::One(finding) => AppliedDoc::One(transform.apply(finding, opts)),
        FindingsDoc::Many(findings) => AppliedDoc::Many(
            findings
                .iter()
                .map(|finding| transform.apply(finding, opts))
                .collect(),
        ),
    }
}

#[derive(Debug, Serialize)]
struct TransformInfo {
    name: &'static str,
    summary: &'static str,
}

fn transform_list() -> Vec<TransformInfo> {
    Transform::ALL
        .into_iter()
        .map(|t| TransformInfo {
            name: t.name(),
            summary: t.summary(),
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct SeverityOut {
    #[serde(skip_serializing_if = "Option::is_none")]
    severity: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<&'static str>,
}

fn write_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    use std::io::Write;

    let buf = if pretty {
        serde_json::to_vec_pretty(value)?
    } else {
        serde_json::to_vec(value)?
    };

    let mut stdout = std::io::stdout().lock();
    match stdout.write_all(&buf) {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => return Ok(()),
        Err(err) => return Err(err.into()),
    }
    match stdout.write_all(b"\n") {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn parse_shell(s: &str) -> Result<clap_complete::Shell> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "bash" => Ok(clap_complete::Shell::Bash),
        "zsh" => Ok(clap_complete::Shell::Zsh),
        "fish" => Ok(clap_complete::Shell::Fish),
        other => Err(crate::exit::invalid_args(format!(
            "unsupported shell: {other} (expected bash|zsh|fish)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CveRecord;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn apply_doc_keeps_document_shape() {
        let opts = TransformOptions::default();
        let one = FindingsDoc::One(Finding::default().with_cvss_score(Some(9.5)));
        let AppliedDoc::One(update) = apply_doc(Transform::UpdateSeverityByCvss, &one, &opts)
        else {
            panic!("expected a single update");
        };
        assert_eq!(update.integer("severity"), Some(5));

        let many = FindingsDoc::Many(vec![
            Finding::new("Bug", "desc").with_cve(CveRecord::new("CVE-2021-1", "bad thing")),
            Finding::new("Other", "kept"),
        ]);
        let applied = apply_doc(Transform::AddCveToDescription, &many, &opts);
        let updates = applied.as_slice();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].text("title"), Some("CVE-2021-1 - Bug"));
        assert_eq!(updates[1].text("desription"), Some("kept"));
    }

    #[test]
    fn parse_shell_rejects_unknown() {
        assert!(parse_shell("Bash").is_ok());
        assert!(parse_shell("powershell").is_err());
    }

    #[test]
    fn severity_out_omits_missing_tier() {
        let v = serde_json::to_value(SeverityOut {
            severity: None,
            label: None,
        })
        .expect("serialize");
        assert_eq!(v, serde_json::json!({}));
    }
}
