//! Command-line front end
//!
//! File I/O lives here only; everything below it works on strings.

use anyhow::{Context, bail};
use std::fs;
use std::path::Path;

use crate::analysis::{self, AnalysisConfig, CampaignAnalysis};
use crate::flow::{StopAt, compute_flow_state};
use crate::tree::locate;
use crate::types::block::BlockId;
use crate::types::script::SourceFile;
use crate::types::state::FlowSeed;
use crate::validation::{self, KnownNames, ScriptReport, Severity, ValidationConfig};

/// Options shared by the subcommands
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub analysis: AnalysisConfig,
    pub validation: ValidationConfig,
}

impl Options {
    /// Parse `--lang L` and `--config C` out of `args`, returning the rest.
    pub fn parse(args: &[String]) -> anyhow::Result<(Self, Vec<String>)> {
        let mut options = Self::default();
        let mut rest = Vec::new();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--lang" => {
                    let Some(lang) = iter.next() else {
                        bail!("--lang needs a language code");
                    };
                    options.analysis.primary_language = lang.clone();
                }
                "--config" => {
                    let Some(path) = iter.next() else {
                        bail!("--config needs a file path");
                    };
                    let json = read(Path::new(path))?;
                    options.validation = ValidationConfig::from_json_str(&json)
                        .with_context(|| format!("invalid config file '{path}'"))?;
                }
                _ => rest.push(arg.clone()),
            }
        }

        Ok((options, rest))
    }
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
}

/// Load a campaign file in the primary language and analyze it.
pub fn load(path: &Path, options: &Options) -> anyhow::Result<CampaignAnalysis> {
    let text = read(path)?;
    let file_name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
    let source = SourceFile::new(file_name, options.analysis.primary_language.clone(), text);
    Ok(analysis::analyze_sources(&[source], &options.analysis))
}

/// Validate every script of a campaign file.
pub fn run_check(path: &Path, options: &Options) -> anyhow::Result<Vec<ScriptReport>> {
    let analysis = load(path, options)?;
    let known = KnownNames::from(&analysis);

    let reports: Vec<ScriptReport> = analysis
        .script_map
        .values()
        .map(|&index| {
            validation::validate_parsed(&analysis.scripts[index], &known, &options.validation)
        })
        .collect();

    for report in &reports {
        print_report(&path.display().to_string(), report);
    }
    let errors: usize = reports.iter().map(|report| report.error_count).sum();
    let warnings: usize = reports.iter().map(|report| report.warning_count).sum();
    println!();
    println!(
        "{} scripts checked: {errors} errors, {warnings} warnings",
        reports.len()
    );

    Ok(reports)
}

fn print_report(file: &str, report: &ScriptReport) {
    if report.is_clean() {
        return;
    }
    println!("SCRIPT {}", report.script);
    for issue in report.issues() {
        let severity = match issue.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        let block = issue
            .block_id
            .as_ref()
            .map_or(String::new(), |id| format!(" ({id})"));
        println!(
            "  {file}:{}: {severity}[{}] {}{block}",
            issue.line, issue.rule, issue.message
        );
    }
}

/// Print the campaign analysis as JSON.
pub fn run_dump(path: &Path, options: &Options) -> anyhow::Result<()> {
    let analysis = load(path, options)?;
    let json = serde_json::to_string_pretty(&analysis).context("failed to serialize analysis")?;
    println!("{json}");
    Ok(())
}

/// Print the flow state of `script` right before `block`, or at its end.
pub fn run_state(
    path: &Path,
    script: &str,
    block: Option<&str>,
    options: &Options,
) -> anyhow::Result<()> {
    let analysis = load(path, options)?;
    let Some(blocks) = analysis.blocks(script) else {
        bail!("script '{script}' not found in '{}'", path.display());
    };

    let stop = match block {
        Some(id) => {
            let id = BlockId::from(id);
            if locate(blocks, &id).is_none() {
                bail!("block '{id}' not found in script '{script}'");
            }
            StopAt::Block(id)
        }
        None => StopAt::End,
    };

    let state = compute_flow_state(blocks, &stop, &FlowSeed::from(&analysis));
    let json = serde_json::to_string_pretty(&state).context("failed to serialize flow state")?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn options_take_lang_and_leave_positionals() {
        let (options, rest) =
            Options::parse(&args(&["file.txt", "--lang", "IT", "intro"])).unwrap();
        assert_eq!(options.analysis.primary_language, "IT");
        assert_eq!(rest, args(&["file.txt", "intro"]));
    }

    #[test]
    fn options_need_values() {
        assert!(Options::parse(&args(&["--lang"])).is_err());
        assert!(Options::parse(&args(&["--config"])).is_err());
    }

    #[test]
    fn missing_file_is_reported_with_its_path() {
        let err = load(Path::new("no/such/campaign.txt"), &Options::default()).unwrap_err();
        assert!(err.to_string().contains("no/such/campaign.txt"));
    }
}
