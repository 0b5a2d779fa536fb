//! Score command: compute readability formulas for a file.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use readscore_core::{
    Config, Formula, ScoreInput, ScoreReport, Scorer, Statistics, Variant, VowelGroupCounter,
};

use super::{load_text, read_input_file};

/// Arguments for the `score` subcommand.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Text file to score (plain text, markdown, or tokenized JSON).
    #[arg(required_unless_present = "statistics", conflicts_with = "statistics")]
    pub file: Option<Utf8PathBuf>,

    /// Score a precomputed statistics bundle (JSON) instead of a text file.
    #[arg(short, long, value_name = "FILE")]
    pub statistics: Option<Utf8PathBuf>,

    /// Formula to compute (repeatable). Defaults to the configured list, or all.
    #[arg(short = 'f', long = "formula", value_enum, value_name = "FORMULA")]
    pub formulas: Vec<Formula>,

    /// Arithmetic for GFI, ARI, and SMOG.
    #[arg(long, value_enum)]
    pub variant: Option<Variant>,

    /// Decimal places in text output.
    #[arg(long)]
    pub precision: Option<usize>,
}

/// Score a text file or statistics bundle.
#[instrument(name = "cmd_score", skip_all)]
pub fn cmd_score(args: ScoreArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    let formulas = if args.formulas.is_empty() {
        config.formulas()
    } else {
        args.formulas
    };
    let variant = args.variant.or(config.variant).unwrap_or_default();
    let precision = args.precision.unwrap_or_else(|| config.precision());
    let max_input = config.input_limit();

    debug!(
        file = ?args.file,
        statistics = ?args.statistics,
        ?formulas,
        %variant,
        "executing score command"
    );

    let scorer = Scorer::new(VowelGroupCounter).with_variant(variant);
    let report = match (args.statistics, args.file) {
        (Some(path), _) => score_statistics(&scorer, &formulas, &path, max_input)?,
        (None, Some(path)) => {
            let text = load_text(&path, max_input)?;
            scorer
                .report(&formulas, ScoreInput::Raw(&text))
                .with_context(|| format!("failed to score {path}"))?
        }
        (None, None) => anyhow::bail!("provide a text file or --statistics"),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, precision);
    }

    Ok(())
}

fn score_statistics(
    scorer: &Scorer,
    formulas: &[Formula],
    path: &Utf8Path,
    max_input: Option<usize>,
) -> anyhow::Result<ScoreReport> {
    let content = read_input_file(path, max_input)?;
    let stats =
        Statistics::from_json(&content).with_context(|| format!("failed to parse {path}"))?;
    scorer
        .report(formulas, ScoreInput::Precomputed(&stats))
        .with_context(|| format!("failed to score {path}"))
}

fn print_report(report: &ScoreReport, precision: usize) {
    for entry in &report.scores {
        println!(
            "{:<5} {:>9.precision$}  {}",
            entry.formula.acronym().bold(),
            entry.score,
            entry.formula.name().dimmed(),
        );
    }
    if report.small_sample {
        println!(
            "{}",
            "note: fewer than 101 words; scores are unreliable".yellow()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(file: Option<Utf8PathBuf>, statistics: Option<Utf8PathBuf>) -> ScoreArgs {
        ScoreArgs {
            file,
            statistics,
            formulas: Vec::new(),
            variant: None,
            precision: None,
        }
    }

    fn write(tmp: &TempDir, name: &str, contents: &str) -> Utf8PathBuf {
        let path = tmp.path().join(name);
        fs::write(&path, contents).unwrap();
        Utf8PathBuf::try_from(path).unwrap()
    }

    #[test]
    fn scores_text_file() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "a.txt", "The cat sat on the mat. The dog ran fast.");
        assert!(cmd_score(args(Some(path), None), false, &Config::default()).is_ok());
    }

    #[test]
    fn scores_statistics_bundle_as_json() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            &tmp,
            "stats.json",
            r#"{"totalWords": 10, "totalSentences": 2, "totalCharacters": 40}"#,
        );
        let mut a = args(None, Some(path));
        a.formulas = vec![Formula::Ari];
        assert!(cmd_score(a, true, &Config::default()).is_ok());
    }

    #[test]
    fn statistics_path_uses_bundle_directly() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            &tmp,
            "stats.json",
            r#"{"totalWords": 10, "totalSentences": 2, "totalLongWords": 4}"#,
        );
        let report = score_statistics(&Scorer::default(), &[Formula::Gfi], &path, None).unwrap();
        assert!((report.get(Formula::Gfi).unwrap() - 82.0).abs() < 1e-9);
    }

    #[test]
    fn zero_sentences_fails() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            &tmp,
            "stats.json",
            r#"{"totalWords": 10, "totalSentences": 0, "totalLongWords": 4}"#,
        );
        let mut a = args(None, Some(path));
        a.formulas = vec![Formula::Gfi];
        let err = cmd_score(a, false, &Config::default()).unwrap_err();
        assert!(format!("{err:#}").contains("division by zero"));
    }

    #[test]
    fn empty_text_fails() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "empty.txt", "");
        assert!(cmd_score(args(Some(path), None), false, &Config::default()).is_err());
    }

    #[test]
    fn missing_file_fails() {
        let a = args(Some(Utf8PathBuf::from("/nonexistent/file.txt")), None);
        assert!(cmd_score(a, false, &Config::default()).is_err());
    }
}
