//! Stats command: print the aggregate bundle the formulas read.

use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use readscore_core::{Config, Scorer, Statistic, Variant, VowelGroupCounter};

use super::load_text;

/// Arguments for the `stats` subcommand.
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Text file to aggregate (plain text, markdown, or tokenized JSON).
    pub file: Utf8PathBuf,

    /// Polysyllable accumulation: `reference` sums syllables, `textbook` counts words.
    #[arg(long, value_enum)]
    pub variant: Option<Variant>,
}

const ORDER: [Statistic; 6] = [
    Statistic::TotalWords,
    Statistic::TotalSentences,
    Statistic::TotalCharacters,
    Statistic::TotalSyllables,
    Statistic::TotalLongWords,
    Statistic::NbPolysyllables,
];

/// Aggregate a text file. The JSON output can be fed back to `score --statistics`.
#[instrument(name = "cmd_stats", skip_all, fields(file = %args.file))]
pub fn cmd_stats(args: StatsArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    let variant = args.variant.or(config.variant).unwrap_or_default();
    debug!(%variant, "executing stats command");

    let text = load_text(&args.file, config.input_limit())?;
    let stats = Scorer::new(VowelGroupCounter)
        .with_variant(variant)
        .statistics(&text);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        for statistic in ORDER {
            if let Some(value) = stats.get(statistic) {
                println!("{:<16} {value}", statistic.key().dimmed());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn aggregates_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.txt");
        fs::write(&path, "The cat sat. The dog ran.").unwrap();
        let args = StatsArgs {
            file: Utf8PathBuf::try_from(path).unwrap(),
            variant: None,
        };
        assert!(cmd_stats(args, true, &Config::default()).is_ok());
    }

    #[test]
    fn missing_file_fails() {
        let args = StatsArgs {
            file: Utf8PathBuf::from("/nonexistent/a.txt"),
            variant: Some(Variant::Textbook),
        };
        assert!(cmd_stats(args, false, &Config::default()).is_err());
    }
}
