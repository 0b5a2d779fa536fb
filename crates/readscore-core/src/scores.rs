//! The six readability formulas.
//!
//! | Formula | Reference arithmetic |
//! |---|---|
//! | GFI  | `0.4 * (words/sentences + 100 * longWords/sentences)` |
//! | ARI  | `4.71 * (characters/words + 0.5 * words/sentences) - 21.43` |
//! | FRE  | `206.835 - 1.015 * (words/sentences) - 84.6 * (syllables/words)` |
//! | FKGL | `0.39 * (words/sentences) + 11.8 * (syllables/words) - 15.59` |
//! | SMOG | `1.043 * sqrt(nbPolysyllables * (30/sentences)) + 3.1291` |
//! | REL  | `207 - 1.015 * (words/sentences) - 73.6 * (syllables/words)` |
//!
//! Under [`Variant::Reference`], GFI, ARI, and SMOG keep long-standing
//! arithmetic that differs from the published formulas: GFI divides
//! long words by sentences, ARI scales both ratios by 4.71, and SMOG sums the
//! syllables of polysyllabic words instead of counting them. The published
//! versions are available through [`Variant::Textbook`].
//!
//! Every score is computed from a [`Statistics`] bundle. With
//! [`ScoreInput::Precomputed`] the bundle is used as given; with
//! [`ScoreInput::Raw`] it is gathered from the text first.
#![allow(clippy::suboptimal_flops)]

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ScoreError, ScoreResult};
use crate::statistics::{PolysyllableTally, Statistic, Statistics};
use crate::syllables::{SyllableCounter, VowelGroupCounter};
use crate::text::Text;

/// Below this many words the reference considers GFI unreliable.
pub const SMALL_SAMPLE_WORDS: f64 = 101.0;

/// What a score is computed from.
///
/// A precomputed bundle always wins: the text is never consulted, so a
/// syllable counter is never called.
#[derive(Debug, Clone, Copy)]
pub enum ScoreInput<'a> {
    /// Aggregates supplied by the caller.
    Precomputed(&'a Statistics),
    /// Tokenized text to aggregate.
    Raw(&'a Text),
}

impl<'a> From<&'a Statistics> for ScoreInput<'a> {
    fn from(stats: &'a Statistics) -> Self {
        Self::Precomputed(stats)
    }
}

impl<'a> From<&'a Text> for ScoreInput<'a> {
    fn from(text: &'a Text) -> Self {
        Self::Raw(text)
    }
}

/// Which arithmetic to apply for GFI, ARI, and SMOG.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Variant {
    /// Long-standing arithmetic, quirks included.
    #[default]
    Reference,
    /// Published formulas.
    Textbook,
}

impl Variant {
    /// How raw text feeds `nbPolysyllables` under this variant.
    pub const fn polysyllable_tally(self) -> PolysyllableTally {
        match self {
            Self::Reference => PolysyllableTally::SyllableSum,
            Self::Textbook => PolysyllableTally::TokenCount,
        }
    }

    /// Lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::Textbook => "textbook",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A readability formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Formula {
    /// Gunning fog index.
    Gfi,
    /// Automated readability index.
    Ari,
    /// Flesch reading ease.
    Fre,
    /// Flesch-Kincaid grade level.
    Fkgl,
    /// Simple Measure of Gobbledygook.
    Smog,
    /// Reading ease level (French Flesch adaptation).
    Rel,
}

impl Formula {
    /// Every formula, in display order.
    pub const ALL: [Self; 6] = [
        Self::Gfi,
        Self::Ari,
        Self::Fre,
        Self::Fkgl,
        Self::Smog,
        Self::Rel,
    ];

    /// Uppercase acronym ("GFI").
    pub const fn acronym(self) -> &'static str {
        match self {
            Self::Gfi => "GFI",
            Self::Ari => "ARI",
            Self::Fre => "FRE",
            Self::Fkgl => "FKGL",
            Self::Smog => "SMOG",
            Self::Rel => "REL",
        }
    }

    /// Full name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gfi => "Gunning fog index",
            Self::Ari => "Automated readability index",
            Self::Fre => "Flesch reading ease",
            Self::Fkgl => "Flesch-Kincaid grade level",
            Self::Smog => "Simple Measure of Gobbledygook",
            Self::Rel => "Reading ease level",
        }
    }

    /// How to read the number.
    pub const fn description(self) -> &'static str {
        match self {
            Self::Gfi => "years of formal education needed on first reading (6 to 18)",
            Self::Ari => "US grade level needed to comprehend the text (1 to 14)",
            Self::Fre => "100 is easy (grade 5); below 30 is post-college",
            Self::Fkgl => "US grade level; 5 suits fifth graders",
            Self::Smog => "years of education needed to understand the text",
            Self::Rel => "Flesch reading ease rescaled for French word lengths",
        }
    }

    /// Whether the raw-text path needs a syllable counter.
    pub const fn needs_syllables(self) -> bool {
        matches!(self, Self::Fre | Self::Fkgl | Self::Smog | Self::Rel)
    }

    /// Apply the formula to a statistics bundle.
    pub fn evaluate(self, stats: &Statistics, variant: Variant) -> ScoreResult<f64> {
        match self {
            Self::Gfi => gunning_fog(stats, variant),
            Self::Ari => automated_readability(stats, variant),
            Self::Fre => {
                let (words_per_sentence, syllables_per_word) = flesch_ratios(stats)?;
                Ok(206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word)
            }
            Self::Fkgl => {
                let (words_per_sentence, syllables_per_word) = flesch_ratios(stats)?;
                Ok(0.39 * words_per_sentence + 11.8 * syllables_per_word - 15.59)
            }
            Self::Smog => smog(stats),
            Self::Rel => {
                let (words_per_sentence, syllables_per_word) = flesch_ratios(stats)?;
                Ok(207.0 - 1.015 * words_per_sentence - 73.6 * syllables_per_word)
            }
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.acronym())
    }
}

fn gunning_fog(stats: &Statistics, variant: Variant) -> ScoreResult<f64> {
    let sentences = stats.divisor(Statistic::TotalSentences)?;
    let long_words = stats.require(Statistic::TotalLongWords)?;
    match variant {
        Variant::Reference => {
            let words = stats.require(Statistic::TotalWords)?;
            Ok(0.4 * ((words / sentences) + 100.0 * long_words / sentences))
        }
        Variant::Textbook => {
            let words = stats.divisor(Statistic::TotalWords)?;
            Ok(0.4 * ((words / sentences) + 100.0 * long_words / words))
        }
    }
}

fn automated_readability(stats: &Statistics, variant: Variant) -> ScoreResult<f64> {
    let sentences = stats.divisor(Statistic::TotalSentences)?;
    let words = stats.divisor(Statistic::TotalWords)?;
    let characters = stats.require(Statistic::TotalCharacters)?;
    Ok(match variant {
        Variant::Reference => 4.71 * ((characters / words) + 0.5 * words / sentences) - 21.43,
        Variant::Textbook => 4.71 * (characters / words) + 0.5 * (words / sentences) - 21.43,
    })
}

/// `(words/sentences, syllables/words)`, shared by FRE, FKGL, and REL.
fn flesch_ratios(stats: &Statistics) -> ScoreResult<(f64, f64)> {
    let sentences = stats.divisor(Statistic::TotalSentences)?;
    let words = stats.divisor(Statistic::TotalWords)?;
    let syllables = stats.require(Statistic::TotalSyllables)?;
    Ok((words / sentences, syllables / words))
}

fn smog(stats: &Statistics) -> ScoreResult<f64> {
    let sentences = stats.divisor(Statistic::TotalSentences)?;
    let statistic = Statistic::NbPolysyllables;
    let polysyllables = stats
        .get(statistic)
        .ok_or(ScoreError::MissingStatistic(statistic))?;
    if polysyllables < 0.0 {
        return Err(ScoreError::Domain {
            statistic,
            value: polysyllables,
        });
    }
    let polysyllables = stats.require(statistic)?;
    Ok(1.043 * (polysyllables * (30.0 / sentences)).sqrt() + 3.1291)
}

/// Resolve an input to the bundle a formula reads.
fn gather<C>(input: ScoreInput<'_>, counter: Option<&C>, variant: Variant) -> Statistics
where
    C: SyllableCounter + ?Sized,
{
    match input {
        ScoreInput::Precomputed(stats) => *stats,
        ScoreInput::Raw(text) => match counter {
            Some(counter) => {
                Statistics::from_text_with_tally(text, counter, variant.polysyllable_tally())
            }
            None => Statistics::from_text_without_syllables(text),
        },
    }
}

fn score_reference<C>(formula: Formula, input: ScoreInput<'_>, counter: &C) -> ScoreResult<f64>
where
    C: SyllableCounter + ?Sized,
{
    let counter = formula.needs_syllables().then_some(counter);
    formula.evaluate(
        &gather(input, counter, Variant::Reference),
        Variant::Reference,
    )
}

/// Gunning fog index (reference arithmetic).
pub fn gfi_score(input: ScoreInput<'_>) -> ScoreResult<f64> {
    score_reference(Formula::Gfi, input, &VowelGroupCounter)
}

/// Automated readability index (reference arithmetic).
pub fn ari_score(input: ScoreInput<'_>) -> ScoreResult<f64> {
    score_reference(Formula::Ari, input, &VowelGroupCounter)
}

/// Flesch reading ease.
pub fn fre_score<C>(input: ScoreInput<'_>, counter: &C) -> ScoreResult<f64>
where
    C: SyllableCounter + ?Sized,
{
    score_reference(Formula::Fre, input, counter)
}

/// Flesch-Kincaid grade level.
pub fn fkgl_score<C>(input: ScoreInput<'_>, counter: &C) -> ScoreResult<f64>
where
    C: SyllableCounter + ?Sized,
{
    score_reference(Formula::Fkgl, input, counter)
}

/// Simple Measure of Gobbledygook (reference arithmetic).
pub fn smog_score<C>(input: ScoreInput<'_>, counter: &C) -> ScoreResult<f64>
where
    C: SyllableCounter + ?Sized,
{
    score_reference(Formula::Smog, input, counter)
}

/// Reading ease level for French text.
pub fn rel_score<C>(input: ScoreInput<'_>, counter: &C) -> ScoreResult<f64>
where
    C: SyllableCounter + ?Sized,
{
    score_reference(Formula::Rel, input, counter)
}

/// One formula's result within a [`ScoreReport`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormulaScore {
    /// The formula.
    pub formula: Formula,
    /// Its score, unrounded.
    pub score: f64,
}

/// Several scores computed from one aggregation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoreReport {
    /// Arithmetic used for GFI, ARI, and SMOG.
    pub variant: Variant,
    /// The bundle every score was computed from.
    pub statistics: Statistics,
    /// Scores in the requested order.
    pub scores: Vec<FormulaScore>,
    /// Fewer than [`SMALL_SAMPLE_WORDS`] words: GFI in particular is unreliable.
    pub small_sample: bool,
}

impl ScoreReport {
    /// The score for `formula`, if it was requested.
    pub fn get(&self, formula: Formula) -> Option<f64> {
        self.scores
            .iter()
            .find(|s| s.formula == formula)
            .map(|s| s.score)
    }
}

/// Scores text with an injected syllable counter and a chosen [`Variant`].
///
/// ```
/// use readscore_core::{Formula, ScoreInput, Scorer, Text, VowelGroupCounter};
///
/// let text: Text = [vec!["cat"]].into_iter().collect();
/// let fre = Scorer::new(VowelGroupCounter)
///     .score(Formula::Fre, ScoreInput::Raw(&text))
///     .unwrap();
/// assert!((fre - 121.22).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct Scorer<C = VowelGroupCounter> {
    counter: C,
    variant: Variant,
}

impl Default for Scorer<VowelGroupCounter> {
    fn default() -> Self {
        Self::new(VowelGroupCounter)
    }
}

impl<C: SyllableCounter> Scorer<C> {
    /// Scorer using `counter` and the reference arithmetic.
    pub const fn new(counter: C) -> Self {
        Self {
            counter,
            variant: Variant::Reference,
        }
    }

    /// Switch arithmetic variant.
    #[must_use]
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// The active variant.
    pub const fn variant(&self) -> Variant {
        self.variant
    }

    /// Gather every aggregate from `text` the way this scorer would.
    pub fn statistics(&self, text: &Text) -> Statistics {
        Statistics::from_text_with_tally(text, &self.counter, self.variant.polysyllable_tally())
    }

    /// Compute one score.
    #[tracing::instrument(skip(self, input), fields(variant = %self.variant))]
    pub fn score(&self, formula: Formula, input: ScoreInput<'_>) -> ScoreResult<f64> {
        let counter = formula.needs_syllables().then_some(&self.counter);
        let stats = gather(input, counter, self.variant);
        formula.evaluate(&stats, self.variant)
    }

    /// Compute several scores from a single aggregation pass.
    ///
    /// Fails on the first formula that fails.
    #[tracing::instrument(skip(self, input), fields(variant = %self.variant))]
    pub fn report(&self, formulas: &[Formula], input: ScoreInput<'_>) -> ScoreResult<ScoreReport> {
        let counter = formulas
            .iter()
            .any(|f| f.needs_syllables())
            .then_some(&self.counter);
        let statistics = gather(input, counter, self.variant);

        let scores = formulas
            .iter()
            .map(|&formula| {
                formula
                    .evaluate(&statistics, self.variant)
                    .map(|score| FormulaScore { formula, score })
            })
            .collect::<ScoreResult<Vec<_>>>()?;

        let small_sample = statistics
            .words()
            .is_some_and(|words| words < SMALL_SAMPLE_WORDS);
        if small_sample {
            tracing::warn!(
                words = statistics.words(),
                "fewer than {SMALL_SAMPLE_WORDS} words; scores are unreliable"
            );
        }

        Ok(ScoreReport {
            variant: self.variant,
            statistics,
            scores,
            small_sample,
        })
    }
}
