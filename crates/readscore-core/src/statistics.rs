//! Aggregate counts every score is computed from.
//!
//! A [`Statistics`] bundle is either supplied by the caller (and then used
//! verbatim) or gathered from a [`Text`] in a single pass.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ScoreError, ScoreResult};
use crate::syllables::SyllableCounter;
use crate::text::Text;

/// Tokens with more characters than this are "long words".
pub const LONG_WORD_MIN_CHARS: usize = 6;

/// Tokens with at least this many syllables are polysyllables.
pub const POLYSYLLABLE_MIN_SYLLABLES: usize = 3;

/// One key of a statistics bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statistic {
    /// `totalWords`
    TotalWords,
    /// `totalSentences`
    TotalSentences,
    /// `totalCharacters`
    TotalCharacters,
    /// `totalSyllables`
    TotalSyllables,
    /// `totalLongWords`
    TotalLongWords,
    /// `nbPolysyllables`
    NbPolysyllables,
}

impl Statistic {
    /// The key as it appears in a serialized bundle.
    pub const fn key(self) -> &'static str {
        match self {
            Self::TotalWords => "totalWords",
            Self::TotalSentences => "totalSentences",
            Self::TotalCharacters => "totalCharacters",
            Self::TotalSyllables => "totalSyllables",
            Self::TotalLongWords => "totalLongWords",
            Self::NbPolysyllables => "nbPolysyllables",
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// How `nbPolysyllables` accumulates while walking a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolysyllableTally {
    /// Each polysyllabic token adds its own syllable count (5 syllables adds 5).
    #[default]
    SyllableSum,
    /// Each polysyllabic token adds 1.
    TokenCount,
}

/// Precomputed aggregate counts.
///
/// Only the keys a formula reads need to be present. Values are plain numbers
/// so bundles produced elsewhere (averaged, scaled) are accepted as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Word tokens across all sentences.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_words: Option<f64>,
    /// Number of sentences.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_sentences: Option<f64>,
    /// Sum of token lengths in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_characters: Option<f64>,
    /// Sum of per-token syllable counts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_syllables: Option<f64>,
    /// Tokens longer than [`LONG_WORD_MIN_CHARS`] characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_long_words: Option<f64>,
    /// Polysyllable accumulator, see [`PolysyllableTally`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nb_polysyllables: Option<f64>,
}

impl Statistics {
    /// Gather every aggregate from `text` in one pass.
    ///
    /// `nbPolysyllables` uses [`PolysyllableTally::SyllableSum`].
    pub fn from_text<C>(text: &Text, counter: &C) -> Self
    where
        C: SyllableCounter + ?Sized,
    {
        Self::collect(text, Some(counter), PolysyllableTally::SyllableSum)
    }

    /// Like [`from_text`](Self::from_text) with an explicit polysyllable tally.
    pub fn from_text_with_tally<C>(text: &Text, counter: &C, tally: PolysyllableTally) -> Self
    where
        C: SyllableCounter + ?Sized,
    {
        Self::collect(text, Some(counter), tally)
    }

    /// Gather the counts that need no syllable counter.
    ///
    /// `totalSyllables` and `nbPolysyllables` are left unset.
    pub fn from_text_without_syllables(text: &Text) -> Self {
        Self::collect::<fn(&str) -> usize>(text, None, PolysyllableTally::SyllableSum)
    }

    #[tracing::instrument(skip_all, fields(sentences = text.sentence_count()))]
    fn collect<C>(text: &Text, counter: Option<&C>, tally: PolysyllableTally) -> Self
    where
        C: SyllableCounter + ?Sized,
    {
        let mut words = 0usize;
        let mut characters = 0usize;
        let mut long_words = 0usize;
        let mut syllables = 0usize;
        let mut polysyllables = 0usize;

        for token in text.tokens() {
            words += 1;
            let len = token.chars().count();
            characters += len;
            if len > LONG_WORD_MIN_CHARS {
                long_words += 1;
            }

            if let Some(counter) = counter {
                let count = counter.syllables(token);
                syllables += count;
                if count >= POLYSYLLABLE_MIN_SYLLABLES {
                    polysyllables += match tally {
                        PolysyllableTally::SyllableSum => count,
                        PolysyllableTally::TokenCount => 1,
                    };
                }
            }
        }

        let with_syllables = counter.is_some();
        Self {
            total_words: Some(words as f64),
            total_sentences: Some(text.sentence_count() as f64),
            total_characters: Some(characters as f64),
            total_syllables: with_syllables.then_some(syllables as f64),
            total_long_words: Some(long_words as f64),
            nb_polysyllables: with_syllables.then_some(polysyllables as f64),
        }
    }

    /// Parse a bundle from JSON, mapping failures to [`ScoreError::MalformedInput`].
    pub fn from_json(json: &str) -> ScoreResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ScoreError::MalformedInput(format!("invalid statistics bundle: {e}")))
    }

    /// The raw value for `statistic`, if present.
    pub const fn get(&self, statistic: Statistic) -> Option<f64> {
        match statistic {
            Statistic::TotalWords => self.total_words,
            Statistic::TotalSentences => self.total_sentences,
            Statistic::TotalCharacters => self.total_characters,
            Statistic::TotalSyllables => self.total_syllables,
            Statistic::TotalLongWords => self.total_long_words,
            Statistic::NbPolysyllables => self.nb_polysyllables,
        }
    }

    /// A present, finite, non-negative value.
    pub fn require(&self, statistic: Statistic) -> ScoreResult<f64> {
        let value = self
            .get(statistic)
            .ok_or(ScoreError::MissingStatistic(statistic))?;
        if !value.is_finite() || value < 0.0 {
            return Err(ScoreError::InvalidStatistic { statistic, value });
        }
        Ok(value)
    }

    /// Like [`require`](Self::require), and also non-zero so it can divide.
    pub fn divisor(&self, statistic: Statistic) -> ScoreResult<f64> {
        let value = self.require(statistic)?;
        if value == 0.0 {
            return Err(ScoreError::Division { statistic });
        }
        Ok(value)
    }

    /// Number of words, when known.
    pub fn words(&self) -> Option<f64> {
        self.total_words
    }
}
