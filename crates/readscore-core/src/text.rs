//! Tokenized text: an ordered list of sentences, each an ordered list of words.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ScoreError, ScoreResult};
use crate::tokenize::Tokenizer;

/// A document already split into sentences and word tokens.
///
/// This is the shape every raw-text score path walks. Building one from a
/// plain string is the job of a [`Tokenizer`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Text {
    sentences: Vec<Vec<String>>,
}

/// Accepted JSON shapes for text input.
#[derive(Deserialize)]
#[serde(untagged)]
enum TextShape {
    Tokenized(Vec<Vec<String>>),
    Raw(String),
}

impl Text {
    /// Wrap pre-split sentences.
    pub const fn new(sentences: Vec<Vec<String>>) -> Self {
        Self { sentences }
    }

    /// Parse text from JSON.
    ///
    /// Accepts an array of arrays of strings (used as-is) or a single string
    /// (handed to `tokenizer`). Anything else is [`ScoreError::MalformedInput`].
    pub fn from_json<T: Tokenizer + ?Sized>(json: &str, tokenizer: &T) -> ScoreResult<Self> {
        let shape: TextShape = serde_json::from_str(json).map_err(|e| {
            ScoreError::MalformedInput(format!(
                "expected an array of sentences (arrays of strings) or a string: {e}"
            ))
        })?;
        Ok(match shape {
            TextShape::Tokenized(sentences) => Self::new(sentences),
            TextShape::Raw(raw) => tokenizer.tokenize(&raw),
        })
    }

    /// The sentences, in order.
    pub fn sentences(&self) -> &[Vec<String>] {
        &self.sentences
    }

    /// Number of sentences.
    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    /// Number of word tokens across all sentences.
    pub fn word_count(&self) -> usize {
        self.sentences.iter().map(Vec::len).sum()
    }

    /// Every token, in reading order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.sentences.iter().flatten().map(String::as_str)
    }

    /// `true` when there are no sentences at all.
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

impl<S, W> FromIterator<S> for Text
where
    S: IntoIterator<Item = W>,
    W: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|sentence| sentence.into_iter().map(Into::into).collect())
                .collect(),
        )
    }
}
