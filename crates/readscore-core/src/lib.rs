//! Core library for readscore.
//!
//! Classical readability formulas computed from tokenized text or from a
//! precomputed statistics bundle.
//!
//! # Modules
//!
//! - [`scores`] - GFI, ARI, FRE, FKGL, SMOG, and REL
//! - [`statistics`] - Aggregate counts the formulas read
//! - [`text`] - Sentences of word tokens
//! - [`syllables`] - Syllable counter seam and default heuristic
//! - [`tokenize`] - Raw string to [`Text`] conversion
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use readscore_core::{
//!     Formula, ProseTokenizer, ScoreInput, Scorer, Statistics, Tokenizer, VowelGroupCounter,
//! };
//!
//! let text = ProseTokenizer::new().tokenize("The cat sat on the mat. The dog ran.");
//! let report = Scorer::new(VowelGroupCounter)
//!     .report(&Formula::ALL, ScoreInput::Raw(&text))
//!     .unwrap();
//! assert_eq!(report.scores.len(), 6);
//!
//! // A precomputed bundle is used as-is.
//! let stats = Statistics {
//!     total_characters: Some(40.0),
//!     total_words: Some(10.0),
//!     total_sentences: Some(2.0),
//!     ..Statistics::default()
//! };
//! let ari = readscore_core::ari_score(ScoreInput::Precomputed(&stats)).unwrap();
//! assert!((ari - 9.185).abs() < 1e-9);
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod scores;
pub mod statistics;
pub mod syllables;
pub mod text;
pub mod tokenize;

pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use error::{ConfigError, ConfigResult, ScoreError, ScoreResult};
pub use scores::{
    Formula, FormulaScore, ScoreInput, ScoreReport, Scorer, Variant, ari_score, fkgl_score,
    fre_score, gfi_score, rel_score, smog_score,
};
pub use statistics::{PolysyllableTally, Statistic, Statistics};
pub use syllables::{SyllableCounter, VowelGroupCounter};
pub use text::Text;
pub use tokenize::{ProseTokenizer, Tokenizer};

/// Default cap on input size: 5 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
