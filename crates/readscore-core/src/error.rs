//! Error types for readscore-core.

use thiserror::Error;

use crate::statistics::Statistic;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while computing a readability score.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    /// A formula would divide by a zero word or sentence count.
    #[error("division by zero: {statistic} is 0")]
    Division {
        /// The aggregate used as the divisor.
        statistic: Statistic,
    },

    /// A statistics bundle lacks a key the formula needs.
    #[error("statistics bundle is missing `{0}`")]
    MissingStatistic(Statistic),

    /// A statistics value is negative, NaN, or infinite.
    #[error("invalid value for `{statistic}`: {value}")]
    InvalidStatistic {
        /// The offending key.
        statistic: Statistic,
        /// The value that was supplied.
        value: f64,
    },

    /// The SMOG square root was asked for a negative operand.
    #[error("`{statistic}` is {value}; square root is undefined")]
    Domain {
        /// The offending key.
        statistic: Statistic,
        /// The value that was supplied.
        value: f64,
    },

    /// The text input has neither the tokenized nor the raw-string shape.
    #[error("malformed text input: {0}")]
    MalformedInput(String),
}

/// Result type alias using [`ScoreError`].
pub type ScoreResult<T> = Result<T, ScoreError>;
