//! Errors and advisory warnings for confidence-model fitting (input
//! validation, model/parameter checks, batch orchestration).
//!
//! This module defines the batch-level error type, [`ConfError`], the
//! model-layer error type, [`ModelError`], and the non-blocking advisory
//! [`FitWarning`]. All implement `Display`; the error types implement
//! `std::error::Error` and convert to `PyErr` at the PyO3 boundary.
//!
//! ## Conventions
//! - **Indices are 0-based** and refer to positions in the caller's input
//!   slices.
//! - Input validation errors abort a batch before any job starts; numerical
//!   problems inside a single (participant, model) job never surface here —
//!   they are absorbed into that job's `FitStatus`.
//! - Advisory warnings never block fitting; they are collected on the batch
//!   output and printed to stderr under `verbose`.

#[cfg(feature = "python-bindings")]
use pyo3::exceptions::PyValueError;
#[cfg(feature = "python-bindings")]
use pyo3::prelude::*;

/// Crate-wide result alias for batch-level confidence-fitting operations.
pub type ConfResult<T> = Result<T, ConfError>;

/// Result alias for model-layer parameter and probability computations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Batch-level error type for confidence-model fitting.
///
/// Covers input/data validation, configuration problems, and worker-pool
/// construction failures. Fail-fast: any of these aborts the batch before
/// the first job runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfError {
    // ---- Input/data validation ----
    /// No trials were provided.
    EmptyData,

    /// An input column has the wrong length.
    LengthMismatch { field: &'static str, expected: usize, actual: usize },

    /// The stimulus column must carry exactly two distinct values.
    StimulusCardinality { found: usize },

    /// Stimulus codes must be finite to admit a two-level coding.
    NonFiniteStimulus { index: usize, value: f64 },

    /// `correct` must be coded 0 or 1.
    InvalidCorrectCode { index: usize, value: u8 },

    /// Ratings must lie in 1..=L with L ≥ 2.
    RatingOutOfRange { index: usize, value: usize },

    /// Difficulty labels must lie in 1..=K.
    LevelOutOfRange { index: usize, value: usize },

    /// Only one distinct rating value is present; confidence criteria are
    /// unidentifiable.
    SingleRatingLevel,

    /// A participant has no correct trials.
    NoCorrectTrials { participant: u32 },

    /// A participant has no incorrect trials.
    NoIncorrectTrials { participant: u32 },

    // ---- Configuration ----
    /// Requested model name is not in the catalog.
    UnknownModel { name: String },

    /// The requested model set is empty.
    NoModelsRequested,

    /// Parallel execution requested with zero workers.
    InvalidWorkerCount { workers: usize },

    // ---- Worker pool ----
    /// The rayon pool could not be constructed.
    PoolBuild { text: String },

    // ---- Model layer ----
    /// Wrapper for model-layer failures surfaced at the batch boundary
    /// (e.g. simulating from an invalid parameter set).
    Model { text: String },
}

impl std::error::Error for ConfError {}

impl std::fmt::Display for ConfError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfError::EmptyData => {
                write!(f, "No trials provided")
            }
            ConfError::LengthMismatch { field, expected, actual } => {
                write!(f, "Column '{field}' length mismatch: expected {expected}, got {actual}")
            }
            ConfError::StimulusCardinality { found } => {
                write!(
                    f,
                    "Stimulus must carry exactly two distinct values, found {found}"
                )
            }
            ConfError::NonFiniteStimulus { index, value } => {
                write!(f, "Non-finite stimulus code at index {index}: {value}")
            }
            ConfError::InvalidCorrectCode { index, value } => {
                write!(f, "Invalid correct code at index {index}: {value}, must be 0 or 1")
            }
            ConfError::RatingOutOfRange { index, value } => {
                write!(f, "Rating out of range at index {index}: {value}, must be >= 1")
            }
            ConfError::LevelOutOfRange { index, value } => {
                write!(f, "Difficulty level out of range at index {index}: {value}, must be >= 1")
            }
            ConfError::SingleRatingLevel => {
                write!(
                    f,
                    "Only one distinct rating value present; at least two rating levels are \
                     required to identify confidence criteria"
                )
            }
            ConfError::NoCorrectTrials { participant } => {
                write!(f, "Participant {participant} has no correct trials")
            }
            ConfError::NoIncorrectTrials { participant } => {
                write!(f, "Participant {participant} has no incorrect trials")
            }
            ConfError::UnknownModel { name } => {
                write!(
                    f,
                    "Unknown model '{name}'; valid names are SDT, GN, WEV, PDA, IG, ITGc, \
                     ITGcm, logN, logWEV"
                )
            }
            ConfError::NoModelsRequested => {
                write!(f, "The requested model set is empty")
            }
            ConfError::InvalidWorkerCount { workers } => {
                write!(f, "Invalid worker count {workers}: must be at least 1")
            }
            ConfError::PoolBuild { text } => {
                write!(f, "Failed to build worker pool: {text}")
            }
            ConfError::Model { text } => {
                write!(f, "Model error: {text}")
            }
        }
    }
}

impl From<ModelError> for ConfError {
    fn from(err: ModelError) -> Self {
        ConfError::Model { text: err.to_string() }
    }
}

/// Model-layer error type for parameter layouts and probability evaluation.
///
/// These surface from `transform`/`predict` on structurally invalid natural
/// parameters; during optimization they are converted into `OptError` and,
/// where numerical rather than structural, absorbed by the penalty guard.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Parameter vector length does not match the model layout.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// A natural parameter is NaN/±inf.
    NonFiniteParam { index: usize, value: f64 },

    /// Sensitivities must be strictly positive.
    NonPositiveSensitivity { index: usize, value: f64 },

    /// Sensitivities must be non-decreasing over difficulty levels.
    UnorderedSensitivity { index: usize },

    /// Confidence criteria violate their ordering constraint.
    UnorderedCriteria { index: usize },

    /// A scale parameter (sigma, b, m) is non-positive or non-finite.
    NonPositiveScale { name: &'static str, value: f64 },

    /// The evidence weight w must lie strictly inside (0, 1).
    WeightOutOfRange { value: f64 },

    /// At least two rating levels are required to build a model.
    InvalidRatingCount { n_ratings: usize },
}

impl std::error::Error for ModelError {}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Parameter length mismatch: expected {expected}, actual {actual}")
            }
            ModelError::NonFiniteParam { index, value } => {
                write!(f, "Non-finite parameter at index {index}: {value}")
            }
            ModelError::NonPositiveSensitivity { index, value } => {
                write!(f, "Sensitivity at index {index} must be > 0, got {value}")
            }
            ModelError::UnorderedSensitivity { index } => {
                write!(f, "Sensitivities must be non-decreasing; violated at index {index}")
            }
            ModelError::UnorderedCriteria { index } => {
                write!(f, "Confidence criteria out of order at index {index}")
            }
            ModelError::NonPositiveScale { name, value } => {
                write!(f, "Parameter '{name}' must be finite and > 0, got {value}")
            }
            ModelError::WeightOutOfRange { value } => {
                write!(f, "Weight w must lie in (0, 1), got {value}")
            }
            ModelError::InvalidRatingCount { n_ratings } => {
                write!(f, "At least two rating levels are required, got {n_ratings}")
            }
        }
    }
}

/// Non-blocking advisory raised during data preparation.
///
/// Warnings are collected on the batch output and never abort fitting.
#[derive(Debug, Clone, PartialEq)]
pub enum FitWarning {
    /// A participant's trial count is below the recommended minimum of 400.
    SmallSample { participant: u32, n: usize },

    /// The stimulus column was auto-coerced onto the canonical −1/+1 coding.
    StimulusCoerced { low: f64, high: f64 },
}

impl std::fmt::Display for FitWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitWarning::SmallSample { participant, n } => {
                write!(
                    f,
                    "Participant {participant} has only {n} trials; at least 400 are \
                     recommended for stable estimates"
                )
            }
            FitWarning::StimulusCoerced { low, high } => {
                write!(f, "Stimulus values {low}/{high} coerced to -1/+1")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<ConfError> for PyErr {
    fn from(err: ConfError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(feature = "python-bindings")]
impl From<ModelError> for PyErr {
    fn from(err: ModelError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Display formatting for representative error and warning variants,
    //   including payload embedding.
    //
    // They intentionally DO NOT cover:
    // - PyErr conversions, which require linking the Python C API and are
    //   exercised by Python-level tests.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Validation errors carry their payload in the message so a caller can
    // identify the offending participant or column.
    //
    // Given
    // -----
    // - NoIncorrectTrials for participant 7 and a stimulus cardinality of 3.
    //
    // Expect
    // ------
    // - Messages mention "7" and "3" respectively.
    fn display_embeds_payloads() {
        let err = ConfError::NoIncorrectTrials { participant: 7 };
        assert!(err.to_string().contains('7'));
        let err = ConfError::StimulusCardinality { found: 3 };
        assert!(err.to_string().contains('3'));
    }

    #[test]
    // Purpose
    // -------
    // The small-sample advisory names both the participant and the count.
    //
    // Given
    // -----
    // - SmallSample { participant: 3, n: 120 }.
    //
    // Expect
    // ------
    // - The message contains "3", "120", and "400".
    fn small_sample_warning_is_descriptive() {
        let warning = FitWarning::SmallSample { participant: 3, n: 120 };
        let msg = warning.to_string();
        assert!(msg.contains('3') && msg.contains("120") && msg.contains("400"));
    }
}
