//! Error types emitted by the carmatch CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use carmatch_core::{CatalogError, MatchError, PersonaError, PreferenceStoreError};
use carmatch_scorer::{FeedbackError, LearningRateError, RatingError, SessionError};
use thiserror::Error;

/// Errors emitted by the carmatch CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name of the missing option.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// The requested operation requires a missing compile-time feature.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        /// Cargo feature that must be enabled.
        feature: &'static str,
        /// Description of the attempted operation.
        action: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist or is not a file")]
    MissingSourceFile {
        /// Option naming the path.
        field: &'static str,
        /// The configured path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Option naming the path.
        field: &'static str,
        /// The configured path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Option naming the path.
        field: &'static str,
        /// The configured path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// A persona answer was blank.
    #[error(transparent)]
    InvalidPersona(#[from] PersonaError),
    /// The rating was outside 1–5.
    #[error(transparent)]
    InvalidRating(#[from] RatingError),
    /// An interactive rating was not a whole number.
    #[error("rating '{raw}' is not a whole number from 1 to 5")]
    InvalidRatingText {
        /// The rejected input.
        raw: String,
    },
    /// The learning rate was outside (0, 1].
    #[error(transparent)]
    InvalidLearningRate(#[from] LearningRateError),
    /// Loading the car catalog failed.
    #[error("failed to load catalog: {0}")]
    LoadCatalog(#[from] CatalogError),
    /// Opening the preference table failed.
    #[error("failed to open preference table: {0}")]
    OpenPreferences(#[from] PreferenceStoreError),
    /// Ranking the catalog failed.
    #[error(transparent)]
    Match(#[from] MatchError),
    /// Applying a rating failed.
    #[error(transparent)]
    Feedback(Box<FeedbackError>),
    /// An interactive session step failed.
    #[error(transparent)]
    Session(Box<SessionError>),
    /// Standard input closed before every question was answered.
    #[error("input ended before the {field} question was answered")]
    InputEnded {
        /// Field still waiting for an answer.
        field: &'static str,
    },
    /// Reading interactive input failed.
    #[error("failed to read input: {0}")]
    ReadInput(#[source] std::io::Error),
    /// Serializing command output failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}

impl From<FeedbackError> for CliError {
    fn from(err: FeedbackError) -> Self {
        Self::Feedback(Box::new(err))
    }
}

impl From<SessionError> for CliError {
    fn from(err: SessionError) -> Self {
        Self::Session(Box::new(err))
    }
}
