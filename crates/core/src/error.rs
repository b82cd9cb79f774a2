//! Error types for slide processing.

use crate::interact::DecisionKind;
use crate::types::SongId;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while processing a song's slides.
#[derive(Error, Debug)]
pub enum Error {
    /// Song metadata is missing from the store. Recoverable: the CLI falls
    /// back to manual entry.
    #[error("{song} - metadata not found")]
    NotFound { song: SongId },

    /// The infoslide template lacks an expected slot. Fatal for the song.
    #[error("infoslide template mismatch: {0}")]
    TemplateMismatch(String),

    /// The slide group does not follow the one-group-per-song convention.
    /// Fatal for the song; the document is left untouched for it.
    #[error("{song} - structural anomaly: {reason}")]
    StructuralAnomaly { song: SongId, reason: String },

    /// The interaction gateway has no answer and cannot prompt. Fatal for
    /// the whole batch run: continuing would silently guess.
    #[error("{song} - no answer available for {kind} decision")]
    DecisionUnavailable { song: SongId, kind: DecisionKind },

    /// A user-supplied clutter rules file contains an invalid pattern.
    #[error("invalid clutter rules: {0}")]
    InvalidRules(String),

    /// Failed to read or write a collaborator file (document, store,
    /// template).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a collaborator file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
