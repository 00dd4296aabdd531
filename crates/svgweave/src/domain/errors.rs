//! Pipeline error taxonomy.
//!
//! Every variant is terminal for the current run; none are retried. All are
//! recovered at the CLI boundary and reported through the status log lines.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The icon source directory, or a file inside it, could not be listed
    /// or read. No partial collection is returned.
    #[error("icon source unavailable at {path}: {source}")]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The sprite compiler reported a failure; no partial sprite exists.
    #[error("sprite compilation failed: {0}")]
    Compile(#[from] CompileError),

    /// An existing template could not be read. The template on disk is
    /// untouched.
    #[error("template unreadable at {path}: {source}")]
    TemplateUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The template exists but lacks the marker pair bracketing the sprite
    /// region, so there is no well-defined place to inject.
    #[error("sprite marker pair not found in {path}")]
    MarkerNotFound { path: PathBuf },

    /// The sprite was built but the final output could not be persisted.
    #[error("failed to write template to {path}: {source}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Whether the sprite had already been built when the run failed.
    /// Callers report this case distinctly: "built but not saved" rather
    /// than "nothing changed".
    pub fn is_write_failure(&self) -> bool {
        matches!(self, PipelineError::WriteFailure { .. })
    }
}

/// Diagnostics surfaced by a sprite compiler implementation.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("icon '{name}' is not valid UTF-8: {source}")]
    NotUtf8 {
        name: String,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("icon '{name}' has no <svg> root element")]
    MissingSvgRoot { name: String },

    /// The pipeline consumes symbol-mode output exclusively; a configuration
    /// that disables it cannot produce a usable sprite.
    #[error("symbol mode is disabled in the sprite configuration")]
    SymbolModeDisabled,
}
