//! Error types for the linematch library
//!
//! There is one typed error channel, [`SearchError`], surfaced from both
//! `compile` and `execute`.  Each resource-exhaustion condition gets its own
//! variant so a caller can present a specific diagnostic and decide
//! process-level policy itself; nothing in this crate aborts the process.
//!
//! A failed search is *not* an error: `execute` reports it as `Ok(None)`.

use thiserror::Error;

use crate::engine::EngineError;

/// Main error type for linematch operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The backtracking matcher only understands unibyte and UTF-8 subject
    /// encodings; other multibyte locales must use a different backend.
    #[error("the backtracking matcher supports only unibyte and UTF-8 locales")]
    UnsupportedLocale,

    /// The pattern contained an embedded line break.  Callers wanting
    /// multi-pattern search must pre-join the patterns into an alternation.
    #[error("only a single pattern per matcher is supported")]
    MultiplePatterns,

    /// The engine rejected the pattern; carries the engine's diagnostic text.
    #[error("invalid pattern: {0}")]
    BadPattern(String),

    /// Memory allocation failed inside the engine or while growing its
    /// scratch stack.
    #[error("memory exhausted")]
    OutOfMemory,

    /// The engine's JIT scratch stack was exhausted and could not be grown
    /// any further.
    #[error("exhausted the regex engine's JIT stack")]
    JitStackExhausted,

    /// The engine's backtracking (match) limit was exceeded.
    #[error("exceeded the regex engine's backtracking limit")]
    BacktrackLimit,

    /// The engine's nested backtracking (depth) limit was exceeded and could
    /// not be raised any further.
    #[error("exceeded the regex engine's nested backtracking limit")]
    NestedBacktrackLimit,

    /// The engine detected an infinite recursion loop in the pattern.
    #[error("regex engine detected a recursion loop")]
    RecursionLoop,

    /// The engine's internal heap limit was exceeded.
    #[error("exceeded the regex engine's heap limit")]
    HeapLimit,

    /// A line was longer than the engine's maximum representable subject.
    /// Reported before any engine call is attempted, and never retried.
    #[error("line is longer than the regex engine can search")]
    LineTooLong,

    /// Any engine failure without a more specific classification above.
    #[error("internal regex engine error: {0}")]
    Internal(String),
}

/// Result type alias for linematch operations
pub type Result<T> = std::result::Result<T, SearchError>;

impl From<EngineError> for SearchError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Syntax(msg) => SearchError::BadPattern(msg),
            EngineError::NoMemory => SearchError::OutOfMemory,
            EngineError::JitStackLimit => SearchError::JitStackExhausted,
            EngineError::MatchLimit => SearchError::BacktrackLimit,
            EngineError::DepthLimit => SearchError::NestedBacktrackLimit,
            EngineError::RecurseLoop => SearchError::RecursionLoop,
            EngineError::HeapLimit => SearchError::HeapLimit,
            // Encoding errors are recovered inside the adapter; one escaping
            // to this boundary means the engine broke its barrier contract.
            EngineError::BadEncoding { valid_bytes } => SearchError::Internal(format!(
                "unrecovered encoding error after {} valid bytes",
                valid_bytes
            )),
            EngineError::Internal(msg) => SearchError::Internal(msg),
        }
    }
}
