//! Linematch - Encoding-Aware Line Matching for Search Tools
//!
//! Linematch is the execution layer of a line-oriented search tool: it takes
//! a compiled pattern and a buffer of newline-separated text and reports the
//! first matching line, staying correct in the presence of multibyte
//! characters, encoding errors, and backtracking-engine resource limits.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use linematch::{BacktrackMatcher, FancyRegexEngine, LocaleInfo, PatternOpts};
//!
//! let locale = Arc::new(LocaleInfo::utf8());
//! let mut matcher = BacktrackMatcher::compile(
//!     FancyRegexEngine::new(),
//!     b"ba+r",
//!     PatternOpts::default(),
//!     locale,
//! )?;
//!
//! // Without a forced start the whole matching line is reported,
//! // terminator included.
//! let hit = matcher.execute(b"foo\nbaar\n", None)?.unwrap();
//! assert_eq!((hit.offset, hit.len), (4, 5));
//!
//! // With a forced start the exact match span is reported instead.
//! let hit = matcher.execute(b"foo\nbaar\n", Some(4))?.unwrap();
//! assert_eq!((hit.offset, hit.len), (4, 4));
//! # Ok::<(), linematch::SearchError>(())
//! ```
//!
//! # Key Features
//!
//! - **Line-by-line search**: each line becomes its own engine subject, so
//!   `^` and `$` anchor where users expect
//! - **Whole-word / whole-line modes**: pattern wrapping with custom word
//!   semantics (`_` plus alphanumerics across the full character set)
//! - **Encoding-error recovery**: invalid byte sequences become
//!   unmatchable one-byte barriers instead of search failures
//! - **Bounded limit retries**: engine scratch-stack and backtracking-depth
//!   exhaustion is retried with doubled limits before surfacing an error
//! - **Multibyte-safe scanning**: character-boundary backtracking and
//!   word-constituent classification for unibyte, UTF-8, and custom
//!   stateless encodings
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Matcher (trait)                        │
//! │    execute(buf, start) -> SpanMatch?    │
//! ├─────────────────────────────────────────┤
//! │  BacktrackMatcher                       │
//! │    line splitting · pattern wrapping    │
//! │    empty-match cache · error recovery   │
//! │    bounded limit retries                │
//! ├─────────────────────────────────────────┤
//! │  RegexEngine / EngineProgram (traits)   │
//! │    FancyRegexEngine (fancy-regex)       │
//! ├─────────────────────────────────────────┤
//! │  LocaleInfo · WordScanner               │
//! │    byte classification · mb_goback      │
//! │    word-constituent runs                │
//! └─────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Module declarations

/// Backtracking-engine adapter implementing the [`Matcher`] contract
pub mod backtrack;
/// Regex engine abstraction and the bundled fancy-regex adapter
pub mod engine;
/// Error types for linematch operations
pub mod error;
/// Locale and encoding description: byte tables, decoding, boundary scans
pub mod locale;
/// Matcher contract shared by all pattern backends
pub mod matcher;
/// Bounded retry-with-growth combinator for resource-limit errors
pub mod retry;
/// Word-constituent scanning over encoded text
pub mod scan;

// Re-exports for Rust consumers

/// Line matcher backed by an external backtracking regex engine
pub use crate::backtrack::BacktrackMatcher;

/// Engine abstraction: implement these to plug in another regex engine
pub use crate::engine::{
    CompileOpts, EngineError, EngineMatch, EngineProgram, ExecOpts, RegexEngine,
};

/// Bundled engine adapter over the fancy-regex crate
pub use crate::engine::fancy::FancyRegexEngine;

/// Main error type for linematch operations
pub use crate::error::{Result, SearchError};

/// Locale and encoding description
pub use crate::locale::{Decode, LocaleInfo, MbDecoder};

/// Matcher contract and its result types
pub use crate::matcher::{Matcher, PatternOpts, SpanMatch};

/// Retry combinator, exposed for custom engine adapters
pub use crate::retry::retry_with_growth;

/// Word-constituent classification and scanning
pub use crate::scan::{is_word_char, WordScanner};

// Version information
/// Library version string
pub const LINEMATCH_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library major version
pub const LINEMATCH_VERSION_MAJOR: &str = env!("CARGO_PKG_VERSION_MAJOR");

/// Library minor version
pub const LINEMATCH_VERSION_MINOR: &str = env!("CARGO_PKG_VERSION_MINOR");

/// Library patch version
pub const LINEMATCH_VERSION_PATCH: &str = env!("CARGO_PKG_VERSION_PATCH");
