//! The common matcher contract shared by every backend.
//!
//! A matcher is compiled once from a pattern and then driven with repeated
//! [`Matcher::execute`] calls over input buffers, advancing the start
//! position past each hit.  Callers hold a matcher through this trait and
//! stay agnostic to which backend (finite automaton, fixed-string keyword
//! set, or backtracking engine) is actually active.

use crate::error::SearchError;

/// A matched span, relative to the buffer passed to `execute`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanMatch {
    /// Byte offset of the span start.
    pub offset: usize,
    /// Byte length of the span.
    pub len: usize,
}

/// Compile-time matching options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternOpts {
    /// Case-insensitive matching.
    pub case_insensitive: bool,
    /// Match only whole words (`-w`).
    pub match_words: bool,
    /// Match only whole lines (`-x`).  Takes precedence over `match_words`.
    pub match_lines: bool,
    /// The line terminator byte; `b'\0'` gives NUL-terminated-line mode.
    pub eol: u8,
}

impl Default for PatternOpts {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            match_words: false,
            match_lines: false,
            eol: b'\n',
        }
    }
}

/// The execute half of the matcher contract.
///
/// With `start: None`, a hit reports the bounds of the whole matching line,
/// from line start through the trailing terminator (or through buffer end
/// when the final line is unterminated).  With a forced `start`, matching
/// begins there and a hit reports exactly the matched span.
///
/// A matcher owns mutable per-execution state (match slot, engine scratch
/// memory), which is why `execute` takes `&mut self`; compile one matcher
/// per worker for parallel searching.
pub trait Matcher {
    /// Search `buf`, returning the first hit or `Ok(None)` when nothing
    /// matches.  No-match is a first-class result, never an error.
    fn execute(&mut self, buf: &[u8], start: Option<usize>)
        -> Result<Option<SpanMatch>, SearchError>;
}
