//! The backtracking regex engine contract.
//!
//! The adapter in [`crate::backtrack`] drives an external backtracking
//! engine through these traits: compile a pattern into a program, execute
//! the program over byte subjects with per-attempt anchoring options, query
//! and raise its resource limits.  Keeping the engine behind a trait keeps
//! the adapter's retry and recovery logic testable against a scripted
//! engine, independent of any real backend.
//!
//! The production implementation is [`fancy::FancyRegexEngine`].

use thiserror::Error;

pub mod fancy;

/// Pattern compilation options.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOpts {
    /// Case-insensitive matching.
    pub caseless: bool,
    /// Subjects are in a multibyte (UTF-8) encoding.
    pub utf: bool,
    /// Ask the engine to treat invalid UTF-8 as a non-matching barrier
    /// instead of an error.  Only meaningful when the engine reports
    /// support via [`RegexEngine::invalid_utf_barrier_supported`].
    pub invalid_utf_barrier: bool,
}

/// Per-attempt execution options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecOpts {
    /// The start of the subject is not a line boundary: `^` must not
    /// assert there.
    pub not_bol: bool,
    /// The end of the subject is not a line boundary: `$` must not assert
    /// there.  Used when a subject was truncated at an encoding error.
    pub not_eol: bool,
    /// The subject is already known to be validly encoded; skip the
    /// engine's own check.
    pub no_utf_check: bool,
}

/// A match reported by the engine, relative to the subject passed to
/// [`EngineProgram::exec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineMatch {
    /// Byte offset of the match start.
    pub start: usize,
    /// Byte offset one past the match end.
    pub end: usize,
}

/// Engine-level errors, mirroring the error classes a PCRE-style engine
/// reports.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The pattern was rejected at compile time; carries the engine's
    /// diagnostic text.
    #[error("{0}")]
    Syntax(String),

    /// The JIT scratch stack was too small for this match attempt.
    #[error("JIT scratch stack exhausted")]
    JitStackLimit,

    /// The configured backtracking depth limit was reached.
    #[error("backtracking depth limit exceeded")]
    DepthLimit,

    /// The configured backtracking match limit was reached.
    #[error("backtracking match limit exceeded")]
    MatchLimit,

    /// The engine's internal heap limit was reached.
    #[error("heap limit exceeded")]
    HeapLimit,

    /// The engine detected an infinite recursion loop.
    #[error("recursion loop detected")]
    RecurseLoop,

    /// Memory allocation failed.
    #[error("out of memory")]
    NoMemory,

    /// The subject is invalidly encoded.  `valid_bytes` is the length of
    /// the subject prefix the engine validated before hitting the error.
    #[error("invalid encoding in subject after {valid_bytes} valid bytes")]
    BadEncoding {
        /// Length of the valid subject prefix.
        valid_bytes: usize,
    },

    /// Any other engine failure, with its diagnostic text.
    #[error("{0}")]
    Internal(String),
}

/// A backtracking regex engine: compiles patterns into programs.
pub trait RegexEngine {
    /// The compiled program type.
    type Program: EngineProgram;

    /// Compile `pattern` (raw pattern bytes, no trailing terminator).
    fn compile(&self, pattern: &[u8], opts: &CompileOpts) -> Result<Self::Program, EngineError>;

    /// Whether the engine can natively treat invalid UTF-8 in subjects as a
    /// non-matching barrier.  When it cannot, the adapter performs
    /// valid-prefix recovery itself.
    fn invalid_utf_barrier_supported(&self) -> bool;

    /// Human-readable engine identification, for diagnostics.
    fn version(&self) -> String;
}

/// A compiled engine program.
///
/// The program exclusively owns its compiled form, match slot, scratch
/// stack, and limits; `exec` takes `&mut self` because an invocation
/// overwrites that state, so a program is never shared across concurrent
/// executions.
pub trait EngineProgram {
    /// Match against `subject`, starting at byte offset `start`.
    ///
    /// Returns the first match at or after `start`, `Ok(None)` for a
    /// genuine no-match, or an [`EngineError`].
    fn exec(
        &mut self,
        subject: &[u8],
        start: usize,
        opts: &ExecOpts,
    ) -> Result<Option<EngineMatch>, EngineError>;

    /// Longest subject the engine can represent.
    fn max_subject_len(&self) -> usize;

    /// Current JIT scratch-stack size, or `None` when the program runs
    /// without a JIT.
    fn jit_stack_size(&self) -> Option<usize>;

    /// Replace the scratch stack with one of `new_size` bytes.  Allocation
    /// failure is [`EngineError::NoMemory`].
    fn grow_jit_stack(&mut self, new_size: usize) -> Result<(), EngineError>;

    /// Currently configured backtracking depth limit.
    fn depth_limit(&self) -> u32;

    /// Raise the backtracking depth limit.
    fn set_depth_limit(&mut self, limit: u32) -> Result<(), EngineError>;
}
