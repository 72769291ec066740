//! Production engine backed by the `fancy-regex` crate.
//!
//! `fancy-regex` is a backtracking engine with the lookaround support the
//! word-matching pattern wrapper needs, and a configurable backtrack limit
//! that maps onto the raisable depth limit of the engine contract.  It
//! matches `&str` subjects only, so invalid UTF-8 is detected up front and
//! reported as [`EngineError::BadEncoding`] with the validated prefix
//! length; the adapter's valid-prefix recovery is the live path with this
//! engine.
//!
//! `^` and `$` assert only at the edges of the haystack handed to the
//! engine.  The `not_bol`/`not_eol` options are honored by searching a copy
//! of the subject extended with a one-byte space guard on the corresponding
//! side, which makes the edge position unreachable for the anchor.  The
//! guard byte must not itself be a line boundary, or an inline `(?m)` flag
//! would re-anchor `^`/`$` against it; a space is non-word and not a
//! newline, so multiline anchors find nothing to anchor on and the
//! word-boundary lookarounds still see the barrier they expect.  Pattern
//! classes that match a space can touch the trailing guard; `exec` discards
//! any match that extends past the subject.  One divergence remains: `\A`
//! and `\z` are suppressed by the guards, where a NOTBOL/NOTEOL-style
//! engine option would leave them live.

use fancy_regex::{Error as FancyError, Regex, RegexBuilder, RuntimeError};

use super::{CompileOpts, EngineError, EngineMatch, EngineProgram, ExecOpts, RegexEngine};

/// Initial backtrack limit handed to the builder; raised on demand through
/// [`EngineProgram::set_depth_limit`].
const DEFAULT_BACKTRACK_LIMIT: u32 = 1 << 20;

/// The `fancy-regex` backed engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct FancyRegexEngine;

impl FancyRegexEngine {
    /// Create the engine.
    pub fn new() -> Self {
        Self
    }
}

/// A compiled `fancy-regex` program with its tracked backtrack limit.
#[derive(Debug)]
pub struct FancyProgram {
    /// Pattern text as handed to the builder, kept for limit raises.
    source: String,
    re: Regex,
    backtrack_limit: u32,
}

fn build(source: &str, limit: u32) -> Result<Regex, EngineError> {
    RegexBuilder::new(source)
        .backtrack_limit(limit as usize)
        .build()
        .map_err(|e| EngineError::Syntax(e.to_string()))
}

impl RegexEngine for FancyRegexEngine {
    type Program = FancyProgram;

    fn compile(&self, pattern: &[u8], opts: &CompileOpts) -> Result<FancyProgram, EngineError> {
        let pattern = std::str::from_utf8(pattern)
            .map_err(|_| EngineError::Syntax("pattern is not valid UTF-8".to_string()))?;
        let source = if opts.caseless {
            format!("(?i){}", pattern)
        } else {
            pattern.to_string()
        };
        let re = build(&source, DEFAULT_BACKTRACK_LIMIT)?;
        Ok(FancyProgram {
            source,
            re,
            backtrack_limit: DEFAULT_BACKTRACK_LIMIT,
        })
    }

    fn invalid_utf_barrier_supported(&self) -> bool {
        false
    }

    fn version(&self) -> String {
        "fancy-regex (backtracking)".to_string()
    }
}

impl EngineProgram for FancyProgram {
    fn exec(
        &mut self,
        subject: &[u8],
        start: usize,
        opts: &ExecOpts,
    ) -> Result<Option<EngineMatch>, EngineError> {
        let text = match std::str::from_utf8(subject) {
            Ok(t) => t,
            Err(e) => {
                return Err(EngineError::BadEncoding {
                    valid_bytes: e.valid_up_to(),
                })
            }
        };

        let mut guarded = None;
        let mut base = 0;
        if opts.not_bol || opts.not_eol {
            // The guard must be non-word and must not be a line boundary;
            // see the module docs.
            let mut s = String::with_capacity(text.len() + 2);
            if opts.not_bol {
                s.push(' ');
                base = 1;
            }
            s.push_str(text);
            if opts.not_eol {
                s.push(' ');
            }
            guarded = Some(s);
        }
        let hay = guarded.as_deref().unwrap_or(text);
        let subject_end = base + text.len();

        let mut pos = start + base;
        loop {
            match self.re.find_from_pos(hay, pos) {
                Ok(Some(m)) => {
                    if m.start() > subject_end {
                        // Entirely inside the trailing guard byte.
                        return Ok(None);
                    }
                    if m.end() > subject_end {
                        // The match consumed the trailing guard byte, which
                        // is not part of the subject; look for a later one
                        // that stays inside it.
                        pos = m.start() + 1;
                        continue;
                    }
                    return Ok(Some(EngineMatch {
                        start: m.start() - base,
                        end: m.end() - base,
                    }));
                }
                Ok(None) => return Ok(None),
                Err(e) => return Err(map_exec_error(e)),
            }
        }
    }

    fn max_subject_len(&self) -> usize {
        // The engine indexes subjects with usize and imposes no length cap
        // of its own, so the representable range is the platform allocation
        // bound on slices.  No constructible line can exceed it; engines
        // with narrower offset types report smaller values here and trip
        // the line-length check.
        isize::MAX as usize
    }

    fn jit_stack_size(&self) -> Option<usize> {
        None
    }

    fn grow_jit_stack(&mut self, _new_size: usize) -> Result<(), EngineError> {
        Err(EngineError::Internal(
            "engine has no JIT scratch stack".to_string(),
        ))
    }

    fn depth_limit(&self) -> u32 {
        self.backtrack_limit
    }

    fn set_depth_limit(&mut self, limit: u32) -> Result<(), EngineError> {
        self.re = build(&self.source, limit)?;
        self.backtrack_limit = limit;
        Ok(())
    }
}

fn map_exec_error(e: FancyError) -> EngineError {
    match e {
        FancyError::RuntimeError(RuntimeError::BacktrackLimitExceeded) => EngineError::DepthLimit,
        other => EngineError::Internal(other.to_string()),
    }
}
