//! Line-by-line matching through an external backtracking engine.
//!
//! [`BacktrackMatcher`] adapts a [`RegexEngine`] to the crate-wide
//! [`Matcher`] contract.  `compile` rewrites the pattern with whole-line or
//! whole-word anchoring, validates locale support, and precomputes whether
//! the empty string matches at and away from a line boundary.  `execute`
//! walks the buffer one line at a time, skipping bytes the locale table
//! already knows are encoding errors, answering empty-match attempts from
//! the precomputed cache, and recovering from engine-reported encoding
//! errors by re-attempting on the valid prefix and then treating the bad
//! byte as an unmatchable barrier.
//!
//! Engine resource exhaustion is retried transparently with doubled limits
//! (scratch stack, backtracking depth), bounded by overflow-checked
//! ceilings; only a genuine match, a genuine no-match, or a non-retriable
//! error crosses the `execute` boundary.

use std::sync::Arc;

use log::{debug, trace};
use memchr::memchr;

use crate::engine::{CompileOpts, EngineError, EngineMatch, EngineProgram, ExecOpts, RegexEngine};
use crate::error::SearchError;
use crate::locale::LocaleInfo;
use crate::matcher::{Matcher, PatternOpts, SpanMatch};
use crate::retry::retry_with_growth;

/// Ceiling for scratch-stack doubling.
const MAX_JIT_STACK: usize = i32::MAX as usize;

/// Whole-word wrapper.  The engine's native `\b` follows its own notion of
/// a word; these lookarounds pin down ours instead.
const WORD_PREFIX: &[u8] = b"(?<!\\w)(?:";
const WORD_SUFFIX: &[u8] = b")(?!\\w)";

/// Whole-line wrapper.
const LINE_PREFIX: &[u8] = b"^(?:";
const LINE_SUFFIX: &[u8] = b")$";

/// A pattern compiled for a backtracking engine.
///
/// Owns the engine program (compiled form, match slot, scratch stack,
/// limits) exclusively; compile one matcher per worker for parallel
/// searching.
#[derive(Debug)]
pub struct BacktrackMatcher<E: RegexEngine> {
    engine: E,
    prog: E::Program,
    opts: PatternOpts,
    locale: Arc<LocaleInfo>,
    /// Whether the empty string matches, indexed by the begin-of-line flag.
    /// Precomputed at compile time so the per-line empty-match check needs
    /// no engine call.
    empty_match: [bool; 2],
    /// Whether `execute` performs valid-prefix recovery on engine-reported
    /// encoding errors.  Off when the engine treats invalid encoding as a
    /// non-matching barrier natively.
    recover_encoding_errors: bool,
}

impl<E: RegexEngine> BacktrackMatcher<E> {
    /// Compile `pattern` for `engine` under `locale`.
    ///
    /// The pattern must be a single pattern with no embedded line break;
    /// callers wanting multi-pattern search pre-join into an alternation.
    /// Multibyte locales other than UTF-8 are rejected: the engine's
    /// encoding modes only cover unibyte and UTF-8 subjects.
    pub fn compile(
        engine: E,
        pattern: &[u8],
        opts: PatternOpts,
        locale: Arc<LocaleInfo>,
    ) -> Result<Self, SearchError> {
        if locale.multibyte() && !locale.using_utf8() {
            return Err(SearchError::UnsupportedLocale);
        }
        if memchr(b'\n', pattern).is_some() {
            return Err(SearchError::MultiplePatterns);
        }

        let mut re = Vec::with_capacity(pattern.len() + WORD_PREFIX.len() + WORD_SUFFIX.len());
        if opts.match_lines {
            re.extend_from_slice(LINE_PREFIX);
            re.extend_from_slice(pattern);
            re.extend_from_slice(LINE_SUFFIX);
        } else if opts.match_words {
            re.extend_from_slice(WORD_PREFIX);
            re.extend_from_slice(pattern);
            re.extend_from_slice(WORD_SUFFIX);
        } else {
            re.extend_from_slice(pattern);
        }

        let compile_opts = CompileOpts {
            caseless: opts.case_insensitive,
            utf: locale.multibyte(),
            invalid_utf_barrier: engine.invalid_utf_barrier_supported(),
        };
        let prog = engine.compile(&re, &compile_opts)?;
        let recover_encoding_errors = !engine.invalid_utf_barrier_supported();

        let mut matcher = Self {
            engine,
            prog,
            opts,
            locale,
            empty_match: [false; 2],
            recover_encoding_errors,
        };
        matcher.empty_match[0] = matcher.probe_empty(true)?;
        matcher.empty_match[1] = matcher.probe_empty(false)?;
        Ok(matcher)
    }

    /// Whether the empty string matches, with `^` suppressed iff `not_bol`.
    fn probe_empty(&mut self, not_bol: bool) -> Result<bool, SearchError> {
        let opts = ExecOpts { not_bol, ..Default::default() };
        Ok(self.jit_exec(b"", 0, &opts)?.is_some())
    }

    /// Human-readable identification of the underlying engine.
    pub fn engine_version(&self) -> String {
        self.engine.version()
    }

    /// Invoke the engine, transparently retrying scratch-stack and
    /// depth-limit exhaustion with doubled limits.
    fn jit_exec(
        &mut self,
        subject: &[u8],
        start: usize,
        opts: &ExecOpts,
    ) -> Result<Option<EngineMatch>, EngineError> {
        retry_with_growth(
            &mut self.prog,
            |prog| prog.exec(subject, start, opts),
            |prog, err| grow_limits(prog, err),
        )
    }

    /// Search one buffer.  See [`Matcher::execute`] for the result
    /// contract.
    pub fn execute(
        &mut self,
        buf: &[u8],
        start: Option<usize>,
    ) -> Result<Option<SpanMatch>, SearchError> {
        let eol = self.opts.eol;
        let size = buf.len();

        let mut p = start.unwrap_or(0).min(size);
        let mut bol = p == 0 || buf[p - 1] == eol;
        let mut line_start = 0usize;
        // Most recent valid scanning origin: start of buffer, or just past
        // the last discovered line end or encoding error.
        let mut subject = 0usize;

        let (hit, line_end) = loop {
            let line_end = memchr(eol, &buf[p..]).map_or(size, |i| p + i);
            if self.prog.max_subject_len() < line_end - p {
                return Err(SearchError::LineTooLong);
            }

            let hit = loop {
                // Skip past bytes the locale table already marks as
                // encoding errors; cheaper than letting the engine
                // classify them.
                while p < line_end && self.locale.sbclen(buf[p]) == -1 {
                    p += 1;
                    subject = p;
                    bol = false;
                }
                let search_offset = p - subject;

                if p == line_end {
                    // Empty-match attempt: answered from the cache.
                    break if self.empty_match[bol as usize] {
                        Some((search_offset, search_offset))
                    } else {
                        None
                    };
                }

                let exec_opts = ExecOpts { not_bol: !bol, ..Default::default() };
                match self.jit_exec(&buf[subject..line_end], search_offset, &exec_opts) {
                    Ok(Some(m)) => break Some((m.start, m.end)),
                    Ok(None) => break None,
                    Err(EngineError::BadEncoding { valid_bytes })
                        if self.recover_encoding_errors =>
                    {
                        trace!(
                            "encoding error at subject byte {}; retrying on valid prefix",
                            valid_bytes
                        );
                        if search_offset <= valid_bytes {
                            // Try to match the text before the encoding
                            // error.
                            let confined = if valid_bytes == 0 {
                                if self.empty_match[bol as usize] {
                                    Some((0, 0))
                                } else {
                                    None
                                }
                            } else {
                                let confined_opts = ExecOpts {
                                    not_bol: !bol,
                                    not_eol: true,
                                    no_utf_check: true,
                                };
                                self.jit_exec(
                                    &buf[subject..subject + valid_bytes],
                                    search_offset,
                                    &confined_opts,
                                )?
                                .map(|m| (m.start, m.end))
                            };
                            if confined.is_some() {
                                break confined;
                            }
                            // The bad byte is data that cannot match.
                            p = subject + valid_bytes + 1;
                            bol = false;
                        }
                        subject += valid_bytes + 1;
                    }
                    Err(e) => return Err(e.into()),
                }
            };

            if hit.is_some() {
                break (hit, line_end);
            }
            bol = true;
            p = line_end + 1;
            subject = p;
            line_start = p;
            if p >= size {
                break (None, line_end);
            }
        };

        match hit {
            None => Ok(None),
            Some((match_start, match_end)) => {
                let (beg, end) = if start.is_some() {
                    (subject + match_start, subject + match_end)
                } else {
                    // Report the whole matching line, terminator included.
                    (line_start, if line_end < size { line_end + 1 } else { size })
                };
                Ok(Some(SpanMatch { offset: beg, len: end - beg }))
            }
        }
    }
}

impl<E: RegexEngine> Matcher for BacktrackMatcher<E> {
    fn execute(
        &mut self,
        buf: &[u8],
        start: Option<usize>,
    ) -> Result<Option<SpanMatch>, SearchError> {
        BacktrackMatcher::execute(self, buf, start)
    }
}

/// Growth policy for [`retry_with_growth`]: double the limit named by the
/// error, bounded so doubling can never overflow.
fn grow_limits<P: EngineProgram>(prog: &mut P, err: &EngineError) -> Result<bool, EngineError> {
    match err {
        EngineError::JitStackLimit => match prog.jit_stack_size() {
            Some(size) if size > 0 && size <= MAX_JIT_STACK / 2 => {
                debug!("growing JIT scratch stack to {} bytes", size * 2);
                prog.grow_jit_stack(size * 2)?;
                Ok(true)
            }
            _ => Ok(false),
        },
        EngineError::DepthLimit => {
            let limit = prog.depth_limit();
            if limit >= u32::MAX / 2 {
                return Ok(false);
            }
            debug!("raising backtracking depth limit to {}", limit * 2);
            prog.set_depth_limit(limit * 2)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}
