//! Bounded retry with limit growth.
//!
//! Engine resource limits (scratch-stack size, backtracking depth) are
//! raised by doubling up to an overflow-checked ceiling.  The loop lives
//! here as a small combinator so its termination argument is inspectable
//! and testable without an engine: `grow` may answer "grew, retry" at most
//! `log2(ceiling / initial)` times per limit, because every growth doubles
//! a value that stays below the ceiling.

/// Run `attempt` against `state`, consulting `grow` on every error.
///
/// `grow` returns `Ok(true)` after successfully raising a limit (retry),
/// `Ok(false)` when the error is not retriable or the ceiling is reached
/// (the original error propagates), or `Err` when growing itself failed
/// (that error propagates instead, e.g. an allocation failure while
/// replacing a scratch stack).
pub fn retry_with_growth<S, T, E>(
    state: &mut S,
    mut attempt: impl FnMut(&mut S) -> Result<T, E>,
    mut grow: impl FnMut(&mut S, &E) -> Result<bool, E>,
) -> Result<T, E> {
    loop {
        match attempt(state) {
            Ok(v) => return Ok(v),
            Err(e) => {
                if !grow(state, &e)? {
                    return Err(e);
                }
            }
        }
    }
}
