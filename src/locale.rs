//! Locale classification tables for byte-level scanning.
//!
//! [`LocaleInfo`] is the read-only description of the active character
//! encoding: whether it is multibyte, whether it is UTF-8, and a per-byte
//! table of single-byte character lengths.  It is built once, wrapped in an
//! [`Arc`], and shared by every matcher backend; nothing here mutates after
//! construction.
//!
//! The per-byte length table (`sbclen`) drives the fast paths everywhere
//! else in the crate:
//!
//! - `1` — the byte is a complete single-byte character on its own
//! - `-1` — the byte can never start a valid character in this encoding
//! - `-2` — classifying the byte requires a full multibyte decode

use std::fmt;
use std::sync::Arc;

/// Result of decoding one character at the front of a byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decode {
    /// A complete character and the number of bytes it occupies.
    Char {
        /// The decoded character.
        c: char,
        /// Encoded length in bytes (at least 1).
        len: usize,
    },
    /// The leading bytes cannot be part of any valid character.
    Invalid,
    /// The buffer ends in the middle of a possibly-valid character.
    Incomplete,
}

/// Decoder for stateless non-UTF-8 multibyte encodings.
///
/// Rust has no `mbrtowc`; callers embedding an exotic locale provide the
/// decode step themselves via this trait.  UTF-8 decoding is built in and
/// never consults a decoder.
pub trait MbDecoder: Send + Sync {
    /// Decode the character at the front of `bytes`.
    fn decode(&self, bytes: &[u8]) -> Decode;
}

/// Read-only description of the process character encoding.
///
/// Constructed once at startup and shared via `Arc<LocaleInfo>`; all
/// accessors are `&self` and the type holds no interior mutability, so
/// sharing across concurrently-compiling matchers is free.
pub struct LocaleInfo {
    multibyte: bool,
    using_utf8: bool,
    sbclen: [i8; 256],
    sbctowc: [Option<char>; 256],
    decoder: Option<Arc<dyn MbDecoder>>,
}

impl fmt::Debug for LocaleInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleInfo")
            .field("multibyte", &self.multibyte)
            .field("using_utf8", &self.using_utf8)
            .finish_non_exhaustive()
    }
}

impl LocaleInfo {
    /// A unibyte locale: every byte is a complete character, and only ASCII
    /// alphanumerics and `_` count as word constituents.
    pub fn unibyte() -> Self {
        let mut sbctowc = [None; 256];
        for (b, wc) in sbctowc.iter_mut().enumerate().take(0x80) {
            *wc = Some(b as u8 as char);
        }
        Self::unibyte_with_chars(sbctowc)
    }

    /// A unibyte locale with caller-supplied character values, for
    /// single-byte encodings beyond ASCII such as Latin-1.  Every byte is a
    /// complete character; bytes with no entry decode to the replacement
    /// character and classify as non-word.
    pub fn unibyte_with_chars(sbctowc: [Option<char>; 256]) -> Self {
        Self {
            multibyte: false,
            using_utf8: false,
            sbclen: [1; 256],
            sbctowc,
            decoder: None,
        }
    }

    /// A UTF-8 locale.
    ///
    /// ASCII bytes are single-byte characters; continuation bytes and the
    /// bytes that can never appear in valid UTF-8 are marked `-1`; lead
    /// bytes `0xC2..=0xF4` require a full decode and are marked `-2`.
    pub fn utf8() -> Self {
        let mut sbclen = [-1i8; 256];
        let mut sbctowc = [None; 256];
        for b in 0..0x80 {
            sbclen[b] = 1;
            sbctowc[b] = Some(b as u8 as char);
        }
        for len in sbclen.iter_mut().take(0xF5).skip(0xC2) {
            *len = -2;
        }
        Self {
            multibyte: true,
            using_utf8: true,
            sbclen,
            sbctowc,
            decoder: None,
        }
    }

    /// A non-UTF-8 multibyte locale with caller-supplied tables and decoder.
    ///
    /// `sbclen` and `sbctowc` describe the single-byte characters of the
    /// encoding; `decoder` handles every byte marked `-2`.
    pub fn custom(
        sbclen: [i8; 256],
        sbctowc: [Option<char>; 256],
        decoder: Arc<dyn MbDecoder>,
    ) -> Self {
        Self {
            multibyte: true,
            using_utf8: false,
            sbclen,
            sbctowc,
            decoder: Some(decoder),
        }
    }

    /// Whether the encoding is multibyte.
    pub fn multibyte(&self) -> bool {
        self.multibyte
    }

    /// Whether the encoding is UTF-8.  Implies [`multibyte`](Self::multibyte).
    pub fn using_utf8(&self) -> bool {
        self.using_utf8
    }

    /// Single-byte character length of `b`: `1`, `-1` (can never start a
    /// valid character), or `-2` (needs a full decode).
    pub fn sbclen(&self, b: u8) -> i8 {
        self.sbclen[b as usize]
    }

    /// The character value of `b` when it is a complete single-byte
    /// character, if its identity is known.
    pub fn single_byte_char(&self, b: u8) -> Option<char> {
        self.sbctowc[b as usize]
    }

    /// Decode the character at the front of `bytes`.
    pub fn decode_char(&self, bytes: &[u8]) -> Decode {
        if bytes.is_empty() {
            return Decode::Incomplete;
        }
        if self.using_utf8 {
            return decode_utf8(bytes);
        }
        if let Some(decoder) = &self.decoder {
            return decoder.decode(bytes);
        }
        // Unibyte: every byte stands alone.  Bytes with no known character
        // value decode to the replacement character, which classifies as
        // a non-word character downstream.
        Decode::Char {
            c: self.sbctowc[bytes[0] as usize].unwrap_or('\u{FFFD}'),
            len: 1,
        }
    }

    /// Length in bytes of the character at the front of `bytes`, or `-1`
    /// for an invalid sequence, or `-2` for a truncated one.
    ///
    /// Table fast path; a full decode happens only for `-2` bytes.
    pub fn mb_clen(&self, bytes: &[u8]) -> isize {
        let len = self.sbclen[bytes[0] as usize];
        if len != -2 {
            return len as isize;
        }
        match self.decode_char(bytes) {
            Decode::Char { len, .. } => len as isize,
            Decode::Invalid => -1,
            Decode::Incomplete => -2,
        }
    }

    /// Return how many bytes to step back from `cur` to reach the start of
    /// the character containing the byte at `cur`, updating `mb_start` to
    /// the first character boundary at or after `cur` for reuse on later
    /// calls.
    ///
    /// `mb_start` must be a known character boundary (or encoding-error
    /// byte) at or before `cur`; `end` bounds all decoding and is expected
    /// to address a byte that cannot occur inside a multibyte character
    /// (`\0`, `\r`, `\n`, `.`, or `/`), which is what makes the forward
    /// rescan safe to stop there.  When `cur <= mb_start` this degenerates
    /// to `cur - mb_start` without touching the hint.
    ///
    /// Under UTF-8 the byte structure is self-synchronizing, so this scans
    /// backward at most 3 bytes looking for a lead byte whose implied
    /// length covers `cur`, then confirms with a decode.  Under any other
    /// multibyte encoding there is no backward synchronization and the scan
    /// runs forward from `mb_start` one character at a time; called with
    /// non-decreasing `cur` this is amortized O(1) per call.  Invalid
    /// sequences count as single-byte characters.
    pub fn mb_goback(&self, buf: &[u8], mb_start: &mut usize, cur: usize, end: usize) -> isize {
        debug_assert!(cur < end && end <= buf.len());

        if cur <= *mb_start {
            return cur as isize - *mb_start as isize;
        }

        let mut p = cur;
        let mut p0 = cur;
        if self.using_utf8 {
            // Start by assuming cur is at a character boundary.
            if buf[cur] & 0xC0 == 0x80 {
                for i in 1..=3usize {
                    if i > cur {
                        break;
                    }
                    let b = buf[cur - i];
                    if b & 0xC0 != 0x80 {
                        // True if the length implied by the putative lead
                        // byte at cur - i extends at least through cur.
                        let long_enough = (!b) >> (7 - i as u32) == 0;
                        if long_enough {
                            if let Decode::Char { len, .. } = self.decode_char(&buf[cur - i..end])
                            {
                                // This multibyte character contains cur.
                                p0 = cur - i;
                                p = p0 + len;
                            }
                        }
                        break;
                    }
                }
            }
        } else {
            // No backward synchronization: scan forward from the hint,
            // decoding one character at a time, until reaching or passing
            // cur.  A failed decode is a single-byte character.
            p = *mb_start;
            loop {
                let clen = match self.mb_clen(&buf[p..end]) {
                    n if n < 0 => 1,
                    n => n as usize,
                };
                p0 = p;
                p += clen;
                if p >= cur {
                    break;
                }
            }
        }

        *mb_start = p;
        if p == cur {
            0
        } else {
            cur as isize - p0 as isize
        }
    }
}

/// Decode one UTF-8 character from the front of `bytes`.
fn decode_utf8(bytes: &[u8]) -> Decode {
    let probe = &bytes[..bytes.len().min(4)];
    match std::str::from_utf8(probe) {
        Ok(s) => match s.chars().next() {
            Some(c) => Decode::Char { c, len: c.len_utf8() },
            None => Decode::Incomplete,
        },
        Err(e) if e.valid_up_to() > 0 => {
            // The error is past the first character; decode just that one.
            match std::str::from_utf8(&probe[..e.valid_up_to()]) {
                Ok(s) => match s.chars().next() {
                    Some(c) => Decode::Char { c, len: c.len_utf8() },
                    None => Decode::Invalid,
                },
                Err(_) => Decode::Invalid,
            }
        }
        Err(e) => match e.error_len() {
            Some(_) => Decode::Invalid,
            None => Decode::Incomplete,
        },
    }
}
