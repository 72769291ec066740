//! Word-constituent scanning over multibyte buffers.
//!
//! [`WordScanner`] bundles the locale description with a derived per-byte
//! word-constituent table and implements the character classification the
//! `-w` (match whole words) mode needs: how long is the leading run of word
//! characters, is the first character a word character, is the character
//! just before a position a word character.  All three are pure functions of
//! the buffer and the tables, correct for unibyte and UTF-8 encodings and
//! tolerant of invalid byte sequences.

use std::sync::Arc;

use crate::locale::{Decode, LocaleInfo};

/// Whether `-w` considers `c` a word constituent.
pub fn is_word_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Word-constituent scanner for one locale.
///
/// Build once per locale and share; the scanner is read-only after
/// construction.
pub struct WordScanner {
    locale: Arc<LocaleInfo>,
    /// For each byte B, true if B is a single-byte character that is a
    /// word constituent.
    sbwordchar: [bool; 256],
}

impl WordScanner {
    /// Derive the word-constituent table from the locale.
    pub fn new(locale: Arc<LocaleInfo>) -> Self {
        let mut sbwordchar = [false; 256];
        for (b, entry) in sbwordchar.iter_mut().enumerate() {
            if let Some(c) = locale.single_byte_char(b as u8) {
                *entry = is_word_char(c);
            }
        }
        Self { locale, sbwordchar }
    }

    /// The locale this scanner was built from.
    pub fn locale(&self) -> &Arc<LocaleInfo> {
        &self.locale
    }

    /// Whether `b`, as a standalone single-byte character, is a word
    /// constituent.
    pub fn is_word_byte(&self, b: u8) -> bool {
        self.sbwordchar[b as usize]
    }

    /// Byte length of the longest leading run of word-constituent
    /// characters in `buf`.
    pub fn word_run_len(&self, buf: &[u8]) -> usize {
        self.word_run(buf, true)
    }

    /// If `buf` starts with a word constituent, the number of bytes used to
    /// represent it; otherwise zero.
    pub fn word_char_next(&self, buf: &[u8]) -> usize {
        self.word_run(buf, false)
    }

    /// Examine the start of `buf` for word constituents: as many as
    /// possible if `count_all`, at most one otherwise.  Returns the total
    /// byte length of the examined characters.
    ///
    /// Per position: a single-byte word character consumes one byte; a byte
    /// that cannot start any character stops the scan; anything else gets a
    /// full decode and is tested as a character.  A failed decode is never
    /// classified as a word constituent, so it also stops the scan.
    fn word_run(&self, buf: &[u8], count_all: bool) -> usize {
        let mut n = 0;
        while n < buf.len() {
            let b = buf[n];
            if self.sbwordchar[b as usize] {
                n += 1;
            } else if self.locale.sbclen(b) != -2 {
                break;
            } else {
                match self.locale.decode_char(&buf[n..]) {
                    Decode::Char { c, len } if is_word_char(c) => n += len.max(1),
                    _ => break,
                }
            }
            if !count_all {
                break;
            }
        }
        n
    }

    /// Whether the character whose encoding contains the byte just before
    /// `cur` is a word constituent.  The buffer ends at `end`.
    pub fn word_char_prev(&self, buf: &[u8], cur: usize, end: usize) -> bool {
        if cur == 0 {
            return false;
        }
        let cur = cur - 1;
        let b = buf[cur];
        // Unibyte locales, and ASCII bytes under UTF-8, classify straight
        // from the table.
        if !self.locale.multibyte() || (self.locale.using_utf8() && b < 0x80) {
            return self.sbwordchar[b as usize];
        }
        let mut hint = 0usize;
        let back = self.locale.mb_goback(buf, &mut hint, cur, end);
        let start = (cur as isize - back) as usize;
        self.word_char_next(&buf[start..end]) != 0
    }
}
