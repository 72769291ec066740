//! Integration tests for the backtracking matcher over the bundled
//! fancy-regex engine: line-by-line search semantics, pattern wrapping,
//! encoding-error recovery, and engine error mapping.

use std::sync::Arc;

use linematch::{
    BacktrackMatcher, Decode, FancyRegexEngine, LocaleInfo, MbDecoder, PatternOpts, SearchError,
    SpanMatch,
};

fn matcher(pattern: &[u8], opts: PatternOpts) -> BacktrackMatcher<FancyRegexEngine> {
    BacktrackMatcher::compile(
        FancyRegexEngine::new(),
        pattern,
        opts,
        Arc::new(LocaleInfo::utf8()),
    )
    .expect("pattern should compile")
}

fn span(offset: usize, len: usize) -> Option<SpanMatch> {
    Some(SpanMatch { offset, len })
}

#[test]
fn reports_whole_matching_line_with_terminator() {
    let mut m = matcher(b"bar", PatternOpts::default());
    assert_eq!(m.execute(b"foo\nbar\nbaz\n", None).unwrap(), span(4, 4));
}

#[test]
fn forced_start_reports_exact_match_span() {
    let mut m = matcher(b"bar", PatternOpts::default());
    assert_eq!(m.execute(b"foo\nbar\nbaz\n", Some(0)).unwrap(), span(4, 3));
    // Starting past the match finds the next occurrence or nothing.
    assert_eq!(m.execute(b"foo\nbar\nbaz\n", Some(8)).unwrap(), None);
}

#[test]
fn no_matching_line_returns_none() {
    let mut m = matcher(b"quux", PatternOpts::default());
    assert_eq!(m.execute(b"foo\nbar\n", None).unwrap(), None);
}

#[test]
fn caret_anchors_at_each_line_start() {
    let mut m = matcher(b"^bar", PatternOpts::default());
    assert_eq!(m.execute(b"foo\nbar\n", None).unwrap(), span(4, 4));
    // "oo" is mid-line, so "^oo" must not match anywhere.
    let mut m = matcher(b"^oo", PatternOpts::default());
    assert_eq!(m.execute(b"foo\nbar\n", None).unwrap(), None);
}

#[test]
fn dollar_anchors_at_each_line_end() {
    let mut m = matcher(b"foo$", PatternOpts::default());
    assert_eq!(m.execute(b"foo\nbar\n", None).unwrap(), span(0, 4));
    let mut m = matcher(b"fo$", PatternOpts::default());
    assert_eq!(m.execute(b"foo\nbar\n", None).unwrap(), None);
}

#[test]
fn empty_line_pattern_matches_only_empty_lines() {
    let mut m = matcher(b"^$", PatternOpts::default());
    assert_eq!(m.execute(b"ab\n\ncd\n", None).unwrap(), span(3, 1));
    assert_eq!(m.execute(b"ab\ncd\n", None).unwrap(), None);
}

#[test]
fn empty_pattern_matches_the_first_line() {
    let mut m = matcher(b"", PatternOpts::default());
    assert_eq!(m.execute(b"\n", None).unwrap(), span(0, 1));
    assert_eq!(m.execute(b"\n", Some(0)).unwrap(), span(0, 0));
}

#[test]
fn word_mode_requires_word_boundaries() {
    let opts = PatternOpts { match_words: true, ..Default::default() };
    let mut m = matcher(b"bar", opts);
    assert_eq!(m.execute(b"a bar b\n", None).unwrap(), span(0, 8));
    assert_eq!(m.execute(b"embargo\n", None).unwrap(), None);
    // Underscore is a word constituent.
    assert_eq!(m.execute(b"_bar\n", None).unwrap(), None);
    assert_eq!(m.execute(b"bar_\n", None).unwrap(), None);
}

#[test]
fn line_mode_requires_the_whole_line() {
    let opts = PatternOpts { match_lines: true, ..Default::default() };
    let mut m = matcher(b"bar", opts);
    assert_eq!(m.execute(b"bar\n", None).unwrap(), span(0, 4));
    assert_eq!(m.execute(b"bars\n", None).unwrap(), None);
    assert_eq!(m.execute(b" bar\n", None).unwrap(), None);
}

#[test]
fn line_mode_wins_over_word_mode() {
    let opts = PatternOpts { match_lines: true, match_words: true, ..Default::default() };
    let mut m = matcher(b"bar", opts);
    // Word wrapping alone would accept this line; line wrapping must not.
    assert_eq!(m.execute(b" bar\n", None).unwrap(), None);
    assert_eq!(m.execute(b"bar\n", None).unwrap(), span(0, 4));
}

#[test]
fn case_insensitive_matching() {
    let opts = PatternOpts { case_insensitive: true, ..Default::default() };
    let mut m = matcher(b"BAR", opts);
    assert_eq!(m.execute(b"foo\nbar\n", None).unwrap(), span(4, 4));
}

#[test]
fn custom_line_terminator() {
    let opts = PatternOpts { eol: b'\0', ..Default::default() };
    let mut m = matcher(b"bar", opts);
    assert_eq!(m.execute(b"foo\0bar\0", None).unwrap(), span(4, 4));
}

#[test]
fn unterminated_final_line_still_matches() {
    let mut m = matcher(b"bar", PatternOpts::default());
    assert_eq!(m.execute(b"bar", None).unwrap(), span(0, 3));
    assert_eq!(m.execute(b"foo\nbar", None).unwrap(), span(4, 3));
}

#[test]
fn match_before_encoding_error_is_found_in_valid_prefix() {
    let mut m = matcher(b"abc", PatternOpts::default());
    assert_eq!(m.execute(b"abc\xFFdef\n", Some(0)).unwrap(), span(0, 3));
    // Whole-line reporting still covers the full raw line.
    assert_eq!(m.execute(b"abc\xFFdef\n", None).unwrap(), span(0, 8));
}

#[test]
fn match_after_encoding_error_is_found_past_the_barrier() {
    let mut m = matcher(b"def", PatternOpts::default());
    assert_eq!(m.execute(b"abc\xFFdef\n", Some(0)).unwrap(), span(4, 3));
    // A truncated multibyte sequence: the stray continuation byte is
    // skipped by the locale table rather than the engine.
    assert_eq!(m.execute(b"abc\xE2\x82def\n", Some(0)).unwrap(), span(5, 3));
}

#[test]
fn multiline_anchors_see_no_line_boundary_at_a_barrier() {
    // After the bad byte, begin-of-line is false, so an inline (?m) caret
    // must not fire there.
    let mut m = matcher(b"(?m)^def", PatternOpts::default());
    assert_eq!(m.execute(b"abc\xFFdef\n", Some(0)).unwrap(), None);
    // The confined attempt before the bad byte is not at end-of-line.
    let mut m = matcher(b"(?m)abc$", PatternOpts::default());
    assert_eq!(m.execute(b"abc\xFFdef\n", Some(0)).unwrap(), None);
    // A real line start still anchors.
    let mut m = matcher(b"(?m)^def", PatternOpts::default());
    assert_eq!(m.execute(b"abc\ndef\n", Some(0)).unwrap(), span(4, 3));
}

#[test]
fn encoding_error_never_matches_across_the_bad_byte() {
    let mut m = matcher(b"abcdef", PatternOpts::default());
    assert_eq!(m.execute(b"abc\xFFdef\n", None).unwrap(), None);
}

#[test]
fn pattern_with_embedded_newline_is_rejected() {
    let err = BacktrackMatcher::compile(
        FancyRegexEngine::new(),
        b"a\nb",
        PatternOpts::default(),
        Arc::new(LocaleInfo::utf8()),
    )
    .unwrap_err();
    assert_eq!(err, SearchError::MultiplePatterns);
}

#[test]
fn invalid_pattern_reports_engine_diagnostic() {
    let err = BacktrackMatcher::compile(
        FancyRegexEngine::new(),
        b"(",
        PatternOpts::default(),
        Arc::new(LocaleInfo::utf8()),
    )
    .unwrap_err();
    assert!(matches!(err, SearchError::BadPattern(_)));
}

#[test]
fn non_utf8_multibyte_locale_is_rejected() {
    struct NullDecoder;
    impl MbDecoder for NullDecoder {
        fn decode(&self, _bytes: &[u8]) -> Decode {
            Decode::Invalid
        }
    }
    let locale = LocaleInfo::custom([1i8; 256], [None; 256], Arc::new(NullDecoder));
    let err = BacktrackMatcher::compile(
        FancyRegexEngine::new(),
        b"x",
        PatternOpts::default(),
        Arc::new(locale),
    )
    .unwrap_err();
    assert_eq!(err, SearchError::UnsupportedLocale);
}

#[test]
fn non_ascii_unibyte_locale_is_accepted() {
    // A Latin-1-style table: single-byte, not multibyte, so the
    // backtracking backend supports it.
    let mut sbctowc = [None; 256];
    for (b, wc) in sbctowc.iter_mut().enumerate() {
        *wc = Some(b as u8 as char);
    }
    let mut m = BacktrackMatcher::compile(
        FancyRegexEngine::new(),
        b"bar",
        PatternOpts::default(),
        Arc::new(LocaleInfo::unibyte_with_chars(sbctowc)),
    )
    .unwrap();
    assert_eq!(m.execute(b"foo\nbar\n", None).unwrap(), span(4, 4));
}

#[test]
fn unibyte_locale_searches_arbitrary_ascii() {
    let mut m = BacktrackMatcher::compile(
        FancyRegexEngine::new(),
        b"bar",
        PatternOpts::default(),
        Arc::new(LocaleInfo::unibyte()),
    )
    .unwrap();
    assert_eq!(m.execute(b"foo\nbar\n", None).unwrap(), span(4, 4));
}

#[test]
fn multibyte_text_matches_literally() {
    let mut m = matcher("héllo".as_bytes(), PatternOpts::default());
    let buf = "naïve\nhéllo\n".as_bytes();
    assert_eq!(m.execute(buf, None).unwrap(), span(7, 7));
}

#[test]
fn backtracking_limit_growth_is_transparent() {
    // The lookahead keeps fancy-regex on its backtracking VM; the a-run is
    // long enough that the default backtrack limit needs raising at least
    // once, and the caller only sees the final clean no-match.
    let mut m = matcher(b"(?=a)(a|aa)+$", PatternOpts::default());
    let mut buf = vec![b'a'; 32];
    buf.push(b'b');
    buf.push(b'\n');
    assert_eq!(m.execute(&buf, None).unwrap(), None);
}

#[test]
fn reports_engine_identification() {
    let m = matcher(b"x", PatternOpts::default());
    assert!(m.engine_version().contains("fancy"));
}
