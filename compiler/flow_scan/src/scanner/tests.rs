use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

// === Whitespace ===

#[test]
fn first_valid_skips_all_whitespace_kinds() {
    let scanner = Scanner::new(" \t\r\n x");
    assert_eq!(scanner.first_valid(), 5);
}

#[test]
fn first_valid_at_cursor_when_not_whitespace() {
    let scanner = Scanner::new("x  y");
    assert_eq!(scanner.first_valid(), 0);
}

#[test]
fn next_valid_looks_strictly_after_cursor() {
    let scanner = Scanner::new("x  y");
    assert_eq!(scanner.next_valid(), 3);
}

#[test]
fn first_valid_returns_len_on_trailing_whitespace() {
    let mut scanner = Scanner::new("a   ");
    scanner.seek(1);
    assert_eq!(scanner.first_valid(), 4);
    scanner.skip_whitespace();
    assert!(scanner.eof());
    assert_eq!(scanner.current(), 0);
}

// === Words ===

#[test]
fn read_full_word_stops_at_non_word() {
    let mut scanner = Scanner::new("alpha_1+beta");
    assert_eq!(scanner.read_full_word(), "alpha_1");
    assert_eq!(scanner.current(), b'+');
}

#[test]
fn read_full_word_accepts_call_contract_names() {
    let mut scanner = Scanner::new("@ret = @args");
    assert_eq!(scanner.read_full_word(), "@ret");
    scanner.skip_whitespace();
    scanner.advance();
    scanner.skip_whitespace();
    assert_eq!(scanner.read_full_word(), "@args");
    assert!(scanner.eof());
}

#[test]
fn read_full_word_is_empty_on_punctuation() {
    let mut scanner = Scanner::new("?x");
    assert_eq!(scanner.read_full_word(), "");
    assert_eq!(scanner.pos(), 0);
}

// === Numbers ===

#[test]
fn read_full_number_integer() {
    let mut scanner = Scanner::new("42;");
    assert_eq!(scanner.read_full_number(), Ok(42.0));
    assert_eq!(scanner.current(), b';');
}

#[test]
fn read_full_number_fraction() {
    let mut scanner = Scanner::new("3.25 ");
    assert_eq!(scanner.read_full_number(), Ok(3.25));
    assert_eq!(scanner.pos(), 4);
}

#[test]
fn read_full_number_rejects_two_points() {
    let mut scanner = Scanner::new("1.2.3");
    let err = scanner.read_full_number().unwrap_err();
    assert_eq!(
        err.kind,
        ScanErrorKind::MalformedNumber {
            text: "1.2.3".to_string()
        }
    );
    assert_eq!(scanner.pos(), 0);
}

// === Strings ===

#[test]
fn read_full_string_strips_quotes() {
    for text in ["'hello'", "\"hello\"", "`hello`"] {
        let mut scanner = Scanner::new(text);
        assert_eq!(scanner.read_full_string(), Ok("hello"));
        assert!(scanner.eof());
    }
}

#[test]
fn read_full_string_other_quotes_do_not_terminate() {
    let mut scanner = Scanner::new("\"it's `fine`\"x");
    assert_eq!(scanner.read_full_string(), Ok("it's `fine`"));
    assert_eq!(scanner.current(), b'x');
}

#[test]
fn read_full_string_skips_escaped_quote_without_decoding() {
    let mut scanner = Scanner::new(r#""say \"hi\"" rest"#);
    assert_eq!(scanner.read_full_string(), Ok(r#"say \"hi\""#));
    assert_eq!(scanner.current(), b' ');
}

#[test]
fn read_full_string_unterminated() {
    let mut scanner = Scanner::new("'open");
    assert_eq!(
        scanner.read_full_string(),
        Err(ScanError {
            kind: ScanErrorKind::UnterminatedString { quote: '\'' },
            pos: 0,
        })
    );
}

// === Brackets ===

#[test]
fn read_full_bracket_handles_nesting_and_strings() {
    let mut scanner = Scanner::new(r#"(a, "(", (b)) tail"#);
    assert_eq!(scanner.read_full_bracket(), Ok(r#"a, "(", (b)"#));
    assert_eq!(scanner.current(), b' ');
}

#[test]
fn read_full_bracket_ignores_other_bracket_types() {
    let mut scanner = Scanner::new("{ f(x]) }");
    assert_eq!(scanner.read_full_bracket(), Ok(" f(x]) "));
    assert!(scanner.eof());
}

#[test]
fn read_full_bracket_closing_inside_string_does_not_close() {
    let mut scanner = Scanner::new("{ print('}'); }");
    assert_eq!(scanner.read_full_bracket(), Ok(" print('}'); "));
}

#[test]
fn read_full_bracket_square() {
    let mut scanner = Scanner::new("[1, [2, 3]]");
    assert_eq!(scanner.read_full_bracket(), Ok("1, [2, 3]"));
}

#[test]
fn read_full_bracket_unclosed() {
    let mut scanner = Scanner::new("(a, (b)");
    assert_eq!(
        scanner.read_full_bracket(),
        Err(ScanError {
            kind: ScanErrorKind::UnclosedBracket { open: '(' },
            pos: 0,
        })
    );
}

#[test]
fn read_full_bracket_requires_opening_bracket() {
    let mut scanner = Scanner::new("a)");
    let err = scanner.read_full_bracket().unwrap_err();
    assert!(matches!(err.kind, ScanErrorKind::Expected { .. }));
}

// === Positions ===

#[test]
fn line_col_counts_newlines() {
    let scanner = Scanner::new("a = 1;\nb = 2;\n  c");
    assert_eq!(scanner.line_col(0), LineCol { line: 1, col: 1 });
    assert_eq!(scanner.line_col(7), LineCol { line: 2, col: 1 });
    assert_eq!(scanner.line_col(16), LineCol { line: 3, col: 3 });
}

#[test]
fn seek_clamps_to_end() {
    let mut scanner = Scanner::new("ab");
    scanner.seek(10);
    assert_eq!(scanner.pos(), 2);
    assert!(scanner.eof());
}

// === Properties ===

proptest! {
    #[test]
    fn integers_scan_exactly(n in 0u32..u32::MAX) {
        let text = format!("{n};");
        let mut scanner = Scanner::new(&text);
        prop_assert_eq!(scanner.read_full_number(), Ok(f64::from(n)));
        prop_assert_eq!(scanner.current(), b';');
    }

    #[test]
    fn decimals_match_std_parse(whole in 0u32..100_000, frac in 0u32..100_000) {
        let text = format!("{whole}.{frac}+");
        let expected: f64 = text[..text.len() - 1].parse().unwrap();
        let mut scanner = Scanner::new(&text);
        prop_assert_eq!(scanner.read_full_number(), Ok(expected));
    }

    #[test]
    fn bracket_content_is_returned_verbatim(content in "[a-z0-9 ,;+=]{0,40}") {
        let text = format!("({content})");
        let mut scanner = Scanner::new(&text);
        prop_assert_eq!(scanner.read_full_bracket(), Ok(content.as_str()));
        prop_assert!(scanner.eof());
    }
}
