//! Properties file codec
//!
//! Reader for the `.properties` text format: `key=value`, `key:value` or
//! `key value` entries, `#`/`!` comments, backslash line continuation and
//! the usual escapes including `\uXXXX`.

use std::path::Path;

use log::trace;

use crate::common::fs::read_to_string;
use crate::common::{AppConfigError, Result};

/// Parse properties text into `(key, value)` pairs in file order.
///
/// Duplicates are kept; callers that build maps let the later entry win.
/// `origin` only feeds error messages.
pub fn parse(content: &str, origin: &str) -> Result<Vec<(String, String)>> {
    let mut entries = Vec::new();
    let mut lines = split_lines(content).into_iter().enumerate();

    while let Some((index, natural)) = lines.next() {
        let line_no = index + 1;
        let trimmed = natural.trim_start_matches(is_whitespace);

        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        // Join continuation lines into one logical line
        let mut logical = String::from(trimmed);
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start_matches(is_whitespace)),
                None => break,
            }
        }

        let (raw_key, raw_value) = split_entry(&logical);
        let key = unescape(raw_key).map_err(|message| AppConfigError::Parse {
            origin: origin.to_string(),
            line: line_no,
            message,
        })?;
        let value = unescape(raw_value).map_err(|message| AppConfigError::Parse {
            origin: origin.to_string(),
            line: line_no,
            message,
        })?;

        trace!("{}:{} {}={}", origin, line_no, key, value);
        entries.push((key, value));
    }

    Ok(entries)
}

/// Read and parse a properties file
pub fn load_file(path: &Path) -> Result<Vec<(String, String)>> {
    let content = read_to_string(path)?;
    parse(&content, &path.display().to_string())
}

/// Split on `\r\n`, `\n` or a lone `\r`
fn split_lines(content: &str) -> Vec<&str> {
    let bytes = content.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&content[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&content[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < content.len() {
        lines.push(&content[start..]);
    }

    lines
}

/// An odd number of trailing backslashes continues the line
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn is_whitespace(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\x0c'
}

/// Split a logical line into its raw (still escaped) key and value
fn split_entry(line: &str) -> (&str, &str) {
    let mut key_end = line.len();
    let mut value_start = line.len();
    let mut has_separator = false;
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        if !escaped && (c == '=' || c == ':') {
            key_end = i;
            value_start = i + 1;
            has_separator = true;
            break;
        }
        if !escaped && is_whitespace(c) {
            key_end = i;
            value_start = i + 1;
            break;
        }
        escaped = c == '\\' && !escaped;
    }

    // Skip blanks and at most one separator before the value
    let rest = &line[value_start..];
    let mut offset = rest.len();
    for (i, c) in rest.char_indices() {
        if is_whitespace(c) {
            continue;
        }
        if !has_separator && (c == '=' || c == ':') {
            has_separator = true;
            continue;
        }
        offset = i;
        break;
    }

    (&line[..key_end], &rest[offset..])
}

/// Resolve escape sequences
fn unescape(raw: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let unit = read_code_unit(&mut chars)?;
                let code = match unit {
                    0xD800..=0xDBFF => {
                        // High surrogate, the low half must follow as another \uXXXX
                        if chars.next() != Some('\\') || chars.next() != Some('u') {
                            return Err(format!("Unpaired surrogate: \\u{:04X}", unit));
                        }
                        let low = read_code_unit(&mut chars)?;
                        if !(0xDC00..=0xDFFF).contains(&low) {
                            return Err(format!("Unpaired surrogate: \\u{:04X}", unit));
                        }
                        0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
                    }
                    0xDC00..=0xDFFF => {
                        return Err(format!("Unpaired surrogate: \\u{:04X}", unit));
                    }
                    _ => unit,
                };
                let decoded = char::from_u32(code)
                    .ok_or_else(|| format!("Invalid code point: \\u{:04X}", code))?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

/// Read the four hex digits of a `\uXXXX` escape
fn read_code_unit(chars: &mut std::str::Chars<'_>) -> std::result::Result<u32, String> {
    let hex: String = chars.by_ref().take(4).collect();
    if hex.chars().count() != 4 {
        return Err(format!("Malformed \\uxxxx encoding: \\u{}", hex));
    }
    u32::from_str_radix(&hex, 16).map_err(|_| format!("Malformed \\uxxxx encoding: \\u{}", hex))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(content: &str) -> Vec<(String, String)> {
        parse(content, "test.properties").unwrap()
    }

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn test_separators() {
        let parsed = pairs("a=1\nb: 2\nc 3\nd   =   4\ne\n");
        assert_eq!(
            parsed,
            vec![pair("a", "1"), pair("b", "2"), pair("c", "3"), pair("d", "4"), pair("e", "")]
        );
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let parsed = pairs("# comment\n! other comment\n\n   \nkey=value\n  # indented comment\n");
        assert_eq!(parsed, vec![pair("key", "value")]);
    }

    #[test]
    fn test_continuation() {
        let parsed = pairs("list=development,\\\n    production,\\\n    test\nnext=1\n");
        assert_eq!(
            parsed,
            vec![pair("list", "development,production,test"), pair("next", "1")]
        );

        // An even number of trailing backslashes is an escaped backslash
        let parsed = pairs("path=c:\\\\\nother=x\n");
        assert_eq!(parsed, vec![pair("path", "c:\\"), pair("other", "x")]);
    }

    #[test]
    fn test_escapes() {
        let parsed = pairs("key\\ with\\ spaces=tab\\there\nunicode=caf\\u00e9\ncolon\\:key=a\\=b\n");
        assert_eq!(
            parsed,
            vec![
                pair("key with spaces", "tab\there"),
                pair("unicode", "café"),
                pair("colon:key", "a=b"),
            ]
        );
    }

    #[test]
    fn test_surrogate_pair_escape() {
        let parsed = pairs("emoji=\\uD83D\\uDE00\nmixed=a\\ud83d\\ude00b\n");
        assert_eq!(parsed, vec![pair("emoji", "\u{1F600}"), pair("mixed", "a\u{1F600}b")]);

        for content in ["lone=\\uD83D\n", "reversed=\\uDE00\\uD83D\n", "broken=\\uD83Dx\n"] {
            match parse(content, "emoji.properties") {
                Err(AppConfigError::Parse { line, message, .. }) => {
                    assert_eq!(line, 1);
                    assert!(message.contains("surrogate"), "{}", message);
                }
                other => panic!("expected parse error for {:?}, got {:?}", content, other),
            }
        }
    }

    #[test]
    fn test_line_terminators() {
        assert_eq!(pairs("a=1\rb=2\r"), vec![pair("a", "1"), pair("b", "2")]);
        assert_eq!(
            pairs("a=1\r\nb=2\nc=3"),
            vec![pair("a", "1"), pair("b", "2"), pair("c", "3")]
        );
        assert_eq!(pairs("list=x,\\\r  y\r"), vec![pair("list", "x,y")]);
    }

    #[test]
    fn test_value_keeps_inner_separators() {
        let parsed = pairs("url=jdbc:postgresql://localhost:5432/db\nempty=\nsep==x\n");
        assert_eq!(
            parsed,
            vec![
                pair("url", "jdbc:postgresql://localhost:5432/db"),
                pair("empty", ""),
                pair("sep", "=x"),
            ]
        );
    }

    #[test]
    fn test_duplicates_are_kept_in_order() {
        let parsed = pairs("a=1\na=2\n");
        assert_eq!(parsed, vec![pair("a", "1"), pair("a", "2")]);
    }

    #[test]
    fn test_malformed_unicode_escape() {
        let err = parse("ok=1\nbad=\\u12\n", "broken.properties").unwrap_err();
        match err {
            AppConfigError::Parse { origin, line, .. } => {
                assert_eq!(origin, "broken.properties");
                assert_eq!(line, 2);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load_file(Path::new("does-not-exist.properties")),
            Err(AppConfigError::FileNotFound(_))
        ));
    }
}
