//! Structured key-value scan
//!
//! A lightweight, quote- and nesting-aware split of a brace-delimited body
//! into top-level `key: value` pairs. Commas inside nested objects, arrays
//! or quoted strings never split a pair.

use std::collections::HashMap;

use crate::version::strategy::{
    CHANGELOG_KEYS, DOWNLOAD_URL_KEYS, ExtractStrategy, Extracted, Metadata, Provenance,
    VERSION_KEY,
};

pub struct KeyValueStrategy;

impl ExtractStrategy for KeyValueStrategy {
    fn provenance(&self) -> Provenance {
        Provenance::KeyValueScan
    }

    fn extract(&self, body: &str) -> Option<Extracted> {
        let body = body.trim();
        if !(body.starts_with('{') && body.ends_with('}')) {
            return None;
        }

        let pairs = scan_pairs(body);
        let version = lookup(&pairs, &[VERSION_KEY])?;

        Some(Extracted {
            version,
            metadata: metadata_from_pairs(&pairs),
        })
    }
}

/// Scan top-level pairs, keyed by lowercased key.
///
/// Outer braces are removed when present. Later duplicates win.
pub fn scan_pairs(body: &str) -> HashMap<String, String> {
    let mut body = body.trim();
    if body.len() >= 2 && body.starts_with('{') && body.ends_with('}') {
        body = body[1..body.len() - 1].trim();
    }

    split_top_level(body)
        .into_iter()
        .filter_map(parse_pair)
        .map(|(key, value)| (key.to_lowercase(), value))
        .collect()
}

pub(super) fn metadata_from_pairs(pairs: &HashMap<String, String>) -> Metadata {
    Metadata {
        download_url: lookup(pairs, DOWNLOAD_URL_KEYS),
        changelog: lookup(pairs, CHANGELOG_KEYS),
    }
}

/// First non-empty value among `keys`, in priority order
fn lookup(pairs: &HashMap<String, String>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| pairs.get(&key.to_lowercase()))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Split on commas that sit outside quotes, braces and brackets.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut braces = 0i32;
    let mut brackets = 0i32;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => quote = Some(c),
            '{' => braces += 1,
            '}' => braces -= 1,
            '[' => brackets += 1,
            ']' => brackets -= 1,
            ',' if braces == 0 && brackets == 0 => {
                parts.push(text[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }

    parts.push(text[start..].trim());
    parts.retain(|part| !part.is_empty());
    parts
}

/// Parse `key: value`, where the key may be bare, single- or double-quoted.
fn parse_pair(pair: &str) -> Option<(String, String)> {
    let pair = pair.trim();
    let (key, rest) = match pair.chars().next()? {
        q @ ('"' | '\'') => {
            let inner = &pair[1..];
            let end = inner.find(q)?;
            (&inner[..end], &inner[end + 1..])
        }
        _ => {
            let colon = pair.find(':')?;
            (&pair[..colon], &pair[colon..])
        }
    };

    let key = key.trim();
    if key.is_empty() || key.contains(['"', '\'', ':']) {
        return None;
    }

    let value = rest.trim_start().strip_prefix(':')?.trim();
    if value.is_empty() {
        return None;
    }

    Some((key.to_string(), unquote(value)))
}

/// Remove matching wrapping quotes and resolve common escapes.
fn unquote(value: &str) -> String {
    let mut chars = value.chars();
    let (first, last) = (chars.next(), chars.next_back());
    match (first, last) {
        (Some(a), Some(b)) if a == b && (a == '"' || a == '\'') => {
            unescape(&value[1..value.len() - 1])
        }
        _ => value.to_string(),
    }
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(escaped @ ('"' | '\'' | '\\' | '/')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r#"{"version": "1.11.2"}"#, "1.11.2")]
    #[case(r#"{'version': '2.0'}"#, "2.0")]
    #[case(r#"{version: 3.1.4}"#, "3.1.4")]
    #[case(r#"{"VERSION": "4.0.0"}"#, "4.0.0")]
    #[case(r#"{"meta": {"version": "9.9.9", "a": [1, 2]}, "version": "1.0.1"}"#, "1.0.1")]
    fn extract_finds_top_level_version(#[case] body: &str, #[case] expected: &str) {
        let extracted = KeyValueStrategy.extract(body).unwrap();
        assert_eq!(extracted.version, expected);
    }

    #[rstest]
    #[case(r#"version: 1.0"#)]
    #[case(r#"{"name": "mod"}"#)]
    #[case(r#"{"version": ""}"#)]
    #[case(r#"{"meta": {"version": "1.0"}}"#)]
    fn extract_returns_none(#[case] body: &str) {
        assert_eq!(KeyValueStrategy.extract(body), None);
    }

    #[test]
    fn extract_collects_metadata_with_key_priority() {
        let body = r#"{
            "url": "https://fallback.example",
            "version": "1.2.0",
            "download_url": "https://second.example",
            "downloadUrl": "https://first.example",
            "change_log": "old",
            "changelog": "Fixed a crash, improved loading"
        }"#;

        let extracted = KeyValueStrategy.extract(body).unwrap();

        assert_eq!(
            extracted.metadata,
            Metadata {
                download_url: Some("https://first.example".to_string()),
                changelog: Some("Fixed a crash, improved loading".to_string()),
            }
        );
    }

    #[test]
    fn split_top_level_respects_nesting_and_quotes() {
        let parts =
            split_top_level(r#""a": "x, y", "b": [1, 2], "c": {"d": 1, "e": 2}, 'f': 'g,h'"#);
        assert_eq!(
            parts,
            vec![
                r#""a": "x, y""#,
                r#""b": [1, 2]"#,
                r#""c": {"d": 1, "e": 2}"#,
                "'f': 'g,h'",
            ]
        );
    }

    #[test]
    fn split_top_level_ignores_escaped_quotes() {
        let parts = split_top_level(r#""a": "say \"hi, there\"", "b": 1"#);
        assert_eq!(parts, vec![r#""a": "say \"hi, there\"""#, r#""b": 1"#]);
    }

    #[rstest]
    #[case(r#""url": "http://x""#, Some(("url", "http://x")))]
    #[case("url: http://x", Some(("url", "http://x")))]
    #[case(r#"'k': 'v'"#, Some(("k", "v")))]
    #[case(r#""k": "line\nbreak""#, Some(("k", "line\nbreak")))]
    #[case(r#""k": "#, None)]
    #[case("no separator", None)]
    #[case(r#""unterminated: 1"#, None)]
    fn parse_pair_returns_expected(#[case] pair: &str, #[case] expected: Option<(&str, &str)>) {
        assert_eq!(
            parse_pair(pair),
            expected.map(|(k, v)| (k.to_string(), v.to_string()))
        );
    }

    #[test]
    fn scan_pairs_accepts_bodies_without_braces() {
        let pairs = scan_pairs(r#""version": "1.0", "changelog": "notes""#);
        assert_eq!(pairs.get("version"), Some(&"1.0".to_string()));
        assert_eq!(pairs.get("changelog"), Some(&"notes".to_string()));
    }
}
