//! Stateless, text-level content transforms.
//!
//! These are regex heuristics, not language-aware parsers: a comment marker
//! inside a string literal is treated as a real comment start, and escaped
//! quotes are not understood. That is a known limitation of the format, kept
//! deliberately so minified output stays stable across versions.

use once_cell::sync::Lazy;
use regex::Regex;

/// Replacement token for string literals over the elision threshold.
pub const ELIDED_LITERAL: &str = "\"<removed>\"";

/// Default threshold for [`elide_long_strings`], in characters.
pub const DEFAULT_MAX_LITERAL_LEN: usize = 100;

static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"//[^\n]*").unwrap());
static BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static NEWLINE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n]+").unwrap());
static STRING_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r#""[^"]*"|'[^']*'"#).unwrap());

/// Removes `//` line comments and `/* ... */` block comments.
///
/// Block comments match non-greedily across lines. An unterminated block
/// comment removes everything from its opener to the end of the input.
pub fn strip_comments(content: &str) -> String {
    let without_line = LINE_COMMENT.replace_all(content, "");
    let mut result = BLOCK_COMMENT.replace_all(&without_line, "").into_owned();
    if let Some(open) = result.find("/*") {
        result.truncate(open);
    }
    result
}

/// Replaces every maximal whitespace run with a single space and trims.
///
/// Idempotent: applying it twice yields the same output as applying it once.
pub fn collapse_whitespace(content: &str) -> String {
    WHITESPACE_RUN.replace_all(content, " ").trim().to_string()
}

/// The tree-scan minify pass: comment stripping followed by whitespace
/// collapse.
pub fn minify_source(content: &str) -> String {
    collapse_whitespace(&strip_comments(content))
}

/// Replaces quoted string literals longer than `max_len` characters with
/// [`ELIDED_LITERAL`].
///
/// Literal length is measured on the whole quoted token. Literals at or
/// under the threshold pass through untouched, as does an unterminated
/// literal that never finds its closing quote.
pub fn elide_long_strings(content: &str, max_len: usize) -> String {
    STRING_LITERAL
        .replace_all(content, |caps: &regex::Captures| {
            let literal = &caps[0];
            if literal.chars().count() > max_len {
                ELIDED_LITERAL.to_string()
            } else {
                literal.to_string()
            }
        })
        .into_owned()
}

/// [`elide_long_strings`] with the default threshold of
/// [`DEFAULT_MAX_LITERAL_LEN`] characters.
pub fn elide_long_strings_default(content: &str) -> String {
    elide_long_strings(content, DEFAULT_MAX_LITERAL_LEN)
}

/// The flat-collection minify pass: strip the common leading-whitespace
/// margin of all non-blank lines, fold newline runs into single spaces, and
/// trim.
pub fn flatten_whitespace(content: &str) -> String {
    let dedented = dedent(content);
    NEWLINE_RUN.replace_all(&dedented, " ").trim().to_string()
}

/// Strips the longest whitespace prefix shared by every non-blank line.
fn dedent(content: &str) -> String {
    let mut margin: Option<&str> = None;
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let indent = &line[..line.len() - line.trim_start().len()];
        margin = Some(match margin {
            None => indent,
            Some(current) => common_prefix(current, indent),
        });
    }

    let margin = margin.unwrap_or_default();
    if margin.is_empty() {
        return content.to_string();
    }

    content
        .lines()
        .map(|line| line.strip_prefix(margin).unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let end = a
        .char_indices()
        .zip(b.chars())
        .take_while(|((_, ca), cb)| ca == cb)
        .last()
        .map(|((i, ca), _)| i + ca.len_utf8())
        .unwrap_or(0);
    &a[..end]
}
