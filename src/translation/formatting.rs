/*!
 * Line formatting for numbered-list translation.
 *
 * Outbound texts are flattened to one line each and numbered; inbound
 * replies are split into lines, stripped of their numbering and
 * whitespace-normalized.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TranslationError;

/// Leading ordinal such as `12.` or `12)` followed by optional spaces
static ORDINAL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(\d+)[.)]\s*").unwrap());

/// Runs of whitespace, line breaks included
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Collapse every whitespace run to a single space and trim the ends
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text.trim(), " ").into_owned()
}

/// Number texts `1. ..`, `2. ..`, flattening each to a single line
pub fn number_lines(texts: &[String]) -> Vec<String> {
    texts
        .iter()
        .enumerate()
        .map(|(index, text)| format!("{}. {}", index + 1, normalize_whitespace(text)))
        .collect()
}

/// Split a leading ordinal off a line.
/// Returns the ordinal, if any, and the remaining text.
pub fn strip_ordinal(line: &str) -> (Option<usize>, &str) {
    let Some(captures) = ORDINAL_REGEX.captures(line) else {
        return (None, line);
    };
    // An ordinal too large to parse is left in the text
    match (captures.get(0), captures.get(1).and_then(|m| m.as_str().parse::<usize>().ok())) {
        (Some(whole), Some(ordinal)) => (Some(ordinal), &line[whole.end()..]),
        _ => (None, line),
    }
}

/// Parse a numbered-list reply into exactly `expected` translated strings.
///
/// Blank lines and Markdown code fences are ignored. A line's ordinal,
/// when present, must equal its 1-based position.
pub fn parse_numbered_response(response: &str, expected: usize) -> Result<Vec<String>, TranslationError> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return if expected == 0 {
            Ok(Vec::new())
        } else {
            Err(TranslationError::EmptyResponse)
        };
    }

    let lines: Vec<&str> = trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("```"))
        .collect();

    if lines.len() != expected {
        return Err(TranslationError::CountMismatch {
            expected,
            actual: lines.len(),
        });
    }

    lines
        .into_iter()
        .enumerate()
        .map(|(index, line)| {
            let position = index + 1;
            let (ordinal, text) = strip_ordinal(line);
            match ordinal {
                Some(found) if found != position => Err(TranslationError::OrderMismatch { position, found }),
                _ => Ok(normalize_whitespace(text)),
            }
        })
        .collect()
}
