//! # Query Text Scanner
//!
//! Locates clause keywords (`FROM`, `GROUP BY`, `ORDER BY`, `OFFSET`) inside a
//! query string. Only positions at parenthesis depth zero count, so the outer
//! `FROM` of a query is found even when `EXISTS(SELECT ... FROM ...)`
//! sub-selects appear before it in the text.
//!
//! Quoted literals are skipped and keywords must stand on identifier
//! boundaries: `u.fromDate` or `'FROM here'` never match `FROM`.
//!
//! This is not a SQL parser. It knows brackets, quotes and words, nothing more.

use crate::constants::keywords;
use crate::error::{QueryError, Result};

/// Identifier characters for keyword boundary checks. `.` and `@` are
/// included so that `u.FROM` or `@OFFSET` never read as keywords.
pub(crate) fn is_identifier_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'.' || byte == b'@'
}

/// Advance past a quoted literal starting at `i`, honouring doubled-quote
/// escapes. Returns the index of the closing quote (or the last byte when the
/// literal is unterminated).
pub(crate) fn skip_quoted(bytes: &[u8], i: usize, quote: u8) -> usize {
    let mut j = i + 1;
    while j < bytes.len() {
        if bytes[j] == quote {
            if j + 1 < bytes.len() && bytes[j + 1] == quote {
                j += 2;
                continue;
            }
            return j;
        }
        j += 1;
    }
    bytes.len().saturating_sub(1)
}

/// End index of `keyword` matched at `i`, if it stands there as whole words.
/// Multi-word keywords (`ORDER BY`) accept any run of ASCII whitespace
/// between their words.
fn keyword_end(bytes: &[u8], i: usize, keyword: &str) -> Option<usize> {
    if i > 0 && is_identifier_byte(bytes[i - 1]) {
        return None;
    }

    let mut end = i;
    for (n, word) in keyword.split_ascii_whitespace().enumerate() {
        if n > 0 {
            let gap = bytes[end..]
                .iter()
                .take_while(|b| b.is_ascii_whitespace())
                .count();
            if gap == 0 {
                return None;
            }
            end += gap;
        }
        let word = word.as_bytes();
        if !bytes[end..].starts_with(word) {
            return None;
        }
        end += word.len();
    }

    match bytes.get(end) {
        Some(&b) if is_identifier_byte(b) => None,
        _ if end == i => None,
        _ => Some(end),
    }
}

/// Byte index of `keyword` at parenthesis depth zero, if present
pub fn find_top_level(text: &str, keyword: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth: i32 = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'(' => depth += 1,
            b')' => depth -= 1,
            quote @ (b'\'' | b'"') => i = skip_quoted(bytes, i, quote),
            _ if depth == 0 && keyword_end(bytes, i, keyword).is_some() => return Some(i),
            _ => {}
        }
        i += 1;
    }

    None
}

/// Locate `keyword` at parenthesis depth zero.
///
/// Fails with `QueryCompilation` when the keyword only occurs inside nested
/// brackets or literals, or not at all.
pub fn locate_clause_keyword(text: &str, keyword: &str) -> Result<usize> {
    find_top_level(text, keyword).ok_or_else(|| QueryError::clause_not_found(keyword))
}

/// Split `text` around the first whole-word occurrence of `keyword`,
/// regardless of nesting. Returns `None` when the keyword is absent.
///
/// Used for "is this clause already present anywhere" checks before the
/// paginator injects `ORDER BY` or `OFFSET`.
pub fn split_on_keyword<'a>(text: &'a str, keyword: &str) -> Option<(&'a str, &'a str)> {
    let bytes = text.as_bytes();
    (0..bytes.len())
        .find_map(|i| keyword_end(bytes, i, keyword).map(|end| (i, end)))
        .map(|(i, end)| (&text[..i], &text[end..]))
}

/// Whether `keyword` appears anywhere in `text` as a whole word
pub fn contains_keyword(text: &str, keyword: &str) -> bool {
    split_on_keyword(text, keyword).is_some()
}

/// The query text without any top-level `ORDER BY` / `OFFSET` tail
pub fn strip_paging_clauses(text: &str) -> &str {
    let cut = [keywords::ORDER_BY, keywords::OFFSET]
        .iter()
        .filter_map(|keyword| find_top_level(text, keyword))
        .min();

    match cut {
        Some(index) => text[..index].trim_end(),
        None => text,
    }
}

fn take_identifier(text: &str) -> &str {
    let end = text
        .bytes()
        .position(|b| !(b.is_ascii_alphanumeric() || b == b'_' || b == b'.' || b == b'*'))
        .unwrap_or(text.len());
    &text[..end]
}

fn strip_word<'a>(text: &'a str, word: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(word)?;
    match rest.bytes().next() {
        Some(b) if is_identifier_byte(b) => None,
        _ => Some(rest.trim_start()),
    }
}

/// Projection list between `SELECT` and the top-level `FROM`, with any
/// `DISTINCT`, `VALUE` and `TOP n` modifiers still attached.
fn projection_list(text: &str) -> Result<&str> {
    let from = locate_clause_keyword(text, keywords::FROM)?;
    let head = text[..from].trim();
    strip_word(head, keywords::SELECT)
        .ok_or_else(|| QueryError::compilation("query text must start with SELECT"))
}

/// Whether the projection is `SELECT DISTINCT ...`
pub fn is_distinct_projection(text: &str) -> bool {
    projection_list(text)
        .map(|projection| strip_word(projection, keywords::DISTINCT).is_some())
        .unwrap_or(false)
}

/// Infer the root alias a bare order-by field should be qualified with.
///
/// Reads the first projected expression before the top-level `FROM`
/// (`SELECT u.id, ...` gives `u`, `SELECT VALUE r` gives `r`). Projections
/// that do not name an alias (`*`, function calls) fall back to the first
/// identifier after `FROM`.
pub fn infer_alias(text: &str) -> Result<String> {
    let mut projection = projection_list(text)?;
    loop {
        if let Some(rest) = strip_word(projection, keywords::DISTINCT) {
            projection = rest;
        } else if let Some(rest) = strip_word(projection, keywords::VALUE) {
            projection = rest;
        } else if let Some(rest) = strip_word(projection, keywords::TOP) {
            projection = rest.trim_start_matches(|c: char| c.is_ascii_digit() || c == '@');
            projection = projection.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '_');
            projection = projection.trim_start();
        } else {
            break;
        }
    }

    let expression = take_identifier(projection);
    let is_call = projection[expression.len()..].trim_start().starts_with('(');
    let candidate = match expression.split_once('.') {
        Some((alias, _)) => alias,
        None => expression,
    };

    if !candidate.is_empty() && candidate != "*" && !is_call {
        return Ok(candidate.to_string());
    }

    let from = locate_clause_keyword(text, keywords::FROM)?;
    let source = take_identifier(text[from + keywords::FROM.len()..].trim_start());
    match source.split('.').next() {
        Some(alias) if !alias.is_empty() && alias != "*" => Ok(alias.to_string()),
        _ => Err(QueryError::compilation(
            "unable to infer query alias for ORDER BY",
        )),
    }
}
