//! Row-limit injection for `query_bigquery`.
//!
//! The query is scanned lexically, not parsed: string literals, quoted
//! identifiers and comments are skipped, parentheses are counted, and only
//! a bare `LIMIT` word at depth zero counts as an existing limit clause.
//! A `LIMIT` inside a subquery, a string or an identifier such as
//! `limit_col` or `t.limit` does not. A query that ends inside an open
//! string or block comment is passed through untouched.

use std::iter::Peekable;
use std::str::CharIndices;

/// Rows returned when the caller gives no `limit`.
pub const DEFAULT_ROW_LIMIT: u64 = 100;

#[derive(Debug, Default, PartialEq, Eq)]
struct Scan {
    top_level_limit: bool,
    ends_in_line_comment: bool,
    unterminated: bool,
}

/// Returns true if `sql` already has a top-level `LIMIT` clause.
pub fn has_top_level_limit(sql: &str) -> bool {
    scan(sql).top_level_limit
}

/// Appends `LIMIT <limit>` unless the query already has a top-level limit.
///
/// A `limit` of zero leaves the query untouched, as does a query ending in
/// an unclosed string or block comment. Trailing semicolons are dropped
/// before appending.
pub fn apply_row_limit(sql: &str, limit: u64) -> String {
    if limit == 0 {
        return sql.to_string();
    }
    let body = sql.trim_end().trim_end_matches(';').trim_end();
    let scanned = scan(body);
    if scanned.top_level_limit || scanned.unterminated {
        return sql.to_string();
    }
    if scanned.ends_in_line_comment {
        return format!("{body}\nLIMIT {limit}");
    }
    format!("{body} LIMIT {limit}")
}

fn scan(sql: &str) -> Scan {
    let mut chars = sql.char_indices().peekable();
    let mut depth = 0usize;
    let mut after_dot = false;
    let mut out = Scan::default();

    while let Some((start, c)) = chars.next() {
        match c {
            '\'' | '"' | '`' => out.unterminated = !skip_quoted(&mut chars, c),
            '-' if next_is(&mut chars, '-') => {
                out.ends_in_line_comment = !skip_line(&mut chars);
            }
            '#' => out.ends_in_line_comment = !skip_line(&mut chars),
            '/' if next_is(&mut chars, '*') => {
                chars.next();
                out.unterminated = !skip_block_comment(&mut chars);
            }
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if is_word_char(c) => {
                let mut end = start + c.len_utf8();
                while let Some(&(i, d)) = chars.peek() {
                    if !is_word_char(d) {
                        break;
                    }
                    end = i + d.len_utf8();
                    chars.next();
                }
                if depth == 0 && !after_dot && sql[start..end].eq_ignore_ascii_case("LIMIT") {
                    out.top_level_limit = true;
                }
            }
            _ => {}
        }
        if !c.is_whitespace() {
            after_dot = c == '.';
        }
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn next_is(chars: &mut Peekable<CharIndices<'_>>, expected: char) -> bool {
    chars.peek().is_some_and(|&(_, c)| c == expected)
}

/// Consumes through the closing quote; backslash escapes the next char.
/// Returns false if input ended first.
fn skip_quoted(chars: &mut Peekable<CharIndices<'_>>, quote: char) -> bool {
    while let Some((_, c)) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if c == quote {
            return true;
        }
    }
    false
}

/// Consumes through the end of line. Returns false if input ended first.
fn skip_line(chars: &mut Peekable<CharIndices<'_>>) -> bool {
    for (_, c) in chars.by_ref() {
        if c == '\n' {
            return true;
        }
    }
    false
}

fn skip_block_comment(chars: &mut Peekable<CharIndices<'_>>) -> bool {
    while let Some((_, c)) = chars.next() {
        if c == '*' && next_is(chars, '/') {
            chars.next();
            return true;
        }
    }
    false
}
