//! Escaping for the Lucene `query_string` grammar.
//!
//! Only used by [`TextStrategy::QueryString`](crate::TextStrategy::QueryString).
//! The structured strategy sends text as data and needs no escaping.
//!
//! Rules, applied in order:
//! - `+ - && || ! ( ) { } [ ] ^ " ~ * ? \ /` are backslash-prefixed
//! - any remaining `&` becomes a space
//! - bare `AND` / `OR` / `NOT` are quoted so they are not parsed as operators

use once_cell::sync::Lazy;
use regex::Regex;

const SPECIAL_CHARS: &[char] = &[
    '+', '-', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', '\\', '/',
];

static BOOLEAN_KEYWORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(AND|OR|NOT)\b").expect("boolean keyword pattern is valid"));

pub fn escape_query_string(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len() * 2);
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '&' | '|' if chars.peek() == Some(&c) => {
                chars.next();
                escaped.push('\\');
                escaped.push(c);
                escaped.push(c);
            }
            c if SPECIAL_CHARS.contains(&c) => {
                escaped.push('\\');
                escaped.push(c);
            }
            c => escaped.push(c),
        }
    }

    let folded = escaped.replace('&', " ");
    BOOLEAN_KEYWORDS.replace_all(&folded, "\"$1\"").into_owned()
}
