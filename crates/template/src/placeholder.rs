//! Rewrites the inline mini-languages found in element content.
//!
//! Three token forms are recognised:
//!
//! - `{field}` substitutes the text form of a dataset value (arrays join with `", "`).
//! - `{math:EXPR}` replaces bare dataset keys in `EXPR` with their numeric
//!   values, evaluates the result and inserts it with fixed precision.
//! - `{if:field=value}BODY{/if}` keeps `BODY` when the field loosely equals the
//!   literal and drops the whole tag otherwise.
//!
//! The text is scanned once, left to right. Substituted values are appended to
//! the output and never rescanned, so data containing braces cannot inject
//! further tokens. `{field}` tokens may nest one level inside a math expression
//! or an `if` header (`{math:{qty}*2}`); an `if` body is resolved once for
//! fields and math but cannot open another `if`. Anything that does not parse
//! as a token is copied through verbatim.

use serde_json::Value;
use stencil_jpath::{Scope, format_plain, loose_eq, parse_path, to_number, to_text};
use stencil_math::{DEFAULT_PRECISION, eval_math_formatted};
use stencil_types::Dataset;

const MATH_PREFIX: &str = "math:";
const IF_PREFIX: &str = "if:";
const IF_CLOSE: &str = "{/if}";
/// Not part of the conditional grammar, and kept literal unless it is a real key.
const ELSE: &str = "else";

/// Which token forms are live in the text being scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    /// Top-level content: fields, math and conditionals.
    Full,
    /// The body of a conditional: fields and math.
    Body,
    /// A math expression or conditional header: fields only.
    Inner,
}

/// Resolves placeholders in `text` against a dataset with default precision.
pub fn resolve(text: &str, dataset: &Dataset) -> String {
    resolve_in(text, &Scope::new(dataset), DEFAULT_PRECISION)
}

/// Resolves placeholders in `text` against a scope (dataset plus loop locals).
pub fn resolve_in(text: &str, scope: &Scope<'_>, precision: usize) -> String {
    Resolver::new(scope, precision).resolve(text)
}

/// A placeholder resolver bound to one scope.
pub struct Resolver<'a, 'd> {
    scope: &'a Scope<'d>,
    precision: usize,
}

impl<'a, 'd> Resolver<'a, 'd> {
    pub fn new(scope: &'a Scope<'d>, precision: usize) -> Self {
        Self { scope, precision }
    }

    pub fn resolve(&self, text: &str) -> String {
        self.render(text, Pass::Full)
    }

    fn render(&self, text: &str, pass: Pass) -> String {
        if !text.contains('{') {
            return text.to_string();
        }
        // Byte offset of the last `{/if}`; an `if` opening after it cannot close.
        let last_close = text.rfind(IF_CLOSE);

        let mut out = String::with_capacity(text.len());
        let mut offset = 0;
        while let Some(found) = text[offset..].find('{') {
            let open = offset + found;
            out.push_str(&text[offset..open]);
            let can_close = last_close.is_some_and(|close| close > open);
            match self.token(&text[open..], pass, can_close, &mut out) {
                Some(consumed) => offset = open + consumed,
                None => {
                    out.push('{');
                    offset = open + 1;
                }
            }
        }
        out.push_str(&text[offset..]);
        out
    }

    /// Interprets the token at the start of `tail` (which begins with `{`).
    /// On success the replacement is appended to `out` and the number of bytes
    /// consumed is returned.
    fn token(&self, tail: &str, pass: Pass, can_close: bool, out: &mut String) -> Option<usize> {
        let close = closing_brace(tail)?;
        let inner = &tail[1..close];
        let after = close + 1;

        if pass != Pass::Inner {
            if let Some(expr) = inner.strip_prefix(MATH_PREFIX) {
                out.push_str(&self.math(expr));
                return Some(after);
            }
        }

        if pass == Pass::Full && can_close {
            if let Some(header) = inner.strip_prefix(IF_PREFIX) {
                let (field, literal) = header.split_once('=')?;
                let body_len = tail[after..].find(IF_CLOSE)?;
                let body = &tail[after..after + body_len];
                if self.test(field, literal) {
                    out.push_str(&self.render(body, Pass::Body));
                }
                return Some(after + body_len + IF_CLOSE.len());
            }
        }

        if inner.contains('{') || !self.is_field(inner) {
            return None;
        }
        let value = to_text(self.scope.lookup(inner));
        log::trace!("{{{}}} -> '{}'", inner, value);
        out.push_str(&value);
        Some(after)
    }

    fn is_field(&self, inner: &str) -> bool {
        !inner.is_empty()
            && inner.trim() == inner
            && (self.scope.has_key(inner) || (inner != ELSE && parse_path(inner).is_ok()))
    }

    fn test(&self, field: &str, literal: &str) -> bool {
        let expected = Value::String(self.render(literal, Pass::Inner));
        loose_eq(self.scope.lookup(field.trim()), &expected)
    }

    fn math(&self, expr: &str) -> String {
        let expanded = self.render(expr, Pass::Inner);
        let substituted = self.substitute_identifiers(&expanded);
        let result = eval_math_formatted(&substituted, self.precision);
        log::trace!("{{math:{}}} -> '{}' -> {}", expr, substituted, result);
        result
    }

    /// Replaces every bare identifier that names a value in scope with that
    /// value's number (non-numeric values read as `0`). Unknown identifiers are
    /// left for the math sanitizer to strip.
    fn substitute_identifiers(&self, expr: &str) -> String {
        let mut out = String::with_capacity(expr.len());
        let mut offset = 0;
        let mut prev: Option<char> = None;
        while let Some(c) = expr[offset..].chars().next() {
            let starts_identifier = (c.is_alphabetic() || c == '_')
                && !prev.is_some_and(|p| p.is_alphanumeric() || p == '_' || p == '.');
            if !starts_identifier {
                out.push(c);
                prev = Some(c);
                offset += c.len_utf8();
                continue;
            }

            let name = &expr[offset..offset + identifier_len(&expr[offset..])];
            match self.scope.select(name) {
                Some(value) => out.push_str(&numeric_literal(value)),
                None => out.push_str(name),
            }
            prev = name.chars().last();
            offset += name.len();
        }
        out
    }
}

/// Index of the `}` matching the `{` at the start of `tail`. At most one level
/// of nested braces is accepted. A scan ends at the matching brace, at a third
/// nesting level or at the end of the text, so only an unmatched `{` scans far.
fn closing_brace(tail: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in tail.bytes().enumerate() {
        match b {
            b'{' => {
                depth += 1;
                if depth > 2 {
                    return None;
                }
            }
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Length of the identifier at the start of `s`: word characters, `.key`
/// segments and `[n]` indices.
fn identifier_len(s: &str) -> usize {
    let mut pos = 0;
    while let Some(c) = s[pos..].chars().next() {
        if c.is_alphanumeric() || c == '_' {
            pos += c.len_utf8();
        } else if c == '.'
            && s[pos + 1..]
                .chars()
                .next()
                .is_some_and(|n| n.is_alphabetic() || n == '_')
        {
            pos += 1;
        } else if c == '[' {
            let digits = s[pos + 1..].bytes().take_while(u8::is_ascii_digit).count();
            if digits > 0 && s[pos + 1 + digits..].starts_with(']') {
                pos += digits + 2;
            } else {
                break;
            }
        } else {
            break;
        }
    }
    pos
}

fn numeric_literal(value: &Value) -> String {
    let n = to_number(value).unwrap_or(0.0);
    if n < 0.0 {
        format!("({})", format_plain(n))
    } else {
        format_plain(n)
    }
}
