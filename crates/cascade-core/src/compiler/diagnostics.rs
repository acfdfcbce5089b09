/*
 * compiler/diagnostics.rs
 * Copyright (c) 2025 the cascade contributors
 *
 * Parse transformer diagnostics into normalized records.
 */

//! Parse transformer diagnostics into normalized records.
//!
//! The transformer reports diagnostics on its error stream in one of two
//! shapes, tried in order:
//!
//! ## Structured
//! ```text
//! {"message": "Undefined variable.", "line": 4, "column": 10, ...}
//! ```
//!
//! ## Textual
//! ```text
//! Undefined variable on line 4, column 10
//! ```
//!
//! Anything else is [`DiagnosticPayload::Unrecognized`]; the caller then
//! substitutes the raw text as an unattributed message at position 0/0.

use once_cell::sync::Lazy;
use regex::Regex;

/// A diagnostic extracted from the transformer's error stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Diagnostic message, without position suffix.
    pub message: String,

    /// 1-based line number.
    pub line: u32,

    /// 1-based column number.
    pub column: u32,
}

/// Outcome of parsing one raw diagnostic payload.
///
/// A tagged result rather than parse-catch-fallback: each stage either
/// recognizes the payload or explicitly passes it on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticPayload {
    /// The payload was a structured record with message/line/column.
    Structured(Diagnostic),

    /// The payload matched the textual `on line N, column M` pattern.
    Pattern(Diagnostic),

    /// Neither shape matched.
    Unrecognized,
}

impl DiagnosticPayload {
    /// The parsed diagnostic, if either stage recognized the payload.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Self::Structured(d) | Self::Pattern(d) => Some(d),
            Self::Unrecognized => None,
        }
    }
}

/// Textual fallback pattern. Keywords are case-sensitive.
static PATTERN_RX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<message>.+) on line (?P<line>[0-9]+), column (?P<column>[0-9]+)").unwrap()
});

/// Parse a raw diagnostic payload from the transformer's error stream.
pub fn parse_diagnostic(raw: &str) -> DiagnosticPayload {
    if let Some(diagnostic) = parse_structured(raw) {
        return DiagnosticPayload::Structured(diagnostic);
    }
    if let Some(diagnostic) = parse_pattern(raw) {
        return DiagnosticPayload::Pattern(diagnostic);
    }
    DiagnosticPayload::Unrecognized
}

/// Stage 1: a JSON object carrying `message`, `line` and `column`.
fn parse_structured(raw: &str) -> Option<Diagnostic> {
    let value: serde_json::Value = serde_json::from_str(raw.trim()).ok()?;
    let message = value.get("message")?.as_str()?.to_string();
    let line = coerce_position(value.get("line")?)?;
    let column = coerce_position(value.get("column")?)?;
    Some(Diagnostic {
        message,
        line,
        column,
    })
}

/// Line/column fields arrive as numbers or numeric strings.
fn coerce_position(value: &serde_json::Value) -> Option<u32> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Stage 2: `<message> on line <N>, column <M>`.
fn parse_pattern(raw: &str) -> Option<Diagnostic> {
    let caps = PATTERN_RX.captures(raw)?;
    Some(Diagnostic {
        message: caps.name("message")?.as_str().to_string(),
        line: caps.name("line")?.as_str().parse().ok()?,
        column: caps.name("column")?.as_str().parse().ok()?,
    })
}
