//! Ariadne-based rendering of lowering errors.
//!
//! Lowering stops at the first error, so there is only ever one report per
//! compilation. The report names the construct, points at its span, and
//! carries a stable error code.

use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use tsn_common::LineIndex;

use crate::error::{LowerError, LowerErrorKind};

// ── Error Codes ────────────────────────────────────────────────────────

/// Stable code per error kind. `E01xx` unsupported constructs, `E02xx`
/// lookups, `E03xx` operands and calls.
pub fn error_code(kind: &LowerErrorKind) -> &'static str {
    match kind {
        LowerErrorKind::UnsupportedOperator { .. } => "E0101",
        LowerErrorKind::UnsupportedExpressionShape { .. } => "E0102",
        LowerErrorKind::UnsupportedType { .. } => "E0103",
        LowerErrorKind::UnsupportedLiteralElement { .. } => "E0104",
        LowerErrorKind::UnsupportedPropertyDeclaration { .. } => "E0105",
        LowerErrorKind::UnresolvedSymbol { .. } => "E0201",
        LowerErrorKind::AnonymousTypePropertyAccess { .. } => "E0202",
        LowerErrorKind::UnsupportedOperand { .. } => "E0301",
        LowerErrorKind::NotAddressable { .. } => "E0302",
        LowerErrorKind::ArityMismatch { .. } => "E0303",
        LowerErrorKind::Builder(_) => "E0900",
    }
}

fn label_message(kind: &LowerErrorKind) -> String {
    match kind {
        LowerErrorKind::UnsupportedOperator { op, .. } => format!("`{op}` cannot be compiled"),
        LowerErrorKind::UnsupportedExpressionShape { syntax, .. } => format!("{syntax} not allowed here"),
        LowerErrorKind::UnsupportedType { ty } => format!("has type `{ty}`"),
        LowerErrorKind::UnsupportedLiteralElement { syntax } => format!("{syntax} in object literal"),
        LowerErrorKind::UnsupportedPropertyDeclaration { property, .. } => {
            format!("`{property}` has no storage")
        }
        LowerErrorKind::UnresolvedSymbol { name, .. } => format!("`{name}` not found in scope"),
        LowerErrorKind::AnonymousTypePropertyAccess { .. } => "object type has no declaration".to_string(),
        LowerErrorKind::UnsupportedOperand { found, .. } => format!("this is a {found}"),
        LowerErrorKind::NotAddressable { .. } => "not a storage location".to_string(),
        LowerErrorKind::ArityMismatch { expected, .. } => format!("expected {expected} argument(s)"),
        LowerErrorKind::Builder(_) => "while lowering this".to_string(),
    }
}

fn help(kind: &LowerErrorKind) -> Option<&'static str> {
    match kind {
        LowerErrorKind::UnsupportedType { ty } if ty == "any" => Some("add a type annotation"),
        LowerErrorKind::AnonymousTypePropertyAccess { .. } => Some("declare a class for this object"),
        LowerErrorKind::UnsupportedExpressionShape { position: "property access base", .. } => {
            Some("bind the base to a local first")
        }
        _ => None,
    }
}

/// Clamp a span to the source and widen empty spans to one byte.
fn clamp(span: Range<usize>, source_len: usize) -> Range<usize> {
    let start = span.start.min(source_len);
    let end = span.end.min(source_len).max(start);
    if start == end {
        start..(end + 1).min(source_len)
    } else {
        start..end
    }
}

/// Render a lowering error as a labelled report over `source`.
pub fn render_diagnostic(error: &LowerError, source: &str, _filename: &str) -> String {
    let config = Config::default().with_color(false);
    let span = clamp(
        error.span.map(|s| s.to_range()).unwrap_or(0..source.len()),
        source.len(),
    );

    let mut builder = Report::build(ReportKind::Error, span.clone())
        .with_code(error_code(&error.kind))
        .with_message(error.kind.to_string())
        .with_config(config)
        .with_label(
            Label::new(span)
                .with_message(label_message(&error.kind))
                .with_color(Color::Red),
        );
    if let Some(help) = help(&error.kind) {
        builder = builder.with_help(help);
    }

    let mut buf = Vec::new();
    if builder.finish().write(Source::from(source), &mut buf).is_err() {
        return error.to_string();
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// One-line `file:line:col: error[CODE]: message` form for logs.
pub fn short_diagnostic(error: &LowerError, source: &str, filename: &str) -> String {
    let code = error_code(&error.kind);
    match error.span {
        Some(span) => {
            let (line, col) = LineIndex::new(source).line_col(span.start);
            format!("{filename}:{line}:{col}: error[{code}]: {}", error.kind)
        }
        None => format!("{filename}: error[{code}]: {}", error.kind),
    }
}
