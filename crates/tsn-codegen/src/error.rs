//! Lowering errors.
//!
//! Every error here is fatal for the compilation: lowering is deterministic,
//! so there is nothing to retry, and there is no best-effort mode that would
//! let a miscompiled expression through.

use std::fmt;

use inkwell::builder::BuilderError;
use tsn_common::Span;
use tsn_tree::{PropertySource, SyntaxKind};

/// A lowering error with the location of the construct that caused it.
#[derive(Debug, Clone, PartialEq)]
pub struct LowerError {
    pub kind: LowerErrorKind,
    /// `None` until the error passes through the expression that owns it.
    pub span: Option<Span>,
}

impl LowerError {
    pub fn new(kind: LowerErrorKind, span: Span) -> Self {
        Self { kind, span: Some(span) }
    }

    /// An error raised below the expression level, located later by the
    /// enclosing expression.
    pub fn unlocated(kind: LowerErrorKind) -> Self {
        Self { kind, span: None }
    }

    /// Attach `span` unless a more precise one is already recorded.
    pub fn located(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }
}

impl From<LowerErrorKind> for LowerError {
    fn from(kind: LowerErrorKind) -> Self {
        LowerError::unlocated(kind)
    }
}

impl From<BuilderError> for LowerError {
    fn from(err: BuilderError) -> Self {
        LowerError::unlocated(LowerErrorKind::Builder(err.to_string()))
    }
}

/// What kind of name failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Identifier,
    Member,
    Constructor,
    /// A runtime entry point missing from the module.
    RuntimeFunction,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LowerErrorKind {
    /// An operator outside the supported table.
    UnsupportedOperator {
        op: &'static str,
        token: &'static str,
        syntax: SyntaxKind,
    },
    /// An expression of a shape not accepted in the position it appears.
    UnsupportedExpressionShape {
        syntax: SyntaxKind,
        position: &'static str,
    },
    /// A type with no fixed representation (`any`, unions, ...).
    UnsupportedType { ty: String },
    /// An object type property declared by something other than a property
    /// assignment or a property declaration.
    UnsupportedPropertyDeclaration {
        property: String,
        source: PropertySource,
    },
    /// An object literal element other than `name: value`.
    UnsupportedLiteralElement { syntax: SyntaxKind },
    /// A name that is not bound where it is looked up.
    UnresolvedSymbol { name: String, kind: SymbolKind },
    /// Field or method lookup on a struct with no nominal identity.
    AnonymousTypePropertyAccess { property: String },
    /// An operator applied to a value of the wrong representation.
    UnsupportedOperand { op: &'static str, found: String },
    /// A value used where a storage location is required.
    NotAddressable {
        syntax: SyntaxKind,
        position: &'static str,
    },
    ArityMismatch {
        callee: String,
        expected: usize,
        found: usize,
    },
    /// The IR builder refused an instruction.
    Builder(String),
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Identifier => write!(f, "identifier"),
            SymbolKind::Member => write!(f, "member"),
            SymbolKind::Constructor => write!(f, "constructor of"),
            SymbolKind::RuntimeFunction => write!(f, "runtime function"),
        }
    }
}

impl fmt::Display for LowerErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedOperator { op, token, syntax } => {
                write!(f, "unsupported operator `{op}` ({token}) in {syntax}")
            }
            Self::UnsupportedExpressionShape { syntax, position } => {
                write!(f, "unsupported {syntax} as {position}")
            }
            Self::UnsupportedType { ty } => write!(f, "unsupported type `{ty}`"),
            Self::UnsupportedPropertyDeclaration { property, source } => {
                write!(f, "unsupported {source} for property `{property}`")
            }
            Self::UnsupportedLiteralElement { syntax } => {
                write!(f, "unsupported object literal element {syntax}")
            }
            Self::UnresolvedSymbol { name, kind } => write!(f, "unresolved {kind} `{name}`"),
            Self::AnonymousTypePropertyAccess { property } => {
                write!(f, "property access `.{property}` on an anonymous object type")
            }
            Self::UnsupportedOperand { op, found } => {
                write!(f, "operator `{op}` does not apply to a {found} operand")
            }
            Self::NotAddressable { syntax, position } => {
                write!(f, "{syntax} is not addressable as {position}")
            }
            Self::ArityMismatch { callee, expected, found } => {
                write!(f, "`{callee}` expects {expected} argument(s), found {found}")
            }
            Self::Builder(msg) => write!(f, "IR builder error: {msg}"),
        }
    }
}

impl fmt::Display for LowerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for LowerError {}
