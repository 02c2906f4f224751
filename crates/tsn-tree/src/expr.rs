//! Expression nodes and operator tokens.

use std::fmt;

use tsn_common::Span;

use crate::syntax::SyntaxKind;
use crate::ty::Ty;

macro_rules! operator_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => ($text:literal, $token:literal),)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)*
        }

        impl $name {
            /// The operator as written in source.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)*
                }
            }

            /// The parser's token name for the operator.
            pub fn token_name(self) -> &'static str {
                match self {
                    $($name::$variant => $token,)*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

operator_enum! {
    /// Operators in prefix position.
    pub enum PrefixOp {
        Plus => ("+", "PlusToken"),
        Minus => ("-", "MinusToken"),
        Increment => ("++", "PlusPlusToken"),
        Decrement => ("--", "MinusMinusToken"),
        BitNot => ("~", "TildeToken"),
        Not => ("!", "ExclamationToken"),
    }
}

operator_enum! {
    /// Operators in postfix position.
    pub enum PostfixOp {
        Increment => ("++", "PlusPlusToken"),
        Decrement => ("--", "MinusMinusToken"),
    }
}

operator_enum! {
    /// Every binary operator token of the source language.
    ///
    /// Code generation supports a closed subset of these; the rest exist so
    /// the front end can hand them over and have them refused by name.
    pub enum BinaryOp {
        Assign => ("=", "EqualsToken"),
        StrictEq => ("===", "EqualsEqualsEqualsToken"),
        StrictNotEq => ("!==", "ExclamationEqualsEqualsToken"),
        Lt => ("<", "LessThanToken"),
        Gt => (">", "GreaterThanToken"),
        LtEq => ("<=", "LessThanEqualsToken"),
        GtEq => (">=", "GreaterThanEqualsToken"),
        Add => ("+", "PlusToken"),
        Sub => ("-", "MinusToken"),
        Mul => ("*", "AsteriskToken"),
        Div => ("/", "SlashToken"),
        Rem => ("%", "PercentToken"),
        BitAnd => ("&", "AmpersandToken"),
        BitOr => ("|", "BarToken"),
        BitXor => ("^", "CaretToken"),
        Shl => ("<<", "LessThanLessThanToken"),
        Shr => (">>", "GreaterThanGreaterThanToken"),
        UShr => (">>>", "GreaterThanGreaterThanGreaterThanToken"),
        LooseEq => ("==", "EqualsEqualsToken"),
        LooseNotEq => ("!=", "ExclamationEqualsToken"),
        And => ("&&", "AmpersandAmpersandToken"),
        Or => ("||", "BarBarToken"),
        Coalesce => ("??", "QuestionQuestionToken"),
        Exp => ("**", "AsteriskAsteriskToken"),
        In => ("in", "InKeyword"),
        InstanceOf => ("instanceof", "InstanceOfKeyword"),
        Comma => (",", "CommaToken"),
        AddAssign => ("+=", "PlusEqualsToken"),
        SubAssign => ("-=", "MinusEqualsToken"),
        MulAssign => ("*=", "AsteriskEqualsToken"),
        DivAssign => ("/=", "SlashEqualsToken"),
        RemAssign => ("%=", "PercentEqualsToken"),
        ExpAssign => ("**=", "AsteriskAsteriskEqualsToken"),
        ShlAssign => ("<<=", "LessThanLessThanEqualsToken"),
        ShrAssign => (">>=", "GreaterThanGreaterThanEqualsToken"),
        UShrAssign => (">>>=", "GreaterThanGreaterThanGreaterThanEqualsToken"),
        BitAndAssign => ("&=", "AmpersandEqualsToken"),
        BitOrAssign => ("|=", "BarEqualsToken"),
        BitXorAssign => ("^=", "CaretEqualsToken"),
        AndAssign => ("&&=", "AmpersandAmpersandEqualsToken"),
        OrAssign => ("||=", "BarBarEqualsToken"),
        CoalesceAssign => ("??=", "QuestionQuestionEqualsToken"),
    }
}

/// One element of an object literal.
#[derive(Clone, Debug, PartialEq)]
pub enum ObjectLiteralElement {
    /// `name: value`
    Property { name: String, value: Expr },
    /// `{ name }`
    Shorthand { name: String },
    /// `{ ...value }`
    Spread(Expr),
    /// `{ name() { ... } }`
    Method { name: String },
    /// `{ [key]: value }`
    Computed { key: Expr, value: Expr },
    /// `{ get name() { ... } }`
    Accessor { name: String },
}

impl ObjectLiteralElement {
    pub fn property(name: impl Into<String>, value: Expr) -> Self {
        ObjectLiteralElement::Property { name: name.into(), value }
    }

    /// `(name, value)` of a plain `name: value` element.
    pub fn as_property(&self) -> Option<(&str, &Expr)> {
        match self {
            ObjectLiteralElement::Property { name, value } => Some((name.as_str(), value)),
            _ => None,
        }
    }

    pub fn syntax_kind(&self) -> SyntaxKind {
        match self {
            ObjectLiteralElement::Property { .. } => SyntaxKind::PropertyAssignment,
            ObjectLiteralElement::Shorthand { .. } => SyntaxKind::ShorthandPropertyAssignment,
            ObjectLiteralElement::Spread(_) => SyntaxKind::SpreadAssignment,
            ObjectLiteralElement::Method { .. } => SyntaxKind::MethodDeclaration,
            ObjectLiteralElement::Computed { .. } => SyntaxKind::ComputedPropertyName,
            ObjectLiteralElement::Accessor { .. } => SyntaxKind::GetAccessor,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    PrefixUnary { op: PrefixOp, operand: Box<Expr> },
    PostfixUnary { op: PostfixOp, operand: Box<Expr> },
    Binary { op: BinaryOp, lhs: Box<Expr>, rhs: Box<Expr> },
    Call { callee: Box<Expr>, args: Vec<Expr> },
    /// `object.name`
    PropertyAccess { object: Box<Expr>, name: String },
    Identifier(String),
    This,
    Bool(bool),
    Number(f64),
    String(String),
    ObjectLiteral(Vec<ObjectLiteralElement>),
    /// `new class(args)`
    New { class: Box<Expr>, args: Vec<Expr> },
    /// Any other syntactic shape, kept only by kind.
    Unsupported(SyntaxKind),
}

impl ExprKind {
    pub fn syntax_kind(&self) -> SyntaxKind {
        match self {
            ExprKind::PrefixUnary { .. } => SyntaxKind::PrefixUnaryExpression,
            ExprKind::PostfixUnary { .. } => SyntaxKind::PostfixUnaryExpression,
            ExprKind::Binary { .. } => SyntaxKind::BinaryExpression,
            ExprKind::Call { .. } => SyntaxKind::CallExpression,
            ExprKind::PropertyAccess { .. } => SyntaxKind::PropertyAccessExpression,
            ExprKind::Identifier(_) => SyntaxKind::Identifier,
            ExprKind::This => SyntaxKind::ThisKeyword,
            ExprKind::Bool(true) => SyntaxKind::TrueKeyword,
            ExprKind::Bool(false) => SyntaxKind::FalseKeyword,
            ExprKind::Number(_) => SyntaxKind::NumericLiteral,
            ExprKind::String(_) => SyntaxKind::StringLiteral,
            ExprKind::ObjectLiteral(_) => SyntaxKind::ObjectLiteralExpression,
            ExprKind::New { .. } => SyntaxKind::NewExpression,
            ExprKind::Unsupported(kind) => *kind,
        }
    }
}

/// A typed expression node.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    /// The type the checker resolved for this node.
    pub ty: Ty,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, ty: Ty) -> Self {
        Expr { kind, ty, span: Span::default() }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn syntax_kind(&self) -> SyntaxKind {
        self.kind.syntax_kind()
    }

    pub fn number(value: f64) -> Self {
        Expr::new(ExprKind::Number(value), Ty::Number)
    }

    pub fn boolean(value: bool) -> Self {
        Expr::new(ExprKind::Bool(value), Ty::Boolean)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::new(ExprKind::String(value.into()), Ty::String)
    }

    pub fn ident(name: impl Into<String>, ty: Ty) -> Self {
        Expr::new(ExprKind::Identifier(name.into()), ty)
    }

    pub fn this(ty: Ty) -> Self {
        Expr::new(ExprKind::This, ty)
    }

    pub fn prefix(op: PrefixOp, operand: Expr, ty: Ty) -> Self {
        Expr::new(ExprKind::PrefixUnary { op, operand: Box::new(operand) }, ty)
    }

    pub fn postfix(op: PostfixOp, operand: Expr, ty: Ty) -> Self {
        Expr::new(ExprKind::PostfixUnary { op, operand: Box::new(operand) }, ty)
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr, ty: Ty) -> Self {
        Expr::new(
            ExprKind::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) },
            ty,
        )
    }

    pub fn call(callee: Expr, args: Vec<Expr>, ty: Ty) -> Self {
        Expr::new(ExprKind::Call { callee: Box::new(callee), args }, ty)
    }

    pub fn property(object: Expr, name: impl Into<String>, ty: Ty) -> Self {
        Expr::new(
            ExprKind::PropertyAccess { object: Box::new(object), name: name.into() },
            ty,
        )
    }

    pub fn object_literal(elements: Vec<ObjectLiteralElement>, ty: Ty) -> Self {
        Expr::new(ExprKind::ObjectLiteral(elements), ty)
    }

    pub fn new_instance(class: Expr, args: Vec<Expr>, ty: Ty) -> Self {
        Expr::new(ExprKind::New { class: Box::new(class), args }, ty)
    }
}
