use std::fmt;

/// Syntactic node kinds, named the way the front end's parser names them.
///
/// Used only for diagnostics: every fatal lowering error names the kind of
/// the construct it refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    // Expressions the lowering engine handles.
    PrefixUnaryExpression,
    PostfixUnaryExpression,
    BinaryExpression,
    CallExpression,
    PropertyAccessExpression,
    Identifier,
    ThisKeyword,
    TrueKeyword,
    FalseKeyword,
    NumericLiteral,
    StringLiteral,
    ObjectLiteralExpression,
    NewExpression,

    // Expressions it does not.
    ElementAccessExpression,
    ConditionalExpression,
    ArrowFunction,
    FunctionExpression,
    ArrayLiteralExpression,
    TemplateExpression,
    ParenthesizedExpression,
    TypeOfExpression,
    AwaitExpression,
    SuperKeyword,
    NullKeyword,

    // Object literal elements.
    PropertyAssignment,
    ShorthandPropertyAssignment,
    SpreadAssignment,
    MethodDeclaration,
    ComputedPropertyName,
    GetAccessor,
    SetAccessor,
}

impl SyntaxKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SyntaxKind::PrefixUnaryExpression => "PrefixUnaryExpression",
            SyntaxKind::PostfixUnaryExpression => "PostfixUnaryExpression",
            SyntaxKind::BinaryExpression => "BinaryExpression",
            SyntaxKind::CallExpression => "CallExpression",
            SyntaxKind::PropertyAccessExpression => "PropertyAccessExpression",
            SyntaxKind::Identifier => "Identifier",
            SyntaxKind::ThisKeyword => "ThisKeyword",
            SyntaxKind::TrueKeyword => "TrueKeyword",
            SyntaxKind::FalseKeyword => "FalseKeyword",
            SyntaxKind::NumericLiteral => "NumericLiteral",
            SyntaxKind::StringLiteral => "StringLiteral",
            SyntaxKind::ObjectLiteralExpression => "ObjectLiteralExpression",
            SyntaxKind::NewExpression => "NewExpression",
            SyntaxKind::ElementAccessExpression => "ElementAccessExpression",
            SyntaxKind::ConditionalExpression => "ConditionalExpression",
            SyntaxKind::ArrowFunction => "ArrowFunction",
            SyntaxKind::FunctionExpression => "FunctionExpression",
            SyntaxKind::ArrayLiteralExpression => "ArrayLiteralExpression",
            SyntaxKind::TemplateExpression => "TemplateExpression",
            SyntaxKind::ParenthesizedExpression => "ParenthesizedExpression",
            SyntaxKind::TypeOfExpression => "TypeOfExpression",
            SyntaxKind::AwaitExpression => "AwaitExpression",
            SyntaxKind::SuperKeyword => "SuperKeyword",
            SyntaxKind::NullKeyword => "NullKeyword",
            SyntaxKind::PropertyAssignment => "PropertyAssignment",
            SyntaxKind::ShorthandPropertyAssignment => "ShorthandPropertyAssignment",
            SyntaxKind::SpreadAssignment => "SpreadAssignment",
            SyntaxKind::MethodDeclaration => "MethodDeclaration",
            SyntaxKind::ComputedPropertyName => "ComputedPropertyName",
            SyntaxKind::GetAccessor => "GetAccessor",
            SyntaxKind::SetAccessor => "SetAccessor",
        }
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
