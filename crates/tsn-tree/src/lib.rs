//! The typed tree the tsn front end hands to code generation.
//!
//! Parsing and type checking happen elsewhere. By the time a tree reaches
//! this crate every node carries its resolved source type, every class
//! declaration has been given a stable [`DeclId`], and the [`Declarations`]
//! table answers the questions code generation needs to ask about a type
//! (its own properties, in declaration order).

pub mod decl;
pub mod expr;
pub mod syntax;
pub mod ty;

pub use decl::{ClassDecl, ClassMember, DeclId, Declarations};
pub use expr::{BinaryOp, Expr, ExprKind, ObjectLiteralElement, PostfixOp, PrefixOp};
pub use syntax::SyntaxKind;
pub use ty::{ObjectShape, PropertySource, PropertyTy, Ty};
