//! Typed expression to LLVM IR translation.
//!
//! Implements `lower_expr`, the single entry point the statement lowering
//! calls for every expression, plus the leaf cases: literals, identifiers
//! and `this`. Operators, member access, calls and aggregates dispatch to
//! their own modules.

use inkwell::module::Linkage;
use inkwell::values::BasicValueEnum;
use tsn_tree::{Expr, ExprKind, SyntaxKind};

use super::scope::Symbol;
use super::value::Lowered;
use super::CodeGen;
use crate::error::{LowerError, LowerErrorKind, SymbolKind};

impl<'ctx> CodeGen<'ctx> {
    /// Lower one expression into the current insertion block.
    ///
    /// Returns either a value or the address of the storage holding it; see
    /// [`Lowered`]. On error nothing further is emitted and the error carries
    /// the span of the innermost expression that failed.
    pub fn lower_expr(&mut self, expr: &Expr) -> Result<Lowered<'ctx>, LowerError> {
        tracing::trace!(syntax = %expr.syntax_kind(), span = ?expr.span, "lowering expression");

        if expr.ty.is_any() {
            return Err(LowerError::new(
                LowerErrorKind::UnsupportedType { ty: expr.ty.to_string() },
                expr.span,
            ));
        }

        let lowered = match &expr.kind {
            ExprKind::PrefixUnary { op, operand } => self.lower_prefix_unary(*op, operand),
            ExprKind::PostfixUnary { op, operand } => self.lower_postfix_unary(*op, operand),
            ExprKind::Binary { op, lhs, rhs } => self.lower_binary(*op, lhs, rhs),
            ExprKind::Call { callee, args } => self.lower_call(callee, args),
            ExprKind::PropertyAccess { object, name } => self.lower_property_access(object, name),
            ExprKind::Identifier(name) => self.lower_identifier(name),
            ExprKind::This => self.lower_identifier("this"),
            ExprKind::Bool(value) => Ok(Lowered::value(
                self.context.bool_type().const_int(u64::from(*value), false),
            )),
            ExprKind::Number(value) => Ok(Lowered::value(self.context.f64_type().const_float(*value))),
            ExprKind::String(text) => self.lower_string_literal(text),
            ExprKind::ObjectLiteral(elements) => self.lower_object_literal(elements, &expr.ty),
            ExprKind::New { class, args } => self.lower_new(class, args, &expr.ty),
            ExprKind::Unsupported(syntax) => Err(LowerErrorKind::UnsupportedExpressionShape {
                syntax: *syntax,
                position: "expression",
            }
            .into()),
        };
        lowered.map_err(|err| err.located(expr.span))
    }

    /// Lower an expression in value position: addresses are loaded.
    pub fn lower_value(&mut self, expr: &Expr) -> Result<BasicValueEnum<'ctx>, LowerError> {
        let lowered = self.lower_expr(expr)?;
        self.load_if_address(lowered)
            .map_err(|err| err.located(expr.span))
    }

    /// The value a lowering result stands for, loading it if it is an address.
    pub fn load_if_address(&mut self, lowered: Lowered<'ctx>) -> Result<BasicValueEnum<'ctx>, LowerError> {
        match lowered {
            Lowered::Value(value) => Ok(value),
            Lowered::Address { ptr, pointee } => Ok(self.builder.build_load(pointee, ptr, "load")?),
        }
    }

    // ── Identifiers ──────────────────────────────────────────────────

    fn lower_identifier(&mut self, name: &str) -> Result<Lowered<'ctx>, LowerError> {
        let symbol = self.scope.resolve(name).cloned().ok_or_else(|| {
            LowerError::unlocated(LowerErrorKind::UnresolvedSymbol {
                name: name.to_string(),
                kind: SymbolKind::Identifier,
            })
        })?;
        self.symbol_value(symbol, SyntaxKind::Identifier)
    }

    /// A symbol used as a value. Functions decay to their address; scopes
    /// have no value.
    pub(crate) fn symbol_value(
        &self,
        symbol: Symbol<'ctx>,
        syntax: SyntaxKind,
    ) -> Result<Lowered<'ctx>, LowerError> {
        match symbol {
            Symbol::Value(lowered) => Ok(lowered),
            Symbol::Function(callable) => Ok(Lowered::value(
                callable.function.as_global_value().as_pointer_value(),
            )),
            Symbol::Scope(_) => Err(LowerErrorKind::UnsupportedExpressionShape {
                syntax,
                position: "value",
            }
            .into()),
        }
    }

    // ── String literals ──────────────────────────────────────────────

    /// `{ ptr, i32 }` pointing at a private NUL-terminated constant. The
    /// length counts UTF-8 bytes and excludes the terminator.
    fn lower_string_literal(&mut self, text: &str) -> Result<Lowered<'ctx>, LowerError> {
        let string_ty = self.string_type();

        let data = self.context.const_string(text.as_bytes(), true);
        let global = self.module.add_global(data.get_type(), None, ".str");
        global.set_initializer(&data);
        global.set_constant(true);
        global.set_unnamed_addr(true);
        global.set_linkage(Linkage::Private);

        let len = self.context.i32_type().const_int(text.len() as u64, false);
        let value = string_ty.const_named_struct(&[global.as_pointer_value().into(), len.into()]);
        Ok(Lowered::value(value))
    }
}
