//! Property access and calls.
//!
//! `base.name` resolves one of three ways:
//!
//! 1. `base` is an identifier bound to a scope (a namespace or a class's
//!    static members): `name` is looked up in that scope at compile time.
//! 2. `name` is a method of `base`'s class: the method's callable, taken from
//!    the class scope, with `base` kept as the receiver.
//! 3. Otherwise `name` is a data field: a GEP into the object at the field's
//!    declaration-order index, yielding an address.
//!
//! Only identifiers and `this` may appear as `base`.

use std::rc::Rc;

use inkwell::types::BasicMetadataTypeEnum;
use inkwell::values::{BasicMetadataValueEnum, BasicValueEnum};
use tsn_tree::{DeclId, Expr, ExprKind, SyntaxKind, Ty};

use super::scope::{Callable, Scope, Symbol};
use super::value::Lowered;
use super::CodeGen;
use crate::error::{LowerError, LowerErrorKind, SymbolKind};

/// What a property access resolved to.
enum Member<'ctx> {
    /// A symbol from a static scope.
    Static(Symbol<'ctx>),
    /// The address of a data field.
    Field(Lowered<'ctx>),
    /// A method of the base's class. The base is not lowered yet.
    Method(Callable<'ctx>),
}

impl<'ctx> CodeGen<'ctx> {
    // ── Property access ──────────────────────────────────────────────

    pub(crate) fn lower_property_access(&mut self, object: &Expr, name: &str) -> Result<Lowered<'ctx>, LowerError> {
        match self.resolve_member(object, name)? {
            Member::Static(symbol) => self.symbol_value(symbol, SyntaxKind::PropertyAccessExpression),
            Member::Field(address) => Ok(address),
            Member::Method(callable) => Ok(Lowered::value(
                callable.function.as_global_value().as_pointer_value(),
            )),
        }
    }

    fn resolve_member(&mut self, object: &Expr, name: &str) -> Result<Member<'ctx>, LowerError> {
        match &object.kind {
            ExprKind::Identifier(base) => match self.scope.resolve(base) {
                Some(Symbol::Scope(scope)) => {
                    let member = scope.get(name).cloned();
                    return member.map(Member::Static).ok_or_else(|| {
                        LowerErrorKind::UnresolvedSymbol {
                            name: format!("{base}.{name}"),
                            kind: SymbolKind::Member,
                        }
                        .into()
                    });
                }
                Some(_) => {}
                None => {
                    return Err(LowerError::new(
                        LowerErrorKind::UnresolvedSymbol {
                            name: base.clone(),
                            kind: SymbolKind::Identifier,
                        },
                        object.span,
                    ))
                }
            },
            ExprKind::This => {}
            _ => {
                return Err(LowerError::new(
                    LowerErrorKind::UnsupportedExpressionShape {
                        syntax: object.syntax_kind(),
                        position: "property access base",
                    },
                    object.span,
                ))
            }
        }

        if let Ty::Object(_) = object.ty {
            return Err(LowerErrorKind::AnonymousTypePropertyAccess {
                property: name.to_string(),
            }
            .into());
        }
        let id = object
            .ty
            .decl_id()
            .ok_or_else(|| LowerErrorKind::UnsupportedType { ty: object.ty.to_string() })?;

        let decls = Rc::clone(&self.decls);
        let decl = decls.class(id).ok_or_else(|| LowerErrorKind::UnsupportedType {
            ty: object.ty.to_string(),
        })?;

        if decl.has_method(name) {
            let scope = self.class_scope(id, &decl.name)?;
            let callable = match scope.get(name) {
                Some(Symbol::Function(callable)) => *callable,
                _ => {
                    return Err(LowerErrorKind::UnresolvedSymbol {
                        name: format!("{}.{name}", decl.name),
                        kind: SymbolKind::Member,
                    }
                    .into())
                }
            };
            return Ok(Member::Method(callable));
        }

        let index = decl.member_index(name).ok_or_else(|| LowerErrorKind::UnresolvedSymbol {
            name: format!("{}.{name}", decl.name),
            kind: SymbolKind::Member,
        })?;
        let layout = self.object_layout(&object.ty)?;
        let base = self.lower_value(object)?;
        if !base.is_pointer_value() {
            return Err(LowerError::new(
                LowerErrorKind::UnsupportedOperand { op: ".", found: object.ty.to_string() },
                object.span,
            ));
        }
        let pointee = layout
            .get_field_type_at_index(index as u32)
            .ok_or_else(|| LowerErrorKind::UnsupportedType { ty: object.ty.to_string() })?;
        let ptr = self
            .builder
            .build_struct_gep(layout, base.into_pointer_value(), index as u32, name)?;
        Ok(Member::Field(Lowered::address(ptr, pointee)))
    }

    /// The static scope of class `id`: its name resolved through the scope
    /// chain to a scope that declares that class.
    fn class_scope(&self, id: DeclId, class_name: &str) -> Result<Rc<Scope<'ctx>>, LowerError> {
        match self.scope.resolve(class_name) {
            Some(Symbol::Scope(scope)) if scope.declaration() == Some(id) => Ok(Rc::clone(scope)),
            _ => Err(LowerErrorKind::UnresolvedSymbol {
                name: class_name.to_string(),
                kind: SymbolKind::Identifier,
            }
            .into()),
        }
    }

    // ── Calls ────────────────────────────────────────────────────────

    /// `callee(args)`. A method called through a receiver gets the receiver
    /// as its first argument.
    pub(crate) fn lower_call(&mut self, callee: &Expr, args: &[Expr]) -> Result<Lowered<'ctx>, LowerError> {
        let (callable, receiver) = self.resolve_callee(callee)?;
        self.emit_call(callable, receiver, args)
    }

    fn resolve_callee(&mut self, callee: &Expr) -> Result<(Callable<'ctx>, Option<BasicValueEnum<'ctx>>), LowerError> {
        let not_callable = || {
            LowerError::new(
                LowerErrorKind::UnsupportedExpressionShape {
                    syntax: callee.syntax_kind(),
                    position: "callee",
                },
                callee.span,
            )
        };

        match &callee.kind {
            ExprKind::Identifier(name) => match self.scope.resolve(name) {
                Some(Symbol::Function(callable)) => Ok((*callable, None)),
                Some(_) => Err(not_callable()),
                None => Err(LowerError::new(
                    LowerErrorKind::UnresolvedSymbol {
                        name: name.clone(),
                        kind: SymbolKind::Identifier,
                    },
                    callee.span,
                )),
            },
            ExprKind::PropertyAccess { object, name } => {
                let member = self
                    .resolve_member(object, name)
                    .map_err(|err| err.located(callee.span))?;
                match member {
                    Member::Static(Symbol::Function(callable)) => Ok((callable, None)),
                    Member::Method(callable) if callable.is_method() => {
                        let receiver = self.lower_value(object)?;
                        Ok((callable, Some(receiver)))
                    }
                    Member::Method(callable) => Ok((callable, None)),
                    Member::Static(_) | Member::Field(_) => Err(not_callable()),
                }
            }
            _ => Err(not_callable()),
        }
    }

    /// Check the arity, prepend `receiver`, lower `args` left to right and
    /// emit the call. Every argument must have its parameter's type. A void
    /// call yields the empty struct.
    pub(crate) fn emit_call(
        &mut self,
        callable: Callable<'ctx>,
        receiver: Option<BasicValueEnum<'ctx>>,
        args: &[Expr],
    ) -> Result<Lowered<'ctx>, LowerError> {
        let found = args.len() + usize::from(receiver.is_some());
        if found != callable.arity() {
            return Err(LowerErrorKind::ArityMismatch {
                callee: callable.name(),
                expected: callable.arity(),
                found,
            }
            .into());
        }

        let params = callable.function.get_type().get_param_types();
        let mismatch = |found: String| LowerErrorKind::UnsupportedOperand { op: "()", found };

        let mut arg_vals: Vec<BasicMetadataValueEnum<'ctx>> = Vec::with_capacity(found);
        if let Some(receiver) = receiver {
            if BasicMetadataTypeEnum::from(receiver.get_type()) != params[0] {
                return Err(mismatch("receiver".to_string()).into());
            }
            arg_vals.push(receiver.into());
        }
        for arg in args {
            let value = self.lower_value(arg)?;
            if BasicMetadataTypeEnum::from(value.get_type()) != params[arg_vals.len()] {
                return Err(LowerError::new(mismatch(arg.ty.to_string()), arg.span));
            }
            arg_vals.push(value.into());
        }

        tracing::trace!(callee = %callable.name(), args = arg_vals.len(), method = callable.is_method(), "emitting call");
        let call = self.builder.build_call(callable.function, &arg_vals, "call")?;
        Ok(match call.try_as_basic_value().basic() {
            Some(value) => Lowered::Value(value),
            None => Lowered::value(self.context.const_struct(&[], false)),
        })
    }
}
