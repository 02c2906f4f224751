//! Object literals and `new`.

use std::rc::Rc;

use inkwell::types::StructType;
use inkwell::values::PointerValue;
use tsn_tree::{Expr, ExprKind, ObjectLiteralElement, Ty};

use super::intrinsics::{get_intrinsic, GC_ALLOCATE};
use super::scope::Symbol;
use super::value::Lowered;
use super::CodeGen;
use crate::error::{LowerError, LowerErrorKind, SymbolKind};

impl<'ctx> CodeGen<'ctx> {
    /// Allocate `{ a: x, b: y }` on the GC heap and store each property into
    /// the field at its position in the literal.
    ///
    /// Fields are matched by position, not by name: the literal's property
    /// order is assumed to be the order of its type's properties.
    pub(crate) fn lower_object_literal(
        &mut self,
        elements: &[ObjectLiteralElement],
        ty: &Ty,
    ) -> Result<Lowered<'ctx>, LowerError> {
        if let Some(element) = elements.iter().find(|e| e.as_property().is_none()) {
            return Err(LowerErrorKind::UnsupportedLiteralElement { syntax: element.syntax_kind() }.into());
        }

        let layout = self.object_layout(ty)?;
        let object = self.gc_allocate(layout, "object")?;

        for (index, (name, value)) in elements.iter().filter_map(ObjectLiteralElement::as_property).enumerate() {
            let field_ty = layout.get_field_type_at_index(index as u32).ok_or_else(|| {
                LowerError::new(
                    LowerErrorKind::UnresolvedSymbol { name: name.to_string(), kind: SymbolKind::Member },
                    value.span,
                )
            })?;
            let stored = self.lower_value(value)?;
            if stored.get_type() != field_ty {
                return Err(LowerError::new(
                    LowerErrorKind::UnsupportedOperand { op: ":", found: value.ty.to_string() },
                    value.span,
                ));
            }
            let field = self.builder.build_struct_gep(layout, object, index as u32, name)?;
            self.builder.build_store(field, stored)?;
        }

        Ok(Lowered::value(object))
    }

    /// `new C(args)` calls the `constructor` entry of `C`'s static scope.
    ///
    /// A constructor taking `this` is handed freshly allocated storage for the
    /// instance and, if it returns nothing, that storage is the result. Any
    /// other constructor allocates for itself and returns the instance.
    pub(crate) fn lower_new(&mut self, class: &Expr, args: &[Expr], ty: &Ty) -> Result<Lowered<'ctx>, LowerError> {
        let ExprKind::Identifier(name) = &class.kind else {
            return Err(LowerError::new(
                LowerErrorKind::UnsupportedExpressionShape {
                    syntax: class.syntax_kind(),
                    position: "new target",
                },
                class.span,
            ));
        };

        let unresolved = || {
            LowerError::new(
                LowerErrorKind::UnresolvedSymbol { name: name.clone(), kind: SymbolKind::Constructor },
                class.span,
            )
        };
        let scope = match self.scope.resolve(name) {
            Some(Symbol::Scope(scope)) => Rc::clone(scope),
            _ => return Err(unresolved()),
        };
        let constructor = match scope.get("constructor") {
            Some(Symbol::Function(callable)) => *callable,
            _ => return Err(unresolved()),
        };

        if !constructor.is_method() {
            return self.emit_call(constructor, None, args);
        }

        let layout = self.object_layout(ty)?;
        let instance = self.gc_allocate(layout, "instance")?;
        match self.emit_call(constructor, Some(instance.into()), args)? {
            Lowered::Value(value) if value.is_pointer_value() => Ok(Lowered::Value(value)),
            _ => Ok(Lowered::value(instance)),
        }
    }

    /// Call the runtime allocator for one instance of `layout`.
    pub(crate) fn gc_allocate(&mut self, layout: StructType<'ctx>, name: &str) -> Result<PointerValue<'ctx>, LowerError> {
        let allocate = get_intrinsic(&self.module, GC_ALLOCATE)?;
        let size = self.target_machine.get_target_data().get_abi_size(&layout);
        let size = self.context.i64_type().const_int(size, false);
        self.builder
            .build_call(allocate, &[size.into()], name)?
            .try_as_basic_value()
            .basic()
            .map(|ptr| ptr.into_pointer_value())
            .ok_or_else(|| LowerErrorKind::Builder(format!("{GC_ALLOCATE} returned void")).into())
    }
}
