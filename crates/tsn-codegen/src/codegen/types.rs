//! Source type to LLVM type mapping.
//!
//! # Type mapping
//!
//! | Source type          | IrType         | LLVM type                      |
//! |----------------------|----------------|--------------------------------|
//! | boolean              | Bool           | i1                             |
//! | number               | Number         | double                         |
//! | string               | String         | %string = type { ptr, i32 }    |
//! | class instance       | Object(named)  | ptr to %ClassName              |
//! | anonymous object     | Object(literal)| ptr to { field0, field1, ... } |
//! | void                 | Void           | (none; return position only)   |
//! | any, everything else | rejected       |                                |
//!
//! Objects are always handled by reference. Named layouts are registered
//! once per declaration and reused; anonymous layouts are synthesized on
//! every request.

use std::rc::Rc;

use inkwell::context::Context;
use inkwell::types::{BasicMetadataTypeEnum, BasicType, BasicTypeEnum, FunctionType, StructType};
use inkwell::AddressSpace;
use rustc_hash::FxHashMap;
use tsn_tree::{DeclId, PropertyTy, Ty};

use super::CodeGen;
use crate::error::{LowerError, LowerErrorKind};

/// The machine representation chosen for a source type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IrType<'ctx> {
    Bool,
    Number,
    /// Carries the string layout singleton.
    String(StructType<'ctx>),
    /// A pointer to this aggregate.
    Object(StructType<'ctx>),
    Void,
}

impl<'ctx> IrType<'ctx> {
    /// The LLVM type of a value of this type, or `None` for `Void`.
    pub fn basic_type(self, context: &'ctx Context) -> Option<BasicTypeEnum<'ctx>> {
        match self {
            IrType::Bool => Some(context.bool_type().into()),
            IrType::Number => Some(context.f64_type().into()),
            IrType::String(layout) => Some(layout.into()),
            IrType::Object(_) => Some(context.ptr_type(AddressSpace::default()).into()),
            IrType::Void => None,
        }
    }

    /// The aggregate an object pointer points at.
    pub fn layout(self) -> Option<StructType<'ctx>> {
        match self {
            IrType::Object(layout) => Some(layout),
            _ => None,
        }
    }
}

/// Layout caches owned by one [`CodeGen`].
#[derive(Debug, Default)]
pub struct TypeLayouts<'ctx> {
    /// Named aggregates, keyed by declaration identity rather than name.
    named: FxHashMap<DeclId, StructType<'ctx>>,
    string: Option<StructType<'ctx>>,
}

impl<'ctx> TypeLayouts<'ctx> {
    pub fn named(&self, id: DeclId) -> Option<StructType<'ctx>> {
        self.named.get(&id).copied()
    }

    pub fn named_count(&self) -> usize {
        self.named.len()
    }
}

impl<'ctx> CodeGen<'ctx> {
    /// Resolve the machine representation of a source type.
    pub fn ir_type(&mut self, ty: &Ty) -> Result<IrType<'ctx>, LowerError> {
        match ty {
            Ty::Boolean => Ok(IrType::Bool),
            Ty::Number => Ok(IrType::Number),
            Ty::String => Ok(IrType::String(self.string_type())),
            Ty::Void => Ok(IrType::Void),
            Ty::Class(id) => self.named_layout(*id).map(IrType::Object),
            Ty::Object(shape) => {
                let fields = self.field_types(&shape.properties)?;
                Ok(IrType::Object(self.context.struct_type(&fields, false)))
            }
            Ty::Any | Ty::Other(_) => Err(LowerErrorKind::UnsupportedType { ty: ty.to_string() }.into()),
        }
    }

    /// The LLVM type of a value of source type `ty`. `void` is rejected.
    pub fn value_type(&mut self, ty: &Ty) -> Result<BasicTypeEnum<'ctx>, LowerError> {
        self.ir_type(ty)?
            .basic_type(self.context)
            .ok_or_else(|| LowerErrorKind::UnsupportedType { ty: ty.to_string() }.into())
    }

    /// The aggregate behind an object type.
    pub fn object_layout(&mut self, ty: &Ty) -> Result<StructType<'ctx>, LowerError> {
        self.ir_type(ty)?
            .layout()
            .ok_or_else(|| LowerErrorKind::UnsupportedType { ty: ty.to_string() }.into())
    }

    /// The string layout `{ ptr, i32 }`, created on first use.
    ///
    /// Every string value in the module shares this one struct type.
    pub fn string_type(&mut self) -> StructType<'ctx> {
        if let Some(layout) = self.layouts.string {
            return layout;
        }
        let layout = self.context.opaque_struct_type("string");
        layout.set_body(
            &[
                self.context.ptr_type(AddressSpace::default()).into(),
                self.context.i32_type().into(),
            ],
            false,
        );
        self.layouts.string = Some(layout);
        layout
    }

    /// Build an LLVM function type from source parameter and return types.
    pub fn fn_type(&mut self, params: &[Ty], ret: &Ty) -> Result<FunctionType<'ctx>, LowerError> {
        let param_types = params
            .iter()
            .map(|p| self.value_type(p).map(BasicMetadataTypeEnum::from))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(match self.ir_type(ret)?.basic_type(self.context) {
            Some(ret) => ret.fn_type(&param_types, false),
            None => self.context.void_type().fn_type(&param_types, false),
        })
    }

    pub fn layouts(&self) -> &TypeLayouts<'ctx> {
        &self.layouts
    }

    /// The layout registered for a class, registering it on first reference.
    ///
    /// The empty named struct is cached before its fields are resolved, so a
    /// field whose type refers back to the class finds it in the cache. A
    /// class whose fields fail to resolve is dropped from the cache again.
    fn named_layout(&mut self, id: DeclId) -> Result<StructType<'ctx>, LowerError> {
        if let Some(layout) = self.layouts.named(id) {
            return Ok(layout);
        }

        let decls = Rc::clone(&self.decls);
        let class_ty = Ty::Class(id);
        let decl = decls.class(id).ok_or_else(|| LowerErrorKind::UnsupportedType {
            ty: class_ty.to_string(),
        })?;

        let layout = self.context.opaque_struct_type(&decl.name);
        self.layouts.named.insert(id, layout);
        tracing::debug!(class = %decl.name, id = id.0, "registered named aggregate");

        let properties = decls.properties_of(&class_ty).unwrap_or_default();
        let fields = match self.field_types(&properties) {
            Ok(fields) => fields,
            Err(err) => {
                self.layouts.named.remove(&id);
                return Err(err);
            }
        };
        layout.set_body(&fields, false);
        Ok(layout)
    }

    fn field_types(&mut self, properties: &[PropertyTy]) -> Result<Vec<BasicTypeEnum<'ctx>>, LowerError> {
        properties
            .iter()
            .map(|prop| {
                if !prop.source.is_stored() {
                    return Err(LowerErrorKind::UnsupportedPropertyDeclaration {
                        property: prop.name.clone(),
                        source: prop.source,
                    }
                    .into());
                }
                self.value_type(&prop.ty)
            })
            .collect()
    }
}
