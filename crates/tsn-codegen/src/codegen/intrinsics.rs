//! Runtime function declarations in the LLVM module.
//!
//! The only runtime entry point expression lowering calls is the
//! garbage-collected allocator. Its declaration must match the runtime's
//! signature exactly.

use inkwell::module::{Linkage, Module};
use inkwell::values::FunctionValue;
use inkwell::AddressSpace;

use crate::error::{LowerError, LowerErrorKind, SymbolKind};

/// `tsn_gc_allocate(size: i64) -> ptr`
pub const GC_ALLOCATE: &str = "tsn_gc_allocate";

/// Declare the runtime functions in the LLVM module.
///
/// Called once by [`CodeGen::new`](super::CodeGen::new). Declaring twice
/// keeps the existing declaration.
pub fn declare_intrinsics<'ctx>(module: &Module<'ctx>) {
    let context = module.get_context();
    let ptr_type = context.ptr_type(AddressSpace::default());
    let i64_type = context.i64_type();

    if module.get_function(GC_ALLOCATE).is_none() {
        let alloc_ty = ptr_type.fn_type(&[i64_type.into()], false);
        module.add_function(GC_ALLOCATE, alloc_ty, Some(Linkage::External));
    }
}

/// Look up a declared runtime function.
pub fn get_intrinsic<'ctx>(module: &Module<'ctx>, name: &str) -> Result<FunctionValue<'ctx>, LowerError> {
    module.get_function(name).ok_or_else(|| {
        LowerErrorKind::UnresolvedSymbol {
            name: name.to_string(),
            kind: SymbolKind::RuntimeFunction,
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell::context::Context;

    #[test]
    fn allocator_signature() {
        let context = Context::create();
        let module = context.create_module("test");
        declare_intrinsics(&module);

        let alloc = get_intrinsic(&module, GC_ALLOCATE).unwrap();
        assert_eq!(alloc.count_params(), 1);
        let fn_ty = alloc.get_type();
        assert!(fn_ty.get_return_type().unwrap().is_pointer_type());
        assert_eq!(fn_ty.get_param_types()[0].into_int_type().get_bit_width(), 64);
        assert_eq!(alloc.get_linkage(), Linkage::External);
    }

    #[test]
    fn redeclaring_keeps_one_function() {
        let context = Context::create();
        let module = context.create_module("test");
        declare_intrinsics(&module);
        declare_intrinsics(&module);
        let count = module
            .get_functions()
            .filter(|f| f.get_name().to_bytes() == GC_ALLOCATE.as_bytes())
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn missing_intrinsic_is_an_error() {
        let context = Context::create();
        let module = context.create_module("test");
        let err = get_intrinsic(&module, "tsn_nope").unwrap_err();
        assert_eq!(err.to_string(), "unresolved runtime function `tsn_nope`");
    }
}
