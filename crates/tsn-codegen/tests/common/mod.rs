//! Shared harness: build functions around lowered expressions and run them
//! through LLVM's JIT.

#![allow(dead_code)]

use std::rc::Rc;

use inkwell::context::Context;
use inkwell::execution_engine::ExecutionEngine;
use inkwell::module::Module;
use inkwell::types::FunctionType;
use inkwell::values::{BasicValueEnum, FunctionValue, InstructionValue};
use inkwell::AddressSpace;
use inkwell::OptimizationLevel;
use tsn_codegen::{CodeGen, Lowered, GC_ALLOCATE};
use tsn_tree::Declarations;

pub fn codegen(context: &Context, decls: Declarations) -> CodeGen<'_> {
    CodeGen::new(context, "test", 0, None, Rc::new(decls)).expect("code generator")
}

/// Add a function and position the builder at the end of its entry block.
pub fn begin_fn<'ctx>(cg: &CodeGen<'ctx>, name: &str, fn_ty: FunctionType<'ctx>) -> FunctionValue<'ctx> {
    let function = cg.module().add_function(name, fn_ty, None);
    let entry = cg.context().append_basic_block(function, "entry");
    cg.builder().position_at_end(entry);
    function
}

/// `fn name() -> double`
pub fn number_fn<'ctx>(cg: &CodeGen<'ctx>, name: &str) -> FunctionValue<'ctx> {
    begin_fn(cg, name, cg.context().f64_type().fn_type(&[], false))
}

/// `fn name() -> i32`, for boolean results.
pub fn bool_fn<'ctx>(cg: &CodeGen<'ctx>, name: &str) -> FunctionValue<'ctx> {
    begin_fn(cg, name, cg.context().i32_type().fn_type(&[], false))
}

/// A stack slot holding `init`, as a local variable would lower.
pub fn number_local<'ctx>(cg: &CodeGen<'ctx>, name: &str, init: f64) -> Lowered<'ctx> {
    let f64_ty = cg.context().f64_type();
    let slot = cg.builder().build_alloca(f64_ty, name).unwrap();
    cg.builder().build_store(slot, f64_ty.const_float(init)).unwrap();
    Lowered::address(slot, f64_ty)
}

/// A stack slot holding an object pointer.
pub fn object_local<'ctx>(cg: &CodeGen<'ctx>, name: &str, init: BasicValueEnum<'ctx>) -> Lowered<'ctx> {
    let ptr_ty = cg.context().ptr_type(AddressSpace::default());
    let slot = cg.builder().build_alloca(ptr_ty, name).unwrap();
    cg.builder().build_store(slot, init).unwrap();
    Lowered::address(slot, ptr_ty)
}

/// Return `value` from the current function. Booleans are widened to i32.
pub fn ret<'ctx>(cg: &mut CodeGen<'ctx>, value: Lowered<'ctx>) {
    let value = cg.load_if_address(value).unwrap();
    let value: BasicValueEnum<'ctx> = match value {
        BasicValueEnum::IntValue(int) if int.get_type().get_bit_width() == 1 => cg
            .builder()
            .build_int_z_extend(int, cg.context().i32_type(), "widen")
            .unwrap()
            .into(),
        other => other,
    };
    cg.builder().build_return(Some(&value)).unwrap();
}

/// Give the allocator a body backed by `malloc` so JIT-compiled code can
/// call it.
pub fn define_allocator(cg: &CodeGen<'_>) {
    let context = cg.context();
    let allocate = cg.module().get_function(GC_ALLOCATE).unwrap();
    let builder = context.create_builder();
    builder.position_at_end(context.append_basic_block(allocate, "entry"));
    let size = allocate.get_first_param().unwrap().into_int_value();
    let memory = builder.build_array_malloc(context.i8_type(), size, "memory").unwrap();
    builder.build_return(Some(&memory)).unwrap();
}

/// Instructions in `function`'s entry block.
pub fn instructions<'ctx>(function: FunctionValue<'ctx>) -> Vec<InstructionValue<'ctx>> {
    let Some(entry) = function.get_first_basic_block() else {
        return Vec::new();
    };
    let mut out = Vec::new();
    let mut next = entry.get_first_instruction();
    while let Some(inst) = next {
        next = inst.get_next_instruction();
        out.push(inst);
    }
    out
}

pub struct Jit<'ctx> {
    engine: ExecutionEngine<'ctx>,
    _module: Module<'ctx>,
}

/// Verify the module and hand it to the JIT.
pub fn jit(cg: CodeGen<'_>) -> Jit<'_> {
    if let Err(err) = cg.verify() {
        panic!("{err}\n{}", cg.llvm_ir());
    }
    let module = cg.into_module();
    let engine = module
        .create_jit_execution_engine(OptimizationLevel::None)
        .expect("JIT engine");
    Jit { engine, _module: module }
}

impl<'ctx> Jit<'ctx> {
    pub fn call_f64(&self, name: &str) -> f64 {
        unsafe {
            let function = self
                .engine
                .get_function::<unsafe extern "C" fn() -> f64>(name)
                .expect("JIT function");
            function.call()
        }
    }

    pub fn call_i32(&self, name: &str) -> i32 {
        unsafe {
            let function = self
                .engine
                .get_function::<unsafe extern "C" fn() -> i32>(name)
                .expect("JIT function");
            function.call()
        }
    }

    pub fn call_bool(&self, name: &str) -> bool {
        unsafe {
            let function = self
                .engine
                .get_function::<unsafe extern "C" fn() -> i32>(name)
                .expect("JIT function");
            function.call() != 0
        }
    }
}
