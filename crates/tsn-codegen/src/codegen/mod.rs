//! The code generation context.
//!
//! [`CodeGen`] owns the LLVM module and builder, the layout caches of the
//! type resolver, and the scope currently visible to expression lowering.
//! Statement lowering and function assembly live outside this crate: they
//! position the builder, install a scope with [`CodeGen::set_scope`], and ask
//! for one expression at a time.
//!
//! ## Submodules
//!
//! - [`expr`]: expression dispatch, literals, identifiers
//! - [`operators`]: unary, postfix and binary operators
//! - [`member`]: property access and calls
//! - [`aggregate`]: object literals and `new`
//! - [`types`]: type and layout resolution
//! - [`scope`]: symbol table
//! - [`value`]: the value-or-address result of lowering
//! - [`intrinsics`]: runtime function declarations

pub mod aggregate;
pub mod expr;
pub mod intrinsics;
pub mod member;
pub mod operators;
pub mod scope;
pub mod types;
pub mod value;

use std::rc::Rc;

use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::targets::{
    CodeModel, InitializationConfig, RelocMode, Target, TargetMachine, TargetTriple,
};
use inkwell::OptimizationLevel;
use tsn_tree::Declarations;

use self::scope::Scope;
use self::types::TypeLayouts;

pub struct CodeGen<'ctx> {
    /// Every LLVM value built here borrows from this context.
    pub(crate) context: &'ctx Context,
    pub(crate) module: Module<'ctx>,
    pub(crate) builder: Builder<'ctx>,
    pub(crate) target_machine: TargetMachine,

    /// Class declarations from the front end.
    pub(crate) decls: Rc<Declarations>,
    /// Named aggregate cache and the string layout singleton. Written at most
    /// once per declaration, never invalidated.
    pub(crate) layouts: TypeLayouts<'ctx>,
    /// Innermost scope visible to the expression being lowered.
    pub(crate) scope: Rc<Scope<'ctx>>,
}

/// Map the numeric `-O` level onto LLVM's code generation level.
fn optimization_level(level: u8) -> OptimizationLevel {
    match level {
        0 => OptimizationLevel::None,
        1 => OptimizationLevel::Less,
        _ => OptimizationLevel::Default,
    }
}

fn target_machine_for(triple: &TargetTriple, level: u8) -> Result<TargetMachine, String> {
    let target = Target::from_triple(triple)
        .map_err(|e| format!("unknown target `{triple}`: {e}"))?;
    target
        .create_target_machine(
            triple,
            "generic",
            "",
            optimization_level(level),
            RelocMode::PIC,
            CodeModel::Default,
        )
        .ok_or_else(|| format!("no target machine available for `{triple}`"))
}

impl<'ctx> CodeGen<'ctx> {
    /// Set up a module for `target_triple` (the host when `None`) with the
    /// runtime intrinsics declared and an empty root scope.
    ///
    /// Fails when the native target cannot be initialized or the triple is
    /// not known to this LLVM build.
    pub fn new(
        context: &'ctx Context,
        module_name: &str,
        opt_level: u8,
        target_triple: Option<&str>,
        decls: Rc<Declarations>,
    ) -> Result<Self, String> {
        Target::initialize_native(&InitializationConfig::default())
            .map_err(|e| format!("native target unavailable: {e}"))?;

        let triple = target_triple
            .map(TargetTriple::create)
            .unwrap_or_else(TargetMachine::get_default_triple);
        let target_machine = target_machine_for(&triple, opt_level)?;

        let module = context.create_module(module_name);
        module.set_triple(&triple);
        module.set_data_layout(&target_machine.get_target_data().get_data_layout());
        intrinsics::declare_intrinsics(&module);

        tracing::debug!(module = module_name, %triple, opt_level, "created code generator");

        Ok(CodeGen {
            context,
            module,
            builder: context.create_builder(),
            target_machine,
            decls,
            layouts: TypeLayouts::default(),
            scope: Rc::new(Scope::new()),
        })
    }

    pub fn context(&self) -> &'ctx Context {
        self.context
    }

    pub fn module(&self) -> &Module<'ctx> {
        &self.module
    }

    /// The builder expression lowering appends to. Callers position it.
    pub fn builder(&self) -> &Builder<'ctx> {
        &self.builder
    }

    pub fn declarations(&self) -> &Declarations {
        &self.decls
    }

    pub fn scope(&self) -> &Rc<Scope<'ctx>> {
        &self.scope
    }

    /// Consume the code generator, yielding the finished module.
    pub fn into_module(self) -> Module<'ctx> {
        self.module
    }

    /// Make `scope` the innermost visible scope, returning the previous one
    /// so the caller can restore it.
    pub fn set_scope(&mut self, scope: Rc<Scope<'ctx>>) -> Rc<Scope<'ctx>> {
        std::mem::replace(&mut self.scope, scope)
    }

    /// Run the LLVM verifier over every function lowered so far.
    pub fn verify(&self) -> Result<(), String> {
        self.module
            .verify()
            .map_err(|e| format!("invalid module `{}`: {e}", self.module_name()))
    }

    fn module_name(&self) -> String {
        self.module.get_name().to_string_lossy().into_owned()
    }

    /// Textual IR of the whole module.
    pub fn llvm_ir(&self) -> String {
        self.module.print_to_string().to_string()
    }
}
