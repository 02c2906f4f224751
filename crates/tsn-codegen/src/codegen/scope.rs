//! The symbol table as seen by expression lowering.
//!
//! Scopes are built by whoever owns them (module, class or call frame) and
//! handed to [`CodeGen`](super::CodeGen) behind an `Rc`. Lowering only reads
//! them.

use std::rc::Rc;

use inkwell::values::FunctionValue;
use rustc_hash::FxHashMap;
use tsn_tree::DeclId;

use super::value::Lowered;

/// Whether a callable takes its receiver as a hidden first argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallableKind {
    Free,
    /// Bound method: `obj.f(a, b)` is emitted as `f(obj, a, b)`.
    Method,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Callable<'ctx> {
    pub function: FunctionValue<'ctx>,
    pub kind: CallableKind,
}

impl<'ctx> Callable<'ctx> {
    pub fn free(function: FunctionValue<'ctx>) -> Self {
        Callable { function, kind: CallableKind::Free }
    }

    pub fn method(function: FunctionValue<'ctx>) -> Self {
        Callable { function, kind: CallableKind::Method }
    }

    /// Classify a declared function by the receiver convention: a function
    /// whose first parameter is named `this` is a method.
    ///
    /// Meant for declaration processing; call sites read [`Callable::kind`].
    pub fn from_function(function: FunctionValue<'ctx>) -> Self {
        let is_method = function
            .get_first_param()
            .is_some_and(|param| param.get_name().to_bytes() == b"this");
        if is_method {
            Callable::method(function)
        } else {
            Callable::free(function)
        }
    }

    pub fn is_method(&self) -> bool {
        self.kind == CallableKind::Method
    }

    /// Declared parameter count, receiver included.
    pub fn arity(&self) -> usize {
        self.function.count_params() as usize
    }

    pub fn name(&self) -> String {
        self.function.get_name().to_string_lossy().into_owned()
    }
}

#[derive(Clone, Debug)]
pub enum Symbol<'ctx> {
    Value(Lowered<'ctx>),
    Function(Callable<'ctx>),
    /// A namespace, or a class's static scope.
    Scope(Rc<Scope<'ctx>>),
}

#[derive(Debug, Default)]
pub struct Scope<'ctx> {
    symbols: FxHashMap<String, Symbol<'ctx>>,
    parent: Option<Rc<Scope<'ctx>>>,
    /// The class this scope holds the static members of.
    declaration: Option<DeclId>,
}

impl<'ctx> Scope<'ctx> {
    /// A root scope.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn child(parent: Rc<Scope<'ctx>>) -> Self {
        Scope {
            parent: Some(parent),
            ..Self::default()
        }
    }

    /// The static scope of a class: constructor and methods.
    pub fn for_class(declaration: DeclId) -> Self {
        Scope {
            declaration: Some(declaration),
            ..Self::default()
        }
    }

    /// Bind `name`, returning what it shadowed in this scope.
    pub fn declare(&mut self, name: impl Into<String>, symbol: Symbol<'ctx>) -> Option<Symbol<'ctx>> {
        self.symbols.insert(name.into(), symbol)
    }

    /// Look `name` up in this scope only.
    pub fn get(&self, name: &str) -> Option<&Symbol<'ctx>> {
        self.symbols.get(name)
    }

    /// Look `name` up here, then in each enclosing scope.
    pub fn resolve(&self, name: &str) -> Option<&Symbol<'ctx>> {
        let mut scope = self;
        loop {
            if let Some(symbol) = scope.symbols.get(name) {
                return Some(symbol);
            }
            scope = scope.parent.as_deref()?;
        }
    }

    pub fn declaration(&self) -> Option<DeclId> {
        self.declaration
    }
}
