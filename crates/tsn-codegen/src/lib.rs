//! LLVM code generation for the tsn compiler.
//!
//! This crate turns typed expression nodes (from `tsn-tree`) into LLVM IR
//! using the Inkwell safe bindings, and decides how every source type is laid
//! out in memory.
//!
//! ## Architecture
//!
//! - [`codegen`]: the `CodeGen` context, expression lowering, operator and
//!   member/call lowering, aggregate construction
//! - [`codegen::types`]: source type to LLVM type mapping and the layout cache
//! - [`codegen::scope`]: the read-only symbol table lowering consults
//! - [`error`]: the fatal lowering error taxonomy
//! - [`diagnostics`]: ariadne rendering of lowering errors
//!
//! ## Value model
//!
//! Every number is an `f64`, booleans are `i1`, strings are a `{ ptr, i32 }`
//! aggregate and objects are pointers to heap-allocated structs. Bitwise
//! operators round-trip through `i32`.

pub mod codegen;
pub mod diagnostics;
pub mod error;

pub use codegen::intrinsics::GC_ALLOCATE;
pub use codegen::scope::{Callable, CallableKind, Scope, Symbol};
pub use codegen::types::IrType;
pub use codegen::value::Lowered;
pub use codegen::CodeGen;
pub use error::{LowerError, LowerErrorKind, SymbolKind};
