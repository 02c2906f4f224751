//! The result of lowering one expression.
//!
//! Locals lower to storage; temporaries lower to plain SSA values. The caller
//! decides whether a position needs the storage itself (assignment targets,
//! `++`/`--` operands) or its contents (everything else), so operators share
//! a single load-if-address path instead of each dereferencing on its own.

use inkwell::types::{BasicType, BasicTypeEnum};
use inkwell::values::{BasicValue, BasicValueEnum, PointerValue};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Lowered<'ctx> {
    /// A ready-to-use SSA value.
    Value(BasicValueEnum<'ctx>),
    /// Storage holding a value of type `pointee`. Pointers are opaque, so the
    /// pointee type travels with the address.
    Address {
        ptr: PointerValue<'ctx>,
        pointee: BasicTypeEnum<'ctx>,
    },
}

impl<'ctx> Lowered<'ctx> {
    pub fn value(value: impl BasicValue<'ctx>) -> Self {
        Lowered::Value(value.as_basic_value_enum())
    }

    pub fn address(ptr: PointerValue<'ctx>, pointee: impl BasicType<'ctx>) -> Self {
        Lowered::Address {
            ptr,
            pointee: pointee.as_basic_type_enum(),
        }
    }

    pub fn is_address(&self) -> bool {
        matches!(self, Lowered::Address { .. })
    }

    /// The type of the value this result stands for, whether it is held
    /// directly or behind an address.
    pub fn value_type(&self) -> BasicTypeEnum<'ctx> {
        match self {
            Lowered::Value(v) => v.get_type(),
            Lowered::Address { pointee, .. } => *pointee,
        }
    }
}
