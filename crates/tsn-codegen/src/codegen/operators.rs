//! Unary, postfix and binary operators.
//!
//! Numbers are `f64` everywhere. Bitwise and shift operators convert each
//! operand to `i32`, apply the integer instruction, and convert the single
//! result back. The conversion truncates toward zero and keeps the low 32
//! bits, NaN becomes 0, and infinities saturate before truncation. Shift
//! counts use their low five bits. Comparisons are ordered, so any
//! comparison involving NaN is false.
//!
//! The operator table is closed: an operator outside it is rejected before
//! either operand is lowered.

use inkwell::intrinsics::Intrinsic;
use inkwell::values::{BasicValueEnum, FloatValue, IntValue};
use inkwell::FloatPredicate;
use tsn_tree::{BinaryOp, Expr, PostfixOp, PrefixOp, SyntaxKind};

use super::value::Lowered;
use super::CodeGen;
use crate::error::{LowerError, LowerErrorKind, SymbolKind};

const FPTOSI_SAT: &str = "llvm.fptosi.sat";

fn unsupported_operator(op: &'static str, token: &'static str, syntax: SyntaxKind) -> LowerError {
    LowerErrorKind::UnsupportedOperator { op, token, syntax }.into()
}

fn is_supported_binary(op: BinaryOp) -> bool {
    use BinaryOp::*;
    matches!(
        op,
        Assign
            | StrictEq
            | StrictNotEq
            | Lt
            | Gt
            | LtEq
            | GtEq
            | Add
            | Sub
            | Mul
            | Div
            | Rem
            | BitAnd
            | BitOr
            | BitXor
            | Shl
            | Shr
            | UShr
    )
}

/// Whether `++`/`--` adds or subtracts one.
#[derive(Clone, Copy)]
enum Step {
    Up,
    Down,
}

impl<'ctx> CodeGen<'ctx> {
    // ── Prefix operators ─────────────────────────────────────────────

    pub(crate) fn lower_prefix_unary(&mut self, op: PrefixOp, operand: &Expr) -> Result<Lowered<'ctx>, LowerError> {
        let unsupported = || unsupported_operator(op.as_str(), op.token_name(), SyntaxKind::PrefixUnaryExpression);
        if op == PrefixOp::Not {
            return Err(unsupported());
        }

        let lowered = self.lower_expr(operand)?;
        let result = match op {
            PrefixOp::Plus => self.number_value(op.as_str(), lowered, operand)?,
            PrefixOp::Minus => {
                let value = self.number_value(op.as_str(), lowered, operand)?;
                self.builder.build_float_neg(value, "neg")?
            }
            PrefixOp::Increment => self.step_in_place(op.as_str(), lowered, operand, Step::Up)?.1,
            PrefixOp::Decrement => self.step_in_place(op.as_str(), lowered, operand, Step::Down)?.1,
            PrefixOp::BitNot => {
                let value = self.number_value(op.as_str(), lowered, operand)?;
                let int = self.to_int32(value)?;
                let not = self.builder.build_not(int, "not")?;
                self.from_int32(not)?
            }
            PrefixOp::Not => return Err(unsupported()),
        };
        Ok(Lowered::value(result))
    }

    // ── Postfix operators ────────────────────────────────────────────

    /// `x++` / `x--`: store the stepped value, yield the old one.
    pub(crate) fn lower_postfix_unary(&mut self, op: PostfixOp, operand: &Expr) -> Result<Lowered<'ctx>, LowerError> {
        let lowered = self.lower_expr(operand)?;
        let step = match op {
            PostfixOp::Increment => Step::Up,
            PostfixOp::Decrement => Step::Down,
        };
        let (old, _new) = self.step_in_place(op.as_str(), lowered, operand, step)?;
        Ok(Lowered::value(old))
    }

    // ── Binary operators ─────────────────────────────────────────────

    pub(crate) fn lower_binary(&mut self, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> Result<Lowered<'ctx>, LowerError> {
        let unsupported = || unsupported_operator(op.as_str(), op.token_name(), SyntaxKind::BinaryExpression);
        if !is_supported_binary(op) {
            return Err(unsupported());
        }
        if op == BinaryOp::Assign {
            return self.lower_assignment(lhs, rhs);
        }

        let l = self.lower_expr(lhs)?;
        let l = self.number_value(op.as_str(), l, lhs)?;
        let r = self.lower_expr(rhs)?;
        let r = self.number_value(op.as_str(), r, rhs)?;

        let b = &self.builder;
        let result: BasicValueEnum<'ctx> = match op {
            BinaryOp::StrictEq => b.build_float_compare(FloatPredicate::OEQ, l, r, "eq")?.into(),
            BinaryOp::StrictNotEq => b.build_float_compare(FloatPredicate::ONE, l, r, "ne")?.into(),
            BinaryOp::Lt => b.build_float_compare(FloatPredicate::OLT, l, r, "lt")?.into(),
            BinaryOp::Gt => b.build_float_compare(FloatPredicate::OGT, l, r, "gt")?.into(),
            BinaryOp::LtEq => b.build_float_compare(FloatPredicate::OLE, l, r, "le")?.into(),
            BinaryOp::GtEq => b.build_float_compare(FloatPredicate::OGE, l, r, "ge")?.into(),
            BinaryOp::Add => b.build_float_add(l, r, "add")?.into(),
            BinaryOp::Sub => b.build_float_sub(l, r, "sub")?.into(),
            BinaryOp::Mul => b.build_float_mul(l, r, "mul")?.into(),
            BinaryOp::Div => b.build_float_div(l, r, "div")?.into(),
            BinaryOp::Rem => b.build_float_rem(l, r, "rem")?.into(),
            BinaryOp::BitAnd
            | BinaryOp::BitOr
            | BinaryOp::BitXor
            | BinaryOp::Shl
            | BinaryOp::Shr
            | BinaryOp::UShr => {
                let li = self.to_int32(l)?;
                let ri = self.to_int32(r)?;
                let b = &self.builder;
                let ri = match op {
                    BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => {
                        b.build_and(ri, self.context.i32_type().const_int(31, false), "count")?
                    }
                    _ => ri,
                };
                let int = match op {
                    BinaryOp::BitAnd => b.build_and(li, ri, "and")?,
                    BinaryOp::BitOr => b.build_or(li, ri, "or")?,
                    BinaryOp::BitXor => b.build_xor(li, ri, "xor")?,
                    BinaryOp::Shl => b.build_left_shift(li, ri, "shl")?,
                    BinaryOp::Shr => b.build_right_shift(li, ri, true, "ashr")?,
                    _ => b.build_right_shift(li, ri, false, "lshr")?,
                };
                self.from_int32(int)?.into()
            }
            _ => return Err(unsupported()),
        };
        Ok(Lowered::Value(result))
    }

    /// `target = value`. The result is the stored value.
    fn lower_assignment(&mut self, target: &Expr, value: &Expr) -> Result<Lowered<'ctx>, LowerError> {
        let (ptr, pointee) = match self.lower_expr(target)? {
            Lowered::Address { ptr, pointee } => (ptr, pointee),
            Lowered::Value(_) => {
                return Err(LowerError::new(
                    LowerErrorKind::NotAddressable {
                        syntax: target.syntax_kind(),
                        position: "assignment target",
                    },
                    target.span,
                ))
            }
        };

        let stored = self.lower_value(value)?;
        if stored.get_type() != pointee {
            return Err(LowerError::new(
                LowerErrorKind::UnsupportedOperand {
                    op: BinaryOp::Assign.as_str(),
                    found: value.ty.to_string(),
                },
                value.span,
            ));
        }
        self.builder.build_store(ptr, stored)?;
        Ok(Lowered::Value(stored))
    }

    // ── Helpers ──────────────────────────────────────────────────────

    /// Load `lowered` and require a number.
    fn number_value(
        &mut self,
        op: &'static str,
        lowered: Lowered<'ctx>,
        operand: &Expr,
    ) -> Result<FloatValue<'ctx>, LowerError> {
        if !lowered.value_type().is_float_type() {
            return Err(LowerError::new(
                LowerErrorKind::UnsupportedOperand { op, found: operand.ty.to_string() },
                operand.span,
            ));
        }
        Ok(self.load_if_address(lowered)?.into_float_value())
    }

    /// Load a number from an address, add or subtract one and store it back.
    /// Returns `(old, new)`.
    fn step_in_place(
        &mut self,
        op: &'static str,
        lowered: Lowered<'ctx>,
        operand: &Expr,
        step: Step,
    ) -> Result<(FloatValue<'ctx>, FloatValue<'ctx>), LowerError> {
        let Lowered::Address { ptr, .. } = lowered else {
            return Err(LowerError::new(
                LowerErrorKind::NotAddressable {
                    syntax: operand.syntax_kind(),
                    position: "increment/decrement operand",
                },
                operand.span,
            ));
        };
        let old = self.number_value(op, lowered, operand)?;
        let one = self.context.f64_type().const_float(1.0);
        let new = match step {
            Step::Up => self.builder.build_float_add(old, one, "inc")?,
            Step::Down => self.builder.build_float_sub(old, one, "dec")?,
        };
        self.builder.build_store(ptr, new)?;
        Ok((old, new))
    }

    fn to_int32(&self, value: FloatValue<'ctx>) -> Result<IntValue<'ctx>, LowerError> {
        let i64_type = self.context.i64_type();
        let missing = || LowerErrorKind::UnresolvedSymbol {
            name: FPTOSI_SAT.to_string(),
            kind: SymbolKind::RuntimeFunction,
        };
        let saturate = Intrinsic::find(FPTOSI_SAT)
            .and_then(|intrinsic| {
                intrinsic.get_declaration(&self.module, &[i64_type.into(), self.context.f64_type().into()])
            })
            .ok_or_else(missing)?;
        let wide = self
            .builder
            .build_call(saturate, &[value.into()], "to_i64")?
            .try_as_basic_value()
            .basic()
            .ok_or_else(missing)?;
        Ok(self
            .builder
            .build_int_truncate(wide.into_int_value(), self.context.i32_type(), "to_i32")?)
    }

    fn from_int32(&self, value: IntValue<'ctx>) -> Result<FloatValue<'ctx>, LowerError> {
        Ok(self
            .builder
            .build_signed_int_to_float(value, self.context.f64_type(), "to_f64")?)
    }
}
