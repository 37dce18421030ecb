//! Binary operators over typed sparse columns
//!
//! Every operator runs through the single aligned scan; dispatch on the
//! operand types happens once per call, never per row.

use super::aligned::aligned_scan;
use crate::error::{Result, TableError};
use crate::table::{Column, DType, SparseColumn};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    /// True division (always float)
    Div,
    /// Floor division; integer operands give an integer result
    FloorDiv,
    Pow,
    /// Floor modulo (result takes the divisor's sign)
    Mod,
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
    And,
    Or,
    Xor,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 16] = [
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::FloorDiv,
        BinaryOp::Pow,
        BinaryOp::Mod,
        BinaryOp::Gt,
        BinaryOp::Ge,
        BinaryOp::Lt,
        BinaryOp::Le,
        BinaryOp::Eq,
        BinaryOp::Ne,
        BinaryOp::And,
        BinaryOp::Or,
        BinaryOp::Xor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "truediv",
            BinaryOp::FloorDiv => "floordiv",
            BinaryOp::Pow => "pow",
            BinaryOp::Mod => "mod",
            BinaryOp::Gt => "gt",
            BinaryOp::Ge => "ge",
            BinaryOp::Lt => "lt",
            BinaryOp::Le => "le",
            BinaryOp::Eq => "eq",
            BinaryOp::Ne => "ne",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Xor => "xor",
        }
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add
                | BinaryOp::Sub
                | BinaryOp::Mul
                | BinaryOp::Div
                | BinaryOp::FloorDiv
                | BinaryOp::Pow
                | BinaryOp::Mod
        )
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Gt | BinaryOp::Ge | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Eq | BinaryOp::Ne
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or | BinaryOp::Xor)
    }

    fn unsupported(self, left: &Column, right: &Column) -> TableError {
        TableError::UnsupportedOperands {
            op: self.name(),
            left: left.dtype(),
            right: right.dtype(),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Combine two columns row by row where both are present.
///
/// Output presence is the AND of the input presences. Arithmetic yields
/// `Float64`, except floor division of two integer columns which yields
/// `Int64`; comparisons and logical operators yield `Bool`.
pub fn apply_binary(left: &Column, op: BinaryOp, right: &Column) -> Result<Column> {
    left.domain().ensure_same(right.domain())?;
    if op.is_arithmetic() {
        arithmetic(left, op, right)
    } else if op.is_comparison() {
        comparison(left, op, right)
    } else {
        logical(left, op, right)
    }
}

impl Column {
    /// Method form of [`apply_binary`]
    pub fn binary(&self, op: BinaryOp, other: &Column) -> Result<Column> {
        apply_binary(self, op, other)
    }
}

fn arithmetic(left: &Column, op: BinaryOp, right: &Column) -> Result<Column> {
    if !left.dtype().is_numeric() || !right.dtype().is_numeric() {
        return Err(op.unsupported(left, right));
    }

    if op == BinaryOp::FloorDiv && left.dtype().is_integer() && right.dtype().is_integer() {
        if let (Some(l), Some(r)) = (left.to_int64(), right.to_int64()) {
            return aligned_scan(&l, &r, |a, b| floor_div_i64(*a, *b)).map(Column::Int64);
        }
    }

    let f: fn(f64, f64) -> f64 = match op {
        BinaryOp::Add => |a, b| a + b,
        BinaryOp::Sub => |a, b| a - b,
        BinaryOp::Mul => |a, b| a * b,
        BinaryOp::Div => |a, b| a / b,
        BinaryOp::FloorDiv => |a, b| (a / b).floor(),
        BinaryOp::Pow => f64::powf,
        BinaryOp::Mod => floor_mod_f64,
        _ => return Err(op.unsupported(left, right)),
    };

    let (l, r) = match (left.to_float64(), right.to_float64()) {
        (Some(l), Some(r)) => (l, r),
        _ => return Err(op.unsupported(left, right)),
    };
    aligned_scan(&l, &r, |a, b| Ok(f(*a, *b))).map(Column::Float64)
}

fn floor_div_i64(a: i64, b: i64) -> Result<i64> {
    if b == 0 {
        return Err(TableError::DivisionByZero);
    }
    let q = a
        .checked_div(b)
        .ok_or(TableError::IntegerOverflow { op: "floordiv" })?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}

fn floor_mod_f64(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && ((r < 0.0) != (b < 0.0)) {
        r + b
    } else {
        r
    }
}

#[inline]
fn compare<T: PartialOrd + ?Sized>(op: BinaryOp, a: &T, b: &T) -> bool {
    match op {
        BinaryOp::Gt => a > b,
        BinaryOp::Ge => a >= b,
        BinaryOp::Lt => a < b,
        BinaryOp::Le => a <= b,
        BinaryOp::Eq => a == b,
        BinaryOp::Ne => a != b,
        _ => unreachable!("{op} is not a comparison"),
    }
}

fn compare_columns<T: PartialOrd>(
    op: BinaryOp,
    l: &SparseColumn<T>,
    r: &SparseColumn<T>,
) -> Result<Column> {
    aligned_scan(l, r, |a, b| Ok(compare(op, a, b))).map(Column::Bool)
}

fn to_i128(col: &Column) -> Option<SparseColumn<i128>> {
    match col {
        Column::Int64(c) => Some(c.map(|v| *v as i128)),
        Column::UInt64(c) => Some(c.map(|v| *v as i128)),
        Column::Bool(c) => Some(c.map(|v| *v as i128)),
        Column::Float64(_) | Column::Str(_) => None,
    }
}

fn comparison(left: &Column, op: BinaryOp, right: &Column) -> Result<Column> {
    match (left, right) {
        (Column::Int64(l), Column::Int64(r)) => compare_columns(op, l, r),
        (Column::UInt64(l), Column::UInt64(r)) => compare_columns(op, l, r),
        (Column::Float64(l), Column::Float64(r)) => compare_columns(op, l, r),
        (Column::Str(l), Column::Str(r)) => compare_columns(op, l, r),
        (Column::Bool(l), Column::Bool(r)) => compare_columns(op, l, r),
        (Column::Str(_), _) | (_, Column::Str(_)) => Err(op.unsupported(left, right)),
        _ if left.dtype().is_integer() && right.dtype().is_integer() => {
            match (to_i128(left), to_i128(right)) {
                (Some(l), Some(r)) => compare_columns(op, &l, &r),
                _ => Err(op.unsupported(left, right)),
            }
        }
        _ => match (left.to_float64(), right.to_float64()) {
            (Some(l), Some(r)) => compare_columns(op, &l, &r),
            _ => Err(op.unsupported(left, right)),
        },
    }
}

fn logical(left: &Column, op: BinaryOp, right: &Column) -> Result<Column> {
    let f: fn(bool, bool) -> bool = match op {
        BinaryOp::And => |a, b| a && b,
        BinaryOp::Or => |a, b| a || b,
        BinaryOp::Xor => |a, b| a != b,
        _ => return Err(op.unsupported(left, right)),
    };
    let l = left.to_truthy();
    let r = right.to_truthy();
    aligned_scan(&l, &r, |a, b| Ok(f(*a, *b))).map(Column::Bool)
}
