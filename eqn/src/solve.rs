//! Algebraic rearrangement and expression evaluation.

use crate::ast::{BinOp, Equation, Expr};
use crate::error::SolveError;
use std::collections::HashMap;
use tether_core::{EvalError, EvalResult};

/// Rearrange `equation` to isolate `target`, returning the expression that
/// computes it from the remaining names.
///
/// The target must occur exactly once across both sides; inversion then
/// walks the unique path from the root of the side containing it, undoing
/// one operation per step. Within the supported grammar (the four arithmetic
/// operators, unary negation, parentheses, numeric literals) this is total
/// and single-valued.
pub fn solve_for(equation: &Equation, target: &str) -> Result<Expr, SolveError> {
    let count = equation.lhs.occurrences(target) + equation.rhs.occurrences(target);
    if count == 0 {
        return Err(SolveError::MissingName(target.to_string()));
    }
    if count > 1 {
        return Err(SolveError::DuplicateName(target.to_string()));
    }

    let (mut with, mut other) = if equation.lhs.mentions(target) {
        (equation.lhs.clone(), equation.rhs.clone())
    } else {
        (equation.rhs.clone(), equation.lhs.clone())
    };

    loop {
        match with {
            Expr::Var(_) => return Ok(other),
            Expr::Neg(inner) => {
                other = Expr::neg(other);
                with = *inner;
            }
            Expr::Bin(op, lhs, rhs) => {
                let in_lhs = lhs.mentions(target);
                match (op, in_lhs) {
                    // x + b = o  =>  x = o - b ; a + x = o  =>  x = o - a
                    (BinOp::Add, true) => {
                        other = Expr::bin(BinOp::Sub, other, *rhs);
                        with = *lhs;
                    }
                    (BinOp::Add, false) => {
                        other = Expr::bin(BinOp::Sub, other, *lhs);
                        with = *rhs;
                    }
                    // x - b = o  =>  x = o + b ; a - x = o  =>  x = a - o
                    (BinOp::Sub, true) => {
                        other = Expr::bin(BinOp::Add, other, *rhs);
                        with = *lhs;
                    }
                    (BinOp::Sub, false) => {
                        other = Expr::bin(BinOp::Sub, *lhs, other);
                        with = *rhs;
                    }
                    // x * b = o  =>  x = o / b ; a * x = o  =>  x = o / a
                    (BinOp::Mul, true) => {
                        other = Expr::bin(BinOp::Div, other, *rhs);
                        with = *lhs;
                    }
                    (BinOp::Mul, false) => {
                        other = Expr::bin(BinOp::Div, other, *lhs);
                        with = *rhs;
                    }
                    // x / b = o  =>  x = o * b ; a / x = o  =>  x = a / o
                    (BinOp::Div, true) => {
                        other = Expr::bin(BinOp::Mul, other, *rhs);
                        with = *lhs;
                    }
                    (BinOp::Div, false) => {
                        other = Expr::bin(BinOp::Div, *lhs, other);
                        with = *rhs;
                    }
                }
            }
            // The descent always follows the target, so a literal cannot be
            // reached; report rather than panic.
            Expr::Num(_) => return Err(SolveError::MissingName(target.to_string())),
        }
    }
}

/// Evaluate an expression against a name-to-number environment.
pub fn eval(expr: &Expr, env: &HashMap<String, f64>) -> EvalResult<f64> {
    match expr {
        Expr::Num(n) => Ok(*n),
        Expr::Var(name) => env
            .get(name)
            .copied()
            .ok_or_else(|| EvalError::UnboundName(name.clone())),
        Expr::Neg(inner) => Ok(-eval(inner, env)?),
        Expr::Bin(op, lhs, rhs) => {
            let l = eval(lhs, env)?;
            let r = eval(rhs, env)?;
            Ok(match op {
                BinOp::Add => l + r,
                BinOp::Sub => l - r,
                BinOp::Mul => l * r,
                BinOp::Div => l / r,
            })
        }
    }
}
