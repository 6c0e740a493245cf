//! Linear pseudo-Boolean constraints and the gate linearizations the generators are
//! built from.
//!
//! A constraint has the shape `sum(c_i * l_i) OP k` with integer coefficients, where
//! a literal evaluates to 1 when satisfied and 0 otherwise.

use crate::encoding::variables::Lit;
use std::fmt::{Display, Error, Formatter};

/// The comparison operator of a [Constraint].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RelOp {
    Eq,
    Le,
    Ge,
}

/// A linear pseudo-Boolean constraint.
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    terms: Vec<(i64, Lit)>,
    op: RelOp,
    rhs: i64,
}

impl Constraint {
    pub fn new(op: RelOp, rhs: i64) -> Constraint {
        Constraint {
            terms: Vec::new(),
            op,
            rhs,
        }
    }

    pub fn add(&mut self, coefficient: i64, literal: Lit) {
        self.terms.push((coefficient, literal));
    }

    pub fn terms(&self) -> &[(i64, Lit)] {
        &self.terms
    }

    pub fn op(&self) -> RelOp {
        self.op
    }

    pub fn rhs(&self) -> i64 {
        self.rhs
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        for (i, (coefficient, literal)) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{} {}", coefficient, literal)?;
        }
        let op = match self.op {
            RelOp::Eq => "=",
            RelOp::Le => "<=",
            RelOp::Ge => ">=",
        };
        write!(f, " {} {}", op, self.rhs)
    }
}

/// Pin a literal to a constant value.
pub fn fixed(literal: Lit, value: bool) -> Constraint {
    let mut constraint = Constraint::new(RelOp::Eq, if value { 1 } else { 0 });
    constraint.add(1, literal);
    constraint
}

/// `premise => conclusion`, i.e. `conclusion - premise >= 0`.
pub fn implication(premise: Lit, conclusion: Lit) -> Constraint {
    let mut constraint = Constraint::new(RelOp::Ge, 0);
    constraint.add(1, conclusion);
    constraint.add(-1, premise);
    constraint
}

/// At most one of the two literals holds.
pub fn pair_at_most_one(a: Lit, b: Lit) -> Constraint {
    let mut constraint = Constraint::new(RelOp::Le, 1);
    constraint.add(1, a);
    constraint.add(1, b);
    constraint
}

/// `result <=> AND(conditions)`, linearized as:
/// - `condition - result >= 0` for every condition (result forces each condition),
/// - `sum(conditions) - result <= n - 1` (all conditions force the result).
///
/// An empty conjunction is true, so the result is pinned to 1.
pub fn and_gate(result: Lit, conditions: &[Lit]) -> Vec<Constraint> {
    if conditions.is_empty() {
        return vec![fixed(result, true)];
    }
    let mut constraints = Vec::with_capacity(conditions.len() + 1);
    for condition in conditions {
        constraints.push(implication(result, *condition));
    }
    let mut upper = Constraint::new(RelOp::Le, conditions.len() as i64 - 1);
    for condition in conditions {
        upper.add(1, *condition);
    }
    upper.add(-1, result);
    constraints.push(upper);
    constraints
}

/// `result <=> OR(operands)`, linearized as:
/// - `result - operand >= 0` for every operand (any operand forces the result),
/// - `sum(operands) - result >= 0` (the result forces at least one operand).
///
/// An empty disjunction is false, so the result is pinned to 0.
pub fn or_gate(result: Lit, operands: &[Lit]) -> Vec<Constraint> {
    if operands.is_empty() {
        return vec![fixed(result, false)];
    }
    let mut constraints = Vec::with_capacity(operands.len() + 1);
    for operand in operands {
        constraints.push(implication(*operand, result));
    }
    let mut lower = Constraint::new(RelOp::Ge, 0);
    for operand in operands {
        lower.add(1, *operand);
    }
    lower.add(-1, result);
    constraints.push(lower);
    constraints
}
