use std::fmt;

use crate::types::{
    tuple::Tuple,
    value::{ComparisonOp, Field},
};

/// Compares one field of a tuple against a constant operand.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: usize,
    pub op: ComparisonOp,
    pub operand: Field,
}

impl Predicate {
    pub fn new(field: usize, op: ComparisonOp, operand: Field) -> Self {
        Self { field, op, operand }
    }

    pub fn eq(field: usize, operand: Field) -> Self {
        Self::new(field, ComparisonOp::Equal, operand)
    }

    pub fn ne(field: usize, operand: Field) -> Self {
        Self::new(field, ComparisonOp::NotEqual, operand)
    }

    pub fn lt(field: usize, operand: Field) -> Self {
        Self::new(field, ComparisonOp::LessThan, operand)
    }

    pub fn le(field: usize, operand: Field) -> Self {
        Self::new(field, ComparisonOp::LessThanOrEqual, operand)
    }

    pub fn gt(field: usize, operand: Field) -> Self {
        Self::new(field, ComparisonOp::GreaterThan, operand)
    }

    pub fn ge(field: usize, operand: Field) -> Self {
        Self::new(field, ComparisonOp::GreaterThanOrEqual, operand)
    }

    /// False when the tuple has no field at the predicate's index.
    pub fn filter(&self, tuple: &Tuple) -> bool {
        tuple
            .get_field(self.field)
            .is_some_and(|field| field.compare(self.op, &self.operand))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f={}\top={}\toperand={}", self.field, self.op, self.operand)
    }
}
