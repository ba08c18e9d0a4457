#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Literals in their DIMACS form: a non-zero `i32` whose sign is the polarity
//! and whose absolute value is the variable.

/// A propositional variable, numbered from 1.
pub type Variable = u32;

/// A signed DIMACS literal. Zero is never a valid literal.
pub type Literal = i32;

/// The variable a literal refers to.
#[must_use]
pub const fn variable(literal: Literal) -> Variable {
    literal.unsigned_abs()
}

/// Whether the literal asserts its variable (positive sign).
#[must_use]
pub const fn is_positive(literal: Literal) -> bool {
    literal > 0
}

/// Whether the literal denies its variable (negative sign).
#[must_use]
pub const fn is_negated(literal: Literal) -> bool {
    literal < 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_strips_sign() {
        assert_eq!(variable(7), 7);
        assert_eq!(variable(-7), 7);
    }

    #[test]
    fn test_polarity() {
        assert!(is_positive(3));
        assert!(!is_negated(3));
        assert!(is_negated(-3));
        assert!(!is_positive(-3));
    }
}
