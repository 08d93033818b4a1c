//! Two-stack expression evaluation.
//!
//! Values and operators are kept on separate stacks. `*` and `/` are reduced
//! as soon as their right operand is pushed; `+` and `-` wait until the next
//! low-level operator, a closing parenthesis, or the end of input. Every
//! reduction returns a `Result` so division by zero and failed lookups reach
//! the caller as a [`FormulaError`] value.
//!
//! Input is expected to have passed [`check_syntax`](super::check_syntax).
//! Anything structurally wrong that slips through yields a
//! "malformed expression" error rather than a panic.

use super::error::FormulaError;
use super::token::{Operator, Token};

/// Entries of the operator stack.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Pending {
    Group,
    Arithmetic(Operator),
}

#[derive(Default)]
struct Machine {
    values: Vec<f64>,
    operators: Vec<Pending>,
}

impl Machine {
    fn top_is(&self, high_level: bool) -> bool {
        matches!(
            self.operators.last(),
            Some(Pending::Arithmetic(op)) if op.is_high_level() == high_level
        )
    }

    fn top_is_arithmetic(&self) -> bool {
        matches!(self.operators.last(), Some(Pending::Arithmetic(_)))
    }

    fn push_value(&mut self, value: f64) -> Result<(), FormulaError> {
        self.values.push(value);
        if self.top_is(true) {
            self.reduce()?;
        }
        Ok(())
    }

    fn push_operator(&mut self, op: Operator) -> Result<(), FormulaError> {
        if !op.is_high_level() && self.top_is(false) {
            self.reduce()?;
        }
        self.operators.push(Pending::Arithmetic(op));
        Ok(())
    }

    fn close_group(&mut self) -> Result<(), FormulaError> {
        if self.top_is_arithmetic() {
            self.reduce()?;
        }
        if self.operators.pop() != Some(Pending::Group) {
            return Err(FormulaError::malformed());
        }
        if self.top_is(true) {
            self.reduce()?;
        }
        Ok(())
    }

    /// Pop the top operator and two values, push the result.
    fn reduce(&mut self) -> Result<(), FormulaError> {
        let Some(Pending::Arithmetic(op)) = self.operators.pop() else {
            return Err(FormulaError::malformed());
        };
        let (Some(right), Some(left)) = (self.values.pop(), self.values.pop()) else {
            return Err(FormulaError::malformed());
        };
        self.values.push(apply(op, left, right)?);
        Ok(())
    }

    fn finish(mut self) -> Result<f64, FormulaError> {
        if self.operators.len() == 1 && self.top_is(false) {
            self.reduce()?;
        }
        match (self.operators.is_empty(), self.values.as_slice()) {
            (true, [value]) => Ok(*value),
            _ => Err(FormulaError::malformed()),
        }
    }
}

fn apply(op: Operator, left: f64, right: f64) -> Result<f64, FormulaError> {
    match op {
        Operator::Add => Ok(left + right),
        Operator::Subtract => Ok(left - right),
        Operator::Multiply => Ok(left * right),
        Operator::Divide if right == 0.0 => Err(FormulaError::division_by_zero()),
        Operator::Divide => Ok(left / right),
    }
}

/// Evaluate a token sequence, resolving variables through `lookup`.
///
/// `lookup` returns `None` for variables that have no numeric value; that
/// becomes an "undefined variable" [`FormulaError`].
pub fn evaluate<'a, I, L>(tokens: I, lookup: L) -> Result<f64, FormulaError>
where
    I: IntoIterator<Item = &'a Token>,
    L: Fn(&str) -> Option<f64>,
{
    let mut machine = Machine::default();

    for token in tokens {
        match token {
            Token::Number(n) => machine.push_value(*n)?,
            Token::Variable(name) => {
                let value = lookup(name).ok_or_else(|| FormulaError::undefined_variable(name))?;
                machine.push_value(value)?;
            }
            Token::Operator(op) => machine.push_operator(*op)?,
            Token::OpenParen => machine.operators.push(Pending::Group),
            Token::CloseParen => machine.close_group()?,
            Token::Unrecognized(_) => return Err(FormulaError::malformed()),
        }
    }

    machine.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tokenize;

    fn eval(expression: &str) -> Result<f64, FormulaError> {
        let tokens: Vec<Token> = tokenize(expression).collect();
        evaluate(&tokens, |_| None)
    }

    fn eval_with(expression: &str, lookup: impl Fn(&str) -> Option<f64>) -> Result<f64, FormulaError> {
        let tokens: Vec<Token> = tokenize(expression).collect();
        evaluate(&tokens, lookup)
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("2+6*3"), Ok(20.0));
        assert_eq!(eval("2*6+3"), Ok(15.0));
        assert_eq!(eval("2 + 3 * 4 - 1"), Ok(13.0));
    }

    #[test]
    fn test_grouping() {
        assert_eq!(eval("(2 + 3) * 5 + 2"), Ok(27.0));
        assert_eq!(eval("2*(3+4)"), Ok(14.0));
        assert_eq!(eval("((((5))))"), Ok(5.0));
        assert_eq!(eval("(1 + 2) * (3 + 4) / 7"), Ok(3.0));
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(eval("10 - 4 - 3"), Ok(3.0));
        assert_eq!(eval("64 / 4 / 2"), Ok(8.0));
        assert_eq!(eval("(10 - 4 - 3)"), Ok(3.0));
        assert_eq!(eval("8 / 2 * 4"), Ok(16.0));
    }

    #[test]
    fn test_operand_order_for_non_commutative_ops() {
        assert_eq!(eval("1 - 5"), Ok(-4.0));
        assert_eq!(eval("1 / 4"), Ok(0.25));
        assert_eq!(eval("2 * 3 - 10"), Ok(-4.0));
    }

    #[test]
    fn test_division_by_zero_is_a_value() {
        assert_eq!(eval("5/0"), Err(FormulaError::division_by_zero()));
        assert_eq!(eval("5/(2-2)"), Err(FormulaError::division_by_zero()));
        assert_eq!(eval("0/5"), Ok(0.0));
    }

    #[test]
    fn test_variable_lookup() {
        let lookup = |name: &str| Some(name.len() as f64);
        assert_eq!(eval_with("AA10 + aB5 + Cd3", lookup), Ok(10.0));
        assert_eq!(eval_with("x * 7", |_| Some(2.0)), Ok(14.0));
    }

    #[test]
    fn test_undefined_variable() {
        assert_eq!(
            eval("x + 1"),
            Err(FormulaError::undefined_variable("x"))
        );
    }

    #[test]
    fn test_error_short_circuits() {
        let calls = std::cell::Cell::new(0);
        let lookup = |_: &str| {
            calls.set(calls.get() + 1);
            None
        };
        assert!(eval_with("a + b + c", lookup).is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_malformed_input_does_not_panic() {
        assert_eq!(eval("+"), Err(FormulaError::malformed()));
        assert_eq!(eval("1 2"), Err(FormulaError::malformed()));
        assert_eq!(eval(")"), Err(FormulaError::malformed()));
        assert_eq!(eval(""), Err(FormulaError::malformed()));
    }
}
