//! Validated formulas.
//!
//! A [`Formula`] can only be built from an expression that passes
//! [`check_syntax`]. Once built it is immutable: the normalized tokens, the
//! variable list and the canonical string never change, and evaluation has
//! no side effects.
//!
//! The canonical string puts one space on each side of every operator and
//! none anywhere else, writes variables in normalized form and numbers in
//! their shortest round-trip form. Equality and hashing use it.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use super::cell_name::is_variable;
use super::error::{FormulaError, FormulaFormatError};
use super::eval::evaluate;
use super::syntax::check_syntax;
use super::token::{Token, tokenize};

#[derive(Clone, Debug)]
pub struct Formula {
    tokens: Vec<Token>,
    variables: Vec<String>,
    canonical: String,
}

impl Formula {
    /// Build a formula with the identity normalizer and a validator that
    /// accepts any variable.
    pub fn new(expression: &str) -> Result<Formula, FormulaFormatError> {
        Formula::with_options(expression, |s| s.to_string(), is_variable)
    }

    /// Build a formula, normalizing every variable with `normalize` and
    /// rejecting any whose normalized form fails `is_valid`.
    pub fn with_options<N, V>(
        expression: &str,
        normalize: N,
        is_valid: V,
    ) -> Result<Formula, FormulaFormatError>
    where
        N: Fn(&str) -> String,
        V: Fn(&str) -> bool,
    {
        let checked = check_syntax(tokenize(expression), normalize, is_valid)?;
        let canonical = canonical_string(&checked.tokens);
        Ok(Formula {
            tokens: checked.tokens,
            variables: checked.variables,
            canonical,
        })
    }

    /// Evaluate against `lookup`, which receives normalized variable names.
    pub fn evaluate<L>(&self, lookup: L) -> Result<f64, FormulaError>
    where
        L: Fn(&str) -> Option<f64>,
    {
        evaluate(&self.tokens, lookup)
    }

    /// Normalized variable names in order of first occurrence.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }
}

fn canonical_string(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Operator(op) => {
                out.push(' ');
                out.push(op.symbol());
                out.push(' ');
            }
            other => out.push_str(&other.to_string()),
        }
    }
    out
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl FromStr for Formula {
    type Err = FormulaFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::new(s)
    }
}

impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for Formula {}

impl Hash for Formula {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

// Serialized as the canonical string.
impl Serialize for Formula {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical)
    }
}

impl<'de> Deserialize<'de> for Formula {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Formula::new(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_canonical_spacing() {
        let f = Formula::new("(2+3)*  5").unwrap();
        assert_eq!(f.to_string(), "(2 + 3) * 5");
    }

    #[test]
    fn test_numbers_are_canonicalized() {
        assert_eq!(Formula::new("2.0 + 1e3").unwrap().to_string(), "2 + 1000");
        assert_eq!(Formula::new("2.50").unwrap(), Formula::new("2.5").unwrap());
        assert_eq!(Formula::new(".5").unwrap(), Formula::new("0.5").unwrap());
    }

    #[test]
    fn test_equality_uses_normalized_variables() {
        let upper = |s: &str| s.to_uppercase();
        let a = Formula::with_options("x1 + y1", upper, |_| true).unwrap();
        let b = Formula::new("X1+Y1").unwrap();
        assert_eq!(a, b);
        assert_ne!(Formula::new("x1 + y1").unwrap(), b);
    }

    #[test]
    fn test_equal_formulas_hash_equal() {
        let mut set = HashSet::new();
        set.insert(Formula::new("1+2").unwrap());
        set.insert(Formula::new("1 + 2").unwrap());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_variables_deduplicated_in_order() {
        let f = Formula::with_options("x+y*z-X", |s| s.to_uppercase(), |_| true).unwrap();
        assert_eq!(f.variables(), ["X", "Y", "Z"]);
        assert!(Formula::new("1 + 2").unwrap().variables().is_empty());
    }

    #[test]
    fn test_evaluate_uses_normalized_names() {
        let f = Formula::with_options("x+7", |s| s.to_uppercase(), |_| true).unwrap();
        let lookup = |name: &str| match name {
            "x" => Some(2.0),
            "X" => Some(4.0),
            _ => None,
        };
        assert_eq!(f.evaluate(lookup), Ok(11.0));
        assert_eq!(Formula::new("x+7").unwrap().evaluate(lookup), Ok(9.0));
    }

    #[test]
    fn test_evaluate_repeatedly() {
        let f = Formula::new("10 / x").unwrap();
        assert_eq!(f.evaluate(|_| Some(4.0)), Ok(2.5));
        assert_eq!(f.evaluate(|_| Some(0.0)), Err(FormulaError::division_by_zero()));
        assert_eq!(f.evaluate(|_| Some(5.0)), Ok(2.0));
    }

    #[test]
    fn test_rejected_by_validator() {
        let err = Formula::with_options("a1 + b2", |s| s.to_string(), |s| s != "b2").unwrap_err();
        assert_eq!(
            err,
            FormulaFormatError::InvalidLastToken {
                token: "b2".to_string()
            }
        );
    }

    #[test]
    fn test_from_str_and_serde() {
        let f: Formula = "a + b".parse().unwrap();
        let json = serde_json::to_string(&f).unwrap();
        assert_eq!(json, "\"a + b\"");
        let back: Formula = serde_json::from_str(&json).unwrap();
        assert_eq!(back, f);
        assert!(serde_json::from_str::<Formula>("\"a +\"").is_err());
    }

    fn expression() -> impl Strategy<Value = String> {
        let leaf = prop_oneof![
            "[a-zA-Z_][a-zA-Z0-9_]{0,3}",
            (0u32..100000, 0u32..4).prop_map(|(n, scale)| {
                format!("{}", n as f64 / 10f64.powi(scale as i32))
            }),
        ];
        leaf.prop_recursive(4, 24, 2, |inner| {
            prop_oneof![
                (inner.clone(), "[-+*/]", inner.clone())
                    .prop_map(|(a, op, b)| format!("{a}{op}{b}")),
                inner.prop_map(|e| format!("( {e} )")),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_string_round_trip(expr in expression()) {
            let f = Formula::new(&expr).unwrap();
            let again = Formula::new(&f.to_string()).unwrap();
            prop_assert_eq!(&again, &f);
            prop_assert_eq!(again.to_string(), f.to_string());
        }

        #[test]
        fn prop_normalization_is_idempotent(name in "[a-zA-Z_][a-zA-Z0-9_]{0,6}") {
            let upper = |s: &str| s.to_uppercase();
            let once = Formula::with_options(&name, upper, |_| true).unwrap();
            let twice = Formula::with_options(&once.to_string(), upper, |_| true).unwrap();
            prop_assert_eq!(once, twice);
        }
    }
}
