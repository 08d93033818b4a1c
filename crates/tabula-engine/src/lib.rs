//! tabula_engine - Formula tokenizer, evaluator and dependency graph.

pub mod engine;

#[cfg(test)]
mod tests {
    use crate::engine::*;

    fn tokens_of(expression: &str) -> Vec<String> {
        tokenize(expression).map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_tokenize_then_evaluate() {
        let expression = "(2 + 3) * 5 + 2";
        assert_eq!(
            tokens_of(expression),
            vec!["(", "2", "+", "3", ")", "*", "5", "+", "2"]
        );
        let formula = Formula::new(expression).unwrap();
        assert_eq!(formula.evaluate(|_| None), Ok(27.0));
    }

    #[test]
    fn test_lookup_by_name_length() {
        let formula = Formula::new("AA10 + aB5 + Cd3").unwrap();
        assert_eq!(formula.variables(), ["AA10", "aB5", "Cd3"]);
        assert_eq!(formula.evaluate(|name| Some(name.len() as f64)), Ok(10.0));
    }

    #[test]
    fn test_division_by_zero_through_formula() {
        let formula = Formula::new("5/0").unwrap();
        let err = formula.evaluate(|_| None).unwrap_err();
        assert_eq!(err.reason, "division by zero");
        assert_eq!(err.to_string(), "#ERR: division by zero");
    }

    #[test]
    fn test_formula_variables_feed_graph() {
        let mut graph = DependencyGraph::new();
        let formula = Formula::new("A1 * (B2 + A1)").unwrap();
        graph.replace_dependees("C3", formula.variables());
        assert_eq!(graph.size(), 2);
        assert!(graph.dependents("A1").contains("C3"));
        assert!(graph.dependents("B2").contains("C3"));
    }

    #[test]
    fn test_cell_names_are_variables() {
        for name in ["A1", "zz10", "Ab123"] {
            assert!(is_cell_name(name));
            assert!(is_variable(name));
        }
        assert!(is_variable("_x"));
        assert!(!is_cell_name("_x"));
    }
}
