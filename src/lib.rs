extern crate wasm_bindgen;

use wasm_bindgen::prelude::*;

pub mod grammar;
pub use grammar::{FirstSets, FollowSets, Grammar, GrammarError, LL1ParsingTable};

fn error_to_json(e: impl std::fmt::Display) -> String {
    serde_json::json!({ "error": e.to_string() }).to_string()
}

fn to_json_or_error(json: serde_json::Result<String>) -> String {
    json.unwrap_or_else(error_to_json)
}

#[wasm_bindgen]
pub fn eliminate_left_recursion_to_json(grammar: &str) -> String {
    match crate::Grammar::parse(grammar) {
        Ok(g) => to_json_or_error(
            g.eliminate_left_recursion()
                .to_production_output_vec()
                .to_json(),
        ),
        Err(e) => error_to_json(e),
    }
}

#[wasm_bindgen]
pub fn left_factoring_to_json(grammar: &str) -> String {
    match crate::Grammar::parse(grammar) {
        Ok(g) => to_json_or_error(g.left_factoring().to_production_output_vec().to_json()),
        Err(e) => error_to_json(e),
    }
}

#[wasm_bindgen]
pub fn first_follow_to_json(grammar: &str) -> String {
    crate::Grammar::parse(grammar)
        .and_then(|g| {
            let first = g.calculate_first();
            let follow = g.calculate_follow(&first)?;
            Ok(to_json_or_error(
                g.to_non_terminal_output_vec(&first, &follow).to_json(),
            ))
        })
        .unwrap_or_else(error_to_json)
}

#[wasm_bindgen]
pub fn ll1_parsing_table_to_json(grammar: &str) -> String {
    crate::Grammar::parse(grammar)
        .and_then(|g| {
            let first = g.calculate_first();
            let follow = g.calculate_follow(&first)?;
            let table = g.generate_ll1_parsing_table(&first, &follow)?;
            Ok(to_json_or_error(table.to_json()))
        })
        .unwrap_or_else(error_to_json)
}


#[cfg(test)]
mod json_tests {
    #[test]
    fn left_recursion_json() {
        assert_eq!(
            crate::eliminate_left_recursion_to_json("A -> A a | b"),
            r#"{"productions":[{"left":"A","rights":[["b","A'"]]},{"left":"A'","rights":[["a","A'"],["ε"]]}]}"#
        );
    }

    #[test]
    fn left_factoring_json() {
        assert_eq!(
            crate::left_factoring_to_json("A -> a b | a c"),
            r#"{"productions":[{"left":"A","rights":[["a","A_LF1"]]},{"left":"A_LF1","rights":[["b"],["c"]]}]}"#
        );
    }

    #[test]
    fn ll1_table_json() {
        assert_eq!(
            crate::ll1_parsing_table_to_json("S -> a"),
            r#"{"terminals":["a","$"],"rows":[{"non_terminal":"S","cells":[["a"],null]}],"conflicts":[]}"#
        );
    }

    #[test]
    fn parse_error_json() {
        assert_eq!(
            crate::first_follow_to_json("S a"),
            r#"{"error":"Line 1: missing \"->\""}"#
        );
    }
}
