extern crate wasm_bindgen;

use serde_json::json;
use wasm_bindgen::prelude::*;

pub mod grammar;
pub use grammar::{Analysis, Grammar, GrammarError, Rejection};

fn error_json(e: impl std::fmt::Display) -> String {
    json!({ "error": e.to_string() }).to_string()
}

fn with_analysis<F>(grammar: &str, f: F) -> String
where
    F: FnOnce(&Analysis) -> serde_json::Result<String>,
{
    match Grammar::parse(grammar) {
        Ok(g) => f(&Analysis::new(g)).unwrap_or_else(error_json),
        Err(e) => error_json(e),
    }
}

#[wasm_bindgen]
pub fn first_follow_to_json(grammar: &str) -> String {
    with_analysis(grammar, |a| {
        a.grammar
            .to_non_terminal_output_vec(&a.first, &a.follow)
            .to_json()
    })
}

#[wasm_bindgen]
pub fn ll1_table_to_json(grammar: &str) -> String {
    with_analysis(grammar, |a| a.ll1.to_output(&a.grammar).to_json())
}

#[wasm_bindgen]
pub fn lr0_fsm_to_json(grammar: &str) -> String {
    with_analysis(grammar, |a| a.fsm.to_output(&a.grammar).to_json())
}

#[wasm_bindgen]
pub fn slr1_table_to_json(grammar: &str) -> String {
    with_analysis(grammar, |a| {
        let report = a.slr1_report.to_output(&a.grammar);
        let table = a.slr1.to_output(&a.grammar);
        serde_json::to_string(&json!({ "report": report, "table": table }))
    })
}

/// Parses `input` with the LL(1) table when the grammar is LL(1), otherwise
/// with the SLR(1) table when it is SLR(1).
#[wasm_bindgen]
pub fn parse_to_json(grammar: &str, input: &str) -> String {
    with_analysis(grammar, |a| {
        let value = match a.preferred_parser() {
            Some(parser) => {
                let tokens = grammar::parse::split_input(input);
                match a.parse(parser, &tokens) {
                    Ok(()) => json!({ "parser": format!("{:?}", parser), "accepted": true }),
                    Err(rejection) => json!({
                        "parser": format!("{:?}", parser),
                        "accepted": false,
                        "reason": rejection.to_string(),
                    }),
                }
            }
            None => json!({ "error": "the grammar is neither LL(1) nor SLR(1)" }),
        };
        serde_json::to_string(&value)
    })
}


#[cfg(test)]
mod wasm_tests {
    use serde_json::Value;

    #[test]
    fn errors_are_reported_as_json() {
        let v: Value = serde_json::from_str(&crate::first_follow_to_json("S a -> b")).unwrap();
        assert_eq!(v["error"], "line 1: left side contains whitespace");
    }

    #[test]
    fn parse_picks_a_parser() {
        let ll1: Value =
            serde_json::from_str(&crate::parse_to_json("S -> a S | b", "aab")).unwrap();
        assert_eq!(ll1["parser"], "LL1");
        assert_eq!(ll1["accepted"], true);

        let slr1: Value =
            serde_json::from_str(&crate::parse_to_json("S -> S a | b", "ba")).unwrap();
        assert_eq!(slr1["parser"], "SLR1");
        assert_eq!(slr1["accepted"], true);

        let rejected: Value =
            serde_json::from_str(&crate::parse_to_json("S -> a S | b", "ba")).unwrap();
        assert_eq!(rejected["accepted"], false);
        assert_eq!(
            rejected["reason"],
            "input left over after the derivation finished: a $"
        );
    }

    #[test]
    fn slr1_table_json_has_report_and_table() {
        let v: Value = serde_json::from_str(&crate::slr1_table_to_json("E -> E + E | 1")).unwrap();
        assert_eq!(v["report"]["slr1"], false);
        assert_eq!(v["table"]["terminals"], serde_json::json!(["+", "1", "$"]));
    }
}
