use std::collections::BTreeSet;

use pretty_assertions::assert_eq;

use ll_slr_helper::grammar::{
    analysis::ParserKind,
    grammar::AUGMENTED_RULE,
    lr_dfa::{DotProduction, ItemSet},
    parse::split_input,
    slr1::SLR1Conflict,
};
use ll_slr_helper::{Analysis, Grammar, GrammarError, Rejection};

const LL1_EXPR: &str = "E -> T E'\nE' -> + T E' | e\nT -> ( E ) | 1";
const LEFT_RECURSIVE: &str = "S -> S + T | T\nT -> F\nF -> ( S ) | 1";

fn analyze(text: &str) -> Analysis {
    Analysis::new(Grammar::parse(text).unwrap())
}

fn index(g: &Grammar, name: &str) -> usize {
    g.get_symbol_index(name).unwrap()
}

#[test]
fn first_and_follow_are_idempotent() {
    let g = Grammar::parse(LL1_EXPR).unwrap();
    let first = g.first_sets();
    let follow = g.follow_sets(&first);
    assert_eq!(g.first_sets(), first);
    assert_eq!(g.follow_sets(&first), follow);
}

#[test]
fn nullable_prefix_propagates_first() {
    let a = analyze("S -> A B c\nA -> a | e\nB -> b | e");
    let g = &a.grammar;

    let s = a.first.get(index(g, "S")).unwrap();
    assert_eq!(g.names_of(&s.terminals), vec!["a", "b", "c"]);
    assert!(!s.contains_epsilon());
    assert!(a.first.get(index(g, "A")).unwrap().contains_epsilon());
}

#[test]
fn follow_of_start_holds_end_mark() {
    let a = analyze(LL1_EXPR);
    let g = &a.grammar;
    assert!(a
        .follow
        .get(g.start_symbol())
        .unwrap()
        .contains(&g.end_mark()));
    assert_eq!(g.names_of(a.follow.get(index(g, "E'")).unwrap()), vec!["$", ")"]);
}

#[test]
fn left_recursion_breaks_ll1() {
    let a = analyze(LEFT_RECURSIVE);
    let g = &a.grammar;
    assert!(!a.is_ll1());

    let cells: BTreeSet<(&str, &str)> = a
        .ll1
        .conflicts()
        .iter()
        .map(|c| (g.get_symbol_name(c.non_terminal), g.get_symbol_name(c.terminal)))
        .collect();
    assert_eq!(cells, [("S", "("), ("S", "1")].into_iter().collect());
}

#[test]
fn ll1_driver_accepts_sentences() {
    let a = analyze(LL1_EXPR);
    assert!(a.is_ll1());
    assert!(a.ll1.accepts(&a.grammar, &split_input("1+1")));
    assert!(a.ll1.accepts(&a.grammar, &split_input("( 1 + 1 ) + 1 $")));
    assert!(!a.ll1.accepts(&a.grammar, &split_input("1+")));
    assert!(!a.ll1.accepts(&a.grammar, &split_input("x")));
}

#[test]
fn closure_of_augmented_item() {
    let g = Grammar::parse("S -> ( S ) | 1").unwrap();
    let kernel: ItemSet = std::iter::once(DotProduction::new(AUGMENTED_RULE)).collect();
    let closure = kernel.closure(&g);

    assert_eq!(closure.len(), 3);
    assert!(closure.iter().all(|item| item.position == 0));
}

#[test]
fn every_transition_has_an_edge() {
    let g = Grammar::parse(LEFT_RECURSIVE).unwrap();
    let fsm = g.to_lr0_fsm();
    for state in &fsm.states {
        let symbols = state.items.transition_symbols(&g);
        let edges: BTreeSet<usize> = state.edges.keys().cloned().collect();
        assert_eq!(edges, symbols);
        for (&symbol, &target) in &state.edges {
            assert_eq!(fsm.states[target].items, state.items.goto(&g, symbol));
        }
    }
}

#[test]
fn canonical_collection_is_deterministic() {
    let a = Grammar::parse(LEFT_RECURSIVE).unwrap().to_lr0_fsm();
    let b = Grammar::parse(LEFT_RECURSIVE).unwrap().to_lr0_fsm();
    assert_eq!(a.states, b.states);
}

#[test]
fn left_recursive_grammar_is_slr1() {
    let a = analyze(LEFT_RECURSIVE);
    assert!(a.is_slr1());
    assert!(a.slr1.accepts(&a.grammar, &split_input("(1+1)+1")));
}

#[test]
fn ambiguous_grammars_are_not_slr1() {
    let a = analyze("E -> E + E | 1");
    assert!(!a.is_slr1());

    let a = analyze("S -> if S | if S else S | a");
    let r#else = index(&a.grammar, "else");
    assert!(!a.is_slr1());
    assert!(a.slr1_report.conflicts.iter().all(|c| matches!(
        c,
        SLR1Conflict::ShiftReduce { terminal, .. } if *terminal == r#else
    )));
}

#[test]
fn undefined_non_terminal_is_an_error() {
    assert!(matches!(
        Grammar::parse("S -> A b"),
        Err(GrammarError::UndefinedSymbolReference { .. })
    ));
}

#[test]
fn forced_parsers_stop_on_conflicting_tables() {
    let a = analyze("S -> e | S a");
    assert!(!a.is_ll1());
    assert!(matches!(
        a.parse(ParserKind::LL1, &split_input("aa")),
        Err(Rejection::ExpansionCycle { .. })
    ));

    let a = analyze("S -> x A\nC -> B\nA -> B\nB -> C | b");
    assert!(!a.is_slr1());
    assert!(matches!(
        a.parse(ParserKind::SLR1, &split_input("xb")),
        Err(Rejection::ReductionCycle { .. })
    ));
}
