use log::info;

use crate::Grammar;

use super::{
    first_follow::{FirstSets, FollowSets},
    ll1_table::LL1Table,
    lr_dfa::LRFSM,
    slr1::{LRParsingTable, ReduceReducePolicy, SLR1Report},
    Rejection,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserKind {
    LL1,
    SLR1,
}

/// Every table of a grammar, computed once.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub grammar: Grammar,
    pub first: FirstSets,
    pub follow: FollowSets,
    pub ll1: LL1Table,
    pub fsm: LRFSM,
    pub slr1_report: SLR1Report,
    pub slr1: LRParsingTable,
}

impl Analysis {
    pub fn new(grammar: Grammar) -> Self {
        Self::with_policy(grammar, ReduceReducePolicy::default())
    }

    pub fn with_policy(grammar: Grammar, policy: ReduceReducePolicy) -> Self {
        let first = grammar.first_sets();
        let follow = grammar.follow_sets(&first);
        let ll1 = grammar.build_ll1_table(&first, &follow);
        let fsm = grammar.to_lr0_fsm();
        let slr1_report = grammar.check_slr1(&fsm, &follow, policy);
        let slr1 = grammar.to_slr1_table(&fsm, &follow);
        info!(
            "grammar is {}LL(1) and {}SLR(1)",
            if ll1.has_conflict() { "not " } else { "" },
            if slr1_report.is_slr1() { "" } else { "not " }
        );

        Self {
            grammar,
            first,
            follow,
            ll1,
            fsm,
            slr1_report,
            slr1,
        }
    }

    pub fn is_ll1(&self) -> bool {
        !self.ll1.has_conflict()
    }

    pub fn is_slr1(&self) -> bool {
        self.slr1_report.is_slr1()
    }

    /// LL(1) when its table is conflict free, SLR(1) otherwise if that one
    /// is, `None` if the grammar is neither.
    pub fn preferred_parser(&self) -> Option<ParserKind> {
        if self.is_ll1() {
            Some(ParserKind::LL1)
        } else if self.is_slr1() {
            Some(ParserKind::SLR1)
        } else {
            None
        }
    }

    pub fn parse(&self, parser: ParserKind, input: &[&str]) -> Result<(), Rejection> {
        match parser {
            ParserKind::LL1 => self.ll1.trace(&self.grammar, input).result,
            ParserKind::SLR1 => self.slr1.trace(&self.grammar, input).result,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::grammar::parse::split_input;

    fn analyze(text: &str) -> Analysis {
        Analysis::new(Grammar::parse(text).unwrap())
    }

    #[test]
    fn preferred_parser() {
        let both = analyze("E -> T E'\nE' -> + T E' | e\nT -> ( E ) | 1");
        assert_eq!(both.preferred_parser(), Some(ParserKind::LL1));
        assert!(both.is_slr1());

        let slr_only = analyze("S -> S + T | T\nT -> F\nF -> ( S ) | 1");
        assert_eq!(slr_only.preferred_parser(), Some(ParserKind::SLR1));

        let neither = analyze("E -> E + E | 1");
        assert_eq!(neither.preferred_parser(), None);
    }

    #[test]
    fn both_parsers_agree() {
        let a = analyze("E -> T E'\nE' -> + T E' | e\nT -> ( E ) | 1");
        for (input, accepted) in [
            ("1+1", true),
            ("(1)", true),
            ("(1+(1))+1", true),
            ("1+", false),
            ("()", false),
            ("1 1", false),
        ] {
            let tokens = split_input(input);
            assert_eq!(a.parse(ParserKind::LL1, &tokens).is_ok(), accepted, "{}", input);
            assert_eq!(a.parse(ParserKind::SLR1, &tokens).is_ok(), accepted, "{}", input);
        }
    }
}
