use std::collections::HashMap;

use super::{GrammarError, Rejection, END_MARK, EPSILON_MARKERS};

/// Index of the hidden augmented start symbol `S'`.
pub const AUGMENTED_START: usize = 0;
/// Index of the augmented rule `S' -> S`.
pub const AUGMENTED_RULE: usize = 0;

#[derive(Debug, Clone)]
pub struct NonTerminal {
    pub index: usize,
    pub name: String,
    /// Indices into the grammar's rules, in declaration order.
    pub productions: Vec<usize>,
}

impl NonTerminal {
    pub fn new(index: usize, name: String) -> Self {
        Self {
            index,
            name,
            productions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Symbol {
    NonTerminal(NonTerminal),
    Terminal(String),
}

impl Symbol {
    pub fn non_terminal(&self) -> Option<&NonTerminal> {
        match self {
            Symbol::NonTerminal(e) => Some(e),
            Symbol::Terminal(_) => None,
        }
    }

    fn mut_non_terminal(&mut self) -> Option<&mut NonTerminal> {
        match self {
            Symbol::NonTerminal(e) => Some(e),
            Symbol::Terminal(_) => None,
        }
    }
}

/// A production `head -> body`. An empty body is an epsilon production.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    pub head: usize,
    pub body: Vec<usize>,
}

impl Rule {
    pub fn is_epsilon(&self) -> bool {
        self.body.is_empty()
    }
}

/// An immutable context-free grammar.
///
/// Symbol 0 is the hidden augmented start symbol and rule 0 is `S' -> S`;
/// both only take part in the LR(0) construction and are skipped by
/// [`Grammar::non_terminal_iter`] and [`Grammar::rule_iter`].
#[derive(Debug, Clone)]
pub struct Grammar {
    symbols: Vec<Symbol>,
    symbol_table: HashMap<String, usize>,
    rules: Vec<Rule>,
    start_symbol: usize,
    end_mark: usize,
}

impl Grammar {
    /// Builds a grammar from `(head, derivation)` pairs. Derivation symbols
    /// are separated by whitespace; an empty derivation, or one made only of
    /// epsilon markers, is an epsilon production.
    ///
    /// The start symbol is `start`, or the head of the first pair.
    pub fn from_rules<'a, I>(rules: I, start: Option<&str>) -> Result<Self, GrammarError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self::from_numbered_rules(
            rules
                .into_iter()
                .enumerate()
                .map(|(i, (head, body))| (i + 1, head, body)),
            start,
        )
    }

    pub(super) fn from_numbered_rules<'a, I>(
        rules: I,
        start: Option<&str>,
    ) -> Result<Self, GrammarError>
    where
        I: IntoIterator<Item = (usize, &'a str, &'a str)>,
    {
        let mut raw_rules: Vec<(usize, &str, &str)> = Vec::new();
        for (line, head, body) in rules {
            let head = head.trim();
            if head.is_empty() {
                return Err(GrammarError::MalformedRule {
                    line,
                    reason: "empty left side".to_string(),
                });
            }
            if head.split_whitespace().count() != 1 {
                return Err(GrammarError::MalformedRule {
                    line,
                    reason: "left side contains whitespace".to_string(),
                });
            }
            if head == END_MARK || EPSILON_MARKERS.contains(&head) {
                return Err(GrammarError::MalformedRule {
                    line,
                    reason: format!("'{}' cannot be the left side of a rule", head),
                });
            }
            raw_rules.push((line, head, body));
        }

        if raw_rules.is_empty() {
            return Err(GrammarError::Empty);
        }

        let mut g = Self {
            symbols: Vec::new(),
            symbol_table: HashMap::new(),
            rules: Vec::new(),
            start_symbol: 0,
            end_mark: 0,
        };

        // placeholder for S', renamed once every head is known
        g.symbols
            .push(Symbol::NonTerminal(NonTerminal::new(AUGMENTED_START, String::new())));
        for (_, head, _) in &raw_rules {
            if g.get_symbol_index(head).is_none() {
                g.add_non_terminal(head);
            }
        }

        let start_name = start.unwrap_or(raw_rules[0].1);
        g.start_symbol = g
            .get_symbol_index(start_name)
            .ok_or_else(|| GrammarError::UnknownStartSymbol(start_name.to_string()))?;

        g.add_production(AUGMENTED_START, vec![g.start_symbol]);

        for (line, head, body) in raw_rules {
            let left = g.symbol_table[head];
            let mut right = Vec::new();
            for s in body.split_whitespace() {
                if EPSILON_MARKERS.contains(&s) {
                    continue;
                }
                if s == END_MARK {
                    return Err(GrammarError::MalformedRule {
                        line,
                        reason: format!("'{}' is reserved for the end of input", END_MARK),
                    });
                }
                let idx = match g.get_symbol_index(s) {
                    Some(idx) => idx,
                    None if starts_upper_case(s) => {
                        return Err(GrammarError::UndefinedSymbolReference {
                            symbol: s.to_string(),
                            head: head.to_string(),
                        })
                    }
                    None => g.add_terminal(s.to_string()),
                };
                right.push(idx);
            }
            g.add_production(left, right);
        }

        g.end_mark = g.add_terminal(END_MARK.to_string());

        // named last so that no terminal can share the name
        let augmented_name = g.get_symbol_prime_name(start_name.to_string());
        if let Some(nt) = g.symbols[AUGMENTED_START].mut_non_terminal() {
            nt.name = augmented_name;
        }

        Ok(g)
    }

    fn add_non_terminal(&mut self, name: &str) -> usize {
        let idx = self.symbols.len();
        self.symbols
            .push(Symbol::NonTerminal(NonTerminal::new(idx, name.to_string())));
        self.symbol_table.insert(name.to_string(), idx);
        idx
    }

    fn add_terminal(&mut self, name: String) -> usize {
        let idx = self.symbols.len();
        self.symbols.push(Symbol::Terminal(name.clone()));
        self.symbol_table.insert(name, idx);
        idx
    }

    fn add_production(&mut self, left: usize, right: Vec<usize>) {
        let rule_idx = self.rules.len();
        self.rules.push(Rule {
            head: left,
            body: right,
        });
        if let Some(nt) = self.symbols[left].mut_non_terminal() {
            nt.productions.push(rule_idx);
        }
    }

    fn get_symbol_prime_name(&self, mut name: String) -> String {
        while self.symbol_table.contains_key(&name) {
            name.push('\'');
        }
        name
    }

    /// Terminal indices in order of first appearance, `$` last.
    pub fn terminal_iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.symbols
            .iter()
            .enumerate()
            .filter(|(_, s)| matches!(s, Symbol::Terminal(_)))
            .map(|(i, _)| i)
    }

    /// Non-terminals in order of first appearance as a head, without `S'`.
    pub fn non_terminal_iter(&self) -> impl Iterator<Item = &NonTerminal> {
        self.symbols
            .iter()
            .skip(1)
            .filter_map(|s| s.non_terminal())
    }

    /// Rules in declaration order with their indices, without `S' -> S`.
    pub fn rule_iter(&self) -> impl Iterator<Item = (usize, &Rule)> {
        self.rules.iter().enumerate().skip(1)
    }

    pub fn rule(&self, index: usize) -> &Rule {
        &self.rules[index]
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn start_symbol(&self) -> usize {
        self.start_symbol
    }

    pub fn end_mark(&self) -> usize {
        self.end_mark
    }

    pub fn is_terminal(&self, index: usize) -> bool {
        matches!(self.symbols.get(index), Some(Symbol::Terminal(_)))
    }

    pub fn non_terminal(&self, index: usize) -> Option<&NonTerminal> {
        self.symbols.get(index).and_then(|s| s.non_terminal())
    }

    pub fn get_symbol_index(&self, name: &str) -> Option<usize> {
        self.symbol_table.get(name).cloned()
    }

    pub fn get_symbol_name(&self, index: usize) -> &str {
        match &self.symbols[index] {
            Symbol::NonTerminal(e) => e.name.as_str(),
            Symbol::Terminal(e) => e.as_str(),
        }
    }

    pub fn production_to_vec_str(&self, production: &[usize]) -> Vec<&str> {
        production
            .iter()
            .map(|idx| self.get_symbol_name(*idx))
            .collect()
    }

    /// Names of the given symbols, sorted.
    pub fn names_of<'a, I>(&self, symbols: I) -> Vec<&str>
    where
        I: IntoIterator<Item = &'a usize>,
    {
        let mut names: Vec<&str> = symbols
            .into_iter()
            .map(|idx| self.get_symbol_name(*idx))
            .collect();
        names.sort_unstable();
        names
    }

    /// Maps input tokens to terminal indices and makes sure the sequence
    /// ends with `$`.
    pub fn resolve_input(&self, input: &[&str]) -> Result<Vec<usize>, Rejection> {
        let mut tokens = input
            .iter()
            .map(|&t| match self.get_symbol_index(t) {
                Some(idx) if self.is_terminal(idx) => Ok(idx),
                _ => Err(Rejection::UnknownSymbol(t.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        if tokens.last() != Some(&self.end_mark) {
            tokens.push(self.end_mark);
        }
        Ok(tokens)
    }
}

fn starts_upper_case(s: &str) -> bool {
    s.chars().next().map_or(false, |c| c.is_uppercase())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn heads_are_non_terminals_and_first_head_is_start() {
        let g = Grammar::from_rules([("E", "T E'"), ("E'", "+ T E'"), ("E'", "e"), ("T", "1")], None)
            .unwrap();

        let names: Vec<&str> = g.non_terminal_iter().map(|nt| nt.name.as_str()).collect();
        assert_eq!(names, vec!["E", "E'", "T"]);

        let terminals: Vec<&str> = g.terminal_iter().map(|t| g.get_symbol_name(t)).collect();
        assert_eq!(terminals, vec!["+", "1", "$"]);

        assert_eq!(g.get_symbol_name(g.start_symbol()), "E");
        assert!(g.rule(3).is_epsilon());
        assert_eq!(g.rule_iter().count(), 4);
    }

    #[test]
    fn augmented_start_gets_a_fresh_name() {
        let g = Grammar::from_rules([("S", "S'"), ("S'", "a")], None).unwrap();
        assert_eq!(g.get_symbol_name(AUGMENTED_START), "S''");
        let augmented = g.rule(AUGMENTED_RULE);
        assert_eq!(augmented.head, AUGMENTED_START);
        assert_eq!(augmented.body, vec![g.start_symbol()]);
    }

    #[test]
    fn designated_start_symbol() {
        let g = Grammar::from_rules([("A", "a"), ("B", "A b")], Some("B")).unwrap();
        assert_eq!(g.get_symbol_name(g.start_symbol()), "B");

        let err = Grammar::from_rules([("A", "a")], Some("Z")).unwrap_err();
        assert_eq!(err, GrammarError::UnknownStartSymbol("Z".to_string()));
    }

    #[test]
    fn upper_case_symbol_without_rules_is_rejected() {
        let err = Grammar::from_rules([("S", "A b")], None).unwrap_err();
        assert_eq!(
            err,
            GrammarError::UndefinedSymbolReference {
                symbol: "A".to_string(),
                head: "S".to_string(),
            }
        );
    }

    #[test]
    fn malformed_heads() {
        assert!(matches!(
            Grammar::from_rules([("S", "a"), ("", "b")], None),
            Err(GrammarError::MalformedRule { line: 2, .. })
        ));
        assert!(matches!(
            Grammar::from_rules([("e", "a")], None),
            Err(GrammarError::MalformedRule { line: 1, .. })
        ));
        assert_eq!(
            Grammar::from_rules(std::iter::empty(), None).unwrap_err(),
            GrammarError::Empty
        );
    }

    #[test]
    fn end_mark_is_reserved() {
        assert_eq!(
            Grammar::from_rules([("S", "a"), ("S", "a $")], None).unwrap_err(),
            GrammarError::MalformedRule {
                line: 2,
                reason: "'$' is reserved for the end of input".to_string(),
            }
        );
    }

    #[test]
    fn augmented_name_avoids_terminals() {
        let g = Grammar::from_rules([("s", "s' x")], None).unwrap();
        assert!(g.is_terminal(g.get_symbol_index("s'").unwrap()));
        assert_eq!(g.get_symbol_name(AUGMENTED_START), "s''");
    }

    #[test]
    fn resolve_input_appends_end_mark() {
        let g = Grammar::from_rules([("S", "a S"), ("S", "b")], None).unwrap();
        let a = g.get_symbol_index("a").unwrap();
        let b = g.get_symbol_index("b").unwrap();
        let end = g.end_mark();

        assert_eq!(g.resolve_input(&["a", "b"]), Ok(vec![a, b, end]));
        assert_eq!(g.resolve_input(&["a", "b", "$"]), Ok(vec![a, b, end]));
        assert_eq!(
            g.resolve_input(&["a", "S"]),
            Err(Rejection::UnknownSymbol("S".to_string()))
        );
    }
}
