use std::collections::HashMap;

use log::warn;

use crate::Grammar;

use super::first_follow::{FirstSets, FollowSets};

/// Two different rules competing for the same LL(1) cell. The table keeps
/// `chosen`, the later one in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LL1Conflict {
    pub non_terminal: usize,
    pub terminal: usize,
    pub previous: usize,
    pub chosen: usize,
}

#[derive(Debug, Clone)]
pub struct LL1Table {
    cells: HashMap<(usize, usize), usize>,
    conflicts: Vec<LL1Conflict>,
}

impl LL1Table {
    /// Rule chosen for `[non_terminal, terminal]`, if any.
    pub fn get(&self, non_terminal: usize, terminal: usize) -> Option<usize> {
        self.cells.get(&(non_terminal, terminal)).cloned()
    }

    pub fn conflicts(&self) -> &[LL1Conflict] {
        &self.conflicts
    }

    pub fn has_conflict(&self) -> bool {
        !self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn insert(&mut self, g: &Grammar, non_terminal: usize, terminal: usize, rule: usize) {
        if let Some(previous) = self.cells.insert((non_terminal, terminal), rule) {
            if g.rule(previous).body != g.rule(rule).body {
                warn!(
                    "LL(1) conflict at [{}, {}]: rule {} replaced by rule {}",
                    g.get_symbol_name(non_terminal),
                    g.get_symbol_name(terminal),
                    previous,
                    rule
                );
                self.conflicts.push(LL1Conflict {
                    non_terminal,
                    terminal,
                    previous,
                    chosen: rule,
                });
            }
        }
    }
}

impl Grammar {
    pub fn build_ll1_table(&self, first: &FirstSets, follow: &FollowSets) -> LL1Table {
        let mut table = LL1Table {
            cells: HashMap::new(),
            conflicts: Vec::new(),
        };

        for (rule_idx, rule) in self.rule_iter() {
            let body_first = first.of_sequence(self, &rule.body);

            let mut terminals: Vec<usize> = body_first.terminals.into_iter().collect();
            terminals.sort_unstable();
            if body_first.nullable {
                if let Some(head_follow) = follow.get(rule.head) {
                    let mut from_follow: Vec<usize> = head_follow.iter().cloned().collect();
                    from_follow.sort_unstable();
                    terminals.extend(from_follow);
                }
            }

            for terminal in terminals {
                table.insert(self, rule.head, terminal, rule_idx);
            }
        }

        table
    }
}
