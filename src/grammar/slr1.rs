use std::collections::{BTreeSet, HashMap};

use log::warn;

use crate::Grammar;

use super::{
    first_follow::FollowSets,
    lr_dfa::{DotProduction, LRFSM},
};

/// How states holding more than one reduction are judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReduceReducePolicy {
    /// Any state with two or more reductions is a conflict.
    #[default]
    AnyMultiple,
    /// Only reductions whose Follow sets share a terminal conflict.
    FollowOverlap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SLR1Conflict {
    ShiftReduce {
        state: usize,
        terminal: usize,
        rule: usize,
    },
    ReduceReduce {
        state: usize,
        rules: Vec<usize>,
    },
}

impl SLR1Conflict {
    pub fn state(&self) -> usize {
        match self {
            SLR1Conflict::ShiftReduce { state, .. } | SLR1Conflict::ReduceReduce { state, .. } => {
                *state
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SLR1Report {
    pub conflicts: Vec<SLR1Conflict>,
}

impl SLR1Report {
    pub fn is_slr1(&self) -> bool {
        self.conflicts.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LRParsingTableAction {
    Shift(usize),
    Reduce(usize),
    Accept,
}

/// SLR(1) ACTION/GOTO table. A cell keeps every candidate action so that
/// conflicts stay visible; shifts come first.
#[derive(Debug, Clone)]
pub struct LRParsingTable {
    pub terminals: Vec<usize>,
    pub non_terminals: Vec<usize>,
    pub action: Vec<Vec<Vec<LRParsingTableAction>>>,
    pub goto: Vec<Vec<Option<usize>>>,
    terminal_column: HashMap<usize, usize>,
    non_terminal_column: HashMap<usize, usize>,
}

impl LRParsingTable {
    pub fn action_at(&self, state: usize, terminal: usize) -> &[LRParsingTableAction] {
        match (self.action.get(state), self.terminal_column.get(&terminal)) {
            (Some(row), Some(&col)) => &row[col],
            _ => &[],
        }
    }

    pub fn goto_at(&self, state: usize, non_terminal: usize) -> Option<usize> {
        let col = *self.non_terminal_column.get(&non_terminal)?;
        self.goto.get(state).and_then(|row| row[col])
    }

    pub fn has_conflict(&self) -> bool {
        self.action
            .iter()
            .any(|row| row.iter().any(|actions| actions.len() > 1))
    }
}

impl Grammar {
    /// Reductions of a state: complete items other than `S' -> S .`.
    fn reductions<'a>(
        &'a self,
        items: impl Iterator<Item = &'a DotProduction> + 'a,
    ) -> impl Iterator<Item = usize> + 'a {
        items
            .filter(move |item| item.is_complete(self) && !item.is_accept(self))
            .map(|item| item.rule)
    }

    pub fn check_slr1(
        &self,
        fsm: &LRFSM,
        follow: &FollowSets,
        policy: ReduceReducePolicy,
    ) -> SLR1Report {
        let mut conflicts = Vec::new();

        for (state_idx, state) in fsm.states.iter().enumerate() {
            let reductions: Vec<usize> = self.reductions(state.items.iter()).collect();
            let shifts: BTreeSet<usize> = state
                .items
                .iter()
                .filter_map(|item| item.next_symbol(self))
                .filter(|&s| self.is_terminal(s))
                .collect();

            for &rule in &reductions {
                let head = self.rule(rule).head;
                let mut overlap: Vec<usize> = match follow.get(head) {
                    Some(head_follow) => head_follow
                        .iter()
                        .filter(|t| shifts.contains(t))
                        .cloned()
                        .collect(),
                    None => Vec::new(),
                };
                overlap.sort_unstable();
                for terminal in overlap {
                    warn!(
                        "shift-reduce conflict in state {} on '{}' with rule {}",
                        state_idx,
                        self.get_symbol_name(terminal),
                        rule
                    );
                    conflicts.push(SLR1Conflict::ShiftReduce {
                        state: state_idx,
                        terminal,
                        rule,
                    });
                }
            }

            let reduce_reduce = match policy {
                ReduceReducePolicy::AnyMultiple => reductions.len() > 1,
                ReduceReducePolicy::FollowOverlap => {
                    reductions.iter().enumerate().any(|(i, &a)| {
                        reductions[i + 1..].iter().any(|&b| {
                            match (follow.get(self.rule(a).head), follow.get(self.rule(b).head)) {
                                (Some(fa), Some(fb)) => !fa.is_disjoint(fb),
                                _ => false,
                            }
                        })
                    })
                }
            };
            if reduce_reduce {
                warn!(
                    "reduce-reduce conflict in state {} between rules {:?}",
                    state_idx, reductions
                );
                conflicts.push(SLR1Conflict::ReduceReduce {
                    state: state_idx,
                    rules: reductions,
                });
            }
        }

        SLR1Report { conflicts }
    }

    /// Builds the LR(0) automaton and reports whether it has no SLR(1)
    /// conflict under the default policy.
    pub fn is_slr1(&self, follow: &FollowSets) -> bool {
        self.check_slr1(&self.to_lr0_fsm(), follow, ReduceReducePolicy::default())
            .is_slr1()
    }

    pub fn to_slr1_table(&self, fsm: &LRFSM, follow: &FollowSets) -> LRParsingTable {
        let terminals: Vec<usize> = self.terminal_iter().collect();
        let non_terminals: Vec<usize> = self.non_terminal_iter().map(|nt| nt.index).collect();
        let terminal_column: HashMap<usize, usize> =
            terminals.iter().enumerate().map(|(i, &t)| (t, i)).collect();
        let non_terminal_column: HashMap<usize, usize> = non_terminals
            .iter()
            .enumerate()
            .map(|(i, &nt)| (nt, i))
            .collect();

        let mut action = vec![vec![Vec::new(); terminals.len()]; fsm.states.len()];
        let mut goto = vec![vec![None; non_terminals.len()]; fsm.states.len()];

        for (state_idx, state) in fsm.states.iter().enumerate() {
            let row: &mut Vec<Vec<LRParsingTableAction>> = &mut action[state_idx];

            for (&symbol, &target) in &state.edges {
                if let Some(&col) = terminal_column.get(&symbol) {
                    row[col].push(LRParsingTableAction::Shift(target));
                } else if let Some(&col) = non_terminal_column.get(&symbol) {
                    goto[state_idx][col] = Some(target);
                }
            }

            if state.items.iter().any(|item| item.is_accept(self)) {
                row[terminal_column[&self.end_mark()]].push(LRParsingTableAction::Accept);
            }

            for rule in self.reductions(state.items.iter()) {
                let head_follow = match follow.get(self.rule(rule).head) {
                    Some(head_follow) => head_follow,
                    None => continue,
                };
                let mut lookahead: Vec<usize> = head_follow.iter().cloned().collect();
                lookahead.sort_unstable();
                for t in lookahead {
                    let cell = &mut row[terminal_column[&t]];
                    let reduce = LRParsingTableAction::Reduce(rule);
                    if !cell.contains(&reduce) {
                        cell.push(reduce);
                    }
                }
            }
        }

        LRParsingTable {
            terminals,
            non_terminals,
            action,
            goto,
            terminal_column,
            non_terminal_column,
        }
    }
}
