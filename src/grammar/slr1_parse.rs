use log::trace;

use crate::Grammar;

use super::{
    slr1::{LRParsingTable, LRParsingTableAction},
    Rejection,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LRStep {
    /// Bottom first.
    pub states: Vec<usize>,
    pub position: usize,
    /// `None` when the cell was empty.
    pub action: Option<LRParsingTableAction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LRTrace {
    pub input: Vec<usize>,
    pub steps: Vec<LRStep>,
    pub result: Result<(), Rejection>,
}

impl LRTrace {
    pub fn accepted(&self) -> bool {
        self.result.is_ok()
    }
}

impl LRParsingTable {
    pub fn accepts(&self, g: &Grammar, input: &[&str]) -> bool {
        self.trace(g, input).accepted()
    }

    /// Runs the shift-reduce parser on `input`. On a conflicting cell the
    /// first action, which is the shift when there is one, is taken.
    pub fn trace(&self, g: &Grammar, input: &[&str]) -> LRTrace {
        let input = match g.resolve_input(input) {
            Ok(tokens) => tokens,
            Err(rejection) => {
                return LRTrace {
                    input: Vec::new(),
                    steps: Vec::new(),
                    result: Err(rejection),
                }
            }
        };

        let mut steps = Vec::new();
        let result = self.run(g, &input, &mut steps);
        LRTrace {
            input,
            steps,
            result,
        }
    }

    fn run(&self, g: &Grammar, input: &[usize], steps: &mut Vec<LRStep>) -> Result<(), Rejection> {
        let mut states: Vec<usize> = vec![0];
        let mut position = 0;
        // Reductions made since the last shift whose exposed state is still on
        // the stack, as (exposed state, stack height, reduced head). Meeting
        // the same state and head again means the reductions go round forever.
        let mut open: Vec<(usize, usize, usize)> = Vec::new();

        loop {
            // a reduction always pushes a goto target, so the stack is never empty
            let state = states[states.len() - 1];
            let current = match input.get(position) {
                Some(&current) => current,
                None => {
                    return Err(Rejection::InputExhausted(
                        g.get_symbol_name(g.end_mark()).to_string(),
                    ))
                }
            };

            let action = self.action_at(state, current).first().cloned();
            trace!(
                "states: {:?}, input: {:?}, {:?}",
                states,
                g.production_to_vec_str(&input[position..]),
                action
            );
            steps.push(LRStep {
                states: states.clone(),
                position,
                action,
            });

            match action {
                None => {
                    return Err(Rejection::NoAction {
                        state,
                        terminal: g.get_symbol_name(current).to_string(),
                    })
                }
                Some(LRParsingTableAction::Shift(target)) => {
                    states.push(target);
                    position += 1;
                    open.clear();
                }
                Some(LRParsingTableAction::Reduce(index)) => {
                    let rule = g.rule(index);
                    let height = match states.len().checked_sub(rule.body.len()) {
                        Some(height) if height > 0 => height,
                        _ => return Err(Rejection::StackUnderflow { rule: index }),
                    };
                    states.truncate(height);
                    let top = states[height - 1];

                    open.retain(|&(_, h, _)| h <= height);
                    if open.iter().any(|&(s, _, head)| s == top && head == rule.head) {
                        return Err(Rejection::ReductionCycle {
                            state,
                            terminal: g.get_symbol_name(current).to_string(),
                        });
                    }
                    open.push((top, height, rule.head));

                    match self.goto_at(top, rule.head) {
                        Some(target) => states.push(target),
                        None => {
                            return Err(Rejection::NoGoto {
                                state: top,
                                non_terminal: g.get_symbol_name(rule.head).to_string(),
                            })
                        }
                    }
                }
                Some(LRParsingTableAction::Accept) => {
                    return if position + 1 == input.len() {
                        Ok(())
                    } else {
                        Err(Rejection::LeftoverInput(
                            g.production_to_vec_str(&input[position..]).join(" "),
                        ))
                    };
                }
            }
        }
    }
}
