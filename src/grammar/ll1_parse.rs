use log::trace;

use crate::Grammar;

use super::{ll1_table::LL1Table, Rejection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LL1Action {
    /// The terminal on top of the stack matched the input.
    Match(usize),
    /// The non-terminal on top of the stack was replaced by this rule's body.
    Expand(usize),
    Accept,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LL1Step {
    /// Bottom first.
    pub stack: Vec<usize>,
    pub position: usize,
    pub action: LL1Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LL1Trace {
    pub input: Vec<usize>,
    pub steps: Vec<LL1Step>,
    pub result: Result<(), Rejection>,
}

impl LL1Trace {
    pub fn accepted(&self) -> bool {
        self.result.is_ok()
    }
}

impl LL1Table {
    pub fn accepts(&self, g: &Grammar, input: &[&str]) -> bool {
        self.trace(g, input).accepted()
    }

    /// Runs the predictive parser on `input`. A trailing `$` is added when
    /// missing.
    pub fn trace(&self, g: &Grammar, input: &[&str]) -> LL1Trace {
        let input = match g.resolve_input(input) {
            Ok(tokens) => tokens,
            Err(rejection) => {
                return LL1Trace {
                    input: Vec::new(),
                    steps: Vec::new(),
                    result: Err(rejection),
                }
            }
        };

        let mut steps = Vec::new();
        let result = self.run(g, &input, &mut steps);
        LL1Trace {
            input,
            steps,
            result,
        }
    }

    fn run(&self, g: &Grammar, input: &[usize], steps: &mut Vec<LL1Step>) -> Result<(), Rejection> {
        let end = g.end_mark();
        let mut stack = vec![end, g.start_symbol()];
        let mut position = 0;
        // Expansions made at `position` whose non-terminal's slot is still on
        // the stack, as (non-terminal, stack height when expanded). Seeing the
        // same non-terminal again among them means it derives itself on the
        // current terminal and the parser would never stop.
        let mut open: Vec<(usize, usize)> = Vec::new();

        let mut record = |stack: &[usize], position: usize, action: LL1Action| {
            trace!(
                "stack: {:?}, input: {:?}, {:?}",
                g.production_to_vec_str(stack),
                g.production_to_vec_str(&input[position.min(input.len())..]),
                action
            );
            steps.push(LL1Step {
                stack: stack.to_vec(),
                position,
                action,
            });
        };

        loop {
            // the bottom marker is never popped, so the stack is never empty
            let top = stack[stack.len() - 1];
            if stack.len() == 1 {
                // only the bottom marker is left
                return if position + 1 == input.len() {
                    record(&stack, position, LL1Action::Accept);
                    Ok(())
                } else {
                    record(&stack, position, LL1Action::Reject);
                    Err(Rejection::LeftoverInput(
                        g.production_to_vec_str(&input[position..]).join(" "),
                    ))
                };
            }

            let current = match input.get(position) {
                Some(&current) => current,
                None => {
                    record(&stack, position, LL1Action::Reject);
                    return Err(Rejection::InputExhausted(g.get_symbol_name(top).to_string()));
                }
            };

            if g.is_terminal(top) {
                if top != current {
                    record(&stack, position, LL1Action::Reject);
                    return Err(Rejection::Mismatch {
                        expected: g.get_symbol_name(top).to_string(),
                        found: g.get_symbol_name(current).to_string(),
                    });
                }
                record(&stack, position, LL1Action::Match(top));
                stack.pop();
                position += 1;
                open.clear();
                continue;
            }

            let rule = match self.get(top, current) {
                Some(rule) => rule,
                None => {
                    record(&stack, position, LL1Action::Reject);
                    return Err(Rejection::NoEntry {
                        non_terminal: g.get_symbol_name(top).to_string(),
                        terminal: g.get_symbol_name(current).to_string(),
                    });
                }
            };
            if open.iter().any(|&(nt, _)| nt == top) {
                record(&stack, position, LL1Action::Reject);
                return Err(Rejection::ExpansionCycle {
                    non_terminal: g.get_symbol_name(top).to_string(),
                    terminal: g.get_symbol_name(current).to_string(),
                });
            }
            open.push((top, stack.len()));

            record(&stack, position, LL1Action::Expand(rule));
            stack.pop();
            stack.extend(g.rule(rule).body.iter().rev());
            let height = stack.len();
            open.retain(|&(_, h)| h <= height);
        }
    }
}
