use std::collections::HashSet;

use crowbook_text_processing::escape;
use serde::Serialize;

use super::{
    first_follow::{FirstSets, FollowSets},
    ll1_parse::{LL1Action, LL1Trace},
    ll1_table::{LL1Conflict, LL1Table},
    lr_dfa::{DotProduction, LRFSM},
    slr1::{LRParsingTable, LRParsingTableAction, SLR1Conflict, SLR1Report},
    slr1_parse::LRTrace,
    Grammar, EPSILON,
};

fn align_columns(output: &[Vec<String>]) -> String {
    let columns = output.iter().map(|line| line.len()).max().unwrap_or(0);
    let width: Vec<usize> = (0..columns)
        .map(|j| {
            output
                .iter()
                .filter_map(|line| line.get(j))
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();
    output
        .iter()
        .map(|line| {
            line.iter()
                .enumerate()
                .map(|(i, s)| format!("{:>width$}", s, width = width[i]))
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutput<'a> {
    pub left: &'a str,
    pub rights: Vec<Vec<&'a str>>,
}

impl<'a> ProductionOutput<'a> {
    fn of_rule(g: &'a Grammar, rule: usize) -> Self {
        let rule = g.rule(rule);
        Self {
            left: g.get_symbol_name(rule.head),
            rights: vec![body_names(g, &rule.body)],
        }
    }
}

fn body_names<'a>(g: &'a Grammar, body: &[usize]) -> Vec<&'a str> {
    if body.is_empty() {
        vec![EPSILON]
    } else {
        g.production_to_vec_str(body)
    }
}

impl ProductionOutput<'_> {
    pub fn to_plaintext(&self, left_width: usize, multiline: bool) -> String {
        self.rights
            .iter()
            .map(|right| right.join(" "))
            .enumerate()
            .map(|(i, right)| {
                if i == 0 {
                    format!("{:>width$} -> {}", self.left, right, width = left_width)
                } else if multiline {
                    format!("{:>width$}  | {}", "", right, width = left_width)
                } else {
                    format!(" | {}", right)
                }
            })
            .collect::<Vec<_>>()
            .join(if multiline { "\n" } else { "" })
    }

    pub fn to_latex(&self, and_sign: bool, terminal_set: &HashSet<&str>) -> String {
        if self.rights.is_empty() {
            return String::new();
        }

        let left = if and_sign {
            format!("{} & \\rightarrow &", escape::tex(self.left))
        } else {
            format!("{} \\rightarrow ", escape::tex(self.left))
        };
        let right = self
            .rights
            .iter()
            .map(|right| {
                right
                    .iter()
                    .map(|&s| latex_symbol(s, terminal_set))
                    .collect::<Vec<_>>()
                    .join(" \\ ")
            })
            .collect::<Vec<_>>()
            .join(" \\mid ");

        left + &right
    }
}

fn latex_symbol(s: &str, terminal_set: &HashSet<&str>) -> String {
    if s == EPSILON {
        "\\epsilon".to_string()
    } else if terminal_set.contains(s) {
        format!("\\text{{{}}}", escape::tex(s))
    } else {
        escape::tex(s).to_string()
    }
}

fn terminal_set(g: &Grammar) -> HashSet<&str> {
    g.terminal_iter().map(|t| g.get_symbol_name(t)).collect()
}

#[derive(Serialize)]
pub struct ProductionOutputVec<'a> {
    productions: Vec<ProductionOutput<'a>>,
    #[serde(skip)]
    terminals: HashSet<&'a str>,
}

impl ProductionOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        let left_max_len = self
            .productions
            .iter()
            .map(|p| p.left.chars().count())
            .max()
            .unwrap_or(0);
        self.productions
            .iter()
            .map(|s| s.to_plaintext(left_max_len, true))
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        std::iter::once("\\[\\begin{array}{cll}".to_string())
            .chain(
                self.productions
                    .iter()
                    .map(|s| s.to_latex(true, &self.terminals)),
            )
            .chain(std::iter::once("\\end{array}\\]".to_string()))
            .collect::<Vec<String>>()
            .join("\\\\\n")
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Grammar {
    pub fn to_production_output_vec(&self) -> ProductionOutputVec {
        let productions = self
            .non_terminal_iter()
            .map(|nt| ProductionOutput {
                left: nt.name.as_str(),
                rights: nt
                    .productions
                    .iter()
                    .map(|&rule| body_names(self, &self.rule(rule).body))
                    .collect(),
            })
            .collect();
        ProductionOutputVec {
            productions,
            terminals: terminal_set(self),
        }
    }
}

#[derive(Serialize)]
struct NonTerminalOutput<'a> {
    name: &'a str,
    nullable: bool,
    first: Vec<&'a str>,
    follow: Vec<&'a str>,
}

impl NonTerminalOutput<'_> {
    fn to_plaintext(&self) -> String {
        format!(
            "{} | {} | {} | {}",
            self.name,
            self.nullable,
            self.first.join(", "),
            self.follow.join(", ")
        )
    }

    fn to_latex(&self) -> String {
        fn f(a: &[&str]) -> String {
            a.iter()
                .map(|s| escape::tex(*s))
                .collect::<Vec<_>>()
                .join(r"\ ")
                .replace(EPSILON, r"$\epsilon$")
        }

        format!(
            "{} & {} & {} & {}",
            escape::tex(self.name),
            self.nullable,
            f(&self.first),
            f(&self.follow)
        )
    }
}

#[derive(Serialize)]
pub struct NonTerminalOutputVec<'a> {
    data: Vec<NonTerminalOutput<'a>>,
}

impl NonTerminalOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        self.data
            .iter()
            .map(|s| s.to_plaintext())
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .data
            .iter()
            .map(|e| e.to_latex())
            .collect::<Vec<_>>()
            .join("\\\\\n ");

        "\\begin{tabular}{c|c|c|c}\n".to_string()
            + "Symbol & Nullable & First & Follow\\\\\\hline\n"
            + &content
            + "\\\\\n\\end{tabular}"
    }
}

impl Grammar {
    pub fn to_non_terminal_output_vec(
        &self,
        first: &FirstSets,
        follow: &FollowSets,
    ) -> NonTerminalOutputVec {
        let mut data = Vec::new();
        for nt in self.non_terminal_iter() {
            let nt_first = first.get(nt.index);
            let nullable = nt_first.map_or(false, |f| f.nullable);
            let mut t = NonTerminalOutput {
                name: nt.name.as_str(),
                nullable,
                first: nt_first.map_or_else(Vec::new, |f| self.names_of(&f.terminals)),
                follow: follow
                    .get(nt.index)
                    .map_or_else(Vec::new, |f| self.names_of(f)),
            };
            if nullable {
                t.first.push(EPSILON);
            }
            data.push(t);
        }
        NonTerminalOutputVec { data }
    }
}

impl LL1Conflict {
    pub fn to_plaintext(&self, g: &Grammar) -> String {
        format!(
            "conflict at [{}, {}]: {} replaced by {}",
            g.get_symbol_name(self.non_terminal),
            g.get_symbol_name(self.terminal),
            ProductionOutput::of_rule(g, self.previous).to_plaintext(0, false),
            ProductionOutput::of_rule(g, self.chosen).to_plaintext(0, false),
        )
    }
}

#[derive(Serialize)]
pub struct LL1ParsingTable<'a> {
    terminals: Vec<&'a str>,
    rows: Vec<(&'a str, Vec<ProductionOutput<'a>>)>,
    conflicts: Vec<String>,
}

impl LL1ParsingTable<'_> {
    pub fn to_plaintext(&self) -> String {
        let mut header: Vec<String> = vec![String::new()];
        header.extend(self.terminals.iter().map(|&t| t.to_string()));
        let mut output: Vec<Vec<String>> = vec![header];
        for (left, row) in &self.rows {
            let mut line: Vec<String> = vec![left.to_string()];
            line.extend(
                row.iter()
                    .map(|productions| productions.to_plaintext(left.len(), false)),
            );
            output.push(line);
        }

        let mut table = align_columns(&output);
        for conflict in &self.conflicts {
            table.push('\n');
            table.push_str(conflict);
        }
        table
    }

    pub fn to_latex(&self) -> String {
        let mut header: Vec<String> = vec![format!(
            "\\[\\begin{{array}}{{c{}}}\n",
            "|l".repeat(self.terminals.len()),
        )];
        header.extend(
            self.terminals
                .iter()
                .map(|&t| format!("\\text{{{}}}", escape::tex(t))),
        );
        let header = header.join(" & ");

        let mut output: Vec<String> = Vec::new();
        let terminal_set: HashSet<&str> = self.terminals.iter().cloned().collect();
        for (left, row) in &self.rows {
            let mut line: Vec<String> = vec![escape::tex(*left).to_string()];
            line.extend(
                row.iter()
                    .map(|productions| productions.to_latex(false, &terminal_set)),
            );
            output.push(line.join(" & "));
        }

        let output = output.join("\\\\\n");

        header + "\\\\\\hline\n" + &output + "\n\\end{array}\\]"
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl LL1Table {
    pub fn to_output<'a>(&self, g: &'a Grammar) -> LL1ParsingTable<'a> {
        let terminal_indices: Vec<usize> = g.terminal_iter().collect();
        let terminals: Vec<&str> = terminal_indices
            .iter()
            .map(|&t| g.get_symbol_name(t))
            .collect();

        let rows = g
            .non_terminal_iter()
            .map(|nt| {
                let left = nt.name.as_str();
                let row = terminal_indices
                    .iter()
                    .map(|&t| ProductionOutput {
                        left,
                        rights: self
                            .get(nt.index, t)
                            .map(|rule| vec![body_names(g, &g.rule(rule).body)])
                            .unwrap_or_default(),
                    })
                    .collect();
                (left, row)
            })
            .collect();

        LL1ParsingTable {
            terminals,
            rows,
            conflicts: self.conflicts().iter().map(|c| c.to_plaintext(g)).collect(),
        }
    }
}

impl DotProduction {
    pub fn to_plaintext(&self, g: &Grammar) -> String {
        let rule = g.rule(self.rule);
        let mut output = String::new();
        output.push_str(g.get_symbol_name(rule.head));
        output.push_str(" ->");
        for (i, &s) in rule.body.iter().enumerate() {
            output.push(' ');
            if i == self.position {
                output.push('.');
            }
            output.push_str(g.get_symbol_name(s));
        }
        if self.position == rule.body.len() {
            output.push_str(" .");
        }
        output
    }

    pub fn to_latex(&self, g: &Grammar) -> String {
        let rule = g.rule(self.rule);
        let mut right: Vec<String> = Vec::new();
        for (i, &s) in rule.body.iter().enumerate() {
            if i == self.position {
                right.push(".".to_string());
            }
            right.push(escape::tex(g.get_symbol_name(s)).to_string());
        }
        if self.position == rule.body.len() {
            right.push(".".to_string());
        }
        format!(
            "${} \\rightarrow {}$",
            escape::tex(g.get_symbol_name(rule.head)),
            right.join(" ")
        )
    }
}

#[derive(Serialize)]
struct LRStateOutput<'a> {
    kernel: Vec<String>,
    extend: Vec<String>,
    edges: Vec<(&'a str, usize)>,
    #[serde(skip)]
    latex_items: Vec<String>,
}

impl LRStateOutput<'_> {
    fn to_plaintext(&self) -> String {
        let kernel = self.kernel.join("\n");

        let extend = if !self.extend.is_empty() {
            format!("\n---\n{}", self.extend.join("\n"))
        } else {
            String::new()
        };

        let edges = if !self.edges.is_empty() {
            format!(
                "\n===\n{}",
                self.edges
                    .iter()
                    .map(|(k, v)| format!("- {} -> {}", k, v))
                    .collect::<Vec<_>>()
                    .join("\n")
            )
        } else {
            String::new()
        };

        format!("{}{}{}", kernel, extend, edges)
    }

    fn node_to_latex(&self, id: usize) -> String {
        format!(
            "\\node [block] (I_{}){}\n{{\n$I_{}$\\\\\n{}\n}};",
            id,
            if id > 0 {
                if id % 2 == 0 {
                    format!(" [below of = I_{}] ", id - 2)
                } else {
                    format!(" [right of = I_{}] ", id - 1)
                }
            } else {
                String::new()
            },
            id,
            self.latex_items.join(" \\\\ \n")
        )
    }

    fn edge_to_latex(&self, id: usize) -> String {
        self.edges
            .iter()
            .map(|(e, v)| {
                format!(
                    "\\path [->] (I_{}) edge {} node [above]{{{}}} (I_{});",
                    id,
                    if id == *v { "[loop left]" } else { "[right]" },
                    escape::tex(*e),
                    v
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Serialize)]
pub struct LRFSMOutput<'a> {
    states: Vec<LRStateOutput<'a>>,
    start: usize,
}

impl LRFSMOutput<'_> {
    pub fn to_plaintext(&self) -> String {
        let states = self
            .states
            .iter()
            .enumerate()
            .map(|(i, s)| format!("I{}\n{}", i, s.to_plaintext()))
            .collect::<Vec<_>>()
            .join("\n\n");

        format!("{}\n\nstart: {}", states, self.start)
    }

    pub fn to_latex(&self) -> String {
        format!(
            "\\begin{{tikzpicture}}[node distance=5cm,block/.style={{state, rectangle, text width=6em}}]\n{}\n\\end{{tikzpicture}}",
            self.states
                .iter()
                .enumerate()
                .map(|(i, s)| s.node_to_latex(i))
                .chain(self.states.iter().enumerate().map(|(i, s)| s.edge_to_latex(i)))
                .collect::<Vec<_>>()
                .join("\n")
        )
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl LRFSM {
    pub fn to_output<'a>(&self, g: &'a Grammar) -> LRFSMOutput<'a> {
        let states = self
            .states
            .iter()
            .map(|state| LRStateOutput {
                kernel: state.kernel.iter().map(|item| item.to_plaintext(g)).collect(),
                extend: state.extend().map(|item| item.to_plaintext(g)).collect(),
                edges: state
                    .edges
                    .iter()
                    .map(|(&symbol, &target)| (g.get_symbol_name(symbol), target))
                    .collect(),
                latex_items: state.items.iter().map(|item| item.to_latex(g)).collect(),
            })
            .collect();
        LRFSMOutput {
            states,
            start: self.start,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub enum ActionOutput<'a> {
    Shift(usize),
    Reduce(ProductionOutput<'a>),
    Accept,
}

impl ActionOutput<'_> {
    pub fn to_plaintext(&self) -> String {
        match self {
            ActionOutput::Reduce(r) => format!("r({})", r.to_plaintext(0, false)),
            ActionOutput::Shift(s) => format!("s{}", s),
            ActionOutput::Accept => "acc".to_string(),
        }
    }

    pub fn to_latex(&self, terminal_set: &HashSet<&str>) -> String {
        match self {
            ActionOutput::Reduce(r) => format!("reduce ${}$", r.to_latex(false, terminal_set)),
            ActionOutput::Shift(s) => format!("shift {}", s),
            ActionOutput::Accept => "accept".to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct LRParsingTableOutput<'a> {
    terminals: Vec<&'a str>,
    non_terminals: Vec<&'a str>,
    action: Vec<Vec<Vec<ActionOutput<'a>>>>,
    goto: Vec<Vec<Option<usize>>>,
}

impl LRParsingTableOutput<'_> {
    pub fn to_plaintext(&self) -> String {
        let mut output: Vec<Vec<String>> = Vec::new();

        output.push(vec![String::new()]);
        for s in self.terminals.iter().chain(self.non_terminals.iter()) {
            output[0].push(s.to_string());
        }

        for (i, (r1, r2)) in self.action.iter().zip(self.goto.iter()).enumerate() {
            let row: Vec<String> = std::iter::once(i.to_string())
                .chain(r1.iter().map(|actions| {
                    actions
                        .iter()
                        .map(|action| action.to_plaintext())
                        .collect::<Vec<_>>()
                        .join("; ")
                }))
                .chain(r2.iter().map(|goto| match goto {
                    Some(goto) => goto.to_string(),
                    None => String::new(),
                }))
                .collect::<Vec<_>>();
            output.push(row);
        }

        align_columns(&output)
    }

    pub fn to_latex(&self) -> String {
        let header: String = format!(
            "\\begin{{tabular}}{{c{}}}\n & \\multicolumn{{{}}}{{c}}{{action}} & \\multicolumn{{{}}}{{|c}}{{goto}}\\\\",
            "|l".repeat(self.terminals.len() + self.non_terminals.len()),
            self.terminals.len(),
            self.non_terminals.len(),
        );

        let mut first_row: Vec<String> = vec![String::new()];
        for s in self.terminals.iter().chain(self.non_terminals.iter()) {
            first_row.push(escape::tex(*s).to_string());
        }
        let first_row = first_row.join(" & ");

        let terminal_set: HashSet<&str> = self.terminals.iter().cloned().collect();

        let content = self
            .action
            .iter()
            .zip(self.goto.iter())
            .enumerate()
            .map(|(i, (r1, r2))| {
                std::iter::once(i.to_string())
                    .chain(r1.iter().map(|actions| {
                        let r = actions
                            .iter()
                            .map(|action| action.to_latex(&terminal_set))
                            .collect::<Vec<_>>()
                            .join("; ");
                        if actions.len() > 1 {
                            format!("{{\\color{{red}}{}}}", r)
                        } else {
                            r
                        }
                    }))
                    .chain(r2.iter().map(|goto| match goto {
                        Some(goto) => goto.to_string(),
                        None => String::new(),
                    }))
                    .collect::<Vec<_>>()
                    .join(" & ")
            })
            .collect::<Vec<_>>()
            .join(" \\\\\n");

        format!(
            "{}\n{} \\\\\\hline\n{}\n\\end{{tabular}}",
            header, first_row, content
        )
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl LRParsingTable {
    pub fn to_output<'a>(&self, g: &'a Grammar) -> LRParsingTableOutput<'a> {
        let action = self
            .action
            .iter()
            .map(|row| {
                row.iter()
                    .map(|actions| {
                        actions
                            .iter()
                            .map(|action| match *action {
                                LRParsingTableAction::Shift(s) => ActionOutput::Shift(s),
                                LRParsingTableAction::Reduce(r) => {
                                    ActionOutput::Reduce(ProductionOutput::of_rule(g, r))
                                }
                                LRParsingTableAction::Accept => ActionOutput::Accept,
                            })
                            .collect()
                    })
                    .collect()
            })
            .collect();

        LRParsingTableOutput {
            terminals: self.terminals.iter().map(|&t| g.get_symbol_name(t)).collect(),
            non_terminals: self
                .non_terminals
                .iter()
                .map(|&nt| g.get_symbol_name(nt))
                .collect(),
            action,
            goto: self.goto.clone(),
        }
    }
}

impl SLR1Conflict {
    pub fn to_plaintext(&self, g: &Grammar) -> String {
        match self {
            SLR1Conflict::ShiftReduce {
                state,
                terminal,
                rule,
            } => format!(
                "shift-reduce conflict in state {} on {}: shift or reduce {}",
                state,
                g.get_symbol_name(*terminal),
                ProductionOutput::of_rule(g, *rule).to_plaintext(0, false)
            ),
            SLR1Conflict::ReduceReduce { state, rules } => format!(
                "reduce-reduce conflict in state {}: {}",
                state,
                rules
                    .iter()
                    .map(|&r| ProductionOutput::of_rule(g, r).to_plaintext(0, false))
                    .collect::<Vec<_>>()
                    .join(" / ")
            ),
        }
    }
}

#[derive(Serialize)]
pub struct SLR1ReportOutput {
    slr1: bool,
    conflicts: Vec<String>,
}

impl SLR1ReportOutput {
    pub fn to_plaintext(&self) -> String {
        std::iter::once(format!("SLR(1): {}", self.slr1))
            .chain(self.conflicts.iter().cloned())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        std::iter::once(format!("SLR(1): {}", self.slr1))
            .chain(self.conflicts.iter().map(|c| escape::tex(c.as_str()).to_string()))
            .collect::<Vec<_>>()
            .join("\\\\\n")
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl SLR1Report {
    pub fn to_output(&self, g: &Grammar) -> SLR1ReportOutput {
        SLR1ReportOutput {
            slr1: self.is_slr1(),
            conflicts: self.conflicts.iter().map(|c| c.to_plaintext(g)).collect(),
        }
    }
}

fn outcome(result: &Result<(), super::Rejection>) -> String {
    match result {
        Ok(()) => "accepted".to_string(),
        Err(rejection) => format!("rejected: {}", rejection),
    }
}

impl LL1Trace {
    pub fn to_plaintext(&self, g: &Grammar) -> String {
        let mut output: Vec<Vec<String>> =
            vec![vec!["stack".to_string(), "input".to_string(), "action".to_string()]];
        for step in &self.steps {
            let action = match step.action {
                LL1Action::Match(t) => format!("match {}", g.get_symbol_name(t)),
                LL1Action::Expand(rule) => ProductionOutput::of_rule(g, rule).to_plaintext(0, false),
                LL1Action::Accept => "accept".to_string(),
                LL1Action::Reject => "error".to_string(),
            };
            output.push(vec![
                g.production_to_vec_str(&step.stack).join(" "),
                g.production_to_vec_str(&self.input[step.position..]).join(" "),
                action,
            ]);
        }
        align_columns(&output) + "\n" + &outcome(&self.result)
    }
}

impl LRTrace {
    pub fn to_plaintext(&self, g: &Grammar) -> String {
        let mut output: Vec<Vec<String>> =
            vec![vec!["states".to_string(), "input".to_string(), "action".to_string()]];
        for step in &self.steps {
            let action = match step.action {
                Some(LRParsingTableAction::Shift(s)) => format!("s{}", s),
                Some(LRParsingTableAction::Reduce(rule)) => format!(
                    "r({})",
                    ProductionOutput::of_rule(g, rule).to_plaintext(0, false)
                ),
                Some(LRParsingTableAction::Accept) => "acc".to_string(),
                None => "error".to_string(),
            };
            output.push(vec![
                step.states
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .join(" "),
                g.production_to_vec_str(&self.input[step.position..]).join(" "),
                action,
            ]);
        }
        align_columns(&output) + "\n" + &outcome(&self.result)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::grammar::parse::split_input;

    #[test]
    fn productions_plaintext() {
        let g = Grammar::parse("E -> T E'\nE' -> + T E' | e\nT -> 1").unwrap();
        assert_eq!(
            g.to_production_output_vec().to_plaintext(),
            " E -> T E'\nE' -> + T E'\n    | \u{3b5}\n T -> 1"
        );
    }

    #[test]
    fn first_follow_plaintext() {
        let g = Grammar::parse("S -> A b\nA -> a | e").unwrap();
        let first = g.first_sets();
        let follow = g.follow_sets(&first);
        assert_eq!(
            g.to_non_terminal_output_vec(&first, &follow).to_plaintext(),
            "S | false | a, b | $\nA | true | a, \u{3b5} | b"
        );
    }

    #[test]
    fn first_follow_json() {
        let g = Grammar::parse("S -> a").unwrap();
        let first = g.first_sets();
        let follow = g.follow_sets(&first);
        assert_eq!(
            g.to_non_terminal_output_vec(&first, &follow).to_json().unwrap(),
            r#"{"data":[{"name":"S","nullable":false,"first":["a"],"follow":["$"]}]}"#
        );
    }

    #[test]
    fn dot_production_plaintext() {
        let g = Grammar::parse("S -> ( S ) | e").unwrap();
        assert_eq!(DotProduction { rule: 1, position: 1 }.to_plaintext(&g), "S -> ( .S )");
        assert_eq!(DotProduction { rule: 1, position: 3 }.to_plaintext(&g), "S -> ( S ) .");
        assert_eq!(DotProduction { rule: 2, position: 0 }.to_plaintext(&g), "S -> .");
        assert_eq!(DotProduction { rule: 0, position: 0 }.to_plaintext(&g), "S' -> .S");
    }

    #[test]
    fn ll1_table_plaintext() {
        let g = Grammar::parse("S -> a S | b").unwrap();
        let first = g.first_sets();
        let follow = g.follow_sets(&first);
        let table = g.build_ll1_table(&first, &follow).to_output(&g);
        assert_eq!(
            table.to_plaintext(),
            "  |        a |      b | $\nS | S -> a S | S -> b |  "
        );
    }

    #[test]
    fn conflicts_are_described() {
        let g = Grammar::parse("E -> E + E | 1").unwrap();
        let follow = g.follow_sets(&g.first_sets());
        let fsm = g.to_lr0_fsm();
        let report = g
            .check_slr1(&fsm, &follow, Default::default())
            .to_output(&g);
        assert_eq!(
            report.to_plaintext(),
            "SLR(1): false\nshift-reduce conflict in state 4 on +: shift or reduce E -> E + E"
        );
    }

    #[test]
    fn traces_end_with_outcome() {
        let g = Grammar::parse("S -> a").unwrap();
        let first = g.first_sets();
        let follow = g.follow_sets(&first);
        let ll1 = g.build_ll1_table(&first, &follow);
        let text = ll1.trace(&g, &split_input("a")).to_plaintext(&g);
        assert!(text.ends_with("\naccepted"));

        let slr1 = g.to_slr1_table(&g.to_lr0_fsm(), &follow);
        let text = slr1.trace(&g, &split_input("b")).to_plaintext(&g);
        assert!(text.ends_with("rejected: 'b' is not a terminal of the grammar"));
    }

    #[test]
    fn lr_fsm_json_lists_kernel_and_edges() {
        let g = Grammar::parse("S -> 1").unwrap();
        let json = g.to_lr0_fsm().to_output(&g).to_json().unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"states":[{"kernel":["S' -> .S"],"extend":["S -> .1"],"edges":[["S",1],["1",2]]},"#,
                r#"{"kernel":["S' -> S ."],"extend":[],"edges":[]},"#,
                r#"{"kernel":["S -> 1 ."],"extend":[],"edges":[]}],"start":0}"#
            )
        );
    }
}
