use thiserror::Error;

/// Errors raised while building a [`Grammar`](super::Grammar). No partial
/// grammar is ever returned alongside one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// `line` is the 1-based line of the grammar text, or the 1-based
    /// position of the rule when the grammar is built from pairs.
    #[error("line {line}: {reason}")]
    MalformedRule { line: usize, reason: String },
    #[error("'{symbol}' appears in a production of '{head}' but no rule defines it")]
    UndefinedSymbolReference { symbol: String, head: String },
    #[error("start symbol '{0}' is not the left side of any rule")]
    UnknownStartSymbol(String),
    #[error("the grammar has no rules")]
    Empty,
}

/// Why a driver rejected an input string. Rejecting is a normal outcome of
/// parsing, distinct from failing to build a table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("'{0}' is not a terminal of the grammar")]
    UnknownSymbol(String),
    #[error("expected '{expected}', found '{found}'")]
    Mismatch { expected: String, found: String },
    #[error("input exhausted while expecting '{0}'")]
    InputExhausted(String),
    #[error("no rule for [{non_terminal}, {terminal}]")]
    NoEntry {
        non_terminal: String,
        terminal: String,
    },
    #[error("input left over after the derivation finished: {0}")]
    LeftoverInput(String),
    #[error("no action in state {state} on '{terminal}'")]
    NoAction { state: usize, terminal: String },
    #[error("no goto from state {state} on '{non_terminal}'")]
    NoGoto { state: usize, non_terminal: String },
    /// The table keeps expanding `non_terminal` on `terminal` without ever
    /// matching it. Only reachable through a conflicting LL(1) table.
    #[error("'{non_terminal}' derives itself on '{terminal}' without consuming input")]
    ExpansionCycle {
        non_terminal: String,
        terminal: String,
    },
    /// The table keeps reducing on `terminal` without shifting. Only
    /// reachable through a conflicting SLR(1) table.
    #[error("reductions in state {state} on '{terminal}' never reach a shift")]
    ReductionCycle { state: usize, terminal: String },
    #[error("reducing by rule {rule} pops more states than the stack holds")]
    StackUnderflow { rule: usize },
}
