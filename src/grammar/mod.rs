pub mod analysis;
pub mod error;
pub mod first_follow;
pub mod grammar;
pub mod ll1_parse;
pub mod ll1_table;
pub mod lr_dfa;
pub mod parse;
pub mod pretty_print;
pub mod slr1;
pub mod slr1_parse;

pub use analysis::Analysis;
pub use error::{GrammarError, Rejection};
pub use grammar::Grammar;

pub const EPSILON: &str = "\u{3b5}";
pub const EPSILON_MARKERS: [&str; 3] = ["e", "\u{3b5}", "\u{3f5}"];
pub const END_MARK: &str = "$";
