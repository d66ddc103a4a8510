use crate::Grammar;

use super::GrammarError;

impl Grammar {
    /// Parses grammar text of the form
    ///
    /// ```text
    /// E  -> T E'
    /// E' -> + T E' | e
    ///     | - T E'
    /// T  -> ( E ) | 1
    /// ```
    ///
    /// Symbols are separated by whitespace, `|` separates alternatives and a
    /// line starting with `|` continues the previous rule. The head of the
    /// first rule is the start symbol.
    pub fn parse(grammar: &str) -> Result<Self, GrammarError> {
        let mut raw_productions: Vec<(usize, &str, &str)> = Vec::new();

        let mut previous_left: Option<&str> = None;
        for (i, line) in grammar.lines().enumerate() {
            if line.chars().all(|c| c.is_whitespace()) {
                continue;
            }
            let malformed = |reason: &str| GrammarError::MalformedRule {
                line: i + 1,
                reason: reason.to_string(),
            };

            let parts: Vec<&str> = line.split("->").collect();
            if parts.len() > 2 {
                return Err(malformed("too many \"->\""));
            }
            let (left, rights): (&str, &str) = if parts.len() == 2 {
                let left_str = parts[0].trim();
                if left_str.is_empty() {
                    return Err(malformed("empty left side"));
                } else if left_str.split_whitespace().count() != 1 {
                    return Err(malformed("left side contains whitespace"));
                }
                (left_str, parts[1].trim())
            } else {
                match (previous_left, parts[0].trim().strip_prefix('|')) {
                    (Some(left), Some(rights)) => (left, rights.trim()),
                    (None, Some(_)) => return Err(malformed("cannot find left side")),
                    (_, None) => return Err(malformed("missing \"->\"")),
                }
            };

            previous_left = Some(left);

            for right in rights.split('|') {
                raw_productions.push((i + 1, left, right));
            }
        }

        Self::from_numbered_rules(raw_productions, None)
    }
}

/// Splits an input string into tokens: on whitespace when it contains any,
/// otherwise into single characters, so `1+1$` and `id + id $` both work.
pub fn split_input(input: &str) -> Vec<&str> {
    let input = input.trim();
    if input.contains(char::is_whitespace) {
        input.split_whitespace().collect()
    } else {
        input
            .char_indices()
            .map(|(i, c)| &input[i..i + c.len_utf8()])
            .collect()
    }
}
