use std::collections::{HashMap, HashSet, VecDeque};

use log::debug;

use crate::Grammar;

/// First set of a non-terminal or of a symbol sequence. `nullable` stands
/// for epsilon being a member of the set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FirstSet {
    pub terminals: HashSet<usize>,
    pub nullable: bool,
}

impl FirstSet {
    pub fn contains_epsilon(&self) -> bool {
        self.nullable
    }

    /// Merges `other` into `self`, returns whether anything was added.
    fn merge(&mut self, other: FirstSet) -> bool {
        let before = (self.terminals.len(), self.nullable);
        self.terminals.extend(other.terminals);
        self.nullable |= other.nullable;
        before != (self.terminals.len(), self.nullable)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstSets {
    sets: HashMap<usize, FirstSet>,
}

impl FirstSets {
    pub fn get(&self, non_terminal: usize) -> Option<&FirstSet> {
        self.sets.get(&non_terminal)
    }

    /// First of a symbol sequence; an empty sequence is nullable.
    pub fn of_sequence(&self, g: &Grammar, production: &[usize]) -> FirstSet {
        first_of_sequence(g, &self.sets, production)
    }
}

fn first_of_sequence(
    g: &Grammar,
    sets: &HashMap<usize, FirstSet>,
    production: &[usize],
) -> FirstSet {
    let mut first = FirstSet::default();
    for &idx in production {
        if g.is_terminal(idx) {
            first.terminals.insert(idx);
            return first;
        }
        match sets.get(&idx) {
            Some(nt_first) => {
                first.terminals.extend(nt_first.terminals.iter().cloned());
                if !nt_first.nullable {
                    return first;
                }
            }
            None => return first,
        }
    }
    first.nullable = true;
    first
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowSets {
    sets: HashMap<usize, HashSet<usize>>,
}

impl FollowSets {
    pub fn get(&self, non_terminal: usize) -> Option<&HashSet<usize>> {
        self.sets.get(&non_terminal)
    }
}

impl Grammar {
    pub fn first_sets(&self) -> FirstSets {
        let mut sets: HashMap<usize, FirstSet> = self
            .non_terminal_iter()
            .map(|nt| (nt.index, FirstSet::default()))
            .collect();

        let mut passes = 0;
        let mut changed = true;
        while changed {
            changed = false;
            passes += 1;
            for (_, rule) in self.rule_iter() {
                let first = first_of_sequence(self, &sets, &rule.body);
                if let Some(head_first) = sets.get_mut(&rule.head) {
                    changed |= head_first.merge(first);
                }
            }
        }
        debug!("first sets converged after {} passes", passes);

        FirstSets { sets }
    }

    pub fn follow_sets(&self, first: &FirstSets) -> FollowSets {
        let mut sets: HashMap<usize, HashSet<usize>> = self
            .non_terminal_iter()
            .map(|nt| (nt.index, HashSet::new()))
            .collect();
        sets.entry(self.start_symbol())
            .or_default()
            .insert(self.end_mark());

        // A -> X in `dependents` means Follow(A) is a subset of Follow(X)
        let mut dependents: HashMap<usize, HashSet<usize>> = HashMap::new();
        for (_, rule) in self.rule_iter() {
            for (i, &x) in rule.body.iter().enumerate() {
                if self.is_terminal(x) {
                    continue;
                }
                let rest = first.of_sequence(self, &rule.body[i + 1..]);
                sets.entry(x).or_default().extend(rest.terminals);
                if rest.nullable && rule.head != x {
                    dependents.entry(rule.head).or_default().insert(x);
                }
            }
        }

        let mut queue: VecDeque<usize> = self.non_terminal_iter().map(|nt| nt.index).collect();
        let mut queued: HashSet<usize> = queue.iter().cloned().collect();
        let mut relays = 0;
        while let Some(from) = queue.pop_front() {
            queued.remove(&from);
            let targets = match dependents.get(&from) {
                Some(targets) => targets,
                None => continue,
            };
            for &into in targets {
                let delta = follow_delta(&sets, from, into);
                if delta.is_empty() {
                    continue;
                }
                relays += 1;
                sets.entry(into).or_default().extend(delta);
                if queued.insert(into) {
                    queue.push_back(into);
                }
            }
        }
        debug!("follow sets converged after {} relays", relays);

        FollowSets { sets }
    }
}

/// Terminals of Follow(`from`) that Follow(`into`) is still missing.
fn follow_delta(sets: &HashMap<usize, HashSet<usize>>, from: usize, into: usize) -> HashSet<usize> {
    let empty = HashSet::new();
    let target = sets.get(&into).unwrap_or(&empty);
    sets.get(&from)
        .map(|source| source.difference(target).cloned().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn first_names<'a>(g: &'a Grammar, first: &FirstSets, nt: &str) -> (Vec<&'a str>, bool) {
        let set = first.get(g.get_symbol_index(nt).unwrap()).unwrap();
        (g.names_of(&set.terminals), set.nullable)
    }

    fn follow_names<'a>(g: &'a Grammar, follow: &FollowSets, nt: &str) -> Vec<&'a str> {
        g.names_of(follow.get(g.get_symbol_index(nt).unwrap()).unwrap())
    }

    #[test]
    fn epsilon_propagation() {
        let g = Grammar::parse("S -> A b\nA -> e").unwrap();
        let first = g.first_sets();
        let follow = g.follow_sets(&first);

        assert_eq!(first_names(&g, &first, "A"), (vec![], true));
        assert_eq!(first_names(&g, &first, "S"), (vec!["b"], false));
        assert_eq!(follow_names(&g, &follow, "A"), vec!["b"]);
        assert_eq!(follow_names(&g, &follow, "S"), vec!["$"]);
    }

    #[test]
    fn follow_of_start_is_seeded() {
        let g = Grammar::parse("S -> a").unwrap();
        let follow = g.follow_sets(&g.first_sets());
        assert_eq!(follow_names(&g, &follow, "S"), vec!["$"]);
    }

    #[test]
    fn expression_grammar() {
        let g = Grammar::parse(
            "E -> T E'
             E' -> + T E' | e
             T -> F T'
             T' -> * F T' | e
             F -> ( E ) | id",
        )
        .unwrap();
        let first = g.first_sets();
        let follow = g.follow_sets(&first);

        assert_eq!(first_names(&g, &first, "E"), (vec!["(", "id"], false));
        assert_eq!(first_names(&g, &first, "E'"), (vec!["+"], true));
        assert_eq!(first_names(&g, &first, "T'"), (vec!["*"], true));

        assert_eq!(follow_names(&g, &follow, "E"), vec!["$", ")"]);
        assert_eq!(follow_names(&g, &follow, "E'"), vec!["$", ")"]);
        assert_eq!(follow_names(&g, &follow, "T"), vec!["$", ")", "+"]);
        assert_eq!(follow_names(&g, &follow, "T'"), vec!["$", ")", "+"]);
        assert_eq!(follow_names(&g, &follow, "F"), vec!["$", ")", "*", "+"]);
    }

    #[test]
    fn mutual_recursion_through_trailing_nullables() {
        // Follow(A) and Follow(B) feed each other through nullable tails
        let g = Grammar::parse(
            "S -> A x | B y
             A -> a B | e
             B -> b A | e",
        )
        .unwrap();
        let first = g.first_sets();
        let follow = g.follow_sets(&first);

        assert_eq!(follow_names(&g, &follow, "A"), vec!["x", "y"]);
        assert_eq!(follow_names(&g, &follow, "B"), vec!["x", "y"]);
    }

    #[test]
    fn sequence_first() {
        let g = Grammar::parse("S -> A B c\nA -> a | e\nB -> b | e").unwrap();
        let first = g.first_sets();
        let body = &g.rule(1).body;

        let whole = first.of_sequence(&g, body);
        assert_eq!(g.names_of(&whole.terminals), vec!["a", "b", "c"]);
        assert!(!whole.contains_epsilon());

        let tail = first.of_sequence(&g, &body[..2]);
        assert_eq!(g.names_of(&tail.terminals), vec!["a", "b"]);
        assert!(tail.contains_epsilon());

        assert!(first.of_sequence(&g, &[]).contains_epsilon());
    }

    #[test]
    fn rule_order_does_not_matter() {
        let rules = [
            ("E", "T E'"),
            ("E'", "+ T E'"),
            ("E'", "e"),
            ("T", "( E )"),
            ("T", "1"),
        ];
        let mut reversed = rules;
        reversed.reverse();

        let g1 = Grammar::from_rules(rules, Some("E")).unwrap();
        let g2 = Grammar::from_rules(reversed, Some("E")).unwrap();
        let (first1, first2) = (g1.first_sets(), g2.first_sets());
        let (follow1, follow2) = (g1.follow_sets(&first1), g2.follow_sets(&first2));

        for nt in ["E", "E'", "T"] {
            assert_eq!(first_names(&g1, &first1, nt), first_names(&g2, &first2, nt));
            assert_eq!(follow_names(&g1, &follow1, nt), follow_names(&g2, &follow2, nt));
        }

        assert_eq!(g1.first_sets(), first1);
        assert_eq!(g1.follow_sets(&first1), follow1);
    }
}
