use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use log::debug;

use crate::Grammar;

use super::grammar::AUGMENTED_RULE;

/// An LR(0) item: a rule with a dot before `body[position]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DotProduction {
    pub rule: usize,
    pub position: usize,
}

impl DotProduction {
    pub fn new(rule: usize) -> Self {
        Self { rule, position: 0 }
    }

    pub fn generate_next(&self) -> Self {
        Self {
            rule: self.rule,
            position: self.position + 1,
        }
    }

    /// The symbol right after the dot, `None` when the dot is at the end.
    pub fn next_symbol(&self, g: &Grammar) -> Option<usize> {
        g.rule(self.rule).body.get(self.position).cloned()
    }

    pub fn is_complete(&self, g: &Grammar) -> bool {
        self.position >= g.rule(self.rule).body.len()
    }

    /// `S' -> S .`
    pub fn is_accept(&self, g: &Grammar) -> bool {
        self.rule == AUGMENTED_RULE && self.is_complete(g)
    }
}

/// A set of LR(0) items. The sorted representation makes two sets with the
/// same items equal and hash alike no matter how they were built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemSet(BTreeSet<DotProduction>);

impl FromIterator<DotProduction> for ItemSet {
    fn from_iter<T: IntoIterator<Item = DotProduction>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl ItemSet {
    pub fn iter(&self) -> impl Iterator<Item = &DotProduction> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, item: &DotProduction) -> bool {
        self.0.contains(item)
    }

    pub fn closure(&self, g: &Grammar) -> ItemSet {
        let mut items = self.0.clone();
        let mut q: Vec<DotProduction> = items.iter().cloned().collect();
        let mut expanded: HashSet<usize> = HashSet::new();

        while let Some(item) = q.pop() {
            let nt = match item.next_symbol(g).and_then(|s| g.non_terminal(s)) {
                Some(nt) => nt,
                None => continue,
            };
            if !expanded.insert(nt.index) {
                continue;
            }
            for &rule in &nt.productions {
                let new_item = DotProduction::new(rule);
                if items.insert(new_item) {
                    q.push(new_item);
                }
            }
        }

        ItemSet(items)
    }

    /// Advances every item whose next symbol is `symbol` and closes the
    /// result. An empty set means there is no transition on `symbol`.
    pub fn goto(&self, g: &Grammar, symbol: usize) -> ItemSet {
        let kernel: ItemSet = self
            .iter()
            .filter(|item| item.next_symbol(g) == Some(symbol))
            .map(|item| item.generate_next())
            .collect();
        if kernel.is_empty() {
            kernel
        } else {
            kernel.closure(g)
        }
    }

    /// Distinct symbols right after a dot, in symbol order.
    pub fn transition_symbols(&self, g: &Grammar) -> BTreeSet<usize> {
        self.iter().filter_map(|item| item.next_symbol(g)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LRState {
    pub kernel: ItemSet,
    /// The closure of `kernel`.
    pub items: ItemSet,
    pub edges: BTreeMap<usize, usize>,
}

impl LRState {
    fn new(kernel: ItemSet, items: ItemSet) -> Self {
        Self {
            kernel,
            items,
            edges: BTreeMap::new(),
        }
    }

    /// Items added by the closure, i.e. not part of the kernel.
    pub fn extend(&self) -> impl Iterator<Item = &DotProduction> {
        self.items.iter().filter(|item| !self.kernel.contains(item))
    }
}

/// The canonical collection of LR(0) states, in discovery order.
#[derive(Debug, Clone)]
pub struct LRFSM {
    pub states: Vec<LRState>,
    pub start: usize,
}

impl LRFSM {
    pub fn state_of(&self, items: &ItemSet) -> Option<usize> {
        self.states.iter().position(|s| &s.items == items)
    }
}

impl Grammar {
    pub fn to_lr0_fsm(&self) -> LRFSM {
        let start_kernel: ItemSet = std::iter::once(DotProduction::new(AUGMENTED_RULE)).collect();
        let start_items = start_kernel.closure(self);

        let mut index: HashMap<ItemSet, usize> = HashMap::new();
        index.insert(start_items.clone(), 0);
        let mut states = vec![LRState::new(start_kernel, start_items)];
        let mut q: VecDeque<usize> = VecDeque::new();
        q.push_back(0);

        while let Some(u) = q.pop_front() {
            for symbol in states[u].items.transition_symbols(self) {
                let kernel: ItemSet = states[u]
                    .items
                    .iter()
                    .filter(|item| item.next_symbol(self) == Some(symbol))
                    .map(|item| item.generate_next())
                    .collect();
                let items = kernel.closure(self);

                let v = match index.get(&items) {
                    Some(&v) => v,
                    None => {
                        let v = states.len();
                        index.insert(items.clone(), v);
                        states.push(LRState::new(kernel, items));
                        q.push_back(v);
                        v
                    }
                };
                states[u].edges.insert(symbol, v);
            }
        }
        debug!("LR(0) automaton has {} states", states.len());

        LRFSM { states, start: 0 }
    }
}
