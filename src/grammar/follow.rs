use std::collections::{BTreeMap, BTreeSet, VecDeque};

use tracing::{debug, trace};

use super::{
    grammar::{Symbol, END_MARK_INDEX, EPSILON_INDEX},
    FirstSets, Grammar, GrammarError,
};

/// FOLLOW set of every non-terminal, keyed by symbol index.
///
/// FOLLOW depends on the start symbol as well as the productions, and both
/// are remembered so the sets can be checked against the grammar they are
/// used with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowSets {
    sets: BTreeMap<usize, BTreeSet<usize>>,
    symbols: Vec<Symbol>,
    start_symbol: Option<usize>,
}

impl FollowSets {
    pub fn get(&self, non_terminal: usize) -> Option<&BTreeSet<usize>> {
        self.sets.get(&non_terminal)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &BTreeSet<usize>)> {
        self.sets.iter().map(|(&nt, set)| (nt, set))
    }

    /// Whether these sets were computed from `grammar`'s productions and
    /// start symbol.
    pub fn is_for(&self, grammar: &Grammar) -> bool {
        self.start_symbol == grammar.start_symbol && self.symbols == grammar.symbols
    }
}

impl Grammar {
    /// FOLLOW sets seeded with `$` in the start symbol's set.
    ///
    /// Fails with [`GrammarError::MismatchedSets`] when `first` was computed
    /// for another grammar.
    pub fn calculate_follow(&self, first: &FirstSets) -> Result<FollowSets, GrammarError> {
        let mut seed = FollowSets {
            sets: BTreeMap::new(),
            symbols: self.symbols.clone(),
            start_symbol: self.start_symbol,
        };
        if let Some(start) = self.start_symbol {
            seed.sets.entry(start).or_default().insert(END_MARK_INDEX);
        }
        self.extend_follow(first, seed)
    }

    /// Grows `follow` to the least fixpoint that contains it.
    ///
    /// Every occurrence `A -> .. B rest` adds `FIRST(rest) - ε` to FOLLOW(B)
    /// and, when `rest` can vanish, makes FOLLOW(A) a subset of FOLLOW(B). The
    /// first kind is applied once; the second is propagated with a worklist.
    /// A non-terminal is queued again only after its set grew, and each set
    /// is bounded by the terminals plus `$`, so the queue drains after at most
    /// |non-terminals| * (|terminals| + 1) re-queues.
    pub fn extend_follow(
        &self,
        first: &FirstSets,
        mut follow: FollowSets,
    ) -> Result<FollowSets, GrammarError> {
        if !first.is_for(self) {
            return Err(GrammarError::MismatchedSets("FIRST"));
        }
        if !follow.is_for(self) {
            return Err(GrammarError::MismatchedSets("FOLLOW"));
        }

        for nt in self.non_terminal_iter() {
            follow.sets.entry(nt.index).or_default();
        }

        let mut edges: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();
        for left in self.non_terminal_iter() {
            for production in &left.productions {
                for (i, &symbol) in production.iter().enumerate() {
                    if !self.is_non_terminal(symbol) {
                        continue;
                    }
                    let trailer = first.of_sequence(&production[i + 1..]);
                    follow
                        .sets
                        .entry(symbol)
                        .or_default()
                        .extend(trailer.iter().filter(|&&t| t != EPSILON_INDEX));
                    if trailer.contains(&EPSILON_INDEX) && symbol != left.index {
                        edges.entry(left.index).or_default().insert(symbol);
                    }
                }
            }
        }

        let mut queue: VecDeque<usize> = follow.sets.keys().cloned().collect();
        let mut queued: BTreeSet<usize> = queue.iter().cloned().collect();
        let mut pops = 0;
        while let Some(source) = queue.pop_front() {
            queued.remove(&source);
            pops += 1;
            let Some(targets) = edges.get(&source) else {
                continue;
            };
            let addition = follow.sets.get(&source).cloned().unwrap_or_default();
            for &target in targets {
                let set = follow.sets.entry(target).or_default();
                let before = set.len();
                set.extend(addition.iter().cloned());
                if set.len() > before {
                    trace!(
                        "FOLLOW({}) grew from FOLLOW({})",
                        self.get_symbol_name(target),
                        self.get_symbol_name(source)
                    );
                    if queued.insert(target) {
                        queue.push_back(target);
                    }
                }
            }
        }
        debug!("FOLLOW sets stable after {} worklist pops", pops);

        Ok(follow)
    }
}
