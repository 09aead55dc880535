use std::collections::BTreeSet;

use tracing::{debug, trace};

use super::{
    grammar::{Symbol, EPSILON_INDEX},
    Grammar,
};

/// FIRST set of every symbol of a grammar, indexed by symbol index.
///
/// Members are symbol indices: terminals, `$`, and epsilon when the symbol
/// can derive the empty string. The sets remember the symbols they were
/// computed from, so they can be checked against the grammar they are used
/// with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstSets {
    sets: Vec<BTreeSet<usize>>,
    symbols: Vec<Symbol>,
}

impl FirstSets {
    pub fn get(&self, symbol: usize) -> Option<&BTreeSet<usize>> {
        self.sets.get(symbol)
    }

    pub fn nullable(&self, symbol: usize) -> bool {
        self.get(symbol)
            .map_or(false, |set| set.contains(&EPSILON_INDEX))
    }

    /// FIRST of a symbol sequence. Contains epsilon iff every symbol in it can
    /// derive epsilon, which includes the empty sequence. An index these sets
    /// do not know is taken as a terminal.
    pub fn of_sequence(&self, symbols: &[usize]) -> BTreeSet<usize> {
        let mut first = BTreeSet::new();
        for &symbol in symbols {
            match self.get(symbol) {
                Some(set) => first.extend(set.iter().filter(|&&s| s != EPSILON_INDEX)),
                None => {
                    first.insert(symbol);
                }
            }
            if !self.nullable(symbol) {
                return first;
            }
        }
        first.insert(EPSILON_INDEX);
        first
    }

    /// Whether these sets were computed from `grammar`'s productions.
    pub fn is_for(&self, grammar: &Grammar) -> bool {
        self.symbols == grammar.symbols
    }
}

impl Grammar {
    pub fn calculate_first(&self) -> FirstSets {
        let sets = self
            .symbols
            .iter()
            .enumerate()
            .map(|(idx, symbol)| match symbol {
                Symbol::Epsilon | Symbol::Terminal(_) => BTreeSet::from([idx]),
                Symbol::NonTerminal(_) => BTreeSet::new(),
            })
            .collect();
        let mut first = FirstSets {
            sets,
            symbols: self.symbols.clone(),
        };

        // Sets only grow and are bounded by the terminals plus epsilon, so
        // every round but the last adds at least one member somewhere.
        let mut rounds = 0;
        let mut changed = true;
        while changed {
            changed = false;
            rounds += 1;
            for nt in self.non_terminal_iter() {
                let set = nt
                    .productions
                    .iter()
                    .fold(BTreeSet::new(), |mut set, production| {
                        set.extend(first.of_sequence(production));
                        set
                    });

                if set.len() != first.sets[nt.index].len() {
                    trace!("FIRST({}) grew to {} symbols", nt.name, set.len());
                    changed = true;
                    first.sets[nt.index] = set;
                }
            }
        }
        debug!("FIRST sets stable after {} rounds", rounds);

        first
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::{grammar::grammar::EPSILON_INDEX, Grammar};

    fn first_of<'a>(g: &'a Grammar, first: &super::FirstSets, name: &str) -> BTreeSet<&'a str> {
        let idx = g.get_symbol_index(name).unwrap();
        first
            .get(idx)
            .unwrap()
            .iter()
            .map(|&s| g.get_symbol_name(s))
            .collect()
    }

    #[test]
    fn expression_grammar() {
        let g = Grammar::parse("E -> T E'\nE' -> + T E' | ε\nT -> id").unwrap();
        let first = g.calculate_first();

        assert_eq!(first_of(&g, &first, "T"), BTreeSet::from(["id"]));
        assert_eq!(first_of(&g, &first, "E'"), BTreeSet::from(["+", "ε"]));
        assert_eq!(first_of(&g, &first, "E"), BTreeSet::from(["id"]));
        assert_eq!(first_of(&g, &first, "+"), BTreeSet::from(["+"]));
    }

    #[test]
    fn nullable_chain() {
        let g = Grammar::parse("S -> A B c\nA -> a | ε\nB -> b | ε").unwrap();
        let first = g.calculate_first();

        assert_eq!(first_of(&g, &first, "S"), BTreeSet::from(["a", "b", "c"]));
        assert!(!first.nullable(g.get_symbol_index("S").unwrap()));
    }

    #[test]
    fn every_symbol_nullable() {
        let g = Grammar::parse("S -> A B\nA -> a | ε\nB -> ε").unwrap();
        let first = g.calculate_first();

        assert_eq!(first_of(&g, &first, "S"), BTreeSet::from(["a", "ε"]));
        assert_eq!(first_of(&g, &first, "B"), BTreeSet::from(["ε"]));
    }

    #[test]
    fn self_reference_terminates() {
        let g = Grammar::parse("A -> A a | b").unwrap();
        let first = g.calculate_first();

        assert_eq!(first_of(&g, &first, "A"), BTreeSet::from(["b"]));
    }

    #[test]
    fn mutual_reference_reaches_fixpoint() {
        let g = Grammar::parse("A -> B x | a\nB -> A y | b | ε").unwrap();
        let first = g.calculate_first();

        assert_eq!(first_of(&g, &first, "A"), BTreeSet::from(["a", "b", "x"]));
        assert_eq!(first_of(&g, &first, "B"), BTreeSet::from(["a", "b", "x", "ε"]));
    }

    #[test]
    fn unproductive_cycle_is_empty() {
        let g = Grammar::parse("A -> B\nB -> A").unwrap();
        let first = g.calculate_first();

        assert!(first_of(&g, &first, "A").is_empty());
        assert!(first_of(&g, &first, "B").is_empty());
    }

    #[test]
    fn sequence_first() {
        let g = Grammar::parse("S -> A b\nA -> a | ε").unwrap();
        let first = g.calculate_first();
        let a = g.get_symbol_index("A").unwrap();
        let b = g.get_symbol_index("b").unwrap();

        assert_eq!(first.of_sequence(&[a, b]).len(), 2);
        assert!(first.nullable(EPSILON_INDEX));
        assert!(first.of_sequence(&[]).contains(&EPSILON_INDEX));
        assert!(first.of_sequence(&[a]).contains(&EPSILON_INDEX));
    }

    #[test]
    fn unknown_index_reads_as_terminal() {
        let g = Grammar::parse("S -> a").unwrap();
        let first = g.calculate_first();
        let a = g.get_symbol_index("a").unwrap();

        assert_eq!(first.get(100), None);
        assert!(!first.nullable(100));
        assert_eq!(first.of_sequence(&[100, a]), BTreeSet::from([100]));
    }

    #[test]
    fn sets_know_their_grammar() {
        let g = Grammar::parse("A -> A a | b").unwrap();
        let first = g.calculate_first();

        assert!(first.is_for(&g));
        assert!(first.is_for(&g.with_start_symbol("A").unwrap()));
        assert!(!first.is_for(&g.eliminate_left_recursion()));
        assert!(!first.is_for(&Grammar::parse("A -> b | A a").unwrap()));
    }
}
