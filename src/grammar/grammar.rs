use std::collections::HashMap;

use super::{GrammarError, END_MARK, EPSILON};

pub const EPSILON_INDEX: usize = 0;
pub const END_MARK_INDEX: usize = 1;

pub type Production = Vec<usize>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonTerminal {
    pub index: usize,
    pub name: String,
    pub productions: Vec<Production>,
}

impl NonTerminal {
    pub fn new(index: usize, name: String) -> Self {
        Self {
            index,
            name,
            productions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Epsilon,
    NonTerminal(NonTerminal),
    Terminal(String),
}

impl Symbol {
    pub fn non_terminal(&self) -> Option<&NonTerminal> {
        match self {
            Symbol::NonTerminal(e) => Some(e),
            _ => None,
        }
    }

    pub fn mut_non_terminal(&mut self) -> Option<&mut NonTerminal> {
        match self {
            Symbol::NonTerminal(e) => Some(e),
            _ => None,
        }
    }
}

/// A context-free grammar stored as a symbol arena.
///
/// Index 0 is always epsilon and index 1 the end marker. Non-terminals keep
/// their declaration order, which decides table tie-breaks and the default
/// start symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    pub symbols: Vec<Symbol>,
    pub symbol_table: HashMap<String, usize>,
    pub start_symbol: Option<usize>,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

impl Grammar {
    pub fn new() -> Self {
        let mut g = Self {
            symbols: Vec::new(),
            symbol_table: HashMap::new(),
            start_symbol: None,
        };

        g.symbols.push(Symbol::Epsilon);
        g.symbol_table.insert(EPSILON.to_string(), EPSILON_INDEX);

        g.add_terminal(END_MARK.to_string());

        g
    }

    /// Builds a grammar from named rules. Every left side becomes a
    /// non-terminal before any right side is looked at, so a name is a
    /// terminal only if it is never defined. Repeated left sides accumulate.
    ///
    /// Left sides must not be `ε` or `$`; the parser rejects those.
    pub fn from_rules<L, S>(rules: &[(L, Vec<Vec<S>>)]) -> Self
    where
        L: AsRef<str>,
        S: AsRef<str>,
    {
        let mut g = Self::new();

        let lefts: Vec<usize> = rules
            .iter()
            .map(|(left, _)| {
                let left: &str = left.as_ref();
                g.get_symbol_index(left)
                    .unwrap_or_else(|| g.add_non_terminal(left))
            })
            .collect();

        for (&left, (_, rights)) in lefts.iter().zip(rules) {
            for right in rights {
                let mut symbols: Production = right
                    .iter()
                    .map(|s| {
                        let s: &str = s.as_ref();
                        g.get_symbol_index(s)
                            .unwrap_or_else(|| g.add_terminal(s.to_string()))
                    })
                    .collect();
                if symbols.is_empty() {
                    symbols.push(EPSILON_INDEX);
                }
                g.add_production(left, symbols);
            }
        }

        let start = g.non_terminal_iter().next().map(|nt| nt.index);
        g.start_symbol = start;
        g
    }

    /// Returns a copy of this grammar that starts from `name` instead of the
    /// first declared non-terminal.
    pub fn with_start_symbol(&self, name: &str) -> Result<Self, GrammarError> {
        match self.get_symbol_index(name) {
            Some(idx) if self.is_non_terminal(idx) => {
                let mut g = self.clone();
                g.start_symbol = Some(idx);
                Ok(g)
            }
            _ => Err(GrammarError::UndeclaredStartSymbol(name.to_string())),
        }
    }

    pub fn terminal_iter(&self) -> impl Iterator<Item = (usize, &String)> {
        self.symbols.iter().enumerate().filter_map(|(idx, s)| {
            if let Symbol::Terminal(name) = s {
                Some((idx, name))
            } else {
                None
            }
        })
    }

    pub fn non_terminal_iter(&self) -> impl Iterator<Item = &NonTerminal> {
        self.symbols.iter().filter_map(|s| s.non_terminal())
    }

    pub fn is_non_terminal(&self, index: usize) -> bool {
        matches!(self.symbols.get(index), Some(Symbol::NonTerminal(_)))
    }

    pub fn get_symbol_index(&self, name: &str) -> Option<usize> {
        self.symbol_table.get(name).cloned()
    }

    pub fn get_non_terminal(&self, name: &str) -> Option<&NonTerminal> {
        self.get_symbol_index(name)
            .and_then(|idx| self.symbols[idx].non_terminal())
    }

    pub fn start_symbol_name(&self) -> Option<&str> {
        self.start_symbol.map(|idx| self.get_symbol_name(idx))
    }

    fn add_non_terminal(&mut self, name: &str) -> usize {
        let idx = self.symbols.len();
        self.symbols
            .push(Symbol::NonTerminal(NonTerminal::new(idx, name.to_string())));
        self.symbol_table.insert(name.to_string(), idx);
        idx
    }

    fn add_terminal(&mut self, name: String) -> usize {
        let idx = self.symbols.len();
        self.symbols.push(Symbol::Terminal(name.clone()));
        self.symbol_table.insert(name, idx);
        idx
    }

    fn add_production(&mut self, left: usize, right: Production) {
        if let Some(nt) = self.symbols[left].mut_non_terminal() {
            nt.productions.push(right);
        }
    }

    pub fn get_symbol_name(&self, index: usize) -> &str {
        match &self.symbols[index] {
            Symbol::Epsilon => EPSILON,
            Symbol::NonTerminal(e) => e.name.as_str(),
            Symbol::Terminal(e) => e.as_str(),
        }
    }

    pub fn production_to_vec_str(&self, production: &[usize]) -> Vec<&str> {
        production
            .iter()
            .map(|idx| self.get_symbol_name(*idx))
            .collect()
    }

    /// The named view of every rule, in declaration order.
    pub fn rules(&self) -> Vec<(&str, Vec<Vec<&str>>)> {
        self.non_terminal_iter()
            .map(|nt| {
                (
                    nt.name.as_str(),
                    nt.productions
                        .iter()
                        .map(|p| self.production_to_vec_str(p))
                        .collect(),
                )
            })
            .collect()
    }

    /// Appends apostrophes to `name` until it names no symbol of this grammar
    /// and is not in `taken`.
    pub fn get_symbol_prime_name(&self, mut name: String, taken: &[String]) -> String {
        while self.symbol_table.contains_key(&name) || taken.contains(&name) {
            name.push('\'');
        }
        name
    }
}
