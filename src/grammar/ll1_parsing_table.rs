use crowbook_text_processing::escape::tex as escape_tex;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use crate::Grammar;

use super::{
    grammar::{END_MARK_INDEX, EPSILON_INDEX},
    FirstSets, FollowSets, GrammarError, EPSILON,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LL1Row<'a> {
    pub non_terminal: &'a str,
    /// One cell per terminal column, holding the chosen right side.
    pub cells: Vec<Option<Vec<&'a str>>>,
}

/// A cell that more than one production of the same non-terminal claimed.
/// The later production wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LL1Conflict<'a> {
    pub non_terminal: &'a str,
    pub terminal: &'a str,
    pub replaced: Vec<&'a str>,
    pub chosen: Vec<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LL1ParsingTable<'a> {
    terminals: Vec<&'a str>,
    rows: Vec<LL1Row<'a>>,
    conflicts: Vec<LL1Conflict<'a>>,
}

impl<'a> LL1ParsingTable<'a> {
    pub fn terminals(&self) -> &[&'a str] {
        &self.terminals
    }

    pub fn rows(&self) -> &[LL1Row<'a>] {
        &self.rows
    }

    pub fn conflicts(&self) -> &[LL1Conflict<'a>] {
        &self.conflicts
    }

    pub fn get(&self, non_terminal: &str, terminal: &str) -> Option<&[&'a str]> {
        let col = self.terminals.iter().position(|&t| t == terminal)?;
        self.rows
            .iter()
            .find(|row| row.non_terminal == non_terminal)?
            .cells[col]
            .as_deref()
    }

    pub fn to_plaintext(&self) -> String {
        let mut header: Vec<String> = vec![String::new()];
        header.extend(self.terminals.iter().map(|&t| t.to_string()));
        let mut output: Vec<Vec<String>> = vec![header];
        for row in &self.rows {
            let mut line: Vec<String> = vec![row.non_terminal.to_string()];
            line.extend(
                row.cells
                    .iter()
                    .map(|cell| cell.as_ref().map(|p| p.join(" ")).unwrap_or_default()),
            );
            output.push(line);
        }

        let width: Vec<usize> = (0..output[0].len())
            .map(|j| {
                output
                    .iter()
                    .map(|line| line[j].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        let table = output
            .iter()
            .map(|line| {
                line.iter()
                    .enumerate()
                    .map(|(i, s)| format!("{:>width$}", s, width = width[i]))
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect::<Vec<_>>()
            .join("\n");

        std::iter::once(table)
            .chain(self.conflicts.iter().map(|c| {
                format!(
                    "conflict at [{}, {}]: {} replaced by {}",
                    c.non_terminal,
                    c.terminal,
                    c.replaced.join(" "),
                    c.chosen.join(" ")
                )
            }))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        let mut header: Vec<String> = vec![format!(
            "\\[\\begin{{array}}{{c{}}}\n",
            "|l".repeat(self.terminals.len()),
        )];
        header.extend(
            self.terminals
                .iter()
                .map(|&t| format!("\\text{{{}}}", escape_tex(t))),
        );
        let header = header.join(" & ");

        let terminal_set: BTreeSet<&str> = self.terminals.iter().cloned().collect();
        let symbol_to_latex = |s: &str| -> String {
            if s == EPSILON {
                "\\epsilon".to_string()
            } else if terminal_set.contains(s) {
                format!("\\text{{{}}}", escape_tex(s))
            } else {
                escape_tex(s).to_string()
            }
        };

        let output = self
            .rows
            .iter()
            .map(|row| {
                std::iter::once(escape_tex(row.non_terminal).to_string())
                    .chain(row.cells.iter().map(|cell| match cell {
                        Some(p) => p
                            .iter()
                            .map(|s| symbol_to_latex(*s))
                            .collect::<Vec<_>>()
                            .join(" \\ "),
                        None => String::new(),
                    }))
                    .collect::<Vec<_>>()
                    .join(" & ")
            })
            .collect::<Vec<_>>()
            .join("\\\\\n");

        header + "\\\\\\hline\n" + &output + "\n\\end{array}\\]"
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Grammar {
    /// Fills `table[A][t]` with every production `p` of `A` for each `t` in
    /// FIRST(p), and for each `t` in FOLLOW(A) when `p` can derive epsilon.
    /// Productions are visited in declaration order and a later one
    /// overwrites an earlier one; each overwrite is recorded as a conflict.
    ///
    /// `first` and `follow` must have been computed for this grammar.
    pub fn generate_ll1_parsing_table(
        &self,
        first: &FirstSets,
        follow: &FollowSets,
    ) -> Result<LL1ParsingTable<'_>, GrammarError> {
        if !first.is_for(self) {
            return Err(GrammarError::MismatchedSets("FIRST"));
        }
        if !follow.is_for(self) {
            return Err(GrammarError::MismatchedSets("FOLLOW"));
        }

        let mut columns: Vec<usize> = self
            .terminal_iter()
            .map(|(idx, _)| idx)
            .filter(|&idx| idx != END_MARK_INDEX)
            .collect();
        columns.push(END_MARK_INDEX);
        let map: HashMap<usize, usize> = columns
            .iter()
            .enumerate()
            .map(|(col, &idx)| (idx, col))
            .collect();

        let mut rows: Vec<LL1Row> = Vec::new();
        let mut conflicts: Vec<LL1Conflict> = Vec::new();
        for nt in self.non_terminal_iter() {
            let mut cells: Vec<Option<usize>> = vec![None; columns.len()];
            for (i, production) in nt.productions.iter().enumerate() {
                let production_first = first.of_sequence(production);
                let mut lookaheads: BTreeSet<usize> = production_first
                    .iter()
                    .filter(|&&t| t != EPSILON_INDEX)
                    .cloned()
                    .collect();
                if production_first.contains(&EPSILON_INDEX) {
                    if let Some(f) = follow.get(nt.index) {
                        lookaheads.extend(f.iter().cloned());
                    }
                }

                for t in lookaheads {
                    let Some(&col) = map.get(&t) else {
                        continue;
                    };
                    if let Some(previous) = cells[col].replace(i) {
                        let conflict = LL1Conflict {
                            non_terminal: nt.name.as_str(),
                            terminal: self.get_symbol_name(t),
                            replaced: self.production_to_vec_str(&nt.productions[previous]),
                            chosen: self.production_to_vec_str(production),
                        };
                        debug!(
                            "LL(1) conflict at [{}, {}]: {:?} replaced by {:?}",
                            conflict.non_terminal,
                            conflict.terminal,
                            conflict.replaced,
                            conflict.chosen
                        );
                        conflicts.push(conflict);
                    }
                }
            }

            rows.push(LL1Row {
                non_terminal: nt.name.as_str(),
                cells: cells
                    .into_iter()
                    .map(|cell| cell.map(|i| self.production_to_vec_str(&nt.productions[i])))
                    .collect(),
            });
        }

        Ok(LL1ParsingTable {
            terminals: columns.iter().map(|&idx| self.get_symbol_name(idx)).collect(),
            rows,
            conflicts,
        })
    }
}
