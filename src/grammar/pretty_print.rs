use std::collections::BTreeSet;

use crowbook_text_processing::escape;
use serde::Serialize;

use super::{FirstSets, FollowSets, Grammar, EPSILON};

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutput<'a> {
    pub left: &'a str,
    pub rights: Vec<Vec<&'a str>>,
}

impl ProductionOutput<'_> {
    pub fn to_plaintext(&self, left_width: usize) -> String {
        format!(
            "{:<width$} -> {}",
            self.left,
            self.rights
                .iter()
                .map(|right| right.join(" "))
                .collect::<Vec<_>>()
                .join(" | "),
            width = left_width
        )
    }

    pub fn to_latex(&self, and_sign: bool) -> String {
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
                    .map(|s| escape::tex(*s))
                    .collect::<Vec<_>>()
                    .join(" \\ ")
            })
            .collect::<Vec<_>>()
            .join(" \\mid ");

        let output = left + &right;
        output.replace(EPSILON, "\\epsilon")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutputVec<'a> {
    productions: Vec<ProductionOutput<'a>>,
}

impl ProductionOutputVec<'_> {
    /// One `LHS -> alt1 | alt2` line per non-terminal. The text parses back
    /// into the same grammar.
    pub fn to_plaintext(&self) -> String {
        let left_max_len = self
            .productions
            .iter()
            .map(|p| p.left.chars().count())
            .max()
            .unwrap_or(0);
        self.productions
            .iter()
            .map(|s| s.to_plaintext(left_max_len))
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        std::iter::once("\\[\\begin{array}{cll}".to_string())
            .chain(self.productions.iter().map(|s| s.to_latex(true)))
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
            .map(|non_terminal| ProductionOutput {
                left: non_terminal.name.as_str(),
                rights: non_terminal
                    .productions
                    .iter()
                    .map(|production| self.production_to_vec_str(production))
                    .collect(),
            })
            .collect();
        ProductionOutputVec { productions }
    }

    /// Names of a set of symbols, sorted, with epsilon last.
    fn set_to_vec_str(&self, set: &BTreeSet<usize>) -> Vec<&str> {
        let mut names: Vec<&str> = set
            .iter()
            .filter(|&&idx| idx != super::grammar::EPSILON_INDEX)
            .map(|&idx| self.get_symbol_name(idx))
            .collect();
        names.sort();
        if set.contains(&super::grammar::EPSILON_INDEX) {
            names.push(EPSILON);
        }
        names
    }
}

#[derive(Debug, Clone, Serialize)]
struct SetOutput<'a> {
    name: &'a str,
    set: Vec<&'a str>,
}

/// FIRST or FOLLOW sets of every non-terminal, in declaration order.
#[derive(Debug, Clone, Serialize)]
pub struct SetOutputVec<'a> {
    kind: &'static str,
    data: Vec<SetOutput<'a>>,
}

impl SetOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        self.data
            .iter()
            .map(|s| format!("{}({}) = {{ {} }}", self.kind, s.name, s.set.join(", ")))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .data
            .iter()
            .map(|s| {
                format!(
                    "\\mathrm{{{}}}({}) &=& \\{{ {} \\}}",
                    self.kind,
                    escape::tex(s.name),
                    s.set
                        .iter()
                        .map(|t| escape::tex(*t))
                        .collect::<Vec<_>>()
                        .join(", ")
                        .replace(EPSILON, "\\epsilon")
                )
            })
            .collect::<Vec<_>>()
            .join("\\\\\n");

        "\\[\\begin{array}{rcl}\n".to_string() + &content + "\n\\end{array}\\]"
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Grammar {
    pub fn to_first_output_vec(&self, first: &FirstSets) -> SetOutputVec {
        let data = self
            .non_terminal_iter()
            .map(|nt| SetOutput {
                name: nt.name.as_str(),
                set: first
                    .get(nt.index)
                    .map(|set| self.set_to_vec_str(set))
                    .unwrap_or_default(),
            })
            .collect();
        SetOutputVec {
            kind: "FIRST",
            data,
        }
    }

    pub fn to_follow_output_vec(&self, follow: &FollowSets) -> SetOutputVec {
        let data = self
            .non_terminal_iter()
            .map(|nt| SetOutput {
                name: nt.name.as_str(),
                set: follow
                    .get(nt.index)
                    .map(|set| self.set_to_vec_str(set))
                    .unwrap_or_default(),
            })
            .collect();
        SetOutputVec {
            kind: "FOLLOW",
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
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

/// Nullable, FIRST and FOLLOW of every non-terminal side by side.
#[derive(Debug, Clone, Serialize)]
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
        let data = self
            .non_terminal_iter()
            .map(|non_terminal| NonTerminalOutput {
                name: non_terminal.name.as_str(),
                nullable: first.nullable(non_terminal.index),
                first: first
                    .get(non_terminal.index)
                    .map(|set| self.set_to_vec_str(set))
                    .unwrap_or_default(),
                follow: follow
                    .get(non_terminal.index)
                    .map(|set| self.set_to_vec_str(set))
                    .unwrap_or_default(),
            })
            .collect();
        NonTerminalOutputVec { data }
    }
}
