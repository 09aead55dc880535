use tracing::debug;

use super::{grammar::Production, Grammar, EPSILON};

/// Longest symbol sequence every production in `group` starts with.
fn longest_common_prefix(group: &[&Production]) -> usize {
    let shortest = group.iter().map(|p| p.len()).min().unwrap_or(0);
    (0..shortest)
        .take_while(|&i| group.iter().all(|p| p[i] == group[0][i]))
        .count()
}

impl Grammar {
    /// Merges productions of a non-terminal that start with the same symbol
    /// behind a fresh `A_LF<k>` non-terminal, numbered in the order the
    /// leading symbols are first seen. Factored non-terminals are not
    /// factored again.
    pub fn left_factoring(&self) -> Grammar {
        let mut rules: Vec<(String, Vec<Vec<String>>)> = Vec::new();
        let mut new_names: Vec<String> = Vec::new();

        for nt in self.non_terminal_iter() {
            let mut groups: Vec<(usize, Vec<&Production>)> = Vec::new();
            for production in &nt.productions {
                let first = production[0];
                match groups.iter_mut().find(|(symbol, _)| *symbol == first) {
                    Some((_, group)) => group.push(production),
                    None => groups.push((first, vec![production])),
                }
            }

            let to_strings = |symbols: &[usize]| -> Vec<String> {
                self.production_to_vec_str(symbols)
                    .into_iter()
                    .map(String::from)
                    .collect()
            };

            let mut productions: Vec<Vec<String>> = Vec::new();
            let mut factored: Vec<(String, Vec<Vec<String>>)> = Vec::new();
            for (_, group) in groups {
                if group.len() == 1 {
                    productions.push(to_strings(&group[0][..]));
                    continue;
                }

                let prefix_len = longest_common_prefix(&group);
                let name = self.get_symbol_prime_name(
                    format!("{}_LF{}", nt.name, factored.len() + 1),
                    &new_names,
                );
                new_names.push(name.clone());
                debug!(
                    "{}: {} productions share a prefix of length {}, introducing {}",
                    nt.name,
                    group.len(),
                    prefix_len,
                    name
                );

                let mut head = to_strings(&group[0][..prefix_len]);
                head.push(name.clone());
                productions.push(head);

                let tails = group
                    .iter()
                    .map(|p| {
                        if p.len() == prefix_len {
                            vec![EPSILON.to_string()]
                        } else {
                            to_strings(&p[prefix_len..])
                        }
                    })
                    .collect();
                factored.push((name, tails));
            }

            rules.push((nt.name.clone(), productions));
            rules.extend(factored);
        }

        let mut g = Grammar::from_rules(&rules);
        g.start_symbol = self
            .start_symbol_name()
            .and_then(|name| g.get_symbol_index(name));
        g
    }
}

#[cfg(test)]
mod tests {
    use crate::Grammar;

    #[test]
    fn dangling_else() {
        let g = Grammar::parse("S -> i E t S | i E t S e S | a\nE -> b").unwrap();
        let r = g.left_factoring();

        assert_eq!(
            r.rules(),
            vec![
                ("S", vec![vec!["i", "E", "t", "S", "S_LF1"], vec!["a"]]),
                ("S_LF1", vec![vec!["ε"], vec!["e", "S"]]),
                ("E", vec![vec!["b"]]),
            ]
        );
    }

    #[test]
    fn groups_follow_discovery_order() {
        let g = Grammar::parse("A -> x b | y c | x d | z | y e").unwrap();
        let r = g.left_factoring();

        assert_eq!(
            r.rules(),
            vec![
                ("A", vec![vec!["x", "A_LF1"], vec!["y", "A_LF2"], vec!["z"]]),
                ("A_LF1", vec![vec!["b"], vec!["d"]]),
                ("A_LF2", vec![vec!["c"], vec!["e"]]),
            ]
        );
    }

    #[test]
    fn prefix_stops_at_first_mismatch() {
        let g = Grammar::parse("A -> a b c d | a b e d | a b c").unwrap();
        let r = g.left_factoring();

        assert_eq!(
            r.rules(),
            vec![
                ("A", vec![vec!["a", "b", "A_LF1"]]),
                ("A_LF1", vec![vec!["c", "d"], vec!["e", "d"], vec!["c"]]),
            ]
        );
    }

    #[test]
    fn single_level_only() {
        let r = Grammar::parse("A -> a b c | a b d | a e")
            .unwrap()
            .left_factoring();

        assert_eq!(
            r.rules(),
            vec![
                ("A", vec![vec!["a", "A_LF1"]]),
                ("A_LF1", vec![vec!["b", "c"], vec!["b", "d"], vec!["e"]]),
            ]
        );
    }

    #[test]
    fn nothing_to_factor() {
        let g = Grammar::parse("A -> a | b B\nB -> c").unwrap();

        assert_eq!(g.left_factoring().rules(), g.rules());
    }
}
