use tracing::debug;

use super::{Grammar, EPSILON};

impl Grammar {
    /// Rewrites every directly left-recursive non-terminal `A -> A α | β` into
    /// `A -> β A'` and `A' -> α A' | ε`. Indirect recursion is left as is.
    ///
    /// A production that is just `A` contributes `ε` as its α.
    pub fn eliminate_left_recursion(&self) -> Grammar {
        let mut rules: Vec<(String, Vec<Vec<String>>)> = Vec::new();
        let mut new_names: Vec<String> = Vec::new();

        for nt in self.non_terminal_iter() {
            let mut betas: Vec<Vec<String>> = Vec::new();
            let mut alphas: Vec<Vec<String>> = Vec::new();
            for production in &nt.productions {
                let names = self.production_to_vec_str(production);
                match production.split_first() {
                    Some((&first, rest)) if first == nt.index => {
                        if rest.is_empty() {
                            alphas.push(vec![EPSILON.to_string()]);
                        } else {
                            alphas.push(names[1..].iter().map(|s| s.to_string()).collect());
                        }
                    }
                    _ => betas.push(names.iter().map(|s| s.to_string()).collect()),
                }
            }

            if alphas.is_empty() {
                rules.push((nt.name.clone(), betas));
                continue;
            }

            let prime = self.get_symbol_prime_name(format!("{}'", nt.name), &new_names);
            new_names.push(prime.clone());
            debug!(
                "{} is left recursive: {} alpha(s), {} beta(s), introducing {}",
                nt.name,
                alphas.len(),
                betas.len(),
                prime
            );

            let mut productions: Vec<Vec<String>> = betas
                .into_iter()
                .map(|mut beta| {
                    beta.push(prime.clone());
                    beta
                })
                .collect();
            if productions.is_empty() {
                productions.push(vec![prime.clone()]);
            }

            let mut prime_productions: Vec<Vec<String>> = alphas
                .into_iter()
                .map(|mut alpha| {
                    alpha.push(prime.clone());
                    alpha
                })
                .collect();
            prime_productions.push(vec![EPSILON.to_string()]);

            rules.push((nt.name.clone(), productions));
            rules.push((prime, prime_productions));
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
    fn expression_grammar() {
        let g = Grammar::parse("E -> E + T | T\nT -> id").unwrap();
        let r = g.eliminate_left_recursion();

        assert_eq!(
            r.rules(),
            vec![
                ("E", vec![vec!["T", "E'"]]),
                ("E'", vec![vec!["+", "T", "E'"], vec!["ε"]]),
                ("T", vec![vec!["id"]]),
            ]
        );
        assert_eq!(r.start_symbol_name(), Some("E"));
    }

    #[test]
    fn keeps_relative_order_of_alphas_and_betas() {
        let g = Grammar::parse("A -> b | A x | c | A y").unwrap();
        let r = g.eliminate_left_recursion();

        assert_eq!(
            r.rules(),
            vec![
                ("A", vec![vec!["b", "A'"], vec!["c", "A'"]]),
                ("A'", vec![vec!["x", "A'"], vec!["y", "A'"], vec!["ε"]]),
            ]
        );
    }

    #[test]
    fn only_recursive_productions() {
        let g = Grammar::parse("A -> A a").unwrap();
        let r = g.eliminate_left_recursion();

        assert_eq!(
            r.rules(),
            vec![
                ("A", vec![vec!["A'"]]),
                ("A'", vec![vec!["a", "A'"], vec!["ε"]]),
            ]
        );
    }

    #[test]
    fn bare_self_reference_becomes_epsilon_alpha() {
        let g = Grammar::parse("A -> A | b").unwrap();
        let r = g.eliminate_left_recursion();

        assert_eq!(
            r.rules(),
            vec![
                ("A", vec![vec!["b", "A'"]]),
                ("A'", vec![vec!["ε", "A'"], vec!["ε"]]),
            ]
        );
    }

    #[test]
    fn prefix_of_name_is_not_recursion() {
        let g = Grammar::parse("A -> AB c | d\nAB -> e").unwrap();
        let r = g.eliminate_left_recursion();

        assert_eq!(r.rules(), g.rules());
    }

    #[test]
    fn indirect_recursion_is_untouched() {
        let g = Grammar::parse("A -> B x | a\nB -> A y | b").unwrap();
        let r = g.eliminate_left_recursion();

        assert_eq!(r.rules(), g.rules());
    }

    #[test]
    fn fresh_name_avoids_existing_symbols() {
        let g = Grammar::parse("A -> A a | A'\nA' -> b").unwrap();
        let r = g.eliminate_left_recursion();

        assert_eq!(
            r.rules(),
            vec![
                ("A", vec![vec!["A'", "A''"]]),
                ("A''", vec![vec!["a", "A''"], vec!["ε"]]),
                ("A'", vec![vec!["b"]]),
            ]
        );
    }

    #[test]
    fn input_is_not_modified() {
        let g = Grammar::parse("E -> E + T | T\nT -> id").unwrap();
        let before = g.clone();
        let _ = g.eliminate_left_recursion();

        assert_eq!(g, before);
    }
}
