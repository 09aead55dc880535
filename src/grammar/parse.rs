use tracing::{debug, trace};

use crate::Grammar;

use super::{GrammarError, MalformedRuleKind, END_MARK, EPSILON};

impl Grammar {
    /// Reads one rule per line: `LHS -> alt1 | alt2 | ...`. A line that starts
    /// with `|` continues the previous rule. Blank lines are skipped; any other
    /// malformed line rejects the whole input.
    pub fn parse(grammar: &str) -> Result<Self, GrammarError> {
        let mut raw_productions: Vec<(&str, Vec<Vec<&str>>)> = Vec::new();

        let mut previous_left: Option<&str> = None;
        for (i, line) in grammar.lines().enumerate() {
            let malformed =
                |kind: MalformedRuleKind| GrammarError::MalformedRule { line: i + 1, kind };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split("->").collect();
            if parts.len() > 2 {
                return Err(malformed(MalformedRuleKind::TooManyArrows));
            }
            let (left, rights): (&str, &str) = if parts.len() == 2 {
                let left_str = parts[0].trim();
                if left_str.is_empty() {
                    return Err(malformed(MalformedRuleKind::EmptyLeftSide));
                } else if left_str.split_whitespace().count() != 1 {
                    return Err(malformed(MalformedRuleKind::LeftSideContainsWhitespace));
                } else if left_str == EPSILON || left_str == END_MARK {
                    return Err(malformed(MalformedRuleKind::ReservedLeftSide));
                }
                (left_str, parts[1].trim())
            } else if let Some(rest) = line.strip_prefix('|') {
                match previous_left {
                    Some(left) => (left, rest.trim()),
                    None => return Err(malformed(MalformedRuleKind::NoPreviousLeftSide)),
                }
            } else {
                return Err(malformed(MalformedRuleKind::MissingArrow));
            };

            if rights.is_empty() {
                return Err(malformed(MalformedRuleKind::EmptyRightSide));
            }

            let mut alternatives = Vec::new();
            for right in rights.split('|') {
                let symbols: Vec<&str> = right.split_whitespace().collect();
                if symbols.is_empty() {
                    return Err(malformed(MalformedRuleKind::EmptyAlternative));
                }
                alternatives.push(symbols);
            }
            trace!("line {}: {} -> {:?}", i + 1, left, alternatives);

            previous_left = Some(left);
            raw_productions.push((left, alternatives));
        }

        let g = Self::from_rules(&raw_productions);
        debug!(
            "parsed {} non-terminals from {} rules",
            g.non_terminal_iter().count(),
            raw_productions.len()
        );
        Ok(g)
    }
}
