/// The reason a line of grammar text was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedRuleKind {
    MissingArrow,
    TooManyArrows,
    EmptyLeftSide,
    LeftSideContainsWhitespace,
    ReservedLeftSide,
    EmptyRightSide,
    EmptyAlternative,
    NoPreviousLeftSide,
}

impl std::fmt::Display for MalformedRuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Self::MissingArrow => "missing \"->\"",
            Self::TooManyArrows => "too many \"->\"",
            Self::EmptyLeftSide => "empty left side",
            Self::LeftSideContainsWhitespace => "left side contains whitespace",
            Self::ReservedLeftSide => "reserved symbol on left side",
            Self::EmptyRightSide => "empty right side",
            Self::EmptyAlternative => "empty alternative",
            Self::NoPreviousLeftSide => "cannot find left side",
        };
        write!(f, "{}", msg)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// A line of grammar text could not be read as a rule. `line` is 1-based.
    MalformedRule { line: usize, kind: MalformedRuleKind },
    /// The requested start symbol is not a non-terminal of the grammar.
    UndeclaredStartSymbol(String),
    /// FIRST or FOLLOW sets passed to an analysis were computed for another
    /// grammar, for example the one a transformation started from.
    MismatchedSets(&'static str),
}

impl std::fmt::Display for GrammarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedRule { line, kind } => write!(f, "Line {}: {}", line, kind),
            Self::UndeclaredStartSymbol(name) => {
                write!(f, "start symbol \"{}\" is not a non-terminal", name)
            }
            Self::MismatchedSets(kind) => {
                write!(f, "{} sets were computed for a different grammar", kind)
            }
        }
    }
}

impl std::error::Error for GrammarError {}
