pub mod eliminate_left_recursion;
pub mod error;
pub mod first;
pub mod follow;
pub mod grammar;
pub mod left_factoring;
pub mod ll1_parsing_table;
pub mod parse;
pub mod pretty_print;

pub use error::{GrammarError, MalformedRuleKind};
pub use first::FirstSets;
pub use follow::FollowSets;
pub use grammar::Grammar;
pub use ll1_parsing_table::{LL1Conflict, LL1ParsingTable};

pub const EPSILON: &str = "ε";
pub const END_MARK: &str = "$";
