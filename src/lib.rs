//! Rule-based token-stream rewriting.
//!
//! A rule database lists groups of interchangeable token sequences ("clauses"),
//! each tagged with optional numeric metrics. The [`Engine`] compiles one or
//! more databases and rewrites an input token stream, replacing every matched
//! clause with the metric-optimal clause of its rule, until a full pass over
//! all rules changes nothing.
//!
//! ```text
//! "(" ".$0" ")" : 3  =  ".$0" : 1 ;      # drop redundant parentheses
//! ```
//!
//! Compiled engines are immutable and `Send + Sync`; share one `&Engine`
//! between threads and give each thread its own token stream.

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;

pub use api::{Direction, Objective, Options, PassSummary, Rewrite, RewriteVerbose, RunDetails};
pub use engine::{
    Alternatives, Clause, Database, Engine, MatchResult, MatcherEntry, Metric, Operators, Rule, RuleRun,
};
pub use error::LoadError;
