//! Rule compilation and rewriting engine.
//!
//! This module is the *public entry point* for the rewriting engine. It is
//! split into focused submodules under `src/engine/` while keeping public paths
//! stable (for example `crate::engine::Engine` and `crate::engine::Clause`).
//!
//! ## How the parts work together
//!
//! Loading and running a rule set is a pipeline:
//!
//! ```text
//! database text ──┐
//!                 │  split_unquoted(';' then '=')   (scanner.rs)
//!                 └───────────────┬───────────────
//!                                 │
//!            Clause::compile ─────┼─ scan tokens + metric fields (clause.rs)
//!                                 │  compile_pattern per token     (pattern.rs)
//!                                 │  parse_metric per field        (metric.rs)
//!                                 v
//!                       Rule::new (rule.rs)
//!                         - cache minimal / maximal clause per metric
//!                                 │
//!                                 v
//! tokens ──────────── Engine::run_with_metrics (driver.rs)
//!                       - apply every rule, pass after pass
//!                       - Rule::execute: find (matcher.rs),
//!                         expand (template.rs), splice
//!                       - stop at the fixed point
//!                                 │
//!                                 v
//!                              Rewrite
//! ```
//!
//! The engine leans on **saturation**: passes repeat until one makes no
//! substitution. One rule's rewrite can expose matches for another rule, so
//! rule order inside a pass matters but the fixed point does not depend on
//! any single pass.
//!
//! ## Responsibilities by module
//!
//! - `scanner.rs`: quote / comment / escape state machine and separator
//!   splitting.
//! - `metric.rs`: metric field parsing (`_` and empty are absent).
//! - `pattern.rs`: operator compilation of one pattern token.
//! - `clause.rs`: clause tokenizing and compilation.
//! - `matcher.rs`: backtracking match of a clause against tokens.
//! - `template.rs`: rendering a clause with captured variables.
//! - `rule.rs`: metric extreme caching and the substitute-and-rescan loop.
//! - `database.rs`: one source text to an ordered rule list.
//! - `driver.rs`: the `Engine` and its fixed-point pass loop.
//! - `metrics.rs`: timing and per-rule substitution counts for a run.
//!
//! ## Debugging
//!
//! The engine logs through `tracing`: `debug` for compiled clauses, cached
//! extremes and pass summaries, `trace` for every match and substitution. The
//! `rbe` binary reads its filter from `RBE_LOG`.

#[path = "engine/clause.rs"]
mod clause;
#[path = "engine/database.rs"]
mod database;
#[path = "engine/driver.rs"]
mod driver;
#[path = "engine/matcher.rs"]
mod matcher;
#[path = "engine/metric.rs"]
mod metric;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/pattern.rs"]
mod pattern;
#[path = "engine/rule.rs"]
mod rule;
#[path = "engine/scanner.rs"]
mod scanner;
#[path = "engine/template.rs"]
mod template;


pub use clause::Clause;
pub use database::Database;
pub use driver::Engine;
pub use matcher::MatchResult;
pub use metric::Metric;
pub use pattern::{Alternatives, MatcherEntry, Operators};
pub use rule::{Rule, RuleRun};
