//! The engine driver.
//!
//! The `Engine` owns every compiled rule, in load order, across all
//! databases. Execution is a fixed-point loop over passes:
//!
//! ```text
//! tokens ──> pass 1: rule 1 → rule 2 → … → rule N  (sum substitutions)
//!                 │
//!                 ├─ substitutions > 0 ─> next pass
//!                 └─ substitutions = 0 ─> fixed point, return tokens
//! ```
//!
//! Nothing stops a rule set from cycling (one rule prefers X over Y, a later
//! one Y over X). The loop is unbounded unless `Options::max_passes` is set.

use super::database::Database;
use super::metrics::{PassMetrics, RuleFiring, RunMetrics, RunResult};
use super::rule::Rule;
use crate::error::LoadError;
use crate::{Objective, Options, Rewrite};
use std::path::Path;
use std::time::Instant;

/// Compiled rule set. Immutable once built and safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    databases: Vec<Database>,
}

impl Engine {
    /// Build an engine from already parsed databases, keeping their order.
    pub fn new(databases: Vec<Database>) -> Self {
        let engine = Engine { databases };
        tracing::debug!(databases = engine.databases.len(), rules = engine.rule_count(), "engine compiled");
        engine
    }

    /// Compile in-memory database sources. Databases are named `db1`, `db2`, …
    pub fn from_sources<S: AsRef<str>>(sources: &[S]) -> Result<Self, LoadError> {
        let databases = sources
            .iter()
            .enumerate()
            .map(|(i, source)| Database::parse(format!("db{}", i + 1), source.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(databases))
    }

    /// Read and compile database files. Each database is named after its file stem.
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self, LoadError> {
        let mut databases = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            tracing::debug!(path = %path.display(), "opening database file");
            let text = std::fs::read_to_string(path)
                .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
            let name =
                path.file_stem().map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());
            databases.push(Database::parse(name, &text)?);
        }
        Ok(Self::new(databases))
    }

    pub fn databases(&self) -> &[Database] {
        &self.databases
    }

    /// All rules in execution order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.databases.iter().flat_map(|db| db.rules())
    }

    pub fn rule_count(&self) -> usize {
        self.databases.iter().map(|db| db.rules().len()).sum()
    }

    /// Run passes until one makes no substitution (or the pass cap is hit)
    /// and return timing details.
    pub(crate) fn run_with_metrics(&self, tokens: Vec<String>, objective: &Objective, options: &Options) -> RunResult {
        let total_start = Instant::now();
        let Objective { metric, direction } = *objective;
        let mut metrics = RunMetrics::default();
        let mut tokens = tokens;
        let mut converged = false;

        while options.max_passes.is_none_or(|cap| metrics.passes.len() < cap) {
            let pass_start = Instant::now();
            let mut pass = PassMetrics::default();

            for rule in self.rules() {
                let run = rule.execute(tokens, metric, direction);
                tokens = run.tokens;
                if run.substitutions > 0 {
                    pass.substitutions += run.substitutions;
                    pass.fired.push(RuleFiring { rule: rule.name().to_string(), substitutions: run.substitutions });
                }
            }

            pass.duration = pass_start.elapsed();
            tracing::debug!(
                pass = metrics.passes.len() + 1,
                substitutions = pass.substitutions,
                tokens = tokens.len(),
                "pass finished"
            );

            let settled = pass.substitutions == 0;
            metrics.passes.push(pass);
            if settled {
                converged = true;
                break;
            }
        }

        if !converged {
            tracing::warn!(passes = metrics.passes.len(), "pass limit reached before a fixed point");
        }

        metrics.total = total_start.elapsed();
        let rewrite =
            Rewrite { tokens, substitutions: metrics.substitutions(), passes: metrics.passes.len(), converged };
        RunResult { rewrite, metrics }
    }
}
