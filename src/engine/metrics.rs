//! Engine run metrics.
//!
//! This module defines a small set of structs used to observe and debug how a
//! run reached (or failed to reach) its fixed point.
//!
//! The intended usage is:
//!
//! - `Engine::execute` / `Engine::execute_with` for normal operation.
//! - `Engine::execute_verbose_with` for profiling, debugging rule databases,
//!   and inspecting which rules fired in each pass.
//!
//! ## Design notes
//!
//! - `PassMetrics::fired` only lists rules that substituted at least once, so a
//!   converged final pass carries an empty list.
//! - Rule names are `<database>:<n>` as assigned by `Database::parse`.

use std::time::Duration;

// --- Metrics -----------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Total elapsed time for the run.
    pub total: Duration,
    /// One entry per completed pass, in order.
    pub passes: Vec<PassMetrics>,
}

/// Timing and substitution counts for a single pass over every rule.
#[derive(Debug, Default, Clone)]
pub struct PassMetrics {
    /// Elapsed time for the pass.
    pub duration: Duration,
    /// Substitutions made by all rules during the pass.
    pub substitutions: usize,
    /// Rules that substituted during the pass, with their counts.
    pub fired: Vec<RuleFiring>,
}

/// Substitutions made by one rule in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFiring {
    pub rule: String,
    pub substitutions: usize,
}

impl RunMetrics {
    /// Sum of substitutions across all passes.
    pub fn substitutions(&self) -> usize {
        self.passes.iter().map(|p| p.substitutions).sum()
    }
}

/// Engine output bundled with timing information.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// The rewritten stream and its counters.
    pub rewrite: crate::Rewrite,
    /// Timing measurements for the run.
    pub metrics: RunMetrics,
}
