use crate::Engine;
use std::time::Duration;

/// Which way a metric should be optimized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Prefer the clause with the smallest metric value.
    Minimize,
    /// Prefer the clause with the largest metric value.
    Maximize,
    /// Leave the stream untouched.
    #[default]
    Neutral,
}

impl Direction {
    /// Map a signed integer to a direction: negative minimizes, positive
    /// maximizes, zero is neutral.
    pub fn from_sign(value: i64) -> Self {
        match value.signum() {
            -1 => Direction::Minimize,
            1 => Direction::Maximize,
            _ => Direction::Neutral,
        }
    }
}

/// What a run optimizes: one metric index in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Objective {
    /// Index of the metric field to optimize.
    pub metric: usize,
    pub direction: Direction,
}

impl Objective {
    pub fn new(metric: usize, direction: Direction) -> Self {
        Objective { metric, direction }
    }
}

/// Options that affect execution.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Stop after this many passes even without reaching a fixed point.
    /// `None` (the default) runs until convergence.
    pub max_passes: Option<usize>,
}

/// Result of [`Engine::execute`] and [`Engine::execute_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// The rewritten token stream.
    pub tokens: Vec<String>,
    /// Total substitutions made across all passes.
    pub substitutions: usize,
    /// Number of passes run, including the final pass that changed nothing.
    pub passes: usize,
    /// False only when `Options::max_passes` cut the run short.
    pub converged: bool,
}

/// A compact per-pass trace.
#[derive(Debug, Clone)]
pub struct PassSummary {
    pub pass: usize,
    pub duration: Duration,
    pub substitutions: usize,
    /// `(rule name, substitutions)` for each rule that fired in this pass.
    pub rules: Vec<(String, usize)>,
}

/// Additional details returned by [`Engine::execute_verbose_with`].
///
/// This is intentionally compact: it is meant for debugging rule databases and
/// performance inspection without dumping intermediate token streams.
#[derive(Debug, Clone)]
pub struct RunDetails {
    /// Total elapsed time.
    pub total: Duration,
    pub passes: Vec<PassSummary>,
    /// Number of rules the engine applied in each pass.
    pub rule_count: usize,
}

/// Result from [`Engine::execute_verbose_with`].
#[derive(Debug, Clone)]
pub struct RewriteVerbose {
    pub rewrite: Rewrite,
    pub details: RunDetails,
}

impl Engine {
    /// Rewrite `tokens` to a fixed point for `metric` in `direction`.
    ///
    /// # Example
    /// ```
    /// use rbe::{Direction, Engine};
    ///
    /// let engine = Engine::from_sources(&[r#""two" : 3 = "2" : 1 ;"#]).unwrap();
    /// let out = engine.execute(vec!["two".to_string()], 0, Direction::Minimize);
    /// assert_eq!(out.tokens, vec!["2"]);
    /// assert_eq!(out.substitutions, 1);
    /// ```
    pub fn execute(&self, tokens: Vec<String>, metric: usize, direction: Direction) -> Rewrite {
        self.execute_with(tokens, &Objective::new(metric, direction), &Options::default())
    }

    /// Rewrite `tokens` for `objective`, honoring `options`.
    pub fn execute_with(&self, tokens: Vec<String>, objective: &Objective, options: &Options) -> Rewrite {
        self.run_with_metrics(tokens, objective, options).rewrite
    }

    /// Like [`Engine::execute_with`], but also returns a per-pass trace.
    pub fn execute_verbose_with(&self, tokens: Vec<String>, objective: &Objective, options: &Options) -> RewriteVerbose {
        let run = self.run_with_metrics(tokens, objective, options);

        let passes = run
            .metrics
            .passes
            .iter()
            .enumerate()
            .map(|(idx, pass)| PassSummary {
                pass: idx + 1,
                duration: pass.duration,
                substitutions: pass.substitutions,
                rules: pass.fired.iter().map(|f| (f.rule.clone(), f.substitutions)).collect(),
            })
            .collect();

        let details = RunDetails { total: run.metrics.total, passes, rule_count: self.rule_count() };
        RewriteVerbose { rewrite: run.rewrite, details }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split(' ').map(str::to_string).collect()
    }

    #[test]
    fn direction_from_sign() {
        assert_eq!(Direction::from_sign(-1), Direction::Minimize);
        assert_eq!(Direction::from_sign(-42), Direction::Minimize);
        assert_eq!(Direction::from_sign(1), Direction::Maximize);
        assert_eq!(Direction::from_sign(7), Direction::Maximize);
        assert_eq!(Direction::from_sign(0), Direction::Neutral);
    }

    #[test]
    fn execute_returns_counters() {
        let engine = Engine::from_sources(&[r#""lo" : 1 = "hi" : 5 ;"#]).unwrap();
        let out = engine.execute(toks("lo lo"), 0, Direction::Maximize);

        assert_eq!(out.tokens, toks("hi hi"));
        assert_eq!(out.substitutions, 2);
        assert_eq!(out.passes, 2);
        assert!(out.converged);
    }

    #[test]
    fn verbose_includes_pass_trace() {
        let engine = Engine::from_sources(&[r#""lo" : 1 = "hi" : 5 ;"#]).unwrap();
        let res = engine.execute_verbose_with(
            toks("lo"),
            &Objective::new(0, Direction::Maximize),
            &Options::default(),
        );

        assert_eq!(res.rewrite.tokens, toks("hi"));
        assert_eq!(res.details.rule_count, 1);
        assert_eq!(res.details.passes.len(), 2);
        assert_eq!(res.details.passes[0].pass, 1);
        assert_eq!(res.details.passes[0].rules, vec![("db1:1".to_string(), 1)]);
        assert!(res.details.passes[1].rules.is_empty());
        assert!(res.details.passes.iter().all(|p| p.duration <= res.details.total));
    }
}
