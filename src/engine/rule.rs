//! Rules and rule execution.
//!
//! A rule is an ordered group of interchangeable clauses. For every metric the
//! rule caches which clause holds the smallest and the largest value, so
//! execution only has to look up the target clause:
//!
//! ```text
//! "lo" : 1  =  "mid" : 3  =  "hi" : 5       minimal[0] = 0, maximal[0] = 2
//! ```
//!
//! Caching scans clauses in order and only moves to a later clause when its
//! value is strictly better, so ties keep the earliest clause. A metric that
//! no clause declares defaults to the last clause.
//!
//! ## Execution
//!
//! [`Rule::execute`] walks the token stream left to right:
//!
//! ```text
//! (tokens, offset, clause) ─┬─ no clause >= `clause` matches at/after offset ─> done
//!                           ├─ match already optimal ─> (tokens, match end, i + 1)
//!                           └─ substitute best clause ─> (new tokens, offset + expansion, 0)
//! ```
//!
//! Every substitution builds a new token vector; the previous one is dropped.

use super::clause::Clause;
use crate::Direction;

/// An ordered group of interchangeable clauses with cached metric extremes.
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    clauses: Vec<Clause>,
    number_of_metrics: usize,
    minimal: Vec<usize>,
    maximal: Vec<usize>,
}

/// Output of one rule execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRun {
    pub tokens: Vec<String>,
    pub substitutions: usize,
}

impl Rule {
    /// Build a rule and cache its per-metric extreme clauses.
    pub fn new(name: impl Into<String>, clauses: Vec<Clause>) -> Self {
        let name = name.into();
        let number_of_metrics = clauses.iter().map(|c| c.metrics().len()).max().unwrap_or(0);
        let (minimal, maximal) = cache_extremes(&clauses, number_of_metrics);

        tracing::debug!(rule = %name, clauses = clauses.len(), ?minimal, ?maximal, "cached metric extremes");

        Rule { name, clauses, number_of_metrics, minimal, maximal }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Largest number of metric fields declared by any clause.
    pub fn number_of_metrics(&self) -> usize {
        self.number_of_metrics
    }

    /// Index of the clause with the smallest value for `metric`.
    pub fn minimal_clause(&self, metric: usize) -> Option<usize> {
        self.minimal.get(metric).copied()
    }

    /// Index of the clause with the largest value for `metric`.
    pub fn maximal_clause(&self, metric: usize) -> Option<usize> {
        self.maximal.get(metric).copied()
    }

    /// Target clause for `metric` in `direction`, if the rule can act at all.
    fn best_clause(&self, metric: usize, direction: Direction) -> Option<usize> {
        match direction {
            Direction::Minimize => self.minimal_clause(metric),
            Direction::Maximize => self.maximal_clause(metric),
            Direction::Neutral => None,
        }
    }

    /// Rewrite `tokens` with this rule from the start of the stream.
    pub fn execute(&self, tokens: Vec<String>, metric: usize, direction: Direction) -> RuleRun {
        self.execute_from(tokens, metric, direction, 0, 0)
    }

    /// Rewrite `tokens` starting at `start_offset`, considering clauses from
    /// `starting_clause` onward for the first match.
    pub fn execute_from(
        &self,
        mut tokens: Vec<String>,
        metric: usize,
        direction: Direction,
        mut start_offset: usize,
        mut starting_clause: usize,
    ) -> RuleRun {
        let mut substitutions = 0;
        let Some(best) = self.best_clause(metric, direction) else {
            return RuleRun { tokens, substitutions };
        };

        while start_offset < tokens.len() {
            let found = self
                .clauses
                .iter()
                .enumerate()
                .skip(starting_clause)
                .find_map(|(i, clause)| clause.find(&tokens, start_offset).map(|m| (i, m)));
            let Some((i, matched)) = found else {
                break;
            };

            if i == best || self.already_optimal(i, best, metric, direction) {
                start_offset = matched.end();
                starting_clause = i + 1;
                continue;
            }

            let expansion = self.clauses[best].expand(&matched);
            if matched.length == 0 && expansion.is_empty() {
                start_offset = matched.end();
                starting_clause = i + 1;
                continue;
            }

            tracing::trace!(
                rule = %self.name,
                from = i,
                to = best,
                offset = matched.offset,
                length = matched.length,
                ?expansion,
                "substitution"
            );

            // Zero-length matches resume past the insertion so they cannot re-fire in place.
            let resume = matched.offset + expansion.len() + usize::from(matched.length == 0);

            let mut next = Vec::with_capacity(tokens.len() - matched.length + expansion.len());
            let mut old = tokens.into_iter();
            next.extend(old.by_ref().take(matched.offset));
            next.extend(expansion);
            next.extend(old.skip(matched.length));

            tokens = next;
            substitutions += 1;
            start_offset = resume;
            starting_clause = 0;
        }

        RuleRun { tokens, substitutions }
    }

    /// True when clause `current` is already at least as good as `best` for
    /// `metric`. Absent values on either side never count as optimal.
    fn already_optimal(&self, current: usize, best: usize, metric: usize, direction: Direction) -> bool {
        let current = self.clauses[current].metric(metric).value();
        let best = self.clauses[best].metric(metric).value();
        match (current, best) {
            (Some(current), Some(best)) => match direction {
                Direction::Minimize => current <= best,
                Direction::Maximize => current >= best,
                Direction::Neutral => true,
            },
            _ => false,
        }
    }
}

fn cache_extremes(clauses: &[Clause], number_of_metrics: usize) -> (Vec<usize>, Vec<usize>) {
    let Some(last) = clauses.len().checked_sub(1) else {
        return (Vec::new(), Vec::new());
    };

    let mut minimal = vec![last; number_of_metrics];
    let mut maximal = vec![last; number_of_metrics];

    for metric in 0..number_of_metrics {
        let mut minimum = f64::INFINITY;
        let mut maximum = f64::NEG_INFINITY;
        for (index, clause) in clauses.iter().enumerate() {
            let Some(value) = clause.metric(metric).value() else {
                continue;
            };
            if value > maximum {
                maximum = value;
                maximal[metric] = index;
            }
            if value < minimum {
                minimum = value;
                minimal[metric] = index;
            }
        }
    }

    (minimal, maximal)
}
