//! Replacement rendering.
//!
//! When a rule substitutes, the target clause is rendered position by
//! position:
//!
//! ```text
//! target:   "f"   .$0   "g"        bindings: 0 -> [a b]
//! output:   f     a b   g
//! ```
//!
//! A position that reads a variable emits that variable's captured tokens, or
//! nothing if the variable is unbound in the current match. Any other position
//! emits its literal once, whatever its repetition bounds.

use super::matcher::MatchResult;
use super::pattern::MatcherEntry;

pub(crate) fn expand(target: &[MatcherEntry], matched: &MatchResult) -> Vec<String> {
    let mut out = Vec::with_capacity(target.len());
    for entry in target {
        match entry.variable {
            Some(index) => {
                if let Some(bound) = matched.binding(index) {
                    out.extend(bound.iter().cloned());
                }
            }
            None => out.push(entry.literal.clone()),
        }
    }
    out
}
