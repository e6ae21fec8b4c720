//! Backtracking clause matcher.
//!
//! A compiled clause is a list of [`MatcherEntry`] positions. Matching keeps
//! one repetition counter per position and a cursor into the input:
//!
//! ```text
//! positions:  [ "a"  ]  [ .+$0 ]  [ "b" ]
//! counters:      1         2         1
//! input:      a   x   y   b   c
//!             ^ start     ^ cursor after position 1
//! ```
//!
//! Forward progress fills each position only up to its `min_reps`, then moves
//! on. When a position cannot consume (mismatch, end of input, or `max_reps`
//! reached) the matcher *backs up*: the cursor returns by that position's
//! count, the count resets to 0, and the previous position is asked to take
//! one more token. Repetitions above `min_reps` are therefore only reached
//! through backtracking; `"x{1,5}"` followed by nothing takes exactly one `x`.
//! Existing rule databases depend on this, so it is kept as is.

use super::pattern::MatcherEntry;

/// A successful match of a clause against a token slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Index of the first matched token.
    pub offset: usize,
    /// Number of tokens consumed.
    pub length: usize,
    /// Captured spans by variable index; `None` means unbound in this match.
    pub bindings: Vec<Option<Vec<String>>>,
}

impl MatchResult {
    /// One past the last matched token.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    /// Highest variable index referenced by the clause, plus one.
    pub fn number_of_variables(&self) -> usize {
        self.bindings.len()
    }

    /// Tokens bound to `index`, if the variable was bound.
    pub fn binding(&self, index: usize) -> Option<&[String]> {
        self.bindings.get(index).and_then(|b| b.as_deref())
    }
}

/// Try every start offset from `start_offset` onward and return the first match.
pub(crate) fn find(entries: &[MatcherEntry], tokens: &[String], start_offset: usize) -> Option<MatchResult> {
    (start_offset..tokens.len()).find_map(|offset| match_at(entries, tokens, offset))
}

/// Match `entries` anchored at `start`.
pub(crate) fn match_at(entries: &[MatcherEntry], tokens: &[String], start: usize) -> Option<MatchResult> {
    if entries.is_empty() {
        return None;
    }

    let mut counts = vec![0usize; entries.len()];
    let mut position = 0;
    let mut cursor = start;

    loop {
        let mut extending = false;
        while extending || counts[position] < entries[position].min_reps {
            extending = false;
            let entry = &entries[position];
            let consumed =
                entry.allows_another(counts[position]) && tokens.get(cursor).is_some_and(|t| entry.accepts(t));

            if consumed {
                counts[position] += 1;
                cursor += 1;
                continue;
            }

            // Back up: give this position's tokens back and extend the previous one.
            cursor -= counts[position];
            counts[position] = 0;
            if position == 0 {
                return None;
            }
            position -= 1;
            extending = true;
        }

        position += 1;
        if position == entries.len() {
            break;
        }
    }

    tracing::trace!(offset = start, length = cursor - start, ?counts, "clause matched");
    Some(bind(entries, tokens, start, cursor, &counts))
}

fn bind(entries: &[MatcherEntry], tokens: &[String], start: usize, cursor: usize, counts: &[usize]) -> MatchResult {
    let number_of_variables = entries.iter().filter_map(|e| e.variable).max().map_or(0, |v| v + 1);
    let mut bindings = vec![None; number_of_variables];

    let mut at = start;
    for (entry, &count) in entries.iter().zip(counts) {
        if let Some(index) = entry.variable {
            if count > 0 {
                bindings[index] = Some(tokens[at..at + count].to_vec());
            }
        }
        at += count;
    }

    MatchResult { offset: start, length: cursor - start, bindings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::pattern::compile_pattern;

    fn pattern(raw: &[&str]) -> Vec<MatcherEntry> {
        raw.iter().map(|t| compile_pattern(t)).collect()
    }

    fn toks(s: &str) -> Vec<String> {
        s.split(' ').map(str::to_string).collect()
    }

    #[test]
    fn literal_sequence_matches_in_place() {
        let p = pattern(&["a", "b"]);
        let m = find(&p, &toks("x a b y"), 0).unwrap();
        assert_eq!((m.offset, m.length), (1, 2));
        assert_eq!(m.number_of_variables(), 0);
        assert!(find(&p, &toks("a x b"), 0).is_none());
    }

    #[test]
    fn search_starts_at_the_given_offset() {
        let p = pattern(&["a"]);
        let tokens = toks("a b a");
        assert_eq!(find(&p, &tokens, 1).unwrap().offset, 2);
        assert!(find(&p, &tokens, 3).is_none());
        assert!(find(&p, &tokens, 99).is_none());
    }

    #[test]
    fn plus_takes_the_minimum_when_nothing_follows() {
        let p = pattern(&["x+"]);
        let m = find(&p, &toks("x x y"), 0).unwrap();
        assert_eq!((m.offset, m.length), (0, 1));
    }

    #[test]
    fn backtracking_extends_earlier_positions() {
        let p = pattern(&["x+", "y"]);
        let m = find(&p, &toks("x x x y"), 0).unwrap();
        assert_eq!((m.offset, m.length), (0, 4));

        let p = pattern(&["a", ".*$0", "b"]);
        let m = find(&p, &toks("a p q b"), 0).unwrap();
        assert_eq!(m.length, 4);
        assert_eq!(m.binding(0), Some(&toks("p q")[..]));
    }

    #[test]
    fn range_limit_forces_a_later_start() {
        let p = pattern(&["x{1,2}", "y"]);
        // three x's exceed the range from offset 0; offset 1 works.
        let m = find(&p, &toks("x x x y"), 0).unwrap();
        assert_eq!((m.offset, m.length), (1, 3));
    }

    #[test]
    fn range_upper_bound_is_reached_only_by_backtracking() {
        let p = pattern(&["x{1,5}"]);
        let m = find(&p, &toks("x x x"), 0).unwrap();
        assert_eq!(m.length, 1);
    }

    #[test]
    fn alternation_matches_any_listed_token() {
        let p = pattern(&["a|b"]);
        assert!(match_at(&p, &toks("a"), 0).is_some());
        assert!(match_at(&p, &toks("b"), 0).is_some());
        assert!(match_at(&p, &toks("c"), 0).is_none());
        assert!(find(&p, &toks("c"), 0).is_none());
    }

    #[test]
    fn star_can_match_nothing() {
        let p = pattern(&["a", "x*$1", "b"]);
        let m = find(&p, &toks("a b"), 0).unwrap();
        assert_eq!(m.length, 2);
        assert_eq!(m.number_of_variables(), 2);
        assert_eq!(m.binding(0), None);
        assert_eq!(m.binding(1), None);
    }

    #[test]
    fn variables_capture_their_span() {
        let p = pattern(&[".$0"]);
        let m = find(&p, &toks("q"), 0).unwrap();
        assert_eq!(m.binding(0), Some(&toks("q")[..]));

        let p = pattern(&["(", ".+$1", ")", ".$0"]);
        let m = find(&p, &toks("z ( a b ) c"), 0).unwrap();
        assert_eq!((m.offset, m.length), (1, 5));
        assert_eq!(m.binding(1), Some(&toks("a b")[..]));
        assert_eq!(m.binding(0), Some(&toks("c")[..]));
    }

    #[test]
    fn input_end_is_a_mismatch() {
        let p = pattern(&["a", "b"]);
        assert!(find(&p, &toks("x a"), 0).is_none());
    }

    #[test]
    fn empty_clause_never_matches() {
        assert!(find(&[], &toks("a"), 0).is_none());
    }
}
