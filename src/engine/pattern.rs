//! Pattern token compilation.
//!
//! Every quoted token of a clause is compiled into one [`MatcherEntry`]. The
//! token text is a literal with optional operators mixed in:
//!
//! ```text
//! "x"        exactly one `x`
//! "x+"       one or more `x`
//! "x*"       zero or more `x`
//! "x{2,4}"   two to four `x`
//! "."        any single token
//! "a|b|c"    one of `a`, `b`, `c`
//! ".+$0"     one or more tokens of anything, bound to variable 0
//! "x{3}"     one to three `x` (the minimum keeps its current value)
//! "#1x"      internal variable 1, literal `1x`
//! "\."       a literal `.`
//! ```
//!
//! Operators are stripped from the literal text; escaped operators are kept.
//! The digits after `#` are read but stay in the literal. A position with
//! alternatives expands to its first alternative.
//! Integers inside `{m,n}`, `$n` and `#n` are read leniently: a malformed
//! number is 0.

use std::mem;

bitflags::bitflags! {
    /// Operators that appeared (unescaped) in a pattern token.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Operators: u8 {
        const ANY          = 1 << 0;
        const ONE_OR_MORE  = 1 << 1;
        const ZERO_OR_MORE = 1 << 2;
        const RANGE        = 1 << 3;
        const VARIABLE     = 1 << 4;
        const INTERNAL     = 1 << 5;
        const ALTERNATION  = 1 << 6;
    }
}

/// Tokens accepted at one pattern position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alternatives {
    /// Any token is accepted.
    Any,
    /// One of these literal tokens (never empty).
    Literals(Vec<String>),
}

/// Compiled form of one pattern position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherEntry {
    pub min_reps: usize,
    /// Upper repetition bound; `None` is unbounded.
    pub max_reps: Option<usize>,
    /// Variable this position binds (when matching) or reads (when expanding).
    pub variable: Option<usize>,
    /// Reserved for automatic variable renaming; no effect on matching.
    pub internal_variable: Option<usize>,
    pub alternatives: Alternatives,
    /// Text emitted for this position when its clause is expanded.
    pub literal: String,
    pub operators: Operators,
}

impl MatcherEntry {
    /// Returns true when `token` may be consumed at this position.
    pub fn accepts(&self, token: &str) -> bool {
        match &self.alternatives {
            Alternatives::Any => true,
            Alternatives::Literals(options) => options.iter().any(|o| o == token),
        }
    }

    /// Returns true when a position already holding `count` tokens may take one more.
    pub fn allows_another(&self, count: usize) -> bool {
        self.max_reps.is_none_or(|max| count < max)
    }
}

/// Compile one raw token (as written between quotes) into a [`MatcherEntry`].
pub(crate) fn compile_pattern(raw: &str) -> MatcherEntry {
    let mut min_reps = 1;
    let mut max_reps = Some(1);
    let mut variable = None;
    let mut internal_variable = None;
    let mut operators = Operators::empty();

    let mut alternatives: Vec<String> = Vec::new();
    let mut buffer = String::new();
    let mut backslashes = 0usize;
    let mut pos = 0;

    while let Some(c) = raw[pos..].chars().next() {
        pos += c.len_utf8();

        if c == '\\' {
            backslashes += 1;
            if backslashes == 2 {
                buffer.push('\\');
                backslashes = 0;
            }
            continue;
        }

        let escaped = backslashes == 1;
        backslashes = 0;
        if escaped {
            buffer.push(c);
            continue;
        }

        match c {
            '.' => operators |= Operators::ANY,
            '+' => {
                min_reps = 1;
                max_reps = None;
                operators |= Operators::ONE_OR_MORE;
            }
            '*' => {
                min_reps = 0;
                max_reps = None;
                operators |= Operators::ZERO_OR_MORE;
            }
            '{' => {
                let rest = &raw[pos..];
                let (body, consumed) = match rest.find('}') {
                    Some(end) => (&rest[..end], end + 1),
                    None => (rest, rest.len()),
                };
                pos += consumed;
                // Without a comma only the upper bound is set.
                if let Some((lo, hi)) = body.split_once(',') {
                    min_reps = lenient_int(lo);
                    max_reps = Some(lenient_int(hi));
                } else {
                    max_reps = Some(lenient_int(body));
                }
                max_reps = max_reps.map(|max| max.max(min_reps));
                operators |= Operators::RANGE;
            }
            '$' => {
                variable = Some(lenient_int(&raw[pos..]));
                operators |= Operators::VARIABLE;
                break;
            }
            '#' => {
                internal_variable = Some(lenient_int(&raw[pos..]));
                operators |= Operators::INTERNAL;
            }
            '|' => {
                alternatives.push(mem::take(&mut buffer));
                operators |= Operators::ALTERNATION;
            }
            _ => buffer.push(c),
        }
    }

    let (alternatives, literal) = if operators.contains(Operators::ANY) {
        (Alternatives::Any, buffer)
    } else {
        alternatives.push(buffer);
        let literal = alternatives[0].clone();
        (Alternatives::Literals(alternatives), literal)
    };

    MatcherEntry { min_reps, max_reps, variable, internal_variable, alternatives, literal, operators }
}

/// Read a leading (optionally signed) integer the way `atoi` does: surrounding
/// junk is ignored, no digits is 0, negative values clamp to 0.
fn lenient_int(text: &str) -> usize {
    let Some(caps) = crate::regex!(r"^\s*([+-]?)(\d+)").captures(text) else {
        return 0;
    };
    if &caps[1] == "-" {
        return 0;
    }
    caps[2].parse().unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literals(entry: &MatcherEntry) -> Vec<&str> {
        match &entry.alternatives {
            Alternatives::Any => panic!("expected literal alternatives"),
            Alternatives::Literals(v) => v.iter().map(String::as_str).collect(),
        }
    }

    #[test]
    fn plain_token_is_a_single_literal() {
        let e = compile_pattern("hello");
        assert_eq!((e.min_reps, e.max_reps), (1, Some(1)));
        assert_eq!(literals(&e), vec!["hello"]);
        assert_eq!(e.literal, "hello");
        assert!(e.operators.is_empty());
        assert!(e.variable.is_none() && e.internal_variable.is_none());
    }

    #[test]
    fn repetition_operators() {
        let plus = compile_pattern("x+");
        assert_eq!((plus.min_reps, plus.max_reps), (1, None));
        assert_eq!(literals(&plus), vec!["x"]);

        let star = compile_pattern("x*");
        assert_eq!((star.min_reps, star.max_reps), (0, None));

        let range = compile_pattern("x{2,4}");
        assert_eq!((range.min_reps, range.max_reps), (2, Some(4)));
        assert_eq!(literals(&range), vec!["x"]);

        let upper = compile_pattern("x{3}");
        assert_eq!((upper.min_reps, upper.max_reps), (1, Some(3)));
        assert_eq!(literals(&upper), vec!["x"]);

        let after_star = compile_pattern("x*{2}");
        assert_eq!((after_star.min_reps, after_star.max_reps), (0, Some(2)));

        let below_min = compile_pattern("x{0}");
        assert_eq!((below_min.min_reps, below_min.max_reps), (1, Some(1)));
    }

    #[test]
    fn malformed_ranges_are_lenient() {
        let e = compile_pattern("x{a,b}");
        assert_eq!((e.min_reps, e.max_reps), (0, Some(0)));

        let e = compile_pattern("x{2,q}");
        assert_eq!((e.min_reps, e.max_reps), (2, Some(2)));

        let e = compile_pattern("x{ 1 , 3 ");
        assert_eq!((e.min_reps, e.max_reps), (1, Some(3)));
        assert_eq!(literals(&e), vec!["x"]);
    }

    #[test]
    fn any_ignores_literal_text() {
        let e = compile_pattern(".");
        assert_eq!(e.alternatives, Alternatives::Any);
        assert!(e.accepts("whatever"));
        assert!(e.accepts(""));
    }

    #[test]
    fn alternation_splits_literals() {
        let e = compile_pattern("a|b|c");
        assert_eq!(literals(&e), vec!["a", "b", "c"]);
        assert_eq!(e.literal, "a");
        assert!(e.accepts("b"));
        assert!(!e.accepts("d"));
    }

    #[test]
    fn variable_terminates_the_token() {
        let e = compile_pattern(".+$12trailing");
        assert_eq!(e.variable, Some(12));
        assert_eq!((e.min_reps, e.max_reps), (1, None));
        assert_eq!(e.alternatives, Alternatives::Any);

        let e = compile_pattern("x$");
        assert_eq!(e.variable, Some(0));
        assert_eq!(literals(&e), vec!["x"]);
    }

    #[test]
    fn internal_variable_digits_stay_in_the_literal() {
        let e = compile_pattern("#7name");
        assert_eq!(e.internal_variable, Some(7));
        assert_eq!(literals(&e), vec!["7name"]);
        assert!(e.accepts("7name"));
        assert!(!e.accepts("name"));

        let e = compile_pattern("#x");
        assert_eq!(e.internal_variable, Some(0));
        assert_eq!(literals(&e), vec!["x"]);
    }

    #[test]
    fn escapes_make_operators_literal() {
        assert_eq!(literals(&compile_pattern(r"\.")), vec!["."]);
        assert_eq!(literals(&compile_pattern(r"a\|b")), vec!["a|b"]);
        assert_eq!(literals(&compile_pattern(r"\$5")), vec!["$5"]);
        assert_eq!(literals(&compile_pattern(r"\{1,2\}")), vec!["{1,2}"]);
        assert_eq!(literals(&compile_pattern(r"\\")), vec!["\\"]);
        assert_eq!(literals(&compile_pattern(r"\\+")), vec!["\\"]);
        assert!(compile_pattern(r"\+").operators.is_empty());
    }

    #[test]
    fn allows_another_respects_bounds() {
        let e = compile_pattern("x{1,2}");
        assert!(e.allows_another(1));
        assert!(!e.allows_another(2));
        assert!(compile_pattern("x*").allows_another(1_000));
    }
}
