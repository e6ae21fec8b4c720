//! Clause compilation.
//!
//! A clause is one phrasing of a rule: a list of quoted pattern tokens followed
//! by optional metric fields.
//!
//! ```text
//! "(" .+$0 ")"  : 3 : _   # tokens, then metric 0 = 3, metric 1 absent
//! ^^^^^^^^^^^^    ^^^^^^
//!  pattern        metric fields, each introduced by `:`
//! ```
//!
//! Scanning uses the shared [`Scanner`](super::scanner::Scanner):
//!
//! - Unescaped `"` opens/closes a token; an unescaped space inside quotes ends
//!   the current token and starts the next one.
//! - Outside quotes, `#` comments run to end of line and an unescaped `~` ends
//!   the clause.
//! - The first unescaped `:` outside quotes switches to metric mode. From then
//!   on only metric characters are allowed (see `metric::is_metric_char`).
//!
//! The raw tokens are compiled with [`compile_pattern`] and the metric fields
//! with [`parse_metric`].

use super::matcher::{self, MatchResult};
use super::metric::{Metric, is_metric_char, parse_metric};
use super::pattern::{MatcherEntry, compile_pattern};
use super::scanner::{Scanner, Step};
use super::template;
use crate::error::LoadError;

/// A compiled clause: matcher entries plus metric values.
#[derive(Debug, Clone)]
pub struct Clause {
    source: String,
    entries: Vec<MatcherEntry>,
    metrics: Vec<Metric>,
}

/// Tokens and metric fields of a clause, still as raw text.
#[derive(Debug, Default, PartialEq)]
struct RawClause<'a> {
    tokens: Vec<&'a str>,
    fields: Vec<&'a str>,
}

impl Clause {
    /// Compile a clause from its source text.
    pub fn compile(source: &str) -> Result<Clause, LoadError> {
        let raw = scan_clause(source)?;
        let entries: Vec<MatcherEntry> = raw.tokens.iter().map(|t| compile_pattern(t)).collect();
        let metrics = raw.fields.iter().map(|f| parse_metric(f, source)).collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            clause = source.trim(),
            tokens = ?raw.tokens,
            metrics = ?metrics.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "compiled clause"
        );

        Ok(Clause { source: source.trim().to_string(), entries, metrics })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn entries(&self) -> &[MatcherEntry] {
        &self.entries
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// Value of metric `index`; metrics beyond the declared ones are absent.
    pub fn metric(&self, index: usize) -> Metric {
        self.metrics.get(index).copied().unwrap_or(Metric::ABSENT)
    }

    /// True when the clause declares neither tokens nor metrics.
    pub fn is_blank(&self) -> bool {
        self.entries.is_empty() && self.metrics.is_empty()
    }

    /// True when no position uses a pattern operator.
    pub fn is_literal(&self) -> bool {
        self.entries.iter().all(|e| e.operators.is_empty())
    }

    /// First match at or after `start_offset`.
    pub fn find(&self, tokens: &[String], start_offset: usize) -> Option<MatchResult> {
        matcher::find(&self.entries, tokens, start_offset)
    }

    /// Match anchored at exactly `offset`.
    pub fn match_at(&self, tokens: &[String], offset: usize) -> Option<MatchResult> {
        matcher::match_at(&self.entries, tokens, offset)
    }

    /// Render this clause with the bindings captured by `matched`.
    pub fn expand(&self, matched: &MatchResult) -> Vec<String> {
        template::expand(&self.entries, matched)
    }
}

fn scan_clause(source: &str) -> Result<RawClause<'_>, LoadError> {
    let mut scanner = Scanner::new();
    let mut raw = RawClause::default();
    let mut token_start = 0;
    let mut field_start: Option<usize> = None;
    let mut end = source.len();
    let mut stray = false;

    let invalid = |found: char| LoadError::InvalidMetricText { found, clause: source.trim().to_string() };

    for (i, c) in source.char_indices() {
        let step = scanner.step(c);

        if let Some(start) = field_start {
            match step {
                Step::Comment => {}
                Step::Bare { c: ':', escaped: false } => {
                    raw.fields.push(&source[start..i]);
                    field_start = Some(i + 1);
                }
                Step::Bare { c: '~', escaped: false } => {
                    end = i;
                    break;
                }
                Step::Bare { c, .. } if is_metric_char(c) => {}
                Step::Bare { c, .. } | Step::Quoted { c, .. } => return Err(invalid(c)),
                Step::Backslash => return Err(invalid('\\')),
                Step::OpenQuote | Step::CloseQuote => return Err(invalid('"')),
            }
            continue;
        }

        match step {
            Step::OpenQuote => token_start = i + 1,
            Step::CloseQuote => raw.tokens.push(&source[token_start..i]),
            Step::Quoted { c: ' ', escaped: false } => {
                raw.tokens.push(&source[token_start..i]);
                token_start = i + 1;
            }
            Step::Bare { c: ':', escaped: false } => field_start = Some(i + 1),
            Step::Bare { c: '~', escaped: false } => break,
            Step::Bare { c, .. } if !c.is_whitespace() => stray = true,
            _ => {}
        }
    }

    if let Some(start) = field_start {
        if start < end {
            raw.fields.push(&source[start..end]);
        }
    }

    if stray {
        tracing::warn!(clause = source.trim(), "ignoring text outside quotes before the metric fields");
    }

    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::pattern::Alternatives;

    fn scan(source: &str) -> RawClause<'_> {
        scan_clause(source).unwrap()
    }

    #[test]
    fn tokens_between_quotes() {
        assert_eq!(scan(r#""a" "b" "c""#).tokens, vec!["a", "b", "c"]);
        assert_eq!(scan(r#""a b""#).tokens, vec!["a", "b"]);
        assert_eq!(scan(r#""""#).tokens, vec![""]);
        assert_eq!(scan(r#""a\ b""#).tokens, vec![r"a\ b"]);
        assert_eq!(scan(r#""say \"hi\"""#).tokens, vec!["say", r#"\"hi\""#]);
    }

    #[test]
    fn metric_fields_follow_colons() {
        let raw = scan(r#""lo" : 1 : _ : 2.5"#);
        assert_eq!(raw.tokens, vec!["lo"]);
        assert_eq!(raw.fields, vec![" 1 ", " _ ", " 2.5"]);

        // a dangling final colon adds nothing
        assert_eq!(scan(r#""a" : 1 :"#).fields, vec![" 1 "]);
        assert!(scan(r#""a""#).fields.is_empty());
    }

    #[test]
    fn tilde_ends_the_clause() {
        let raw = scan(r#""a" ~ "b" : 1"#);
        assert_eq!(raw.tokens, vec!["a"]);
        assert!(raw.fields.is_empty());

        assert_eq!(scan(r#""a" : 4 ~ junk"#).fields, vec![" 4 "]);
    }

    #[test]
    fn comments_are_skipped() {
        let raw = scan("\"a\" # \"b\" : 9\n \"c\" : 1 # note\n");
        assert_eq!(raw.tokens, vec!["a", "c"]);
        assert_eq!(raw.fields, vec![" 1 # note\n"]);
    }

    #[test]
    fn bad_metric_text_is_fatal() {
        let err = scan_clause(r#""a" : 1x"#).unwrap_err();
        assert!(matches!(err, LoadError::InvalidMetricText { found: 'x', .. }));
        assert!(scan_clause(r#""a" : 1 "b""#).is_err());
        assert!(Clause::compile(r#""a" : 1-"#).is_err());
    }

    #[test]
    fn compile_builds_entries_and_metrics() {
        let clause = Clause::compile(r#" "x"+ "y|z" : 2 : _ "#).unwrap();
        assert_eq!(clause.source(), r#""x"+ "y|z" : 2 : _"#);
        assert_eq!(clause.entries().len(), 2);
        assert_eq!(clause.metric(0).value(), Some(2.0));
        assert!(clause.metric(1).is_absent());
        assert!(clause.metric(7).is_absent());
        assert_eq!(clause.metrics().len(), 2);
    }

    #[test]
    fn operators_outside_quotes_are_ignored() {
        // `+` after the closing quote is not part of the token.
        let clause = Clause::compile(r#""x"+"#).unwrap();
        assert_eq!(clause.entries()[0].max_reps, Some(1));
        assert!(clause.is_literal());

        let clause = Clause::compile(r#""x+" "y""#).unwrap();
        assert_eq!(clause.entries()[0].max_reps, None);
        assert!(!clause.is_literal());
        assert_eq!(clause.entries()[1].alternatives, Alternatives::Literals(vec!["y".to_string()]));
    }

    #[test]
    fn blank_clauses() {
        assert!(Clause::compile("  \n # nothing here\n").unwrap().is_blank());
        let deletion = Clause::compile(" : 0 ").unwrap();
        assert!(!deletion.is_blank());
        assert!(deletion.entries().is_empty());
    }
}
