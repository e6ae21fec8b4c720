//! Metric field parsing.
//!
//! A clause carries an ordered list of metric fields, written after its tokens
//! and separated by `:`. Each field is either a number or *absent*:
//!
//! ```text
//! "a" "b" : 3.5 : _ : -2   # metric 0 = 3.5, metric 1 absent, metric 2 = -2
//! ```
//!
//! Absent is not zero. Rules ignore absent values when choosing the optimal
//! clause for a metric.

use crate::error::LoadError;

/// Raw value that encodes an absent metric in database files.
pub(crate) const ABSENT_SENTINEL: f64 = -1.0;

/// A single metric value of a clause.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metric(Option<f64>);

impl Metric {
    /// The absent metric.
    pub const ABSENT: Metric = Metric(None);

    /// Build a metric from a raw value; the sentinel `-1.0` is absent.
    pub fn from_raw(value: f64) -> Self {
        if value == ABSENT_SENTINEL { Metric(None) } else { Metric(Some(value)) }
    }

    pub fn value(self) -> Option<f64> {
        self.0
    }

    pub fn is_absent(self) -> bool {
        self.0.is_none()
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("_"),
        }
    }
}

/// Returns true when `c` may appear (outside comments) in a metric section.
pub(crate) fn is_metric_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '_' | '-' | ' ' | '\t' | '\n' | '\r')
}

/// Parse one metric field.
///
/// `#` comments (to end of line) and whitespace are stripped first. An
/// underscore anywhere in the field marks the metric absent, as does a field
/// that is empty after stripping. Anything else must be a complete decimal
/// literal.
pub(crate) fn parse_metric(field: &str, clause: &str) -> Result<Metric, LoadError> {
    if field.contains('_') {
        return Ok(Metric::ABSENT);
    }

    let mut cleaned = String::with_capacity(field.len());
    let mut comment = false;
    for c in field.chars() {
        match c {
            '#' => comment = true,
            '\n' => comment = false,
            ' ' | '\t' | '\r' => {}
            _ if !comment => cleaned.push(c),
            _ => {}
        }
    }

    if cleaned.is_empty() {
        return Ok(Metric::ABSENT);
    }

    let invalid = || LoadError::InvalidMetric { value: cleaned.clone(), clause: clause.trim().to_string() };
    if !crate::regex!(r"^-?(?:\d+\.?\d*|\.\d+)$").is_match(&cleaned) {
        return Err(invalid());
    }
    let value: f64 = cleaned.parse().map_err(|_| invalid())?;
    Ok(Metric::from_raw(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(field: &str) -> Metric {
        parse_metric(field, "\"x\"").unwrap()
    }

    #[test]
    fn parses_plain_numbers() {
        assert_eq!(parse("3").value(), Some(3.0));
        assert_eq!(parse(" 2.5\t").value(), Some(2.5));
        assert_eq!(parse("-4").value(), Some(-4.0));
        assert_eq!(parse(".5").value(), Some(0.5));
        assert_eq!(parse("7.").value(), Some(7.0));
    }

    #[test]
    fn underscore_and_empty_are_absent() {
        assert!(parse("_").is_absent());
        assert!(parse(" 1_ ").is_absent());
        assert!(parse("").is_absent());
        assert!(parse("   ").is_absent());
    }

    #[test]
    fn sentinel_value_is_absent() {
        assert!(parse("-1").is_absent());
        assert!(parse("-1.0").is_absent());
        assert_eq!(parse("-1.5").value(), Some(-1.5));
    }

    #[test]
    fn comments_are_stripped() {
        assert_eq!(parse(" 4 # four\n").value(), Some(4.0));
        assert_eq!(parse("# leading\n 9").value(), Some(9.0));
    }

    #[test]
    fn garbage_is_rejected() {
        let err = parse_metric("1-2", "\"a\" : 1-2").unwrap_err();
        assert!(matches!(err, LoadError::InvalidMetric { ref value, .. } if value == "1-2"));
        assert!(parse_metric("..", "\"a\"").is_err());
        assert!(parse_metric("-", "\"a\"").is_err());
    }

    #[test]
    fn metric_alphabet() {
        for c in "0123456789._- \t\n".chars() {
            assert!(is_metric_char(c), "{c:?}");
        }
        for c in "abc+e:\"\\".chars() {
            assert!(!is_metric_char(c), "{c:?}");
        }
    }
}
