//! Quote / comment / escape scanning.
//!
//! Database text is read one character at a time through a small finite-state
//! machine. Both the database splitter (`database.rs`) and the clause
//! tokenizer (`clause.rs`) drive the same [`Scanner`], so they agree on what is
//! quoted, what is commented out, and what is escaped.
//!
//! ```text
//!            "                      #
//!   InQuotes <──────> Normal ──────────> InComment
//!                       ^                    │
//!                       └──────── \n ────────┘
//! ```
//!
//! ## Escapes
//!
//! A run of consecutive backslashes toggles specialness: an odd-length run
//! makes the next character literal, an even-length run leaves it special. The
//! run resets after any non-backslash character. Backslashes themselves are
//! reported as [`Step::Backslash`] so callers can keep the raw text intact for
//! the pattern compiler.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    Normal,
    InQuotes,
    InComment,
}

/// Classification of one scanned character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Part of a comment, including the opening `#` and the closing newline.
    Comment,
    /// A backslash inside an escape run.
    Backslash,
    /// An unescaped `"` that opened a quoted token.
    OpenQuote,
    /// An unescaped `"` that closed a quoted token.
    CloseQuote,
    /// Any other character between quotes.
    Quoted { c: char, escaped: bool },
    /// Any other character outside quotes and comments.
    Bare { c: char, escaped: bool },
}

#[derive(Debug, Clone)]
pub(crate) struct Scanner {
    state: State,
    backslashes: usize,
}

impl Scanner {
    pub fn new() -> Self {
        Scanner { state: State::Normal, backslashes: 0 }
    }

    #[cfg(test)]
    pub fn state(&self) -> State {
        self.state
    }

    /// Advance the machine by one character.
    pub fn step(&mut self, c: char) -> Step {
        if self.state == State::InComment {
            self.backslashes = 0;
            if c == '\n' {
                self.state = State::Normal;
            }
            return Step::Comment;
        }

        if c == '\\' {
            self.backslashes += 1;
            return Step::Backslash;
        }

        let escaped = self.backslashes % 2 == 1;
        self.backslashes = 0;

        match (self.state, c) {
            (State::Normal, '"') if !escaped => {
                self.state = State::InQuotes;
                Step::OpenQuote
            }
            (State::InQuotes, '"') if !escaped => {
                self.state = State::Normal;
                Step::CloseQuote
            }
            (State::Normal, '#') if !escaped => {
                self.state = State::InComment;
                Step::Comment
            }
            (State::InQuotes, _) => Step::Quoted { c, escaped },
            _ => Step::Bare { c, escaped },
        }
    }
}

/// Split `text` on every unescaped `delimiter` outside quotes and comments.
///
/// The pieces borrow from `text` and never include the delimiter itself. A
/// trailing piece is always returned, even if empty.
pub(crate) fn split_unquoted(text: &str, delimiter: char) -> Vec<&str> {
    let mut scanner = Scanner::new();
    let mut pieces = Vec::new();
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if let Step::Bare { c, escaped: false } = scanner.step(c) {
            if c == delimiter {
                pieces.push(&text[start..i]);
                start = i + c.len_utf8();
            }
        }
    }
    pieces.push(&text[start..]);
    pieces
}
