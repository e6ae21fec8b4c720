//! Rule databases.
//!
//! A database is the text of one rule file. Rules are separated by `;`,
//! clauses within a rule by `=`; both only count outside quotes and comments
//! and when not escaped:
//!
//! ```text
//! # arithmetic identities
//! ".$0" "\+" "0" : 3  =  ".$0" : 1 ;
//! "(" ".$0" ")" : 3  =  ".$0" : 1 ;
//! ```
//!
//! Blank clause segments (no tokens, no metrics) and rules left without
//! clauses are dropped, so trailing separators and comment-only sections are
//! harmless.

use super::clause::Clause;
use super::rule::Rule;
use super::scanner::split_unquoted;
use crate::error::LoadError;

/// The ordered rules of one database source.
#[derive(Debug, Clone)]
pub struct Database {
    name: String,
    rules: Vec<Rule>,
}

impl Database {
    /// Compile every rule in `text`. Rules are named `<name>:<n>` with `n`
    /// counting compiled rules from 1.
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Database, LoadError> {
        let name = name.into();
        let mut rules = Vec::new();

        for rule_text in split_unquoted(text, ';') {
            let mut clauses = Vec::new();
            for clause_text in split_unquoted(rule_text, '=') {
                let clause = Clause::compile(clause_text)?;
                if !clause.is_blank() {
                    clauses.push(clause);
                }
            }
            if clauses.is_empty() {
                continue;
            }
            rules.push(Rule::new(format!("{name}:{}", rules.len() + 1), clauses));
        }

        tracing::debug!(database = %name, rules = rules.len(), "parsed database");
        Ok(Database { name, rules })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}
