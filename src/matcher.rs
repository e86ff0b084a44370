//! Identifier Pattern Matching
//!
//! Callers select admin objects with identifier patterns:
//!
//! - the wildcard marker (`*` by default) matches any run of characters,
//!   including none
//! - the delimiter marker (`|` by default) is dropped from the pattern
//! - every other character matches itself
//!
//! A pattern must match the whole value, not a substring of it.
//!
//! ```
//! use vdb_admin::matcher::matches;
//!
//! assert!(matches("abc*", "abcdef"));
//! assert!(!matches("abc*", "xabc"));
//! ```

use regex::Regex;

use crate::admin::{AdminObject, DELIMITER, WILDCARD};
use crate::config::MatchingConfig;
use crate::error::{AdminError, AdminResult};

/// Pattern compiler for one wildcard/delimiter syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matcher {
    wildcard: char,
    delimiter: char,
}

impl Default for Matcher {
    fn default() -> Self {
        Matcher {
            wildcard: WILDCARD,
            delimiter: DELIMITER,
        }
    }
}

impl Matcher {
    pub fn new(wildcard: char, delimiter: char) -> Self {
        Matcher {
            wildcard,
            delimiter,
        }
    }

    pub fn from_config(config: &MatchingConfig) -> Self {
        Matcher::new(config.wildcard, config.delimiter)
    }

    /// Compile a caller pattern into a full-string matcher.
    pub fn compile(&self, pattern: &str) -> AdminResult<Pattern> {
        let mut expr = String::with_capacity(pattern.len() + 8);
        expr.push_str("(?s)^");
        let mut buf = [0u8; 4];
        for c in pattern.chars() {
            if c == self.wildcard {
                expr.push_str(".*");
            } else if c == self.delimiter {
                continue;
            } else {
                expr.push_str(&regex::escape(c.encode_utf8(&mut buf)));
            }
        }
        expr.push('$');

        let regex = Regex::new(&expr).map_err(AdminError::processing)?;
        Ok(Pattern {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Whether `value` matches `pattern`. A pattern that cannot be compiled
    /// matches nothing.
    pub fn matches(&self, pattern: &str, value: &str) -> bool {
        self.compile(pattern).is_ok_and(|p| p.matches(value))
    }

    /// Objects whose name or identifier matches, in input order.
    pub fn matched_collection<T, I>(&self, pattern: &str, objects: I) -> AdminResult<Vec<T>>
    where
        T: AdminObject,
        I: IntoIterator<Item = T>,
    {
        let pattern = self.compile(pattern)?;
        Ok(pattern.filter(objects))
    }
}

/// A compiled identifier pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// The pattern as the caller wrote it.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    /// Name or identifier match.
    pub fn matches_object<T: AdminObject + ?Sized>(&self, object: &T) -> bool {
        self.matches(object.name()) || self.matches(object.identifier())
    }

    /// Keep matching objects, preserving order. Each object appears at most
    /// once even when both its name and identifier match.
    pub fn filter<T, I>(&self, objects: I) -> Vec<T>
    where
        T: AdminObject,
        I: IntoIterator<Item = T>,
    {
        objects
            .into_iter()
            .filter(|o| self.matches_object(o))
            .collect()
    }
}

/// [`Matcher::matches`] with the default markers.
pub fn matches(pattern: &str, value: &str) -> bool {
    Matcher::default().matches(pattern, value)
}

/// [`Matcher::matched_collection`] with the default markers.
pub fn matched_collection<T, I>(pattern: &str, objects: I) -> AdminResult<Vec<T>>
where
    T: AdminObject,
    I: IntoIterator<Item = T>,
{
    Matcher::default().matched_collection(pattern, objects)
}
