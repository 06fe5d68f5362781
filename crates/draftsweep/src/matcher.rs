use regex::{Regex, RegexBuilder};

use crate::error::ConfigError;

/// Ordered, case-insensitive body patterns. Immutable once compiled.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<Regex>,
}

impl PatternSet {
    /// Compiles every pattern up front. The first malformed pattern aborts
    /// compilation so bad configuration never reaches a per-message check.
    pub fn compile<I, S>(patterns: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| ConfigError::InvalidPattern {
                        pattern: pattern.to_string(),
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// True iff at least one pattern matches anywhere in `body`.
    /// An absent or empty body never matches.
    pub fn matches(&self, body: Option<&str>) -> bool {
        match body {
            Some(body) if !body.is_empty() => self.patterns.iter().any(|re| re.is_match(body)),
            _ => false,
        }
    }

    /// Source text of the first pattern matching `body`, for diagnostics.
    pub fn first_match(&self, body: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|re| re.is_match(body))
            .map(|re| re.as_str())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
