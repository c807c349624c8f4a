//! Compiled path patterns with named capture groups.

use super::params::{ParamVec, PathParams};
use regex::Regex;
use std::sync::Arc;

/// One route pattern compiled into an executable matcher.
///
/// The pattern text is used as-is: no `^`/`$` anchoring is added, so a
/// pattern only rejects leading or trailing input when it says so itself.
/// Route patterns usually end with an optional separator (`/?`) instead.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    regex: Regex,
    /// `(group index, name)` for every non-empty named group, in group order.
    /// Index 0 (the whole match) and unnamed groups never appear here.
    named_groups: Vec<(usize, Arc<str>)>,
}

/// Successful match of a [`PatternMatcher`] against a candidate path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// The substring matched by the whole pattern
    pub full_match: String,
    /// Named groups with their matched values, in group order
    pub params: PathParams,
}

impl PatternMatcher {
    /// Compile a pattern
    ///
    /// # Errors
    ///
    /// Returns the `regex` compiler error if the text is not a valid
    /// regular expression. Callers attach route context to it.
    pub fn compile(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        let named_groups = regex
            .capture_names()
            .enumerate()
            .filter_map(|(i, name)| match name {
                Some(name) if i != 0 && !name.is_empty() => Some((i, Arc::from(name))),
                _ => None,
            })
            .collect();
        Ok(Self {
            regex,
            named_groups,
        })
    }

    /// The pattern text as registered
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Names of the groups that become parameter keys, in group order
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.named_groups.iter().map(|(_, name)| name.as_ref())
    }

    /// Cheap check without extracting groups
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Match `text` and extract every named group
    ///
    /// A named group that did not take part in the match (e.g. inside an
    /// untaken optional branch) is reported with an empty value, so the
    /// parameter keys always equal the pattern's group names.
    #[must_use]
    pub fn captures(&self, text: &str) -> Option<PatternMatch> {
        let caps = self.regex.captures(text)?;
        let full_match = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
        let params: ParamVec = self
            .named_groups
            .iter()
            .map(|(i, name)| {
                let value = caps.get(*i).map(|m| m.as_str()).unwrap_or_default();
                (Arc::clone(name), value.to_string())
            })
            .collect();
        Some(PatternMatch {
            full_match: full_match.to_string(),
            params: PathParams::from_vec(params),
        })
    }
}
