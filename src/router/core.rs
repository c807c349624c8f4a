//! Route table core - ordered pattern scan for one path prefix.

use super::params::PathParams;
use super::pattern::PatternMatcher;
use crate::error::RouteError;
use crate::handler::{Handler, SharedHandler};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// One registered route: a compiled pattern and the handler it selects.
///
/// Immutable once added to a [`RouteTable`].
pub struct PatternEntry {
    matcher: PatternMatcher,
    handler: SharedHandler,
}

impl PatternEntry {
    /// Compile `pattern` into an entry selecting `handler`
    ///
    /// # Errors
    ///
    /// Returns the `regex` compiler error for invalid pattern text.
    pub fn compile(pattern: &str, handler: SharedHandler) -> Result<Self, regex::Error> {
        Ok(Self {
            matcher: PatternMatcher::compile(pattern)?,
            handler,
        })
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        self.matcher.as_str()
    }

    #[must_use]
    pub fn handler(&self) -> &SharedHandler {
        &self.handler
    }
}

impl std::fmt::Debug for PatternEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternEntry")
            .field("pattern", &self.pattern())
            .finish_non_exhaustive()
    }
}

/// Result of scanning a route table for a path
pub enum DispatchOutcome<'a> {
    /// A pattern matched; its handler and the extracted parameters
    Matched {
        entry: &'a PatternEntry,
        params: PathParams,
    },
    /// No pattern matched, or the path is outside the table's prefix
    NoMatch,
}

impl DispatchOutcome<'_> {
    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self, DispatchOutcome::Matched { .. })
    }

    /// Extracted parameters, if matched
    #[must_use]
    pub fn params(&self) -> Option<&PathParams> {
        match self {
            DispatchOutcome::Matched { params, .. } => Some(params),
            DispatchOutcome::NoMatch => None,
        }
    }

    /// Pattern text of the matched entry
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        match self {
            DispatchOutcome::Matched { entry, .. } => Some(entry.pattern()),
            DispatchOutcome::NoMatch => None,
        }
    }
}

/// Ordered collection of patterns scoped under one path prefix.
///
/// # Precedence
///
/// Entries are scanned front to back and the first match wins. New entries
/// are inserted at the front, so the most recently registered pattern is
/// tried first and wins whenever two patterns overlap. Overlaps are neither
/// detected nor rejected; registering an equivalent pattern twice keeps both.
///
/// # Concurrency
///
/// Build the table during setup, then share it read-only (the dispatcher
/// holds it in an `Arc`). Adding patterns while requests are being served
/// is not supported: there is no mutation API on a mounted table.
pub struct RouteTable {
    prefix: String,
    entries: Vec<PatternEntry>,
}

impl RouteTable {
    /// Create an empty table for `prefix`
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pattern texts in precedence order
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(PatternEntry::pattern)
    }

    /// Compile `pattern` and register it ahead of every existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidPattern`] if the pattern does not compile.
    /// The table is left unchanged; the caller should abort startup rather
    /// than serve without the route.
    pub fn add_pattern<H>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, RouteError>
    where
        H: Handler + 'static,
    {
        self.add_shared(pattern, Arc::new(handler))
    }

    /// Same as [`add_pattern`](Self::add_pattern) for an already shared handler
    pub fn add_shared(
        &mut self,
        pattern: &str,
        handler: SharedHandler,
    ) -> Result<&mut Self, RouteError> {
        let entry = match PatternEntry::compile(pattern, handler) {
            Ok(entry) => entry,
            Err(source) => {
                error!(
                    prefix = %self.prefix,
                    pattern = %pattern,
                    error = %source,
                    "Route pattern failed to compile"
                );
                return Err(RouteError::InvalidPattern {
                    prefix: self.prefix.clone(),
                    pattern: pattern.to_string(),
                    source,
                });
            }
        };

        let group_names: Vec<&str> = entry.matcher.group_names().collect();
        info!(
            prefix = %self.prefix,
            pattern = %pattern,
            params = ?group_names,
            routes_count = self.entries.len() + 1,
            "Route pattern registered"
        );

        self.insert_first(entry);
        Ok(self)
    }

    /// Place an entry at the front of the scan order.
    ///
    /// This is the precedence rule: the last registered entry wins on overlap.
    pub fn insert_first(&mut self, entry: PatternEntry) {
        self.entries.insert(0, entry);
    }

    /// Remove the table prefix from `path`.
    ///
    /// The prefix must be a true leading substring; anything else yields `None`.
    #[must_use]
    pub fn strip_prefix<'p>(&self, path: &'p str) -> Option<&'p str> {
        path.strip_prefix(self.prefix.as_str())
    }

    /// Find the handler for `path` and extract its parameters.
    ///
    /// Any query string is ignored. The prefix is stripped, then entries are
    /// tried in precedence order until one matches.
    #[must_use]
    pub fn dispatch(&self, path: &str) -> DispatchOutcome<'_> {
        let path = path.split_once('?').map_or(path, |(p, _)| p);
        let Some(rest) = self.strip_prefix(path) else {
            debug!(
                prefix = %self.prefix,
                path = %path,
                "Path outside route table prefix"
            );
            return DispatchOutcome::NoMatch;
        };

        let match_start = Instant::now();
        for entry in &self.entries {
            if let Some(hit) = entry.matcher.captures(rest) {
                debug!(
                    prefix = %self.prefix,
                    path = %path,
                    pattern = %entry.pattern(),
                    matched = %hit.full_match,
                    duration_us = match_start.elapsed().as_micros(),
                    "Pattern matched"
                );
                return DispatchOutcome::Matched {
                    entry,
                    params: hit.params,
                };
            }
        }

        DispatchOutcome::NoMatch
    }

    /// One line for the prefix, then one per pattern in precedence order
    #[must_use]
    pub fn describe(&self) -> String {
        let mut out = format!("{} ({} pattern(s))\n", self.prefix, self.entries.len());
        for (i, entry) in self.entries.iter().enumerate() {
            let names: Vec<&str> = entry.matcher.group_names().collect();
            out.push_str(&format!("  #{i} {} params={:?}\n", entry.pattern(), names));
        }
        out
    }

    /// Print all registered patterns to stdout in precedence order
    pub fn dump_routes(&self) {
        print!("{}", self.describe());
    }
}

impl std::fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteTable")
            .field("prefix", &self.prefix)
            .field("entries", &self.entries)
            .finish()
    }
}
