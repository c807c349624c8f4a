use std::fmt;

/// Route registration error
///
/// Returned by [`RouteTable::add_pattern`](crate::router::RouteTable::add_pattern)
/// and the `register_route*` helpers. A route table that failed to build
/// must not be served; callers are expected to abort startup.
#[derive(Debug)]
pub enum RouteError {
    /// The pattern is not a valid regular expression
    InvalidPattern {
        /// Prefix of the table the pattern was registered under
        prefix: String,
        /// The rejected pattern text
        pattern: String,
        /// Compiler diagnostic from the `regex` crate
        source: regex::Error,
    },
}

impl RouteError {
    /// The pattern text that caused the error
    #[must_use]
    pub fn pattern(&self) -> &str {
        match self {
            RouteError::InvalidPattern { pattern, .. } => pattern,
        }
    }

    /// The table prefix the failing pattern was registered under
    #[must_use]
    pub fn prefix(&self) -> &str {
        match self {
            RouteError::InvalidPattern { prefix, .. } => prefix,
        }
    }
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::InvalidPattern {
                prefix,
                pattern,
                source,
            } => {
                write!(
                    f,
                    "invalid route pattern '{}' under prefix '{}': {}",
                    pattern, prefix, source
                )
            }
        }
    }
}

impl std::error::Error for RouteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RouteError::InvalidPattern { source, .. } => Some(source),
        }
    }
}
