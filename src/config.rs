//! # Server Configuration
//!
//! TOML configuration for the `rexroute` binary: where to listen and which
//! template routes to serve.
//!
//! ```toml
//! bind_address = "127.0.0.1:8080"
//!
//! [[routes]]
//! prefix = "/"
//! pattern = 'users/(?P<userid>[^/]+)/?'
//! body = "Hello, {userid}!"
//!
//! [[routes]]
//! prefix = "/"
//! pattern = 'sites/(?P<sitename>[^/]+)/?'
//! body = "Welcome to {sitename}!"
//! ```
//!
//! Routes sharing a prefix go into one route table in file order, so a
//! later entry takes precedence over an earlier overlapping one.

use crate::error::RouteError;
use crate::router::RouteTable;
use crate::server::{intern_content_type, AppService};
use crate::template::TemplateHandler;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";

/// Top-level configuration file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address to bind
    pub bind_address: String,
    /// Template routes in registration order
    pub routes: Vec<RouteConfig>,
}

/// One template route
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    pub pattern: String,
    #[serde(default = "default_status")]
    pub status: u16,
    #[serde(default)]
    pub body: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

fn default_prefix() -> String {
    "/".to_string()
}

fn default_status() -> u16 {
    200
}

fn default_content_type() -> String {
    "text/plain".to_string()
}

impl RouteConfig {
    #[must_use]
    pub fn new(prefix: &str, pattern: &str, body: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            pattern: pattern.to_string(),
            status: default_status(),
            body: body.to_string(),
            content_type: default_content_type(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            routes: vec![
                RouteConfig::new("/", r"users/(?P<userid>[^/]+)/?", "Hello, {userid}!"),
                RouteConfig::new("/", r"sites/(?P<sitename>[^/]+)/?", "Welcome to {sitename}!"),
            ],
        }
    }
}

/// Semantic problem found in a parsed configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Index of the offending `[[routes]]` entry, if route-specific
    pub route: Option<usize>,
    pub message: String,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.route {
            Some(i) => write!(f, "routes[{}]: {}", i, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl ServerConfig {
    /// Parse a configuration from TOML text and validate it
    ///
    /// # Errors
    ///
    /// Fails on TOML syntax errors, unknown fields, or any validation issue.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: ServerConfig = toml::from_str(text).context("Failed to parse config")?;
        let issues = config.validate();
        if !issues.is_empty() {
            let details: Vec<String> = issues.iter().map(ToString::to_string).collect();
            bail!("Invalid config: {}", details.join("; "));
        }
        Ok(config)
    }

    /// Check everything serde cannot. Pattern syntax is checked when the
    /// tables are built, so the error names the failing prefix and pattern.
    #[must_use]
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.bind_address.trim().is_empty() {
            issues.push(ConfigIssue {
                route: None,
                message: "bind_address must not be empty".to_string(),
            });
        }
        for (i, route) in self.routes.iter().enumerate() {
            if !route.prefix.starts_with('/') {
                issues.push(ConfigIssue {
                    route: Some(i),
                    message: format!("prefix '{}' must start with '/'", route.prefix),
                });
            }
            if !(100..=599).contains(&route.status) {
                issues.push(ConfigIssue {
                    route: Some(i),
                    message: format!("status {} is not a valid HTTP status", route.status),
                });
            }
            if route.content_type.trim().is_empty() {
                issues.push(ConfigIssue {
                    route: Some(i),
                    message: "content_type must not be empty".to_string(),
                });
            }
        }
        issues
    }

    /// Build one route table per prefix, in order of first appearance
    ///
    /// # Errors
    ///
    /// Returns the first pattern that fails to compile.
    pub fn build_tables(&self) -> Result<Vec<RouteTable>, RouteError> {
        let mut tables: Vec<RouteTable> = Vec::new();
        for route in &self.routes {
            let handler = TemplateHandler::new(
                route.status,
                intern_content_type(&route.content_type),
                &route.body,
            );
            let table = match tables.iter().position(|t| t.prefix() == route.prefix) {
                Some(pos) => &mut tables[pos],
                None => {
                    tables.push(RouteTable::new(route.prefix.clone()));
                    let last = tables.len() - 1;
                    &mut tables[last]
                }
            };
            table.add_pattern(&route.pattern, handler)?;
        }
        Ok(tables)
    }

    /// Build the tables and mount them into a service
    ///
    /// # Errors
    ///
    /// Returns the first pattern that fails to compile.
    pub fn build_service(&self) -> Result<AppService, RouteError> {
        let mut service = AppService::new();
        for table in self.build_tables()? {
            service.mount_table(table);
        }
        Ok(service)
    }
}

/// Load and validate configuration from a TOML file
///
/// # Errors
///
/// Fails if the file cannot be read or does not hold a valid configuration.
pub fn load_config(path: &Path) -> Result<ServerConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    ServerConfig::from_toml(&content)
        .with_context(|| format!("Failed to load config file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_empty());
        let tables = config.build_tables().unwrap();
        assert_eq!(tables.len(), 1);
        let order: Vec<_> = tables[0].patterns().collect();
        assert_eq!(
            order,
            vec![r"sites/(?P<sitename>[^/]+)/?", r"users/(?P<userid>[^/]+)/?"]
        );
    }

    #[test]
    fn test_route_defaults() {
        let config = ServerConfig::from_toml(
            r#"
[[routes]]
pattern = 'a/(?P<x>\d+)'
"#,
        )
        .unwrap();
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        let route = &config.routes[0];
        assert_eq!(route.prefix, "/");
        assert_eq!(route.status, 200);
        assert_eq!(route.content_type, "text/plain");
        assert_eq!(route.body, "");
    }

    #[test]
    fn test_validation_collects_all_issues() {
        let config = ServerConfig {
            bind_address: String::new(),
            routes: vec![RouteConfig {
                prefix: "api".to_string(),
                pattern: "x".to_string(),
                status: 42,
                body: String::new(),
                content_type: " ".to_string(),
            }],
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 4);
        assert_eq!(issues[1].route, Some(0));
        assert!(issues[1].to_string().starts_with("routes[0]:"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(ServerConfig::from_toml("listen = \"0.0.0.0:1\"").is_err());
    }

    #[test]
    fn test_invalid_pattern_reported_with_prefix() {
        let mut config = ServerConfig::default();
        config.routes.push(RouteConfig::new("/api/", "(?P<broken", ""));
        let err = config.build_tables().unwrap_err();
        assert_eq!(err.prefix(), "/api/");
        assert_eq!(err.pattern(), "(?P<broken");
    }
}
