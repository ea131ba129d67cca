use anyhow::Context;
use std::env;

/// Dispatcher settings, built once at startup and handed to the server.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: String,
    /// First path segment of `/<route>/:id`.
    pub route: String,
    /// Answer 400 instead of listing all orders when no route matches.
    pub reject_unrouted: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: "3000".into(),
            route: "restful-tasks".into(),
            reject_unrouted: false,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from `lookup`, which returns a variable's value if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let server_port = lookup("SERVER_PORT").unwrap_or(defaults.server_port);
        let route = lookup("ORDERS_ROUTE")
            .map(|r| r.trim_matches('/').to_string())
            .unwrap_or(defaults.route);
        let reject_unrouted = match lookup("ORDERS_REJECT_UNROUTED") {
            Some(v) => v
                .parse::<bool>()
                .with_context(|| format!("invalid ORDERS_REJECT_UNROUTED value `{v}`"))?,
            None => defaults.reject_unrouted,
        };
        if route.is_empty() || route.contains('/') {
            anyhow::bail!("ORDERS_ROUTE must be a single path segment, got `{route}`");
        }
        Ok(Self {
            server_port,
            route,
            reject_unrouted,
        })
    }
}
