//! Node Configuration
//!
//! Every node is started from the same binary; the role decides which router it
//! serves. Values come from environment variables, and `--flag value` pairs on the
//! command line take precedence over them.
//!
//! | Flag | Variable | Default |
//! |---|---|---|
//! | `--role` | `NODE_ROLE` | required |
//! | `--bind` | `NODE_BIND` | `127.0.0.1:<role port>` |
//! | `--advertise` | `NODE_ADVERTISE` | `http://<bind>` |
//! | `--coordinator` | `COORDINATOR_URL` | `http://127.0.0.1:5020` |
//! | `--range` | `NODE_RANGE` | none |
//! | `--retries` | `SIDECAR_RETRIES` | 3 |
//! | `--backoff-ms` | `SIDECAR_BACKOFF_MS` | 1000 |
//! | `--timeout-ms` | `SIDECAR_TIMEOUT_MS` | 2000 |
//! | `--register-delay-ms` | `REGISTER_DELAY_MS` | 1000 |
//! | `--log-level` | `LOG_LEVEL` | `info` |

use anyhow::{Context, anyhow, bail};
use std::collections::HashMap;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::error::ClusterError;
use crate::membership::types::Role;
use crate::shard::KeyRange;
use crate::sidecar::RetryPolicy;
use crate::sidecar::policy::DEFAULT_REQUEST_TIMEOUT;

pub const DEFAULT_COORDINATOR_URL: &str = "http://127.0.0.1:5020";
pub const DEFAULT_REGISTER_DELAY: Duration = Duration::from_secs(1);

pub const USAGE: &str = "\
Usage: letter-cluster --role <coordinator|shard_processor|validator|aggregator> [options]
  --bind <addr:port>         listen address
  --advertise <url>          base URL announced to the coordinator
  --coordinator <url>        coordinator base URL
  --range <X-Y>              initial range (shard processors only)
  --retries <n>              delivery attempts per message
  --backoff-ms <ms>          pause between delivery attempts
  --timeout-ms <ms>          per-attempt request timeout
  --register-delay-ms <ms>   wait before self-registration
  --log-level <level>        trace|debug|info|warn|error
Example: letter-cluster --role validator --bind 127.0.0.1:5003";

/// What a process runs as: the coordinator, or one of the worker roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Coordinator,
    Worker(Role),
}

impl NodeRole {
    pub fn default_port(&self) -> u16 {
        match self {
            NodeRole::Coordinator => 5020,
            NodeRole::Worker(Role::ShardProcessor) => 5002,
            NodeRole::Worker(Role::Validator) => 5003,
            NodeRole::Worker(Role::Aggregator) => 5004,
        }
    }
}

impl FromStr for NodeRole {
    type Err = ClusterError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.trim().eq_ignore_ascii_case("coordinator") {
            return Ok(NodeRole::Coordinator);
        }
        raw.parse().map(NodeRole::Worker)
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRole::Coordinator => f.write_str("coordinator"),
            NodeRole::Worker(role) => f.write_str(role.as_str()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub role: NodeRole,
    pub bind: SocketAddr,
    /// Base URL other nodes use to reach this one.
    pub advertise: String,
    pub coordinator_url: String,
    pub initial_range: Option<KeyRange>,
    pub retry: RetryPolicy,
    pub request_timeout: Duration,
    pub register_delay: Duration,
    pub log_level: tracing::Level,
}

const FLAGS: &[(&str, &str)] = &[
    ("--role", "NODE_ROLE"),
    ("--bind", "NODE_BIND"),
    ("--advertise", "NODE_ADVERTISE"),
    ("--coordinator", "COORDINATOR_URL"),
    ("--range", "NODE_RANGE"),
    ("--retries", "SIDECAR_RETRIES"),
    ("--backoff-ms", "SIDECAR_BACKOFF_MS"),
    ("--timeout-ms", "SIDECAR_TIMEOUT_MS"),
    ("--register-delay-ms", "REGISTER_DELAY_MS"),
    ("--log-level", "LOG_LEVEL"),
];

impl NodeConfig {
    /// Reads the process arguments and environment.
    pub fn load() -> anyhow::Result<Self> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::from_sources(&args, |key| std::env::var(key).ok())
    }

    /// Builds a config from `args` (without the program name) and an environment
    /// lookup. Unknown flags and flags without a value are errors.
    pub fn from_sources<F>(args: &[String], env: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut flags: HashMap<&str, String> = HashMap::new();
        let mut i = 0;
        while i < args.len() {
            let flag = args[i].as_str();
            let Some((name, _)) = FLAGS.iter().find(|(name, _)| *name == flag) else {
                bail!("Unknown argument: {}", flag);
            };
            let value = args
                .get(i + 1)
                .ok_or_else(|| anyhow!("{} expects a value", flag))?;
            flags.insert(*name, value.clone());
            i += 2;
        }

        let lookup = |flag: &str| -> Option<String> {
            let var = FLAGS.iter().find(|(name, _)| *name == flag).map(|(_, var)| *var)?;
            flags
                .get(flag)
                .cloned()
                .or_else(|| env(var))
                .filter(|v| !v.trim().is_empty())
        };

        let role: NodeRole = lookup("--role")
            .ok_or_else(|| anyhow!("--role is required"))?
            .parse()?;

        let bind = match lookup("--bind") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("Invalid bind address: {}", raw))?,
            None => SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), role.default_port()),
        };

        let advertise = lookup("--advertise").unwrap_or_else(|| advertised_url(bind));

        let coordinator_url =
            lookup("--coordinator").unwrap_or_else(|| DEFAULT_COORDINATOR_URL.to_string());

        let initial_range = match lookup("--range") {
            Some(raw) => Some(raw.parse::<KeyRange>()?),
            None => None,
        };
        if initial_range.is_some() && role != NodeRole::Worker(Role::ShardProcessor) {
            bail!("--range only applies to shard processors");
        }

        let mut retry = RetryPolicy::default();
        if let Some(raw) = lookup("--retries") {
            retry.max_retries = raw
                .parse()
                .with_context(|| format!("Invalid retry count: {}", raw))?;
        }
        if let Some(ms) = parse_millis(lookup("--backoff-ms"), "backoff")? {
            retry.backoff = ms;
        }

        let request_timeout =
            parse_millis(lookup("--timeout-ms"), "timeout")?.unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        let register_delay = parse_millis(lookup("--register-delay-ms"), "register delay")?
            .unwrap_or(DEFAULT_REGISTER_DELAY);

        let log_level = match lookup("--log-level") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("Invalid log level: {}", raw))?,
            None => tracing::Level::INFO,
        };

        Ok(Self {
            role,
            bind,
            advertise,
            coordinator_url,
            initial_range,
            retry,
            request_timeout,
            register_delay,
            log_level,
        })
    }
}

fn parse_millis(raw: Option<String>, what: &str) -> anyhow::Result<Option<Duration>> {
    raw.map(|raw| {
        raw.parse::<u64>()
            .map(Duration::from_millis)
            .with_context(|| format!("Invalid {} in milliseconds: {}", what, raw))
    })
    .transpose()
}

/// `http://<bind>`, with a wildcard bind address replaced by loopback.
fn advertised_url(bind: SocketAddr) -> String {
    if bind.ip().is_unspecified() {
        format!("http://127.0.0.1:{}", bind.port())
    } else {
        format!("http://{}", bind)
    }
}
