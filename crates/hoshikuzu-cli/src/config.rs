//! Dev server configuration.
//!
//! Sources, lowest to highest priority:
//! defaults → `hoshikuzu.config.json` → `HOSHIKUZU_*` environment → CLI flags.

use crate::cli::DevArgs;
use crate::error::{CliError, ConfigError, Result};
use figment::{
    providers::{Env, Format as _, Json, Serialized},
    value::{Uncased, UncasedStr},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

/// Config file looked up in the served root.
pub const CONFIG_FILE_NAME: &str = "hoshikuzu.config.json";

/// Prefix of environment overrides, e.g. `HOSHIKUZU_NOTIFY_URL`.
pub const ENV_PREFIX: &str = "HOSHIKUZU_";

/// Development server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevConfig {
    /// Directory served and watched; always taken from the command line
    #[serde(skip)]
    pub root: PathBuf,

    /// Address to bind
    pub host: IpAddr,

    /// Requested port (the bound port may differ)
    pub port: u16,

    /// Base URL for devtools notifications; the plugin is off when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_url: Option<String>,

    /// Patterns ignored by the file watcher
    pub watch_ignore: Vec<String>,

    /// Window in which repeated events for the same file are dropped
    pub debounce_ms: u64,
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 5173,
            notify_url: None,
            watch_ignore: vec![
                "node_modules".to_string(),
                "dist".to_string(),
                "target".to_string(),
                "*.log".to_string(),
            ],
            debounce_ms: 100,
        }
    }
}

/// CLI flags that were actually given; absent ones must not shadow lower layers.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<IpAddr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notify_url: Option<String>,
}

impl DevConfig {
    /// Load configuration for the dev command.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `--config` file is missing, a source
    /// holds an invalid value, or the root is not a directory.
    pub fn load(args: &DevArgs) -> Result<Self> {
        let root = match &args.root {
            Some(root) => root.clone(),
            None => std::env::current_dir()?,
        };

        let config_file = match &args.config {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.clone()).into());
            }
            Some(path) => Some(path.clone()),
            None => {
                let default_path = root.join(CONFIG_FILE_NAME);
                default_path.exists().then_some(default_path)
            }
        };

        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = config_file {
            figment = figment.merge(Json::file(path));
        }
        figment = figment
            .merge(env_provider())
            .merge(Serialized::defaults(CliOverrides {
                host: args.host,
                port: args.port,
                notify_url: args.notify_url.clone(),
            }));

        let mut config: Self = figment.extract().map_err(|e| {
            CliError::from(ConfigError::InvalidValue {
                field: e.path.join("."),
                value: e.kind.to_string(),
                hint: format!("Check {} and {}* variables", CONFIG_FILE_NAME, ENV_PREFIX),
            })
        })?;
        config.root = root;
        config.validate()?;
        Ok(config)
    }

    /// Validate the loaded configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.root.is_dir() {
            return Err(ConfigError::InvalidValue {
                field: "root".to_string(),
                value: self.root.display().to_string(),
                hint: "The served root must be an existing directory".to_string(),
            }
            .into());
        }

        if let Some(url) = &self.notify_url {
            if url.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "notifyUrl".to_string(),
                    value: url.clone(),
                    hint: "Remove the setting or give a base URL such as http://localhost:9000"
                        .to_string(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Address the server tries first.
    pub fn requested_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Canonical served root, used to map watcher paths to URLs.
    pub fn canonical_root(&self) -> PathBuf {
        canonicalize_or_keep(&self.root)
    }
}

fn canonicalize_or_keep(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// `HOSHIKUZU_*` variables keyed by field name.
///
/// `lowercase(false)` has to come after `map`: `map` resets it.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).map(env_key).lowercase(false)
}

/// Map `NOTIFY_URL`-style variable suffixes onto camelCase field names.
fn env_key(key: &UncasedStr) -> Uncased<'_> {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for c in key.as_str().chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(c.to_ascii_lowercase());
        }
    }
    out.into()
}
