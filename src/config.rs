// Client configuration.
// Priority: CLI args > Environment variables > Config file > Defaults

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Ajo client configuration: chain endpoints, deployed addresses, and the
/// polling/retry knobs for transaction flows.
#[derive(Debug, Clone, Parser)]
#[command(name = "ajo")]
#[command(about = "Client for the ajo rotating savings circle contract")]
pub struct AjoConfig {
    /// JSON-RPC endpoint URL
    #[arg(long, env = "AJO_RPC_URL", default_value = "http://localhost:5050/rpc")]
    pub rpc_url: String,

    /// Deployed ajo contract address
    #[arg(long, env = "AJO_CONTRACT_ADDRESS")]
    pub contract_address: Option<String>,

    /// Settlement token (USDC) address
    #[arg(long, env = "AJO_SETTLEMENT_TOKEN")]
    pub settlement_token: Option<String>,

    /// Swap router/quoter address for non-USDC contributions
    #[arg(long, env = "AJO_ROUTER_ADDRESS")]
    pub router_address: Option<String>,

    /// Confirmation poll interval in milliseconds
    #[arg(long, env = "AJO_POLL_INTERVAL_MS", default_value = "3000")]
    pub poll_interval_ms: u64,

    /// Confirmation poll attempts before giving up
    #[arg(long, env = "AJO_CONFIRM_ATTEMPTS", default_value = "20")]
    pub confirm_attempts: u32,

    /// RPC request timeout in milliseconds
    #[arg(long, env = "AJO_RPC_TIMEOUT_MS", default_value = "10000")]
    pub rpc_timeout_ms: u64,

    /// Highest group id probed during public group discovery
    #[arg(long, env = "AJO_MAX_PROBE", default_value = "50")]
    pub max_probe: u64,

    /// Path to the SQLite session store
    #[arg(long, env = "AJO_SESSION_DB", default_value = "./ajo_session.db")]
    pub session_db_path: String,

    /// Optional config file path (TOML format)
    #[arg(long, env = "AJO_CONFIG_FILE")]
    pub config_file: Option<PathBuf>,
}

/// Configuration loaded from TOML file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub flow: FlowFileConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub rpc_url: Option<String>,
    pub contract_address: Option<String>,
    pub settlement_token: Option<String>,
    pub router_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FlowFileConfig {
    pub poll_interval_ms: Option<u64>,
    pub confirm_attempts: Option<u32>,
}

impl AjoConfig {
    /// Load configuration with full priority chain: CLI > Env > File > Defaults
    pub fn load() -> Result<Self> {
        Self::parse().finalize()
    }

    /// Apply the config-file layer and validate an already-parsed config.
    /// Used by binaries that flatten `AjoConfig` under their own parser.
    pub fn finalize(mut self) -> Result<Self> {
        if let Some(config_file) = self.config_file.clone() {
            log::info!("loading configuration from {}", config_file.display());
            let file_config = Self::load_from_file(&config_file)?;
            self.merge_with_file(file_config);
        }

        self.validate()?;
        Ok(self)
    }

    fn load_from_file(path: &PathBuf) -> Result<ConfigFile> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
    }

    /// Merge with file configuration (only if CLI/env not set)
    fn merge_with_file(&mut self, file: ConfigFile) {
        if self.contract_address.is_none() {
            self.contract_address = file.network.contract_address;
        }
        if self.settlement_token.is_none() {
            self.settlement_token = file.network.settlement_token;
        }
        if self.router_address.is_none() {
            self.router_address = file.network.router_address;
        }
        if let Some(url) = file.network.rpc_url {
            // Only adopt the file URL when the CLI/env left the default.
            if self.rpc_url == "http://localhost:5050/rpc" {
                self.rpc_url = url;
            }
        }
        if let Some(interval) = file.flow.poll_interval_ms {
            self.poll_interval_ms = interval;
        }
        if let Some(attempts) = file.flow.confirm_attempts {
            self.confirm_attempts = attempts;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.poll_interval_ms < 100 || self.poll_interval_ms > 60_000 {
            anyhow::bail!(
                "AJO_POLL_INTERVAL_MS must be in [100, 60000], got {}",
                self.poll_interval_ms
            );
        }
        if self.confirm_attempts == 0 || self.confirm_attempts > 200 {
            anyhow::bail!(
                "AJO_CONFIRM_ATTEMPTS must be in [1, 200], got {}",
                self.confirm_attempts
            );
        }
        if self.max_probe == 0 {
            anyhow::bail!("AJO_MAX_PROBE must be > 0");
        }
        for (name, value) in [
            ("AJO_CONTRACT_ADDRESS", &self.contract_address),
            ("AJO_SETTLEMENT_TOKEN", &self.settlement_token),
            ("AJO_ROUTER_ADDRESS", &self.router_address),
        ] {
            if let Some(addr) = value {
                crate::address::normalize_address(addr)
                    .with_context(|| format!("{name} is not a valid address: {addr}"))?;
            }
        }
        Ok(())
    }

    /// Contract address, required for every command that touches the chain.
    pub fn require_contract_address(&self) -> Result<&str> {
        self.contract_address
            .as_deref()
            .context("AJO_CONTRACT_ADDRESS is required")
    }

    pub fn print_summary(&self) {
        log::info!("configuration:");
        log::info!("  rpc url: {}", self.rpc_url);
        if let Some(ref addr) = self.contract_address {
            log::info!("  contract: {}", addr);
        }
        log::info!(
            "  confirmation polling: every {} ms, {} attempts",
            self.poll_interval_ms,
            self.confirm_attempts
        );
        log::info!("  discovery probe bound: {}", self.max_probe);
    }
}
