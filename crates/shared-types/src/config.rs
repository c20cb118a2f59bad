//! # Ledger Configuration
//!
//! The single configuration value for the whole process. It is constructed
//! once at start-up and shared by reference (`Arc<LedgerConfig>`) with every
//! subsystem. Missing identifiers degrade gracefully: the resolver returns an
//! empty set, the marketplace rejects writes with a configuration error.

use serde::{Deserialize, Serialize};

/// Environment key for the marketplace/task package identifier.
pub const ENV_PACKAGE_ID: &str = "LL_PACKAGE_ID";
/// Environment key for the task registry object identifier.
pub const ENV_REGISTRY_ID: &str = "LL_REGISTRY_ID";
/// Environment key for the ledger JSON-RPC endpoint.
pub const ENV_RPC_URL: &str = "LL_RPC_URL";
/// Environment key for the ledger RPC timeout.
pub const ENV_RPC_TIMEOUT_SECS: &str = "LL_RPC_TIMEOUT_SECS";
/// Environment key for the storage aggregator endpoint.
pub const ENV_STORAGE_URL: &str = "LL_STORAGE_URL";

/// Process-wide configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Package identifier of the on-ledger modules.
    pub package_id: Option<String>,
    /// Identifier of the task registry object.
    pub registry_id: Option<String>,
    /// Ledger JSON-RPC endpoint.
    pub rpc_url: String,
    /// Ledger RPC timeout in seconds.
    pub rpc_timeout_secs: u64,
    /// Storage aggregator endpoint.
    pub storage_url: String,
    /// Registry resolution settings.
    pub resolver: ResolverSettings,
    /// Marketplace settings.
    pub marketplace: MarketplaceSettings,
    /// Content pipeline settings.
    pub content: ContentSettings,
}

/// Registry resolution settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolverSettings {
    /// Registry field holding the status-bucket table.
    pub bucket_table_field: String,
    /// Task field holding the role table.
    pub role_table_field: String,
    /// Due-date offset applied when a task has none.
    pub default_due_days: i64,
}

/// Marketplace settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarketplaceSettings {
    /// Module name inside the package.
    pub module: String,
    /// Default event window for listing queries.
    pub listing_window: usize,
}

/// Content pipeline settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContentSettings {
    /// Domain string mixed into key derivation.
    pub key_domain: String,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            bucket_table_field: "tasks_by_status".to_string(),
            role_table_field: "roles".to_string(),
            default_due_days: 7,
        }
    }
}

impl Default for MarketplaceSettings {
    fn default() -> Self {
        Self {
            module: "marketplace".to_string(),
            listing_window: 50,
        }
    }
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            key_domain: "ledger-lens/content-key/v1".to_string(),
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            package_id: None,
            registry_id: None,
            rpc_url: "https://fullnode.testnet.sui.io:443".to_string(),
            rpc_timeout_secs: 30,
            storage_url: "https://aggregator.walrus-testnet.walrus.space".to_string(),
            resolver: ResolverSettings::default(),
            marketplace: MarketplaceSettings::default(),
            content: ContentSettings::default(),
        }
    }
}

impl LedgerConfig {
    /// Create a config for testing (fixed identifiers, local endpoints).
    pub fn for_testing() -> Self {
        Self {
            package_id: Some("0xpkg".to_string()),
            registry_id: Some("0xregistry".to_string()),
            rpc_url: "http://127.0.0.1:9000".to_string(),
            rpc_timeout_secs: 5,
            storage_url: "http://127.0.0.1:31415".to_string(),
            ..Self::default()
        }
    }

    /// Build from a key lookup (the process environment in production).
    ///
    /// Empty values count as absent; an unparseable timeout keeps the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();
        config.package_id = get(ENV_PACKAGE_ID);
        config.registry_id = get(ENV_REGISTRY_ID);
        if let Some(url) = get(ENV_RPC_URL) {
            config.rpc_url = url;
        }
        if let Some(url) = get(ENV_STORAGE_URL) {
            config.storage_url = url;
        }
        match get(ENV_RPC_TIMEOUT_SECS).map(|v| v.parse::<u64>()) {
            Some(Ok(secs)) => config.rpc_timeout_secs = secs,
            Some(Err(_)) => {
                tracing::warn!("{} is not a number, keeping default", ENV_RPC_TIMEOUT_SECS)
            }
            None => {}
        }
        config
    }

    /// Build from the process environment. Call once at startup.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Package identifier, if configured and non-empty.
    pub fn package_id(&self) -> Option<&str> {
        self.package_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Registry identifier, if configured and non-empty.
    pub fn registry_id(&self) -> Option<&str> {
        self.registry_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Fully qualified `package::module::name` for a marketplace item.
    ///
    /// `None` when the package is not configured.
    pub fn marketplace_target(&self, name: &str) -> Option<String> {
        self.package_id()
            .map(|pkg| format!("{}::{}::{}", pkg, self.marketplace.module, name))
    }
}
