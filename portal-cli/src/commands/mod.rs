pub mod can;
pub mod check;
pub mod whoami;

use anyhow::{bail, Result};
use portal_rbac::config::{LookupBackend, PortalConfig, DEFAULT_CONFIG_FILE};
use portal_rbac::identity::StaticIdentity;
use portal_rbac::lookup::{build_lookup, RoleLookup};
use portal_rbac::RoleSession;
use std::path::Path;
use std::sync::Arc;

/// Configuration and lookup shared by every command
pub struct Context {
    pub config: PortalConfig,
    pub lookup: Arc<dyn RoleLookup>,
    /// Whether a config file was read
    configured: bool,
}

impl Context {
    /// Load config (explicit file must exist) and build the lookup
    ///
    /// `directory` switches the lookup to that file.
    pub fn open(config_path: Option<&Path>, directory: Option<&Path>) -> Result<Self> {
        let path = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        if config_path.is_some() && !path.exists() {
            bail!("config file not found: {}", path.display());
        }
        let configured = path.exists();
        let mut config = PortalConfig::load_from(path)?;

        if let Some(directory) = directory {
            config.lookup.backend = LookupBackend::File;
            config.lookup.directory_path = Some(directory.display().to_string());
        }

        let lookup = build_lookup(&config.lookup)?;
        Ok(Self { config, lookup, configured })
    }

    /// Configured logging when a config file was read, `env_logger` otherwise
    pub fn init_logging(&self) {
        if self.configured {
            if let Err(e) = portal_rbac::logging::init_logging(&self.config.logging) {
                eprintln!("Warning: logging not initialized: {:#}", e);
            }
            return;
        }

        let env = env_logger::Env::default().default_filter_or("warn");
        let _ = env_logger::Builder::from_env(env)
            .format_timestamp_millis()
            .format_module_path(false)
            .try_init();
    }

    /// A session signed in as `email`, with its role already loaded
    ///
    /// A failed lookup is an error, not a verdict.
    pub async fn session(&self, email: &str) -> Result<RoleSession> {
        let identity = Arc::new(StaticIdentity::signed_in(email));
        let session =
            RoleSession::with_config(identity, self.lookup.clone(), self.config.rbac.clone());
        if let Some(message) = session.sync().await.error() {
            bail!("role lookup failed: {}", message);
        }
        Ok(session)
    }
}
