//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod extract;
pub mod validate;
pub mod vendors;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use invval_core::validation::InMemoryVendorStore;
use invval_core::InvvalConfig;

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("invval")
        .join("config.json")
}

/// Load the configuration named on the command line, else the default file
/// if it exists, else built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<InvvalConfig> {
    if let Some(path) = config_path {
        return Ok(InvvalConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(InvvalConfig::from_file(&default_path)?)
    } else {
        Ok(InvvalConfig::default())
    }
}

/// Load the vendor store from `--vendors` or the configured store path.
pub fn load_store(
    vendors: Option<&Path>,
    config: &InvvalConfig,
) -> anyhow::Result<InMemoryVendorStore> {
    let Some(path) = vendors.or(config.vendors.store_path.as_deref()) else {
        anyhow::bail!(
            "No vendor store given. Pass --vendors <file> or run \
             'invval config set vendors.store_path <file>'."
        );
    };

    if !path.exists() {
        anyhow::bail!("Vendor store not found: {}", path.display());
    }

    Ok(InMemoryVendorStore::from_file(path)?)
}

/// Read an input file as UTF-8 text.
pub fn read_input(path: &Path) -> anyhow::Result<String> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    Ok(fs::read_to_string(path)?)
}
