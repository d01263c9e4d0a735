//! Command handler modules for tce.
//!
//! Shared config loading lives here; calculations live in `calc`.

pub mod calc;

use anyhow::{Context, Result};
use tce_charges::RateRegistry;
use tce_config::{
    load_layered_yaml, report_unused_keys, split_config_paths, ConfigMode, LoadedConfig,
    TraderSettings, UnusedKeyPolicy, ENV_CONFIG_PATHS,
};
use tracing::{info, warn};

/// Global `--config` / `--strict-config` flags.
pub struct ConfigArgs {
    pub paths: Vec<String>,
    pub strict: bool,
}

/// Everything a calculation needs from config.
pub struct Loaded {
    pub registry: RateRegistry,
    pub settings: TraderSettings,
}

/// Resolve config layers: `--config` first, else `TCE_CONFIG`, else none
/// (reference rates, empty settings).
fn resolve_paths(args: &ConfigArgs) -> Vec<String> {
    if !args.paths.is_empty() {
        return args.paths.clone();
    }
    std::env::var(ENV_CONFIG_PATHS)
        .map(|raw| split_config_paths(&raw))
        .unwrap_or_default()
}

/// Load layered config, report unused keys for `mode`, and build the
/// registry + settings.
pub fn load(args: &ConfigArgs, mode: ConfigMode) -> Result<Loaded> {
    let paths = resolve_paths(args);
    let loaded = if paths.is_empty() {
        LoadedConfig::empty()?
    } else {
        let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
        load_layered_yaml(&path_refs)?
    };
    info!(config_hash = %loaded.config_hash, layers = paths.len(), "config loaded");

    let policy = if args.strict {
        UnusedKeyPolicy::Fail
    } else {
        UnusedKeyPolicy::Warn
    };
    let report = report_unused_keys(mode, &loaded.config_json, policy)?;
    if !report.is_clean() {
        warn!(
            mode = mode.as_str(),
            unused_leaf_keys = report.unused_leaf_pointers.len(),
            "CONFIG_UNUSED_KEYS"
        );
        for p in report.unused_leaf_pointers.iter().take(50) {
            warn!(unused = %p, "config key not read");
        }
    }

    let registry = RateRegistry::from_config_json(&loaded.config_json)
        .context("rate schedule config invalid")?;
    let settings = TraderSettings::from_config_json(&loaded.config_json)
        .context("settings config invalid")?;

    Ok(Loaded { registry, settings })
}
