use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    env_subst::substitute_env,
    error::{Error, Result},
    schema::CourierConfig,
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "courier.toml",
    "courier.yaml",
    "courier.yml",
    "courier.json",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<CourierConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&substitute_env(&raw), path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./courier.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/courier/courier.{toml,yaml,yml,json}` (user-global)
///
/// Returns `CourierConfig::default()` if no config file is found or the
/// file cannot be loaded.
pub fn discover_and_load() -> CourierConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    CourierConfig::default()
}

/// Find the first config file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    let local = CONFIG_FILENAMES.iter().map(PathBuf::from);
    let global = config_dir()
        .into_iter()
        .flat_map(|dir| CONFIG_FILENAMES.iter().map(move |name| dir.join(name)));
    local.chain(global).find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/courier/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "courier").map(|d| d.config_dir().to_path_buf())
}

fn parse_config(raw: &str, path: &Path) -> Result<CourierConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => toml::from_str(raw).map_err(|e| Error::parse(path, e)),
        "yaml" | "yml" => serde_yaml::from_str(raw).map_err(|e| Error::parse(path, e)),
        "json" => serde_json::from_str(raw).map_err(|e| Error::parse(path, e)),
        _ => Err(Error::UnsupportedFormat {
            extension: ext.to_string(),
        }),
    }
}
