use crate::{
    addon::source::DEFAULT_TIMEOUT_SECS,
    error::{InstallError, Result},
    types::installation::{DEFAULT_INSTALLATION_PATH, Installation},
    utils::fs::get_user_home,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_DIR: &str = ".wowpack";
pub const INSTALLATION_FILE: &str = "installed.json";

/// Run-wide values, resolved once at startup and passed down explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub target: PathBuf,
    pub timeout: Duration,
}

impl Settings {
    /// Target precedence: `--path`, `WOWPACK_INSTALL_PATH`, `installed.json`, built-in default.
    pub fn resolve(
        path_flag: Option<PathBuf>,
        timeout_secs: Option<u64>,
        installation: &Installation,
    ) -> Settings {
        let from_env = std::env::var("WOWPACK_INSTALL_PATH").ok();
        Settings {
            target: resolve_target(path_flag, from_env, installation),
            timeout: Duration::from_secs(timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

pub fn resolve_target(
    path_flag: Option<PathBuf>,
    from_env: Option<String>,
    installation: &Installation,
) -> PathBuf {
    if let Some(p) = path_flag {
        return p;
    }
    if let Some(p) = from_env.filter(|v| !v.trim().is_empty()) {
        return PathBuf::from(p);
    }
    PathBuf::from(&installation.path)
}

/// `WOWPACK_HOME` if set, otherwise `~/.wowpack`.
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("WOWPACK_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    Ok(get_user_home()?.join(CONFIG_DIR))
}

pub fn installation_file() -> Result<PathBuf> {
    Ok(config_dir()?.join(INSTALLATION_FILE))
}

/// Reads the installation record. A missing or empty file yields the default record.
pub fn load_installation(path: &Path) -> Result<Installation> {
    if !path.exists() {
        return Ok(Installation::default());
    }

    let text = std::fs::read_to_string(path)?;
    if text.trim().is_empty() {
        return Ok(Installation::default());
    }

    let mut installation: Installation = serde_json::from_str(&text).map_err(|e| {
        InstallError::Config(format!(
            "Unable to read installation file {}: {}",
            path.display(),
            e
        ))
    })?;
    if installation.path.trim().is_empty() {
        installation.path = DEFAULT_INSTALLATION_PATH.to_string();
    }

    Ok(installation)
}

pub fn save_installation(path: &Path, installation: &Installation) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let text = serde_json::to_string_pretty(installation).map_err(|e| {
        InstallError::Config(format!("Unable to serialize installation record: {}", e))
    })?;
    std::fs::write(path, text)?;
    Ok(())
}
