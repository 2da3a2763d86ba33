use crate::{
    addon::summary::print_installation,
    error::Result,
    types::installation::Installation,
    utils::{
        config::{Settings, installation_file, load_installation, save_installation},
        fs::walk_files,
        logger::{LogLevel, Logger},
    },
};
use std::path::{Path, PathBuf};

/// Lists the addons recorded for the configured installation path.
pub fn list_installation() -> Result<()> {
    let installation = load_installation(&installation_file()?)?;
    let root = Path::new(&installation.path);
    let file_count = if root.is_dir() {
        Some(walk_files(root)?.len())
    } else {
        None
    };
    print_installation(&installation, file_count);
    Ok(())
}

/// Shows the effective installation path, or persists a new one.
///
/// ### Parameters
/// - `dir`: New installation path. Leave empty to print the current one.
///
pub fn manage_path(dir: Option<PathBuf>) -> Result<()> {
    let record_file = installation_file()?;
    let installation = load_installation(&record_file)?;
    let logger = Logger::new();

    match dir {
        None => {
            let settings = Settings::resolve(None, None, &installation);
            logger.log_message(
                LogLevel::Info,
                &format!("Installation path: {}", settings.target.display()),
            );
        }
        Some(dir) => {
            let updated = with_path(installation, &dir);
            save_installation(&record_file, &updated)?;
            logger.log_message(
                LogLevel::Success,
                &format!("Installation path set to {}", updated.path),
            );
        }
    }

    Ok(())
}

/// Recorded addons describe the old directory, so they are dropped when the path changes.
fn with_path(installation: Installation, dir: &Path) -> Installation {
    let path = dir.to_string_lossy().into_owned();
    if path == installation.path {
        return installation;
    }
    Installation {
        path,
        addons: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::addon::{ProviderKey, ReleaseId};
    use crate::types::installation::InstalledAddon;
    use chrono::Utc;

    fn recorded() -> Installation {
        Installation {
            path: "/games/AddOns".to_string(),
            addons: vec![InstalledAddon {
                name: "WeakAuras".to_string(),
                provider: ProviderKey::Curse,
                release: ReleaseId(12),
                archive_sha256: String::new(),
                installed_at: Utc::now(),
            }],
        }
    }

    #[test]
    fn same_path_keeps_record() {
        let installation = recorded();
        assert_eq!(
            with_path(installation.clone(), Path::new("/games/AddOns")),
            installation
        );
    }

    #[test]
    fn new_path_clears_addons() {
        let updated = with_path(recorded(), Path::new("/other/AddOns"));
        assert_eq!(updated.path, "/other/AddOns");
        assert!(updated.addons.is_empty());
    }
}
