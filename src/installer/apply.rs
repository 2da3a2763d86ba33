use crate::{
    error::{InstallError, Result},
    types::archive::{ArchiveEntry, InstallPlan},
    utils::logger::{LogLevel, Logger},
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;

const STAGING_PREFIX: &str = ".wowpack-staging-";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallSummary {
    pub directories: usize,
    pub files: usize,
    /// Paths provided by more than one entry; the last entry won.
    pub collisions: Vec<String>,
}

/// Materializes `plan` as the new content of `target`.
///
/// The tree is built in a staging directory next to `target` and swapped in once
/// every file is written, so a failed run leaves the previous installation as it was.
pub async fn install(plan: InstallPlan, target: &Path) -> Result<InstallSummary> {
    let parent = parent_of(target);
    fs::create_dir_all(&parent).map_err(|source| InstallError::Write {
        path: parent.clone(),
        source,
    })?;

    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(&parent)
        .map_err(|source| InstallError::Write {
            path: parent.clone(),
            source,
        })?;
    let root = staging.path().to_path_buf();

    for dir in &plan.directories {
        let path = root.join(dir);
        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|source| InstallError::Write { path, source })?;
    }

    let (writes, collisions) = last_writes(plan.files);
    for path in &collisions {
        Logger::new().log_message(
            LogLevel::Warning,
            &format!("'{}' is provided by several addons; keeping the last one", path),
        );
    }

    let files = writes.len();
    write_all(&root, writes).await?;

    let target_owned = target.to_path_buf();
    tokio::task::spawn_blocking(move || promote(&root, &target_owned))
        .await
        .map_err(|e| std::io::Error::other(format!("Join error: {}", e)))??;

    // `staging` now points at a path that was renamed away; dropping it is a no-op.
    drop(staging);

    Ok(InstallSummary {
        directories: plan.directories.len(),
        files,
        collisions,
    })
}

/// Keeps one entry per path, the last one in plan order, and reports the duplicated paths.
fn last_writes(files: Vec<ArchiveEntry>) -> (Vec<ArchiveEntry>, Vec<String>) {
    let mut last: HashMap<String, usize> = HashMap::with_capacity(files.len());
    for (i, entry) in files.iter().enumerate() {
        last.insert(entry.relative_path.clone(), i);
    }

    let mut collisions: Vec<String> = Vec::new();
    let mut writes = Vec::with_capacity(last.len());
    for (i, entry) in files.into_iter().enumerate() {
        if last.get(&entry.relative_path) == Some(&i) {
            writes.push(entry);
        } else if !collisions.contains(&entry.relative_path) {
            collisions.push(entry.relative_path);
        }
    }
    collisions.sort();

    (writes, collisions)
}

/// Writes every file on its own task and waits for all of them.
///
/// A failure does not stop the other writes; the first error is returned once
/// every task has settled.
async fn write_all(root: &Path, writes: Vec<ArchiveEntry>) -> Result<()> {
    let mut set: JoinSet<Result<()>> = JoinSet::new();
    for entry in writes {
        let path = root.join(&entry.relative_path);
        set.spawn(async move {
            tokio::fs::write(&path, &entry.content)
                .await
                .map_err(|source| InstallError::Write { path, source })
        });
    }

    let mut first_error: Option<InstallError> = None;
    while let Some(joined) = set.join_next().await {
        let outcome = joined
            .map_err(|e| InstallError::from(std::io::Error::other(format!("Join error: {}", e))))
            .and_then(|r| r);
        if let Err(e) = outcome {
            first_error.get_or_insert(e);
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Swaps the staged tree into `target`.
fn promote(staging: &Path, target: &Path) -> Result<()> {
    promote_with(staging, target, |from, to| fs::rename(from, to))
}

/// Swaps the staged tree into `target`, moving the old tree aside with `move_aside`.
///
/// When the old tree cannot be moved aside it is removed in place before the rename;
/// a failed removal is a `Cleanup` error and `staging` is left untouched.
fn promote_with<F>(staging: &Path, target: &Path, move_aside: F) -> Result<()>
where
    F: FnOnce(&Path, &Path) -> std::io::Result<()>,
{
    if fs::symlink_metadata(target).is_err() {
        return fs::rename(staging, target).map_err(|source| InstallError::Write {
            path: target.to_path_buf(),
            source,
        });
    }

    let previous = sibling(target, "previous");
    if fs::symlink_metadata(&previous).is_ok() {
        if let Err(e) = fs::remove_dir_all(&previous) {
            Logger::new().log_message(
                LogLevel::Warning,
                &format!(
                    "Unable to remove stale {}: {}; the swap may not be atomic",
                    previous.display(),
                    e
                ),
            );
        }
    }

    match move_aside(target, &previous) {
        Ok(()) => {
            if let Err(source) = fs::rename(staging, target) {
                let _ = fs::rename(&previous, target);
                return Err(InstallError::Write {
                    path: target.to_path_buf(),
                    source,
                });
            }
            if let Err(e) = fs::remove_dir_all(&previous) {
                Logger::new().log_message(
                    LogLevel::Warning,
                    &format!(
                        "Unable to remove previous installation at {}: {}",
                        previous.display(),
                        e
                    ),
                );
            }
            Ok(())
        }
        Err(e) => {
            Logger::new().log_message(
                LogLevel::Warning,
                &format!(
                    "Cannot move {} aside ({}); replacing it in place",
                    target.display(),
                    e
                ),
            );
            fs::remove_dir_all(target).map_err(|source| InstallError::Cleanup {
                path: target.to_path_buf(),
                source,
            })?;
            fs::rename(staging, target).map_err(|source| InstallError::Write {
                path: target.to_path_buf(),
                source,
            })
        }
    }
}

fn parent_of(target: &Path) -> PathBuf {
    match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn sibling(target: &Path, suffix: &str) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "addons".to_string());
    parent_of(target).join(format!(".{}.wowpack-{}-{}", name, suffix, std::process::id()))
}
