use crate::{
    error::{InstallError, Result},
    types::{
        addon::FetchedAddon,
        archive::{ArchiveEntry, InstallPlan},
    },
    utils::fs::to_unix_string,
};
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Decodes every archive and pools their entries into one install plan.
///
/// Entries keep the order of `archives`, then the order inside each archive.
/// Nothing records which addon an entry came from.
pub fn plan(archives: &[FetchedAddon]) -> Result<InstallPlan> {
    let mut pooled: Vec<ArchiveEntry> = Vec::new();
    for archive in archives {
        let label = archive.request.to_string();
        pooled.extend(decode_archive(&label, &archive.bytes)?);
    }
    Ok(plan_entries(pooled))
}

/// Reads all entries of a zip archive held in memory.
pub fn decode_archive(label: &str, bytes: &[u8]) -> Result<Vec<ArchiveEntry>> {
    let decode_error = |reason: String| InstallError::ArchiveDecode {
        addon: label.to_string(),
        reason,
    };

    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| decode_error(e.to_string()))?;

    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| decode_error(format!("entry #{}: {}", i, e)))?;

        let name = to_unix_string(file.name());
        if file.enclosed_name().is_none() {
            return Err(decode_error(format!(
                "entry '{}' points outside the archive root",
                name
            )));
        }

        let relative_path = name.trim_end_matches('/').to_string();
        if relative_path.is_empty() {
            continue;
        }

        let is_directory = file.is_dir();
        let mut content = Vec::new();
        if !is_directory {
            file.read_to_end(&mut content)
                .map_err(|e| decode_error(format!("entry '{}': {}", name, e)))?;
        }

        entries.push(ArchiveEntry {
            relative_path,
            is_directory,
            content,
        });
    }

    Ok(entries)
}

/// Derives the directory list and the file sequence from pooled entries.
pub fn plan_entries(entries: Vec<ArchiveEntry>) -> InstallPlan {
    let mut directories: Vec<String> = entries
        .iter()
        .map(|e| {
            if e.is_directory {
                e.relative_path.clone()
            } else {
                parent_dir(&e.relative_path)
            }
        })
        .collect();
    directories.sort();
    directories.dedup();

    let files = entries.into_iter().filter(|e| !e.is_directory).collect();

    InstallPlan { directories, files }
}

/// Parent directory of a `/`-separated path, `.` for top-level names.
pub fn parent_dir(path: &str) -> String {
    match path.rfind('/') {
        Some(0) => ".".to_string(),
        Some(i) => path[..i].to_string(),
        None => ".".to_string(),
    }
}
