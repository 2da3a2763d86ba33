use crate::error::{InstallError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub fn get_user_home() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| InstallError::Config("Failed to get user home directory".to_string()))
}

pub fn walk_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut stack: Vec<PathBuf> = vec![root.to_path_buf()];
    let mut files: Vec<PathBuf> = Vec::new();
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir)?.flatten() {
            let p = entry.path();
            if p.is_dir() {
                stack.push(p);
            } else if p.is_file() {
                files.push(p);
            }
        }
    }
    files.sort();
    Ok(files)
}

pub fn to_unix_string<P: AsRef<Path>>(p: P) -> String {
    let s = p.as_ref().to_string_lossy().into_owned();
    s.replace('\\', "/")
}
