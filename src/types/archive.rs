/// One decoded entry of an addon archive, keyed by its `/`-separated path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub relative_path: String,
    pub is_directory: bool,
    pub content: Vec<u8>,
}

/// Directories to create, then files to write, relative to the install root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallPlan {
    pub directories: Vec<String>,
    pub files: Vec<ArchiveEntry>,
}
