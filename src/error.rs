use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Unknown download provider '{key}' (expected one of: curse, wowace)")]
    UnknownProvider { key: String },

    #[error("Unable to download '{url}': {reason}")]
    Fetch { url: String, reason: String },

    #[error("Unable to parse the release index '{url}': {reason}")]
    Parse { url: String, reason: String },

    #[error("Unable to read a release identifier from link '{href}'")]
    MalformedLink { href: String },

    #[error("No release found for addon '{addon}' on {provider}")]
    NoReleaseFound { addon: String, provider: String },

    #[error("Unable to decode the archive of '{addon}': {reason}")]
    ArchiveDecode { addon: String, reason: String },

    #[error("Unable to clean directory '{path}': {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("{} addon(s) failed: {}", .0.len(), summarize(.0))]
    AddonsFailed(Vec<AddonFailure>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One addon that could not be resolved or downloaded.
#[derive(Debug)]
pub struct AddonFailure {
    pub addon: String,
    pub error: InstallError,
}

fn summarize(failures: &[AddonFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{} ({})", f.addon, f.error))
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, InstallError>;

impl InstallError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnknownProvider { .. } | Self::Config(_) => 2,
            Self::Fetch { .. } => 3,
            Self::Parse { .. } | Self::MalformedLink { .. } | Self::NoReleaseFound { .. } => 4,
            Self::ArchiveDecode { .. } => 5,
            Self::Cleanup { .. } | Self::Write { .. } => 6,
            Self::Cancelled => 130,
            Self::AddonsFailed(failures) => match failures.first() {
                Some(first) if failures.iter().all(|f| same_kind(&f.error, &first.error)) => {
                    first.error.exit_code()
                }
                _ => 1,
            },
            Self::Io(_) => 1,
        }
    }
}

fn same_kind(a: &InstallError, b: &InstallError) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_uses_shared_exit_code() {
        let err = InstallError::AddonsFailed(vec![
            AddonFailure {
                addon: "A".into(),
                error: InstallError::Fetch {
                    url: "u".into(),
                    reason: "r".into(),
                },
            },
            AddonFailure {
                addon: "B".into(),
                error: InstallError::Fetch {
                    url: "v".into(),
                    reason: "r".into(),
                },
            },
        ]);
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().starts_with("2 addon(s) failed: A ("));
    }

    #[test]
    fn aggregate_of_mixed_kinds_is_generic() {
        let err = InstallError::AddonsFailed(vec![
            AddonFailure {
                addon: "A".into(),
                error: InstallError::Cancelled,
            },
            AddonFailure {
                addon: "B".into(),
                error: InstallError::MalformedLink { href: "x".into() },
            },
        ]);
        assert_eq!(err.exit_code(), 1);
    }
}
