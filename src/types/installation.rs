use crate::types::addon::{ProviderKey, ReleaseId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_INSTALLATION_PATH: &str =
    r"C:\Program Files (x86)\World of Warcraft\Interface\AddOns";

/// Contents of `installed.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installation {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub addons: Vec<InstalledAddon>,
}

impl Default for Installation {
    fn default() -> Self {
        Installation {
            path: DEFAULT_INSTALLATION_PATH.to_string(),
            addons: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstalledAddon {
    pub name: String,
    pub provider: ProviderKey,
    pub release: ReleaseId,
    pub archive_sha256: String,
    pub installed_at: DateTime<Utc>,
}
