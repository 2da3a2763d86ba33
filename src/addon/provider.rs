use crate::error::{InstallError, Result};
use crate::types::addon::{ProviderKey, ReleaseId};
use std::collections::HashMap;

/// URL templates of one provider. Each `%v` is replaced positionally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderTemplates {
    pub index: String,
    pub download: String,
}

impl ProviderTemplates {
    pub fn new(index: impl Into<String>, download: impl Into<String>) -> Self {
        ProviderTemplates {
            index: index.into(),
            download: download.into(),
        }
    }

    pub fn index_url(&self, addon: &str) -> String {
        fill_template(&self.index, &[addon])
    }

    pub fn download_url(&self, addon: &str, release: ReleaseId) -> String {
        fill_template(&self.download, &[addon, &release.to_string()])
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProviderCatalog {
    entries: HashMap<ProviderKey, ProviderTemplates>,
}

impl ProviderCatalog {
    pub fn builtin() -> Self {
        ProviderCatalog::default()
            .with_entry(
                ProviderKey::Curse,
                ProviderTemplates::new(
                    "https://wow.curseforge.com/projects/%v/files",
                    "https://wow.curseforge.com/projects/%v/files/%v/download",
                ),
            )
            .with_entry(
                ProviderKey::WowAce,
                ProviderTemplates::new(
                    "https://www.wowace.com/projects/%v/files",
                    "https://www.wowace.com/projects/%v/files/%v/download",
                ),
            )
    }

    pub fn with_entry(mut self, key: ProviderKey, templates: ProviderTemplates) -> Self {
        self.entries.insert(key, templates);
        self
    }

    pub fn resolve(&self, key: ProviderKey) -> Result<&ProviderTemplates> {
        self.entries
            .get(&key)
            .ok_or_else(|| InstallError::UnknownProvider {
                key: key.to_string(),
            })
    }
}

fn fill_template(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut rest = template;
    while let Some(pos) = rest.find("%v") {
        out.push_str(&rest[..pos]);
        match args.next() {
            Some(arg) => out.push_str(arg),
            None => out.push_str("%v"),
        }
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out
}
