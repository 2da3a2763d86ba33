use crate::error::{InstallError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Known addon hosting sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKey {
    Curse,
    WowAce,
}

impl ProviderKey {
    pub const DEFAULT: ProviderKey = ProviderKey::Curse;

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKey::Curse => "curse",
            ProviderKey::WowAce => "wowace",
        }
    }
}

impl fmt::Display for ProviderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ProviderKey {
    type Err = InstallError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "curse" => Ok(ProviderKey::Curse),
            "wowace" => Ok(ProviderKey::WowAce),
            _ => Err(InstallError::UnknownProvider { key: s.to_string() }),
        }
    }
}

/// One addon to install, parsed from a `name` or `name:provider` token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AddonRequest {
    pub name: String,
    pub provider: ProviderKey,
}

impl AddonRequest {
    pub fn parse(token: &str) -> Result<Self> {
        let (name, provider) = match token.split_once(':') {
            Some((name, provider)) => (name, provider.parse()?),
            None => (token, ProviderKey::DEFAULT),
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(InstallError::Config(format!(
                "Addon token '{}' has an empty name",
                token
            )));
        }
        // The name becomes a URL path segment.
        if name.chars().any(|c| c.is_whitespace() || "/?#%\\".contains(c)) {
            return Err(InstallError::Config(format!(
                "Addon name '{}' contains characters not allowed in a project slug",
                name
            )));
        }

        Ok(AddonRequest {
            name: name.to_string(),
            provider,
        })
    }

    /// Parses every token, keeping the first occurrence of repeated requests.
    pub fn parse_all<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Self>> {
        let mut requests: Vec<AddonRequest> = Vec::with_capacity(tokens.len());
        for token in tokens {
            let request = AddonRequest::parse(token.as_ref())?;
            if !requests.contains(&request) {
                requests.push(request);
            }
        }
        Ok(requests)
    }
}

impl fmt::Display for AddonRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.provider)
    }
}

/// Provider-assigned release number; higher is newer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReleaseId(pub u64);

impl fmt::Display for ReleaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A downloaded release archive, still encoded.
#[derive(Debug, Clone)]
pub struct FetchedAddon {
    pub request: AddonRequest,
    pub release: ReleaseId,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_name_uses_default_provider() {
        let r = AddonRequest::parse("Foo").unwrap();
        assert_eq!(r.name, "Foo");
        assert_eq!(r.provider, ProviderKey::Curse);
    }

    #[test]
    fn explicit_provider_is_parsed() {
        let r = AddonRequest::parse("Foo:wowace").unwrap();
        assert_eq!(r.name, "Foo");
        assert_eq!(r.provider, ProviderKey::WowAce);
    }

    #[test]
    fn splits_on_first_delimiter_only() {
        let err = AddonRequest::parse("Foo:curse:extra").unwrap_err();
        match err {
            InstallError::UnknownProvider { key } => assert_eq!(key, "curse:extra"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_provider_is_rejected() {
        assert!(matches!(
            AddonRequest::parse("Foo:github"),
            Err(InstallError::UnknownProvider { .. })
        ));
        assert!(matches!(
            AddonRequest::parse("Foo:"),
            Err(InstallError::UnknownProvider { .. })
        ));
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(matches!(
            AddonRequest::parse(":curse"),
            Err(InstallError::Config(_))
        ));
    }

    #[test]
    fn url_breaking_names_are_rejected() {
        for token in ["foo?x", "a/b", "a#b:wowace", "50%off", "two words", "a\\b"] {
            assert!(
                matches!(AddonRequest::parse(token), Err(InstallError::Config(_))),
                "{token} should be rejected"
            );
        }
        assert_eq!(AddonRequest::parse("deadly-boss-mods_2").unwrap().name, "deadly-boss-mods_2");
    }

    #[test]
    fn parse_all_drops_repeats() {
        let requests = AddonRequest::parse_all(&["Foo", "Foo:curse", "Foo:wowace"]).unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].to_string(), "Foo:curse");
        assert_eq!(requests[1].to_string(), "Foo:wowace");
    }
}
