use crate::{
    addon::{provider::ProviderCatalog, source::ReleaseSource},
    error::{InstallError, Result},
    types::addon::{AddonRequest, ReleaseId},
};
use scraper::{Html, Selector};

const LISTING_SELECTOR: &str = "table.project-file-listing";
const ROW_SELECTOR: &str = "table.project-file-listing tr.project-file-list-item";
const DOWNLOAD_LINK_SELECTOR: &str =
    "div.project-file-download-button a.button.tip.fa-icon-download";

/// Looks up the newest release of an addon on its provider.
///
/// ### Parameters
/// - `source`: Where the release index page is fetched from.
/// - `catalog`: Provider URL templates.
/// - `request`: The addon to resolve.
///
pub async fn resolve_release<S: ReleaseSource>(
    source: &S,
    catalog: &ProviderCatalog,
    request: &AddonRequest,
) -> Result<ReleaseId> {
    let url = catalog.resolve(request.provider)?.index_url(&request.name);
    let document = source.get_text(&url).await?;
    latest_release(&document, &url, request)
}

/// Scans a release index document and returns the highest release identifier listed.
pub fn latest_release(document: &str, url: &str, request: &AddonRequest) -> Result<ReleaseId> {
    let listing = selector(LISTING_SELECTOR, url)?;
    let rows = selector(ROW_SELECTOR, url)?;
    let link = selector(DOWNLOAD_LINK_SELECTOR, url)?;

    let html = Html::parse_document(document);
    if html.select(&listing).next().is_none() {
        return Err(InstallError::Parse {
            url: url.to_string(),
            reason: "document has no project file listing".to_string(),
        });
    }

    let mut latest: Option<ReleaseId> = None;
    for row in html.select(&rows) {
        let href = row
            .select(&link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .unwrap_or("");
        let release = release_from_href(href)?;
        latest = latest.max(Some(release));
    }

    // Identifier 0 never names a real release.
    latest
        .filter(|release| release.0 > 0)
        .ok_or_else(|| InstallError::NoReleaseFound {
            addon: request.name.clone(),
            provider: request.provider.to_string(),
        })
}

/// Reads the release identifier from a `.../<id>/download` link.
pub fn release_from_href(href: &str) -> Result<ReleaseId> {
    let segments: Vec<&str> = href.split('/').collect();
    if segments.len() < 2 {
        return Err(InstallError::MalformedLink {
            href: href.to_string(),
        });
    }

    segments[segments.len() - 2]
        .parse::<u64>()
        .map(ReleaseId)
        .map_err(|_| InstallError::MalformedLink {
            href: href.to_string(),
        })
}

fn selector(css: &str, url: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| InstallError::Parse {
        url: url.to_string(),
        reason: format!("invalid selector '{}': {}", css, e),
    })
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::addon::provider::ProviderTemplates;
    use crate::addon::source::fake::StaticSource;
    use crate::types::addon::ProviderKey;

    /// Renders a file listing page the way the providers lay it out.
    pub fn listing_page(addon: &str, releases: &[u64]) -> String {
        let rows: String = releases
            .iter()
            .map(|id| {
                format!(
                    r#"<tr class="project-file-list-item">
                        <td class="project-file-release-type"><div class="release-phase tip"></div></td>
                        <td class="project-file-name">
                            <div class="project-file-download-button">
                                <a class="button tip fa-icon-download icon-only" href="/projects/{addon}/files/{id}/download"></a>
                            </div>
                        </td>
                    </tr>"#
                )
            })
            .collect();
        format!(
            r#"<html><body><table class="listing project-file-listing">
                <thead><tr><th>Type</th><th>Name</th></tr></thead>
                <tbody>{rows}</tbody>
            </table></body></html>"#
        )
    }

    fn request() -> AddonRequest {
        AddonRequest::parse("Foo").unwrap()
    }

    #[test]
    fn picks_highest_identifier() {
        let page = listing_page("foo", &[10, 7, 23]);
        assert_eq!(latest_release(&page, "u", &request()).unwrap(), ReleaseId(23));
    }

    #[test]
    fn empty_listing_has_no_release() {
        let page = listing_page("foo", &[]);
        assert!(matches!(
            latest_release(&page, "u", &request()),
            Err(InstallError::NoReleaseFound { addon, .. }) if addon == "Foo"
        ));
    }

    #[test]
    fn zero_identifier_is_no_release() {
        let page = listing_page("foo", &[0]);
        assert!(matches!(
            latest_release(&page, "u", &request()),
            Err(InstallError::NoReleaseFound { addon, .. }) if addon == "Foo"
        ));
    }

    #[test]
    fn page_without_listing_is_a_parse_error() {
        let page = "<html><body><p>Project not found</p></body></html>";
        assert!(matches!(
            latest_release(page, "u", &request()),
            Err(InstallError::Parse { .. })
        ));
    }

    #[test]
    fn non_numeric_segment_is_malformed() {
        let page = listing_page("foo", &[3]).replace("/3/download", "/latest/download");
        assert!(matches!(
            latest_release(&page, "u", &request()),
            Err(InstallError::MalformedLink { href }) if href.contains("latest")
        ));
    }

    #[test]
    fn href_segments() {
        assert_eq!(
            release_from_href("/projects/foo/files/2417/download").unwrap(),
            ReleaseId(2417)
        );
        assert!(release_from_href("").is_err());
        assert!(release_from_href("download").is_err());
    }

    #[tokio::test]
    async fn resolves_through_the_catalog() {
        let catalog = ProviderCatalog::default().with_entry(
            ProviderKey::Curse,
            ProviderTemplates::new("mem://%v/files", "mem://%v/files/%v/download"),
        );
        let source = StaticSource::default().page("mem://Foo/files", &listing_page("Foo", &[5, 12, 3]));

        let release = resolve_release(&source, &catalog, &request()).await.unwrap();
        assert_eq!(release, ReleaseId(12));
        assert_eq!(source.requested(), vec!["mem://Foo/files".to_string()]);
    }
}
