use crate::{
    addon::{provider::ProviderCatalog, source::ReleaseSource},
    error::Result,
    types::addon::{AddonRequest, ReleaseId},
};

/// Downloads the archive of one release into memory.
pub async fn fetch_archive<S: ReleaseSource>(
    source: &S,
    catalog: &ProviderCatalog,
    request: &AddonRequest,
    release: ReleaseId,
) -> Result<Vec<u8>> {
    let url = catalog
        .resolve(request.provider)?
        .download_url(&request.name, release);
    source.get_bytes(&url).await
}
