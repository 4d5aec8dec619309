use anyhow::{Context, anyhow};
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

pub const LOADER_META_URL: &str = "https://meta.legacyfabric.net/v2/versions/loader";
/// Used whenever the metadata service cannot be reached.
pub const FALLBACK_LOADER_VERSION: &str = "0.14.22";

#[derive(Deserialize, Debug)]
pub struct LoaderMeta {
    pub version: String,
}

/// Where the loader version for this run came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderVersion {
    Fetched(String),
    Fallback(String),
    /// Given explicitly on the command line.
    Pinned(String),
}

impl LoaderVersion {
    pub fn as_str(&self) -> &str {
        match self {
            LoaderVersion::Fetched(v) | LoaderVersion::Fallback(v) | LoaderVersion::Pinned(v) => v,
        }
    }

    pub fn fallback() -> LoaderVersion {
        LoaderVersion::Fallback(FALLBACK_LOADER_VERSION.to_owned())
    }
}

/// Picks the newest loader from the metadata listing, which is ordered newest first.
pub fn parse_latest(body: &str) -> anyhow::Result<String> {
    let listing: Vec<LoaderMeta> =
        serde_json::from_str(body).context("Decoding loader version listing")?;
    listing
        .into_iter()
        .next()
        .map(|l| l.version)
        .ok_or(anyhow!("Loader version listing was empty"))
}

pub async fn fetch_latest(meta_url: &Url) -> anyhow::Result<String> {
    let response = reqwest::get(meta_url.clone()).await?.error_for_status()?;
    parse_latest(&response.text().await?)
}

/// Asks the metadata service for the latest loader, falling back to
/// [`FALLBACK_LOADER_VERSION`] on any failure.
pub async fn resolve(meta_url: &Url) -> LoaderVersion {
    match fetch_latest(meta_url).await {
        Ok(version) => {
            info!(
                url = meta_url.as_str(),
                loader_version = version,
                "Resolved latest loader version"
            );
            LoaderVersion::Fetched(version)
        }
        Err(e) => {
            warn!(
                url = meta_url.as_str(),
                error = %format!("{:#}", e),
                loader_version = FALLBACK_LOADER_VERSION,
                "Could not fetch loader versions, using fallback"
            );
            LoaderVersion::fallback()
        }
    }
}
