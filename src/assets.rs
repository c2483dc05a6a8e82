//! Offline asset cache: cache-first, no update
//!
//! The manifest below is the single list of static assets. Installation
//! stores every entry in a named bucket; afterwards every request is answered
//! from the bucket when possible and falls through to the network otherwise.
//! Nothing expires and misses are not written back.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::{Client, Url, header::CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::SkypeekError;
use crate::cache::AssetBucket;
use crate::config::WeatherConfig;

/// Assets making up the application shell. Relative paths resolve against
/// the configured origin.
pub const APP_SHELL: &[&str] = &[
    "/",
    "/index.html",
    "/css/style.css",
    "/js/script.js",
    "/assets/icon.png",
    "/js/manifest.json",
    "/js/sw.js",
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css",
    "https://cdn.jsdelivr.net/npm/bootstrap-icons@1.11.1/font/bootstrap-icons.css",
    "https://fonts.googleapis.com/css2?family=Outfit:wght@300;400;600;700&display=swap",
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/js/bootstrap.bundle.min.js",
];

/// A fetched response body with the bits needed to serve it again
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Asset {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Resolved, de-duplicated list of asset URLs
#[derive(Debug, Clone)]
pub struct AssetManifest {
    origin: Url,
    urls: Vec<Url>,
}

impl AssetManifest {
    pub fn new<'a>(origin: &str, entries: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let origin = Url::parse(origin)
            .map_err(|e| SkypeekError::validation(format!("Invalid asset origin '{origin}': {e}")))?;

        let mut urls: Vec<Url> = Vec::new();
        for entry in entries {
            let url = origin
                .join(entry)
                .map_err(|e| SkypeekError::validation(format!("Invalid asset path '{entry}': {e}")))?;
            if !urls.contains(&url) {
                urls.push(url);
            }
        }

        Ok(Self { origin, urls })
    }

    /// The built-in application shell manifest
    pub fn app_shell(origin: &str) -> Result<Self> {
        Self::new(origin, APP_SHELL.iter().copied())
    }

    #[must_use]
    pub fn urls(&self) -> &[Url] {
        &self.urls
    }

    /// Resolve a request path or absolute URL the same way manifest entries are
    pub fn resolve(&self, request: &str) -> Result<Url> {
        self.origin
            .join(request)
            .with_context(|| format!("Invalid asset URL '{request}'"))
    }
}

/// Network side of the asset cache
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn fetch(&self, url: &Url) -> std::result::Result<Asset, Self::Error>;
}

/// Plain GET over reqwest
#[derive(Debug, Clone)]
pub struct HttpAssetFetcher {
    client: Client,
}

impl HttpAssetFetcher {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(config.user_agent.as_str())
            .build()
            .with_context(|| "Failed to create HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AssetFetcher for HttpAssetFetcher {
    type Error = reqwest::Error;

    async fn fetch(&self, url: &Url) -> std::result::Result<Asset, reqwest::Error> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        Ok(Asset {
            url: url.to_string(),
            status,
            content_type,
            body,
        })
    }
}

/// Whether a manifest entry is currently in the bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryStatus {
    pub url: Url,
    pub cached: bool,
}

/// Cache-first front for a fetcher, backed by one bucket
pub struct AssetCache<F> {
    bucket: AssetBucket,
    manifest: AssetManifest,
    fetcher: F,
}

impl<F: AssetFetcher> AssetCache<F> {
    pub fn new(bucket: AssetBucket, manifest: AssetManifest, fetcher: F) -> Self {
        Self {
            bucket,
            manifest,
            fetcher,
        }
    }

    #[must_use]
    pub fn manifest(&self) -> &AssetManifest {
        &self.manifest
    }

    /// Populate the bucket with every manifest entry.
    ///
    /// All entries are fetched before anything is written, so a single failed
    /// or non-2xx response leaves the bucket untouched. Running it again with
    /// the same manifest rewrites the same entries.
    #[instrument(skip(self), fields(bucket = self.bucket.name()))]
    pub async fn install(&self) -> Result<usize> {
        info!(
            "Caching all: app shell and content ({} assets)",
            self.manifest.urls().len()
        );

        let assets = try_join_all(self.manifest.urls().iter().map(|url| async move {
            let asset = self
                .fetcher
                .fetch(url)
                .await
                .with_context(|| format!("Failed to fetch {url}"))?;
            if !asset.is_success() {
                return Err(SkypeekError::cache(format!(
                    "{url} returned status {}",
                    asset.status
                ))
                .into());
            }
            Ok::<_, anyhow::Error>(asset)
        }))
        .await?;

        let stored = self
            .bucket
            .put_all(&assets)
            .await
            .with_context(|| format!("Failed to write bucket '{}'", self.bucket.name()))?;
        info!("Bucket '{}' holds {} assets", self.bucket.name(), stored);
        Ok(stored)
    }

    /// Answer from the bucket if possible, otherwise go to the network.
    ///
    /// Network errors come back exactly as the fetcher produced them. A bucket
    /// that cannot be read counts as a miss.
    #[instrument(skip(self, url), fields(url = %url))]
    pub async fn fetch(&self, url: &Url) -> std::result::Result<Asset, F::Error> {
        match self.bucket.get(url.as_str()).await {
            Ok(Some(asset)) => {
                debug!("Serving from bucket");
                return Ok(asset);
            }
            Ok(None) => debug!("Not in bucket, fetching"),
            Err(e) => warn!("Bucket read failed, fetching instead: {e:#}"),
        }
        self.fetcher.fetch(url).await
    }

    /// Cached/missing status for every manifest entry
    pub async fn status(&self) -> Result<Vec<EntryStatus>> {
        let stored = self.bucket.urls().await?;
        Ok(self
            .manifest
            .urls()
            .iter()
            .map(|url| EntryStatus {
                url: url.clone(),
                cached: stored.binary_search(&url.to_string()).is_ok(),
            })
            .collect())
    }
}
