//! Persistent asset buckets backed by fjall
//!
//! One database directory holds any number of buckets; each bucket is a
//! keyspace named after it. Entries are postcard-encoded assets keyed by
//! absolute URL and never expire.

use anyhow::Result;
use fjall::Keyspace;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task;

use crate::SkypeekError;
use crate::assets::Asset;

/// Reserved key holding the sorted list of stored URLs
const INDEX_KEY: &str = "#index";

const MAX_BUCKET_NAME_LEN: usize = 255;

/// Check that `name` can be used as a bucket (keyspace) name
pub fn validate_bucket_name(name: &str) -> crate::Result<()> {
    if name.is_empty() || name.len() > MAX_BUCKET_NAME_LEN {
        return Err(SkypeekError::validation(format!(
            "Bucket name must be 1 to {MAX_BUCKET_NAME_LEN} characters"
        )));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(SkypeekError::validation(format!(
            "Bucket name '{name}' may only contain ASCII letters, digits, '-', '_' and '.'"
        )));
    }

    Ok(())
}

/// The on-disk database holding all buckets
pub struct AssetStore {
    db: fjall::Database,
    /// Serializes index read-modify-write across every bucket handle
    write_lock: Arc<Mutex<()>>,
}

impl AssetStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(&path).open()?;
        Ok(Self {
            db,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Open (or create) the bucket called `name`
    pub fn bucket(&self, name: &str) -> Result<AssetBucket> {
        validate_bucket_name(name)?;
        let store = self
            .db
            .keyspace(name, fjall::KeyspaceCreateOptions::default)?;
        Ok(AssetBucket {
            name: name.to_string(),
            db: self.db.clone(),
            store,
            write_lock: Arc::clone(&self.write_lock),
        })
    }
}

fn get_from_store(store: Keyspace, key: Vec<u8>) -> anyhow::Result<Option<Vec<u8>>> {
    Ok(store.get(key)?.map(|v| v.to_vec()))
}

/// A named collection of URL → asset entries
#[derive(Clone)]
pub struct AssetBucket {
    name: String,
    db: fjall::Database,
    store: Keyspace,
    write_lock: Arc<Mutex<()>>,
}

impl AssetBucket {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stored asset for `url`, if any
    #[tracing::instrument(name = "query_bucket", level = "debug", skip(self), fields(bucket = %self.name))]
    pub async fn get(&self, url: &str) -> Result<Option<Asset>> {
        match self.read(url.as_bytes().to_vec()).await? {
            Some(bytes) => {
                tracing::debug!("Asset found");
                Ok(Some(postcard::from_bytes(&bytes)?))
            }
            None => {
                tracing::debug!("Asset not found");
                Ok(None)
            }
        }
    }

    /// Store every asset, overwriting entries with the same URL, and record
    /// them in the bucket index. Entries and index go out in one write batch,
    /// so either all of them land or none do. Returns the number of distinct
    /// URLs stored.
    #[tracing::instrument(name = "fill_bucket", level = "debug", skip(self, assets), fields(bucket = %self.name))]
    pub async fn put_all(&self, assets: &[Asset]) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let mut urls = self.urls().await?;

        let mut entries = Vec::with_capacity(assets.len() + 1);
        for asset in assets {
            entries.push((asset.url.as_bytes().to_vec(), postcard::to_stdvec(asset)?));
            urls.push(asset.url.clone());
        }

        urls.sort();
        urls.dedup();
        entries.push((INDEX_KEY.as_bytes().to_vec(), postcard::to_stdvec(&urls)?));
        self.write_batch(entries).await?;

        tracing::debug!("Bucket now holds {} assets", urls.len());
        Ok(urls.len())
    }

    /// Sorted URLs of every stored asset
    pub async fn urls(&self) -> Result<Vec<String>> {
        match self.read(INDEX_KEY.as_bytes().to_vec()).await? {
            Some(bytes) => Ok(postcard::from_bytes(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    async fn read(&self, key: Vec<u8>) -> Result<Option<Vec<u8>>> {
        let store = self.store.clone();
        task::spawn_blocking(move || get_from_store(store, key)).await?
    }

    async fn write_batch(&self, entries: Vec<(Vec<u8>, Vec<u8>)>) -> Result<()> {
        let db = self.db.clone();
        let store = self.store.clone();
        task::spawn_blocking(move || {
            let mut batch = db.batch();
            for (key, value) in entries {
                batch.insert(&store, key, value);
            }
            batch.commit()
        })
        .await??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn asset(url: &str, body: &[u8]) -> Asset {
        Asset {
            url: url.to_string(),
            status: 200,
            content_type: Some("text/css".to_string()),
            body: body.to_vec(),
        }
    }

    #[test]
    fn test_validate_bucket_name() {
        assert!(validate_bucket_name("weather-app-v1").is_ok());
        assert!(validate_bucket_name("assets_2.0").is_ok());
        assert!(validate_bucket_name("").is_err());
        assert!(validate_bucket_name("with space").is_err());
        assert!(validate_bucket_name("slash/name").is_err());
        assert!(validate_bucket_name(&"a".repeat(256)).is_err());
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::open(dir.path()).unwrap();
        let bucket = store.bucket("weather-app-v1").unwrap();

        bucket
            .put_all(&[asset("http://localhost:8080/css/style.css", b"body{}")])
            .await
            .unwrap();

        let stored = bucket
            .get("http://localhost:8080/css/style.css")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.body, b"body{}");
        assert!(bucket.get("http://localhost:8080/missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_all_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::open(dir.path()).unwrap();
        let bucket = store.bucket("weather-app-v1").unwrap();
        let assets = [
            asset("http://localhost:8080/", b"<html>"),
            asset("http://localhost:8080/css/style.css", b"body{}"),
        ];

        assert_eq!(bucket.put_all(&assets).await.unwrap(), 2);
        let first = bucket.urls().await.unwrap();
        assert_eq!(bucket.put_all(&assets).await.unwrap(), 2);
        assert_eq!(bucket.urls().await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_index_matches_stored_entries_after_reinstall() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::open(dir.path()).unwrap();
        let bucket = store.bucket("weather-app-v1").unwrap();

        bucket
            .put_all(&[
                asset("http://localhost:8080/", b"<html>"),
                asset("http://localhost:8080/js/script.js", b"v1"),
            ])
            .await
            .unwrap();
        bucket
            .put_all(&[
                asset("http://localhost:8080/js/script.js", b"v2"),
                asset("http://localhost:8080/css/style.css", b"body{}"),
            ])
            .await
            .unwrap();

        let urls = bucket.urls().await.unwrap();
        assert_eq!(
            urls,
            vec![
                "http://localhost:8080/",
                "http://localhost:8080/css/style.css",
                "http://localhost:8080/js/script.js",
            ]
        );
        for url in &urls {
            assert!(bucket.get(url).await.unwrap().is_some(), "{url} missing");
        }
        let script = bucket.get("http://localhost:8080/js/script.js").await.unwrap().unwrap();
        assert_eq!(script.body, b"v2");
    }

    #[tokio::test]
    async fn test_concurrent_fills_keep_every_url_indexed() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::open(dir.path()).unwrap();
        let first = store.bucket("weather-app-v1").unwrap();
        let second = store.bucket("weather-app-v1").unwrap();

        let batch_a: Vec<Asset> = (0..20)
            .map(|i| asset(&format!("http://localhost:8080/a/{i}"), b"a"))
            .collect();
        let batch_b: Vec<Asset> = (0..20)
            .map(|i| asset(&format!("http://localhost:8080/b/{i}"), b"b"))
            .collect();

        let (a, b) = tokio::join!(first.put_all(&batch_a), second.put_all(&batch_b));
        a.unwrap();
        b.unwrap();

        assert_eq!(first.urls().await.unwrap().len(), 40);
    }

    #[tokio::test]
    async fn test_buckets_are_separate() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::open(dir.path()).unwrap();
        let v1 = store.bucket("weather-app-v1").unwrap();
        let v2 = store.bucket("weather-app-v2").unwrap();

        v1.put_all(&[asset("http://localhost:8080/", b"old")])
            .await
            .unwrap();

        assert!(v2.get("http://localhost:8080/").await.unwrap().is_none());
        assert!(v2.urls().await.unwrap().is_empty());
        assert_eq!(v1.name(), "weather-app-v1");
    }
}
