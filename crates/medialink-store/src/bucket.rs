//! S3-compatible bucket blob storage.
//!
//! Path-style addressing is always used so non-AWS endpoints (MinIO, Ceph,
//! RustFS) resolve without virtual-host DNS. Keys reuse the same
//! namespace-relative locators as the filesystem backend, so a document
//! record's `media_url` stays meaningful when the backing medium changes.

use async_trait::async_trait;
use medialink_core::{sanitize_filename, BlobKind, Error, MediaStore, Removal, Result, StoredBlob};
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::region::Region;
use tracing::{debug, warn};

use crate::naming;

// ─────────────────────────────── Environment ────────────────────────────────

pub const ENV_BUCKET: &str = "MEDIALINK_BUCKET";
pub const ENV_BUCKET_REGION: &str = "MEDIALINK_BUCKET_REGION";
pub const ENV_BUCKET_ENDPOINT: &str = "MEDIALINK_BUCKET_ENDPOINT";
pub const ENV_BUCKET_ACCESS_KEY: &str = "MEDIALINK_BUCKET_ACCESS_KEY";
pub const ENV_BUCKET_SECRET_KEY: &str = "MEDIALINK_BUCKET_SECRET_KEY";
pub const ENV_BUCKET_PUBLIC_URL: &str = "MEDIALINK_BUCKET_PUBLIC_URL";

/// Bucket connection settings.
#[derive(Clone)]
pub struct BucketConfig {
    pub bucket: String,
    pub region: String,
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    /// Base URL prepended to locators by `public_url`. Falls back to
    /// path-style `{endpoint}/{bucket}` when unset.
    pub public_base_url: Option<String>,
}

impl BucketConfig {
    /// Read bucket settings from `MEDIALINK_BUCKET_*` environment variables.
    ///
    /// All variables except [`ENV_BUCKET_PUBLIC_URL`] are required.
    pub fn from_env() -> Result<Self> {
        fn require(key: &str) -> Result<String> {
            std::env::var(key).map_err(|_| Error::Config(format!("{key} is not set")))
        }

        Ok(Self {
            bucket: require(ENV_BUCKET)?,
            region: require(ENV_BUCKET_REGION)?,
            endpoint: require(ENV_BUCKET_ENDPOINT)?,
            access_key: require(ENV_BUCKET_ACCESS_KEY)?,
            secret_key: require(ENV_BUCKET_SECRET_KEY)?,
            public_base_url: std::env::var(ENV_BUCKET_PUBLIC_URL).ok(),
        })
    }
}

impl std::fmt::Debug for BucketConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BucketConfig")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("public_base_url", &self.public_base_url)
            .finish()
    }
}

// ────────────────────────────────── Store ───────────────────────────────────

/// Blob storage on an S3-compatible bucket.
pub struct BucketStore {
    bucket: Box<Bucket>,
    bucket_name: String,
    endpoint: String,
    public_base_url: Option<String>,
}

impl BucketStore {
    /// Build a store from connection settings. No network calls are made
    /// until the first operation.
    pub fn new(config: BucketConfig) -> Result<Self> {
        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        };
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| Error::Config(format!("bucket credentials: {e}")))?;
        let bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(storage_err)?
            .with_path_style();

        Ok(Self {
            bucket,
            bucket_name: config.bucket,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            public_base_url: config
                .public_base_url
                .map(|u| u.trim_end_matches('/').to_string()),
        })
    }

    /// Read settings from the environment and build the store.
    pub fn from_env() -> Result<Self> {
        Self::new(BucketConfig::from_env()?)
    }
}

fn storage_err(e: S3Error) -> Error {
    Error::Storage(e.to_string())
}

#[async_trait]
impl MediaStore for BucketStore {
    async fn put(&self, kind: BlobKind, logical_name: &str, bytes: &[u8]) -> Result<StoredBlob> {
        let sanitized = sanitize_filename(logical_name);
        let stored_name = naming::unique_name(self, kind, &sanitized).await?;
        let locator = kind.locator(&stored_name);

        let response = match infer::get(bytes) {
            Some(t) => {
                self.bucket
                    .put_object_with_content_type(&locator, bytes, t.mime_type())
                    .await
            }
            None => self.bucket.put_object(&locator, bytes).await,
        };
        response.map_err(storage_err)?;
        debug!(locator = %locator, size = bytes.len(), "media_store: write");

        Ok(StoredBlob {
            stored_name,
            locator,
        })
    }

    async fn delete(&self, locator: &str) -> Result<Removal> {
        // DeleteObject succeeds on absent keys, so probe first to report
        // Missing accurately.
        if !self.exists(locator).await? {
            warn!(locator = %locator, "media_store: delete of missing blob");
            return Ok(Removal::Missing);
        }

        self.bucket
            .delete_object(locator)
            .await
            .map_err(storage_err)?;
        debug!(locator = %locator, "media_store: delete");
        Ok(Removal::Removed)
    }

    async fn exists(&self, locator: &str) -> Result<bool> {
        match self.bucket.head_object(locator).await {
            Ok(_) => Ok(true),
            Err(S3Error::HttpFailWithBody(404, _)) => Ok(false),
            Err(e) => Err(storage_err(e)),
        }
    }

    async fn list_names(&self, kind: BlobKind) -> Result<Vec<String>> {
        let prefix = format!("{}/", kind.prefix());
        let pages = self
            .bucket
            .list(prefix.clone(), None)
            .await
            .map_err(storage_err)?;

        let mut names: Vec<String> = pages
            .iter()
            .flat_map(|page| page.contents.iter())
            .filter_map(|object| object.key.strip_prefix(prefix.as_str()))
            .filter(|name| !name.is_empty() && !name.contains('/'))
            .map(str::to_string)
            .collect();
        names.sort();
        Ok(names)
    }

    fn public_url(&self, locator: &str) -> String {
        match &self.public_base_url {
            Some(base) => format!("{base}/{locator}"),
            None => format!("{}/{}/{}", self.endpoint, self.bucket_name, locator),
        }
    }
}
