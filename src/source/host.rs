/// Site hosts: where the manifest and the photos come from
///
/// A host answers two questions about a site-relative path: what are its
/// bytes, and does it exist. Remote sites are read with `ureq` on the
/// blocking pool; local directories with `tokio::fs`.

use std::future::Future;
use std::io::Read;
use std::path::{Path, PathBuf};

use tokio::task;

use crate::error::HostError;

/// Upper bound on a single downloaded resource
const MAX_RESOURCE_BYTES: u64 = 64 * 1024 * 1024;

/// Read access to a static site
pub trait AssetHost: Clone + Send + Sync + 'static {
    /// Fetch the bytes of a site-relative path
    fn fetch(&self, path: &str) -> impl Future<Output = Result<Vec<u8>, HostError>> + Send;

    /// Check whether a site-relative path exists without downloading it
    fn exists(&self, path: &str) -> impl Future<Output = Result<bool, HostError>> + Send;
}

/// A site served over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpHost {
    base_url: String,
}

impl HttpHost {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Map a ureq error to a host error
fn http_error(url: &str, err: ureq::Error) -> HostError {
    match err {
        ureq::Error::Status(404 | 410, _) => HostError::NotFound(url.to_string()),
        ureq::Error::Status(code, _) => HostError::Status {
            url: url.to_string(),
            code,
        },
        ureq::Error::Transport(transport) => HostError::Transport {
            url: url.to_string(),
            message: transport.to_string(),
        },
    }
}

/// Read a response body, failing instead of truncating past `limit` bytes
fn read_capped(reader: impl Read, url: &str, limit: u64) -> Result<Vec<u8>, HostError> {
    let mut bytes = Vec::new();
    reader
        .take(limit + 1)
        .read_to_end(&mut bytes)
        .map_err(|e| HostError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    if bytes.len() as u64 > limit {
        return Err(HostError::TooLarge {
            url: url.to_string(),
            limit,
        });
    }
    Ok(bytes)
}

impl AssetHost for HttpHost {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, HostError> {
        let url = self.url_for(path);

        task::spawn_blocking(move || {
            let response = ureq::get(&url)
                .set("User-Agent", "portfolio-gallery")
                .call()
                .map_err(|e| http_error(&url, e))?;

            read_capped(response.into_reader(), &url, MAX_RESOURCE_BYTES)
        })
        .await
        .map_err(|e| HostError::Join(e.to_string()))?
    }

    async fn exists(&self, path: &str) -> Result<bool, HostError> {
        let url = self.url_for(path);

        task::spawn_blocking(move || {
            match ureq::head(&url)
                .set("User-Agent", "portfolio-gallery")
                .call()
            {
                Ok(_) => Ok(true),
                Err(err) => match http_error(&url, err) {
                    HostError::NotFound(_) => Ok(false),
                    other => Err(other),
                },
            }
        })
        .await
        .map_err(|e| HostError::Join(e.to_string()))?
    }
}

/// A site stored in a local directory
#[derive(Debug, Clone)]
pub struct LocalHost {
    root: PathBuf,
}

impl LocalHost {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

fn io_error(path: &Path, err: std::io::Error) -> HostError {
    if err.kind() == std::io::ErrorKind::NotFound {
        HostError::NotFound(path.display().to_string())
    } else {
        HostError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

impl AssetHost for LocalHost {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, HostError> {
        let full = self.path_for(path);
        tokio::fs::read(&full).await.map_err(|e| io_error(&full, e))
    }

    async fn exists(&self, path: &str) -> Result<bool, HostError> {
        let full = self.path_for(path);
        match tokio::fs::metadata(&full).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) => match io_error(&full, e) {
                HostError::NotFound(_) => Ok(false),
                other => Err(other),
            },
        }
    }
}

/// The host picked from the configured site root
#[derive(Debug, Clone)]
pub enum SiteHost {
    Http(HttpHost),
    Local(LocalHost),
}

impl SiteHost {
    /// `http://` and `https://` roots are remote, anything else is a directory
    pub fn from_root(root: &str) -> Self {
        if root.starts_with("http://") || root.starts_with("https://") {
            SiteHost::Http(HttpHost::new(root))
        } else {
            SiteHost::Local(LocalHost::new(root))
        }
    }
}

impl AssetHost for SiteHost {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, HostError> {
        match self {
            SiteHost::Http(host) => host.fetch(path).await,
            SiteHost::Local(host) => host.fetch(path).await,
        }
    }

    async fn exists(&self, path: &str) -> Result<bool, HostError> {
        match self {
            SiteHost::Http(host) => host.exists(path).await,
            SiteHost::Local(host) => host.exists(path).await,
        }
    }
}

/// In-memory host for tests
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    files: std::sync::Arc<std::collections::HashMap<String, Vec<u8>>>,
    /// Paths whose existence check fails with a transport error
    broken: std::sync::Arc<std::collections::HashSet<String>>,
}

#[cfg(test)]
impl MemoryHost {
    pub fn with_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: Into<String>,
    {
        Self {
            files: std::sync::Arc::new(files.into_iter().map(|(k, v)| (k.into(), v)).collect()),
            broken: Default::default(),
        }
    }

    pub fn with_broken(mut self, path: &str) -> Self {
        let mut broken = (*self.broken).clone();
        broken.insert(path.to_string());
        self.broken = std::sync::Arc::new(broken);
        self
    }
}

#[cfg(test)]
impl AssetHost for MemoryHost {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, HostError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| HostError::NotFound(path.to_string()))
    }

    async fn exists(&self, path: &str) -> Result<bool, HostError> {
        if self.broken.contains(path) {
            return Err(HostError::Transport {
                url: path.to_string(),
                message: "connection reset".to_string(),
            });
        }
        Ok(self.files.contains_key(path))
    }
}
