use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::Storage;
use crate::model::Refreshable;

/// Storage persisting the refreshable as a JSON document on disk.
///
/// Writes go to a sibling `.tmp` file first and are then renamed over the
/// target, so a crash mid-write never leaves a truncated document behind.
pub struct JsonFileStorage<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileStorage<T> {
    /// Creates a storage backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    /// Gets the target file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait::async_trait]
impl<T> Storage<T> for JsonFileStorage<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn get(&self, _ctx: CancellationToken) -> Result<Refreshable<T>> {
        let data = fs::read(&self.path)
            .await
            .with_context(|| format!("read stored value from {:?}", self.path))?;

        let value = serde_json::from_slice(&data)
            .with_context(|| format!("unmarshal stored value from {:?}", self.path))?;

        debug!(component = "storage", event = "read", path = ?self.path, bytes = data.len(), "stored value read");
        Ok(value)
    }

    async fn put(&self, _ctx: CancellationToken, value: Arc<Refreshable<T>>) -> Result<()> {
        let data = serde_json::to_vec_pretty(value.as_ref()).context("marshal value")?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("create storage directory {:?}", dir))?;
        }

        let tmp = self.tmp_path();
        fs::write(&tmp, &data)
            .await
            .with_context(|| format!("write temp file {:?}", tmp))?;
        fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("rename {:?} to {:?}", tmp, self.path))?;

        debug!(component = "storage", event = "write", path = ?self.path, bytes = data.len(), "value stored");
        Ok(())
    }
}
