//! JSON-file persistence for finished records.
//!
//! One file per record, named by the storage key. Thin by design: the
//! extraction core hands a finished record across this boundary and never
//! looks back.

use std::path::PathBuf;

use async_trait::async_trait;
use shopintel_core::InsightsRecord;
use shopintel_extractor::collab::{CollabError, InsightsStore};

pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl InsightsStore for JsonFileStore {
    async fn store(&self, key: &str, record: &InsightsRecord) -> Result<(), CollabError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(format!("{key}.json"));
        let json = serde_json::to_vec_pretty(record)?;
        tokio::fs::write(&path, json).await?;
        tracing::debug!(path = %path.display(), "record written");
        Ok(())
    }
}
