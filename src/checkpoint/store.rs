//! Reference file-backed `CheckpointSink`/`CheckpointSource`, one JSON file
//! per correlation id (checkpoints supersede each other, unlike the
//! append-only event log this is grounded on). Idiom grounded in
//! `coordinator/persistence.rs`'s `EventStore`: a store struct wrapping a
//! directory, `tokio::fs` for I/O, `tracing::debug!` per operation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::{Checkpoint, CheckpointSink, CheckpointSource};

pub struct FileCheckpointStore {
    store_path: PathBuf,
}

impl FileCheckpointStore {
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
        }
    }

    fn checkpoint_file(&self, correlation_id: &str) -> PathBuf {
        self.store_path.join(format!("{correlation_id}.checkpoint.json"))
    }

    async fn ensure_dir(&self) -> eyre::Result<()> {
        fs::create_dir_all(&self.store_path).await?;
        Ok(())
    }
}

#[async_trait]
impl CheckpointSink for FileCheckpointStore {
    async fn save(&self, checkpoint: &Checkpoint) -> eyre::Result<()> {
        debug!(correlation_id = %checkpoint.correlation_id, phase = %checkpoint.phase, "saving checkpoint");
        self.ensure_dir().await?;
        let path = self.checkpoint_file(&checkpoint.correlation_id);
        let body = serde_json::to_vec_pretty(checkpoint)?;
        fs::write(&path, body).await?;
        Ok(())
    }
}

#[async_trait]
impl CheckpointSource for FileCheckpointStore {
    async fn load(&self, correlation_id: &str) -> eyre::Result<Option<Checkpoint>> {
        let path = self.checkpoint_file(correlation_id);
        if !Path::new(&path).exists() {
            debug!(correlation_id, "no checkpoint file found");
            return Ok(None);
        }
        let body = fs::read(&path).await?;
        let checkpoint: Checkpoint = serde_json::from_slice(&body)?;
        Ok(Some(checkpoint))
    }
}
