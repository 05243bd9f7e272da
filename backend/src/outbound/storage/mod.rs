//! Upload directory adapter.
//!
//! Files live flat inside one directory opened through `cap_std`, so every
//! operation is confined to that directory even if a name slipped past
//! sanitising. `cap_std` is synchronous; calls hop onto the blocking pool.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use crate::domain::AttachmentName;
use crate::domain::ports::{AttachmentStore, AttachmentStoreError};

/// Attachment store backed by a local directory.
#[derive(Clone)]
pub struct LocalAttachmentStore {
    dir: Arc<Dir>,
    root: PathBuf,
}

impl LocalAttachmentStore {
    /// Open `root`, creating it and any missing parents.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the directory cannot be
    /// created or opened.
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        Dir::create_ambient_dir_all(&root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority())?;
        Ok(Self {
            dir: Arc::new(dir),
            root,
        })
    }

    /// Directory the store writes into.
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T, AttachmentStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Dir) -> io::Result<T> + Send + 'static,
    {
        let dir = Arc::clone(&self.dir);
        tokio::task::spawn_blocking(move || op(&dir))
            .await
            .map_err(|err| AttachmentStoreError::io(format!("storage task failed: {err}")))?
            .map_err(|err| AttachmentStoreError::io(err.to_string()))
    }
}

#[async_trait]
impl AttachmentStore for LocalAttachmentStore {
    async fn save(
        &self,
        name: &AttachmentName,
        bytes: Vec<u8>,
    ) -> Result<(), AttachmentStoreError> {
        let file = name.to_string();
        debug!(file = %file, len = bytes.len(), "writing attachment");
        self.blocking(move |dir| dir.write(&file, bytes)).await
    }

    async fn load(&self, name: &AttachmentName) -> Result<Option<Vec<u8>>, AttachmentStoreError> {
        let file = name.to_string();
        self.blocking(move |dir| match dir.read(&file) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        })
        .await
    }

    async fn remove(&self, name: &AttachmentName) -> Result<(), AttachmentStoreError> {
        let file = name.to_string();
        self.blocking(move |dir| match dir.remove_file(&file) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        })
        .await
    }
}
