//! Port for the flat directory holding uploaded attachments.
//!
//! Names are already sanitised when they reach the store. Writing a name
//! that exists replaces the earlier file.

use async_trait::async_trait;

use crate::domain::AttachmentName;

use super::define_port_error;

define_port_error! {
    /// Errors raised by attachment storage adapters.
    pub enum AttachmentStoreError {
        /// The backing storage could not be reached or written.
        Io { message: String } => "attachment storage failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Write `bytes` under `name`, replacing any earlier file.
    async fn save(&self, name: &AttachmentName, bytes: Vec<u8>)
    -> Result<(), AttachmentStoreError>;

    /// Read the file stored under `name`, if present.
    async fn load(&self, name: &AttachmentName) -> Result<Option<Vec<u8>>, AttachmentStoreError>;

    /// Delete the file stored under `name`. Missing files are not an error.
    async fn remove(&self, name: &AttachmentName) -> Result<(), AttachmentStoreError>;
}
