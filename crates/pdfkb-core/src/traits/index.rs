//! External vector index boundary.
//!
//! The knowledge base only pushes text into the index and clears it on
//! recreate. It never queries it back.

use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait VectorIndex: Send + Sync {
    fn name(&self) -> &str;

    /// Index a copy of the extracted text.
    async fn insert(&self, text: String, upsert: bool) -> Result<()>;

    /// Drop everything previously indexed.
    async fn clear(&self) -> Result<()>;
}
