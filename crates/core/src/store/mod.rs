//! Persistence collaborator
//!
//! The document store owns every prompt record and user profile. The
//! client only ever holds snapshots: reads return copies and live queries
//! push full result sets through a [`Subscription`].
//!
//! Two implementations ship with the crate:
//! - [`MemoryStore`]: process-local, used by tests and demos
//! - [`SqliteStore`]: SQLite file via `sqlx`, WAL journal

mod memory;
mod schema;
mod sqlite;
mod watch;

use async_trait::async_trait;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use watch::{Snapshot, Subscription, Watchers};

use crate::errors::Result;
use crate::model::{
    LikeState, NewPrompt, PromptPatch, PromptQuery, PromptRecord, SessionUser, Upsert, UserProfile,
};

/// Collection name used in log fields and not-found errors
pub const PROMPTS: &str = "prompt";

/// Prompt collection operations
#[async_trait]
pub trait PromptStore: Send + Sync {
    /// Insert a record and return its generated id
    async fn create(&self, prompt: NewPrompt) -> Result<String>;

    async fn get(&self, id: &str) -> Result<PromptRecord>;

    /// One-shot read of every record matching `query`
    async fn query(&self, query: &PromptQuery) -> Result<Vec<PromptRecord>>;

    /// Apply `patch`; only the record owner may do this
    async fn update(&self, id: &str, actor: &str, patch: PromptPatch) -> Result<()>;

    /// Remove a record; only the record owner may do this
    async fn delete(&self, id: &str, actor: &str) -> Result<()>;

    /// Add or remove `uid` from the liked-by set and adjust the counter
    /// as one atomic operation
    async fn toggle_like(&self, id: &str, uid: &str) -> Result<LikeState>;

    /// Live query: the current result set is delivered immediately, then
    /// again after every write that may affect it
    async fn watch(&self, query: PromptQuery) -> Result<Subscription>;
}

/// User profile operations
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn profile(&self, uid: &str) -> Result<Option<UserProfile>>;

    /// Write a new profile for `user`, or refresh the timestamps of the
    /// existing one
    async fn upsert_profile(&self, user: &SessionUser, name: Option<&str>) -> Result<Upsert>;
}
