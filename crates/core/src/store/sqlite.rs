//! SQLite-backed document store
//!
//! Records live in a single SQLite file opened through a `sqlx` pool in WAL
//! mode. The liked-by set is a separate table and the `likes` column is
//! recomputed from it inside the same transaction, so the counter can never
//! drift from the set.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::schema::SCHEMA;
use super::watch::{Subscription, Watchers};
use super::{ProfileStore, PromptStore, PROMPTS};
use crate::config::Config;
use crate::errors::{DeckError, Result};
use crate::model::{
    LikeState, NewPrompt, PromptPatch, PromptQuery, PromptRecord, SessionUser, Upsert, UserProfile,
};

const COLUMNS: &str = "id, title, description, full_prompt, category, owner_id, owner_name, likes, created_at, updated_at";

#[derive(Debug, FromRow)]
struct PromptRow {
    id:          String,
    title:       String,
    description: String,
    full_prompt: String,
    category:    String,
    owner_id:    String,
    owner_name:  String,
    likes:       i64,
    created_at:  i64,
    updated_at:  i64,
}

#[derive(Debug, FromRow)]
struct LikeRow {
    prompt_id: String,
    user_id:   String,
}

#[derive(Debug, FromRow)]
struct ProfileRow {
    uid:           String,
    email:         String,
    name:          String,
    avatar_url:    Option<String>,
    provider:      String,
    created_at:    i64,
    updated_at:    i64,
    last_login_at: Option<i64>,
}

// Nanosecond precision keeps same-millisecond creates in order.
fn to_nanos(at: DateTime<Utc>) -> Result<i64> {
    at.timestamp_nanos_opt()
        .ok_or_else(|| DeckError::Other(format!("Timestamp out of range: {}", at)))
}

fn from_nanos(ns: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_nanos(ns)
}

impl PromptRow {
    fn into_record(self, liked_by: BTreeSet<String>) -> Result<PromptRecord> {
        Ok(PromptRecord {
            category: self.category.parse()?,
            created_at: from_nanos(self.created_at),
            updated_at: from_nanos(self.updated_at),
            likes: u32::try_from(self.likes.max(0)).unwrap_or(u32::MAX),
            liked_by,
            id: self.id,
            title: self.title,
            description: self.description,
            full_prompt: self.full_prompt,
            owner_id: self.owner_id,
            owner_name: self.owner_name,
        })
    }
}

impl ProfileRow {
    fn into_profile(self) -> Result<UserProfile> {
        Ok(UserProfile {
            provider: self.provider.parse()?,
            created_at: from_nanos(self.created_at),
            updated_at: from_nanos(self.updated_at),
            last_login_at: self.last_login_at.map(from_nanos),
            uid: self.uid,
            email: self.email,
            name: self.name,
            avatar_url: self.avatar_url,
        })
    }
}

/// [`PromptStore`] and [`ProfileStore`] over an SQLite file
pub struct SqliteStore {
    pool:         SqlitePool,
    watchers:     Watchers,
    // Serializes snapshot reads so the last published snapshot is never
    // older than the last committed write.
    publish_gate: Mutex<()>,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and apply the schema
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DeckError::ConfigError(format!("Failed to create database directory: {}", e))
            })?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(
                SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal),
            )
            .await?;

        for statement in SCHEMA.split(';') {
            if statement.trim().is_empty() {
                continue;
            }
            sqlx::query(statement).execute(&pool).await?;
        }

        tracing::info!(path = %path.display(), "prompt database ready");

        Ok(Self {
            pool,
            watchers: Watchers::new(),
            publish_gate: Mutex::new(()),
        })
    }

    /// Open the database named by [`Config::db_path`]
    pub async fn from_config(config: &Config) -> Result<Self> {
        Self::open(&config.db_path).await
    }

    /// Number of live queries currently registered
    pub fn watcher_count(&self) -> usize {
        self.watchers.len()
    }

    async fn load(&self, query: &PromptQuery) -> Result<Vec<PromptRecord>> {
        let owner = query.owner_id.as_deref();

        let rows = sqlx::query_as::<_, PromptRow>(&format!(
            "SELECT {} FROM prompts
             WHERE (? IS NULL OR owner_id = ?)",
            COLUMNS
        ))
        .bind(owner)
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        let likes = sqlx::query_as::<_, LikeRow>(
            "SELECT l.prompt_id, l.user_id FROM prompt_likes l
             JOIN prompts p ON p.id = l.prompt_id
             WHERE (? IS NULL OR p.owner_id = ?)",
        )
        .bind(owner)
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        let mut liked_by: HashMap<String, BTreeSet<String>> = HashMap::new();
        for like in likes {
            liked_by.entry(like.prompt_id).or_default().insert(like.user_id);
        }

        let records = rows
            .into_iter()
            .map(|row| {
                let set = liked_by.remove(&row.id).unwrap_or_default();
                row.into_record(set)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(query.select(&records))
    }

    /// Push fresh snapshots to live queries after a committed write
    async fn republish(&self) {
        if self.watchers.is_empty() {
            return;
        }

        let _gate = self.publish_gate.lock().await;
        match self.load(&PromptQuery::default()).await {
            Ok(all) => self.watchers.publish(|query| query.select(&all)),
            Err(err) => tracing::warn!(error = %err, "failed to refresh live queries"),
        }
    }

    /// Explain why a guarded write touched no rows
    async fn miss(&self, id: &str, actor: &str) -> DeckError {
        let owner = sqlx::query_scalar::<_, String>("SELECT owner_id FROM prompts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;

        match owner {
            Ok(Some(_)) => DeckError::PermissionDenied(format!(
                "{} does not own prompt {}",
                actor, id
            )),
            Ok(None) => DeckError::NotFound {
                entity: PROMPTS,
                id:     id.to_string(),
            },
            Err(err) => err.into(),
        }
    }
}

#[async_trait]
impl PromptStore for SqliteStore {
    async fn create(&self, prompt: NewPrompt) -> Result<String> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO prompts (id, title, description, full_prompt, category, owner_id, owner_name, likes, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?, ?)",
        )
        .bind(&id)
        .bind(&prompt.title)
        .bind(&prompt.description)
        .bind(&prompt.full_prompt)
        .bind(prompt.category.label())
        .bind(&prompt.owner_id)
        .bind(&prompt.owner_name)
        .bind(to_nanos(prompt.created_at)?)
        .bind(to_nanos(prompt.updated_at)?)
        .execute(&self.pool)
        .await?;

        tracing::debug!(%id, "prompt created");
        self.republish().await;
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<PromptRecord> {
        let row = sqlx::query_as::<_, PromptRow>(&format!(
            "SELECT {} FROM prompts WHERE id = ?",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DeckError::NotFound {
            entity: PROMPTS,
            id:     id.to_string(),
        })?;

        let liked_by = sqlx::query_scalar::<_, String>(
            "SELECT user_id FROM prompt_likes WHERE prompt_id = ?",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .collect();

        row.into_record(liked_by)
    }

    async fn query(&self, query: &PromptQuery) -> Result<Vec<PromptRecord>> {
        self.load(query).await
    }

    async fn update(&self, id: &str, actor: &str, patch: PromptPatch) -> Result<()> {
        let result = sqlx::query(
            "UPDATE prompts SET
                title = COALESCE(?, title),
                description = COALESCE(?, description),
                full_prompt = COALESCE(?, full_prompt),
                category = COALESCE(?, category),
                updated_at = ?
             WHERE id = ? AND owner_id = ?",
        )
        .bind(patch.title.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.full_prompt.as_deref())
        .bind(patch.category.map(|c| c.label()))
        .bind(to_nanos(patch.updated_at)?)
        .bind(id)
        .bind(actor)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(self.miss(id, actor).await);
        }

        tracing::debug!(%id, "prompt updated");
        self.republish().await;
        Ok(())
    }

    async fn delete(&self, id: &str, actor: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM prompts WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(actor)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            tx.rollback().await?;
            return Err(self.miss(id, actor).await);
        }

        sqlx::query("DELETE FROM prompt_likes WHERE prompt_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::debug!(%id, "prompt deleted");
        self.republish().await;
        Ok(())
    }

    async fn toggle_like(&self, id: &str, uid: &str) -> Result<LikeState> {
        let mut tx = self.pool.begin().await?;

        // Start with a write so the transaction holds the write lock before
        // it reads anything.
        let unliked = sqlx::query("DELETE FROM prompt_likes WHERE prompt_id = ? AND user_id = ?")
            .bind(id)
            .bind(uid)
            .execute(&mut *tx)
            .await?
            .rows_affected()
            > 0;

        if !unliked {
            let exists = sqlx::query_scalar::<_, String>("SELECT id FROM prompts WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
            if exists.is_none() {
                tx.rollback().await?;
                return Err(DeckError::NotFound {
                    entity: PROMPTS,
                    id:     id.to_string(),
                });
            }

            sqlx::query("INSERT INTO prompt_likes (prompt_id, user_id) VALUES (?, ?)")
                .bind(id)
                .bind(uid)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query(
            "UPDATE prompts SET likes = (SELECT COUNT(*) FROM prompt_likes WHERE prompt_id = ?)
             WHERE id = ?",
        )
        .bind(id)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let likes = sqlx::query_scalar::<_, i64>("SELECT likes FROM prompts WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        self.republish().await;

        Ok(LikeState {
            liked: !unliked,
            likes: u32::try_from(likes.max(0)).unwrap_or(u32::MAX),
        })
    }

    async fn watch(&self, query: PromptQuery) -> Result<Subscription> {
        let _gate = self.publish_gate.lock().await;
        let initial = self.load(&query).await?;
        Ok(self.watchers.subscribe(query, initial))
    }
}

#[async_trait]
impl ProfileStore for SqliteStore {
    async fn profile(&self, uid: &str) -> Result<Option<UserProfile>> {
        sqlx::query_as::<_, ProfileRow>(
            "SELECT uid, email, name, avatar_url, provider, created_at, updated_at, last_login_at
             FROM profiles WHERE uid = ?",
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await?
        .map(ProfileRow::into_profile)
        .transpose()
    }

    async fn upsert_profile(&self, user: &SessionUser, name: Option<&str>) -> Result<Upsert> {
        let now = Utc::now();
        let profile = UserProfile::first_seen(user, name, now);

        let inserted = sqlx::query(
            "INSERT INTO profiles (uid, email, name, avatar_url, provider, created_at, updated_at, last_login_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, NULL)
             ON CONFLICT(uid) DO NOTHING",
        )
        .bind(&profile.uid)
        .bind(&profile.email)
        .bind(&profile.name)
        .bind(profile.avatar_url.as_deref())
        .bind(profile.provider.as_str())
        .bind(to_nanos(profile.created_at)?)
        .bind(to_nanos(profile.updated_at)?)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted > 0 {
            return Ok(Upsert::Created);
        }

        sqlx::query("UPDATE profiles SET updated_at = ?, last_login_at = ? WHERE uid = ?")
            .bind(to_nanos(now)?)
            .bind(to_nanos(now)?)
            .bind(&user.uid)
            .execute(&self.pool)
            .await?;

        Ok(Upsert::Touched)
    }
}
