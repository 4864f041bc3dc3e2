//! Process-local document store
//!
//! All state sits behind one mutex, so every operation (the like toggle
//! included) is atomic with respect to every other. Live queries are
//! republished while the lock is still held, which keeps snapshot order
//! identical to write order.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::watch::{Subscription, Watchers};
use super::{ProfileStore, PromptStore, PROMPTS};
use crate::errors::{DeckError, Result};
use crate::model::{
    LikeState, NewPrompt, PromptPatch, PromptQuery, PromptRecord, SessionUser, Upsert, UserId,
    UserProfile,
};

#[derive(Default)]
struct State {
    prompts:  HashMap<String, PromptRecord>,
    profiles: HashMap<UserId, UserProfile>,
}

/// In-memory implementation of [`PromptStore`] and [`ProfileStore`]
#[derive(Clone, Default)]
pub struct MemoryStore {
    state:    Arc<Mutex<State>>,
    watchers: Watchers,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of live queries currently registered
    pub fn watcher_count(&self) -> usize {
        self.watchers.len()
    }

    fn publish(&self, state: &State) {
        self.watchers.publish(|query| query.select(state.prompts.values()));
    }

    fn owned_mut<'a>(
        state: &'a mut State,
        id: &str,
        actor: &str,
    ) -> Result<&'a mut PromptRecord> {
        let record = state.prompts.get_mut(id).ok_or_else(|| not_found(id))?;
        if record.owner_id != actor {
            return Err(DeckError::PermissionDenied(format!(
                "{} does not own prompt {}",
                actor, id
            )));
        }
        Ok(record)
    }
}

fn not_found(id: &str) -> DeckError {
    DeckError::NotFound {
        entity: PROMPTS,
        id:     id.to_string(),
    }
}

#[async_trait]
impl PromptStore for MemoryStore {
    async fn create(&self, prompt: NewPrompt) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let record = PromptRecord {
            id:          id.clone(),
            title:       prompt.title,
            description: prompt.description,
            full_prompt: prompt.full_prompt,
            category:    prompt.category,
            owner_id:    prompt.owner_id,
            owner_name:  prompt.owner_name,
            likes:       0,
            liked_by:    BTreeSet::new(),
            created_at:  prompt.created_at,
            updated_at:  prompt.updated_at,
        };

        let mut state = self.lock();
        state.prompts.insert(id.clone(), record);
        self.publish(&state);
        tracing::debug!(%id, "prompt created");
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<PromptRecord> {
        self.lock()
            .prompts
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn query(&self, query: &PromptQuery) -> Result<Vec<PromptRecord>> {
        Ok(query.select(self.lock().prompts.values()))
    }

    async fn update(&self, id: &str, actor: &str, patch: PromptPatch) -> Result<()> {
        let mut state = self.lock();
        let record = Self::owned_mut(&mut state, id, actor)?;
        patch.apply_to(record);
        self.publish(&state);
        tracing::debug!(%id, "prompt updated");
        Ok(())
    }

    async fn delete(&self, id: &str, actor: &str) -> Result<()> {
        let mut state = self.lock();
        Self::owned_mut(&mut state, id, actor)?;
        state.prompts.remove(id);
        self.publish(&state);
        tracing::debug!(%id, "prompt deleted");
        Ok(())
    }

    async fn toggle_like(&self, id: &str, uid: &str) -> Result<LikeState> {
        let mut state = self.lock();
        let record = state.prompts.get_mut(id).ok_or_else(|| not_found(id))?;

        let liked = if record.liked_by.remove(uid) {
            false
        } else {
            record.liked_by.insert(uid.to_string());
            true
        };
        record.likes = record.liked_by.len() as u32;
        let like = LikeState {
            liked,
            likes: record.likes,
        };

        self.publish(&state);
        Ok(like)
    }

    async fn watch(&self, query: PromptQuery) -> Result<Subscription> {
        let state = self.lock();
        let initial = query.select(state.prompts.values());
        Ok(self.watchers.subscribe(query, initial))
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn profile(&self, uid: &str) -> Result<Option<UserProfile>> {
        Ok(self.lock().profiles.get(uid).cloned())
    }

    async fn upsert_profile(&self, user: &SessionUser, name: Option<&str>) -> Result<Upsert> {
        let now = Utc::now();
        let mut state = self.lock();

        match state.profiles.get_mut(&user.uid) {
            Some(existing) => {
                existing.touch(now);
                Ok(Upsert::Touched)
            },
            None => {
                state
                    .profiles
                    .insert(user.uid.clone(), UserProfile::first_seen(user, name, now));
                Ok(Upsert::Created)
            },
        }
    }
}
