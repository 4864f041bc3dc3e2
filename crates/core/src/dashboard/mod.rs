//! Dashboard CRUD flow
//!
//! Manages the signed-in user's own prompts: a live list fed by a store
//! subscription, one create/edit form, delete with confirmation, and like
//! toggling.
//!
//! Two guards keep async completions honest:
//! - the phase (`Idle`/`Submitting`) refuses overlapping submit, delete and
//!   like calls without touching the store
//! - the epoch is bumped on every `enter`/`leave`; a call that completes
//!   under an older epoch leaves dashboard state alone
//!
//! The state mutex is never held across an `.await`.

mod form;

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use serde::Serialize;

pub use form::{PromptForm, ValidPrompt};

use crate::errors::{DeckError, FieldErrors, Result};
use crate::model::{LikeState, NewPrompt, PromptPatch, PromptQuery, PromptRecord, SessionUser};
use crate::notify::Notifier;
use crate::store::{PromptStore, Subscription, PROMPTS};

/// Question asked before a delete
pub const DELETE_QUESTION: &str = "Are you sure you want to delete this prompt?";

/// Blocking yes/no question put to the user
pub trait Confirm {
    fn confirm(&self, question: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, question: &str) -> bool {
        self(question)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(String),
    Updated(String),
    /// Edit form submitted without changes; closed without a store call
    Unchanged,
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Declined,
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    Toggled(LikeState),
    Busy,
}

/// Summary numbers shown above the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub submissions:    usize,
    pub likes_received: u64,
}

#[derive(Default)]
struct State {
    user:         Option<SessionUser>,
    epoch:        u64,
    phase:        Phase,
    subscription: Option<Subscription>,
    prompts:      Vec<PromptRecord>,
    form:         Option<PromptForm>,
    liking:       HashSet<String>,
}

impl State {
    fn reset(&mut self) {
        self.user = None;
        self.phase = Phase::Idle;
        // Dropping the handle unregisters the live query.
        self.subscription = None;
        self.prompts.clear();
        self.form = None;
        self.liking.clear();
    }

    fn signed_in(&self) -> Result<SessionUser> {
        self.user.clone().ok_or(DeckError::Unauthenticated)
    }
}

struct Inner {
    store:    Arc<dyn PromptStore>,
    notifier: Notifier,
    state:    Mutex<State>,
}

/// Store call decided while the state lock was held
enum PendingWrite {
    Create(NewPrompt),
    Update(String, PromptPatch),
}

/// Per-user dashboard session
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<Inner>,
}

impl Dashboard {
    pub fn new(store: Arc<dyn PromptStore>, notifier: Notifier) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                notifier,
                state: Mutex::new(State::default()),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    // Lifecycle

    /// Start a dashboard session for `user` and subscribe to their prompts
    pub async fn enter(&self, user: SessionUser) -> Result<()> {
        let epoch = {
            let mut state = self.lock();
            state.reset();
            state.epoch += 1;
            state.user = Some(user.clone());
            state.epoch
        };

        let query = PromptQuery::owned_by(user.uid.as_str());
        match self.inner.store.watch(query).await {
            Ok(mut subscription) => {
                let mut state = self.lock();
                if state.epoch != epoch {
                    tracing::debug!(uid = %user.uid, "dashboard left before subscription opened");
                    return Ok(());
                }
                if let Some(snapshot) = subscription.latest() {
                    state.prompts = snapshot;
                }
                state.subscription = Some(subscription);
                tracing::info!(uid = %user.uid, prompts = state.prompts.len(), "dashboard entered");
                Ok(())
            },
            Err(err) => {
                if self.lock().epoch == epoch {
                    self.inner.notifier.failure("Failed to load your prompts", &err);
                }
                Err(err)
            },
        }
    }

    /// End the session: unsubscribe and forget the list and form
    pub fn leave(&self) {
        let mut state = self.lock();
        if let Some(user) = &state.user {
            tracing::info!(uid = %user.uid, "dashboard left");
        }
        state.epoch += 1;
        state.reset();
    }

    /// Apply the newest queued snapshot; true when the list was replaced
    pub fn sync(&self) -> bool {
        let mut guard = self.lock();
        let state = &mut *guard;

        let Some(subscription) = state.subscription.as_mut() else {
            return false;
        };
        match subscription.latest() {
            Some(snapshot) => {
                state.prompts = snapshot;
                true
            },
            None => false,
        }
    }

    // Read side

    pub fn is_live(&self) -> bool {
        self.lock().subscription.is_some()
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.lock().user.clone()
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    /// Current list, newest first
    pub fn prompts(&self) -> Vec<PromptRecord> {
        self.lock().prompts.clone()
    }

    pub fn form(&self) -> Option<PromptForm> {
        self.lock().form.clone()
    }

    pub fn is_liking(&self, id: &str) -> bool {
        self.lock().liking.contains(id)
    }

    pub fn stats(&self) -> DashboardStats {
        let state = self.lock();
        DashboardStats {
            submissions:    state.prompts.len(),
            likes_received: state.prompts.iter().map(|p| u64::from(p.likes)).sum(),
        }
    }

    // Form

    pub fn open_new(&self) -> Result<()> {
        let mut state = self.lock();
        state.signed_in()?;
        if state.phase == Phase::Submitting {
            return Err(DeckError::Busy);
        }
        state.form = Some(PromptForm::blank());
        Ok(())
    }

    /// Open the form pre-populated from the listed record `id`
    pub fn open_edit(&self, id: &str) -> Result<()> {
        let mut state = self.lock();
        state.signed_in()?;
        if state.phase == Phase::Submitting {
            return Err(DeckError::Busy);
        }

        let form = state
            .prompts
            .iter()
            .find(|p| p.id == id)
            .map(PromptForm::from_record)
            .ok_or_else(|| DeckError::NotFound {
                entity: PROMPTS,
                id:     id.to_string(),
            })?;
        state.form = Some(form);
        Ok(())
    }

    /// Edit the open form; refused while a submit is in flight
    ///
    /// A field's inline error is dropped once its value changes.
    pub fn update_form<F>(&self, edit: F) -> Result<()>
    where
        F: FnOnce(&mut PromptForm),
    {
        let mut guard = self.lock();
        let state = &mut *guard;
        if state.phase == Phase::Submitting {
            return Err(DeckError::Busy);
        }

        let form = state
            .form
            .as_mut()
            .ok_or_else(|| DeckError::Other("No prompt form is open".to_string()))?;
        let before = form.clone();
        edit(form);

        for (field, changed) in [
            ("title", form.title != before.title),
            ("description", form.description != before.description),
            ("full_prompt", form.full_prompt != before.full_prompt),
            ("category", form.category != before.category),
        ] {
            if changed {
                form.errors.clear(field);
            }
        }
        Ok(())
    }

    pub fn close_form(&self) {
        self.lock().form = None;
    }

    // Writes

    /// Submit the open form: create when it is new, update when editing
    ///
    /// Invalid input is stored on the form and returned as
    /// [`DeckError::Validation`] without a notice.
    pub async fn submit(&self) -> Result<SubmitOutcome> {
        let (epoch, user, write) = {
            let mut guard = self.lock();
            let state = &mut *guard;
            let user = state.signed_in()?;
            if state.phase == Phase::Submitting {
                return Ok(SubmitOutcome::Busy);
            }

            let form = state
                .form
                .as_mut()
                .ok_or_else(|| DeckError::Other("No prompt form is open".to_string()))?;
            let valid = match form.validate() {
                Ok(valid) => valid,
                Err(errors) => {
                    form.errors = errors.clone();
                    return Err(DeckError::Validation(errors));
                },
            };
            form.errors = FieldErrors::new();

            let now = Utc::now();
            let target = form.editing().map(str::to_string);
            let baseline = form.baseline().cloned();
            let write = match (target, baseline) {
                (Some(id), Some(baseline)) => {
                    // The snapshot only confirms the record still exists; the
                    // diff is against what the form was opened with.
                    if !state.prompts.iter().any(|p| p.id == id) {
                        let err = DeckError::NotFound {
                            entity: PROMPTS,
                            id,
                        };
                        self.inner.notifier.failure("Failed to update prompt", &err);
                        return Err(err);
                    }
                    let patch = valid.diff(&baseline, now);
                    if patch.is_empty() {
                        state.form = None;
                        return Ok(SubmitOutcome::Unchanged);
                    }
                    PendingWrite::Update(id, patch)
                },
                _ => PendingWrite::Create(valid.into_new(&user, now)),
            };

            state.phase = Phase::Submitting;
            (state.epoch, user, write)
        };

        let (result, success, failure) = match write {
            PendingWrite::Create(prompt) => (
                self.inner
                    .store
                    .create(prompt)
                    .await
                    .map(SubmitOutcome::Created),
                "Prompt added successfully!",
                "Failed to add prompt",
            ),
            PendingWrite::Update(id, patch) => (
                self.inner
                    .store
                    .update(&id, &user.uid, patch)
                    .await
                    .map(|()| SubmitOutcome::Updated(id)),
                "Prompt updated successfully!",
                "Failed to update prompt",
            ),
        };

        let mut state = self.lock();
        if state.epoch != epoch {
            tracing::debug!("submit completed after the dashboard was left");
            return result;
        }
        state.phase = Phase::Idle;

        match result {
            Ok(outcome) => {
                state.form = None;
                self.inner.notifier.success(success);
                Ok(outcome)
            },
            Err(err) => {
                self.inner.notifier.failure(failure, &err);
                Err(err)
            },
        }
    }

    /// Delete `id` once `confirm` agrees
    pub async fn delete(&self, id: &str, confirm: &dyn Confirm) -> Result<DeleteOutcome> {
        {
            let state = self.lock();
            state.signed_in()?;
            if state.phase == Phase::Submitting {
                return Ok(DeleteOutcome::Busy);
            }
        }

        // Asked without the lock held: the answer may take a while.
        if !confirm.confirm(DELETE_QUESTION) {
            tracing::debug!(%id, "delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        let (epoch, user) = {
            let mut state = self.lock();
            let user = state.signed_in()?;
            if state.phase == Phase::Submitting {
                return Ok(DeleteOutcome::Busy);
            }
            state.phase = Phase::Submitting;
            (state.epoch, user)
        };

        let result = self.inner.store.delete(id, &user.uid).await;

        let mut state = self.lock();
        if state.epoch != epoch {
            tracing::debug!(%id, "delete completed after the dashboard was left");
            return result.map(|()| DeleteOutcome::Deleted);
        }
        state.phase = Phase::Idle;

        match result {
            Ok(()) => {
                if state.form.as_ref().and_then(PromptForm::editing) == Some(id) {
                    state.form = None;
                }
                self.inner.notifier.success("Prompt deleted successfully!");
                Ok(DeleteOutcome::Deleted)
            },
            Err(err) => {
                self.inner.notifier.failure("Failed to delete prompt", &err);
                Err(err)
            },
        }
    }

    /// Like or unlike `id` as the signed-in user
    pub async fn toggle_like(&self, id: &str) -> Result<LikeOutcome> {
        let (epoch, user) = {
            let mut state = self.lock();
            let user = match state.signed_in() {
                Ok(user) => user,
                Err(err) => {
                    self.inner.notifier.error("You must be logged in to like prompts");
                    return Err(err);
                },
            };
            if state.phase == Phase::Submitting || !state.liking.insert(id.to_string()) {
                return Ok(LikeOutcome::Busy);
            }
            (state.epoch, user)
        };

        let result = self.inner.store.toggle_like(id, &user.uid).await;

        let mut state = self.lock();
        if state.epoch != epoch {
            tracing::debug!(%id, "like completed after the dashboard was left");
            return result.map(LikeOutcome::Toggled);
        }
        state.liking.remove(id);

        match result {
            Ok(like) => {
                self.inner
                    .notifier
                    .success(if like.liked { "Liked!" } else { "Removed like" });
                Ok(LikeOutcome::Toggled(like))
            },
            Err(err) => {
                self.inner.notifier.failure("Failed to update like", &err);
                Err(err)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AuthProvider, Category};
    use crate::notify::drain;
    use crate::store::MemoryStore;

    fn user(uid: &str) -> SessionUser {
        SessionUser {
            uid:          uid.to_string(),
            email:        format!("{}@example.com", uid),
            display_name: None,
            avatar_url:   None,
            provider:     AuthProvider::Password,
        }
    }

    fn fill(form: &mut PromptForm) {
        form.title = "X".into();
        form.description = "Y".into();
        form.full_prompt = "Z".into();
    }

    async fn dashboard_for(uid: &str) -> (Dashboard, MemoryStore, Notifier) {
        let store = MemoryStore::new();
        let notifier = Notifier::new();
        let dashboard = Dashboard::new(Arc::new(store.clone()), notifier.clone());
        dashboard.enter(user(uid)).await.unwrap();
        (dashboard, store, notifier)
    }

    async fn create(dashboard: &Dashboard) -> String {
        dashboard.open_new().unwrap();
        dashboard.update_form(fill).unwrap();
        match dashboard.submit().await.unwrap() {
            SubmitOutcome::Created(id) => id,
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_enter_subscribes_and_lists() {
        let (dashboard, store, _) = dashboard_for("u1").await;
        assert!(dashboard.is_live());
        assert_eq!(store.watcher_count(), 1);
        assert!(dashboard.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_create_closes_form_and_lists_record() {
        let (dashboard, _store, notifier) = dashboard_for("u1").await;
        let (_id, mut rx) = notifier.attach();

        let id = create(&dashboard).await;
        assert!(dashboard.form().is_none());
        assert_eq!(dashboard.phase(), Phase::Idle);

        assert!(dashboard.sync());
        let prompts = dashboard.prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].id, id);
        assert_eq!(prompts[0].owner_name, "u1");
        assert_eq!(prompts[0].likes, 0);

        let notices = drain(&mut rx);
        assert_eq!(notices[0].message, "Prompt added successfully!");
    }

    #[tokio::test]
    async fn test_invalid_form_stays_open_with_errors() {
        let (dashboard, store, notifier) = dashboard_for("u1").await;
        let (_id, mut rx) = notifier.attach();

        dashboard.open_new().unwrap();
        let err = dashboard.submit().await.unwrap_err();

        assert!(matches!(err, DeckError::Validation(_)));
        let form = dashboard.form().unwrap();
        assert_eq!(form.errors.get("title"), Some("Title is required"));
        assert!(drain(&mut rx).is_empty());
        assert!(store.query(&PromptQuery::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edit_sends_only_changes() {
        let (dashboard, store, _) = dashboard_for("u1").await;
        let id = create(&dashboard).await;
        dashboard.sync();
        let before = store.get(&id).await.unwrap();

        dashboard.open_edit(&id).unwrap();
        assert_eq!(dashboard.form().unwrap().editing(), Some(id.as_str()));
        dashboard
            .update_form(|f| f.category = Category::DevOps.label().to_string())
            .unwrap();

        assert_eq!(dashboard.submit().await.unwrap(), SubmitOutcome::Updated(id.clone()));
        let after = store.get(&id).await.unwrap();
        assert_eq!(after.category, Category::DevOps);
        assert_eq!(after.title, before.title);
        assert_eq!(after.owner_id, before.owner_id);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);
    }

    #[tokio::test]
    async fn test_edit_keeps_concurrent_change_to_untouched_field() {
        let (dashboard, store, _) = dashboard_for("u1").await;
        let id = create(&dashboard).await;
        dashboard.sync();
        dashboard.open_edit(&id).unwrap();

        // Another client renames the record while the form is open.
        let mut rename = PromptPatch::new(Utc::now());
        rename.title = Some("B".into());
        store.update(&id, "u1", rename).await.unwrap();
        assert!(dashboard.sync());

        dashboard
            .update_form(|f| f.description = "edited".into())
            .unwrap();
        assert_eq!(dashboard.submit().await.unwrap(), SubmitOutcome::Updated(id.clone()));

        let after = store.get(&id).await.unwrap();
        assert_eq!(after.title, "B");
        assert_eq!(after.description, "edited");
    }

    #[tokio::test]
    async fn test_editing_a_field_clears_its_error() {
        let (dashboard, _store, _) = dashboard_for("u1").await;
        dashboard.open_new().unwrap();
        assert!(dashboard.submit().await.is_err());

        dashboard.update_form(|f| f.title = "X".into()).unwrap();
        let form = dashboard.form().unwrap();
        assert_eq!(form.errors.get("title"), None);
        assert_eq!(form.errors.get("description"), Some("Description is required"));
    }

    #[tokio::test]
    async fn test_unchanged_edit_skips_store() {
        let (dashboard, _store, notifier) = dashboard_for("u1").await;
        let id = create(&dashboard).await;
        dashboard.sync();
        let (_id, mut rx) = notifier.attach();

        dashboard.open_edit(&id).unwrap();
        assert_eq!(dashboard.submit().await.unwrap(), SubmitOutcome::Unchanged);
        assert!(dashboard.form().is_none());
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_declined_delete_is_a_no_op() {
        let (dashboard, store, _) = dashboard_for("u1").await;
        let id = create(&dashboard).await;

        let outcome = dashboard.delete(&id, &|_: &str| false).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Declined);
        assert!(store.get(&id).await.is_ok());
    }

    #[tokio::test]
    async fn test_confirmed_delete_removes_record() {
        let (dashboard, store, _) = dashboard_for("u1").await;
        let id = create(&dashboard).await;

        let asked = std::sync::Mutex::new(None);
        let confirm = |q: &str| {
            *asked.lock().unwrap() = Some(q.to_string());
            true
        };
        assert_eq!(dashboard.delete(&id, &confirm).await.unwrap(), DeleteOutcome::Deleted);
        assert_eq!(asked.into_inner().unwrap().as_deref(), Some(DELETE_QUESTION));

        dashboard.sync();
        assert!(dashboard.prompts().is_empty());
        assert!(store.get(&id).await.is_err());
    }

    #[tokio::test]
    async fn test_like_twice_round_trips() {
        let (dashboard, _store, notifier) = dashboard_for("u1").await;
        let id = create(&dashboard).await;
        let (_id, mut rx) = notifier.attach();

        let first = dashboard.toggle_like(&id).await.unwrap();
        assert_eq!(first, LikeOutcome::Toggled(LikeState { liked: true, likes: 1 }));
        let second = dashboard.toggle_like(&id).await.unwrap();
        assert_eq!(second, LikeOutcome::Toggled(LikeState { liked: false, likes: 0 }));
        assert!(!dashboard.is_liking(&id));

        let messages: Vec<_> = drain(&mut rx).into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["Liked!", "Removed like"]);
    }

    #[tokio::test]
    async fn test_store_failure_keeps_form_and_notifies() {
        let (dashboard, _store, notifier) = dashboard_for("u1").await;
        let id = create(&dashboard).await;
        dashboard.sync();
        let (_id, mut rx) = notifier.attach();

        // Another client removes the record while the edit form is open.
        dashboard.open_edit(&id).unwrap();
        dashboard.update_form(|f| f.title = "renamed".into()).unwrap();
        dashboard.inner.store.delete(&id, "u1").await.unwrap();

        assert!(dashboard.submit().await.is_err());
        let form = dashboard.form().unwrap();
        assert_eq!(form.title, "renamed");
        assert_eq!(dashboard.phase(), Phase::Idle);

        let notices = drain(&mut rx);
        assert_eq!(notices.len(), 1);
        assert!(notices[0].message.starts_with("Failed to update prompt"));
    }

    #[tokio::test]
    async fn test_like_without_session_is_refused() {
        let store = MemoryStore::new();
        let dashboard = Dashboard::new(Arc::new(store), Notifier::new());

        let err = dashboard.toggle_like("p1").await.unwrap_err();
        assert!(matches!(err, DeckError::Unauthenticated));
        assert!(matches!(dashboard.open_new(), Err(DeckError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_leave_unsubscribes_and_clears() {
        let (dashboard, store, _) = dashboard_for("u1").await;
        create(&dashboard).await;
        dashboard.sync();
        dashboard.open_new().unwrap();

        dashboard.leave();
        assert!(!dashboard.is_live());
        assert_eq!(store.watcher_count(), 0);
        assert!(dashboard.prompts().is_empty());
        assert!(dashboard.form().is_none());
        assert!(!dashboard.sync());
    }

    #[tokio::test]
    async fn test_stats_sum_likes() {
        let (dashboard, store, _) = dashboard_for("u1").await;
        let a = create(&dashboard).await;
        create(&dashboard).await;
        store.toggle_like(&a, "u2").await.unwrap();
        store.toggle_like(&a, "u3").await.unwrap();
        dashboard.sync();

        assert_eq!(
            dashboard.stats(),
            DashboardStats {
                submissions:    2,
                likes_received: 2,
            }
        );
    }
}
