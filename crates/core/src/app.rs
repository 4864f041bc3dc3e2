//! Application shell
//!
//! Wires the view-state controller, the session flow and the dashboard
//! together. Session transitions are observed through a subscription and
//! applied by [`App::pump`]; the dashboard is entered exactly while the
//! dashboard page is shown to a signed-in user.

use std::sync::Arc;

use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::errors::Result;
use crate::logging;
use crate::model::{AuthProvider, SessionUser};
use crate::notify::Notifier;
use crate::runtime;
use crate::session::{AuthBackend, MemoryAuth, SessionFlow, SessionSubscription, SignUpForm};
use crate::store::{ProfileStore, PromptStore, SqliteStore};
use crate::view::{Page, ViewState};

pub struct App {
    view:      ViewState,
    session:   SessionFlow,
    dashboard: Dashboard,
    events:    SessionSubscription,
    notifier:  Notifier,
}

impl App {
    pub fn new<S>(auth: Arc<dyn AuthBackend>, store: Arc<S>) -> Self
    where
        S: PromptStore + ProfileStore + 'static,
    {
        let notifier = Notifier::new();
        let prompts: Arc<dyn PromptStore> = store.clone();
        let profiles: Arc<dyn ProfileStore> = store;

        Self {
            view: ViewState::new(),
            events: auth.observe(),
            session: SessionFlow::new(auth, profiles, notifier.clone()),
            dashboard: Dashboard::new(prompts, notifier.clone()),
            notifier,
        }
    }

    /// Synchronous startup for hosts without their own runtime
    ///
    /// Loads [`Config::global`], installs logging and opens the SQLite
    /// store on the shared runtime. Must not be called from async code.
    pub fn bootstrap() -> Result<Self> {
        let config = Config::global()?;
        Self::bootstrap_with(config)
    }

    pub fn bootstrap_with(config: &Config) -> Result<Self> {
        logging::init_from_config(config);
        if !config.has_remote_credentials() {
            tracing::info!("no hosted identity credentials configured, using local accounts");
        }

        let store = runtime::block_on(SqliteStore::from_config(config))?;
        Ok(Self::new(Arc::new(MemoryAuth::new()), Arc::new(store)))
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn page(&self) -> &Page {
        self.view.page()
    }

    pub fn session(&self) -> &SessionFlow {
        &self.session
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.session.current_user()
    }

    /// Navigate to `page`, then bring the dashboard in line with it
    pub async fn navigate(&mut self, page: Page) -> Result<()> {
        let user = self.session.current_user();
        if let Err(err) = self.view.go(page, user.as_ref()) {
            self.notifier.failure("Page not found", &err);
            return Err(err);
        }
        self.settle().await
    }

    /// Apply queued session transitions and the newest list snapshot
    pub async fn pump(&mut self) -> Result<()> {
        while let Some(session) = self.events.try_next() {
            self.view.on_session_change(session.as_ref());
        }
        self.settle().await?;
        self.dashboard.sync();
        Ok(())
    }

    async fn settle(&mut self) -> Result<()> {
        let wanted = match (self.view.page(), self.session.current_user()) {
            (Page::Dashboard, Some(user)) => Some(user),
            _ => None,
        };
        let current = self.dashboard.user();

        match (wanted, current) {
            (Some(user), Some(active)) if user.uid == active.uid && self.dashboard.is_live() => {
                Ok(())
            },
            (Some(user), _) => self.dashboard.enter(user).await,
            (None, Some(_)) => {
                self.dashboard.leave();
                Ok(())
            },
            (None, None) => Ok(()),
        }
    }

    pub async fn sign_up(&mut self, form: &SignUpForm) -> Result<SessionUser> {
        let user = self.session.sign_up(form).await?;
        self.pump().await?;
        Ok(user)
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<SessionUser> {
        let user = self.session.sign_in(email, password).await?;
        self.pump().await?;
        Ok(user)
    }

    pub async fn sign_in_with_provider(&mut self, provider: AuthProvider) -> Result<SessionUser> {
        let user = self.session.sign_in_with_provider(provider).await?;
        self.pump().await?;
        Ok(user)
    }

    pub async fn sign_out(&mut self) -> Result<()> {
        self.session.sign_out().await?;
        self.pump().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn app() -> (App, MemoryStore) {
        let store = MemoryStore::new();
        let app = App::new(Arc::new(MemoryAuth::new()), Arc::new(store.clone()));
        (app, store)
    }

    #[tokio::test]
    async fn test_dashboard_gate_and_redirect() {
        let (mut app, store) = app();

        app.navigate(Page::Dashboard).await.unwrap();
        assert_eq!(app.page(), &Page::Home);
        assert!(!app.dashboard().is_live());

        app.navigate(Page::Signup).await.unwrap();
        app.sign_up(&SignUpForm::new("Ada", "ada@example.com", "secret1"))
            .await
            .unwrap();

        assert_eq!(app.page(), &Page::Dashboard);
        assert!(app.dashboard().is_live());
        assert_eq!(store.watcher_count(), 1);
    }

    #[tokio::test]
    async fn test_sign_out_leaves_dashboard() {
        let (mut app, store) = app();
        app.sign_up(&SignUpForm::new("Ada", "ada@example.com", "secret1"))
            .await
            .unwrap();
        app.navigate(Page::Dashboard).await.unwrap();
        assert!(app.dashboard().is_live());

        app.sign_out().await.unwrap();
        assert_eq!(app.page(), &Page::Home);
        assert!(!app.dashboard().is_live());
        assert_eq!(store.watcher_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_article_stays_put() {
        let (mut app, _) = app();
        app.navigate(Page::ArticleCatalog).await.unwrap();

        assert!(app
            .navigate(Page::ArticleDetail("missing".into()))
            .await
            .is_err());
        assert_eq!(app.page(), &Page::ArticleCatalog);
    }

    #[test]
    fn test_bootstrap_opens_sqlite_store() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("prompts.db");
        let config = Config::from_lookup(|key| match key {
            "PROMPTDECK_DB_PATH" => Some(db_path.display().to_string()),
            _ => None,
        })
        .unwrap();

        let app = App::bootstrap_with(&config).unwrap();
        assert_eq!(app.page(), &Page::Home);
        assert!(db_path.exists());
    }
}
