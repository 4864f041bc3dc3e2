//! View-state controller
//!
//! Exactly one [`Page`] is active at a time. The transition methods on
//! [`ViewState`] are its only mutators; none of them can leave the state on
//! an undefined page, including when a transition is refused.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::content;
use crate::errors::{DeckError, Result};
use crate::model::SessionUser;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "page", content = "id")]
pub enum Page {
    Home,
    PromptCatalog,
    ArticleCatalog,
    CategoryBrowse,
    Login,
    Signup,
    Dashboard,
    ArticleDetail(String),
}

impl Page {
    /// Pages that only make sense without a session
    pub fn is_auth_form(&self) -> bool {
        matches!(self, Page::Login | Page::Signup)
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::Home
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Page::Home => f.write_str("home"),
            Page::PromptCatalog => f.write_str("prompt-catalog"),
            Page::ArticleCatalog => f.write_str("article-catalog"),
            Page::CategoryBrowse => f.write_str("category-browse"),
            Page::Login => f.write_str("login"),
            Page::Signup => f.write_str("signup"),
            Page::Dashboard => f.write_str("dashboard"),
            Page::ArticleDetail(id) => write!(f, "article-detail/{}", id),
        }
    }
}

/// The currently rendered page plus the pending post-login redirect
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    page:                 Page,
    redirect_after_login: bool,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// True when a refused dashboard visit is waiting for a sign-in
    pub fn has_pending_redirect(&self) -> bool {
        self.redirect_after_login
    }

    fn set(&mut self, page: Page) {
        if self.page != page {
            tracing::debug!(from = %self.page, to = %page, "navigate");
            self.page = page;
        }
    }

    pub fn go_home(&mut self) {
        self.set(Page::Home);
    }

    pub fn go_prompt_catalog(&mut self) {
        self.set(Page::PromptCatalog);
    }

    pub fn go_article_catalog(&mut self) {
        self.set(Page::ArticleCatalog);
    }

    pub fn go_category_browse(&mut self) {
        self.set(Page::CategoryBrowse);
    }

    pub fn go_login(&mut self) {
        self.set(Page::Login);
    }

    pub fn go_signup(&mut self) {
        self.set(Page::Signup);
    }

    /// Open the dashboard, or fall back to home when nobody is signed in
    ///
    /// The refused visit is remembered so the next sign-in lands on the
    /// dashboard. Returns the page actually shown.
    pub fn go_dashboard(&mut self, session: Option<&SessionUser>) -> &Page {
        if session.is_some() {
            self.redirect_after_login = false;
            self.set(Page::Dashboard);
        } else {
            tracing::debug!("dashboard requires a session, redirecting home");
            self.redirect_after_login = true;
            self.set(Page::Home);
        }
        &self.page
    }

    /// Open an article; unknown ids leave the current page in place
    pub fn go_article(&mut self, id: &str) -> Result<()> {
        if content::article(id).is_none() {
            return Err(DeckError::NotFound {
                entity: "article",
                id:     id.to_string(),
            });
        }
        self.set(Page::ArticleDetail(id.to_string()));
        Ok(())
    }

    /// Navigate to whichever page `page` names, applying the same guards
    pub fn go(&mut self, page: Page, session: Option<&SessionUser>) -> Result<()> {
        match page {
            Page::Dashboard => {
                self.go_dashboard(session);
                Ok(())
            },
            Page::ArticleDetail(id) => self.go_article(&id),
            other => {
                self.set(other);
                Ok(())
            },
        }
    }

    /// Consume the pending redirect, if any
    pub fn take_redirect(&mut self) -> bool {
        std::mem::take(&mut self.redirect_after_login)
    }

    /// React to a session transition
    pub fn on_session_change(&mut self, session: Option<&SessionUser>) {
        match session {
            None => {
                if self.page == Page::Dashboard {
                    self.set(Page::Home);
                }
            },
            Some(_) => {
                if self.take_redirect() || self.page.is_auth_form() {
                    self.set(Page::Dashboard);
                }
            },
        }
    }
}
