//! Sign-up, sign-in and sign-out call sites
//!
//! [`SessionFlow`] wraps an [`AuthBackend`] so that every outcome is turned
//! into a notice and every failure comes back as an `Err`, never a panic.
//! Only one session operation may be in flight at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use validator::Validate;

use super::{AuthBackend, SessionSubscription};
use crate::errors::{DeckError, FieldErrors, Result};
use crate::model::{AuthProvider, SessionUser};
use crate::notify::Notifier;
use crate::store::ProfileStore;

/// Sign-up input as typed by the user
#[derive(Debug, Clone, Default, Validate)]
pub struct SignUpForm {
    pub name:             String,
    #[validate(email(message = "Invalid email address"))]
    pub email:            String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password:         String,
    /// Checked against `password` when present
    pub confirm_password: Option<String>,
}

impl SignUpForm {
    pub fn new(name: &str, email: &str, password: &str) -> Self {
        Self {
            name:             name.to_string(),
            email:            email.to_string(),
            password:         password.to_string(),
            confirm_password: None,
        }
    }

    pub fn confirmed(mut self, confirm_password: &str) -> Self {
        self.confirm_password = Some(confirm_password.to_string());
        self
    }

    /// Per-field problems; empty when the form may be submitted
    pub fn check(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        // Required-field messages first so they win over format messages.
        if self.name.trim().is_empty() {
            errors.add("name", "Name is required");
        }
        if self.email.trim().is_empty() {
            errors.add("email", "Email is required");
        }
        if self.password.is_empty() {
            errors.add("password", "Password is required");
        }

        if let Err(report) = self.validate() {
            for (field, failures) in report.field_errors() {
                for failure in failures.iter() {
                    let message = failure
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| failure.code.to_string());
                    errors.add(field.to_string(), message);
                }
            }
        }

        match self.confirm_password.as_deref() {
            Some("") => errors.add("confirm_password", "Please confirm your password"),
            Some(confirm) if confirm != self.password => {
                errors.add("confirm_password", "Passwords do not match")
            },
            _ => {},
        }

        errors
    }
}

/// Marks a session operation as in flight until dropped
struct Pending<'a>(&'a AtomicBool);

impl<'a> Pending<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| DeckError::Busy)?;
        Ok(Self(flag))
    }
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Session operations with notices and profile upserts
#[derive(Clone)]
pub struct SessionFlow {
    auth:     Arc<dyn AuthBackend>,
    profiles: Arc<dyn ProfileStore>,
    notifier: Notifier,
    pending:  Arc<AtomicBool>,
}

impl SessionFlow {
    pub fn new(
        auth: Arc<dyn AuthBackend>,
        profiles: Arc<dyn ProfileStore>,
        notifier: Notifier,
    ) -> Self {
        Self {
            auth,
            profiles,
            notifier,
            pending: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.auth.current_user()
    }

    pub fn observe(&self) -> SessionSubscription {
        self.auth.observe()
    }

    /// True while a session operation is awaiting the backend
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    /// Create a password account, then write its profile
    ///
    /// Field problems are returned as [`DeckError::Validation`] without a
    /// notice; they belong next to the form fields.
    pub async fn sign_up(&self, form: &SignUpForm) -> Result<SessionUser> {
        let errors = form.check();
        if !errors.is_empty() {
            tracing::debug!(fields = %errors, "sign-up form rejected");
            return Err(DeckError::Validation(errors));
        }

        let _pending = Pending::acquire(&self.pending)?;
        let name = form.name.trim();

        let user = self
            .auth
            .sign_up(form.email.trim(), &form.password, name)
            .await
            .map_err(|e| self.report("Failed to create account", e))?;

        // The credential exists even if this fails; the user stays signed in.
        self.profiles
            .upsert_profile(&user, Some(name))
            .await
            .map_err(|e| self.report("Failed to save your profile", e))?;

        tracing::info!(uid = %user.uid, "signed up");
        self.notifier.success("Account created successfully!");
        Ok(user)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SessionUser> {
        let _pending = Pending::acquire(&self.pending)?;

        let user = self
            .auth
            .sign_in(email.trim(), password)
            .await
            .map_err(|e| self.report("Failed to sign in", e))?;

        tracing::info!(uid = %user.uid, "signed in");
        self.notifier.success("Signed in successfully!");
        Ok(user)
    }

    /// OAuth sign-in; the profile is created on first use
    pub async fn sign_in_with_provider(&self, provider: AuthProvider) -> Result<SessionUser> {
        let _pending = Pending::acquire(&self.pending)?;
        let label = provider.display_name();

        let user = self
            .auth
            .sign_in_with_provider(provider)
            .await
            .map_err(|e| self.report(&format!("Failed to sign in with {}", label), e))?;

        self.profiles
            .upsert_profile(&user, None)
            .await
            .map_err(|e| self.report("Failed to save your profile", e))?;

        tracing::info!(uid = %user.uid, provider = provider.as_str(), "signed in");
        self.notifier
            .success(format!("Signed in with {} successfully!", label));
        Ok(user)
    }

    pub async fn sign_out(&self) -> Result<()> {
        let _pending = Pending::acquire(&self.pending)?;

        self.auth
            .sign_out()
            .await
            .map_err(|e| self.report("Failed to sign out", e))?;

        self.notifier.success("Signed out successfully!");
        Ok(())
    }

    fn report(&self, context: &str, err: DeckError) -> DeckError {
        self.notifier.failure(context, &err);
        err
    }
}
