//! Process-local identity service
//!
//! Password accounts are kept in memory with argon2id hashes. OAuth
//! providers cannot be reached from here, so each provider's identity is
//! scripted up front with [`MemoryAuth::script_provider`]; an unscripted
//! provider behaves like a user closing the popup.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use uuid::Uuid;

use super::{AuthBackend, SessionChannel, SessionSubscription};
use crate::errors::{DeckError, Result};
use crate::model::{AuthProvider, SessionUser, UserId};

pub const EMAIL_IN_USE: &str = "auth/email-already-in-use";
pub const INVALID_CREDENTIAL: &str = "auth/invalid-credential";
pub const WEAK_PASSWORD: &str = "auth/weak-password";
pub const NETWORK_FAILED: &str = "auth/network-request-failed";
pub const POPUP_CLOSED: &str = "auth/popup-closed-by-user";

const MIN_PASSWORD_LEN: usize = 6;

struct Account {
    uid:          UserId,
    email:        String,
    display_name: String,
    hash:         String,
}

#[derive(Default)]
struct Directory {
    /// Keyed by lowercased email
    accounts:  HashMap<String, Account>,
    providers: HashMap<AuthProvider, SessionUser>,
}

/// In-memory implementation of [`AuthBackend`]
pub struct MemoryAuth {
    directory: Mutex<Directory>,
    channel:   SessionChannel,
    hasher:    Argon2<'static>,
    offline:   AtomicBool,
}

impl MemoryAuth {
    pub fn new() -> Self {
        // Small memory cost; these hashes never leave the process.
        let params = Params::new(4096, 1, 1, None).unwrap_or_default();

        Self {
            directory: Mutex::new(Directory::default()),
            channel:   SessionChannel::new(),
            hasher:    Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            offline:   AtomicBool::new(false),
        }
    }

    fn directory(&self) -> MutexGuard<'_, Directory> {
        self.directory.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Identity returned the next time `provider` completes a sign-in
    pub fn script_provider(&self, provider: AuthProvider, mut user: SessionUser) {
        user.provider = provider;
        self.directory().providers.insert(provider, user);
    }

    /// Simulate losing the connection to the identity service
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn channel(&self) -> &SessionChannel {
        &self.channel
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(DeckError::collaborator(
                NETWORK_FAILED,
                "Network error, please check your connection",
            ));
        }
        Ok(())
    }

    fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.hasher
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DeckError::Other(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| DeckError::Other(format!("Corrupt password hash: {}", e)))?;
        match self.hasher.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(DeckError::Other(format!("Failed to verify password: {}", e))),
        }
    }
}

impl Default for MemoryAuth {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid_credential() -> DeckError {
    DeckError::collaborator(INVALID_CREDENTIAL, "Invalid email or password")
}

fn session_user(account: &Account) -> SessionUser {
    SessionUser {
        uid:          account.uid.clone(),
        email:        account.email.clone(),
        display_name: Some(account.display_name.clone()),
        avatar_url:   None,
        provider:     AuthProvider::Password,
    }
}

#[async_trait]
impl AuthBackend for MemoryAuth {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<SessionUser> {
        self.ensure_online()?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DeckError::collaborator(
                WEAK_PASSWORD,
                "Password should be at least 6 characters",
            ));
        }

        let key = email.trim().to_lowercase();
        if self.directory().accounts.contains_key(&key) {
            return Err(DeckError::collaborator(
                EMAIL_IN_USE,
                "An account with this email already exists",
            ));
        }

        let account = Account {
            uid:          Uuid::new_v4().to_string(),
            email:        email.trim().to_string(),
            display_name: display_name.trim().to_string(),
            hash:         self.hash(password)?,
        };
        let user = session_user(&account);

        {
            let mut directory = self.directory();
            // Re-check: hashing ran without the lock held.
            if directory.accounts.contains_key(&key) {
                return Err(DeckError::collaborator(
                    EMAIL_IN_USE,
                    "An account with this email already exists",
                ));
            }
            directory.accounts.insert(key, account);
        }

        tracing::info!(uid = %user.uid, "account created");
        self.channel.publish(Some(user.clone()));
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionUser> {
        self.ensure_online()?;

        let (user, hash) = {
            let directory = self.directory();
            let account = directory
                .accounts
                .get(&email.trim().to_lowercase())
                .ok_or_else(invalid_credential)?;
            (session_user(account), account.hash.clone())
        };

        if !self.verify(password, &hash)? {
            return Err(invalid_credential());
        }

        self.channel.publish(Some(user.clone()));
        Ok(user)
    }

    async fn sign_in_with_provider(&self, provider: AuthProvider) -> Result<SessionUser> {
        self.ensure_online()?;

        let user = self
            .directory()
            .providers
            .get(&provider)
            .cloned()
            .ok_or_else(|| {
                DeckError::collaborator(
                    POPUP_CLOSED,
                    "The sign-in popup was closed before completing",
                )
            })?;

        self.channel.publish(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<()> {
        self.ensure_online()?;
        self.channel.publish(None);
        Ok(())
    }

    fn observe(&self) -> SessionSubscription {
        self.channel.subscribe()
    }

    fn current_user(&self) -> Option<SessionUser> {
        self.channel.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let auth = MemoryAuth::new();
        let created = auth.sign_up("Ada@Example.com", "secret1", "Ada").await.unwrap();
        assert_eq!(created.display_name.as_deref(), Some("Ada"));

        auth.sign_out().await.unwrap();
        assert!(auth.current_user().is_none());

        let user = auth.sign_in("ada@example.com", "secret1").await.unwrap();
        assert_eq!(user.uid, created.uid);
        assert_eq!(auth.current_user(), Some(user));
    }

    #[tokio::test]
    async fn test_wrong_password_is_invalid_credential() {
        let auth = MemoryAuth::new();
        auth.sign_up("ada@example.com", "secret1", "Ada").await.unwrap();
        auth.sign_out().await.unwrap();

        let err = auth.sign_in("ada@example.com", "nope!!").await.unwrap_err();
        assert_eq!(err.code(), Some(INVALID_CREDENTIAL));
        assert!(auth.current_user().is_none());

        let err = auth.sign_in("nobody@example.com", "secret1").await.unwrap_err();
        assert_eq!(err.code(), Some(INVALID_CREDENTIAL));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let auth = MemoryAuth::new();
        auth.sign_up("ada@example.com", "secret1", "Ada").await.unwrap();

        let err = auth.sign_up("ADA@example.com", "secret2", "Ada").await.unwrap_err();
        assert_eq!(err.code(), Some(EMAIL_IN_USE));
    }

    #[tokio::test]
    async fn test_unscripted_provider_reports_closed_popup() {
        let auth = MemoryAuth::new();
        let err = auth.sign_in_with_provider(AuthProvider::GitHub).await.unwrap_err();
        assert_eq!(err.code(), Some(POPUP_CLOSED));
    }

    #[tokio::test]
    async fn test_scripted_provider_signs_in_with_provider_set() {
        let auth = MemoryAuth::new();
        auth.script_provider(
            AuthProvider::Google,
            SessionUser {
                uid:          "g-1".into(),
                email:        "grace@example.com".into(),
                display_name: Some("Grace".into()),
                avatar_url:   Some("https://example.com/g.png".into()),
                provider:     AuthProvider::Password,
            },
        );

        let user = auth.sign_in_with_provider(AuthProvider::Google).await.unwrap();
        assert_eq!(user.provider, AuthProvider::Google);
        assert_eq!(auth.current_user().unwrap().uid, "g-1");
    }

    #[tokio::test]
    async fn test_offline_fails_every_call() {
        let auth = MemoryAuth::new();
        auth.set_offline(true);

        let err = auth.sign_up("ada@example.com", "secret1", "Ada").await.unwrap_err();
        assert_eq!(err.code(), Some(NETWORK_FAILED));
        assert_eq!(auth.sign_out().await.unwrap_err().code(), Some(NETWORK_FAILED));
    }

    #[tokio::test]
    async fn test_observer_sees_transitions() {
        let auth = MemoryAuth::new();
        let mut sub = auth.observe();
        assert_eq!(sub.try_next(), Some(None));

        let user = auth.sign_up("ada@example.com", "secret1", "Ada").await.unwrap();
        auth.sign_out().await.unwrap();

        assert_eq!(sub.try_next(), Some(Some(user)));
        assert_eq!(sub.try_next(), Some(None));
    }
}
