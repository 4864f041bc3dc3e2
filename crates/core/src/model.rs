//! Domain types shared by the session, store and dashboard layers

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DeckError;

/// Identity handed out by the session collaborator
pub type UserId = String;

/// Fixed set of prompt categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Backend,
    Frontend,
    DevOps,
    Design,
    #[serde(rename = "Image Generation")]
    ImageGeneration,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 5] = [
        Category::Backend,
        Category::Frontend,
        Category::DevOps,
        Category::Design,
        Category::ImageGeneration,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Backend => "Backend",
            Category::Frontend => "Frontend",
            Category::DevOps => "DevOps",
            Category::Design => "Design",
            Category::ImageGeneration => "Image Generation",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Backend
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DeckError::Other(format!("Unknown category: {}", wanted)))
    }
}

/// A user-submitted prompt as stored by the persistence collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRecord {
    pub id:          String,
    pub title:       String,
    pub description: String,
    pub full_prompt: String,
    pub category:    Category,
    pub owner_id:    UserId,
    pub owner_name:  String,
    pub likes:       u32,
    pub liked_by:    BTreeSet<UserId>,
    pub created_at:  DateTime<Utc>,
    pub updated_at:  DateTime<Utc>,
}

impl PromptRecord {
    pub fn is_liked_by(&self, uid: &str) -> bool {
        self.liked_by.contains(uid)
    }
}

/// Fields supplied by the client when creating a record
///
/// The store assigns the id and starts the like counter at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPrompt {
    pub title:       String,
    pub description: String,
    pub full_prompt: String,
    pub category:    Category,
    pub owner_id:    UserId,
    pub owner_name:  String,
    pub created_at:  DateTime<Utc>,
    pub updated_at:  DateTime<Utc>,
}

/// Partial update: only `Some` fields are written
///
/// Owner and creation time are deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title:       Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category:    Option<Category>,
    pub updated_at:  DateTime<Utc>,
}

impl PromptPatch {
    pub fn new(updated_at: DateTime<Utc>) -> Self {
        Self {
            title: None,
            description: None,
            full_prompt: None,
            category: None,
            updated_at,
        }
    }

    /// True when no content field changes
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.full_prompt.is_none()
            && self.category.is_none()
    }

    /// Apply the patch to a record in place
    pub fn apply_to(&self, record: &mut PromptRecord) {
        if let Some(title) = &self.title {
            record.title = title.clone();
        }
        if let Some(description) = &self.description {
            record.description = description.clone();
        }
        if let Some(full_prompt) = &self.full_prompt {
            record.full_prompt = full_prompt.clone();
        }
        if let Some(category) = self.category {
            record.category = category;
        }
        record.updated_at = self.updated_at;
    }
}

/// Result of an atomic like toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeState {
    pub liked: bool,
    pub likes: u32,
}

/// Filter for prompt queries and live subscriptions
///
/// Results are always ordered newest first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PromptQuery {
    pub owner_id: Option<UserId>,
}

impl PromptQuery {
    /// Records owned by `uid`
    pub fn owned_by(uid: impl Into<UserId>) -> Self {
        Self {
            owner_id: Some(uid.into()),
        }
    }

    pub fn matches(&self, record: &PromptRecord) -> bool {
        self.owner_id
            .as_deref()
            .map_or(true, |owner| record.owner_id == owner)
    }

    /// Filter `records` and sort them newest first
    pub fn select<'a, I>(&self, records: I) -> Vec<PromptRecord>
    where
        I: IntoIterator<Item = &'a PromptRecord>,
    {
        let mut selected: Vec<PromptRecord> = records
            .into_iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();

        selected.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        selected
    }
}

/// How the user authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    #[serde(rename = "email")]
    Password,
    Google,
    #[serde(rename = "github")]
    GitHub,
}

impl AuthProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthProvider::Password => "email",
            AuthProvider::Google => "google",
            AuthProvider::GitHub => "github",
        }
    }

    /// Human-readable provider name for notices
    pub fn display_name(self) -> &'static str {
        match self {
            AuthProvider::Password => "email",
            AuthProvider::Google => "Google",
            AuthProvider::GitHub => "GitHub",
        }
    }
}

impl FromStr for AuthProvider {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" | "password" => Ok(AuthProvider::Password),
            "google" => Ok(AuthProvider::Google),
            "github" => Ok(AuthProvider::GitHub),
            other => Err(DeckError::Other(format!("Unknown auth provider: {}", other))),
        }
    }
}

/// The signed-in identity as reported by the session collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub uid:          UserId,
    pub email:        String,
    pub display_name: Option<String>,
    pub avatar_url:   Option<String>,
    pub provider:     AuthProvider,
}

impl SessionUser {
    /// Name shown next to submitted prompts
    pub fn author_name(&self) -> String {
        if let Some(name) = self.display_name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.to_string();
        }
        match self.email.split('@').next() {
            Some(local) if !local.is_empty() => local.to_string(),
            _ => "Anonymous".to_string(),
        }
    }
}

/// Persisted user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid:           UserId,
    pub email:         String,
    pub name:          String,
    pub avatar_url:    Option<String>,
    pub provider:      AuthProvider,
    pub created_at:    DateTime<Utc>,
    pub updated_at:    DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Profile written on first sign-in
    pub fn first_seen(user: &SessionUser, name: Option<&str>, now: DateTime<Utc>) -> Self {
        let name = name
            .filter(|n| !n.trim().is_empty())
            .or(user.display_name.as_deref())
            .unwrap_or("User")
            .to_string();

        Self {
            uid: user.uid.clone(),
            email: user.email.clone(),
            name,
            avatar_url: user.avatar_url.clone(),
            provider: user.provider,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    /// Refresh the timestamps of an existing profile
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
        self.last_login_at = Some(now);
    }
}

/// Whether a profile upsert wrote a new profile or refreshed an old one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Touched,
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn record(id: &str, owner: &str, minutes: i64, likes: u32) -> PromptRecord {
        let at = DateTime::<Utc>::UNIX_EPOCH + Duration::minutes(minutes);
        PromptRecord {
            id:          id.to_string(),
            title:       format!("title {}", id),
            description: "d".into(),
            full_prompt: "p".into(),
            category:    Category::Backend,
            owner_id:    owner.to_string(),
            owner_name:  owner.to_string(),
            likes,
            liked_by:    BTreeSet::new(),
            created_at:  at,
            updated_at:  at,
        }
    }

    #[test]
    fn test_category_round_trips_through_labels() {
        for category in Category::ALL {
            assert_eq!(category.label().parse::<Category>().unwrap(), category);
        }
        assert_eq!("image generation".parse::<Category>().unwrap(), Category::ImageGeneration);
        assert!("Mobile".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serializes_with_display_label() {
        let json = serde_json::to_string(&Category::ImageGeneration).unwrap();
        assert_eq!(json, "\"Image Generation\"");
    }

    #[test]
    fn test_query_filters_by_owner_and_sorts_newest_first() {
        let records = vec![
            record("a", "u1", 1, 0),
            record("b", "u2", 2, 0),
            record("c", "u1", 3, 0),
        ];

        let selected = PromptQuery::owned_by("u1").select(&records);
        let ids: Vec<_> = selected.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[test]
    fn test_patch_only_touches_set_fields() {
        let mut rec = record("a", "u1", 1, 0);
        let later = rec.created_at + Duration::hours(1);
        let mut patch = PromptPatch::new(later);
        assert!(patch.is_empty());

        patch.title = Some("new".into());
        patch.apply_to(&mut rec);

        assert_eq!(rec.title, "new");
        assert_eq!(rec.description, "d");
        assert_eq!(rec.updated_at, later);
        assert_eq!(rec.owner_id, "u1");
    }

    #[test]
    fn test_author_name_fallbacks() {
        let mut user = SessionUser {
            uid:          "u1".into(),
            email:        "ada@example.com".into(),
            display_name: Some("Ada".into()),
            avatar_url:   None,
            provider:     AuthProvider::Password,
        };
        assert_eq!(user.author_name(), "Ada");

        user.display_name = None;
        assert_eq!(user.author_name(), "ada");

        user.email = String::new();
        assert_eq!(user.author_name(), "Anonymous");
    }

    #[test]
    fn test_profile_name_prefers_signup_name() {
        let user = SessionUser {
            uid:          "u1".into(),
            email:        "ada@example.com".into(),
            display_name: Some("Display".into()),
            avatar_url:   None,
            provider:     AuthProvider::Google,
        };
        let now = Utc::now();

        assert_eq!(UserProfile::first_seen(&user, Some("Ada"), now).name, "Ada");
        assert_eq!(UserProfile::first_seen(&user, None, now).name, "Display");
        assert_eq!(UserProfile::first_seen(&user, None, now).provider, AuthProvider::Google);
    }
}
