//! The single create/edit prompt form

use chrono::{DateTime, Utc};

use crate::errors::FieldErrors;
use crate::model::{Category, NewPrompt, PromptPatch, PromptRecord, SessionUser};

/// Form contents as typed
///
/// An edit form remembers the record it targets and the values it was
/// opened with; both are fixed for the life of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptForm {
    editing:         Option<String>,
    baseline:        Option<ValidPrompt>,
    pub title:       String,
    pub description: String,
    pub full_prompt: String,
    /// Category label as shown in the picker
    pub category:    String,
    /// Inline messages from the last rejected submit
    pub errors:      FieldErrors,
}

impl Default for PromptForm {
    fn default() -> Self {
        Self::blank()
    }
}

impl PromptForm {
    /// Empty create form
    pub fn blank() -> Self {
        Self {
            editing:     None,
            baseline:    None,
            title:       String::new(),
            description: String::new(),
            full_prompt: String::new(),
            category:    Category::default().label().to_string(),
            errors:      FieldErrors::new(),
        }
    }

    /// Edit form pre-populated from `record`
    pub fn from_record(record: &PromptRecord) -> Self {
        Self {
            editing:     Some(record.id.clone()),
            baseline:    Some(ValidPrompt::from(record)),
            title:       record.title.clone(),
            description: record.description.clone(),
            full_prompt: record.full_prompt.clone(),
            category:    record.category.label().to_string(),
            errors:      FieldErrors::new(),
        }
    }

    /// Id of the record being edited; `None` for a create form
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Values the edit form was opened with
    pub fn baseline(&self) -> Option<&ValidPrompt> {
        self.baseline.as_ref()
    }

    pub fn validate(&self) -> Result<ValidPrompt, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.add("title", "Title is required");
        }
        let description = self.description.trim();
        if description.is_empty() {
            errors.add("description", "Description is required");
        }
        let full_prompt = self.full_prompt.trim();
        if full_prompt.is_empty() {
            errors.add("full_prompt", "Prompt text is required");
        }
        let category = self.category.parse::<Category>().ok();
        if category.is_none() {
            errors.add("category", "Choose one of the listed categories");
        }

        match category {
            Some(category) if errors.is_empty() => Ok(ValidPrompt {
                title: title.to_string(),
                description: description.to_string(),
                full_prompt: full_prompt.to_string(),
                category,
            }),
            _ => Err(errors),
        }
    }
}

/// Form contents that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPrompt {
    pub title:       String,
    pub description: String,
    pub full_prompt: String,
    pub category:    Category,
}

impl From<&PromptRecord> for ValidPrompt {
    fn from(record: &PromptRecord) -> Self {
        Self {
            title:       record.title.clone(),
            description: record.description.clone(),
            full_prompt: record.full_prompt.clone(),
            category:    record.category,
        }
    }
}

impl ValidPrompt {
    pub fn into_new(self, owner: &SessionUser, now: DateTime<Utc>) -> NewPrompt {
        NewPrompt {
            title:       self.title,
            description: self.description,
            full_prompt: self.full_prompt,
            category:    self.category,
            owner_id:    owner.uid.clone(),
            owner_name:  owner.author_name(),
            created_at:  now,
            updated_at:  now,
        }
    }

    /// Patch holding only the fields that differ from `baseline`
    pub fn diff(&self, baseline: &ValidPrompt, now: DateTime<Utc>) -> PromptPatch {
        let mut patch = PromptPatch::new(now);
        if self.title != baseline.title {
            patch.title = Some(self.title.clone());
        }
        if self.description != baseline.description {
            patch.description = Some(self.description.clone());
        }
        if self.full_prompt != baseline.full_prompt {
            patch.full_prompt = Some(self.full_prompt.clone());
        }
        if self.category != baseline.category {
            patch.category = Some(self.category);
        }
        patch
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::model::AuthProvider;

    fn record() -> PromptRecord {
        let now = Utc::now();
        PromptRecord {
            id:          "p1".into(),
            title:       "X".into(),
            description: "Y".into(),
            full_prompt: "Z".into(),
            category:    Category::Backend,
            owner_id:    "u1".into(),
            owner_name:  "ada".into(),
            likes:       3,
            liked_by:    BTreeSet::new(),
            created_at:  now,
            updated_at:  now,
        }
    }

    #[test]
    fn test_blank_form_defaults_to_backend() {
        let form = PromptForm::blank();
        assert_eq!(form.category, "Backend");
        assert!(!form.is_editing());
        assert!(form.baseline().is_none());
    }

    #[test]
    fn test_blank_fields_are_reported() {
        let mut form = PromptForm::blank();
        form.title = "   ".into();
        form.category = "Mobile".into();

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("title"), Some("Title is required"));
        assert!(errors.get("category").is_some());
    }

    #[test]
    fn test_valid_form_trims_and_parses_category() {
        let mut form = PromptForm::blank();
        form.title = " X ".into();
        form.description = "Y".into();
        form.full_prompt = "Z".into();
        form.category = "image generation".into();

        let valid = form.validate().unwrap();
        assert_eq!(valid.title, "X");
        assert_eq!(valid.category, Category::ImageGeneration);
    }

    #[test]
    fn test_new_prompt_carries_owner() {
        let user = SessionUser {
            uid:          "u1".into(),
            email:        "ada@example.com".into(),
            display_name: None,
            avatar_url:   None,
            provider:     AuthProvider::Password,
        };
        let form = PromptForm::from_record(&record());
        let new = form.validate().unwrap().into_new(&user, Utc::now());

        assert_eq!(new.owner_id, "u1");
        assert_eq!(new.owner_name, "ada");
        assert_eq!(new.created_at, new.updated_at);
    }

    #[test]
    fn test_edit_form_keeps_target_and_baseline() {
        let rec = record();
        let mut form = PromptForm::from_record(&rec);
        form.title = "changed".into();

        assert_eq!(form.editing(), Some("p1"));
        assert_eq!(form.baseline().map(|b| b.title.as_str()), Some("X"));
    }

    #[test]
    fn test_diff_only_includes_changes() {
        let rec = record();
        let mut form = PromptForm::from_record(&rec);
        let baseline = form.baseline().unwrap().clone();
        assert!(form.validate().unwrap().diff(&baseline, Utc::now()).is_empty());

        form.description = "new description".into();
        let patch = form.validate().unwrap().diff(&baseline, Utc::now());
        assert_eq!(patch.description.as_deref(), Some("new description"));
        assert!(patch.title.is_none());
        assert!(patch.category.is_none());
    }
}
