//! Catalog commands: curated prompts, articles and categories

use serde_json::{json, Value};

use crate::content;
use crate::errors::{DeckError, Result};
use crate::model::Category;

fn invalid(command: &str, reason: impl Into<String>) -> DeckError {
    DeckError::InvalidArgs {
        command: command.to_string(),
        reason:  reason.into(),
    }
}

fn required_str<'a>(args: &'a Value, key: &str, command: &str) -> Result<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| invalid(command, format!("missing string field '{}'", key)))
}

fn optional_category(args: &Value, command: &str) -> Result<Option<Category>> {
    match args.get("category") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(label)) if label.eq_ignore_ascii_case("all") => Ok(None),
        Some(Value::String(label)) => label
            .parse::<Category>()
            .map(Some)
            .map_err(|_| invalid(command, format!("unknown category '{}'", label))),
        Some(_) => Err(invalid(command, "'category' must be a string")),
    }
}

pub fn prompts_list(args: Value) -> Result<Value> {
    let prompts = match optional_category(&args, "prompts.list")? {
        Some(category) => content::prompts_in(category),
        None => content::prompts().iter().collect(),
    };
    Ok(json!({ "prompts": prompts }))
}

pub fn prompts_get(args: Value) -> Result<Value> {
    let id = required_str(&args, "id", "prompts.get")?;
    let prompt = content::prompt(id).ok_or_else(|| DeckError::NotFound {
        entity: "prompt",
        id:     id.to_string(),
    })?;
    Ok(json!(prompt))
}

pub fn prompts_search(args: Value) -> Result<Value> {
    let query = args.get("query").and_then(Value::as_str).unwrap_or_default();
    let category = optional_category(&args, "prompts.search")?;
    Ok(json!({ "prompts": content::search_prompts(query, category) }))
}

fn limit_arg(args: &Value, default: usize, command: &str) -> Result<usize> {
    match args.get("limit") {
        None | Some(Value::Null) => Ok(default),
        Some(value) => value
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| invalid(command, "'limit' must be a non-negative integer")),
    }
}

pub fn prompts_top(args: Value) -> Result<Value> {
    let limit = limit_arg(&args, content::HOME_PROMPTS, "prompts.top")?;
    Ok(json!({ "prompts": content::top_prompts(limit) }))
}

pub fn articles_list(args: Value) -> Result<Value> {
    let articles = match args.get("category").and_then(Value::as_str) {
        Some(category) => content::articles_in(category),
        None => content::articles().iter().collect(),
    };
    Ok(json!({ "articles": articles }))
}

pub fn articles_get(args: Value) -> Result<Value> {
    let id = required_str(&args, "id", "articles.get")?;
    let article = content::article(id).ok_or_else(|| DeckError::NotFound {
        entity: "article",
        id:     id.to_string(),
    })?;
    Ok(json!(article))
}

pub fn articles_recent(args: Value) -> Result<Value> {
    let limit = limit_arg(&args, content::HOME_ARTICLES, "articles.recent")?;
    Ok(json!({ "articles": content::recent_articles(limit) }))
}

pub fn articles_search(args: Value) -> Result<Value> {
    let query = args.get("query").and_then(Value::as_str).unwrap_or_default();
    Ok(json!({ "articles": content::search_articles(query) }))
}

pub fn categories_list(_args: Value) -> Result<Value> {
    Ok(json!({ "categories": content::category_counts() }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_list_filters_by_category() {
        let value = prompts_list(json!({ "category": "Design" })).unwrap();
        let prompts = value["prompts"].as_array().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0]["id"], json!("ui-component-designer"));
        assert_eq!(prompts[0]["fullPrompt"].as_str().map(str::is_empty), Some(false));
    }

    #[test]
    fn test_prompts_list_all() {
        let value = prompts_list(json!({ "category": "All" })).unwrap();
        assert_eq!(value["prompts"].as_array().unwrap().len(), content::prompts().len());
    }

    #[test]
    fn test_unknown_category_is_invalid_args() {
        let err = prompts_search(json!({ "query": "x", "category": "Mobile" })).unwrap_err();
        assert!(matches!(err, DeckError::InvalidArgs { .. }));
    }

    #[test]
    fn test_prompts_get_missing_id() {
        assert!(matches!(
            prompts_get(json!({})).unwrap_err(),
            DeckError::InvalidArgs { .. }
        ));
        assert!(matches!(
            prompts_get(json!({ "id": "nope" })).unwrap_err(),
            DeckError::NotFound { .. }
        ));
    }

    #[test]
    fn test_prompts_top_default_and_limit() {
        let value = prompts_top(json!({})).unwrap();
        assert_eq!(value["prompts"].as_array().unwrap().len(), content::HOME_PROMPTS);

        let value = prompts_top(json!({ "limit": 2 })).unwrap();
        assert_eq!(value["prompts"].as_array().unwrap().len(), 2);

        assert!(prompts_top(json!({ "limit": "two" })).is_err());
    }

    #[test]
    fn test_articles_recent_defaults_to_home_count() {
        let value = articles_recent(json!({})).unwrap();
        let articles = value["articles"].as_array().unwrap();
        assert_eq!(articles.len(), content::HOME_ARTICLES.min(content::articles().len()));
        assert_eq!(articles[0]["id"], json!(content::articles()[0].id));

        let value = articles_recent(json!({ "limit": 1 })).unwrap();
        assert_eq!(value["articles"].as_array().unwrap().len(), 1);
        assert!(articles_recent(json!({ "limit": -1 })).is_err());
    }

    #[test]
    fn test_articles_get_serializes_camel_case() {
        let value = articles_get(json!({ "id": "future-ai-development" })).unwrap();
        assert_eq!(value["readTime"].is_string(), true);
        assert_eq!(value["authorInitials"], json!("DK"));
    }

    #[test]
    fn test_categories_list_uses_labels() {
        let value = categories_list(Value::Null).unwrap();
        let categories = value["categories"].as_array().unwrap();
        assert_eq!(categories.len(), 5);
        assert_eq!(categories[4]["category"], json!("Image Generation"));
        assert_eq!(categories[4]["prompts"], json!(2));
    }
}
