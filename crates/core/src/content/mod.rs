//! Static content store
//!
//! Read-only catalogs of curated prompts and blog articles backing the
//! home page, the prompt and article catalogs, the category browser and the
//! article detail page. Nothing here is ever mutated.

mod articles;
mod prompts;

use serde::Serialize;

pub use articles::Article;
pub use prompts::CatalogPrompt;

use crate::model::Category;

/// Number of entries the home page shows by default
pub const HOME_PROMPTS: usize = 6;
pub const HOME_ARTICLES: usize = 4;

/// All curated prompts, in catalog order
pub fn prompts() -> &'static [CatalogPrompt] {
    prompts::PROMPTS
}

pub fn prompt(id: &str) -> Option<&'static CatalogPrompt> {
    prompts::PROMPTS.iter().find(|p| p.id == id)
}

pub fn prompts_in(category: Category) -> Vec<&'static CatalogPrompt> {
    prompts::PROMPTS
        .iter()
        .filter(|p| p.category == category)
        .collect()
}

/// The first `limit` prompts in curated order
pub fn top_prompts(limit: usize) -> &'static [CatalogPrompt] {
    let all = prompts::PROMPTS;
    &all[..limit.min(all.len())]
}

/// Case-insensitive match on title or description, optionally narrowed to
/// one category; an empty query matches everything
pub fn search_prompts(query: &str, category: Option<Category>) -> Vec<&'static CatalogPrompt> {
    let needle = query.trim().to_lowercase();

    prompts::PROMPTS
        .iter()
        .filter(|p| category.map_or(true, |c| p.category == c))
        .filter(|p| {
            needle.is_empty()
                || p.title.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
        })
        .collect()
}

/// All articles, newest first
pub fn articles() -> &'static [Article] {
    articles::ARTICLES
}

pub fn article(id: &str) -> Option<&'static Article> {
    articles::ARTICLES.iter().find(|a| a.id == id)
}

pub fn articles_in(category: &str) -> Vec<&'static Article> {
    articles::ARTICLES
        .iter()
        .filter(|a| a.category.eq_ignore_ascii_case(category.trim()))
        .collect()
}

/// The `limit` newest articles
pub fn recent_articles(limit: usize) -> &'static [Article] {
    let all = articles::ARTICLES;
    &all[..limit.min(all.len())]
}

/// Case-insensitive match on title, excerpt or category
pub fn search_articles(query: &str) -> Vec<&'static Article> {
    let needle = query.trim().to_lowercase();

    articles::ARTICLES
        .iter()
        .filter(|a| {
            needle.is_empty()
                || a.title.to_lowercase().contains(&needle)
                || a.excerpt.to_lowercase().contains(&needle)
                || a.category.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Per-category prompt count for the category browser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub prompts:  usize,
}

pub fn category_counts() -> Vec<CategoryCount> {
    Category::ALL
        .into_iter()
        .map(|category| CategoryCount {
            category,
            prompts: prompts::PROMPTS
                .iter()
                .filter(|p| p.category == category)
                .count(),
        })
        .collect()
}
