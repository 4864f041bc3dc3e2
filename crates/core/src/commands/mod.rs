//! Command registry and dispatch system
//!
//! A static registry of read-only commands over the curated catalog, for
//! hosts that talk JSON. Commands are named "category.action" (e.g.
//! "prompts.search", "articles.get") and dispatched to handler functions.
//!
//! ## Adding a new command
//!
//! 1. Create handler function: `pub fn my_command(args: Value) -> Result<Value>`
//! 2. Register in `REGISTRY`: `("category.action", my_command as CommandHandler)`
//! 3. Add tests for the command

mod catalog;

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::{json, Value};

use crate::errors::{DeckError, Result};

/// All command handlers take JSON arguments and return JSON
pub type CommandHandler = fn(Value) -> Result<Value>;

static REGISTRY: Lazy<HashMap<&'static str, CommandHandler>> = Lazy::new(|| {
    let mut map = HashMap::new();

    map.insert("ping", ping as CommandHandler);

    map.insert("prompts.list", catalog::prompts_list as CommandHandler);
    map.insert("prompts.get", catalog::prompts_get as CommandHandler);
    map.insert("prompts.search", catalog::prompts_search as CommandHandler);
    map.insert("prompts.top", catalog::prompts_top as CommandHandler);

    map.insert("articles.list", catalog::articles_list as CommandHandler);
    map.insert("articles.get", catalog::articles_get as CommandHandler);
    map.insert("articles.recent", catalog::articles_recent as CommandHandler);
    map.insert("articles.search", catalog::articles_search as CommandHandler);

    map.insert("categories.list", catalog::categories_list as CommandHandler);

    map
});

/// Dispatch a command by name
pub fn dispatch(command: &str, args: Value) -> Result<Value> {
    match REGISTRY.get(command) {
        Some(handler) => handler(args),
        None => Err(DeckError::CommandNotFound(command.to_string())),
    }
}

/// Dispatch and fold any error into a structured error object
///
/// Error objects carry `error: true`, a user-facing `message` and the
/// error `category`.
pub fn call(command: &str, args: Value) -> Value {
    match dispatch(command, args) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(%command, category = err.category(), error = %err, "command failed");
            error_object(&err)
        },
    }
}

fn error_object(err: &DeckError) -> Value {
    json!({
        "error": true,
        "message": err.user_message(),
        "category": err.category(),
    })
}

/// Sorted names of all registered commands
pub fn list_commands() -> Vec<String> {
    let mut commands: Vec<String> = REGISTRY.keys().map(|&k| k.to_string()).collect();
    commands.sort();
    commands
}

/// Echo the arguments back with `pong: true`
fn ping(args: Value) -> Result<Value> {
    let mut result = match args {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };

    result.insert("pong".to_string(), Value::Bool(true));
    Ok(Value::Object(result))
}
