//! Model to table name resolution.
//!
//! A builder bound to a model alias needs the model's physical table name. It
//! comes from an explicit mapping when one exists, otherwise from the model's
//! short name inflected into a plural snake_case table name (`BlogPost` ->
//! `blog_posts`).

use heck::ToSnakeCase;
use serde::Deserialize;
use std::collections::BTreeMap;

/// A persistable model known to the execution layer.
pub trait Model {
    /// Model identifier passed to the execution layer, e.g. `"Author"` or
    /// `"app::models::Author"`.
    const NAME: &'static str;

    /// Explicit table name. `None` falls back to the inflected short name.
    const TABLE_NAME: Option<&'static str> = None;

    fn table_name() -> String {
        match Self::TABLE_NAME {
            Some(table) => table.to_string(),
            None => Inflector::default().tableize(Self::NAME),
        }
    }
}

/// Resolves a model identifier to its physical table name.
pub trait TableNameResolver {
    fn resolve_table_name(&self, model: &str) -> String;
}

impl<F> TableNameResolver for F
where
    F: Fn(&str) -> String,
{
    fn resolve_table_name(&self, model: &str) -> String {
        self(model)
    }
}

/// Naming configuration for [`Inflector`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Explicit model -> table mappings, checked before inflection.
    pub tables: BTreeMap<String, String>,
    /// Pluralize inflected table names. Default `true`.
    pub pluralize: bool,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            tables: BTreeMap::new(),
            pluralize: true,
        }
    }
}

impl NamingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `model` to `table` explicitly.
    pub fn with_table(mut self, model: impl Into<String>, table: impl Into<String>) -> Self {
        self.tables.insert(model.into(), table.into());
        self
    }

    /// Enable or disable pluralization of inflected names.
    pub fn with_pluralize(mut self, pluralize: bool) -> Self {
        self.pluralize = pluralize;
        self
    }
}

/// The default [`TableNameResolver`].
#[derive(Debug, Clone, Default)]
pub struct Inflector {
    config: NamingConfig,
}

impl Inflector {
    pub fn new(config: NamingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NamingConfig {
        &self.config
    }

    /// Inflect a model identifier into a table name, ignoring explicit mappings.
    pub fn tableize(&self, model: &str) -> String {
        let snake = short_name(model).to_snake_case();
        if !self.config.pluralize {
            return snake;
        }
        match snake.rsplit_once('_') {
            Some((head, last)) => format!("{head}_{}", pluralize(last)),
            None => pluralize(&snake),
        }
    }
}

impl TableNameResolver for Inflector {
    fn resolve_table_name(&self, model: &str) -> String {
        self.config
            .tables
            .get(model)
            .or_else(|| self.config.tables.get(short_name(model)))
            .cloned()
            .unwrap_or_else(|| self.tableize(model))
    }
}

/// The last path segment of a model identifier (`app::models::Author` -> `Author`).
fn short_name(model: &str) -> &str {
    model
        .rsplit(|c: char| matches!(c, ':' | '\\' | '/' | '.'))
        .next()
        .unwrap_or(model)
}

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "news",
    "data",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("ox", "oxen"),
    ("leaf", "leaves"),
    ("thief", "thieves"),
    ("photo", "photos"),
    ("piano", "pianos"),
    ("memo", "memos"),
    ("logo", "logos"),
    ("demo", "demos"),
    ("auto", "autos"),
];

fn pluralize(word: &str) -> String {
    if word.is_empty() || UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == word) {
        return (*plural).to_string();
    }
    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u');

    // city -> cities, day -> days
    if let Some(stem) = word.strip_suffix('y') {
        if last_char_is(stem, |c| !is_vowel(c)) {
            return format!("{stem}ies");
        }
    }
    // quiz -> quizzes
    if let Some(stem) = word.strip_suffix('z') {
        if last_char_is(stem, is_vowel) {
            return format!("{word}zes");
        }
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| word.ends_with(s)) {
        return format!("{word}es");
    }
    // knife -> knives, but cafe -> cafes, giraffe -> giraffes
    if let Some(stem) = word.strip_suffix("fe") {
        if last_char_is(stem, |c| c == 'i') {
            return format!("{stem}ves");
        }
    }
    // shelf -> shelves, but roof -> roofs, chief -> chiefs
    if let Some(stem) = word.strip_suffix('f') {
        if last_char_is(stem, |c| matches!(c, 'l' | 'r')) {
            return format!("{stem}ves");
        }
    }
    // hero -> heroes, but video -> videos
    if let Some(stem) = word.strip_suffix('o') {
        if last_char_is(stem, |c| !is_vowel(c)) {
            return format!("{word}es");
        }
    }
    format!("{word}s")
}

fn last_char_is(stem: &str, pred: impl Fn(char) -> bool) -> bool {
    stem.chars().last().is_some_and(pred)
}
