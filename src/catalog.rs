use anyhow::Context;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// One unit of work: a stable identifier (the output filename stem) and the
/// utterance to synthesize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonItem {
    pub id: String,
    pub text: String,
}

impl LessonItem {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("lesson id is empty")]
    EmptyId,
    #[error("lesson id '{0}' cannot be used as a file name")]
    InvalidId(String),
    #[error("lesson '{0}' has empty text")]
    EmptyText(String),
    #[error("duplicate lesson id '{0}'")]
    DuplicateId(String),
    #[error("unknown lesson id '{0}'")]
    UnknownId(String),
}

const BUILTIN: &[(&str, &str)] = &[
    ("lesson-001", "おはようございます。今日もいい天気ですね。"),
    (
        "lesson-002",
        "初めまして。私はリンです。ベトナムから来ました。どうぞよろしくお願いします。",
    ),
    (
        "lesson-003",
        "昨日、助けてくれてありがとうございました。本当に助かりました。",
    ),
    ("lesson-004", "今週末は友達と映画を見に行きます。楽しみです。"),
    ("lesson-005", "昨日、友達と映画を見ました。とても面白かったです。"),
    ("lesson-006", "私の趣味は音楽を聴くことです。日本の歌が好きです。"),
    (
        "lesson-007",
        "すみません、このおにぎりをください。あと、お茶もお願いします。",
    ),
    ("lesson-008", "すみません、これはいくらですか。"),
    ("lesson-009", "すみません、ラーメンを一つと、餃子をお願いします。"),
    ("lesson-010", "このラーメン、とても美味しいですね。スープが最高です。"),
];

/// Ordered, read-only list of lessons.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<LessonItem>,
}

impl Catalog {
    pub fn builtin() -> Self {
        let items = BUILTIN
            .iter()
            .map(|(id, text)| LessonItem::new(*id, *text))
            .collect();
        Self { items }
    }

    pub fn from_items(items: Vec<LessonItem>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for item in &items {
            validate_id(&item.id)?;
            if item.text.trim().is_empty() {
                return Err(CatalogError::EmptyText(item.id.clone()));
            }
            if !seen.insert(item.id.as_str()) {
                return Err(CatalogError::DuplicateId(item.id.clone()));
            }
        }
        Ok(Self { items })
    }

    /// Reads a JSON array of `{"id", "text"}` objects.
    pub fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read lessons at {}", path.display()))?;
        let items: Vec<LessonItem> = serde_json::from_str(&raw)
            .with_context(|| format!("parse lessons at {}", path.display()))?;
        Self::from_items(items).with_context(|| format!("validate lessons at {}", path.display()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &LessonItem> {
        self.items.iter()
    }

    pub fn items(&self) -> &[LessonItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&LessonItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Restricts the catalog to `ids`, keeping catalog order.
    pub fn select(&self, ids: &[String]) -> Result<Self, CatalogError> {
        if let Some(missing) = ids.iter().find(|id| self.get(id).is_none()) {
            return Err(CatalogError::UnknownId(missing.clone()));
        }
        let items = self
            .items
            .iter()
            .filter(|item| ids.contains(&item.id))
            .cloned()
            .collect();
        Ok(Self { items })
    }
}

fn validate_id(id: &str) -> Result<(), CatalogError> {
    static ID_PATTERN: OnceLock<Regex> = OnceLock::new();
    if id.is_empty() {
        return Err(CatalogError::EmptyId);
    }
    let pattern = ID_PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("valid regex"));
    if id == "." || id == ".." || !pattern.is_match(id) {
        return Err(CatalogError::InvalidId(id.to_string()));
    }
    Ok(())
}
