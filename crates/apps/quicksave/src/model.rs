use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Bucket a saved item is filed under.
pub enum QuickSaveCategory {
    Movie,
    Book,
    Link,
    #[default]
    Other,
}

impl QuickSaveCategory {
    pub const ALL: [Self; 4] = [Self::Movie, Self::Book, Self::Link, Self::Other];

    pub fn slug(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Book => "book",
            Self::Link => "link",
            Self::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Movie => "Movies",
            Self::Book => "Books",
            Self::Link => "Links",
            Self::Other => "Other",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Movie => "🎬",
            Self::Book => "📚",
            Self::Link => "🔗",
            Self::Other => "📝",
        }
    }

    pub fn from_slug(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.slug() == raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickSaveItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: QuickSaveCategory,
    /// Unix milliseconds.
    #[serde(default)]
    pub created_at: u64,
}

impl QuickSaveItem {
    /// Link items whose title is an http(s) URL render as anchors.
    pub fn href(&self) -> Option<&str> {
        let title = self.title.as_str();
        (self.category == QuickSaveCategory::Link
            && (title.starts_with("https://") || title.starts_with("http://")))
        .then_some(title)
    }

    /// `YYYY-MM-DD` in UTC; empty for timestamps chrono cannot represent.
    pub fn saved_on(&self) -> String {
        i64::try_from(self.created_at)
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Persisted `quicksave` section. Newest items come first.
pub struct QuickSaveSection {
    #[serde(default)]
    pub items: Vec<QuickSaveItem>,
}

impl QuickSaveSection {
    /// Prepends a new item. Blank titles are ignored and yield `None`.
    pub fn add(&mut self, title: &str, category: QuickSaveCategory, now_ms: u64) -> Option<String> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let id = self.unique_id(now_ms);
        self.items.insert(
            0,
            QuickSaveItem {
                id: id.clone(),
                title: title.to_string(),
                category,
                created_at: now_ms,
            },
        );
        Some(id)
    }

    /// Renames and/or re-files item `id`. A blank title leaves the title unchanged.
    pub fn update(
        &mut self,
        id: &str,
        title: Option<&str>,
        category: Option<QuickSaveCategory>,
    ) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return false;
        };
        if let Some(title) = title.map(str::trim).filter(|title| !title.is_empty()) {
            item.title = title.to_string();
        }
        if let Some(category) = category {
            item.category = category;
        }
        true
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Items in `category`, or every item when `None`.
    pub fn filtered(&self, category: Option<QuickSaveCategory>) -> Vec<QuickSaveItem> {
        self.items
            .iter()
            .filter(|item| category.map_or(true, |category| item.category == category))
            .cloned()
            .collect()
    }

    pub fn count(&self, category: QuickSaveCategory) -> usize {
        self.items.iter().filter(|item| item.category == category).count()
    }

    fn unique_id(&self, now_ms: u64) -> String {
        let base = format!("quicksave-{now_ms}");
        let mut candidate = base.clone();
        let mut suffix = 1u32;
        while self.items.iter().any(|item| item.id == candidate) {
            candidate = format!("{base}-{suffix}");
            suffix += 1;
        }
        candidate
    }
}
