use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Per-instance identity of a navigation item. Two items with the same label and
/// url are still distinct entries in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

impl ItemId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        ItemId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationItem {
    #[serde(skip, default = "ItemId::next")]
    id: ItemId,
    pub label: String,
    pub url: String,
    #[serde(skip)]
    pub is_new: bool,
}

impl NavigationItem {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: ItemId::next(),
            label: label.into(),
            url: url.into(),
            is_new: false,
        }
    }

    /// A fresh draft: no content, flagged as new.
    pub fn draft() -> Self {
        Self {
            is_new: true,
            ..Self::new("", "")
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    /// True while the user has not entered anything yet.
    pub fn is_blank(&self) -> bool {
        self.label.trim().is_empty() && self.url.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeRecord {
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ThemeRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: false,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn has_issues(&self) -> bool {
        !self.warnings.is_empty() || !self.errors.is_empty()
    }
}

/// One entry of a structured theme validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeIssue {
    pub message: String,
    #[serde(default)]
    pub fatal: bool,
}

impl ThemeIssue {
    pub fn new(message: impl Into<String>, fatal: bool) -> Self {
        Self {
            message: message.into(),
            fatal,
        }
    }
}
