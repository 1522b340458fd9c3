//! Domain data structures shared across the indexer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized, indexable record derived from one page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub section: String,

    /// Plain-text body, markup stripped
    pub content: String,

    pub word_count: f64,

    /// Minutes
    pub reading_time: f64,

    pub keywords: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,

    pub author: String,
}

/// Which lifecycle branch produced an index handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenMode {
    /// No index existed; a new one was created with the field mapping
    Created,
    /// An existing index was opened as-is
    Opened,
}

impl std::fmt::Display for OpenMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpenMode::Created => write!(f, "created"),
            OpenMode::Opened => write!(f, "opened"),
        }
    }
}

/// Statistics from one indexing run
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    /// Pages in the site that was indexed
    pub pages_seen: usize,
    pub documents_indexed: usize,
    /// Pages excluded for having a blank title
    pub pages_skipped: usize,
    pub mode: OpenMode,
    pub duration_ms: u64,
}
