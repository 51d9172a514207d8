//! Static table of best-practice sections used to ground service reviews.
//!
//! The table is produced by a separate ingestion pipeline that splits the
//! Well-Architected guidance document into headed sections. It is loaded
//! once per run and never mutated.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Minimum shared lowercase words between a query label and a row heading
/// for the row to count as a match.
pub const MIN_COMMON_WORDS: usize = 2;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Recommendation store not found at {0}. Run the ingestion pipeline to generate it first")]
    NotFound(String),

    #[error("Failed to read recommendation store {0}: {1}")]
    Load(String, String),

    #[error("Failed to parse recommendation store {0}: {1}")]
    Parse(String, String),
}

/// One headed section of the ingested guidance document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRow {
    pub id: String,
    pub heading: String,
    pub content: String,
}

/// In-memory recommendation table with fuzzy heading lookup.
#[derive(Debug)]
pub struct RecommendationStore {
    rows: Vec<RecommendationRow>,
}

impl RecommendationStore {
    /// Load the table from a JSON array file.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Err(StoreError::NotFound(path.display().to_string()));
        }

        let json = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Load(path.display().to_string(), e.to_string()))?;
        let rows: Vec<RecommendationRow> = serde_json::from_str(&json)
            .map_err(|e| StoreError::Parse(path.display().to_string(), e.to_string()))?;

        Ok(Self { rows })
    }

    pub fn from_rows(rows: Vec<RecommendationRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Best-practice content for a service label, or `None`.
    ///
    /// Greedy first-match: rows are scanned in table order and the FIRST
    /// row sharing at least `min_common_words` lowercase words with the
    /// label wins, even if a later row overlaps more. Result is therefore
    /// sensitive to row order.
    pub fn match_label_with_threshold(
        &self,
        label: &str,
        min_common_words: usize,
    ) -> Option<&str> {
        let target_words: HashSet<String> =
            label.to_lowercase().split_whitespace().map(String::from).collect();

        for row in &self.rows {
            let source_words: HashSet<String> = row
                .heading
                .to_lowercase()
                .split_whitespace()
                .map(String::from)
                .collect();
            let common = target_words.intersection(&source_words).count();
            if common >= min_common_words {
                return Some(&row.content);
            }
        }
        None
    }

    pub fn match_label(&self, label: &str) -> Option<&str> {
        self.match_label_with_threshold(label, MIN_COMMON_WORDS)
    }

    /// Create a small table for tests (no file I/O).
    pub fn load_test() -> Self {
        Self::from_rows(vec![
            RecommendationRow {
                id: "5c9f3c1e-0001-4c9a-9a3f-1a2b3c4d5e6f".into(),
                heading: "Architecture best practices for Azure App Service".into(),
                content: "Run production workloads on Premium v3 plans with zone redundancy."
                    .into(),
            },
            RecommendationRow {
                id: "5c9f3c1e-0002-4c9a-9a3f-1a2b3c4d5e6f".into(),
                heading: "Architecture best practices for Azure Key Vault".into(),
                content: "Use RBAC authorization and enable soft delete with purge protection."
                    .into(),
            },
            RecommendationRow {
                id: "5c9f3c1e-0003-4c9a-9a3f-1a2b3c4d5e6f".into(),
                heading: "Storage Account Best Practices".into(),
                content: "Prefer zone-redundant storage and disable shared key access.".into(),
            },
        ])
    }
}
