//! Append-only flat-file logs
//!
//! Every estimate appends a row to the dataset CSV, and user feedback
//! accumulates in a JSON array file. Appends from concurrent requests are
//! serialized through a single-writer mutex so rows never interleave.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// One logged estimate, in the dataset column order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetRow {
    pub title: String,
    pub material: String,
    pub weight_kg: f64,
    pub transport: String,
    pub recyclability: String,
    pub eco_score: String,
    pub carbon_kg: f64,
    pub origin: String,
}

/// Serialized appender/reader for the dataset CSV
pub struct DatasetLogger {
    path: PathBuf,
    lock: Mutex<()>,
}

impl DatasetLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row. The mutex holds for the whole open-write-flush so
    /// concurrent appends cannot interleave.
    pub fn append(&self, row: &DatasetRow) -> Result<(), ApiError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| ApiError::Dataset("dataset lock poisoned".to_string()))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ApiError::Dataset(format!("create {}: {}", parent.display(), e)))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| ApiError::Dataset(format!("open {}: {}", self.path.display(), e)))?;

        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        writer
            .serialize(row)
            .map_err(|e| ApiError::Dataset(format!("append row: {}", e)))?;
        writer
            .flush()
            .map_err(|e| ApiError::Dataset(format!("flush dataset: {}", e)))
    }

    /// Read logged rows, skipping malformed lines and rows missing material,
    /// score, or carbon. `limit` caps the result for frontend consumers.
    pub fn read_rows(&self, limit: Option<usize>) -> Result<Vec<DatasetRow>, ApiError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| ApiError::Dataset("dataset lock poisoned".to_string()))?;

        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| ApiError::Dataset(format!("open {}: {}", self.path.display(), e)))?;

        let mut rows = Vec::new();
        for record in reader.deserialize::<DatasetRow>() {
            let row = match record {
                Ok(row) => row,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping malformed dataset row");
                    continue;
                }
            };
            if row.material.is_empty() || row.eco_score.is_empty() {
                continue;
            }
            rows.push(row);
            if let Some(cap) = limit {
                if rows.len() >= cap {
                    break;
                }
            }
        }
        Ok(rows)
    }
}

/// Serialized appender for the user feedback JSON file
pub struct FeedbackLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FeedbackLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Append a feedback entry to the JSON array file.
    pub fn append(&self, entry: serde_json::Value) -> Result<(), ApiError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| ApiError::Dataset("feedback lock poisoned".to_string()))?;

        let mut existing: Vec<serde_json::Value> = if self.path.exists() {
            let raw = std::fs::read_to_string(&self.path)
                .map_err(|e| ApiError::Dataset(format!("read feedback: {}", e)))?;
            serde_json::from_str(&raw).unwrap_or_default()
        } else {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ApiError::Dataset(format!("create {}: {}", parent.display(), e)))?;
            }
            Vec::new()
        };

        existing.push(entry);
        let serialized = serde_json::to_string_pretty(&existing)
            .map_err(|e| ApiError::Dataset(format!("serialize feedback: {}", e)))?;
        std::fs::write(&self.path, serialized)
            .map_err(|e| ApiError::Dataset(format!("write feedback: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn row(title: &str) -> DatasetRow {
        DatasetRow {
            title: title.to_string(),
            material: "Plastic".to_string(),
            weight_kg: 0.5,
            transport: "Ship".to_string(),
            recyclability: "Medium".to_string(),
            eco_score: "B".to_string(),
            carbon_kg: 1.7,
            origin: "China".to_string(),
        }
    }

    #[test]
    fn test_append_and_read_roundtrip() {
        let dir = TempDir::new().unwrap();
        let logger = DatasetLogger::new(dir.path().join("eco_dataset.csv"));

        logger.append(&row("Bottle")).unwrap();
        logger.append(&row("Box")).unwrap();

        let rows = logger.read_rows(None).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Bottle");
        assert_eq!(rows[1].eco_score, "B");
    }

    #[test]
    fn test_read_limit() {
        let dir = TempDir::new().unwrap();
        let logger = DatasetLogger::new(dir.path().join("eco_dataset.csv"));
        for i in 0..5 {
            logger.append(&row(&format!("item-{}", i))).unwrap();
        }
        assert_eq!(logger.read_rows(Some(3)).unwrap().len(), 3);
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let logger = DatasetLogger::new(dir.path().join("nope.csv"));
        assert!(logger.read_rows(None).unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_appends_do_not_interleave() {
        let dir = TempDir::new().unwrap();
        let logger = std::sync::Arc::new(DatasetLogger::new(dir.path().join("eco_dataset.csv")));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let logger = logger.clone();
                std::thread::spawn(move || {
                    for j in 0..25 {
                        logger.append(&row(&format!("t{}-{}", i, j))).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let rows = logger.read_rows(None).unwrap();
        assert_eq!(rows.len(), 200);
        assert!(rows.iter().all(|r| r.material == "Plastic"));
    }

    #[test]
    fn test_feedback_accumulates() {
        let dir = TempDir::new().unwrap();
        let log = FeedbackLog::new(dir.path().join("user_feedback.json"));

        log.append(serde_json::json!({"rating": 5})).unwrap();
        log.append(serde_json::json!({"rating": 2})).unwrap();

        let raw = std::fs::read_to_string(dir.path().join("user_feedback.json")).unwrap();
        let entries: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(entries.len(), 2);
    }
}
