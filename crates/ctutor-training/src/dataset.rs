use crate::error::{TrainingError, TrainingResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Stable identifier for a dataset (content hash).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetId(pub String);

impl std::fmt::Display for DatasetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Structured fix attached to a labeled diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedFix {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub code: String,
}

/// One persisted dataset entry.
///
/// `error_message` is already normalized and placeholder-scrubbed; it is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub id: String,
    pub compiler: String,
    pub error_type: String,
    pub error_message: String,
    pub explanation: String,
    pub suggested_fix: SuggestedFix,
}

/// Ordered records in generation order.
pub type DatasetFile = Vec<DatasetRecord>;

/// A single (input, target) pair fed to a `ModelService`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub input: String,
    pub target: String,
}

/// Fixed template turning records into model inputs and targets.
///
/// The same prefix is used when training and when explaining a live diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    pub prefix: String,
    pub include_fix_description: bool,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            prefix: "explain this C++ compiler error, detailing the specific cause and a solution: "
                .to_string(),
            include_fix_description: true,
        }
    }
}

impl PromptTemplate {
    #[must_use]
    pub fn input_for(&self, diagnostic: &str) -> String {
        format!("{}{}", self.prefix, diagnostic)
    }

    #[must_use]
    pub fn example_for(&self, record: &DatasetRecord) -> TrainingExample {
        let target = if self.include_fix_description && !record.suggested_fix.description.is_empty() {
            format!("{} {}", record.explanation, record.suggested_fix.description)
        } else {
            record.explanation.clone()
        };
        TrainingExample { input: self.input_for(&record.error_message), target }
    }

    #[must_use]
    pub fn examples_for(&self, records: &[DatasetRecord]) -> Vec<TrainingExample> {
        records.iter().map(|r| self.example_for(r)).collect()
    }
}

pub fn compute_dataset_id(records: &[DatasetRecord]) -> TrainingResult<DatasetId> {
    let mut hasher = Sha256::new();

    for record in records {
        let bytes = serde_json::to_vec(record)?;
        hasher.update(bytes);
        hasher.update(b"\n");
    }

    Ok(DatasetId(hex::encode(hasher.finalize())))
}

pub fn validate_records(records: &[DatasetRecord]) -> TrainingResult<()> {
    if records.is_empty() {
        return Err(TrainingError::Dataset("dataset must not be empty".to_string()));
    }
    for (idx, record) in records.iter().enumerate() {
        if record.error_message.trim().is_empty() {
            return Err(TrainingError::Dataset(format!(
                "record[{idx}] ({}) has an empty error_message",
                record.id
            )));
        }
        if record.explanation.trim().is_empty() {
            return Err(TrainingError::Dataset(format!(
                "record[{idx}] ({}) has an empty explanation",
                record.id
            )));
        }
    }
    Ok(())
}

/// Write the whole dataset as one pretty-printed JSON array.
pub fn write_dataset_file(path: &Path, records: &[DatasetRecord]) -> TrainingResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn read_dataset_file(path: &Path) -> TrainingResult<DatasetFile> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        TrainingError::Dataset(format!("failed to read dataset {}: {e}", path.display()))
    })?;
    let records: DatasetFile = serde_json::from_str(&contents).map_err(|e| {
        TrainingError::Dataset(format!("failed to parse dataset {}: {e}", path.display()))
    })?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(id: &str, message: &str) -> DatasetRecord {
        DatasetRecord {
            id: id.to_string(),
            compiler: "g++".to_string(),
            error_type: "Missing Semicolon".to_string(),
            error_message: message.to_string(),
            explanation: "Statements end with a semicolon.".to_string(),
            suggested_fix: SuggestedFix {
                kind: "code_modification".to_string(),
                description: "Add a semicolon.".to_string(),
                code: "int x = 5;".to_string(),
            },
        }
    }

    #[test]
    fn test_validate_records_rejects_empty_dataset() {
        assert!(validate_records(&[]).is_err());
    }

    #[test]
    fn test_validate_records_rejects_empty_error_message() {
        let records = vec![record("a", "source.cpp:1:1: error"), record("b", "  ")];
        let err = validate_records(&records).unwrap_err();
        assert!(err.to_string().contains("(b)"));
    }

    #[test]
    fn test_compute_dataset_id_stable_for_same_content() {
        let records = vec![record("a", "x"), record("b", "y")];
        let id1 = compute_dataset_id(&records).unwrap();
        let id2 = compute_dataset_id(&records).unwrap();
        assert_eq!(id1, id2);

        let reordered = vec![record("b", "y"), record("a", "x")];
        assert_ne!(id1, compute_dataset_id(&reordered).unwrap());
    }

    #[test]
    fn test_suggested_fix_serializes_kind_as_type() {
        let json = serde_json::to_value(record("a", "x")).unwrap();
        assert_eq!(json["suggested_fix"]["type"], "code_modification");
        assert!(json["suggested_fix"].get("kind").is_none());
    }

    #[test]
    fn test_write_then_read_preserves_order() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("dataset.json");
        let records = vec![record("first", "x"), record("second", "y")];

        write_dataset_file(&path, &records).unwrap();
        let loaded = read_dataset_file(&path).unwrap();

        assert_eq!(loaded, records);
    }

    #[test]
    fn test_prompt_template_appends_fix_description() {
        let template = PromptTemplate::default();
        let example = template.example_for(&record("a", "source.cpp:1: error"));

        assert!(example.input.ends_with("source.cpp:1: error"));
        assert!(example.input.starts_with("explain this C++ compiler error"));
        assert_eq!(example.target, "Statements end with a semicolon. Add a semicolon.");

        let plain = PromptTemplate { include_fix_description: false, ..PromptTemplate::default() };
        assert_eq!(plain.example_for(&record("a", "x")).target, "Statements end with a semicolon.");
    }
}
