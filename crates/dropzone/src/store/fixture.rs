//! Seed data for the record store, read from a JSON array of records.

use std::collections::HashSet;
use std::path::Path;

use crate::error::ConfigError;
use crate::record::FileRecord;

pub fn load_fixture<P: AsRef<Path>>(path: P) -> Result<Vec<FileRecord>, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    let records = load_fixture_from_str(&content)?;
    log::info!("Loaded {} fixture records from {:?}", records.len(), path);
    Ok(records)
}

pub fn load_fixture_from_str(content: &str) -> Result<Vec<FileRecord>, ConfigError> {
    let records: Vec<FileRecord> = serde_json::from_str(content)?;

    let mut ids = HashSet::new();
    for record in &records {
        if !ids.insert(record.id.as_str()) {
            return Err(ConfigError::Validation {
                message: format!("Duplicate fixture record id '{}'", record.id),
            });
        }
        if record.progress > 100 {
            return Err(ConfigError::Validation {
                message: format!(
                    "Fixture record '{}' has progress {} (must be 0-100)",
                    record.id, record.progress
                ),
            });
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FileStatus;

    const FIXTURE: &str = r#"[
        {
            "id": "1",
            "name": "vacation.jpg",
            "size": 2457600,
            "type": "image/jpeg",
            "status": "completed",
            "progress": 100,
            "createdAt": "2024-01-15T10:30:00Z"
        },
        {
            "id": "2",
            "name": "report.pdf",
            "size": 1048576,
            "type": "application/pdf",
            "status": "error",
            "progress": 35,
            "createdAt": "2024-01-14T09:00:00Z"
        }
    ]"#;

    #[test]
    fn test_parse_fixture() {
        let records = load_fixture_from_str(FIXTURE).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].status, FileStatus::Completed);
        assert_eq!(records[1].mime_type, "application/pdf");
        assert!(records[0].url.is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"[
            {"id":"1","name":"a","size":1,"type":"text/plain","status":"pending","progress":0,"createdAt":"2024-01-01T00:00:00Z"},
            {"id":"1","name":"b","size":1,"type":"text/plain","status":"pending","progress":0,"createdAt":"2024-01-01T00:00:00Z"}
        ]"#;
        let err = load_fixture_from_str(json).unwrap_err();
        assert!(err.to_string().contains("Duplicate"));
    }

    #[test]
    fn test_progress_out_of_range() {
        let json = r#"[
            {"id":"1","name":"a","size":1,"type":"text/plain","status":"uploading","progress":150,"createdAt":"2024-01-01T00:00:00Z"}
        ]"#;
        assert!(matches!(
            load_fixture_from_str(json),
            Err(ConfigError::Validation { .. })
        ));
    }
}
