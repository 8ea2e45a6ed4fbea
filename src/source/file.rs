//! File-based data source.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, warn};

use super::{DataSource, ServiceSnapshot, SnapshotDocument};

/// A data source that reads service snapshots from a JSON file.
///
/// The source tracks the file's modification time and only returns
/// new data when the file has been updated.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
        }
    }

    /// Returns the path being monitored.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    fn read_file(&mut self) -> Option<ServiceSnapshot> {
        let result = fs::read_to_string(&self.path)
            .map_err(|e| format!("Read error: {}", e))
            .and_then(|content| {
                serde_json::from_str::<SnapshotDocument>(&content)
                    .map_err(|e| format!("Parse error: {}", e))
            });

        match result {
            Ok(document) => {
                self.last_error = None;
                Some(document.into_services())
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read snapshot");
                self.last_error = Some(e);
                None
            }
        }
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<ServiceSnapshot> {
        let current_modified = self.modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,        // First poll, always read
            (Some(_), None) => false, // File disappeared, keep the last data
            (Some(last), Some(current)) => current > last,
        };

        if !file_changed {
            return None;
        }

        let snapshot = self.read_file()?;
        self.last_modified = current_modified;
        debug!(path = %self.path.display(), services = snapshot.len(), "Read snapshot");
        Some(snapshot)
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, Write};
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{
            "name": "grafana",
            "enabled": true,
            "routes": [
                {
                    "type": "http",
                    "domain": "grafana.example.com",
                    "stats": {
                        "points": [
                            { "timestamp": 1744400980236, "value": { "sent": 10, "received": 5 } }
                        ],
                        "total": { "sent": 10, "received": 5 }
                    }
                }
            ]
        }"#
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/services.json");
        assert_eq!(source.path(), Path::new("/tmp/services.json"));
        assert_eq!(source.description(), "file: /tmp/services.json");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_poll_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());

        let snapshot = source.poll().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].name, "grafana");

        // Unchanged file yields nothing new
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_file_source_detects_changes() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());
        assert!(source.poll().is_some());

        file.rewind().unwrap();
        file.as_file().set_len(0).unwrap();
        writeln!(file, r#"[{{ "name": "a" }}, {{ "name": "b" }}]"#).unwrap();
        file.flush().unwrap();
        file.as_file()
            .set_modified(SystemTime::now() + Duration::from_secs(5))
            .unwrap();

        let snapshot = source.poll().unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[1].name, "b");
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/services.json");

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Read error"));
    }

    #[test]
    fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let mut source = FileSource::new(file.path());

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Parse error"));
    }

    #[test]
    fn test_file_source_recovers_after_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{").unwrap();

        let mut source = FileSource::new(file.path());
        assert!(source.poll().is_none());
        assert!(source.error().is_some());

        file.rewind().unwrap();
        file.as_file().set_len(0).unwrap();
        writeln!(file, "{}", sample_json()).unwrap();
        file.flush().unwrap();

        assert!(source.poll().is_some());
        assert!(source.error().is_none());
    }
}
