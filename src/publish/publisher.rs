//! Atomic, no-clobber artifact writer
//!
//! A non-empty document is serialized to `<file>.tmp` beside the target and
//! then renamed over it, so readers see either the old artifact or the new
//! one, never a partial write. An empty document touches nothing on disk.

use super::document::OutputDocument;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Published { comps: usize },
    /// Nothing to publish; the previous artifact was kept
    SkippedEmpty,
}

pub struct Publisher {
    path: PathBuf,
}

impl Publisher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "output.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    pub fn publish(&self, document: &OutputDocument) -> Result<PublishOutcome, PublishError> {
        if document.is_empty() {
            log::warn!(
                "⚠️  No compositions this run, keeping existing {}",
                self.path.display()
            );
            return Ok(PublishOutcome::SkippedEmpty);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp = self.temp_path();
        write_document(&temp, document)?;

        if let Err(e) = fs::rename(&temp, &self.path) {
            let _ = fs::remove_file(&temp);
            return Err(e.into());
        }

        log::info!(
            "💾 Published {} compositions to {}",
            document.comps.len(),
            self.path.display()
        );
        Ok(PublishOutcome::Published {
            comps: document.comps.len(),
        })
    }
}

fn write_document(path: &Path, document: &OutputDocument) -> Result<(), PublishError> {
    let json = serde_json::to_vec_pretty(document)?;

    let mut file = fs::File::create(path)?;
    file.write_all(&json)?;
    file.sync_all()?;
    Ok(())
}

/// The last published document; `None` when missing or unreadable
pub fn read_published(path: impl AsRef<Path>) -> Option<OutputDocument> {
    let path = path.as_ref();
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) => {
            log::debug!("No published artifact at {}: {}", path.display(), e);
            return None;
        }
    };

    match serde_json::from_slice(&raw) {
        Ok(doc) => Some(doc),
        Err(e) => {
            log::warn!("⚠️  Ignoring unreadable artifact {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::model::{MatchId, MatchRecord, Participant, Unit};
    use crate::publish::RunMeta;
    use chrono::Utc;
    use tempfile::TempDir;

    fn meta() -> RunMeta {
        RunMeta {
            generated_at: Utc::now(),
            platform: "na1".to_string(),
            region: "americas".to_string(),
            queue_filter: vec![1100],
            sample_match_count: 1,
            patch: "14.24.1".to_string(),
            seed_count: 1,
            identity_count: 1,
        }
    }

    fn non_empty() -> OutputDocument {
        let record = MatchRecord {
            match_id: MatchId::new("NA1_1"),
            queue_id: 1100,
            game_version: None,
            participants: vec![Participant {
                placement: 1,
                units: vec![Unit::new("TFT13_Jinx", 2)],
            }],
        };
        OutputDocument::new(meta(), aggregate(&[record], 1, 10))
    }

    fn empty() -> OutputDocument {
        OutputDocument::new(meta(), Vec::new())
    }

    #[test]
    fn test_publishes_to_missing_target() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("comps.json");
        let publisher = Publisher::new(&path);

        let outcome = publisher.publish(&non_empty()).unwrap();

        assert_eq!(outcome, PublishOutcome::Published { comps: 1 });
        let doc = read_published(&path).unwrap();
        assert_eq!(doc.comps.len(), 1);
        assert!(!publisher.temp_path().exists());
    }

    #[test]
    fn test_empty_result_never_clobbers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("comps.json");
        let publisher = Publisher::new(&path);
        publisher.publish(&non_empty()).unwrap();
        let before = fs::read(&path).unwrap();

        let outcome = publisher.publish(&empty()).unwrap();

        assert_eq!(outcome, PublishOutcome::SkippedEmpty);
        assert_eq!(fs::read(&path).unwrap(), before);
        assert!(!publisher.temp_path().exists());
    }

    #[test]
    fn test_empty_result_with_no_prior_artifact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("comps.json");

        let outcome = Publisher::new(&path).publish(&empty()).unwrap();

        assert_eq!(outcome, PublishOutcome::SkippedEmpty);
        assert!(!path.exists());
    }

    #[test]
    fn test_empty_result_skips_unwritable_target() {
        let dir = TempDir::new().unwrap();
        // a regular file where the parent directory should be: any write fails
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"").unwrap();
        let path = blocker.join("comps.json");
        let publisher = Publisher::new(&path);

        let outcome = publisher.publish(&empty()).unwrap();
        assert_eq!(outcome, PublishOutcome::SkippedEmpty);

        assert!(matches!(publisher.publish(&non_empty()), Err(PublishError::Io(_))));
    }

    #[test]
    fn test_error_messages() {
        let io = PublishError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        assert_eq!(io.to_string(), "IO error: disk full");
    }

    #[test]
    fn test_replaces_empty_prior_artifact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("comps.json");
        fs::write(&path, serde_json::to_vec(&empty()).unwrap()).unwrap();

        Publisher::new(&path).publish(&non_empty()).unwrap();

        assert_eq!(read_published(&path).unwrap().comps.len(), 1);
    }

    #[test]
    fn test_unreadable_artifact_reads_as_no_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("comps.json");
        assert!(read_published(&path).is_none());

        fs::write(&path, b"{ not json").unwrap();
        assert!(read_published(&path).is_none());
    }
}
