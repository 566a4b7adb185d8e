//! Local Poem Archive
//!
//! Every composed poem is written to a plain-text file in the poems
//! directory so it survives the session.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("could not create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Everything written to a single archive file.
#[derive(Debug, Clone)]
pub struct ArchiveRecord {
    pub topic: String,
    pub style: String,
    pub created_at: DateTime<Local>,
    pub poem: String,
}

impl ArchiveRecord {
    pub fn new(topic: &str, style: &str, poem: &str) -> Self {
        Self {
            topic: topic.to_string(),
            style: style.to_string(),
            created_at: Local::now(),
            poem: poem.to_string(),
        }
    }

    /// `{topic}_{YYYYmmdd_HHMMSS}.txt`
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}.txt",
            sanitize_topic(&self.topic),
            self.created_at.format("%Y%m%d_%H%M%S")
        )
    }

    /// Body of the archived file.
    pub fn contents(&self) -> String {
        format!(
            "Topic: {}\nStyle: {}\nDate: {}\n\n{}",
            self.topic,
            self.style,
            self.created_at.format("%Y-%m-%d %H:%M:%S%.6f"),
            self.poem
        )
    }
}

/// Text of a standalone copy, without the date line.
pub fn export_text(topic: &str, style: &str, poem: &str) -> String {
    format!("Topic: {}\nStyle: {}\n\n{}", topic, style, poem)
}

/// Makes a topic safe to use as a file name stem.
pub fn sanitize_topic(topic: &str) -> String {
    topic
        .chars()
        .map(|c| match c {
            c if c.is_whitespace() => '_',
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Writes archive records under a single directory.
#[derive(Debug, Clone)]
pub struct Archive {
    dir: PathBuf,
}

impl Archive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `record`, creating the directory if needed. Returns the file path.
    pub fn save(&self, record: &ArchiveRecord) -> Result<PathBuf, ArchiveError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| ArchiveError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.dir.join(record.file_name());
        std::fs::write(&path, record.contents()).map_err(|source| ArchiveError::Write {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), "Archived poem");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn fixed_record() -> ArchiveRecord {
        ArchiveRecord {
            topic: "the smell of rain".to_string(),
            style: "Haiku Master".to_string(),
            created_at: Local.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap(),
            poem: "Petrichor rises\nquiet leaf".to_string(),
        }
    }

    #[test]
    fn test_file_name_uses_topic_and_timestamp() {
        assert_eq!(
            fixed_record().file_name(),
            "the_smell_of_rain_20260314_092653.txt"
        );
    }

    #[test]
    fn test_contents_layout() {
        assert_eq!(
            fixed_record().contents(),
            "Topic: the smell of rain\nStyle: Haiku Master\nDate: 2026-03-14 09:26:53.000000\n\nPetrichor rises\nquiet leaf"
        );
    }

    #[test]
    fn test_sanitize_topic() {
        assert_eq!(sanitize_topic("a lost astronaut"), "a_lost_astronaut");
        assert_eq!(sanitize_topic("../etc/passwd"), ".._etc_passwd");
        assert_eq!(sanitize_topic("why? \"because\""), "why___because_");
        assert_eq!(sanitize_topic("tab\there"), "tab_here");
    }

    #[test]
    fn test_export_text() {
        assert_eq!(
            export_text("sea", "Surrealist", "melting waves"),
            "Topic: sea\nStyle: Surrealist\n\nmelting waves"
        );
    }

    #[test]
    fn test_save_creates_directory_and_file() {
        let tmp = tempdir().unwrap();
        let archive = Archive::new(tmp.path().join("poems").join("nested"));
        let record = fixed_record();

        let path = archive.save(&record).unwrap();
        assert_eq!(path, archive.dir().join(record.file_name()));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), record.contents());
    }

    #[test]
    fn test_save_reports_unwritable_directory() {
        let tmp = tempdir().unwrap();
        let blocker = tmp.path().join("not_a_dir");
        std::fs::write(&blocker, "file in the way").unwrap();

        let err = Archive::new(&blocker).save(&fixed_record()).unwrap_err();
        assert!(matches!(err, ArchiveError::CreateDir { .. }));
        assert!(err.to_string().starts_with("could not create directory"));
    }
}
