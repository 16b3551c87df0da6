// Sent-notification history
//
// Append-only CSV audit log of successful sends. The file is opened,
// appended to and closed for every entry; nothing is held across a run.

use crate::Result;
use crate::error::NotifierError;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Outcome column value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryStatus {
    Success,
}

/// One row of the history file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Recipient")]
    pub recipient: String,
    #[serde(rename = "Cert Subject")]
    pub cert_subject: String,
    #[serde(rename = "Days Left")]
    pub days_left: u32,
    #[serde(rename = "Status")]
    pub status: HistoryStatus,
}

impl HistoryEntry {
    /// Entry for a send confirmed at `sent_at`
    pub fn success(
        sent_at: NaiveDateTime,
        recipient: impl Into<String>,
        cert_subject: impl Into<String>,
        days_left: u32,
    ) -> Self {
        Self {
            timestamp: sent_at.format(TIMESTAMP_FORMAT).to_string(),
            recipient: recipient.into(),
            cert_subject: cert_subject.into(),
            days_left,
            status: HistoryStatus::Success,
        }
    }

    /// Dedup key for this row
    pub fn key(&self) -> Option<SentKey> {
        let sent_at = NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT).ok()?;
        Some(SentKey {
            date: sent_at.date(),
            recipient: self.recipient.clone(),
            cert_subject: self.cert_subject.clone(),
            days_left: self.days_left,
        })
    }
}

/// Identifies one notification: same day, same owner, same certificate, same threshold
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SentKey {
    pub date: NaiveDate,
    pub recipient: String,
    pub cert_subject: String,
    pub days_left: u32,
}

/// Writes and reads the history CSV
#[derive(Debug, Clone)]
pub struct HistoryRecorder {
    path: PathBuf,
}

impl HistoryRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `entry`, writing the header row first if the file is new or empty
    pub fn record(&self, entry: &HistoryEntry) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| NotifierError::FileSystemError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| NotifierError::FileSystemError {
                path: self.path.display().to_string(),
                source: e,
            })?;

        let needs_header = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);

        writer.serialize(entry).map_err(|e| self.history_error(e))?;
        writer.flush()?;

        Ok(())
    }

    /// All rows currently in the file; a missing file reads as empty
    pub fn entries(&self) -> Result<Vec<HistoryEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path).map_err(|e| self.history_error(e))?;

        reader
            .deserialize()
            .collect::<std::result::Result<Vec<HistoryEntry>, csv::Error>>()
            .map_err(|e| self.history_error(e))
    }

    /// Keys of every send recorded on `date`
    pub fn sent_on(&self, date: NaiveDate) -> Result<HashSet<SentKey>> {
        Ok(self
            .entries()?
            .iter()
            .filter_map(HistoryEntry::key)
            .filter(|key| key.date == date)
            .collect())
    }

    fn history_error(&self, source: csv::Error) -> NotifierError {
        NotifierError::HistoryError {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_first_record_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = HistoryRecorder::new(dir.path().join("history.csv"));

        recorder
            .record(&HistoryEntry::success(at(9), "a@example.org", "/CN=test.example.org", 7))
            .unwrap();

        let contents = fs::read_to_string(recorder.path()).unwrap();
        assert_eq!(
            contents,
            "Timestamp,Recipient,Cert Subject,Days Left,Status\n\
             2024-01-01 09:00:00,a@example.org,/CN=test.example.org,7,Success\n"
        );
    }

    #[test]
    fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = HistoryRecorder::new(dir.path().join("history.csv"));

        recorder
            .record(&HistoryEntry::success(at(9), "a@example.org", "/CN=a", 7))
            .unwrap();
        recorder
            .record(&HistoryEntry::success(at(10), "b@example.org", "/CN=b", 3))
            .unwrap();

        let contents = fs::read_to_string(recorder.path()).unwrap();
        assert_eq!(contents.matches("Timestamp,Recipient").count(), 1);
        assert_eq!(recorder.entries().unwrap().len(), 2);
    }

    #[test]
    fn test_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = HistoryRecorder::new(dir.path().join("nested/logs/history.csv"));

        recorder
            .record(&HistoryEntry::success(at(9), "a@example.org", "/CN=a", 1))
            .unwrap();
        assert!(recorder.path().exists());
    }

    #[test]
    fn test_subject_with_commas_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = HistoryRecorder::new(dir.path().join("history.csv"));
        let subject = "CN=host.example.org, O=KISTI, C=KR";

        recorder
            .record(&HistoryEntry::success(at(9), "a@example.org", subject, 14))
            .unwrap();

        let entries = recorder.entries().unwrap();
        assert_eq!(entries[0].cert_subject, subject);
        assert_eq!(entries[0].status, HistoryStatus::Success);
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = HistoryRecorder::new(dir.path().join("absent.csv"));
        assert!(recorder.entries().unwrap().is_empty());
    }

    #[test]
    fn test_sent_on_keeps_only_that_day() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = HistoryRecorder::new(dir.path().join("history.csv"));
        let next_day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        recorder
            .record(&HistoryEntry::success(at(9), "a@example.org", "/CN=a", 7))
            .unwrap();
        recorder
            .record(&HistoryEntry::success(at(10), "b@example.org", "/CN=b", 3))
            .unwrap();
        recorder
            .record(&HistoryEntry::success(
                next_day.and_hms_opt(9, 0, 0).unwrap(),
                "a@example.org",
                "/CN=a",
                7,
            ))
            .unwrap();

        let sent = recorder.sent_on(at(0).date()).unwrap();
        assert_eq!(sent.len(), 2);
        assert!(sent.contains(&SentKey {
            date: at(0).date(),
            recipient: "a@example.org".to_string(),
            cert_subject: "/CN=a".to_string(),
            days_left: 7,
        }));
        assert!(!sent.contains(&SentKey {
            date: at(0).date(),
            recipient: "a@example.org".to_string(),
            cert_subject: "/CN=a".to_string(),
            days_left: 3,
        }));

        assert_eq!(recorder.sent_on(next_day).unwrap().len(), 1);
    }

    #[test]
    fn test_sent_on_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = HistoryRecorder::new(dir.path().join("absent.csv"));
        assert!(recorder.sent_on(at(0).date()).unwrap().is_empty());
    }

    #[test]
    fn test_unwritable_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending
        let recorder = HistoryRecorder::new(dir.path());

        let result = recorder.record(&HistoryEntry::success(at(9), "a@example.org", "/CN=a", 7));
        assert!(result.is_err());
    }
}
