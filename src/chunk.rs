use std::fs::File;
use std::io::{BufRead, BufReader};

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;

use crate::app::{ProgressEvent, ProgressSink};
use crate::domain::PaperRecord;
use crate::error::ScivaultError;

pub fn chunk_path(dir: &Utf8Path, number: u32) -> Utf8PathBuf {
    dir.join(format!("chunk_{number}.json"))
}

// Chunk files are newline-delimited JSON objects; lines exported from a
// JSON array may keep a trailing comma, which is stripped before parsing.
pub fn read_chunk_file(
    path: &Utf8Path,
    sink: &dyn ProgressSink,
) -> Result<Vec<PaperRecord>, ScivaultError> {
    let file = File::open(path.as_std_path())
        .map_err(|err| ScivaultError::ChunkRead(format!("{path}: {err}")))?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|err| ScivaultError::ChunkRead(format!("{path}: {err}")))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let trimmed = trimmed.strip_suffix(',').unwrap_or(trimmed);
        match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => {
                if let Some(record) = PaperRecord::from_value(value) {
                    records.push(record);
                }
            }
            Err(err) => {
                sink.event(ProgressEvent {
                    message: format!(
                        "phase=Read; skipping line {} in {}: {}",
                        index + 1,
                        path,
                        err
                    ),
                    elapsed: None,
                });
            }
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Mutex;

    use assert_matches::assert_matches;

    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<String>>,
    }

    impl ProgressSink for RecordingSink {
        fn event(&self, event: ProgressEvent) {
            self.events.lock().unwrap().push(event.message);
        }
    }

    fn write_chunk(dir: &Utf8Path, name: &str, content: &str) -> Utf8PathBuf {
        let path = dir.join(name);
        fs::write(path.as_std_path(), content).unwrap();
        path
    }

    fn temp_dir() -> (tempfile::TempDir, Utf8PathBuf) {
        let temp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        (temp, path)
    }

    #[test]
    fn chunk_path_naming() {
        assert_eq!(
            chunk_path(Utf8Path::new("split_files"), 7),
            Utf8PathBuf::from("split_files/chunk_7.json")
        );
    }

    #[test]
    fn reads_records_in_line_order() {
        let (_temp, dir) = temp_dir();
        let path = write_chunk(
            &dir,
            "chunk_1.json",
            concat!(
                "{\"doi\":\"10.1/a\",\"title\":\"A\",\"aid\":\"2301.00001\"}\n",
                "{\"doi\":\"10.1/b\",\"title\":\"B\",\"aid\":\"2301.00002\"}\n",
            ),
        );
        let records = read_chunk_file(&path, &RecordingSink::default()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].doi, "10.1/a");
        assert_eq!(records[1].doi, "10.1/b");
    }

    #[test]
    fn trailing_comma_parses_like_plain_line() {
        let (_temp, dir) = temp_dir();
        let plain = write_chunk(
            &dir,
            "chunk_1.json",
            "{\"doi\":\"10.1/a\",\"title\":\"A\",\"aid\":\"x\"}\n",
        );
        let suffixed = write_chunk(
            &dir,
            "chunk_2.json",
            "{\"doi\":\"10.1/a\",\"title\":\"A\",\"aid\":\"x\"},\n",
        );
        let sink = RecordingSink::default();
        let first = read_chunk_file(&plain, &sink).unwrap();
        let second = read_chunk_file(&suffixed, &sink).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(first[0].doi, second[0].doi);
        assert!(sink.events.lock().unwrap().is_empty());
    }

    #[test]
    fn bad_line_is_skipped_and_reported_with_position() {
        let (_temp, dir) = temp_dir();
        let path = write_chunk(
            &dir,
            "chunk_1.json",
            concat!(
                "{\"doi\":\"10.1/a\",\"title\":\"A\",\"aid\":\"x\"}\n",
                "{not json}\n",
                "\n",
                "{\"doi\":\"10.1/b\",\"title\":\"B\",\"aid\":\"y\"}\n",
            ),
        );
        let sink = RecordingSink::default();
        let records = read_chunk_file(&path, &sink).unwrap();
        assert_eq!(records.len(), 2);

        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].contains("line 2"));
        assert!(events[0].contains("chunk_1.json"));
    }

    #[test]
    fn records_missing_required_fields_are_dropped() {
        let (_temp, dir) = temp_dir();
        let path = write_chunk(
            &dir,
            "chunk_1.json",
            concat!(
                "{\"doi\":\"10.1/a\",\"title\":\"A\",\"aid\":\"x\"}\n",
                "{\"doi\":\"10.1/b\",\"title\":\"B\"}\n",
                "{\"doi\":\"\",\"title\":\"C\",\"aid\":\"z\"}\n",
            ),
        );
        let sink = RecordingSink::default();
        let records = read_chunk_file(&path, &sink).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].doi, "10.1/a");
        assert!(sink.events.lock().unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let (_temp, dir) = temp_dir();
        let err = read_chunk_file(&chunk_path(&dir, 1), &RecordingSink::default()).unwrap_err();
        assert_matches!(err, ScivaultError::ChunkRead(_));
    }
}
