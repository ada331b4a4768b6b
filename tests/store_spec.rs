use std::sync::Arc;
use std::thread;

use qsort_survey::error::QsortError;
use qsort_survey::models::{SortedEntry, Submission};
use qsort_survey::store::{
    CsvSubmissionStore, SqliteSubmissionStore, SubmissionRecorder, SubmissionRepository,
};
use speculate2::speculate;

fn submission(name: &str, version: &str) -> Submission {
    Submission {
        name: name.to_string(),
        version: version.to_string(),
        sorted_data: vec![
            SortedEntry { column: 2, card: "Sunfield - 10MW (Solar)".to_string() },
            SortedEntry { column: 1, card: "Windy Ridge-20MW (Wind)".to_string() },
            SortedEntry { column: 3, card: "Harbor".to_string() },
        ],
    }
}

fn assert_numbering(recorder: &SubmissionRecorder) {
    assert_eq!(recorder.record(&submission("Alice", "V1")).unwrap(), 1);
    assert_eq!(recorder.record(&submission("Alice", "V1")).unwrap(), 2);
    assert_eq!(recorder.record(&submission("Bob", "V1")).unwrap(), 1);
    assert_eq!(recorder.record(&submission("Alice", "V2")).unwrap(), 1);
    assert_eq!(recorder.record(&submission(" Alice ", "V1 ")).unwrap(), 3);
}

fn assert_records(recorder: &SubmissionRecorder) {
    recorder.record(&submission("Alice", "V1")).unwrap();

    let records = recorder.repository().records().unwrap();
    assert_eq!(records.len(), 3);
    let rows: Vec<(&str, &str, u32, usize, &str)> = records
        .iter()
        .map(|r| (r.user.as_str(), r.version.as_str(), r.submission, r.column, r.project.as_str()))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("Alice", "V1", 1, 2, "Sunfield"),
            ("Alice", "V1", 1, 1, "Windy Ridge"),
            ("Alice", "V1", 1, 3, "Harbor"),
        ]
    );
}

fn assert_rejects_incomplete(recorder: &SubmissionRecorder) {
    let mut no_cards = submission("Alice", "V1");
    no_cards.sorted_data.clear();

    for bad in [submission("  ", "V1"), submission("Alice", ""), no_cards] {
        assert!(matches!(recorder.record(&bad), Err(QsortError::Validation(_))));
    }
    assert!(recorder.repository().records().unwrap().is_empty());
}

fn assert_concurrent_numbers_unique(recorder: &SubmissionRecorder) {
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let recorder = recorder.clone();
            thread::spawn(move || recorder.record(&submission("Alice", "V1")).unwrap())
        })
        .collect();

    let mut numbers: Vec<u32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    numbers.sort_unstable();
    assert_eq!(numbers, (1..=8).collect::<Vec<u32>>());

    let records = recorder.repository().records().unwrap();
    assert_eq!(records.len(), 24);
    for chunk in records.chunks(3) {
        assert!(chunk.iter().all(|r| r.submission == chunk[0].submission));
    }
}

speculate! {
    describe "csv store" {
        before {
            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let path = dir.path().join("qsort_data.csv");
            let store = CsvSubmissionStore::open(&path).expect("Failed to open store");
            let recorder = SubmissionRecorder::new(Arc::new(store));
        }

        it "numbers submissions per user and version" {
            assert_numbering(&recorder);
        }

        it "writes one record per placed card with the project name" {
            assert_records(&recorder);
        }

        it "rejects incomplete submissions without writing" {
            assert_rejects_incomplete(&recorder);
        }

        it "serializes concurrent submissions" {
            assert_concurrent_numbers_unique(&recorder);
        }

        it "writes a five column header and plain rows" {
            recorder.record(&submission("Alice", "V1")).unwrap();

            let contents = std::fs::read_to_string(&path).unwrap();
            let lines: Vec<&str> = contents.lines().collect();
            assert_eq!(lines[0], "User,Version,Submission,Column,Project");
            assert_eq!(lines[1], "Alice,V1,1,2,Sunfield");
            assert_eq!(lines.len(), 4);
        }

        it "continues numbering after reopening the file" {
            recorder.record(&submission("Alice", "V1")).unwrap();

            let reopened = CsvSubmissionStore::open(&path).unwrap();
            let recorder = SubmissionRecorder::new(Arc::new(reopened));
            assert_eq!(recorder.record(&submission("Alice", "V1")).unwrap(), 2);
        }
    }

    describe "sqlite store" {
        before {
            let store = SqliteSubmissionStore::open_memory().expect("Failed to open database");
            let recorder = SubmissionRecorder::new(Arc::new(store));
        }

        it "numbers submissions per user and version" {
            assert_numbering(&recorder);
        }

        it "writes one record per placed card with the project name" {
            assert_records(&recorder);
        }

        it "rejects incomplete submissions without writing" {
            assert_rejects_incomplete(&recorder);
        }

        it "serializes concurrent submissions" {
            assert_concurrent_numbers_unique(&recorder);
        }

        it "continues numbering after reopening the file" {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("qsort_data.db");

            let first = SubmissionRecorder::new(Arc::new(SqliteSubmissionStore::open(&path).unwrap()));
            first.record(&submission("Alice", "V1")).unwrap();
            drop(first);

            let second = SubmissionRecorder::new(Arc::new(SqliteSubmissionStore::open(&path).unwrap()));
            assert_eq!(second.record(&submission("Alice", "V1")).unwrap(), 2);
        }
    }
}
