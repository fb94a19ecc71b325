// Integration tests for bookmark state persistence across database reopen.

use line_marks_config::{FileSnapshot, MarksSnapshot, MarksStateStore};

fn single_file(path: &str, lines: &[usize]) -> MarksSnapshot {
    let mut snapshot = MarksSnapshot::default();
    snapshot.files.insert(
        path.to_string(),
        FileSnapshot {
            lines: lines.to_vec(),
            notes: Default::default(),
        },
    );
    snapshot
}

#[test]
fn test_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("marks.redb");

    {
        let store = MarksStateStore::open(&db_path).unwrap();
        let mut snapshot = single_file("/a.rs", &[1, 2, 3]);
        snapshot
            .files
            .get_mut("/a.rs")
            .unwrap()
            .notes
            .insert(2, "second".to_string());
        store.save_snapshot(&snapshot).unwrap();
    }

    let store = MarksStateStore::open(&db_path).unwrap();
    let loaded = store.load_snapshot().unwrap();
    assert_eq!(loaded.files["/a.rs"].lines, vec![1, 2, 3]);
    assert_eq!(loaded.files["/a.rs"].notes[&2], "second");
}

#[test]
fn test_open_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("deeper").join("marks.redb");

    let store = MarksStateStore::open(&db_path).unwrap();
    assert!(db_path.exists());
    assert!(store.load_snapshot().unwrap().is_empty());
}

#[test]
fn test_many_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = MarksStateStore::open(&dir.path().join("marks.redb")).unwrap();

    let mut snapshot = MarksSnapshot::default();
    for i in 0..200 {
        snapshot.files.insert(
            format!("/src/file_{i:03}.rs"),
            FileSnapshot {
                lines: vec![i, i + 10],
                notes: Default::default(),
            },
        );
    }
    store.save_snapshot(&snapshot).unwrap();

    let loaded = store.load_snapshot().unwrap();
    assert_eq!(loaded.files.len(), 200);
    assert_eq!(loaded, snapshot);

    // Shrinking the set removes rows that are no longer present
    let smaller = single_file("/src/file_007.rs", &[7]);
    store.save_snapshot(&smaller).unwrap();
    assert_eq!(store.load_snapshot().unwrap(), smaller);
}
