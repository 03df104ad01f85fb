//! Integration test: the full document lifecycle against an on-disk store.
//!
//! Each test opens a `FileStore` in a fresh temporary directory and drives
//! it through the repository, then reads the files back to check what a
//! second session would see.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use homecare_core::{AppState, Child, InventoryItem, RecordId};
use homecare_store::{export, FileStore, ImportError, Repository, StateStore, STORAGE_KEY};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 8, 30, 0).unwrap()
}

fn open(dir: &std::path::Path) -> Repository<FileStore> {
    Repository::open_at(StateStore::new(FileStore::new(dir)), today(), now()).unwrap()
}

#[test]
fn test_first_session_seeds_and_second_session_reads_it_back() {
    let tmp = tempfile::tempdir().unwrap();
    let first = open(tmp.path()).into_state();
    assert!(tmp.path().join(format!("{STORAGE_KEY}.json")).exists());

    let second = open(tmp.path()).into_state();
    assert_eq!(first, second);
}

#[test]
fn test_mutations_survive_a_restart() {
    let tmp = tempfile::tempdir().unwrap();
    let mut repo = open(tmp.path());
    let zoe = repo
        .upsert(Child {
            id: RecordId::unassigned(),
            name: Some("Zoe".into()),
            gender: Some("F".into()),
            dob: Some("2020-01-01".into()),
            status: Some("Resident".into()),
            admission_date: Some("2024-01-01".into()),
            ..Default::default()
        })
        .unwrap();
    let milk = repo.list::<InventoryItem>()[1].id.to_string();
    repo.remove_by_id::<InventoryItem>(&milk).unwrap();
    drop(repo);

    let reopened = open(tmp.path());
    assert_eq!(reopened.list::<Child>().len(), 4);
    assert_eq!(reopened.list::<Child>()[0], zoe);
    assert!(reopened.get::<InventoryItem>(&milk).is_none());
}

#[test]
fn test_corrupt_file_is_backed_up_and_reseeded() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join(format!("{STORAGE_KEY}.json"));
    std::fs::write(&path, "{\"children\": [").unwrap();

    let repo = open(tmp.path());
    assert_eq!(repo.state().children.len(), 3);

    let backup = tmp.path().join(format!("{STORAGE_KEY}.corrupt.json"));
    assert_eq!(std::fs::read_to_string(backup).unwrap(), "{\"children\": [");
    let rewritten: AppState =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(rewritten, *repo.state());
}

#[test]
fn test_reseeding_twice_differs_only_in_ids() {
    let tmp = tempfile::tempdir().unwrap();
    let mut repo = open(tmp.path());
    let first = repo.state().clone();
    let second = repo.reset_at(today(), now()).unwrap().clone();

    let names = |s: &AppState| {
        s.child_names()
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>()
    };
    assert_eq!(names(&first), names(&second));
    assert_eq!(first.donations.len(), second.donations.len());
    assert_eq!(first.meta, second.meta);
    assert_ne!(first.children[0].id, second.children[0].id);

    let on_disk = open(tmp.path()).into_state();
    assert_eq!(on_disk, second);
}

#[test]
fn test_export_then_import_reproduces_the_dataset() {
    let source = tempfile::tempdir().unwrap();
    let target = tempfile::tempdir().unwrap();
    let mut repo = open(source.path());
    repo.set_budget(15_250.75).unwrap();
    repo.add_expense("Transport", 1_200.0, today()).unwrap();
    let text = export(repo.state()).unwrap();

    let mut other = open(target.path());
    other.clear_at(now()).unwrap();
    let imported = other.import_at(&text, now()).unwrap().clone();
    assert_eq!(imported, *repo.state());
    assert_eq!(open(target.path()).into_state(), imported);
}

#[test]
fn test_rejected_import_keeps_the_file() {
    let tmp = tempfile::tempdir().unwrap();
    let mut repo = open(tmp.path());
    let path = tmp.path().join(format!("{STORAGE_KEY}.json"));
    let before = std::fs::read_to_string(&path).unwrap();

    let err = repo.import_at("not json at all", now()).unwrap_err();
    assert!(matches!(err, ImportError::InvalidJson(_)));
    let err = repo.import_at("[{\"id\": 1}]", now()).unwrap_err();
    assert!(matches!(err, ImportError::NotAnObject { found: "array" }));

    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    assert_eq!(repo.state().children.len(), 3);
}

#[test]
fn test_unreadable_parts_are_backed_up_before_the_next_save() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join(format!("{STORAGE_KEY}.json"));
    let original = serde_json::json!({
        "children": {"c1": {"id": "c1", "name": "Amina K", "dob": "2015-03-10"}},
        "staff": ["legacy-row", {"id": "s1", "name": "Grace Mwangi", "role": "Caregiver"}]
    })
    .to_string();
    std::fs::write(&path, &original).unwrap();

    let mut repo = open(tmp.path());
    assert!(repo.state().children.is_empty());
    assert_eq!(repo.state().staff.len(), 1);
    repo.set_budget(5.0).unwrap();

    let backup = tmp.path().join(format!("{STORAGE_KEY}.corrupt.json"));
    assert_eq!(std::fs::read_to_string(backup).unwrap(), original);
    let rewritten: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(rewritten["children"], serde_json::json!([]));
    assert_eq!(rewritten["finance"]["budget"], serde_json::json!(5));
}
