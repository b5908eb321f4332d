use std::sync::Arc;
use std::time::{Duration, Instant};

use tabpad_core::{
    BufferSurface, CloseOutcome, Config, CoreError, Database, DocumentStatus, KeyValueStore,
    MemoryStore, Notepad, PersistStatus, SearchQuery, SessionError, Snapshot, Theme, Viewport,
    WELCOME_NAME,
};

const SNAPSHOT_KEY: &str = "notepad-data";

fn config(dir: &std::path::Path) -> Config {
    let mut config = Config::new(dir.to_path_buf());
    config.export_dir = dir.join("exports");
    config
}

fn notepad_over(store: &MemoryStore, config: Config) -> Notepad {
    let notepad = Notepad::with_store(
        config,
        Arc::new(store.clone()),
        Box::new(BufferSurface::new()),
    );
    notepad.initialize();
    notepad
}

fn later() -> Instant {
    Instant::now() + Duration::from_secs(2)
}

#[test]
fn test_session_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::new();

    let first = notepad_over(&store, config(dir.path()));
    let welcome = first.active_document().unwrap();
    assert_eq!(welcome.name, WELCOME_NAME);

    let draft = first.new_document();
    first.input("draft text", Viewport::caret(5));
    first.rename_document(&draft.id, "draft.md");
    first.toggle_word_wrap();
    first.increase_font_size();
    assert!(first.tick(later()));

    let second = notepad_over(&store, config(dir.path()));
    let documents = second.documents();
    assert_eq!(documents.len(), 2);
    assert_eq!(documents[1].name, "draft.md");
    assert!(documents[1].active);
    // Typed into a blank document: restored with the stored text as its baseline
    assert!(!documents[1].modified);

    assert_eq!(second.surface_content(), "draft text");
    assert_eq!(second.surface_viewport().cursor_start, 0);
    assert!(second.preferences().word_wrap);
    assert_eq!(second.preferences().font_size, 14);

    // The id counter continues past the restored documents
    let third = second.new_document();
    assert_eq!(third.name, "Untitled 3");
    assert!(third.id.starts_with("tab-3-"));
}

#[test]
fn test_sqlite_backed_notepad() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());

    {
        let notepad = Notepad::new(config.clone()).unwrap();
        assert!(!notepad.initialize());
        notepad.input("kept on disk", Viewport::caret(0));
        let report = notepad.before_unload();
        assert!(report.persisted);
        assert!(report.has_unsaved_changes);
    }

    let notepad = Notepad::new(config.clone()).unwrap();
    assert!(notepad.initialize());
    assert_eq!(notepad.surface_content(), "kept on disk");

    let db = Database::open(&config.database_path).unwrap();
    assert!(db.get(SNAPSHOT_KEY).unwrap().is_some());
}

#[test]
fn test_edits_are_debounced() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::new();
    let notepad = notepad_over(&store, config(dir.path()));

    for i in 0..20 {
        notepad.input(format!("typing {}", i).as_str(), Viewport::caret(0));
        assert!(!notepad.tick(Instant::now()));
    }
    assert_eq!(store.write_count(), 0);

    assert!(notepad.tick(later()));
    assert!(!notepad.tick(later()));
    assert_eq!(store.write_count(), 1);
    assert!(matches!(
        notepad.status().persist,
        PersistStatus::Saved { .. }
    ));

    let raw = store.get(SNAPSHOT_KEY).unwrap().unwrap();
    let snapshot = Snapshot::from_json(&raw).unwrap();
    assert_eq!(snapshot.tabs[0].content, "typing 19");
}

#[test]
fn test_closing_modified_document_needs_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::new();
    let notepad = notepad_over(&store, config(dir.path()));

    let doc = notepad.new_document();
    notepad.input("unsaved", Viewport::caret(7));

    let err = notepad.close_document(&doc.id, false).unwrap_err();
    assert!(matches!(
        err,
        CoreError::Session(SessionError::UnsavedChanges { .. })
    ));
    assert_eq!(notepad.documents().len(), 2);

    assert_eq!(
        notepad.close_document(&doc.id, true).unwrap(),
        CloseOutcome::Closed
    );
    assert_eq!(notepad.active_document().unwrap().name, WELCOME_NAME);
}

#[test]
fn test_closing_last_document_opens_blank() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::new();
    let notepad = notepad_over(&store, config(dir.path()));

    assert_eq!(notepad.close_active(false).unwrap(), CloseOutcome::Closed);

    let documents = notepad.documents();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].name, "Untitled 2");
    assert_eq!(notepad.surface_content(), "");
}

#[test]
fn test_switching_keeps_each_documents_text() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::new();
    let notepad = notepad_over(&store, config(dir.path()));

    let a = notepad.open_text("a.txt", "alpha");
    let b = notepad.open_text("b.txt", "beta");
    notepad.input("beta two", Viewport::selection(0, 4));

    assert!(notepad.switch_document(&a.id));
    assert_eq!(notepad.surface_content(), "alpha");
    notepad.input("alpha two", Viewport::caret(9));

    assert!(notepad.switch_document(&b.id));
    assert_eq!(notepad.surface_content(), "beta two");
    assert_eq!(notepad.surface_viewport().cursor_end, 4);

    assert!(!notepad.switch_document("tab-unknown"));
}

#[test]
fn test_open_and_export_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::new();
    let notepad = notepad_over(&store, config(dir.path()));

    let source = dir.path().join("todo.txt");
    std::fs::write(&source, "buy milk").unwrap();

    let opened = notepad.open_file(&source).unwrap();
    assert_eq!(opened.name, "todo.txt");
    assert_eq!(notepad.surface_content(), "buy milk");
    assert!(!opened.is_modified());

    notepad.input("buy milk and eggs", Viewport::caret(17));
    assert!(notepad.status().modified);

    let path = notepad.export_active(None).unwrap();
    assert_eq!(path, dir.path().join("exports").join("todo.txt"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "buy milk and eggs");
    assert!(!notepad.status().modified);

    assert!(notepad.open_file(&dir.path().join("missing.txt")).is_err());
}

#[test]
fn test_open_many_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::new();
    let notepad = notepad_over(&store, config(dir.path()));

    let first = dir.path().join("one.txt");
    let second = dir.path().join("two.md");
    std::fs::write(&first, "1").unwrap();
    std::fs::write(&second, "2").unwrap();

    let results = notepad.open_files(&[first, dir.path().join("missing.txt"), second]);
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(CoreError::Io(_))));
    assert!(results[2].is_ok());

    let names: Vec<String> = notepad.documents().into_iter().map(|d| d.name).collect();
    assert_eq!(names, vec![WELCOME_NAME, "one.txt", "two.md"]);
    assert_eq!(notepad.active_document().unwrap().name, "two.md");
    assert_eq!(notepad.surface_content(), "2");
}

#[test]
fn test_export_adds_extension() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::new();
    let notepad = notepad_over(&store, config(dir.path()));

    let doc = notepad.new_document();
    notepad.rename_document(&doc.id, "notes");
    let out = dir.path().join("elsewhere");

    let path = notepad.export_active(Some(out.as_path())).unwrap();
    assert_eq!(path, out.join("notes.txt"));
}

#[test]
fn test_find_and_replace_through_surface() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::new();
    let notepad = notepad_over(&store, config(dir.path()));

    notepad.new_document();
    notepad.input("one fish two fish", Viewport::caret(0));

    let query = SearchQuery::new("fish");
    assert_eq!(notepad.find_next(&query).unwrap().map(|s| s.start), Some(4));
    assert_eq!(notepad.surface_viewport().cursor_end, 8);

    let outcome = notepad.replace_one(&query, "cat").unwrap();
    assert_eq!(outcome.text.as_deref(), Some("one cat two fish"));
    assert_eq!(notepad.surface_content(), "one cat two fish");
    assert_eq!(notepad.surface_viewport().cursor_start, 12);
    assert_eq!(
        notepad.active_document().unwrap().content,
        "one cat two fish"
    );

    let replaced = notepad
        .replace_all(&SearchQuery::new(r"(\w+) (\w+)").regex(true), "$2 $1")
        .unwrap();
    assert_eq!(replaced, 2);
    assert_eq!(notepad.surface_content(), "cat one fish two");
    assert_eq!(notepad.status().persist, PersistStatus::Idle);
}

#[test]
fn test_replace_all_without_matches_leaves_document() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::new();
    let notepad = notepad_over(&store, config(dir.path()));

    let doc = notepad.open_text("x.txt", "nothing here");
    assert_eq!(
        notepad.replace_all(&SearchQuery::new("zzz"), "y").unwrap(),
        0
    );
    assert_eq!(
        notepad.active_document().unwrap().status(),
        DocumentStatus::Clean
    );
    assert_eq!(notepad.active_document().unwrap().id, doc.id);
}

#[test]
fn test_theme_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::new();

    let notepad = notepad_over(&store, config(dir.path()));
    assert_eq!(notepad.theme(), Theme::Dark);
    notepad.toggle_theme();

    assert_eq!(store.get("notepad-theme").unwrap().as_deref(), Some("light"));
    let reloaded = notepad_over(&store, config(dir.path()));
    assert_eq!(reloaded.theme(), Theme::Light);
}

#[test]
fn test_storage_unavailable_keeps_working() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::new();
    store.set_unavailable(true);

    let notepad = notepad_over(&store, config(dir.path()));
    assert_eq!(notepad.active_document().unwrap().name, WELCOME_NAME);

    notepad.input("still editing", Viewport::caret(0));
    let report = notepad.before_unload();
    assert!(!report.persisted);
    assert!(matches!(
        notepad.status().persist,
        PersistStatus::Failed { .. }
    ));
    assert_eq!(notepad.surface_content(), "still editing");
}

#[tokio::test(start_paused = true)]
async fn test_background_autosave() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::new();
    let notepad = notepad_over(&store, config(dir.path()));
    let _autosave = notepad.spawn_autosave();

    notepad.input("autosaved", Viewport::caret(0));
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(store.write_count(), 0);

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(store.write_count(), 1);
}
