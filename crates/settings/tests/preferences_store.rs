use printbridge_settings::{Preferences, PreferencesStore};
use std::fs;
use tempfile::tempdir;

#[test]
fn load_missing_file_returns_defaults() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");

    let store = PreferencesStore::load(&path).expect("load defaults");
    let prefs = store.preferences();
    assert_eq!(prefs.layout.font_family, "Courier New");
    assert_eq!(prefs.layout.font_size_pt, 12);
    assert_eq!(prefs.layout.paper, "A4");
    assert!(!path.exists());
}

#[test]
fn save_and_reload_roundtrip() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("nested").join("preferences.json");

    let mut store = PreferencesStore::new(path.clone(), Preferences::default());
    store
        .update(|prefs| {
            prefs.layout.font_family = "Arial".to_string();
            prefs.layout.font_size_pt = 10;
            prefs.layout.landscape = true;
        })
        .expect("save");
    assert!(!path.with_extension("tmp").exists());

    let reloaded = PreferencesStore::load(&path).expect("reload");
    assert_eq!(reloaded.preferences().layout.font_family, "Arial");
    assert_eq!(reloaded.preferences().layout.font_size_pt, 10);
    assert!(reloaded.preferences().layout.landscape);
}

#[test]
fn overwrite_sanitizes_values() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");

    let mut store = PreferencesStore::load(&path).expect("default");
    let mut prefs = store.preferences().clone();
    prefs.layout.line_spacing_percent = 50;
    prefs.layout.font_family = "  ".to_string();
    store.overwrite(prefs).expect("overwrite");

    let current = store.preferences();
    assert_eq!(current.layout.line_spacing_percent, 100);
    assert_eq!(current.layout.font_family, "Courier New");
}

#[test]
fn partial_file_fills_defaults() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");
    fs::write(
        &path,
        r#"{
            "version": 0,
            "layout": { "font_size_pt": 200, "paper": "legal" }
        }"#,
    )
    .expect("write partial prefs");

    let store = PreferencesStore::load(&path).expect("load partial file");
    let prefs = store.preferences();
    assert_eq!(prefs.version, 1);
    assert_eq!(prefs.layout.font_size_pt, 144);
    assert_eq!(prefs.layout.paper, "Legal");
    assert_eq!(prefs.layout.dpi, 300);
}

#[test]
fn obsolete_printer_section_is_dropped() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");
    fs::write(
        &path,
        r#"{
            "version": 1,
            "printer": { "default_printer": "Kitchen", "copies": 3 },
            "layout": { "dpi": 600 }
        }"#,
    )
    .expect("write old prefs");

    let store = PreferencesStore::load(&path).expect("load old file");
    assert_eq!(store.preferences().layout.dpi, 600);
    store.save().expect("save");
    let saved = fs::read_to_string(&path).expect("read saved");
    assert!(!saved.contains("printer"));
}

#[test]
fn import_keeps_backup_of_previous_file() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");
    let exported = temp.path().join("exported.json");

    let mut store = PreferencesStore::new(path.clone(), Preferences::default());
    store.save().expect("initial save");

    let mut other = PreferencesStore::new(temp.path().join("other.json"), Preferences::default());
    other
        .preferences_mut()
        .set("layout.font_family", "Times New Roman")
        .expect("set family");
    other.export_to(&exported).expect("export");

    store.import_from(&exported).expect("import");
    assert_eq!(store.preferences().layout.font_family, "Times New Roman");

    let backup = fs::read_to_string(path.with_extension("bak")).expect("backup written");
    assert!(backup.contains("Courier New"));
    let reloaded = PreferencesStore::load(&path).expect("reload");
    assert_eq!(reloaded.preferences().layout.font_family, "Times New Roman");
}

#[test]
fn unparsable_file_is_an_error() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");
    fs::write(&path, "{ not json").expect("write");

    let err = PreferencesStore::load(&path).unwrap_err();
    assert!(err.to_string().contains("failed to parse preferences"));
}
