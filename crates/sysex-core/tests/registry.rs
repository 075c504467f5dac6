use std::fs;

use sysex_core::{
    DeviceIdentifier, RegistryError, SchemaError, SchemaRegistry, install, installed,
};

const ROLAND_JSON: &str = r#"{
    "key": "roland_jp8000",
    "name": "Roland JP-8000",
    "identifier": [65, 16, 66],
    "checksum_offset": 15,
    "total_length": 16,
    "parameters": {
        "cutoff": {"byte_offset": 5, "category": "filter", "cc_number": 74},
        "wave": {"byte_offset": 6, "bit_mask": 7, "value_range": [0, 6], "category": "oscillator"},
        "sync": {"byte_offset": 6, "bit_mask": 8, "bit_shift": 3, "value_range": [0, 1], "category": "oscillator"}
    }
}"#;

const OVERLAP_JSON: &str = r#"{
    "name": "Overlap",
    "identifier": [125, 1],
    "total_length": 8,
    "parameters": {
        "a": {"byte_offset": 4, "bit_mask": 15},
        "b": {"byte_offset": 4, "bit_mask": 24, "bit_shift": 3, "value_range": [0, 3]}
    }
}"#;

#[test]
fn load_dir_keeps_good_schemas_when_others_fail() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("a_roland.json"), ROLAND_JSON).expect("write");
    fs::write(dir.path().join("b_overlap.json"), OVERLAP_JSON).expect("write");
    fs::write(dir.path().join("c_garbage.json"), "{ not json").expect("write");
    fs::write(dir.path().join("notes.txt"), "ignored").expect("write");

    let mut registry = SchemaRegistry::with_builtin().expect("builtin");
    let report = registry.load_dir(dir.path()).expect("load dir");

    assert_eq!(report.loaded, vec!["roland_jp8000".to_string()]);
    assert_eq!(report.failures.len(), 2);
    assert!(report.failures[0].path.ends_with("b_overlap.json"));
    assert!(matches!(
        report.failures[0].error,
        RegistryError::Validation {
            source: SchemaError::Overlap { .. },
            ..
        }
    ));
    assert!(matches!(
        report.failures[1].error,
        RegistryError::Validation {
            source: SchemaError::Parse(_),
            ..
        }
    ));

    assert_eq!(
        registry.keys().collect::<Vec<_>>(),
        vec!["access_virus_c", "roland_jp8000"]
    );
    let roland = registry
        .lookup_identifier(&DeviceIdentifier::new([0x41, 0x10, 0x42]))
        .expect("roland");
    assert_eq!(roland.parameter("sync").map(|p| p.range()), Some((0, 1)));
}

#[test]
fn load_dir_rejects_duplicates_of_loaded_schemas() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("one.json"), ROLAND_JSON).expect("write");
    let mut registry = SchemaRegistry::new();
    registry.load_dir(dir.path()).expect("first load");
    let report = registry.load_dir(dir.path()).expect("second load");
    assert!(report.loaded.is_empty());
    assert!(matches!(
        report.failures[0].error,
        RegistryError::DuplicateKey { .. }
    ));
    assert_eq!(registry.len(), 1);
}

#[test]
fn missing_directory_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut registry = SchemaRegistry::new();
    let err = registry
        .load_dir(&dir.path().join("absent"))
        .expect_err("missing dir");
    assert!(matches!(err, RegistryError::Io { .. }));
}

#[test]
fn install_happens_once() {
    let first = install(SchemaRegistry::with_builtin().expect("builtin")).expect("install");
    assert!(first.lookup("access_virus_c").is_ok());
    assert!(matches!(
        install(SchemaRegistry::new()),
        Err(RegistryError::AlreadyInstalled)
    ));
    let current = installed().expect("installed");
    assert_eq!(current.len(), 1);
}
