use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use sysex_core::{DecodeReport, InputInfo, SchemaRegistry, analyze_unknown, decode_stream, make_report};

fn golden_dir(case: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("tests")
        .join("golden")
        .join(case)
}

fn load_expected(case: &str, file: &str) -> Value {
    let path = golden_dir(case).join(file);
    let json = fs::read_to_string(&path).expect("read expected report");
    serde_json::from_str(&json).expect("parse expected report")
}

fn read_input(case: &str) -> Vec<u8> {
    fs::read(golden_dir(case).join("input.syx")).expect("read input.syx")
}

fn run_decode_golden(case: &str) {
    let bytes = read_input(case);
    let registry = SchemaRegistry::with_builtin().expect("builtin schemas");
    let schema = registry.lookup("access_virus_c").expect("virus schema");
    let input = InputInfo {
        path: "input.syx".to_string(),
        bytes: bytes.len() as u64,
    };
    let actual = make_report(DecodeReport::new(input, schema, decode_stream(schema, &bytes)));

    let actual = serde_json::to_value(actual).expect("serialize actual");
    let expected = load_expected(case, "expected_decode.json");
    assert_eq!(actual, expected, "decode golden mismatch in {case}");
}

fn run_analysis_golden(case: &str) {
    let bytes = read_input(case);
    let actual = serde_json::to_value(make_report(analyze_unknown(&bytes))).expect("serialize actual");
    let expected = load_expected(case, "expected_analysis.json");
    assert_eq!(actual, expected, "analysis golden mismatch in {case}");
}

#[test]
fn golden_virus_bank_decode() {
    run_decode_golden("virus_bank");
}

#[test]
fn golden_virus_bank_analysis() {
    run_analysis_golden("virus_bank");
}

#[test]
fn golden_mixed_stream_decode() {
    run_decode_golden("mixed_stream");
}

#[test]
fn golden_mixed_stream_analysis() {
    run_analysis_golden("mixed_stream");
}

#[test]
fn golden_virus_bank_has_named_presets() {
    let expected = load_expected("virus_bank", "expected_decode.json");
    let names: Vec<&str> = expected["presets"]
        .as_array()
        .expect("presets")
        .iter()
        .filter_map(|preset| preset["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Wobble Bass", "Pad Strings"]);
    assert_eq!(expected["presets"][0]["parameters"]["filter_cutoff"]["raw"], 100);
}

#[test]
fn golden_mixed_stream_reports_foreign_message_and_tail() {
    let expected = load_expected("mixed_stream", "expected_decode.json");
    assert_eq!(expected["messages"], 2);
    assert_eq!(expected["truncated_messages"], 1);
    assert_eq!(expected["errors"][0]["kind"], "schema_mismatch");
}
