use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde::Serialize;
use sysex_core::{DecodeReport, InputInfo, SchemaRegistry, analyze_unknown, decode_stream, make_report};

const GOLDEN_SCHEMA: &str = "access_virus_c";

fn main() -> ExitCode {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> Result<(), String> {
    let registry = SchemaRegistry::with_builtin().map_err(|err| err.to_string())?;
    let root = PathBuf::from("tests").join("golden");
    let entries =
        fs::read_dir(&root).map_err(|err| format!("failed to read {}: {}", root.display(), err))?;

    for entry in entries {
        let entry = entry.map_err(|err| format!("failed to read entry: {}", err))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let input = path.join("input.syx");
        if !input.exists() {
            continue;
        }
        regenerate_one(&registry, &input, &path)?;
    }

    Ok(())
}

fn regenerate_one(registry: &SchemaRegistry, input: &Path, dir: &Path) -> Result<(), String> {
    let bytes =
        fs::read(input).map_err(|err| format!("failed to read {}: {}", input.display(), err))?;
    let schema = registry.lookup(GOLDEN_SCHEMA).map_err(|err| err.to_string())?;

    let info = InputInfo {
        path: "input.syx".to_string(),
        bytes: bytes.len() as u64,
    };
    let decoded = make_report(DecodeReport::new(info, schema, decode_stream(schema, &bytes)));
    write_json(&dir.join("expected_decode.json"), &decoded)?;
    write_json(&dir.join("expected_analysis.json"), &make_report(analyze_unknown(&bytes)))
}

fn write_json<T: Serialize>(output: &Path, value: &T) -> Result<(), String> {
    let mut json = serde_json::to_string_pretty(value)
        .map_err(|err| format!("JSON serialization failed: {}", err))?;
    json.push('\n');
    fs::write(output, json).map_err(|err| format!("failed to write {}: {}", output.display(), err))
}
