use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use sysex_core::{EncodeValue, SchemaModel, SchemaRegistry, encode};

const VIRUS_KEY: &str = "access_virus_c";
const ROLAND_DT1: &[u8] = &[0xF0, 0x41, 0x10, 0x42, 0x12, 0x40, 0x00, 0x7F, 0x00, 0x41, 0xF7];
const LEADING_NOISE: &[u8] = &[0x00, 0x13];
const INTER_MESSAGE_NOISE: &[u8] = &[0xFE];
const TRUNCATED_TAIL: &[u8] = &[0xF0, 0x00, 0x20, 0x33, 0x01];

fn main() -> Result<(), String> {
    let registry = SchemaRegistry::with_builtin().map_err(|err| err.to_string())?;
    let virus = registry.lookup(VIRUS_KEY).map_err(|err| err.to_string())?;
    let root = PathBuf::from("tests/golden");

    let wobble = virus_preset(
        virus,
        "Wobble Bass",
        &[
            ("filter_cutoff", 100),
            ("filter_resonance", 64),
            ("lfo1_rate", 90),
            ("amp_env_release", 127),
            ("osc1_shape", 32),
        ],
    )?;
    let pad = virus_preset(
        virus,
        "Pad Strings",
        &[
            ("filter_cutoff", 20),
            ("amp_env_attack", 110),
            ("chorus_rate", 45),
            ("delay_feedback", 127),
        ],
    )?;

    write_input(&root.join("virus_bank"), &[wobble.as_slice(), pad.as_slice()])?;
    write_input(
        &root.join("mixed_stream"),
        &[
            LEADING_NOISE,
            wobble.as_slice(),
            ROLAND_DT1,
            INTER_MESSAGE_NOISE,
            TRUNCATED_TAIL,
        ],
    )?;
    Ok(())
}

fn virus_preset(schema: &SchemaModel, name: &str, values: &[(&str, u32)]) -> Result<Vec<u8>, String> {
    let values: BTreeMap<String, EncodeValue> = values
        .iter()
        .map(|(parameter, raw)| (parameter.to_string(), EncodeValue::Raw(*raw)))
        .collect();
    encode(schema, &values, Some(name)).map_err(|err| format!("encode {name}: {err}"))
}

fn write_input(dir: &Path, parts: &[&[u8]]) -> Result<(), String> {
    fs::create_dir_all(dir).map_err(|err| format!("failed to create {}: {}", dir.display(), err))?;
    let path = dir.join("input.syx");
    fs::write(&path, parts.concat())
        .map_err(|err| format!("failed to write {}: {}", path.display(), err))
}
