//! Input sources for byte streams.
//!
//! All file access of the crate lives here. A source hands out the whole
//! stream at once; framing and decoding work on the returned bytes.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON preset error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("JSON preset has no \"sysex\" field")]
    MissingSysex,
    #[error("invalid hex in \"sysex\" field")]
    InvalidHex,
}

/// Something that can produce one byte stream.
pub trait InputSource {
    /// Identifier used in reports (usually the path).
    fn id(&self) -> String;
    fn read_bytes(&self) -> Result<Vec<u8>, SourceError>;
}

/// A file on disk.
///
/// `.json` files are read as presets carrying a hex `"sysex"` field; every
/// other file is read as raw bytes.
///
/// # Examples
/// ```no_run
/// use sysex_core::{FileSource, InputSource};
///
/// let source = FileSource::new("bank_a.syx");
/// let bytes = source.read_bytes()?;
/// println!("{}: {} bytes", source.id(), bytes.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_json(&self) -> bool {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    }
}

impl InputSource for FileSource {
    fn id(&self) -> String {
        self.path.display().to_string()
    }

    fn read_bytes(&self) -> Result<Vec<u8>, SourceError> {
        if self.is_json() {
            let text = fs::read_to_string(&self.path)?;
            return json_preset_bytes(&text);
        }
        Ok(fs::read(&self.path)?)
    }
}

/// Bytes already in memory.
#[derive(Debug, Clone)]
pub struct MemorySource {
    id: String,
    bytes: Vec<u8>,
}

impl MemorySource {
    pub fn new(id: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            bytes: bytes.into(),
        }
    }
}

impl InputSource for MemorySource {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn read_bytes(&self) -> Result<Vec<u8>, SourceError> {
        Ok(self.bytes.clone())
    }
}

#[derive(Deserialize)]
struct JsonPreset {
    #[serde(default)]
    sysex: Option<String>,
}

/// Extract the message bytes of a JSON preset (`{"sysex": "f0 00 20 ..."}`).
/// Other fields are ignored.
pub(crate) fn json_preset_bytes(text: &str) -> Result<Vec<u8>, SourceError> {
    let preset: JsonPreset = serde_json::from_str(text)?;
    let hex = preset
        .sysex
        .filter(|hex| !hex.trim().is_empty())
        .ok_or(SourceError::MissingSysex)?;
    crate::hex_text::parse_hex(&hex).ok_or(SourceError::InvalidHex)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{FileSource, InputSource, MemorySource, SourceError, json_preset_bytes};

    #[test]
    fn json_preset_hex_is_decoded() {
        let bytes = json_preset_bytes(r#"{"plugin": "Osirus", "sysex": "F0 00 20 33 F7"}"#).unwrap();
        assert_eq!(bytes, vec![0xF0, 0x00, 0x20, 0x33, 0xF7]);
    }

    #[test]
    fn json_preset_errors_are_specific() {
        assert!(matches!(json_preset_bytes("{}"), Err(SourceError::MissingSysex)));
        assert!(matches!(
            json_preset_bytes(r#"{"sysex": "  "}"#),
            Err(SourceError::MissingSysex)
        ));
        assert!(matches!(
            json_preset_bytes(r#"{"sysex": "f0 0"}"#),
            Err(SourceError::InvalidHex)
        ));
        assert!(matches!(json_preset_bytes("[1"), Err(SourceError::Json(_))));
    }

    #[test]
    fn file_source_reads_raw_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("bank.syx");
        fs::write(&raw, [0xF0, 0x41, 0xF7]).unwrap();
        let json = dir.path().join("preset.JSON");
        fs::write(&json, r#"{"sysex": "f07df7"}"#).unwrap();

        assert_eq!(FileSource::new(&raw).read_bytes().unwrap(), vec![0xF0, 0x41, 0xF7]);
        assert_eq!(FileSource::new(&json).read_bytes().unwrap(), vec![0xF0, 0x7D, 0xF7]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("absent.syx"));
        assert!(matches!(source.read_bytes(), Err(SourceError::Io(_))));
        assert!(source.id().ends_with("absent.syx"));
    }

    #[test]
    fn memory_source_returns_its_bytes() {
        let source = MemorySource::new("mem", [1, 2, 3]);
        assert_eq!(source.id(), "mem");
        assert_eq!(source.read_bytes().unwrap(), vec![1, 2, 3]);
    }
}
