use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use glob::glob;
use serde::Serialize;
use sysex_core::{
    BankPreset, BatchOptions, BatchStatus, DEFAULT_GENERATED_AT, DecodeReport, DeviceIdentifier,
    EncodeValue, FeatureMatrix, FileSource, InputInfo, InputSource, Report, SchemaModel,
    SchemaRegistry, SchemaSource, analyze_unknown, decode_stream, default_parameter_order, encode,
    encode_bank, frame, make_report, patch, run_batch, spaced_hex,
};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("SYSEX_BUILD_COMMIT"),
    ", ",
    env!("SYSEX_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "sysex")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Schema-driven decoder and encoder for MIDI System Exclusive dumps.",
    long_about = None,
    after_help = "Examples:\n  sysex decode bank.syx --device access_virus_c -o bank.json\n  sysex analyze unknown.syx --pretty\n  sysex batch presets/ --device access_virus_c --threads 4\n  sysex template \"My Synth\" -o schemas/my_synth.json"
)]
struct Cli {
    /// Directory of additional JSON schemas
    #[arg(long, global = true, env = "SYSEX_SCHEMA_DIR", value_name = "DIR")]
    schemas: Option<PathBuf>,

    /// Only log errors
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode every message of a dump into named parameters.
    #[command(
        after_help = "Without --device the schema is picked from the first message's identifier.\n\nExamples:\n  sysex decode bank.syx --device access_virus_c\n  sysex decode preset.json -o preset_report.json"
    )]
    Decode {
        /// Path to a .syx file or a JSON preset with a "sysex" field
        input: PathBuf,

        /// Schema key (see `sysex schemas`)
        #[arg(short, long)]
        device: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Build a message from parameter values.
    #[command(
        after_help = "BANK is a JSON array of presets: [{\"name\": \"Lead\", \"raw\": {\"filter_cutoff\": 90}, \"normalized\": {\"lfo1_rate\": 0.5}}, ...]\nUnnamed presets are called Preset_1, Preset_2, ...\n\nExamples:\n  sysex encode --device access_virus_c --set filter_cutoff=100 --name \"Wobble\" -o wobble.syx\n  sysex encode --device access_virus_c --base bank.syx --set-normalized lfo1_rate=0.5\n  sysex encode --device access_virus_c --bank presets.json -o bank.syx"
    )]
    Encode {
        /// Schema key (see `sysex schemas`)
        #[arg(short, long)]
        device: String,

        /// Raw parameter value
        #[arg(long = "set", value_name = "NAME=RAW")]
        set: Vec<String>,

        /// Normalized parameter value in [0, 1]
        #[arg(long = "set-normalized", value_name = "NAME=VALUE")]
        set_normalized: Vec<String>,

        /// Preset name to write
        #[arg(long)]
        name: Option<String>,

        /// Patch the first matching message of this file instead of starting empty
        #[arg(long, value_name = "FILE")]
        base: Option<PathBuf>,

        /// Encode every preset of a JSON bank file into one dump
        #[arg(
            long,
            value_name = "BANK",
            conflicts_with_all = ["set", "set_normalized", "name", "base"]
        )]
        bank: Option<PathBuf>,

        /// Output .syx path; hex on stdout when omitted
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
    /// Describe an unknown dump without a schema.
    #[command(alias = "analyse")]
    Analyze {
        /// Path to a .syx file or a JSON preset with a "sysex" field
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Decode many files with one schema.
    #[command(
        after_help = "INPUT may be a directory (all .syx and .json files), a glob pattern or a single file.\n\nExit codes: 0 success, 1 partial success, 2 failure."
    )]
    Batch {
        /// Directory, glob pattern or file
        input: PathBuf,

        /// Schema key (see `sysex schemas`)
        #[arg(short, long)]
        device: String,

        /// Worker threads (0 = one per core)
        #[arg(long, default_value_t = 0)]
        threads: usize,

        /// Process only the first N inputs
        #[arg(long, value_name = "N")]
        limit: Option<usize>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Export normalized parameters as a feature matrix.
    Features {
        /// Path to a .syx file or a JSON preset with a "sysex" field
        input: PathBuf,

        /// Schema key (see `sysex schemas`)
        #[arg(short, long)]
        device: String,

        /// Keep only these categories (repeatable)
        #[arg(long = "category", value_name = "NAME")]
        categories: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// List registered schemas.
    Schemas {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Write a starter schema file for a new device.
    #[command(
        after_help = "Edit the identifier and parameters, then load the file with --schemas <DIR>.\n\nExamples:\n  sysex template \"My Synth\" -o schemas/my_synth.json"
    )]
    Template {
        /// Device name (the registry key is derived from it)
        name: String,

        /// Output .json path; stdout when omitted
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output report path (JSON); stdout when omitted
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

/// How a command ended, mapped to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Success,
    Partial,
    Failed,
}

impl Outcome {
    fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Partial => ExitCode::from(1),
            Outcome::Failed => ExitCode::from(2),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    let ctx = Session {
        schemas: cli.schemas,
        quiet: cli.quiet,
    };
    let result = match cli.command {
        Commands::Decode {
            input,
            device,
            output,
        } => cmd_decode(&ctx, &input, device.as_deref(), &output),
        Commands::Encode {
            device,
            set,
            set_normalized,
            name,
            base,
            bank,
            output,
        } => match bank {
            Some(bank) => cmd_encode_bank(&ctx, &device, &bank, output.as_deref()),
            None => cmd_encode(
                &ctx,
                &device,
                &set,
                &set_normalized,
                name.as_deref(),
                base.as_deref(),
                output.as_deref(),
            ),
        },
        Commands::Analyze { input, output } => cmd_analyze(&ctx, &input, &output),
        Commands::Batch {
            input,
            device,
            threads,
            limit,
            output,
        } => cmd_batch(&ctx, &input, &device, BatchOptions { threads, limit }, &output),
        Commands::Features {
            input,
            device,
            categories,
            output,
        } => cmd_features(&ctx, &input, &device, &categories, &output),
        Commands::Schemas { output } => cmd_schemas(&ctx, &output),
        Commands::Template { name, output } => cmd_template(&ctx, &name, output.as_deref()),
    };

    match result {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            Outcome::Failed.exit_code()
        }
    }
}

fn init_tracing(quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Options shared by every command.
struct Session {
    schemas: Option<PathBuf>,
    quiet: bool,
}

impl Session {
    fn registry(&self) -> Result<&'static SchemaRegistry, CliError> {
        let mut registry =
            SchemaRegistry::with_builtin().context("bundled schemas failed to load")?;
        if let Some(dir) = self.schemas.as_deref() {
            let report = registry.load_dir(dir).map_err(|err| {
                CliError::new(
                    err.to_string(),
                    Some("check --schemas or SYSEX_SCHEMA_DIR".to_string()),
                )
            })?;
            tracing::debug!(
                loaded = report.loaded.len(),
                failed = report.failures.len(),
                dir = %dir.display(),
                "schema directory loaded"
            );
        }
        sysex_core::install(registry).map_err(|err| CliError::new(err.to_string(), None))
    }

    fn schema<'r>(&self, registry: &'r SchemaRegistry, key: &str) -> Result<&'r SchemaModel, CliError> {
        registry.lookup(key).map_err(|err| {
            let known = registry.keys().collect::<Vec<_>>().join(", ");
            CliError::new(
                err.to_string(),
                Some(format!("known devices: {known}; add schemas with --schemas <DIR>")),
            )
        })
    }

    fn note(&self, message: impl AsRef<str>) {
        if !self.quiet {
            eprintln!("{}", message.as_ref());
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

fn cmd_decode(
    ctx: &Session,
    input: &Path,
    device: Option<&str>,
    output: &OutputArgs,
) -> Result<Outcome, CliError> {
    let registry = ctx.registry()?;
    let bytes = read_input(input)?;
    let schema = match device {
        Some(key) => ctx.schema(registry, key)?,
        None => identify(registry, &bytes).ok_or_else(|| {
            CliError::new(
                format!("no registered schema matches {}", input.display()),
                Some(format!(
                    "pass --device, or run `sysex analyze {}` to inspect the dump",
                    input.display()
                )),
            )
        })?,
    };

    let stream = decode_stream(schema, &bytes);
    let (decoded, failed) = (stream.presets.len(), stream.errors.len());
    let report = DecodeReport::new(input_info(input, &bytes), schema, stream);
    emit(ctx, &stamp(make_report(report)), output)?;

    if decoded == 0 {
        return Err(CliError::new(
            format!("no message decoded from {}", input.display()),
            Some(format!("run `sysex analyze {}` to inspect the dump", input.display())),
        ));
    }
    if failed > 0 {
        ctx.note(format!("partial: {decoded} decoded, {failed} skipped"));
        return Ok(Outcome::Partial);
    }
    Ok(Outcome::Success)
}

/// Schema of the first message whose identifier is registered.
fn identify<'r>(registry: &'r SchemaRegistry, bytes: &[u8]) -> Option<&'r SchemaModel> {
    frame(bytes, Default::default()).find_map(|message| registry.identify(message.body()))
}

fn cmd_encode(
    ctx: &Session,
    device: &str,
    set: &[String],
    set_normalized: &[String],
    name: Option<&str>,
    base: Option<&Path>,
    output: Option<&Path>,
) -> Result<Outcome, CliError> {
    let registry = ctx.registry()?;
    let schema = ctx.schema(registry, device)?;

    let mut values = std::collections::BTreeMap::new();
    for text in set {
        let (parameter, value) = parse_assignment(text)?;
        let raw = value.parse::<u32>().map_err(|_| {
            CliError::new(
                format!("invalid raw value in '{text}'"),
                Some("raw values are unsigned integers; use --set-normalized for [0, 1]".to_string()),
            )
        })?;
        values.insert(parameter.to_string(), EncodeValue::Raw(raw));
    }
    for text in set_normalized {
        let (parameter, value) = parse_assignment(text)?;
        let normalized = value.parse::<f64>().map_err(|_| {
            CliError::new(
                format!("invalid normalized value in '{text}'"),
                Some("normalized values are decimals in [0, 1]".to_string()),
            )
        })?;
        values.insert(parameter.to_string(), EncodeValue::Normalized(normalized));
    }

    let bytes = match base {
        Some(path) => {
            let base_bytes = read_input(path)?;
            let message = frame(&base_bytes, schema.markers())
                .find(|message| schema.identifier().is_prefix_of(message.body()))
                .ok_or_else(|| {
                    CliError::new(
                        format!("no {} message in {}", schema.name(), path.display()),
                        Some(format!("expected identifier {}", schema.identifier())),
                    )
                })?;
            patch(schema, &message, &values, name)
        }
        None => encode(schema, &values, name),
    }
    .map_err(|err| {
        CliError::new(
            err.to_string(),
            Some(format!("list parameters with `sysex schemas --pretty` ({})", schema.key())),
        )
    })?;

    emit_message(ctx, &bytes, output)?;
    Ok(Outcome::Success)
}

fn cmd_encode_bank(
    ctx: &Session,
    device: &str,
    bank: &Path,
    output: Option<&Path>,
) -> Result<Outcome, CliError> {
    let registry = ctx.registry()?;
    let schema = ctx.schema(registry, device)?;

    let text = fs::read_to_string(bank)
        .with_context(|| format!("failed to read bank {}", bank.display()))?;
    let presets: Vec<BankPreset> = serde_json::from_str(&text).map_err(|err| {
        CliError::new(
            format!("invalid bank file {}: {err}", bank.display()),
            Some("expected a JSON array of {\"name\", \"raw\", \"normalized\"} objects".to_string()),
        )
    })?;
    if presets.is_empty() {
        return Err(CliError::new(
            format!("bank file {} has no presets", bank.display()),
            None,
        ));
    }

    let bytes = encode_bank(schema, &presets).map_err(|err| {
        CliError::new(
            err.to_string(),
            Some(format!("list parameters with `sysex schemas --pretty` ({})", schema.key())),
        )
    })?;
    ctx.note(format!("{} presets encoded", presets.len()));
    emit_message(ctx, &bytes, output)?;
    Ok(Outcome::Success)
}

/// Raw bytes to a file, or spaced hex on stdout.
fn emit_message(ctx: &Session, bytes: &[u8], output: Option<&Path>) -> Result<(), CliError> {
    match output {
        Some(path) => {
            write_file(path, bytes)?;
            ctx.note(format!("OK: {} bytes written -> {}", bytes.len(), path.display()));
        }
        None => println!("{}", spaced_hex(bytes)),
    }
    Ok(())
}

fn parse_assignment(text: &str) -> Result<(&str, &str), CliError> {
    text.split_once('=')
        .map(|(name, value)| (name.trim(), value.trim()))
        .filter(|(name, value)| !name.is_empty() && !value.is_empty())
        .ok_or_else(|| {
            CliError::new(
                format!("invalid assignment '{text}'"),
                Some("use NAME=VALUE".to_string()),
            )
        })
}

fn cmd_analyze(ctx: &Session, input: &Path, output: &OutputArgs) -> Result<Outcome, CliError> {
    let bytes = read_input(input)?;
    let report = analyze_unknown(&bytes);
    let empty = report.messages.is_empty();
    emit(ctx, &stamp(make_report(report)), output)?;
    if empty {
        ctx.note(format!("no messages found in {}", input.display()));
    }
    Ok(Outcome::Success)
}

fn cmd_batch(
    ctx: &Session,
    input: &Path,
    device: &str,
    options: BatchOptions,
    output: &OutputArgs,
) -> Result<Outcome, CliError> {
    let registry = ctx.registry()?;
    let schema = ctx.schema(registry, device)?;
    let inputs: Vec<FileSource> = resolve_batch_inputs(input)?
        .into_iter()
        .map(FileSource::new)
        .collect();

    let report = run_batch(&inputs, schema, &options);
    let status = report.status;
    ctx.note(format!(
        "{} processed, {} failed, {} presets",
        report.processed_count, report.failed_count, report.total_presets
    ));
    emit(ctx, &stamp(make_report(report)), output)?;

    Ok(match status {
        BatchStatus::Success => Outcome::Success,
        BatchStatus::Partial => Outcome::Partial,
        BatchStatus::Failed => Outcome::Failed,
    })
}

fn cmd_features(
    ctx: &Session,
    input: &Path,
    device: &str,
    categories: &[String],
    output: &OutputArgs,
) -> Result<Outcome, CliError> {
    let registry = ctx.registry()?;
    let schema = ctx.schema(registry, device)?;
    let bytes = read_input(input)?;
    let filter: Vec<&str> = categories.iter().map(String::as_str).collect();

    let stream = decode_stream(schema, &bytes);
    let order = default_parameter_order(schema, &filter);
    let matrix = FeatureMatrix::from_presets(&stream.presets, &filter, order);
    emit(ctx, &stamp(make_report(matrix)), output)?;

    Ok(if stream.presets.is_empty() {
        Outcome::Failed
    } else if stream.errors.is_empty() {
        Outcome::Success
    } else {
        Outcome::Partial
    })
}

#[derive(Debug, Serialize)]
struct SchemaSummary {
    key: String,
    name: String,
    version: String,
    identifier: DeviceIdentifier,
    total_length: usize,
    parameters: Vec<ParameterSummary>,
}

/// `range` is the usable range; `declared_max` is the maximum as written in
/// the schema file, larger when the field cannot hold it.
#[derive(Debug, Serialize)]
struct ParameterSummary {
    name: String,
    byte_offset: usize,
    range: [u32; 2],
    declared_max: u32,
    category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    controller: Option<u8>,
    #[serde(skip_serializing_if = "String::is_empty")]
    description: String,
}

impl ParameterSummary {
    fn of(schema: &SchemaModel, name: &str) -> Option<Self> {
        let parameter = schema.parameter(name)?;
        let (min, max) = parameter.range();
        Some(Self {
            name: name.to_string(),
            byte_offset: parameter.byte_offset(),
            range: [min, max],
            declared_max: parameter.declared_max(),
            category: parameter.category().to_string(),
            controller: parameter.controller(),
            description: parameter.description().to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
struct SchemaList {
    schemas: Vec<SchemaSummary>,
}

fn cmd_schemas(ctx: &Session, output: &OutputArgs) -> Result<Outcome, CliError> {
    let registry = ctx.registry()?;
    let schemas = registry
        .iter()
        .map(|schema| SchemaSummary {
            key: schema.key().to_string(),
            name: schema.name().to_string(),
            version: schema.version().to_string(),
            identifier: schema.identifier().clone(),
            total_length: schema.total_length(),
            parameters: default_parameter_order(schema, &[])
                .iter()
                .filter_map(|name| ParameterSummary::of(schema, name))
                .collect(),
        })
        .collect();
    emit(ctx, &stamp(make_report(SchemaList { schemas })), output)?;
    Ok(Outcome::Success)
}

fn cmd_template(ctx: &Session, name: &str, output: Option<&Path>) -> Result<Outcome, CliError> {
    let template = SchemaSource::template(name);
    let key = template
        .clone()
        .build()
        .map_err(|err| {
            CliError::new(
                err.to_string(),
                Some("pass a non-empty device name".to_string()),
            )
        })?
        .key()
        .to_string();
    let json = serde_json::to_string_pretty(&template).context("JSON serialization failed")?;

    match output {
        Some(path) => {
            write_file(path, format!("{json}\n").as_bytes())?;
            ctx.note(format!("OK: template for '{key}' written -> {}", path.display()));
        }
        None => println!("{json}"),
    }
    Ok(Outcome::Success)
}

fn stamp<T>(mut report: Report<T>) -> Report<T> {
    report.generated_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| DEFAULT_GENERATED_AT.to_string());
    report
}

fn input_info(path: &Path, bytes: &[u8]) -> InputInfo {
    InputInfo {
        path: path.display().to_string(),
        bytes: bytes.len() as u64,
    }
}

fn read_input(input: &Path) -> Result<Vec<u8>, CliError> {
    let resolved = resolve_input_path(input)?;
    if !resolved.is_file() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .syx file or a JSON preset".to_string()),
        ));
    }
    FileSource::new(&resolved)
        .read_bytes()
        .with_context(|| format!("failed to read {}", resolved.display()))
        .map_err(Into::into)
}

fn emit<T: Serialize>(ctx: &Session, report: &T, output: &OutputArgs) -> Result<(), CliError> {
    let json = if output.pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    }
    .context("JSON serialization failed")?;

    match output.output.as_deref() {
        Some(path) => {
            write_file(path, json.as_bytes())?;
            ctx.note(format!("OK: report written -> {}", path.display()));
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Inputs of a batch run: every `.syx`/`.json` file of a directory, the
/// matches of a glob pattern, or a single file. Sorted.
fn resolve_batch_inputs(input: &Path) -> Result<Vec<PathBuf>, CliError> {
    let mut paths = if input.is_dir() {
        let mut paths = Vec::new();
        for extension in ["syx", "json"] {
            let pattern = input.join(format!("*.{extension}"));
            paths.extend(glob_files(&pattern.to_string_lossy())?);
        }
        paths
    } else if is_glob_pattern(&input.to_string_lossy()) {
        glob_files(&input.to_string_lossy())?
    } else if input.is_file() {
        vec![input.to_path_buf()]
    } else {
        return Err(CliError::new(
            format!("input not found: {}", input.display()),
            Some("pass a directory, a glob pattern or a file".to_string()),
        ));
    };
    paths.sort();
    paths.dedup();

    if paths.is_empty() {
        return Err(CliError::new(
            format!("no input files in '{}'", input.display()),
            Some("expected .syx or .json files".to_string()),
        ));
    }
    Ok(paths)
}

fn glob_files(pattern: &str) -> Result<Vec<PathBuf>, CliError> {
    let entries = glob(pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    let mut matches = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }
    Ok(matches)
}

/// A single-file argument may be a pattern that matches exactly one file.
fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = glob_files(&pattern)?;
    match matches.len() {
        0 => Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        )),
        1 => Ok(matches.remove(0)),
        count => {
            let listed = matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let more = if count > 3 { ", ..." } else { "" };
            Err(CliError::new(
                format!(
                    "multiple files match pattern '{}' ({} matches); matches: {}{}",
                    pattern, count, listed, more
                ),
                Some("pass a single file, or use `sysex batch`".to_string()),
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
