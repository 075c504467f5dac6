//! Batch decoding of many inputs against one schema.
//!
//! Inputs are independent, so each one is read, framed and decoded on the
//! rayon pool. Entries are collected in input order; no input can abort the
//! run.

use rayon::prelude::*;

use crate::codec::decode_stream;
use crate::schema::SchemaModel;
use crate::source::InputSource;
use crate::{BatchEntry, BatchReport, BatchStatus, EntryStatus};

/// Run configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOptions {
    /// Worker threads; 0 uses the global rayon pool.
    pub threads: usize,
    /// Process only the first `limit` inputs.
    pub limit: Option<usize>,
}

/// Decode every input with `schema`.
///
/// Read failures and per-message decode failures are recorded in the
/// entries. An input fails when it cannot be read, or when it holds messages
/// and none of them decoded; an input without messages is processed with no
/// presets.
///
/// # Examples
/// ```
/// use sysex_core::{
///     BatchOptions, BatchStatus, MemorySource, ParameterSource, SchemaSource, run_batch,
/// };
///
/// let schema = SchemaSource::new("Mini", [0x7D], 2)
///     .parameter("level", ParameterSource::at(1))
///     .build()?;
/// let inputs = [
///     MemorySource::new("a.syx", [0xF0, 0x7D, 0x10, 0xF7]),
///     MemorySource::new("b.syx", []),
/// ];
/// let report = run_batch(&inputs, &schema, &BatchOptions::default());
/// assert_eq!(report.processed_count, 2);
/// assert_eq!(report.total_presets, 1);
/// assert_eq!(report.status, BatchStatus::Success);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn run_batch<S>(inputs: &[S], schema: &SchemaModel, options: &BatchOptions) -> BatchReport
where
    S: InputSource + Sync,
{
    let inputs = match options.limit {
        Some(limit) if limit < inputs.len() => {
            tracing::debug!(limit, total = inputs.len(), "batch limited");
            &inputs[..limit]
        }
        _ => inputs,
    };

    let run = || -> Vec<BatchEntry> {
        inputs
            .par_iter()
            .map(|input| process_input(input, schema))
            .collect()
    };
    let entries = match build_pool(options.threads) {
        Some(pool) => pool.install(run),
        None => run(),
    };
    summarize(entries)
}

fn build_pool(threads: usize) -> Option<rayon::ThreadPool> {
    if threads == 0 {
        return None;
    }
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => Some(pool),
        Err(err) => {
            tracing::warn!(threads, error = %err, "thread pool unavailable, using global pool");
            None
        }
    }
}

fn process_input<S: InputSource>(input: &S, schema: &SchemaModel) -> BatchEntry {
    let source = input.id();
    let bytes = match input.read_bytes() {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(%source, error = %err, "input unreadable");
            return BatchEntry {
                source,
                status: EntryStatus::Failed,
                messages: 0,
                truncated_messages: 0,
                presets: Vec::new(),
                errors: Vec::new(),
                read_error: Some(err.to_string()),
            };
        }
    };

    let stream = decode_stream(schema, &bytes);
    let status = if stream.messages > 0 && stream.presets.is_empty() {
        tracing::warn!(%source, messages = stream.messages, "no message decoded");
        EntryStatus::Failed
    } else {
        EntryStatus::Processed
    };
    BatchEntry {
        source,
        status,
        messages: stream.messages,
        truncated_messages: stream.truncated,
        presets: stream.presets,
        errors: stream.errors,
        read_error: None,
    }
}

fn summarize(entries: Vec<BatchEntry>) -> BatchReport {
    let failed_count = entries
        .iter()
        .filter(|entry| entry.status == EntryStatus::Failed)
        .count();
    let processed_count = entries.len() - failed_count;
    let total_presets = entries.iter().map(|entry| entry.presets.len()).sum();
    let total_parameters = entries
        .iter()
        .flat_map(|entry| &entry.presets)
        .map(|preset| preset.parameters.len())
        .sum();
    let skipped_messages = entries.iter().map(|entry| entry.errors.len()).sum();
    let framing_warnings = entries.iter().map(|entry| entry.truncated_messages).sum();

    let status = if processed_count == 0 {
        BatchStatus::Failed
    } else if failed_count == 0 && skipped_messages == 0 {
        BatchStatus::Success
    } else {
        BatchStatus::Partial
    };

    BatchReport {
        entries,
        processed_count,
        failed_count,
        total_presets,
        total_parameters,
        skipped_messages,
        framing_warnings,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::{BatchOptions, run_batch};
    use crate::schema::{ParameterSource, SchemaModel, SchemaSource};
    use crate::source::{FileSource, MemorySource};
    use crate::{BatchStatus, EntryStatus};

    fn schema() -> SchemaModel {
        SchemaSource::new("Batch", [0x7D, 0x01], 4)
            .parameter("a", ParameterSource::at(2))
            .parameter("b", ParameterSource::at(3))
            .build()
            .unwrap()
    }

    fn preset(a: u8, b: u8) -> Vec<u8> {
        vec![0xF0, 0x7D, 0x01, a, b, 0xF7]
    }

    #[test]
    fn empty_input_is_kept_in_order() {
        let inputs: Vec<MemorySource> = (1..=5)
            .map(|i| {
                let bytes = if i == 3 { Vec::new() } else { preset(i, i) };
                MemorySource::new(format!("file{i}.syx"), bytes)
            })
            .collect();
        let report = run_batch(&inputs, &schema(), &BatchOptions::default());

        assert_eq!(report.entries.len(), 5);
        assert_eq!(report.processed_count, 5);
        assert_eq!(report.failed_count, 0);
        assert_eq!(report.total_presets, 4);
        assert_eq!(report.total_parameters, 8);
        let sources: Vec<_> = report.entries.iter().map(|e| e.source.as_str()).collect();
        assert_eq!(
            sources,
            vec!["file1.syx", "file2.syx", "file3.syx", "file4.syx", "file5.syx"]
        );
        assert!(report.entries[2].presets.is_empty());
        assert_eq!(report.status, BatchStatus::Success);
    }

    #[test]
    fn message_failures_are_attached_to_their_input() {
        let mut mixed = preset(1, 2);
        mixed.extend([0xF0, 0x7D, 0x01, 0x05, 0xF7]);
        mixed.extend(preset(3, 4));
        let inputs = [
            MemorySource::new("mixed", mixed),
            MemorySource::new("foreign", [0xF0, 0x41, 0x10, 0x00, 0x00, 0xF7]),
        ];
        let report = run_batch(&inputs, &schema(), &BatchOptions::default());

        let mixed = &report.entries[0];
        assert_eq!(mixed.status, EntryStatus::Processed);
        assert_eq!(mixed.presets.len(), 2);
        assert_eq!(mixed.errors.len(), 1);
        assert_eq!(mixed.errors[0].kind, "truncated_message");
        assert_eq!(mixed.errors[0].offset, 6);

        let foreign = &report.entries[1];
        assert_eq!(foreign.status, EntryStatus::Failed);
        assert_eq!(foreign.errors[0].kind, "schema_mismatch");

        assert_eq!(report.processed_count + report.failed_count, 2);
        assert_eq!(report.skipped_messages, 2);
        assert_eq!(report.status, BatchStatus::Partial);
    }

    #[test]
    fn unreadable_input_fails_alone() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("present.syx");
        std::fs::write(&present, preset(9, 9)).unwrap();
        let inputs = [
            FileSource::new(dir.path().join("missing.syx")),
            FileSource::new(&present),
        ];
        let report = run_batch(&inputs, &schema(), &BatchOptions::default());
        assert_eq!(report.entries[0].status, EntryStatus::Failed);
        assert!(report.entries[0].read_error.is_some());
        assert_eq!(report.entries[1].status, EntryStatus::Processed);
        assert_eq!(report.failed_count, 1);
        assert_eq!(report.status, BatchStatus::Partial);
    }

    #[test]
    fn limit_processes_a_prefix_with_consistent_totals() {
        let inputs: Vec<MemorySource> = (0..10)
            .map(|i| MemorySource::new(format!("{i}"), preset(i, 0)))
            .collect();
        let options = BatchOptions {
            threads: 2,
            limit: Some(3),
        };
        let report = run_batch(&inputs, &schema(), &options);
        assert_eq!(report.entries.len(), 3);
        assert_eq!(report.processed_count + report.failed_count, 3);
        assert_eq!(report.total_presets, 3);
        assert_eq!(report.entries[2].source, "2");
    }

    #[test]
    fn truncated_tails_are_counted() {
        let mut bytes = preset(1, 1);
        bytes.extend([0xF0, 0x7D]);
        let inputs = [MemorySource::new("tail", bytes)];
        let report = run_batch(&inputs, &schema(), &BatchOptions::default());
        assert_eq!(report.framing_warnings, 1);
        assert_eq!(report.entries[0].truncated_messages, 1);
        assert_eq!(report.status, BatchStatus::Success);
    }

    #[test]
    fn no_inputs_is_a_failed_run() {
        let inputs: [MemorySource; 0] = [];
        let report = run_batch(&inputs, &schema(), &BatchOptions::default());
        assert!(report.entries.is_empty());
        assert_eq!(report.status, BatchStatus::Failed);
    }
}
