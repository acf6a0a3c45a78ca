//! FASTA/FASTQ sequence provider
//!
//! Loads the first `limit` records of a file, in file order, using needletail.
//!
//! Residue data must not contain the gap byte `-`, which the aligners emit for
//! indel columns. Gap bytes in a record are dropped on load.

use needletail::errors::ParseErrorKind;
use needletail::parser::SequenceRecord;
use needletail::{parse_fastx_file, parse_fastx_reader, FastxReader};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{AlignError, AlignResult};
use crate::matrix::SequenceProvider;
use crate::types::{Sequence, GAP};

/// Sequences read from a FASTA/FASTQ source. Fixed once loaded.
#[derive(Debug, Clone, Default)]
pub struct FastaProvider {
    sequences: Vec<Sequence>,
}

impl FastaProvider {
    /// Read up to `limit` records from `path`. `None` reads every record.
    pub fn from_path<P: AsRef<Path>>(path: P, limit: Option<usize>) -> AlignResult<Self> {
        let path = path.as_ref();
        let metadata = File::open(path)?.metadata()?;
        if metadata.len() == 0 {
            return Err(AlignError::EmptyInput(format!(
                "FASTA file is empty: {}",
                path.display()
            )));
        }

        let reader = parse_fastx_file(path).map_err(|e| AlignError::Parse(e.to_string()))?;
        let provider = Self::collect(reader, limit, &path.display().to_string())?;
        log::info!(
            "Loaded {} sequences from {}",
            provider.sequences.len(),
            path.display()
        );
        Ok(provider)
    }

    /// Read up to `limit` records from any byte source.
    pub fn from_reader<R: Read + Send>(reader: R, limit: Option<usize>) -> AlignResult<Self> {
        let reader = parse_fastx_reader(reader).map_err(|e| match e.kind {
            ParseErrorKind::EmptyFile => AlignError::EmptyInput("no sequence data".to_string()),
            _ => AlignError::Parse(e.to_string()),
        })?;
        Self::collect(reader, limit, "reader")
    }

    fn collect(
        mut reader: Box<dyn FastxReader + '_>,
        limit: Option<usize>,
        source: &str,
    ) -> AlignResult<Self> {
        let limit = limit.unwrap_or(usize::MAX);
        let mut sequences = Vec::new();

        while sequences.len() < limit {
            let Some(record) = reader.next() else {
                break;
            };
            let record = record.map_err(|e| AlignError::Parse(e.to_string()))?;
            sequences.push(record_to_sequence(&record));
        }

        if sequences.is_empty() && limit > 0 {
            return Err(AlignError::EmptyInput(format!("no sequences found in {}", source)));
        }
        Ok(Self { sequences })
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

/// Split the header into id and description at the first whitespace.
fn record_to_sequence(record: &SequenceRecord) -> Sequence {
    let header = String::from_utf8_lossy(record.id());
    let mut parts = header.splitn(2, char::is_whitespace);
    let id = parts.next().unwrap_or_default().to_string();
    let description = parts
        .next()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    let raw = record.seq();
    let data: Vec<u8> = raw.iter().copied().filter(|&b| b != GAP).collect();
    if data.len() != raw.len() {
        log::warn!(
            "Dropped {} gap characters from record {}",
            raw.len() - data.len(),
            id
        );
    }

    let sequence = Sequence::new(id, data);
    match description {
        Some(description) => sequence.with_description(description),
        None => sequence,
    }
}

impl SequenceProvider for FastaProvider {
    fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }
}
