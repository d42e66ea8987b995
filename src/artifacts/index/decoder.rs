//! Streaming decoder for index files
//!
//! Decoding is a single forward pass over a byte source:
//!
//! ```text
//! IndexDecoder --read_header()--> IndexEntries --next()...--> exhausted
//! ```
//!
//! The header is validated before an [`IndexEntries`] value exists, so there
//! is no way to pull entries out of an index with a bad signature or version.
//! Entries come out in stream order and the iterator stops after exactly as
//! many entries as the header announced. Any error ends the stream.

use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::index::index_header::IndexHeader;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

/// Fatal problems with an index file; none of them leave a usable decoder behind
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("not a git index file (signature {0:?})")]
    BadSignature(String),

    #[error("unsupported index version: {0}")]
    UnsupportedVersion(u32),

    #[error("index header is truncated")]
    TruncatedHeader,

    #[error("index entry {entry} is truncated")]
    Truncated { entry: u32 },

    #[error("padding of index entry {entry} contains a non-NUL byte at offset {offset}")]
    CorruptPadding { entry: u32, offset: usize },

    #[error("failed to read index: {0}")]
    Io(#[source] std::io::Error),
}

impl IndexError {
    pub(crate) fn header(err: std::io::Error) -> Self {
        match err.kind() {
            ErrorKind::UnexpectedEof => IndexError::TruncatedHeader,
            _ => IndexError::Io(err),
        }
    }

    pub(crate) fn entry(entry: u32, err: std::io::Error) -> Self {
        match err.kind() {
            ErrorKind::UnexpectedEof => IndexError::Truncated { entry },
            _ => IndexError::Io(err),
        }
    }
}

/// Decoder waiting for its header
#[derive(Debug)]
pub struct IndexDecoder<R> {
    reader: R,
}

impl IndexDecoder<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, IndexError> {
        let file = File::open(path).map_err(IndexError::Io)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> IndexDecoder<R> {
    pub fn new(reader: R) -> Self {
        IndexDecoder { reader }
    }

    /// Validate the header and hand over the entry stream
    pub fn read_header(mut self) -> Result<IndexEntries<R>, IndexError> {
        let header = IndexHeader::read_from(&mut self.reader)?;

        Ok(IndexEntries {
            reader: self.reader,
            state: EntriesState::Reading {
                remaining: header.entries_count,
            },
            header,
            decoded: 0,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntriesState {
    Reading { remaining: u32 },
    Done,
}

/// Entries of an index whose header has been validated
#[derive(Debug)]
pub struct IndexEntries<R> {
    reader: R,
    header: IndexHeader,
    state: EntriesState,
    decoded: u32,
}

impl<R: BufRead> IndexEntries<R> {
    pub fn header(&self) -> &IndexHeader {
        &self.header
    }

    /// Entries still expected according to the header
    pub fn remaining(&self) -> u32 {
        match self.state {
            EntriesState::Reading { remaining } => remaining,
            EntriesState::Done => 0,
        }
    }

    pub fn is_done(&self) -> bool {
        self.state == EntriesState::Done
    }
}

impl<R: BufRead> Iterator for IndexEntries<R> {
    type Item = Result<IndexEntry, IndexError>;

    fn next(&mut self) -> Option<Self::Item> {
        let remaining = match self.state {
            EntriesState::Reading { remaining: 0 } | EntriesState::Done => {
                self.state = EntriesState::Done;
                return None;
            }
            EntriesState::Reading { remaining } => remaining,
        };

        match IndexEntry::read_from(&mut self.reader, self.header.version, self.decoded + 1) {
            Ok(entry) => {
                self.decoded += 1;
                self.state = match remaining - 1 {
                    0 => EntriesState::Done,
                    remaining => EntriesState::Reading { remaining },
                };
                Some(Ok(entry))
            }
            Err(err) => {
                self.state = EntriesState::Done;
                Some(Err(err))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining() as usize))
    }
}

impl<R: BufRead> std::iter::FusedIterator for IndexEntries<R> {}
