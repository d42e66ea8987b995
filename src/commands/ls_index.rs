use crate::areas::dumper::Dumper;
use crate::artifacts::index::decoder::IndexDecoder;
use crate::artifacts::index::index_entry::{IndexEntry, Timestamp};
use anyhow::Context;
use std::io::Write;
use std::path::Path;

impl Dumper {
    /// List the entries of a local index file, `git ls-files --stage` style.
    ///
    /// With `verbose`, the header and every stat field of each entry follow.
    pub fn ls_index(&mut self, index_path: &Path, verbose: bool) -> anyhow::Result<()> {
        let entries = IndexDecoder::open(index_path)
            .and_then(|decoder| decoder.read_header())
            .with_context(|| format!("Unable to read index file {}", index_path.display()))?;

        if verbose {
            let header = entries.header();
            writeln!(
                self.writer(),
                "{} version {}, {} entries",
                header.marker,
                header.version,
                header.entries_count
            )?;
        }

        for entry in entries {
            let entry = entry.context("Invalid index file")?;
            writeln!(
                self.writer(),
                "{} {} {}\t{}",
                entry.metadata.mode,
                entry.oid,
                entry.stage(),
                entry.name
            )?;

            if verbose {
                self.write_entry_details(&entry)?;
            }
        }

        Ok(())
    }

    fn write_entry_details(&mut self, entry: &IndexEntry) -> anyhow::Result<()> {
        let meta = &entry.metadata;
        let writer = self.writer();

        writeln!(writer, "  ctime: {}", format_timestamp(&meta.ctime))?;
        writeln!(writer, "  mtime: {}", format_timestamp(&meta.mtime))?;
        writeln!(
            writer,
            "  dev: {}\tino: {}\tuid: {}\tgid: {}\tsize: {}",
            meta.dev, meta.ino, meta.uid, meta.gid, meta.size
        )?;
        write!(
            writer,
            "  assume-valid: {}\textended: {}",
            meta.flags.assume_valid(),
            meta.flags.extended()
        )?;
        if let Some(extra_flags) = meta.extra_flags {
            write!(writer, "\textra-flags: {extra_flags:#06x}")?;
        }
        writeln!(writer)?;

        Ok(())
    }
}

fn format_timestamp(timestamp: &Timestamp) -> String {
    match timestamp.to_datetime() {
        Some(datetime) => format!("{timestamp} ({})", datetime.format("%Y-%m-%d %H:%M:%S UTC")),
        None => timestamp.to_string(),
    }
}
