use crate::areas::config::Verbosity;
use crate::artifacts::dump::outcome::{DumpSummary, TaskOutcome};
use colored::Colorize;
use std::io::Write;

/// Entry point of every command; owns the user-facing output stream
pub struct Dumper {
    writer: Box<dyn Write + Send>,
    verbosity: Verbosity,
}

impl Dumper {
    pub fn new(writer: Box<dyn Write + Send>, verbosity: Verbosity) -> Self {
        Dumper { writer, verbosity }
    }

    pub fn writer(&mut self) -> &mut Box<dyn Write + Send> {
        &mut self.writer
    }

    /// Write `message` if the configured verbosity includes `level`
    pub(crate) fn log(&mut self, level: Verbosity, message: impl AsRef<str>) -> std::io::Result<()> {
        if self.verbosity.shows(level) {
            writeln!(self.writer, "{}", message.as_ref())?;
        }

        Ok(())
    }

    pub(crate) fn report_found(&mut self, path: &str) -> std::io::Result<()> {
        self.log(Verbosity::FOUND, format!("{} Found: {path}", "[+]".cyan()))
    }

    pub(crate) fn report_skipped(&mut self, path: &str) -> std::io::Result<()> {
        self.log(Verbosity::ERRORS, format!("{} {path}", "[SKIP]".yellow()))
    }

    pub(crate) fn report_outcome(&mut self, outcome: &TaskOutcome) -> std::io::Result<()> {
        match &outcome.result {
            Ok(_) => self.log(
                Verbosity::QUIET,
                format!("{} {}", "[OK]".green(), outcome.task.path),
            ),
            Err(failure) => self.log(
                Verbosity::ERRORS,
                format!("{} {}: {failure}", "[ERROR]".red(), outcome.task.path),
            ),
        }
    }

    pub(crate) fn report_summary(&mut self, summary: &DumpSummary) -> std::io::Result<()> {
        writeln!(self.writer, "{} {summary}", "[=]".bold())?;
        self.writer.flush()
    }
}
