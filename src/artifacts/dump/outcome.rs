//! Per-task results and the run tally built from them

use crate::areas::remote::FetchError;
use crate::artifacts::dump::task::RetrievalTask;
use derive_new::new;
use std::fmt;

/// Why a single task did not produce a file
#[derive(Debug, thiserror::Error)]
pub enum TaskFailure {
    #[error("{0}")]
    Network(#[source] FetchError),

    #[error("{0}")]
    Decompress(#[source] FetchError),

    #[error("failed to write file: {0}")]
    Write(#[source] std::io::Error),
}

impl From<FetchError> for TaskFailure {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Decompress(_) => TaskFailure::Decompress(err),
            _ => TaskFailure::Network(err),
        }
    }
}

#[derive(Debug, new)]
pub struct TaskOutcome {
    pub task: RetrievalTask,
    /// Number of bytes written on success
    pub result: Result<usize, TaskFailure>,
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Final counts of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpSummary {
    /// Entries decoded from the index
    pub found: usize,
    pub fetched: usize,
    pub network_failures: usize,
    pub decompress_failures: usize,
    pub write_failures: usize,
    /// Entries dropped by the path guard
    pub skipped: usize,
    /// Tasks never started because the run was cancelled
    pub cancelled: usize,
}

impl DumpSummary {
    pub fn record(&mut self, outcome: &TaskOutcome) {
        match &outcome.result {
            Ok(_) => self.fetched += 1,
            Err(TaskFailure::Network(_)) => self.network_failures += 1,
            Err(TaskFailure::Decompress(_)) => self.decompress_failures += 1,
            Err(TaskFailure::Write(_)) => self.write_failures += 1,
        }
    }

    pub fn failed(&self) -> usize {
        self.network_failures + self.decompress_failures + self.write_failures
    }
}

impl fmt::Display for DumpSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "found={} fetched={} failed={} (network={} decompress={} write={}) skipped={}",
            self.found,
            self.fetched,
            self.failed(),
            self.network_failures,
            self.decompress_failures,
            self.write_failures,
            self.skipped
        )?;
        if self.cancelled > 0 {
            write!(f, " cancelled={}", self.cancelled)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object_id::ObjectId;

    fn outcome(result: Result<usize, TaskFailure>) -> TaskOutcome {
        let oid = ObjectId::try_parse("da39a3ee5e6b4b0d3255bfef95601890afd80709").unwrap();
        TaskOutcome::new(RetrievalTask::new(oid, "a.txt".to_string()), result)
    }

    #[test]
    fn test_fetch_errors_map_to_failure_kinds() {
        assert!(matches!(
            TaskFailure::from(FetchError::Status(404)),
            TaskFailure::Network(_)
        ));
        assert!(matches!(
            TaskFailure::from(FetchError::Decompress(std::io::Error::other("bad"))),
            TaskFailure::Decompress(_)
        ));
    }

    #[test]
    fn test_summary_tallies_each_kind() {
        let mut summary = DumpSummary {
            found: 5,
            skipped: 1,
            ..Default::default()
        };

        summary.record(&outcome(Ok(5)));
        summary.record(&outcome(Err(FetchError::Status(404).into())));
        summary.record(&outcome(Err(
            FetchError::Decompress(std::io::Error::other("bad")).into()
        )));
        summary.record(&outcome(Err(TaskFailure::Write(std::io::Error::other("ro")))));

        pretty_assertions::assert_eq!(summary.fetched, 1);
        pretty_assertions::assert_eq!(summary.failed(), 3);
        pretty_assertions::assert_eq!(
            summary.to_string(),
            "found=5 fetched=1 failed=3 (network=1 decompress=1 write=1) skipped=1"
        );
    }

    #[test]
    fn test_cancelled_tasks_are_reported() {
        let summary = DumpSummary {
            cancelled: 2,
            ..Default::default()
        };

        assert!(summary.to_string().ends_with(" cancelled=2"));
    }
}
