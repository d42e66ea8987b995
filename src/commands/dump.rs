use crate::areas::config::{DumpConfig, Verbosity};
use crate::areas::dumper::Dumper;
use crate::areas::remote::Remote;
use crate::areas::workspace::Workspace;
use crate::artifacts::dump::outcome::DumpSummary;
use crate::artifacts::dump::pipeline::Pipeline;
use crate::artifacts::dump::task::RetrievalTask;
use crate::artifacts::index::decoder::IndexDecoder;
use anyhow::Context;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

impl Dumper {
    /// Reconstruct the working tree behind an exposed `.git` directory.
    ///
    /// Fails only when nothing can be done at all: bad configuration, the
    /// index cannot be downloaded, or the index is corrupt. Failures of
    /// individual objects are counted in the returned summary instead.
    pub async fn dump(
        &mut self,
        config: &DumpConfig,
        cancel: CancellationToken,
    ) -> anyhow::Result<DumpSummary> {
        config.validate()?;

        let workspace = Arc::new(Workspace::create(&config.destination_root()?)?);
        let remote = Arc::new(Remote::new(config)?);
        info!(base_url = remote.base_url(), destination = %workspace.path().display(), "starting dump");

        self.log(
            Verbosity::FOUND,
            format!("{} Downloading and parsing index file...", "[+]".cyan()),
        )?;
        let index_data = remote
            .fetch_index()
            .await
            .with_context(|| format!("Failed to download index file from {}/index", remote.base_url()))?;

        let artifact = workspace.write_index_artifact(&index_data)?;
        debug!(artifact = %artifact.display(), bytes = index_data.len(), "saved index");

        let mut summary = DumpSummary::default();
        let tasks = match self.collect_tasks(&workspace, &artifact, &mut summary) {
            Ok(tasks) => tasks,
            Err(err) => {
                workspace.remove_index_artifact(&artifact)?;
                return Err(err);
            }
        };

        let pipeline = Pipeline::new(remote, workspace.clone(), config.workers)
            .with_strip_object_header(config.strip_object_header)
            .with_cancellation(cancel);

        let mut report_error = None;
        let cancelled = pipeline
            .run(tasks, |outcome| {
                summary.record(&outcome);
                if let Err(err) = self.report_outcome(&outcome) {
                    report_error.get_or_insert(err);
                }
            })
            .await;
        summary.cancelled = cancelled;

        workspace.remove_index_artifact(&artifact)?;
        if let Some(err) = report_error {
            return Err(err.into());
        }
        self.log(
            Verbosity::FOUND,
            format!("{} Removed temporary index file.", "[+]".cyan()),
        )?;

        info!(%summary, "dump finished");
        self.report_summary(&summary)?;

        Ok(summary)
    }

    /// Decode the saved index and keep the entries that are safe to write
    fn collect_tasks(
        &mut self,
        workspace: &Workspace,
        artifact: &Path,
        summary: &mut DumpSummary,
    ) -> anyhow::Result<Vec<RetrievalTask>> {
        let entries = IndexDecoder::open(artifact)?
            .read_header()
            .context("Invalid index file")?;
        info!(
            version = entries.header().version,
            entries = entries.header().entries_count,
            "decoded index header"
        );

        let mut tasks = Vec::new();
        for entry in entries {
            let task = RetrievalTask::from(entry.context("Invalid index file")?);
            summary.found += 1;
            if task.oid.is_null() {
                debug!(path = %task.path, "entry has a null object id, queueing anyway");
            }

            if !workspace.is_safe(&task.path) {
                debug!(path = %task.path, "skipping entry that would escape the destination");
                summary.skipped += 1;
                self.report_skipped(&task.path)?;
                continue;
            }

            self.report_found(&task.path)?;
            tasks.push(task);
        }

        Ok(tasks)
    }
}
