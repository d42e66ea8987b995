use anyhow::Result;
use clap::{Parser, Subcommand};
use gitdump::areas::config::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_WORKERS, DumpConfig, Verbosity,
};
use gitdump::areas::dumper::Dumper;
use is_terminal::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "gitdump",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "Reconstruct repositories from exposed .git directories",
    long_about = "Downloads the index of a publicly reachable .git directory, \
    decodes it and fetches every object it references, rebuilding the working tree \
    in a directory named after the target host.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "dump",
        about = "Download and reconstruct a repository",
        long_about = "This command downloads <URL>/index and every object it references. \
        The URL must point at the .git directory, e.g. http://example.com/.git/"
    )]
    Dump {
        #[arg(index = 1, help = "The base URL of the exposed .git directory")]
        url: String,
        #[arg(short, long, default_value_t = DEFAULT_WORKERS, help = "Number of concurrent workers")]
        threads: usize,
        #[arg(
            short,
            long,
            default_value_t = 0,
            value_parser = clap::value_parser!(u8).range(0..=2),
            help = "0: downloaded files, 1: also files found, 2: also errors"
        )]
        verbosity: u8,
        #[arg(long, default_value_t = 30, help = "Request timeout in seconds")]
        timeout: u64,
        #[arg(
            long,
            default_value_t = DEFAULT_MAX_ATTEMPTS,
            help = "Total attempts per object, the first request included"
        )]
        attempts: usize,
        #[arg(long, help = "Send this User-Agent instead of a random browser one")]
        user_agent: Option<String>,
        #[arg(short, long, help = "Directory to create the destination tree in")]
        output: Option<PathBuf>,
        #[arg(long, help = "Strip the `blob <size>\\0` prefix from fetched objects")]
        strip_header: bool,
    },
    #[command(
        name = "ls-index",
        about = "List the entries of an index file",
        long_about = "This command decodes a local index file and prints mode, object id, \
        stage and path of every entry."
    )]
    LsIndex {
        #[arg(index = 1, help = "Path to the index file")]
        file: PathBuf,
        #[arg(long, help = "Print every stat field of each entry")]
        verbose: bool,
    },
}

fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Dump {
            url,
            threads,
            verbosity,
            timeout,
            attempts,
            user_agent,
            output,
            strip_header,
        } => {
            let verbosity = Verbosity::try_from(verbosity)?;
            init_tracing(verbosity);

            let mut config = DumpConfig::new(url.clone())
                .with_workers(threads)
                .with_verbosity(verbosity)
                .with_timeout(Duration::from_secs(timeout))
                .with_max_attempts(attempts)
                .with_strip_object_header(strip_header);
            if let Some(output) = output {
                config = config.with_output_dir(output);
            }
            if let Some(user_agent) = user_agent {
                config = config.with_user_agent(user_agent);
            }

            let cancel = CancellationToken::new();
            let ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("interrupted, finishing running tasks");
                    ctrl_c.cancel();
                }
            });

            println!("Starting gitdump on {url} with {threads} workers and verbosity level {}...", verbosity.level());
            let mut dumper = Dumper::new(Box::new(std::io::stdout()), verbosity);
            dumper.dump(&config, cancel).await?;
            println!("gitdump completed successfully.");
        }
        Commands::LsIndex { file, verbose } => {
            init_tracing(Verbosity::QUIET);

            let mut dumper = Dumper::new(Box::new(std::io::stdout()), Verbosity::QUIET);
            dumper.ls_index(&file, verbose)?;
        }
    }

    Ok(())
}
