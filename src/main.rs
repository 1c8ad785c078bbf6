mod config;
mod document;
mod error;
mod ids;
mod ipc;
mod model;
mod reports;
mod store;
mod validation;

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const TARGET_MAIN: &str = "enrolmentd";

/// Student enrolment record store, served over line-delimited JSON on stdin/stdout.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Students file. Falls back to $STUDENTS_DATA, then ./students.data.
    #[arg(long, value_name = "PATH")]
    data: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(config::LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER));
    // stdout carries responses; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing();

    let data_path = config::resolve_data_path(args.data);
    let mut store = store::Store::new(&data_path);
    if let Err(e) = store.ensure_file() {
        // Keep serving; every request will report the same I/O problem.
        error!(target: TARGET_MAIN, error = %e, "cannot prepare students file");
    }
    info!(target: TARGET_MAIN, path = %data_path.display(), "serving students file");

    let mut state = ipc::AppState { store };

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply without id.
                let resp = ipc::err("", "bad_json", e.to_string(), None);
                writeln!(stdout, "{}", resp)?;
                stdout.flush()?;
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        writeln!(stdout, "{}", resp)?;
        stdout.flush()?;
    }
    Ok(())
}
