//! wirefield - runs command scripts that build wire geometries and write
//! field maps.
//!
//! Scripts are read in order; with no script arguments commands come from
//! standard input. Rejected commands are logged and skipped, I/O and
//! allocation failures stop the run with exit status 1.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry};
use wirefield::command::Command;
use wirefield::session::{Flow, Session, SessionError};

#[derive(Parser, Debug)]
#[command(name = "wirefield")]
#[command(about = "Biot-Savart field maps and mutual inductance of wire geometries")]
struct Cli {
    /// Command scripts to run in order (standard input when omitted)
    scripts: Vec<PathBuf>,

    /// Start with debug logging
    #[arg(short, long)]
    verbose: bool,
}

type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Failures that end the run.
#[derive(Debug, Error)]
enum RunError {
    /// A script could not be opened or read.
    #[error("{name}: {source}")]
    Read { name: String, source: io::Error },
    /// A command failed in a way the session cannot skip.
    #[error("{name}:{line}: {source}")]
    Command {
        name: String,
        line: usize,
        source: SessionError,
    },
    /// The open wire file could not be saved.
    #[error(transparent)]
    Session(#[from] SessionError),
}

fn filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("wirefield=debug")
    } else {
        EnvFilter::new("wirefield=warn")
    }
}

/// Runs every line of `reader`; `Ok(Flow::End)` once `end` is seen.
///
/// Rejected commands are logged and skipped.
fn run_script(
    session: &mut Session,
    reader: impl BufRead,
    name: &str,
    logging: &FilterHandle,
) -> Result<Flow, RunError> {
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| RunError::Read {
            name: name.to_owned(),
            source,
        })?;
        let inductance = matches!(Command::parse(&line), Ok(Some(Command::Inductance(_))));
        let was_verbose = session.is_verbose();

        match session.run_line(&line) {
            Ok(Flow::End) => return Ok(Flow::End),
            Ok(Flow::Continue) => {}
            Err(source) if source.is_fatal() => {
                return Err(RunError::Command {
                    name: name.to_owned(),
                    line: line_no,
                    source,
                });
            }
            Err(err) => {
                error!("{name}:{line_no}: {err}");
                continue;
            }
        }

        if session.is_verbose() != was_verbose {
            if let Err(err) = logging.reload(filter(session.is_verbose())) {
                warn!("could not change log level: {err}");
            }
        }
        if inductance {
            if let Some(m) = session.last_inductance() {
                println!("{m:e}");
            }
        }
    }
    Ok(Flow::Continue)
}

fn run(cli: &Cli, logging: &FilterHandle) -> Result<(), RunError> {
    let mut session = Session::new();
    if cli.verbose {
        session.execute(Command::Verbose)?;
    }

    if cli.scripts.is_empty() {
        run_script(&mut session, io::stdin().lock(), "<stdin>", logging)?;
    } else {
        for path in &cli.scripts {
            let name = path.display().to_string();
            let file = File::open(path).map_err(|source| RunError::Read {
                name: name.clone(),
                source,
            })?;
            info!("running {name}");
            if run_script(&mut session, BufReader::new(file), &name, logging)? == Flow::End {
                return Ok(());
            }
        }
    }

    // Scripts that run out without `end` still flush the open wire file.
    session.close_output().map_err(SessionError::from)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (filter_layer, logging) = reload::Layer::new(filter(cli.verbose));
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(&cli, &logging) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
