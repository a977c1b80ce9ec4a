//! unitconv - interactive unit converter
//!
//! Reads one command per line from stdin and answers on stdout. Logs go to
//! stderr, filtered by `RUST_LOG` (default `warn`).
//!
//! Environment:
//! - UNITCONV_TABLE: JSON table to use instead of the built-in one
//! - UNITCONV_DECIMALS: decimal places in results (default 4)
//! - UNITCONV_CHART_WIDTH: length of the longest bar (default 40)

mod config;
mod render;
mod session;

use std::io::{self, BufRead, IsTerminal, Write};
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use unitconv_units::{ConversionTable, TABLE};

use config::Config;
use session::Session;

const PROGRAM_NAME: &str = "unitconv";
const PROGRAM_VERSION: &str = env!("CARGO_PKG_VERSION");
const PROMPT: &str = "unitconv> ";

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();

    let config = Config::from_env();
    info!(?config, "{} v{} starting", PROGRAM_NAME, PROGRAM_VERSION);

    let loaded;
    let table: &ConversionTable = match &config.table_path {
        Some(path) => match ConversionTable::from_path(path) {
            Ok(t) => {
                info!(path = %path.display(), categories = t.len(), "using custom conversion table");
                loaded = t;
                &loaded
            }
            Err(e) => {
                error!(path = %path.display(), "failed to load conversion table: {}", e);
                eprintln!("{}", render::error_line(&e));
                return ExitCode::FAILURE;
            }
        },
        None => &*TABLE,
    };

    let mut session = match Session::new(table, &config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", render::error_line(&e));
            return ExitCode::FAILURE;
        }
    };
    debug!(
        category = session.category(),
        from = session.from_unit(),
        to = session.to_unit(),
        value = session.value(),
        "session ready"
    );

    let interactive = io::stdin().is_terminal();
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut stdout = io::stdout();

    if interactive {
        let _ = writeln!(stdout, "{} v{} - type 'help' for commands", PROGRAM_NAME, PROGRAM_VERSION);
    }

    loop {
        if interactive {
            let _ = write!(stdout, "{}", PROMPT);
            let _ = stdout.flush();
        }

        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                info!("end of input");
                break;
            }
            Ok(_) => {
                let (text, quit) = match session.execute(&line) {
                    Ok(reply) => (reply.text, reply.quit),
                    Err(e) => {
                        debug!(code = e.code(), "command failed: {}", e);
                        (render::error_line(&e), false)
                    }
                };
                if !text.is_empty() {
                    if let Err(e) = writeln!(stdout, "{}", text) {
                        error!("error writing output: {}", e);
                        return ExitCode::FAILURE;
                    }
                }
                if quit {
                    break;
                }
            }
            Err(e) => {
                error!("error reading input: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    let _ = stdout.flush();
    ExitCode::SUCCESS
}
