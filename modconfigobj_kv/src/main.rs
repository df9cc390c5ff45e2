//! # modconfigobj-kv
//!
//! Reads a nested-section configuration file and prints one
//! `section.key=value` line per key on stdout. Logs go to stderr.
//!
//! Exit status: 0 on success, 1 when the file cannot be read, 2 when the
//! input is malformed. Each failure is logged once on stderr.

mod cli;
mod export;

use clap::error::ErrorKind;
use clap::Parser;
use cli::{Cli, OutputMode};
use export::{ExportSummary, KvError};
use modconfigobj::config::runtime::{LogLevel, LoggingPreferences};
use modconfigobj::logging::{self, codes};
use modconfigobj::{file_processor, lexical, log_error, log_info, log_success};
use std::io::{self, Write};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            std::process::exit(code);
        }
    };

    if let Err(e) = init_logging(cli.quiet) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }
    log_info!("modconfigobj-kv starting",
        "file" => cli.file.display(),
        "limits" => modconfigobj::config::build_info::source_info()
    );

    let result = logging::with_file_context(cli.file.clone(), 0, || run(&cli));

    match result {
        Ok(summary) if summary.errors > 0 => std::process::exit(2),
        Ok(_) => {}
        Err(e) => {
            if !e.logged_at_source() {
                log_error!(e.error_code(), &e.to_string(), "exit_code" => e.exit_code());
            }
            std::process::exit(e.exit_code());
        }
    }
}

fn init_logging(quiet: bool) -> Result<(), String> {
    if quiet {
        let preferences = LoggingPreferences {
            min_log_level: LogLevel::Error,
            ..LoggingPreferences::default()
        };
        logging::config::init_runtime_preferences(preferences)?;
    }
    logging::init_global_logging()
}

fn run(cli: &Cli) -> Result<ExportSummary, KvError> {
    let source = file_processor::open_source(&cli.file)?;
    let mut lexer = lexical::lex_source_file(source);

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    let summary = match cli.output_mode() {
        OutputMode::KeyValue => export::export_pairs(&mut lexer, &mut out),
        OutputMode::Tokens => export::dump_tokens(&mut lexer, &mut out, false),
        OutputMode::Json => export::dump_tokens(&mut lexer, &mut out, true),
    };

    // Lines written before a failure are still delivered
    out.flush()?;
    let summary = summary?;

    log_success!(codes::success::KV_EXPORT_COMPLETE, "Export complete",
        "pairs" => summary.pairs,
        "sections" => summary.sections,
        "error_tokens" => summary.errors
    );

    Ok(summary)
}
