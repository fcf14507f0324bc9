// src/main.rs

use std::process;

use watcherd::cli::{self, DaemonCommand};
use watcherd::errors::EXIT_BAD_CONFIG;
use watcherd::logging::{self, LogSink};
use watcherd::{config, run};

fn main() {
    let args = cli::parse();

    // Config errors are fatal before anything daemonizes.
    let cfg = match config::load_and_validate(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("watcherd: failed to read config file: {err:#}");
            process::exit(EXIT_BAD_CONFIG);
        }
    };

    let (sink, fallback) = match args.command {
        DaemonCommand::Debug => (LogSink::Stderr, tracing::Level::DEBUG),
        _ => (
            LogSink::File(cfg.daemon.logfile.clone()),
            tracing::Level::INFO,
        ),
    };

    if let Err(err) = logging::init_logging(args.log_level, fallback, &sink) {
        eprintln!("watcherd: failed to initialise logging: {err:#}");
        process::exit(1);
    }

    if let Err(err) = run(args.command, cfg) {
        tracing::error!("{err:#}");
        eprintln!("watcherd error: {err:#}");
        process::exit(1);
    }
}
