use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;

use varenv::interpreter::{Config, execute};

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Script to run
    file: PathBuf,
    /// Maximum number of nested function calls
    #[arg(long, default_value_t = Config::DEFAULT_MAX_CALL_DEPTH)]
    max_call_depth: usize,
    /// Print the global bindings after the script has finished
    #[arg(short, long)]
    globals: bool,
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    pretty_env_logger::formatted_builder()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let source = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let config = Config {
        max_call_depth: args.max_call_depth,
    };
    let interpreter = execute(&source, config, io::stdout().lock())?;

    if args.globals {
        let global = interpreter.scopes().scope(interpreter.global())?;
        let mut names = global.names().collect::<Vec<_>>();
        names.sort_unstable();
        for name in names {
            if let Some(binding) = global.get(name) {
                println!("{} {} = {}", binding.kind(), name, binding.value());
            }
        }
    }

    Ok(())
}
