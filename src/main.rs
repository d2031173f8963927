use bank_ledger::{
    config::{init_tracing, load_config},
    ledger::Ledger,
    output::write_journal,
    run::run_with,
};

use clap::Parser;
use std::{fs::File, io, path::PathBuf, process::ExitCode, sync::Arc};
use tracing::error;

/// Replay a CSV command file against a fresh ledger and print the accounts.
#[derive(Parser, Debug)]
#[command(name = "bank-ledger", version)]
struct Args {
    /// Command file: command,account,to,amount,kind,holder,customer,description
    commands_filepath: PathBuf,

    /// Also write the transaction journal to this file.
    #[arg(long)]
    journal: Option<PathBuf>,

    /// Overrides BANK_LOG_LEVEL.
    #[arg(long)]
    log_level: Option<String>,

    /// Log as JSON lines. Overrides BANK_LOG_JSON.
    #[arg(long)]
    log_json: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    if let Some(level) = args.log_level.clone() {
        config.log_level = level;
    }
    config.log_json |= args.log_json;
    init_tracing(&config.log_level, config.log_json);

    match replay(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "replay failed");
            ExitCode::FAILURE
        }
    }
}

fn replay(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let input = File::open(&args.commands_filepath)?;
    let ledger = Arc::new(Ledger::in_memory());

    run_with(ledger.clone(), input, io::stdout().lock())?;

    if let Some(path) = &args.journal {
        let mut journal = ledger.get_all_transactions()?;
        journal.reverse();
        write_journal(File::create(path)?, &journal)?;
    }

    Ok(())
}
