use crate::{
    error_handler::sink,
    input::parse,
    ledger::{process::process, Ledger},
    output::write,
};

use std::io;
use std::sync::{mpsc, Arc};

/// Replay a command file against a fresh in-memory ledger, and write the
/// resulting accounts to `output_stream`.
pub fn run(
    input_stream: (impl io::Read + Send + 'static),
    output_stream: impl io::Write,
) -> Result<(), io::Error> {
    run_with(Arc::new(Ledger::in_memory()), input_stream, output_stream)
}

/// Same as [`run`], against a ledger the caller keeps a handle on.
pub fn run_with(
    ledger: Arc<Ledger>,
    input_stream: (impl io::Read + Send + 'static),
    output_stream: impl io::Write,
) -> Result<(), io::Error> {
    let (commands, input_errors) = parse(input_stream);
    let (accounts_tx, accounts) = mpsc::channel();
    let ledger_errors = process(commands, ledger, accounts_tx);
    let sinks = sink(input_errors, ledger_errors);

    write(output_stream, accounts)?;

    for handle in sinks {
        handle
            .join()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "error sink panicked"))?;
    }

    Ok(())
}
