use crate::{input::Error, ledger::LedgerError};

use std::sync::mpsc::Receiver;
use tracing::{debug, warn};

// Errors don't stop the batch: we log them and keep processing other commands.
//
// Rejected commands are already reported by the ledger's own events, so they
// only show up here at debug level.
pub fn sink(
    input_errors: Receiver<Error>,
    ledger_errors: Receiver<LedgerError>,
) -> Vec<std::thread::JoinHandle<()>> {
    vec![
        std::thread::spawn(move || {
            for err in input_errors {
                warn!(error = ?err, "failed to read record");
            }
        }),
        std::thread::spawn(move || {
            for err in ledger_errors {
                debug!(error = %err, "failed to apply command");
            }
        }),
    ]
}
