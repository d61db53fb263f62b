use std::fmt::Display;
use std::io;

use crate::error::Error;

/// Diagnostic printing never fails its caller. Report what went wrong and move on.
pub(crate) fn best_effort(what: impl Display, result: io::Result<()>) {
    if let Err(e) = result {
        warn!("Printing {} stopped early: {}", what, e);
    }
}

/// Carry a failed target read through an `io::Result` printing chain.
pub(crate) fn read_failed(e: Error) -> io::Error {
    io::Error::other(e)
}
