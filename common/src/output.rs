//! Line-oriented output helpers.
//!
//! Progress, notices and warnings go to stderr; stdout is reserved for
//! machine-readable signals such as the provisioner's readiness line.

use std::fmt::Display;
use std::io::{self, Write};

/// Write a line to stderr-like output, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Write a line to stdout-like output and flush it immediately.
///
/// Unlike [`write_stderr_line`] this reports failures, because callers use it
/// for signals another process is waiting on.
///
/// # Errors
///
/// Returns the underlying I/O error if the write or the flush fails.
pub fn write_stdout_line(stdout: &mut dyn Write, message: impl Display) -> io::Result<()> {
    writeln!(stdout, "{message}")?;
    stdout.flush()
}
