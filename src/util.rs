// util.rs

use std::io::Write;

pub fn writeln_ignore_broken_pipe<W: Write, S: AsRef<str>>(mut w: W, s: S) -> std::io::Result<()> {
    match writeln!(w, "{}", s.as_ref()) {
        Err(ref e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

/// Diagnostics for per-line errors; never fails the caller.
pub fn report<S: AsRef<str>>(message: S) {
    let _ = writeln_ignore_broken_pipe(std::io::stderr(), format!("osh: {}", message.as_ref()));
}
