// launcher.rs

use std::os::raw::c_char;

use log::{debug, info};
use nix::sys::signal::{signal, SigHandler, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::{fork, ForkResult, Pid};

use crate::error::{Result, ShellError};
use crate::parser::Command;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Foreground,
    Background,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitOutcome {
    Exited(i32),
    Signaled(Signal),
    StillRunning,
}

impl WaitOutcome {
    pub fn success(&self) -> bool {
        matches!(self, WaitOutcome::Exited(0))
    }
}

/// Handle to a forked child.
#[derive(Debug)]
pub struct Child {
    pid: Pid,
    program: String,
}

impl Child {
    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Blocks until the child terminates.
    pub fn wait(&self) -> Result<WaitOutcome> {
        loop {
            match self.poll(None)? {
                WaitOutcome::StillRunning => continue,
                done => return Ok(done),
            }
        }
    }

    pub fn try_wait(&self) -> Result<WaitOutcome> {
        self.poll(Some(WaitPidFlag::WNOHANG))
    }

    fn poll(&self, flags: Option<WaitPidFlag>) -> Result<WaitOutcome> {
        match waitpid(self.pid, flags) {
            Ok(WaitStatus::Exited(_, code)) => Ok(WaitOutcome::Exited(code)),
            Ok(WaitStatus::Signaled(_, signal, _)) => Ok(WaitOutcome::Signaled(signal)),
            Ok(_) => Ok(WaitOutcome::StillRunning),
            Err(nix::errno::Errno::EINTR) => Ok(WaitOutcome::StillRunning),
            Err(source) => Err(ShellError::Wait { pid: self.pid, source }),
        }
    }
}

/// Forks and execs `command`, searching `PATH` for bare program names.
///
/// Everything the child touches is prepared before the fork; the child only calls
/// `signal`, `execvp`, `write` and `_exit`.
pub fn launch(command: &Command) -> Result<Child> {
    if command.program().is_empty() {
        return Err(ShellError::EmptyCommand);
    }
    let args = command.to_cstrings()?;
    let mut argv: Vec<*const c_char> = args.iter().map(|a| a.as_ptr()).collect();
    argv.push(std::ptr::null());
    let failure = format!("osh: {}: command not found\n", command.program()).into_bytes();

    match unsafe { fork() } {
        Ok(ForkResult::Child) => unsafe {
            // the shell may be ignoring SIGINT; ignored dispositions survive exec
            libc::signal(libc::SIGINT, libc::SIG_DFL);
            libc::execvp(argv[0], argv.as_ptr());
            libc::write(libc::STDERR_FILENO, failure.as_ptr().cast(), failure.len());
            libc::_exit(127)
        },
        Ok(ForkResult::Parent { child }) => {
            debug!("forked {} as pid {}", command.program(), child);
            Ok(Child {
                pid: child,
                program: command.program().to_string(),
            })
        }
        Err(err) => Err(ShellError::Spawn(err)),
    }
}

/// Keeps Ctrl-C aimed at the foreground child from taking the shell down with it.
pub fn ignore_interrupts() -> Result<()> {
    unsafe { signal(Signal::SIGINT, SigHandler::SigIgn) }
        .map(|_| ())
        .map_err(ShellError::Signal)
}

/// Background children not yet reaped.
#[derive(Debug, Default)]
pub struct Jobs {
    running: Vec<Child>,
}

impl Jobs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, child: Child) {
        info!("[{}] {} running in background", child.pid(), child.program());
        self.running.push(child);
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    /// Non-blocking sweep; returns the children that finished since the last call.
    pub fn reap(&mut self) -> Vec<(Child, WaitOutcome)> {
        let mut finished = Vec::new();
        let mut still = Vec::with_capacity(self.running.len());
        for child in self.running.drain(..) {
            match child.try_wait() {
                Ok(WaitOutcome::StillRunning) => still.push(child),
                Ok(outcome) => {
                    info!("[{}] {} finished: {:?}", child.pid(), child.program(), outcome);
                    finished.push((child, outcome));
                }
                Err(err) => {
                    // already gone (ECHILD); nothing left to reclaim
                    debug!("dropping job {}: {}", child.pid(), err);
                }
            }
        }
        self.running = still;
        finished
    }
}
