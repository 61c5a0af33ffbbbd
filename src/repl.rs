// repl.rs

use std::io::{BufRead, Write};
use std::rc::Rc;

use log::{debug, warn};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::builtins::print_history;
use crate::config::ShellConfig;
use crate::error::{Result, ShellError};
use crate::history::{History, HistoryEntry};
use crate::launcher::{launch, Jobs, Mode, WaitOutcome};
use crate::parser::{classify, split_args, Directive};
use crate::resolver::resolve;
use crate::util::report;

/// Where lines come from. `Ok(None)` means end of input.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

impl LineSource for DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            // drop the half-typed line and prompt again
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(ReadlineError::Io(err)) if err.kind() == std::io::ErrorKind::InvalidData => {
                Err(ShellError::MalformedInput)
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Plain buffered input for non-terminal stdin. Echoes the prompt to `prompt_out`.
pub struct PlainLines<R, W> {
    input: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> PlainLines<R, W> {
    pub fn new(input: R, prompt_out: W) -> Self {
        Self { input, prompt_out }
    }
}

impl<R: BufRead, W: Write> LineSource for PlainLines<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.prompt_out, "{}", prompt)?;
        self.prompt_out.flush()?;
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        String::from_utf8(buf)
            .map(Some)
            .map_err(|_| ShellError::MalformedInput)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Continue,
    Exit,
}

/// One interactive session: owns the history and the background jobs.
pub struct Shell {
    config: ShellConfig,
    history: History,
    jobs: Jobs,
}

impl Shell {
    pub fn new(config: ShellConfig) -> Self {
        let history = History::new(config.history_capacity);
        Self {
            config,
            history,
            jobs: Jobs::new(),
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn jobs(&self) -> &Jobs {
        &self.jobs
    }

    /// Prompt, read, dispatch until quit or end of input.
    pub fn run<S: LineSource, W: Write>(&mut self, source: &mut S, out: &mut W) -> Result<()> {
        loop {
            self.reap_jobs();
            let line = match source.read_line(&self.config.prompt) {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    warn!("unreadable line: {}", err);
                    report(err.to_string());
                    continue;
                }
            };
            match self.step(&line, out) {
                Ok(Step::Exit) => break,
                Ok(Step::Continue) => {}
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    warn!("{:?}: {}", line.trim_end(), err);
                    report(err.to_string());
                }
            }
        }
        self.reap_jobs();
        if !self.jobs.is_empty() {
            debug!("leaving {} background job(s) running", self.jobs.len());
        }
        Ok(())
    }

    /// Handles one raw input line.
    pub fn step<W: Write>(&mut self, raw: &str, out: &mut W) -> Result<Step> {
        let line = classify(raw)?;
        let mode = if line.background {
            Mode::Background
        } else {
            Mode::Foreground
        };
        let entry = match line.directive {
            Directive::Blank => return Ok(Step::Continue),
            Directive::Quit => return Ok(Step::Exit),
            Directive::History => {
                print_history(&self.history, out)?;
                return Ok(Step::Continue);
            }
            Directive::Recall(reference) => resolve(&self.history, reference)?,
            Directive::Run(body) => HistoryEntry::new(body, split_args(body)),
        };
        self.dispatch(entry, mode)?;
        Ok(Step::Continue)
    }

    fn dispatch(&mut self, entry: Rc<HistoryEntry>, mode: Mode) -> Result<()> {
        let child = launch(entry.command())?;
        debug!("dispatched {:?} ({:?})", entry.raw(), mode);
        let seq = self.history.record(Rc::clone(&entry));
        debug!("{:?} is history entry {}", entry.raw(), seq);
        match mode {
            Mode::Background => self.jobs.push(child),
            Mode::Foreground => match child.wait()? {
                WaitOutcome::Exited(0) | WaitOutcome::StillRunning => {}
                WaitOutcome::Exited(code) => {
                    report(format!("{}: exited with status {}", child.program(), code))
                }
                WaitOutcome::Signaled(signal) => {
                    report(format!("{}: terminated by {}", child.program(), signal))
                }
            },
        }
        Ok(())
    }

    fn reap_jobs(&mut self) {
        for (child, outcome) in self.jobs.reap() {
            debug!("reaped [{}] {}: {:?}", child.pid(), child.program(), outcome);
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new(ShellConfig::default())
    }
}

/// Runs a session on the process's stdin, with line editing when it is a terminal.
pub fn start_repl(config: ShellConfig) -> Result<()> {
    use std::io::IsTerminal;

    let mut shell = Shell::new(config);
    let mut out = std::io::stdout();
    if std::io::stdin().is_terminal() {
        crate::launcher::ignore_interrupts()?;
        let mut editor = DefaultEditor::new()?;
        shell.run(&mut editor, &mut out)
    } else {
        let stdin = std::io::stdin();
        let mut source = PlainLines::new(stdin.lock(), std::io::stdout());
        shell.run(&mut source, &mut out)
    }
}
