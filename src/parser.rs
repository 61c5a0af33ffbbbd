// parser.rs

use std::ffi::CString;
use std::fmt;

use crate::error::{Result, ShellError};

/// Parsed argument vector. `args[0]` is the program name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    args: Vec<String>,
}

impl Command {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }

    pub fn program(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or("")
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn to_cstrings(&self) -> Result<Vec<CString>> {
        self.args
            .iter()
            .map(|a| CString::new(a.as_str()).map_err(ShellError::from))
            .collect()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args.join(" "))
    }
}

/// Splits on every single space. Consecutive spaces yield empty arguments and an
/// empty line yields one empty argument; no quoting or escaping.
pub fn split_args(line: &str) -> Command {
    Command::new(line.split(' ').map(str::to_string).collect())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reference {
    MostRecent,
    Seq(u64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directive<'a> {
    Blank,
    Quit,
    History,
    Recall(Reference),
    Run(&'a str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Line<'a> {
    pub directive: Directive<'a>,
    pub background: bool,
}

/// Removes the trailing newline and a trailing `&` (plus the space before it).
pub fn strip_line(raw: &str) -> (&str, bool) {
    let line = raw.trim_end_matches(['\n', '\r']);
    match line.strip_suffix('&') {
        Some(rest) => (rest.strip_suffix(' ').unwrap_or(rest), true),
        None => (line, false),
    }
}

pub fn parse_reference(body: &str) -> Result<Reference> {
    let tail = match body.strip_prefix('!') {
        Some(tail) => tail,
        None => return Err(ShellError::MalformedReference(body.to_string())),
    };
    if tail == "!" {
        return Ok(Reference::MostRecent);
    }
    if tail.is_empty() || !tail.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ShellError::MalformedReference(body.to_string()));
    }
    // all digits, so the only possible failure is overflow
    tail.parse::<u64>()
        .map(Reference::Seq)
        .map_err(|_| ShellError::NoSuchEntry(u64::MAX))
}

pub fn classify(raw: &str) -> Result<Line<'_>> {
    let (body, background) = strip_line(raw);
    let directive = if body.is_empty() {
        Directive::Blank
    } else if body.starts_with('q') {
        Directive::Quit
    } else if body == "history" {
        Directive::History
    } else if body.starts_with('!') {
        Directive::Recall(parse_reference(body)?)
    } else {
        Directive::Run(body)
    };
    Ok(Line { directive, background })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(cmd: &Command) -> Vec<&str> {
        cmd.args().iter().map(String::as_str).collect()
    }

    #[test]
    fn splits_on_single_spaces() {
        assert_eq!(args(&split_args("ls -la /tmp")), vec!["ls", "-la", "/tmp"]);
    }

    #[test]
    fn consecutive_spaces_keep_empty_arguments() {
        assert_eq!(args(&split_args("echo  a")), vec!["echo", "", "a"]);
    }

    #[test]
    fn empty_line_is_one_empty_argument() {
        let cmd = split_args("");
        assert_eq!(args(&cmd), vec![""]);
        assert_eq!(cmd.program(), "");
    }

    #[test]
    fn nul_bytes_cannot_reach_exec() {
        let cmd = split_args("echo a\0b");
        assert!(matches!(cmd.to_cstrings(), Err(ShellError::NulByte(_))));
    }

    #[test]
    fn background_marker_is_stripped() {
        assert_eq!(strip_line("sleep 3 &\n"), ("sleep 3", true));
        assert_eq!(strip_line("sleep 3&"), ("sleep 3", true));
        assert_eq!(strip_line("sleep 3\r\n"), ("sleep 3", false));
    }

    #[test]
    fn classifies_directives() {
        assert_eq!(classify("q").unwrap().directive, Directive::Quit);
        assert_eq!(classify("quit\n").unwrap().directive, Directive::Quit);
        assert_eq!(classify("history").unwrap().directive, Directive::History);
        assert_eq!(classify("history -c").unwrap().directive, Directive::Run("history -c"));
        assert_eq!(classify("\n").unwrap().directive, Directive::Blank);
        assert_eq!(
            classify("!!").unwrap().directive,
            Directive::Recall(Reference::MostRecent)
        );
        assert_eq!(
            classify("!12").unwrap().directive,
            Directive::Recall(Reference::Seq(12))
        );
    }

    #[test]
    fn recall_can_run_in_background() {
        let line = classify("!! &").unwrap();
        assert_eq!(line.directive, Directive::Recall(Reference::MostRecent));
        assert!(line.background);
    }

    #[test]
    fn rejects_malformed_references() {
        for bad in ["!", "!x", "!3a", "!-1", "!!!"] {
            assert!(
                matches!(classify(bad), Err(ShellError::MalformedReference(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn oversized_reference_is_a_miss() {
        assert!(matches!(
            classify("!99999999999999999999999"),
            Err(ShellError::NoSuchEntry(_))
        ));
    }
}
