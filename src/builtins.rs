// builtins.rs

use std::io::Write;

use itertools::Itertools;

use crate::history::History;
use crate::util::writeln_ignore_broken_pipe;

pub fn history_lines(history: &History) -> Vec<String> {
    history
        .iter()
        .map(|(seq, entry)| format!("{} | {}", seq, entry.command().args().iter().join(" ")))
        .collect()
}

pub fn print_history<W: Write>(history: &History, mut out: W) -> std::io::Result<()> {
    for line in history_lines(history) {
        writeln_ignore_broken_pipe(&mut out, line)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryEntry;
    use crate::parser::split_args;

    #[test]
    fn lists_most_recent_first() {
        let mut history = History::default();
        for line in ["ls -la", "echo hi there", "pwd"] {
            history.record(HistoryEntry::new(line, split_args(line)));
        }
        let mut out = Vec::new();
        print_history(&history, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "2 | pwd\n1 | echo hi there\n0 | ls -la\n"
        );
    }

    #[test]
    fn empty_history_prints_nothing() {
        assert!(history_lines(&History::default()).is_empty());
    }
}
