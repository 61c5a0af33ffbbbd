// history.rs

use std::rc::Rc;

use log::debug;

use crate::error::{Result, ShellError};
use crate::parser::Command;

/// A raw line paired with the command parsed from it. Never mutated once built.
#[derive(Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    raw: String,
    command: Command,
}

impl HistoryEntry {
    pub fn new<S: Into<String>>(raw: S, command: Command) -> Rc<Self> {
        Rc::new(Self { raw: raw.into(), command })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

/// Fixed-capacity circular history.
///
/// Slots hold shared handles: replaying an entry records the same `Rc` again, so
/// an evicted slot only drops its handle and the entry is reclaimed once no live
/// slot refers to it.
#[derive(Debug)]
pub struct History {
    slots: Vec<Option<Rc<HistoryEntry>>>,
    count: u64,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity.max(1)],
            count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Total number of entries ever recorded; the next sequence number.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn len(&self) -> usize {
        self.count.min(self.capacity() as u64) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn slot(&self, seq: u64) -> usize {
        (seq % self.capacity() as u64) as usize
    }

    /// Oldest sequence number still retrievable.
    pub fn first_live(&self) -> u64 {
        self.count.saturating_sub(self.capacity() as u64)
    }

    pub fn record(&mut self, entry: Rc<HistoryEntry>) -> u64 {
        let seq = self.count;
        let slot = self.slot(seq);
        if let Some(old) = self.slots[slot].replace(entry) {
            debug!(
                "evicting seq {} from slot {} ({} other handle(s))",
                seq - self.capacity() as u64,
                slot,
                Rc::strong_count(&old) - 1
            );
        }
        self.count += 1;
        debug!("recorded seq {seq} in slot {slot}");
        seq
    }

    pub fn get(&self, seq: u64) -> Result<&Rc<HistoryEntry>> {
        if seq < self.first_live() || seq >= self.count {
            return Err(ShellError::NoSuchEntry(seq));
        }
        self.slots[self.slot(seq)]
            .as_ref()
            .ok_or(ShellError::NoSuchEntry(seq))
    }

    pub fn most_recent(&self) -> Result<&Rc<HistoryEntry>> {
        match self.count.checked_sub(1) {
            Some(seq) => self.get(seq),
            None => Err(ShellError::HistoryEmpty),
        }
    }

    /// Live entries, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &Rc<HistoryEntry>)> + '_ {
        (self.first_live()..self.count)
            .rev()
            .filter_map(move |seq| self.slots[self.slot(seq)].as_ref().map(|e| (seq, e)))
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(crate::config::HISTORY_CAPACITY)
    }
}
