// resolver.rs

use std::rc::Rc;

use crate::error::Result;
use crate::history::{History, HistoryEntry};
use crate::parser::Reference;

/// Looks up a bang reference. The returned handle is the stored entry itself, so
/// recording it again aliases the original slot.
pub fn resolve(history: &History, reference: Reference) -> Result<Rc<HistoryEntry>> {
    let entry = match reference {
        Reference::MostRecent => history.most_recent()?,
        Reference::Seq(seq) => history.get(seq)?,
    };
    Ok(Rc::clone(entry))
}
