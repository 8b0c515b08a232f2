//! Path-based extraction over raw JSON records.
//!
//! The mapping pipeline works through an owned, mutable working copy of each
//! wire record. [`extract`] is a destructive read: the consumed leaf key is
//! removed from the record, so a field claimed by one mapping stage can never
//! be re-examined by a later one.

use serde_json::{Map, Value};

/// Reads the value at a slash-delimited `path` (e.g.
/// `geometry/viewport/northeast/lat`) out of `record`, removing the leaf key.
///
/// A missing key at any level yields `None`; extraction never fails.
/// Intermediate keys are left in place so sibling paths stay reachable.
pub(crate) fn extract(record: &mut Map<String, Value>, path: &str) -> Option<Value> {
    let mut current = record;
    let mut segments = path.split('/').peekable();
    loop {
        let key = segments.next()?;
        if segments.peek().is_none() {
            return current.remove(key);
        }
        current = current.get_mut(key)?.as_object_mut()?;
    }
}

/// Non-consuming probe for the value at `path`, used to pick between wire
/// shapes before committing to extraction.
pub(crate) fn peek<'a>(record: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('/');
    let mut value = record.get(segments.next()?)?;
    for key in segments {
        value = value.as_object()?.get(key)?;
    }
    Some(value)
}
