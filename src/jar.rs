//! Parsing of the host's cookie string.
//!
//! The host exposes every visible cookie as a single string of
//! `name=value` pairs separated by `; `. [`RawPairs`] walks that string,
//! [`scan`] and [`find`] decode what it yields.
//!
//! # Best-effort decoding
//!
//! The cookie string is shared with every other script and server that can
//! set cookies for the document, so it may contain entries this crate didn't
//! write and can't decode. An entry whose name or value fails to decode is
//! skipped: it never aborts the scan and never surfaces as an error.
use std::collections::HashMap;

use crate::Decoding;

/// An iterator over the raw `(name, value)` pairs of a cookie string.
///
/// The first pair starts at the beginning of the string, every following pair
/// must be introduced by `; `. A raw name runs up to the next `=`, a raw value
/// up to the next `;`. No decoding happens at this stage.
///
/// ```rust
/// use crumbs::jar::RawPairs;
///
/// let pairs: Vec<_> = RawPairs::new("a=1; b=foo=bar; c=").collect();
/// assert_eq!(pairs, [("a", "1"), ("b", "foo=bar"), ("c", "")]);
/// ```
#[derive(Debug, Clone)]
pub struct RawPairs<'a> {
    raw: &'a str,
    cursor: usize,
    done: bool,
}

impl<'a> RawPairs<'a> {
    pub fn new(raw: &'a str) -> Self {
        RawPairs {
            raw,
            cursor: 0,
            done: false,
        }
    }
}

impl<'a> Iterator for RawPairs<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let rest = &self.raw[self.cursor..];
        let name_start = if self.cursor == 0 {
            0
        } else {
            match rest.find("; ") {
                Some(offset) => self.cursor + offset + 2,
                None => {
                    self.done = true;
                    return None;
                }
            }
        };
        // No `=` left means no later entry can match either.
        let Some(eq) = self.raw[name_start..].find('=').map(|i| name_start + i) else {
            self.done = true;
            return None;
        };
        let value_start = eq + 1;
        let value_end = self.raw[value_start..]
            .find(';')
            .map_or(self.raw.len(), |i| value_start + i);

        self.cursor = value_end;
        Some((&self.raw[name_start..eq], &self.raw[value_start..value_end]))
    }
}

impl std::iter::FusedIterator for RawPairs<'_> {}

/// Decodes every entry of `raw` into a map keyed by decoded name.
///
/// When a name occurs more than once, the last successfully decoded entry wins.
/// Entries that fail to decode are skipped.
pub fn scan<R>(raw: &str, decoding: &Decoding<R>) -> HashMap<String, R> {
    let mut jar = HashMap::new();
    for (name, value) in decoded(raw, decoding) {
        jar.insert(name, value);
    }
    jar
}

/// Returns the value of the first entry of `raw` named `name` that decodes
/// successfully, without looking at the rest of the string.
pub fn find<R>(raw: &str, name: &str, decoding: &Decoding<R>) -> Option<R> {
    decoded(raw, decoding)
        .find(|(found, _)| found == name)
        .map(|(_, value)| value)
}

fn decoded<'a, R>(
    raw: &'a str,
    decoding: &'a Decoding<R>,
) -> impl Iterator<Item = (String, R)> + 'a {
    RawPairs::new(raw).filter_map(move |(raw_name, raw_value)| {
        let name = match decoding.name(raw_name) {
            Ok(name) => name,
            Err(e) => {
                tracing::debug!(raw_name, error = %e, "Skipping a cookie with an undecodable name");
                return None;
            }
        };
        match decoding.value(raw_value, &name) {
            Ok(value) => Some((name, value)),
            Err(e) => {
                tracing::debug!(name = %name, error = %e, "Skipping a cookie with an undecodable value");
                None
            }
        }
    })
}
