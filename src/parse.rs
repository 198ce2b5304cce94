//! Reading clocks from text.
//!
//! One clock per line, with an optional parenthesised label:
//!
//! ```text
//! (eventA) 1, 0, 2
//! 2, 0, 2
//! ```
//!
//! Input starting with `[` is read as a JSON array of
//! `{"label": "eventA", "clock": [1, 0, 2]}` records instead.

use std::collections::HashMap;
use std::io::Read;

use serde::Deserialize;
use tracing::warn;

use crate::clock::VectorClock;
use crate::error::ParseError;
use crate::graph::{Graph, NodeValue};

/// Parsed clocks in input order, plus labels keyed by canonical clock string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClockSet {
    pub clocks: Vec<VectorClock>,
    pub labels: HashMap<String, String>,
}

#[derive(Deserialize)]
struct ClockRecord {
    #[serde(default)]
    label: Option<String>,
    clock: VectorClock,
}

impl ClockSet {
    fn push(&mut self, line: usize, text: &str, clock: VectorClock, label: Option<&str>) -> Result<(), ParseError> {
        if clock.is_empty() {
            return Err(ParseError::Empty { line, text: text.to_owned() });
        }
        if let Some(first) = self.clocks.first() {
            if first.len() != clock.len() {
                return Err(ParseError::DimensionMismatch { line, expected: first.len(), found: clock.len() });
            }
        }
        if let Some(label) = label.filter(|l| !l.is_empty()) {
            let key = clock.to_string();
            match self.labels.get(&key) {
                Some(existing) if existing != label => {
                    warn!(line, clock = %key, kept = %existing, ignored = %label, "clock already labeled");
                }
                Some(_) => {}
                None => {
                    self.labels.insert(key, label.to_owned());
                }
            }
        }
        self.clocks.push(clock);
        Ok(())
    }

    /// Renames every labeled node of `graph` to `"<label>\n<clock>"`.
    pub fn apply_labels(&self, graph: &mut Graph) {
        let ids: Vec<_> = graph.node_ids().collect();
        for id in ids {
            let key = graph.node(id).key();
            if let Some(label) = self.labels.get(key) {
                let text = format!("{label}\n{key}");
                graph.relabel(id, NodeValue::Text(text));
            }
        }
    }
}

pub fn parse<R: Read>(mut reader: R) -> Result<ClockSet, ParseError> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    parse_str(&buf)
}

pub fn parse_str(input: &str) -> Result<ClockSet, ParseError> {
    if input.trim_start().starts_with('[') {
        return parse_json(input);
    }

    let mut set = ClockSet::default();
    for (i, raw) in input.lines().enumerate() {
        let line = i + 1;
        let text = raw.trim();
        if text.is_empty() {
            continue;
        }
        let (label, rest) = split_label(line, text)?;
        let clock = parse_components(line, text, rest)?;
        set.push(line, text, clock, label)?;
    }
    Ok(set)
}

fn parse_json(input: &str) -> Result<ClockSet, ParseError> {
    let records: Vec<ClockRecord> = serde_json::from_str(input)?;
    let mut set = ClockSet::default();
    for (i, record) in records.into_iter().enumerate() {
        let text = record.clock.to_string();
        set.push(i + 1, &text, record.clock, record.label.as_deref())?;
    }
    Ok(set)
}

fn split_label(line: usize, text: &str) -> Result<(Option<&str>, &str), ParseError> {
    let Some(after_open) = text.strip_prefix('(') else {
        return Ok((None, text));
    };
    match after_open.split_once(')') {
        Some((label, rest)) => Ok((Some(label.trim()), rest)),
        None => Err(ParseError::UnclosedLabel { line, text: text.to_owned() }),
    }
}

fn parse_components(line: usize, text: &str, rest: &str) -> Result<VectorClock, ParseError> {
    if rest.trim().is_empty() {
        return Err(ParseError::Empty { line, text: text.to_owned() });
    }
    let components = rest
        .split(',')
        .map(|c| {
            let c = c.trim();
            c.parse::<u64>().map_err(|_| ParseError::InvalidComponent {
                line,
                component: c.to_owned(),
                text: text.to_owned(),
            })
        })
        .collect::<Result<Vec<u64>, _>>()?;
    Ok(VectorClock::from(components))
}
