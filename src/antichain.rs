use crate::clock::{CausalOrder, VectorClock};
use crate::error::ClockError;

/// Returns the maximal ("latest") clocks: an antichain such that every
/// discarded clock happens before one of the kept ones.
///
/// The result is a set. Its order depends on the input order but its
/// contents do not. Repeated clocks are kept once.
pub fn maximal<'a, I>(clocks: I) -> Result<Vec<&'a VectorClock>, ClockError>
where
    I: IntoIterator<Item = &'a VectorClock>,
{
    let mut latest: Vec<&'a VectorClock> = Vec::new();
    'candidates: for candidate in clocks {
        let mut i = 0;
        while i < latest.len() {
            match candidate.compare(latest[i])? {
                // dominated, or already kept
                CausalOrder::Before | CausalOrder::Equal => continue 'candidates,
                CausalOrder::After => {
                    latest.swap_remove(i);
                }
                CausalOrder::Concurrent => i += 1,
            }
        }
        latest.push(candidate);
    }
    Ok(latest)
}
