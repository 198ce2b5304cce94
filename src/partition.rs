use tracing::trace;

use crate::clock::{CausalOrder, VectorClock};
use crate::error::ClockError;

/// Clocks split by how they relate to a pivot. Each side keeps input order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Partition<'a> {
    pub before: Vec<&'a VectorClock>,
    /// Incomparable with the pivot, including clocks equal to it.
    pub concurrent: Vec<&'a VectorClock>,
    pub after: Vec<&'a VectorClock>,
}

/// Single pass over `clocks`, sorting each one into before/concurrent/after
/// relative to `pivot`.
pub fn partition<'a, I>(clocks: I, pivot: &VectorClock) -> Result<Partition<'a>, ClockError>
where
    I: IntoIterator<Item = &'a VectorClock>,
{
    let mut out = Partition::default();
    for clock in clocks {
        match clock.compare(pivot)? {
            CausalOrder::Before => out.before.push(clock),
            CausalOrder::After => out.after.push(clock),
            CausalOrder::Equal | CausalOrder::Concurrent => out.concurrent.push(clock),
        }
    }
    trace!(
        pivot = %pivot,
        before = out.before.len(),
        concurrent = out.concurrent.len(),
        after = out.after.len(),
        "partitioned clocks"
    );
    Ok(out)
}
