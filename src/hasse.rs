use ordermap::OrderSet;
use tracing::{debug, info};

use crate::antichain::maximal;
use crate::clock::{check_dimensions, VectorClock};
use crate::error::ClockError;
use crate::graph::Graph;
use crate::partition::partition;

/// Builds the Hasse diagram of `clocks`: an edge `p -> c` for every `p`
/// that happens before `c` with no other input clock in between.
///
/// Equal clocks collapse into one node. Fails before building anything if
/// the clocks do not all share one dimension.
pub fn build(clocks: &[VectorClock]) -> Result<Graph, ClockError> {
    check_dimensions(clocks)?;
    let distinct: OrderSet<&VectorClock> = clocks.iter().collect();
    let mut graph = Graph::with_capacity(distinct.len());

    for &clock in &distinct {
        let before = partition(distinct.iter().copied(), clock)?.before;
        let immediately_before = maximal(before)?;

        let node = graph.find_or_add(clock.clone());
        for &prev in &immediately_before {
            let other = graph.find_or_add(prev.clone());
            graph.add_edge(other, node);
        }
        debug!(clock = %clock, predecessors = immediately_before.len(), "linked clock");
    }

    assert_eq!(graph.len(), distinct.len(), "graph node count diverged from distinct clocks");
    info!(nodes = graph.len(), edges = graph.edge_count(), "built hasse diagram");
    Ok(graph)
}
