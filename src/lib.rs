//! # vclock_hasse
//!
//! Draws the happens-before order of a set of vector clocks as its Hasse
//! diagram: the minimal directed graph whose edges are exactly the covering
//! pairs of the order.
//!
//! Clocks are split around each other ([`partition`]), the latest clocks
//! before each one are kept ([`maximal`]), and those become its incoming
//! edges ([`build`]). The resulting [`Graph`] serializes to Graphviz dot.
mod antichain;
mod clock;
pub mod error;
mod graph;
mod hasse;
pub mod parse;
mod partition;

pub use antichain::maximal;
pub use clock::{check_dimensions, CausalOrder, VectorClock};
pub use error::{ClockError, ParseError};
pub use graph::{Graph, Node, NodeId, NodeValue};
pub use hasse::build;
pub use partition::{partition, Partition};
