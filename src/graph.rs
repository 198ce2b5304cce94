use std::fmt::{self, Write as _};
use std::io;

use ordermap::OrderMap;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::clock::VectorClock;

/// Index of a node in its graph's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a node displays: the clock it was built from, or a label set later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeValue {
    Clock(VectorClock),
    Text(String),
}

impl fmt::Display for NodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeValue::Clock(clock) => fmt::Display::fmt(clock, f),
            NodeValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<VectorClock> for NodeValue {
    fn from(clock: VectorClock) -> Self {
        NodeValue::Clock(clock)
    }
}

impl From<String> for NodeValue {
    fn from(text: String) -> Self {
        NodeValue::Text(text)
    }
}

impl From<&str> for NodeValue {
    fn from(text: &str) -> Self {
        NodeValue::Text(text.to_owned())
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    value: NodeValue,
    key: String,
    successors: Vec<NodeId>,
}

impl Node {
    pub fn value(&self) -> &NodeValue {
        &self.value
    }

    /// Canonical string of the current value.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn successors(&self) -> &[NodeId] {
        &self.successors
    }
}

/// Directed graph keyed by the canonical string of each node's value.
///
/// Nodes live in an append-only arena and edges are arena indices, so
/// relabeling a node only touches the key index.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// key -> arena index
    index: OrderMap<String, NodeId>,
    nodes: Vec<Node>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self { index: OrderMap::with_capacity(n), nodes: Vec::with_capacity(n) }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.successors.len()).sum()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Panics if a node with the same key already exists.
    pub fn add_node(&mut self, value: impl Into<NodeValue>) -> NodeId {
        let value = value.into();
        let key = value.to_string();
        assert!(!self.index.contains_key(&key), "duplicate graph node {key:?}");
        let id = NodeId(self.nodes.len());
        self.index.insert(key.clone(), id);
        self.nodes.push(Node { value, key, successors: Vec::new() });
        id
    }

    pub fn find_or_add(&mut self, value: impl Into<NodeValue>) -> NodeId {
        let value = value.into();
        if let Some(id) = self.find(&value) {
            return id;
        }
        self.add_node(value)
    }

    pub fn find<V: fmt::Display + ?Sized>(&self, value: &V) -> Option<NodeId> {
        self.index.get(&value.to_string()).copied()
    }

    /// Adds `from -> to`. Both ids must belong to this graph.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) {
        assert!(to.0 < self.nodes.len(), "edge target {to:?} is not in the graph");
        assert!(from.0 < self.nodes.len(), "edge source {from:?} is not in the graph");
        self.nodes[from.0].successors.push(to);
    }

    /// Replaces the value (and key) of `id` in place. Edges are untouched.
    ///
    /// Panics if the index no longer maps the node's key to it, or if the new
    /// key belongs to another node.
    pub fn relabel(&mut self, id: NodeId, value: impl Into<NodeValue>) {
        let value = value.into();
        let new_key = value.to_string();
        let old_key = &self.nodes[id.0].key;
        assert_eq!(self.index.get(old_key), Some(&id), "stale graph key {old_key:?}");
        if let Some(&owner) = self.index.get(&new_key) {
            assert_eq!(owner, id, "relabel collides with existing node {new_key:?}");
        }

        let old_key = std::mem::replace(&mut self.nodes[id.0].key, new_key.clone());
        self.index.remove(&old_key);
        self.index.insert(new_key, id);
        self.nodes[id.0].value = value;
    }

    /// Nodes with an edge into the node for `value`. Empty if there is no
    /// such node.
    pub fn incoming<V: fmt::Display + ?Sized>(&self, value: &V) -> Vec<NodeId> {
        let Some(target) = self.find(value) else {
            return Vec::new();
        };
        let mut sources = Vec::new();
        for (i, node) in self.nodes.iter().enumerate() {
            for &to in &node.successors {
                if to == target {
                    sources.push(NodeId(i));
                }
            }
        }
        sources
    }

    /// Three-colour depth-first search, restarted from every unvisited node.
    pub fn contains_cycle(&self) -> bool {
        let mut marks = vec![Mark::Unvisited; self.nodes.len()];
        for root in 0..self.nodes.len() {
            if marks[root] != Mark::Unvisited {
                continue;
            }
            // (node, next successor to explore)
            let mut stack = vec![(root, 0usize)];
            marks[root] = Mark::OnStack;
            while let Some(top) = stack.last_mut() {
                let n = top.0;
                match self.nodes[n].successors.get(top.1) {
                    Some(&child) => {
                        top.1 += 1;
                        match marks[child.0] {
                            Mark::OnStack => return true,
                            Mark::Unvisited => {
                                marks[child.0] = Mark::OnStack;
                                stack.push((child.0, 0));
                            }
                            Mark::Done => {}
                        }
                    }
                    None => {
                        marks[n] = Mark::Done;
                        stack.pop();
                    }
                }
            }
        }
        false
    }

    /// Copy of the graph as a petgraph `DiGraph` whose node weights are keys.
    /// Node indices match `NodeId`s.
    pub fn to_petgraph(&self) -> DiGraph<String, ()> {
        let mut g = DiGraph::with_capacity(self.nodes.len(), self.edge_count());
        let ixs: Vec<NodeIndex> = self.nodes.iter().map(|n| g.add_node(n.key.clone())).collect();
        for (u, node) in self.nodes.iter().enumerate() {
            for &v in &node.successors {
                g.add_edge(ixs[u], ixs[v.0], ());
            }
        }
        g
    }

    /// One linear extension of the graph, sources first.
    /// Returns Err with a node on a cycle if there is none.
    pub fn topological_order(&self) -> Result<Vec<NodeId>, NodeId> {
        let g = self.to_petgraph();
        match toposort(&g, None) {
            Ok(order) => Ok(order.into_iter().map(|ix| NodeId(ix.index())).collect()),
            Err(cycle) => Err(NodeId(cycle.node_id().index())),
        }
    }

    /// Graphviz dot text: every edge, plus every node without any edge so it
    /// still shows up.
    pub fn to_dot(&self) -> String {
        let mut has_incoming = vec![false; self.nodes.len()];
        for node in &self.nodes {
            for &to in &node.successors {
                has_incoming[to.0] = true;
            }
        }

        let mut out = String::new();
        out.push_str("digraph {\n");
        out.push_str("  graph [rankdir=LR]\n");
        out.push_str("  node [shape=plaintext]\n");
        for (i, node) in self.nodes.iter().enumerate() {
            for &to in &node.successors {
                let _ = writeln!(out, "  {} -> {}", quote(&node.key), quote(&self.nodes[to.0].key));
            }
            if node.successors.is_empty() && !has_incoming[i] {
                let _ = writeln!(out, "  {}", quote(&node.key));
            }
        }
        out.push_str("}\n");
        out
    }

    pub fn write_dot<W: io::Write>(&self, mut w: W) -> io::Result<()> {
        w.write_all(self.to_dot().as_bytes())
    }
}

/// Double-quoted with escapes for quotes, backslashes and control characters.
fn quote(s: &str) -> String {
    format!("{s:?}")
}
