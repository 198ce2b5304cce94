use std::collections::{BTreeSet, HashSet};

use itertools::Itertools;
use vclock_hasse::{build, maximal, parse, partition, Graph, NodeId, VectorClock};

fn vc<const N: usize>(c: [u64; N]) -> VectorClock {
    VectorClock::from(c)
}

fn set<'a>(clocks: impl IntoIterator<Item = &'a VectorClock>) -> HashSet<&'a VectorClock> {
    clocks.into_iter().collect()
}

fn keys(g: &Graph, ids: &[NodeId]) -> BTreeSet<String> {
    ids.iter().map(|&id| g.node(id).key().to_owned()).collect()
}

fn edges(g: &Graph) -> BTreeSet<(String, String)> {
    g.node_ids()
        .flat_map(|u| {
            g.node(u)
                .successors()
                .iter()
                .map(move |&v| (g.node(u).key().to_owned(), g.node(v).key().to_owned()))
        })
        .collect()
}

#[test]
fn one_dimensional_chain() {
    let g = build(&[vc([1]), vc([2])]).unwrap();
    assert_eq!(edges(&g), BTreeSet::from([("[1]".to_owned(), "[2]".to_owned())]));
    assert_eq!(keys(&g, &g.incoming(&vc([2]))), BTreeSet::from(["[1]".to_owned()]));
    assert!(g.incoming(&vc([1])).is_empty());
    assert_eq!(
        g.to_dot(),
        "digraph {\n  graph [rankdir=LR]\n  node [shape=plaintext]\n  \"[1]\" -> \"[2]\"\n}\n"
    );
}

#[test]
fn two_dimensional_covering_edges() {
    let (c1, c2, c3, c4, c5) = (vc([0, 1]), vc([1, 2]), vc([1, 3]), vc([1, 0]), vc([2, 2]));
    let clocks = [c1.clone(), c2.clone(), c3.clone(), c4.clone(), c5.clone()];
    let expected = edges(&build(&clocks).unwrap());

    for perm in clocks.iter().cloned().permutations(clocks.len()) {
        let g = build(&perm).unwrap();
        assert_eq!(edges(&g), expected);

        let in_c2 = keys(&g, &g.incoming(&c2));
        assert_eq!(in_c2, BTreeSet::from([c1.to_string(), c4.to_string()]));
        let out_c2 = keys(&g, g.node(g.find(&c2).unwrap()).successors());
        assert_eq!(out_c2, BTreeSet::from([c3.to_string(), c5.to_string()]));
    }
}

#[test]
fn antichain_reduction_is_order_independent() {
    let op0 = vc([0, 0, 1]);
    let op1a = vc([1, 0, 0]);
    let op1b = vc([0, 1, 0]);
    let op2c = vc([2, 1, 0]);
    let op2d = vc([1, 2, 0]);
    let op3e = vc([3, 2, 1]);
    let op3f = vc([2, 3, 1]);
    let op4 = vc([4, 3, 1]);
    let clocks = [&op0, &op1a, &op1b, &op2c, &op2d, &op3e, &op3f, &op4];

    let mut seen = 0;
    for perm in clocks.iter().copied().permutations(clocks.len()) {
        let p = partition(perm, &op3e).unwrap();
        assert_eq!(set(p.before.iter().copied()), set([&op0, &op1a, &op1b, &op2c, &op2d]));
        assert_eq!(set(p.concurrent.iter().copied()), set([&op3e, &op3f]));
        assert_eq!(set(p.after.iter().copied()), set([&op4]));

        let latest = maximal(p.before).unwrap();
        assert_eq!(latest.len(), 3);
        assert_eq!(set(latest), set([&op0, &op2c, &op2d]));
        seen += 1;
    }
    assert_eq!(seen, 40_320);
}

#[test]
fn duplicate_clocks_share_a_node() {
    let clocks = [vc([1, 0]), vc([0, 1]), vc([1, 0]), vc([1, 1]), vc([0, 1])];
    let g = build(&clocks).unwrap();
    assert_eq!(g.len(), 3);
    assert_eq!(g.edge_count(), 2);
    assert_eq!(keys(&g, &g.incoming(&vc([1, 1]))), BTreeSet::from(["[0, 1]".to_owned(), "[1, 0]".to_owned()]));
}

#[test]
fn isolated_nodes_are_declared() {
    let g = build(&[vc([1, 0]), vc([0, 1])]).unwrap();
    let dot = g.to_dot();
    assert!(dot.contains("  \"[1, 0]\"\n"));
    assert!(dot.contains("  \"[0, 1]\"\n"));
    assert!(!dot.contains("->"));
}

#[test]
fn labeled_input_end_to_end() {
    let input = "(start) 1, 0\n(left) 2, 0\n(right) 1, 1\n(join) 2, 1\n";
    let set = parse::parse_str(input).unwrap();
    let mut g = build(&set.clocks).unwrap();
    set.apply_labels(&mut g);

    assert_eq!(g.len(), 4);
    assert_eq!(g.edge_count(), 4);
    assert!(!g.contains_cycle());
    let dot = g.to_dot();
    assert!(dot.contains("\"start\\n[1, 0]\" -> \"left\\n[2, 0]\""));
    assert!(dot.contains("\"right\\n[1, 1]\" -> \"join\\n[2, 1]\""));

    let order = g.topological_order().unwrap();
    assert_eq!(g.node(order[0]).key(), "start\n[1, 0]");
    assert_eq!(g.node(order[3]).key(), "join\n[2, 1]");
}
