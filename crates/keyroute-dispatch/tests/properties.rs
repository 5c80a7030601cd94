//! Property tests: sequential dispatch always picks a cheapest server with
//! remaining capacity, and never grants more than a key's cap.

use std::collections::HashMap;

use keyroute_dispatch::{Coordinator, DispatchConfig, Error};
use keyroute_fleet::Fleet;
use keyroute_topology::{nearest_matching, Topology};
use proptest::prelude::*;

const NODES: [&str; 5] = ["A", "B", "C", "D", "E"];

fn topology() -> Topology {
    // E hangs off D by a directed edge only.
    Topology::from_adjacency([
        ("A", vec![("B", 10.0), ("C", 5.0)]),
        ("B", vec![("A", 10.0), ("C", 2.0), ("D", 1.0)]),
        ("C", vec![("A", 5.0), ("B", 2.0), ("D", 9.0)]),
        ("D", vec![("B", 1.0), ("C", 9.0), ("E", 4.0)]),
        ("E", vec![]),
    ])
    .unwrap()
}

fn pairwise(topology: &Topology) -> HashMap<(&'static str, &'static str), f64> {
    let mut dist = HashMap::new();
    for from in NODES {
        for to in NODES {
            if let Some(hit) = nearest_matching(topology, from, |id| id == to).unwrap() {
                dist.insert((from, to), hit.distance);
            }
        }
    }
    dist
}

proptest! {
    #[test]
    fn sequential_dispatch_is_greedy_and_capped(
        caps in prop::collection::vec(0u32..4, NODES.len()),
        origins in prop::collection::vec(0usize..NODES.len(), 1..30),
    ) {
        let topology = topology();
        let dist = pairwise(&topology);

        let mut fleet = Fleet::from_ids(NODES).unwrap();
        let mut remaining: HashMap<&str, u32> = HashMap::new();
        for (node, &cap) in NODES.iter().zip(&caps) {
            if cap > 0 {
                fleet.add_key(node, "k", cap).unwrap();
            }
            remaining.insert(*node, cap);
        }

        let c = Coordinator::with_config(
            topology,
            fleet,
            DispatchConfig::default().with_timestamps(false),
        );

        for (i, &o) in origins.iter().enumerate() {
            let origin = NODES[o];
            let best = NODES
                .iter()
                .filter(|n| remaining[*n] > 0)
                .filter_map(|n| dist.get(&(origin, *n)).copied())
                .min_by(f64::total_cmp);

            match (best, c.assign_key(&format!("T{i}"), origin)) {
                (None, Err(Error::NoServerReachable { .. })) => {}
                (Some(best), Ok(a)) => {
                    let server = NODES.iter().copied().find(|n| *n == a.server_id).unwrap();
                    prop_assert_eq!(a.distance, best);
                    prop_assert_eq!(dist[&(origin, server)], best);
                    let left = remaining.get_mut(server).unwrap();
                    prop_assert!(*left > 0);
                    *left -= 1;
                }
                (best, outcome) => {
                    prop_assert!(false, "expected {:?}, got {:?}", best, outcome);
                }
            }
        }

        let granted = c.audit_log().len() as u32;
        let total: u32 = caps.iter().sum();
        prop_assert!(granted <= total);
        for (i, node) in NODES.into_iter().enumerate() {
            let used = c.audit_log().for_server(node).len() as u32;
            prop_assert_eq!(used + remaining[node], caps[i]);
        }
    }
}
