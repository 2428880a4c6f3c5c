use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::graph::{SocialGraph, UserId};

/// Out-degree per user. Derived on demand, never stored in the graph.
pub type Centrality = HashMap<UserId, usize>;

/// Out-degree of every added user, including users with no connections.
/// Neighbor-only ids are not keys.
pub fn degree_centrality(graph: &SocialGraph) -> Centrality {
    graph
        .adjacency()
        .iter()
        .map(|(user, neighbors)| (user.clone(), neighbors.len()))
        .collect()
}

/// The `k` users with the highest degree, descending.
///
/// Equal degrees come out in ascending user id order. That order falls out
/// of the heap key `(degree, Reverse(id))` and should not be relied on.
pub fn top_k(centrality: &Centrality, k: usize) -> Vec<(UserId, usize)> {
    let take = k.min(centrality.len());
    if take == 0 {
        return Vec::new();
    }

    let mut heap: BinaryHeap<(usize, Reverse<&UserId>)> = centrality
        .iter()
        .map(|(user, &degree)| (degree, Reverse(user)))
        .collect();

    let mut ranked = Vec::with_capacity(take);
    while ranked.len() < take {
        let Some((degree, Reverse(user))) = heap.pop() else {
            break;
        };
        ranked.push((user.clone(), degree));
    }
    ranked
}
