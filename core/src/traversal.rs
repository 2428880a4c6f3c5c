use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, warn};

use crate::error::{GraphError, Result};
use crate::graph::{SocialGraph, UserId};

/// A user found during a depth-bounded BFS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reached {
    pub user: UserId,
    pub distance: u32,
}

fn check_start(graph: &SocialGraph, start: &str) -> Result<()> {
    if graph.contains_user(start) {
        Ok(())
    } else {
        warn!(user = start, "bfs start user not found");
        Err(GraphError::UserNotFound(start.to_string()))
    }
}

/// All users reachable from `start` along directed edges, `start` included.
///
/// Neighbors that were never added as users are reached but expand to
/// nothing. Fails if `start` itself was never added; callers wanting the
/// empty reachable set can use `unwrap_or_default()`.
pub fn bfs(graph: &SocialGraph, start: &str) -> Result<HashSet<UserId>> {
    check_start(graph, start)?;

    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();

    visited.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for neighbor in graph.neighbors_out(current) {
            if visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    debug!(user = start, reachable = visited.len(), "bfs complete");
    Ok(visited.into_iter().map(str::to_string).collect())
}

/// BFS neighborhood: users reachable from `start` within `max_depth` hops,
/// each at its minimum distance. `start` is not part of the result.
///
/// Sorted by distance, then user id.
pub fn bfs_neighborhood(graph: &SocialGraph, start: &str, max_depth: u32) -> Result<Vec<Reached>> {
    check_start(graph, start)?;

    let mut visited: HashMap<&str, u32> = HashMap::new();
    let mut queue: VecDeque<(&str, u32)> = VecDeque::new();

    visited.insert(start, 0);
    queue.push_back((start, 0));

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }

        for neighbor in graph.neighbors_out(current) {
            if !visited.contains_key(neighbor) {
                visited.insert(neighbor, depth + 1);
                queue.push_back((neighbor, depth + 1));
            }
        }
    }

    let mut reached: Vec<Reached> = visited
        .into_iter()
        .filter(|&(user, _)| user != start)
        .map(|(user, distance)| Reached {
            user: user.to_string(),
            distance,
        })
        .collect();
    reached.sort_by(|a, b| a.distance.cmp(&b.distance).then_with(|| a.user.cmp(&b.user)));

    Ok(reached)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(users: &[&str]) -> HashSet<UserId> {
        users.iter().map(|u| u.to_string()).collect()
    }

    fn make_chain(n: usize) -> SocialGraph {
        let mut g = SocialGraph::new();
        for i in 0..n {
            g.add_user(format!("u{}", i));
        }
        for i in 0..n - 1 {
            g.add_connection(&format!("u{}", i), &format!("u{}", i + 1))
                .unwrap();
        }
        g
    }

    fn make_star(leaves: usize) -> SocialGraph {
        let mut g = SocialGraph::new();
        g.add_user("hub");
        for i in 0..leaves {
            let leaf = format!("leaf{}", i);
            g.add_user(leaf.as_str());
            g.add_connection("hub", &leaf).unwrap();
        }
        g
    }

    /// A -> B -> C -> A, plus B -> D where D is only a neighbor, never added.
    fn make_cycle_with_sink() -> SocialGraph {
        let mut g = SocialGraph::new();
        for u in ["A", "B", "C"] {
            g.add_user(u);
        }
        g.add_connection("A", "B").unwrap();
        g.add_connection("B", "C").unwrap();
        g.add_connection("C", "A").unwrap();
        g.insert_dangling_edge("B", "D");
        g
    }

    // --- bfs ---

    #[test]
    fn test_bfs_cycle_with_sink() {
        let g = make_cycle_with_sink();
        assert_eq!(bfs(&g, "A").unwrap(), set(&["A", "B", "C", "D"]));
        assert!(!g.contains_user("D"));
        // D is a sink, not a user: it cannot be a start.
        assert!(bfs(&g, "D").is_err());
    }

    #[test]
    fn test_bfs_missing_start() {
        let g = make_cycle_with_sink();
        assert_eq!(bfs(&g, "Z"), Err(GraphError::UserNotFound("Z".into())));
        assert!(bfs(&g, "Z").unwrap_or_default().is_empty());
    }

    #[test]
    fn test_bfs_empty_graph() {
        let g = SocialGraph::new();
        assert!(bfs(&g, "anyone").is_err());
    }

    #[test]
    fn test_bfs_isolated_user() {
        let mut g = SocialGraph::new();
        g.add_user("solo");
        assert_eq!(bfs(&g, "solo").unwrap(), set(&["solo"]));
    }

    #[test]
    fn test_bfs_directed_only() {
        let g = make_chain(5);
        assert_eq!(bfs(&g, "u0").unwrap().len(), 5);
        assert_eq!(bfs(&g, "u3").unwrap(), set(&["u3", "u4"]));
        assert_eq!(bfs(&g, "u4").unwrap(), set(&["u4"]));
    }

    #[test]
    fn test_bfs_self_loop() {
        let mut g = SocialGraph::new();
        g.add_user("me");
        g.add_connection("me", "me").unwrap();
        assert_eq!(bfs(&g, "me").unwrap(), set(&["me"]));
    }

    #[test]
    fn test_bfs_star() {
        let g = make_star(50);
        assert_eq!(bfs(&g, "hub").unwrap().len(), 51);
        assert_eq!(bfs(&g, "leaf7").unwrap(), set(&["leaf7"]));
    }

    // --- bfs_neighborhood ---

    #[test]
    fn test_neighborhood_chain_distances() {
        let g = make_chain(6);
        let result = bfs_neighborhood(&g, "u0", 10).unwrap();
        assert_eq!(result.len(), 5);
        for (i, r) in result.iter().enumerate() {
            assert_eq!(r.user, format!("u{}", i + 1));
            assert_eq!(r.distance, i as u32 + 1);
        }
    }

    #[test]
    fn test_neighborhood_depth_limited() {
        let g = make_chain(10);
        let result = bfs_neighborhood(&g, "u0", 3).unwrap();
        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|r| r.distance <= 3));
    }

    #[test]
    fn test_neighborhood_depth_zero() {
        let g = make_chain(5);
        assert!(bfs_neighborhood(&g, "u0", 0).unwrap().is_empty());
    }

    #[test]
    fn test_neighborhood_minimum_distance_in_cycle() {
        let g = make_cycle_with_sink();
        let result = bfs_neighborhood(&g, "A", 100).unwrap();
        assert_eq!(
            result,
            vec![
                Reached { user: "B".into(), distance: 1 },
                Reached { user: "C".into(), distance: 2 },
                Reached { user: "D".into(), distance: 2 },
            ]
        );
    }

    #[test]
    fn test_neighborhood_star_sorted() {
        let g = make_star(3);
        let users: Vec<String> = bfs_neighborhood(&g, "hub", 1)
            .unwrap()
            .into_iter()
            .map(|r| r.user)
            .collect();
        assert_eq!(users, vec!["leaf0", "leaf1", "leaf2"]);
    }

    #[test]
    fn test_neighborhood_missing_start() {
        let g = make_chain(3);
        assert_eq!(
            bfs_neighborhood(&g, "nope", 5),
            Err(GraphError::UserNotFound("nope".into()))
        );
    }
}
