//! social-graph-core: In-memory directed social graph.
//!
//! A pure Rust library that keeps users, their directed connections and a
//! flat attribute profile per user, and provides out-degree centrality,
//! top-k ranking and BFS reachability over that store.
//!
//! Mutations report their outcome through return values and `tracing`
//! events. Nothing here prints or installs a subscriber.

mod centrality;
mod error;
mod graph;
mod profile;
mod traversal;

pub use centrality::{degree_centrality, top_k, Centrality};
pub use error::{GraphError, Result};
pub use graph::{ConnectionAdded, SocialGraph, UserAdded, UserId};
pub use profile::{Profile, ProfileValue};
pub use traversal::{bfs, bfs_neighborhood, Reached};
