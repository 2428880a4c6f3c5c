use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::{debug, warn};

use crate::error::{GraphError, Result};
use crate::profile::{self, Profile, ProfileValue};

/// Opaque user identifier. Equality is exact match.
pub type UserId = String;

/// Outcome of [`SocialGraph::add_user`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAdded {
    Added,
    AlreadyExists,
}

/// Outcome of a successful [`SocialGraph::add_connection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionAdded {
    Added,
    /// The edge was already present; the neighbor set is unchanged.
    AlreadyPresent,
}

/// Directed social graph: out-neighbor sets + per-user profiles.
///
/// Every key of `adjacency` is an added user and has a profile. Neighbor
/// values are not required to be keys, so lookups on them fall back to an
/// empty set.
#[derive(Debug, Clone, Default)]
pub struct SocialGraph {
    adjacency: HashMap<UserId, HashSet<UserId>>,
    profiles: HashMap<UserId, Profile>,
}

impl SocialGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for a known user count.
    pub fn with_capacity(user_count: usize) -> Self {
        Self {
            adjacency: HashMap::with_capacity(user_count),
            profiles: HashMap::with_capacity(user_count),
        }
    }

    /// Register a user with no connections and an empty profile.
    /// Re-adding an existing user changes nothing.
    pub fn add_user(&mut self, id: impl Into<UserId>) -> UserAdded {
        let id = id.into();
        if self.adjacency.contains_key(&id) {
            debug!(user = %id, "user already exists");
            return UserAdded::AlreadyExists;
        }
        self.profiles.insert(id.clone(), Profile::new());
        self.adjacency.insert(id.clone(), HashSet::new());
        debug!(user = %id, "user added");
        UserAdded::Added
    }

    /// Add the directed edge `from -> to`. Both users must already exist.
    pub fn add_connection(&mut self, from: &str, to: &str) -> Result<ConnectionAdded> {
        if !self.adjacency.contains_key(to) {
            return Err(self.missing_endpoint(from, to));
        }
        let Some(neighbors) = self.adjacency.get_mut(from) else {
            return Err(self.missing_endpoint(from, to));
        };

        if neighbors.insert(to.to_string()) {
            debug!(from, to, "connection added");
            Ok(ConnectionAdded::Added)
        } else {
            debug!(from, to, "connection already present");
            Ok(ConnectionAdded::AlreadyPresent)
        }
    }

    fn missing_endpoint(&self, from: &str, to: &str) -> GraphError {
        warn!(
            from,
            to,
            from_exists = self.contains_user(from),
            to_exists = self.contains_user(to),
            "both users must exist to create a connection"
        );
        GraphError::MissingEndpoint {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Shallow-merge attributes into a user's profile: new keys are added,
    /// existing keys overwritten, everything else kept.
    pub fn merge_profile<I, K, V>(&mut self, id: &str, attributes: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ProfileValue>,
    {
        let Some(profile) = self.profiles.get_mut(id) else {
            warn!(user = id, "profile merge on unknown user");
            return Err(GraphError::UserNotFound(id.to_string()));
        };

        let before = profile.len();
        profile.extend(attributes.into_iter().map(|(k, v)| (k.into(), v.into())));
        debug!(
            user = id,
            new_keys = profile.len() - before,
            "profile updated"
        );
        Ok(())
    }

    /// Profile for `id`, or `None` if the user was never added.
    pub fn get_profile(&self, id: &str) -> Option<&Profile> {
        self.profiles.get(id)
    }

    pub fn contains_user(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
    }

    /// Iterate added users in arbitrary order.
    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }

    /// Out-neighbors of `id`. Unknown ids have none.
    pub fn neighbors_out(&self, id: &str) -> impl Iterator<Item = &str> {
        self.adjacency
            .get(id)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Number of out-neighbors of `id`, 0 for unknown ids.
    pub fn out_degree(&self, id: &str) -> usize {
        self.adjacency.get(id).map_or(0, HashSet::len)
    }

    pub fn user_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn connection_count(&self) -> usize {
        self.adjacency.values().map(HashSet::len).sum()
    }

    pub(crate) fn adjacency(&self) -> &HashMap<UserId, HashSet<UserId>> {
        &self.adjacency
    }

    /// Edge whose target is not a user. Not reachable through the public API.
    #[cfg(test)]
    pub(crate) fn insert_dangling_edge(&mut self, from: &str, to: &str) {
        self.adjacency
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string());
    }

    fn sorted_users(&self) -> Vec<&UserId> {
        let mut users: Vec<&UserId> = self.adjacency.keys().collect();
        users.sort();
        users
    }
}

/// Debug rendering: users, connections and profiles, one section per line,
/// everything in ascending id order.
impl fmt::Display for SocialGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let users = self.sorted_users();

        write!(f, "Users: [")?;
        for (i, user) in users.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", user)?;
        }
        writeln!(f, "]")?;

        write!(f, "Connections: {{")?;
        for (i, user) in users.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            let mut neighbors: Vec<&str> = self.neighbors_out(user).collect();
            neighbors.sort_unstable();
            write!(f, "{:?}: {:?}", user, neighbors)?;
        }
        writeln!(f, "}}")?;

        write!(f, "Profiles: {{")?;
        for (i, user) in users.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}: ", user)?;
            match self.profiles.get(user.as_str()) {
                Some(p) => profile::write_profile(f, p)?,
                None => write!(f, "{{}}")?,
            }
        }
        write!(f, "}}")
    }
}
