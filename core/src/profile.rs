use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-user attribute bag. Keys are kept ordered so rendering is stable.
pub type Profile = BTreeMap<String, ProfileValue>;

/// A single scalar profile attribute.
///
/// Untagged on the wire: `"Alice"`, `42`, `4.5` and `true` map directly to
/// the matching variant. Integers outside the `i64` range do not fit `Int`
/// and come back as a lossy `Float`; store such ids as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfileValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for ProfileValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileValue::Bool(b) => write!(f, "{}", b),
            ProfileValue::Int(i) => write!(f, "{}", i),
            ProfileValue::Float(x) => write!(f, "{:?}", x),
            ProfileValue::Str(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<&str> for ProfileValue {
    fn from(s: &str) -> Self {
        ProfileValue::Str(s.to_string())
    }
}

impl From<String> for ProfileValue {
    fn from(s: String) -> Self {
        ProfileValue::Str(s)
    }
}

impl From<i64> for ProfileValue {
    fn from(i: i64) -> Self {
        ProfileValue::Int(i)
    }
}

impl From<i32> for ProfileValue {
    fn from(i: i32) -> Self {
        ProfileValue::Int(i64::from(i))
    }
}

impl From<f64> for ProfileValue {
    fn from(x: f64) -> Self {
        ProfileValue::Float(x)
    }
}

impl From<bool> for ProfileValue {
    fn from(b: bool) -> Self {
        ProfileValue::Bool(b)
    }
}

/// Render a profile as `{key: value, ...}` in key order.
pub(crate) fn write_profile(f: &mut fmt::Formatter<'_>, profile: &Profile) -> fmt::Result {
    write!(f, "{{")?;
    for (i, (key, value)) in profile.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{:?}: {}", key, value)?;
    }
    write!(f, "}}")
}
