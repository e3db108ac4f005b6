use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

pub mod generator;
pub use generator::IdGenerator;
pub mod selection;
pub use selection::{Selection, SelectionState};

/// Declares a strongly typed string identifier.
///
/// Ids stay plain strings on the wire so layouts written by other tools load
/// unchanged, but a `WallId` can never be passed where a `NodeId` is expected.
macro_rules! plan_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

plan_id!(
    /// Identifier of a graph vertex (wall corner).
    NodeId
);
plan_id!(
    /// Identifier of a wall, door or window segment.
    WallId
);
plan_id!(
    /// Identifier of a detected room.
    AreaId
);
plan_id!(FloorId);
plan_id!(LayoutId);
