//! Strongly typed, zero-cost identifier wrappers.
//!
//! Nodes are *named* by strings in layouts and routes; `NodeId` is the dense
//! slot index the network assigns on insertion.  Agents and segments are
//! only ever referred to by their dense ids.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a train in the fleet.  Assigned sequentially on spawn.
    pub struct AgentId(u32);
}

typed_id! {
    /// Slot index of a node inside a `Network`.
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of an undirected track segment inside a `Network`.
    pub struct SegmentId(u32);
}
