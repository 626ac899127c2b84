//! Node and edge ids.
//!
//! Both are dense `u32` positions assigned by the graph builder in creation
//! order, so they double as indices into the graph's node and segment
//! vectors.  Ids are only meaningful for the graph that issued them.

use std::fmt;

macro_rules! dense_id {
    ($(#[$attr:meta])* $name:ident, $label:literal) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub u32);

        impl $name {
            /// Placeholder for "not assigned" slots in per-node/per-edge tables.
            pub const INVALID: $name = $name(u32::MAX);

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Id for the `i`-th element.
            ///
            /// # Panics
            /// Panics if `i` does not fit below [`Self::INVALID`].
            #[inline]
            pub fn from_index(i: usize) -> Self {
                match u32::try_from(i) {
                    Ok(n) if n != u32::MAX => $name(n),
                    _ => panic!(concat!($label, " index {} out of range"), i),
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }
    };
}

dense_id! {
    /// A graph node: one per distinct [`NodeKey`](crate::NodeKey).
    NodeId, "node"
}

dense_id! {
    /// A directed unit segment.
    EdgeId, "edge"
}
