//! `VertexId` and `FaceId`: strong, zero-cost handles for mesh entities
//!
//! Vertices and faces live in arenas owned by [`PolyMesh`](crate::topology::mesh::PolyMesh)
//! and are addressed by stable integer keys. Wrapping the key in a newtype
//! keeps vertex and face handles from being mixed up at compile time while
//! staying exactly the size of a `usize`.
//!
//! This module provides:
//! - Transparent newtypes around `usize` for vertex and face keys.
//! - Implementations of common traits (`Debug`, `Display`, ordering,
//!   hashing, serde) so handles can be used in maps, sets, and printed easily.

use std::fmt;

macro_rules! mesh_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
        )]
        #[repr(transparent)]
        pub struct $name(usize);

        impl $name {
            /// Wraps a raw key.
            #[inline]
            pub const fn new(raw: usize) -> Self {
                $name(raw)
            }

            /// Returns the raw key.
            #[inline]
            pub const fn get(self) -> usize {
                self.0
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(raw: usize) -> Self {
                $name(raw)
            }
        }

        /// Displays as `Name(raw_value)`.
        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.0).finish()
            }
        }

        /// Prints only the raw integer.
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

mesh_handle! {
    /// Handle of a vertex in a [`PolyMesh`](crate::topology::mesh::PolyMesh).
    ///
    /// # Example
    ///
    /// ```rust
    /// # use mesh_pattern::topology::point::VertexId;
    /// let v = VertexId::new(3);
    /// assert_eq!(v.get(), 3);
    /// ```
    VertexId
}

mesh_handle! {
    /// Handle of a face in a [`PolyMesh`](crate::topology::mesh::PolyMesh).
    ///
    /// Faces keep their handle across delete/re-add cycles, so external
    /// references tracking a face by id survive topology-preserving edits.
    FaceId
}
