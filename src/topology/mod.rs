//! Mesh topology: handles, the adjacency store and local editing operators.
//!
//! This module provides:
//! - [`point`]: `VertexId` / `FaceId` handles
//! - [`mesh`]: the [`PolyMesh`] adjacency store
//! - [`grammar`]: degree-dispatched local rewrite rules
//! - [`face_strip`]: collapse/subdivide of whole face strips
//! - [`validation`]: structural invariant checks

pub mod face_strip;
pub mod grammar;
pub mod mesh;
pub mod point;
pub mod validation;

pub use grammar::{GrammarRule, RuleOutcome};
pub use mesh::PolyMesh;
pub use point::{FaceId, VertexId};

#[cfg(test)]
mod tests;
