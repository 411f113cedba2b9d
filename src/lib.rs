//! # mesh-pattern
//!
//! mesh-pattern is a local topology-editing engine for polygonal, mostly
//! quadrilateral, surface meshes. It is the combinatorial core of a
//! pattern-design pipeline: a mesh comes in from patch decomposition, is
//! edited with reversible local operators until it is an all-quad control
//! mesh, and goes back out to rendering or CAD.
//!
//! ## Features
//! - A halfedge-style adjacency store ([`topology::mesh::PolyMesh`]) with
//!   stable vertex and face handles
//! - Face-strip extraction ([`algs::dual_edge_groups`])
//! - Grammar rules that turn pentagons, hexagons and quads back into quads
//!   ([`topology::grammar`])
//! - Strip collapse and subdivision with boundary and loop handling
//!   ([`topology::face_strip`])
//! - Welding and culling after batch edits ([`algs::cleanup`])
//!
//! ## Usage
//!
//! ```rust
//! use mesh_pattern::prelude::*;
//!
//! let mut mesh = PolyMesh::from_vertices_and_faces(
//!     &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
//!     &[vec![0, 1, 2, 3]],
//! )
//! .unwrap();
//! let report = subdivide(&mut mesh, VertexId::new(0), VertexId::new(1)).unwrap();
//! assert_eq!(report.faces_after, 2);
//! assert!(mesh.is_quadmesh());
//! ```
//!
//! ## Invariant checks
//! Operators validate the adjacency store after every commit in debug builds
//! (see [`DebugInvariants`]). Enable the `strict-invariants` feature to keep
//! the checks in release builds.
//!
//! The library logs through the [`log`] facade and never installs a logger.

pub mod algs;
pub mod debug_invariants;
pub mod geometry;
pub mod mesh_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::cleanup::{WeldOptions, clean, cull_vertices, weld};
    pub use crate::algs::dual_edge_groups::{DualEdgeGroups, dual_edge_groups};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::geometry::Point3;
    pub use crate::mesh_error::MeshPatternError;
    pub use crate::topology::face_strip::{
        FaceStripOptions, PropagationState, StripEditReport, TerminalCause, collapse,
        collapse_with, merge, subdivide, subdivide_with,
    };
    pub use crate::topology::grammar::{GrammarRule, RuleOutcome};
    pub use crate::topology::mesh::PolyMesh;
    pub use crate::topology::point::{FaceId, VertexId};
}
