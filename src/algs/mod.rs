//! Re-export public algorithms.

pub mod boundary;
pub mod cleanup;
pub mod dual_edge_groups;

pub use boundary::{boundary_loops, classify_boundary_vertices};
pub use cleanup::{clean, cull_vertices, weld};
pub use dual_edge_groups::dual_edge_groups;
