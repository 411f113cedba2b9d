//! Geometry utilities for mesh-pattern.
//!
//! The topology core only needs a handful of point operations: midpoints for
//! inserted vertices, distances for welding, and centroids/areas for callers
//! that redisplay the mesh.

pub mod metrics;

pub use metrics::Point3;
