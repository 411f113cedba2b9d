//! MeshPatternError: Unified error type for mesh-pattern public APIs
//!
//! Every fallible operation in the crate returns this error instead of
//! panicking. Operators check their preconditions before touching the mesh, so
//! receiving an error always means the mesh is unchanged.

use thiserror::Error;

use crate::topology::point::{FaceId, VertexId};

/// Unified error type for mesh-pattern operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshPatternError {
    /// A vertex handle that is not (or no longer) part of the mesh.
    #[error("Unknown vertex `{0}`")]
    UnknownVertex(VertexId),
    /// A face handle that is not (or no longer) part of the mesh.
    #[error("Unknown face `{0}`")]
    UnknownFace(FaceId),
    /// A face loop with fewer than three vertices.
    #[error("Face loop must have at least 3 vertices, got {0}")]
    DegenerateFace(usize),
    /// A face loop visiting the same vertex twice.
    #[error("Face loop visits vertex `{0}` more than once")]
    RepeatedVertex(VertexId),
    /// Adding the face would map an already mapped directed edge a second time.
    #[error("Directed edge ({from} -> {to}) already belongs to face `{face}`")]
    DirectedEdgeInUse {
        from: VertexId,
        to: VertexId,
        face: FaceId,
    },
    /// An explicitly requested face key is already taken.
    #[error("Face key `{0}` is already in use")]
    FaceKeyInUse(FaceId),
    /// A vertex still referenced by faces cannot be deleted.
    #[error("Vertex `{vertex}` is still referenced by {faces} face(s)")]
    VertexInUse { vertex: VertexId, faces: usize },
    /// The reference vertex handed to a rewrite does not lie on the face.
    #[error("Vertex `{vertex}` is not on the boundary loop of face `{face}`")]
    VertexNotOnFace { face: FaceId, vertex: VertexId },
    /// A grammar rule was applied to a face of the wrong degree.
    #[error("Rule `{rule}` expects a face of degree {expected}, face `{face}` has degree {found}")]
    RuleDegreeMismatch {
        rule: &'static str,
        face: FaceId,
        expected: usize,
        found: usize,
    },
    /// A quad-only operator was invoked on a mesh with non-quad faces.
    #[error("Operator requires an all-quad mesh ({non_quads} non-quad face(s) found)")]
    NotQuadMesh { non_quads: usize },
    /// The selected vertex pair is not an edge of the mesh.
    #[error("({0}, {1}) is not an edge of the mesh")]
    NotAnEdge(VertexId, VertexId),
    /// The operation exists in the interface but has no defined algorithm.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
    /// Weld tolerance must be finite and strictly positive.
    #[error("Invalid weld tolerance {0}: must be finite and > 0")]
    InvalidTolerance(f64),
    /// A structural invariant of the adjacency store does not hold.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}
