//! Face-strip batch operators.
//!
//! A face strip is the band of quads crossed by one dual edge group (see
//! [`crate::algs::dual_edge_groups`]). The operators here edit a whole strip
//! at once:
//!
//! - [`collapse`] removes the strip and fuses its two sides;
//! - [`subdivide`] splits every quad of the strip in two, propagating the split
//!   across the strip with grammar rules;
//! - [`merge`] is not supported and always fails.
//!
//! # Expected invariants
//! - The mesh is all-quad when an operator is called; otherwise it fails with
//!   [`MeshPatternError::NotQuadMesh`].
//! - `(u, v)` is an edge of the mesh; otherwise [`MeshPatternError::NotAnEdge`].
//!
//! Operators work on a copy of the mesh and commit it only on success, so an
//! `Err` always leaves the caller's mesh as it was.

mod collapse;
mod propagation;
mod subdivide;

pub use collapse::{collapse, collapse_with};
pub use propagation::{PropagationState, PropagationTrace, TerminalCause};
pub use subdivide::{subdivide, subdivide_with};

use crate::algs::cleanup::WeldOptions;
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshPatternError;
use crate::topology::mesh::PolyMesh;
use crate::topology::point::VertexId;
use crate::topology::validation::validate_mesh;

/// Optional settings for the face-strip operators.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FaceStripOptions {
    /// Weld settings for the cleanup that follows a collapse.
    pub weld: WeldOptions,
    /// When enabled, validate the edited mesh before committing it and fail
    /// with [`MeshPatternError::InvariantViolation`] instead of committing a
    /// broken mesh.
    pub check_invariants: bool,
}

/// Summary of a committed strip edit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StripEditReport {
    pub faces_before: usize,
    pub faces_after: usize,
    pub vertices_before: usize,
    pub vertices_after: usize,
    /// Quads of the edited strip, counted before the edit.
    pub strip_faces: usize,
    /// Edges of the edited strip, counted before the edit.
    pub strip_edges: usize,
    /// Vertex inserted on the selected edge (subdivide only).
    pub new_vertex: Option<VertexId>,
    /// How each propagation side ended (subdivide only).
    pub sides: Vec<PropagationTrace>,
}

impl StripEditReport {
    fn start(mesh: &PolyMesh) -> Self {
        Self {
            faces_before: mesh.number_of_faces(),
            vertices_before: mesh.number_of_vertices(),
            ..Self::default()
        }
    }
}

/// Merge the face strip through `(u, v)` with a neighbouring strip.
///
/// Not supported: always returns [`MeshPatternError::UnsupportedOperation`]
/// and never touches the mesh.
pub fn merge(
    mesh: &mut PolyMesh,
    u: VertexId,
    v: VertexId,
) -> Result<StripEditReport, MeshPatternError> {
    log::debug!(
        "merge: requested on ({u}, {v}) of a {}-face mesh, unsupported",
        mesh.number_of_faces()
    );
    Err(MeshPatternError::UnsupportedOperation("face strip merge"))
}

fn check_preconditions(mesh: &PolyMesh, u: VertexId, v: VertexId) -> Result<(), MeshPatternError> {
    if !mesh.is_quadmesh() {
        let non_quads = mesh
            .faces()
            .filter(|&f| mesh.face_degree(f) != Some(4))
            .count();
        return Err(MeshPatternError::NotQuadMesh { non_quads });
    }
    if !mesh.has_edge(u, v) {
        return Err(MeshPatternError::NotAnEdge(u, v));
    }
    Ok(())
}

fn commit(
    mesh: &mut PolyMesh,
    work: PolyMesh,
    options: &FaceStripOptions,
    mut report: StripEditReport,
) -> Result<StripEditReport, MeshPatternError> {
    if options.check_invariants {
        validate_mesh(&work)?;
    }
    work.debug_assert_invariants();
    report.faces_after = work.number_of_faces();
    report.vertices_after = work.number_of_vertices();
    *mesh = work;
    Ok(report)
}
