use crate::algs::dual_edge_groups::dual_edge_groups;
use crate::mesh_error::MeshPatternError;
use crate::topology::grammar::insert_vertex_on_edge;
use crate::topology::mesh::PolyMesh;
use crate::topology::point::VertexId;

use super::propagation::{PropagationState, propagate};
use super::{FaceStripOptions, StripEditReport, check_preconditions, commit};

/// Split every quad of the strip through `(u, v)` in two.
///
/// See [`subdivide_with`].
pub fn subdivide(
    mesh: &mut PolyMesh,
    u: VertexId,
    v: VertexId,
) -> Result<StripEditReport, MeshPatternError> {
    subdivide_with(mesh, u, v, &FaceStripOptions::default())
}

/// Split every quad of the strip through `(u, v)` in two.
///
/// A vertex `w` is placed at the midpoint of `(u, v)` and inserted into the
/// faces on both sides of the edge. The split then propagates away from `w`
/// on each side (see [`PropagationState`]). The second side is skipped when
/// the first one already closed a loop or when `(u, v)` is a boundary edge.
///
/// # Errors
/// - [`MeshPatternError::NotQuadMesh`] if any face is not a quad.
/// - [`MeshPatternError::NotAnEdge`] if `(u, v)` is not an edge.
/// - [`MeshPatternError::InvariantViolation`] if invariant checking is enabled
///   and the result is inconsistent.
///
/// The mesh is unchanged on error.
pub fn subdivide_with(
    mesh: &mut PolyMesh,
    u: VertexId,
    v: VertexId,
    options: &FaceStripOptions,
) -> Result<StripEditReport, MeshPatternError> {
    check_preconditions(mesh, u, v)?;

    let mut report = StripEditReport::start(mesh);
    let groups = dual_edge_groups(mesh);
    if let Some(g) = groups.group_of(u, v) {
        report.strip_faces = groups.strip_faces(mesh, g).len();
        report.strip_edges = groups.group_len(g);
    }

    let mut work = mesh.clone();
    let position = work
        .edge_midpoint(u, v)
        .ok_or(MeshPatternError::UnknownVertex(u))?;
    let w = work.add_vertex(position);
    report.new_vertex = Some(w);

    if let Some(face) = work.halfedge_face(u, v) {
        insert_vertex_on_edge(&mut work, face, u, v, w)?;
    }
    if let Some(face) = work.halfedge_face(v, u) {
        insert_vertex_on_edge(&mut work, face, v, u, w)?;
    }

    let naked = work.is_edge_on_boundary(u, w);
    let first = work
        .halfedge_face(u, w)
        .or_else(|| work.halfedge_face(w, u))
        .ok_or(MeshPatternError::NotAnEdge(u, w))?;
    let side = propagate(
        &mut work,
        PropagationState::Propagating {
            face: first,
            reference: w,
        },
        w,
    )?;
    report.sides.push(side);

    if side.state != PropagationState::LoopClosed && !naked {
        if let Some(second) = work.halfedge_face(w, u) {
            let side = propagate(
                &mut work,
                PropagationState::Propagating {
                    face: second,
                    reference: w,
                },
                w,
            )?;
            report.sides.push(side);
        }
    }

    log::debug!(
        "subdivide ({u}, {v}): strip of {} quads, sides {:?}, faces {} -> {}",
        report.strip_faces,
        report.sides.iter().map(|s| s.state).collect::<Vec<_>>(),
        report.faces_before,
        work.number_of_faces()
    );
    commit(mesh, work, options, report)
}
