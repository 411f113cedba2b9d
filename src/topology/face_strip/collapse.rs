use std::collections::BTreeSet;

use crate::algs::cleanup::{clean, dedup_cyclic};
use crate::algs::dual_edge_groups::dual_edge_groups;
use crate::geometry::metrics::midpoint;
use crate::mesh_error::MeshPatternError;
use crate::topology::mesh::PolyMesh;
use crate::topology::point::{FaceId, VertexId};

use super::{FaceStripOptions, StripEditReport, check_preconditions, commit};

/// Collapse the strip through `(u, v)` with default options.
///
/// See [`collapse_with`].
pub fn collapse(
    mesh: &mut PolyMesh,
    u: VertexId,
    v: VertexId,
) -> Result<StripEditReport, MeshPatternError> {
    collapse_with(mesh, u, v, &FaceStripOptions::default())
}

/// Remove the strip through `(u, v)` and fuse the two sides of the gap.
///
/// Every edge of the strip shrinks to a single replacement vertex. Boundary
/// membership is read once the strip faces are gone: an endpoint left without
/// faces (the outer side of a strip running along the boundary) is then off
/// the boundary while its partner borders the gap. When exactly one endpoint
/// is off the boundary the replacement takes its position, so the outer
/// boundary keeps its shape; otherwise it sits at the edge midpoint. The
/// result is welded with `options.weld` and unreferenced vertices are culled.
/// Faces outside the strip keep their keys.
///
/// # Errors
/// - [`MeshPatternError::NotQuadMesh`] if any face is not a quad.
/// - [`MeshPatternError::NotAnEdge`] if `(u, v)` is not an edge.
/// - [`MeshPatternError::InvalidTolerance`] for a bad weld tolerance.
/// - Adjacency errors if fusing would make two faces claim one directed edge.
///
/// The mesh is unchanged on error.
pub fn collapse_with(
    mesh: &mut PolyMesh,
    u: VertexId,
    v: VertexId,
    options: &FaceStripOptions,
) -> Result<StripEditReport, MeshPatternError> {
    check_preconditions(mesh, u, v)?;
    options.weld.validate()?;

    let mut report = StripEditReport::start(mesh);
    let groups = dual_edge_groups(mesh);
    let group = groups
        .group_of(u, v)
        .ok_or(MeshPatternError::NotAnEdge(u, v))?;
    let edges = groups.edges_in_group(group).to_vec();
    report.strip_faces = groups.strip_faces(mesh, group).len();
    report.strip_edges = edges.len();

    let mut work = mesh.clone();

    let doomed: BTreeSet<FaceId> = edges
        .iter()
        .flat_map(|&(a, b)| [work.halfedge_face(a, b), work.halfedge_face(b, a)])
        .flatten()
        .collect();
    for &face in &doomed {
        work.delete_face(face);
    }
    let boundary = work.vertices_on_boundary();

    for &(a, b) in &edges {
        let pa = work
            .vertex_position(a)
            .ok_or(MeshPatternError::UnknownVertex(a))?;
        let pb = work
            .vertex_position(b)
            .ok_or(MeshPatternError::UnknownVertex(b))?;
        let position = match (boundary.contains(&a), boundary.contains(&b)) {
            (true, false) => pb,
            (false, true) => pa,
            _ => midpoint(pa, pb),
        };
        let r = work.add_vertex(position);

        let touched: BTreeSet<FaceId> = work
            .vertex_faces(a)
            .into_iter()
            .chain(work.vertex_faces(b))
            .collect();
        for face in touched {
            let Some(lp) = work.face_vertices(face) else {
                continue;
            };
            let fused = dedup_cyclic(
                lp.iter()
                    .map(|&x| if x == a || x == b { r } else { x })
                    .collect(),
            );
            if fused.len() < 3 {
                log::warn!("collapse: face {face} degenerated while fusing ({a}, {b}), removed");
                work.delete_face(face);
                continue;
            }
            work.replace_face(face, fused)?;
        }
    }

    let cleanup = clean(&mut work, &options.weld)?;
    log::debug!(
        "collapse ({u}, {v}): removed {} strip faces, welded {}, culled {}",
        doomed.len(),
        cleanup.weld.merged.len(),
        cleanup.culled_vertices
    );
    commit(mesh, work, options, report)
}
