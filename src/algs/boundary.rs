//! Boundary classification utilities.
//!
//! These helpers classify vertices as boundary or interior from the
//! directed-edge map: a vertex is on the boundary when one of its edges has a
//! face on one side only.

use std::collections::BTreeMap;

use crate::topology::mesh::PolyMesh;
use crate::topology::point::VertexId;

/// Classified boundary/interior vertex sets, both sorted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoundaryClassification {
    pub boundary: Vec<VertexId>,
    pub interior: Vec<VertexId>,
}

impl BoundaryClassification {
    pub fn is_boundary(&self, v: VertexId) -> bool {
        self.boundary.binary_search(&v).is_ok()
    }
}

/// Classify every vertex of the mesh.
///
/// Vertices without any incident face are neither boundary nor interior and
/// are left out of both lists.
pub fn classify_boundary_vertices(mesh: &PolyMesh) -> BoundaryClassification {
    let on_boundary = mesh.vertices_on_boundary();
    let mut boundary = Vec::new();
    let mut interior = Vec::new();

    for v in mesh.vertices() {
        if on_boundary.contains(&v) {
            boundary.push(v);
        } else if !mesh.vertex_faces(v).is_empty() {
            interior.push(v);
        }
    }

    BoundaryClassification { boundary, interior }
}

/// Trace the boundary loops of the mesh.
///
/// Each loop follows the boundary halfedges (face on the left, nothing on the
/// right) head to tail, so loops run with the faces on their left. Loops start
/// at their smallest vertex and are returned in order of that vertex. At a
/// vertex where several boundary fans meet, the smallest outgoing head is
/// taken first.
pub fn boundary_loops(mesh: &PolyMesh) -> Vec<Vec<VertexId>> {
    let mut next: BTreeMap<VertexId, Vec<VertexId>> = BTreeMap::new();
    for (u, v) in mesh.boundary_halfedges() {
        next.entry(u).or_default().push(v);
    }
    for heads in next.values_mut() {
        heads.sort_unstable();
        heads.reverse();
    }

    let mut loops = Vec::new();
    loop {
        let Some(start) = next
            .iter()
            .find(|(_, heads)| !heads.is_empty())
            .map(|(&v, _)| v)
        else {
            break;
        };
        let mut lp = vec![start];
        let mut current = start;
        while let Some(head) = next.get_mut(&current).and_then(Vec::pop) {
            if head == start {
                break;
            }
            lp.push(head);
            current = head;
        }
        loops.push(lp);
    }
    loops
}
