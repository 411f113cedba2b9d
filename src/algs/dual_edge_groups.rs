//! Partition mesh edges into *face strips* (dual edge groups).
//
// Each undirected edge is a node; two edges are joined when they are the
// opposite (vertex-disjoint) edges of the same quad. The connected components
// of that relation are the strips: every quad of a strip is crossed by exactly
// two of its edges, and walking from edge to edge across quads traces the band
// of quads from one boundary/irregularity to the other.
//
// Propagation never crosses a face that is not a quad, and stops at boundary
// edges (nothing on the far side). Every edge of the mesh gets a label, so an
// edge bordering only non-quad faces is a singleton group.
//
// Labels are assigned in `PolyMesh::edges()` order. They are only meaningful
// until the next mutation of the mesh.

use std::collections::{BTreeSet, VecDeque};

use hashbrown::HashMap;

use crate::topology::mesh::PolyMesh;
use crate::topology::point::{FaceId, VertexId};

/// Edge → strip-group labelling of a mesh.
#[derive(Debug, Clone, Default)]
pub struct DualEdgeGroups {
    // Both orientations of every edge map to the same group.
    group_of: HashMap<(VertexId, VertexId), usize>,
    // Group members, oriented as in `PolyMesh::edges()`.
    members: Vec<Vec<(VertexId, VertexId)>>,
}

impl DualEdgeGroups {
    /// Number of groups.
    pub fn group_count(&self) -> usize {
        self.members.len()
    }

    /// Group of the edge `(u, v)`, in either orientation.
    pub fn group_of(&self, u: VertexId, v: VertexId) -> Option<usize> {
        self.group_of.get(&(u, v)).copied()
    }

    /// Edges of a group; empty for an unknown label.
    pub fn edges_in_group(&self, group: usize) -> &[(VertexId, VertexId)] {
        self.members.get(group).map_or(&[], Vec::as_slice)
    }

    /// Number of edges in a group; zero for an unknown label.
    pub fn group_len(&self, group: usize) -> usize {
        self.members.get(group).map_or(0, Vec::len)
    }

    /// Iterate the groups in label order.
    pub fn groups(&self) -> impl Iterator<Item = &[(VertexId, VertexId)]> + '_ {
        self.members.iter().map(Vec::as_slice)
    }

    /// Quads crossed by a strip, i.e. the faces incident to its edges.
    pub fn strip_faces(&self, mesh: &PolyMesh, group: usize) -> BTreeSet<FaceId> {
        let mut faces = BTreeSet::new();
        for &(u, v) in self.edges_in_group(group) {
            for face in [mesh.halfedge_face(u, v), mesh.halfedge_face(v, u)]
                .into_iter()
                .flatten()
            {
                if mesh.face_degree(face) == Some(4) {
                    faces.insert(face);
                }
            }
        }
        faces
    }

    /// Edge → group map with every edge in `PolyMesh::edges()` orientation.
    pub fn edge_labels(&self) -> Vec<((VertexId, VertexId), usize)> {
        self.members
            .iter()
            .enumerate()
            .flat_map(|(g, edges)| edges.iter().map(move |&e| (e, g)))
            .collect()
    }
}

/// The edge of a quad opposite to its directed edge `(u, v)`.
///
/// Returned in the face's own orientation. `None` if `(u, v)` has no face or
/// the face is not a quad.
pub fn opposite_edge(
    mesh: &PolyMesh,
    u: VertexId,
    v: VertexId,
) -> Option<(VertexId, VertexId)> {
    let face = mesh.halfedge_face(u, v)?;
    let lp = mesh.face_vertices(face)?;
    if lp.len() != 4 {
        return None;
    }
    let i = lp.iter().position(|&x| x == u)?;
    Some((lp[(i + 2) % 4], lp[(i + 3) % 4]))
}

/// Compute the strip groups of `mesh`.
pub fn dual_edge_groups(mesh: &PolyMesh) -> DualEdgeGroups {
    let edges = mesh.edges();
    let mut canonical: HashMap<(VertexId, VertexId), (VertexId, VertexId)> =
        HashMap::with_capacity(2 * edges.len());
    for &(u, v) in &edges {
        canonical.insert((u, v), (u, v));
        canonical.insert((v, u), (u, v));
    }

    let mut groups = DualEdgeGroups::default();
    let mut queue = VecDeque::new();

    for &seed in &edges {
        if groups.group_of.contains_key(&seed) {
            continue;
        }
        let label = groups.members.len();
        let mut members = Vec::new();
        groups.group_of.insert(seed, label);
        groups.group_of.insert((seed.1, seed.0), label);
        queue.push_back(seed);

        while let Some((a, b)) = queue.pop_front() {
            members.push((a, b));
            for (x, y) in [(a, b), (b, a)] {
                let Some((p, q)) = opposite_edge(mesh, x, y) else {
                    continue;
                };
                if groups.group_of.contains_key(&(p, q)) {
                    continue;
                }
                groups.group_of.insert((p, q), label);
                groups.group_of.insert((q, p), label);
                queue.push_back(canonical[&(p, q)]);
            }
        }
        groups.members.push(members);
    }

    groups
}
