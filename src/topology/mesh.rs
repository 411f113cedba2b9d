//! Halfedge-style adjacency store for polygonal meshes.
//!
//! [`PolyMesh`] keeps two arenas (vertex positions and face loops) addressed by
//! stable handles, plus two derived indices that are updated on every face
//! add/delete:
//!
//! - the *directed-edge map* `(tail, head) -> face`, where the face lies to the
//!   left of the directed edge, and
//! - the *vertex star* `vertex -> {faces}`.
//!
//! Faces are never mutated in place. Callers that change a face loop delete
//! the face and re-add it under the same key (see [`PolyMesh::replace_face`]),
//! so external references by face id survive topology-preserving edits.
//! Deleting a face never deletes its vertices; unreferenced vertices are
//! removed by an explicit cleanup step ([`crate::algs::cleanup`]).

use std::collections::{BTreeMap, BTreeSet};

use hashbrown::{HashMap, HashSet};
use itertools::Itertools;

use crate::geometry::metrics::{centroid, midpoint, polygon_area};
use crate::geometry::Point3;
use crate::mesh_error::MeshPatternError;
use crate::topology::point::{FaceId, VertexId};

/// A polygonal surface mesh with halfedge-style adjacency.
#[derive(Clone, Debug, Default)]
pub struct PolyMesh {
    pub(crate) vertices: BTreeMap<VertexId, Point3>,
    pub(crate) faces: BTreeMap<FaceId, Vec<VertexId>>,
    pub(crate) halfedges: HashMap<(VertexId, VertexId), FaceId>,
    pub(crate) vertex_faces: HashMap<VertexId, BTreeSet<FaceId>>,
    next_vertex: usize,
    next_face: usize,
}

impl PolyMesh {
    /// Creates a new, empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mesh from indexed positions and face loops.
    ///
    /// Vertex and face keys equal their index in the input slices, which is how
    /// the patch-decomposition stage hands meshes over.
    ///
    /// # Example
    /// ```rust
    /// use mesh_pattern::topology::mesh::PolyMesh;
    /// let mesh = PolyMesh::from_vertices_and_faces(
    ///     &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
    ///     &[vec![0, 1, 2, 3]],
    /// )
    /// .unwrap();
    /// assert!(mesh.is_quadmesh());
    /// assert_eq!(mesh.number_of_faces(), 1);
    /// ```
    pub fn from_vertices_and_faces(
        positions: &[Point3],
        faces: &[Vec<usize>],
    ) -> Result<Self, MeshPatternError> {
        let mut mesh = Self::new();
        for &p in positions {
            mesh.add_vertex(p);
        }
        for face in faces {
            mesh.add_face(face.iter().map(|&i| VertexId::new(i)).collect())?;
        }
        Ok(mesh)
    }

    /// Exports the mesh with compact indices, e.g. for a renderer.
    ///
    /// Vertices are numbered in key order; faces are listed in key order.
    pub fn to_vertices_and_faces(&self) -> (Vec<Point3>, Vec<Vec<usize>>) {
        let index: HashMap<VertexId, usize> = self
            .vertices
            .keys()
            .enumerate()
            .map(|(i, &v)| (v, i))
            .collect();
        let positions = self.vertices.values().copied().collect();
        let loops = self
            .faces
            .values()
            .map(|lp| lp.iter().map(|v| index[v]).collect())
            .collect();
        (positions, loops)
    }

    // ---------------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------------

    /// Adds a vertex at `position` and returns its handle.
    pub fn add_vertex(&mut self, position: Point3) -> VertexId {
        let key = VertexId::new(self.next_vertex);
        self.next_vertex += 1;
        self.vertices.insert(key, position);
        self.vertex_faces.insert(key, BTreeSet::new());
        key
    }

    /// Adds a face with a freshly allocated key.
    pub fn add_face(&mut self, vertices: Vec<VertexId>) -> Result<FaceId, MeshPatternError> {
        let key = FaceId::new(self.next_face);
        self.add_face_with_key(key, vertices)
    }

    /// Adds a face under a caller-chosen key.
    ///
    /// This is the "preferred identifier" form used by delete-then-re-add
    /// edits. The loop is validated before anything is inserted: on error the
    /// mesh is unchanged.
    pub fn add_face_with_key(
        &mut self,
        key: FaceId,
        vertices: Vec<VertexId>,
    ) -> Result<FaceId, MeshPatternError> {
        if self.faces.contains_key(&key) {
            return Err(MeshPatternError::FaceKeyInUse(key));
        }
        self.check_loop(&vertices)?;

        for (u, v) in vertices.iter().copied().circular_tuple_windows() {
            self.halfedges.insert((u, v), key);
        }
        for &v in &vertices {
            self.vertex_faces.entry(v).or_default().insert(key);
        }
        self.faces.insert(key, vertices);
        self.next_face = self.next_face.max(key.get() + 1);
        Ok(key)
    }

    /// Removes a face and its directed edges, returning its former loop.
    ///
    /// Vertices of the face stay in the mesh even when they become
    /// unreferenced.
    pub fn delete_face(&mut self, face: FaceId) -> Option<Vec<VertexId>> {
        let vertices = self.faces.remove(&face)?;
        for (u, v) in vertices.iter().copied().circular_tuple_windows() {
            if self.halfedges.get(&(u, v)) == Some(&face) {
                self.halfedges.remove(&(u, v));
            }
        }
        for v in &vertices {
            if let Some(star) = self.vertex_faces.get_mut(v) {
                star.remove(&face);
            }
        }
        Some(vertices)
    }

    /// Replaces the loop of `face`, keeping its key.
    ///
    /// Atomic: if the new loop is rejected the old one is restored.
    pub fn replace_face(
        &mut self,
        face: FaceId,
        vertices: Vec<VertexId>,
    ) -> Result<(), MeshPatternError> {
        let old = self
            .delete_face(face)
            .ok_or(MeshPatternError::UnknownFace(face))?;
        if let Err(e) = self.add_face_with_key(face, vertices) {
            self.add_face_with_key(face, old)?;
            return Err(e);
        }
        Ok(())
    }

    /// Removes a vertex that no face references.
    pub fn delete_vertex(&mut self, vertex: VertexId) -> Result<Point3, MeshPatternError> {
        let faces = self.vertex_faces.get(&vertex).map_or(0, BTreeSet::len);
        if faces > 0 {
            return Err(MeshPatternError::VertexInUse { vertex, faces });
        }
        let position = self
            .vertices
            .remove(&vertex)
            .ok_or(MeshPatternError::UnknownVertex(vertex))?;
        self.vertex_faces.remove(&vertex);
        Ok(position)
    }

    /// Moves a vertex.
    pub fn set_vertex_position(
        &mut self,
        vertex: VertexId,
        position: Point3,
    ) -> Result<(), MeshPatternError> {
        let slot = self
            .vertices
            .get_mut(&vertex)
            .ok_or(MeshPatternError::UnknownVertex(vertex))?;
        *slot = position;
        Ok(())
    }

    fn check_loop(&self, vertices: &[VertexId]) -> Result<(), MeshPatternError> {
        if vertices.len() < 3 {
            return Err(MeshPatternError::DegenerateFace(vertices.len()));
        }
        let mut seen = HashSet::with_capacity(vertices.len());
        for &v in vertices {
            if !self.vertices.contains_key(&v) {
                return Err(MeshPatternError::UnknownVertex(v));
            }
            if !seen.insert(v) {
                return Err(MeshPatternError::RepeatedVertex(v));
            }
        }
        for (u, v) in vertices.iter().copied().circular_tuple_windows() {
            if let Some(&face) = self.halfedges.get(&(u, v)) {
                return Err(MeshPatternError::DirectedEdgeInUse {
                    from: u,
                    to: v,
                    face,
                });
            }
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Element queries
    // ---------------------------------------------------------------------

    /// Iterates vertex handles in key order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.keys().copied()
    }

    /// Iterates face handles in key order.
    pub fn faces(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces.keys().copied()
    }

    pub fn number_of_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn number_of_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn has_vertex(&self, vertex: VertexId) -> bool {
        self.vertices.contains_key(&vertex)
    }

    pub fn has_face(&self, face: FaceId) -> bool {
        self.faces.contains_key(&face)
    }

    /// Position of a vertex.
    pub fn vertex_position(&self, vertex: VertexId) -> Option<Point3> {
        self.vertices.get(&vertex).copied()
    }

    /// Alias of [`vertex_position`](Self::vertex_position) for renderers.
    pub fn vertex_coordinates(&self, vertex: VertexId) -> Option<Point3> {
        self.vertex_position(vertex)
    }

    /// Ordered boundary loop of a face.
    pub fn face_vertices(&self, face: FaceId) -> Option<&[VertexId]> {
        self.faces.get(&face).map(Vec::as_slice)
    }

    /// Number of vertices of a face.
    pub fn face_degree(&self, face: FaceId) -> Option<usize> {
        self.faces.get(&face).map(Vec::len)
    }

    /// Directed edges of a face, in loop order.
    pub fn face_halfedges(&self, face: FaceId) -> Option<Vec<(VertexId, VertexId)>> {
        self.faces
            .get(&face)
            .map(|lp| lp.iter().copied().circular_tuple_windows().collect())
    }

    /// The vertex following `vertex` in the loop of `face`.
    pub fn face_vertex_descendant(&self, face: FaceId, vertex: VertexId) -> Option<VertexId> {
        let lp = self.faces.get(&face)?;
        let i = lp.iter().position(|&v| v == vertex)?;
        Some(lp[(i + 1) % lp.len()])
    }

    /// The vertex preceding `vertex` in the loop of `face`.
    pub fn face_vertex_ancestor(&self, face: FaceId, vertex: VertexId) -> Option<VertexId> {
        let lp = self.faces.get(&face)?;
        let i = lp.iter().position(|&v| v == vertex)?;
        Some(lp[(i + lp.len() - 1) % lp.len()])
    }

    /// Faces incident to a vertex, in key order. Empty for unknown vertices.
    pub fn vertex_faces(&self, vertex: VertexId) -> Vec<FaceId> {
        self.vertex_faces
            .get(&vertex)
            .map(|star| star.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Vertices sharing an edge with `vertex`.
    pub fn vertex_neighbors(&self, vertex: VertexId) -> BTreeSet<VertexId> {
        let mut nbrs = BTreeSet::new();
        for face in self.vertex_faces(vertex) {
            if let Some(v) = self.face_vertex_descendant(face, vertex) {
                nbrs.insert(v);
            }
            if let Some(v) = self.face_vertex_ancestor(face, vertex) {
                nbrs.insert(v);
            }
        }
        nbrs
    }

    /// Number of edges incident to `vertex`.
    pub fn vertex_degree(&self, vertex: VertexId) -> usize {
        self.vertex_neighbors(vertex).len()
    }

    /// Centroid of a face's vertex positions.
    pub fn face_centroid(&self, face: FaceId) -> Option<Point3> {
        centroid(&self.face_positions(face)?)
    }

    /// Vector-area magnitude of a face.
    pub fn face_area(&self, face: FaceId) -> Option<f64> {
        Some(polygon_area(&self.face_positions(face)?))
    }

    fn face_positions(&self, face: FaceId) -> Option<Vec<Point3>> {
        self.faces
            .get(&face)?
            .iter()
            .map(|v| self.vertices.get(v).copied())
            .collect()
    }

    /// Whether every face has exactly four vertices.
    ///
    /// Vacuously true for a mesh without faces.
    pub fn is_quadmesh(&self) -> bool {
        self.faces.values().all(|lp| lp.len() == 4)
    }

    /// Face count per face degree.
    pub fn face_degree_histogram(&self) -> BTreeMap<usize, usize> {
        self.faces.values().map(Vec::len).counts().into_iter().collect()
    }

    // ---------------------------------------------------------------------
    // Edge and boundary queries
    // ---------------------------------------------------------------------

    /// The face to the left of the directed edge `(u, v)`, if any.
    pub fn halfedge_face(&self, u: VertexId, v: VertexId) -> Option<FaceId> {
        self.halfedges.get(&(u, v)).copied()
    }

    /// Whether `(u, v)` is an (undirected) edge of the mesh.
    pub fn has_edge(&self, u: VertexId, v: VertexId) -> bool {
        self.halfedges.contains_key(&(u, v)) || self.halfedges.contains_key(&(v, u))
    }

    /// Every undirected edge once, oriented as first met when walking the face
    /// loops in key order.
    pub fn edges(&self) -> Vec<(VertexId, VertexId)> {
        let mut seen: HashSet<(VertexId, VertexId)> = HashSet::with_capacity(self.halfedges.len());
        let mut edges = Vec::with_capacity(self.halfedges.len() / 2 + 1);
        for lp in self.faces.values() {
            for (u, v) in lp.iter().copied().circular_tuple_windows() {
                if seen.contains(&(v, u)) {
                    continue;
                }
                seen.insert((u, v));
                edges.push((u, v));
            }
        }
        edges
    }

    /// Midpoint of the segment between two vertices.
    pub fn edge_midpoint(&self, u: VertexId, v: VertexId) -> Option<Point3> {
        Some(midpoint(self.vertex_position(u)?, self.vertex_position(v)?))
    }

    /// Whether at least one direction of `(u, v)` has no face.
    pub fn is_edge_on_boundary(&self, u: VertexId, v: VertexId) -> bool {
        !self.halfedges.contains_key(&(u, v)) || !self.halfedges.contains_key(&(v, u))
    }

    /// Whether `vertex` touches a boundary edge.
    pub fn is_vertex_on_boundary(&self, vertex: VertexId) -> bool {
        self.vertex_neighbors(vertex)
            .into_iter()
            .any(|n| self.is_edge_on_boundary(vertex, n))
    }

    /// All vertices touching a boundary edge.
    pub fn vertices_on_boundary(&self) -> BTreeSet<VertexId> {
        let mut boundary = BTreeSet::new();
        for &(u, v) in self.halfedges.keys() {
            if !self.halfedges.contains_key(&(v, u)) {
                boundary.insert(u);
                boundary.insert(v);
            }
        }
        boundary
    }

    /// Directed edges with a face on their left but none on their right.
    pub fn boundary_halfedges(&self) -> Vec<(VertexId, VertexId)> {
        let mut out: Vec<_> = self
            .halfedges
            .keys()
            .copied()
            .filter(|&(u, v)| !self.halfedges.contains_key(&(v, u)))
            .collect();
        out.sort_unstable();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(i: usize) -> VertexId {
        VertexId::new(i)
    }

    // Two unit quads sharing the edge (1, 2).
    fn two_quads() -> PolyMesh {
        PolyMesh::from_vertices_and_faces(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
                [2.0, 0.0, 0.0],
                [2.0, 1.0, 0.0],
            ],
            &[vec![0, 1, 2, 3], vec![1, 4, 5, 2]],
        )
        .unwrap()
    }

    #[test]
    fn directed_edges_map_to_left_face() {
        let mesh = two_quads();
        assert_eq!(mesh.halfedge_face(v(1), v(2)), Some(FaceId::new(0)));
        assert_eq!(mesh.halfedge_face(v(2), v(1)), Some(FaceId::new(1)));
        assert_eq!(mesh.halfedge_face(v(1), v(0)), None);
        assert!(mesh.has_edge(v(1), v(0)));
        assert!(!mesh.has_edge(v(0), v(2)));
        assert_eq!(mesh.edges().len(), 7);
    }

    #[test]
    fn boundary_queries() {
        let mesh = two_quads();
        assert!(!mesh.is_edge_on_boundary(v(1), v(2)));
        assert!(mesh.is_edge_on_boundary(v(0), v(1)));
        assert_eq!(mesh.vertices_on_boundary().len(), 6);
        assert_eq!(mesh.boundary_halfedges().len(), 6);
    }

    #[test]
    fn loop_navigation() {
        let mesh = two_quads();
        let f = FaceId::new(1);
        assert_eq!(mesh.face_vertex_descendant(f, v(2)), Some(v(1)));
        assert_eq!(mesh.face_vertex_ancestor(f, v(1)), Some(v(2)));
        assert_eq!(mesh.face_vertex_descendant(f, v(0)), None);
        assert_eq!(mesh.vertex_degree(v(1)), 3);
        assert_eq!(mesh.vertex_faces(v(2)), vec![FaceId::new(0), FaceId::new(1)]);
    }

    #[test]
    fn add_face_rejects_bad_loops_without_mutation() {
        let mut mesh = two_quads();
        assert_eq!(
            mesh.add_face(vec![v(0), v(1)]),
            Err(MeshPatternError::DegenerateFace(2))
        );
        assert_eq!(
            mesh.add_face(vec![v(0), v(1), v(0)]),
            Err(MeshPatternError::RepeatedVertex(v(0)))
        );
        assert!(matches!(
            mesh.add_face(vec![v(1), v(2), v(3)]),
            Err(MeshPatternError::DirectedEdgeInUse { .. })
        ));
        assert_eq!(
            mesh.add_face_with_key(FaceId::new(0), vec![v(3), v(2), v(5)]),
            Err(MeshPatternError::FaceKeyInUse(FaceId::new(0)))
        );
        assert_eq!(mesh.number_of_faces(), 2);
    }

    #[test]
    fn delete_then_readd_keeps_key_and_vertices() {
        let mut mesh = two_quads();
        let f = FaceId::new(0);
        let old = mesh.delete_face(f).unwrap();
        assert_eq!(mesh.number_of_vertices(), 6);
        assert!(mesh.halfedge_face(v(1), v(2)).is_none());
        assert!(mesh.is_vertex_on_boundary(v(1)));
        mesh.add_face_with_key(f, old).unwrap();
        assert_eq!(mesh.halfedge_face(v(1), v(2)), Some(f));
        // The allocator never hands out a key that was explicitly used.
        let g = mesh.add_face(vec![v(3), v(2), v(5)]).unwrap();
        assert_eq!(g, FaceId::new(2));
    }

    #[test]
    fn replace_face_is_atomic() {
        let mut mesh = two_quads();
        let f = FaceId::new(0);
        let before = mesh.face_vertices(f).unwrap().to_vec();
        // (1, 4) is already used by face 1.
        let err = mesh.replace_face(f, vec![v(0), v(1), v(4), v(3)]);
        assert!(err.is_err());
        assert_eq!(mesh.face_vertices(f).unwrap(), before.as_slice());
    }

    #[test]
    fn delete_vertex_requires_no_faces() {
        let mut mesh = two_quads();
        assert!(matches!(
            mesh.delete_vertex(v(0)),
            Err(MeshPatternError::VertexInUse { faces: 1, .. })
        ));
        let w = mesh.add_vertex([5.0, 5.0, 0.0]);
        assert_eq!(mesh.delete_vertex(w), Ok([5.0, 5.0, 0.0]));
        assert_eq!(mesh.delete_vertex(w), Err(MeshPatternError::UnknownVertex(w)));
    }

    #[test]
    fn export_is_compact() {
        let mut mesh = two_quads();
        mesh.delete_face(FaceId::new(0));
        mesh.delete_vertex(v(0)).unwrap();
        mesh.delete_vertex(v(3)).unwrap();
        let (positions, loops) = mesh.to_vertices_and_faces();
        assert_eq!(positions.len(), 4);
        assert_eq!(loops, vec![vec![0, 2, 3, 1]]);
        assert_eq!(mesh.face_degree_histogram().get(&4), Some(&1));
        assert!((mesh.face_area(FaceId::new(1)).unwrap() - 1.0).abs() < 1e-12);
    }
}
