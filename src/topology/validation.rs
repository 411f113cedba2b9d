//! Topology validation helpers.
//!
//! [`validate_mesh`] re-derives the directed-edge map and the vertex stars
//! from the face arena and compares them with the stored indices. It is what
//! [`DebugInvariants`] runs after every operator in debug builds.

use std::collections::BTreeSet;

use hashbrown::HashMap;
use itertools::Itertools;

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshPatternError;
use crate::topology::mesh::PolyMesh;
use crate::topology::point::{FaceId, VertexId};

/// Optional validation toggles for mesh topology checks.
#[derive(Debug, Clone, Copy)]
pub struct TopologyValidationOptions {
    /// Require every face to be a quad.
    pub require_quads: bool,
    /// Require every vertex to be referenced by at least one face.
    pub require_no_isolated_vertices: bool,
    /// How to handle boundary vertices where two boundary fans meet.
    pub non_manifold: NonManifoldHandling,
}

impl Default for TopologyValidationOptions {
    fn default() -> Self {
        Self {
            require_quads: false,
            require_no_isolated_vertices: false,
            non_manifold: NonManifoldHandling::Ignore,
        }
    }
}

impl TopologyValidationOptions {
    /// Enable all topology validation checks.
    pub fn all() -> Self {
        Self {
            require_quads: true,
            require_no_isolated_vertices: true,
            non_manifold: NonManifoldHandling::Error,
        }
    }
}

/// Behavior for non-manifold detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonManifoldHandling {
    /// Skip non-manifold detection.
    Ignore,
    /// Log a warning on non-manifold vertices.
    Warn,
    /// Return an error on non-manifold vertices.
    Error,
}

/// Check the structural invariants of the adjacency store.
///
/// - every face loop has at least three vertices, none repeated, all known;
/// - the directed-edge map holds exactly the halfedges of the face loops;
/// - the vertex stars hold exactly the faces referencing each vertex.
pub fn validate_mesh(mesh: &PolyMesh) -> Result<(), MeshPatternError> {
    let mut halfedges: HashMap<(VertexId, VertexId), FaceId> = HashMap::new();
    let mut stars: HashMap<VertexId, BTreeSet<FaceId>> = HashMap::new();

    for (&face, lp) in &mesh.faces {
        if lp.len() < 3 {
            return Err(MeshPatternError::DegenerateFace(lp.len()));
        }
        if let Some(v) = lp.iter().duplicates().next() {
            return Err(MeshPatternError::RepeatedVertex(*v));
        }
        for &v in lp {
            if !mesh.vertices.contains_key(&v) {
                return Err(MeshPatternError::UnknownVertex(v));
            }
            stars.entry(v).or_default().insert(face);
        }
        for (u, v) in lp.iter().copied().circular_tuple_windows() {
            if let Some(other) = halfedges.insert((u, v), face) {
                return Err(MeshPatternError::DirectedEdgeInUse {
                    from: u,
                    to: v,
                    face: other,
                });
            }
        }
    }

    if halfedges.len() != mesh.halfedges.len() {
        return Err(MeshPatternError::InvariantViolation(format!(
            "directed-edge map holds {} entries, face loops define {}",
            mesh.halfedges.len(),
            halfedges.len()
        )));
    }
    for (edge, face) in &halfedges {
        if mesh.halfedges.get(edge) != Some(face) {
            return Err(MeshPatternError::InvariantViolation(format!(
                "directed edge ({} -> {}) should map to face {face}",
                edge.0, edge.1
            )));
        }
    }

    for &v in mesh.vertices.keys() {
        let stored = mesh.vertex_faces.get(&v).cloned().unwrap_or_default();
        let derived = stars.remove(&v).unwrap_or_default();
        if stored != derived {
            return Err(MeshPatternError::InvariantViolation(format!(
                "vertex {v} star is {stored:?}, face loops give {derived:?}"
            )));
        }
    }

    Ok(())
}

/// Validate a mesh with optional quad/isolation/manifold checks on top of
/// [`validate_mesh`].
pub fn validate_mesh_topology(
    mesh: &PolyMesh,
    options: TopologyValidationOptions,
) -> Result<(), MeshPatternError> {
    validate_mesh(mesh)?;

    if options.require_quads {
        let non_quads = mesh
            .faces()
            .filter(|&f| mesh.face_degree(f) != Some(4))
            .count();
        if non_quads > 0 {
            return Err(MeshPatternError::NotQuadMesh { non_quads });
        }
    }

    if options.require_no_isolated_vertices {
        if let Some(v) = mesh.vertices().find(|&v| mesh.vertex_faces(v).is_empty()) {
            return Err(MeshPatternError::InvariantViolation(format!(
                "vertex {v} is not referenced by any face"
            )));
        }
    }

    validate_non_manifold(mesh, options.non_manifold)
}

/// Detect vertices with more than one outgoing boundary halfedge (two
/// boundary fans touching at a single vertex).
fn validate_non_manifold(
    mesh: &PolyMesh,
    handling: NonManifoldHandling,
) -> Result<(), MeshPatternError> {
    if handling == NonManifoldHandling::Ignore {
        return Ok(());
    }

    let counts = mesh
        .boundary_halfedges()
        .into_iter()
        .map(|(u, _)| u)
        .counts();
    for (vertex, count) in counts.into_iter().sorted() {
        if count < 2 {
            continue;
        }
        match handling {
            NonManifoldHandling::Warn => {
                log::warn!(
                    "Non-manifold vertex detected: vertex={vertex:?} boundary_fans={count}"
                );
            }
            NonManifoldHandling::Error => {
                return Err(MeshPatternError::InvariantViolation(format!(
                    "vertex {vertex} joins {count} boundary fans"
                )));
            }
            NonManifoldHandling::Ignore => {}
        }
    }

    Ok(())
}

impl DebugInvariants for PolyMesh {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "PolyMesh");
    }

    fn validate_invariants(&self) -> Result<(), MeshPatternError> {
        validate_mesh(self)
    }
}
