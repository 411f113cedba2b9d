//! Grammar rules: local rewrites that turn one face into quads (or, as a last
//! resort, triangles).
//!
//! Every rule takes a face and a *reference vertex* on its loop, rotates the
//! loop so that the reference comes first, deletes the face and adds the
//! replacement faces. The first replacement keeps the original face key.
//! Rules never look at or modify any other face; carrying an edit across to a
//! neighbour is a separate single-face rewrite ([`insert_vertex_on_edge`])
//! driven by the caller.
//!
//! Reference templates, with `a` the reference vertex:
//!
//! | rule        | input            | output                                |
//! |-------------|------------------|---------------------------------------|
//! | `QuadSplit` | `[a b c d]`      | `[a m n d]`, `[m b c n]`; m∈ab, n∈cd |
//! | `PentaQuad` | `[a b c d e]`    | `[a b c x]`, `[a x d e]`; x∈cd       |
//! | `HexaQuad`  | `[a b c d e f]`  | `[a b c d]`, `[d e f a]`              |
//! | `QuadTri`   | `[a b c d]`      | `[a b c]`, `[a c d]`                  |

use crate::mesh_error::MeshPatternError;
use crate::topology::mesh::PolyMesh;
use crate::topology::point::{FaceId, VertexId};

/// A local rewrite rule, selected by face degree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GrammarRule {
    /// Quad → two quads through the midpoints of the reference edge and its
    /// opposite edge.
    QuadSplit,
    /// Pentagon → two quads by a new edge from the reference vertex to the
    /// midpoint of the opposite edge.
    PentaQuad,
    /// Hexagon → two quads by the diagonal from the reference vertex to the
    /// opposite vertex.
    HexaQuad,
    /// Quad → two triangles by the diagonal from the reference vertex.
    QuadTri,
}

/// What a rule hands back to propagation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleOutcome {
    /// Continue from `vertex`, which was inserted on the directed edge
    /// `split` of the rewritten face. The face across `split` (if any) has not
    /// been touched yet.
    Continue {
        vertex: VertexId,
        split: (VertexId, VertexId),
    },
    /// Nothing left to carry.
    Terminal,
}

impl GrammarRule {
    /// The propagation lookup table: which rule repairs a face of `degree`
    /// vertices. Degrees without a rule are a terminal state for the caller.
    pub fn for_degree(degree: usize) -> Option<Self> {
        match degree {
            4 => Some(GrammarRule::QuadTri),
            5 => Some(GrammarRule::PentaQuad),
            6 => Some(GrammarRule::HexaQuad),
            _ => None,
        }
    }

    /// Degree of the faces this rule accepts.
    pub fn degree(self) -> usize {
        match self {
            GrammarRule::QuadSplit | GrammarRule::QuadTri => 4,
            GrammarRule::PentaQuad => 5,
            GrammarRule::HexaQuad => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GrammarRule::QuadSplit => "quad_split",
            GrammarRule::PentaQuad => "penta_quad",
            GrammarRule::HexaQuad => "hexa_quad",
            GrammarRule::QuadTri => "quad_tri",
        }
    }

    /// Apply the rule to `face`, using `reference` as the loop origin.
    ///
    /// On error the mesh is unchanged.
    pub fn rewrite(
        self,
        mesh: &mut PolyMesh,
        face: FaceId,
        reference: VertexId,
    ) -> Result<RuleOutcome, MeshPatternError> {
        let lp = rotated_loop(mesh, face, reference, self)?;
        match self {
            GrammarRule::QuadSplit => {
                let (a, b, c, d) = (lp[0], lp[1], lp[2], lp[3]);
                let m = add_midpoint(mesh, a, b)?;
                let n = add_midpoint(mesh, c, d)?;
                split_face(mesh, face, vec![vec![a, m, n, d], vec![m, b, c, n]], &[m, n])?;
                Ok(RuleOutcome::Continue {
                    vertex: n,
                    split: (c, d),
                })
            }
            GrammarRule::PentaQuad => {
                let (a, b, c, d, e) = (lp[0], lp[1], lp[2], lp[3], lp[4]);
                let x = add_midpoint(mesh, c, d)?;
                split_face(mesh, face, vec![vec![a, b, c, x], vec![a, x, d, e]], &[x])?;
                Ok(RuleOutcome::Continue {
                    vertex: x,
                    split: (c, d),
                })
            }
            GrammarRule::HexaQuad => {
                let (a, b, c, d, e, f) = (lp[0], lp[1], lp[2], lp[3], lp[4], lp[5]);
                split_face(mesh, face, vec![vec![a, b, c, d], vec![d, e, f, a]], &[])?;
                Ok(RuleOutcome::Terminal)
            }
            GrammarRule::QuadTri => {
                let (a, b, c, d) = (lp[0], lp[1], lp[2], lp[3]);
                split_face(mesh, face, vec![vec![a, b, c], vec![a, c, d]], &[])?;
                Ok(RuleOutcome::Terminal)
            }
        }
    }
}

/// Insert `w` between the consecutive vertices `u` → `v` of `face`.
///
/// This is the single-face rewrite that seeds strip subdivision and carries a
/// split across to the next face of a strip: the face gains one vertex and
/// keeps its key.
pub fn insert_vertex_on_edge(
    mesh: &mut PolyMesh,
    face: FaceId,
    u: VertexId,
    v: VertexId,
    w: VertexId,
) -> Result<(), MeshPatternError> {
    let lp = mesh
        .face_vertices(face)
        .ok_or(MeshPatternError::UnknownFace(face))?;
    if mesh.halfedge_face(u, v) != Some(face) {
        return Err(MeshPatternError::NotAnEdge(u, v));
    }
    let i = lp
        .iter()
        .position(|&x| x == v)
        .ok_or(MeshPatternError::VertexNotOnFace { face, vertex: v })?;
    let mut new_loop = lp.to_vec();
    new_loop.insert(i, w);
    mesh.replace_face(face, new_loop)
}

fn rotated_loop(
    mesh: &PolyMesh,
    face: FaceId,
    reference: VertexId,
    rule: GrammarRule,
) -> Result<Vec<VertexId>, MeshPatternError> {
    let lp = mesh
        .face_vertices(face)
        .ok_or(MeshPatternError::UnknownFace(face))?;
    if lp.len() != rule.degree() {
        return Err(MeshPatternError::RuleDegreeMismatch {
            rule: rule.name(),
            face,
            expected: rule.degree(),
            found: lp.len(),
        });
    }
    let i = lp
        .iter()
        .position(|&v| v == reference)
        .ok_or(MeshPatternError::VertexNotOnFace {
            face,
            vertex: reference,
        })?;
    let mut rotated = lp.to_vec();
    rotated.rotate_left(i);
    Ok(rotated)
}

fn add_midpoint(
    mesh: &mut PolyMesh,
    u: VertexId,
    v: VertexId,
) -> Result<VertexId, MeshPatternError> {
    let p = mesh
        .edge_midpoint(u, v)
        .ok_or(MeshPatternError::UnknownVertex(u))?;
    Ok(mesh.add_vertex(p))
}

/// Replace `face` by `parts`; the first part keeps the face key.
///
/// On failure the original face is restored and `new_vertices` (created by the
/// caller for this split) are removed again.
fn split_face(
    mesh: &mut PolyMesh,
    face: FaceId,
    parts: Vec<Vec<VertexId>>,
    new_vertices: &[VertexId],
) -> Result<Vec<FaceId>, MeshPatternError> {
    let original = mesh
        .delete_face(face)
        .ok_or(MeshPatternError::UnknownFace(face))?;
    let mut added = Vec::with_capacity(parts.len());
    for (i, part) in parts.into_iter().enumerate() {
        let result = if i == 0 {
            mesh.add_face_with_key(face, part)
        } else {
            mesh.add_face(part)
        };
        match result {
            Ok(key) => added.push(key),
            Err(e) => {
                for key in added {
                    mesh.delete_face(key);
                }
                // Fresh vertices are only referenced by the parts deleted above.
                for &v in new_vertices {
                    mesh.delete_vertex(v)?;
                }
                mesh.add_face_with_key(face, original)?;
                return Err(e);
            }
        }
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(i: usize) -> VertexId {
        VertexId::new(i)
    }

    fn unit_quad() -> PolyMesh {
        PolyMesh::from_vertices_and_faces(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            &[vec![0, 1, 2, 3]],
        )
        .unwrap()
    }

    #[test]
    fn lookup_table_by_degree() {
        assert_eq!(GrammarRule::for_degree(4), Some(GrammarRule::QuadTri));
        assert_eq!(GrammarRule::for_degree(5), Some(GrammarRule::PentaQuad));
        assert_eq!(GrammarRule::for_degree(6), Some(GrammarRule::HexaQuad));
        assert_eq!(GrammarRule::for_degree(3), None);
        assert_eq!(GrammarRule::for_degree(7), None);
    }

    #[test]
    fn penta_quad_splits_towards_opposite_edge() {
        let mut mesh = unit_quad();
        let f = FaceId::new(0);
        let w = mesh.add_vertex([0.5, 0.0, 0.0]);
        insert_vertex_on_edge(&mut mesh, f, v(0), v(1), w).unwrap();
        assert_eq!(mesh.face_degree(f), Some(5));

        let out = GrammarRule::PentaQuad.rewrite(&mut mesh, f, w).unwrap();
        let RuleOutcome::Continue { vertex: x, split } = out else {
            panic!("pentagon rule must continue");
        };
        assert_eq!(split, (v(2), v(3)));
        assert_eq!(mesh.vertex_position(x), Some([0.5, 1.0, 0.0]));
        assert_eq!(mesh.number_of_faces(), 2);
        assert!(mesh.is_quadmesh());
        assert_eq!(mesh.face_vertices(f).unwrap(), &[w, v(1), v(2), x]);
        // The new interior edge is shared by both quads.
        assert!(!mesh.is_edge_on_boundary(w, x));
    }

    #[test]
    fn hexa_quad_terminates() {
        let mut mesh = PolyMesh::from_vertices_and_faces(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [2.0, 0.0, 0.0],
                [2.0, 1.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            &[vec![0, 1, 2, 3, 4, 5]],
        )
        .unwrap();
        let f = FaceId::new(0);
        let out = GrammarRule::HexaQuad.rewrite(&mut mesh, f, v(1)).unwrap();
        assert_eq!(out, RuleOutcome::Terminal);
        assert_eq!(mesh.face_vertices(f).unwrap(), &[v(1), v(2), v(3), v(4)]);
        assert!(mesh.is_quadmesh());
        assert_eq!(mesh.number_of_faces(), 2);
    }

    #[test]
    fn quad_tri_fallback_makes_triangles() {
        let mut mesh = unit_quad();
        let out = GrammarRule::QuadTri
            .rewrite(&mut mesh, FaceId::new(0), v(0))
            .unwrap();
        assert_eq!(out, RuleOutcome::Terminal);
        assert_eq!(mesh.face_degree_histogram().get(&3), Some(&2));
    }

    #[test]
    fn quad_split_leaves_neighbours_alone() {
        let mut mesh = unit_quad();
        let out = GrammarRule::QuadSplit
            .rewrite(&mut mesh, FaceId::new(0), v(3))
            .unwrap();
        // Reference edge (3, 0), opposite edge (1, 2).
        let RuleOutcome::Continue { vertex, split } = out else {
            panic!("quad split must continue");
        };
        assert_eq!(split, (v(1), v(2)));
        assert_eq!(mesh.vertex_position(vertex), Some([1.0, 0.5, 0.0]));
        assert_eq!(mesh.number_of_faces(), 2);
        assert_eq!(mesh.number_of_vertices(), 6);
        assert!(mesh.is_quadmesh());
    }

    #[test]
    fn clashing_part_restores_the_face() {
        // The triangle already owns the directed diagonal 0 -> 2.
        let mut mesh = PolyMesh::from_vertices_and_faces(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
                [2.0, 2.0, 1.0],
            ],
            &[vec![0, 1, 2, 3], vec![0, 2, 4]],
        )
        .unwrap();
        let f = FaceId::new(0);
        assert!(matches!(
            GrammarRule::QuadTri.rewrite(&mut mesh, f, v(0)),
            Err(MeshPatternError::DirectedEdgeInUse { .. })
        ));
        assert_eq!(mesh.number_of_faces(), 2);
        assert_eq!(mesh.number_of_vertices(), 5);
        assert_eq!(mesh.face_vertices(f).unwrap(), &[v(0), v(1), v(2), v(3)]);
        assert_eq!(mesh.halfedge_face(v(2), v(0)), None);
    }

    #[test]
    fn wrong_degree_or_reference_is_rejected_without_mutation() {
        let mut mesh = unit_quad();
        let f = FaceId::new(0);
        assert!(matches!(
            GrammarRule::PentaQuad.rewrite(&mut mesh, f, v(0)),
            Err(MeshPatternError::RuleDegreeMismatch { expected: 5, found: 4, .. })
        ));
        let stray = mesh.add_vertex([3.0, 3.0, 0.0]);
        assert_eq!(
            GrammarRule::QuadTri.rewrite(&mut mesh, f, stray),
            Err(MeshPatternError::VertexNotOnFace { face: f, vertex: stray })
        );
        assert_eq!(mesh.face_vertices(f).unwrap(), &[v(0), v(1), v(2), v(3)]);
        assert_eq!(
            insert_vertex_on_edge(&mut mesh, f, v(1), v(0), stray),
            Err(MeshPatternError::NotAnEdge(v(1), v(0)))
        );
    }
}
