//! Split propagation across a face strip.
//!
//! Subdivision inserts a vertex on one edge, which turns the quads on either
//! side into pentagons. Propagation walks away from that vertex, one face at a
//! time, repairing the current face with the grammar rule for its degree and
//! carrying the new vertex into the next face:
//!
//! | degree | action                                                          |
//! |--------|-----------------------------------------------------------------|
//! | 5      | `PentaQuad`, carry the new vertex across; boundary or continue  |
//! | 6      | `HexaQuad`, stop ([`TerminalCause::Hexagon`])                   |
//! | 4      | back at the origin: [`PropagationState::LoopClosed`]; otherwise |
//! |        | `QuadTri`, stop ([`TerminalCause::Triangle`])                   |
//! | other  | stop ([`TerminalCause::UnsupportedDegree`])                     |
//!
//! A run is capped at the face count seen when it starts.

use crate::mesh_error::MeshPatternError;
use crate::topology::grammar::{GrammarRule, RuleOutcome, insert_vertex_on_edge};
use crate::topology::mesh::PolyMesh;
use crate::topology::point::{FaceId, VertexId};

/// Why propagation stopped in a non-quad or capped state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TerminalCause {
    /// A hexagon was split into two quads; nothing left to carry.
    Hexagon,
    /// A quad away from the origin was split into two triangles.
    Triangle,
    /// No rule for this face degree.
    UnsupportedDegree(usize),
    /// The run took as many steps as the mesh had faces.
    IterationCap,
}

/// State of one propagation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropagationState {
    /// Repair `face`, whose loop contains the carried vertex `reference`.
    Propagating { face: FaceId, reference: VertexId },
    /// The split reached a boundary edge.
    BoundaryReached,
    /// The split came back around to the vertex it started from.
    LoopClosed,
    DegenerateTerminal(TerminalCause),
}

impl PropagationState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PropagationState::Propagating { .. })
    }
}

/// Outcome of a finished propagation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropagationTrace {
    /// Faces rewritten by the run.
    pub steps: usize,
    /// Terminal state the run ended in.
    pub state: PropagationState,
}

/// Drive propagation from `start` until a terminal state.
///
/// `origin` is the vertex that seeded the split; meeting it again in a quad
/// closes the loop.
pub(crate) fn propagate(
    mesh: &mut PolyMesh,
    start: PropagationState,
    origin: VertexId,
) -> Result<PropagationTrace, MeshPatternError> {
    let cap = mesh.number_of_faces();
    let mut state = start;
    let mut steps = 0;

    while let PropagationState::Propagating { face, reference } = state {
        if steps >= cap {
            log::warn!("propagation: iteration cap {cap} reached at face {face}");
            state = PropagationState::DegenerateTerminal(TerminalCause::IterationCap);
            break;
        }
        state = step(mesh, face, reference, origin)?;
        steps += 1;
        log::trace!("propagation: step {steps} on face {face} (ref {reference}) -> {state:?}");
    }

    Ok(PropagationTrace { steps, state })
}

fn step(
    mesh: &mut PolyMesh,
    face: FaceId,
    reference: VertexId,
    origin: VertexId,
) -> Result<PropagationState, MeshPatternError> {
    let degree = mesh
        .face_degree(face)
        .ok_or(MeshPatternError::UnknownFace(face))?;

    let Some(rule) = GrammarRule::for_degree(degree) else {
        return Ok(PropagationState::DegenerateTerminal(
            TerminalCause::UnsupportedDegree(degree),
        ));
    };

    match rule {
        GrammarRule::PentaQuad => {
            let RuleOutcome::Continue {
                vertex: x,
                split: (c, d),
            } = rule.rewrite(mesh, face, reference)?
            else {
                return Err(MeshPatternError::InvariantViolation(format!(
                    "pentagon rule on face {face} did not continue"
                )));
            };
            if let Some(across) = mesh.halfedge_face(d, c) {
                insert_vertex_on_edge(mesh, across, d, c, x)?;
            }
            // The half of the split edge that leaves `x` inside the new quad.
            let advancing = mesh
                .halfedge_face(reference, x)
                .and_then(|f| mesh.face_vertex_descendant(f, x))
                .ok_or(MeshPatternError::NotAnEdge(reference, x))?;
            if mesh.is_edge_on_boundary(x, advancing) {
                return Ok(PropagationState::BoundaryReached);
            }
            let next = mesh
                .halfedge_face(advancing, x)
                .ok_or(MeshPatternError::NotAnEdge(advancing, x))?;
            Ok(PropagationState::Propagating {
                face: next,
                reference: x,
            })
        }
        GrammarRule::HexaQuad => {
            rule.rewrite(mesh, face, reference)?;
            Ok(PropagationState::DegenerateTerminal(TerminalCause::Hexagon))
        }
        GrammarRule::QuadTri if reference == origin => Ok(PropagationState::LoopClosed),
        GrammarRule::QuadTri | GrammarRule::QuadSplit => {
            GrammarRule::QuadTri.rewrite(mesh, face, reference)?;
            Ok(PropagationState::DegenerateTerminal(TerminalCause::Triangle))
        }
    }
}
