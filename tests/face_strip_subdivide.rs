mod util;
use util::*;

use mesh_pattern::mesh_error::MeshPatternError;
use mesh_pattern::topology::face_strip::{
    FaceStripOptions, PropagationState, TerminalCause, subdivide, subdivide_with,
};
use mesh_pattern::topology::mesh::PolyMesh;
use mesh_pattern::topology::validation::validate_mesh;

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
fn single_quad_boundary_edge() {
    let mut mesh = unit_quad();
    let report = subdivide(&mut mesh, vid(0), vid(1)).unwrap();

    assert_eq!(mesh.number_of_faces(), 2);
    assert!(mesh.is_quadmesh());
    let w = report.new_vertex.unwrap();
    assert_eq!(mesh.vertex_position(w), Some([0.5, 0.0, 0.0]));
    assert!(find_vertex_at(&mesh, [0.5, 1.0, 0.0]).is_some());
    // Boundary edge: only one side propagates.
    assert_eq!(report.sides.len(), 1);
    assert_eq!(report.sides[0].state, PropagationState::BoundaryReached);
    validate_mesh(&mesh).unwrap();
}

#[test]
fn reversed_boundary_edge_propagates_from_the_other_face_side() {
    let mut mesh = unit_quad();
    let report = subdivide(&mut mesh, vid(1), vid(0)).unwrap();
    assert_eq!(mesh.number_of_faces(), 2);
    assert!(mesh.is_quadmesh());
    assert_eq!(report.sides.len(), 1);
}

#[test]
fn interior_edge_splits_whole_strip() {
    let mut mesh = grid(3, 1);
    let report = subdivide(&mut mesh, vid(1), vid(5)).unwrap();

    assert_eq!(report.strip_faces, 3);
    assert_eq!(mesh.number_of_faces(), 6);
    assert!(mesh.is_quadmesh());
    assert_eq!(report.sides.len(), 2);
    assert!(report
        .sides
        .iter()
        .all(|s| s.state == PropagationState::BoundaryReached));
    for x in [0.0, 1.0, 2.0, 3.0] {
        assert!(find_vertex_at(&mesh, [x, 0.5, 0.0]).is_some(), "x = {x}");
    }
    validate_mesh(&mesh).unwrap();
}

#[test]
fn grid_row_subdivision_adds_the_row_length() {
    let mut mesh = grid(4, 3);
    let report = subdivide(&mut mesh, grid_vertex(4, 2, 1), grid_vertex(4, 2, 2)).unwrap();
    assert_eq!(report.faces_after - report.faces_before, 4);
    assert!(mesh.is_quadmesh());
    // Old boundary edges of the row are now split in two.
    assert!(!mesh.has_edge(grid_vertex(4, 0, 1), grid_vertex(4, 0, 2)));
    validate_mesh(&mesh).unwrap();
}

#[test]
fn closed_strip_stops_when_the_loop_closes() {
    let mut mesh = annulus();
    let report = subdivide(&mut mesh, vid(0), vid(4)).unwrap();

    assert_eq!(mesh.number_of_faces(), 8);
    assert!(mesh.is_quadmesh());
    assert_eq!(report.sides.len(), 2);
    // Side one runs around the ring until it meets the seeded face again.
    assert_eq!(report.sides[0].steps, 4);
    assert_eq!(
        report.sides[0].state,
        PropagationState::DegenerateTerminal(TerminalCause::Hexagon)
    );
    assert_eq!(report.sides[1].state, PropagationState::LoopClosed);
    assert_eq!(mesh.number_of_vertices(), 12);
    validate_mesh(&mesh).unwrap();
}

#[test]
fn preconditions_leave_mesh_untouched() {
    let mut mesh = grid(2, 2);
    let before = mesh.to_vertices_and_faces();
    assert_eq!(
        subdivide(&mut mesh, vid(0), vid(4)),
        Err(MeshPatternError::NotAnEdge(vid(0), vid(4)))
    );

    let apex = mesh.add_vertex([1.0, 3.0, 0.0]);
    mesh.add_face(vec![grid_vertex(2, 2, 2), apex, grid_vertex(2, 1, 2)])
        .unwrap();
    let with_triangle = mesh.to_vertices_and_faces();
    assert!(matches!(
        subdivide(&mut mesh, vid(0), vid(1)),
        Err(MeshPatternError::NotQuadMesh { .. })
    ));
    assert_eq!(mesh.to_vertices_and_faces(), with_triangle);
    assert_ne!(before, with_triangle);
}

#[test]
fn checked_subdivision() {
    let mut mesh = grid(2, 2);
    let options = FaceStripOptions {
        check_invariants: true,
        ..FaceStripOptions::default()
    };
    let report = subdivide_with(&mut mesh, vid(1), vid(4), &options).unwrap();
    assert_eq!(report.faces_after, 6);
    assert_eq!(report.vertices_after, 9 + 3);
}
