#![allow(dead_code)]
use mesh_pattern::{
    geometry::Point3,
    topology::mesh::PolyMesh,
    topology::point::VertexId,
};

pub fn vid(i: usize) -> VertexId {
    VertexId::new(i)
}

/// Index of the grid vertex at column `x`, row `y` in a grid `n` quads wide.
pub fn grid_vertex(n: usize, x: usize, y: usize) -> VertexId {
    vid(y * (n + 1) + x)
}

/// `n` × `m` grid of unit quads (n columns, m rows), counter-clockwise loops.
pub fn grid(n: usize, m: usize) -> PolyMesh {
    let mut positions = Vec::with_capacity((n + 1) * (m + 1));
    for y in 0..=m {
        for x in 0..=n {
            positions.push([x as f64, y as f64, 0.0]);
        }
    }
    let mut faces = Vec::with_capacity(n * m);
    for y in 0..m {
        for x in 0..n {
            let i = y * (n + 1) + x;
            faces.push(vec![i, i + 1, i + n + 2, i + n + 1]);
        }
    }
    PolyMesh::from_vertices_and_faces(&positions, &faces).unwrap()
}

/// Ring of four quads around a square hole.
///
/// Inner corners are 0..4, outer corners 4..8; the radial edges `(k, k + 4)`
/// form one closed strip.
pub fn annulus() -> PolyMesh {
    let positions = [
        [-1.0, -1.0, 0.0],
        [1.0, -1.0, 0.0],
        [1.0, 1.0, 0.0],
        [-1.0, 1.0, 0.0],
        [-2.0, -2.0, 0.0],
        [2.0, -2.0, 0.0],
        [2.0, 2.0, 0.0],
        [-2.0, 2.0, 0.0],
    ];
    let faces: Vec<Vec<usize>> = (0..4)
        .map(|k| vec![k, 4 + k, 4 + (k + 1) % 4, (k + 1) % 4])
        .collect();
    PolyMesh::from_vertices_and_faces(&positions, &faces).unwrap()
}

/// The same grid with every face owning its own four vertices.
pub fn grid_soup(n: usize, m: usize) -> PolyMesh {
    let welded = grid(n, m);
    let mut soup = PolyMesh::new();
    for face in welded.faces() {
        let lp = welded
            .face_vertices(face)
            .unwrap()
            .iter()
            .map(|&v| soup.add_vertex(welded.vertex_position(v).unwrap()))
            .collect();
        soup.add_face(lp).unwrap();
    }
    soup
}

/// The vertex sitting at `p` (within 1e-9), if any.
pub fn find_vertex_at(mesh: &PolyMesh, p: Point3) -> Option<VertexId> {
    mesh.vertices().find(|&v| {
        let q = mesh.vertex_position(v).unwrap();
        (0..3).all(|i| (p[i] - q[i]).abs() < 1e-9)
    })
}

/// Assert the set of vertex positions equals `want` (order-agnostic).
pub fn assert_positions(mesh: &PolyMesh, want: &[Point3]) {
    assert_eq!(mesh.number_of_vertices(), want.len(), "vertex count");
    for &p in want {
        assert!(find_vertex_at(mesh, p).is_some(), "missing vertex at {p:?}");
    }
}
